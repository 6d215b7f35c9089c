#[derive(Clone, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Fixture {
    #[strum(serialize = "korean-sermon")]
    #[value(name = "korean-sermon")]
    KoreanSermon,
}

impl Fixture {
    pub fn json(&self) -> &'static str {
        match self {
            Self::KoreanSermon => commit_data::korean_1::SERMON_JSON,
        }
    }
}
