use std::ops::RangeInclusive;

/// Lexical rule tables for one language.
///
/// Everything the boundary classifier and the tick-time vetoes consult is
/// data here: ordered suffix lists and punctuation sets, matched by plain
/// suffix/containment checks. Swapping the table swaps the language without
/// touching engine logic. The shipped default is [`RuleSet::korean`], tuned
/// empirically against live sermon transcription; treat the lists as policy,
/// not ground truth.
#[derive(Debug, Clone)]
pub struct RuleSet {
    /// Terminal punctuation. A commit is safe after the last occurrence.
    pub hard_punct: Vec<char>,
    /// Comma-class marks. A commit after one needs a long tail beyond it.
    pub soft_punct: Vec<char>,
    /// Polite/declarative sentence-final suffixes (commit-friendly).
    pub final_endings: Vec<&'static str>,
    /// Connective suffixes signalling a grammatically incomplete clause
    /// ("because", "if", "while", ...). Held for the longer timeout.
    pub hold_endings: Vec<&'static str>,
    /// Bare grammatical particles a token should not end on when forcing.
    pub particle_tails: Vec<&'static str>,
    /// Trailing adverbs that signal more content is coming.
    pub adverb_tails: Vec<&'static str>,
    /// Minimum tail length beyond a soft-punctuation mark, in chars.
    pub soft_tail_min_chars: usize,
    /// A last token at or under this length, written entirely in
    /// `stub_script`, is treated as an incomplete verb stub.
    pub stub_max_chars: usize,
    /// Unicode range of the script used for the short-stub check.
    pub stub_script: RangeInclusive<char>,
}

impl RuleSet {
    /// Korean rule set carried over from the production tuning.
    pub fn korean() -> Self {
        Self {
            hard_punct: vec!['.', '!', '?', '…', '‥', '！', '？', '。', '」', '］'],
            soft_punct: vec![',', '،', '、', '·'],
            final_endings: vec![
                "습니다", "ㅂ니다", "였다", "였어요", "였어", "했다", "했어요", "했어",
                "합니다", "죠", "네요", "랍니다", "라구요", "에요", "예요", "요", "않다",
            ],
            hold_endings: vec![
                "기 때문에", "기때문에", "때문에", "다면", "으면", "면", "는데요", "는데",
                "지만", "려고", "면서", "다가", "자마자", "거나", "거든", "라서", "아서",
                "어서", "으니까", "니까", "으며", "며",
            ],
            particle_tails: vec![
                "은", "는", "이", "가", "을", "를", "에서", "에게", "에", "께", "으로", "로",
                "와", "과", "도", "만", "까지", "부터", "처럼", "같이",
            ],
            adverb_tails: vec![
                "정말", "진짜", "아주", "매우", "너무", "대단히", "굉장히", "열심히", "잘",
                "많이", "조금", "약간",
            ],
            soft_tail_min_chars: 8,
            stub_max_chars: 2,
            stub_script: '\u{AC00}'..='\u{D7A3}',
        }
    }

    /// Does the text (ignoring trailing whitespace) end on a connective?
    pub fn ends_with_hold(&self, text: &str) -> bool {
        let t = text.trim_end();
        self.hold_endings.iter().any(|s| t.ends_with(s))
    }

    /// Does the text (ignoring trailing whitespace) end on a sentence-final
    /// suffix?
    pub fn ends_with_final(&self, text: &str) -> bool {
        let t = text.trim_end();
        self.final_endings.iter().any(|s| t.ends_with(s))
    }

    pub fn is_particle_tail(&self, token: &str) -> bool {
        self.particle_tails.iter().any(|s| token.ends_with(s))
    }

    pub fn is_adverb_tail(&self, token: &str) -> bool {
        self.adverb_tails.iter().any(|s| token.ends_with(s))
    }

    /// A very short token written entirely in the stub script, read as an
    /// unfinished verb.
    pub fn is_short_stub(&self, token: &str) -> bool {
        !token.is_empty()
            && token.chars().count() <= self.stub_max_chars
            && token.chars().all(|c| self.stub_script.contains(&c))
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::korean()
    }
}
