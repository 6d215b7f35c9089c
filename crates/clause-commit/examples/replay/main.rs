mod fixture;
mod renderer;

use std::time::{Duration, Instant};

use clause_commit::{
    AsrEvent, ClauseCommitEngine, Clock, Commit, EngineConfig, EngineEvent, ManualClock,
};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use fixture::Fixture;
use ratatui::DefaultTerminal;

/// Simulated time advanced per UI frame, and the engine's poll interval.
const TICK_MS: u64 = 100;

/// Simulated time to keep ticking after the last event, so trailing
/// silence-forced commits still fire.
const TRAILING_MS: u64 = 4000;

#[derive(clap::Parser)]
#[command(name = "replay", about = "Replay a recorded recognizer session in the terminal")]
struct Args {
    #[arg(short, long, default_value_t = Fixture::KoreanSermon)]
    fixture: Fixture,

    /// Wall-clock milliseconds per simulated tick.
    #[arg(short, long, default_value_t = 30)]
    speed: u64,
}

struct App {
    session: Vec<AsrEvent>,
    next_event: usize,
    paused: bool,
    speed_ms: u64,
    fixture_name: String,

    clock: ManualClock,
    engine: ClauseCommitEngine,
    commits: Vec<Commit>,
    partial: String,
}

impl App {
    fn new(session: Vec<AsrEvent>, speed_ms: u64, fixture_name: String) -> Self {
        let clock = ManualClock::new();
        let engine = ClauseCommitEngine::with_clock(EngineConfig::default(), clock.clone())
            .expect("default config is valid");
        Self {
            session,
            next_event: 0,
            paused: false,
            speed_ms,
            fixture_name,
            clock,
            engine,
            commits: Vec::new(),
            partial: String::new(),
        }
    }

    fn total(&self) -> usize {
        self.session.len()
    }

    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    fn apply(&mut self, events: Vec<EngineEvent>) {
        for event in events {
            match event {
                EngineEvent::Partial { text } => self.partial = text,
                EngineEvent::Commit(commit) => {
                    self.partial.clear();
                    self.commits.push(commit);
                }
            }
        }
    }

    /// Advance simulated time by one tick, feeding any events that came due.
    fn advance(&mut self) {
        if self.is_done() {
            return;
        }
        self.clock.advance(TICK_MS);
        let events = self.engine.tick();
        self.apply(events);

        while self.next_event < self.session.len()
            && self.session[self.next_event].at_ms <= self.clock.now_ms()
        {
            let ev = self.session[self.next_event].clone();
            let events = if ev.is_final {
                self.engine.feed_final(&ev.text)
            } else {
                self.engine.feed_interim(&ev.text)
            };
            self.apply(events);
            self.next_event += 1;
        }
    }

    /// Rebuild from scratch up to (but not past) event `target`.
    fn seek_to(&mut self, target: usize) {
        let target = target.min(self.total());
        let session = std::mem::take(&mut self.session);
        *self = App::new(session, self.speed_ms, self.fixture_name.clone());
        while self.next_event < target {
            self.advance();
        }
    }

    fn is_done(&self) -> bool {
        self.next_event >= self.total()
            && self.now_ms() >= self.session.last().map_or(0, |e| e.at_ms) + TRAILING_MS
    }
}

fn main() {
    use clap::Parser;
    let args = Args::parse();
    let fixture_name = args.fixture.to_string();

    let session: Vec<AsrEvent> =
        serde_json::from_str(args.fixture.json()).expect("fixture must parse as AsrEvent[]");

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, session, args.speed, fixture_name.clone());
    ratatui::restore();

    match result {
        Ok(app) => {
            println!(
                "Done. {} commits across {} segments from {} events ({} fixture).",
                app.commits.len(),
                app.commits.last().map_or(0, |c| c.segment_id),
                app.total(),
                fixture_name,
            );
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn run(
    terminal: &mut DefaultTerminal,
    session: Vec<AsrEvent>,
    speed_ms: u64,
    fixture_name: String,
) -> std::io::Result<App> {
    let mut app = App::new(session, speed_ms, fixture_name);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| renderer::render(frame, &app))?;

        let tick_duration = Duration::from_millis(app.speed_ms);
        let elapsed = last_tick.elapsed();
        let timeout = tick_duration.saturating_sub(elapsed);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char(' ') => {
                        app.paused = !app.paused;
                        last_tick = Instant::now();
                    }
                    KeyCode::Right => {
                        app.advance();
                    }
                    KeyCode::Left => {
                        app.seek_to(app.next_event.saturating_sub(1));
                    }
                    KeyCode::Up => {
                        app.speed_ms = app.speed_ms.saturating_sub(10).max(5);
                    }
                    KeyCode::Down => {
                        app.speed_ms += 10;
                    }
                    KeyCode::Home => {
                        app.seek_to(0);
                    }
                    KeyCode::End => {
                        while !app.is_done() {
                            app.advance();
                        }
                    }
                    _ => {}
                }
            }
        } else if !app.paused {
            if last_tick.elapsed() >= tick_duration {
                app.advance();
                last_tick = Instant::now();

                if app.is_done() {
                    terminal.draw(|frame| renderer::render(frame, &app))?;
                    app.paused = true;
                }
            }
        }
    }

    Ok(app)
}
