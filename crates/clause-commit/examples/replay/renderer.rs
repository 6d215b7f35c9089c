use clause_commit::CommitReason;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

use crate::App;

const LEDGER_PANEL_WIDTH: u16 = 36;

pub fn render(frame: &mut Frame, app: &App) {
    let [header_area, body_area, timeline_area, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let [transcript_area, ledger_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(LEDGER_PANEL_WIDTH)])
            .areas(body_area);

    render_header(frame, app, header_area);
    render_transcript(frame, app, transcript_area);
    render_ledger(frame, app, ledger_area);
    render_timeline(frame, app, timeline_area);
    render_hints(frame, hint_area);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let status = if app.paused {
        "⏸ PAUSED"
    } else {
        "▶ PLAYING"
    };
    let text = format!(
        " {} | {} | t={}ms | {}ms/tick ",
        app.fixture_name,
        status,
        app.now_ms(),
        app.speed_ms
    );
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn render_transcript(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    let mut segment = 0;

    for commit in &app.commits {
        if commit.segment_id != segment {
            segment = commit.segment_id;
            if !lines.is_empty() {
                lines.push(Line::raw(""));
            }
        }
        let style = if commit.is_final {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(commit.text.clone(), style)));
    }

    if !app.partial.is_empty() {
        lines.push(Line::from(vec![
            Span::styled(
                app.partial.clone(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
            Span::styled("▏", Style::default().fg(Color::DarkGray)),
        ]));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::default())
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn render_ledger(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(" ledger ", Style::default().fg(Color::DarkGray)));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    let visible = inner.height.saturating_sub(2) as usize;
    let start = app.commits.len().saturating_sub(visible);

    for commit in &app.commits[start..] {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}.{} ", commit.segment_id, commit.revision),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                reason_label(commit.reason),
                Style::default().fg(reason_color(commit.reason)),
            ),
            Span::styled(
                format!(" {}ch", commit.text.chars().count()),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("commits ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.commits.len().to_string()),
        Span::styled("  buffered ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.engine.buffered().chars().count().to_string()),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn reason_label(reason: CommitReason) -> &'static str {
    match reason {
        CommitReason::Punct => "punct",
        CommitReason::FinalEnding => "final-ending",
        CommitReason::SoftPunct => "soft-punct",
        CommitReason::Timeout => "timeout",
        CommitReason::TimeoutConnective => "timeout-connective",
        CommitReason::Final => "final",
    }
}

fn reason_color(reason: CommitReason) -> Color {
    match reason {
        CommitReason::Final => Color::Green,
        CommitReason::Timeout | CommitReason::TimeoutConnective => Color::Yellow,
        _ => Color::Cyan,
    }
}

fn render_timeline(frame: &mut Frame, app: &App, area: Rect) {
    let total = app.total();
    let ratio = if total == 0 {
        0.0
    } else {
        app.next_event as f64 / total as f64
    };
    let label = format!("{}/{}", app.next_event, total);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::White).bg(Color::DarkGray))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, area);
}

fn render_hints(frame: &mut Frame, area: Rect) {
    frame.render_widget(
        Paragraph::new(
            " [Space] pause/resume  [←/→] seek  [↑/↓] speed  [Home/End] jump  [q] quit ",
        )
        .style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
