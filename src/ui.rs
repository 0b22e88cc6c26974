use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, SessionStatus, Snapshot};

// ── Top-level routing ─────────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, app: &App) {
    let snapshot = app.snapshot();
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title bar
            Constraint::Length(3), // root
            Constraint::Min(4),    // scale list
            Constraint::Length(4), // status
            Constraint::Length(3), // help
        ])
        .split(area);

    draw_title(f, chunks[0], &snapshot);
    draw_root(f, chunks[1], &snapshot);
    draw_scales(f, chunks[2], app, &snapshot);
    draw_status(f, chunks[3], &snapshot);
    draw_help(f, chunks[4]);
}

// ── Title bar ─────────────────────────────────────────────────────────────────

fn draw_title(f: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let text = format!("  ScalePads  ─  {}", snapshot.device_name);
    let color = match snapshot.session {
        SessionStatus::Connected => Color::Cyan,
        SessionStatus::Failed(_) => Color::Red,
        _                        => Color::Yellow,
    };
    f.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

// ── Root ──────────────────────────────────────────────────────────────────────

fn draw_root(f: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let line = Line::from(vec![
        Span::styled(" Root: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!(" {} ", snapshot.root_name),
            Style::default()
                .fg(Color::Rgb(0xFA, 0xFA, 0xFA))
                .bg(Color::Rgb(0x7D, 0x56, 0xF4))
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

// ── Scale list ────────────────────────────────────────────────────────────────

fn draw_scales(f: &mut Frame, area: Rect, app: &App, snapshot: &Snapshot) {
    let items: Vec<ListItem> = snapshot
        .scale_names
        .iter()
        .map(|name| ListItem::new(format!(" {}", name)))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .title(" Scales ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD))
        .highlight_symbol("► ");

    // the widget only scrolls its own copy
    let mut state = app.scale_list.state().clone();
    f.render_stateful_widget(list, area, &mut state);
}

// ── Status ────────────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let (session_text, session_style) = match snapshot.session {
        SessionStatus::Idle       => ("Not connected".to_string(), Style::default().fg(Color::DarkGray)),
        SessionStatus::Connecting => ("Connecting…".to_string(),   Style::default().fg(Color::Yellow)),
        SessionStatus::Connected  => ("Connected".to_string(),     Style::default().fg(Color::Green)),
        SessionStatus::Failed(e)  => (e.to_string(),               Style::default().fg(Color::Red)),
    };

    let batch = match snapshot.last_batch {
        None => "Nothing sent yet".to_string(),
        Some(report) if report.failed == 0 => {
            format!("Lit {} {} on {} pads", snapshot.root_name, snapshot.scale_name, report.sent)
        }
        Some(report) => format!("{} pads lit, {} failed", report.sent, report.failed),
    };

    let lines = vec![
        Line::from(vec![Span::raw(" Device: "), Span::styled(session_text, session_style)]),
        Line::from(vec![Span::raw(" Last:   "), Span::raw(batch)]),
    ];
    f.render_widget(
        Paragraph::new(lines).block(Block::default().title(" Status ").borders(Borders::ALL)),
        area,
    );
}

// ── Help ──────────────────────────────────────────────────────────────────────

fn draw_help(f: &mut Frame, area: Rect) {
    let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let line = Line::from(vec![
        Span::styled(" ←/h →/l", key), Span::raw(" root   "),
        Span::styled("↑/k ↓/j", key),  Span::raw(" scale   "),
        Span::styled("Space/Enter", key), Span::raw(" light pads   "),
        Span::styled("q/Esc", key),    Span::raw(" quit"),
    ]);
    f.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
        area,
    );
}
