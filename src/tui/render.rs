use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::app::{App, PendingAction, StatusLevel};
use super::command::{help_text, COMMAND_HINTS};
use super::markdown::parse_markdown;
use crate::session::{ChatTurn, TurnRole};
use crate::upload::accepted_extensions;

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &mut App) {
    let hints_height = command_hints_height(app);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Header
            Constraint::Min(8),               // Chat + document panel
            Constraint::Length(hints_height), // Command hints
            Constraint::Length(3),            // Input
            Constraint::Length(1),            // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);

    if app.show_document_panel {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(2, 3), Constraint::Ratio(1, 3)])
            .split(chunks[1]);
        render_chat(frame, body[0], app);
        render_document_panel(frame, body[1], app);
    } else {
        render_chat(frame, chunks[1], app);
    }

    if hints_height > 0 {
        render_command_hints(frame, chunks[2], app);
    }
    render_input(frame, chunks[3], app);
    render_status_bar(frame, chunks[4], app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let document = app.session.active_document().unwrap_or("none");
    let header = Paragraph::new(Line::from(vec![
        Span::styled("📚 ", Style::default().fg(Color::Cyan)),
        Span::styled(
            "Document Chatbot",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | Service: "),
        Span::styled(app.service_url.clone(), Style::default().fg(Color::Green)),
        Span::raw(" | Document: "),
        Span::styled(document.to_string(), Style::default().fg(Color::Yellow)),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
    .alignment(Alignment::Center);

    frame.render_widget(header, area);
}

fn turn_lines(turn: &ChatTurn, render_markdown: bool) -> Vec<Line<'static>> {
    let (label, color) = match turn.role() {
        TurnRole::User => ("You", Color::Blue),
        TurnRole::Assistant => ("Assistant", Color::Green),
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("[{}] ", label),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            turn.timestamp().format("%H:%M").to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    ])];

    if render_markdown && turn.role() == TurnRole::Assistant {
        lines.extend(parse_markdown(turn.content()));
    } else {
        lines.extend(turn.content().lines().map(|line| Line::from(line.to_string())));
    }

    lines.push(Line::from(""));
    lines
}

/// Rows a set of lines occupies once wrapped to `width`
fn wrapped_height(lines: &[Line<'_>], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn render_chat(frame: &mut Frame, area: Rect, app: &mut App) {
    let mut lines: Vec<Line<'static>> = Vec::new();

    if app.session.is_empty() {
        lines.push(Line::from(Span::styled(
            "Ask a question about your document...",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    for turn in app.session.turns() {
        lines.extend(turn_lines(turn, app.render_markdown));
    }

    if app.pending == Some(PendingAction::Chat) {
        lines.push(Line::from(vec![
            Span::styled(
                "[Assistant] ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "Getting response...",
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC | Modifier::SLOW_BLINK),
            ),
        ]));
    }

    // Keep the newest turn in view unless the user scrolled up
    let inner_height = area.height.saturating_sub(2);
    let total = wrapped_height(&lines, area.width.saturating_sub(2));
    let bottom = total.saturating_sub(inner_height);
    app.max_scroll = bottom;
    app.scroll_offset = app.scroll_offset.min(bottom);
    let top = bottom - app.scroll_offset;

    let title = if app.scroll_offset > 0 {
        format!(" Chat (scrolled {} lines) ", app.scroll_offset)
    } else {
        " Chat ".to_string()
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: false })
        .scroll((top, 0));

    frame.render_widget(paragraph, area);
}

fn render_document_panel(frame: &mut Frame, area: Rect, app: &App) {
    if app.help_visible {
        let help = Paragraph::new(help_text())
            .style(Style::default().fg(Color::Gray))
            .block(
                Block::default()
                    .title(" Help ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(help, area);
        return;
    }

    let label = Style::default().fg(Color::Gray);
    let mut lines = vec![Line::from(Span::styled(
        "📄 Upload Document",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    lines.push(Line::from(""));

    if let Some(PendingAction::Upload { file_name }) = &app.pending {
        lines.push(Line::from(Span::styled(
            format!("Uploading and processing {}...", file_name),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::SLOW_BLINK),
        )));
        lines.push(Line::from(""));
    }

    if let Some(result) = &app.last_upload {
        let (text, color) = if result.already_existed {
            ("Document already exists!", Color::Cyan)
        } else {
            ("Document processed successfully!", Color::Green)
        };
        lines.push(Line::from(Span::styled(text, Style::default().fg(color))));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled("Current Document Hash Code:", label)));
    lines.push(match app.session.active_document() {
        Some(id) => Line::from(Span::styled(
            id.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            "none (use :upload <path>)",
            Style::default().fg(Color::DarkGray),
        )),
    });
    lines.push(Line::from(""));

    let settings = app.controller.upload_settings();
    lines.push(Line::from(vec![
        Span::styled("Accepted: ", label),
        Span::raw(accepted_extensions()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Chunks: ", label),
        Span::raw(format!(
            "{} chars, {} overlap",
            settings.chunk_size, settings.chunk_overlap
        )),
    ]));

    let panel = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Document ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(panel, area);
}

fn matching_hints(app: &App) -> Vec<(&'static str, &'static str)> {
    let Some(typed) = app.input.strip_prefix(':') else {
        return Vec::new();
    };
    let typed = typed.split_whitespace().next().unwrap_or("").to_lowercase();

    COMMAND_HINTS
        .iter()
        .filter(|(cmd, _)| cmd.trim_start_matches(':').starts_with(&typed))
        .copied()
        .collect()
}

fn command_hints_height(app: &App) -> u16 {
    let hints = matching_hints(app).len() as u16;
    if hints == 0 {
        0
    } else {
        hints + 2
    }
}

fn render_command_hints(frame: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = matching_hints(app)
        .into_iter()
        .map(|(cmd, desc)| {
            Line::from(vec![
                Span::styled(
                    format!("  {:<16}", cmd),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(desc, Style::default().fg(Color::Gray)),
            ])
        })
        .collect();

    let hints = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Commands "),
    );
    frame.render_widget(hints, area);
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let is_command = app.input.starts_with(':');
    let title = if is_command {
        " Enter Command "
    } else {
        " Ask a question about your document... (:help for commands) "
    };

    let input = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if is_command {
                    Color::Yellow
                } else {
                    Color::DarkGray
                }))
                .title(title),
        );
    frame.render_widget(input, area);

    let cursor_offset = u16::try_from(app.input.chars().count()).unwrap_or(u16::MAX);
    let cursor_x = area
        .x
        .saturating_add(1)
        .saturating_add(cursor_offset)
        .min(area.x + area.width.saturating_sub(2));
    frame.set_cursor_position((cursor_x, area.y + 1));
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let (badge, badge_color) = match &app.pending {
        Some(PendingAction::Chat) => (" WAITING ", Color::Yellow),
        Some(PendingAction::Upload { .. }) => (" UPLOADING ", Color::Yellow),
        None => (" READY ", Color::Green),
    };

    let (text, color) = match &app.status_message {
        Some(status) => {
            let color = match status.level {
                StatusLevel::Info => Color::Cyan,
                StatusLevel::Success => Color::Green,
                StatusLevel::Warning => Color::Yellow,
                StatusLevel::Error => Color::Red,
            };
            (status.text.clone(), color)
        }
        None => (String::from("Ready"), Color::Gray),
    };

    let status_line = Line::from(vec![
        Span::styled(
            badge,
            Style::default()
                .bg(badge_color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(text, Style::default().fg(color)),
        Span::raw(" | "),
        Span::styled("Ctrl+C: quit", Style::default().fg(Color::DarkGray)),
    ]);

    let status_bar = Paragraph::new(vec![status_line])
        .style(Style::default().bg(Color::Black))
        .block(Block::default());

    frame.render_widget(status_bar, area);
}
