//! Command list widget with detail panel.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::app::App;

/// Render the commands area: table + detail panel
pub fn render_command_list(frame: &mut Frame, area: Rect, app: &App) {
    let has_selection = app
        .selected
        .map(|i| i < app.snapshot.len())
        .unwrap_or(false);

    let chunks = if has_selection {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(6),    // Table (flexible)
                Constraint::Length(8), // Detail panel (fixed)
            ])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6)])
            .split(area)
    };

    render_table(frame, chunks[0], app);

    if has_selection && chunks.len() > 1 {
        render_detail_panel(frame, chunks[1], app);
    }
}

/// Render the command table, in device-reported order
fn render_table(frame: &mut Frame, area: Rect, app: &App) {
    let header_cells = ["Name", "Steps", "Delays", "Alias"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).height(1);

    let rows = app.snapshot.commands.iter().map(|cmd| {
        let alias_cell = match app.snapshot.aliases.get(&cmd.name) {
            Some(target) => {
                let dangling = !app.snapshot.contains(target);
                let style = if dangling {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default().fg(Color::Cyan)
                };
                Cell::from(format!("-> {}", target)).style(style)
            }
            None => Cell::from("").style(Style::default()),
        };

        let steps_style = if cmd.is_sequence() {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        Row::new(vec![
            Cell::from(cmd.name.clone()),
            Cell::from(cmd.step_count().to_string()).style(steps_style),
            Cell::from(cmd.delay_summary()),
            alias_cell,
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(6),
            Constraint::Min(20),
            Constraint::Min(14),
        ],
    )
    .header(header)
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ")
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" commands "),
    );

    let mut state = TableState::default();
    state.select(app.selected);
    *state.offset_mut() = app.scroll_offset;

    frame.render_stateful_widget(table, area, &mut state);
}

/// Render the detail panel for the selected command
fn render_detail_panel(frame: &mut Frame, area: Rect, app: &App) {
    let cmd = match app.selected.and_then(|i| app.snapshot.commands.get(i)) {
        Some(c) => c,
        None => return,
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Name: ", Style::default().fg(Color::DarkGray)),
            Span::styled(&cmd.name, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Steps: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!(
                "{} ({} delay slot(s), {} ms total)",
                cmd.step_count(),
                cmd.delay_count(),
                cmd.total_delay_ms()
            )),
        ]),
    ];

    if cmd.is_sequence() {
        lines.push(Line::from(vec![
            Span::styled("Delays: ", Style::default().fg(Color::DarkGray)),
            Span::styled(cmd.delay_summary(), Style::default().fg(Color::Yellow)),
        ]));
    }

    // Outbound redirection, one hop
    if let Some(target) = app.snapshot.aliases.get(&cmd.name) {
        let dangling = !app.snapshot.contains(target);
        lines.push(Line::from(vec![
            Span::styled("Sends as: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                target.clone(),
                if dangling {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default().fg(Color::Cyan)
                },
            ),
            if dangling {
                Span::styled(" (dangling)", Style::default().fg(Color::Red))
            } else {
                Span::raw("")
            },
        ]));
    }

    // Inbound aliases
    let inbound: Vec<&str> = app
        .snapshot
        .aliases
        .iter()
        .filter(|(_, to)| to.as_str() == cmd.name)
        .map(|(from, _)| from.as_str())
        .collect();
    if !inbound.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Aliased by: ", Style::default().fg(Color::DarkGray)),
            Span::styled(inbound.join(", "), Style::default().fg(Color::Cyan)),
        ]));
    }

    lines.push(Line::from(Span::styled(
        format!(
            "snapshot from {}",
            app.snapshot.fetched_at.format("%H:%M:%S UTC")
        ),
        Style::default().fg(Color::DarkGray),
    )));

    let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" detail "),
    );
    frame.render_widget(panel, area);
}
