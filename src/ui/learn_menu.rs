//! Learn mode menu and capture-in-progress overlay.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::learn::LearnMode;

use super::layout::centered_rect;

/// Render the learn mode selection menu as a centered overlay
pub fn render_learn_menu(frame: &mut Frame, app: &App) {
    let menu_width = 40u16;
    let menu_height = (LearnMode::ALL.len() as u16) + 4;
    let area = centered_rect(menu_width, menu_height, frame.area());

    frame.render_widget(Clear, area);

    let mut items: Vec<ListItem> = vec![
        ListItem::new(Line::from(Span::styled(
            "  how should presses be grouped?",
            Style::default().fg(Color::DarkGray),
        ))),
    ];

    for (i, mode) in LearnMode::ALL.iter().enumerate() {
        let style = if i == app.learn_menu_index {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        items.push(ListItem::new(Line::from(Span::styled(
            format!("  {:<14} ({})", mode.label(), mode.as_query()),
            style,
        ))));
    }

    let menu = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Learn command ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(menu, area);
}

/// Banner shown while the learn request is about to block the loop.
pub fn render_capture_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect(48, 6, frame.area());
    frame.render_widget(Clear, area);

    let mode = app.learn_session.mode();
    let name = app
        .learn_session
        .proposed_name()
        .unwrap_or("(name after capture)");

    let lines = vec![
        Line::from(Span::styled(
            "Point the remote at the device",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("and press the button for '{}'", name)),
        Line::from(Span::styled(
            format!("mode: {}", mode.label()),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let overlay = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Capturing... ")
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(overlay, area);
}
