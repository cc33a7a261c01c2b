//! Delay edit form: one input per delay slot of the selected command.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem},
    Frame,
};

use crate::app::App;

use super::layout::centered_rect;

/// Render the delay edit form as a centered overlay
pub fn render_delay_editor(frame: &mut Frame, app: &App) {
    let form = match &app.delay_edit {
        Some(f) => f,
        None => return,
    };

    let height = (form.inputs.len() as u16) + 5;
    let area = centered_rect(44, height, frame.area());
    frame.render_widget(Clear, area);

    let mut items: Vec<ListItem> = vec![ListItem::new(Line::from(Span::styled(
        "  blank or invalid values become 0",
        Style::default().fg(Color::DarkGray),
    )))];

    for (i, value) in form.inputs.iter().enumerate() {
        let focused = i == form.field_index;
        let cursor = if focused { "_" } else { "" };
        let style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        items.push(ListItem::new(Line::from(Span::styled(
            format!("  delay {} (ms): {}{}", i + 1, value, cursor),
            style,
        ))));
    }

    items.push(ListItem::new(Line::from(Span::styled(
        format!("  {} step(s) after save", form.inputs.len() + 1),
        Style::default().fg(Color::DarkGray),
    ))));

    let editor = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Delays: {} ", form.command))
            .border_style(Style::default().fg(Color::Green)),
    );

    frame.render_widget(editor, area);
}
