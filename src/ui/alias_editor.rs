//! Alias table editor: from→to rows cycled through the device's signal list.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem},
    Frame,
};

use crate::app::App;

use super::layout::centered_rect;

/// Render the alias editor as a centered overlay
pub fn render_alias_editor(frame: &mut Frame, app: &App) {
    let form = match &app.alias_edit {
        Some(f) => f,
        None => return,
    };

    let height = (form.rows.len().max(1) as u16) + 5;
    let area = centered_rect(52, height, frame.area());
    frame.render_widget(Clear, area);

    let mut items: Vec<ListItem> = vec![ListItem::new(Line::from(Span::styled(
        "  whole table is replaced on apply",
        Style::default().fg(Color::DarkGray),
    )))];

    if form.rows.is_empty() {
        items.push(ListItem::new(Line::from(Span::styled(
            "  no aliases — press n to add one",
            Style::default().fg(Color::DarkGray),
        ))));
    }

    for (i, pair) in form.rows.iter().enumerate() {
        let selected = i == form.selected_row;
        let cell_style = |on_this_cell: bool| {
            if selected && on_this_cell {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            }
        };

        let invalid = pair.from == pair.to;
        let arrow_style = if invalid {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        items.push(ListItem::new(Line::from(vec![
            Span::raw("  "),
            Span::styled(pair.from.clone(), cell_style(!form.on_target)),
            Span::styled(" -> ", arrow_style),
            Span::styled(pair.to.clone(), cell_style(form.on_target)),
            if invalid {
                Span::styled("  (self-alias, will be rejected)", arrow_style)
            } else {
                Span::raw("")
            },
        ])));
    }

    let editor = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Aliases ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(editor, area);
}
