//! Main UI layout.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode};
use crate::learn::LearnPhase;

use super::alias_editor::render_alias_editor;
use super::command_line::render_command_line;
use super::command_list::render_command_list;
use super::delay_editor::render_delay_editor;
use super::learn_menu::{render_capture_overlay, render_learn_menu};
use super::status_bar::render_status_bar;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Draw the entire UI
pub fn draw_ui(frame: &mut Frame, app: &App) {
    let show_command = app.input_mode == InputMode::Command;

    let main_area = frame.area();
    let mut v_constraints = vec![
        Constraint::Length(3), // Header
        Constraint::Min(10),   // Command list + detail panel
        Constraint::Length(3), // Status bar
        Constraint::Length(1), // Help bar
    ];
    if show_command {
        v_constraints.insert(v_constraints.len() - 1, Constraint::Length(3));
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(v_constraints)
        .split(main_area);

    let mut idx = 0;
    render_header(frame, rows[idx], app);
    idx += 1;

    render_command_list(frame, rows[idx], app);
    idx += 1;

    render_status_bar(frame, rows[idx], app);
    idx += 1;

    if show_command {
        render_command_line(frame, rows[idx], app);
        idx += 1;
    }

    render_help_bar(frame, rows[idx], app);

    // Overlay widgets (rendered on top of everything else)
    match app.input_mode {
        InputMode::LearnMenu => render_learn_menu(frame, app),
        InputMode::LearnName => render_input_prompt(
            frame,
            "Learn: command name",
            &app.learn_name_input,
            "leave empty to name after capture",
        ),
        InputMode::LearnSaveName => render_input_prompt(
            frame,
            "Captured! Save as",
            &app.learn_name_input,
            "Enter to save, Esc to discard",
        ),
        InputMode::Rename => render_input_prompt(
            frame,
            "Rename command",
            &app.rename_input,
            "Enter to apply, Esc to cancel",
        ),
        InputMode::ConfirmDelete => render_confirm_delete(frame, app),
        InputMode::DelayEdit => render_delay_editor(frame, app),
        InputMode::AliasEdit => render_alias_editor(frame, app),
        InputMode::Help => render_help_overlay(frame),
        _ => {}
    }

    // Capture-in-progress banner sits above everything, including other
    // overlays: it is drawn on the frame right before the loop blocks on
    // the learn request.
    if *app.learn_session.phase() == LearnPhase::Requested {
        render_capture_overlay(frame, app);
    }
}

/// Render the header with title and device status
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let device = if app.device_online {
        Span::styled(
            format!(" {} ", app.storage.config.device_url),
            Style::default().fg(Color::Green),
        )
    } else {
        Span::styled(" OFFLINE ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
    };

    let title = Line::from(vec![
        Span::styled(
            format!(" irdeck v{} ", VERSION),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("| "),
        device,
        Span::raw("| "),
        Span::styled(
            format!("{} command(s), {} alias(es)", app.snapshot.len(), app.snapshot.aliases.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    frame.render_widget(header, area);
}

/// Render the bottom help bar for the current mode
fn render_help_bar(frame: &mut Frame, area: Rect, app: &App) {
    let help = match app.input_mode {
        InputMode::Normal => {
            "j/k:move  Enter:send  l:learn  e:delays  a:aliases  r:rename  d:delete  g:refresh  ::cmd  ?:help  q:quit"
        }
        InputMode::Command => "Enter:run  Esc:cancel",
        InputMode::Rename | InputMode::LearnName | InputMode::LearnSaveName => {
            "type name  Enter:confirm  Esc:cancel"
        }
        InputMode::ConfirmDelete => "y:delete  n/Esc:keep",
        InputMode::LearnMenu => "j/k:mode  Enter:next  Esc:cancel",
        InputMode::DelayEdit => "j/k:slot  type:edit  x:delete slot  Enter:save all  Esc:cancel",
        InputMode::AliasEdit => {
            "j/k:row  Tab:column  h/l:cycle  n:new  d:remove  Enter:apply  Esc:cancel"
        }
        InputMode::Help => "Esc/Enter:close",
    };

    let bar = Paragraph::new(Line::from(Span::styled(
        help,
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(bar, area);
}

/// Centered rect helper for overlays
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// One-line input prompt as a centered overlay
fn render_input_prompt(frame: &mut Frame, title: &str, value: &str, hint: &str) {
    let area = centered_rect(46, 5, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(vec![
            Span::raw("> "),
            Span::styled(value, Style::default().fg(Color::Yellow)),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
    ];

    let prompt = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", title))
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(prompt, area);
}

/// Delete confirmation overlay
fn render_confirm_delete(frame: &mut Frame, app: &App) {
    let name = app.delete_target.as_deref().unwrap_or("?");
    let area = centered_rect(44, 5, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(format!("Delete '{}' from the device?", name)),
        Line::from(Span::styled(
            "aliases pointing at it will dangle",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let prompt = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Confirm delete (y/n) ")
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(prompt, area);
}

/// Key reference overlay
fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(56, 18, frame.area());
    frame.render_widget(Clear, area);

    let entries = [
        ("j / k, arrows", "move selection"),
        ("Enter", "send selected command (alias-resolved)"),
        ("l", "learn a new command from a remote"),
        ("e", "edit the selected command's delays"),
        ("a", "edit the alias table"),
        ("r", "rename selected command"),
        ("d", "delete selected command"),
        ("g", "refresh from device"),
        (":send <name>", "send by name"),
        (":learn <mode> [name]", "learn (single|normal|step)"),
        (":rename <old> <new>", "rename by name"),
        (":delete <name>", "delete by name"),
        (":fw [update]", "firmware check / update"),
        (":q", "quit"),
    ];

    let lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(
                    format!("{:<22}", key),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(*desc),
            ])
        })
        .collect();

    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Keys ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(help, area);
}
