//! Status bar widget.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

/// Render the status bar. Precedence: error, then the last action's status,
/// then an idle summary of the snapshot and connection state.
pub fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let (message, style) = if let Some(ref error) = app.last_error {
        (
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )
    } else if let Some(ref status) = app.status_message {
        (status.clone(), Style::default().fg(Color::Green))
    } else {
        let summary = idle_summary(
            app.device_online,
            app.snapshot.len(),
            app.snapshot.aliases.len(),
            app.snapshot.dangling_aliases().len(),
        );
        let style = if app.device_online {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Red)
        };
        (summary, style)
    };

    let status_line = Line::from(vec![Span::styled(message, style)]);

    let status = Paragraph::new(status_line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("status"),
    );

    frame.render_widget(status, area);
}

/// Idle line shown when there is nothing newer to report.
fn idle_summary(online: bool, commands: usize, aliases: usize, dangling: usize) -> String {
    let mut line = if online {
        format!("{} command(s), {} alias(es)", commands, aliases)
    } else {
        format!(
            "device offline, showing last snapshot ({} command(s))",
            commands
        )
    };
    if dangling > 0 {
        line.push_str(&format!(", {} dangling", dangling));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_summary_counts() {
        assert_eq!(idle_summary(true, 3, 2, 0), "3 command(s), 2 alias(es)");
        assert_eq!(
            idle_summary(true, 3, 2, 1),
            "3 command(s), 2 alias(es), 1 dangling"
        );
    }

    #[test]
    fn test_idle_summary_offline() {
        let line = idle_summary(false, 4, 0, 0);
        assert!(line.contains("offline"));
        assert!(line.contains("4 command(s)"));
    }
}
