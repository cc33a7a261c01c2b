//! irdeck - terminal remote for an ESP32 IR blaster
//!
//! A terminal UI application for browsing, sending, learning, and retiming
//! infrared commands stored on an IR blaster device, over HTTP.

mod alias;
mod app;
mod command;
mod device;
mod editor;
mod learn;
mod repository;
mod storage;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Write};
use std::panic;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, InputMode};
use learn::LearnMode;
use ui::draw_ui;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Restore the terminal to normal state (for panic handler)
fn restore_terminal_panic() {
    // Disable raw mode first
    let _ = disable_raw_mode();

    // Write escape sequences directly to stdout
    let mut stdout = io::stdout();

    // Leave alternate screen: ESC [ ? 1049 l
    let _ = stdout.write_all(b"\x1b[?1049l");

    // Show cursor: ESC [ ? 25 h
    let _ = stdout.write_all(b"\x1b[?25h");

    let _ = stdout.flush();
}

fn main() -> Result<()> {
    // Check if we have a TTY first
    if !atty::is(atty::Stream::Stdout) {
        eprintln!("Error: irdeck requires a terminal (TTY) to run.");
        eprintln!("Please run this program in a real terminal, not via a script or IDE runner.");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal on panic
    let default_panic = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal_panic();
        default_panic(panic_info);
    }));

    // Initialize logging to a file (not stdout, which would corrupt TUI)
    let log_file = crate::storage::resolve_config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from(".").join("irdeck"))
        .join("irdeck.log");

    // Create log directory if needed
    if let Some(parent) = log_file.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    // Set up file-based logging
    if let Ok(file) = std::fs::File::create(&log_file) {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "irdeck=info".into()),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    }

    tracing::info!("Starting irdeck v{}", VERSION);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run
    let mut app = App::new()?;
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal properly using the terminal's backend
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err:?}");
        return Err(err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| draw_ui(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.input_mode {
                        InputMode::Normal => match key.code {
                            KeyCode::Char('q') => return Ok(()),
                            KeyCode::Char(':') => {
                                app.input_mode = InputMode::Command;
                                app.command_input.clear();
                            }
                            KeyCode::Char('j') | KeyCode::Down => {
                                app.next_command();
                            }
                            KeyCode::Char('k') | KeyCode::Up => {
                                app.previous_command();
                            }
                            KeyCode::Enter => {
                                app.send_selected();
                            }
                            KeyCode::Char('l') => {
                                app.open_learn_menu();
                            }
                            KeyCode::Char('e') => {
                                app.open_delay_editor();
                            }
                            KeyCode::Char('a') => {
                                app.open_alias_editor();
                            }
                            KeyCode::Char('r') => {
                                app.start_rename();
                            }
                            KeyCode::Char('d') => {
                                app.request_delete_selected();
                            }
                            KeyCode::Char('g') => {
                                app.execute_command("refresh")?;
                            }
                            KeyCode::Char('?') => {
                                app.input_mode = InputMode::Help;
                            }
                            _ => {}
                        },

                        InputMode::Command => match key.code {
                            KeyCode::Enter => {
                                let command = app.command_input.clone();
                                app.execute_command(&command)?;
                                if app.quit_requested {
                                    return Ok(());
                                }
                                app.command_input.clear();
                                if app.input_mode == InputMode::Command {
                                    app.input_mode = InputMode::Normal;
                                }
                                while app.has_pending_op() {
                                    terminal.draw(|f| draw_ui(f, app))?;
                                    app.run_one_pending_op()?;
                                }
                            }
                            KeyCode::Char(c) => {
                                app.command_input.push(c);
                            }
                            KeyCode::Backspace => {
                                app.command_input.pop();
                            }
                            KeyCode::Esc => {
                                app.command_input.clear();
                                app.input_mode = InputMode::Normal;
                            }
                            _ => {}
                        },

                        InputMode::Rename => match key.code {
                            KeyCode::Enter => {
                                app.commit_rename();
                            }
                            KeyCode::Char(c) => {
                                app.rename_input.push(c);
                            }
                            KeyCode::Backspace => {
                                app.rename_input.pop();
                            }
                            KeyCode::Esc => {
                                app.rename_old = None;
                                app.input_mode = InputMode::Normal;
                            }
                            _ => {}
                        },

                        InputMode::ConfirmDelete => match key.code {
                            KeyCode::Char('y') | KeyCode::Char('Y') => {
                                app.confirm_delete(true);
                            }
                            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                                app.confirm_delete(false);
                            }
                            _ => {}
                        },

                        InputMode::LearnMenu => match key.code {
                            KeyCode::Up | KeyCode::Char('k') => {
                                app.learn_menu_index = app.learn_menu_index.saturating_sub(1);
                            }
                            KeyCode::Down | KeyCode::Char('j') => {
                                if app.learn_menu_index < LearnMode::ALL.len() - 1 {
                                    app.learn_menu_index += 1;
                                }
                            }
                            KeyCode::Enter => {
                                app.choose_learn_mode();
                            }
                            KeyCode::Esc => {
                                app.input_mode = InputMode::Normal;
                            }
                            _ => {}
                        },

                        InputMode::LearnName => match key.code {
                            KeyCode::Enter => {
                                app.begin_learn();
                                while app.has_pending_op() {
                                    terminal.draw(|f| draw_ui(f, app))?;
                                    app.run_one_pending_op()?;
                                }
                            }
                            KeyCode::Char(c) => {
                                // Names become device file keys — keep them safe
                                if c.is_alphanumeric() || c == '_' || c == '-' || c == '.' {
                                    app.learn_name_input.push(c);
                                }
                            }
                            KeyCode::Backspace => {
                                app.learn_name_input.pop();
                            }
                            KeyCode::Esc => {
                                app.input_mode = InputMode::Normal;
                            }
                            _ => {}
                        },

                        InputMode::LearnSaveName => match key.code {
                            KeyCode::Enter => {
                                app.save_learned_name();
                            }
                            KeyCode::Char(c) => {
                                if c.is_alphanumeric() || c == '_' || c == '-' || c == '.' {
                                    app.learn_name_input.push(c);
                                }
                            }
                            KeyCode::Backspace => {
                                app.learn_name_input.pop();
                            }
                            KeyCode::Esc => {
                                app.cancel_learn();
                            }
                            _ => {}
                        },

                        InputMode::DelayEdit => match key.code {
                            KeyCode::Up | KeyCode::Char('k') => {
                                if let Some(form) = &mut app.delay_edit {
                                    form.field_index = form.field_index.saturating_sub(1);
                                }
                            }
                            KeyCode::Down | KeyCode::Char('j') => {
                                if let Some(form) = &mut app.delay_edit {
                                    if form.field_index + 1 < form.inputs.len() {
                                        form.field_index += 1;
                                    }
                                }
                            }
                            KeyCode::Char('x') => {
                                app.delete_focused_delay();
                            }
                            KeyCode::Enter => {
                                app.save_delay_edits();
                            }
                            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                                if let Some(form) = &mut app.delay_edit {
                                    form.inputs[form.field_index].push(c);
                                }
                            }
                            KeyCode::Backspace => {
                                if let Some(form) = &mut app.delay_edit {
                                    form.inputs[form.field_index].pop();
                                }
                            }
                            KeyCode::Esc => {
                                app.cancel_delay_edit();
                            }
                            _ => {}
                        },

                        InputMode::AliasEdit => match key.code {
                            KeyCode::Up | KeyCode::Char('k') => {
                                app.alias_move(false);
                            }
                            KeyCode::Down | KeyCode::Char('j') => {
                                app.alias_move(true);
                            }
                            KeyCode::Tab => {
                                app.alias_switch_column();
                            }
                            KeyCode::Left | KeyCode::Char('h') => {
                                app.alias_cycle(false);
                            }
                            KeyCode::Right | KeyCode::Char('l') => {
                                app.alias_cycle(true);
                            }
                            KeyCode::Char('n') => {
                                app.alias_add_row();
                            }
                            KeyCode::Char('d') => {
                                app.alias_remove_row();
                            }
                            KeyCode::Enter => {
                                app.submit_aliases();
                            }
                            KeyCode::Esc => {
                                app.cancel_alias_edit();
                            }
                            _ => {}
                        },

                        InputMode::Help => match key.code {
                            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                                app.input_mode = InputMode::Normal;
                            }
                            _ => {}
                        },
                    }
                }
            }
        }
    }
}
