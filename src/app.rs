//! Application state management.
//!
//! All user intents flow through `App` methods: they issue one blocking
//! device request, record the outcome in `status_message`/`last_error`, and
//! — for every mutation — force a snapshot refresh regardless of the
//! declared result, so transient ambiguity self-heals on the next read.

use anyhow::Result;
use std::time::Duration;

use crate::alias::AliasPair;
use crate::device::{DeviceClient, DeviceError, LearnAck};
use crate::editor;
use crate::learn::{LearnMode, LearnSession};
use crate::repository::Snapshot;
use crate::storage::Storage;

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Command input mode (after pressing :)
    Command,
    /// Renaming the selected command
    Rename,
    /// Confirming a delete (y/n)
    ConfirmDelete,
    /// Learn: selecting the capture mode
    LearnMenu,
    /// Learn: entering the (optional) name before capture
    LearnName,
    /// Learn: entering the name after a successful anonymous capture
    LearnSaveName,
    /// Editing the selected command's delay slots
    DelayEdit,
    /// Editing the alias table
    AliasEdit,
    /// Help overlay
    Help,
}

/// Delay edit form state. The fixed length of `inputs` pins the arity the
/// client saw when the form was opened; the save is refused with Conflict
/// if the device's delay count has changed since.
#[derive(Debug, Clone)]
pub struct DelayEditForm {
    /// Command being edited
    pub command: String,
    /// One raw input string per delay slot
    pub inputs: Vec<String>,
    /// Currently focused slot
    pub field_index: usize,
}

/// Alias editor state: editable from→to rows plus the option set to cycle
/// through (the device's raw signal file list).
#[derive(Debug, Clone)]
pub struct AliasEditForm {
    pub rows: Vec<AliasPair>,
    pub options: Vec<String>,
    pub selected_row: usize,
    /// false = editing the source column, true = the target column
    pub on_target: bool,
}

impl AliasEditForm {
    fn cycle_cell(&mut self, forward: bool) {
        if self.options.is_empty() || self.rows.is_empty() {
            return;
        }
        let row = &mut self.rows[self.selected_row];
        let cell = if self.on_target { &mut row.to } else { &mut row.from };
        let current = self.options.iter().position(|o| o == cell).unwrap_or(0);
        let next = if forward {
            (current + 1) % self.options.len()
        } else {
            (current + self.options.len() - 1) % self.options.len()
        };
        *cell = self.options[next].clone();
    }
}

/// Operations that must render a frame before they run, because they block
/// the loop for a while (a learn waits for a button press on the remote).
#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingOp {
    Learn,
}

/// Main application state
pub struct App {
    /// Current input mode
    pub input_mode: InputMode,
    /// Command input buffer
    pub command_input: String,
    /// Mirror of the device's command/alias state
    pub snapshot: Snapshot,
    /// Currently selected command index
    pub selected: Option<usize>,
    /// Scroll offset for the command list
    pub scroll_offset: usize,
    /// Last error message
    pub last_error: Option<String>,
    /// Last status message
    pub status_message: Option<String>,
    /// Whether the last refresh reached the device
    pub device_online: bool,
    /// Set by :q
    pub quit_requested: bool,

    // -- Rename state --
    pub rename_old: Option<String>,
    pub rename_input: String,

    // -- Delete confirmation --
    pub delete_target: Option<String>,

    // -- Learn state --
    pub learn_session: LearnSession,
    pub learn_menu_index: usize,
    pub learn_name_input: String,

    // -- Edit forms --
    pub delay_edit: Option<DelayEditForm>,
    pub alias_edit: Option<AliasEditForm>,

    /// Storage manager
    pub storage: Storage,
    /// Device HTTP client
    client: DeviceClient,
    /// Queued long-running operation (drained by the main loop after a draw)
    pending: Option<PendingOp>,
}

impl App {
    /// Create a new application instance and attempt an initial refresh.
    pub fn new() -> Result<Self> {
        let storage = Storage::new()?;
        let client = DeviceClient::new(
            &storage.config.device_url,
            Duration::from_secs(storage.config.request_timeout_secs),
            Duration::from_secs(storage.config.learn_timeout_secs),
        );

        let mut app = Self {
            input_mode: InputMode::Normal,
            command_input: String::new(),
            snapshot: Snapshot::empty(),
            selected: None,
            scroll_offset: 0,
            last_error: None,
            status_message: None,
            device_online: false,
            quit_requested: false,
            rename_old: None,
            rename_input: String::new(),
            delete_target: None,
            learn_session: LearnSession::new(),
            learn_menu_index: 0,
            learn_name_input: String::new(),
            delay_edit: None,
            alias_edit: None,
            storage,
            client,
            pending: None,
        };

        match app.refresh() {
            Ok(()) => {
                app.status_message =
                    Some(format!("Connected — {} command(s)", app.snapshot.len()));
            }
            Err(e) => {
                tracing::warn!("Initial refresh failed: {}", e);
                app.last_error = Some(format!("Device unreachable: {}", e));
            }
        }

        Ok(app)
    }

    // ─── Snapshot / refresh ──────────────────────────────────────────────

    /// Rebuild the snapshot wholesale from a fresh device listing.
    pub fn refresh(&mut self) -> Result<(), DeviceError> {
        let commands = self.client.list_commands()?;
        let aliases = self.client.list_aliases()?;
        let signal_files = self.client.simple_list().unwrap_or_default();

        self.snapshot = Snapshot::assemble(commands, aliases, signal_files);
        self.device_online = true;
        self.clamp_selection();
        tracing::debug!(
            "Snapshot refreshed: {} command(s), {} alias(es)",
            self.snapshot.len(),
            self.snapshot.aliases.len()
        );
        Ok(())
    }

    /// Mandatory refresh after a mutation, regardless of its declared
    /// outcome. A refresh failure is recorded but never masks the
    /// mutation's own message.
    fn refresh_after_mutation(&mut self) {
        if let Err(e) = self.refresh() {
            self.device_online = false;
            tracing::warn!("Post-mutation refresh failed: {}", e);
            if self.last_error.is_none() {
                self.last_error = Some(format!("Refresh failed: {}", e));
            }
        }
    }

    /// Record a mutation outcome and force the follow-up refresh.
    fn finish_mutation(&mut self, result: Result<(), DeviceError>, success: String) {
        match result {
            Ok(()) => self.status_message = Some(success),
            Err(e) => self.last_error = Some(e.to_string()),
        }
        self.refresh_after_mutation();
    }

    fn clamp_selection(&mut self) {
        if self.snapshot.is_empty() {
            self.selected = None;
            self.scroll_offset = 0;
        } else if let Some(sel) = self.selected {
            if sel >= self.snapshot.len() {
                self.selected = Some(self.snapshot.len() - 1);
            }
        } else {
            self.selected = Some(0);
        }
    }

    /// Name of the currently selected command
    pub fn selected_name(&self) -> Option<String> {
        self.selected
            .and_then(|i| self.snapshot.commands.get(i))
            .map(|c| c.name.clone())
    }

    /// Select the next command in the list
    pub fn next_command(&mut self) {
        if self.snapshot.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1).min(self.snapshot.len() - 1),
            None => 0,
        });
        self.ensure_selection_visible();
    }

    /// Select the previous command in the list
    pub fn previous_command(&mut self) {
        if self.snapshot.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => i.saturating_sub(1),
            None => 0,
        });
        self.ensure_selection_visible();
    }

    fn ensure_selection_visible(&mut self) {
        if let Some(selected) = self.selected {
            let visible_rows = 15;
            if selected < self.scroll_offset {
                self.scroll_offset = selected;
            } else if selected >= self.scroll_offset + visible_rows {
                self.scroll_offset = selected.saturating_sub(visible_rows - 1);
            }
        }
    }

    // ─── Send ────────────────────────────────────────────────────────────

    /// Transmit the selected command.
    pub fn send_selected(&mut self) {
        if let Some(name) = self.selected_name() {
            self.send_named(&name);
        }
    }

    /// Transmit a command by name. Alias sources are substituted one level
    /// only; a dangling target surfaces as the device's NotFound.
    pub fn send_named(&mut self, name: &str) {
        self.last_error = None;
        let target = self.snapshot.resolve_target(name).to_string();
        let label = if target != name {
            format!("{} -> {}", name, target)
        } else {
            name.to_string()
        };
        match self.client.send(&target) {
            Ok(()) => self.status_message = Some(format!("Sent {}", label)),
            Err(e) => self.last_error = Some(format!("Send {}: {}", label, e)),
        }
    }

    // ─── Rename ──────────────────────────────────────────────────────────

    /// Enter rename mode for the selected command.
    pub fn start_rename(&mut self) {
        if let Some(name) = self.selected_name() {
            self.rename_input = name.clone();
            self.rename_old = Some(name);
            self.input_mode = InputMode::Rename;
        }
    }

    /// Apply the rename entered in the form.
    pub fn commit_rename(&mut self) {
        let old = match self.rename_old.take() {
            Some(o) => o,
            None => return,
        };
        let new = self.rename_input.trim().to_string();
        self.input_mode = InputMode::Normal;

        if new.is_empty() || new == old {
            self.status_message = Some("Rename cancelled".to_string());
            return;
        }
        // Early collision check against the client view; the device
        // re-checks authoritatively and may still answer 409.
        if let Err(e) = editor::plan_rename(&self.snapshot, &old, &new) {
            self.last_error = Some(e.to_string());
            return;
        }

        let result = self.client.rename(&old, &new);
        self.finish_mutation(result, format!("Renamed '{}' to '{}'", old, new));
    }

    // ─── Delete ──────────────────────────────────────────────────────────

    /// Request deletion of the selected command (confirmation per config).
    pub fn request_delete_selected(&mut self) {
        let name = match self.selected_name() {
            Some(n) => n,
            None => return,
        };
        if self.storage.config.confirm_delete {
            self.delete_target = Some(name);
            self.input_mode = InputMode::ConfirmDelete;
        } else {
            self.delete_named(&name);
        }
    }

    /// Confirm (or abandon) a pending delete.
    pub fn confirm_delete(&mut self, yes: bool) {
        let target = self.delete_target.take();
        self.input_mode = InputMode::Normal;
        if let (true, Some(name)) = (yes, target) {
            self.delete_named(&name);
        } else {
            self.status_message = Some("Delete cancelled".to_string());
        }
    }

    /// Delete a command. Aliases pointing at it are left dangling; only the
    /// aliases this delete orphaned are reported, not pre-existing danglers.
    pub fn delete_named(&mut self, name: &str) {
        self.last_error = None;
        let dangling_before = self.snapshot.dangling_aliases().len();
        let result = self.client.delete(name);
        let deleted = result.is_ok();
        self.finish_mutation(result, format!("Deleted '{}'", name));
        if deleted {
            let newly_dangling = self
                .snapshot
                .dangling_aliases()
                .len()
                .saturating_sub(dangling_before);
            if newly_dangling > 0 {
                self.status_message = Some(format!(
                    "Deleted '{}' ({} alias(es) now dangling)",
                    name, newly_dangling
                ));
            }
        }
    }

    // ─── Learn ───────────────────────────────────────────────────────────

    /// Open the learn mode menu. Fails fast with Busy if a session is
    /// already active.
    pub fn open_learn_menu(&mut self) {
        if self.learn_session.is_active() {
            self.last_error = Some(DeviceError::Busy.to_string());
            return;
        }
        self.learn_menu_index = 0;
        self.learn_name_input.clear();
        self.input_mode = InputMode::LearnMenu;
    }

    /// Mode chosen from the menu; move on to name entry.
    pub fn choose_learn_mode(&mut self) {
        self.input_mode = InputMode::LearnName;
    }

    /// Start the learn session with the entered name (empty name selects the
    /// name-after protocol). The capture itself runs as a pending operation
    /// so the overlay is drawn before the loop blocks.
    pub fn begin_learn(&mut self) {
        let mode = LearnMode::ALL[self.learn_menu_index];
        let name = self.learn_name_input.trim().to_string();
        let proposed = if name.is_empty() { None } else { Some(name) };

        match self.learn_session.begin(mode, proposed) {
            Ok(()) => {
                self.input_mode = InputMode::Normal;
                self.status_message =
                    Some("Learning — press a button on the remote".to_string());
                self.pending = Some(PendingOp::Learn);
            }
            Err(e) => {
                self.input_mode = InputMode::Normal;
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Abort the learn flow from any of its input modes.
    pub fn cancel_learn(&mut self) {
        self.learn_session.cancel();
        self.learn_session.finish();
        self.pending = None;
        self.input_mode = InputMode::Normal;
        self.status_message = Some("Learn cancelled".to_string());
    }

    /// Whether a queued operation is waiting to run.
    pub fn has_pending_op(&self) -> bool {
        self.pending.is_some()
    }

    /// Run one queued operation. The caller draws a frame first so the
    /// learn overlay is visible while the request blocks.
    pub fn run_one_pending_op(&mut self) -> Result<()> {
        match self.pending.take() {
            Some(PendingOp::Learn) => self.run_learn_capture(),
            None => {}
        }
        Ok(())
    }

    fn run_learn_capture(&mut self) {
        self.learn_session.mark_capturing();
        let mode = self.learn_session.mode();
        let proposed = self.learn_session.proposed_name().map(str::to_string);

        match self.client.learn(mode, proposed.as_deref()) {
            Ok(LearnAck::Stored) => {
                self.learn_session.complete_stored();
                if self.learn_session.needs_name() {
                    // Name-after: capture is staged on the device, ask now.
                    self.learn_name_input.clear();
                    self.input_mode = InputMode::LearnSaveName;
                    self.status_message =
                        Some("Captured — enter a name to save".to_string());
                } else {
                    self.refresh_after_mutation();
                    self.learn_session.finish();
                    self.status_message = Some(format!(
                        "Learned '{}'",
                        proposed.unwrap_or_default()
                    ));
                }
            }
            Ok(LearnAck::Failed) => {
                self.learn_session.complete_failed("capture failed");
                self.refresh_after_mutation();
                self.learn_session.finish();
                self.last_error = Some("Learn failed — no signal captured".to_string());
            }
            Err(e) => {
                // Timeout or transport failure: outcome indeterminate, so
                // refresh instead of assuming either way.
                self.learn_session.complete_failed(e.to_string());
                self.refresh_after_mutation();
                self.learn_session.finish();
                self.last_error = Some(format!("Learn: {}", e));
            }
        }
    }

    /// Name-after protocol: persist the staged capture under the entered
    /// name, then refresh to pick the new command up.
    pub fn save_learned_name(&mut self) {
        let name = self.learn_name_input.trim().to_string();
        if name.is_empty() {
            self.last_error = Some("Name cannot be empty".to_string());
            return;
        }
        self.input_mode = InputMode::Normal;
        let result = self.client.save_learned(&name);
        if result.is_ok() {
            self.learn_session.name_saved();
        }
        self.learn_session.finish();
        self.finish_mutation(result, format!("Learned '{}'", name));
    }

    // ─── Delay editing ───────────────────────────────────────────────────

    /// Open the delay edit form for the selected command.
    pub fn open_delay_editor(&mut self) {
        let name = match self.selected_name() {
            Some(n) => n,
            None => return,
        };
        let command = match self.snapshot.get(&name) {
            Some(c) => c.clone(),
            None => return,
        };
        if command.delays.is_empty() {
            self.status_message = Some(format!("'{}' has no delay slots", name));
            return;
        }
        self.delay_edit = Some(DelayEditForm {
            command: name,
            inputs: command.delays.iter().map(|d| d.to_string()).collect(),
            field_index: 0,
        });
        self.input_mode = InputMode::DelayEdit;
    }

    /// Save the whole delay form. Arity is checked against the snapshot
    /// (Conflict if the device moved underneath us); values are normalized
    /// leniently, never rejected.
    pub fn save_delay_edits(&mut self) {
        let form = match self.delay_edit.take() {
            Some(f) => f,
            None => return,
        };
        self.input_mode = InputMode::Normal;
        self.last_error = None;

        let planned = match editor::plan_set_delays(&self.snapshot, &form.command, &form.inputs) {
            Ok(values) => values,
            Err(e) => {
                self.last_error = Some(e.to_string());
                self.refresh_after_mutation();
                return;
            }
        };

        let result = self.client.update_delays(&form.command, &planned);
        self.finish_mutation(result, format!("Updated delays for '{}'", form.command));
    }

    /// Delete the focused delay slot — a structural edit: later slots shift
    /// down and the step count changes. The form is rebuilt from the fresh
    /// snapshot afterwards.
    pub fn delete_focused_delay(&mut self) {
        let (name, index) = match &self.delay_edit {
            Some(f) => (f.command.clone(), f.field_index),
            None => return,
        };
        self.last_error = None;

        if let Err(e) = editor::plan_delete_delay(&self.snapshot, &name, index) {
            self.last_error = Some(e.to_string());
            return;
        }
        let expected = self
            .snapshot
            .get(&name)
            .map(|c| editor::delays_after_delete(&c.delays, index));

        let result = self.client.delete_delay(&name, index);
        self.finish_mutation(result, format!("Deleted delay {} of '{}'", index + 1, name));

        if let (Some(expected), Some(cmd)) = (expected, self.snapshot.get(&name)) {
            if cmd.delays != expected {
                tracing::debug!("delay list diverged after delete; device view wins");
            }
        }

        // Re-open the form against the refreshed snapshot
        match self.snapshot.get(&name) {
            Some(cmd) if !cmd.delays.is_empty() => {
                let field = index.min(cmd.delay_count() - 1);
                self.delay_edit = Some(DelayEditForm {
                    command: name,
                    inputs: cmd.delays.iter().map(|d| d.to_string()).collect(),
                    field_index: field,
                });
            }
            _ => {
                self.delay_edit = None;
                self.input_mode = InputMode::Normal;
            }
        }
    }

    /// Abandon the delay form without writing.
    pub fn cancel_delay_edit(&mut self) {
        self.delay_edit = None;
        self.input_mode = InputMode::Normal;
    }

    // ─── Alias editing ───────────────────────────────────────────────────

    /// Open the alias editor seeded from the snapshot's table. The option
    /// set is the device's raw signal file list, falling back to command
    /// names when the device predates /ir/simple_list.
    pub fn open_alias_editor(&mut self) {
        let mut options = self.snapshot.signal_files.clone();
        if options.is_empty() {
            options = self
                .snapshot
                .commands
                .iter()
                .map(|c| c.name.clone())
                .collect();
        }
        if options.is_empty() {
            self.status_message = Some("No commands to alias".to_string());
            return;
        }
        let rows = crate::alias::pairs_from_map(&self.snapshot.aliases);
        self.alias_edit = Some(AliasEditForm {
            rows,
            options,
            selected_row: 0,
            on_target: false,
        });
        self.input_mode = InputMode::AliasEdit;
    }

    /// Add a fresh row to the alias editor.
    pub fn alias_add_row(&mut self) {
        if let Some(form) = &mut self.alias_edit {
            let first = form.options[0].clone();
            let second = form.options.get(1).cloned().unwrap_or_else(|| first.clone());
            form.rows.push(AliasPair::new(first, second));
            form.selected_row = form.rows.len() - 1;
            form.on_target = false;
        }
    }

    /// Remove the selected row from the alias editor.
    pub fn alias_remove_row(&mut self) {
        if let Some(form) = &mut self.alias_edit {
            if form.selected_row < form.rows.len() {
                form.rows.remove(form.selected_row);
                if form.selected_row > 0 && form.selected_row >= form.rows.len() {
                    form.selected_row -= 1;
                }
            }
        }
    }

    pub fn alias_move(&mut self, down: bool) {
        if let Some(form) = &mut self.alias_edit {
            if form.rows.is_empty() {
                return;
            }
            form.selected_row = if down {
                (form.selected_row + 1).min(form.rows.len() - 1)
            } else {
                form.selected_row.saturating_sub(1)
            };
        }
    }

    pub fn alias_switch_column(&mut self) {
        if let Some(form) = &mut self.alias_edit {
            form.on_target = !form.on_target;
        }
    }

    pub fn alias_cycle(&mut self, forward: bool) {
        if let Some(form) = &mut self.alias_edit {
            form.cycle_cell(forward);
        }
    }

    /// Post the whole alias table. Best-effort bulk replace: invalid pairs
    /// are reported and dropped, valid ones still applied.
    pub fn submit_aliases(&mut self) {
        let form = match self.alias_edit.take() {
            Some(f) => f,
            None => return,
        };
        self.input_mode = InputMode::Normal;
        self.last_error = None;

        match self.client.replace_aliases(&form.rows) {
            Ok(report) => {
                if report.rejected.is_empty() {
                    let device_note = report.device_message.trim();
                    self.status_message = Some(if device_note.is_empty() {
                        format!("Aliases updated ({} pair(s))", report.applied)
                    } else {
                        format!("Aliases updated: {}", device_note)
                    });
                } else {
                    let detail = report
                        .rejected
                        .iter()
                        .map(|r| r.to_string())
                        .collect::<Vec<_>>()
                        .join("; ");
                    self.last_error = Some(format!(
                        "{} ({} applied): {}",
                        DeviceError::PartialFailure(report.rejected.len()),
                        report.applied,
                        detail
                    ));
                }
            }
            Err(e) => self.last_error = Some(format!("Alias update: {}", e)),
        }
        self.refresh_after_mutation();
    }

    pub fn cancel_alias_edit(&mut self) {
        self.alias_edit = None;
        self.input_mode = InputMode::Normal;
    }

    // ─── Firmware ────────────────────────────────────────────────────────

    /// Ask the device whether a firmware update is available.
    pub fn firmware_check(&mut self) {
        self.last_error = None;
        match self.client.check_firmware() {
            Ok(true) => {
                self.status_message =
                    Some("Firmware update available — run :fw update".to_string())
            }
            Ok(false) => self.status_message = Some("Firmware is up to date".to_string()),
            Err(e) => self.last_error = Some(format!("Firmware check: {}", e)),
        }
    }

    /// Kick off a firmware update.
    pub fn firmware_update(&mut self) {
        self.last_error = None;
        match self.client.start_firmware_update() {
            Ok(()) => self.status_message = Some("Firmware update started".to_string()),
            Err(e) => self.last_error = Some(format!("Firmware update: {}", e)),
        }
    }

    // ─── Command prompt ──────────────────────────────────────────────────

    /// Execute a `:` command
    pub fn execute_command(&mut self, command: &str) -> Result<()> {
        let parts: Vec<&str> = command.trim().split_whitespace().collect();
        if parts.is_empty() {
            return Ok(());
        }

        self.last_error = None;
        self.status_message = None;

        match parts[0] {
            "q" | "quit" => {
                self.quit_requested = true;
            }
            "refresh" | "r" => match self.refresh() {
                Ok(()) => {
                    self.status_message =
                        Some(format!("Refreshed — {} command(s)", self.snapshot.len()))
                }
                Err(e) => {
                    self.device_online = false;
                    self.last_error = Some(format!("Refresh: {}", e));
                }
            },
            "send" => {
                if parts.len() < 2 {
                    self.last_error = Some("Usage: :send <name>".to_string());
                    return Ok(());
                }
                let name = parts[1].to_string();
                self.send_named(&name);
            }
            "rename" => {
                if parts.len() < 3 {
                    self.last_error = Some("Usage: :rename <old> <new>".to_string());
                    return Ok(());
                }
                let (old, new) = (parts[1].to_string(), parts[2].to_string());
                if let Err(e) = editor::plan_rename(&self.snapshot, &old, &new) {
                    self.last_error = Some(e.to_string());
                    return Ok(());
                }
                let result = self.client.rename(&old, &new);
                self.finish_mutation(result, format!("Renamed '{}' to '{}'", old, new));
            }
            "delete" => {
                if parts.len() < 2 {
                    self.last_error = Some("Usage: :delete <name>".to_string());
                    return Ok(());
                }
                let name = parts[1].to_string();
                self.delete_named(&name);
            }
            "learn" => {
                // :learn <single|normal|step> [name]
                if parts.len() < 2 {
                    self.last_error = Some("Usage: :learn <single|normal|step> [name]".to_string());
                    return Ok(());
                }
                let mode = match parts[1] {
                    "single" => LearnMode::Single,
                    "normal" => LearnMode::Normal,
                    "step" => LearnMode::Step,
                    other => {
                        self.last_error = Some(format!("Unknown learn mode: {}", other));
                        return Ok(());
                    }
                };
                let name = parts.get(2).map(|s| s.to_string());
                match self.learn_session.begin(mode, name) {
                    Ok(()) => {
                        self.status_message =
                            Some("Learning — press a button on the remote".to_string());
                        self.pending = Some(PendingOp::Learn);
                    }
                    Err(e) => self.last_error = Some(e.to_string()),
                }
            }
            "aliases" | "alias" => {
                self.open_alias_editor();
            }
            "fw" => match parts.get(1) {
                Some(&"update") => self.firmware_update(),
                _ => self.firmware_check(),
            },
            "help" => {
                self.input_mode = InputMode::Help;
            }
            _ => {
                self.last_error = Some(format!("Unknown command: {}", parts[0]));
            }
        }

        Ok(())
    }
}
