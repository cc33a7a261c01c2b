//! Client-side snapshot of the device's command and alias state.
//!
//! The device is the sole owner of persisted state. The snapshot is a
//! read-through cache: it is rebuilt wholesale from a fresh listing after
//! every mutation (and never patched incrementally), so divergence can only
//! last until the next refresh.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::command::Command;

/// Everything the client knows about the device's store, as of `fetched_at`.
/// Treated as immutable between refreshes.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Commands in device-reported order. The client must not resort them.
    pub commands: Vec<Command>,
    /// Alias table: from → to, one target per source
    pub aliases: BTreeMap<String, String>,
    /// Raw signal file names (the option set for the alias editor)
    pub signal_files: Vec<String>,
    /// When this snapshot was fetched
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Empty snapshot for startup, before the first refresh succeeds.
    pub fn empty() -> Self {
        Self {
            commands: Vec::new(),
            aliases: BTreeMap::new(),
            signal_files: Vec::new(),
            fetched_at: Utc::now(),
        }
    }

    /// Build a snapshot from freshly listed device state.
    pub fn assemble(
        commands: Vec<Command>,
        aliases: BTreeMap<String, String>,
        signal_files: Vec<String>,
    ) -> Self {
        Self {
            commands,
            aliases,
            signal_files,
            fetched_at: Utc::now(),
        }
    }

    /// Look up a command by name.
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Resolve the playback target for `name`: if it is an alias source, the
    /// target is substituted — one level only, never transitively. A chain
    /// `a→b→c` stops at `b`; a 2-cycle resolves each way without looping.
    /// A dangling target (command deleted) is returned as-is and surfaces as
    /// the device's NotFound at send time.
    pub fn resolve_target<'a>(&'a self, name: &'a str) -> &'a str {
        match self.aliases.get(name) {
            Some(target) => target.as_str(),
            None => name,
        }
    }

    /// Alias sources whose target no longer exists as a command.
    pub fn dangling_aliases(&self) -> Vec<(&str, &str)> {
        self.aliases
            .iter()
            .filter(|(_, to)| !self.contains(to))
            .map(|(from, to)| (from.as_str(), to.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        let mut aliases = BTreeMap::new();
        aliases.insert("a".to_string(), "b".to_string());
        aliases.insert("b".to_string(), "c".to_string());
        aliases.insert("ghost".to_string(), "gone".to_string());
        Snapshot::assemble(
            vec![
                Command::new("c", vec![5]),
                Command::new("a", vec![]),
                Command::new("b", vec![100, 200]),
            ],
            aliases,
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
        )
    }

    #[test]
    fn test_device_order_preserved() {
        let snap = sample();
        let names: Vec<&str> = snap.commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_get() {
        let snap = sample();
        assert_eq!(snap.get("b").unwrap().delays, vec![100, 200]);
        assert!(snap.get("missing").is_none());
    }

    #[test]
    fn test_resolution_is_one_hop() {
        let snap = sample();
        // a→b→c exists in the table, but resolution stops after one hop
        assert_eq!(snap.resolve_target("a"), "b");
        assert_eq!(snap.resolve_target("b"), "c");
        // Non-alias names pass through
        assert_eq!(snap.resolve_target("c"), "c");
    }

    #[test]
    fn test_two_cycle_never_loops() {
        let mut aliases = BTreeMap::new();
        aliases.insert("a".to_string(), "b".to_string());
        aliases.insert("b".to_string(), "a".to_string());
        let snap = Snapshot::assemble(
            vec![Command::new("a", vec![]), Command::new("b", vec![])],
            aliases,
            vec![],
        );
        assert_eq!(snap.resolve_target("a"), "b");
        assert_eq!(snap.resolve_target("b"), "a");
    }

    #[test]
    fn test_dangling_alias_detected_not_removed() {
        let snap = sample();
        assert_eq!(snap.dangling_aliases(), vec![("ghost", "gone")]);
        // Still resolves: the NotFound comes from the device at send time
        assert_eq!(snap.resolve_target("ghost"), "gone");
    }

    #[test]
    fn test_dangling_delta_across_delete() {
        // "ghost" already dangles before the delete; removing "c" orphans
        // "b" as well. Only the difference is attributable to the delete.
        let before = sample();
        let mut remaining = before.commands.clone();
        remaining.retain(|c| c.name != "c");
        let after = Snapshot::assemble(remaining, before.aliases.clone(), vec![]);

        assert_eq!(before.dangling_aliases().len(), 1);
        assert_eq!(after.dangling_aliases().len(), 2);
        assert_eq!(
            after.dangling_aliases().len() - before.dangling_aliases().len(),
            1
        );
    }

    #[test]
    fn test_step_invariant_holds_across_snapshot() {
        let snap = sample();
        for cmd in &snap.commands {
            assert_eq!(cmd.step_count(), cmd.delay_count() + 1);
        }
    }
}
