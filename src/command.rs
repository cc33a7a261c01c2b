//! Command data model: named IR commands and their inter-step delays.
//!
//! The device stores the captured signal data itself; what the client sees
//! is each command's name and its ordered list of inter-step delays in
//! milliseconds. A command with N delays has N+1 steps — the trailing delay
//! after the last step is not modeled.

use serde::{Deserialize, Serialize};

/// A named IR command as reported by the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Unique, non-empty command name
    pub name: String,
    /// Inter-step delays in milliseconds, in playback order
    pub delays: Vec<u32>,
}

impl Command {
    pub fn new(name: impl Into<String>, delays: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            delays,
        }
    }

    /// Number of signal steps implied by the delay list (delays + 1).
    pub fn step_count(&self) -> usize {
        self.delays.len() + 1
    }

    /// Number of editable delay slots.
    pub fn delay_count(&self) -> usize {
        self.delays.len()
    }

    /// Whether this is a multi-step sequence (has at least one delay)
    pub fn is_sequence(&self) -> bool {
        !self.delays.is_empty()
    }

    /// Compact delay summary for the list view, e.g. "120, 80, 450 ms"
    pub fn delay_summary(&self) -> String {
        if self.delays.is_empty() {
            "-".to_string()
        } else {
            let joined = self
                .delays
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} ms", joined)
        }
    }

    /// Total playback time spent in delays
    pub fn total_delay_ms(&self) -> u64 {
        self.delays.iter().map(|&d| d as u64).sum()
    }
}

/// Clamp a device-reported delay value into the non-negative integer range.
/// The firmware serializes delays as JSON numbers which may arrive as floats;
/// anything non-finite or negative becomes 0, matching the lenient input
/// policy used everywhere else.
pub fn clamp_delay(value: f64) -> u32 {
    if !value.is_finite() || value < 0.0 {
        0
    } else if value > u32::MAX as f64 {
        u32::MAX
    } else {
        value.round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_delay_invariant() {
        let cmd = Command::new("tv_on", vec![100, 200]);
        assert_eq!(cmd.step_count(), 3);
        assert_eq!(cmd.delay_count(), 2);

        let single = Command::new("mute", vec![]);
        assert_eq!(single.step_count(), 1);
        assert_eq!(single.delay_count(), 0);
        assert!(!single.is_sequence());
    }

    #[test]
    fn test_delay_summary() {
        let cmd = Command::new("tv_on", vec![120, 80, 450]);
        assert_eq!(cmd.delay_summary(), "120, 80, 450 ms");
        assert_eq!(Command::new("mute", vec![]).delay_summary(), "-");
    }

    #[test]
    fn test_clamp_delay() {
        assert_eq!(clamp_delay(100.0), 100);
        assert_eq!(clamp_delay(99.6), 100);
        assert_eq!(clamp_delay(-5.0), 0);
        assert_eq!(clamp_delay(f64::NAN), 0);
        assert_eq!(clamp_delay(f64::INFINITY), 0);
    }

    #[test]
    fn test_total_delay() {
        let cmd = Command::new("macro", vec![100, 200, 300]);
        assert_eq!(cmd.total_delay_ms(), 600);
    }
}
