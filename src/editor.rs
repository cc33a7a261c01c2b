//! Sequence editor: plans delay edits against the current snapshot before
//! they are sent to the device.
//!
//! Input handling is deliberately lenient: anything that does not parse as a
//! non-negative number becomes 0, never a validation error. This mirrors the
//! device's own web UI and is relied on by users who blank a field to zero
//! it out. Do not tighten this without changing the product behavior.
//!
//! Arity is the one thing checked strictly: a set-delays write must match
//! the delay count the client saw when the edit form was opened. If the
//! device's step count changed underneath us the write is refused with
//! `Conflict` and the caller must refresh before retrying — optimistic
//! concurrency, not locking.

use crate::device::DeviceError;
use crate::repository::Snapshot;

/// Normalize one raw delay input. Non-numeric or negative input becomes 0.
pub fn normalize_delay(raw: &str) -> u32 {
    crate::command::clamp_delay(raw.trim().parse::<f64>().unwrap_or(0.0))
}

/// Normalize a whole edit form.
pub fn normalize_delays(raw: &[String]) -> Vec<u32> {
    raw.iter().map(|s| normalize_delay(s)).collect()
}

/// Validate a set-delays edit and produce the values to write.
///
/// `raw` holds the form inputs in slot order. Fails with `NotFound` if the
/// command is gone from the snapshot, `Conflict` if the input count no
/// longer matches the command's delay count.
pub fn plan_set_delays(
    snapshot: &Snapshot,
    name: &str,
    raw: &[String],
) -> Result<Vec<u32>, DeviceError> {
    let command = snapshot
        .get(name)
        .ok_or_else(|| DeviceError::NotFound(name.to_string()))?;

    if raw.len() != command.delay_count() {
        return Err(DeviceError::Conflict(format!(
            "'{}' has {} delay slot(s), got {} value(s) - refresh and retry",
            name,
            command.delay_count(),
            raw.len()
        )));
    }

    Ok(normalize_delays(raw))
}

/// Client-side precheck for a rename. Only a target collision is refused
/// early. A source missing from the snapshot is deliberately let through:
/// the snapshot may be stale, and the device answers a truly absent source
/// with its own authoritative `NotFound` rather than this client turning
/// the rename into a silent no-op.
pub fn plan_rename(snapshot: &Snapshot, old: &str, new: &str) -> Result<(), DeviceError> {
    if snapshot.contains(new) {
        return Err(DeviceError::Conflict(format!(
            "cannot rename '{}': '{}' already exists",
            old, new
        )));
    }
    Ok(())
}

/// Validate a single-slot delete. Fails with `NotFound` if the command is
/// absent, `OutOfRange` if `index` is past the current delay count.
pub fn plan_delete_delay(snapshot: &Snapshot, name: &str, index: usize) -> Result<(), DeviceError> {
    let command = snapshot
        .get(name)
        .ok_or_else(|| DeviceError::NotFound(name.to_string()))?;

    if index >= command.delay_count() {
        return Err(DeviceError::OutOfRange {
            index,
            count: command.delay_count(),
        });
    }
    Ok(())
}

/// The delay list after deleting one slot: later slots shift down by one.
/// This is what the snapshot will show after the refresh; the device applies
/// the same structural edit.
pub fn delays_after_delete(delays: &[u32], index: usize) -> Vec<u32> {
    let mut out = delays.to_vec();
    if index < out.len() {
        out.remove(index);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::repository::Snapshot;

    fn snapshot_with(commands: Vec<Command>) -> Snapshot {
        Snapshot::assemble(commands, Default::default(), vec![])
    }

    #[test]
    fn test_normalize_lenient() {
        assert_eq!(normalize_delay(""), 0);
        assert_eq!(normalize_delay("abc"), 0);
        assert_eq!(normalize_delay("-5"), 0);
        assert_eq!(normalize_delay("50"), 50);
        assert_eq!(normalize_delay(" 120 "), 120);
        assert_eq!(normalize_delay("49.6"), 50);
    }

    #[test]
    fn test_set_delays_normalizes_blanks() {
        let snap = snapshot_with(vec![Command::new("tv_on", vec![10, 20])]);
        let planned =
            plan_set_delays(&snap, "tv_on", &["".to_string(), "50".to_string()]).unwrap();
        assert_eq!(planned, vec![0, 50]);
    }

    #[test]
    fn test_set_delays_arity_conflict() {
        let snap = snapshot_with(vec![Command::new("tv_on", vec![10, 20])]);
        let err = plan_set_delays(
            &snap,
            "tv_on",
            &["1".to_string(), "2".to_string(), "3".to_string()],
        )
        .unwrap_err();
        assert!(matches!(err, DeviceError::Conflict(_)));
    }

    #[test]
    fn test_set_delays_missing_command() {
        let snap = snapshot_with(vec![]);
        let err = plan_set_delays(&snap, "gone", &[]).unwrap_err();
        assert!(matches!(err, DeviceError::NotFound(_)));
    }

    #[test]
    fn test_rename_target_collision_is_conflict() {
        let snap = snapshot_with(vec![
            Command::new("a", vec![]),
            Command::new("b", vec![]),
        ]);
        let err = plan_rename(&snap, "a", "b").unwrap_err();
        assert!(matches!(err, DeviceError::Conflict(_)));
    }

    #[test]
    fn test_rename_missing_source_not_short_circuited() {
        let snap = snapshot_with(vec![Command::new("b", vec![])]);
        // "gone" is absent from the snapshot, but the plan still passes:
        // the request must reach the device so a second rename of the same
        // source surfaces its 404 as NotFound instead of silently no-oping.
        assert!(plan_rename(&snap, "gone", "c").is_ok());
    }

    #[test]
    fn test_delete_delay_bounds() {
        let snap = snapshot_with(vec![Command::new("tv_on", vec![100, 200, 300])]);
        assert!(plan_delete_delay(&snap, "tv_on", 2).is_ok());

        let err = plan_delete_delay(&snap, "tv_on", 3).unwrap_err();
        assert!(matches!(
            err,
            DeviceError::OutOfRange { index: 3, count: 3 }
        ));
    }

    #[test]
    fn test_delete_shifts_indices() {
        assert_eq!(delays_after_delete(&[100, 200, 300], 1), vec![100, 300]);
        assert_eq!(delays_after_delete(&[100], 0), Vec::<u32>::new());
    }
}
