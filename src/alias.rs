//! Alias pairs: one-hop playback redirections between command names.
//!
//! Aliases are replaced in bulk: the whole table is posted to the device at
//! once. Validation is per-pair and best-effort — a bad pair is dropped with
//! a reason while the remaining pairs are still applied.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One from→to redirection, as sent to `/ir/assign/bulk`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasPair {
    pub from: String,
    pub to: String,
}

impl AliasPair {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Why a pair was rejected during bulk validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// from == to (self-alias)
    SelfAlias,
    /// from or to is empty
    EmptyName,
    /// a later pair already claimed this source name
    DuplicateSource,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::SelfAlias => write!(f, "source and target are the same"),
            RejectReason::EmptyName => write!(f, "empty name"),
            RejectReason::DuplicateSource => write!(f, "source already mapped"),
        }
    }
}

/// A pair that failed validation, with the reason it was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub pair: AliasPair,
    pub reason: RejectReason,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {}: {}",
            self.pair.from, self.pair.to, self.reason
        )
    }
}

/// Split candidate pairs into the set to apply and the set to reject.
///
/// Rules: `from != to`, both names non-empty, first mapping for a source
/// wins (a `from` key is unique). Cycles across pairs are legal — resolution
/// is one hop only, so a 2-cycle like `a->b, b->a` cannot loop.
pub fn partition_pairs(candidates: &[AliasPair]) -> (Vec<AliasPair>, Vec<Rejection>) {
    let mut valid: Vec<AliasPair> = Vec::new();
    let mut rejected: Vec<Rejection> = Vec::new();

    for pair in candidates {
        let reason = if pair.from.is_empty() || pair.to.is_empty() {
            Some(RejectReason::EmptyName)
        } else if pair.from == pair.to {
            Some(RejectReason::SelfAlias)
        } else if valid.iter().any(|p| p.from == pair.from) {
            Some(RejectReason::DuplicateSource)
        } else {
            None
        };

        match reason {
            Some(reason) => rejected.push(Rejection {
                pair: pair.clone(),
                reason,
            }),
            None => valid.push(pair.clone()),
        }
    }

    (valid, rejected)
}

/// Turn the device's from→to map into editable pairs, in stable name order.
pub fn pairs_from_map(map: &BTreeMap<String, String>) -> Vec<AliasPair> {
    map.iter()
        .map(|(from, to)| AliasPair::new(from.clone(), to.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_alias_rejected() {
        let (valid, rejected) = partition_pairs(&[
            AliasPair::new("white", "reset"),
            AliasPair::new("reset", "reset"),
        ]);
        assert_eq!(valid, vec![AliasPair::new("white", "reset")]);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].reason, RejectReason::SelfAlias);
    }

    #[test]
    fn test_two_cycle_is_legal() {
        // a->b plus b->a is fine at the table level; resolution never
        // chases more than one hop so no loop can occur.
        let (valid, rejected) = partition_pairs(&[
            AliasPair::new("a", "b"),
            AliasPair::new("b", "a"),
        ]);
        assert_eq!(valid.len(), 2);
        assert!(rejected.is_empty());
    }

    #[test]
    fn test_empty_names_rejected() {
        let (valid, rejected) = partition_pairs(&[
            AliasPair::new("", "b"),
            AliasPair::new("a", ""),
            AliasPair::new("a", "b"),
        ]);
        assert_eq!(valid.len(), 1);
        assert_eq!(rejected.len(), 2);
        assert!(rejected.iter().all(|r| r.reason == RejectReason::EmptyName));
    }

    #[test]
    fn test_duplicate_source_first_wins() {
        let (valid, rejected) = partition_pairs(&[
            AliasPair::new("a", "b"),
            AliasPair::new("a", "c"),
        ]);
        assert_eq!(valid, vec![AliasPair::new("a", "b")]);
        assert_eq!(rejected[0].reason, RejectReason::DuplicateSource);
    }

    #[test]
    fn test_pairs_from_map_ordering() {
        let mut map = BTreeMap::new();
        map.insert("white".to_string(), "reset".to_string());
        map.insert("fan".to_string(), "fan_low".to_string());
        let pairs = pairs_from_map(&map);
        // BTreeMap iteration gives stable name order
        assert_eq!(pairs[0].from, "fan");
        assert_eq!(pairs[1].from, "white");
    }
}
