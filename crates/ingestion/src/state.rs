//! The re-org state machine's named states, kept purely for logging —
//! nothing outside this crate inspects a `State` value.

use std::fmt;

/// Where the loop currently is in its progress toward the chain head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No checkpoint exists yet; the next block persisted is the chain head
    /// at the time of the first iteration.
    Bootstrapping,
    /// Caught up or ahead of the next unindexed block; sleeping until the
    /// chain head advances.
    AtHead,
    /// Lineage matched; extending the chain by one block.
    Syncing,
    /// Lineage mismatched; walking the checkpoint back one block to find
    /// the common ancestor.
    Reorganizing,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bootstrapping => "bootstrapping",
            Self::AtHead => "at_head",
            Self::Syncing => "syncing",
            Self::Reorganizing => "reorganizing",
        };
        f.write_str(name)
    }
}
