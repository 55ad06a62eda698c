use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::pool::PoolStatus;

/// Copied snapshot of per-command invocation counts. Never aliases the
/// live map; counts are monotonic for the client's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandCounts(HashMap<String, u64>);

impl CommandCounts {
    /// Count for one command name, `None` when it was never dispatched.
    #[must_use]
    pub fn count(&self, command: &str) -> Option<u64> {
        self.0.get(command).copied()
    }

    /// Sum over all commands.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

/// Client statistics: the provider's pool snapshot plus the command
/// counters.
#[derive(Debug, Clone)]
pub struct Stats {
    pub pool: PoolStatus,
    pub commands: CommandCounts,
}

/// Live counter map. Increments take the exclusive path, snapshots the
/// shared path; the lock is held only for the in-memory update, never
/// across a store round-trip.
#[derive(Debug, Default)]
pub(crate) struct CommandCounters {
    counts: RwLock<HashMap<String, u64>>,
}

impl CommandCounters {
    pub(crate) fn record(&self, command: &str) {
        let mut counts = self.counts.write().unwrap_or_else(PoisonError::into_inner);
        *counts.entry(command.to_string()).or_insert(0) += 1;
    }

    pub(crate) fn snapshot(&self) -> CommandCounts {
        let counts = self.counts.read().unwrap_or_else(PoisonError::into_inner);
        CommandCounts(counts.clone())
    }
}
