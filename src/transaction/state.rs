// ============================================================================
// Transaction Identity
// ============================================================================
//
// A transaction is nothing more than a unique, strictly increasing id plus
// the instant it was opened. Ids are issued by a TransactionManager instance;
// there is no process-wide counter, so independent stores never share ids.
//
// Id 0 is reserved for the global transaction: the committed baseline that
// is always implicitly active and can never be committed or rolled back.
//
// ============================================================================

use std::time::{Duration, Instant};

/// Unique identifier for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId(pub u64);

impl TransactionId {
    /// Id of the global (baseline) transaction
    pub const GLOBAL: TransactionId = TransactionId(0);

    /// Get the raw ID value
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn is_global(&self) -> bool {
        *self == Self::GLOBAL
    }

    /// The id that follows this one
    pub(crate) fn next(&self) -> Self {
        TransactionId(self.0 + 1)
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle returned by `begin`
///
/// Cheap to copy. Holding a handle does not keep the transaction open; the
/// manager's stack is the only source of truth for what is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transaction {
    id: TransactionId,

    /// Start time for diagnostics
    started_at: Instant,
}

impl Transaction {
    pub fn new(id: TransactionId) -> Self {
        Self {
            id,
            started_at: Instant::now(),
        }
    }

    /// The global transaction handle
    pub fn global() -> Self {
        Self::new(TransactionId::GLOBAL)
    }

    /// Get the transaction ID
    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn is_global(&self) -> bool {
        self.id.is_global()
    }

    /// Time since the transaction was opened
    pub fn duration(&self) -> Duration {
        self.started_at.elapsed()
    }
}
