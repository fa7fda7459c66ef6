// ============================================================================
// Transaction Management Module
// ============================================================================
//
// Nested transactions form a stack. The manager owns that stack and hands
// out strictly increasing ids; the versioned store tags every write with the
// id on top of the stack and uses the manager to find the parent on commit.
//
// ============================================================================

pub mod manager;
pub mod state;

pub use manager::{StackTransactionManager, TransactionManager};
pub use state::{Transaction, TransactionId};
