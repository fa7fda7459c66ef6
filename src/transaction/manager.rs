// ============================================================================
// Transaction Manager
// ============================================================================

use super::{Transaction, TransactionId};
use tracing::trace;

/// Tracks the stack of open transactions and allocates their ids.
///
/// The store is constructed with a manager and consults it before every
/// read or write; the manager itself knows nothing about stored data.
pub trait TransactionManager {
    /// The baseline transaction, active when the stack is empty
    fn global_transaction(&self) -> Transaction;

    /// Top of the stack, or the global transaction if nothing is open
    fn last_active_transaction(&self) -> Transaction;

    fn has_active_transactions(&self) -> bool;

    /// Allocate the next id, push it and return the handle
    fn create_new(&mut self) -> Transaction;

    /// Pop the top of the stack. No-op when the stack is empty.
    fn delete_last_active(&mut self);

    /// The transaction directly below the top, or the global transaction
    /// when fewer than two are open
    fn parent_for_last_active(&self) -> Transaction;

    /// Number of open transactions, excluding the global one
    fn depth(&self) -> usize;
}

pub struct StackTransactionManager {
    global: Transaction,
    last_issued: TransactionId,
    active: Vec<Transaction>,
}

impl Default for StackTransactionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StackTransactionManager {
    pub fn new() -> Self {
        Self {
            global: Transaction::global(),
            last_issued: TransactionId::GLOBAL,
            active: Vec::new(),
        }
    }

    /// Ids of the open transactions, outermost first
    pub fn active_ids(&self) -> impl Iterator<Item = TransactionId> + '_ {
        self.active.iter().map(Transaction::id)
    }
}

impl TransactionManager for StackTransactionManager {
    fn global_transaction(&self) -> Transaction {
        self.global
    }

    fn last_active_transaction(&self) -> Transaction {
        self.active.last().copied().unwrap_or(self.global)
    }

    fn has_active_transactions(&self) -> bool {
        !self.active.is_empty()
    }

    fn create_new(&mut self) -> Transaction {
        self.last_issued = self.last_issued.next();
        let transaction = Transaction::new(self.last_issued);
        self.active.push(transaction);
        trace!(id = %transaction.id(), depth = self.active.len(), "transaction pushed");
        transaction
    }

    fn delete_last_active(&mut self) {
        if let Some(transaction) = self.active.pop() {
            trace!(id = %transaction.id(), depth = self.active.len(), "transaction popped");
        }
    }

    fn parent_for_last_active(&self) -> Transaction {
        self.active
            .len()
            .checked_sub(2)
            .and_then(|index| self.active.get(index))
            .copied()
            .unwrap_or(self.global)
    }

    fn depth(&self) -> usize {
        self.active.len()
    }
}
