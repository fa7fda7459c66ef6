use crate::core::Result;
use crate::transaction::Transaction;

/// Storage engine trait - the narrow surface front ends talk to
///
/// Every call assumes a single logical writer; callers that share a store
/// serialize access themselves (see `mvi::Store`).
pub trait KeyValueStorage<K, V> {
    /// Current value of `key`, or `None` if absent or deleted
    fn get(&self, key: &K) -> Option<&V>;

    fn set(&mut self, key: K, value: V);

    fn delete(&mut self, key: &K);

    /// Number of keys whose current value equals `value`
    fn count(&self, value: &V) -> usize;

    /// Open a nested transaction
    fn begin(&mut self) -> Transaction;

    /// Apply changes of the last active transaction to its parent
    ///
    /// # Errors
    /// `KvError::ActiveTransactionNotFound` if no transaction is open
    fn commit(&mut self) -> Result<()>;

    /// Discard changes of the last active transaction
    ///
    /// # Errors
    /// `KvError::ActiveTransactionNotFound` if no transaction is open
    fn rollback(&mut self) -> Result<()>;
}
