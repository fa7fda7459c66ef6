use super::KeyValueStorage;
use super::version::{Payload, VersionHistory};
use crate::core::{KvError, Result};
use crate::transaction::{StackTransactionManager, Transaction, TransactionId, TransactionManager};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use tracing::{Level, debug, event, trace};

/// In-memory store keeping one version per enclosing transaction for each key.
///
/// Reads and writes touch only the innermost version. Commit and rollback
/// walk the affected-keys set of the active transaction, so their cost is
/// proportional to what that transaction wrote, not to the whole store.
pub struct VersionedStore<K, V, M = StackTransactionManager> {
    data: HashMap<K, VersionHistory<V>>,
    /// Keys written or deleted by each open transaction
    affected_keys: HashMap<TransactionId, HashSet<K>>,
    transactions: M,
}

impl<K, V> VersionedStore<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq,
{
    pub fn new() -> Self {
        Self::with_manager(StackTransactionManager::new())
    }
}

impl<K, V> Default for VersionedStore<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, M> VersionedStore<K, V, M>
where
    K: Eq + Hash + Clone,
    V: PartialEq,
    M: TransactionManager,
{
    pub fn with_manager(transactions: M) -> Self {
        Self {
            data: HashMap::new(),
            affected_keys: HashMap::new(),
            transactions,
        }
    }

    pub fn transaction_manager(&self) -> &M {
        &self.transactions
    }

    /// Number of key entries, tombstoned ones included
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of open transactions
    pub fn depth(&self) -> usize {
        self.transactions.depth()
    }

    pub fn history(&self, key: &K) -> Option<&VersionHistory<V>> {
        self.data.get(key)
    }

    pub fn affected_keys(&self, transaction: TransactionId) -> Option<&HashSet<K>> {
        self.affected_keys.get(&transaction)
    }

    fn mark_key_for_transaction(&mut self, transaction: TransactionId, key: K) {
        self.affected_keys.entry(transaction).or_default().insert(key);
    }

    /// Id every write is tagged with: the top of the stack, or global
    fn writing_transaction(&self) -> TransactionId {
        if self.transactions.has_active_transactions() {
            self.transactions.last_active_transaction().id()
        } else {
            self.transactions.global_transaction().id()
        }
    }
}

impl<K, V, M> KeyValueStorage<K, V> for VersionedStore<K, V, M>
where
    K: Eq + Hash + Clone,
    V: PartialEq,
    M: TransactionManager,
{
    fn get(&self, key: &K) -> Option<&V> {
        self.data.get(key).and_then(VersionHistory::current)
    }

    fn set(&mut self, key: K, value: V) {
        let writer = self.writing_transaction();
        if !writer.is_global() {
            self.mark_key_for_transaction(writer, key.clone());
        }
        self.data
            .entry(key)
            .or_default()
            .write(writer, Payload::Value(value));
    }

    fn delete(&mut self, key: &K) {
        if !self.transactions.has_active_transactions() {
            // nothing to roll back to at the global level
            if self.data.remove(key).is_some() {
                trace!("key removed from global state");
            }
            return;
        }

        let writer = self.transactions.last_active_transaction().id();
        self.mark_key_for_transaction(writer, key.clone());
        self.data
            .entry(key.clone())
            .or_default()
            .write(writer, Payload::Tombstone);
    }

    fn count(&self, value: &V) -> usize {
        self.data
            .values()
            .filter(|history| history.current() == Some(value))
            .count()
    }

    fn begin(&mut self) -> Transaction {
        let transaction = self.transactions.create_new();
        debug!(id = %transaction.id(), depth = self.transactions.depth(), "begin");
        transaction
    }

    fn rollback(&mut self) -> Result<()> {
        if !self.transactions.has_active_transactions() {
            return Err(KvError::ActiveTransactionNotFound);
        }

        let active = self.transactions.last_active_transaction();
        let keys = self.affected_keys.remove(&active.id()).unwrap_or_default();
        let touched = keys.len();

        for key in keys {
            if let Some(history) = self.data.get_mut(&key) {
                history.pop_owned_by(active.id());
                if history.is_empty() {
                    self.data.remove(&key);
                }
            }
        }

        self.transactions.delete_last_active();
        event!(
            Level::DEBUG,
            id = %active.id(),
            keys = touched,
            elapsed_us = active.duration().as_micros() as u64,
            "rollback"
        );
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if !self.transactions.has_active_transactions() {
            return Err(KvError::ActiveTransactionNotFound);
        }

        let active = self.transactions.last_active_transaction();
        let parent = self.transactions.parent_for_last_active().id();
        let keys = self.affected_keys.remove(&active.id()).unwrap_or_default();
        let touched = keys.len();

        for key in keys {
            let Some(history) = self.data.get_mut(&key) else {
                continue;
            };
            let Some(payload) = history.pop_owned_by(active.id()) else {
                continue;
            };

            if parent.is_global() {
                if payload.is_tombstone() {
                    self.data.remove(&key);
                } else {
                    history.reset_to_base(payload);
                }
            } else {
                // The parent now owns the version and must be able to roll it back.
                history.write(parent, payload);
                self.affected_keys.entry(parent).or_default().insert(key);
            }
        }

        self.transactions.delete_last_active();
        event!(
            Level::DEBUG,
            id = %active.id(),
            parent = %parent,
            keys = touched,
            elapsed_us = active.duration().as_micros() as u64,
            "commit"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> VersionedStore<&'static str, i32> {
        VersionedStore::new()
    }

    #[test]
    fn test_get_missing_key() {
        let store = store();
        assert_eq!(store.get(&"nope"), None);
    }

    #[test]
    fn test_set_outside_transaction_is_global() {
        let mut store = store();
        store.set("a", 1);
        store.set("a", 2);

        let history = store.history(&"a").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.innermost_owner(), Some(TransactionId::GLOBAL));
        assert!(store.affected_keys(TransactionId::GLOBAL).is_none());
    }

    #[test]
    fn test_repeated_writes_collapse() {
        let mut store = store();
        store.set("a", 1);
        store.begin();
        for i in 0..10 {
            store.set("a", i);
        }
        store.delete(&"a");
        store.set("a", 42);

        assert_eq!(store.history(&"a").unwrap().len(), 2);
        assert_eq!(store.get(&"a"), Some(&42));
    }

    #[test]
    fn test_delete_unknown_key_in_transaction_leaves_tombstone() {
        let mut store = store();
        let txn = store.begin();
        store.delete(&"ghost");

        let history = store.history(&"ghost").unwrap();
        assert!(history.innermost().unwrap().payload().is_tombstone());
        assert_eq!(history.innermost_owner(), Some(txn.id()));
        assert_eq!(store.get(&"ghost"), None);

        store.rollback().unwrap();
        assert!(store.history(&"ghost").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_commit_tombstone_to_global_removes_key() {
        let mut store = store();
        store.begin();
        store.delete(&"ghost");
        store.commit().unwrap();

        assert!(store.is_empty());
    }

    #[test]
    fn test_rollback_clears_affected_keys() {
        let mut store = store();
        let txn = store.begin();
        store.set("a", 1);
        assert!(store.affected_keys(txn.id()).unwrap().contains(&"a"));

        store.rollback().unwrap();
        assert!(store.affected_keys(txn.id()).is_none());
        assert_eq!(store.depth(), 0);
    }

    #[test]
    fn test_commit_into_parent_reowns_version() {
        let mut store = store();
        store.set("a", 1);
        let outer = store.begin();
        let inner = store.begin();
        store.set("a", 2);
        store.commit().unwrap();

        let history = store.history(&"a").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.innermost_owner(), Some(outer.id()));
        assert!(store.affected_keys(inner.id()).is_none());
        assert!(store.affected_keys(outer.id()).unwrap().contains(&"a"));
    }

    #[test]
    fn test_commit_into_parent_collapses_with_parent_version() {
        let mut store = store();
        let outer = store.begin();
        store.set("a", 1);
        store.begin();
        store.set("a", 2);
        store.commit().unwrap();

        let history = store.history(&"a").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.innermost_owner(), Some(outer.id()));
        assert_eq!(store.get(&"a"), Some(&2));
    }

    #[test]
    fn test_errors_without_transaction() {
        let mut store = store();
        store.set("a", 1);

        assert_eq!(store.commit(), Err(KvError::ActiveTransactionNotFound));
        assert_eq!(store.rollback(), Err(KvError::ActiveTransactionNotFound));
        assert_eq!(store.get(&"a"), Some(&1));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_count_ignores_tombstones() {
        let mut store = store();
        store.set("a", 7);
        store.set("b", 7);
        store.begin();
        store.delete(&"a");
        store.set("c", 7);

        assert_eq!(store.count(&7), 2);
        assert_eq!(store.count(&8), 0);
    }
}
