// ============================================================================
// nestkv Library
// ============================================================================

pub mod command;
pub mod core;
pub mod mvi;
pub mod session;
pub mod storage;
pub mod transaction;

// Re-export main types for convenience
pub use crate::command::Command;
pub use crate::core::{KvError, Result};
pub use crate::session::{Session, SessionConfig, SessionView};
pub use crate::storage::{KeyValueStorage, Payload, VersionedStore};
pub use crate::transaction::{StackTransactionManager, Transaction, TransactionId, TransactionManager};

/// Create an empty store with its own transaction manager
///
/// # Examples
///
/// ```
/// use nestkv::KeyValueStorage;
///
/// let mut store = nestkv::open::<String, String>();
/// store.set("foo".into(), "123".into());
///
/// store.begin();
/// store.set("foo".into(), "456".into());
/// assert_eq!(store.get(&"foo".to_string()).map(String::as_str), Some("456"));
///
/// store.rollback().unwrap();
/// assert_eq!(store.get(&"foo".to_string()).map(String::as_str), Some("123"));
/// ```
pub fn open<K, V>() -> VersionedStore<K, V>
where
    K: Eq + std::hash::Hash + Clone,
    V: PartialEq,
{
    VersionedStore::new()
}
