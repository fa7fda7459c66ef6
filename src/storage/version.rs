use crate::transaction::TransactionId;

/// What a version holds: a live value or a deletion marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload<V> {
    Value(V),
    Tombstone,
}

impl<V> Payload<V> {
    pub fn as_value(&self) -> Option<&V> {
        match self {
            Payload::Value(value) => Some(value),
            Payload::Tombstone => None,
        }
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self, Payload::Tombstone)
    }
}

/// One entry in a key's history, tagged with the transaction that wrote it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version<V> {
    owner: TransactionId,
    payload: Payload<V>,
}

impl<V> Version<V> {
    pub fn new(owner: TransactionId, payload: Payload<V>) -> Self {
        Self { owner, payload }
    }

    pub fn owner(&self) -> TransactionId {
        self.owner
    }

    pub fn payload(&self) -> &Payload<V> {
        &self.payload
    }
}

/// Versions of a single key, outermost first.
///
/// Owners appear in stack order and each owner appears at most once, so
/// the length is bounded by the nesting depth plus the global entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionHistory<V> {
    versions: Vec<Version<V>>,
}

impl<V> Default for VersionHistory<V> {
    fn default() -> Self {
        Self {
            versions: Vec::new(),
        }
    }
}

impl<V> VersionHistory<V> {
    /// Visible value: the innermost payload unless it is a tombstone
    pub fn current(&self) -> Option<&V> {
        self.versions.last().and_then(|version| version.payload.as_value())
    }

    pub fn innermost(&self) -> Option<&Version<V>> {
        self.versions.last()
    }

    pub fn innermost_owner(&self) -> Option<TransactionId> {
        self.versions.last().map(Version::owner)
    }

    /// Record a write by `owner`, replacing its version in place when it
    /// already holds the innermost slot
    pub fn write(&mut self, owner: TransactionId, payload: Payload<V>) {
        match self.versions.last_mut() {
            Some(innermost) if innermost.owner == owner => innermost.payload = payload,
            _ => self.versions.push(Version::new(owner, payload)),
        }
    }

    /// Remove and return the innermost payload if `owner` wrote it
    pub fn pop_owned_by(&mut self, owner: TransactionId) -> Option<Payload<V>> {
        if self.innermost_owner() != Some(owner) {
            return None;
        }
        self.versions.pop().map(|version| version.payload)
    }

    /// Collapse the whole history into a single global version
    pub fn reset_to_base(&mut self, payload: Payload<V>) {
        self.versions.clear();
        self.versions.push(Version::new(TransactionId::GLOBAL, payload));
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Version<V>> {
        self.versions.iter()
    }
}
