//! Namespaced key-value persistence for cached entities.
//!
//! Every cached value lives under a deterministic key of the form
//! `<namespace>:<EntityKind>:<owner_id>`, so entities of different
//! kinds never collide even when they share an owner.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::io;
use std::path::PathBuf;

/// Entity kinds that partition the key-value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    FarmerProfile,
    WeatherSnapshot,
    NewsFeed,
    UserAccount,
}

impl EntityKind {
    /// Returns the key segment for this entity kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::FarmerProfile => "FarmerProfile",
            EntityKind::WeatherSnapshot => "WeatherSnapshot",
            EntityKind::NewsFeed => "NewsFeed",
            EntityKind::UserAccount => "UserAccount",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Builds the storage key for one entity belonging to one owner.
pub fn cache_key(namespace: &str, kind: EntityKind, owner_id: &str) -> String {
    format!("{}:{}:{}", namespace, kind.as_str(), owner_id)
}

/// Prefix covering every cached entity of one kind.
pub fn kind_prefix(namespace: &str, kind: EntityKind) -> String {
    format!("{}:{}:", namespace, kind.as_str())
}

/// Persistent string-keyed storage with JSON string values.
///
/// Implementations must be safe to share across tasks; writers are
/// last-write-wins, no cross-process locking is attempted.
pub trait KeyValueStore: Send + Sync {
    /// Reads a value. Returns `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Removes every key.
    fn clear(&self) -> Result<(), StoreError>;

    /// Returns every key starting with `prefix`.
    fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

/// Errors from the key-value layer.
#[derive(Debug)]
pub enum StoreError {
    /// I/O error reading or writing the backing file.
    Io(PathBuf, io::Error),
    /// Stored content could not be parsed as JSON.
    Corrupt(String, String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            StoreError::Corrupt(what, e) => {
                write!(f, "Corrupt stored value for {}: {}", what, e)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(_, e) => Some(e),
            StoreError::Corrupt(_, _) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_segments() {
        assert_eq!(EntityKind::FarmerProfile.as_str(), "FarmerProfile");
        assert_eq!(EntityKind::WeatherSnapshot.as_str(), "WeatherSnapshot");
        assert_eq!(EntityKind::NewsFeed.as_str(), "NewsFeed");
        assert_eq!(EntityKind::UserAccount.as_str(), "UserAccount");
    }

    #[test]
    fn test_cache_key_format() {
        assert_eq!(
            cache_key("zao", EntityKind::FarmerProfile, "u1"),
            "zao:FarmerProfile:u1"
        );
    }

    #[test]
    fn test_keys_for_same_owner_do_not_collide() {
        let farmer = cache_key("zao", EntityKind::FarmerProfile, "A");
        let weather = cache_key("zao", EntityKind::WeatherSnapshot, "A");
        assert_ne!(farmer, weather);
    }

    #[test]
    fn test_kind_prefix_matches_cache_key() {
        let key = cache_key("zao", EntityKind::NewsFeed, "u9");
        assert!(key.starts_with(&kind_prefix("zao", EntityKind::NewsFeed)));
        assert!(!key.starts_with(&kind_prefix("zao", EntityKind::UserAccount)));
    }
}
