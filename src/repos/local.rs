//! Key-value-backed local repository, generic over the entity type.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{require_owner, ReadRepository, WriteRepository};
use crate::error::DataError;
use crate::store::{cache_key, kind_prefix, EntityKind, KeyValueStore, StoreError};

/// Local cache repository for one entity kind.
///
/// Values are stored as JSON under `<namespace>:<kind>:<owner>`, so
/// repositories of different kinds can share one store without
/// colliding.
pub struct LocalRepository<T> {
    store: Arc<dyn KeyValueStore>,
    namespace: String,
    kind: EntityKind,
    _entity: PhantomData<fn() -> T>,
}

impl<T> LocalRepository<T> {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        namespace: impl Into<String>,
        kind: EntityKind,
    ) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            kind,
            _entity: PhantomData,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Owners with a cached entity of this kind, for sync replay.
    pub fn owners(&self) -> Result<Vec<String>, DataError> {
        let prefix = kind_prefix(&self.namespace, self.kind);
        let keys = self.store.keys(&prefix)?;
        Ok(keys
            .into_iter()
            .filter_map(|key| key.strip_prefix(&prefix).map(String::from))
            .collect())
    }

    /// Drops the cached entity for an owner, if any.
    pub fn evict(&self, owner_id: &str) -> Result<(), DataError> {
        require_owner(owner_id)?;
        self.store.remove(&self.key(owner_id))?;
        Ok(())
    }

    fn key(&self, owner_id: &str) -> String {
        cache_key(&self.namespace, self.kind, owner_id)
    }
}

impl<T> ReadRepository for LocalRepository<T>
where
    T: Clone + Send + Sync + Serialize + DeserializeOwned,
{
    type Entity = T;

    async fn get(&self, owner_id: &str) -> Result<Option<T>, DataError> {
        require_owner(owner_id)?;

        let key = self.key(owner_id);
        match self.store.get(&key)? {
            None => Ok(None),
            Some(raw) => {
                let entity = serde_json::from_str(&raw)
                    .map_err(|e| StoreError::Corrupt(key, e.to_string()))?;
                Ok(Some(entity))
            }
        }
    }
}

impl<T> WriteRepository for LocalRepository<T>
where
    T: Clone + Send + Sync + Serialize + DeserializeOwned,
{
    async fn save(&self, entity: &T, owner_id: &str) -> Result<T, DataError> {
        require_owner(owner_id)?;

        let key = self.key(owner_id);
        let raw = serde_json::to_string(entity)
            .map_err(|e| StoreError::Corrupt(key.clone(), e.to_string()))?;
        self.store.set(&key, &raw)?;

        Ok(entity.clone())
    }
}
