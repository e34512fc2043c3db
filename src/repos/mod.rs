//! Per-entity repository pairs.
//!
//! Every entity has a remote repository (backend-backed) and a local
//! repository (key-value cache) presenting the same contract. Read and
//! write capabilities are separate traits, so read-only sources
//! (weather, news) simply never implement the write half.

mod farmer;
mod local;
mod news;
mod user;
mod weather;

pub use farmer::RemoteFarmerRepository;
pub use local::LocalRepository;
pub use news::{NewsSource, RemoteNewsRepository};
pub use user::RemoteUserRepository;
pub use weather::RemoteWeatherRepository;

use crate::error::DataError;

/// Read half of the repository contract.
pub trait ReadRepository: Send + Sync {
    type Entity: Clone + Send + Sync;

    /// Reads the entity for an owner.
    ///
    /// `Ok(None)` means the source authoritatively has no entity for
    /// this owner; read paths treat that as a valid empty result, not
    /// a failure.
    fn get(
        &self,
        owner_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Self::Entity>, DataError>> + Send;
}

/// Write half of the repository contract.
pub trait WriteRepository: ReadRepository {
    /// Persists the entity for an owner, returning the stored form.
    fn save(
        &self,
        entity: &Self::Entity,
        owner_id: &str,
    ) -> impl std::future::Future<Output = Result<Self::Entity, DataError>> + Send;
}

pub(crate) fn require_owner(owner_id: &str) -> Result<(), DataError> {
    if owner_id.trim().is_empty() {
        return Err(DataError::InvalidArgument("owner_id"));
    }
    Ok(())
}
