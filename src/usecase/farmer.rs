//! Farm-profile use cases.

use std::sync::Arc;

use super::policy::{read_through, write_through, ReadOutcome, WriteOutcome};
use crate::error::DataError;
use crate::models::FarmerProfile;
use crate::net::Connectivity;
use crate::repos::{ReadRepository, WriteRepository};

/// Pure validation for form feedback; no I/O.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidateFarmProfile;

impl ValidateFarmProfile {
    /// Reports every missing required field at once so the form can
    /// highlight all of them in one pass.
    pub fn execute(&self, profile: &FarmerProfile) -> Result<(), DataError> {
        profile.validate()
    }
}

/// Reads the farm profile, falling back to the cache per the
/// connectivity policy.
pub struct GetFarmProfile<R, L> {
    connectivity: Connectivity,
    remote: Arc<R>,
    cache: Arc<L>,
}

impl<R, L> GetFarmProfile<R, L>
where
    R: ReadRepository<Entity = FarmerProfile>,
    L: WriteRepository<Entity = FarmerProfile>,
{
    pub fn new(connectivity: Connectivity, remote: Arc<R>, cache: Arc<L>) -> Self {
        Self {
            connectivity,
            remote,
            cache,
        }
    }

    pub async fn execute(
        &self,
        owner_id: &str,
    ) -> Result<Option<ReadOutcome<FarmerProfile>>, DataError> {
        read_through(
            self.connectivity.is_online(),
            || self.remote.get(owner_id),
            self.cache.as_ref(),
            owner_id,
        )
        .await
    }
}

/// Saves the farm profile: validate, land locally, then push.
pub struct SaveFarmProfile<R, L> {
    connectivity: Connectivity,
    remote: Arc<R>,
    cache: Arc<L>,
}

impl<R, L> SaveFarmProfile<R, L>
where
    R: WriteRepository<Entity = FarmerProfile>,
    L: WriteRepository<Entity = FarmerProfile>,
{
    pub fn new(connectivity: Connectivity, remote: Arc<R>, cache: Arc<L>) -> Self {
        Self {
            connectivity,
            remote,
            cache,
        }
    }

    pub async fn execute(
        &self,
        profile: &FarmerProfile,
        owner_id: &str,
    ) -> Result<WriteOutcome<FarmerProfile>, DataError> {
        // Validation happens before the local write; an invalid
        // profile never reaches the cache.
        profile.validate()?;

        write_through(
            self.connectivity.is_online(),
            profile,
            owner_id,
            self.remote.as_ref(),
            self.cache.as_ref(),
        )
        .await
    }
}
