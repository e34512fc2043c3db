//! Weather fetch use case.

use std::sync::Arc;

use super::policy::{read_through, ReadOutcome};
use crate::error::DataError;
use crate::models::WeatherSnapshot;
use crate::net::Connectivity;
use crate::repos::{ReadRepository, WriteRepository};

/// Fetches the weather snapshot for the dashboard, caching it for
/// offline reads.
pub struct FetchWeather<R, L> {
    connectivity: Connectivity,
    remote: Arc<R>,
    cache: Arc<L>,
}

impl<R, L> FetchWeather<R, L>
where
    R: ReadRepository<Entity = WeatherSnapshot>,
    L: WriteRepository<Entity = WeatherSnapshot>,
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
    ) -> Result<Option<ReadOutcome<WeatherSnapshot>>, DataError> {
        read_through(
            self.connectivity.is_online(),
            || self.remote.get(owner_id),
            self.cache.as_ref(),
            owner_id,
        )
        .await
    }
}
