//! Remote weather repository.
//!
//! The weather backend exposes current conditions and the 7-day
//! forecast as separate endpoints. Both are fetched in parallel and
//! merged into one snapshot; a failed half degrades to its default
//! instead of failing the other.

use std::sync::Arc;

use super::{require_owner, ReadRepository};
use crate::error::{DataError, ErrorKind};
use crate::models::{CurrentConditions, ForecastDay, WeatherSnapshot};
use crate::net::RemoteClient;

/// Read-only weather source; there is no weather write endpoint.
pub struct RemoteWeatherRepository {
    client: Arc<RemoteClient>,
}

impl RemoteWeatherRepository {
    pub fn new(client: Arc<RemoteClient>) -> Self {
        Self { client }
    }

    async fn fetch_current(&self, owner_id: &str) -> Result<CurrentConditions, DataError> {
        let payload = self
            .client
            .get_query("/weather/current", &[("userId", owner_id)])
            .await?;
        serde_json::from_value(payload).map_err(|e| {
            DataError::remote(
                ErrorKind::Unknown,
                format!("Unexpected current-weather payload: {}", e),
            )
        })
    }

    async fn fetch_forecast(&self, owner_id: &str) -> Result<Vec<ForecastDay>, DataError> {
        let payload = self
            .client
            .get_query("/weather/forecast", &[("userId", owner_id)])
            .await?;
        serde_json::from_value(payload).map_err(|e| {
            DataError::remote(
                ErrorKind::Unknown,
                format!("Unexpected forecast payload: {}", e),
            )
        })
    }
}

impl ReadRepository for RemoteWeatherRepository {
    type Entity = WeatherSnapshot;

    async fn get(&self, owner_id: &str) -> Result<Option<WeatherSnapshot>, DataError> {
        require_owner(owner_id)?;

        let (current, forecast) = futures::join!(
            self.fetch_current(owner_id),
            self.fetch_forecast(owner_id),
        );

        match (current, forecast) {
            (Err(e), Err(_)) if e.is_not_found() => Ok(None),
            (Err(e), Err(_)) => Err(e),
            (current, forecast) => {
                let current = match current {
                    Ok(conditions) => Some(conditions),
                    Err(e) => {
                        tracing::warn!(owner_id, error = %e, "current-conditions fetch failed");
                        None
                    }
                };
                let forecast = match forecast {
                    Ok(days) => days,
                    Err(e) => {
                        tracing::warn!(owner_id, error = %e, "forecast fetch failed");
                        Vec::new()
                    }
                };
                Ok(Some(WeatherSnapshot::new(current, forecast)))
            }
        }
    }
}
