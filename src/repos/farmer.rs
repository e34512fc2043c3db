//! Remote farm-profile repository.

use std::sync::Arc;

use serde_json::Value;

use super::{require_owner, ReadRepository, WriteRepository};
use crate::error::{DataError, ErrorKind};
use crate::models::FarmerProfile;
use crate::net::RemoteClient;

/// Farm-profile repository backed by the app API.
pub struct RemoteFarmerRepository {
    client: Arc<RemoteClient>,
}

impl RemoteFarmerRepository {
    pub fn new(client: Arc<RemoteClient>) -> Self {
        Self { client }
    }

    fn path(owner_id: &str) -> String {
        format!("/farmer/farm/info/{}", owner_id)
    }
}

impl ReadRepository for RemoteFarmerRepository {
    type Entity = FarmerProfile;

    async fn get(&self, owner_id: &str) -> Result<Option<FarmerProfile>, DataError> {
        require_owner(owner_id)?;

        match self.client.get(&Self::path(owner_id)).await {
            Ok(payload) => {
                // Some backend routes report a missing profile with a
                // sentinel message instead of a 404.
                if payload.is_null() || is_not_defined(&payload) {
                    return Ok(None);
                }
                let profile = serde_json::from_value(payload).map_err(|e| {
                    DataError::remote(
                        ErrorKind::Unknown,
                        format!("Unexpected farm profile payload: {}", e),
                    )
                })?;
                Ok(Some(profile))
            }
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl WriteRepository for RemoteFarmerRepository {
    async fn save(&self, entity: &FarmerProfile, owner_id: &str) -> Result<FarmerProfile, DataError> {
        require_owner(owner_id)?;

        let body = serde_json::to_value(entity).map_err(|e| {
            DataError::remote(ErrorKind::Unknown, format!("Unserializable profile: {}", e))
        })?;

        let payload = self.client.post(&Self::path(owner_id), &body).await?;

        // A bare acknowledgement means the submitted profile stands.
        if payload.get("farmerType").is_none() {
            return Ok(entity.clone());
        }

        serde_json::from_value(payload).map_err(|e| {
            DataError::remote(
                ErrorKind::Unknown,
                format!("Unexpected farm profile payload: {}", e),
            )
        })
    }
}

fn is_not_defined(payload: &Value) -> bool {
    payload
        .get("message")
        .and_then(Value::as_str)
        .is_some_and(|m| m.to_ascii_lowercase().contains("not defined"))
}
