//! Remote user-account repository.

use std::sync::Arc;

use super::{require_owner, ReadRepository, WriteRepository};
use crate::error::{DataError, ErrorKind};
use crate::models::UserAccount;
use crate::net::RemoteClient;

/// Account repository backed by the app API.
pub struct RemoteUserRepository {
    client: Arc<RemoteClient>,
}

impl RemoteUserRepository {
    pub fn new(client: Arc<RemoteClient>) -> Self {
        Self { client }
    }

    fn path(owner_id: &str) -> String {
        format!("/farmer/account/{}", owner_id)
    }

    fn parse(payload: serde_json::Value) -> Result<UserAccount, DataError> {
        serde_json::from_value(payload).map_err(|e| {
            DataError::remote(
                ErrorKind::Unknown,
                format!("Unexpected account payload: {}", e),
            )
        })
    }
}

impl ReadRepository for RemoteUserRepository {
    type Entity = UserAccount;

    async fn get(&self, owner_id: &str) -> Result<Option<UserAccount>, DataError> {
        require_owner(owner_id)?;

        match self.client.get(&Self::path(owner_id)).await {
            Ok(payload) if payload.is_null() => Ok(None),
            Ok(payload) => Ok(Some(Self::parse(payload)?)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl WriteRepository for RemoteUserRepository {
    async fn save(&self, entity: &UserAccount, owner_id: &str) -> Result<UserAccount, DataError> {
        require_owner(owner_id)?;

        let body = serde_json::to_value(entity).map_err(|e| {
            DataError::remote(ErrorKind::Unknown, format!("Unserializable account: {}", e))
        })?;

        let payload = self.client.post(&Self::path(owner_id), &body).await?;

        if payload.get("id").is_none() {
            return Ok(entity.clone());
        }
        Self::parse(payload)
    }
}
