//! Account use cases: registration, login, verification, and the
//! cached-account read/write pair.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use super::policy::{read_through, write_through, ReadOutcome, WriteOutcome};
use crate::error::{DataError, ErrorKind};
use crate::models::UserAccount;
use crate::net::{Connectivity, RemoteClient};
use crate::repos::{LocalRepository, ReadRepository, WriteRepository};

/// Payload for the registration flow.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    /// Code from the verification email.
    pub verification_code: String,
}

/// Auth flows against the app API.
///
/// These are remote-first: there is no offline login. Successful
/// register/login responses are persisted through the secure-store
/// repository so the session can restore without a network round trip.
pub struct AuthService {
    api: Arc<RemoteClient>,
    accounts: Arc<LocalRepository<UserAccount>>,
}

impl AuthService {
    pub fn new(api: Arc<RemoteClient>, accounts: Arc<LocalRepository<UserAccount>>) -> Self {
        Self { api, accounts }
    }

    /// Requests a verification code for an email address.
    pub async fn verify_email(&self, email: &str) -> Result<(), DataError> {
        if email.trim().is_empty() {
            return Err(DataError::InvalidArgument("email"));
        }
        self.api
            .post("/farmer/verify-email", &json!({ "email": email }))
            .await?;
        Ok(())
    }

    /// Completes registration and persists the new account.
    pub async fn register(&self, registration: &Registration) -> Result<UserAccount, DataError> {
        let body = serde_json::to_value(registration).map_err(|e| {
            DataError::remote(
                ErrorKind::Unknown,
                format!("Unserializable registration: {}", e),
            )
        })?;

        let payload = self.api.post("/farmer/register", &body).await?;
        let account = parse_account(payload)?;
        self.persist(&account).await
    }

    /// Logs in and persists the refreshed account and token.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserAccount, DataError> {
        if email.trim().is_empty() {
            return Err(DataError::InvalidArgument("email"));
        }
        if password.is_empty() {
            return Err(DataError::InvalidArgument("password"));
        }

        let payload = self
            .api
            .post(
                "/farmer/login",
                &json!({ "email": email, "password": password }),
            )
            .await?;
        let account = parse_account(payload)?;
        self.persist(&account).await
    }

    /// Drops the locally-held session for an account.
    pub fn logout(&self, owner_id: &str) -> Result<(), DataError> {
        self.accounts.evict(owner_id)
    }

    async fn persist(&self, account: &UserAccount) -> Result<UserAccount, DataError> {
        match self.accounts.save(account, &account.id).await {
            Ok(saved) => Ok(saved),
            Err(e) => {
                // The session is still valid without the local copy;
                // it just will not survive an offline restart.
                tracing::warn!(owner_id = %account.id, error = %e, "failed to persist account locally");
                Ok(account.clone())
            }
        }
    }
}

fn parse_account(payload: serde_json::Value) -> Result<UserAccount, DataError> {
    serde_json::from_value(payload).map_err(|e| {
        DataError::remote(
            ErrorKind::Unknown,
            format!("Unexpected account payload: {}", e),
        )
    })
}

/// Reads the account, serving the secure-store copy offline.
pub struct GetUserAccount<R, L> {
    connectivity: Connectivity,
    remote: Arc<R>,
    cache: Arc<L>,
}

impl<R, L> GetUserAccount<R, L>
where
    R: ReadRepository<Entity = UserAccount>,
    L: WriteRepository<Entity = UserAccount>,
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
    ) -> Result<Option<ReadOutcome<UserAccount>>, DataError> {
        read_through(
            self.connectivity.is_online(),
            || self.remote.get(owner_id),
            self.cache.as_ref(),
            owner_id,
        )
        .await
    }
}

/// Saves account edits durably, deferring the push while offline.
pub struct SaveUserAccount<R, L> {
    connectivity: Connectivity,
    remote: Arc<R>,
    cache: Arc<L>,
}

impl<R, L> SaveUserAccount<R, L>
where
    R: WriteRepository<Entity = UserAccount>,
    L: WriteRepository<Entity = UserAccount>,
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
        account: &UserAccount,
        owner_id: &str,
    ) -> Result<WriteOutcome<UserAccount>, DataError> {
        write_through(
            self.connectivity.is_online(),
            account,
            owner_id,
            self.remote.as_ref(),
            self.cache.as_ref(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{EntityKind, MemoryStore};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::Value;
    use std::time::Duration;

    async fn serve(app: Router) -> Arc<RemoteClient> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Arc::new(RemoteClient::new(format!("http://{}", addr), Duration::from_secs(2)).unwrap())
    }

    fn accounts() -> Arc<LocalRepository<UserAccount>> {
        Arc::new(LocalRepository::new(
            Arc::new(MemoryStore::new()),
            "zao",
            EntityKind::UserAccount,
        ))
    }

    fn account_payload() -> Value {
        json!({
            "id": "u1",
            "firstName": "Amina",
            "lastName": "Odhiambo",
            "email": "amina@example.com",
            "phoneNumber": "+254700",
            "authToken": "tok-123",
            "isVerified": true,
            "isRegistrationComplete": true
        })
    }

    #[tokio::test]
    async fn test_login_persists_account_to_secure_store() {
        let app = Router::new().route(
            "/farmer/login",
            post(|| async { Json(json!({"data": account_payload()})) }),
        );
        let accounts = accounts();
        let auth = AuthService::new(serve(app).await, accounts.clone());

        let account = auth.login("amina@example.com", "secret").await.unwrap();
        assert!(account.is_authenticated());

        let stored = accounts.get("u1").await.unwrap().unwrap();
        assert_eq!(stored.auth_token.as_deref(), Some("tok-123"));
    }

    #[tokio::test]
    async fn test_login_failure_surfaces_server_message() {
        let app = Router::new().route(
            "/farmer/login",
            post(|| async {
                (
                    axum::http::StatusCode::UNAUTHORIZED,
                    Json(json!({"message": "Invalid email or password"})),
                )
            }),
        );
        let auth = AuthService::new(serve(app).await, accounts());

        let err = auth.login("amina@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");
        assert_eq!(err.kind(), Some(ErrorKind::Unauthorized));
    }

    #[tokio::test]
    async fn test_login_rejects_blank_credentials() {
        let auth = AuthService::new(serve(Router::new()).await, accounts());

        let err = auth.login(" ", "pw").await.unwrap_err();
        assert!(matches!(err, DataError::InvalidArgument("email")));

        let err = auth.login("a@b.c", "").await.unwrap_err();
        assert!(matches!(err, DataError::InvalidArgument("password")));
    }

    #[tokio::test]
    async fn test_register_posts_payload_and_persists() {
        let app = Router::new().route(
            "/farmer/register",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["firstName"], "Amina");
                assert_eq!(body["verificationCode"], "123456");
                Json(json!({"data": account_payload()}))
            }),
        );
        let accounts = accounts();
        let auth = AuthService::new(serve(app).await, accounts.clone());

        let registration = Registration {
            first_name: "Amina".to_string(),
            last_name: "Odhiambo".to_string(),
            email: "amina@example.com".to_string(),
            phone_number: "+254700".to_string(),
            password: "secret".to_string(),
            verification_code: "123456".to_string(),
        };

        let account = auth.register(&registration).await.unwrap();
        assert!(account.is_registration_complete);
        assert!(accounts.get("u1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_verify_email() {
        let app = Router::new().route(
            "/farmer/verify-email",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["email"], "amina@example.com");
                Json(json!({"message": "Verification code sent"}))
            }),
        );
        let auth = AuthService::new(serve(app).await, accounts());

        auth.verify_email("amina@example.com").await.unwrap();

        let err = auth.verify_email("").await.unwrap_err();
        assert!(matches!(err, DataError::InvalidArgument("email")));
    }

    #[tokio::test]
    async fn test_logout_evicts_cached_session() {
        let accounts = accounts();
        let account = UserAccount::new("u1", "Amina", "Odhiambo", "amina@example.com", "+254700");
        accounts.save(&account, "u1").await.unwrap();

        let auth = AuthService::new(serve(Router::new()).await, accounts.clone());
        auth.logout("u1").unwrap();

        assert!(accounts.get("u1").await.unwrap().is_none());
    }
}
