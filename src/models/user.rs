use serde::{Deserialize, Serialize};

/// Account record for the signed-in user.
///
/// Created by the registration flow, overwritten by login/verify/reset;
/// persisted through the secure store because it carries the auth
/// token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub auth_token: Option<String>,
    pub is_verified: bool,
    pub is_registration_complete: bool,
}

impl UserAccount {
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone_number: phone_number.into(),
            auth_token: None,
            is_verified: false,
            is_registration_complete: false,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// True when a login or registration produced a token.
    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }
}
