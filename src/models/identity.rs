//! Identity provider DTOs.
//!
//! `Session` and `User` keep every field the provider sends: the typed fields
//! are the ones this service reads, everything else rides along in `extra`
//! and is serialized back out untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request body for `POST /api/v1/auth/sign-in`.
#[derive(Deserialize)]
pub struct SignInParams {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /api/v1/auth/sign-up`.
///
/// Unknown fields (address, date of birth, ...) are accepted and ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpParams {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl SignUpParams {
    /// Display name registered with the provider.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// An authenticated session as returned by the provider.
///
/// `secret` is only populated when the session was created with the API key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secret: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A user account as returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "$id")]
    pub id: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub name: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
