//! Wire shapes of the directory API.

use serde::{Deserialize, Serialize};
use userdesk_core::UserRecord;

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful login payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Error payload the directory sends on rejected calls (`{"error": "..."}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// One page of `GET /users?page=N`.
///
/// `total_pages` is authoritative; the remaining metadata is informative.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserPage {
    pub data: Vec<UserRecord>,
    pub total_pages: u32,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u32>,
}

impl UserPage {
    pub fn new(data: Vec<UserRecord>, total_pages: u32) -> Self {
        Self {
            data,
            total_pages,
            page: None,
            per_page: None,
            total: None,
        }
    }
}

/// Envelope of `GET /users/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SingleUser {
    pub data: UserRecord,
}

/// Acknowledgement of `PUT /users/{id}`.
///
/// The directory may echo the update; nothing of it is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateAck {
    #[serde(default, rename = "updatedAt")]
    pub updated_at: Option<String>,
}
