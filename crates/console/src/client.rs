//! Typed client of the remote user directory.

use std::future::Future;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use userdesk_core::{UserId, UserPatch, UserRecord};

use crate::config::ConsoleConfig;
use crate::error::DirectoryError;
use crate::session::SessionHandle;
use crate::types::{ErrorBody, LoginRequest, LoginResponse, SingleUser, UpdateAck, UserPage};

/// Inline message for a rejected login without a server-provided reason.
pub const LOGIN_FAILED: &str = "An error occurred during login.";
/// Inline message for a 2xx login that carried no token.
pub const LOGIN_NO_TOKEN: &str = "Login failed. Please check your credentials.";

/// Operations the console needs from the directory.
///
/// Implemented over HTTP by [`DirectoryClient`]; controllers are generic over
/// it so they can be driven by an in-memory directory.
pub trait DirectoryApi: Send + Sync {
    /// Exchange credentials for a token.
    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<LoginResponse, DirectoryError>> + Send;

    /// Fetch one page of users.
    fn list_users(&self, page: u32) -> impl Future<Output = Result<UserPage, DirectoryError>> + Send;

    /// Fetch a single user.
    fn get_user(&self, id: UserId) -> impl Future<Output = Result<UserRecord, DirectoryError>> + Send;

    /// Apply a partial update.
    fn update_user(
        &self,
        id: UserId,
        patch: &UserPatch,
    ) -> impl Future<Output = Result<UpdateAck, DirectoryError>> + Send;

    /// Delete a user.
    fn delete_user(&self, id: UserId) -> impl Future<Output = Result<(), DirectoryError>> + Send;
}

/// HTTP client of the directory.
///
/// Every call except `login` carries the session token as a bearer
/// credential when one is present. Without a token the call is still sent and
/// the directory is expected to refuse it.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    client: Client,
    api_url: String,
    session: SessionHandle,
}

impl DirectoryClient {
    pub fn new(config: &ConsoleConfig, session: SessionHandle) -> Result<Self, DirectoryError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DirectoryError::fetch(None, format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            session,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

impl DirectoryApi for DirectoryClient {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, DirectoryError> {
        tracing::debug!("sending login request");
        let resp = self
            .client
            .post(self.url("/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("login request failed: {e}");
                DirectoryError::auth(None, LOGIN_FAILED)
            })?;

        let status = resp.status();
        if !status.is_success() {
            let reason = error_reason(resp).await;
            tracing::info!(status = status.as_u16(), "login rejected");
            return Err(DirectoryError::auth(
                Some(status.as_u16()),
                reason.unwrap_or_else(|| LOGIN_FAILED.to_string()),
            ));
        }

        let body: LoginResponse = resp
            .json()
            .await
            .map_err(|e| DirectoryError::auth(Some(status.as_u16()), format!("invalid login response: {e}")))?;

        match body.token.as_deref() {
            Some(token) if !token.is_empty() => Ok(body),
            _ => Err(DirectoryError::auth(Some(status.as_u16()), LOGIN_NO_TOKEN)),
        }
    }

    async fn list_users(&self, page: u32) -> Result<UserPage, DirectoryError> {
        let req = self
            .client
            .get(self.url("/users"))
            .query(&[("page", page)]);
        let resp = self
            .authorized(req)
            .send()
            .await
            .map_err(|e| DirectoryError::fetch(None, format!("network error: {e}")))?;

        let resp = expect_success(resp, |status, message| DirectoryError::fetch(status, message)).await?;
        resp.json()
            .await
            .map_err(|e| DirectoryError::fetch(None, format!("invalid user page: {e}")))
    }

    async fn get_user(&self, id: UserId) -> Result<UserRecord, DirectoryError> {
        let req = self.client.get(self.url(&format!("/users/{id}")));
        let resp = self
            .authorized(req)
            .send()
            .await
            .map_err(|e| DirectoryError::fetch(None, format!("network error: {e}")))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(DirectoryError::fetch(Some(404), format!("user not found: {id}")));
        }

        let resp = expect_success(resp, |status, message| DirectoryError::fetch(status, message)).await?;
        let body: SingleUser = resp
            .json()
            .await
            .map_err(|e| DirectoryError::fetch(None, format!("invalid user payload: {e}")))?;
        Ok(body.data)
    }

    async fn update_user(&self, id: UserId, patch: &UserPatch) -> Result<UpdateAck, DirectoryError> {
        let req = self.client.put(self.url(&format!("/users/{id}"))).json(patch);
        let resp = self
            .authorized(req)
            .send()
            .await
            .map_err(|e| DirectoryError::mutation(None, format!("network error: {e}")))?;

        let resp = expect_success(resp, |status, message| DirectoryError::mutation(status, message)).await?;
        // The acknowledgement body is optional; an unreadable one still acknowledges.
        let text = resp.text().await.unwrap_or_default();
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }

    async fn delete_user(&self, id: UserId) -> Result<(), DirectoryError> {
        let req = self.client.delete(self.url(&format!("/users/{id}")));
        let resp = self
            .authorized(req)
            .send()
            .await
            .map_err(|e| DirectoryError::mutation(None, format!("network error: {e}")))?;

        expect_success(resp, |status, message| DirectoryError::mutation(status, message)).await?;
        Ok(())
    }
}

/// Pass 2xx responses through; turn anything else into the caller's error kind.
async fn expect_success(
    resp: Response,
    kind: fn(Option<u16>, String) -> DirectoryError,
) -> Result<Response, DirectoryError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let reason = error_reason(resp).await;
    tracing::warn!(status = status.as_u16(), "directory returned an error");
    Err(kind(
        Some(status.as_u16()),
        reason.unwrap_or_else(|| format!("directory returned {status}")),
    ))
}

/// `error` field of a JSON error body, if the directory sent one.
async fn error_reason(resp: Response) -> Option<String> {
    let text = resp.text().await.ok()?;
    serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|b| b.error)
        .filter(|e| !e.is_empty())
}
