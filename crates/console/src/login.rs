//! Login surface: credential entry and the sign-in exchange.

use crate::client::DirectoryApi;
use crate::session::{Session, TokenStore};
use crate::shell::Route;

/// Message shown when the token was issued but could not be persisted.
pub const SESSION_NOT_SAVED: &str = "Signed in, but the session could not be saved.";

#[derive(Debug, Clone, Default)]
pub struct LoginSurface {
    pub email: String,
    pub password: String,
    error: Option<String>,
    submitting: bool,
}

impl LoginSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Inline error from the last attempt, if it failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Exchange the entered credentials for a token.
    ///
    /// Returns the route to show next: `Users` once the session is
    /// authenticated, otherwise `Login` with [`error`](Self::error) set.
    pub async fn submit<D, S>(&mut self, api: &D, session: &mut Session<S>) -> Route
    where
        D: DirectoryApi,
        S: TokenStore,
    {
        self.submitting = true;
        self.error = None;
        let result = api.login(&self.email, &self.password).await;
        self.submitting = false;

        let token = match result.map(|resp| resp.token) {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => {
                self.error = Some(crate::client::LOGIN_NO_TOKEN.to_string());
                return Route::Login;
            }
            Err(err) => {
                tracing::warn!(email = %self.email, "login rejected: {err}");
                self.error = Some(err.message().to_string());
                return Route::Login;
            }
        };

        if let Err(err) = session.login(token).await {
            tracing::error!("failed to persist session: {err}");
            self.error = Some(SESSION_NOT_SAVED.to_string());
            return Route::Login;
        }

        self.password.clear();
        tracing::info!(email = %self.email, "signed in");
        Route::Users
    }
}
