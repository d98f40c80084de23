//! Session store: the authentication token and its lifecycle.
//!
//! A [`Session`] owns the durable [`TokenStore`]; components that only need
//! to read the token (the directory client) hold a cheap [`SessionHandle`].

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::error::StoreError;

/// Durable storage for the single session token.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    fn save(&self, token: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn clear(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Read access to the current token, shared with the directory client.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    token: Arc<RwLock<Option<String>>>,
}

impl SessionHandle {
    /// Current token, if one is held.
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .filter(|t| !t.is_empty())
    }

    /// True iff a non-empty token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    fn set(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }
}

/// Process-wide authentication state.
#[derive(Debug)]
pub struct Session<S> {
    handle: SessionHandle,
    store: S,
}

impl<S: TokenStore> Session<S> {
    /// Restore the session persisted by a previous run.
    pub async fn restore(store: S) -> Result<Self, StoreError> {
        let token = store.load().await?.filter(|t| !t.is_empty());
        if token.is_some() {
            tracing::info!("restored persisted session");
        } else {
            tracing::debug!("no persisted session");
        }

        let handle = SessionHandle::default();
        handle.set(token);
        Ok(Self { handle, store })
    }

    /// Start an unauthenticated session without reading the store.
    pub fn anonymous(store: S) -> Self {
        Self {
            handle: SessionHandle::default(),
            store,
        }
    }

    /// Store `token` durably, then mark the session authenticated.
    ///
    /// If persisting fails the session is left unchanged.
    pub async fn login(&mut self, token: impl Into<String>) -> Result<(), StoreError> {
        let token = token.into();
        self.store.save(&token).await?;
        self.handle.set(Some(token));
        tracing::info!("session authenticated");
        Ok(())
    }

    /// Drop the token from memory, then from durable storage.
    pub async fn logout(&mut self) -> Result<(), StoreError> {
        self.handle.set(None);
        self.store.clear().await?;
        tracing::info!("session cleared");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.handle.is_authenticated()
    }

    pub fn token(&self) -> Option<String> {
        self.handle.token()
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Non-durable token store, for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `token`, as if persisted by an earlier run.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token.into()))),
        }
    }

    pub fn peek(&self) -> Option<String> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.peek())
    }

    async fn save(&self, token: &str) -> Result<(), StoreError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Store whose writes always fail.
    struct BrokenStore;

    impl TokenStore for BrokenStore {
        async fn load(&self) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        async fn save(&self, _token: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".to_string()))
        }

        async fn clear(&self) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".to_string()))
        }
    }

    #[tokio::test]
    async fn login_persists_and_authenticates() {
        let store = MemoryTokenStore::new();
        let mut session = Session::restore(store.clone()).await.unwrap();
        assert!(!session.is_authenticated());

        session.login("QpwL5tke4Pnpja7X4").await.unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("QpwL5tke4Pnpja7X4"));
        assert_eq!(store.peek().as_deref(), Some("QpwL5tke4Pnpja7X4"));
    }

    #[tokio::test]
    async fn restore_survives_reload() {
        let store = MemoryTokenStore::with_token("QpwL5tke4Pnpja7X4");
        let session = Session::restore(store).await.unwrap();
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn empty_persisted_token_is_not_authenticated() {
        let session = Session::restore(MemoryTokenStore::with_token("")).await.unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[tokio::test]
    async fn logout_clears_memory_and_storage() {
        let store = MemoryTokenStore::with_token("QpwL5tke4Pnpja7X4");
        let mut session = Session::restore(store.clone()).await.unwrap();
        let handle = session.handle();

        session.logout().await.unwrap();

        assert!(!session.is_authenticated());
        assert!(!handle.is_authenticated());
        assert_eq!(store.peek(), None);
    }

    #[tokio::test]
    async fn failed_persist_leaves_session_unauthenticated() {
        let mut session = Session::anonymous(BrokenStore);
        let err = session.login("token").await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn failed_clear_still_drops_memory_token() {
        let mut session = Session::anonymous(BrokenStore);
        session.handle.set(Some("token".to_string()));

        assert!(session.logout().await.is_err());
        assert!(!session.is_authenticated());
    }
}
