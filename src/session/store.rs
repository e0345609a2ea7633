use std::sync::Arc;

use chrono::{Duration, Utc};
use parking_lot::RwLock;
use thiserror::Error;
use tracing::debug;

use super::{SessionToken, TokenStorage, UserDirectory};
use crate::domain::{Role, Session};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("session storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Holds the current authenticated session and mirrors it to persisted
/// token storage. Single-writer: the UI flow only ever logs in, restores,
/// or logs out one session at a time.
pub struct SessionStore {
    storage: Arc<dyn TokenStorage>,
    directory: Arc<dyn UserDirectory>,
    ttl: Duration,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new(
        storage: Arc<dyn TokenStorage>,
        directory: Arc<dyn UserDirectory>,
        ttl_hours: i64,
    ) -> Self {
        Self {
            storage,
            directory,
            ttl: Duration::hours(ttl_hours),
            current: RwLock::new(None),
        }
    }

    pub fn directory(&self) -> &Arc<dyn UserDirectory> {
        &self.directory
    }

    /// Validate credentials, create a session, persist its token. The
    /// stored session is untouched when credentials do not match.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, SessionError> {
        self.login_with_token(email, password).await.map(|(s, _)| s)
    }

    /// Like [`login`](Self::login), also returning the encoded token so API
    /// clients can present it as a bearer credential.
    pub async fn login_with_token(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(Session, String), SessionError> {
        let session = self
            .directory
            .authenticate(email, password)
            .await
            .ok_or(SessionError::InvalidCredentials)?;

        let token = SessionToken::issue(&session, Utc::now(), self.ttl);
        let encoded = token.encode();
        self.storage.store(&encoded).await?;
        *self.current.write() = Some(session.clone());

        debug!(user_id = session.user_id, role = %session.role, "session created");
        Ok((session, encoded))
    }

    /// Restore the persisted session, if any. Absent tokens yield no
    /// session; malformed or expired tokens additionally clear storage.
    pub async fn restore_session(&self) -> Result<Option<Session>, SessionError> {
        let Some(raw) = self.storage.load().await? else {
            return Ok(None);
        };

        let token = match SessionToken::decode(&raw) {
            Ok(token) => token,
            Err(_) => {
                debug!("discarding malformed session token");
                self.storage.clear().await?;
                return Ok(None);
            }
        };

        if token.is_expired(Utc::now()) {
            debug!(user_id = token.user_id, "discarding expired session token");
            self.storage.clear().await?;
            return Ok(None);
        }

        let session = token.session();
        *self.current.write() = Some(session.clone());
        Ok(Some(session))
    }

    /// Clear the in-memory session and the persisted token. Idempotent.
    pub async fn logout(&self) -> Result<(), SessionError> {
        *self.current.write() = None;
        self.storage.clear().await?;
        Ok(())
    }

    /// Verify a presented token without touching storage. Used by the API
    /// layer to resolve bearer tokens per request.
    pub fn verify(&self, raw: &str) -> Option<Session> {
        let token = SessionToken::decode(raw).ok()?;
        if token.is_expired(Utc::now()) {
            return None;
        }
        Some(token.session())
    }

    pub fn current(&self) -> Option<Session> {
        self.current.read().clone()
    }

    /// Whether the current session's role is one of `roles`. An empty list
    /// means any authenticated role; no session is always false.
    pub fn has_role(&self, roles: &[Role]) -> bool {
        match self.current.read().as_ref() {
            None => false,
            Some(session) => roles.is_empty() || roles.contains(&session.role),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemoryTokenStorage, SeededUserDirectory};

    fn store() -> SessionStore {
        SessionStore::new(
            Arc::new(MemoryTokenStorage::default()),
            Arc::new(SeededUserDirectory::default()),
            24,
        )
    }

    #[tokio::test]
    async fn login_then_restore_round_trip() {
        let store = store();
        let session = store.login("analyst@company.com", "analyst123").await.unwrap();
        assert_eq!(session.role, Role::Analyst);

        // A fresh store over the same storage restores the session.
        let storage = Arc::new(MemoryTokenStorage::default());
        let first = SessionStore::new(storage.clone(), Arc::new(SeededUserDirectory::default()), 24);
        first.login("analyst@company.com", "analyst123").await.unwrap();

        let second = SessionStore::new(storage, Arc::new(SeededUserDirectory::default()), 24);
        let restored = second.restore_session().await.unwrap().unwrap();
        assert_eq!(restored.email, "analyst@company.com");
        assert_eq!(second.current().unwrap().role, Role::Analyst);
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials_and_leaves_no_session() {
        let store = store();
        let err = store.login("analyst@company.com", "nope").await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidCredentials));
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn expired_token_restores_nothing_and_clears_storage() {
        let storage = Arc::new(MemoryTokenStorage::default());
        let session = Session {
            user_id: 2,
            email: "analyst@company.com".into(),
            display_name: "Data Analyst".into(),
            role: Role::Analyst,
            avatar_url: String::new(),
        };
        // exp one second in the past
        let token = SessionToken::issue(&session, Utc::now() - Duration::hours(24) - Duration::seconds(1), Duration::hours(24));
        storage.store(&token.encode()).await.unwrap();

        let store = SessionStore::new(storage.clone(), Arc::new(SeededUserDirectory::default()), 24);
        assert!(store.restore_session().await.unwrap().is_none());
        assert!(storage.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_token_restores_nothing_and_clears_storage() {
        let storage = Arc::new(MemoryTokenStorage::default());
        storage.store("definitely not a token").await.unwrap();

        let store = SessionStore::new(storage.clone(), Arc::new(SeededUserDirectory::default()), 24);
        assert!(store.restore_session().await.unwrap().is_none());
        assert!(storage.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let store = store();
        store.login("viewer@company.com", "viewer123").await.unwrap();
        store.logout().await.unwrap();
        assert!(store.current().is_none());
        store.logout().await.unwrap();
    }

    #[tokio::test]
    async fn has_role_semantics() {
        let store = store();
        assert!(!store.has_role(&[]));

        store.login("viewer@company.com", "viewer123").await.unwrap();
        assert!(store.has_role(&[]));
        assert!(store.has_role(&[Role::Viewer]));
        assert!(!store.has_role(&[Role::Analyst, Role::Admin]));
    }
}
