//! Role resolution and sessions
//!
//! Login maps an email (and optional password) to a profile whose role
//! decides which dashboard renders. Two providers are interchangeable
//! behind the trait: the in-process static directory and the hosted
//! profile store. A failed login never establishes a session.

use crate::error::{DashboardError, Result};
use crate::models::UserProfile;
use crate::seed;
use crate::workspace::Workspace;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

pub mod profile_store;
pub use profile_store::ProfileStore;

/// Credential check + profile fetch, implementation-agnostic.
#[async_trait::async_trait]
pub trait AuthProvider: Send + Sync {
    async fn authenticate(&self, email: &str, password: Option<&str>) -> Result<UserProfile>;
}

//
// ================= Static Directory =================
//

/// In-process directory lookup. Passwords are not checked here; the demo
/// directory resolves on identity alone.
pub struct StaticDirectory {
    profiles: Vec<UserProfile>,
}

impl StaticDirectory {
    pub fn new(profiles: Vec<UserProfile>) -> Self {
        Self { profiles }
    }

    /// Directory over the seeded demo identities.
    pub fn demo() -> Self {
        Self::new(seed::demo_profiles())
    }
}

#[async_trait::async_trait]
impl AuthProvider for StaticDirectory {
    async fn authenticate(&self, email: &str, _password: Option<&str>) -> Result<UserProfile> {
        self.profiles
            .iter()
            .find(|p| p.email.eq_ignore_ascii_case(email.trim()))
            .cloned()
            .ok_or_else(|| DashboardError::UnknownIdentity(email.trim().to_string()))
    }
}

//
// ================= Sessions =================
//

/// An authenticated identity plus its private in-memory workspace.
pub struct Session {
    pub profile: UserProfile,
    pub workspace: Workspace,
}

/// Token → session map. Each successful login mints a fresh token and a
/// freshly seeded workspace; sessions never share collections.
pub struct SessionRegistry {
    provider: Arc<dyn AuthProvider>,
    sessions: RwLock<HashMap<String, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            provider,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Authenticate and establish a session. On failure the registry is
    /// left untouched.
    pub async fn login(&self, email: &str, password: Option<&str>) -> Result<(String, UserProfile)> {
        let profile = self.provider.authenticate(email, password).await?;

        let token = mint_token(&profile.email);
        let session = Arc::new(Session {
            profile: profile.clone(),
            workspace: seed::demo_workspace(),
        });

        self.sessions.write().await.insert(token.clone(), session);
        Ok((token, profile))
    }

    pub async fn resolve(&self, token: &str) -> Result<Arc<Session>> {
        self.sessions
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or(DashboardError::UnknownSession)
    }

    pub async fn logout(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Opaque session token: sha256 over the email and a fresh nonce.
fn mint_token(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(Uuid::new_v4().as_bytes());
    hex::encode(hasher.finalize())
}
