//! Hosted auth/profile store provider
//!
//! Speaks to a backend-as-a-service credential store: a password token
//! grant followed by a profile row fetch. Interchangeable with the static
//! directory behind `AuthProvider`; the rest of the crate never knows
//! which one is active.

use crate::auth::AuthProvider;
use crate::error::{DashboardError, Result};
use crate::models::{Role, UserProfile};
use reqwest::Client;
use serde::Deserialize;
use std::env;
use std::time::Duration;
use tracing::{error, info};

pub struct ProfileStore {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct TokenGrant {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    id: String,
    name: String,
    email: String,
    role: String,
    org_id: String,
    avatar_url: Option<String>,
    district: Option<String>,
}

impl ProfileStore {
    pub fn new(base_url: String, api_key: String) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .pool_max_idle_per_host(4)
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Configured from `PROFILE_STORE_URL` / `PROFILE_STORE_KEY`; absent
    /// env vars mean the static directory stays in charge.
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("PROFILE_STORE_URL").ok()?;
        let api_key = env::var("PROFILE_STORE_KEY").ok()?;
        Some(Self::new(base_url, api_key))
    }

    async fn grant_token(&self, email: &str, password: &str) -> Result<TokenGrant> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| {
                error!("Profile store token grant failed: {}", e);
                DashboardError::ProfileStoreError(format!("token grant failed: {}", e))
            })?;

        if response.status() == reqwest::StatusCode::BAD_REQUEST
            || response.status() == reqwest::StatusCode::UNAUTHORIZED
        {
            return Err(DashboardError::CredentialRejected(email.to_string()));
        }
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DashboardError::ProfileStoreError(format!(
                "token grant returned error: {}",
                body
            )));
        }

        response.json::<TokenGrant>().await.map_err(|e| {
            DashboardError::ProfileStoreError(format!("unparsable token grant: {}", e))
        })
    }

    async fn fetch_profile(&self, email: &str, access_token: &str) -> Result<ProfileRow> {
        let url = format!(
            "{}/rest/v1/profiles?email=eq.{}&select=*",
            self.base_url, email
        );

        let rows: Vec<ProfileRow> = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                DashboardError::ProfileStoreError(format!("profile fetch failed: {}", e))
            })?
            .json()
            .await
            .map_err(|e| {
                DashboardError::ProfileStoreError(format!("unparsable profile row: {}", e))
            })?;

        rows.into_iter()
            .next()
            .ok_or_else(|| DashboardError::UnknownIdentity(email.to_string()))
    }
}

/// Map a stored role string onto the closed enum; unknowns are rejected
/// rather than defaulted, so a misconfigured row cannot open a dashboard.
fn parse_role(raw: &str) -> Result<Role> {
    match raw.to_uppercase().as_str() {
        "INTERNAL_ADMIN" => Ok(Role::InternalAdmin),
        "CSR_PARTNER" => Ok(Role::CsrPartner),
        "GOVT_OFFICER" => Ok(Role::GovtOfficer),
        other => Err(DashboardError::ProfileStoreError(format!(
            "unrecognized role: {}",
            other
        ))),
    }
}

#[async_trait::async_trait]
impl AuthProvider for ProfileStore {
    async fn authenticate(&self, email: &str, password: Option<&str>) -> Result<UserProfile> {
        let email = email.trim();
        let password = password.unwrap_or_default();

        let grant = self.grant_token(email, password).await?;
        let row = self.fetch_profile(email, &grant.access_token).await?;
        let role = parse_role(&row.role)?;

        info!("Profile store resolved {} as {}", row.email, role);

        Ok(UserProfile {
            user_id: row.id,
            name: row.name,
            email: row.email,
            role,
            org_id: row.org_id,
            avatar_url: row.avatar_url,
            district_scope: row.district,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_strings_map_onto_the_closed_enum() {
        assert_eq!(parse_role("INTERNAL_ADMIN").unwrap(), Role::InternalAdmin);
        assert_eq!(parse_role("csr_partner").unwrap(), Role::CsrPartner);
        assert_eq!(parse_role("Govt_Officer").unwrap(), Role::GovtOfficer);
    }

    #[test]
    fn unknown_role_is_rejected_not_defaulted() {
        assert!(parse_role("SYSTEM_ROOT").is_err());
        assert!(parse_role("").is_err());
    }

    #[test]
    fn from_env_is_none_without_configuration() {
        std::env::remove_var("PROFILE_STORE_URL");
        std::env::remove_var("PROFILE_STORE_KEY");
        assert!(ProfileStore::from_env().is_none());
    }
}
