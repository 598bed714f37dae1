//! Firebase-backed identity provider and profile store
//!
//! The identity provider wraps the Identity Toolkit REST API
//! (`accounts:signUp`, `accounts:signInWithPassword`, `accounts:update`);
//! the profile store wraps the Firestore document REST API with one
//! document per user under `users/{uid}`. Provider error codes are mapped
//! to user-facing [`AuthError`] variants at this boundary.
//!
//! # Configuration
//!
//! Environment variables:
//! - `FIREBASE_API_KEY`: Web API key (required)
//! - `FIREBASE_PROJECT_ID`: Project id for Firestore documents (required
//!   for the profile store)
//! - `FIREBASE_AUTH_HOST` / `FIRESTORE_HOST`: Endpoint overrides (testing)

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AuthError, Error, Result};
use crate::models::UserProfile;

use super::{AuthUser, IdentityProvider, ProfileStore};

const DEFAULT_AUTH_HOST: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_FIRESTORE_HOST: &str = "https://firestore.googleapis.com";

/// Identity Toolkit client
#[derive(Clone)]
pub struct FirebaseAuthClient {
    http_client: Client,
    host: String,
    api_key: String,
}

impl FirebaseAuthClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_host(DEFAULT_AUTH_HOST, api_key)
    }

    pub fn with_host(host: &str, api_key: &str) -> Self {
        Self {
            http_client: Client::new(),
            host: host.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Create from environment variables. Required: `FIREBASE_API_KEY`.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("FIREBASE_API_KEY").ok()?;
        let host =
            std::env::var("FIREBASE_AUTH_HOST").unwrap_or_else(|_| DEFAULT_AUTH_HOST.to_string());
        Some(Self::with_host(&host, &api_key))
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/v1/accounts:{}?key={}", self.host, action, self.api_key)
    }

    async fn call(&self, action: &str, body: serde_json::Value) -> Result<AuthResponse> {
        let response = self
            .http_client
            .post(self.endpoint(action))
            .json(&body)
            .send()
            .await
            .map_err(|_| Error::Auth(AuthError::Network))?;

        if !response.status().is_success() {
            let body: ProviderErrorBody = response
                .json()
                .await
                .map_err(|_| Error::Auth(AuthError::Network))?;
            return Err(Error::Auth(map_provider_error(&body.error.message)));
        }

        response
            .json()
            .await
            .map_err(|_| Error::Auth(AuthError::Network))
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuthClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser> {
        let response = self
            .call(
                "signUp",
                serde_json::json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;
        debug!(uid = %response.local_id, "Identity created");
        Ok(response.into_user(email))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        let response = self
            .call(
                "signInWithPassword",
                serde_json::json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;
        Ok(response.into_user(email))
    }

    async fn update_display_name(&self, id_token: &str, display_name: &str) -> Result<()> {
        self.call(
            "update",
            serde_json::json!({
                "idToken": id_token,
                "displayName": display_name,
                "returnSecureToken": false,
            }),
        )
        .await?;
        Ok(())
    }
}

/// Map Identity Toolkit error codes to user-facing errors
fn map_provider_error(message: &str) -> AuthError {
    let code = message.split(' ').next().unwrap_or(message);
    match code {
        "EMAIL_EXISTS" => AuthError::EmailInUse,
        "WEAK_PASSWORD" => AuthError::WeakPassword,
        "INVALID_PASSWORD" | "EMAIL_NOT_FOUND" | "INVALID_LOGIN_CREDENTIALS" | "USER_DISABLED" => {
            AuthError::InvalidCredentials
        }
        _ => AuthError::Provider(message.to_string()),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    #[serde(default)]
    local_id: String,
    #[serde(default)]
    id_token: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl AuthResponse {
    fn into_user(self, email: &str) -> AuthUser {
        AuthUser {
            uid: self.local_id,
            email: email.to_string(),
            display_name: self.display_name.filter(|n| !n.is_empty()),
            id_token: self.id_token,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    message: String,
}

/// Firestore-backed profile document store
///
/// One document per user at `users/{uid}` with string fields.
#[derive(Clone)]
pub struct FirestoreProfileStore {
    http_client: Client,
    host: String,
    project_id: String,
    api_key: Option<String>,
}

impl FirestoreProfileStore {
    pub fn new(project_id: &str, api_key: Option<&str>) -> Self {
        Self::with_host(DEFAULT_FIRESTORE_HOST, project_id, api_key)
    }

    pub fn with_host(host: &str, project_id: &str, api_key: Option<&str>) -> Self {
        Self {
            http_client: Client::new(),
            host: host.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            api_key: api_key.map(|k| k.to_string()),
        }
    }

    /// Create from environment variables. Required: `FIREBASE_PROJECT_ID`.
    pub fn from_env() -> Option<Self> {
        let project_id = std::env::var("FIREBASE_PROJECT_ID").ok()?;
        let api_key = std::env::var("FIREBASE_API_KEY").ok();
        let host =
            std::env::var("FIRESTORE_HOST").unwrap_or_else(|_| DEFAULT_FIRESTORE_HOST.to_string());
        Some(Self::with_host(&host, &project_id, api_key.as_deref()))
    }

    fn document_url(&self, uid: &str) -> String {
        let mut url = format!(
            "{}/v1/projects/{}/databases/(default)/documents/users/{}",
            self.host, self.project_id, uid
        );
        if let Some(ref key) = self.api_key {
            url.push_str(&format!("?key={}", key));
        }
        url
    }
}

#[async_trait]
impl ProfileStore for FirestoreProfileStore {
    async fn fetch(&self, uid: &str) -> Result<Option<UserProfile>> {
        let response = self.http_client.get(self.document_url(uid)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.error_for_status()?;
        let document: FirestoreDocument = response.json().await?;
        Ok(Some(document.into_profile(uid)))
    }

    async fn write(&self, profile: &UserProfile) -> Result<()> {
        let document = FirestoreDocument::from_profile(profile);
        self.http_client
            .patch(self.document_url(&profile.uid))
            .json(&document)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FirestoreDocument {
    #[serde(default)]
    fields: HashMap<String, FirestoreValue>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FirestoreValue {
    #[serde(rename = "stringValue")]
    string_value: String,
}

impl FirestoreDocument {
    fn string_field(&self, name: &str) -> String {
        self.fields
            .get(name)
            .map(|v| v.string_value.clone())
            .unwrap_or_default()
    }

    fn into_profile(self, uid: &str) -> UserProfile {
        UserProfile {
            first_name: self.string_field("firstName"),
            last_name: self.string_field("lastName"),
            email: self.string_field("email"),
            currency: self.string_field("currency"),
            uid: uid.to_string(),
        }
    }

    fn from_profile(profile: &UserProfile) -> Self {
        let mut fields = HashMap::new();
        let mut put = |name: &str, value: &str| {
            fields.insert(
                name.to_string(),
                FirestoreValue {
                    string_value: value.to_string(),
                },
            );
        };
        put("firstName", &profile.first_name);
        put("lastName", &profile.last_name);
        put("email", &profile.email);
        put("currency", &profile.currency);
        put("uid", &profile.uid);
        put("lastUpdated", &Utc::now().to_rfc3339());
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_mapping() {
        assert_eq!(map_provider_error("EMAIL_EXISTS"), AuthError::EmailInUse);
        assert_eq!(
            map_provider_error("WEAK_PASSWORD : Password should be at least 6 characters"),
            AuthError::WeakPassword
        );
        assert_eq!(
            map_provider_error("INVALID_LOGIN_CREDENTIALS"),
            AuthError::InvalidCredentials
        );
        assert!(matches!(
            map_provider_error("SOMETHING_ELSE"),
            AuthError::Provider(_)
        ));
    }

    #[test]
    fn test_document_roundtrip() {
        let profile = UserProfile {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            currency: "GBP".to_string(),
            uid: "u1".to_string(),
        };
        let document = FirestoreDocument::from_profile(&profile);
        assert!(document.fields.contains_key("lastUpdated"));
        let restored = document.into_profile("u1");
        assert_eq!(restored, profile);
    }

    #[test]
    fn test_document_url_with_key() {
        let store = FirestoreProfileStore::with_host("http://localhost:1", "proj", Some("k"));
        assert_eq!(
            store.document_url("u1"),
            "http://localhost:1/v1/projects/proj/databases/(default)/documents/users/u1?key=k"
        );
    }
}
