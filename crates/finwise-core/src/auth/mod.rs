//! Auth/profile gateway
//!
//! Wraps the external identity provider and remote profile store behind an
//! explicit session context. The [`SessionManager`] owns the in-memory
//! profile cache, the durable local store, and the auth-state channel; it
//! is constructed once and injected wherever profile data is needed; there
//! is no ambient module state.
//!
//! Sign-in profile resolution order: memory cache, then local store (uid
//! must match), then the remote store under a bounded timeout, then a
//! minimal profile derived from the provider display name. Remote writes on
//! the sign-in path are best-effort; the sign-up profile write is awaited,
//! so a successful sign-up implies a durable profile document.

mod firebase;
mod local_store;
mod mock;

pub use firebase::{FirebaseAuthClient, FirestoreProfileStore};
pub use local_store::LocalStore;
pub use mock::{MockIdentityProvider, MockProfileStore};

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::currency;
use crate::error::{AuthError, Error, Result};
use crate::models::UserProfile;

/// Default bound on the remote profile fetch during sign-in
const DEFAULT_PROFILE_TIMEOUT_MS: u64 = 3000;

/// Currency assigned when a sign-up does not provide one
const DEFAULT_CURRENCY: &str = "INR";

/// An authenticated user as reported by the identity provider
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    /// Provider-issued session token
    pub id_token: String,
}

/// An active session: the authenticated user plus the resolved profile
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: AuthUser,
    pub profile: UserProfile,
}

/// Trait defining the interface for identity providers
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a new identity
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser>;

    /// Authenticate an existing identity
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser>;

    /// Set the display name on the identity record
    async fn update_display_name(&self, id_token: &str, display_name: &str) -> Result<()>;
}

/// Trait defining the interface for remote profile stores
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a profile document, `None` when absent
    async fn fetch(&self, uid: &str) -> Result<Option<UserProfile>>;

    /// Create or replace a profile document
    async fn write(&self, profile: &UserProfile) -> Result<()>;
}

/// Concrete identity provider enum (Clone + compile-time dispatch)
#[derive(Clone)]
pub enum IdentityClient {
    Firebase(FirebaseAuthClient),
    Mock(MockIdentityProvider),
}

impl IdentityClient {
    /// Create from environment variables (requires `FIREBASE_API_KEY`)
    pub fn from_env() -> Option<Self> {
        FirebaseAuthClient::from_env().map(IdentityClient::Firebase)
    }

    pub fn mock() -> Self {
        IdentityClient::Mock(MockIdentityProvider::new())
    }
}

#[async_trait]
impl IdentityProvider for IdentityClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser> {
        match self {
            IdentityClient::Firebase(p) => p.sign_up(email, password).await,
            IdentityClient::Mock(p) => p.sign_up(email, password).await,
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        match self {
            IdentityClient::Firebase(p) => p.sign_in(email, password).await,
            IdentityClient::Mock(p) => p.sign_in(email, password).await,
        }
    }

    async fn update_display_name(&self, id_token: &str, display_name: &str) -> Result<()> {
        match self {
            IdentityClient::Firebase(p) => p.update_display_name(id_token, display_name).await,
            IdentityClient::Mock(p) => p.update_display_name(id_token, display_name).await,
        }
    }
}

/// Concrete profile store enum (Clone + compile-time dispatch)
#[derive(Clone)]
pub enum ProfileStoreClient {
    Firestore(FirestoreProfileStore),
    Mock(MockProfileStore),
}

impl ProfileStoreClient {
    /// Create from environment variables (requires `FIREBASE_PROJECT_ID`)
    pub fn from_env() -> Option<Self> {
        FirestoreProfileStore::from_env().map(ProfileStoreClient::Firestore)
    }

    pub fn mock() -> Self {
        ProfileStoreClient::Mock(MockProfileStore::new())
    }
}

#[async_trait]
impl ProfileStore for ProfileStoreClient {
    async fn fetch(&self, uid: &str) -> Result<Option<UserProfile>> {
        match self {
            ProfileStoreClient::Firestore(s) => s.fetch(uid).await,
            ProfileStoreClient::Mock(s) => s.fetch(uid).await,
        }
    }

    async fn write(&self, profile: &UserProfile) -> Result<()> {
        match self {
            ProfileStoreClient::Firestore(s) => s.write(profile).await,
            ProfileStoreClient::Mock(s) => s.write(profile).await,
        }
    }
}

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Bound on the remote profile fetch during sign-in
    pub profile_fetch_timeout: Duration,
    /// Currency assigned when sign-up omits one
    pub default_currency: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            profile_fetch_timeout: Duration::from_millis(DEFAULT_PROFILE_TIMEOUT_MS),
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl AuthConfig {
    /// Default config with `FINWISE_PROFILE_TIMEOUT_MS` applied if set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(ms) = std::env::var("FINWISE_PROFILE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.profile_fetch_timeout = Duration::from_millis(ms);
        }
        config
    }
}

/// Validate sign-up form input before touching the provider
pub fn validate_signup(
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
) -> Result<()> {
    if email.trim().is_empty()
        || password.is_empty()
        || first_name.trim().is_empty()
        || last_name.trim().is_empty()
    {
        return Err(Error::Auth(AuthError::MissingFields));
    }
    if password.len() < 6 {
        return Err(Error::Auth(AuthError::WeakPassword));
    }
    if !is_valid_email(email.trim()) {
        return Err(Error::Auth(AuthError::InvalidEmail));
    }
    Ok(())
}

// Structural check equivalent to /^[^\s@]+@[^\s@]+\.[^\s@]+$/
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.split('.').count() >= 2
                && domain.split('.').all(|p| !p.is_empty())
        }
        _ => false,
    }
}

/// The explicit session context over identity, remote profile store,
/// in-memory cache, and durable local store.
pub struct SessionManager {
    identity: IdentityClient,
    store: ProfileStoreClient,
    local: LocalStore,
    config: AuthConfig,
    cache: Mutex<HashMap<String, UserProfile>>,
    state: watch::Sender<Option<Session>>,
}

impl SessionManager {
    pub fn new(
        identity: IdentityClient,
        store: ProfileStoreClient,
        local: LocalStore,
        config: AuthConfig,
    ) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            identity,
            store,
            local,
            config,
            cache: Mutex::new(HashMap::new()),
            state,
        }
    }

    /// Fully mocked manager backed by a temp-dir local store path
    pub fn mocked(local: LocalStore) -> Self {
        Self::new(
            IdentityClient::mock(),
            ProfileStoreClient::mock(),
            local,
            AuthConfig::default(),
        )
    }

    /// Subscribe to auth-state changes.
    ///
    /// The receiver observes the current session (or `None`) immediately,
    /// and every subsequent sign-in, sign-out, and profile update.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }

    /// The current session, if signed in
    pub fn current_session(&self) -> Option<Session> {
        self.state.borrow().clone()
    }

    /// Create an identity and its profile document.
    ///
    /// The profile write is awaited: when this returns Ok the document is
    /// durable in the remote store. The display-name update is
    /// fire-and-forget.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        currency_code: Option<&str>,
    ) -> Result<Session> {
        validate_signup(email, password, first_name, last_name)?;
        let email = email.trim();
        let first_name = first_name.trim();
        let last_name = last_name.trim();

        let mut user = self.identity.sign_up(email, password).await?;
        user.display_name = Some(first_name.to_string());

        // Display name on the identity record is cosmetic; don't block on it.
        {
            let identity = self.identity.clone();
            let id_token = user.id_token.clone();
            let display_name = first_name.to_string();
            tokio::spawn(async move {
                if let Err(e) = identity.update_display_name(&id_token, &display_name).await {
                    warn!(error = %e, "Display name update failed");
                }
            });
        }

        let currency_code = currency_code
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(&self.config.default_currency);
        let profile = UserProfile {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            currency: currency_code.to_string(),
            uid: user.uid.clone(),
        };

        // Durable-before-return: a failed write fails the sign-up.
        self.store.write(&profile).await?;

        self.remember(&profile);
        let session = Session {
            user,
            profile,
        };
        self.state.send_replace(Some(session.clone()));
        info!(uid = %session.user.uid, "Signed up");
        Ok(session)
    }

    /// Authenticate and resolve the profile through the cache hierarchy
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let user = self.identity.sign_in(email.trim(), password).await?;
        let profile = self.resolve_profile(&user).await;

        let session = Session { user, profile };
        self.state.send_replace(Some(session.clone()));
        info!(uid = %session.user.uid, "Signed in");
        Ok(session)
    }

    /// Clear the cache, the local store, and the active session
    pub fn sign_out(&self) {
        self.cache.lock().unwrap().clear();
        self.local.clear_profile();
        self.state.send_replace(None);
        info!("Signed out");
    }

    /// Change the active profile's currency.
    ///
    /// The code must resolve in the catalog; the remote write is awaited
    /// before the cache and local store are updated.
    pub async fn update_currency(&self, uid: &str, currency_code: &str) -> Result<UserProfile> {
        if !currency::is_known(currency_code) {
            return Err(Error::InvalidData(format!(
                "Unknown currency code: {}",
                currency_code
            )));
        }

        let mut profile = self
            .cached_profile(uid)
            .or_else(|| self.local.load_profile().filter(|p| p.uid == uid))
            .ok_or_else(|| Error::NotFound(format!("No profile for user {}", uid)))?;
        profile.currency = currency_code.to_string();

        self.store.write(&profile).await?;
        self.remember(&profile);

        // Keep the broadcast session in step with the profile change.
        let current = self.state.borrow().clone();
        if let Some(mut session) = current {
            if session.user.uid == uid {
                session.profile = profile.clone();
                self.state.send_replace(Some(session));
            }
        }

        Ok(profile)
    }

    /// The cached profile for a user, if resolved this session
    pub fn cached_profile(&self, uid: &str) -> Option<UserProfile> {
        self.cache.lock().unwrap().get(uid).cloned()
    }

    pub fn dark_mode(&self) -> bool {
        self.local.dark_mode()
    }

    pub fn set_dark_mode(&self, enabled: bool) {
        self.local.set_dark_mode(enabled);
    }

    fn remember(&self, profile: &UserProfile) {
        self.cache
            .lock()
            .unwrap()
            .insert(profile.uid.clone(), profile.clone());
        self.local.save_profile(profile);
    }

    /// Cache -> local store -> remote (bounded) -> minimal profile
    async fn resolve_profile(&self, user: &AuthUser) -> UserProfile {
        if let Some(profile) = self.cached_profile(&user.uid) {
            self.local.save_profile(&profile);
            return profile;
        }

        if let Some(profile) = self.local.load_profile() {
            if profile.uid == user.uid {
                self.cache
                    .lock()
                    .unwrap()
                    .insert(profile.uid.clone(), profile.clone());
                return profile;
            }
        }

        let fetch = self.store.fetch(&user.uid);
        match tokio::time::timeout(self.config.profile_fetch_timeout, fetch).await {
            Ok(Ok(Some(profile))) => {
                self.remember(&profile);
                profile
            }
            Ok(Ok(None)) => {
                // First sign-in without a document: seed one in the background.
                let profile = self.minimal_profile(user);
                {
                    let store = self.store.clone();
                    let seeded = profile.clone();
                    tokio::spawn(async move {
                        if let Err(e) = store.write(&seeded).await {
                            warn!(error = %e, "Background profile seed failed");
                        }
                    });
                }
                self.local.save_profile(&profile);
                profile
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Remote profile fetch failed, using minimal profile");
                let profile = self.minimal_profile(user);
                self.local.save_profile(&profile);
                profile
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.config.profile_fetch_timeout.as_millis() as u64,
                    "Remote profile fetch timed out, using minimal profile"
                );
                let profile = self.minimal_profile(user);
                self.local.save_profile(&profile);
                profile
            }
        }
    }

    /// Smallest useful profile, derived from the provider's display name
    fn minimal_profile(&self, user: &AuthUser) -> UserProfile {
        let display_name = user.display_name.clone().unwrap_or_default();
        let mut names = display_name.split_whitespace();
        UserProfile {
            first_name: names.next().unwrap_or("User").to_string(),
            last_name: names.next().unwrap_or("").to_string(),
            email: user.email.clone(),
            currency: self.config.default_currency.clone(),
            uid: user.uid.clone(),
        }
    }
}
