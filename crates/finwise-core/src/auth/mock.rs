//! Mock identity provider and profile store for testing

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AuthError, Error, Result};
use crate::models::UserProfile;

use super::{AuthUser, IdentityProvider, ProfileStore};

#[derive(Default)]
struct MockIdentityState {
    /// email -> (password, uid)
    users: HashMap<String, (String, String)>,
    /// uid -> display name
    display_names: HashMap<String, String>,
    next_uid: u32,
}

/// In-memory identity provider
#[derive(Clone, Default)]
pub struct MockIdentityProvider {
    state: Arc<Mutex<MockIdentityState>>,
    fail_network: bool,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider whose every call fails with a network error
    pub fn unreachable() -> Self {
        Self {
            state: Arc::default(),
            fail_network: true,
        }
    }

    pub fn user_count(&self) -> usize {
        self.state.lock().unwrap().users.len()
    }

    pub fn display_name(&self, uid: &str) -> Option<String> {
        self.state.lock().unwrap().display_names.get(uid).cloned()
    }

    fn token_for(uid: &str) -> String {
        format!("token-{}", uid)
    }

    fn uid_for_token(token: &str) -> Option<&str> {
        token.strip_prefix("token-")
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser> {
        if self.fail_network {
            return Err(Error::Auth(AuthError::Network));
        }
        let mut state = self.state.lock().unwrap();
        if state.users.contains_key(email) {
            return Err(Error::Auth(AuthError::EmailInUse));
        }
        state.next_uid += 1;
        let uid = format!("user-{}", state.next_uid);
        state
            .users
            .insert(email.to_string(), (password.to_string(), uid.clone()));
        Ok(AuthUser {
            uid: uid.clone(),
            email: email.to_string(),
            display_name: None,
            id_token: Self::token_for(&uid),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        if self.fail_network {
            return Err(Error::Auth(AuthError::Network));
        }
        let state = self.state.lock().unwrap();
        match state.users.get(email) {
            Some((stored_password, uid)) if stored_password == password => Ok(AuthUser {
                uid: uid.clone(),
                email: email.to_string(),
                display_name: state.display_names.get(uid).cloned(),
                id_token: Self::token_for(uid),
            }),
            _ => Err(Error::Auth(AuthError::InvalidCredentials)),
        }
    }

    async fn update_display_name(&self, id_token: &str, display_name: &str) -> Result<()> {
        if self.fail_network {
            return Err(Error::Auth(AuthError::Network));
        }
        let uid = Self::uid_for_token(id_token)
            .ok_or_else(|| Error::Auth(AuthError::InvalidCredentials))?;
        self.state
            .lock()
            .unwrap()
            .display_names
            .insert(uid.to_string(), display_name.to_string());
        Ok(())
    }
}

/// In-memory profile store with injectable failure and latency
#[derive(Clone, Default)]
pub struct MockProfileStore {
    profiles: Arc<Mutex<HashMap<String, UserProfile>>>,
    fail: bool,
    delay: Option<Duration>,
}

impl MockProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose every call fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Store that waits before answering (for timeout tests)
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn insert(&self, profile: UserProfile) {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.uid.clone(), profile);
    }

    pub fn stored(&self, uid: &str) -> Option<UserProfile> {
        self.profiles.lock().unwrap().get(uid).cloned()
    }

    pub fn len(&self) -> usize {
        self.profiles.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ProfileStore for MockProfileStore {
    async fn fetch(&self, uid: &str) -> Result<Option<UserProfile>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(Error::InvalidData("mock profile store configured to fail".into()));
        }
        Ok(self.stored(uid))
    }

    async fn write(&self, profile: &UserProfile) -> Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(Error::InvalidData("mock profile store configured to fail".into()));
        }
        self.insert(profile.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let provider = MockIdentityProvider::new();
        let user = provider.sign_up("a@b.com", "secret1").await.unwrap();
        assert_eq!(user.uid, "user-1");

        let signed_in = provider.sign_in("a@b.com", "secret1").await.unwrap();
        assert_eq!(signed_in.uid, user.uid);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let provider = MockIdentityProvider::new();
        provider.sign_up("a@b.com", "secret1").await.unwrap();
        let err = provider.sign_up("a@b.com", "secret2").await.unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::EmailInUse)));
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let provider = MockIdentityProvider::new();
        provider.sign_up("a@b.com", "secret1").await.unwrap();
        let err = provider.sign_in("a@b.com", "wrong").await.unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_display_name_update() {
        let provider = MockIdentityProvider::new();
        let user = provider.sign_up("a@b.com", "secret1").await.unwrap();
        provider.update_display_name(&user.id_token, "Ada").await.unwrap();
        assert_eq!(provider.display_name(&user.uid).unwrap(), "Ada");
    }
}
