//! Identity provider abstraction.
//!
//! The hosted authentication provider is out of scope; the core only needs
//! "who is signed in right now". Surfaces inject an implementation at facade
//! construction — the shipped demo sign-in is just one implementation behind
//! the trait, not a special case.

use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// The authenticated principal, as supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub uid: UserId,
    pub full_name: String,
    pub email: String,
}

/// Synchronous source of the current identity.
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, or `None` when nobody is signed in.
    fn current_user(&self) -> Option<AuthUser>;
}

/// Demo identity provider: a single local account toggled by sign-in/out.
#[derive(Debug, Default)]
pub struct DemoIdentityProvider {
    current: RwLock<Option<AuthUser>>,
}

impl DemoIdentityProvider {
    /// Uid of the demo account.
    pub const DEMO_UID: &'static str = "demo-user-1";

    /// Create a signed-out provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign the demo account in and return it.
    pub fn sign_in_demo(&self) -> AuthUser {
        let user = AuthUser {
            uid: UserId::new(Self::DEMO_UID),
            full_name: "Demo User".to_owned(),
            email: "demo@homehaven.example".to_owned(),
        };
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(user.clone());
        user
    }

    /// Sign out.
    pub fn sign_out(&self) {
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl IdentityProvider for DemoIdentityProvider {
    fn current_user(&self) -> Option<AuthUser> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Fixed identity for tests: always the given user (or always signed out).
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub Option<AuthUser>);

impl StaticIdentity {
    /// Always-signed-in identity with the given uid.
    #[must_use]
    pub fn signed_in(uid: &str) -> Self {
        Self(Some(AuthUser {
            uid: UserId::new(uid),
            full_name: format!("Test {uid}"),
            email: format!("{uid}@test.example"),
        }))
    }

    /// Always-signed-out identity.
    #[must_use]
    pub const fn signed_out() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<AuthUser> {
        self.0.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_sign_in_and_out() {
        let provider = DemoIdentityProvider::new();
        assert!(provider.current_user().is_none());

        let user = provider.sign_in_demo();
        assert_eq!(user.uid.as_str(), DemoIdentityProvider::DEMO_UID);
        assert_eq!(provider.current_user().unwrap(), user);

        provider.sign_out();
        assert!(provider.current_user().is_none());
    }

    #[test]
    fn test_static_identity() {
        assert!(StaticIdentity::signed_out().current_user().is_none());
        assert_eq!(
            StaticIdentity::signed_in("user-1")
                .current_user()
                .unwrap()
                .uid
                .as_str(),
            "user-1"
        );
    }
}
