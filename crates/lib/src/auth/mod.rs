//! Identity types, the authentication-provider surface, and the process-wide
//! auth-state broadcaster.
//!
//! Authentication mechanics (passwords, tokens) live outside this crate. An
//! external [`AuthProvider`] reports identity-change events; this module
//! re-publishes them to any number of in-process subscribers through
//! [`AuthBroadcaster`], running the tool bootstrap policy on the way.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::watch::Watch;

mod broadcaster;
pub use broadcaster::{AuthBroadcaster, StateCallback};

mod provider;
pub use provider::LocalProvider;

/// The authenticated user reference and its display attributes.
///
/// Owned by the authentication provider; the display fields are mirrored
/// into the user document when defaults are provisioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Opaque user reference, the key of every per-user document.
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl Identity {
    /// Creates an identity with only the `uid` set.
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: None,
            email: None,
            phone: None,
            company: None,
        }
    }

    /// Builder-style display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Builder-style email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Builder-style phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Builder-style company name.
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }
}

/// The broadcaster's view of "who is currently signed in".
///
/// `Unknown` is the initial state, held until the first provider event
/// arrives. After that the state moves between `SignedOut` and
/// `SignedIn`; a direct `SignedIn → SignedIn` transition (identity swap
/// without an intervening sign-out) is valid.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthState {
    /// No provider event has arrived yet.
    #[default]
    Unknown,
    /// The provider reported no authenticated identity.
    SignedOut,
    /// The provider reported an authenticated identity.
    SignedIn(Identity),
}

impl AuthState {
    /// The signed-in identity, if any.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            AuthState::SignedIn(identity) => Some(identity),
            _ => None,
        }
    }

    /// Returns true for `SignedIn`.
    pub fn is_signed_in(&self) -> bool {
        matches!(self, AuthState::SignedIn(_))
    }

    /// Returns true while no provider event has arrived.
    pub fn is_unknown(&self) -> bool {
        matches!(self, AuthState::Unknown)
    }
}

/// Handler registered with an [`AuthProvider`]: invoked with
/// `Some(identity)` on sign-in or identity swap, `None` on sign-out.
pub type IdentityCallback = Arc<dyn Fn(Option<Identity>) + Send + Sync>;

/// Contract consumed from the external authentication provider.
pub trait AuthProvider: Send + Sync {
    /// The identity the provider currently holds, if it can answer
    /// synchronously.
    fn current_identity(&self) -> Option<Identity>;

    /// Registers `handler` for every subsequent identity change. The
    /// provider does not replay the current identity at registration; that
    /// is the broadcaster's job. The returned [`Watch`] removes the
    /// registration.
    fn on_identity_change(&self, handler: IdentityCallback) -> Watch;
}
