//! Profile convenience wrappers over the user document.
//!
//! The user document at `users/{uid}` mixes free-form profile fields with
//! bookkeeping (`tools` marker, `createdAt`, `lastLogin`). These wrappers
//! read and merge-write just the profile slice so UI collaborators never
//! touch raw documents for the common cases.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::ToolStore;
use crate::auth::Identity;
use crate::constants;
use crate::doc::Doc;
use crate::path::DocPath;
use crate::watch::Watch;
use crate::Result;

/// Display attributes of a user, mirrored into the user document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
}

impl UserProfile {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.company.is_none()
    }

    /// Copies the set fields onto a document patch. Unset fields are left
    /// out entirely so a merge write cannot clear them.
    pub(crate) fn apply_to(&self, patch: &mut Doc) {
        if let Some(display_name) = &self.display_name {
            patch.set("displayName", display_name.clone());
        }
        if let Some(email) = &self.email {
            patch.set("email", email.clone());
        }
        if let Some(phone) = &self.phone {
            patch.set("phone", phone.clone());
        }
        if let Some(company) = &self.company {
            patch.set("company", company.clone());
        }
    }
}

impl From<&Identity> for UserProfile {
    fn from(identity: &Identity) -> Self {
        Self {
            display_name: identity.display_name.clone(),
            email: identity.email.clone(),
            phone: identity.phone.clone(),
            company: identity.company.clone(),
        }
    }
}

fn profile_from_doc(doc: Doc, path: &DocPath) -> Option<UserProfile> {
    match serde_json::from_value(doc.into()) {
        Ok(profile) => Some(profile),
        Err(error) => {
            warn!(path = %path, %error, "user document has malformed profile fields");
            None
        }
    }
}

impl ToolStore {
    /// Merge-writes the set fields of `profile` onto the user document.
    /// Fields not set on `profile` — and everything else on the document —
    /// are preserved.
    pub async fn set_profile(&self, uid: &str, profile: &UserProfile) -> Result<()> {
        let mut patch = Doc::new();
        profile.apply_to(&mut patch);
        if patch.is_empty() {
            return Ok(());
        }
        self.set_document(&DocPath::user(uid), patch).await
    }

    /// Reads the profile slice of the user document. `None` when the
    /// document does not exist.
    pub async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>> {
        let path = DocPath::user(uid);
        match self.get_document(&path).await? {
            None => Ok(None),
            Some(doc) => {
                let profile: UserProfile = serde_json::from_value(doc.into())?;
                Ok(Some(profile))
            }
        }
    }

    /// Merge-writes a fresh `lastLogin` timestamp onto the user document.
    pub async fn touch_last_login(&self, uid: &str) -> Result<()> {
        let mut patch = Doc::new();
        patch.set(
            constants::LAST_LOGIN_FIELD,
            self.clock().now_rfc3339(),
        );
        self.set_document(&DocPath::user(uid), patch).await
    }

    /// Registers `on_change` for the profile slice of the user document.
    ///
    /// Delivers `None` while the document does not exist or its profile
    /// fields are malformed.
    pub async fn subscribe_profile(
        &self,
        uid: &str,
        on_change: impl Fn(Option<UserProfile>) + Send + Sync + 'static,
    ) -> Result<Watch> {
        let path = DocPath::user(uid);
        let watched = path.clone();
        self.subscribe(&path, move |snapshot| {
            on_change(snapshot.and_then(|doc| profile_from_doc(doc, &watched)));
        })
        .await
    }
}
