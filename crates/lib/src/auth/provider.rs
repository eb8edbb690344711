//! In-process authentication provider.

use std::sync::{Arc, Mutex, Weak};

use super::{AuthProvider, Identity, IdentityCallback};
use crate::watch::Watch;

/// An in-process [`AuthProvider`] driven by explicit `sign_in` / `sign_out`
/// calls.
///
/// Used by the CLI and by tests; real deployments wire their authentication
/// SDK behind the [`AuthProvider`] trait instead. `LocalProvider` is a
/// cheap-to-clone handle.
#[derive(Clone, Default)]
pub struct LocalProvider {
    inner: Arc<ProviderInner>,
}

#[derive(Default)]
struct ProviderInner {
    state: Mutex<ProviderState>,
}

#[derive(Default)]
struct ProviderState {
    current: Option<Identity>,
    handlers: Vec<Handler>,
    next_handler_id: u64,
}

struct Handler {
    id: u64,
    callback: IdentityCallback,
}

impl LocalProvider {
    /// Creates a provider with no signed-in identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports `identity` as signed in. Calling this while already signed in
    /// is an identity swap and is reported like any other change.
    pub fn sign_in(&self, identity: Identity) {
        {
            let mut state = self.inner.state.lock().unwrap();
            state.current = Some(identity.clone());
        }
        self.inner.dispatch(Some(identity));
    }

    /// Reports the identity as signed out.
    pub fn sign_out(&self) {
        {
            let mut state = self.inner.state.lock().unwrap();
            state.current = None;
        }
        self.inner.dispatch(None);
    }
}

impl ProviderInner {
    /// Invokes every registered handler in registration order, outside the
    /// lock so a handler may unregister without deadlocking.
    fn dispatch(&self, event: Option<Identity>) {
        let handler_ids: Vec<u64> = {
            let state = self.state.lock().unwrap();
            state.handlers.iter().map(|h| h.id).collect()
        };
        for id in handler_ids {
            let callback = {
                let state = self.state.lock().unwrap();
                state
                    .handlers
                    .iter()
                    .find(|h| h.id == id)
                    .map(|h| h.callback.clone())
            };
            if let Some(callback) = callback {
                callback(event.clone());
            }
        }
    }

    fn remove_handler(&self, id: u64) {
        if let Ok(mut state) = self.state.lock() {
            state.handlers.retain(|h| h.id != id);
        }
    }
}

impl AuthProvider for LocalProvider {
    fn current_identity(&self) -> Option<Identity> {
        self.inner.state.lock().unwrap().current.clone()
    }

    fn on_identity_change(&self, handler: IdentityCallback) -> Watch {
        let id = {
            let mut state = self.inner.state.lock().unwrap();
            let id = state.next_handler_id;
            state.next_handler_id += 1;
            state.handlers.push(Handler {
                id,
                callback: handler,
            });
            id
        };
        let weak: Weak<ProviderInner> = Arc::downgrade(&self.inner);
        Watch::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.remove_handler(id);
            }
        })
    }
}

impl std::fmt::Debug for LocalProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock().unwrap();
        f.debug_struct("LocalProvider")
            .field("signed_in", &state.current.is_some())
            .field("handlers", &state.handlers.len())
            .finish()
    }
}
