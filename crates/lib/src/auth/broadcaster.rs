//! Process-wide fan-out of the current auth state.

use std::sync::{Arc, Mutex, Weak};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{AuthProvider, AuthState, Identity, IdentityCallback};
use crate::bootstrap;
use crate::store::ToolStore;
use crate::watch::Watch;

/// Callback registered with [`AuthBroadcaster::subscribe`], invoked with the
/// state at registration and after every transition.
pub type StateCallback = Arc<dyn Fn(AuthState) + Send + Sync>;

/// Single fan-out point for "who is currently signed in".
///
/// Decouples the one external [`AuthProvider`] subscription from any number
/// of in-process listeners, and ensures late subscribers are not left stale:
/// every [`subscribe`] call immediately replays the currently held state,
/// exactly once, even if no provider event ever fires again.
///
/// On a transition into [`AuthState::SignedIn`] the broadcaster runs the
/// tool bootstrap policy *before* publishing, so a subscriber reacting to a
/// sign-in may assume the default tool documents already exist. A bootstrap
/// failure is logged and does not block publication; the idempotent check
/// retries on the next sign-in.
///
/// The broadcaster is an explicitly constructed object with its own
/// lifecycle — create one per process (or per test) and tear it down with
/// [`shutdown`]. It is a cheap-to-clone handle; clones share state and
/// subscribers.
///
/// [`subscribe`]: AuthBroadcaster::subscribe
/// [`shutdown`]: AuthBroadcaster::shutdown
#[derive(Clone)]
pub struct AuthBroadcaster {
    inner: Arc<BroadcasterInner>,
}

struct BroadcasterInner {
    store: ToolStore,
    state: Mutex<BroadcasterState>,
    /// Serializes event rounds: bootstrap + state swap + dispatch never
    /// interleave between two events.
    event_gate: tokio::sync::Mutex<()>,
}

#[derive(Default)]
struct BroadcasterState {
    current: AuthState,
    subscribers: Vec<Subscriber>,
    next_subscriber_id: u64,
    listener: Option<Listener>,
}

struct Subscriber {
    id: u64,
    callback: StateCallback,
}

struct Listener {
    task: JoinHandle<()>,
    _provider_watch: Watch,
}

impl Listener {
    fn stop(self) {
        self.task.abort();
    }
}

impl AuthBroadcaster {
    /// Creates a broadcaster in the [`AuthState::Unknown`] state.
    pub fn new(store: ToolStore) -> Self {
        Self {
            inner: Arc::new(BroadcasterInner {
                store,
                state: Mutex::new(BroadcasterState::default()),
                event_gate: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// The store the bootstrap policy runs against.
    pub fn store(&self) -> &ToolStore {
        &self.inner.store
    }

    /// The currently held auth state.
    pub fn current(&self) -> AuthState {
        self.inner.state.lock().unwrap().current.clone()
    }

    /// Registers `on_change` and immediately invokes it once with the
    /// currently held state (which may still be [`AuthState::Unknown`]).
    ///
    /// On every subsequent provider event all registered callbacks are
    /// invoked in registration order. Cancelling the returned [`Watch`] —
    /// even from inside another subscriber's callback, mid-round — removes
    /// the registration without panicking, and the removed callback is not
    /// invoked again.
    pub fn subscribe(&self, on_change: impl Fn(AuthState) + Send + Sync + 'static) -> Watch {
        let callback: StateCallback = Arc::new(on_change);
        let (id, held) = {
            let mut state = self.inner.state.lock().unwrap();
            let id = state.next_subscriber_id;
            state.next_subscriber_id += 1;
            state.subscribers.push(Subscriber {
                id,
                callback: callback.clone(),
            });
            (id, state.current.clone())
        };
        callback(held);

        let weak: Weak<BroadcasterInner> = Arc::downgrade(&self.inner);
        Watch::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.remove_subscriber(id);
            }
        })
    }

    /// Applies one provider event: `Some` for a sign-in (or identity swap),
    /// `None` for a sign-out.
    ///
    /// Runs the bootstrap policy for a sign-in, updates the held state, then
    /// dispatches to every subscriber in registration order. Rounds are
    /// serialized; two concurrent `apply` calls never interleave their
    /// dispatches. Normally driven by the listener task set up by
    /// [`attach`], but callable directly where the caller owns event
    /// delivery (tests, CLIs).
    ///
    /// [`attach`]: AuthBroadcaster::attach
    pub async fn apply(&self, identity: Option<Identity>) {
        let _round = self.inner.event_gate.lock().await;

        if let Some(identity) = &identity {
            match bootstrap::ensure_tool_defaults(&self.inner.store, identity).await {
                Ok(true) => debug!(uid = %identity.uid, "provisioned tool defaults on sign-in"),
                Ok(false) => {}
                Err(error) => {
                    warn!(
                        uid = %identity.uid,
                        %error,
                        "tool bootstrap failed, publishing sign-in anyway"
                    );
                }
            }
        }

        let next = match identity {
            Some(identity) => AuthState::SignedIn(identity),
            None => AuthState::SignedOut,
        };

        let subscriber_ids: Vec<u64> = {
            let mut state = self.inner.state.lock().unwrap();
            state.current = next.clone();
            state.subscribers.iter().map(|s| s.id).collect()
        };

        for id in subscriber_ids {
            // Re-check registration so a subscriber removed mid-round is skipped.
            let callback = {
                let state = self.inner.state.lock().unwrap();
                state
                    .subscribers
                    .iter()
                    .find(|s| s.id == id)
                    .map(|s| s.callback.clone())
            };
            if let Some(callback) = callback {
                callback(next.clone());
            }
        }
    }

    /// Wires `provider` to this broadcaster.
    ///
    /// The provider's events are forwarded through a channel and applied by
    /// a spawned listener task, in arrival order. Attaching replaces any
    /// previously attached provider. Must be called from within a tokio
    /// runtime.
    pub fn attach(&self, provider: &dyn AuthProvider) {
        let (tx, mut rx) = mpsc::unbounded_channel::<Option<Identity>>();
        let handler: IdentityCallback = Arc::new(move |identity| {
            let _ = tx.send(identity);
        });
        let provider_watch = provider.on_identity_change(handler);

        let weak: Weak<BroadcasterInner> = Arc::downgrade(&self.inner);
        let task = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let Some(inner) = weak.upgrade() else { break };
                let broadcaster = AuthBroadcaster { inner };
                broadcaster.apply(event).await;
            }
        });

        let previous = {
            let mut state = self.inner.state.lock().unwrap();
            state.listener.replace(Listener {
                task,
                _provider_watch: provider_watch,
            })
        };
        if let Some(previous) = previous {
            previous.stop();
        }
    }

    /// Tears down the provider wiring. The held state and subscriber list
    /// are kept; further provider events are ignored until a new
    /// [`attach`].
    ///
    /// [`attach`]: AuthBroadcaster::attach
    pub fn shutdown(&self) {
        let listener = self.inner.state.lock().unwrap().listener.take();
        if let Some(listener) = listener {
            listener.stop();
        }
    }
}

impl BroadcasterInner {
    fn remove_subscriber(&self, id: u64) {
        if let Ok(mut state) = self.state.lock() {
            state.subscribers.retain(|s| s.id != id);
        }
    }
}

impl Drop for BroadcasterInner {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            if let Some(listener) = state.listener.take() {
                listener.stop();
            }
        }
    }
}

impl std::fmt::Debug for AuthBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock().unwrap();
        f.debug_struct("AuthBroadcaster")
            .field("current", &state.current)
            .field("subscribers", &state.subscribers.len())
            .field("attached", &state.listener.is_some())
            .finish()
    }
}
