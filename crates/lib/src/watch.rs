//! Cancellation guard for active subscriptions.

/// Handle returned by every subscription-style registration in this crate
/// (document watches, entry listeners, auth-state subscriptions, provider
/// registrations).
///
/// Cancelling — explicitly via [`Watch::cancel`] or implicitly by dropping
/// the guard — removes the registration and guarantees the associated
/// callback is not invoked again. Cancelling is idempotent and never panics,
/// including when it races a dispatch in progress or when the subscribed-to
/// object is already gone.
pub struct Watch {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Watch {
    /// Wrap a cancellation action. Called at most once.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Cancel the subscription now, consuming the guard.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Watch {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Watch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watch")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
