//! The in-flight request table `$/cancelRequest` looks up into.
//!
//! Every dispatched request registers a [`tokio_util::sync::CancellationToken`]
//! here before its handler starts running, and removes it when the
//! handler finishes (cancelled or not). `$/cancelRequest` just cancels
//! the token; the handler observes it the next time it's raced against
//! the token in [`race`], at whatever suspension point that happens to
//! land on.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// One mutex over the whole table, matching every other shared-resource
/// lock in this crate: the table is only ever touched for the instant it
/// takes to insert or remove one entry.
#[derive(Default)]
pub struct InFlightRegistry {
    tokens: Mutex<FxHashMap<String, CancellationToken>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        InFlightRegistry::default()
    }

    /// Registers `id` as in flight and returns the token its handler
    /// should race against.
    pub fn register(&self, id: &Value) -> CancellationToken {
        let token = CancellationToken::new();
        self.tokens.lock().insert(id.to_string(), token.clone());
        token
    }

    /// Cancels the token for `id`, if it's still in flight. A request
    /// that already finished (or was never registered, e.g. a client
    /// cancelling a notification) is silently ignored.
    pub fn cancel(&self, id: &Value) {
        if let Some(token) = self.tokens.lock().get(&id.to_string()) {
            token.cancel();
        }
    }

    /// Removes `id` once its handler has finished, win or lose.
    pub fn remove(&self, id: &Value) {
        self.tokens.lock().remove(&id.to_string());
    }

    pub fn len(&self) -> usize {
        self.tokens.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Races `fut` against `token` being cancelled. Returns `Err(())` if the
/// token fired first — the caller turns that into a `RequestCancelled`
/// error response (or, for a notification, just drops the result).
pub async fn race<F, T>(token: &CancellationToken, fut: F) -> Result<T, ()>
where
    F: std::future::Future<Output = T>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(()),
        out = fut => Ok(out),
    }
}
