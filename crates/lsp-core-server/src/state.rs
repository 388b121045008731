//! The initialization state machine every connection walks through
//! exactly once: `Uninitialized -> Initialized -> Shutdown`. No method
//! outside `initialize`/`shutdown`/`exit` is allowed to move it, and
//! most methods refuse to run outside `Initialized`.

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    Uninitialized,
    Initialized,
    Shutdown,
}

/// Guards the connection's [`InitState`] behind a short-lived lock — the
/// state only ever changes on the three lifecycle methods, so this is
/// never held across an `.await`.
pub struct ConnectionState {
    state: Mutex<InitState>,
}

impl ConnectionState {
    pub fn new() -> Self {
        ConnectionState { state: Mutex::new(InitState::Uninitialized) }
    }

    pub fn get(&self) -> InitState {
        *self.state.lock()
    }

    pub fn set(&self, next: InitState) {
        *self.state.lock() = next;
    }

    pub fn is_initialized(&self) -> bool {
        self.get() == InitState::Initialized
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uninitialized() {
        let state = ConnectionState::new();
        assert_eq!(state.get(), InitState::Uninitialized);
        assert!(!state.is_initialized());
    }

    #[test]
    fn transitions_follow_the_lifecycle() {
        let state = ConnectionState::new();
        state.set(InitState::Initialized);
        assert!(state.is_initialized());
        state.set(InitState::Shutdown);
        assert!(!state.is_initialized());
    }
}
