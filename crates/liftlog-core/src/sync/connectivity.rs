//! Connectivity observer.
//!
//! A broadcast of the current online/offline state. Producers (the CLI's
//! probe, tests) push transitions in; consumers either poll `is_online` or
//! subscribe for edges.

use std::sync::Arc;

use tokio::sync::watch;

/// Cloneable handle to the shared connectivity state.
#[derive(Debug, Clone)]
pub struct Connectivity {
    sender: Arc<watch::Sender<bool>>,
}

impl Connectivity {
    /// Create a new observer with the given initial state.
    pub fn new(online: bool) -> Self {
        let (sender, _) = watch::channel(online);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Current state.
    pub fn is_online(&self) -> bool {
        *self.sender.borrow()
    }

    /// Record a state transition. No-op sends still wake subscribers only on
    /// actual changes (`send_if_modified` semantics via value comparison).
    pub fn set_online(&self, online: bool) {
        self.sender.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::new(true)
    }
}
