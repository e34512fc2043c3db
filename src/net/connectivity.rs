//! Device connectivity signal.

use std::sync::Arc;

use tokio::sync::watch;

/// Cloneable handle over the device connectivity state.
///
/// The embedding shell flips the state from its platform reachability
/// callback. Use cases query the current value; the sync service
/// subscribes to transitions.
#[derive(Debug, Clone)]
pub struct Connectivity {
    tx: Arc<watch::Sender<bool>>,
}

impl Connectivity {
    pub fn new(initially_online: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_online);
        Self { tx: Arc::new(tx) }
    }

    /// Current connectivity state.
    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Updates the state; watchers are only woken on actual changes.
    pub fn set_online(&self, online: bool) {
        self.tx.send_if_modified(|state| {
            if *state != online {
                *state = online;
                true
            } else {
                false
            }
        });
    }

    /// Subscribes to connectivity transitions.
    pub fn watch(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
