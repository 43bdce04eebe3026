//! Selected instrument context.
//!
//! The selection is shared explicitly: readers hold a [`Selection`] (or a
//! receiver from [`Selection::watch`]) and writers go through
//! [`Selection::select`]. The last write wins.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Handle to the process-wide selected instrument.
#[derive(Debug, Clone)]
pub struct Selection {
    tx: Arc<watch::Sender<String>>,
}

impl Selection {
    pub fn new(initial: impl Into<String>) -> Self {
        let (tx, _) = watch::channel(initial.into());
        Self { tx: Arc::new(tx) }
    }

    /// Currently selected symbol.
    pub fn current(&self) -> String {
        self.tx.borrow().clone()
    }

    /// Replace the selection. Returns false when the symbol was already
    /// selected, in which case watchers are not woken.
    pub fn select(&self, symbol: &str) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if current == symbol {
                false
            } else {
                *current = symbol.to_string();
                true
            }
        });
        if changed {
            info!(symbol, "instrument selected");
        }
        changed
    }

    /// Receiver that is notified on every change.
    pub fn watch(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }
}
