// ── Reactive store subscriptions ──
//
// Handles the view layer holds to observe the store. Snapshots are
// `Arc`-shared, so cloning them is cheap and a consumer can never see a
// half-applied mutation.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::Campaign;

/// Live view of one of the store's collections (campaigns or the
/// focused campaign's contacts).
pub struct CollectionStream<T: Clone + Send + Sync + 'static> {
    receiver: watch::Receiver<Arc<Vec<Arc<T>>>>,
}

impl<T: Clone + Send + Sync + 'static> CollectionStream<T> {
    pub(crate) fn new(receiver: watch::Receiver<Arc<Vec<Arc<T>>>>) -> Self {
        Self { receiver }
    }

    /// The latest snapshot.
    pub fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next mutation, returning the new snapshot.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<Vec<Arc<T>>>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Convert into a `Stream` for `StreamExt` combinators. Yields the
    /// current snapshot first, then one snapshot per mutation.
    pub fn into_stream(self) -> WatchStream<Arc<Vec<Arc<T>>>> {
        WatchStream::new(self.receiver)
    }
}

/// Live view of the focused campaign.
///
/// Yields `None` items while nothing is focused; detail views typically
/// render a placeholder for those and re-render on `Some`.
pub struct FocusStream {
    receiver: watch::Receiver<Option<Arc<Campaign>>>,
}

impl FocusStream {
    pub(crate) fn new(receiver: watch::Receiver<Option<Arc<Campaign>>>) -> Self {
        Self { receiver }
    }

    /// The currently focused campaign, if any.
    pub fn current(&self) -> Option<Arc<Campaign>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next focus change (set, replaced, or cleared).
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Option<Arc<Campaign>>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Convert into a `Stream` of focus states.
    pub fn into_stream(self) -> WatchStream<Option<Arc<Campaign>>> {
        WatchStream::new(self.receiver)
    }
}
