//! # Live Subscriptions
//!
//! A subscription is a cancellable handle, not a registered callback: the
//! store pushes snapshots into an unbounded channel and the caller drains it
//! at its own pace. Lifetime is owned by the caller: dropping the handle (or
//! calling `cancel`) closes the receiver, and the store prunes the dead
//! sender on its next push. Pushes never block the store task.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::store::document::Document;

/// Common interface for the typed live feeds the services hand out.
///
/// `recv` resolves to `None` once the feed is finished: the handle was
/// cancelled, the store shut down, or the service was never configured with a
/// backend.
#[async_trait]
pub trait LiveFeed: Send {
    type Item: Send;

    async fn recv(&mut self) -> Option<Self::Item>;
}

/// Live feed of one document's state. Each item is the full document, or
/// `None` when the document is absent or was deleted.
#[derive(Debug)]
pub struct DocSubscription {
    receiver: mpsc::UnboundedReceiver<Option<Document>>,
}

impl DocSubscription {
    pub(crate) fn channel() -> (mpsc::UnboundedSender<Option<Document>>, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (sender, Self { receiver })
    }

    pub async fn recv(&mut self) -> Option<Option<Document>> {
        self.receiver.recv().await
    }

    /// Ends delivery. Dropping the handle has the same effect.
    pub fn cancel(self) {}
}

/// Live feed of an ordered query's full result set. Each item is a complete
/// snapshot, newest write last to arrive.
#[derive(Debug)]
pub struct QuerySubscription {
    receiver: mpsc::UnboundedReceiver<Vec<Document>>,
}

impl QuerySubscription {
    pub(crate) fn channel() -> (mpsc::UnboundedSender<Vec<Document>>, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (sender, Self { receiver })
    }

    pub async fn recv(&mut self) -> Option<Vec<Document>> {
        self.receiver.recv().await
    }

    pub fn cancel(self) {}
}
