//! Typed live feeds over order documents.

use async_trait::async_trait;
use tracing::warn;

use crate::model::Order;
use crate::store::{document, DocSubscription, LiveFeed, QuerySubscription};

/// Live feed of a single order. Items are `None` when the document is absent
/// or deleted. A feed from an unconfigured service terminates immediately.
#[derive(Debug)]
pub struct OrderFeed {
    pub(crate) inner: Option<DocSubscription>,
}

#[async_trait]
impl LiveFeed for OrderFeed {
    type Item = Option<Order>;

    async fn recv(&mut self) -> Option<Self::Item> {
        let sub = self.inner.as_mut()?;
        let doc = sub.recv().await?;
        Some(match doc {
            Some(doc) => match doc.decode() {
                Ok(order) => Some(order),
                Err(error) => {
                    warn!(id = %doc.id, %error, "Undecodable order snapshot");
                    None
                }
            },
            None => None,
        })
    }
}

impl OrderFeed {
    pub fn cancel(self) {}
}

/// Live feed of every order, reverse-chronological, one full snapshot per
/// change. Undecodable documents are skipped.
#[derive(Debug)]
pub struct OrdersFeed {
    pub(crate) inner: Option<QuerySubscription>,
}

#[async_trait]
impl LiveFeed for OrdersFeed {
    type Item = Vec<Order>;

    async fn recv(&mut self) -> Option<Self::Item> {
        let sub = self.inner.as_mut()?;
        let docs = sub.recv().await?;
        Some(document::decode_all(docs, "order"))
    }
}

impl OrdersFeed {
    pub fn cancel(self) {}
}
