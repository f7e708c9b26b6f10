use futures::{stream, Stream};
use serde_json::Value;
use tokio::sync::broadcast;

/// New orders, delivered to the owning restaurant's subscription.
pub const ORDER_PENDING: &str = "orders.pending";
/// Status changes on existing orders.
pub const ORDER_UPDATES: &str = "orders.updates";

const CHANNEL_CAPACITY: usize = 256;

#[derive(Clone, Debug)]
pub struct Event {
    pub name: &'static str,
    pub payload: Value,
}

/// In-process publish/subscribe channel. Every subscriber sees events in
/// publish order, starting from the moment it subscribed; events published
/// before that are never replayed. A deployment spanning multiple processes
/// would need an external broker instead.
#[derive(Clone)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn publish(&self, name: &'static str, payload: Value) {
        // A send error only means nobody is subscribed right now.
        if let Err(err) = self.tx.send(Event { name, payload }) {
            tracing::debug!("No subscribers for {}: {}", name, err);
        }
    }

    /// Returns a lazy, non-restartable stream of payloads published to
    /// `name`. Payloads failing `filter` are silently dropped. The stream
    /// ends only when the bus itself is dropped.
    pub fn subscribe<F>(&self, name: &'static str, filter: F) -> impl Stream<Item = Value> + Send
    where
        F: FnMut(&Value) -> bool + Send + 'static,
    {
        let rx = self.tx.subscribe();

        stream::unfold((rx, filter), move |(mut rx, mut filter)| async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        if event.name == name && filter(&event.payload) {
                            return Some((event.payload, (rx, filter)));
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("Subscriber lagged, skipped {} events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        })
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use serde_json::json;

    #[tokio::test]
    async fn filtered_payloads_are_dropped() {
        let bus = Bus::new();
        let mut updates = Box::pin(
            bus.subscribe(ORDER_UPDATES, |payload| payload["id"] == json!("order-1")),
        );

        bus.publish(ORDER_UPDATES, json!({ "id": "order-2" }));
        bus.publish(ORDER_UPDATES, json!({ "id": "order-1" }));

        let delivered = updates.next().await.unwrap();
        assert_eq!(delivered["id"], json!("order-1"));
    }

    #[tokio::test]
    async fn events_are_scoped_by_name() {
        let bus = Bus::new();
        let mut pending = Box::pin(bus.subscribe(ORDER_PENDING, |_| true));

        bus.publish(ORDER_UPDATES, json!({ "id": "order-1" }));
        bus.publish(ORDER_PENDING, json!({ "id": "order-2" }));

        let delivered = pending.next().await.unwrap();
        assert_eq!(delivered["id"], json!("order-2"));
    }

    #[tokio::test]
    async fn matching_publish_is_delivered_exactly_once() {
        let bus = Bus::new();
        let mut updates = Box::pin(
            bus.subscribe(ORDER_UPDATES, |payload| payload["id"] == json!("order-1")),
        );

        bus.publish(ORDER_UPDATES, json!({ "id": "order-1", "seq": 1 }));
        bus.publish(ORDER_UPDATES, json!({ "id": "order-1", "seq": 2 }));

        assert_eq!(updates.next().await.unwrap()["seq"], json!(1));
        assert_eq!(updates.next().await.unwrap()["seq"], json!(2));
    }

    #[tokio::test]
    async fn no_replay_of_events_before_subscription() {
        let bus = Bus::new();
        bus.publish(ORDER_UPDATES, json!({ "id": "order-0" }));

        let mut updates = Box::pin(bus.subscribe(ORDER_UPDATES, |_| true));
        bus.publish(ORDER_UPDATES, json!({ "id": "order-1" }));

        let delivered = updates.next().await.unwrap();
        assert_eq!(delivered["id"], json!("order-1"));
    }
}
