//! # Cart Events
//!
//! Fan-out of cart changes to every open view (cart drawer, header badge,
//! other tabs).
//!
//! ```text
//!   CartStore ──publish──► broadcast::Sender<CartEvent>
//!                                   │
//!                 ┌─────────────────┼─────────────────┐
//!                 ▼                 ▼                 ▼
//!            Receiver          Receiver          Receiver
//! ```

use brew_core::Cart;
use tokio::sync::broadcast;
use tracing::trace;

/// A change to the cart. Carries the cart as it is after the change.
#[derive(Debug, Clone, PartialEq)]
pub enum CartEvent {
    /// Items or promotion changed.
    Updated(Cart),
    /// The cart was reset.
    Cleared(Cart),
    /// The cart was re-read from storage.
    Reloaded(Cart),
}

impl CartEvent {
    pub fn cart(&self) -> &Cart {
        match self {
            CartEvent::Updated(cart) | CartEvent::Cleared(cart) | CartEvent::Reloaded(cart) => cart,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CartEvent::Updated(_) => "updated",
            CartEvent::Cleared(_) => "cleared",
            CartEvent::Reloaded(_) => "reloaded",
        }
    }
}

/// Broadcast channel for cart events.
#[derive(Debug, Clone)]
pub struct CartEvents {
    tx: broadcast::Sender<CartEvent>,
}

impl CartEvents {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        CartEvents { tx }
    }

    /// Sends `event` to every subscriber.
    ///
    /// Returns how many subscribers received it. Zero subscribers is normal.
    pub fn publish(&self, event: CartEvent) -> usize {
        let kind = event.kind();
        let delivered = self.tx.send(event).unwrap_or(0);
        trace!(kind, delivered, "Cart event published");
        delivered
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.tx.subscribe()
    }
}

impl Default for CartEvents {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_subscriber_sees_event() {
        let events = CartEvents::new(4);
        let mut first = events.subscribe();
        let mut second = events.subscribe();

        let cart = Cart::new();
        assert_eq!(events.publish(CartEvent::Cleared(cart.clone())), 2);

        assert_eq!(first.recv().await.unwrap().cart().id, cart.id);
        assert_eq!(second.recv().await.unwrap().kind(), "cleared");
    }

    #[test]
    fn test_publish_without_subscribers() {
        let events = CartEvents::default();
        assert_eq!(events.publish(CartEvent::Updated(Cart::new())), 0);
    }
}
