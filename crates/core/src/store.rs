//! In-memory order collection for one session.
//!
//! The store is append-only and insertion-ordered. It is an owned value passed to whoever
//! needs it, not a process-wide singleton, and nothing in it survives the session.

use crate::code::next_code;
use crate::order::{Order, OrderCode};

#[derive(Clone, Debug, Default)]
pub struct OrderStore {
    orders: Vec<Order>,
}

impl OrderStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `orders`, in the given order.
    pub fn with_orders(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    /// Adds `order` to the end of the collection. Never rejects.
    pub fn append(&mut self, order: Order) {
        tracing::info!(
            "recorded order {} ({}, net {})",
            order.code(),
            order.procedure_name(),
            order.net_price()
        );
        self.orders.push(order);
    }

    /// Assigns the next code for `procedure_name`, builds the order with it and appends it.
    ///
    /// Reading the current highest code and appending happen under the same exclusive
    /// borrow, so no other append can slip in between.
    pub fn append_with_next_code<F>(&mut self, procedure_name: &str, build: F) -> &Order
    where
        F: FnOnce(OrderCode) -> Order,
    {
        let code = next_code(procedure_name, &self.orders);
        let index = self.orders.len();
        self.append(build(code));
        &self.orders[index]
    }

    /// The next code `procedure_name` would receive, without recording anything.
    pub fn peek_next_code(&self, procedure_name: &str) -> OrderCode {
        next_code(procedure_name, &self.orders)
    }

    /// Every order in insertion order. The slice is read-only.
    pub fn all(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::order_with_code;

    #[test]
    fn test_append_preserves_insertion_order() {
        let mut store = OrderStore::new();
        store.append(order_with_code("BG002"));
        store.append(order_with_code("GS001"));
        store.append(order_with_code("BG001"));

        let codes: Vec<&str> = store.all().iter().map(|o| o.code().as_str()).collect();
        assert_eq!(codes, vec!["BG002", "GS001", "BG001"]);
    }

    #[test]
    fn test_append_accepts_duplicate_codes() {
        let mut store = OrderStore::new();
        store.append(order_with_code("BG001"));
        store.append(order_with_code("BG001"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_append_with_next_code_assigns_sequentially() {
        let mut store = OrderStore::with_orders(vec![order_with_code("BG001")]);

        let first = store
            .append_with_next_code("boneGraft", |code| order_with_code(code.as_str()))
            .code()
            .clone();
        let second = store
            .append_with_next_code("Bone graft", |code| order_with_code(code.as_str()))
            .code()
            .clone();

        assert_eq!(first.as_str(), "BG002");
        assert_eq!(second.as_str(), "BG003");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_peek_does_not_record() {
        let store = OrderStore::new();
        assert_eq!(store.peek_next_code("rootCanal").as_str(), "RT001");
        assert_eq!(store.peek_next_code("rootCanal").as_str(), "RT001");
        assert!(store.is_empty());
    }

    #[test]
    fn test_returned_orders_are_copies() {
        let mut store = OrderStore::new();
        store.append(order_with_code("GS001"));

        let mut snapshot = store.all().to_vec();
        snapshot.clear();

        assert_eq!(store.len(), 1);
    }
}
