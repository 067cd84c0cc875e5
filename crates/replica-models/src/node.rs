//! Singly linked node
//!
//! Nodes link through a `Value` so chains can close into rings.

use std::mem;

use replica_core::{impl_composite, Value};

pub struct Node {
    pub value: i64,
    pub next: Value,
}

impl_composite!(Node { value, next });

impl Node {
    pub fn new(value: i64) -> Value {
        Value::object(Node {
            value,
            next: Value::Null,
        })
    }

    /// Points `from.next` at `to`. Returns false if `from` is not a node.
    pub fn link(from: &Value, to: &Value) -> bool {
        from.downcast_mut(|n: &mut Node| n.next = to.clone()).is_some()
    }

    pub fn value_of(node: &Value) -> Option<i64> {
        node.downcast(|n: &Node| n.value)
    }

    pub fn next_of(node: &Value) -> Option<Value> {
        node.downcast(|n: &Node| n.next.clone())
    }

    /// Builds `1 -> 2 -> .. -> len` and returns the head (`Null` when empty).
    pub fn chain(len: usize) -> Value {
        let mut head = Value::Null;
        for value in (1..=len as i64).rev() {
            let node = Node::new(value);
            Node::link(&node, &head);
            head = node;
        }
        head
    }

    /// Like `chain`, with the last node linked back to the head.
    pub fn ring(len: usize) -> Value {
        let head = Node::chain(len);
        let mut tail = head.clone();
        while let Some(next) = Node::next_of(&tail) {
            if next.is_null() {
                break;
            }
            tail = next;
        }
        Node::link(&tail, &head);
        head
    }

    /// Values from `head` until the chain ends or returns to `head`.
    pub fn values(head: &Value) -> Vec<i64> {
        let mut out = Vec::new();
        let mut current = head.clone();
        while let Some(value) = Node::value_of(&current) {
            out.push(value);
            match Node::next_of(&current) {
                Some(next) if !next.is_null() && !next.same(head) => current = next,
                _ => break,
            }
        }
        out
    }

    /// Walks to the node `steps` links after `head`.
    pub fn nth(head: &Value, steps: usize) -> Option<Value> {
        let mut current = head.clone();
        for _ in 0..steps {
            current = Node::next_of(&current)?;
        }
        Some(current)
    }

    /// Unlinks every node reachable from `head`, one at a time.
    ///
    /// Dropping a long chain through nested destructors would exhaust the
    /// stack; this leaves each node with a `Null` successor first. Also breaks
    /// rings so their memory can be reclaimed.
    pub fn dismantle(head: &Value) {
        let mut current = head.clone();
        while let Some(next) = current.downcast_mut(|n: &mut Node| mem::take(&mut n.next)) {
            if next.is_null() {
                break;
            }
            current = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_links_in_order() {
        let head = Node::chain(3);
        assert_eq!(Node::values(&head), vec![1, 2, 3]);
        Node::dismantle(&head);
        assert_eq!(Node::values(&head), vec![1]);
    }

    #[test]
    fn ring_closes_on_head() {
        let head = Node::ring(4);
        assert_eq!(Node::values(&head), vec![1, 2, 3, 4]);
        let back = Node::nth(&head, 4).expect("ring");
        assert!(back.same(&head));
        Node::dismantle(&head);
    }

    #[test]
    fn empty_chain_is_null() {
        assert!(Node::chain(0).is_null());
        assert!(Node::values(&Value::Null).is_empty());
    }
}
