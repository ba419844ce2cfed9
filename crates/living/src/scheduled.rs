//! A timeline of values keyed by the tick they become due.

use std::{
    cmp::{Ordering, Reverse},
    collections::{BinaryHeap, binary_heap::PeekMut},
};

struct Entry<V> {
    at: u64,
    // insertion order, so values due on the same tick come out first in, first out
    seq: u64,
    value: V,
}

impl<V> Entry<V> {
    const fn key(&self) -> (u64, u64) {
        (self.at, self.seq)
    }
}

impl<V> Eq for Entry<V> {}

impl<V> PartialEq for Entry<V> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<V> Ord for Entry<V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl<V> PartialOrd for Entry<V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub struct Timeline<V> {
    // min-heap
    queue: BinaryHeap<Reverse<Entry<V>>>,
    next_seq: u64,
}

impl<V> Default for Timeline<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Timeline<V> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Schedules `value` to become due at tick `at`.
    pub fn schedule(&mut self, at: u64, value: V) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry { at, seq, value }));
    }

    /// Removes and yields every value due at or before `now`, earliest first.
    pub fn pop_due(&mut self, now: u64) -> impl Iterator<Item = V> + '_ {
        std::iter::from_fn(move || {
            let peek = self.queue.peek_mut()?;

            (peek.0.at <= now).then(|| PeekMut::pop(peek).0.value)
        })
    }

    #[must_use]
    pub fn peek(&self) -> Option<(u64, &V)> {
        self.queue.peek().map(|Reverse(entry)| (entry.at, &entry.value))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
