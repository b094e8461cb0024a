use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::Telegram;

#[derive(Debug)]
struct Pending {
    seq: u64,
    telegram: Telegram,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    // Reversed so the max-heap yields the earliest telegram, oldest first on ties.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .telegram
            .dispatch_time
            .total_cmp(&self.telegram.dispatch_time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Pending telegrams ordered by dispatch time, then by insertion.
#[derive(Debug, Default)]
pub struct MessageQueue {
    heap: BinaryHeap<Pending>,
    next_seq: u64,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, telegram: Telegram) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Pending { seq, telegram });
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Dispatch time of the earliest pending telegram.
    pub fn next_due(&self) -> Option<f64> {
        self.heap.peek().map(|pending| pending.telegram.dispatch_time)
    }

    /// Removes the earliest telegram if it is due at `now`.
    pub fn pop_due(&mut self, now: f64) -> Option<Telegram> {
        if self.next_due()? > now {
            return None;
        }
        self.heap.pop().map(|pending| pending.telegram)
    }

    /// Removes every telegram due at `now`, earliest first.
    pub fn drain_due(&mut self, now: f64) -> Vec<Telegram> {
        let mut due = Vec::new();
        while let Some(telegram) = self.pop_due(now) {
            due.push(telegram);
        }
        due
    }

    pub fn iter(&self) -> impl Iterator<Item = &Telegram> {
        self.heap.iter().map(|pending| &pending.telegram)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::{MessageKind, Payload};
    use crate::types::EntityId;

    fn telegram(receiver: u32, at: f64) -> Telegram {
        Telegram::new(
            EntityId(0),
            EntityId(receiver),
            MessageKind::TeamTarget,
            at,
            Payload::None,
        )
    }

    #[test]
    fn drains_in_dispatch_time_order() {
        let mut queue = MessageQueue::new();
        queue.push(telegram(1, 3.0));
        queue.push(telegram(2, 1.0));
        queue.push(telegram(3, 2.0));

        let receivers: Vec<u32> = queue.drain_due(10.0).iter().map(|t| t.receiver.0).collect();
        assert_eq!(receivers, vec![2, 3, 1]);
        assert!(queue.is_empty());
    }

    #[test]
    fn equal_times_keep_insertion_order() {
        let mut queue = MessageQueue::new();
        for receiver in 0..16 {
            queue.push(telegram(receiver, 5.0));
        }
        queue.push(telegram(99, 4.0));

        let receivers: Vec<u32> = queue.drain_due(5.0).iter().map(|t| t.receiver.0).collect();
        let mut expected = vec![99];
        expected.extend(0..16);
        assert_eq!(receivers, expected);
    }

    #[test]
    fn future_telegrams_stay_queued() {
        let mut queue = MessageQueue::new();
        queue.push(telegram(1, 12.0));

        assert!(queue.pop_due(11.999).is_none());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_due(12.0).map(|t| t.receiver), Some(EntityId(1)));
        assert!(queue.is_empty());
    }
}
