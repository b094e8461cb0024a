use tracing::trace;

use super::{Delivery, MessageKind, MessageQueue, Payload, Telegram};
use crate::types::EntityId;

/// Result of routing one dispatch request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Routing {
    /// Hand the telegram to its receiver now.
    Deliver(Telegram),
    /// Stored in the delayed queue.
    Queued,
}

/// Stamps telegrams and owns the delayed-delivery queue.
///
/// Resolving the receiver is left to the owner of the entities, which keeps
/// the dispatcher free of any reference to the registry.
#[derive(Debug, Default)]
pub struct MessageDispatcher {
    queue: MessageQueue,
}

impl MessageDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the telegram for a dispatch request issued at `now`.
    ///
    /// Immediate requests, and delayed ones whose delay collapses to zero,
    /// come back as [`Routing::Deliver`]. Everything else is queued.
    pub fn route(
        &mut self,
        now: f64,
        delivery: Delivery,
        sender: EntityId,
        receiver: EntityId,
        kind: MessageKind,
        payload: Payload,
    ) -> Routing {
        let delay = delivery.delay();
        let telegram = Telegram::new(sender, receiver, kind, now + delay, payload);
        if delay <= 0.0 {
            return Routing::Deliver(telegram);
        }

        trace!(
            target: "raven::dispatch",
            %telegram,
            delay,
            "queued delayed telegram"
        );
        self.queue.push(telegram);
        Routing::Queued
    }

    /// Next telegram whose dispatch time is at or before `now`.
    pub fn pop_due(&mut self, now: f64) -> Option<Telegram> {
        self.queue.pop_due(now)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn queue(&self) -> &MessageQueue {
        &self.queue
    }
}
