//! Telegrams, the delayed-delivery queue and the per-update outbox.
mod dispatcher;
mod outbox;
mod queue;
mod telegram;

pub use dispatcher::{MessageDispatcher, Routing};
pub use outbox::{Gunshot, Outbox, OutgoingMessage};
pub use queue::MessageQueue;
pub use telegram::{Delivery, MessageKind, Payload, Telegram};

/// What happened to a dispatched telegram.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The receiver's handler ran. `consumed` is its return value.
    Delivered { consumed: bool },
    /// Stored for a later drain.
    Queued,
    /// The receiver no longer exists.
    Dropped,
}
