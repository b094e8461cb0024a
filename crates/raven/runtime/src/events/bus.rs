//! Topic-routed broadcast of runtime events.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;

use super::types::{CombatEvent, MessagingEvent, TickEvent};

/// Routing key for [`Event`]s.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Spawns, deaths, explosions and roster changes
    Combat,
    /// Telegram deliveries and drops
    Messaging,
    /// One event per completed tick
    Tick,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Combat, Topic::Messaging, Topic::Tick];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Combat(CombatEvent),
    Messaging(MessagingEvent),
    Tick(TickEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Combat(_) => Topic::Combat,
            Event::Messaging(_) => Topic::Messaging,
            Event::Tick(_) => Topic::Tick,
        }
    }
}

/// Fan-out of simulation events, one broadcast channel per [`Topic`].
///
/// Every topic is wired at construction, so subscribing never fails. A slow
/// subscriber lags and loses its oldest events; the simulation never waits.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<TopicChannels>,
}

struct TopicChannels {
    combat: broadcast::Sender<Event>,
    messaging: broadcast::Sender<Event>,
    tick: broadcast::Sender<Event>,
}

impl TopicChannels {
    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Combat => &self.combat,
            Topic::Messaging => &self.messaging,
            Topic::Tick => &self.tick,
        }
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Sizes every topic's ring buffer to `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(TopicChannels {
                combat: broadcast::channel(capacity).0,
                messaging: broadcast::channel(capacity).0,
                tick: broadcast::channel(capacity).0,
            }),
        }
    }

    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels.sender(topic).send(event).is_err() {
            trace!(target: "runtime::events", ?topic, "event published without subscribers");
        }
    }

    /// Whether anybody currently listens on `topic`.
    pub fn has_subscribers(&self, topic: Topic) -> bool {
        self.channels.sender(topic).receiver_count() > 0
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.sender(topic).subscribe()
    }

    /// One receiver per requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
