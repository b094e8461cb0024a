//! Converts world events into topic events.

use raven_core::WorldEvent;

use super::{CombatEvent, Event, MessagingEvent};

/// Maps events drained from the world to bus events, stamping them with the
/// simulated time they were drained at.
pub fn extract_events(events: Vec<WorldEvent>, time: f64) -> Vec<Event> {
    events
        .into_iter()
        .map(|event| match event {
            WorldEvent::BotAdded { bot, team } => Event::Combat(CombatEvent::BotAdded { bot, team }),
            WorldEvent::BotRemoved { bot } => Event::Combat(CombatEvent::BotRemoved { bot }),
            WorldEvent::BotSpawned { bot, position } => {
                Event::Combat(CombatEvent::BotSpawned {
                    bot,
                    position,
                    time,
                })
            }
            WorldEvent::BotKilled { victim, killer } => Event::Combat(CombatEvent::BotKilled {
                victim,
                killer,
                time,
            }),
            WorldEvent::Exploded(explosion) => {
                Event::Combat(CombatEvent::Explosion { explosion, time })
            }
            WorldEvent::TelegramDelivered { telegram, consumed } => {
                Event::Messaging(MessagingEvent::Delivered { telegram, consumed })
            }
            WorldEvent::TelegramDropped { telegram } => {
                Event::Messaging(MessagingEvent::Dropped { telegram })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Topic;
    use raven_core::{EntityId, MessageKind, Payload, Telegram};

    #[test]
    fn routing_events_land_on_the_messaging_topic() {
        let telegram = Telegram::new(
            EntityId(1),
            EntityId(2),
            MessageKind::Damage,
            0.0,
            Payload::Damage(5),
        );
        let events = extract_events(
            vec![
                WorldEvent::TelegramDropped { telegram },
                WorldEvent::BotKilled {
                    victim: EntityId(2),
                    killer: EntityId(1),
                },
            ],
            3.0,
        );

        let topics: Vec<_> = events.iter().map(Event::topic).collect();
        assert_eq!(topics, vec![Topic::Messaging, Topic::Combat]);
        assert_eq!(
            events[1],
            Event::Combat(CombatEvent::BotKilled {
                victim: EntityId(2),
                killer: EntityId(1),
                time: 3.0,
            })
        );
    }
}
