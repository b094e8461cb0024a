//! Async client API for a running arena.

use tokio::sync::{broadcast, mpsc, oneshot};

use raven_core::{
    BotSnapshot, Delivery, DispatchOutcome, EntityId, MessageKind, Payload, ScoreEntry, Team,
    Vector2D,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Cheap to clone; every call is a command round-trip to the simulation worker.
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Run `ticks` ticks right away. Returns the total number of ticks run
    /// since the runtime started.
    pub async fn step(&self, ticks: u64) -> Result<u64> {
        self.request(|reply| Command::Step { ticks, reply }).await
    }

    /// Start or stop the fixed tick cadence. Delayed telegrams keep draining
    /// either way.
    pub async fn set_running(&self, running: bool) -> Result<()> {
        self.request(|reply| Command::SetRunning { running, reply })
            .await
    }

    /// Register a bot; it spawns on the next tick.
    pub async fn add_bot(&self, team: Team) -> Result<EntityId> {
        self.request(|reply| Command::AddBot { team, reply }).await?
    }

    pub async fn remove_bot(&self, bot: EntityId) -> Result<()> {
        self.request(|reply| Command::RemoveBot { bot, reply }).await?
    }

    /// Hand a living bot to the human player. `Ok(false)` if it is not alive.
    pub async fn possess(&self, bot: EntityId) -> Result<bool> {
        self.request(|reply| Command::Possess { bot, reply }).await?
    }

    /// Return the possessed bot, if any, to AI control.
    pub async fn exorcise(&self) -> Result<Option<EntityId>> {
        self.request(|reply| Command::Exorcise { reply }).await
    }

    pub async fn move_possessed_to(&self, destination: Vector2D, queue: bool) -> Result<bool> {
        self.request(|reply| Command::MovePossessed {
            destination,
            queue,
            reply,
        })
        .await
    }

    /// Send a telegram from outside the simulation.
    pub async fn dispatch(
        &self,
        delivery: Delivery,
        sender: EntityId,
        receiver: EntityId,
        kind: MessageKind,
        payload: Payload,
    ) -> Result<DispatchOutcome> {
        self.request(|reply| Command::Dispatch {
            delivery,
            sender,
            receiver,
            kind,
            payload,
            reply,
        })
        .await
    }

    pub async fn bot(&self, bot: EntityId) -> Result<Option<BotSnapshot>> {
        self.request(|reply| Command::QueryBot { bot, reply }).await
    }

    pub async fn scoreboard(&self) -> Result<Vec<ScoreEntry>> {
        self.request(|reply| Command::Scoreboard { reply }).await
    }

    /// Ticks run so far and the current simulated time.
    pub async fn time(&self) -> Result<(u64, f64)> {
        self.request(|reply| Command::QueryTime { reply }).await
    }

    /// Events published before this call are not replayed.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
