//! Simulation worker that owns the authoritative [`raven_core::World`].
//!
//! Receives commands from [`crate::RuntimeHandle`], advances the world on the
//! tick cadence, drains delayed telegrams on the drain cadence, and publishes
//! [`Event`] notifications.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use raven_core::{
    Bot, BotSnapshot, BotStatus, Delivery, DispatchOutcome, EntityId, MessageKind, Outbox,
    Payload, ScoreEntry, Team, Vector2D, World, WorldView,
};

use crate::api::Result;
use crate::events::{Event, EventBus, TickEvent, Topic, extract_events};
use crate::runtime::RuntimeConfig;

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Run `ticks` ticks immediately, independent of the cadence.
    Step {
        ticks: u64,
        reply: oneshot::Sender<u64>,
    },
    /// Start or stop the tick cadence.
    SetRunning {
        running: bool,
        reply: oneshot::Sender<()>,
    },
    AddBot {
        team: Team,
        reply: oneshot::Sender<Result<EntityId>>,
    },
    RemoveBot {
        bot: EntityId,
        reply: oneshot::Sender<Result<()>>,
    },
    Possess {
        bot: EntityId,
        reply: oneshot::Sender<Result<bool>>,
    },
    Exorcise {
        reply: oneshot::Sender<Option<EntityId>>,
    },
    MovePossessed {
        destination: Vector2D,
        queue: bool,
        reply: oneshot::Sender<bool>,
    },
    Dispatch {
        delivery: Delivery,
        sender: EntityId,
        receiver: EntityId,
        kind: MessageKind,
        payload: Payload,
        reply: oneshot::Sender<DispatchOutcome>,
    },
    QueryBot {
        bot: EntityId,
        reply: oneshot::Sender<Option<BotSnapshot>>,
    },
    Scoreboard {
        reply: oneshot::Sender<Vec<ScoreEntry>>,
    },
    QueryTime {
        reply: oneshot::Sender<(u64, f64)>,
    },
}

/// Background task that owns the world and processes commands.
pub struct SimulationWorker {
    world: World,
    config: RuntimeConfig,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    running: bool,
    ticks: u64,
}

impl SimulationWorker {
    /// Creates a new simulation worker.
    pub fn new(
        mut world: World,
        config: RuntimeConfig,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        world.set_event_recording(true);
        Self {
            world,
            running: config.autostart,
            config,
            command_rx,
            event_bus,
            ticks: 0,
        }
    }

    /// Main worker loop. Ends when every handle has been dropped.
    pub async fn run(mut self) {
        let mut tick_timer = interval(self.config.tick_interval);
        let mut drain_timer = interval(self.config.drain_interval);

        info!(
            target: "runtime::worker",
            bots = self.world.bot_ids().len(),
            running = self.running,
            "simulation worker started"
        );

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd).await,
                    None => break,
                },
                _ = tick_timer.tick(), if self.running => {
                    self.step().await;
                }
                _ = drain_timer.tick() => {
                    let delivered = self.world.dispatch_delayed_messages();
                    if delivered > 0 {
                        self.publish_world_events();
                    }
                }
            }
        }

        info!(target: "runtime::worker", ticks = self.ticks, "simulation worker stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Step { ticks, reply } => {
                for _ in 0..ticks {
                    self.step().await;
                }
                let _ = reply.send(self.ticks);
            }
            Command::SetRunning { running, reply } => {
                debug!(target: "runtime::worker", running, "tick cadence toggled");
                self.running = running;
                let _ = reply.send(());
            }
            Command::AddBot { team, reply } => {
                let result = self.world.add_bot(team).map_err(Into::into);
                let _ = reply.send(result);
            }
            Command::RemoveBot { bot, reply } => {
                let result = self.world.remove_bot(bot).map_err(Into::into);
                let _ = reply.send(result);
            }
            Command::Possess { bot, reply } => {
                let result = self.world.possess(bot).map_err(Into::into);
                let _ = reply.send(result);
            }
            Command::Exorcise { reply } => {
                let _ = reply.send(self.world.exorcise());
            }
            Command::MovePossessed {
                destination,
                queue,
                reply,
            } => {
                let _ = reply.send(self.world.move_possessed_to(destination, queue));
            }
            Command::Dispatch {
                delivery,
                sender,
                receiver,
                kind,
                payload,
                reply,
            } => {
                let outcome = self
                    .world
                    .dispatch_message(delivery, sender, receiver, kind, payload);
                let _ = reply.send(outcome);
            }
            Command::QueryBot { bot, reply } => {
                let _ = reply.send(WorldView::bot(&self.world, bot));
            }
            Command::Scoreboard { reply } => {
                let _ = reply.send(self.world.scoreboard());
            }
            Command::QueryTime { reply } => {
                let _ = reply.send((self.ticks, self.world.now()));
            }
        }
        self.publish_world_events();
    }

    /// Advances the world by one tick.
    async fn step(&mut self) {
        let dt = self.config.seconds_per_tick;
        if self.config.parallel_bots {
            self.world.begin_tick(dt);
            self.world.update_projectiles();
            self.world.update_lifecycle();
            self.update_bots_in_parallel(dt).await;
            self.world.finish_tick();
        } else {
            self.world.tick(dt);
        }

        self.ticks += 1;
        self.publish_world_events();
        self.event_bus.publish(Event::Tick(TickEvent {
            tick: self.ticks,
            time: self.world.now(),
            alive_bots: self
                .world
                .scoreboard()
                .iter()
                .filter(|entry| entry.status == BotStatus::Alive)
                .count(),
            projectiles: self.world.projectiles().len(),
        }));
    }

    /// Updates every living bot against one frozen snapshot on the blocking
    /// pool, then restores them and applies their outboxes in id order. A bot
    /// whose task fails is removed from the world.
    async fn update_bots_in_parallel(&mut self, dt: f64) {
        let snapshot = Arc::new(self.world.snapshot());
        let now = self.world.now();

        let mut tasks = JoinSet::new();
        for mut bot in self.world.checkout_alive_bots() {
            let view = Arc::clone(&snapshot);
            tasks.spawn_blocking(move || {
                let mut outbox = Outbox::new();
                bot.update(view.as_ref(), now, dt, &mut outbox);
                (bot, outbox)
            });
        }

        let mut updated: Vec<(Box<Bot>, Outbox)> = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => updated.push(result),
                Err(error) => {
                    warn!(target: "runtime::worker", %error, "bot update task failed");
                }
            }
        }
        updated.sort_by_key(|(bot, _)| bot.id());

        let mut outboxes = Vec::with_capacity(updated.len());
        for (bot, outbox) in updated {
            self.world.restore_bot(bot);
            outboxes.push(outbox);
        }
        for lost in self.world.reclaim_lost_bots() {
            warn!(target: "runtime::worker", bot = %lost, "bot lost during update, removed");
        }
        for outbox in outboxes {
            self.world.flush_outbox(outbox);
        }
    }

    fn publish_world_events(&mut self) {
        let events = self.world.drain_events();
        if events.is_empty() {
            return;
        }
        let messaging = self.event_bus.has_subscribers(Topic::Messaging);
        for event in extract_events(events, self.world.now()) {
            if event.topic() == Topic::Messaging && !messaging {
                continue;
            }
            self.event_bus.publish(event);
        }
    }
}

/// Interval that never fires faster than once per millisecond and does not
/// burst after a slow tick.
fn interval(period: Duration) -> Interval {
    let mut timer = tokio::time::interval(period.max(Duration::from_millis(1)));
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}
