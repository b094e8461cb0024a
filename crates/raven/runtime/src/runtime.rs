//! Entry point for hosting an arena.
//!
//! [`RuntimeBuilder`] assembles a [`World`](raven_core::World), starts the
//! simulation worker on the current tokio runtime and hands back a [`Runtime`].

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use raven_core::{ArenaLayout, BotConfig, Team, WeaponConfig, World};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::workers::{Command, SimulationWorker};

/// Cadence and channel sizing for a [`Runtime`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Wall-clock time between automatic ticks.
    pub tick_interval: Duration,
    /// Simulated seconds each tick advances the world by.
    pub seconds_per_tick: f64,
    /// Wall-clock time between delayed-telegram drains.
    pub drain_interval: Duration,
    /// Tick on the cadence as soon as the worker starts.
    pub autostart: bool,
    /// Update living bots concurrently against a frozen snapshot.
    pub parallel_bots: bool,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(16),
            seconds_per_tick: 1.0 / 60.0,
            drain_interval: Duration::from_millis(5),
            autostart: true,
            parallel_bots: true,
            event_buffer_size: 256,
            command_buffer_size: 32,
        }
    }
}

/// A running arena. Owns the simulation worker; clients talk to it through
/// [`RuntimeHandle`]s.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Waits for the worker to exit, which happens once every outstanding
    /// handle has been dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        info!(target: "runtime::worker", "runtime shut down");
        Ok(())
    }
}

/// Collects the arena, configs and starting roster for a [`Runtime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    world: Option<World>,
    layout: Option<ArenaLayout>,
    bot_config: BotConfig,
    weapon_config: WeaponConfig,
    seed: u64,
    bots: Vec<Team>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            world: None,
            layout: None,
            bot_config: BotConfig::default(),
            weapon_config: WeaponConfig::default(),
            seed: 0,
            bots: Vec::new(),
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide a fully built world. Takes precedence over
    /// [`layout`](Self::layout) and the configs.
    pub fn world(mut self, world: World) -> Self {
        self.world = Some(world);
        self
    }

    /// Arena the world is built from when no world is provided
    pub fn layout(mut self, layout: ArenaLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn bot_config(mut self, config: BotConfig) -> Self {
        self.bot_config = config;
        self
    }

    pub fn weapon_config(mut self, config: WeaponConfig) -> Self {
        self.weapon_config = config;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Register a bot of `team` before the worker starts.
    pub fn bot(mut self, team: Team) -> Self {
        self.bots.push(team);
        self
    }

    /// Builds the world, registers the queued bots and spawns the worker.
    pub async fn build(self) -> Result<Runtime> {
        let mut world = match (self.world, self.layout) {
            (Some(world), _) => world,
            (None, Some(layout)) => {
                World::new(layout, self.bot_config, self.weapon_config, self.seed)
            }
            (None, None) => return Err(RuntimeError::MissingWorld),
        };
        for team in self.bots {
            world.add_bot(team)?;
        }

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sim_worker = SimulationWorker::new(world, self.config, command_rx, event_bus);
        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            sim_worker_handle,
        })
    }
}
