//! The game world: entity registry, message routing, projectiles and the
//! per-tick update order.
//!
//! Bots never hold references to each other. A bot being updated or handling
//! a telegram is checked out of the [`EntityRegistry`], sees the rest of the
//! world through [`WorldView`], and writes its side effects to an [`Outbox`]
//! that the world applies once the bot is back in place. Immediate telegrams
//! found in an outbox are delivered before the call that flushed it returns.
mod cache;
mod registry;
mod snapshot;

pub use cache::WeaponCache;
pub use registry::{Entity, EntityRegistry};
pub use snapshot::ArenaSnapshot;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::bot::Bot;
use crate::config::{BotConfig, WeaponConfig};
use crate::env::{ArenaLayout, BotSnapshot, CacheSnapshot, TunablesOracle, WorldView};
use crate::error::WorldError;
use crate::math::{Vector2D, Wall2D};
use crate::messaging::{
    Delivery, DispatchOutcome, MessageDispatcher, MessageKind, Outbox, Payload, Routing, Telegram,
};
use crate::projectile::{Explosion, Projectile};
use crate::time::SimClock;
use crate::types::{BotStatus, EntityId, Team};

/// Notable things that happened inside the world since the last
/// [`World::drain_events`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorldEvent {
    BotAdded { bot: EntityId, team: Team },
    BotRemoved { bot: EntityId },
    BotSpawned { bot: EntityId, position: Vector2D },
    BotKilled { victim: EntityId, killer: EntityId },
    Exploded(Explosion),
    TelegramDelivered { telegram: Telegram, consumed: bool },
    TelegramDropped { telegram: Telegram },
}

/// One row of the scoreboard.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreEntry {
    pub bot: EntityId,
    pub team: Team,
    pub status: BotStatus,
    pub health: i32,
    pub score: u32,
}

#[derive(Debug)]
pub struct World {
    layout: ArenaLayout,
    walls: Arc<[Wall2D]>,
    clock: SimClock,
    dispatcher: MessageDispatcher,
    registry: EntityRegistry,
    projectiles: Vec<Projectile>,
    bot_config: Arc<BotConfig>,
    weapon_config: Arc<WeaponConfig>,
    seed: u64,
    spawn_cursor: usize,
    possessed: Option<EntityId>,
    /// Team and leadership of bots handed out by `checkout_alive_bots`.
    checked_out: BTreeMap<EntityId, (Team, bool)>,
    record_events: bool,
    events: Vec<WorldEvent>,
}

impl World {
    /// Builds a world from `layout`. Weapon caches listed in the layout are
    /// registered straight away; bots are added with [`add_bot`](Self::add_bot).
    pub fn new(
        layout: ArenaLayout,
        bot_config: BotConfig,
        weapon_config: WeaponConfig,
        seed: u64,
    ) -> Self {
        let mut registry = EntityRegistry::new();
        for spec in layout.caches() {
            let mut cache = WeaponCache::new(
                registry.allocate_id(),
                spec.team,
                spec.position,
                spec.radius,
            );
            for kind in &spec.weapons {
                cache.add_weapon(*kind);
            }
            registry.insert(Entity::WeaponCache(cache));
        }

        Self {
            walls: layout.walls().into(),
            layout,
            clock: SimClock::new(),
            dispatcher: MessageDispatcher::new(),
            registry,
            projectiles: Vec::new(),
            bot_config: Arc::new(bot_config),
            weapon_config: Arc::new(weapon_config),
            seed,
            spawn_cursor: 0,
            possessed: None,
            checked_out: BTreeMap::new(),
            record_events: false,
            events: Vec::new(),
        }
    }

    /// Builds a world whose configuration is resolved from `tunables`.
    /// Any missing or malformed tunable aborts construction.
    pub fn from_tunables(
        layout: ArenaLayout,
        tunables: &dyn TunablesOracle,
        seed: u64,
    ) -> Result<Self, WorldError> {
        let bot_config = BotConfig::from_oracle(tunables)?;
        let weapon_config = WeaponConfig::from_oracle(tunables)?;
        Ok(Self::new(layout, bot_config, weapon_config, seed))
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn layout(&self) -> &ArenaLayout {
        &self.layout
    }

    pub fn bot_config(&self) -> &BotConfig {
        &self.bot_config
    }

    pub fn weapon_config(&self) -> &WeaponConfig {
        &self.weapon_config
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn bot(&self, id: EntityId) -> Option<&Bot> {
        self.registry.bot(id)
    }

    pub fn bot_mut(&mut self, id: EntityId) -> Option<&mut Bot> {
        self.registry.bot_mut(id)
    }

    pub fn bot_ids(&self) -> Vec<EntityId> {
        self.registry.bot_ids()
    }

    pub fn caches(&self) -> impl Iterator<Item = &WeaponCache> {
        self.registry.caches()
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn pending_messages(&self) -> usize {
        self.dispatcher.pending()
    }

    pub fn possessed(&self) -> Option<EntityId> {
        self.possessed
    }

    /// Turns [`WorldEvent`] recording on or off. Off by default.
    pub fn set_event_recording(&mut self, enabled: bool) {
        self.record_events = enabled;
        if !enabled {
            self.events.clear();
        }
    }

    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    /// Scores of every bot in id order.
    pub fn scoreboard(&self) -> Vec<ScoreEntry> {
        self.registry
            .bots()
            .map(|bot| ScoreEntry {
                bot: bot.id(),
                team: bot.team(),
                status: bot.status(),
                health: bot.health(),
                score: bot.score(),
            })
            .collect()
    }

    /// Frozen copy of everything a bot can observe.
    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            walls: Arc::clone(&self.walls),
            bots: WorldView::bots(self),
            caches: self.weapon_caches(),
            team_mode: self.layout.is_team_mode(),
            extent: self.layout.extent(),
        }
    }

    // ------------------------------------------------------------------
    // Messaging
    // ------------------------------------------------------------------

    /// Sends a telegram stamped with the current time.
    ///
    /// Immediate telegrams are handled, along with everything their handler
    /// sends immediately in turn, before this returns.
    pub fn dispatch_message(
        &mut self,
        delivery: Delivery,
        sender: EntityId,
        receiver: EntityId,
        kind: MessageKind,
        payload: Payload,
    ) -> DispatchOutcome {
        let now = self.clock.now();
        match self
            .dispatcher
            .route(now, delivery, sender, receiver, kind, payload)
        {
            Routing::Deliver(telegram) => self.deliver(telegram),
            Routing::Queued => DispatchOutcome::Queued,
        }
    }

    /// Delivers every queued telegram that is due, earliest first.
    pub fn dispatch_delayed_messages(&mut self) -> usize {
        let now = self.clock.now();
        let mut delivered = 0;
        while let Some(telegram) = self.dispatcher.pop_due(now) {
            self.deliver(telegram);
            delivered += 1;
        }
        delivered
    }

    fn deliver(&mut self, telegram: Telegram) -> DispatchOutcome {
        let now = self.clock.now();
        let Some(mut entity) = self.registry.remove(telegram.receiver) else {
            trace!(target: "raven::dispatch", %telegram, "receiver gone, telegram dropped");
            self.record(WorldEvent::TelegramDropped { telegram });
            return DispatchOutcome::Dropped;
        };

        let was_alive = entity
            .as_bot()
            .is_some_and(|bot| bot.status() == BotStatus::Alive);

        let mut outbox = Outbox::new();
        let consumed = entity.handle_message(&telegram, self, now, &mut outbox);

        let killed = was_alive
            && telegram.kind == MessageKind::Damage
            && entity
                .as_bot()
                .is_some_and(|bot| bot.status() == BotStatus::Dead);
        self.registry.insert(entity);

        trace!(target: "raven::dispatch", %telegram, consumed, "telegram delivered");
        self.record(WorldEvent::TelegramDelivered { telegram, consumed });
        if killed {
            debug!(
                target: "raven::world",
                victim = %telegram.receiver,
                killer = %telegram.sender,
                "bot killed"
            );
            self.record(WorldEvent::BotKilled {
                victim: telegram.receiver,
                killer: telegram.sender,
            });
        }

        self.flush_outbox(outbox);
        DispatchOutcome::Delivered { consumed }
    }

    /// Applies side effects collected while an entity was checked out:
    /// telegrams in order, then new projectiles, then gunshot sounds.
    pub fn flush_outbox(&mut self, mut outbox: Outbox) {
        for message in outbox.take_messages() {
            self.dispatch_message(
                message.delivery,
                message.sender,
                message.receiver,
                message.kind,
                message.payload,
            );
        }

        let now = self.clock.now();
        for request in outbox.take_projectiles() {
            let id = self.registry.allocate_id();
            self.projectiles
                .push(Projectile::new(id, request, now, &self.weapon_config));
        }

        for gunshot in outbox.take_gunshots() {
            let range_sq = gunshot.range * gunshot.range;
            let listeners: Vec<EntityId> = self
                .registry
                .bots()
                .filter(|bot| bot.id() != gunshot.shooter && bot.status() == BotStatus::Alive)
                .filter(|bot| bot.position().distance_sq(gunshot.position) < range_sq)
                .map(Bot::id)
                .collect();
            for listener in listeners {
                self.dispatch_message(
                    Delivery::Immediate,
                    gunshot.shooter,
                    listener,
                    MessageKind::GunshotSound,
                    Payload::Entity(gunshot.shooter),
                );
            }
        }
    }

    fn record(&mut self, event: WorldEvent) {
        if self.record_events {
            self.events.push(event);
        }
    }

    // ------------------------------------------------------------------
    // Population
    // ------------------------------------------------------------------

    /// Registers a new bot. It enters play on the next tick at a free spawn
    /// point. In team mode the first member of a team leads it.
    pub fn add_bot(&mut self, team: Team) -> Result<EntityId, WorldError> {
        if self.layout.spawn_points().is_empty() {
            return Err(WorldError::NoSpawnPoints);
        }

        let id = self.registry.allocate_id();
        let seed = self
            .seed
            .wrapping_add(u64::from(id.0).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        let mut bot = Bot::new(
            id,
            team,
            Arc::clone(&self.bot_config),
            Arc::clone(&self.weapon_config),
            seed,
        );
        if self.layout.is_team_mode() && team != Team::Neutral && self.leader_of(team).is_none() {
            bot.body_mut().set_leader(true);
        }
        self.registry.restore_bot(Box::new(bot));

        debug!(target: "raven::world", bot = %id, %team, "bot added");
        self.record(WorldEvent::BotAdded { bot: id, team });
        Ok(id)
    }

    /// Removes a bot and tells every remaining bot to forget it.
    pub fn remove_bot(&mut self, id: EntityId) -> Result<(), WorldError> {
        let bot = self
            .registry
            .checkout_bot(id)
            .ok_or(WorldError::UnknownBot(id))?;
        self.retire_bot(id, bot.team(), bot.body().is_leader());
        Ok(())
    }

    /// Retires every bot that was checked out and never restored, as if it
    /// had been removed. Returns their ids.
    pub fn reclaim_lost_bots(&mut self) -> Vec<EntityId> {
        let lost = std::mem::take(&mut self.checked_out);
        for (&id, &(team, was_leader)) in &lost {
            self.retire_bot(id, team, was_leader);
        }
        lost.into_keys().collect()
    }

    /// Bookkeeping shared by every way a bot leaves the world: possession,
    /// leader succession and the removal broadcast.
    fn retire_bot(&mut self, id: EntityId, team: Team, was_leader: bool) {
        if self.possessed == Some(id) {
            self.possessed = None;
        }
        if was_leader {
            let successor = self
                .registry
                .bots()
                .find(|other| other.team() == team)
                .map(Bot::id);
            if let Some(successor) = successor.and_then(|id| self.registry.bot_mut(id)) {
                successor.body_mut().set_leader(true);
            }
        }

        debug!(target: "raven::world", bot = %id, "bot removed");
        self.record(WorldEvent::BotRemoved { bot: id });

        for other in self.registry.bot_ids() {
            self.dispatch_message(
                Delivery::Immediate,
                EntityId::WORLD,
                other,
                MessageKind::UserHasRemovedBot,
                Payload::Entity(id),
            );
        }
    }

    pub fn leader_of(&self, team: Team) -> Option<EntityId> {
        self.registry
            .bots()
            .find(|bot| bot.team() == team && bot.body().is_leader())
            .map(Bot::id)
    }

    // ------------------------------------------------------------------
    // Possession
    // ------------------------------------------------------------------

    /// Hands `id` to the human player, releasing any previously possessed
    /// bot. Returns `false` if the bot is not alive.
    pub fn possess(&mut self, id: EntityId) -> Result<bool, WorldError> {
        if self.registry.bot(id).is_none() {
            return Err(WorldError::UnknownBot(id));
        }
        if self.possessed == Some(id) {
            return Ok(true);
        }

        let ready = self
            .registry
            .bot(id)
            .is_some_and(|bot| bot.status() == BotStatus::Alive);
        if !ready {
            return Ok(false);
        }

        self.exorcise();
        let taken = self
            .registry
            .bot_mut(id)
            .is_some_and(|bot| bot.take_possession());
        if taken {
            self.possessed = Some(id);
        }
        Ok(taken)
    }

    /// Returns the possessed bot, if any, to AI control.
    pub fn exorcise(&mut self) -> Option<EntityId> {
        let id = self.possessed.take()?;
        self.registry.bot_mut(id).map(|bot| {
            bot.exorcise();
            id
        })
    }

    /// Directs the possessed bot. With `queue` set the move is appended to
    /// its current plan instead of replacing it.
    pub fn move_possessed_to(&mut self, destination: Vector2D, queue: bool) -> bool {
        let Some(id) = self.possessed else {
            return false;
        };
        self.registry.bot_mut(id).is_some_and(|bot| {
            if queue {
                bot.queue_possessed_move(destination)
            } else {
                bot.move_possessed_to(destination)
            }
        })
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Advances the world by `dt` seconds.
    ///
    /// Order: delayed telegrams, projectiles, bot lifecycle, living bots in
    /// id order, hit flashes, then trigger tests.
    pub fn tick(&mut self, dt: f64) {
        self.begin_tick(dt);
        self.update_projectiles();
        self.update_lifecycle();

        let now = self.clock.now();
        for id in self.alive_bot_ids() {
            let Some(mut bot) = self.registry.checkout_bot(id) else {
                continue;
            };
            let mut outbox = Outbox::new();
            bot.update(self, now, dt, &mut outbox);
            self.registry.restore_bot(bot);
            self.flush_outbox(outbox);
        }

        self.finish_tick();
    }

    /// Advances the clock and delivers the telegrams that became due.
    pub fn begin_tick(&mut self, dt: f64) {
        self.clock.advance(dt);
        self.dispatch_delayed_messages();
    }

    /// Moves dead bots to spawning and spawning bots into free spawn points.
    pub fn update_lifecycle(&mut self) {
        for id in self.registry.bot_ids() {
            let Some(status) = self.registry.bot(id).map(Bot::status) else {
                continue;
            };
            match status {
                BotStatus::Dead => {
                    if self.possessed == Some(id) {
                        self.exorcise();
                    }
                    if let Some(bot) = self.registry.bot_mut(id) {
                        bot.body_mut().set_spawning();
                    }
                }
                BotStatus::Spawning => {
                    let Some(position) = self.free_spawn_point() else {
                        continue;
                    };
                    if let Some(bot) = self.registry.bot_mut(id) {
                        bot.spawn(position);
                        self.record(WorldEvent::BotSpawned { bot: id, position });
                    }
                }
                BotStatus::Alive => {}
            }
        }
    }

    /// Takes every living bot out of the registry so they can be updated
    /// against an [`ArenaSnapshot`], possibly on other threads.
    /// Takes every living bot out of the registry for an external update.
    /// Each must come back through [`restore_bot`](Self::restore_bot); bots
    /// that never do are retired by [`reclaim_lost_bots`](Self::reclaim_lost_bots).
    pub fn checkout_alive_bots(&mut self) -> Vec<Box<Bot>> {
        let bots: Vec<Box<Bot>> = self
            .alive_bot_ids()
            .into_iter()
            .filter_map(|id| self.registry.checkout_bot(id))
            .collect();
        for bot in &bots {
            self.checked_out
                .insert(bot.id(), (bot.team(), bot.body().is_leader()));
        }
        bots
    }

    pub fn restore_bot(&mut self, bot: Box<Bot>) {
        self.checked_out.remove(&bot.id());
        self.registry.restore_bot(bot);
    }

    /// Hit flashes and trigger tests, run after every bot has moved.
    pub fn finish_tick(&mut self) {
        let ids = self.registry.bot_ids();
        for id in &ids {
            if let Some(bot) = self.registry.bot_mut(*id) {
                bot.body_mut().advance_hit_flash();
            }
        }
        self.update_triggers(&ids);
    }

    /// Advances every projectile and discards the dead ones.
    pub fn update_projectiles(&mut self) {
        let now = self.clock.now();
        let mut projectiles = std::mem::take(&mut self.projectiles);
        for projectile in &mut projectiles {
            let mut outbox = Outbox::new();
            let explosion = projectile.update(now, self, &mut outbox);
            self.flush_outbox(outbox);
            if let Some(explosion) = explosion {
                debug!(
                    target: "raven::world",
                    kind = %explosion.kind,
                    position = %explosion.position,
                    caught = explosion.bots_caught,
                    "explosion"
                );
                self.record(WorldEvent::Exploded(explosion));
            }
        }
        projectiles.retain(|projectile| !projectile.is_dead());
        projectiles.append(&mut self.projectiles);
        self.projectiles = projectiles;
    }

    /// Living bots standing in a stocked cache of their own team collect
    /// its whole contents.
    fn update_triggers(&mut self, ids: &[EntityId]) {
        let now = self.clock.now();
        for id in ids {
            let Some(bot) = self.registry.bot_mut(*id) else {
                continue;
            };
            if bot.status() != BotStatus::Alive || !bot.is_ready_for_trigger_update(now) {
                continue;
            }
            let (team, position) = (bot.team(), bot.position());

            let mut collected = Vec::new();
            for cache in self.registry.caches_mut() {
                if cache.team() == team && cache.is_touching(position) {
                    collected.extend(cache.take_all());
                }
            }
            if collected.is_empty() {
                continue;
            }

            debug!(target: "raven::world", bot = %id, weapons = collected.len(), "cache collected");
            if let Some(bot) = self.registry.bot_mut(*id) {
                for kind in collected {
                    bot.body_mut().weapons_mut().add_weapon(kind);
                }
            }
        }
    }

    fn alive_bot_ids(&self) -> Vec<EntityId> {
        self.registry
            .bots()
            .filter(|bot| bot.status() == BotStatus::Alive)
            .map(Bot::id)
            .collect()
    }

    /// Next spawn point, round robin, that no living bot overlaps.
    fn free_spawn_point(&mut self) -> Option<Vector2D> {
        let points = self.layout.spawn_points();
        for offset in 0..points.len() {
            let index = (self.spawn_cursor + offset) % points.len();
            let point = points[index];
            let occupied = self.registry.bots().any(|bot| {
                bot.status() == BotStatus::Alive
                    && bot.position().distance(point) < bot.body().bounding_radius()
            });
            if !occupied {
                self.spawn_cursor = index + 1;
                return Some(point);
            }
        }
        None
    }
}

impl WorldView for World {
    fn walls(&self) -> &[Wall2D] {
        &self.walls
    }

    fn bots(&self) -> Vec<BotSnapshot> {
        self.registry.bots().map(Bot::snapshot).collect()
    }

    fn weapon_caches(&self) -> Vec<CacheSnapshot> {
        self.registry.caches().map(WeaponCache::snapshot).collect()
    }

    fn is_team_mode(&self) -> bool {
        self.layout.is_team_mode()
    }

    fn extent(&self) -> Vector2D {
        self.layout.extent()
    }

    fn bot(&self, id: EntityId) -> Option<BotSnapshot> {
        self.registry.bot(id).map(Bot::snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WeaponType;

    fn arena() -> ArenaLayout {
        ArenaLayout::new(400.0, 400.0)
            .with_boundary_walls()
            .with_spawn_point(Vector2D::new(50.0, 50.0))
            .with_spawn_point(Vector2D::new(350.0, 350.0))
    }

    fn world(layout: ArenaLayout) -> World {
        World::new(layout, BotConfig::default(), WeaponConfig::default(), 7)
    }

    #[test]
    fn bots_spawn_on_the_first_tick() {
        let mut world = world(arena());
        let a = world.add_bot(Team::Neutral).unwrap();
        let b = world.add_bot(Team::Neutral).unwrap();
        assert_eq!(world.bot(a).map(Bot::status), Some(BotStatus::Spawning));

        world.update_lifecycle();

        let positions: Vec<_> = [a, b]
            .iter()
            .map(|id| world.bot(*id).unwrap().position())
            .collect();
        assert_eq!(world.bot(a).unwrap().status(), BotStatus::Alive);
        assert_ne!(positions[0], positions[1]);
    }

    #[test]
    fn adding_a_bot_without_spawn_points_fails() {
        let mut world = world(ArenaLayout::new(100.0, 100.0));
        assert_eq!(world.add_bot(Team::Neutral), Err(WorldError::NoSpawnPoints));
    }

    #[test]
    fn spawning_waits_for_a_free_point() {
        let layout = ArenaLayout::new(400.0, 400.0).with_spawn_point(Vector2D::new(50.0, 50.0));
        let mut world = world(layout);
        let a = world.add_bot(Team::Neutral).unwrap();
        let b = world.add_bot(Team::Neutral).unwrap();

        world.update_lifecycle();

        assert_eq!(world.bot(a).unwrap().status(), BotStatus::Alive);
        assert_eq!(world.bot(b).unwrap().status(), BotStatus::Spawning);
    }

    #[test]
    fn telegrams_to_missing_receivers_are_dropped() {
        let mut world = world(arena());
        let outcome = world.dispatch_message(
            Delivery::Immediate,
            EntityId::WORLD,
            EntityId(99),
            MessageKind::Damage,
            Payload::Damage(10),
        );
        assert_eq!(outcome, DispatchOutcome::Dropped);
    }

    #[test]
    fn removal_is_broadcast_to_the_survivors() {
        let mut world = world(arena());
        world.set_event_recording(true);
        let a = world.add_bot(Team::Neutral).unwrap();
        let b = world.add_bot(Team::Neutral).unwrap();
        world.drain_events();

        world.remove_bot(a).unwrap();

        assert!(world.bot(a).is_none());
        let notified: Vec<_> = world
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                WorldEvent::TelegramDelivered { telegram, .. }
                    if telegram.kind == MessageKind::UserHasRemovedBot =>
                {
                    Some(telegram.receiver)
                }
                _ => None,
            })
            .collect();
        assert_eq!(notified, vec![b]);
        assert_eq!(world.remove_bot(a), Err(WorldError::UnknownBot(a)));
    }

    #[test]
    fn leadership_passes_to_a_teammate() {
        let mut world = world(arena().with_team_mode(true));
        let first = world.add_bot(Team::Red).unwrap();
        let second = world.add_bot(Team::Red).unwrap();
        let blue = world.add_bot(Team::Blue).unwrap();
        assert_eq!(world.leader_of(Team::Red), Some(first));
        assert_eq!(world.leader_of(Team::Blue), Some(blue));

        world.remove_bot(first).unwrap();

        assert_eq!(world.leader_of(Team::Red), Some(second));
    }

    #[test]
    fn bots_lost_during_checkout_are_retired() {
        let mut world = world(arena().with_team_mode(true));
        world.set_event_recording(true);
        let first = world.add_bot(Team::Red).unwrap();
        let second = world.add_bot(Team::Red).unwrap();
        world.update_lifecycle();
        world.drain_events();

        let mut bots = world.checkout_alive_bots();
        assert_eq!(bots.len(), 2);
        let survivor = bots.pop().unwrap();
        assert_eq!(survivor.id(), second);
        world.restore_bot(survivor);
        drop(bots);

        assert_eq!(world.reclaim_lost_bots(), vec![first]);
        assert!(world.bot(first).is_none());
        assert_eq!(world.leader_of(Team::Red), Some(second));

        let events = world.drain_events();
        assert!(events.contains(&WorldEvent::BotRemoved { bot: first }));
        assert!(events.iter().any(|event| matches!(
            event,
            WorldEvent::TelegramDelivered { telegram, .. }
                if telegram.kind == MessageKind::UserHasRemovedBot
                    && telegram.receiver == second
        )));
        assert!(world.reclaim_lost_bots().is_empty());
    }

    #[test]
    fn only_one_bot_is_possessed_at_a_time() {
        let mut world = world(arena());
        let a = world.add_bot(Team::Neutral).unwrap();
        let b = world.add_bot(Team::Neutral).unwrap();
        assert_eq!(world.possess(a), Ok(false));
        world.update_lifecycle();

        assert_eq!(world.possess(a), Ok(true));
        assert_eq!(world.possess(b), Ok(true));

        assert!(!world.bot(a).unwrap().is_possessed());
        assert!(world.bot(b).unwrap().is_possessed());
        assert_eq!(world.exorcise(), Some(b));
        assert_eq!(world.exorcise(), None);
    }

    #[test]
    fn standing_in_a_team_cache_collects_it() {
        let layout = ArenaLayout::new(400.0, 400.0)
            .with_spawn_point(Vector2D::new(50.0, 50.0))
            .with_weapon_cache(Team::Red, Vector2D::new(50.0, 50.0), 20.0)
            .with_team_mode(true);
        let mut world = world(layout);
        let cache = world.caches().next().unwrap().id();
        world.dispatch_message(
            Delivery::Immediate,
            EntityId::WORLD,
            cache,
            MessageKind::DepositWeapon,
            Payload::Weapon(WeaponType::RailGun),
        );
        let bot = world.add_bot(Team::Red).unwrap();
        world.update_lifecycle();

        world.finish_tick();

        assert!(world.bot(bot).unwrap().body().weapons().has_weapon(WeaponType::RailGun));
        assert!(world.caches().next().unwrap().weapons().is_empty());
    }
}
