use std::collections::BTreeMap;

use crate::bot::Bot;
use crate::env::WorldView;
use crate::messaging::{Outbox, Telegram};
use crate::types::EntityId;

use super::WeaponCache;

/// Any entity that can receive telegrams.
#[derive(Debug)]
pub enum Entity {
    Bot(Box<Bot>),
    WeaponCache(WeaponCache),
}

impl Entity {
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Bot(bot) => bot.id(),
            Entity::WeaponCache(cache) => cache.id(),
        }
    }

    pub fn as_bot(&self) -> Option<&Bot> {
        match self {
            Entity::Bot(bot) => Some(bot),
            Entity::WeaponCache(_) => None,
        }
    }

    pub fn as_bot_mut(&mut self) -> Option<&mut Bot> {
        match self {
            Entity::Bot(bot) => Some(bot),
            Entity::WeaponCache(_) => None,
        }
    }

    pub fn as_cache(&self) -> Option<&WeaponCache> {
        match self {
            Entity::WeaponCache(cache) => Some(cache),
            Entity::Bot(_) => None,
        }
    }

    pub fn handle_message(
        &mut self,
        telegram: &Telegram,
        view: &dyn WorldView,
        now: f64,
        outbox: &mut Outbox,
    ) -> bool {
        match self {
            Entity::Bot(bot) => bot.handle_message(telegram, view, now, outbox),
            Entity::WeaponCache(cache) => cache.handle_message(telegram),
        }
    }
}

/// Owner of every addressable entity.
///
/// Ids come from a monotonic counter and are never handed out twice, so a
/// stale id can only fail to resolve.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    next_id: u32,
    entities: BTreeMap<EntityId, Entity>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn insert(&mut self, entity: Entity) {
        self.entities.insert(entity.id(), entity);
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn bot(&self, id: EntityId) -> Option<&Bot> {
        self.get(id).and_then(Entity::as_bot)
    }

    pub fn bot_mut(&mut self, id: EntityId) -> Option<&mut Bot> {
        self.get_mut(id).and_then(Entity::as_bot_mut)
    }

    /// Bots in id order.
    pub fn bots(&self) -> impl Iterator<Item = &Bot> {
        self.entities.values().filter_map(Entity::as_bot)
    }

    pub fn bot_ids(&self) -> Vec<EntityId> {
        self.bots().map(Bot::id).collect()
    }

    pub fn caches(&self) -> impl Iterator<Item = &WeaponCache> {
        self.entities.values().filter_map(Entity::as_cache)
    }

    pub fn caches_mut(&mut self) -> impl Iterator<Item = &mut WeaponCache> {
        self.entities.values_mut().filter_map(|entity| match entity {
            Entity::WeaponCache(cache) => Some(cache),
            Entity::Bot(_) => None,
        })
    }

    /// Removes a bot so it can be updated while the registry stays readable.
    pub fn checkout_bot(&mut self, id: EntityId) -> Option<Box<Bot>> {
        match self.entities.remove(&id)? {
            Entity::Bot(bot) => Some(bot),
            other => {
                self.entities.insert(id, other);
                None
            }
        }
    }

    pub fn restore_bot(&mut self, bot: Box<Bot>) {
        self.entities.insert(bot.id(), Entity::Bot(bot));
    }
}
