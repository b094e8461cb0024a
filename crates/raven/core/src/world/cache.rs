use crate::env::CacheSnapshot;
use crate::math::Vector2D;
use crate::messaging::{MessageKind, Telegram};
use crate::types::{EntityId, Team, WeaponType};

/// Team weapon cache. Stocked by dying teammates, emptied by the first
/// teammate that walks into it.
#[derive(Clone, Debug, PartialEq)]
pub struct WeaponCache {
    id: EntityId,
    team: Team,
    position: Vector2D,
    radius: f64,
    weapons: Vec<WeaponType>,
}

impl WeaponCache {
    pub fn new(id: EntityId, team: Team, position: Vector2D, radius: f64) -> Self {
        Self {
            id,
            team,
            position,
            radius,
            weapons: Vec::new(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn position(&self) -> Vector2D {
        self.position
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn weapons(&self) -> &[WeaponType] {
        &self.weapons
    }

    pub fn add_weapon(&mut self, kind: WeaponType) {
        self.weapons.push(kind);
    }

    pub fn is_touching(&self, position: Vector2D) -> bool {
        self.position.distance_sq(position) < self.radius * self.radius
    }

    /// Empties the cache.
    pub fn take_all(&mut self) -> Vec<WeaponType> {
        std::mem::take(&mut self.weapons)
    }

    pub fn handle_message(&mut self, telegram: &Telegram) -> bool {
        match (telegram.kind, telegram.payload.weapon()) {
            (MessageKind::DepositWeapon, Some(kind)) => {
                self.add_weapon(kind);
                true
            }
            _ => false,
        }
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            id: self.id,
            team: self.team,
            position: self.position,
            radius: self.radius,
            weapons: self.weapons.clone(),
        }
    }
}
