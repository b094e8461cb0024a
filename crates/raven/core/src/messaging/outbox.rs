use super::{Delivery, MessageKind, Payload};
use crate::math::Vector2D;
use crate::projectile::ProjectileRequest;
use crate::types::EntityId;

/// A dispatch request recorded while its sender was being updated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutgoingMessage {
    pub delivery: Delivery,
    pub sender: EntityId,
    pub receiver: EntityId,
    pub kind: MessageKind,
    pub payload: Payload,
}

/// A shot heard by every bot within `range` of `position`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gunshot {
    pub shooter: EntityId,
    pub position: Vector2D,
    pub range: f64,
}

/// Side effects produced by an entity that is checked out of the world.
///
/// An updating bot cannot reach its peers directly, so its messages, shots
/// and sounds are collected here and applied by the world as soon as the bot
/// is back in the registry.
#[derive(Debug, Default)]
pub struct Outbox {
    messages: Vec<OutgoingMessage>,
    projectiles: Vec<ProjectileRequest>,
    gunshots: Vec<Gunshot>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(
        &mut self,
        delivery: Delivery,
        sender: EntityId,
        receiver: EntityId,
        kind: MessageKind,
        payload: Payload,
    ) {
        self.messages.push(OutgoingMessage {
            delivery,
            sender,
            receiver,
            kind,
            payload,
        });
    }

    pub fn send_now(
        &mut self,
        sender: EntityId,
        receiver: EntityId,
        kind: MessageKind,
        payload: Payload,
    ) {
        self.send(Delivery::Immediate, sender, receiver, kind, payload);
    }

    pub fn fire(&mut self, request: ProjectileRequest) {
        self.projectiles.push(request);
    }

    pub fn gunshot(&mut self, shooter: EntityId, position: Vector2D, range: f64) {
        self.gunshots.push(Gunshot {
            shooter,
            position,
            range,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.projectiles.is_empty() && self.gunshots.is_empty()
    }

    pub fn messages(&self) -> &[OutgoingMessage] {
        &self.messages
    }

    pub fn projectiles(&self) -> &[ProjectileRequest] {
        &self.projectiles
    }

    pub fn gunshots(&self) -> &[Gunshot] {
        &self.gunshots
    }

    pub fn take_messages(&mut self) -> Vec<OutgoingMessage> {
        std::mem::take(&mut self.messages)
    }

    pub fn take_projectiles(&mut self) -> Vec<ProjectileRequest> {
        std::mem::take(&mut self.projectiles)
    }

    pub fn take_gunshots(&mut self) -> Vec<Gunshot> {
        std::mem::take(&mut self.gunshots)
    }

    /// Moves everything from `other` to the end of this outbox.
    pub fn append(&mut self, other: &mut Outbox) {
        self.messages.append(&mut other.messages);
        self.projectiles.append(&mut other.projectiles);
        self.gunshots.append(&mut other.gunshots);
    }
}
