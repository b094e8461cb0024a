use rand::Rng;

use crate::env::WorldView;
use crate::math::Vector2D;
use crate::messaging::{MessageKind, Outbox, Payload};
use crate::types::EntityId;

/// Attempts at finding an open random destination before giving up.
const DESTINATION_ATTEMPTS: usize = 16;

/// Straight-line path planner.
///
/// A request is answered by a `PathReady` or `NoPathAvailable` telegram sent
/// to the owner, so the goal that asked picks the answer up through the
/// brain's message forwarding on a later update.
#[derive(Clone, Debug, Default)]
pub struct PathPlanner {
    destination: Option<Vector2D>,
}

impl PathPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destination of the last successful request.
    pub fn destination(&self) -> Option<Vector2D> {
        self.destination
    }

    pub fn clear(&mut self) {
        self.destination = None;
    }

    /// Plans a path for a bot of `radius` at `from` and tells the bot
    /// whether one exists. Returns the same answer.
    pub fn request_path_to_position(
        &mut self,
        owner: EntityId,
        from: Vector2D,
        radius: f64,
        target: Vector2D,
        view: &dyn WorldView,
        outbox: &mut Outbox,
    ) -> bool {
        let reachable = view.contains(target) && !view.is_path_obstructed(from, target, radius);
        let kind = if reachable {
            self.destination = Some(target);
            MessageKind::PathReady
        } else {
            self.destination = None;
            MessageKind::NoPathAvailable
        };
        outbox.send_now(owner, owner, kind, Payload::None);
        reachable
    }

    /// Random position inside the arena that a bot of `radius` can stand on.
    ///
    /// Falls back to `from` when no open spot turns up.
    pub fn random_destination(
        &self,
        from: Vector2D,
        radius: f64,
        view: &dyn WorldView,
        rng: &mut impl Rng,
    ) -> Vector2D {
        let extent = view.extent();
        if extent.x <= 2.0 * radius || extent.y <= 2.0 * radius {
            return from;
        }
        for _ in 0..DESTINATION_ATTEMPTS {
            let candidate = Vector2D::new(
                rng.gen_range(radius..extent.x - radius),
                rng.gen_range(radius..extent.y - radius),
            );
            if !view.is_path_obstructed(candidate, candidate, radius) {
                return candidate;
            }
        }
        from
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::testing::StaticView;

    #[test]
    fn reachable_targets_answer_path_ready() {
        let mut planner = PathPlanner::new();
        let mut outbox = Outbox::new();

        let ok = planner.request_path_to_position(
            EntityId(4),
            Vector2D::new(10.0, 10.0),
            5.0,
            Vector2D::new(100.0, 10.0),
            &StaticView::default(),
            &mut outbox,
        );

        assert!(ok);
        assert_eq!(planner.destination(), Some(Vector2D::new(100.0, 10.0)));
        let reply = outbox.messages()[0];
        assert_eq!((reply.receiver, reply.kind), (EntityId(4), MessageKind::PathReady));
    }

    #[test]
    fn walls_make_targets_unreachable() {
        let mut planner = PathPlanner::new();
        let mut outbox = Outbox::new();
        let view = StaticView::default()
            .with_wall(Vector2D::new(50.0, -100.0), Vector2D::new(50.0, 100.0));

        let ok = planner.request_path_to_position(
            EntityId(4),
            Vector2D::new(10.0, 10.0),
            5.0,
            Vector2D::new(100.0, 10.0),
            &view,
            &mut outbox,
        );

        assert!(!ok);
        assert_eq!(outbox.messages()[0].kind, MessageKind::NoPathAvailable);
    }

    #[test]
    fn random_destinations_stay_inside_the_arena() {
        let planner = PathPlanner::new();
        let mut rng = StdRng::seed_from_u64(11);
        let view = StaticView::default();
        for _ in 0..50 {
            let spot = planner.random_destination(Vector2D::ZERO, 5.0, &view, &mut rng);
            assert!(view.contains(spot));
        }
    }
}
