use crate::bot::BotBody;
use crate::env::WorldView;
use crate::messaging::Outbox;

/// Borrows a goal works with during one update or message delivery.
pub struct GoalContext<'a> {
    pub body: &'a mut BotBody,
    pub view: &'a dyn WorldView,
    pub outbox: &'a mut Outbox,
    pub now: f64,
}

impl<'a> GoalContext<'a> {
    pub fn new(
        body: &'a mut BotBody,
        view: &'a dyn WorldView,
        outbox: &'a mut Outbox,
        now: f64,
    ) -> Self {
        Self {
            body,
            view,
            outbox,
            now,
        }
    }
}
