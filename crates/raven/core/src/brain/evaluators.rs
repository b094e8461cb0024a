use crate::bot::BotBody;
use crate::config::BotConfig;

use super::GoalKind;

/// Scores one top-level goal for arbitration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GoalEvaluator {
    /// Constant, low desirability so exploring is the fallback.
    Explore { tweaker: f64 },
    /// Grows with health and loaded weapons while a target is present.
    AttackTarget { tweaker: f64 },
}

impl GoalEvaluator {
    pub fn standard_set(config: &BotConfig) -> Vec<Self> {
        vec![
            GoalEvaluator::Explore {
                tweaker: config.explore_goal_tweaker,
            },
            GoalEvaluator::AttackTarget {
                tweaker: config.aggro_goal_tweaker,
            },
        ]
    }

    pub fn goal_kind(&self) -> GoalKind {
        match self {
            GoalEvaluator::Explore { .. } => GoalKind::Explore,
            GoalEvaluator::AttackTarget { .. } => GoalKind::AttackTarget,
        }
    }

    pub fn desirability(&self, body: &BotBody) -> f64 {
        match *self {
            GoalEvaluator::Explore { tweaker } => tweaker,
            GoalEvaluator::AttackTarget { tweaker } => {
                if !body.targeting().is_target_present() {
                    return 0.0;
                }
                let health = f64::from(body.health()) / f64::from(body.max_health());
                tweaker * health * body.weapons().total_weapon_strength()
            }
        }
    }
}
