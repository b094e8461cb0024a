//! Lightweight hierarchical goal library for real-time game agents.
//!
//! Goals are long-running objectives that are processed once per update and
//! may decompose into subgoals. A composite goal keeps its subgoals on a LIFO
//! stack: the front goal is the one being worked on, and it is removed once it
//! completes or fails.
//!
//! - **Frame-driven**: a goal is processed once per agent update and reports
//!   whether it is still active
//! - **Message aware**: messages are offered to the front goal first, so the
//!   goal that issued a request is the one that sees the reply
//! - **Zero dependencies**: pure Rust with no external crates
//!
//! # Architecture
//!
//! - [`Goal`]: Core trait for all goals, generic over a borrowed context
//! - [`GoalStatus`]: Inactive, Active, Completed or Failed
//! - [`SubgoalStack`]: LIFO container used by composite goals

pub mod goal;
pub mod stack;
pub mod status;

// Re-export core types for ergonomic API
pub use goal::Goal;
pub use stack::SubgoalStack;
pub use status::GoalStatus;
