//! Janasamparka complaint events and notification dispatch.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`ComplaintEvent`] -- the event envelope published after a complaint
//!   mutation commits.
//! - [`NotificationDispatcher`] -- background task turning events into
//!   in-app notification rows.

pub mod bus;
pub mod dispatcher;

pub use bus::{ComplaintEvent, EventBus};
pub use dispatcher::NotificationDispatcher;
