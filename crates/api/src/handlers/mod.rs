pub mod auth;
pub mod complaint;
pub mod jurisdiction;
pub mod notification;
pub mod routing;
pub mod workflow;
