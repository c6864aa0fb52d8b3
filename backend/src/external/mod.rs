//! External API integrations

pub mod line;

pub use line::{LineMessenger, LineMessagingClient};
