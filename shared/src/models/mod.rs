//! Domain models for the order intake system

mod client;
mod line_message;
mod order;
mod product;

pub use client::*;
pub use line_message::*;
pub use order::*;
pub use product::*;
