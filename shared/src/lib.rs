//! Shared types and logic for the produce order intake system
//!
//! Everything here is free of I/O so it can run on the server and, through
//! the WASM crate, in the browser.

pub mod interpreter;
pub mod models;
pub mod orders;
pub mod types;
pub mod validation;

pub use interpreter::{interpret, ParsedOrderIntent, RawMessage};
pub use models::*;
pub use orders::*;
pub use types::*;
pub use validation::*;
