//! Configuration loading and schema definitions
//!
//! Run configuration shared by the engine and the CLI.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
