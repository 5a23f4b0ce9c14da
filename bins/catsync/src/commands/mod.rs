//! CLI command implementations

pub mod audit;
pub mod locales;
pub mod sync;
