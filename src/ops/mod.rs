//! High-level operations.

pub mod configure;

pub use configure::{configure, plan, preflight, CommandOutcome, ConfigureReport, Step};
