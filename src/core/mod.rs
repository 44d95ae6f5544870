//! Core module
//!
//! Configuration and diagnostics shared by the navigation subsystem.

mod config;
mod debug;

pub use config::{ConfigError, NavConfig, SweepConfig};
pub use debug::{Diagnostics, SearchStats};
