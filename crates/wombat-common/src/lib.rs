//! Common utilities for the Wombat parser workspace.
//!
//! This crate provides shared infrastructure used by all parser components:
//! - **Warning System** - deduplicated, colored terminal warnings
//! - **Logging** - `env_logger` setup for binaries and test suites

pub mod logging;
pub mod warning;
