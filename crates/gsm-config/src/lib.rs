//! BTS configuration management
//!
//! This crate provides configuration loading and parsing for the BTS:
//! - TOML configuration file parsing
//! - Stack configuration structures (per-carrier and power ramp settings)

pub mod stack_config;
pub mod toml_config;

pub use stack_config::*;
pub use toml_config::*;
