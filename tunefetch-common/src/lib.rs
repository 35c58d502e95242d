//! # tunefetch Common Library
//!
//! Shared code for the tunefetch workspace:
//! - Error types
//! - TOML bootstrap configuration and config file discovery
//! - Progress event types and the broadcast EventBus

pub mod config;
pub mod error;
pub mod events;

pub use error::{Error, Result};
