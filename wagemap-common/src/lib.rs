//! # Wagemap Common Library
//!
//! Shared code for the wagemap pipeline crates:
//! - Error taxonomy and `Result` alias
//! - Configuration and credential resolution
//! - Canonical data models (geographies, observations, records)

pub mod config;
pub mod error;
pub mod models;

pub use error::{Error, Result};
