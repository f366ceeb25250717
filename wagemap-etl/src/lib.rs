//! wagemap-etl library interface
//!
//! Exposes the pipeline stages for integration testing: provider clients,
//! per-source fetchers, the geographic resolver, the joiner, and the
//! index publishers.

pub mod clients;
pub mod fetchers;
pub mod geo;
pub mod joiner;
pub mod pipeline;
pub mod publish;
