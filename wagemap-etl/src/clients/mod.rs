//! Provider clients
//!
//! Three provider shapes, one module each:
//! - [`timeseries`]: batched, rate-limit-aware client for the bulk
//!   time-series JSON API (opaque series ids)
//! - [`census`] and [`bea`]: keyed REST query-parameter clients
//! - [`bulkfile`]: CSV bulk-download client with declared field aliases

pub mod bea;
pub mod bulkfile;
pub mod census;
pub mod timeseries;
