//! Pipeline orchestration
//!
//! Phase progression: FETCH (one sub-step per source) → JOIN → PUBLISH.
//! Required sources fail the run; optional sources degrade it with a
//! warning. Each fetch writes its raw artifact before the next source
//! starts, so a run that dies mid-fetch still leaves re-joinable state.

pub mod artifacts;

mod orchestrator;

pub use orchestrator::{PipelineOrchestrator, RunSummary};

/// Artifact names under the raw directory, one per source
pub mod source {
    pub const LAUS: &str = "laus";
    pub const EARNINGS: &str = "earnings";
    pub const CPI: &str = "cpi";
    pub const JOLTS: &str = "jolts";
    pub const DEMOGRAPHICS: &str = "demographics";
    pub const INCOME: &str = "income";
    pub const OEWS: &str = "oews";
    pub const PROJECTIONS: &str = "projections";
}
