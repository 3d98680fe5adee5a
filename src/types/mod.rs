//! Core data types exchanged between the orchestrator and the server.
//!
//! - [`BatchInfo`] - groups related sessions
//! - [`SessionStartInfo`] - validated session-start descriptor
//! - [`ImageMatchSettings`] - comparison policy and region lists
//! - [`MatchWindowData`], [`SessionEndRequest`] - per-check and end-of-session requests

mod batch;
mod match_settings;
mod results;
mod session;

pub use batch::{BatchDefaults, BatchInfo, BATCH_ID_ENV, BATCH_NAME_ENV};
pub use match_settings::{
    ExactMatchSettings, FloatingMatchSettings, FloatingOffsets, ImageMatchSettings, MatchLevel,
    MatchRegions,
};
pub use results::{
    AppOutput, CheckResult, MatchOutcome, MatchResult, MatchWindowData, RunningSession,
    SessionEndRequest, TestResults, TestResultsStatus,
};
pub use session::{AppEnvironment, PropertyData, SessionStartInfo, SessionType};
