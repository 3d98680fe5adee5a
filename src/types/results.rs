//! Request and response shapes exchanged with the comparison server.

use serde::{Deserialize, Serialize};

use super::{ImageMatchSettings, MatchRegions};

/// Server handle of an open session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningSession {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// True when the server had no baseline and created one for this session.
    #[serde(default)]
    pub is_new: bool,
}

/// Captured image reference carried by a match request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppOutput {
    pub screenshot64: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// One checkpoint submitted for comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchWindowData {
    pub tag: String,
    pub image: AppOutput,
    #[serde(default)]
    pub ignore_mismatch: bool,
    pub regions: MatchRegions,
    /// Comparison parameters only; region lists travel in `regions`.
    pub match_settings: ImageMatchSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub as_expected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOutcome {
    Passed,
    Failed,
    /// No baseline existed; the checkpoint became the new baseline.
    New,
}

/// What [`crate::Eyes::check`] hands back for one checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub tag: String,
    pub outcome: MatchOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<u64>,
}

impl CheckResult {
    pub fn from_match(tag: impl Into<String>, result: &MatchResult, is_new_session: bool) -> Self {
        let outcome = if is_new_session {
            MatchOutcome::New
        } else if result.as_expected {
            MatchOutcome::Passed
        } else {
            MatchOutcome::Failed
        };

        Self {
            tag: tag.into(),
            outcome,
            window_id: result.window_id,
        }
    }
}

/// Ends a running session, either completed or aborted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEndRequest {
    pub session_id: String,
    pub is_aborted: bool,
    #[serde(default)]
    pub update_baseline: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestResultsStatus {
    Passed,
    Unresolved,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResults {
    #[serde(default)]
    pub steps: u32,
    #[serde(default)]
    pub matches: u32,
    #[serde(default)]
    pub mismatches: u32,
    #[serde(default)]
    pub missing: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TestResultsStatus>,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_aborted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl TestResults {
    pub fn is_passed(&self) -> bool {
        match self.status {
            Some(status) => status == TestResultsStatus::Passed,
            None => !self.is_aborted && self.mismatches == 0 && self.missing == 0,
        }
    }
}
