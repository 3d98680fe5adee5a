//! Comparison-server seam.

mod http;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::types::{
    MatchResult, MatchWindowData, RunningSession, SessionEndRequest, SessionStartInfo, TestResults,
};

pub use http::{HttpServerConnector, DEFAULT_SERVER_URL};

/// Remote comparison service. Every call is a single request; the
/// orchestrator never retries.
#[async_trait]
pub trait ServerConnector: Send + Sync {
    async fn start_session(&self, start_info: &SessionStartInfo) -> Result<RunningSession>;

    async fn match_window(
        &self,
        session: &RunningSession,
        data: &MatchWindowData,
    ) -> Result<MatchResult>;

    async fn stop_session(
        &self,
        session: &RunningSession,
        request: &SessionEndRequest,
    ) -> Result<TestResults>;
}

#[async_trait]
impl<C: ServerConnector + ?Sized> ServerConnector for Arc<C> {
    async fn start_session(&self, start_info: &SessionStartInfo) -> Result<RunningSession> {
        (**self).start_session(start_info).await
    }

    async fn match_window(
        &self,
        session: &RunningSession,
        data: &MatchWindowData,
    ) -> Result<MatchResult> {
        (**self).match_window(session, data).await
    }

    async fn stop_session(
        &self,
        session: &RunningSession,
        request: &SessionEndRequest,
    ) -> Result<TestResults> {
        (**self).stop_session(session, request).await
    }
}
