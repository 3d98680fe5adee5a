use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::ServerConnector;
use crate::config::EyesConfig;
use crate::error::{EyesError, Result};
use crate::guard;
use crate::types::{
    MatchResult, MatchWindowData, RunningSession, SessionEndRequest, SessionStartInfo, TestResults,
};

pub const DEFAULT_SERVER_URL: &str = "https://eyesapi.applitools.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
const RUNNING_SESSIONS_PATH: &str = "api/sessions/running";

/// JSON-over-HTTP connector for the comparison service.
#[derive(Debug, Clone)]
pub struct HttpServerConnector {
    http: Client,
    server_url: Url,
    api_key: Option<String>,
}

impl HttpServerConnector {
    pub fn new(server_url: impl AsRef<str>, api_key: Option<String>) -> Result<Self> {
        Self::with_timeout(server_url, api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        server_url: impl AsRef<str>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        if let Some(key) = api_key.as_deref() {
            guard::alphanumeric(key, "apiKey")?;
        }

        let mut server_url = Url::parse(server_url.as_ref())?;
        if !server_url.path().ends_with('/') {
            let path = format!("{}/", server_url.path());
            server_url.set_path(&path);
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(EyesError::Network)?;

        Ok(Self {
            http,
            server_url,
            api_key,
        })
    }

    pub fn from_config(config: &EyesConfig) -> Result<Self> {
        Self::with_timeout(&config.server_url, config.api_key.clone(), config.timeout)
    }

    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.server_url.join(path).map_err(EyesError::InvalidUrl)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            if let Some(api_key) = &self.api_key {
                pairs.append_pair("apiKey", api_key);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    fn session_path(session: &RunningSession) -> String {
        format!("{RUNNING_SESSIONS_PATH}/{}", session.id)
    }

    async fn send(&self, request: RequestBuilder) -> Result<(StatusCode, String)> {
        let response = request.send().await.map_err(EyesError::Network)?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            return Ok((status, body));
        }

        Err(EyesError::transport(Some(status), error_message(status, &body)))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let (_, body) = self.send(request).await?;
        serde_json::from_str(&body).map_err(EyesError::Serialization)
    }
}

#[async_trait]
impl ServerConnector for HttpServerConnector {
    async fn start_session(&self, start_info: &SessionStartInfo) -> Result<RunningSession> {
        let url = self.endpoint(RUNNING_SESSIONS_PATH, &[])?;
        debug!(
            app = start_info.app_id_or_name(),
            test = start_info.scenario_id_or_name(),
            "starting session"
        );

        let body = json!({ "startInfo": start_info });
        let (status, body) = self.send(self.http.post(url).json(&body)).await?;
        let mut session: RunningSession =
            serde_json::from_str(&body).map_err(EyesError::Serialization)?;
        guard::not_null_or_empty(Some(session.id.as_str()), "running session id")?;

        if status == StatusCode::CREATED {
            session.is_new = true;
        }
        info!(session = %session.id, is_new = session.is_new, "session started");
        Ok(session)
    }

    async fn match_window(
        &self,
        session: &RunningSession,
        data: &MatchWindowData,
    ) -> Result<MatchResult> {
        let url = self.endpoint(&Self::session_path(session), &[])?;
        debug!(session = %session.id, tag = %data.tag, "submitting checkpoint");
        self.send_json(self.http.post(url).json(data)).await
    }

    async fn stop_session(
        &self,
        session: &RunningSession,
        request: &SessionEndRequest,
    ) -> Result<TestResults> {
        let url = self.endpoint(
            &Self::session_path(session),
            &[
                ("aborted", request.is_aborted.to_string()),
                ("updateBaseline", request.update_baseline.to_string()),
            ],
        )?;
        debug!(session = %session.id, aborted = request.is_aborted, "ending session");
        self.send_json(self.http.delete(url)).await
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    let fallback = format!("server returned status {}", status.as_u16());
    let parsed = serde_json::from_str::<Value>(body).ok();
    let from_body = parsed
        .as_ref()
        .and_then(|value| value.get("message").or_else(|| value.get("error")))
        .and_then(Value::as_str)
        .map(str::to_owned);

    match (status, from_body) {
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, Some(msg)) => {
            format!("{msg} (check the API key)")
        }
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, None) => {
            format!("{fallback}; the API key was rejected")
        }
        (_, Some(msg)) => msg,
        _ => fallback,
    }
}
