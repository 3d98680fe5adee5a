use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{Driver, ElementRef};
use crate::error::{EyesError, Result};
use crate::geometry::{Point, RectangleSize};
use crate::guard;

/// W3C key under which element references are returned.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52f-4ad146fbca3b";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const SCROLL_POSITION_SCRIPT: &str = "return [\
    window.scrollX || document.documentElement.scrollLeft || 0, \
    window.scrollY || document.documentElement.scrollTop || 0];";

#[derive(Debug, Deserialize)]
struct ElementRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

/// Driver backed by an already-created W3C WebDriver session.
#[derive(Debug, Clone)]
pub struct WebDriverClient {
    http: Client,
    base_url: Url,
    session_id: String,
}

impl WebDriverClient {
    pub fn new(base_url: impl AsRef<str>, session_id: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, session_id, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl AsRef<str>,
        session_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let session_id = session_id.into();
        guard::not_null_or_empty(Some(session_id.as_str()), "sessionId")?;

        let mut base_url = Url::parse(base_url.as_ref())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(EyesError::Network)?;

        Ok(Self {
            http,
            base_url,
            session_id,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Looks up the first element matching a CSS selector.
    pub async fn find_element(&self, css_selector: &str) -> Result<ElementRef> {
        guard::not_null_or_empty(Some(css_selector), "cssSelector")?;

        let url = self.endpoint("element")?;
        let body = json!({"using": "css selector", "value": css_selector});
        let value = self.send(self.http.post(url).json(&body)).await?;

        guard::has_properties(&value, &[ELEMENT_KEY], "element reference")?;
        let id = &value[ELEMENT_KEY];
        guard::is_string(id, "element id")?;
        Ok(ElementRef::new(id.as_str().unwrap_or_default()))
    }

    pub async fn execute_script(&self, script: &str, args: Vec<Value>) -> Result<Value> {
        let url = self.endpoint("execute/sync")?;
        let body = json!({"script": script, "args": args});
        self.send(self.http.post(url).json(&body)).await
    }

    async fn element_rect(&self, element: &ElementRef) -> Result<ElementRect> {
        let url = self.endpoint(&format!("element/{}/rect", element.id()))?;
        let value = self.send(self.http.get(url)).await?;

        guard::has_properties(&value, &["x", "y", "width", "height"], "element rect")?;
        let rect: ElementRect = guard::is_valid_type(&value, "ElementRect")?;
        guard::greater_than_or_equal_to_zero(rect.width, "element width", false)?;
        guard::greater_than_or_equal_to_zero(rect.height, "element height", false)?;
        Ok(rect)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(&format!("session/{}/{}", self.session_id, path))
            .map_err(EyesError::InvalidUrl)
    }

    /// Sends a command and unwraps the `value` member of the response.
    async fn send(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await.map_err(EyesError::Network)?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(EyesError::transport(
                Some(status),
                error_message(status, &body),
            ));
        }

        let parsed: Value = serde_json::from_str(&body).map_err(EyesError::Serialization)?;
        guard::has_properties(&parsed, &["value"], "WebDriver response")?;
        Ok(parsed["value"].clone())
    }
}

#[async_trait]
impl Driver for WebDriverClient {
    async fn take_screenshot(&self) -> Result<String> {
        debug!(session = %self.session_id, "requesting viewport screenshot");
        let url = self.endpoint("screenshot")?;
        let value = self.send(self.http.get(url)).await?;
        guard::is_string(&value, "screenshot")?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn element_location(&self, element: &ElementRef) -> Result<Point> {
        let rect = self.element_rect(element).await?;
        Ok(Point::new(rect.x.round() as i32, rect.y.round() as i32))
    }

    async fn element_size(&self, element: &ElementRef) -> Result<RectangleSize> {
        let rect = self.element_rect(element).await?;
        Ok(RectangleSize::new(
            rect.width.round() as u32,
            rect.height.round() as u32,
        ))
    }

    async fn scroll_position(&self) -> Result<Point> {
        let value = self.execute_script(SCROLL_POSITION_SCRIPT, Vec::new()).await?;
        let (x, y): (f64, f64) = guard::is_valid_type(&value, "scroll position")?;
        Ok(Point::new(x.round() as i32, y.round() as i32))
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    let fallback = format!("WebDriver returned status {}", status.as_u16());
    let parsed = serde_json::from_str::<Value>(body).ok();
    let value = parsed.as_ref().and_then(|v| v.get("value"));

    let error = value
        .and_then(|v| v.get("error"))
        .and_then(Value::as_str);
    let message = value
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str);

    match (error, message) {
        (Some(error), Some(message)) => format!("{error}: {message}"),
        (Some(error), None) => error.to_string(),
        (None, Some(message)) => message.to_string(),
        (None, None) => fallback,
    }
}
