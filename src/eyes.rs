//! Session orchestrator: open, any number of checks, then exactly one close
//! or abort.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::capture::{ImageProvider, TakesScreenshotImageProvider};
use crate::config::EyesConfig;
use crate::driver::Driver;
use crate::error::{EyesError, Result};
use crate::geometry::RectangleSize;
use crate::guard;
use crate::regions::{GetRegion, RegionSource};
use crate::server::ServerConnector;
use crate::target::{CheckScope, CheckTarget};
use crate::types::{
    AppEnvironment, AppOutput, BatchDefaults, BatchInfo, CheckResult, ImageMatchSettings,
    MatchWindowData, PropertyData, RunningSession, SessionEndRequest, SessionStartInfo,
    TestResults,
};

/// Identifies this library to the server.
pub const AGENT_ID: &str = concat!("eyes-core/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Idle,
    Open,
    /// At least one checkpoint has been submitted.
    Checking,
    Closed,
    Aborted,
}

impl SessionState {
    pub fn is_open(&self) -> bool {
        matches!(self, SessionState::Open | SessionState::Checking)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Closed | SessionState::Aborted)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Open => "open",
            SessionState::Checking => "checking",
            SessionState::Closed => "closed",
            SessionState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Drives one visual test against the comparison server.
///
/// All session operations take `&mut self`, so a single instance can never
/// run two of them at once. Run separate tests on separate instances.
pub struct Eyes {
    config: EyesConfig,
    connector: Arc<dyn ServerConnector>,
    state: SessionState,
    driver: Option<Box<dyn Driver>>,
    running_session: Option<RunningSession>,
    batch: Option<Arc<BatchInfo>>,
    default_match_settings: ImageMatchSettings,
    properties: Vec<PropertyData>,
    image_provider: Box<dyn ImageProvider>,
}

impl Eyes {
    pub fn new(config: EyesConfig, connector: Arc<dyn ServerConnector>) -> Self {
        let mut default_match_settings = ImageMatchSettings::new(config.match_level);
        default_match_settings.ignore_caret = config.ignore_caret;

        Self {
            config,
            connector,
            state: SessionState::Idle,
            driver: None,
            running_session: None,
            batch: None,
            default_match_settings,
            properties: Vec::new(),
            image_provider: Box::new(TakesScreenshotImageProvider),
        }
    }

    pub fn config(&self) -> &EyesConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn running_session(&self) -> Option<&RunningSession> {
        self.running_session.as_ref()
    }

    /// The batch the next session joins, created from the configured
    /// defaults on first access.
    pub fn batch(&mut self) -> Arc<BatchInfo> {
        let defaults = &self.config.batch;
        self.batch
            .get_or_insert_with(|| Arc::new(BatchInfo::with_defaults(defaults)))
            .clone()
    }

    /// Adopts `batch` as is; it is shared, never copied or modified.
    pub fn set_batch(&mut self, batch: impl Into<Arc<BatchInfo>>) {
        self.batch = Some(batch.into());
    }

    /// Starts a fresh batch called `name`. A batch id from the configuration
    /// is kept so runs sharing that id still land in the same batch.
    pub fn set_batch_name(&mut self, name: impl Into<String>) {
        let defaults = BatchDefaults {
            id: self.config.batch.id.clone(),
            name: Some(name.into()),
        };
        self.batch = Some(Arc::new(BatchInfo::with_defaults(&defaults)));
    }

    pub fn reset_batch(&mut self) {
        self.batch = None;
    }

    pub fn default_match_settings(&self) -> &ImageMatchSettings {
        &self.default_match_settings
    }

    pub fn set_default_match_settings(&mut self, settings: ImageMatchSettings) {
        self.default_match_settings = settings;
    }

    pub fn add_property(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        self.properties.push(PropertyData::new(name, value)?);
        Ok(())
    }

    pub fn clear_properties(&mut self) {
        self.properties.clear();
    }

    pub fn set_image_provider(&mut self, provider: impl ImageProvider + 'static) {
        self.image_provider = Box::new(provider);
    }

    /// Starts a server session. Only valid on a fresh instance; on failure
    /// the instance stays idle and the driver is dropped.
    pub async fn open<D>(
        &mut self,
        driver: D,
        app_name: &str,
        test_name: &str,
        viewport_size: RectangleSize,
    ) -> Result<()>
    where
        D: Driver + 'static,
    {
        guard::is_valid_state(
            self.state == SessionState::Idle,
            &format!("Eyes cannot be opened while {}", self.state),
        )?;
        guard::not_null_or_empty(Some(app_name), "appName")?;
        guard::not_null_or_empty(Some(test_name), "testName")?;
        guard::greater_than_zero(f64::from(viewport_size.width), "viewportSize.width", true)?;
        guard::greater_than_zero(f64::from(viewport_size.height), "viewportSize.height", true)?;

        let batch = self.batch();
        let environment = AppEnvironment::new(
            self.config.host_os.clone(),
            self.config.host_app.clone(),
            Some(viewport_size),
        );

        let start_info = SessionStartInfo::new(
            AGENT_ID,
            self.config.session_type,
            app_name,
            None,
            test_name,
            batch,
            self.config.baseline_env_name.clone(),
            self.config.environment_name.clone(),
            environment,
            self.default_match_settings.clone(),
            self.config.branch_name.clone(),
            self.config.parent_branch_name.clone(),
            self.properties.clone(),
        )?;
        debug!(%start_info, "opening session");

        let session = match self.connector.start_session(&start_info).await {
            Ok(session) => session,
            Err(err) => {
                warn!(app = app_name, test = test_name, error = %err, "failed to start session");
                return Err(err);
            }
        };

        info!(
            session = %session.id,
            app = app_name,
            test = test_name,
            is_new = session.is_new,
            "session opened"
        );
        self.driver = Some(Box::new(driver));
        self.running_session = Some(session);
        self.state = SessionState::Open;
        Ok(())
    }

    /// Captures, resolves regions and submits one checkpoint. A failed
    /// check changes nothing; the session stays usable.
    pub async fn check(&mut self, tag: &str, target: &CheckTarget) -> Result<CheckResult> {
        guard::is_valid_state(self.state.is_open(), "Eyes not open")?;
        let (driver, session) = match (self.driver.as_deref(), self.running_session.as_ref()) {
            (Some(driver), Some(session)) => (driver, session),
            _ => return Err(EyesError::illegal_state("Eyes not open")),
        };

        let screenshot = self.image_provider.get_image(driver).await?;

        let screenshot = match target.scope() {
            CheckScope::Window => screenshot,
            CheckScope::Region(region) => screenshot.sub_screenshot(*region)?,
            CheckScope::Element(element) => {
                let region = RegionSource::Element(element.clone())
                    .resolve(driver, &screenshot)
                    .await?;
                screenshot.sub_screenshot(region)?
            }
        };

        let regions = target.resolve_regions(driver, &screenshot).await?;
        let data = MatchWindowData {
            tag: tag.to_string(),
            image: AppOutput {
                screenshot64: screenshot.image().to_base64()?,
                title: None,
            },
            ignore_mismatch: target.is_mismatch_ignored(),
            regions,
            match_settings: target.effective_settings(&self.default_match_settings),
        };

        debug!(
            session = %session.id,
            tag,
            size = ?screenshot.size(),
            "submitting checkpoint"
        );
        let result = self.connector.match_window(session, &data).await?;
        let check = CheckResult::from_match(tag, &result, session.is_new);
        info!(session = %session.id, tag, outcome = ?check.outcome, "checkpoint matched");

        self.state = SessionState::Checking;
        Ok(check)
    }

    /// Ends the session. The instance is closed afterwards even when the
    /// server call fails.
    pub async fn close(&mut self) -> Result<TestResults> {
        match self.state {
            SessionState::Open | SessionState::Checking => {}
            SessionState::Closed => return Err(EyesError::illegal_state("Eyes already closed")),
            SessionState::Aborted => return Err(EyesError::illegal_state("Eyes already aborted")),
            SessionState::Idle => return Err(EyesError::illegal_state("Eyes not open")),
        }

        self.state = SessionState::Closed;
        self.driver = None;
        let session = self
            .running_session
            .take()
            .ok_or_else(|| EyesError::illegal_state("Eyes not open"))?;

        let update_baseline = if session.is_new {
            self.config.save_new_tests
        } else {
            self.config.save_failed_tests
        };
        let request = SessionEndRequest {
            session_id: session.id.clone(),
            is_aborted: false,
            update_baseline,
        };

        match self.connector.stop_session(&session, &request).await {
            Ok(results) => {
                info!(
                    session = %session.id,
                    passed = results.is_passed(),
                    steps = results.steps,
                    mismatches = results.mismatches,
                    "session closed"
                );
                Ok(results)
            }
            Err(err) => {
                warn!(session = %session.id, error = %err, "failed to close session");
                Err(err)
            }
        }
    }

    /// Aborts an open session. Does nothing, successfully, when no session
    /// is open.
    pub async fn abort(&mut self) -> Result<Option<TestResults>> {
        if !self.state.is_open() {
            debug!(state = %self.state, "abort skipped; no open session");
            return Ok(None);
        }

        self.state = SessionState::Aborted;
        self.driver = None;
        let Some(session) = self.running_session.take() else {
            return Ok(None);
        };

        let request = SessionEndRequest {
            session_id: session.id.clone(),
            is_aborted: true,
            update_baseline: false,
        };

        match self.connector.stop_session(&session, &request).await {
            Ok(results) => {
                info!(session = %session.id, "session aborted");
                Ok(Some(results))
            }
            Err(err) => {
                warn!(session = %session.id, error = %err, "failed to abort session");
                Err(err)
            }
        }
    }

    /// Cleanup for `finally`-style paths: aborts an open session and never
    /// fails. Abort errors are logged and dropped.
    pub async fn abort_if_not_closed(&mut self) -> Option<TestResults> {
        match self.abort().await {
            Ok(results) => results,
            Err(err) => {
                warn!(error = %err, "ignoring abort failure during cleanup");
                None
            }
        }
    }
}

impl fmt::Debug for Eyes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Eyes")
            .field("state", &self.state)
            .field("running_session", &self.running_session)
            .field("batch", &self.batch)
            .field("default_match_settings", &self.default_match_settings)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

impl Drop for Eyes {
    fn drop(&mut self) {
        if self.state.is_open() {
            let session = self.running_session.as_ref().map(|s| s.id.as_str());
            warn!(?session, "Eyes dropped with an open session; call close() or abort()");
        }
    }
}
