//! Eyes Core Library
//!
//! Session orchestration for visual regression tests: opens a session on a
//! remote comparison server, captures checkpoints through a browser driver,
//! maps element regions onto the captured screenshots and closes or aborts
//! the session exactly once.
//!
//! # Module Overview
//!
//! - [`eyes`] - The [`Eyes`] session state machine
//! - [`target`] - [`CheckTarget`] checkpoint descriptions
//! - [`capture`] - Screenshot decoding, cropping and image providers
//! - [`regions`] - Region providers resolved at check time
//! - [`geometry`] - Points, regions and coordinate conversion
//! - [`driver`] - Driver seam and a W3C WebDriver client
//! - [`server`] - Server seam and the HTTP connector
//! - [`types`] - Batch, session-start and request/response shapes
//! - [`guard`] - Argument validation
//! - [`config`] - Configuration from TOML files and `APPLITOOLS_*` variables
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use eyes_core::{CheckTarget, Eyes, EyesConfig, HttpServerConnector, RectangleSize, WebDriverClient};
//!
//! # async fn example() -> eyes_core::Result<()> {
//! let config = EyesConfig::load(None)?;
//! let connector = Arc::new(HttpServerConnector::from_config(&config)?);
//! let driver = WebDriverClient::new("http://localhost:4444", "session-id")?;
//!
//! let mut eyes = Eyes::new(config, connector);
//! eyes.open(driver, "Shop", "Checkout", RectangleSize::new(1200, 800)).await?;
//! if let Err(err) = eyes.check("cart", &CheckTarget::window()).await {
//!     eyes.abort_if_not_closed().await;
//!     return Err(err);
//! }
//! let results = eyes.close().await?;
//! println!("passed: {}", results.is_passed());
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod config;
pub mod driver;
pub mod error;
pub mod eyes;
pub mod geometry;
pub mod guard;
pub mod regions;
pub mod server;
pub mod target;
pub mod types;

pub use capture::{
    EyesScreenshot, ImageProvider, MutableImage, RegionImageProvider,
    TakesScreenshotImageProvider,
};
pub use config::EyesConfig;
pub use driver::{Driver, ElementRef, WebDriverClient};
pub use error::{ErrorCategory, ErrorPayload, EyesError, Result};
pub use eyes::{Eyes, SessionState, AGENT_ID};
pub use geometry::{
    convert_location, convert_region, CoordinatesType, FrameOffsets, Point, RectangleSize, Region,
};
pub use regions::{FloatingRegionSource, GetFloatingRegion, GetRegion, RegionSource};
pub use server::{HttpServerConnector, ServerConnector};
pub use target::{CheckScope, CheckTarget};
pub use types::{
    AppEnvironment, AppOutput, BatchDefaults, BatchInfo, CheckResult, ExactMatchSettings,
    FloatingMatchSettings, FloatingOffsets, ImageMatchSettings, MatchLevel, MatchOutcome,
    MatchRegions, MatchResult, MatchWindowData, PropertyData, RunningSession, SessionEndRequest,
    SessionStartInfo, SessionType, TestResults, TestResultsStatus,
};
