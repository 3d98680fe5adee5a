use async_trait::async_trait;
use tracing::debug;

use super::{EyesScreenshot, MutableImage};
use crate::driver::Driver;
use crate::error::{EyesError, Result};
use crate::geometry::{FrameOffsets, Point, Region};

/// Produces the image a checkpoint is matched against, together with the
/// offsets that place the driver's context onto that image.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn get_image(&self, driver: &dyn Driver) -> Result<EyesScreenshot>;
}

/// Captures the visible viewport.
#[derive(Debug, Clone, Copy, Default)]
pub struct TakesScreenshotImageProvider;

#[async_trait]
impl ImageProvider for TakesScreenshotImageProvider {
    async fn get_image(&self, driver: &dyn Driver) -> Result<EyesScreenshot> {
        debug!("capturing viewport screenshot");
        let encoded = driver.take_screenshot().await.map_err(as_capture_error)?;
        let image = MutableImage::from_base64(&encoded)?;
        let scroll = driver.scroll_position().await?;
        Ok(EyesScreenshot::new(
            image,
            FrameOffsets::new(Point::ZERO, scroll),
        ))
    }
}

/// Captures the viewport and keeps only a fixed region of it.
#[derive(Debug, Clone, Copy)]
pub struct RegionImageProvider {
    region: Region,
}

impl RegionImageProvider {
    pub fn new(region: Region) -> Self {
        Self { region }
    }

    pub fn region(&self) -> Region {
        self.region
    }
}

#[async_trait]
impl ImageProvider for RegionImageProvider {
    async fn get_image(&self, driver: &dyn Driver) -> Result<EyesScreenshot> {
        let full = TakesScreenshotImageProvider.get_image(driver).await?;
        debug!(region = ?self.region, "cropping screenshot to region");
        full.sub_screenshot(self.region)
    }
}

fn as_capture_error(err: EyesError) -> EyesError {
    match err {
        EyesError::Capture(_) => err,
        other => EyesError::capture(format!("driver failed to take screenshot: {other}")),
    }
}
