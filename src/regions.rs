//! Region providers resolved against the live driver at check time.
//!
//! Static regions are already in screenshot coordinates. Element regions are
//! read from the driver in context-relative coordinates and converted onto
//! the screenshot; their size is taken as reported.

use async_trait::async_trait;
use tracing::debug;

use crate::capture::EyesScreenshot;
use crate::driver::{Driver, ElementRef};
use crate::error::Result;
use crate::geometry::{CoordinatesType, Region};
use crate::types::{FloatingMatchSettings, FloatingOffsets};

#[async_trait]
pub trait GetRegion: Send + Sync {
    async fn resolve(&self, driver: &dyn Driver, screenshot: &EyesScreenshot) -> Result<Region>;
}

#[async_trait]
pub trait GetFloatingRegion: Send + Sync {
    async fn resolve(
        &self,
        driver: &dyn Driver,
        screenshot: &EyesScreenshot,
    ) -> Result<FloatingMatchSettings>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionSource {
    Static(Region),
    Element(ElementRef),
}

impl From<Region> for RegionSource {
    fn from(region: Region) -> Self {
        RegionSource::Static(region)
    }
}

impl From<ElementRef> for RegionSource {
    fn from(element: ElementRef) -> Self {
        RegionSource::Element(element)
    }
}

#[async_trait]
impl GetRegion for RegionSource {
    async fn resolve(&self, driver: &dyn Driver, screenshot: &EyesScreenshot) -> Result<Region> {
        match self {
            RegionSource::Static(region) => Ok(*region),
            RegionSource::Element(element) => element_region(driver, screenshot, element).await,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FloatingRegionSource {
    Static(FloatingMatchSettings),
    Element {
        element: ElementRef,
        offsets: FloatingOffsets,
    },
}

impl FloatingRegionSource {
    pub fn region(region: Region, offsets: FloatingOffsets) -> Self {
        FloatingRegionSource::Static(FloatingMatchSettings::new(region, offsets))
    }

    pub fn element(element: ElementRef, offsets: FloatingOffsets) -> Self {
        FloatingRegionSource::Element { element, offsets }
    }
}

#[async_trait]
impl GetFloatingRegion for FloatingRegionSource {
    async fn resolve(
        &self,
        driver: &dyn Driver,
        screenshot: &EyesScreenshot,
    ) -> Result<FloatingMatchSettings> {
        match self {
            FloatingRegionSource::Static(settings) => Ok(*settings),
            FloatingRegionSource::Element { element, offsets } => {
                let region = element_region(driver, screenshot, element).await?;
                Ok(FloatingMatchSettings::new(region, *offsets))
            }
        }
    }
}

async fn element_region(
    driver: &dyn Driver,
    screenshot: &EyesScreenshot,
    element: &ElementRef,
) -> Result<Region> {
    let location = driver.element_location(element).await?;
    let size = driver.element_size(element).await?;

    let converted = screenshot.convert_location(
        location,
        CoordinatesType::ContextRelative,
        CoordinatesType::ScreenshotAsIs,
    );
    debug!(element = element.id(), ?location, ?converted, ?size, "resolved element region");

    Ok(Region::from_parts(converted, size))
}
