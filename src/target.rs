//! Fluent description of a single checkpoint.

use tracing::debug;

use crate::capture::EyesScreenshot;
use crate::driver::{Driver, ElementRef};
use crate::error::Result;
use crate::geometry::Region;
use crate::regions::{FloatingRegionSource, GetFloatingRegion, GetRegion, RegionSource};
use crate::types::{FloatingOffsets, ImageMatchSettings, MatchLevel, MatchRegions};

/// What part of the viewport a checkpoint captures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckScope {
    Window,
    /// Fixed region in screenshot coordinates.
    Region(Region),
    Element(ElementRef),
}

/// A checkpoint: its scope, the region providers to resolve against the
/// captured screenshot, and overrides of the session's default settings.
///
/// ```
/// use eyes_core::{CheckTarget, FloatingOffsets, MatchLevel, Region};
///
/// let target = CheckTarget::window()
///     .ignore(Region::new(0, 0, 1200, 60))
///     .floating(Region::new(10, 200, 300, 40), FloatingOffsets::new(5, 5, 2, 2))
///     .match_level(MatchLevel::Layout);
/// assert_eq!(target.region_count(), 2);
/// ```
pub struct CheckTarget {
    scope: CheckScope,
    ignore: Vec<Box<dyn GetRegion>>,
    floating: Vec<Box<dyn GetFloatingRegion>>,
    strict: Vec<Box<dyn GetRegion>>,
    layout: Vec<Box<dyn GetRegion>>,
    content: Vec<Box<dyn GetRegion>>,
    match_level: Option<MatchLevel>,
    ignore_caret: Option<bool>,
    ignore_mismatch: bool,
}

impl CheckTarget {
    fn with_scope(scope: CheckScope) -> Self {
        Self {
            scope,
            ignore: Vec::new(),
            floating: Vec::new(),
            strict: Vec::new(),
            layout: Vec::new(),
            content: Vec::new(),
            match_level: None,
            ignore_caret: None,
            ignore_mismatch: false,
        }
    }

    pub fn window() -> Self {
        Self::with_scope(CheckScope::Window)
    }

    pub fn region(region: Region) -> Self {
        Self::with_scope(CheckScope::Region(region))
    }

    pub fn element(element: ElementRef) -> Self {
        Self::with_scope(CheckScope::Element(element))
    }

    pub fn ignore(mut self, source: impl Into<RegionSource>) -> Self {
        self.ignore.push(Box::new(source.into()));
        self
    }

    pub fn floating(mut self, source: impl Into<RegionSource>, offsets: FloatingOffsets) -> Self {
        let floating = match source.into() {
            RegionSource::Static(region) => FloatingRegionSource::region(region, offsets),
            RegionSource::Element(element) => FloatingRegionSource::element(element, offsets),
        };
        self.floating.push(Box::new(floating));
        self
    }

    pub fn strict(mut self, source: impl Into<RegionSource>) -> Self {
        self.strict.push(Box::new(source.into()));
        self
    }

    pub fn layout(mut self, source: impl Into<RegionSource>) -> Self {
        self.layout.push(Box::new(source.into()));
        self
    }

    pub fn content(mut self, source: impl Into<RegionSource>) -> Self {
        self.content.push(Box::new(source.into()));
        self
    }

    /// Adds a custom provider to the ignore list.
    pub fn ignore_with(mut self, provider: impl GetRegion + 'static) -> Self {
        self.ignore.push(Box::new(provider));
        self
    }

    pub fn floating_with(mut self, provider: impl GetFloatingRegion + 'static) -> Self {
        self.floating.push(Box::new(provider));
        self
    }

    pub fn match_level(mut self, level: MatchLevel) -> Self {
        self.match_level = Some(level);
        self
    }

    pub fn ignore_caret(mut self, ignore_caret: bool) -> Self {
        self.ignore_caret = Some(ignore_caret);
        self
    }

    pub fn ignore_mismatch(mut self, ignore_mismatch: bool) -> Self {
        self.ignore_mismatch = ignore_mismatch;
        self
    }

    pub fn scope(&self) -> &CheckScope {
        &self.scope
    }

    pub fn is_mismatch_ignored(&self) -> bool {
        self.ignore_mismatch
    }

    pub fn region_count(&self) -> usize {
        self.ignore.len()
            + self.floating.len()
            + self.strict.len()
            + self.layout.len()
            + self.content.len()
    }

    /// Session defaults with this target's overrides applied. Region lists
    /// are not part of the result; they are resolved separately.
    pub fn effective_settings(&self, defaults: &ImageMatchSettings) -> ImageMatchSettings {
        let mut settings = defaults.without_regions();
        if let Some(level) = self.match_level {
            settings.match_level = level;
        }
        if let Some(ignore_caret) = self.ignore_caret {
            settings.ignore_caret = ignore_caret;
        }
        settings
    }

    /// Resolves every provider, one at a time, against `screenshot`.
    pub async fn resolve_regions(
        &self,
        driver: &dyn Driver,
        screenshot: &EyesScreenshot,
    ) -> Result<MatchRegions> {
        debug!(count = self.region_count(), "resolving check regions");
        Ok(MatchRegions {
            ignore: resolve_all(&self.ignore, driver, screenshot).await?,
            floating: {
                let mut resolved = Vec::with_capacity(self.floating.len());
                for provider in &self.floating {
                    resolved.push(provider.resolve(driver, screenshot).await?);
                }
                resolved
            },
            strict: resolve_all(&self.strict, driver, screenshot).await?,
            layout: resolve_all(&self.layout, driver, screenshot).await?,
            content: resolve_all(&self.content, driver, screenshot).await?,
        })
    }
}

async fn resolve_all(
    providers: &[Box<dyn GetRegion>],
    driver: &dyn Driver,
    screenshot: &EyesScreenshot,
) -> Result<Vec<Region>> {
    let mut resolved = Vec::with_capacity(providers.len());
    for provider in providers {
        resolved.push(provider.resolve(driver, screenshot).await?);
    }
    Ok(resolved)
}
