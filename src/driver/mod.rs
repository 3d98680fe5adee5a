//! Browser-automation driver seam.
//!
//! The orchestrator only needs three suspending reads from a driver: a
//! screenshot, an element's location and an element's size. [`WebDriverClient`]
//! implements them over the W3C WebDriver HTTP protocol; tests plug in their
//! own implementations.

mod webdriver;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::geometry::{Point, RectangleSize};

pub use webdriver::{WebDriverClient, ELEMENT_KEY};

/// Opaque handle of an element inside the driver's current browsing context.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef(String);

impl ElementRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

#[async_trait]
pub trait Driver: Send + Sync {
    /// Base64-encoded PNG of the current viewport.
    async fn take_screenshot(&self) -> Result<String>;

    /// Element origin in context-relative coordinates.
    async fn element_location(&self, element: &ElementRef) -> Result<Point>;

    async fn element_size(&self, element: &ElementRef) -> Result<RectangleSize>;

    /// Scroll position of the current context. Drivers that cannot scroll
    /// report the origin.
    async fn scroll_position(&self) -> Result<Point> {
        Ok(Point::ZERO)
    }
}

#[async_trait]
impl<D: Driver + ?Sized> Driver for Arc<D> {
    async fn take_screenshot(&self) -> Result<String> {
        (**self).take_screenshot().await
    }

    async fn element_location(&self, element: &ElementRef) -> Result<Point> {
        (**self).element_location(element).await
    }

    async fn element_size(&self, element: &ElementRef) -> Result<RectangleSize> {
        (**self).element_size(element).await
    }

    async fn scroll_position(&self) -> Result<Point> {
        (**self).scroll_position().await
    }
}
