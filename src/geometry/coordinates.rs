use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Point, Region};
use crate::error::EyesError;

/// Frame of reference a pixel coordinate is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoordinatesType {
    /// Relative to the top-left corner of the captured image.
    ScreenshotAsIs,
    /// Relative to the visible part of the current browsing context.
    ContextAsIs,
    /// Relative to the current browsing context's document origin, i.e.
    /// independent of its scroll position. Driver element locations are
    /// reported in this system.
    ContextRelative,
}

impl CoordinatesType {
    pub const fn all() -> [CoordinatesType; 3] {
        [
            CoordinatesType::ScreenshotAsIs,
            CoordinatesType::ContextAsIs,
            CoordinatesType::ContextRelative,
        ]
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            CoordinatesType::ScreenshotAsIs => "SCREENSHOT_AS_IS",
            CoordinatesType::ContextAsIs => "CONTEXT_AS_IS",
            CoordinatesType::ContextRelative => "CONTEXT_RELATIVE",
        }
    }
}

impl fmt::Display for CoordinatesType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoordinatesType {
    type Err = EyesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoordinatesType::all()
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                EyesError::illegal_type(format!("{s} is not member of CoordinatesType"))
            })
    }
}

/// Offsets known for the current screenshot. They come from the capture
/// context and are never computed by the conversion itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameOffsets {
    /// Where the current context's visible origin sits inside the screenshot.
    pub frame_location_in_screenshot: Point,
    /// Scroll position of the current context at capture time.
    pub frame_scroll_position: Point,
}

impl FrameOffsets {
    pub const fn new(frame_location_in_screenshot: Point, frame_scroll_position: Point) -> Self {
        Self {
            frame_location_in_screenshot,
            frame_scroll_position,
        }
    }
}

/// Converts `location` from one coordinate system to another using purely
/// additive offsets. Identical systems return the input unchanged.
pub fn convert_location(
    location: Point,
    from: CoordinatesType,
    to: CoordinatesType,
    offsets: &FrameOffsets,
) -> Point {
    use CoordinatesType::*;

    let frame = offsets.frame_location_in_screenshot;
    let scroll = offsets.frame_scroll_position;

    match (from, to) {
        (ContextAsIs, ContextRelative) => location.offset_by(scroll),
        (ContextAsIs, ScreenshotAsIs) => location.offset_by(frame),
        (ContextRelative, ContextAsIs) => location.offset_by(scroll.negated()),
        (ContextRelative, ScreenshotAsIs) => location.offset_by(scroll.negated()).offset_by(frame),
        (ScreenshotAsIs, ContextAsIs) => location.offset_by(frame.negated()),
        (ScreenshotAsIs, ContextRelative) => location.offset_by(frame.negated()).offset_by(scroll),
        (ScreenshotAsIs, ScreenshotAsIs)
        | (ContextAsIs, ContextAsIs)
        | (ContextRelative, ContextRelative) => location,
    }
}

/// Converts the origin of `region`; width and height are identical in every
/// coordinate system.
pub fn convert_region(
    region: Region,
    from: CoordinatesType,
    to: CoordinatesType,
    offsets: &FrameOffsets,
) -> Region {
    Region::from_parts(
        convert_location(region.location(), from, to, offsets),
        region.size(),
    )
}
