//! Geometry value types and coordinate-system conversion.
//!
//! - [`Point`] and [`Region`] - pixel positions and axis-aligned rectangles
//! - [`RectangleSize`] - width × height, parseable from `WIDTHxHEIGHT`
//! - [`CoordinatesType`] - the frame of reference a coordinate is expressed in
//! - [`convert_location`] - the one conversion with algorithmic content

mod coordinates;
mod region;
mod size;

pub use coordinates::{convert_location, convert_region, CoordinatesType, FrameOffsets};
pub use region::{Point, Region};
pub use size::RectangleSize;
