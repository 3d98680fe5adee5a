//! Screenshot capture and the image/coordinate wrapper handed to region
//! resolution.

mod mutable_image;
mod provider;
mod screenshot;

pub use mutable_image::MutableImage;
pub use provider::{ImageProvider, RegionImageProvider, TakesScreenshotImageProvider};
pub use screenshot::EyesScreenshot;
