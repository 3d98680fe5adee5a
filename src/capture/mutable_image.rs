use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, GenericImageView, ImageFormat};

use crate::error::{EyesError, Result};
use crate::geometry::{Point, Region, RectangleSize};

/// Decoded screenshot held in memory.
#[derive(Debug, Clone)]
pub struct MutableImage {
    inner: DynamicImage,
}

impl MutableImage {
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| EyesError::capture(format!("screenshot is not valid base64: {e}")))?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let inner = image::load_from_memory(bytes)
            .map_err(|e| EyesError::capture(format!("failed to decode screenshot: {e}")))?;
        Self::from_image(inner)
    }

    pub fn from_image(inner: DynamicImage) -> Result<Self> {
        let (width, height) = inner.dimensions();
        if width == 0 || height == 0 {
            return Err(EyesError::capture(format!(
                "screenshot has no pixels ({width}x{height})"
            )));
        }
        Ok(Self { inner })
    }

    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    pub fn size(&self) -> RectangleSize {
        RectangleSize::new(self.width(), self.height())
    }

    pub fn bounds(&self) -> Region {
        Region::from_parts(Point::ZERO, self.size())
    }

    /// Cuts `region` out of the image. The region is clipped to the image
    /// bounds; a region entirely outside the image is a capture error.
    pub fn crop(&self, region: Region) -> Result<Self> {
        let clipped = self.bounds().intersect(&region);
        if clipped.is_empty() {
            return Err(EyesError::capture(format!(
                "region {region:?} lies outside the {}x{} screenshot",
                self.width(),
                self.height()
            )));
        }

        let inner = self.inner.crop_imm(
            clipped.left as u32,
            clipped.top as u32,
            clipped.width,
            clipped.height,
        );
        Ok(Self { inner })
    }

    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.inner.write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }

    pub fn to_base64(&self) -> Result<String> {
        Ok(STANDARD.encode(self.to_png_bytes()?))
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.inner
    }
}
