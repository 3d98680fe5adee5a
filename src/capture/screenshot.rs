use super::MutableImage;
use crate::error::Result;
use crate::geometry::{self, CoordinatesType, FrameOffsets, Point, Region, RectangleSize};

/// A captured image together with the offsets needed to map context
/// coordinates onto it.
#[derive(Debug, Clone)]
pub struct EyesScreenshot {
    image: MutableImage,
    offsets: FrameOffsets,
}

impl EyesScreenshot {
    pub fn new(image: MutableImage, offsets: FrameOffsets) -> Self {
        Self { image, offsets }
    }

    pub fn image(&self) -> &MutableImage {
        &self.image
    }

    pub fn into_image(self) -> MutableImage {
        self.image
    }

    pub fn offsets(&self) -> &FrameOffsets {
        &self.offsets
    }

    pub fn size(&self) -> RectangleSize {
        self.image.size()
    }

    pub fn convert_location(
        &self,
        location: Point,
        from: CoordinatesType,
        to: CoordinatesType,
    ) -> Point {
        geometry::convert_location(location, from, to, &self.offsets)
    }

    pub fn convert_region(&self, region: Region, from: CoordinatesType, to: CoordinatesType) -> Region {
        geometry::convert_region(region, from, to, &self.offsets)
    }

    /// Crops to `region` (screenshot coordinates). The frame location is
    /// shifted by the crop origin so conversions keep pointing at the same
    /// pixels.
    pub fn sub_screenshot(&self, region: Region) -> Result<Self> {
        let clipped = self.image.bounds().intersect(&region);
        let image = self.image.crop(region)?;
        let frame = self
            .offsets
            .frame_location_in_screenshot
            .offset(-clipped.left, -clipped.top);

        Ok(Self {
            image,
            offsets: FrameOffsets::new(frame, self.offsets.frame_scroll_position),
        })
    }
}
