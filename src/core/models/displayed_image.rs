use iced::widget::image as iced_image;
use image::{RgbImage, RgbaImage};

/// Rendered screen ready for display, saving or copying.
#[derive(Clone)]
pub struct DisplayedImage {
    pub image_handle: iced_image::Handle,
    pub width: u32,
    pub height: u32,
    pixels: RgbImage,
}

impl std::fmt::Debug for DisplayedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl DisplayedImage {
    pub fn build_from_rgb(pixels: RgbImage) -> Self {
        let (width, height) = pixels.dimensions();
        log::debug!("[DISPLAYED_IMAGE] building image: {}x{}", width, height);

        let rgba = Self::expand_to_rgba(&pixels);

        Self {
            image_handle: iced_image::Handle::from_rgba(width, height, rgba.into_raw()),
            width,
            height,
            pixels,
        }
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn to_rgba(&self) -> RgbaImage {
        Self::expand_to_rgba(&self.pixels)
    }

    fn expand_to_rgba(pixels: &RgbImage) -> RgbaImage {
        image::DynamicImage::ImageRgb8(pixels.clone()).to_rgba8()
    }
}
