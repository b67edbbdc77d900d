//! Capture-display pipeline: device framebuffer in, displayable image out.
//!
//! Every refresh is `capture -> rotate -> scale`, always in that order, so the
//! same raw capture always renders to the same image.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgb, RgbImage};
use thiserror::Error;

use crate::core::interfaces::ports::{DeviceBridge, ImageClipboard};
use crate::core::models::save_target::ensure_png_extension;
use crate::core::models::{DeviceInfo, DisplayScale, DisplayedImage, RawCapture, Rotation};
use crate::global_constants::{LOG_TAG_CLIPBOARD, LOG_TAG_PIPELINE, MESSAGE_FRAMEBUFFER_UNAVAILABLE};

/// Resampling used for every rescale.
pub const RESAMPLING_FILTER: FilterType = FilterType::Nearest;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("unable to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to encode {path} as PNG: {message}")]
    Encode { path: PathBuf, message: String },
}

/// Result of one refresh: the base capture is kept so rotation can be re-applied without re-capturing.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    Captured {
        base: RawCapture,
        image: DisplayedImage,
    },
    Unavailable,
}

pub struct CapturePipeline {
    bridge: Arc<dyn DeviceBridge>,
}

impl CapturePipeline {
    pub fn build(bridge: Arc<dyn DeviceBridge>) -> Self {
        Self { bridge }
    }

    /// Grabs a fresh framebuffer; every bridge failure collapses to `None`.
    pub fn capture(&self, device: &DeviceInfo) -> Option<RawCapture> {
        match self.bridge.capture_framebuffer(device) {
            Ok(capture) => {
                log::info!(
                    "{} captured {}x{} frame at {} bpp from {}",
                    LOG_TAG_PIPELINE,
                    capture.width,
                    capture.height,
                    capture.bits_per_pixel,
                    device.serial
                );
                Some(capture)
            }
            Err(error) => {
                log::warn!("{} {}: {}", LOG_TAG_PIPELINE, MESSAGE_FRAMEBUFFER_UNAVAILABLE, error);
                None
            }
        }
    }

    #[allow(dead_code)]
    pub fn rotate(capture: &RawCapture) -> RawCapture {
        capture.rotated_clockwise()
    }

    pub fn to_image(capture: &RawCapture, scale: DisplayScale) -> DisplayedImage {
        let decoded: RgbImage = ImageBuffer::from_fn(capture.width, capture.height, |x, y| {
            Rgb(capture.rgb_at(x, y))
        });

        if scale.is_identity() {
            return DisplayedImage::build_from_rgb(decoded);
        }

        let target_width = scale.scale_length(capture.width);
        let target_height = scale.scale_length(capture.height);
        log::debug!(
            "{} resizing {}x{} -> {}x{} (scale {})",
            LOG_TAG_PIPELINE,
            capture.width,
            capture.height,
            target_width,
            target_height,
            scale
        );

        let resized = imageops::resize(&decoded, target_width, target_height, RESAMPLING_FILTER);
        DisplayedImage::build_from_rgb(resized)
    }

    /// Rotation first, then scale.
    pub fn render(capture: &RawCapture, rotation: Rotation, scale: DisplayScale) -> DisplayedImage {
        let rotated = rotation.apply_to(capture);
        Self::to_image(&rotated, scale)
    }

    pub fn refresh(
        &self,
        device: &DeviceInfo,
        rotation: Rotation,
        scale: DisplayScale,
    ) -> RefreshOutcome {
        match self.capture(device) {
            Some(base) => {
                let image = Self::render(&base, rotation, scale);
                RefreshOutcome::Captured { base, image }
            }
            None => RefreshOutcome::Unavailable,
        }
    }

    /// Writes `image` as PNG, appending the extension when missing; returns the path written.
    pub fn save_as_png(image: &DisplayedImage, path: &Path) -> Result<PathBuf, SaveError> {
        let path = ensure_png_extension(path);
        log::debug!("{} saving image to {:?}", LOG_TAG_PIPELINE, path);

        image
            .pixels()
            .save_with_format(&path, image::ImageFormat::Png)
            .map_err(|error| match error {
                image::ImageError::IoError(source) => SaveError::Io {
                    path: path.clone(),
                    source,
                },
                other => SaveError::Encode {
                    path: path.clone(),
                    message: other.to_string(),
                },
            })?;

        log::info!("{} saved {}x{} image to {:?}", LOG_TAG_PIPELINE, image.width, image.height, path);
        Ok(path)
    }

    /// Best-effort; returns whether the clipboard accepted the image.
    pub fn copy_to_clipboard(clipboard: &dyn ImageClipboard, image: &DisplayedImage) -> bool {
        match clipboard.copy_image(image) {
            Ok(()) => {
                log::info!("{} image copied to clipboard", LOG_TAG_CLIPBOARD);
                true
            }
            Err(error) => {
                log::warn!("{} failed to copy image: {:#}", LOG_TAG_CLIPBOARD, error);
                false
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::core::models::raw_capture::test_support::indexed_capture;

    fn device() -> DeviceInfo {
        DeviceInfo::new("emulator-5554", "device")
    }

    struct FailingClipboard;
    impl ImageClipboard for FailingClipboard {
        fn copy_image(&self, _image: &DisplayedImage) -> anyhow::Result<()> {
            anyhow::bail!("no display server")
        }
    }

    #[test]
    fn test_capture_failures_of_every_kind_are_unavailable() {
        for kind in [FailureKind::Io, FailureKind::Timeout, FailureKind::Rejected] {
            let pipeline = CapturePipeline::build(Arc::new(MockDeviceBridge::failing(kind)));

            assert!(pipeline.capture(&device()).is_none());
            assert!(matches!(
                pipeline.refresh(&device(), Rotation::Deg0, DisplayScale::IDENTITY),
                RefreshOutcome::Unavailable
            ));
        }
    }

    #[test]
    fn test_to_image_at_identity_scale_keeps_dimensions() {
        let capture = indexed_capture(9, 4);

        let image = CapturePipeline::to_image(&capture, DisplayScale::IDENTITY);

        assert_eq!((image.width, image.height), (9, 4));
        assert_eq!(image.pixels().get_pixel(3, 0).0, capture.rgb_at(3, 0));
    }

    #[test]
    fn test_to_image_scales_to_rounded_dimensions() {
        let capture = indexed_capture(9, 5);

        for (factor, expected) in [(0.5, (5, 3)), (1.0, (9, 5)), (2.0, (18, 10))] {
            let scale = DisplayScale::new(factor).unwrap();

            let image = CapturePipeline::to_image(&capture, scale);

            assert_eq!((image.width, image.height), expected, "scale {}", factor);
        }
    }

    #[test]
    fn test_to_image_nearest_resampling_duplicates_pixels() {
        let capture = indexed_capture(2, 1);

        let image = CapturePipeline::to_image(&capture, DisplayScale::new(2.0).unwrap());

        assert_eq!(image.pixels().get_pixel(0, 0), image.pixels().get_pixel(1, 1));
        assert_eq!(image.pixels().get_pixel(2, 0).0, capture.rgb_at(1, 0));
    }

    #[test]
    fn test_render_rotates_before_scaling() {
        let capture = indexed_capture(4, 2);

        let image = CapturePipeline::render(&capture, Rotation::Deg90, DisplayScale::new(0.5).unwrap());

        assert_eq!((image.width, image.height), (1, 2));
    }

    #[test]
    fn test_refresh_is_deterministic_for_same_capture() {
        let capture = indexed_capture(6, 3);
        let bridge = MockDeviceBridge::returning(vec![Ok(capture.clone()), Ok(capture)]);
        let pipeline = CapturePipeline::build(Arc::new(bridge));
        let scale = DisplayScale::new(2.0).unwrap();

        let first = pipeline.refresh(&device(), Rotation::Deg270, scale);
        let second = pipeline.refresh(&device(), Rotation::Deg270, scale);

        match (first, second) {
            (
                RefreshOutcome::Captured { image: a, .. },
                RefreshOutcome::Captured { image: b, .. },
            ) => assert_eq!(a.pixels(), b.pixels()),
            _ => panic!("expected two captured images"),
        }
    }

    #[test]
    fn test_refresh_keeps_unrotated_base_capture() {
        let capture = indexed_capture(6, 3);
        let bridge = MockDeviceBridge::returning(vec![Ok(capture.clone())]);
        let pipeline = CapturePipeline::build(Arc::new(bridge));

        match pipeline.refresh(&device(), Rotation::Deg90, DisplayScale::IDENTITY) {
            RefreshOutcome::Captured { base, image } => {
                assert_eq!(base, capture);
                assert_eq!((image.width, image.height), (3, 6));
            }
            RefreshOutcome::Unavailable => panic!("expected captured image"),
        }
    }

    #[test]
    fn test_rotate_four_times_is_identity() {
        let capture = indexed_capture(3, 7);

        let mut rotated = capture.clone();
        for _ in 0..4 {
            rotated = CapturePipeline::rotate(&rotated);
        }

        assert_eq!(rotated.data(), capture.data());
    }

    #[test]
    fn test_save_as_png_appends_extension_once_and_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let image = CapturePipeline::to_image(&indexed_capture(4, 4), DisplayScale::IDENTITY);

        let written = CapturePipeline::save_as_png(&image, &dir.path().join("screen")).unwrap();

        assert_eq!(written, dir.path().join("screen.png"));
        let reloaded = image::open(&written).unwrap().to_rgb8();
        assert_eq!(&reloaded, image.pixels());
    }

    #[test]
    fn test_save_as_png_to_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let image = CapturePipeline::to_image(&indexed_capture(2, 2), DisplayScale::IDENTITY);

        let result = CapturePipeline::save_as_png(&image, &dir.path().join("missing").join("shot.png"));

        assert!(matches!(result, Err(SaveError::Io { .. })));
    }

    #[test]
    fn test_copy_to_clipboard_failure_is_not_fatal() {
        let image = CapturePipeline::to_image(&indexed_capture(2, 2), DisplayScale::IDENTITY);

        assert!(!CapturePipeline::copy_to_clipboard(&FailingClipboard, &image));
    }
}
