//! Label photo preprocessing.
//!
//! Recognition accuracy degrades sharply on small label photos, and phone
//! uploads are often slightly out of focus or compression-blurred. Small
//! images are upscaled with a cubic filter and every image gets an
//! unsharp-mask pass before recognition.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use tracing::debug;

use crate::config::PreprocessConfig;

/// Preprocessor for label photos.
pub struct LabelPreprocessor {
    /// Longer side below which an image is upscaled.
    upscale_trigger: u32,
    /// Target longer side when upscaling.
    upscale_target: u32,
    /// Upper bound on the upscale factor.
    upscale_cap: f32,
    /// Gaussian sigma for the sharpening pass.
    sharpen_sigma: f32,
}

// Scale factors at or below this are not worth the resample.
const MIN_USEFUL_SCALE: f32 = 1.05;

impl LabelPreprocessor {
    /// Create a preprocessor with default settings.
    pub fn new() -> Self {
        Self::from_config(&PreprocessConfig::default())
    }

    /// Create a preprocessor from configuration.
    pub fn from_config(config: &PreprocessConfig) -> Self {
        Self {
            upscale_trigger: config.upscale_trigger,
            upscale_target: config.upscale_target,
            upscale_cap: config.upscale_cap,
            sharpen_sigma: config.sharpen_sigma,
        }
    }

    /// Prepare a label photo for recognition: upscale if small, then sharpen.
    pub fn prepare(&self, image: &DynamicImage) -> DynamicImage {
        let upscaled = self.upscale_small(image);
        self.sharpen(&upscaled)
    }

    /// Upscale images whose longer side is below the trigger, capped to avoid
    /// resampling artifacts on extremely small crops.
    fn upscale_small(&self, image: &DynamicImage) -> DynamicImage {
        let (width, height) = image.dimensions();
        let max_side = width.max(height);

        if max_side >= self.upscale_trigger {
            return image.clone();
        }

        let scale = (self.upscale_target as f32 / max_side as f32).min(self.upscale_cap);
        if scale <= MIN_USEFUL_SCALE {
            return image.clone();
        }

        let new_width = (width as f32 * scale) as u32;
        let new_height = (height as f32 * scale) as u32;
        debug!(
            "upscaling {}x{} -> {}x{} (scale {:.2})",
            width, height, new_width, new_height, scale
        );

        image.resize_exact(new_width, new_height, FilterType::CatmullRom)
    }

    /// Unsharp-mask sharpen: `1.5 * original - 0.5 * blurred`, clamped.
    fn sharpen(&self, image: &DynamicImage) -> DynamicImage {
        let rgb = image.to_rgb8();
        let blurred = image::imageops::blur(&rgb, self.sharpen_sigma);

        let mut sharpened = rgb;
        for (pixel, blur_pixel) in sharpened.pixels_mut().zip(blurred.pixels()) {
            for channel in 0..3 {
                let value = 1.5 * f32::from(pixel[channel]) - 0.5 * f32::from(blur_pixel[channel]);
                pixel[channel] = value.clamp(0.0, 255.0) as u8;
            }
        }

        DynamicImage::ImageRgb8(sharpened)
    }

    /// Downscale an image so its longer side fits within `side_limit`,
    /// keeping the aspect ratio. Images already within the limit are
    /// returned unchanged.
    pub fn fit_within(image: &DynamicImage, side_limit: u32) -> DynamicImage {
        let (width, height) = image.dimensions();
        let max_side = width.max(height);

        if max_side <= side_limit {
            return image.clone();
        }

        let scale = side_limit as f32 / max_side as f32;
        let new_width = ((width as f32 * scale) as u32).max(1);
        let new_height = ((height as f32 * scale) as u32).max(1);
        debug!(
            "limiting {}x{} -> {}x{} for detection",
            width, height, new_width, new_height
        );

        image.resize_exact(new_width, new_height, FilterType::Lanczos3)
    }
}

impl Default for LabelPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn gray_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([128, 128, 128])))
    }

    #[test]
    fn small_photo_is_upscaled() {
        let prepared = LabelPreprocessor::new().prepare(&gray_image(640, 480));
        // scale = min(1600/640, 3.0) = 2.5
        assert_eq!(prepared.dimensions(), (1600, 1200));
    }

    #[test]
    fn tiny_crop_upscale_is_capped() {
        let prepared = LabelPreprocessor::new().prepare(&gray_image(200, 100));
        // 1600/200 = 8.0, capped at 3.0
        assert_eq!(prepared.dimensions(), (600, 300));
    }

    #[test]
    fn large_photo_keeps_its_size() {
        let prepared = LabelPreprocessor::new().prepare(&gray_image(1920, 1080));
        assert_eq!(prepared.dimensions(), (1920, 1080));
    }

    #[test]
    fn sharpening_preserves_flat_regions() {
        // 1.5 * v - 0.5 * v = v when the blur changes nothing.
        let prepared = LabelPreprocessor::new().prepare(&gray_image(1200, 1200));
        let rgb = prepared.to_rgb8();
        assert_eq!(rgb.get_pixel(600, 600)[0], 128);
    }

    #[test]
    fn fit_within_downscales_only_oversized_images() {
        let fitted = LabelPreprocessor::fit_within(&gray_image(3840, 2160), 1920);
        assert_eq!(fitted.dimensions(), (1920, 1080));

        let untouched = LabelPreprocessor::fit_within(&gray_image(800, 600), 1920);
        assert_eq!(untouched.dimensions(), (800, 600));
    }
}
