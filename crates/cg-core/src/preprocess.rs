//! Image normalization
//!
//! Converts an arbitrary uploaded raster image into the fixed-size,
//! channel-normalized NHWC tensor the classifier was trained on.

use crate::CoreResult;
use image::imageops::{self, FilterType};
use image::DynamicImage;
use serde::Serialize;

/// Default classifier input resolution
pub const DEFAULT_INPUT_SIZE: u32 = 224;

/// Dense f32 tensor laid out as (batch, height, width, channels)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tensor {
    shape: [usize; 4],
    data: Vec<f32>,
}

impl Tensor {
    pub fn new(shape: [usize; 4], data: Vec<f32>) -> CoreResult<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(crate::CoreError::Parse(format!(
                "tensor shape {:?} needs {} values, got {}",
                shape,
                expected,
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn min(&self) -> f32 {
        self.data.iter().copied().fold(f32::INFINITY, f32::min)
    }

    pub fn max(&self) -> f32 {
        self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }
}

/// Resizes and rescales images for the classifier
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    width: u32,
    height: u32,
    filter: FilterType,
}

impl ImageNormalizer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            filter: FilterType::CatmullRom,
        }
    }

    /// Decode raw upload bytes and normalize them
    pub fn decode(&self, bytes: &[u8]) -> CoreResult<Tensor> {
        let image = image::load_from_memory(bytes)?;
        Ok(self.normalize(&image))
    }

    /// Normalize an already decoded image
    pub fn normalize(&self, image: &DynamicImage) -> Tensor {
        // Palette, grayscale and alpha images all go through RGB8 first
        let rgb = image.to_rgb8();
        let resized = imageops::resize(&rgb, self.width, self.height, self.filter);

        let data: Vec<f32> = resized
            .into_raw()
            .into_iter()
            .map(|byte| f32::from(byte) / 255.0)
            .collect();

        tracing::debug!(
            "Normalized {}x{} image to {}x{}",
            image.width(),
            image.height(),
            self.width,
            self.height
        );

        Tensor {
            shape: [1, self.height as usize, self.width as usize, 3],
            data,
        }
    }
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_SIZE, DEFAULT_INPUT_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    #[test]
    fn test_white_image_shape_and_range() {
        let white = DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 100, Rgb([255, 255, 255])));
        let tensor = ImageNormalizer::default().normalize(&white);

        assert_eq!(tensor.shape(), [1, 224, 224, 3]);
        assert_eq!(tensor.data().len(), 224 * 224 * 3);
        assert!(tensor.min() >= 0.0);
        assert!(tensor.max() <= 1.0);
        assert!((tensor.max() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_grayscale_is_expanded_to_rgb() {
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(31, 17, Luma([128])));
        let tensor = ImageNormalizer::default().normalize(&gray);

        assert_eq!(tensor.shape(), [1, 224, 224, 3]);
        let first = &tensor.data()[..3];
        assert_eq!(first[0], first[1]);
        assert_eq!(first[1], first[2]);
    }

    #[test]
    fn test_rgba_drops_alpha() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(300, 200, Rgba([0, 0, 0, 0])));
        let tensor = ImageNormalizer::default().normalize(&rgba);

        assert_eq!(tensor.shape(), [1, 224, 224, 3]);
        assert_eq!(tensor.max(), 0.0);
    }

    #[test]
    fn test_custom_target_size() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([10, 20, 30])));
        let tensor = ImageNormalizer::new(64, 32).normalize(&img);
        assert_eq!(tensor.shape(), [1, 32, 64, 3]);
    }

    #[test]
    fn test_decode_png_bytes() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(50, 80, Rgb([0, 255, 0])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();

        let tensor = ImageNormalizer::default().decode(&buf).unwrap();
        assert_eq!(tensor.shape(), [1, 224, 224, 3]);
        assert!(tensor.min() >= 0.0 && tensor.max() <= 1.0);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = ImageNormalizer::default().decode(b"definitely not an image");
        assert!(matches!(result, Err(crate::CoreError::Image(_))));
    }

    #[test]
    fn test_tensor_shape_mismatch() {
        assert!(Tensor::new([1, 2, 2, 3], vec![0.0; 5]).is_err());
        assert!(Tensor::new([1, 1, 1, 3], vec![0.0; 3]).is_ok());
    }
}
