//! Decoded page bitmaps
//!
//! A [`Raster`] is the unit of exchange between the renderer, the filter
//! pipeline and the output writer. It is never mutated in place once built.

use crate::types::{NupError, Result};
use image::{DynamicImage, RgbImage, RgbaImage};

/// Channel layout of a raster buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

/// Row-major pixel buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Vec<u8>,
}

impl Raster {
    /// Wrap a pixel buffer, checking its length against the dimensions
    pub fn new(width: u32, height: u32, format: PixelFormat, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * format.channels();
        if pixels.len() != expected {
            return Err(NupError::InvalidRaster {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            pixels,
        })
    }

    /// A raster where every pixel has the same value
    pub fn filled(width: u32, height: u32, format: PixelFormat, pixel: &[u8]) -> Result<Self> {
        if pixel.len() != format.channels() {
            return Err(NupError::InvalidRaster {
                expected: format.channels(),
                actual: pixel.len(),
            });
        }
        let count = width as usize * height as usize;
        Self::new(width, height, format, pixel.repeat(count))
    }

    /// Same dimensions and format, different pixels of identical length
    pub(crate) fn with_pixels(&self, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), self.pixels.len());
        Self {
            width: self.width,
            height: self.height,
            format: self.format,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Channels of the pixel at (x, y), or None outside the raster
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let channels = self.format.channels();
        let start = (y as usize * self.width as usize + x as usize) * channels;
        self.pixels.get(start..start + channels)
    }

    /// Whether any pixel is not fully opaque
    pub fn has_transparency(&self) -> bool {
        match self.format {
            PixelFormat::Rgb => false,
            PixelFormat::Rgba => self.pixels.chunks_exact(4).any(|px| px[3] != u8::MAX),
        }
    }

    /// Split into packed RGB and an optional alpha plane
    pub fn split_alpha(&self) -> (Vec<u8>, Option<Vec<u8>>) {
        match self.format {
            PixelFormat::Rgb => (self.pixels.clone(), None),
            PixelFormat::Rgba => {
                let count = self.width as usize * self.height as usize;
                let mut rgb = Vec::with_capacity(count * 3);
                let mut alpha = Vec::with_capacity(count);
                for px in self.pixels.chunks_exact(4) {
                    rgb.extend_from_slice(&px[..3]);
                    alpha.push(px[3]);
                }
                (rgb, Some(alpha))
            }
        }
    }

    /// Convert to an `image` buffer for encoding
    pub fn to_image(&self) -> Result<DynamicImage> {
        let invalid = || NupError::InvalidRaster {
            expected: self.width as usize * self.height as usize * self.format.channels(),
            actual: self.pixels.len(),
        };
        Ok(match self.format {
            PixelFormat::Rgb => DynamicImage::ImageRgb8(
                RgbImage::from_raw(self.width, self.height, self.pixels.clone())
                    .ok_or_else(invalid)?,
            ),
            PixelFormat::Rgba => DynamicImage::ImageRgba8(
                RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
                    .ok_or_else(invalid)?,
            ),
        })
    }

    /// Build from a decoded image, keeping alpha when the image has it
    pub fn from_image(image: &DynamicImage) -> Self {
        if image.color().has_alpha() {
            let rgba = image.to_rgba8();
            let (width, height) = rgba.dimensions();
            Self {
                width,
                height,
                format: PixelFormat::Rgba,
                pixels: rgba.into_raw(),
            }
        } else {
            let rgb = image.to_rgb8();
            let (width, height) = rgb.dimensions();
            Self {
                width,
                height,
                format: PixelFormat::Rgb,
                pixels: rgb.into_raw(),
            }
        }
    }
}
