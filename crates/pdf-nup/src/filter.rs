//! Per-pixel tone filters
//!
//! The pipeline runs grayscale, invert, brightness, contrast and clamp in that
//! order, matching the display-time filter chain of the interactive preview.
//! It is a pure function of the raster and the parameters.

use crate::raster::Raster;
use crate::types::FilterParams;

/// Mid-gray pivot for the contrast stretch
const CONTRAST_PIVOT: f64 = 128.0;

/// Precomputed multipliers for one filter run
#[derive(Debug, Clone, Copy)]
struct ToneCurve {
    grayscale: bool,
    invert: bool,
    brightness: f64,
    contrast: f64,
    intercept: f64,
}

impl ToneCurve {
    fn new(params: &FilterParams) -> Self {
        let params = params.clamped();
        let contrast = 1.0 + f64::from(params.blackness) / 100.0;
        Self {
            grayscale: params.grayscale,
            invert: params.invert,
            brightness: 1.0 + f64::from(params.whiteness) / 100.0,
            contrast,
            intercept: CONTRAST_PIVOT * (1.0 - contrast),
        }
    }

    fn apply(&self, rgb: [u8; 3]) -> [u8; 3] {
        let [mut r, mut g, mut b] = rgb.map(f64::from);

        if self.grayscale {
            let luma = 0.299 * r + 0.587 * g + 0.114 * b;
            r = luma;
            g = luma;
            b = luma;
        }

        if self.invert {
            r = 255.0 - r;
            g = 255.0 - g;
            b = 255.0 - b;
        }

        [r, g, b].map(|c| {
            let c = c * self.brightness;
            to_channel(c * self.contrast + self.intercept)
        })
    }
}

/// Clamp and round half to even, as a clamped byte canvas stores values
fn to_channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0).round_ties_even() as u8
}

/// Apply the filters to a single RGB triple
pub fn apply_pixel(rgb: [u8; 3], params: &FilterParams) -> [u8; 3] {
    ToneCurve::new(params).apply(rgb)
}

/// Apply the filters to every pixel, returning a new raster.
///
/// Alpha channels are copied through untouched.
pub fn apply(raster: &Raster, params: &FilterParams) -> Raster {
    if params.is_neutral() {
        return raster.clone();
    }

    let curve = ToneCurve::new(params);
    let channels = raster.format().channels();
    let mut pixels = Vec::with_capacity(raster.pixels().len());

    for px in raster.pixels().chunks_exact(channels) {
        pixels.extend_from_slice(&curve.apply([px[0], px[1], px[2]]));
        pixels.extend_from_slice(&px[3..]);
    }

    raster.with_pixels(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::PixelFormat;

    fn params(invert: bool, grayscale: bool, whiteness: f32, blackness: f32) -> FilterParams {
        FilterParams {
            invert,
            grayscale,
            whiteness,
            blackness,
        }
    }

    #[test]
    fn test_neutral_is_identity() {
        let neutral = FilterParams::default();
        for rgb in [[0, 0, 0], [255, 255, 255], [12, 200, 99], [128, 64, 32]] {
            assert_eq!(apply_pixel(rgb, &neutral), rgb);
        }
    }

    #[test]
    fn test_invert_only() {
        let p = params(true, false, 0.0, 0.0);
        assert_eq!(apply_pixel([200, 200, 200], &p), [55, 55, 55]);
        assert_eq!(apply_pixel([0, 128, 255], &p), [255, 127, 0]);
    }

    #[test]
    fn test_double_invert_round_trip() {
        let p = params(true, false, 0.0, 0.0);
        for rgb in [[200, 200, 200], [1, 2, 3], [17, 240, 90]] {
            assert_eq!(apply_pixel(apply_pixel(rgb, &p), &p), rgb);
        }
    }

    #[test]
    fn test_grayscale_luminance() {
        let p = params(false, true, 0.0, 0.0);
        // 0.299 * 255 = 76.245
        assert_eq!(apply_pixel([255, 0, 0], &p), [76, 76, 76]);
        // 0.587 * 255 = 149.685
        assert_eq!(apply_pixel([0, 255, 0], &p), [150, 150, 150]);
        assert_eq!(apply_pixel([90, 90, 90], &p), [90, 90, 90]);
    }

    #[test]
    fn test_grayscale_runs_before_invert() {
        let p = params(true, true, 0.0, 0.0);
        assert_eq!(apply_pixel([255, 0, 0], &p), [179, 179, 179]);
    }

    #[test]
    fn test_brightness() {
        let p = params(false, false, 50.0, 0.0);
        assert_eq!(apply_pixel([100, 10, 200], &p), [150, 15, 255]);
    }

    #[test]
    fn test_ties_round_to_even() {
        let p = params(false, false, 50.0, 0.0);
        // 103 * 1.5 = 154.5, 101 * 1.5 = 151.5
        assert_eq!(apply_pixel([103, 103, 103], &p), [154, 154, 154]);
        assert_eq!(apply_pixel([101, 1, 3], &p), [152, 2, 4]);
    }

    #[test]
    fn test_to_channel_clamps_before_rounding() {
        assert_eq!(to_channel(-3.5), 0);
        assert_eq!(to_channel(255.5), 255);
        assert_eq!(to_channel(0.5), 0);
        assert_eq!(to_channel(2.5), 2);
    }

    #[test]
    fn test_contrast_stretches_around_mid_gray() {
        let p = params(false, false, 0.0, 100.0);
        // c * 2 - 128
        assert_eq!(apply_pixel([128, 100, 200], &p), [128, 72, 255]);
        assert_eq!(apply_pixel([50, 64, 0], &p), [0, 0, 0]);
    }

    #[test]
    fn test_brightness_then_contrast() {
        let p = params(false, false, 10.0, 50.0);
        // 100 * 1.1 = 110; 110 * 1.5 - 64 = 101
        assert_eq!(apply_pixel([100, 100, 100], &p), [101, 101, 101]);
    }

    #[test]
    fn test_out_of_range_params_are_clamped() {
        let wild = params(false, false, 500.0, -40.0);
        let sane = params(false, false, 100.0, 0.0);
        assert_eq!(apply_pixel([60, 90, 120], &wild), apply_pixel([60, 90, 120], &sane));

        let nan = params(false, false, f32::NAN, f32::NAN);
        assert_eq!(apply_pixel([60, 90, 120], &nan), [60, 90, 120]);
    }

    #[test]
    fn test_alpha_passes_through() {
        let raster = Raster::new(
            2,
            1,
            PixelFormat::Rgba,
            vec![200, 200, 200, 17, 0, 0, 0, 255],
        )
        .unwrap();
        let out = apply(&raster, &params(true, false, 0.0, 0.0));
        assert_eq!(out.pixels(), &[55, 55, 55, 17, 255, 255, 255, 255]);
    }

    #[test]
    fn test_apply_returns_new_buffer() {
        let raster = Raster::filled(4, 4, PixelFormat::Rgb, &[200, 200, 200]).unwrap();
        let out = apply(&raster, &params(true, true, 12.0, 50.0));

        assert_eq!(raster.pixel(0, 0), Some(&[200, 200, 200][..]));
        assert_eq!(out.width(), 4);
        assert_eq!(out.height(), 4);
        assert_eq!(out.format(), PixelFormat::Rgb);
    }

    #[test]
    fn test_apply_is_deterministic() {
        let raster = Raster::new(
            3,
            1,
            PixelFormat::Rgb,
            vec![10, 20, 30, 140, 150, 160, 250, 240, 230],
        )
        .unwrap();
        let p = params(true, true, 12.0, 50.0);
        assert_eq!(apply(&raster, &p), apply(&raster, &p));
    }
}
