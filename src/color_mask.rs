// src/color_mask.rs
//
// Color-based candidate masking for lane paint: white and yellow bands,
// plus a gray band that only activates on low-light frames.

use image::{Rgb, RgbImage};
use tracing::debug;

use crate::types::MaskConfig;

/// Convert RGB to HSV in the OpenCV 8-bit convention:
/// H in 0-179 (half-degrees), S and V in 0-255.
#[inline]
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let rf = r as f32;
    let gf = g as f32;
    let bf = b as f32;

    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let h = if delta < 1e-6 {
        0.0
    } else if (max - rf).abs() < 1e-6 {
        60.0 * ((gf - bf) / delta)
    } else if (max - gf).abs() < 1e-6 {
        120.0 + 60.0 * ((bf - rf) / delta)
    } else {
        240.0 + 60.0 * ((rf - gf) / delta)
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    let s = if max < 1e-6 { 0.0 } else { 255.0 * delta / max };

    (
        (h / 2.0).round().min(179.0) as u8,
        s.round().min(255.0) as u8,
        max as u8,
    )
}

/// Heuristic ambient-light test: per-channel mean over the whole frame.
/// A frame is low-light when mean0 < 30 or (mean1 < 33 and mean2 < 30).
pub fn is_daytime(frame: &RgbImage, config: &MaskConfig) -> bool {
    let pixel_count = (frame.width() as u64 * frame.height() as u64) as f64;
    if pixel_count == 0.0 {
        return true;
    }

    let mut sums = [0.0f64; 3];
    for pixel in frame.pixels() {
        sums[0] += pixel.0[0] as f64;
        sums[1] += pixel.0[1] as f64;
        sums[2] += pixel.0[2] as f64;
    }
    let means = [
        sums[0] / pixel_count,
        sums[1] / pixel_count,
        sums[2] / pixel_count,
    ];

    let night = means[0] < config.night_mean_ch0
        || (means[1] < config.night_mean_ch1 && means[2] < config.night_mean_ch2);

    debug!(
        "Channel means: [{:.1}, {:.1}, {:.1}] -> {}",
        means[0],
        means[1],
        means[2],
        if night { "low-light" } else { "daytime" }
    );

    !night
}

#[inline]
fn in_band(value: u8, lower: u8, upper: u8) -> bool {
    value >= lower && value <= upper
}

#[inline]
fn in_band3(values: [u8; 3], lower: [u8; 3], upper: [u8; 3]) -> bool {
    in_band(values[0], lower[0], upper[0])
        && in_band(values[1], lower[1], upper[1])
        && in_band(values[2], lower[2], upper[2])
}

/// Keep only pixels plausibly belonging to lane paint. White and yellow
/// candidates are combined additively (saturating sum, so overlapping bands
/// do not replace each other); on low-light frames a gray band is merged in
/// as well. Non-candidate pixels are zero.
pub fn color_filter(frame: &RgbImage, daytime: bool, config: &MaskConfig) -> RgbImage {
    let mut out = RgbImage::new(frame.width(), frame.height());

    let white_lower = [config.white_lower; 3];
    let white_upper = [config.white_upper; 3];
    let gray_lower = [config.gray_lower; 3];
    let gray_upper = [config.gray_upper; 3];

    for (x, y, pixel) in frame.enumerate_pixels() {
        let rgb = pixel.0;
        let mut acc = [0u16; 3];

        if in_band3(rgb, white_lower, white_upper) {
            for c in 0..3 {
                acc[c] += rgb[c] as u16;
            }
        }

        let (h, s, v) = rgb_to_hsv(rgb[0], rgb[1], rgb[2]);
        if in_band3([h, s, v], config.yellow_lower, config.yellow_upper) {
            for c in 0..3 {
                acc[c] += rgb[c] as u16;
            }
        }

        if !daytime && in_band3(rgb, gray_lower, gray_upper) {
            for c in 0..3 {
                acc[c] += rgb[c] as u16;
            }
        }

        if acc != [0, 0, 0] {
            out.put_pixel(
                x,
                y,
                Rgb([
                    acc[0].min(255) as u8,
                    acc[1].min(255) as u8,
                    acc[2].min(255) as u8,
                ]),
            );
        }
    }

    out
}
