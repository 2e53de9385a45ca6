// src/region.rs
//
// Trapezoidal region-of-interest crop. Frame dimensions are preserved;
// pixels outside the trapezoid are zeroed, interior pixels are untouched.

use image::RgbImage;

use crate::types::RoiConfig;

/// Zero out everything outside the drivable-corridor trapezoid:
/// (0, bottom) - (w, bottom) - (top_right * w, top) - (top_left * w, top).
pub fn crop_region_of_interest(frame: &RgbImage, config: &RoiConfig) -> RgbImage {
    let (width, height) = frame.dimensions();
    let mut out = RgbImage::new(width, height);

    let w = width as f32;
    let bottom_y = config.bottom_frac * height as f32;
    let top_y = config.top_frac * height as f32;
    if bottom_y <= top_y {
        return out;
    }

    for y in 0..height {
        let yf = y as f32;
        if yf < top_y || yf > bottom_y {
            continue;
        }

        // 0 at the bottom edge of the band, 1 at the top edge.
        let t = (bottom_y - yf) / (bottom_y - top_y);
        let left_x = config.top_left_frac * w * t;
        let right_x = w - (w - config.top_right_frac * w) * t;

        for x in 0..width {
            let xf = x as f32;
            if xf >= left_x && xf <= right_x {
                out.put_pixel(x, y, *frame.get_pixel(x, y));
            }
        }
    }

    out
}
