// End-to-end regression on a synthetic road frame: two straight white
// stripes with slope -0.8 (left of center) and +0.8 (right of center)
// inside the region of interest, on a 640x480 black background. The
// detector must paint a green-dominant lane overlay between the stripes
// and leave everything above the region of interest untouched.

use image::{Rgb, RgbImage};
use lane_detector::{Config, LaneDetector};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

// Stripe centerlines: left runs (120, 288) -> (240, 192), right runs
// (520, 288) -> (400, 192). dx/dy = 1.25, so slope = -0.8 and +0.8.
fn synthetic_frame() -> RgbImage {
    let mut frame = RgbImage::new(WIDTH, HEIGHT);
    for y in 192..=288u32 {
        let rise = (288 - y) as f32;
        let left_center = 120.0 + rise * 1.25;
        let right_center = 520.0 - rise * 1.25;
        for center in [left_center, right_center] {
            let lo = (center - 2.0).round() as u32;
            let hi = (center + 2.0).round() as u32;
            for x in lo..=hi {
                frame.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
    }
    frame
}

fn is_green_dominant(pixel: &Rgb<u8>) -> bool {
    pixel.0[1] >= 150 && pixel.0[1] > pixel.0[0] && pixel.0[1] > pixel.0[2]
}

#[test]
fn test_detect_lane_paints_overlay_between_stripes() {
    let frame = synthetic_frame();
    let detector = LaneDetector::new(Config::default());

    let out = detector.detect_lane(&frame).unwrap();

    // Overlay scan-lines sit at y = 240 and y = 192; probe a row between
    // them. Stripe centerlines at y = 216 are at x = 210 and x = 430.
    let row = 216u32;
    let greens: Vec<u32> = (0..WIDTH)
        .filter(|&x| is_green_dominant(out.get_pixel(x, row)))
        .collect();

    assert!(
        !greens.is_empty(),
        "no green-dominant overlay pixels on row {row}"
    );

    let min_x = *greens.first().unwrap();
    let max_x = *greens.last().unwrap();
    assert!(
        min_x > 180 && max_x < 460,
        "overlay [{min_x}, {max_x}] not between the stripes on row {row}"
    );
    // The lane center must be covered.
    assert!(
        greens.contains(&320),
        "overlay does not cover the lane center on row {row}"
    );
}

#[test]
fn test_detect_lane_leaves_area_above_roi_untouched() {
    let frame = synthetic_frame();
    let detector = LaneDetector::new(Config::default());

    let out = detector.detect_lane(&frame).unwrap();

    // The region of interest tops out at 0.3 * 480 = 144 and the overlay
    // scan-lines at 0.4 * 480 = 192; rows above carry no overlay.
    for y in 0..144u32 {
        for x in 0..WIDTH {
            assert_eq!(
                out.get_pixel(x, y),
                frame.get_pixel(x, y),
                "pixel above the region of interest changed at ({x},{y})"
            );
        }
    }
}

#[test]
fn test_detect_lane_is_deterministic() {
    let frame = synthetic_frame();
    let detector = LaneDetector::new(Config::default());

    let a = detector.detect_lane(&frame).unwrap();
    let b = detector.detect_lane(&frame).unwrap();

    assert_eq!(a, b);
}
