// src/overlay.rs
//
// Reconstructs the lane quadrilateral from the two fitted lines and blends
// a translucent green fill onto the original frame.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

use crate::types::{FittedLine, LanePolygon, OverlayConfig};

/// Intersect each boundary line with the two horizontal scan-lines at
/// `lower_frac * h` and `upper_frac * h`. Sentinel lines flow through like
/// any other: the vertices are geometrically valid, if meaningless.
pub fn build_lane_polygon(
    left: &FittedLine,
    right: &FittedLine,
    frame_height: u32,
    config: &OverlayConfig,
) -> LanePolygon {
    let h = frame_height as f64;
    let y_bottom = config.lower_frac as f64 * h;
    let y_top = config.upper_frac as f64 * h;

    LanePolygon {
        vertices: [
            (left.x_at(y_bottom) as f32, y_bottom as f32),
            (left.x_at(y_top) as f32, y_top as f32),
            (right.x_at(y_top) as f32, y_top as f32),
            (right.x_at(y_bottom) as f32, y_bottom as f32),
        ],
    }
}

/// Fill the polygon on a zeroed canvas and blend it over the frame:
/// out = alpha * overlay + beta * original + gamma, clamped per channel.
pub fn render_overlay(frame: &RgbImage, polygon: &LanePolygon, config: &OverlayConfig) -> RgbImage {
    let mut canvas = RgbImage::new(frame.width(), frame.height());
    if let Some(points) = rasterizable_points(polygon) {
        draw_polygon_mut(&mut canvas, &points, Rgb(config.fill_color));
    }
    blend(frame, &canvas, config)
}

/// Rounded integer vertices with adjacent duplicates collapsed. The
/// rasterizer rejects closed paths and zero-area input, so a polygon that
/// degenerates to fewer than three distinct corners is not fillable.
fn rasterizable_points(polygon: &LanePolygon) -> Option<Vec<Point<i32>>> {
    let mut points: Vec<Point<i32>> = Vec::with_capacity(4);
    for &(x, y) in &polygon.vertices {
        let p = Point::new(x.round() as i32, y.round() as i32);
        if points.last() != Some(&p) {
            points.push(p);
        }
    }
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    if points.len() >= 3 {
        Some(points)
    } else {
        None
    }
}

fn blend(original: &RgbImage, overlay: &RgbImage, config: &OverlayConfig) -> RgbImage {
    let mut out = RgbImage::new(original.width(), original.height());
    for (x, y, pixel) in original.enumerate_pixels() {
        let over = overlay.get_pixel(x, y);
        let mut blended = [0u8; 3];
        for c in 0..3 {
            let v = config.alpha * over.0[c] as f32 + config.beta * pixel.0[c] as f32 + config.gamma;
            blended[c] = v.round().clamp(0.0, 255.0) as u8;
        }
        out.put_pixel(x, y, Rgb(blended));
    }
    out
}
