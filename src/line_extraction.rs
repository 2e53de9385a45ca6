// src/line_extraction.rs
//
// Edge detection plus a deterministic, endpoint-returning Hough transform.
//
// The accumulator/vote/peak structure follows the classic polar-line Hough;
// on top of that, each peak line is walked across the image collecting
// gap-tolerant runs of edge pixels, which yields finite segments with the
// usual probabilistic-transform parameters (min length, max gap). Pixels
// consumed by an emitted segment are cleared from a scratch copy so that
// overlapping peaks do not produce duplicates. No randomness anywhere: the
// output is a pure function of the edge image.

use image::GrayImage;
use imageproc::edges::canny;
use tracing::debug;

use crate::types::{EdgeConfig, HoughConfig, LineSegment};

/// Canny edge detection with the configured hysteresis thresholds.
pub fn detect_edges(gray: &GrayImage, config: &EdgeConfig) -> GrayImage {
    canny(gray, config.low_threshold, config.high_threshold)
}

/// Extract finite line segments from a binary edge image.
pub fn extract_segments(edges: &GrayImage, config: &HoughConfig) -> Vec<LineSegment> {
    let (width, height) = edges.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let rho_max = ((width as f64).powi(2) + (height as f64).powi(2)).sqrt();
    let n_theta = (std::f64::consts::PI / config.theta_resolution)
        .round()
        .max(1.0) as usize;
    let n_rho = (2.0 * rho_max / config.rho_resolution).ceil() as usize + 1;

    let trig: Vec<(f64, f64)> = (0..n_theta)
        .map(|t| {
            let theta = t as f64 * config.theta_resolution;
            (theta.sin(), theta.cos())
        })
        .collect();

    // Vote over all edge pixels in scan order.
    let mut acc = vec![0u32; n_theta * n_rho];
    let mut edge_pixels = 0usize;
    for (x, y, pixel) in edges.enumerate_pixels() {
        if pixel.0[0] == 0 {
            continue;
        }
        edge_pixels += 1;
        for (t, &(sin, cos)) in trig.iter().enumerate() {
            let rho = x as f64 * cos + y as f64 * sin;
            let r = ((rho + rho_max) / config.rho_resolution).round() as usize;
            acc[t * n_rho + r] += 1;
        }
    }

    // Peaks: vote threshold plus 3x3 non-maximum suppression. Ties survive
    // on both sides; pixel consumption during tracing deduplicates them.
    let mut peaks: Vec<(u32, usize, usize)> = Vec::new();
    for t in 0..n_theta {
        for r in 0..n_rho {
            let votes = acc[t * n_rho + r];
            if votes < config.vote_threshold {
                continue;
            }
            let mut is_max = true;
            'neighborhood: for dt in -1i64..=1 {
                for dr in -1i64..=1 {
                    if dt == 0 && dr == 0 {
                        continue;
                    }
                    let nt = t as i64 + dt;
                    let nr = r as i64 + dr;
                    if nt < 0 || nr < 0 || nt >= n_theta as i64 || nr >= n_rho as i64 {
                        continue;
                    }
                    if acc[nt as usize * n_rho + nr as usize] > votes {
                        is_max = false;
                        break 'neighborhood;
                    }
                }
            }
            if is_max {
                peaks.push((votes, t, r));
            }
        }
    }
    peaks.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

    let mut scratch = edges.clone();
    let mut segments = Vec::new();
    for &(_, t, r) in &peaks {
        let (sin, cos) = trig[t];
        let rho = r as f64 * config.rho_resolution - rho_max;
        trace_line(&mut scratch, rho, sin, cos, config, &mut segments);
    }

    debug!(
        "Hough: {} edge pixels, {} peaks, {} segments",
        edge_pixels,
        peaks.len(),
        segments.len()
    );
    segments
}

/// Walk one polar line across the image, collecting gap-tolerant runs of
/// edge pixels and emitting those longer than the configured minimum.
fn trace_line(
    scratch: &mut GrayImage,
    rho: f64,
    sin: f64,
    cos: f64,
    config: &HoughConfig,
    out: &mut Vec<LineSegment>,
) {
    let (width, height) = scratch.dimensions();
    let mut run: Vec<(u32, u32)> = Vec::new();
    let mut misses = 0u32;

    let steps = if sin.abs() >= cos.abs() {
        width
    } else {
        height
    };

    for i in 0..steps {
        // Solve the line equation x*cos + y*sin = rho along the dominant
        // axis, probing one pixel either side to absorb quantization.
        let hit = if sin.abs() >= cos.abs() {
            let y = (rho - i as f64 * cos) / sin;
            probe_column(scratch, i, y, height)
        } else {
            let x = (rho - i as f64 * sin) / cos;
            probe_row(scratch, x, i, width)
        };

        match hit {
            Some(point) => {
                run.push(point);
                misses = 0;
            }
            None if run.is_empty() => {}
            None => {
                misses += 1;
                if misses > config.max_line_gap {
                    flush_run(&mut run, scratch, config, out);
                    misses = 0;
                }
            }
        }
    }
    flush_run(&mut run, scratch, config, out);
}

fn probe_column(scratch: &GrayImage, x: u32, y_ideal: f64, height: u32) -> Option<(u32, u32)> {
    let y0 = y_ideal.round();
    for dy in [0i64, -1, 1] {
        let y = y0 as i64 + dy;
        if y >= 0 && (y as u32) < height && scratch.get_pixel(x, y as u32).0[0] > 0 {
            return Some((x, y as u32));
        }
    }
    None
}

fn probe_row(scratch: &GrayImage, x_ideal: f64, y: u32, width: u32) -> Option<(u32, u32)> {
    let x0 = x_ideal.round();
    for dx in [0i64, -1, 1] {
        let x = x0 as i64 + dx;
        if x >= 0 && (x as u32) < width && scratch.get_pixel(x as u32, y).0[0] > 0 {
            return Some((x as u32, y));
        }
    }
    None
}

fn flush_run(
    run: &mut Vec<(u32, u32)>,
    scratch: &mut GrayImage,
    config: &HoughConfig,
    out: &mut Vec<LineSegment>,
) {
    if run.is_empty() {
        return;
    }
    let first = run[0];
    let last = run[run.len() - 1];
    let dx = last.0 as f64 - first.0 as f64;
    let dy = last.1 as f64 - first.1 as f64;

    if (dx * dx + dy * dy).sqrt() >= config.min_line_length {
        out.push(LineSegment::new(
            first.0 as f32,
            first.1 as f32,
            last.0 as f32,
            last.1 as f32,
        ));
        // Consume only emitted runs; sub-threshold runs stay available to
        // better-aligned peaks.
        for &(x, y) in run.iter() {
            scratch.get_pixel_mut(x, y).0[0] = 0;
        }
    }
    run.clear();
}
