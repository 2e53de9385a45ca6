// src/estimator.rs
//
// Classifies raw segments into left/right lane candidates and fits one
// representative line per side by ordinary least squares.

use tracing::debug;

use crate::types::{ClassifiedSegment, EstimatorConfig, FittedLine, LineSegment, Side};

// A fitted slope this close to zero cannot intersect a horizontal
// scan-line; the fit is degraded to the sentinel instead.
const MIN_FIT_SLOPE: f64 = 1e-6;

/// Produce the (left, right) boundary lines from raw extractor segments.
/// A side with no usable candidates yields `FittedLine::SENTINEL`.
pub fn fit_lane_lines(
    segments: &[LineSegment],
    frame_width: u32,
    config: &EstimatorConfig,
) -> (FittedLine, FittedLine) {
    let classified = classify_segments(segments, frame_width, config);

    let mut left_x = Vec::new();
    let mut left_y = Vec::new();
    let mut right_x = Vec::new();
    let mut right_y = Vec::new();

    for c in &classified {
        let (xs, ys) = match c.side {
            Side::Left => (&mut left_x, &mut left_y),
            Side::Right => (&mut right_x, &mut right_y),
        };
        xs.push(c.segment.x1 as f64);
        ys.push(c.segment.y1 as f64);
        xs.push(c.segment.x2 as f64);
        ys.push(c.segment.y2 as f64);
    }

    let left = fit_side(&left_x, &left_y);
    let right = fit_side(&right_x, &right_y);

    debug!(
        "Fit: {} candidates ({} left pts, {} right pts), left = {:.3}x + {:.1}, right = {:.3}x + {:.1}",
        classified.len(),
        left_x.len(),
        right_x.len(),
        left.slope,
        left.intercept,
        right.slope,
        right.intercept
    );

    (left, right)
}

/// Slope-filter and side-classify the raw segments. Near-horizontal
/// segments (|slope| at or below the threshold) are noise; segments
/// straddling the center column or with the wrong slope sign for their
/// side are discarded, never reassigned.
pub fn classify_segments(
    segments: &[LineSegment],
    frame_width: u32,
    config: &EstimatorConfig,
) -> Vec<ClassifiedSegment> {
    let center = frame_width as f32 / 2.0;

    segments
        .iter()
        .filter_map(|s| {
            let slope = segment_slope(s, config.legacy_ratio_slope)?;
            if slope.abs() <= config.slope_threshold {
                return None;
            }
            let side = if slope > 0.0 && s.x1 > center && s.x2 > center {
                Side::Right
            } else if slope < 0.0 && s.x1 < center && s.x2 < center {
                Side::Left
            } else {
                return None;
            };
            Some(ClassifiedSegment {
                segment: *s,
                side,
                slope,
            })
        })
        .collect()
}

/// Slope of a segment, or `None` when the denominator degenerates.
/// Corrected form: (y2 - y1) / (x2 - x1), vertical segments discarded.
/// Legacy ratio form (validation only): (y2 - y1) / (x2 / x1), with
/// x1 = 0 discarded.
fn segment_slope(s: &LineSegment, legacy_ratio: bool) -> Option<f32> {
    let rise = s.y2 - s.y1;
    let denom = if legacy_ratio {
        if s.x1 == 0.0 {
            return None;
        }
        s.x2 / s.x1
    } else {
        s.x2 - s.x1
    };
    if denom == 0.0 {
        None
    } else {
        Some(rise / denom)
    }
}

/// Ordinary least squares over the pooled endpoints of one side:
/// b1 = sum((x - mx)(y - my)) / sum((x - mx)^2), b0 = my - b1 * mx.
fn fit_side(xs: &[f64], ys: &[f64]) -> FittedLine {
    if xs.is_empty() {
        return FittedLine::SENTINEL;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }

    // Zero x-variance (all points on one column) cannot be expressed as
    // y = b1*x + b0; degrade to the sentinel rather than dividing by zero.
    if sxx < f64::EPSILON {
        return FittedLine::SENTINEL;
    }

    let slope = sxy / sxx;
    if slope.abs() < MIN_FIT_SLOPE {
        return FittedLine::SENTINEL;
    }

    FittedLine {
        slope,
        intercept: mean_y - slope * mean_x,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EstimatorConfig;

    const WIDTH: u32 = 640; // center column at 320

    fn seg(x1: f32, y1: f32, x2: f32, y2: f32) -> LineSegment {
        LineSegment::new(x1, y1, x2, y2)
    }

    #[test]
    fn test_vertical_segment_discarded_not_crashed() {
        let config = EstimatorConfig::default();
        let segments = vec![seg(100.0, 100.0, 100.0, 300.0)];

        let classified = classify_segments(&segments, WIDTH, &config);
        assert!(classified.is_empty());

        let (left, right) = fit_lane_lines(&segments, WIDTH, &config);
        assert!(left.is_sentinel());
        assert!(right.is_sentinel());
    }

    #[test]
    fn test_near_horizontal_filtered() {
        let config = EstimatorConfig::default();
        // slope 0.4 on the right side, slope exactly 0.5 on the left side:
        // both at or below the threshold, both dropped.
        let segments = vec![
            seg(400.0, 100.0, 500.0, 140.0),
            seg(100.0, 200.0, 200.0, 150.0),
        ];

        assert!(classify_segments(&segments, WIDTH, &config).is_empty());
    }

    #[test]
    fn test_left_right_and_straddle_classification() {
        let config = EstimatorConfig::default();
        let left = seg(100.0, 300.0, 200.0, 220.0); // slope -0.8, both x < 320
        let right = seg(440.0, 220.0, 540.0, 300.0); // slope 0.8, both x > 320
        let straddle = seg(300.0, 300.0, 400.0, 220.0); // crosses the center

        let classified = classify_segments(&[left, right, straddle], WIDTH, &config);

        assert_eq!(classified.len(), 2);
        assert_eq!(classified[0].side, Side::Left);
        assert!((classified[0].slope + 0.8).abs() < 1e-5);
        assert_eq!(classified[1].side, Side::Right);
        assert!((classified[1].slope - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_wrong_sign_for_side_discarded() {
        let config = EstimatorConfig::default();
        // Positive slope entirely on the left side: not reassigned, dropped.
        let segments = vec![seg(100.0, 220.0, 200.0, 300.0)];

        assert!(classify_segments(&segments, WIDTH, &config).is_empty());
    }

    #[test]
    fn test_duplicate_point_pool_degrades_to_sentinel() {
        let fitted = fit_side(&[100.0, 100.0], &[400.0, 400.0]);
        assert!(fitted.is_sentinel());
    }

    #[test]
    fn test_empty_pool_is_sentinel() {
        assert!(fit_side(&[], &[]).is_sentinel());
    }

    #[test]
    fn test_fit_recovers_exact_line() {
        // Points on y = -0.8x + 380.
        let xs = [100.0, 150.0, 200.0, 250.0];
        let ys: Vec<f64> = xs.iter().map(|x| -0.8 * x + 380.0).collect();

        let fitted = fit_side(&xs, &ys);

        assert!((fitted.slope + 0.8).abs() < 1e-9);
        assert!((fitted.intercept - 380.0).abs() < 1e-6);
    }

    #[test]
    fn test_fit_pools_both_segment_endpoints() {
        let config = EstimatorConfig::default();
        // Two colinear right-side segments on y = 0.8x - 130.
        let segments = vec![
            seg(440.0, 222.0, 500.0, 270.0),
            seg(520.0, 286.0, 600.0, 350.0),
        ];

        let (left, right) = fit_lane_lines(&segments, WIDTH, &config);

        assert!(left.is_sentinel());
        assert!(!right.is_sentinel());
        assert!((right.slope - 0.8).abs() < 1e-6);
        assert!((right.intercept + 130.0).abs() < 1e-3);
    }

    #[test]
    fn test_legacy_ratio_slope_changes_classification() {
        let corrected = EstimatorConfig::default();
        let legacy = EstimatorConfig {
            legacy_ratio_slope: true,
            ..EstimatorConfig::default()
        };

        // Rise 30 over run 100: corrected slope 0.3 (noise), but the ratio
        // form divides by x2/x1 = 1.25 and sees slope 24.
        let segments = vec![seg(400.0, 100.0, 500.0, 130.0)];

        assert!(classify_segments(&segments, WIDTH, &corrected).is_empty());

        let classified = classify_segments(&segments, WIDTH, &legacy);
        assert_eq!(classified.len(), 1);
        assert_eq!(classified[0].side, Side::Right);
        assert!((classified[0].slope - 24.0).abs() < 1e-4);
    }

    #[test]
    fn test_legacy_ratio_guards_zero_x1() {
        let legacy = EstimatorConfig {
            legacy_ratio_slope: true,
            ..EstimatorConfig::default()
        };
        let segments = vec![seg(0.0, 100.0, 100.0, 300.0)];

        assert!(classify_segments(&segments, WIDTH, &legacy).is_empty());
    }
}
