// src/detector.rs
//
// Fixed sequential pipeline: color mask -> region of interest -> grayscale
// -> Canny -> segment extraction -> lane fit -> overlay blend. Stateless
// across frames; every call allocates its own working buffers.

use image::{imageops, RgbImage};
use tracing::debug;

use crate::error::LaneError;
use crate::types::{Config, FittedLine};
use crate::{color_mask, estimator, line_extraction, overlay, region};

pub struct LaneDetector {
    config: Config,
}

impl LaneDetector {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Detect the lane on a single frame and return it with the translucent
    /// overlay blended in. Deterministic for identical input pixels.
    pub fn detect_lane(&self, frame: &RgbImage) -> Result<RgbImage, LaneError> {
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return Err(LaneError::InvalidFrame {
                width,
                height,
                reason: "zero-sized frame",
            });
        }

        let daytime = color_mask::is_daytime(frame, &self.config.mask);
        let masked = color_mask::color_filter(frame, daytime, &self.config.mask);
        let roi = region::crop_region_of_interest(&masked, &self.config.roi);
        let gray = imageops::grayscale(&roi);
        let edges = line_extraction::detect_edges(&gray, &self.config.edges);
        let segments = line_extraction::extract_segments(&edges, &self.config.hough);

        let (left, right) = estimator::fit_lane_lines(&segments, width, &self.config.estimator);
        log_fit(&left, &right);

        let polygon = overlay::build_lane_polygon(&left, &right, height, &self.config.overlay);
        Ok(overlay::render_overlay(frame, &polygon, &self.config.overlay))
    }
}

fn log_fit(left: &FittedLine, right: &FittedLine) {
    match (left.is_sentinel(), right.is_sentinel()) {
        (false, false) => debug!("Both lane boundaries detected"),
        (true, false) => debug!("Left boundary undetected (sentinel fit)"),
        (false, true) => debug!("Right boundary undetected (sentinel fit)"),
        (true, true) => debug!("No lane boundaries detected (sentinel overlay)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LaneError;
    use crate::types::Config;

    #[test]
    fn test_zero_sized_frame_fails_fast() {
        let detector = LaneDetector::new(Config::default());
        let frame = RgbImage::new(0, 0);

        match detector.detect_lane(&frame) {
            Err(LaneError::InvalidFrame { width: 0, height: 0, .. }) => {}
            other => panic!("expected InvalidFrame, got {other:?}"),
        }
    }

    #[test]
    fn test_featureless_frame_yields_sentinel_overlay() {
        let detector = LaneDetector::new(Config::default());
        let frame = RgbImage::new(64, 64);

        let out = detector.detect_lane(&frame).unwrap();

        // No candidates anywhere: the sentinel polygon collapses and the
        // blend returns the frame unchanged (beta = 1).
        assert_eq!(out, frame);
    }
}
