use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mask: MaskConfig,
    pub roi: RoiConfig,
    pub edges: EdgeConfig,
    pub hough: HoughConfig,
    pub estimator: EstimatorConfig,
    pub overlay: OverlayConfig,
    pub io: IoConfig,
    pub logging: LoggingConfig,
}

/// Color candidate bands plus the day/night mean thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    /// Per-channel band for white paint.
    pub white_lower: u8,
    pub white_upper: u8,
    /// HSV band for yellow paint, OpenCV convention (H 0-179, S/V 0-255).
    pub yellow_lower: [u8; 3],
    pub yellow_upper: [u8; 3],
    /// Per-channel band for gray paint, merged only on low-light frames.
    pub gray_lower: u8,
    pub gray_upper: u8,
    /// Channel-mean thresholds below which a frame counts as low-light.
    pub night_mean_ch0: f64,
    pub night_mean_ch1: f64,
    pub night_mean_ch2: f64,
}

/// Trapezoid where lane markings are expected, as fractions of frame size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiConfig {
    pub bottom_frac: f32,
    pub top_frac: f32,
    pub top_left_frac: f32,
    pub top_right_frac: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

/// Parameters of the probabilistic line-segment transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughConfig {
    /// Distance resolution of the accumulator, in pixels.
    pub rho_resolution: f64,
    /// Angle resolution of the accumulator, in radians.
    pub theta_resolution: f64,
    /// Minimum accumulator votes for a line to be traced.
    pub vote_threshold: u32,
    /// Minimum euclidean segment length, in pixels.
    pub min_line_length: f64,
    /// Maximum run of missing edge pixels bridged within one segment.
    pub max_line_gap: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Segments with |slope| at or below this are discarded as noise.
    pub slope_threshold: f32,
    /// Use the ratio slope formula (y2-y1)/(x2/x1) instead of the
    /// geometric (y2-y1)/(x2-x1). Kept for validation only.
    pub legacy_ratio_slope: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Scan-line heights as fractions of frame height where the fitted
    /// lines are intersected to form the polygon vertices.
    pub lower_frac: f32,
    pub upper_frac: f32,
    pub fill_color: [u8; 3],
    /// Blend weights: out = alpha * overlay + beta * original + gamma.
    pub alpha: f32,
    pub beta: f32,
    pub gamma: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    pub input_dir: String,
    pub output_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

/// Raw line segment from the extractor, endpoints in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl LineSegment {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn length(&self) -> f32 {
        let dx = self.x2 - self.x1;
        let dy = self.y2 - self.y1;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// A retained segment tagged with its lane side and computed slope.
#[derive(Debug, Clone, Copy)]
pub struct ClassifiedSegment {
    pub segment: LineSegment,
    pub side: Side,
    pub slope: f32,
}

/// One side's representative boundary, y = slope * x + intercept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedLine {
    pub slope: f64,
    pub intercept: f64,
}

impl FittedLine {
    /// Fallback when a side has no usable segments. Callers relying on
    /// "lane detected" semantics must check for it explicitly.
    pub const SENTINEL: FittedLine = FittedLine {
        slope: 1.0,
        intercept: 1.0,
    };

    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }

    /// Solve x = (y - intercept) / slope.
    pub fn x_at(&self, y: f64) -> f64 {
        (y - self.intercept) / self.slope
    }
}

/// Closed lane quadrilateral: left-bottom, left-top, right-top, right-bottom.
#[derive(Debug, Clone, Copy)]
pub struct LanePolygon {
    pub vertices: [(f32, f32); 4],
}
