//! Single-frame road lane detection.
//!
//! The pipeline masks lane-paint colors, restricts analysis to a
//! trapezoidal region of interest, extracts line segments from Canny
//! edges, fits one boundary line per lane side by least squares, and
//! blends a translucent lane polygon onto the frame. Frames are
//! independent: no state is carried between calls.

pub mod color_mask;
mod config;
pub mod detector;
pub mod error;
pub mod estimator;
pub mod line_extraction;
pub mod overlay;
pub mod region;
pub mod types;

pub use detector::LaneDetector;
pub use error::LaneError;
pub use types::{ClassifiedSegment, Config, FittedLine, LanePolygon, LineSegment, Side};
