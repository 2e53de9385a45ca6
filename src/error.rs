use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaneError {
    /// The input frame cannot be processed at all. Not recoverable locally.
    #[error("invalid frame {width}x{height}: {reason}")]
    InvalidFrame {
        width: u32,
        height: u32,
        reason: &'static str,
    },
}
