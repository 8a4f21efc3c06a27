//! Error types for the tracking pipeline.

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors that can occur while capturing, validating, or driving a cycle.
///
/// "No target found" is deliberately absent: a missing detection is a normal
/// outcome handled by the controller's reset state, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackError {
    /// Pixel coordinate outside the frame.
    OutOfRange { row: i64, col: i64 },
    /// Raw buffer size does not match the configured frame shape.
    MalformedFrame { expected: usize, got: usize },
    /// No frame could be produced this cycle.
    CaptureFailure(String),
    /// The actuator rejected a command.
    ActuatorFailure(String),
}

impl std::fmt::Display for TrackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { row, col } => {
                write!(f, "pixel access out of range: row={}, col={}", row, col)
            }
            Self::MalformedFrame { expected, got } => {
                write!(f, "malformed frame: expected {} bytes, got {}", expected, got)
            }
            Self::CaptureFailure(msg) => write!(f, "capture failure: {}", msg),
            Self::ActuatorFailure(msg) => write!(f, "actuator failure: {}", msg),
        }
    }
}

impl std::error::Error for TrackError {}
