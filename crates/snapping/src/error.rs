// ---------------------------------------------------------------------------
// SnapError: caller contract violations
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors raised when the host breaks the engine's preconditions.
///
/// Finding no snap is never an error; these only cover missing or unusable
/// inputs that the host is expected to provide.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapError {
    /// No camera has been registered for the viewport.
    MissingCamera,
    /// The viewport has a zero, negative or non-finite size.
    InvalidViewport { width: f32, height: f32 },
    /// The camera's clip-from-world matrix cannot be inverted.
    DegenerateProjection,
    /// The scene has no entity marked as the traversal root.
    MissingRoot,
    /// The transform given for the axis guides cannot be inverted.
    DegenerateAxisFrame,
}

impl fmt::Display for SnapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapError::MissingCamera => write!(f, "No snap camera available"),
            SnapError::InvalidViewport { width, height } => {
                write!(f, "Invalid viewport size: {width}x{height}")
            }
            SnapError::DegenerateProjection => {
                write!(f, "Camera projection matrix is not invertible")
            }
            SnapError::MissingRoot => write!(f, "Scene has no snap root entity"),
            SnapError::DegenerateAxisFrame => {
                write!(f, "Axis guide transform is not invertible")
            }
        }
    }
}

impl std::error::Error for SnapError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_error_display_viewport() {
        let err = SnapError::InvalidViewport {
            width: 0.0,
            height: 720.0,
        };
        let msg = format!("{err}");
        assert!(msg.contains("0x720"), "got: {msg}");
    }

    #[test]
    fn test_snap_error_display_missing() {
        assert!(format!("{}", SnapError::MissingCamera).contains("camera"));
        assert!(format!("{}", SnapError::MissingRoot).contains("root"));
        assert!(format!("{}", SnapError::DegenerateProjection).contains("invertible"));
        assert!(format!("{}", SnapError::DegenerateAxisFrame).contains("Axis guide"));
    }

    #[test]
    fn test_snap_error_is_error_trait() {
        let err: Box<dyn std::error::Error> = Box::new(SnapError::MissingRoot);
        assert!(err.source().is_none());
    }
}
