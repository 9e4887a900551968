//! Snapshot validation errors.

/// Error returned when snapshot validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotValidationError {
    /// A value starting with `#` is not a 3, 6 or 8 digit hex color
    InvalidColor { name: String, value: String },
    /// An `-opacity` parameter is not a number in `0.0..=1.0`
    OpacityOutOfRange { name: String, value: String },
}

impl std::fmt::Display for SnapshotValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotValidationError::InvalidColor { name, value } => {
                write!(f, "parameter '{}' has invalid color '{}'", name, value)
            }
            SnapshotValidationError::OpacityOutOfRange { name, value } => {
                write!(
                    f,
                    "parameter '{}' has opacity '{}' outside 0.0..=1.0",
                    name, value
                )
            }
        }
    }
}

impl std::error::Error for SnapshotValidationError {}
