//! Error types for gear and cylinder geometry.

use thiserror::Error;

/// Errors raised while deriving gear or cylinder geometry.
///
/// Every variant aborts the whole build: no partial profile is ever returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GearError {
    /// Gear parameters out of range (non-positive pitch, too few teeth, ...).
    #[error("invalid gear spec: {0}")]
    InvalidGearSpec(String),

    /// The involute is only defined outside its base circle.
    #[error("involute undefined at radius {radius} (base circle radius {base_radius})")]
    DomainError { base_radius: f64, radius: f64 },

    /// Bad sampling arguments.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Lightening cylinder parameters out of range.
    #[error("invalid cylinder spec: {0}")]
    InvalidCylinderSpec(String),
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GearError>;
