#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Calibration document schema as stored on disk.
pub mod document;

/// Error types for calibration loading.
pub mod error;

/// Flat to fixed-size matrix conversions.
pub mod matrix;

/// Validated calibration state.
pub mod state;

pub use crate::document::{CalibrationDocument, MatrixField};
pub use crate::error::CalibrationFormatError;
pub use crate::matrix::{flatten, reshape};
pub use crate::state::{load, CalibrationState, DistortionCoefficients};
