#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
/// camera intrinsics and lens distortion module.
pub mod calibration;

/// utilities to draw on images.
pub mod draw;

/// utilities for interpolation.
pub mod interpolation;

/// module containing parallization utilities.
pub mod parallel;

/// image undistortion module.
pub mod undistort;
