#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use lidarcam_3d as k3d;

#[doc(inline)]
pub use lidarcam_calib as calib;

#[doc(inline)]
pub use lidarcam_image as image;

#[doc(inline)]
pub use lidarcam_imgproc as imgproc;

/// Frames flowing through the projector.
pub mod frame;

/// Markers drawn over projected points.
pub mod overlay;

/// Image undistortion and point projection with one calibration.
pub mod projector;

pub use crate::frame::{Frame, ProjectedFrame};
pub use crate::overlay::{draw_marker, draw_markers, Marker, MarkerShape, OverlayStyle};
pub use crate::projector::Projector;
