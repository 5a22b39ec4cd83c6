#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Oriented 3D bounding boxes.
pub mod bbox;

/// Point types of the range-sensor, camera and image frames.
pub mod point;

/// Pinhole projection of camera-frame points.
pub mod projection;

/// Fixed geometry of the sensor rig.
pub mod rig;

pub use crate::bbox::BoundingBox3D;
pub use crate::point::{CameraPoint, ImagePoint, Point3D};
pub use crate::projection::{project_camera_point, project_point, project_points, ProjectionError};
pub use crate::rig::{frame_transform, AxisRemap, RigGeometry, RigidOffset};
