use crate::point::{CameraPoint, Point3D};

/// Body-frame position of the camera mount on the vehicle, in meters.
pub const CAMERA_MOUNT: [f64; 3] = [1.9304, 0.0, 0.9398];

/// Body-frame position of the range-sensor mount on the vehicle, in meters.
pub const RANGE_SENSOR_MOUNT: [f64; 3] = [1.5494, 0.0, 1.27];

/// Translation from the range-sensor origin to the camera origin, in the body frame.
///
/// Subtracting it from a range-sensor point moves the origin to the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidOffset(pub [f64; 3]);

impl RigidOffset {
    /// Sensors sharing one origin.
    pub const ZERO: RigidOffset = RigidOffset([0.0; 3]);

    /// The offset of the vehicle rig, camera mount minus range-sensor mount.
    pub const VEHICLE: RigidOffset = RigidOffset([
        CAMERA_MOUNT[0] - RANGE_SENSOR_MOUNT[0],
        CAMERA_MOUNT[1] - RANGE_SENSOR_MOUNT[1],
        CAMERA_MOUNT[2] - RANGE_SENSOR_MOUNT[2],
    ]);

    /// The offset between two body-frame mount positions.
    pub fn from_mounts(camera: [f64; 3], range_sensor: [f64; 3]) -> Self {
        Self([
            camera[0] - range_sensor[0],
            camera[1] - range_sensor[1],
            camera[2] - range_sensor[2],
        ])
    }

    /// Move a range-sensor point to the camera origin.
    pub fn apply(&self, point: &Point3D) -> Point3D {
        *point - Point3D::from(self.0)
    }
}

/// A signed axis permutation between two frames.
///
/// Output axis `i` is `sign[i] * input[source[i]]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRemap {
    /// Input axis feeding each output axis.
    pub source: [usize; 3],
    /// Sign applied to each output axis.
    pub sign: [f64; 3],
}

impl AxisRemap {
    /// Body frame (x forward, y left, z up) to camera frame (x right, y down, z forward).
    ///
    /// `x_camera = -y`, `y_camera = -z`, `z_camera = x`.
    pub const BODY_TO_CAMERA: AxisRemap = AxisRemap {
        source: [1, 2, 0],
        sign: [-1.0, -1.0, 1.0],
    };

    /// Remap the axes of a point.
    pub fn apply(&self, point: &Point3D) -> CameraPoint {
        let p = point.to_array();
        CameraPoint::new(
            self.sign[0] * p[self.source[0]],
            self.sign[1] * p[self.source[1]],
            self.sign[2] * p[self.source[2]],
        )
    }
}

/// The fixed geometry between the range sensor and the camera.
///
/// A pure translation followed by an axis remap. Not derived from the camera calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigGeometry {
    /// Translation from the range-sensor origin to the camera origin.
    pub offset: RigidOffset,
    /// Axis convention change from the body frame to the camera frame.
    pub axes: AxisRemap,
}

impl RigGeometry {
    /// Geometry of the vehicle rig.
    pub const VEHICLE: RigGeometry = RigGeometry {
        offset: RigidOffset::VEHICLE,
        axes: AxisRemap::BODY_TO_CAMERA,
    };

    /// Create a rig with a custom offset and the body to camera axis remap.
    pub fn with_offset(offset: RigidOffset) -> Self {
        Self {
            offset,
            axes: AxisRemap::BODY_TO_CAMERA,
        }
    }
}

impl Default for RigGeometry {
    fn default() -> Self {
        Self::VEHICLE
    }
}

/// Express a range-sensor point in the camera frame.
///
/// The offset is subtracted first, then the axes are remapped. The order matters: the offset
/// is expressed in the body frame.
///
/// # Arguments
///
/// * `point` - The point in the range-sensor frame.
/// * `rig` - The rig geometry.
///
/// Example:
///
/// ```
/// use lidarcam_3d::{frame_transform, Point3D, RigGeometry, RigidOffset};
///
/// let rig = RigGeometry::with_offset(RigidOffset::ZERO);
/// let p = frame_transform(&Point3D::new(5.0, 1.0, 2.0), &rig);
/// assert_eq!((p.x, p.y, p.z), (-1.0, -2.0, 5.0));
/// ```
pub fn frame_transform(point: &Point3D, rig: &RigGeometry) -> CameraPoint {
    let shifted = rig.offset.apply(point);
    rig.axes.apply(&shifted)
}
