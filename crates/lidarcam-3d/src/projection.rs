use crate::point::{CameraPoint, ImagePoint, Point3D};
use crate::rig::{frame_transform, RigGeometry};

/// Reasons a point has no valid pixel location.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum ProjectionError {
    /// The point lies on or behind the camera plane.
    #[error("Point is behind the camera (z: {0})")]
    BehindCamera(f64),

    /// The homogeneous denominator of the projection is zero.
    #[error("Perspective divide by zero")]
    ZeroDenominator,

    /// The point or its projection has NaN or infinite coordinates.
    #[error("Point or projection is not finite")]
    NonFinite,
}

/// Project a camera-frame point with a 3x4 projection matrix.
///
/// Computes `[u', v', w] = P [x, y, z, 1]` and returns `(u'/w, v'/w)`.
///
/// # Arguments
///
/// * `point` - The point in the camera frame.
/// * `projection` - The 3x4 projection matrix `P`.
///
/// # Errors
///
/// * [`ProjectionError::BehindCamera`] if `z <= 0`.
/// * [`ProjectionError::ZeroDenominator`] if `w == 0`.
/// * [`ProjectionError::NonFinite`] if the point or the result is not finite.
pub fn project_camera_point(
    point: &CameraPoint,
    projection: &[[f64; 4]; 3],
) -> Result<ImagePoint, ProjectionError> {
    if !point.is_finite() {
        return Err(ProjectionError::NonFinite);
    }

    if point.z <= 0.0 {
        return Err(ProjectionError::BehindCamera(point.z));
    }

    let x = point.homogeneous();
    let row_dot = |row: &[f64; 4]| row.iter().zip(x.iter()).map(|(a, b)| a * b).sum::<f64>();

    let (u, v, w) = (
        row_dot(&projection[0]),
        row_dot(&projection[1]),
        row_dot(&projection[2]),
    );

    if w == 0.0 {
        return Err(ProjectionError::ZeroDenominator);
    }

    let image_point = ImagePoint::new(u / w, v / w);
    if !image_point.u.is_finite() || !image_point.v.is_finite() {
        return Err(ProjectionError::NonFinite);
    }

    Ok(image_point)
}

/// Project a range-sensor point into the image.
///
/// Applies [`frame_transform`] and then [`project_camera_point`].
pub fn project_point(
    point: &Point3D,
    rig: &RigGeometry,
    projection: &[[f64; 4]; 3],
) -> Result<ImagePoint, ProjectionError> {
    project_camera_point(&frame_transform(point, rig), projection)
}

/// Project a sequence of range-sensor points into the image.
///
/// The output has one entry per input point, in input order. A failing point yields an
/// error entry and does not affect the others.
pub fn project_points(
    points: &[Point3D],
    rig: &RigGeometry,
    projection: &[[f64; 4]; 3],
) -> Vec<Result<ImagePoint, ProjectionError>> {
    points
        .iter()
        .map(|p| project_point(p, rig, projection))
        .collect()
}
