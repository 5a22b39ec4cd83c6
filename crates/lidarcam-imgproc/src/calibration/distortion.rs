use super::CameraIntrinsic;
use crate::interpolation::grid::meshgrid_from_fn;
use lidarcam_image::{Image, ImageError, ImageSize};

/// Represents the polynomial distortion parameters of a camera
///
/// Radial distortion is the rational model `(1 + k1 r² + k2 r⁴ + k3 r⁶) / (1 + k4 r² + k5 r⁴ + k6 r⁶)`,
/// tangential distortion uses `p1` and `p2`.
///
/// # Fields
///
/// * `k1` - The first radial distortion coefficient
/// * `k2` - The second radial distortion coefficient
/// * `k3` - The third radial distortion coefficient
/// * `k4` - The fourth radial distortion coefficient
/// * `k5` - The fifth radial distortion coefficient
/// * `k6` - The sixth radial distortion coefficient
/// * `p1` - The first tangential distortion coefficient
/// * `p2` - The second tangential distortion coefficient
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolynomialDistortion {
    /// The first radial distortion coefficient
    pub k1: f64,
    /// The second radial distortion coefficient
    pub k2: f64,
    /// The third radial distortion coefficient
    pub k3: f64,
    /// The fourth radial distortion coefficient
    pub k4: f64,
    /// The fifth radial distortion coefficient
    pub k5: f64,
    /// The sixth radial distortion coefficient
    pub k6: f64,
    /// The first tangential distortion coefficient
    pub p1: f64,
    /// The second tangential distortion coefficient
    pub p2: f64,
}

impl PolynomialDistortion {
    /// Build the distortion from a coefficient vector in OpenCV order.
    ///
    /// The order is `k1, k2, p1, p2, k3, k4, k5, k6`; missing trailing coefficients are zero
    /// and extra ones are ignored.
    pub fn from_coefficients(coeffs: &[f64]) -> Self {
        let c = |i: usize| coeffs.get(i).copied().unwrap_or(0.0);
        Self {
            k1: c(0),
            k2: c(1),
            p1: c(2),
            p2: c(3),
            k3: c(4),
            k4: c(5),
            k5: c(6),
            k6: c(7),
        }
    }

    /// Whether the model leaves every point in place.
    pub fn is_identity(&self) -> bool {
        [
            self.k1, self.k2, self.k3, self.k4, self.k5, self.k6, self.p1, self.p2,
        ]
        .iter()
        .all(|&k| k == 0.0)
    }
}

/// Distort a point given in normalized camera coordinates.
///
/// # Arguments
///
/// * `x` - The normalized x coordinate of the point
/// * `y` - The normalized y coordinate of the point
/// * `distortion` - The distortion parameters of the camera
///
/// # Returns
///
/// The distorted normalized coordinates.
pub fn distort_normalized_polynomial(
    x: f64,
    y: f64,
    distortion: &PolynomialDistortion,
) -> (f64, f64) {
    let PolynomialDistortion {
        k1,
        k2,
        k3,
        k4,
        k5,
        k6,
        p1,
        p2,
    } = *distortion;

    // calculate the radial distance
    let r2 = x * x + y * y;
    let r4 = r2 * r2;
    let r6 = r4 * r2;

    // radial distortion
    let kr = (1.0 + k1 * r2 + k2 * r4 + k3 * r6) / (1.0 + k4 * r2 + k5 * r4 + k6 * r6);

    // tangential distortion
    let xd = x * kr + 2.0 * p1 * x * y + p2 * (r2 + 2.0 * x * x);
    let yd = y * kr + p1 * (r2 + 2.0 * y * y) + 2.0 * p2 * x * y;

    (xd, yd)
}

/// Distort a point using polynomial distortion
///
/// # Arguments
///
/// * `x` - The x coordinate of the point in pixels
/// * `y` - The y coordinate of the point in pixels
/// * `intrinsic` - The intrinsic parameters of the camera
/// * `distortion` - The distortion parameters of the camera
///
/// # Returns
///
/// * `x` - The x coordinate of the distorted point
/// * `y` - The y coordinate of the distorted point
pub fn distort_point_polynomial(
    x: f64,
    y: f64,
    intrinsic: &CameraIntrinsic,
    distortion: &PolynomialDistortion,
) -> (f64, f64) {
    let (fx, fy, cx, cy) = (intrinsic.fx, intrinsic.fy, intrinsic.cx, intrinsic.cy);

    // normalize the coordinates
    let x = (x - cx) / fx;
    let y = (y - cy) / fy;

    let (xd, yd) = distort_normalized_polynomial(x, y, distortion);

    // denormalize the coordinates
    (fx * xd + cx, fy * yd + cy)
}

/// Generate the undistortion map for a polynomial distortion model
///
/// For every pixel of the undistorted output, the map holds the location in the distorted
/// source image to sample from.
///
/// # Arguments
///
/// * `intrinsic` - The intrinsic parameters of the source camera
/// * `new_intrinsic` - The intrinsic parameters of the undistorted output
/// * `distortion` - The distortion parameters of the camera
/// * `size` - The size of the image
///
/// # Returns
///
/// * `map_x` - The x map for undistorting the image
/// * `map_y` - The y map for undistorting the image
pub fn generate_correction_map_polynomial(
    intrinsic: &CameraIntrinsic,
    new_intrinsic: &CameraIntrinsic,
    distortion: &PolynomialDistortion,
    size: &ImageSize,
) -> Result<(Image<f32, 1>, Image<f32, 1>), ImageError> {
    let (dst_rows, dst_cols) = (size.height, size.width);
    meshgrid_from_fn(dst_cols, dst_rows, |u, v| {
        // back-project the output pixel with the new intrinsics
        let x = (u as f64 - new_intrinsic.cx) / new_intrinsic.fx;
        let y = (v as f64 - new_intrinsic.cy) / new_intrinsic.fy;

        let (xd, yd) = distort_normalized_polynomial(x, y, distortion);

        // fx * xd + cx, split so that an identity model maps integer pixels exactly
        let xsrc = intrinsic.cx
            + intrinsic.fx / new_intrinsic.fx * (u as f64 - new_intrinsic.cx)
            + intrinsic.fx * (xd - x);
        let ysrc = intrinsic.cy
            + intrinsic.fy / new_intrinsic.fy * (v as f64 - new_intrinsic.cy)
            + intrinsic.fy * (yd - y);
        (xsrc as f32, ysrc as f32)
    })
}
