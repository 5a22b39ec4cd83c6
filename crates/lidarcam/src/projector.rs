use std::path::Path;

use lidarcam_3d::{CameraPoint, ImagePoint, Point3D, ProjectionError, RigGeometry};
use lidarcam_calib::{CalibrationFormatError, CalibrationState, DistortionCoefficients};
use lidarcam_image::{Image, ImageDtype, ImageError, ImageSize};
use lidarcam_imgproc::{
    calibration::{distortion::PolynomialDistortion, CameraIntrinsic},
    interpolation::InterpolationMode,
    undistort::{validate_image, CorrectionMap},
};

use crate::frame::{Frame, ProjectedFrame};

/// Undistorts images and projects range-sensor points for one calibrated camera.
///
/// Holds an immutable calibration and rig geometry; every method takes `&self`, so a
/// projector can be shared between threads.
///
/// # Examples
///
/// ```
/// use lidarcam::calib::{CalibrationState, DistortionCoefficients};
/// use lidarcam::k3d::{ImagePoint, Point3D, RigGeometry, RigidOffset};
/// use lidarcam::Projector;
///
/// let k = [[1000.0, 0.0, 320.0], [0.0, 1000.0, 240.0], [0.0, 0.0, 1.0]];
/// let p = [
///     [1000.0, 0.0, 320.0, 0.0],
///     [0.0, 1000.0, 240.0, 0.0],
///     [0.0, 0.0, 1.0, 0.0],
/// ];
/// let calibration = CalibrationState::new(k, DistortionCoefficients::zeros(), p).unwrap();
/// let projector =
///     Projector::with_rig(calibration, RigGeometry::with_offset(RigidOffset::ZERO));
///
/// let pixel = projector.project_point(&Point3D::new(5.0, 0.0, 0.0)).unwrap();
/// assert_eq!(pixel, ImagePoint::new(320.0, 240.0));
/// ```
#[derive(Debug, Clone)]
pub struct Projector {
    calibration: CalibrationState,
    rig: RigGeometry,
    intrinsic: CameraIntrinsic,
    distortion: PolynomialDistortion,
    interpolation: InterpolationMode,
}

impl Projector {
    /// Create a projector for the vehicle rig.
    pub fn new(calibration: CalibrationState) -> Self {
        Self::with_rig(calibration, RigGeometry::VEHICLE)
    }

    /// Create a projector with a custom rig geometry.
    pub fn with_rig(calibration: CalibrationState, rig: RigGeometry) -> Self {
        let intrinsic = CameraIntrinsic::from_camera_matrix(calibration.camera_matrix());
        let distortion = PolynomialDistortion::from_coefficients(
            calibration.distortion_coefficients().as_slice(),
        );

        Self {
            calibration,
            rig,
            intrinsic,
            distortion,
            interpolation: InterpolationMode::Bilinear,
        }
    }

    /// Load the calibration from disk and create a projector for the vehicle rig.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CalibrationFormatError> {
        Ok(Self::new(lidarcam_calib::load(path)?))
    }

    /// Use a different interpolation when undistorting images.
    pub fn with_interpolation(mut self, interpolation: InterpolationMode) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// The calibration of the camera.
    pub fn calibration(&self) -> &CalibrationState {
        &self.calibration
    }

    /// The rig geometry between the range sensor and the camera.
    pub fn rig(&self) -> &RigGeometry {
        &self.rig
    }

    /// The 3x3 intrinsic camera matrix.
    pub fn camera_matrix(&self) -> &[[f64; 3]; 3] {
        self.calibration.camera_matrix()
    }

    /// The lens distortion coefficients.
    pub fn distortion_coefficients(&self) -> &DistortionCoefficients {
        self.calibration.distortion_coefficients()
    }

    /// The 3x4 projection matrix.
    pub fn projection_matrix(&self) -> &[[f64; 4]; 3] {
        self.calibration.projection_matrix()
    }

    /// Compute the undistortion map for images of the given size.
    ///
    /// The camera matrix serves as both the source and the destination intrinsics.
    pub fn correction_map(&self, size: ImageSize) -> Result<CorrectionMap, ImageError> {
        CorrectionMap::new(&self.intrinsic, &self.intrinsic, &self.distortion, size)
    }

    /// Remove the lens distortion of an image.
    ///
    /// The output has the dimensions of the input. The result only depends on the image and
    /// the calibration.
    ///
    /// # Errors
    ///
    /// Fails if the image is empty or does not have 1, 3 or 4 channels.
    pub fn undistort_image<T: ImageDtype, const C: usize>(
        &self,
        image: &Image<T, C>,
    ) -> Result<Image<T, C>, ImageError> {
        validate_image(image)?;
        if self.distortion.is_identity() {
            return Ok(image.clone());
        }
        let map = self.correction_map(image.size())?;
        map.apply(image, self.interpolation)
    }

    /// Remove the lens distortion of an image with a precomputed map.
    ///
    /// Equivalent to [`Projector::undistort_image`] when `map` comes from
    /// [`Projector::correction_map`] for the image size.
    pub fn undistort_image_with_map<T: ImageDtype, const C: usize>(
        &self,
        image: &Image<T, C>,
        map: &CorrectionMap,
    ) -> Result<Image<T, C>, ImageError> {
        map.apply(image, self.interpolation)
    }

    /// Express a range-sensor point in the camera frame.
    pub fn frame_transform(&self, point: &Point3D) -> CameraPoint {
        lidarcam_3d::frame_transform(point, &self.rig)
    }

    /// Project a range-sensor point into the undistorted image.
    ///
    /// # Errors
    ///
    /// Fails if the point is behind the camera, the perspective divide has a zero
    /// denominator, or the coordinates are not finite.
    pub fn project_point(&self, point: &Point3D) -> Result<ImagePoint, ProjectionError> {
        lidarcam_3d::project_point(point, &self.rig, self.projection_matrix())
    }

    /// Project a sequence of range-sensor points, e.g. the corners of a bounding box.
    ///
    /// One result per input point, in input order.
    pub fn project_points(&self, points: &[Point3D]) -> Vec<Result<ImagePoint, ProjectionError>> {
        lidarcam_3d::project_points(points, &self.rig, self.projection_matrix())
    }

    /// Undistort a frame and project its points.
    ///
    /// Points that cannot be projected are kept as errors in the result and logged.
    ///
    /// # Errors
    ///
    /// Fails only if the image cannot be undistorted.
    pub fn process_frame<T: ImageDtype, const C: usize>(
        &self,
        frame: &Frame<T, C>,
    ) -> Result<ProjectedFrame<T, C>, ImageError> {
        let image = self.undistort_image(&frame.image)?;
        Ok(self.project_frame_points(frame, image))
    }

    /// Like [`Projector::process_frame`], with a precomputed correction map.
    pub fn process_frame_with_map<T: ImageDtype, const C: usize>(
        &self,
        frame: &Frame<T, C>,
        map: &CorrectionMap,
    ) -> Result<ProjectedFrame<T, C>, ImageError> {
        let image = self.undistort_image_with_map(&frame.image, map)?;
        Ok(self.project_frame_points(frame, image))
    }

    fn project_frame_points<T, const C: usize>(
        &self,
        frame: &Frame<T, C>,
        image: Image<T, C>,
    ) -> ProjectedFrame<T, C> {
        let center = frame.center.as_ref().map(|p| self.project_point(p));
        let corners = self.project_points(&frame.corners);

        let failed = center.iter().chain(corners.iter()).filter(|r| r.is_err()).count();
        if failed > 0 {
            log::warn!(
                "{} of {} points could not be projected",
                failed,
                corners.len() + usize::from(center.is_some())
            );
        }

        ProjectedFrame {
            image,
            center,
            corners,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lidarcam_3d::{BoundingBox3D, RigidOffset};

    fn projector(distortion: &[f64]) -> Projector {
        let k = [[1000.0, 0.0, 320.0], [0.0, 1000.0, 240.0], [0.0, 0.0, 1.0]];
        let p = [
            [1000.0, 0.0, 320.0, 0.0],
            [0.0, 1000.0, 240.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ];
        let calibration =
            CalibrationState::new(k, DistortionCoefficients::new(distortion).unwrap(), p).unwrap();
        Projector::with_rig(calibration, RigGeometry::with_offset(RigidOffset::ZERO))
    }

    #[test]
    fn straight_ahead_hits_principal_point() -> Result<(), ProjectionError> {
        let projector = projector(&[0.0; 5]);
        let p = projector.project_point(&Point3D::new(5.0, 0.0, 0.0))?;
        assert_eq!(p.homogeneous(), [320.0, 240.0, 1.0]);
        Ok(())
    }

    #[test]
    fn frame_transform_matches_rig() {
        let projector = projector(&[0.0; 5]);
        assert_eq!(
            projector.frame_transform(&Point3D::new(3.0, 2.0, 1.0)),
            CameraPoint::new(-2.0, -1.0, 3.0)
        );
    }

    #[test]
    fn bbox_corners_keep_order() {
        let projector = projector(&[0.0; 5]);
        let bbox = BoundingBox3D::new(Point3D::new(20.0, 0.0, -1.5), [4.0, 2.0, 1.5], 0.1);
        let corners = bbox.corners();
        let projected = projector.project_points(&corners);
        assert_eq!(projected.len(), 8);
        for (corner, result) in corners.iter().zip(projected.iter()) {
            let expected = projector.project_point(corner).unwrap();
            let got = result.unwrap();
            assert_relative_eq!(got.u, expected.u);
            assert_relative_eq!(got.v, expected.v);
        }
        // left corners project left of right corners
        assert!(projected[0].unwrap().u < projected[1].unwrap().u);
    }

    #[test]
    fn zero_distortion_undistort_is_identity() -> Result<(), ImageError> {
        let projector = projector(&[0.0; 5]);
        let size = ImageSize {
            width: 16,
            height: 12,
        };
        let data = (0..size.area() * 3).map(|i| (i % 251) as u8).collect();
        let image = Image::<u8, 3>::new(size, data)?;
        let undistorted = projector.undistort_image(&image)?;
        assert_eq!(undistorted, image);
        Ok(())
    }

    #[test]
    fn map_and_direct_undistort_agree() -> Result<(), ImageError> {
        let projector = projector(&[-0.25, 0.08, 0.001, -0.001, 0.0]);
        let size = ImageSize {
            width: 40,
            height: 30,
        };
        let data = (0..size.area()).map(|i| (i % 256) as u8).collect();
        let image = Image::<u8, 1>::new(size, data)?;

        let map = projector.correction_map(size)?;
        assert_eq!(
            projector.undistort_image(&image)?,
            projector.undistort_image_with_map(&image, &map)?
        );
        Ok(())
    }

    #[test]
    fn process_frame_keeps_invalid_points() -> Result<(), ImageError> {
        let projector = projector(&[0.0; 5]);
        let image = Image::<u8, 3>::from_size_val([8, 6].into(), 0)?;
        let frame = Frame::new(image)
            .with_center(Point3D::new(-4.0, 0.0, 0.0))
            .with_corners(vec![Point3D::new(10.0, 0.0, 0.0), Point3D::new(-1.0, 0.0, 0.0)]);

        let projected = projector.process_frame(&frame)?;
        assert_eq!(
            projected.center,
            Some(Err(ProjectionError::BehindCamera(-4.0)))
        );
        assert_eq!(projected.corners.len(), 2);
        assert_eq!(projected.corners[0], Ok(ImagePoint::new(320.0, 240.0)));
        assert!(projected.corners[1].is_err());
        assert_eq!(projected.valid_corners().count(), 1);
        Ok(())
    }

    #[test]
    fn grazing_points_do_not_break_the_overlay() -> Result<(), ImageError> {
        let projector = projector(&[0.0; 5]);
        // just in front of the camera plane, far to the left
        let grazing = Point3D::new(1e-17, 1.0, 0.0);
        let pixel = projector.project_point(&grazing);
        assert!(matches!(&pixel, Ok(p) if p.u < -1e19));

        let image = Image::<u8, 3>::from_size_val([640, 480].into(), 0)?;
        let frame = Frame::new(image)
            .with_center(grazing)
            .with_corners(vec![grazing, Point3D::new(10.0, 0.0, 0.0)]);
        let mut projected = projector.process_frame(&frame)?;
        assert_eq!(projected.draw_overlay(&crate::OverlayStyle::default()), 1);
        assert_eq!(projected.image.get_pixel(325, 240, 1)?, 255);
        Ok(())
    }

    #[test]
    fn process_frame_rejects_empty_image() -> Result<(), ImageError> {
        let projector = projector(&[0.0; 5]);
        let image = Image::<u8, 3>::new([0, 0].into(), vec![])?;
        let res = projector.process_frame(&Frame::new(image));
        assert!(matches!(res, Err(ImageError::EmptyImage(0, 0))));
        Ok(())
    }
}
