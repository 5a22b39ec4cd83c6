use lidarcam_3d::{BoundingBox3D, ImagePoint, Point3D, ProjectionError};
use lidarcam_image::Image;

/// A camera image together with the range-sensor points observed at the same time.
///
/// Points are expressed in the range-sensor frame.
#[derive(Debug, Clone)]
pub struct Frame<T, const C: usize> {
    /// The distorted camera image.
    pub image: Image<T, C>,
    /// The center of the detected object, if any.
    pub center: Option<Point3D>,
    /// Additional points to project, usually the corners of a bounding box.
    pub corners: Vec<Point3D>,
}

impl<T, const C: usize> Frame<T, C> {
    /// Create a frame with an image and no points.
    pub fn new(image: Image<T, C>) -> Self {
        Self {
            image,
            center: None,
            corners: Vec::new(),
        }
    }

    /// Set the object center.
    pub fn with_center(mut self, center: Point3D) -> Self {
        self.center = Some(center);
        self
    }

    /// Set the center and the eight corners from a bounding box.
    pub fn with_bbox(mut self, bbox: &BoundingBox3D) -> Self {
        self.center = Some(bbox.center);
        self.corners = bbox.corners().to_vec();
        self
    }

    /// Set the points projected as corners.
    pub fn with_corners(mut self, corners: Vec<Point3D>) -> Self {
        self.corners = corners;
        self
    }
}

/// An undistorted image with its projected points.
///
/// `corners` has one entry per input corner, in input order.
#[derive(Debug, Clone)]
pub struct ProjectedFrame<T, const C: usize> {
    /// The undistorted image.
    pub image: Image<T, C>,
    /// The projected center, if the frame had one.
    pub center: Option<Result<ImagePoint, ProjectionError>>,
    /// The projected corners.
    pub corners: Vec<Result<ImagePoint, ProjectionError>>,
}

impl<T, const C: usize> ProjectedFrame<T, C> {
    /// Iterate over the corners that could be projected.
    pub fn valid_corners(&self) -> impl Iterator<Item = &ImagePoint> + '_ {
        self.corners.iter().filter_map(|c| c.as_ref().ok())
    }
}
