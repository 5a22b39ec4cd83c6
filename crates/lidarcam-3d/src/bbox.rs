use crate::point::Point3D;

/// An oriented box in the range-sensor frame.
///
/// The box rests on its base: `center` holds the x/y center of the footprint and the z of the
/// bottom face, the tracklet annotation convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox3D {
    /// Center of the bottom face.
    pub center: Point3D,
    /// Length, width and height of the box.
    pub size: [f64; 3],
    /// Rotation around the up axis, in radians.
    pub yaw: f64,
}

impl BoundingBox3D {
    /// Create a new bounding box.
    pub fn new(center: Point3D, size: [f64; 3], yaw: f64) -> Self {
        Self { center, size, yaw }
    }

    /// The eight corners of the box.
    ///
    /// The four bottom corners come first, then the four top corners in the same order:
    /// front-left, front-right, rear-right, rear-left.
    pub fn corners(&self) -> [Point3D; 8] {
        let [l, w, h] = self.size;
        let (hl, hw) = (l / 2.0, w / 2.0);
        let (s, c) = self.yaw.sin_cos();

        let footprint = [(hl, hw), (hl, -hw), (-hl, -hw), (-hl, hw)];

        let mut corners = [Point3D::default(); 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            let (x, y) = footprint[i % 4];
            let z = if i < 4 { 0.0 } else { h };
            *corner = self.center + Point3D::new(c * x - s * y, s * x + c * y, z);
        }

        corners
    }
}
