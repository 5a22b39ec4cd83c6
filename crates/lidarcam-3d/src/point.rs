use std::ops::{Add, Mul, Sub};

/// A point in the range-sensor frame.
///
/// Body-frame axis convention: x forward, y left, z up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3D {
    /// Forward coordinate.
    pub x: f64,
    /// Left coordinate.
    pub y: f64,
    /// Up coordinate.
    pub z: f64,
}

impl Point3D {
    /// Create a new point.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The coordinates as an array.
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Whether every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Point3D {
    fn from(p: [f64; 3]) -> Self {
        Self::new(p[0], p[1], p[2])
    }
}

impl Add for Point3D {
    type Output = Point3D;

    fn add(self, rhs: Point3D) -> Point3D {
        Point3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3D {
    type Output = Point3D;

    fn sub(self, rhs: Point3D) -> Point3D {
        Point3D::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Point3D {
    type Output = Point3D;

    fn mul(self, rhs: f64) -> Point3D {
        Point3D::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// A point in the camera frame.
///
/// Camera axis convention: x right, y down, z forward along the optical axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraPoint {
    /// Right coordinate.
    pub x: f64,
    /// Down coordinate.
    pub y: f64,
    /// Depth along the optical axis.
    pub z: f64,
}

impl CameraPoint {
    /// Create a new point.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The homogeneous 4-vector `[x, y, z, 1]`.
    pub fn homogeneous(&self) -> [f64; 4] {
        [self.x, self.y, self.z, 1.0]
    }

    /// Whether every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A pixel location after perspective division.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImagePoint {
    /// Column coordinate in pixels.
    pub u: f64,
    /// Row coordinate in pixels.
    pub v: f64,
}

impl ImagePoint {
    /// Create a new image point.
    pub const fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }

    /// The normalized homogeneous coordinates `[u, v, 1]`.
    pub fn homogeneous(&self) -> [f64; 3] {
        [self.u, self.v, 1.0]
    }

    /// Integer pixel coordinates, truncated toward zero.
    pub fn to_pixel(&self) -> (i64, i64) {
        (self.u as i64, self.v as i64)
    }
}
