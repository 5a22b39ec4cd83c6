use lidarcam_3d::{ImagePoint, ProjectionError};
use lidarcam_image::Image;
use lidarcam_imgproc::draw::{draw_circle, draw_line};

use crate::frame::ProjectedFrame;

/// The shape of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerShape {
    /// A circle outline around the point.
    #[default]
    Circle,
    /// Two diagonal strokes crossing at the point.
    Cross,
}

/// How a projected point is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker<const C: usize> {
    /// The marker shape.
    pub shape: MarkerShape,
    /// The marker color.
    pub color: [u8; C],
    /// Radius of the circle, or half the size of the cross, in pixels.
    pub radius: u32,
    /// Stroke thickness in pixels.
    pub thickness: u32,
}

impl<const C: usize> Marker<C> {
    /// A circle of radius 5 with a stroke of 2 pixels.
    pub fn circle(color: [u8; C]) -> Self {
        Self {
            shape: MarkerShape::Circle,
            color,
            radius: 5,
            thickness: 2,
        }
    }
}

/// Markers for the object center and its corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayStyle<const C: usize> {
    /// Marker of the object center.
    pub center: Marker<C>,
    /// Marker of each corner.
    pub corner: Marker<C>,
}

impl Default for OverlayStyle<3> {
    /// Red center, green corners.
    fn default() -> Self {
        Self {
            center: Marker::circle([255, 0, 0]),
            corner: Marker::circle([0, 255, 0]),
        }
    }
}

/// Draw one marker at a projected point.
///
/// The point is truncated to integer pixels and the marker is clipped to the image. Points too
/// far outside the image for any part of the marker to show are skipped.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `point` - The projected point.
/// * `marker` - How to draw the point.
///
/// # Returns
///
/// Whether the marker was drawn.
pub fn draw_marker<const C: usize>(
    img: &mut Image<u8, C>,
    point: &ImagePoint,
    marker: &Marker<C>,
) -> bool {
    let reach = marker.radius as f64 + marker.thickness as f64 + 1.0;
    let (cols, rows) = (img.cols() as f64, img.rows() as f64);
    if !(point.u > -reach && point.u < cols + reach && point.v > -reach && point.v < rows + reach) {
        return false;
    }

    let (x, y) = point.to_pixel();
    match marker.shape {
        MarkerShape::Circle => draw_circle(img, (x, y), marker.radius, marker.color, marker.thickness),
        MarkerShape::Cross => {
            let r = marker.radius as i64;
            let t = marker.thickness as usize;
            draw_line(img, (x - r, y - r), (x + r, y + r), marker.color, t);
            draw_line(img, (x - r, y + r), (x + r, y - r), marker.color, t);
        }
    }
    true
}

/// Draw a marker at every point that could be projected.
///
/// Failed projections and points far outside the image are skipped.
///
/// # Returns
///
/// The number of markers drawn.
pub fn draw_markers<'a, const C: usize>(
    img: &mut Image<u8, C>,
    points: impl IntoIterator<Item = &'a Result<ImagePoint, ProjectionError>>,
    marker: &Marker<C>,
) -> usize {
    let mut drawn = 0;
    for point in points.into_iter().filter_map(|p| p.as_ref().ok()) {
        if draw_marker(img, point, marker) {
            drawn += 1;
        }
    }
    drawn
}

impl<const C: usize> ProjectedFrame<u8, C> {
    /// Draw the projected center, then the corners, onto the undistorted image.
    ///
    /// Returns the number of markers drawn.
    pub fn draw_overlay(&mut self, style: &OverlayStyle<C>) -> usize {
        let center = draw_markers(&mut self.image, &self.center, &style.center);
        let corners = draw_markers(&mut self.image, &self.corners, &style.corner);
        center + corners
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lidarcam_image::{ImageError, ImageSize};

    fn blank(width: usize, height: usize) -> Result<Image<u8, 3>, ImageError> {
        Image::from_size_val(ImageSize { width, height }, 0)
    }

    #[test]
    fn default_style_colors() {
        let style = OverlayStyle::default();
        assert_eq!(style.center.color, [255, 0, 0]);
        assert_eq!(style.corner.color, [0, 255, 0]);
        assert_eq!(style.center.radius, 5);
        assert_eq!(style.corner.thickness, 2);
    }

    #[test]
    fn circle_marker_leaves_center_untouched() -> Result<(), ImageError> {
        let mut img = blank(20, 20)?;
        draw_marker(&mut img, &ImagePoint::new(10.4, 10.9), &Marker::circle([255, 0, 0]));
        assert_eq!(img.get_pixel(10, 10, 0)?, 0);
        assert_eq!(img.get_pixel(15, 10, 0)?, 255);
        assert_eq!(img.get_pixel(10, 5, 0)?, 255);
        assert_eq!(img.get_pixel(15, 10, 1)?, 0);
        Ok(())
    }

    #[test]
    fn cross_marker_hits_center() -> Result<(), ImageError> {
        let mut img = blank(9, 9)?;
        let marker = Marker {
            shape: MarkerShape::Cross,
            color: [0, 0, 200],
            radius: 3,
            thickness: 1,
        };
        draw_marker(&mut img, &ImagePoint::new(4.0, 4.0), &marker);
        assert_eq!(img.get_pixel(4, 4, 2)?, 200);
        assert_eq!(img.get_pixel(1, 1, 2)?, 200);
        assert_eq!(img.get_pixel(7, 1, 2)?, 200);
        assert_eq!(img.get_pixel(4, 1, 2)?, 0);
        Ok(())
    }

    #[test]
    fn failed_points_are_skipped() -> Result<(), ImageError> {
        let mut img = blank(32, 32)?;
        let points = vec![
            Ok(ImagePoint::new(8.0, 8.0)),
            Err(ProjectionError::BehindCamera(-1.0)),
            Ok(ImagePoint::new(-100.0, 500.0)),
            Err(ProjectionError::ZeroDenominator),
            Ok(ImagePoint::new(-1e20, 16.0)),
            Ok(ImagePoint::new(16.0, f64::MAX)),
        ];
        let drawn = draw_markers(&mut img, &points, &Marker::circle([0, 255, 0]));
        assert_eq!(drawn, 1);
        assert_eq!(img.get_pixel(13, 8, 1)?, 255);
        Ok(())
    }

    #[test]
    fn markers_near_the_border_are_drawn() -> Result<(), ImageError> {
        let mut img = blank(16, 16)?;
        let cross = Marker {
            shape: MarkerShape::Cross,
            color: [1, 2, 3],
            radius: 4,
            thickness: 1,
        };
        assert!(draw_marker(&mut img, &ImagePoint::new(-3.0, 8.0), &cross));
        assert_eq!(img.get_pixel(0, 5, 2)?, 3);
        assert!(!draw_marker(&mut img, &ImagePoint::new(-1e20, 8.0), &cross));
        assert!(!draw_marker(&mut img, &ImagePoint::new(8.0, 1e20), &Marker::circle([9, 9, 9])));
        Ok(())
    }

    #[test]
    fn overlay_draws_corners_over_center() -> Result<(), ImageError> {
        let mut frame = ProjectedFrame {
            image: blank(32, 32)?,
            center: Some(Ok(ImagePoint::new(16.0, 16.0))),
            corners: vec![Ok(ImagePoint::new(16.0, 16.0))],
        };
        let drawn = frame.draw_overlay(&OverlayStyle::default());
        assert_eq!(drawn, 2);
        assert_eq!(frame.image.get_pixel(21, 16, 0)?, 0);
        assert_eq!(frame.image.get_pixel(21, 16, 1)?, 255);
        Ok(())
    }
}
