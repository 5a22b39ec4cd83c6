use lidarcam_image::Image;

/// Helper function to set a pixel's color, ignoring pixels outside the image.
#[inline]
fn set_pixel<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C]) {
    if x >= 0 && x < img.cols() as i64 && y >= 0 && y < img.rows() as i64 {
        let start = (y as usize * img.cols() + x as usize) * C;
        img.as_slice_mut()[start..start + C].copy_from_slice(&color);
    }
}

/// Draws a line on an image inplace using a standard Bresenham's line algorithm.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `p0` - The start point of the line as a tuple of (x, y).
/// * `p1` - The end point of the line as a tuple of (x, y).
/// * `color` - The color of the line as an array of `C` elements.
/// * `thickness` - The thickness of the line. (Note: thickness > 1 is approximate).
pub fn draw_line<const C: usize>(
    img: &mut Image<u8, C>,
    p0: (i64, i64),
    p1: (i64, i64),
    color: [u8; C],
    thickness: usize,
) {
    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    let mut err = dx - dy;

    let offset = if thickness > 1 {
        thickness as i64 / 2
    } else {
        0
    };

    loop {
        // approximate thickness with a small square centered at the point
        for i in -offset..=offset {
            for j in -offset..=offset {
                set_pixel(img, x0 + i, y0 + j, color);
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draws a circle outline on an image inplace.
///
/// A pixel is painted when its distance to the center lies within `thickness / 2` of the
/// radius. Parts of the circle outside the image are clipped.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `center` - The center of the circle as a tuple of (x, y).
/// * `radius` - The radius of the circle in pixels.
/// * `color` - The color of the circle as an array of `C` elements.
/// * `thickness` - The thickness of the outline in pixels.
pub fn draw_circle<const C: usize>(
    img: &mut Image<u8, C>,
    center: (i64, i64),
    radius: u32,
    color: [u8; C],
    thickness: u32,
) {
    let (cx, cy) = center;
    let half = thickness.max(1) as f64 / 2.0;
    let inner = (radius as f64 - half).max(0.0);
    let outer = radius as f64 + half;
    let (inner2, outer2) = (inner * inner, outer * outer);

    // only the part of the bounding square that overlaps the image is visited
    let reach = outer.ceil() as i64;
    let (max_x, max_y) = (img.cols() as i64 - 1, img.rows() as i64 - 1);
    let x_range = cx.saturating_sub(reach).max(0)..=cx.saturating_add(reach).min(max_x);
    let y_range = cy.saturating_sub(reach).max(0)..=cy.saturating_add(reach).min(max_y);
    for y in y_range {
        for x in x_range.clone() {
            let (dx, dy) = (x as f64 - cx as f64, y as f64 - cy as f64);
            let d2 = dx * dx + dy * dy;
            if d2 >= inner2 && d2 <= outer2 {
                set_pixel(img, x, y, color);
            }
        }
    }
}
