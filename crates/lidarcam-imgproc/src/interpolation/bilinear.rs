use lidarcam_image::{Image, ImageDtype};

/// Kernel for bilinear interpolation
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
///
/// # Returns
///
/// The interpolated pixel values.
///
/// Neighbors outside the image count as zero, so samples within one pixel of the border fade
/// out instead of being clamped.
pub(crate) fn bilinear_interpolation<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
) -> [f32; C] {
    let (rows, cols) = (image.rows() as i64, image.cols() as i64);
    if !(u > -1.0 && u < cols as f32 && v > -1.0 && v < rows as f32) {
        return [0.0; C];
    }

    let (u0, v0) = (u.floor(), v.floor());
    let (frac_u, frac_v) = (u - u0, v - v0);
    let (iu0, iv0) = (u0 as i64, v0 as i64);

    let frac_uu = 1.0 - frac_u;
    let frac_vv = 1.0 - frac_v;

    let taps = [
        (iu0, iv0, frac_uu * frac_vv),
        (iu0 + 1, iv0, frac_u * frac_vv),
        (iu0, iv0 + 1, frac_uu * frac_v),
        (iu0 + 1, iv0 + 1, frac_u * frac_v),
    ];

    let data = image.as_slice();
    let mut pixel = [0.0; C];
    for (iu, iv, w) in taps {
        if w == 0.0 || iu < 0 || iv < 0 || iu >= cols || iv >= rows {
            continue;
        }
        let base = (iv * cols + iu) as usize * C;
        for (dst, &s) in pixel.iter_mut().zip(data[base..base + C].iter()) {
            let s: f32 = s.into();
            *dst += s * w;
        }
    }

    pixel
}
