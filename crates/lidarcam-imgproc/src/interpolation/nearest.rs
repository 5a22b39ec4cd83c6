use lidarcam_image::{Image, ImageDtype};

/// Kernel for nearest neighbor interpolation
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
///
/// # Returns
///
/// The interpolated pixel values, zero when the nearest pixel is outside the image.
pub(crate) fn nearest_neighbor_interpolation<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
) -> [f32; C] {
    let (rows, cols) = (image.rows() as i64, image.cols() as i64);

    if !(u.is_finite() && v.is_finite()) {
        return [0.0; C];
    }

    let (iu, iv) = (u.round() as i64, v.round() as i64);
    if iu < 0 || iv < 0 || iu >= cols || iv >= rows {
        return [0.0; C];
    }

    let base = (iv * cols + iu) as usize * C;
    let src = &image.as_slice()[base..base + C];

    let mut pixel = [0.0; C];
    for (dst, &s) in pixel.iter_mut().zip(src.iter()) {
        *dst = s.into();
    }

    pixel
}
