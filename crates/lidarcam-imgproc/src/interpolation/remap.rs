use crate::parallel;

use super::interpolate::interpolate_pixel;
use super::InterpolationMode;
use lidarcam_image::{Image, ImageDtype, ImageError};

/// Apply generic geometric transformation to an image.
///
/// The input is padded with a constant zero border: source locations farther than one pixel
/// outside the image give zero, and bilinear samples near the edge blend with it.
///
/// # Arguments
///
/// * `src` - The input image container with shape (height, width, C).
/// * `dst` - The output image container with shape (height, width, C).
/// * `map_x` - The x coordinates of the pixels to interpolate.
/// * `map_y` - The y coordinates of the pixels to interpolate.
/// * `interpolation` - The interpolation mode to use.
///
/// # Errors
///
/// * The mapx and mapy must have the same size.
/// * The output image must have the same size as the mapx and mapy.
/// * The input image must not be empty.
pub fn remap<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    map_x: &Image<f32, 1>,
    map_y: &Image<f32, 1>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    if map_x.size() != map_y.size() {
        return Err(ImageError::InvalidImageSize(
            map_x.rows(),
            map_x.cols(),
            map_y.rows(),
            map_y.cols(),
        ));
    }

    if dst.size() != map_x.size() {
        return Err(ImageError::InvalidImageSize(
            map_x.rows(),
            map_x.cols(),
            dst.rows(),
            dst.cols(),
        ));
    }

    if src.is_empty() {
        return Err(ImageError::EmptyImage(src.cols(), src.rows()));
    }

    let (cols, rows) = (src.cols() as f32, src.rows() as f32);

    // parallelize the remap operation by rows
    parallel::par_iter_rows_resample(dst, map_x, map_y, |&x, &y, dst_pixel| {
        // also rejects NaN
        if !(x > -1.0 && x < cols && y > -1.0 && y < rows) {
            dst_pixel.fill(T::default());
            return;
        }

        let pixel = interpolate_pixel(src, x, y, interpolation);
        dst_pixel
            .iter_mut()
            .zip(pixel.iter())
            .for_each(|(d, &p)| *d = T::from_f32(p));
    });

    Ok(())
}
