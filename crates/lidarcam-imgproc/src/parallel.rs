use rayon::prelude::*;

use lidarcam_image::Image;

/// Apply a function to each destination pixel in parallel, together with its map coordinates.
///
/// Rows are distributed over the global rayon thread pool.
///
/// # Arguments
///
/// * `dst` - The destination image.
/// * `map_x` - The x coordinate associated with each destination pixel.
/// * `map_y` - The y coordinate associated with each destination pixel.
/// * `f` - Receives the map coordinates and the channels of one destination pixel.
pub fn par_iter_rows_resample<T, const C: usize>(
    dst: &mut Image<T, C>,
    map_x: &Image<f32, 1>,
    map_y: &Image<f32, 1>,
    f: impl Fn(&f32, &f32, &mut [T]) + Send + Sync,
) where
    T: Send,
{
    let cols = dst.cols();
    if cols == 0 {
        return;
    }

    let map_x_slice = map_x.as_slice();
    let map_y_slice = map_y.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(C * cols)
        .zip(map_x_slice.par_chunks_exact(cols))
        .zip(map_y_slice.par_chunks_exact(cols))
        .for_each(|((dst_chunk, map_x_chunk), map_y_chunk)| {
            dst_chunk
                .chunks_exact_mut(C)
                .zip(map_x_chunk.iter().zip(map_y_chunk.iter()))
                .for_each(|(dst_pixel, (x, y))| {
                    f(x, y, dst_pixel);
                });
        });
}
