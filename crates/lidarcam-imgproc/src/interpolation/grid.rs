use lidarcam_image::{Image, ImageError, ImageSize};

/// Create a pair of maps by evaluating a function at every pixel
///
/// # Arguments
///
/// * `cols` - The number of columns indicating the width of the grid
/// * `rows` - The number of rows indicating the height of the grid
/// * `f` - Maps the pixel `(x, y)` to the pair of values stored at that pixel
///
/// # Returns
///
/// A tuple of single channel images of shape (rows, cols) holding the two components.
pub fn meshgrid_from_fn(
    cols: usize,
    rows: usize,
    f: impl Fn(usize, usize) -> (f32, f32),
) -> Result<(Image<f32, 1>, Image<f32, 1>), ImageError> {
    let mut map_x = Vec::with_capacity(rows * cols);
    let mut map_y = Vec::with_capacity(rows * cols);

    for y in 0..rows {
        for x in 0..cols {
            let (vx, vy) = f(x, y);
            map_x.push(vx);
            map_y.push(vy);
        }
    }

    let size = ImageSize {
        width: cols,
        height: rows,
    };

    Ok((Image::new(size, map_x)?, Image::new(size, map_y)?))
}
