/// Reshape a flat sequence into a fixed-size matrix in row-major order.
///
/// Element `i` of `data` lands at row `i / C`, column `i % C`, the layout used by the
/// `data` arrays of camera calibration documents.
///
/// # Arguments
///
/// * `data` - The flat sequence of values.
///
/// # Returns
///
/// The `R x C` matrix, or `None` if `data.len() != R * C`.
///
/// Example:
///
/// ```
/// use lidarcam_calib::reshape;
///
/// let m = reshape::<2, 3>(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
/// assert_eq!(m, [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
/// ```
pub fn reshape<const R: usize, const C: usize>(data: &[f64]) -> Option<[[f64; C]; R]> {
    if data.len() != R * C {
        return None;
    }

    let mut matrix = [[0.0; C]; R];
    for (i, &value) in data.iter().enumerate() {
        matrix[i / C][i % C] = value;
    }

    Some(matrix)
}

/// Flatten a fixed-size matrix into a row-major sequence.
///
/// This is the inverse of [`reshape`].
pub fn flatten<const R: usize, const C: usize>(matrix: &[[f64; C]; R]) -> Vec<f64> {
    matrix.iter().flat_map(|row| row.iter().copied()).collect()
}
