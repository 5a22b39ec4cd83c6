use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CalibrationFormatError;
use crate::matrix::reshape;

/// A matrix stored as explicit dimensions plus a flat row-major array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixField {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Row-major values, `rows * cols` of them.
    pub data: Vec<f64>,
}

impl MatrixField {
    /// Create a field from a fixed-size matrix.
    pub fn from_matrix<const R: usize, const C: usize>(matrix: &[[f64; C]; R]) -> Self {
        Self {
            rows: R,
            cols: C,
            data: crate::matrix::flatten(matrix),
        }
    }

    /// Check that the declared dimensions describe the data length.
    pub fn validate(&self, field: &'static str) -> Result<(), CalibrationFormatError> {
        // declared dimensions come from the file and may overflow
        if self.rows.checked_mul(self.cols) != Some(self.data.len()) {
            return Err(CalibrationFormatError::DataLengthMismatch {
                field,
                rows: self.rows,
                cols: self.cols,
                len: self.data.len(),
            });
        }

        if self.data.iter().any(|v| !v.is_finite()) {
            return Err(CalibrationFormatError::NonFinite(field));
        }

        Ok(())
    }

    /// Convert the field into a `R x C` matrix.
    ///
    /// # Errors
    ///
    /// Fails if the declared dimensions do not match the data length, or if they do not
    /// match `R x C`.
    pub fn to_matrix<const R: usize, const C: usize>(
        &self,
        field: &'static str,
    ) -> Result<[[f64; C]; R], CalibrationFormatError> {
        self.validate(field)?;

        let unexpected_shape = || CalibrationFormatError::UnexpectedShape {
            field,
            expected_rows: R,
            expected_cols: C,
            rows: self.rows,
            cols: self.cols,
        };

        if self.rows != R || self.cols != C {
            return Err(unexpected_shape());
        }

        reshape::<R, C>(&self.data).ok_or_else(unexpected_shape)
    }

    /// Convert the field into a vector, accepting both `1 x N` and `N x 1` layouts.
    pub fn to_vector(&self, field: &'static str) -> Result<&[f64], CalibrationFormatError> {
        self.validate(field)?;

        if self.rows != 1 && self.cols != 1 {
            return Err(CalibrationFormatError::UnexpectedShape {
                field,
                expected_rows: 1,
                expected_cols: self.data.len(),
                rows: self.rows,
                cols: self.cols,
            });
        }

        Ok(&self.data)
    }
}

/// The camera calibration document.
///
/// The three matrix fields are required. The remaining fields are the optional extras of a
/// ROS `camera_info` file (as written by the camera calibrator, e.g. `ost.yaml`).
///
/// ```yaml
/// image_width: 1400
/// image_height: 512
/// camera_name: narrow_stereo
/// camera_matrix:
///   rows: 3
///   cols: 3
///   data: [1000.0, 0.0, 320.0, 0.0, 1000.0, 240.0, 0.0, 0.0, 1.0]
/// distortion_model: plumb_bob
/// distortion_coefficients:
///   rows: 1
///   cols: 5
///   data: [-0.2, 0.1, 0.0, 0.0, 0.0]
/// projection_matrix:
///   rows: 3
///   cols: 4
///   data: [1000.0, 0.0, 320.0, 0.0, 0.0, 1000.0, 240.0, 0.0, 0.0, 0.0, 1.0, 0.0]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationDocument {
    /// The 3x3 intrinsic camera matrix `K`.
    pub camera_matrix: MatrixField,
    /// The 1xN distortion coefficients `D`.
    pub distortion_coefficients: MatrixField,
    /// The 3x4 projection matrix `P`.
    pub projection_matrix: MatrixField,
    /// Width of the calibrated images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_width: Option<usize>,
    /// Height of the calibrated images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_height: Option<usize>,
    /// Name of the calibrated camera.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_name: Option<String>,
    /// Name of the distortion model, `plumb_bob` or `rational_polynomial`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distortion_model: Option<String>,
    /// The 3x3 stereo rectification matrix `R`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rectification_matrix: Option<MatrixField>,
}

impl CalibrationDocument {
    /// Parse a document from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, CalibrationFormatError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parse a document from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, CalibrationFormatError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a document from a file.
    ///
    /// Files with a `json` extension are parsed as JSON, anything else as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CalibrationFormatError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    /// Serialize the document as YAML.
    pub fn to_yaml_string(&self) -> Result<String, CalibrationFormatError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
