/// An error type for loading a calibration document.
///
/// Every variant is fatal: a calibration is a static precondition of the session.
#[derive(thiserror::Error, Debug)]
pub enum CalibrationFormatError {
    /// Error reading the calibration file.
    #[error("Failed to read the calibration file. {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a YAML document, including missing required fields.
    #[error("Failed to parse the YAML calibration. {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Error parsing a JSON document, including missing required fields.
    #[error("Failed to parse the JSON calibration. {0}")]
    Json(#[from] serde_json::Error),

    /// The declared rows and cols do not describe the data length.
    #[error("Field `{field}` declares {rows}x{cols} but holds {len} values")]
    DataLengthMismatch {
        /// Name of the offending field.
        field: &'static str,
        /// Declared number of rows.
        rows: usize,
        /// Declared number of columns.
        cols: usize,
        /// Actual number of values.
        len: usize,
    },

    /// The matrix is consistent but not of the shape the field requires.
    #[error("Field `{field}` must be {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    UnexpectedShape {
        /// Name of the offending field.
        field: &'static str,
        /// Required number of rows.
        expected_rows: usize,
        /// Required number of columns.
        expected_cols: usize,
        /// Declared number of rows.
        rows: usize,
        /// Declared number of columns.
        cols: usize,
    },

    /// The number of distortion coefficients is not supported.
    #[error("Unsupported number of distortion coefficients: {0} (expected 4, 5 or 8)")]
    UnsupportedDistortionLength(usize),

    /// The declared distortion model is not supported.
    #[error("Unknown distortion model: {0}")]
    UnknownDistortionModel(String),

    /// The number of coefficients does not fit the declared distortion model.
    #[error("Distortion model {model} does not take {len} coefficients")]
    DistortionModelMismatch {
        /// The declared model.
        model: String,
        /// The number of coefficients in the document.
        len: usize,
    },

    /// A value of the field is NaN or infinite.
    #[error("Field `{0}` contains non-finite values")]
    NonFinite(&'static str),

    /// The camera matrix has a zero focal length.
    #[error("Camera matrix has a degenerate focal length (fx: {0}, fy: {1})")]
    DegenerateFocalLength(f64, f64),
}
