use std::path::Path;

use lidarcam_image::ImageSize;

use crate::document::CalibrationDocument;
use crate::error::CalibrationFormatError;

/// Largest supported number of distortion coefficients.
pub const MAX_DISTORTION_COEFFS: usize = 8;

/// Distortion models accepted in the `distortion_model` field, with their coefficient counts.
pub const SUPPORTED_DISTORTION_MODELS: [(&str, &[usize]); 2] =
    [("plumb_bob", &[4, 5]), ("rational_polynomial", &[8])];

/// Distortion coefficients in OpenCV order `k1, k2, p1, p2[, k3[, k4, k5, k6]]`.
///
/// Stored in a fixed-size buffer; coefficients beyond [`DistortionCoefficients::len`] are zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistortionCoefficients {
    values: [f64; MAX_DISTORTION_COEFFS],
    len: usize,
}

impl DistortionCoefficients {
    /// Create the coefficients from a sequence of 4, 5 or 8 values.
    pub fn new(coeffs: &[f64]) -> Result<Self, CalibrationFormatError> {
        if !matches!(coeffs.len(), 4 | 5 | 8) {
            return Err(CalibrationFormatError::UnsupportedDistortionLength(
                coeffs.len(),
            ));
        }

        if coeffs.iter().any(|v| !v.is_finite()) {
            return Err(CalibrationFormatError::NonFinite("distortion_coefficients"));
        }

        let mut values = [0.0; MAX_DISTORTION_COEFFS];
        values[..coeffs.len()].copy_from_slice(coeffs);

        Ok(Self {
            values,
            len: coeffs.len(),
        })
    }

    /// Five zero coefficients, a lens without distortion.
    pub fn zeros() -> Self {
        Self {
            values: [0.0; MAX_DISTORTION_COEFFS],
            len: 5,
        }
    }

    /// The coefficients as they were declared.
    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.len]
    }

    /// Number of declared coefficients.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false, at least four coefficients are declared.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether every coefficient is zero.
    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0)
    }

    /// First radial coefficient.
    pub fn k1(&self) -> f64 {
        self.values[0]
    }

    /// Second radial coefficient.
    pub fn k2(&self) -> f64 {
        self.values[1]
    }

    /// First tangential coefficient.
    pub fn p1(&self) -> f64 {
        self.values[2]
    }

    /// Second tangential coefficient.
    pub fn p2(&self) -> f64 {
        self.values[3]
    }

    /// Third radial coefficient.
    pub fn k3(&self) -> f64 {
        self.values[4]
    }

    /// First denominator coefficient of the rational model.
    pub fn k4(&self) -> f64 {
        self.values[5]
    }

    /// Second denominator coefficient of the rational model.
    pub fn k5(&self) -> f64 {
        self.values[6]
    }

    /// Third denominator coefficient of the rational model.
    pub fn k6(&self) -> f64 {
        self.values[7]
    }
}

/// The validated calibration of one camera.
///
/// Immutable after construction. Built once per session and owned by the projector.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationState {
    camera_matrix: [[f64; 3]; 3],
    distortion_coefficients: DistortionCoefficients,
    projection_matrix: [[f64; 4]; 3],
    rectification_matrix: Option<[[f64; 3]; 3]>,
    image_size: Option<ImageSize>,
    camera_name: Option<String>,
}

impl CalibrationState {
    /// Create a calibration from its three matrices.
    ///
    /// # Errors
    ///
    /// Fails if a value is not finite or if a focal length of the camera matrix is zero.
    pub fn new(
        camera_matrix: [[f64; 3]; 3],
        distortion_coefficients: DistortionCoefficients,
        projection_matrix: [[f64; 4]; 3],
    ) -> Result<Self, CalibrationFormatError> {
        if camera_matrix.iter().flatten().any(|v| !v.is_finite()) {
            return Err(CalibrationFormatError::NonFinite("camera_matrix"));
        }

        if projection_matrix.iter().flatten().any(|v| !v.is_finite()) {
            return Err(CalibrationFormatError::NonFinite("projection_matrix"));
        }

        let (fx, fy) = (camera_matrix[0][0], camera_matrix[1][1]);
        if fx == 0.0 || fy == 0.0 {
            return Err(CalibrationFormatError::DegenerateFocalLength(fx, fy));
        }

        Ok(Self {
            camera_matrix,
            distortion_coefficients,
            projection_matrix,
            rectification_matrix: None,
            image_size: None,
            camera_name: None,
        })
    }

    /// Validate a parsed document and build the calibration from it.
    ///
    /// No state is returned unless every field passes validation.
    pub fn from_document(doc: &CalibrationDocument) -> Result<Self, CalibrationFormatError> {
        // check every declared shape before using any value
        doc.camera_matrix.validate("camera_matrix")?;
        doc.distortion_coefficients
            .validate("distortion_coefficients")?;
        doc.projection_matrix.validate("projection_matrix")?;

        let model_lengths = match &doc.distortion_model {
            Some(model) => Some(
                SUPPORTED_DISTORTION_MODELS
                    .iter()
                    .find(|(name, _)| *name == model.as_str())
                    .map(|(_, lengths)| *lengths)
                    .ok_or_else(|| CalibrationFormatError::UnknownDistortionModel(model.clone()))?,
            ),
            None => None,
        };

        let camera_matrix = doc.camera_matrix.to_matrix::<3, 3>("camera_matrix")?;
        let distortion_coefficients = DistortionCoefficients::new(
            doc.distortion_coefficients
                .to_vector("distortion_coefficients")?,
        )?;

        if let (Some(model), Some(lengths)) = (&doc.distortion_model, model_lengths) {
            if !lengths.contains(&distortion_coefficients.len()) {
                return Err(CalibrationFormatError::DistortionModelMismatch {
                    model: model.clone(),
                    len: distortion_coefficients.len(),
                });
            }
        }
        let projection_matrix = doc
            .projection_matrix
            .to_matrix::<3, 4>("projection_matrix")?;

        let rectification_matrix = doc
            .rectification_matrix
            .as_ref()
            .map(|r| r.to_matrix::<3, 3>("rectification_matrix"))
            .transpose()?;

        let image_size = match (doc.image_width, doc.image_height) {
            (Some(width), Some(height)) => Some(ImageSize { width, height }),
            _ => None,
        };

        let mut state = Self::new(camera_matrix, distortion_coefficients, projection_matrix)?;
        state.rectification_matrix = rectification_matrix;
        state.image_size = image_size;
        state.camera_name = doc.camera_name.clone();

        Ok(state)
    }

    /// Parse and validate a YAML calibration.
    pub fn from_yaml_str(text: &str) -> Result<Self, CalibrationFormatError> {
        Self::from_document(&CalibrationDocument::from_yaml_str(text)?)
    }

    /// Parse and validate a JSON calibration.
    pub fn from_json_str(text: &str) -> Result<Self, CalibrationFormatError> {
        Self::from_document(&CalibrationDocument::from_json_str(text)?)
    }

    /// The 3x3 intrinsic camera matrix `K`.
    pub fn camera_matrix(&self) -> &[[f64; 3]; 3] {
        &self.camera_matrix
    }

    /// The lens distortion coefficients `D`.
    pub fn distortion_coefficients(&self) -> &DistortionCoefficients {
        &self.distortion_coefficients
    }

    /// The 3x4 projection matrix `P`.
    pub fn projection_matrix(&self) -> &[[f64; 4]; 3] {
        &self.projection_matrix
    }

    /// The stereo rectification matrix, if the document declared one.
    ///
    /// Kept for reference only: undistortion maps the camera matrix onto itself and projection
    /// uses the projection matrix, so neither applies this rotation.
    pub fn rectification_matrix(&self) -> Option<&[[f64; 3]; 3]> {
        self.rectification_matrix.as_ref()
    }

    /// The size of the calibrated images, if the document declared it.
    pub fn image_size(&self) -> Option<ImageSize> {
        self.image_size
    }

    /// The camera name, if the document declared it.
    pub fn camera_name(&self) -> Option<&str> {
        self.camera_name.as_deref()
    }
}

impl TryFrom<&CalibrationDocument> for CalibrationState {
    type Error = CalibrationFormatError;

    fn try_from(doc: &CalibrationDocument) -> Result<Self, Self::Error> {
        Self::from_document(doc)
    }
}

/// Load and validate a calibration document from disk.
///
/// Files with a `json` extension are parsed as JSON, anything else as YAML.
///
/// # Errors
///
/// Fails with [`CalibrationFormatError`] if the file cannot be read or parsed, if one of
/// `camera_matrix`, `distortion_coefficients` or `projection_matrix` is missing, or if a
/// field's `rows * cols` differs from the length of its `data`.
pub fn load(path: impl AsRef<Path>) -> Result<CalibrationState, CalibrationFormatError> {
    let path = path.as_ref();
    let doc = CalibrationDocument::from_path(path)?;
    let state = CalibrationState::from_document(&doc)?;

    log::debug!(
        "loaded calibration {} from {} ({} distortion coefficients)",
        state.camera_name().unwrap_or("<unnamed>"),
        path.display(),
        state.distortion_coefficients().len(),
    );

    Ok(state)
}
