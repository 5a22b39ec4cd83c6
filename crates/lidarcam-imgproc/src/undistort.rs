use crate::calibration::distortion::{generate_correction_map_polynomial, PolynomialDistortion};
use crate::calibration::CameraIntrinsic;
use crate::interpolation::{remap, InterpolationMode};
use lidarcam_image::{Image, ImageDtype, ImageError, ImageSize};

/// Check that an image can be undistorted.
///
/// # Errors
///
/// * [`ImageError::EmptyImage`] if the image has no pixels.
/// * [`ImageError::UnsupportedChannelCount`] if the image does not have 1, 3 or 4 channels.
pub fn validate_image<T, const C: usize>(image: &Image<T, C>) -> Result<(), ImageError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ImageError::EmptyImage(image.width(), image.height()));
    }

    if !matches!(C, 1 | 3 | 4) {
        return Err(ImageError::UnsupportedChannelCount(C));
    }

    Ok(())
}

/// Precomputed source coordinates for undistorting images of one size.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionMap {
    map_x: Image<f32, 1>,
    map_y: Image<f32, 1>,
}

impl CorrectionMap {
    /// Compute the map for images of the given size.
    ///
    /// # Arguments
    ///
    /// * `intrinsic` - The intrinsics of the distorted camera.
    /// * `new_intrinsic` - The intrinsics of the undistorted output.
    /// * `distortion` - The lens distortion.
    /// * `size` - The image size.
    pub fn new(
        intrinsic: &CameraIntrinsic,
        new_intrinsic: &CameraIntrinsic,
        distortion: &PolynomialDistortion,
        size: ImageSize,
    ) -> Result<Self, ImageError> {
        if size.width == 0 || size.height == 0 {
            return Err(ImageError::EmptyImage(size.width, size.height));
        }

        let (map_x, map_y) =
            generate_correction_map_polynomial(intrinsic, new_intrinsic, distortion, &size)?;
        Ok(Self { map_x, map_y })
    }

    /// The image size this map applies to.
    pub fn size(&self) -> ImageSize {
        self.map_x.size()
    }

    /// The x source coordinate of every output pixel.
    pub fn map_x(&self) -> &Image<f32, 1> {
        &self.map_x
    }

    /// The y source coordinate of every output pixel.
    pub fn map_y(&self) -> &Image<f32, 1> {
        &self.map_y
    }

    /// Undistort an image with this map.
    ///
    /// # Errors
    ///
    /// Fails if the image is invalid per [`validate_image`] or its size differs from the map.
    pub fn apply<T: ImageDtype, const C: usize>(
        &self,
        src: &Image<T, C>,
        interpolation: InterpolationMode,
    ) -> Result<Image<T, C>, ImageError> {
        validate_image(src)?;

        if src.size() != self.size() {
            return Err(ImageError::InvalidImageSize(
                self.size().height,
                self.size().width,
                src.rows(),
                src.cols(),
            ));
        }

        let mut dst = Image::from_size_val(src.size(), T::default())?;
        remap(src, &mut dst, &self.map_x, &self.map_y, interpolation)?;

        Ok(dst)
    }
}

/// Remove the lens distortion of an image.
///
/// The same intrinsics are used for the distorted input and the undistorted output, so the
/// output has the size and principal point of the input. Pixels that sample outside the
/// input are zero.
///
/// # Arguments
///
/// * `src` - The distorted image.
/// * `intrinsic` - The camera intrinsics.
/// * `distortion` - The lens distortion.
/// * `interpolation` - The interpolation mode to use.
///
/// # Errors
///
/// Fails if the image is empty or does not have 1, 3 or 4 channels.
pub fn undistort_image<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    intrinsic: &CameraIntrinsic,
    distortion: &PolynomialDistortion,
    interpolation: InterpolationMode,
) -> Result<Image<T, C>, ImageError> {
    validate_image(src)?;
    let map = CorrectionMap::new(intrinsic, intrinsic, distortion, src.size())?;
    map.apply(src, interpolation)
}
