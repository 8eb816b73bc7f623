//! Net template loading and edge preprocessing.

use std::path::Path;

use image::{GrayImage, ImageReader};
use imageproc::edges::canny;
use thiserror::Error;

/// Canny hysteresis thresholds applied once to the template.
const TEMPLATE_CANNY_LOW: f32 = 100.0;
const TEMPLATE_CANNY_HIGH: f32 = 200.0;

/// Failure to produce a usable net template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template image: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode template image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Load the reference net image and reduce it to its edge map, ready for
/// [`crate::tracker::NetLocalizer`].
pub fn load_net_template(path: impl AsRef<Path>) -> Result<GrayImage, TemplateError> {
    let decoded = ImageReader::open(path)?.decode()?;
    Ok(canny(
        &decoded.to_luma8(),
        TEMPLATE_CANNY_LOW,
        TEMPLATE_CANNY_HIGH,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_an_io_error() {
        let result = load_net_template("/nonexistent/net.png");
        assert!(matches!(result, Err(TemplateError::Io(_))));
    }
}
