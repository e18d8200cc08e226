//! Image decoding with content-based format detection.
//!
//! Decoding happens at the call boundary, before normalization; a decode
//! failure produces an error-shaped prediction for that image only.

use std::io::Cursor;
use std::path::Path;

use image::DynamicImage;

use crate::error::TaggerError;

/// Decode an image file, detecting the format from content rather than
/// trusting the extension.
pub fn load_image(path: &Path) -> Result<DynamicImage, TaggerError> {
    let bytes = std::fs::read(path).map_err(|e| TaggerError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    load_image_from_bytes(bytes, path)
}

/// Decode an image from an in-memory buffer. `path` is used only for
/// error context and extension-based format fallback.
pub fn load_image_from_bytes(bytes: Vec<u8>, path: &Path) -> Result<DynamicImage, TaggerError> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| TaggerError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot detect image format: {e}"),
        })?;

    reader.decode().map_err(|e| TaggerError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_decode_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.png");
        let img = RgbImage::from_pixel(8, 6, Rgb([200, 100, 50]));
        img.save(&path).unwrap();

        let decoded = load_image(&path).unwrap();
        assert_eq!(decoded.width(), 8);
        assert_eq!(decoded.height(), 6);
    }

    #[test]
    fn test_decode_detects_format_by_content() {
        // A PNG under a .jpg name must still decode as PNG.
        let dir = tempfile::tempdir().unwrap();
        let png_path = dir.path().join("real.png");
        RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]))
            .save(&png_path)
            .unwrap();

        let misnamed = dir.path().join("misnamed.jpg");
        std::fs::copy(&png_path, &misnamed).unwrap();

        assert!(load_image(&misnamed).is_ok());
    }

    #[test]
    fn test_decode_missing_file_reports_path() {
        let err = load_image(Path::new("/nonexistent/image.png")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/image.png"));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"not an image at all").unwrap();
        assert!(load_image(&path).is_err());
    }
}
