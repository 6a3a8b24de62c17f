//! Image preprocessing: decode → grayscale → Otsu binarisation.
//!
//! Tesseract reads high-contrast two-level input most reliably. The global
//! threshold is chosen per image with Otsu's method, so no tuning knob is
//! exposed. No deskew, denoise or contrast stretching is applied.

use crate::error::OcrError;
use image::{DynamicImage, GrayImage};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use std::path::Path;
use tracing::debug;

/// A binarised (pure black/white) image ready for OCR.
#[derive(Debug, Clone)]
pub struct PreprocessedImage {
    /// Single-channel pixels, every value either 0 or 255.
    pub image: GrayImage,
    /// The Otsu level used; pixels above it became white.
    pub threshold: u8,
}

impl PreprocessedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Decode raw bytes into a pixel buffer. `path` only labels the error.
pub fn decode(bytes: &[u8], path: &Path) -> Result<DynamicImage, OcrError> {
    image::load_from_memory(bytes).map_err(|e| OcrError::UnreadableImage {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Grayscale then binarise an already-decoded image.
pub fn binarize(img: &DynamicImage) -> PreprocessedImage {
    let gray = img.to_luma8();
    let level = otsu_level(&gray);
    let image = threshold(&gray, level, ThresholdType::Binary);
    debug!(
        "Binarised {}x{} image at Otsu level {}",
        image.width(),
        image.height(),
        level
    );
    PreprocessedImage {
        image,
        threshold: level,
    }
}

/// Decode and binarise raw image bytes.
pub fn preprocess_bytes(bytes: &[u8], path: &Path) -> Result<PreprocessedImage, OcrError> {
    let img = decode(bytes, path)?;
    Ok(binarize(&img))
}

/// Read, decode and binarise the image at `path`.
pub fn preprocess_file(path: &Path) -> Result<PreprocessedImage, OcrError> {
    let bytes = std::fs::read(path).map_err(|e| OcrError::UnreadableImage {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    preprocess_bytes(&bytes, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Luma, Rgb, RgbImage};
    use std::io::Cursor;

    fn split_image(dark: u8, light: u8) -> DynamicImage {
        let gray = GrayImage::from_fn(40, 20, |x, _| {
            if x < 20 {
                Luma([dark])
            } else {
                Luma([light])
            }
        });
        DynamicImage::ImageLuma8(gray)
    }

    #[test]
    fn binarize_produces_two_levels_with_same_dimensions() {
        let out = binarize(&split_image(30, 220));
        assert_eq!((out.width(), out.height()), (40, 20));
        assert!(out.image.pixels().all(|p| p[0] == 0 || p[0] == 255));
        assert_eq!(out.image.get_pixel(0, 0)[0], 0);
        assert_eq!(out.image.get_pixel(39, 19)[0], 255);
        assert!(out.threshold >= 30 && out.threshold < 220);
    }

    #[test]
    fn colour_input_is_converted_to_grayscale_first() {
        let rgb = RgbImage::from_fn(10, 10, |x, _| {
            if x < 5 {
                Rgb([120, 0, 0])
            } else {
                Rgb([250, 250, 250])
            }
        });
        let out = binarize(&DynamicImage::ImageRgb8(rgb));
        assert_eq!(out.image.get_pixel(0, 5)[0], 0);
        assert_eq!(out.image.get_pixel(9, 5)[0], 255);
    }

    #[test]
    fn preprocess_bytes_decodes_png() {
        let mut buf = Vec::new();
        split_image(10, 240)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        let out = preprocess_bytes(&buf, Path::new("mem.png")).unwrap();
        assert_eq!(out.width(), 40);
    }

    #[test]
    fn corrupt_bytes_are_unreadable() {
        let err = preprocess_bytes(b"definitely not an image", Path::new("bad.png")).unwrap_err();
        match err {
            OcrError::UnreadableImage { path, .. } => assert_eq!(path, Path::new("bad.png")),
            other => panic!("expected UnreadableImage, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_unreadable() {
        let err = preprocess_file(Path::new("/no/such/scan.png")).unwrap_err();
        assert!(matches!(err, OcrError::UnreadableImage { .. }));
    }
}
