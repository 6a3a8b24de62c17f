//! Pipeline stages for image and PDF text extraction.
//!
//! Each submodule implements one step. The OCR engine and the PDF
//! rasteriser sit behind traits so either can be swapped or faked without
//! touching the other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ [render] ──▶ preprocess ──▶ ocr ──▶ postprocess
//! (ext)     (PDF only)   (Otsu)        (tesseract) (clean_text)
//! ```
//!
//! 1. [`input`]: route a path by extension, check the file exists
//! 2. [`render`]: rasterise PDF pages on the blocking pool
//! 3. [`preprocess`]: decode, grayscale and binarise a raster
//! 4. [`ocr`]: hand the binary image to the OCR engine
//! 5. [`postprocess`]: trim lines and drop blank ones

pub mod input;
pub mod ocr;
pub mod postprocess;
pub mod preprocess;
pub mod render;
