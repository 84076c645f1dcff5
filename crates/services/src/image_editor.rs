//! Square crop tool for the registration profile picture.

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use tracing::debug;

use crate::error::ImageEditorError;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];
/// Longest side of the on-screen crop canvas.
pub const PREVIEW_MAX_SIDE: u32 = 400;
pub const OUTPUT_SIDE: u32 = 400;
pub const JPEG_QUALITY: u8 = 90;

/// Selection in preview coordinates. Width and height carry the drag
/// direction and may be negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    /// Top-left corner and side length with the drag direction removed.
    #[must_use]
    pub fn normalized(self) -> (f64, f64, f64) {
        let side = self.width.abs().min(self.height.abs());
        let x = if self.width < 0.0 { self.x - side } else { self.x };
        let y = if self.height < 0.0 { self.y - side } else { self.y };
        (x, y, side)
    }
}

/// Fit `width`x`height` inside the preview box, never upscaling. Each side is
/// at least one pixel.
#[must_use]
pub fn fit_preview(width: u32, height: u32) -> (u32, u32) {
    if width <= PREVIEW_MAX_SIDE && height <= PREVIEW_MAX_SIDE {
        return (width, height);
    }
    let ratio = (f64::from(PREVIEW_MAX_SIDE) / f64::from(width))
        .min(f64::from(PREVIEW_MAX_SIDE) / f64::from(height));
    (
        floor_to_u32(f64::from(width) * ratio).max(1),
        floor_to_u32(f64::from(height) * ratio).max(1),
    )
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn floor_to_u32(value: f64) -> u32 {
    value.floor().clamp(0.0, f64::from(u32::MAX)) as u32
}

#[derive(Default)]
pub struct ImageEditor {
    original: Option<DynamicImage>,
    preview: (u32, u32),
    cropping: bool,
    dragging: bool,
    selection: Option<CropRect>,
    cropped: Option<String>,
}

impl ImageEditor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a picked file. Returns the preview size.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedType` or `TooLarge` before decoding, or `Image` if
    /// the bytes are not a readable image.
    pub fn load(&mut self, bytes: &[u8], mime: &str) -> Result<(u32, u32), ImageEditorError> {
        let mime = mime.trim().to_ascii_lowercase();
        if !ALLOWED_IMAGE_TYPES.contains(&mime.as_str()) {
            return Err(ImageEditorError::UnsupportedType);
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ImageEditorError::TooLarge);
        }
        let format = if mime == "image/png" {
            ImageFormat::Png
        } else {
            ImageFormat::Jpeg
        };
        let image = image::load_from_memory_with_format(bytes, format)?;
        let (width, height) = image.dimensions();

        self.reset();
        self.preview = fit_preview(width, height);
        self.original = Some(image);
        debug!(width, height, preview = ?self.preview, "image loaded");
        Ok(self.preview)
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        self.original.is_some()
    }

    #[must_use]
    pub fn preview_size(&self) -> Option<(u32, u32)> {
        self.original.as_ref().map(|_| self.preview)
    }

    #[must_use]
    pub fn is_cropping(&self) -> bool {
        self.cropping
    }

    #[must_use]
    pub fn selection(&self) -> Option<CropRect> {
        self.selection
    }

    /// The last saved crop as a `data:` URL.
    #[must_use]
    pub fn cropped_image(&self) -> Option<&str> {
        self.cropped.as_deref()
    }

    /// Enter crop mode with a centered square covering 80% of the short side.
    ///
    /// # Errors
    ///
    /// Returns `NoImage` when nothing is loaded.
    pub fn start_crop(&mut self) -> Result<CropRect, ImageEditorError> {
        if self.original.is_none() {
            return Err(ImageEditorError::NoImage);
        }
        let (width, height) = (f64::from(self.preview.0), f64::from(self.preview.1));
        let side = width.min(height) * 0.8;
        let rect = CropRect {
            x: (width - side) / 2.0,
            y: (height - side) / 2.0,
            width: side,
            height: side,
        };
        self.cropping = true;
        self.selection = Some(rect);
        Ok(rect)
    }

    pub fn begin_drag(&mut self, x: f64, y: f64) {
        if !self.cropping {
            return;
        }
        self.dragging = true;
        self.selection = Some(CropRect {
            x,
            y,
            width: 0.0,
            height: 0.0,
        });
    }

    /// Extend the selection to the pointer, keeping it square.
    pub fn drag_to(&mut self, x: f64, y: f64) {
        if !self.cropping || !self.dragging {
            return;
        }
        let Some(rect) = self.selection.as_mut() else {
            return;
        };
        let dx = x - rect.x;
        let dy = y - rect.y;
        let side = dx.abs().min(dy.abs());
        rect.width = if dx < 0.0 { -side } else { side };
        rect.height = if dy < 0.0 { -side } else { side };
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Crop the original at full resolution and encode it as a JPEG data URL.
    ///
    /// # Errors
    ///
    /// Returns `NotCropping`, `NoImage`, `EmptySelection`, or an encoding error.
    pub fn save(&mut self) -> Result<String, ImageEditorError> {
        if !self.cropping {
            return Err(ImageEditorError::NotCropping);
        }
        let original = self.original.as_ref().ok_or(ImageEditorError::NoImage)?;
        let rect = self.selection.ok_or(ImageEditorError::EmptySelection)?;

        let (x, y, side) = rect.normalized();
        if side <= 0.0 {
            return Err(ImageEditorError::EmptySelection);
        }
        let (orig_w, orig_h) = original.dimensions();
        let scale_x = f64::from(orig_w) / f64::from(self.preview.0.max(1));
        let scale_y = f64::from(orig_h) / f64::from(self.preview.1.max(1));

        let src_x = floor_to_u32(x.max(0.0) * scale_x).min(orig_w.saturating_sub(1));
        let src_y = floor_to_u32(y.max(0.0) * scale_y).min(orig_h.saturating_sub(1));
        let src_w = floor_to_u32(side * scale_x).clamp(1, orig_w - src_x);
        let src_h = floor_to_u32(side * scale_y).clamp(1, orig_h - src_y);

        let square = original
            .crop_imm(src_x, src_y, src_w, src_h)
            .resize_exact(OUTPUT_SIDE, OUTPUT_SIDE, FilterType::Lanczos3)
            .to_rgb8();

        let mut jpeg = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).encode_image(&square)?;
        let url = format!("data:image/jpeg;base64,{}", B64.encode(jpeg.into_inner()));

        self.cropping = false;
        self.dragging = false;
        self.cropped = Some(url.clone());
        debug!(src_x, src_y, src_w, src_h, "image cropped");
        Ok(url)
    }

    /// Leave crop mode, keeping the image and any earlier crop.
    pub fn cancel(&mut self) {
        self.cropping = false;
        self.dragging = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([67, 97, 238]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn rejects_wrong_type_and_size() {
        let mut editor = ImageEditor::new();
        assert!(matches!(
            editor.load(b"gif", "image/gif"),
            Err(ImageEditorError::UnsupportedType)
        ));
        let huge = vec![0u8; MAX_IMAGE_BYTES + 1];
        assert!(matches!(
            editor.load(&huge, "image/png"),
            Err(ImageEditorError::TooLarge)
        ));
        assert!(!editor.has_image());
    }

    #[test]
    fn preview_is_fitted_with_floor() {
        assert_eq!(fit_preview(300, 200), (300, 200));
        assert_eq!(fit_preview(1600, 800), (400, 200));
        assert_eq!(fit_preview(500, 2000), (100, 400));
        assert_eq!(fit_preview(4000, 1), (400, 1));
        assert_eq!(fit_preview(1, 4000), (1, 400));
    }

    #[test]
    fn sliver_image_can_still_be_cropped() {
        let mut editor = ImageEditor::new();
        assert_eq!(editor.load(&png(4000, 1), "image/png").unwrap(), (400, 1));
        editor.start_crop().unwrap();

        let url = editor.save().unwrap();
        let bytes = B64.decode(&url["data:image/jpeg;base64,".len()..]).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (OUTPUT_SIDE, OUTPUT_SIDE));
    }

    #[test]
    fn initial_selection_is_centered_square() {
        let mut editor = ImageEditor::new();
        assert_eq!(editor.load(&png(800, 400), "image/png").unwrap(), (400, 200));
        let rect = editor.start_crop().unwrap();
        assert!((rect.width - 160.0).abs() < 1e-9);
        assert!((rect.x - 120.0).abs() < 1e-9);
        assert!((rect.y - 20.0).abs() < 1e-9);
    }

    #[test]
    fn drag_keeps_square_and_normalizes_negative() {
        let mut editor = ImageEditor::new();
        editor.load(&png(400, 400), "image/png").unwrap();
        editor.start_crop().unwrap();
        editor.begin_drag(200.0, 200.0);
        editor.drag_to(100.0, 150.0);
        editor.end_drag();

        let rect = editor.selection().unwrap();
        assert!((rect.width + 50.0).abs() < 1e-9);
        assert!((rect.height + 50.0).abs() < 1e-9);
        assert_eq!(rect.normalized(), (150.0, 150.0, 50.0));
    }

    #[test]
    fn save_produces_jpeg_data_url() {
        let mut editor = ImageEditor::new();
        editor.load(&png(800, 600), "image/png").unwrap();
        assert!(matches!(editor.save(), Err(ImageEditorError::NotCropping)));

        editor.start_crop().unwrap();
        let url = editor.save().unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
        assert!(!editor.is_cropping());
        assert_eq!(editor.cropped_image(), Some(url.as_str()));

        let bytes = B64.decode(&url["data:image/jpeg;base64,".len()..]).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (OUTPUT_SIDE, OUTPUT_SIDE));
    }

    #[test]
    fn zero_drag_is_empty_selection() {
        let mut editor = ImageEditor::new();
        editor.load(&png(100, 100), "image/png").unwrap();
        editor.start_crop().unwrap();
        editor.begin_drag(10.0, 10.0);
        assert!(matches!(editor.save(), Err(ImageEditorError::EmptySelection)));

        editor.reset();
        assert!(!editor.has_image());
    }
}
