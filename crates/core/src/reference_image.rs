//! Reference-image inspection for shotlist item uploads.
//!
//! Only the header is decoded: the format is sniffed from the magic bytes and
//! the dimensions are read without decoding pixel data. Files are stored as
//! uploaded; no resizing happens here.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};

use crate::error::CoreError;

/// Default upload size limit (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Content types accepted for reference images.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// What we learned about an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceImageInfo {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl ReferenceImageInfo {
    /// File extension used when storing the upload.
    pub fn extension(&self) -> &'static str {
        format_details(self.format).map_or("bin", |(ext, _)| ext)
    }

    pub fn content_type(&self) -> &'static str {
        format_details(self.format).map_or("application/octet-stream", |(_, mime)| mime)
    }
}

/// Map a supported format to its `(extension, content type)` pair.
fn format_details(format: ImageFormat) -> Option<(&'static str, &'static str)> {
    match format {
        ImageFormat::Jpeg => Some(("jpg", "image/jpeg")),
        ImageFormat::Png => Some(("png", "image/png")),
        ImageFormat::Gif => Some(("gif", "image/gif")),
        ImageFormat::WebP => Some(("webp", "image/webp")),
        _ => None,
    }
}

/// Validate an uploaded reference image.
///
/// Checks, in order: non-empty body, size limit, declared content type (when
/// present) is allowed, sniffed format is allowed and agrees with the
/// declared type, and the header yields non-zero dimensions.
pub fn inspect_reference_image(
    declared_content_type: Option<&str>,
    data: &[u8],
    max_bytes: usize,
) -> Result<ReferenceImageInfo, CoreError> {
    if data.is_empty() {
        return Err(CoreError::Validation("Uploaded file is empty".into()));
    }
    if data.len() > max_bytes {
        return Err(CoreError::Validation(format!(
            "Uploaded file exceeds the maximum size of {max_bytes} bytes"
        )));
    }

    let declared = declared_content_type.map(|ct| ct.trim().to_ascii_lowercase());
    if let Some(ct) = declared.as_deref() {
        if !ALLOWED_CONTENT_TYPES.contains(&ct) {
            return Err(CoreError::Validation(format!(
                "Unsupported content type '{ct}'. Supported: {}",
                ALLOWED_CONTENT_TYPES.join(", ")
            )));
        }
    }

    let format = image::guess_format(data)
        .map_err(|_| CoreError::Validation("File is not a recognised image".into()))?;
    let (_, detected_mime) = format_details(format).ok_or_else(|| {
        CoreError::Validation(format!("Unsupported image format {format:?}"))
    })?;

    if let Some(ct) = declared.as_deref() {
        if ct != detected_mime {
            return Err(CoreError::Validation(format!(
                "Declared content type '{ct}' does not match file contents ({detected_mime})"
            )));
        }
    }

    let (width, height) = ImageReader::with_format(Cursor::new(data), format)
        .into_dimensions()
        .map_err(|e| CoreError::Validation(format!("Unreadable image header: {e}")))?;
    if width == 0 || height == 0 {
        return Err(CoreError::Validation("Image has zero dimensions".into()));
    }

    Ok(ReferenceImageInfo {
        format,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::new(width, height);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png)
            .expect("png encoding should succeed");
        out.into_inner()
    }

    #[test]
    fn accepts_png_and_reads_dimensions() {
        let data = png_bytes(4, 3);
        let info = inspect_reference_image(Some("image/png"), &data, DEFAULT_MAX_UPLOAD_BYTES)
            .expect("valid png");
        assert_eq!(info.format, ImageFormat::Png);
        assert_eq!((info.width, info.height), (4, 3));
        assert_eq!(info.extension(), "png");
        assert_eq!(info.content_type(), "image/png");
    }

    #[test]
    fn content_type_is_optional() {
        let data = png_bytes(1, 1);
        assert!(inspect_reference_image(None, &data, DEFAULT_MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn rejects_empty_upload() {
        assert_matches!(
            inspect_reference_image(Some("image/png"), &[], DEFAULT_MAX_UPLOAD_BYTES),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn rejects_oversized_upload() {
        let data = png_bytes(2, 2);
        let result = inspect_reference_image(Some("image/png"), &data, data.len() - 1);
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("maximum size"));
    }

    #[test]
    fn rejects_disallowed_content_type() {
        let data = png_bytes(2, 2);
        let result = inspect_reference_image(Some("image/tiff"), &data, DEFAULT_MAX_UPLOAD_BYTES);
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("Unsupported content type"));
    }

    #[test]
    fn rejects_mismatched_content_type() {
        let data = png_bytes(2, 2);
        let result = inspect_reference_image(Some("image/jpeg"), &data, DEFAULT_MAX_UPLOAD_BYTES);
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("does not match"));
    }

    #[test]
    fn rejects_non_image_bytes() {
        let result = inspect_reference_image(None, b"just some text", DEFAULT_MAX_UPLOAD_BYTES);
        assert_matches!(result, Err(CoreError::Validation(_)));
    }
}
