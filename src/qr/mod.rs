//! QR code rendering for minted relics.
//!
//! Codes are rendered at error-correction level L with 10 px modules and a
//! two-module white border, then written as PNG to a uniquely named temp
//! file. The file lives as long as its [`QrImage`].

use std::io::{BufWriter, Write};
use std::path::Path;

use image::{ImageBuffer, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use tempfile::TempPath;

#[derive(Debug, thiserror::Error)]
pub enum QrError {
    #[error("failed to encode QR code: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("failed to write QR image: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to render QR image: {0}")]
    Image(#[from] image::ImageError),
}

/// Turns a URL into a printable image.
pub trait QrRenderer: Send + Sync {
    fn render(&self, url: &str) -> Result<QrImage, QrError>;
}

/// A rendered QR code on disk. Dropping it deletes the file.
#[derive(Debug)]
pub struct QrImage {
    path: TempPath,
}

impl QrImage {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now, reporting failures.
    pub fn close(self) -> std::io::Result<()> {
        self.path.close()
    }
}

/// PNG renderer backed by the `qrcode` crate.
#[derive(Debug, Clone, Copy)]
pub struct QrEncoder {
    module_px: u32,
    border_modules: u32,
}

impl QrEncoder {
    pub fn new(module_px: u32, border_modules: u32) -> Self {
        Self {
            module_px,
            border_modules,
        }
    }

    /// Render to an in-memory grayscale image.
    pub fn render_image(&self, url: &str) -> Result<ImageBuffer<Luma<u8>, Vec<u8>>, QrError> {
        let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::L)?;
        let modules = code
            .render::<Luma<u8>>()
            .quiet_zone(false)
            .module_dimensions(self.module_px, self.module_px)
            .build();

        let border = self.border_modules * self.module_px;
        let mut canvas = ImageBuffer::from_pixel(
            modules.width() + 2 * border,
            modules.height() + 2 * border,
            Luma([255u8]),
        );
        image::imageops::overlay(&mut canvas, &modules, i64::from(border), i64::from(border));
        Ok(canvas)
    }
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new(10, 2)
    }
}

impl QrRenderer for QrEncoder {
    fn render(&self, url: &str) -> Result<QrImage, QrError> {
        let canvas = self.render_image(url)?;

        let file = tempfile::Builder::new()
            .prefix("relic-qr-")
            .suffix(".png")
            .tempfile()?;
        {
            let mut writer = BufWriter::new(file.as_file());
            canvas.write_to(&mut writer, ImageFormat::Png)?;
            writer.flush()?;
        }

        let image = QrImage {
            path: file.into_temp_path(),
        };
        tracing::debug!(path = %image.path().display(), "QR code rendered");
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://zora.co/collect/zora:0x5FbDB2315678afecb367f032d93F642f64180aa3/7";

    #[test]
    fn test_render_dimensions_include_border() {
        let encoder = QrEncoder::default();
        let image = encoder.render_image(URL).unwrap();
        assert_eq!(image.width(), image.height());

        let modules = image.width() / 10 - 4;
        // Versions are 17 + 4v modules wide.
        assert_eq!((modules - 17) % 4, 0);

        // Border is white, first module of the finder pattern is black.
        assert_eq!(image.get_pixel(0, 0), &Luma([255]));
        assert_eq!(image.get_pixel(19, 19), &Luma([255]));
        assert_eq!(image.get_pixel(20, 20), &Luma([0]));
    }

    #[test]
    fn test_render_writes_png_and_drop_deletes() {
        let encoder = QrEncoder::default();
        let qr = encoder.render(URL).unwrap();
        let path = qr.path().to_path_buf();

        assert!(path.exists());
        assert_eq!(path.extension().unwrap(), "png");
        let decoded = image::open(&path).unwrap();
        assert!(decoded.width() > 0);

        drop(qr);
        assert!(!path.exists());
    }

    #[test]
    fn test_each_render_gets_unique_file() {
        let encoder = QrEncoder::default();
        let a = encoder.render(URL).unwrap();
        let b = encoder.render(URL).unwrap();
        assert_ne!(a.path(), b.path());
        a.close().unwrap();
        b.close().unwrap();
    }

    #[test]
    fn test_oversized_payload_fails() {
        let encoder = QrEncoder::default();
        let huge = "x".repeat(8000);
        assert!(matches!(
            encoder.render(&huge),
            Err(QrError::Encode(_))
        ));
    }
}
