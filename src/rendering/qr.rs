//! QR code rendering to a fixed-size bitmap and PNG.

use image::{GrayImage, ImageFormat, Luma, imageops};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

use crate::rendering::RenderError;

/// QR rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrSettings {
    /// Edge length of the square output bitmap in pixels.
    pub size_px: u32,
    /// Error-correction level used for every code.
    pub ec_level: EcLevel,
}

impl Default for QrSettings {
    fn default() -> Self {
        Self {
            size_px: 1024,
            ec_level: EcLevel::H,
        }
    }
}

impl QrSettings {
    /// Encodes `data` into a square grayscale bitmap of `size_px` pixels.
    ///
    /// The symbol is drawn without quiet zone using the largest integer
    /// module size that fits, then centred on a white canvas.
    ///
    /// # Errors
    ///
    /// - [`RenderError::Qr`] if `data` does not fit into any QR version
    /// - [`RenderError::QrTooLarge`] if the symbol has more modules than
    ///   the canvas has pixels
    pub fn render(&self, data: &str) -> Result<GrayImage, RenderError> {
        let code = QrCode::with_error_correction_level(data, self.ec_level)?;

        let modules = u32::try_from(code.width()).map_err(|_| RenderError::QrTooLarge {
            modules: code.width(),
            size_px: self.size_px,
        })?;
        let module_px = self.size_px / modules.max(1);
        if module_px == 0 {
            return Err(RenderError::QrTooLarge {
                modules: code.width(),
                size_px: self.size_px,
            });
        }

        let symbol = draw(&code, module_px);

        let offset = i64::from((self.size_px - symbol.width()) / 2);
        let mut canvas = GrayImage::from_pixel(self.size_px, self.size_px, Luma([255]));
        imageops::overlay(&mut canvas, &symbol, offset, offset);

        Ok(canvas)
    }

    /// Encodes `data` at one pixel per module, without quiet zone.
    ///
    /// Meant for embedding where the consumer scales the bitmap itself
    /// (the PDF flyer), so the output stays a few kilobytes.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Qr`] if `data` does not fit into any QR version.
    pub fn render_modules(&self, data: &str) -> Result<GrayImage, RenderError> {
        let code = QrCode::with_error_correction_level(data, self.ec_level)?;
        Ok(draw(&code, 1))
    }

    /// Encodes `data` and serializes the bitmap as PNG.
    ///
    /// # Errors
    ///
    /// See [`QrSettings::render`]; PNG encoding failures map to
    /// [`RenderError::Image`].
    pub fn render_png(&self, data: &str) -> Result<Vec<u8>, RenderError> {
        let bitmap = self.render(data)?;

        let mut png = Vec::new();
        bitmap.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        Ok(png)
    }
}

fn draw(code: &QrCode, module_px: u32) -> GrayImage {
    code.render::<Luma<u8>>()
        .quiet_zone(false)
        .module_dimensions(module_px, module_px)
        .build()
}
