//! PDF flyer composition.
//!
//! The flyer is a single A4 portrait page carrying a large QR code of the
//! store URL, a teaser image at the top and the project logo at the bottom.
//! Layout values are given in millimetres from the top-left page corner and
//! converted to PDF's bottom-left origin when placing images.

use image::{DynamicImage, GrayImage, RgbImage};
use printpdf::{ImageTransform, Mm, PdfDocument, PdfLayerReference};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::domain::PlaceId;
use crate::rendering::{QrSettings, RenderError};

const MM_PER_INCH: f32 = 25.4;

/// Position and width of a decorative image on the page.
///
/// The height follows from the image's aspect ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePlacement {
    /// PNG file relative to the assets directory.
    pub file: PathBuf,
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
}

/// Fixed flyer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyerLayout {
    /// Document title, also the base of the download file name.
    pub title: String,
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    /// Edge length of the QR code square.
    pub qr_size_mm: f32,
    /// Reference line (from the top) the QR code is positioned against.
    pub qr_baseline_mm: f32,
    /// Gap between the QR code's bottom edge and the reference line.
    pub qr_bottom_offset_mm: f32,
    pub teaser: ImagePlacement,
    pub logo: ImagePlacement,
    /// Resolution used to map bitmap pixels to page size.
    pub dpi: f32,
}

impl Default for FlyerLayout {
    fn default() -> Self {
        Self {
            title: "WhatsLeft".to_string(),
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            qr_size_mm: 120.0,
            qr_baseline_mm: 279.0,
            qr_bottom_offset_mm: 20.0,
            teaser: ImagePlacement {
                file: PathBuf::from("images/teaser-whatsleft.png"),
                x_mm: 20.0,
                y_mm: 20.0,
                width_mm: 170.0,
            },
            logo: ImagePlacement {
                file: PathBuf::from("images/logo-projekt.png"),
                x_mm: 120.0,
                y_mm: 267.0,
                width_mm: 70.0,
            },
            dpi: 300.0,
        }
    }
}

impl FlyerLayout {
    /// Download file name for the flyer of `id`.
    ///
    /// `"<title> - <id>"` lower-cased with spaces replaced by underscores,
    /// e.g. `whatsleft_-_cafe-berlin-1.pdf`.
    pub fn file_name(&self, id: &PlaceId) -> String {
        let title = format!("{} - {}", self.title, id);
        format!("{}.pdf", title.to_lowercase().replace(' ', "_"))
    }

    /// Horizontal position of the QR code (centred).
    pub fn qr_x_mm(&self) -> f32 {
        (self.page_width_mm - self.qr_size_mm) / 2.0
    }

    /// Distance of the QR code's top edge from the top of the page.
    pub fn qr_y_mm(&self) -> f32 {
        self.qr_baseline_mm - self.qr_bottom_offset_mm - self.qr_size_mm
    }

    /// Checks that all sizes are positive and the QR code fits the page.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if self.page_width_mm <= 0.0 || self.page_height_mm <= 0.0 {
            return Err("page dimensions must be positive".to_string());
        }
        if self.qr_size_mm <= 0.0 || self.qr_size_mm > self.page_width_mm {
            return Err(format!(
                "QR size {}mm must be positive and fit the page width",
                self.qr_size_mm
            ));
        }
        if self.qr_y_mm() < 0.0 {
            return Err("QR code would start above the page".to_string());
        }
        if self.teaser.width_mm <= 0.0 || self.logo.width_mm <= 0.0 {
            return Err("image widths must be positive".to_string());
        }
        if self.dpi <= 0.0 {
            return Err("DPI must be positive".to_string());
        }

        Ok(())
    }

    /// Composes the flyer for `target_url` and returns the PDF bytes.
    ///
    /// Assets are read from `assets_dir`; encoding and PDF serialization run
    /// on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if an asset is missing or not a decodable
    /// image, if the QR code cannot be encoded, or if writing the document
    /// fails.
    pub async fn compose(
        &self,
        assets_dir: &Path,
        qr: QrSettings,
        target_url: String,
    ) -> Result<Vec<u8>, RenderError> {
        let teaser = read_asset(&assets_dir.join(&self.teaser.file)).await?;
        let logo = read_asset(&assets_dir.join(&self.logo.file)).await?;

        let layout = self.clone();
        tokio::task::spawn_blocking(move || {
            let code = qr.render_modules(&target_url)?;
            layout.write_document(code, teaser, logo)
        })
        .await?
    }

    fn write_document(
        &self,
        code: GrayImage,
        teaser: DynamicImage,
        logo: DynamicImage,
    ) -> Result<Vec<u8>, RenderError> {
        let (doc, page, layer) = PdfDocument::new(
            self.title.clone(),
            Mm(self.page_width_mm),
            Mm(self.page_height_mm),
            "Flyer",
        );
        let layer = doc.get_page(page).get_layer(layer);

        // One pixel per module; viewers must not smooth it when scaling up.
        let code = DynamicImage::ImageLuma8(code).to_rgb8();
        self.place(&layer, code, self.qr_x_mm(), self.qr_y_mm(), self.qr_size_mm, false)?;

        self.place(
            &layer,
            flatten_on_white(&teaser),
            self.teaser.x_mm,
            self.teaser.y_mm,
            self.teaser.width_mm,
            true,
        )?;
        self.place(
            &layer,
            flatten_on_white(&logo),
            self.logo.x_mm,
            self.logo.y_mm,
            self.logo.width_mm,
            true,
        )?;

        let mut writer = BufWriter::new(Vec::new());
        doc.save(&mut writer)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let raw = writer
            .into_inner()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;

        compress(&raw)
    }

    /// Places `bitmap` with its top-left corner at (`x_mm`, `y_mm`) from the
    /// page's top-left corner, scaled to `width_mm`. With `interpolate` off,
    /// viewers scale the pixels without smoothing.
    fn place(
        &self,
        layer: &PdfLayerReference,
        bitmap: RgbImage,
        x_mm: f32,
        y_mm: f32,
        width_mm: f32,
        interpolate: bool,
    ) -> Result<(), RenderError> {
        let (width_px, height_px) = bitmap.dimensions();
        if width_px == 0 || height_px == 0 {
            return Err(RenderError::Pdf("cannot place an empty image".to_string()));
        }

        let natural_width_mm = width_px as f32 * MM_PER_INCH / self.dpi;
        let scale = width_mm / natural_width_mm;
        let height_mm = width_mm * height_px as f32 / width_px as f32;

        let buffer = printpdf::image_crate::RgbImage::from_raw(
            width_px,
            height_px,
            bitmap.into_raw(),
        )
        .ok_or_else(|| RenderError::Pdf("image buffer size mismatch".to_string()))?;
        let mut image =
            printpdf::Image::from_dynamic_image(&printpdf::image_crate::DynamicImage::ImageRgb8(
                buffer,
            ));
        image.image.interpolate = interpolate;

        image.add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x_mm)),
                translate_y: Some(Mm(self.page_height_mm - y_mm - height_mm)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(self.dpi),
                ..Default::default()
            },
        );

        Ok(())
    }
}

/// Flate-compresses every uncompressed stream; image data is written raw
/// by `printpdf`.
fn compress(pdf: &[u8]) -> Result<Vec<u8>, RenderError> {
    let mut doc = lopdf::Document::load_mem(pdf).map_err(|e| RenderError::Pdf(e.to_string()))?;
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;

    Ok(out)
}

async fn read_asset(path: &Path) -> Result<DynamicImage, RenderError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| RenderError::Asset {
            path: path.to_path_buf(),
            source,
        })?;

    image::load_from_memory(&bytes).map_err(|source| RenderError::AssetDecode {
        path: path.to_path_buf(),
        source,
    })
}

/// Composites transparent pixels onto a white background.
fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();

    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let blend = |c: u8| {
            let c = u16::from(c) * u16::from(a) + 255 * (255 - u16::from(a));
            (c / 255) as u8
        };
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::test_support::decode_qr;
    use image::{Rgba, RgbaImage};
    use lopdf::Object;
    use tempfile::TempDir;

    const URL: &str = "https://engpass.appspot.com/store/cafe-berlin-1";

    fn write_assets(layout: &FlyerLayout) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("images")).unwrap();

        RgbaImage::from_pixel(340, 120, Rgba([200, 30, 30, 255]))
            .save(dir.path().join(&layout.teaser.file))
            .unwrap();
        RgbaImage::from_pixel(140, 40, Rgba([0, 0, 0, 0]))
            .save(dir.path().join(&layout.logo.file))
            .unwrap();

        dir
    }

    #[test]
    fn test_file_name() {
        let layout = FlyerLayout::default();
        let id = PlaceId::parse("cafe-berlin-1").unwrap();
        assert_eq!(layout.file_name(&id), "whatsleft_-_cafe-berlin-1.pdf");
    }

    #[test]
    fn test_file_name_is_lower_cased() {
        let layout = FlyerLayout::default();
        let id = PlaceId::parse("ChIJ_Abc").unwrap();
        assert_eq!(layout.file_name(&id), "whatsleft_-_chij_abc.pdf");
    }

    #[test]
    fn test_qr_position() {
        let layout = FlyerLayout::default();
        assert_eq!(layout.qr_x_mm(), 45.0);
        assert_eq!(layout.qr_y_mm(), 139.0);
    }

    #[test]
    fn test_validate() {
        assert!(FlyerLayout::default().validate().is_ok());

        let too_wide = FlyerLayout {
            qr_size_mm: 300.0,
            ..FlyerLayout::default()
        };
        assert!(too_wide.validate().is_err());

        let no_dpi = FlyerLayout {
            dpi: 0.0,
            ..FlyerLayout::default()
        };
        assert!(no_dpi.validate().is_err());
    }

    #[test]
    fn test_flatten_on_white() {
        let mut rgba = RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        rgba.put_pixel(1, 0, Rgba([10, 20, 30, 255]));

        let flat = flatten_on_white(&DynamicImage::ImageRgba8(rgba));
        assert_eq!(flat.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(flat.get_pixel(1, 0).0, [10, 20, 30]);
    }

    #[tokio::test]
    async fn test_compose_single_page_pdf() {
        let layout = FlyerLayout::default();
        let assets = write_assets(&layout);

        let pdf = layout
            .compose(
                assets.path(),
                QrSettings::default(),
                "https://engpass.appspot.com/store/cafe-berlin-1".to_string(),
            )
            .await
            .unwrap();

        assert!(pdf.starts_with(b"%PDF-"));

        let doc = lopdf::Document::load_mem(&pdf).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[tokio::test]
    async fn test_compose_is_compact() {
        let layout = FlyerLayout::default();
        let assets = write_assets(&layout);

        let pdf = layout
            .compose(assets.path(), QrSettings::default(), URL.to_string())
            .await
            .unwrap();

        assert!(pdf.len() < 500_000, "flyer is {} bytes", pdf.len());
    }

    #[tokio::test]
    async fn test_compose_embeds_decodable_qr() {
        let layout = FlyerLayout::default();
        let assets = write_assets(&layout);
        let modules = qrcode::QrCode::with_error_correction_level(URL, qrcode::EcLevel::H)
            .unwrap()
            .width();

        let pdf = layout
            .compose(assets.path(), QrSettings::default(), URL.to_string())
            .await
            .unwrap();

        let doc = lopdf::Document::load_mem(&pdf).unwrap();
        let qr_stream = doc
            .objects
            .values()
            .filter_map(|object| match object {
                Object::Stream(stream) => Some(stream),
                _ => None,
            })
            .find(|stream| {
                let subtype = stream.dict.get(b"Subtype").and_then(Object::as_name).ok();
                let width = stream.dict.get(b"Width").and_then(Object::as_i64).ok();
                subtype == Some(b"Image".as_slice()) && width == Some(modules as i64)
            })
            .expect("QR image in PDF");

        assert!(!matches!(
            qr_stream.dict.get(b"Interpolate"),
            Ok(Object::Boolean(true))
        ));

        let rgb = if qr_stream.dict.has(b"Filter") {
            qr_stream.decompressed_content().unwrap()
        } else {
            qr_stream.content.clone()
        };
        assert_eq!(rgb.len(), modules * modules * 3);

        let side = modules as u32;
        let red = rgb.iter().step_by(3).copied().collect();
        let gray = GrayImage::from_raw(side, side, red).unwrap();
        assert_eq!(decode_qr(&gray, 8), URL);
    }

    #[tokio::test]
    async fn test_compose_missing_asset() {
        let layout = FlyerLayout::default();
        let empty = tempfile::tempdir().unwrap();

        let err = layout
            .compose(
                empty.path(),
                QrSettings::default(),
                "https://engpass.appspot.com/store/x".to_string(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RenderError::Asset { .. }));
        assert!(err.to_string().contains("teaser-whatsleft.png"));
    }

    #[tokio::test]
    async fn test_compose_undecodable_asset() {
        let layout = FlyerLayout::default();
        let assets = write_assets(&layout);
        std::fs::write(assets.path().join(&layout.logo.file), b"not a png").unwrap();

        let err = layout
            .compose(
                assets.path(),
                QrSettings::default(),
                "https://engpass.appspot.com/store/x".to_string(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RenderError::AssetDecode { .. }));
    }
}
