//! PDF export: the HTML document rasterized onto a single US-letter page.
//!
//! Content taller than one page is clipped at the page boundary. There is no pagination.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::{Rgb, RgbImage, RgbaImage};
use printpdf::{
    ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument, Px,
};
use tracing::{debug, info};

use crate::export::color::resolve_style_colors;
use crate::export::html::to_html;
use crate::export::raster::{MountHandle, Rasterizer, Viewport, CSS_DPI};
use crate::export::{DocumentExporter, ExportArtifact, ExportFormat, ExporterError};
use crate::models::resume::ResumeRecord;
use crate::render::Theme;

/// Device pixels per CSS pixel in the captured bitmap.
pub const CAPTURE_SCALE: u32 = 2;

pub const PAGE_VIEWPORT: Viewport = Viewport::LETTER;

/// Injected ahead of `</head>` so the captured container fills the page edge to edge.
const OFFSCREEN_OVERRIDES: &str = "<style>\
html, body { background: #ffffff; padding: 0; margin: 0; color: #000000; }\
.resume-container { width: 816px; max-width: none; margin: 0; box-shadow: none; border-radius: 0; }\
</style>\n";

pub struct PdfExporter {
    rasterizer: Arc<dyn Rasterizer>,
    settle: Duration,
}

impl PdfExporter {
    pub fn new(rasterizer: Arc<dyn Rasterizer>, settle: Duration) -> Self {
        Self { rasterizer, settle }
    }

    /// Produces the PDF bytes. The offscreen surface is unmounted before this returns,
    /// whether or not capture succeeded.
    pub async fn to_pdf(&self, record: &ResumeRecord, theme: Theme) -> Result<Vec<u8>, ExporterError> {
        let html = offscreen_document(&resolve_style_colors(&to_html(record, theme)));

        let handle = self.rasterizer.mount(&html, PAGE_VIEWPORT).await?;
        let captured = self.capture_settled(&handle).await;
        self.rasterizer.unmount(handle).await;
        let bitmap = captured?;

        let title = format!(
            "{} Resume - {} Template",
            record.personal_info.full_name.trim(),
            theme.display_name()
        );
        let bytes = tokio::task::spawn_blocking(move || {
            let page = compose_page(&bitmap, PAGE_VIEWPORT, CAPTURE_SCALE);
            build_pdf(&title, &page)
        })
        .await??;

        info!(theme = %theme, size = bytes.len(), "PDF assembled");
        Ok(bytes)
    }

    async fn capture_settled(&self, handle: &MountHandle) -> Result<RgbaImage, ExporterError> {
        tokio::time::sleep(self.settle).await;
        let bitmap = self.rasterizer.capture(handle, CAPTURE_SCALE).await?;
        debug!(
            width = bitmap.width(),
            height = bitmap.height(),
            "Offscreen capture complete"
        );
        Ok(bitmap)
    }
}

#[async_trait]
impl DocumentExporter for PdfExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    async fn export(
        &self,
        record: &ResumeRecord,
        theme: Theme,
    ) -> Result<ExportArtifact, ExporterError> {
        let bytes = self.to_pdf(record, theme).await?;
        Ok(ExportArtifact::new(record, theme, ExportFormat::Pdf, bytes))
    }
}

/// Adds the offscreen print overrides to a full HTML document.
pub fn offscreen_document(html: &str) -> String {
    match html.find("</head>") {
        Some(at) => {
            let mut out = String::with_capacity(html.len() + OFFSCREEN_OVERRIDES.len());
            out.push_str(&html[..at]);
            out.push_str(OFFSCREEN_OVERRIDES);
            out.push_str(&html[at..]);
            out
        }
        None => format!("{OFFSCREEN_OVERRIDES}{html}"),
    }
}

/// Fits a captured bitmap to exactly one page at `scale`.
///
/// The bitmap is anchored top-left and alpha-blended over white. Pixels beyond the page
/// are dropped; a short capture is padded with white.
pub fn compose_page(bitmap: &RgbaImage, viewport: Viewport, scale: u32) -> RgbImage {
    let (width, height) = viewport.scaled(scale);
    let mut page = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));

    let copy_w = bitmap.width().min(width);
    let copy_h = bitmap.height().min(height);
    for y in 0..copy_h {
        for x in 0..copy_w {
            let [r, g, b, a] = bitmap.get_pixel(x, y).0;
            page.put_pixel(x, y, Rgb([over_white(r, a), over_white(g, a), over_white(b, a)]));
        }
    }
    page
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let c = u32::from(channel);
    let a = u32::from(alpha);
    ((c * a + 255 * (255 - a)) / 255) as u8
}

/// Page size in millimetres for a viewport measured in CSS pixels.
pub fn page_size_mm(viewport: Viewport) -> (Mm, Mm) {
    let to_mm = |px: u32| Mm(px as f32 / CSS_DPI * 25.4);
    (to_mm(viewport.width), to_mm(viewport.height))
}

/// Wraps one page bitmap in a single-page PDF sized to `PAGE_VIEWPORT`.
pub fn build_pdf(title: &str, page: &RgbImage) -> Result<Vec<u8>, ExporterError> {
    let (width, height) = page_size_mm(PAGE_VIEWPORT);
    let (doc, page_index, layer_index) = PdfDocument::new(title, width, height, "Page 1");
    let layer = doc.get_page(page_index).get_layer(layer_index);

    let image = Image::from(ImageXObject {
        width: Px(page.width() as usize),
        height: Px(page.height() as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: page.as_raw().clone(),
        image_filter: None,
        smask: None,
        clipping_bbox: None,
    });

    // At this DPI the scaled bitmap covers the page exactly.
    let dpi = CSS_DPI * (page.width() as f32 / PAGE_VIEWPORT.width as f32);
    image.add_to_layer(
        layer,
        ImageTransform {
            dpi: Some(dpi),
            ..ImageTransform::default()
        },
    );

    doc.save_to_bytes()
        .map_err(|e| ExporterError::Pdf(e.to_string()))
}
