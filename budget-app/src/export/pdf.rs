//! PDF export: render the document off-screen, rasterize it at 2× and lay
//! the image out over as many A4 pages as it needs.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use budget_core::BudgetDocument;
use image::ImageReader;

use super::ExportError;
use crate::platform::{DownloadSink, PdfAssembler, Rasterizer};

/// Raster scale handed to the rasterizer.
pub const RENDER_SCALE: u32 = 2;

/// Width of the off-screen container, in CSS pixels.
pub const CONTAINER_WIDTH_PX: u32 = 794;

pub const IMAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 295.0;

/// Where the single rendered image goes on each page.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    pub image_width_mm: f64,
    pub image_height_mm: f64,
    pub page_height_mm: f64,
    /// Vertical image offset on each page, first page first.
    pub page_offsets_mm: Vec<f64>,
}

impl PdfLayout {
    pub fn page_count(&self) -> usize {
        self.page_offsets_mm.len()
    }
}

/// Lays an image of `width_px` × `height_px` out on A4 pages.
///
/// The image is scaled to the page width. The first page shows it at offset
/// 0; every further page shifts it up by one page height while any of it is
/// left to show.
pub fn paginate(
    width_px: u32,
    height_px: u32,
) -> PdfLayout {
    let image_height_mm = f64::from(height_px) * IMAGE_WIDTH_MM / f64::from(width_px.max(1));

    let mut page_offsets_mm = vec![0.0];
    let mut height_left = image_height_mm - PAGE_HEIGHT_MM;
    while height_left >= 0.0 {
        page_offsets_mm.push(height_left - image_height_mm);
        height_left -= PAGE_HEIGHT_MM;
    }

    PdfLayout {
        image_width_mm: IMAGE_WIDTH_MM,
        image_height_mm,
        page_height_mm: PAGE_HEIGHT_MM,
        page_offsets_mm,
    }
}

/// Page the rasterizer renders: the document in a fixed-width white
/// container.
pub fn offscreen_page(document: &BudgetDocument) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <style>body {{ margin: 0; background: #ffffff; }}</style>
</head>
<body>
<div style="width: {CONTAINER_WIDTH_PX}px; background: white;">
{}
</div>
</body>
</html>
"#,
        document.as_str()
    )
}

/// Produces the PDF and saves it as `filename`.
///
/// The staged HTML file is removed whether or not rendering succeeds.
pub async fn export(
    document: &BudgetDocument,
    rasterizer: &dyn Rasterizer,
    assembler: &dyn PdfAssembler,
    downloads: &dyn DownloadSink,
    filename: &str,
) -> Result<PathBuf, ExportError> {
    let staging = tempfile::Builder::new()
        .prefix("orcamento-pdf-")
        .suffix(".html")
        .tempfile()?;
    tokio::fs::write(staging.path(), offscreen_page(document)).await?;

    let result = render(staging.path(), rasterizer, assembler).await;

    if let Err(err) = staging.close() {
        tracing::warn!(%err, "failed to remove staged PDF page");
    }

    let pdf = result?;
    Ok(downloads.save(filename, &pdf).await?)
}

async fn render(
    page: &Path,
    rasterizer: &dyn Rasterizer,
    assembler: &dyn PdfAssembler,
) -> Result<Vec<u8>, ExportError> {
    let png = rasterizer.rasterize(page, RENDER_SCALE).await?;
    let (width, height) = ImageReader::new(Cursor::new(&png))
        .with_guessed_format()?
        .into_dimensions()?;

    let layout = paginate(width, height);
    tracing::debug!(width, height, pages = layout.page_count(), "PDF layout computed");

    Ok(assembler.assemble(&png, &layout).await?)
}
