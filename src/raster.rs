use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, RgbaImage};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};

use crate::imaging;

/// PDF user space is defined at 72 units per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Load PDFium from `library_dir` if given, otherwise (or if that fails)
/// from the system library search path.
pub fn bind_pdfium(library_dir: Option<&Path>) -> Result<Pdfium> {
    if let Some(dir) = library_dir {
        let path = Pdfium::pdfium_platform_library_name_at_path(dir);
        match Pdfium::bind_to_library(&path) {
            Ok(bindings) => return Ok(Pdfium::new(bindings)),
            Err(e) => log::warn!(
                "Could not load PDFium from {}: {}; trying the system library",
                path.display(),
                single_line(&e.to_string())
            ),
        }
    }

    let bindings = Pdfium::bind_to_system_library()
        .map_err(pdfium_error)
        .context("Failed to load the PDFium library")?;
    Ok(Pdfium::new(bindings))
}

/// PDFium errors can wrap multi-line loader output; keep diagnostics on one line.
fn pdfium_error(e: PdfiumError) -> anyhow::Error {
    anyhow::anyhow!(single_line(&e.to_string()))
}

fn single_line(message: &str) -> String {
    message.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render every page of `input` to `<output_dir>/output_<n>.<extension>`,
/// numbering pages from 1. Returns the written paths in page order.
pub fn render_pages(
    pdfium: &Pdfium,
    input: &Path,
    output_dir: &Path,
    format: ImageFormat,
    extension: &str,
    dpi: u16,
) -> Result<Vec<PathBuf>> {
    let document = pdfium
        .load_pdf_from_file(input, None)
        .map_err(pdfium_error)
        .with_context(|| format!("Failed to open PDF: {}", input.display()))?;

    let config = PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / POINTS_PER_INCH);
    let mut written = Vec::new();

    for (index, page) in document.pages().iter().enumerate() {
        let number = index + 1;
        let bitmap = page
            .render_with_config(&config)
            .map_err(pdfium_error)
            .with_context(|| format!("Failed to render page {}", number))?;

        let (width, height) = (bitmap.width() as u32, bitmap.height() as u32);
        let pixels = RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes())
            .with_context(|| format!("Page {} rendered to a truncated bitmap", number))?;

        let dest = output_dir.join(format!("output_{}.{}", number, extension));
        imaging::save_image(DynamicImage::ImageRgba8(pixels), &dest, format)?;
        log::info!("Rendered page {} ({}x{}) to {}", number, width, height, dest.display());

        written.push(dest);
    }

    Ok(written)
}
