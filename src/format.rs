use anyhow::{Context, Result};
use image::ImageFormat;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::error::ConvertError;

/// How far into a file to look for a `%PDF-` marker. PDF readers tolerate
/// leading garbage before the header, up to this offset.
const PDF_HEADER_WINDOW: u64 = 1024;

const PDF_MAGIC: &[u8] = b"%PDF-";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Target encoding requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpg,
    Png,
    Docx,
    Pdf,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Docx => "docx",
            OutputFormat::Pdf => "pdf",
        }
    }

    /// The raster codec for image outputs
    pub fn image_format(self) -> Option<ImageFormat> {
        match self {
            OutputFormat::Jpg => Some(ImageFormat::Jpeg),
            OutputFormat::Png => Some(ImageFormat::Png),
            OutputFormat::Docx | OutputFormat::Pdf => None,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(OutputFormat::Jpg),
            "png" => Ok(OutputFormat::Png),
            "docx" => Ok(OutputFormat::Docx),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(ConvertError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// What the input file actually contains, independent of its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Pdf,
    Docx,
    Image(ImageFormat),
}

impl InputKind {
    /// Detect the kind of `path` from its leading bytes, falling back to the
    /// file extension when the content is not recognised.
    pub fn sniff(path: &Path) -> Result<Option<InputKind>> {
        let mut header = Vec::new();
        File::open(path)
            .with_context(|| format!("Failed to open input: {}", path.display()))?
            .take(PDF_HEADER_WINDOW)
            .read_to_end(&mut header)
            .with_context(|| format!("Failed to read input: {}", path.display()))?;

        if let Some(kind) = Self::from_magic(&header) {
            log::debug!("Detected {} from file content", kind);
            return Ok(Some(kind));
        }

        let kind = Self::from_extension(path);
        if let Some(kind) = kind {
            log::debug!("Falling back to extension, assuming {}", kind);
        }
        Ok(kind)
    }

    fn from_magic(header: &[u8]) -> Option<InputKind> {
        if header.starts_with(ZIP_MAGIC) {
            // DOCX is the only zip container we accept
            return Some(InputKind::Docx);
        }
        // Image signatures sit at offset 0; the PDF marker may drift
        if let Ok(format) = image::guess_format(header) {
            return Some(InputKind::Image(format));
        }
        if header.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC) {
            return Some(InputKind::Pdf);
        }
        None
    }

    fn from_extension(path: &Path) -> Option<InputKind> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "pdf" => Some(InputKind::Pdf),
            "docx" => Some(InputKind::Docx),
            other => ImageFormat::from_extension(other).map(InputKind::Image),
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Pdf => f.write_str("PDF"),
            InputKind::Docx => f.write_str("DOCX"),
            InputKind::Image(format) => write!(f, "{:?} image", format),
        }
    }
}

/// One of the four conversion routines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    PdfToImage,
    PdfToDocx,
    DocxToPdf,
    ImageToImage,
}

impl Route {
    pub fn select(input: InputKind, output: OutputFormat) -> Option<Route> {
        match (input, output) {
            (InputKind::Pdf, OutputFormat::Jpg | OutputFormat::Png) => Some(Route::PdfToImage),
            (InputKind::Pdf, OutputFormat::Docx) => Some(Route::PdfToDocx),
            (InputKind::Docx, OutputFormat::Pdf) => Some(Route::DocxToPdf),
            (InputKind::Image(_), OutputFormat::Jpg | OutputFormat::Png) => {
                Some(Route::ImageToImage)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Route::PdfToImage => "PDF to image",
            Route::PdfToDocx => "PDF to DOCX",
            Route::DocxToPdf => "DOCX to PDF",
            Route::ImageToImage => "image to image",
        })
    }
}
