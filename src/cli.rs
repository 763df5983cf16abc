use clap::Parser;
use std::path::PathBuf;

/// Convert PDF pages to images, DOCX documents to PDF, and images between formats
#[derive(Parser, Debug)]
#[command(name = "docshift", version, about)]
pub struct Cli {
    /// Path to the input file (PDF, DOCX, or a raster image)
    #[arg(long)]
    pub input: PathBuf,

    /// Output format: jpg, png, docx, or pdf (case-insensitive)
    #[arg(long = "output_format", visible_alias = "output-format")]
    pub output_format: String,

    /// Output directory. Defaults to the current directory, except for
    /// image-to-image conversions which write next to the input file.
    #[arg(long = "output_dir", visible_alias = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Resolution used when rendering PDF pages to images
    #[arg(long, default_value_t = 200, value_parser = clap::value_parser!(u16).range(36..=1200))]
    pub dpi: u16,

    /// Directory containing the PDFium shared library
    #[arg(long = "pdfium_dir", env = "PDFIUM_DYNAMIC_LIB_PATH")]
    pub pdfium_dir: Option<PathBuf>,

    /// Log each step of the conversion
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
