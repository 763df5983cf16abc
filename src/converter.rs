use crate::cli::Cli;
use crate::docx_reader::DocxData;
use crate::error::ConvertError;
use crate::format::{InputKind, OutputFormat, Route};
use crate::{imaging, raster, text_pdf};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything needed to run one conversion
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub format: OutputFormat,
    pub output_dir: Option<PathBuf>,
    pub dpi: u16,
    pub pdfium_dir: Option<PathBuf>,
}

impl ConversionRequest {
    /// A missing input is reported before a bad format string.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConvertError> {
        if !cli.input.is_file() {
            return Err(ConvertError::InputNotFound(cli.input.clone()));
        }
        let format = cli.output_format.parse()?;
        Ok(Self {
            input: cli.input.clone(),
            format,
            output_dir: cli.output_dir.clone(),
            dpi: cli.dpi,
            pdfium_dir: cli.pdfium_dir.clone(),
        })
    }

    /// Directory for routes that write a fixed file name
    fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or_else(|| Path::new("."))
    }
}

/// What a successful conversion produced
#[derive(Debug)]
pub struct ConversionOutcome {
    pub route: Route,
    pub outputs: Vec<PathBuf>,
}

/// Run the conversion for a request built by [`ConversionRequest::from_cli`],
/// which has already checked that the input exists.
pub fn convert(request: &ConversionRequest) -> Result<ConversionOutcome, ConvertError> {
    let route = select_route(request)?;
    log::info!(
        "Converting {} ({}) to {}",
        request.input.display(),
        route,
        request.format
    );

    let outputs = match route {
        Route::PdfToImage => pdf_to_image(request),
        Route::PdfToDocx => return Err(ConvertError::NotImplemented(route)),
        Route::DocxToPdf => docx_to_pdf(request),
        Route::ImageToImage => image_to_image(request),
    }
    .map_err(|source| ConvertError::Failed { route, source })?;

    Ok(ConversionOutcome { route, outputs })
}

fn select_route(request: &ConversionRequest) -> Result<Route, ConvertError> {
    let kind = InputKind::sniff(&request.input)
        .map_err(ConvertError::InputUnreadable)?
        .ok_or_else(|| ConvertError::UnrecognizedInput(request.input.clone()))?;

    Route::select(kind, request.format).ok_or(ConvertError::UnsupportedConversion {
        input: kind,
        output: request.format,
    })
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    }
    Ok(())
}

fn pdf_to_image(request: &ConversionRequest) -> Result<Vec<PathBuf>> {
    let format = request
        .format
        .image_format()
        .context("Output format is not a raster image")?;
    let output_dir = request.output_dir();
    ensure_dir(output_dir)?;

    let pdfium = raster::bind_pdfium(request.pdfium_dir.as_deref())?;
    raster::render_pages(
        &pdfium,
        &request.input,
        output_dir,
        format,
        request.format.extension(),
        request.dpi,
    )
}

fn docx_to_pdf(request: &ConversionRequest) -> Result<Vec<PathBuf>> {
    let docx = DocxData::open(&request.input)?;
    let paragraphs = docx.paragraphs()?;
    log::debug!("Read {} paragraphs", paragraphs.len());

    let output_dir = request.output_dir();
    ensure_dir(output_dir)?;
    let dest = output_dir.join("output.pdf");

    fs::write(&dest, text_pdf::render_paragraphs(&paragraphs))
        .with_context(|| format!("Failed to write output file: {}", dest.display()))?;
    log::info!("Wrote {}", dest.display());

    Ok(vec![dest])
}

fn image_to_image(request: &ConversionRequest) -> Result<Vec<PathBuf>> {
    let format = request
        .format
        .image_format()
        .context("Output format is not a raster image")?;
    if let Some(ref dir) = request.output_dir {
        ensure_dir(dir)?;
    }

    let dest = imaging::sibling_output_path(
        &request.input,
        request.output_dir.as_deref(),
        request.format.extension(),
    )?;
    imaging::convert_image(&request.input, &dest, format)?;
    log::info!("Wrote {}", dest.display());

    Ok(vec![dest])
}
