use crate::format::{InputKind, OutputFormat, Route};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Cannot read input: {0:#}")]
    InputUnreadable(#[source] anyhow::Error),

    #[error("Input type of {} not recognised", .0.display())]
    UnrecognizedInput(PathBuf),

    #[error("Unsupported output format '{0}' (expected jpg, png, docx or pdf)")]
    UnsupportedFormat(String),

    #[error("Cannot convert {input} input to {output}")]
    UnsupportedConversion {
        input: InputKind,
        output: OutputFormat,
    },

    #[error("{0} conversion is not implemented yet")]
    NotImplemented(Route),

    #[error("Failed to convert {route}: {source:#}")]
    Failed {
        route: Route,
        #[source]
        source: anyhow::Error,
    },
}

impl ConvertError {
    /// Usage mistakes exit with 2, everything that went wrong while
    /// converting exits with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            ConvertError::InputNotFound(_)
            | ConvertError::UnrecognizedInput(_)
            | ConvertError::UnsupportedFormat(_)
            | ConvertError::UnsupportedConversion { .. } => 2,
            ConvertError::InputUnreadable(_)
            | ConvertError::NotImplemented(_)
            | ConvertError::Failed { .. } => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_errors_exit_with_two() {
        assert_eq!(ConvertError::InputNotFound(PathBuf::from("x")).exit_code(), 2);
        assert_eq!(ConvertError::UnsupportedFormat("xyz".into()).exit_code(), 2);
        let err = ConvertError::UnsupportedConversion {
            input: InputKind::Docx,
            output: OutputFormat::Png,
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn conversion_errors_exit_with_one() {
        assert_eq!(ConvertError::NotImplemented(Route::PdfToDocx).exit_code(), 1);
        let err = ConvertError::Failed {
            route: Route::ImageToImage,
            source: anyhow::anyhow!("bad header"),
        };
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "Failed to convert image to image: bad header");
    }

    #[test]
    fn not_implemented_message_names_the_route() {
        assert_eq!(
            ConvertError::NotImplemented(Route::PdfToDocx).to_string(),
            "PDF to DOCX conversion is not implemented yet"
        );
    }
}
