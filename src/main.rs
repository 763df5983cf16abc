mod cli;
mod converter;
mod docx_reader;
mod error;
mod format;
mod imaging;
mod raster;
mod text_pdf;

use clap::Parser;
use converter::ConversionRequest;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = ConversionRequest::from_cli(&cli).and_then(|request| converter::convert(&request));

    match result {
        Ok(outcome) => {
            let count = outcome.outputs.len();
            eprintln!(
                "Converted {} ({}) into {} file{}",
                cli.input.display(),
                outcome.route,
                count,
                if count == 1 { "" } else { "s" }
            );
            for path in &outcome.outputs {
                eprintln!("  {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::debug!("{:?}", err);
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
