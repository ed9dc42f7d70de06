//! CLI entry point for docx-header-clone

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use docx_header_clone::{copy_headers, InjectOptions};

/// Copy header parts from one DOCX document into another.
///
/// The destination file is overwritten in place once all headers have been
/// injected.
#[derive(Debug, Parser)]
#[command(name = "docx-header-clone", version, about)]
struct Cli {
    /// Document to copy headers from
    #[arg(default_value = "source.docx")]
    source: PathBuf,

    /// Document to copy headers into (overwritten in place)
    #[arg(default_value = "target.docx")]
    destination: PathBuf,

    /// Header distance (w:pgMar/@w:header) written to the destination, in twips
    #[arg(long, default_value_t = 0)]
    header_distance: u32,

    /// Top margin (w:pgMar/@w:top) written to the destination, in twips
    #[arg(long, default_value_t = 1134)]
    top_margin: u32,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let options = InjectOptions {
        header_distance: cli.header_distance,
        top_margin: cli.top_margin,
    };

    match copy_headers(&cli.source, &cli.destination, &options) {
        Ok(count) => {
            println!(
                "Copied {} header(s) from {} into {}",
                count,
                cli.source.display(),
                cli.destination.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
