//! dtd2rst CLI - reStructuredText page stubs for the elements of a DTD

use anyhow::{Context, Result};
use clap::Parser;
use dtd2rst_core::{Config, Summary};
use env_logger::Env;
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dtd2rst")]
#[command(version = dtd2rst_core::VERSION)]
#[command(
    about = "Generate reStructuredText page stubs from a DTD",
    long_about = "Generate reStructuredText page stubs from a DTD.\n\n\
                  Writes one page per element plus an index page into a \
                  'dtd-docs' directory next to the DTD. The directory is \
                  emptied on every run."
)]
struct Cli {
    /// Path to the DTD file
    dtd: PathBuf,
}

fn run(cli: &Cli) -> Result<Summary> {
    let config = Config::for_dtd(&cli.dtd);
    let model = dtd2rst_core::load_model(&config)
        .with_context(|| format!("Failed to read DTD '{}'", cli.dtd.display()))?;
    dtd2rst_core::write_docs(&model, &config).with_context(|| {
        format!(
            "Failed to write pages to '{}'",
            config.output_dir.display()
        )
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let summary = run(&cli)?;
    info!(
        "{} tag pages written to \"{}\".",
        summary.pages.len(),
        summary.output_dir.display()
    );
    Ok(())
}
