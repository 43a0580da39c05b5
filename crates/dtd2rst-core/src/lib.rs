//! dtd2rst Core - reStructuredText page stubs from a DTD
//!
//! This crate provides the core functionality:
//! - Lexer: Tokenization of DTD text
//! - Parser: Markup declarations from the token stream
//! - Model: Elements and attributes of a whole DTD
//! - Doc: Page rendering and output
//!
//! # Example
//!
//! ```no_run
//! use dtd2rst_core::Config;
//!
//! let summary = dtd2rst_core::run(&Config::for_dtd("schemas/novel.dtd"))?;
//! println!("{} pages in {}", summary.pages.len(), summary.output_dir.display());
//! # Ok::<(), dtd2rst_core::Error>(())
//! ```

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run configuration
pub mod config;

/// Page generation and output
pub mod doc;

/// Library error type
pub mod error;

/// Lexer module - tokenization of DTD text
pub mod lexer;

/// Document model - elements, content models and attributes
pub mod model;

/// Parser module - converts tokens into declarations
pub mod parser;

pub use config::Config;
pub use doc::{write_docs, Summary};
pub use error::{Error, Result};
pub use model::DocumentModel;
pub use parser::{ParseError, Parser};

use log::info;

/// Read and parse the configured DTD
pub fn load_model(config: &Config) -> Result<DocumentModel> {
    let source = std::fs::read_to_string(&config.source).map_err(|e| Error::io(&config.source, e))?;
    let model = DocumentModel::parse(&source)?;
    info!("DTD \"{}\" successfully read.", config.source.display());
    Ok(model)
}

/// Generate the pages for the configured DTD
///
/// Nothing is written unless the whole DTD parses.
pub fn run(config: &Config) -> Result<Summary> {
    let model = load_model(config)?;
    write_docs(&model, config)
}
