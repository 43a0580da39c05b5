//! Run configuration

use std::path::{Path, PathBuf};

use crate::doc::INDEX_STEM;

/// Name of the output directory created next to the DTD
pub const OUTPUT_DIR_NAME: &str = "dtd-docs";

/// Everything one run needs to know, built once and passed down
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path of the DTD file
    pub source: PathBuf,
    /// Directory the pages are written to; emptied on every run
    pub output_dir: PathBuf,
    /// Extension of generated page files
    pub page_extension: String,
    /// Extension of built pages, used in cross-page links
    pub link_extension: String,
    /// Stem of the index page
    pub index_stem: String,
}

impl Config {
    /// Configuration for `source` with the output directory next to it
    pub fn for_dtd(source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        let output_dir = source
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(OUTPUT_DIR_NAME);
        Self {
            source,
            output_dir,
            page_extension: "rst".to_string(),
            link_extension: "html".to_string(),
            index_stem: INDEX_STEM.to_string(),
        }
    }

    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// File name of the page with the given stem
    pub fn page_file(&self, stem: &str) -> String {
        format!("{stem}.{}", self.page_extension)
    }
}
