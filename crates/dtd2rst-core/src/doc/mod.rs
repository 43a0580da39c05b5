//! reStructuredText page generation
//!
//! Every declared element gets one page stub; an index page ties them
//! together with a Sphinx toctree. Pages carry placeholders where a human
//! writes the actual documentation.

mod naming;
mod rst;
mod writer;

pub use naming::{page_stem, AttributeAnchors, PageNames, INDEX_STEM};
pub use rst::{IndexPage, TagPage, SECTION_UNDERLINER, TITLE_UNDERLINER};
pub use writer::{prepare_output_dir, write_page};

use std::path::PathBuf;

use log::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::model::DocumentModel;

/// Files produced by one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub output_dir: PathBuf,
    pub index: PathBuf,
    /// Element pages in declaration order
    pub pages: Vec<PathBuf>,
}

/// Write the index and one page per element into the configured directory
///
/// The directory is emptied first. A failed write stops the run; pages
/// written before it are left in place.
pub fn write_docs(model: &DocumentModel, config: &Config) -> Result<Summary> {
    let names = PageNames::new(model, &config.index_stem);
    warn_undeclared_children(model, &names);

    prepare_output_dir(&config.output_dir)?;

    let index = write_page(
        &config.output_dir,
        &config.page_file(names.index_stem()),
        &IndexPage::new(model, &names).to_string(),
    )?;
    info!("Index page \"{}\" written.", index.display());

    let mut pages = Vec::with_capacity(model.len());
    for element in model.elements() {
        let stem = names.link_target(&element.name);
        let page = TagPage::new(model, &names, element, &config.link_extension);
        let path = write_page(&config.output_dir, &config.page_file(&stem), &page.to_string())?;
        info!("Tag page \"{}\" written.", path.display());
        pages.push(path);
    }

    Ok(Summary {
        output_dir: config.output_dir.clone(),
        index,
        pages,
    })
}

/// Content links to undeclared elements point at pages that never exist
fn warn_undeclared_children(model: &DocumentModel, names: &PageNames<'_>) {
    for element in model.elements() {
        for child in element.children() {
            if names.get(child).is_none() {
                warn!(
                    "<{}> lists undeclared element <{}> as content; its link will be broken",
                    element.name, child
                );
            }
        }
    }
}
