//! Output directory handling

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::info;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Remove any previous output and recreate `dir` empty
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => info!("Existing directory \"{}\" deleted.", dir.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::io(dir, e)),
    }
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    info!("Directory \"{}\" created.", dir.display());
    Ok(())
}

/// Write one page into `dir`
///
/// The content goes to a temporary file in the same directory first and is
/// renamed into place, so a page is either absent or complete.
pub fn write_page(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(file_name);
    let mut file = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    file.write_all(content.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| Error::io(&path, e))?;
    file.persist(&path).map_err(|e| Error::io(&path, e.error))?;
    Ok(path)
}
