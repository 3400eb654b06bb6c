//! ZIP archives of XML documents.

use std::io::{Cursor, Read};

use tracing::{debug, warn};
use transparency_core::{Result, TransparencyError};
use zip::ZipArchive;

fn archive_error(e: impl std::fmt::Display) -> TransparencyError {
    TransparencyError::Archive(e.to_string())
}

/// Reads the XML entries of an archive as `(name, text)` pairs, in archive
/// order. Directories and non-XML entries are skipped.
///
/// # Errors
///
/// Returns [`TransparencyError::Archive`] if the archive or an entry cannot
/// be read.
pub fn read_archive(bytes: &[u8]) -> Result<Vec<(String, String)>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(archive_error)?;
    debug!(entries = archive.len(), "reading archive");

    let mut documents = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(archive_error)?;
        let name = entry.name().to_string();
        if entry.is_dir() {
            continue;
        }
        if !name.to_ascii_lowercase().ends_with(".xml") {
            warn!(%name, "skipping non-XML archive entry");
            continue;
        }
        let mut text = String::new();
        entry.read_to_string(&mut text).map_err(archive_error)?;
        documents.push((name, text));
    }
    Ok(documents)
}

/// Applies `parse` to every XML document in an archive.
///
/// # Errors
///
/// Returns the first archive or parse error.
pub fn parse_archive<T>(bytes: &[u8], mut parse: impl FnMut(&str) -> Result<T>) -> Result<Vec<T>> {
    read_archive(bytes)?
        .iter()
        .map(|(_, text)| parse(text))
        .collect()
}
