use anyhow::Context;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Writes `contents` to a temporary file beside `path` and renames it into
/// place, so readers never see a half-written output.
pub fn write_atomically(path: &Path, contents: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;
    temp.write_all(contents)
        .with_context(|| format!("writing {}", path.display()))?;
    temp.flush()?;
    temp.persist(path)
        .with_context(|| format!("replacing {}", path.display()))?;
    log::debug!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Builds a zip archive in memory from `(name, contents)` entries, in order.
/// Entry timestamps are fixed so identical inputs give identical bytes.
pub fn pack_archive(entries: &[(String, Vec<u8>)]) -> anyhow::Result<Vec<u8>> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());
    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        archive
            .start_file(name.as_str(), options)
            .with_context(|| format!("adding {} to archive", name))?;
        archive
            .write_all(contents)
            .with_context(|| format!("adding {} to archive", name))?;
    }
    let cursor = archive.finish().context("finishing archive")?;
    Ok(cursor.into_inner())
}
