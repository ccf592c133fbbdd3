//! Zip archive creation for a single addon directory.
//!
//! Entries are stored under the addon directory name (`plugin.a/addon.xml`,
//! `plugin.a/resources/lib/x.py`) because Kodi extracts an addon zip into its
//! addons folder and expects exactly one top-level directory.

use super::packaging_error::PackagingError;
use crate::config::Excludes;
use crate::scanner::AddonDir;
use std::fs::File;
use std::io::{self, Seek, Write};
use std::path::Path;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Write a zip of `addon` to `writer`, skipping excluded extensions.
///
/// Files are added in sorted walk order with Deflate compression. Returns the
/// entry names written.
///
/// # Errors
///
/// Returns [`PackagingError`] if the directory cannot be walked, a file
/// cannot be read, or the zip cannot be encoded.
pub fn create_archive<W>(
    addon: &AddonDir,
    excludes: &Excludes,
    writer: W,
) -> Result<(W, Vec<String>), PackagingError>
where
    W: Write + Seek,
{
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(writer);
    let mut entries = Vec::new();

    for entry in WalkDir::new(addon.path()).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if excludes.is_excluded(path) {
            log::debug!("Excluding {}", path.display());
            continue;
        }

        let name = entry_name(addon, path)?;
        zip.start_file(name.as_str(), options)?;
        let mut source = File::open(path)?;
        io::copy(&mut source, &mut zip)?;
        entries.push(name);
    }

    let writer = zip.finish()?;
    Ok((writer, entries))
}

/// Archive entry name: `<directory>/<relative path>` with `/` separators.
fn entry_name(addon: &AddonDir, path: &Path) -> Result<String, PackagingError> {
    let relative = path
        .strip_prefix(addon.path())
        .map_err(|_| PackagingError::OutsideAddon(path.to_path_buf()))?;

    let mut name = addon.name().to_owned();
    for component in relative.components() {
        let part = component
            .as_os_str()
            .to_str()
            .ok_or_else(|| PackagingError::NonUtf8Entry(path.to_path_buf()))?;
        name.push('/');
        name.push_str(part);
    }
    Ok(name)
}

#[cfg(test)]
#[path = "packaging_tests.rs"]
mod tests;
