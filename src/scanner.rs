//! Discovery of addon directories under the repository root.
//!
//! An addon is any immediate subdirectory holding an `addon.xml` file. Both
//! the archive and index stages call [`scan_addons`] on their own, so each
//! sees the tree as it is when the stage starts.

use crate::error::{GeneratorError, Result};
use crate::layout::RepoLayout;
use crate::manifest::MANIFEST_FILE;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use std::fs;

/// An addon directory found under the repository root.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddonDir {
    name: String,
    path: Utf8PathBuf,
}

impl AddonDir {
    /// Directory name, used as the archive filename stem.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path of the directory.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Path of the directory's `addon.xml`.
    #[must_use]
    pub fn manifest_path(&self) -> Utf8PathBuf {
        self.path.join(MANIFEST_FILE)
    }

    /// Path of a file directly inside the directory.
    #[must_use]
    pub fn file(&self, name: &str) -> Utf8PathBuf {
        self.path.join(name)
    }
}

/// List the addon directories under the layout's root, sorted by name.
///
/// Reserved directories (see [`RepoLayout::is_reserved`]) and directories
/// without a manifest are skipped.
///
/// # Errors
///
/// Returns [`GeneratorError::Scan`] if the root cannot be listed.
pub fn scan_addons(layout: &RepoLayout) -> Result<Vec<AddonDir>> {
    let root = layout.root();
    let entries = fs::read_dir(root).map_err(|source| scan_error(root, source))?;

    let mut addons = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| scan_error(root, source))?;
        let Ok(name) = entry.file_name().into_string() else {
            warn!("Skipping non UTF-8 entry {:?} in {root}", entry.file_name());
            continue;
        };
        let path = root.join(&name);
        if !path.is_dir() || layout.is_reserved(&name) {
            continue;
        }
        if !path.join(MANIFEST_FILE).is_file() {
            debug!("Skipping {name}: no {MANIFEST_FILE}");
            continue;
        }
        addons.push(AddonDir { name, path });
    }

    addons.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(addons)
}

fn scan_error(root: &Utf8Path, source: std::io::Error) -> GeneratorError {
    GeneratorError::Scan {
        path: root.to_owned(),
        source,
    }
}
