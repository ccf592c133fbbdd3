//! Addon archiving stage.
//!
//! For every addon directory this stage writes
//! `<output>/<id>/<directory>-<version>.zip` and copies the manifest, icon
//! and fan art next to it:
//!
//! - [`naming`] - Archive filename convention
//! - [`packaging`] - Zip creation with extension filtering
//! - [`packaging_error`] - Packaging error types
//! - [`rotation`] - Timestamped preservation of superseded archives

pub mod naming;
pub mod packaging;
pub mod packaging_error;
pub mod rotation;

use self::naming::ArchiveName;
use self::packaging::create_archive;
use self::packaging_error::PackagingError;
use self::rotation::{backup_suffix, preserve_existing};
use crate::config::Excludes;
use crate::error::{GeneratorError, Result};
use crate::layout::{RepoLayout, create_dir};
use crate::manifest::{AddonManifest, MANIFEST_FILE};
use crate::report::{RunReport, Stage};
use crate::scanner::{AddonDir, scan_addons};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Local;
use log::{debug, info};
use std::fs;
use std::io;
use tempfile::NamedTempFile;

/// Filename of the addon icon.
pub const ICON_FILE: &str = "icon.png";

/// Filename of the addon fan art.
pub const FANART_FILE: &str = "fanart.jpg";

/// Artwork copied next to the archive when present.
const OPTIONAL_ASSETS: [(&str, &str); 2] = [("icon", ICON_FILE), ("fanart", FANART_FILE)];

/// An addon that was archived successfully.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PackagedAddon {
    /// Addon directory name.
    pub directory: String,
    /// Declared addon id.
    pub id: String,
    /// Declared addon version.
    pub version: String,
    /// Path of the new archive.
    pub archive: Utf8PathBuf,
    /// Where the previous archive of the same name was moved, if any.
    pub backup: Option<Utf8PathBuf>,
}

/// Archive every addon under the repository root.
///
/// A failing addon is recorded and skipped; the remaining addons are still
/// processed. Missing artwork is recorded as a warning and does not fail the
/// addon.
pub fn package_all(
    excludes: &Excludes,
    layout: &RepoLayout,
    report: &mut RunReport,
) -> Vec<PackagedAddon> {
    let addons = match scan_addons(layout) {
        Ok(addons) => addons,
        Err(err) => {
            report.error(Stage::Archive, layout.root().as_str(), err);
            return Vec::new();
        }
    };

    if !excludes.is_empty() {
        debug!("Excluding extensions {}", excludes.iter().collect::<Vec<_>>().join(", "));
    }
    let suffix = backup_suffix(&Local::now());
    addons
        .iter()
        .filter_map(
            |addon| match package_addon(addon, excludes, layout, &suffix, report) {
                Ok(packaged) => Some(packaged),
                Err(err) => {
                    report.error(Stage::Archive, addon.name(), err);
                    None
                }
            },
        )
        .collect()
}

/// Archive a single addon directory.
///
/// The archive is staged in a temporary file inside the addon's output
/// directory, so a failed build never replaces or renames an existing
/// archive. An output directory created for a failed build is removed again.
///
/// # Errors
///
/// Returns an error if the manifest is unusable, the archive cannot be built
/// or installed, or the manifest cannot be copied. Missing artwork is recorded
/// in `report` instead.
pub fn package_addon(
    addon: &AddonDir,
    excludes: &Excludes,
    layout: &RepoLayout,
    backup_suffix: &str,
    report: &mut RunReport,
) -> Result<PackagedAddon> {
    let manifest = AddonManifest::load(&addon.manifest_path())?;
    info!("Generate zip file for {} {}", manifest.id(), manifest.version());

    let output_dir = layout.addon_output_dir(manifest.id());
    let archive = output_dir.join(ArchiveName::new(addon.name(), manifest.version()).as_str());
    create_dir(&output_dir)?;
    let backup = match install_archive(addon, excludes, &output_dir, &archive, backup_suffix) {
        Ok(backup) => backup,
        Err(err) => {
            remove_if_empty(&output_dir);
            return Err(err.into());
        }
    };

    copy_file(&addon.manifest_path(), &output_dir.join(MANIFEST_FILE))?;
    for (asset, file) in OPTIONAL_ASSETS {
        copy_optional(&addon.file(file), &output_dir.join(file), asset, manifest.id(), report);
    }

    Ok(PackagedAddon {
        directory: addon.name().to_owned(),
        id: manifest.id().to_owned(),
        version: manifest.version().to_owned(),
        archive,
        backup,
    })
}

/// Build the zip next to `archive`, then move it into place.
///
/// Returns where the superseded archive went, if there was one.
fn install_archive(
    addon: &AddonDir,
    excludes: &Excludes,
    output_dir: &Utf8Path,
    archive: &Utf8Path,
    backup_suffix: &str,
) -> std::result::Result<Option<Utf8PathBuf>, PackagingError> {
    let staging = NamedTempFile::new_in(output_dir)?;
    let (staging, entries) = create_archive(addon, excludes, staging)?;
    debug!("Archived {} file(s) from {}", entries.len(), addon.name());
    let backup = preserve_existing(archive, backup_suffix)?;
    staging.persist(archive).map_err(|err| err.error)?;
    Ok(backup)
}

fn remove_if_empty(dir: &Utf8Path) {
    if fs::remove_dir(dir).is_ok() {
        debug!("Removed empty {dir}");
    }
}

fn copy_file(from: &Utf8Path, to: &Utf8Path) -> Result<()> {
    fs::copy(from, to)
        .map(|_| ())
        .map_err(|source| GeneratorError::Copy {
            from: from.to_owned(),
            to: to.to_owned(),
            source,
        })
}

fn copy_optional(
    from: &Utf8Path,
    to: &Utf8Path,
    asset: &'static str,
    addon_id: &str,
    report: &mut RunReport,
) {
    let warning = match copy_file(from, to) {
        Ok(()) => return,
        Err(GeneratorError::Copy { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            GeneratorError::AssetMissing {
                asset,
                addon: addon_id.to_owned(),
            }
        }
        Err(err) => err,
    };
    report.warning(Stage::Archive, addon_id, warning);
}
