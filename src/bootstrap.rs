//! Creation of the repository addon's own manifest.
//!
//! The repository is itself an addon: Kodi installs it to learn where
//! `addons.xml` lives. Its `addon.xml` is rendered once from the tools
//! directory template and then left alone, so hand edits survive later runs.

use crate::config::Config;
use crate::error::{GeneratorError, Result};
use crate::layout::{RepoLayout, create_dir};
use crate::manifest::MANIFEST_FILE;
use crate::report::{RunReport, Stage};
use crate::template::render;
use crate::writer::save_file;
use camino::Utf8PathBuf;
use log::info;
use std::fs;

/// What [`bootstrap_repository_addon`] did.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BootstrapOutcome {
    /// The manifest already existed and was left untouched.
    Skipped,
    /// A manifest was rendered and written to the given path.
    Created(Utf8PathBuf),
}

/// Render the repository addon manifest unless it already exists.
///
/// A failure to write the rendered manifest is recorded against
/// [`Stage::Bootstrap`] and reported as [`BootstrapOutcome::Skipped`].
///
/// # Errors
///
/// Returns an error when the template cannot be read or rendered, or the
/// addon directory cannot be created. These abort the run.
pub fn bootstrap_repository_addon(
    config: &Config,
    layout: &RepoLayout,
    report: &mut RunReport,
) -> Result<BootstrapOutcome> {
    let addon = config.addon();
    let addon_dir = layout.root().join(&addon.id);
    let manifest_path = addon_dir.join(MANIFEST_FILE);
    if manifest_path.exists() {
        return Ok(BootstrapOutcome::Skipped);
    }

    info!("Create repository addon");
    let template_path = layout.template_path();
    let template =
        fs::read_to_string(&template_path).map_err(|source| GeneratorError::TemplateRead {
            path: template_path.clone(),
            source,
        })?;

    let output_path = format!("{}/", config.output_dir_name());
    let values = [
        ("addonid", addon.id.as_str()),
        ("name", addon.name.as_str()),
        ("version", addon.version.as_str()),
        ("author", addon.author.as_str()),
        ("summary", addon.summary.as_str()),
        ("description", addon.description.as_str()),
        ("url", config.url()),
        ("output_path", output_path.as_str()),
    ];
    let manifest = render(&template, &values)?;

    create_dir(&addon_dir)?;
    match save_file(&manifest_path, manifest) {
        Ok(()) => {
            report.set_bootstrapped(manifest_path.clone());
            Ok(BootstrapOutcome::Created(manifest_path))
        }
        Err(err) => {
            report.error(Stage::Bootstrap, manifest_path.as_str(), err);
            Ok(BootstrapOutcome::Skipped)
        }
    }
}
