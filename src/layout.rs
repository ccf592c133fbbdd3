//! Repository directory layout.
//!
//! All paths the pipeline touches are derived from two absolute directories:
//! the tools directory (holding `config.toml` and `template.xml`) and the
//! repository root (holding one directory per addon). The process working
//! directory is only consulted once, to resolve a relative tools directory.

use crate::config::{CONFIG_FILE_NAME, Config};
use crate::error::{GeneratorError, Result};
use crate::index::INDEX_FILE;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Filename of the repository manifest template inside the tools directory.
pub const TEMPLATE_FILE: &str = "template.xml";

/// Resolved directories for a generator run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RepoLayout {
    root: Utf8PathBuf,
    tools_dir: Utf8PathBuf,
    output_dir: Utf8PathBuf,
}

impl RepoLayout {
    /// Build the layout for `root`, placing the output directory according to
    /// `config`.
    #[must_use]
    pub fn new(root: Utf8PathBuf, tools_dir: Utf8PathBuf, config: &Config) -> Self {
        let output_dir = root.join(config.output_dir_name());
        Self {
            root,
            tools_dir,
            output_dir,
        }
    }

    /// Directory containing the addon directories.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Root of the generated output tree.
    #[must_use]
    pub fn output_dir(&self) -> &Utf8Path {
        &self.output_dir
    }

    /// Path of the manifest template.
    #[must_use]
    pub fn template_path(&self) -> Utf8PathBuf {
        self.tools_dir.join(TEMPLATE_FILE)
    }

    /// Path of the aggregated addon index.
    #[must_use]
    pub fn index_path(&self) -> Utf8PathBuf {
        self.output_dir.join(INDEX_FILE)
    }

    /// Output directory for the addon with the given id.
    #[must_use]
    pub fn addon_output_dir(&self, addon_id: &str) -> Utf8PathBuf {
        self.output_dir.join(addon_id)
    }

    /// Whether the directory `name` directly under the root must never be
    /// treated as an addon.
    ///
    /// Skips version control metadata, the output tree and the tools
    /// directory, any of which would otherwise package themselves.
    #[must_use]
    pub fn is_reserved(&self, name: &str) -> bool {
        let path = self.root.join(name);
        name == ".git" || path == self.output_dir || path == self.tools_dir
    }

    /// Create the output root if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::CreateDir`] if the directory cannot be
    /// created.
    pub fn prepare(&self) -> Result<()> {
        create_dir(&self.output_dir)
    }
}

/// Create `path` and any missing parents.
///
/// # Errors
///
/// Returns [`GeneratorError::CreateDir`] naming `path` on failure.
pub fn create_dir(path: &Utf8Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| GeneratorError::CreateDir {
        path: path.to_owned(),
        source,
    })
}

/// Resolve the tools directory to an absolute path.
///
/// Defaults to the current working directory when `requested` is `None`.
///
/// # Errors
///
/// Returns an error if the directory does not exist or its canonical path is
/// not valid UTF-8.
pub fn resolve_tools_dir(requested: Option<&Utf8Path>) -> Result<Utf8PathBuf> {
    let path = match requested {
        Some(path) => path.to_owned(),
        None => utf8(std::env::current_dir()?)?,
    };
    canonical("tools directory", &path)
}

/// Resolve the repository root.
///
/// Defaults to the parent of `tools_dir`, matching a checkout where the
/// generator lives in a `_tools` directory next to the addons.
///
/// # Errors
///
/// Returns an error if the root does not exist, is not valid UTF-8, or the
/// tools directory has no parent.
pub fn resolve_repo_root(
    tools_dir: &Utf8Path,
    requested: Option<&Utf8Path>,
) -> Result<Utf8PathBuf> {
    match requested {
        Some(path) => canonical("repository root", path),
        None => tools_dir
            .parent()
            .map(Utf8Path::to_owned)
            .ok_or_else(|| GeneratorError::NoRepositoryRoot {
                path: tools_dir.to_owned(),
            }),
    }
}

/// Path of the configuration file inside `tools_dir`.
#[must_use]
pub fn config_path(tools_dir: &Utf8Path) -> Utf8PathBuf {
    tools_dir.join(CONFIG_FILE_NAME)
}

fn canonical(what: &'static str, path: &Utf8Path) -> Result<Utf8PathBuf> {
    let resolved = fs::canonicalize(path).map_err(|source| GeneratorError::Resolve {
        what,
        path: path.to_owned(),
        source,
    })?;
    utf8(resolved)
}

fn utf8(path: std::path::PathBuf) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).map_err(|path| GeneratorError::NonUtf8Path { path })
}
