//! Repository generator configuration.
//!
//! Settings live in `config.toml` inside the tools directory and are grouped
//! into an `[addon]` table describing the repository addon itself and a
//! `[locations]` table describing where the generated files go. Every key the
//! pipeline relies on is required; a missing or blank value is reported with
//! its dotted name so the file can be fixed before anything is written.

use crate::stamp::ChecksumAlgorithm;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Filename of the configuration inside the tools directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors raised while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path}")]
    Read {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or has unexpected keys.
    #[error("invalid configuration")]
    Parse(#[from] toml::de::Error),

    /// A required option is absent or blank.
    #[error("missing required option `{key}`")]
    MissingOption {
        /// Dotted name of the option, e.g. `addon.id`.
        key: &'static str,
    },

    /// `locations.checksum` names an unsupported algorithm.
    #[error("unsupported checksum algorithm `{value}`; expected `md5` or `sha256`")]
    InvalidChecksum {
        /// The rejected value.
        value: String,
    },
}

/// Result type alias using [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    addon: RawAddon,
    locations: RawLocations,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawAddon {
    id: Option<String>,
    name: Option<String>,
    version: Option<String>,
    author: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    excludes: Option<RawExcludes>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawLocations {
    output_path: Option<String>,
    url: Option<String>,
    checksum: Option<String>,
}

/// `excludes` may be written as `".pyc,.pyo"` or `[".pyc", ".pyo"]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawExcludes {
    List(String),
    Items(Vec<String>),
}

/// Identity of the repository addon, substituted into the manifest template.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddonIdentity {
    /// Addon id, also the directory name of the repository addon.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Repository addon version.
    pub version: String,
    /// Provider name.
    pub author: String,
    /// One-line summary.
    pub summary: String,
    /// Long description.
    pub description: String,
}

/// Immutable generator configuration.
#[derive(Clone, Debug)]
pub struct Config {
    addon: AddonIdentity,
    excludes: Excludes,
    output_path: String,
    url: String,
    checksum: ChecksumAlgorithm,
}

impl Config {
    /// Read and validate the configuration at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise
    /// any error from [`Self::from_toml`].
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_toml(&source)?;
        log::debug!("Loaded configuration from {path}");
        Ok(config)
    }

    /// Parse and validate configuration text.
    ///
    /// Required keys are checked in declaration order and the first missing
    /// one is reported.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML,
    /// [`ConfigError::MissingOption`] for an absent or blank required key and
    /// [`ConfigError::InvalidChecksum`] for an unknown checksum algorithm.
    ///
    /// # Examples
    ///
    /// ```
    /// use kodi_repo_generator::config::Config;
    ///
    /// let config = Config::from_toml(concat!(
    ///     "[addon]\n",
    ///     "id = \"repository.example\"\n",
    ///     "name = \"Example\"\n",
    ///     "version = \"1.0.0\"\n",
    ///     "author = \"Someone\"\n",
    ///     "summary = \"Summary\"\n",
    ///     "description = \"Description\"\n",
    ///     "excludes = \".pyc,.pyo\"\n",
    ///     "[locations]\n",
    ///     "output_path = \"zips/\"\n",
    ///     "url = \"https://example.com/\"\n",
    /// ))
    /// .unwrap();
    /// assert_eq!(config.output_dir_name(), "_zips");
    /// ```
    pub fn from_toml(source: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(source)?;
        let RawConfig { addon, locations } = raw;

        let identity = AddonIdentity {
            id: required("addon.id", addon.id)?,
            name: required("addon.name", addon.name)?,
            version: required("addon.version", addon.version)?,
            author: required("addon.author", addon.author)?,
            summary: required("addon.summary", addon.summary)?,
            description: required("addon.description", addon.description)?,
        };
        let excludes = match addon.excludes {
            Some(RawExcludes::List(list)) => Excludes::from_list(&list),
            Some(RawExcludes::Items(items)) => {
                Excludes::from_items(items.iter().map(String::as_str))
            }
            None => return Err(ConfigError::MissingOption { key: "addon.excludes" }),
        };
        let output_path = required("locations.output_path", locations.output_path)?;
        let url = required("locations.url", locations.url)?;
        let checksum = match locations.checksum {
            Some(value) => value
                .parse()
                .map_err(|value| ConfigError::InvalidChecksum { value })?,
            None => ChecksumAlgorithm::default(),
        };

        Ok(Self {
            addon: identity,
            excludes,
            output_path,
            url,
            checksum,
        })
    }

    /// Identity of the repository addon.
    #[must_use]
    pub const fn addon(&self) -> &AddonIdentity {
        &self.addon
    }

    /// Extensions left out of addon archives.
    #[must_use]
    pub const fn excludes(&self) -> &Excludes {
        &self.excludes
    }

    /// Name of the output directory under the repository root.
    ///
    /// The configured path is prefixed with `_` so that it sorts ahead of the
    /// addon directories and can never collide with an addon id.
    #[must_use]
    pub fn output_dir_name(&self) -> String {
        format!("_{}", self.output_path.trim_end_matches(['/', '\\']))
    }

    /// Canonical repository URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Algorithm used for the index stamp.
    #[must_use]
    pub const fn checksum(&self) -> ChecksumAlgorithm {
        self.checksum
    }
}

fn required(key: &'static str, value: Option<String>) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingOption { key })
}

/// A set of lowercased file extensions, each with a leading dot.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Excludes(BTreeSet<String>);

impl Excludes {
    /// Parse a comma-separated list such as `".pyc, .pyo"`.
    #[must_use]
    pub fn from_list(list: &str) -> Self {
        Self::from_items(list.split(','))
    }

    /// Build the set from individual entries.
    ///
    /// Entries are trimmed and lowercased; blank entries are ignored and a
    /// missing leading dot is added.
    #[must_use]
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a str>) -> Self {
        let set = items
            .into_iter()
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| {
                let lower = item.to_lowercase();
                if lower.starts_with('.') {
                    lower
                } else {
                    format!(".{lower}")
                }
            })
            .collect();
        Self(set)
    }

    /// Whether `path` has an excluded extension.
    ///
    /// Only the last extension counts and the comparison ignores case, so
    /// `module.PYC` matches `.pyc` while `.pyc` on its own (a dotfile) does
    /// not.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.0.contains(&format!(".{}", ext.to_lowercase())))
    }

    /// Iterate over the extensions in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Whether no extension is excluded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
