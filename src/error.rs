//! Error types for the repository generator.
//!
//! Each concern owns a focused error enum ([`ConfigError`], [`TemplateError`],
//! [`ManifestError`], [`PackagingError`]); [`GeneratorError`] wraps them so the
//! pipeline can tell fatal setup failures apart from per-package and per-stage
//! problems that only end up in the run report.

use crate::archive::packaging_error::PackagingError;
use crate::config::ConfigError;
use crate::manifest::ManifestError;
use crate::template::TemplateError;
use camino::Utf8PathBuf;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while generating the repository.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The repository manifest template could not be rendered.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// An addon manifest could not be read or understood.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Building an addon archive failed.
    #[error(transparent)]
    Packaging(#[from] PackagingError),

    /// The template file could not be read.
    #[error("failed to read template {path}")]
    TemplateRead {
        /// Path of the template file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file could not be read.
    #[error("failed to read {path}")]
    Read {
        /// Path of the file that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file could not be written.
    #[error("failed to save {path}")]
    Write {
        /// Destination that could not be written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A directory could not be created.
    #[error("failed to create directory {path}")]
    CreateDir {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file could not be copied into the output tree.
    #[error("failed to copy {from} to {to}")]
    Copy {
        /// Source file.
        from: Utf8PathBuf,
        /// Destination file.
        to: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An optional addon asset is missing.
    #[error("{asset} file missing for {addon}")]
    AssetMissing {
        /// Human-readable asset kind (`icon`, `fanart`).
        asset: &'static str,
        /// Addon id the asset belongs to.
        addon: String,
    },

    /// The repository root could not be listed.
    #[error("failed to scan repository root {path}")]
    Scan {
        /// The repository root.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A path required by the generator is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", path.display())]
    NonUtf8Path {
        /// The offending path.
        path: PathBuf,
    },

    /// The tools directory or repository root could not be resolved.
    #[error("cannot resolve {what} {path}")]
    Resolve {
        /// Which directory failed to resolve.
        what: &'static str,
        /// The path as given.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The tools directory has no parent to use as the repository root.
    #[error("tools directory {path} has no parent; pass --repo-root")]
    NoRepositoryRoot {
        /// The tools directory.
        path: Utf8PathBuf,
    },

    /// An I/O operation failed.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`GeneratorError`].
pub type Result<T> = std::result::Result<T, GeneratorError>;
