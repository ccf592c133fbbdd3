//! Error types for addon archive creation.
//!
//! Covers I/O failures, zip encoding problems and directory traversal errors
//! that can occur while building a `<directory>-<version>.zip` archive.

use std::path::PathBuf;
use thiserror::Error;

/// Errors arising while building or installing an addon archive.
#[derive(Debug, Error)]
pub enum PackagingError {
    /// An I/O operation failed (reading source files, writing the archive).
    #[error("I/O error during packaging")]
    Io(#[from] std::io::Error),

    /// The zip encoder rejected an entry or failed to finish the archive.
    #[error("zip encoding failed")]
    Zip(#[from] zip::result::ZipError),

    /// The addon directory could not be traversed.
    #[error("failed to walk addon directory")]
    Walk(#[from] walkdir::Error),

    /// A file inside the addon directory has a non UTF-8 path.
    #[error("archive entry path is not valid UTF-8: {}", .0.display())]
    NonUtf8Entry(PathBuf),

    /// A walked path is not inside the addon directory.
    #[error("archive entry {} is outside the addon directory", .0.display())]
    OutsideAddon(PathBuf),
}
