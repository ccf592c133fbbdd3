//! Integrity stamp for the aggregated addon index.
//!
//! Kodi clients poll `addons.xml.md5` to decide whether the index changed, so
//! the stamp is computed over the exact bytes persisted by the index stage.
//! SHA-256 is available for clients configured with `<checksum
//! verify="sha256">`.

use crate::error::GeneratorError;
use crate::index::INDEX_FILE;
use crate::layout::RepoLayout;
use crate::report::{RunReport, Stage};
use crate::writer::save_file;
use camino::Utf8PathBuf;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::str::FromStr;

/// Hash algorithm used for the index stamp.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ChecksumAlgorithm {
    /// MD5, written to `addons.xml.md5`.
    #[default]
    Md5,
    /// SHA-256, written to `addons.xml.sha256`.
    Sha256,
}

impl ChecksumAlgorithm {
    /// File extension appended to the index filename.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
        }
    }

    /// Name of the stamp file written next to the index.
    #[must_use]
    pub fn stamp_file_name(self) -> String {
        format!("{INDEX_FILE}.{}", self.extension())
    }

    /// Hash `bytes` and return the lowercase hex digest.
    #[must_use]
    pub fn digest(self, bytes: &[u8]) -> Checksum {
        let hex = match self {
            Self::Md5 => format!("{:x}", md5::compute(bytes)),
            Self::Sha256 => format!("{:x}", Sha256::digest(bytes)),
        };
        Checksum {
            algorithm: self,
            hex,
        }
    }
}

impl FromStr for ChecksumAlgorithm {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha256" => Ok(Self::Sha256),
            other => Err(other.to_owned()),
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A hex-encoded content hash.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Checksum {
    algorithm: ChecksumAlgorithm,
    hex: String,
}

impl Checksum {
    /// The algorithm that produced this checksum.
    #[must_use]
    pub const fn algorithm(&self) -> ChecksumAlgorithm {
        self.algorithm
    }

    /// Return the digest as a lowercase hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.hex
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

/// Hash the persisted index and write the stamp file beside it.
///
/// Returns the checksum when both the read and the write succeeded. Failures
/// are recorded against [`Stage::Stamp`] and never propagate.
pub fn generate_stamp(
    algorithm: ChecksumAlgorithm,
    layout: &RepoLayout,
    report: &mut RunReport,
) -> Option<Checksum> {
    let index_path = layout.index_path();
    let bytes = match fs::read(&index_path) {
        Ok(bytes) => bytes,
        Err(source) => {
            report.error(
                Stage::Stamp,
                index_path.as_str(),
                GeneratorError::Read {
                    path: index_path.clone(),
                    source,
                },
            );
            return None;
        }
    };

    let checksum = algorithm.digest(&bytes);
    let stamp_path: Utf8PathBuf = layout.output_dir().join(algorithm.stamp_file_name());
    match save_file(&stamp_path, checksum.as_str()) {
        Ok(()) => {
            log::info!("Wrote {stamp_path} ({checksum})");
            Some(checksum)
        }
        Err(err) => {
            report.error(Stage::Stamp, stamp_path.as_str(), err);
            None
        }
    }
}
