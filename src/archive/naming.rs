//! Archive filename conventions.
//!
//! Kodi resolves an addon download as `<datadir>/<id>/<id>-<version>.zip`, so
//! the archive stem is the addon directory name, which by convention matches
//! the addon id.

use std::fmt;

/// The filename of an addon archive: `<directory>-<version>.zip`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ArchiveName(String);

impl ArchiveName {
    /// Build the archive name for an addon directory and declared version.
    ///
    /// # Examples
    ///
    /// ```
    /// use kodi_repo_generator::archive::naming::ArchiveName;
    ///
    /// let name = ArchiveName::new("plugin.video.example", "2.1.0");
    /// assert_eq!(name.as_str(), "plugin.video.example-2.1.0.zip");
    /// ```
    #[must_use]
    pub fn new(directory: &str, version: &str) -> Self {
        Self(format!("{directory}-{version}.zip"))
    }

    /// Return the filename as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ArchiveName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArchiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
