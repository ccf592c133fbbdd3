//! Addon manifest (`addon.xml`) parsing.
//!
//! Only the identity of an addon matters to the generator: the `id` and
//! `version` attributes of the `<addon>` root element. The whole document is
//! still walked so that a manifest which is not well-formed XML is rejected
//! instead of being packaged and published.

use camino::Utf8Path;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fs;
use thiserror::Error;

/// Filename of the manifest inside each addon directory.
pub const MANIFEST_FILE: &str = "addon.xml";

/// Name of the manifest root element.
const ROOT_ELEMENT: &str = "addon";

/// Errors raised while reading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest could not be read as UTF-8 text.
    #[error("failed to read manifest {path}")]
    Read {
        /// Path of the manifest.
        path: camino::Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not well-formed XML.
    #[error("malformed XML: {reason}")]
    Malformed {
        /// Parser diagnostic.
        reason: String,
    },

    /// The document has no root element.
    #[error("document has no root element")]
    MissingRoot,

    /// The root element is not `<addon>`.
    #[error("expected <addon> root element, found <{found}>")]
    UnexpectedRoot {
        /// Name of the root element found instead.
        found: String,
    },

    /// A required root attribute is absent or empty.
    #[error("<addon> is missing the `{attribute}` attribute")]
    MissingAttribute {
        /// Name of the missing attribute.
        attribute: &'static str,
    },

    /// An attribute used in output paths is not a plain name.
    #[error("<addon> `{attribute}` value `{value}` cannot be used as a file name")]
    InvalidAttribute {
        /// Name of the attribute.
        attribute: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Result type alias using [`ManifestError`].
pub type Result<T> = std::result::Result<T, ManifestError>;

/// The identity declared by an addon manifest.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddonManifest {
    id: String,
    version: String,
    name: Option<String>,
}

impl AddonManifest {
    /// Read and parse the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Read`] if the file is unreadable, otherwise
    /// any error from [`Self::parse`].
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let xml = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(&xml)
    }

    /// Parse manifest text.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed, its root is not
    /// `<addon>`, or `id`/`version` are missing or empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use kodi_repo_generator::manifest::AddonManifest;
    ///
    /// let manifest = AddonManifest::parse(
    ///     r#"<?xml version="1.0"?><addon id="plugin.a" version="1.2.0" name="A"/>"#,
    /// )
    /// .unwrap();
    /// assert_eq!(manifest.id(), "plugin.a");
    /// assert_eq!(manifest.version(), "1.2.0");
    /// ```
    pub fn parse(xml: &str) -> Result<Self> {
        let root = parse_root(xml)?.ok_or(ManifestError::MissingRoot)?;
        if root.name != ROOT_ELEMENT {
            return Err(ManifestError::UnexpectedRoot { found: root.name });
        }

        Ok(Self {
            id: path_safe("id", root.required("id")?)?,
            version: path_safe("version", root.required("version")?)?,
            name: root.attribute("name").map(str::to_owned),
        })
    }

    /// Declared addon id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Declared addon version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Declared display name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Check that `xml` is a well-formed document with exactly one root element.
///
/// The check is permissive: declarations, comments, processing instructions
/// and DOCTYPEs are accepted anywhere outside the root.
///
/// # Errors
///
/// Returns [`ManifestError::Malformed`] or [`ManifestError::MissingRoot`].
pub fn ensure_well_formed(xml: &str) -> Result<()> {
    parse_root(xml)?.map(|_| ()).ok_or(ManifestError::MissingRoot)
}

struct RootElement {
    name: String,
    attributes: Vec<(String, String)>,
}

impl RootElement {
    fn from_tag(tag: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attribute in tag.attributes() {
            let attribute = attribute.map_err(malformed)?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value().map_err(malformed)?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self { name, attributes })
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String> {
        self.attribute(key)
            .map(str::to_owned)
            .ok_or(ManifestError::MissingAttribute { attribute: key })
    }
}

/// Walk the whole document and return its root element, if any.
fn parse_root(xml: &str) -> Result<Option<RootElement>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut depth = 0_usize;
    let mut root = None;
    loop {
        let event = reader.read_event().map_err(|err| ManifestError::Malformed {
            reason: format!("{err} at byte {}", reader.buffer_position()),
        })?;
        match event {
            Event::Start(tag) => {
                open_element(&mut root, depth, &tag)?;
                depth += 1;
            }
            Event::Empty(tag) => open_element(&mut root, depth, &tag)?,
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| malformed("closing tag without an open element"))?;
            }
            Event::Text(_) | Event::CData(_) if depth == 0 => {
                return Err(malformed("character data outside the root element"));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(malformed("document ends inside an open element"));
    }
    Ok(root)
}

fn open_element(root: &mut Option<RootElement>, depth: usize, tag: &BytesStart<'_>) -> Result<()> {
    if depth > 0 {
        return Ok(());
    }
    if root.is_some() {
        return Err(malformed("more than one root element"));
    }
    *root = Some(RootElement::from_tag(tag)?);
    Ok(())
}

/// The id names an output directory and the version ends up in the archive
/// filename, so neither may contain separators or be a relative component.
fn path_safe(attribute: &'static str, value: String) -> Result<String> {
    if value == "." || value == ".." || value.contains(['/', '\\']) {
        return Err(ManifestError::InvalidAttribute { attribute, value });
    }
    Ok(value)
}

fn malformed(reason: impl std::fmt::Display) -> ManifestError {
    ManifestError::Malformed {
        reason: reason.to_string(),
    }
}
