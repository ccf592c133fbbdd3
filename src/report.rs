//! Run report collecting the outcome of each stage.
//!
//! Stages never abort on per-addon or per-file problems. They record an
//! [`Issue`] instead, and the binary prints the collected issues after the
//! pipeline finishes so partial output is always accompanied by a diagnostic.

use crate::archive::PackagedAddon;
use crate::error::GeneratorError;
use crate::stamp::Checksum;
use camino::Utf8PathBuf;
use log::{error, warn};
use std::fmt;

/// Pipeline stage an issue was raised in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    /// Repository addon bootstrap.
    Bootstrap,
    /// Addon archiving.
    Archive,
    /// Index aggregation.
    Index,
    /// Index stamping.
    Stamp,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Bootstrap => "bootstrap",
            Self::Archive => "archive",
            Self::Index => "index",
            Self::Stamp => "stamp",
        };
        f.write_str(label)
    }
}

/// How serious an issue is.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
    /// Output was produced but is incomplete (e.g. missing artwork).
    Warning,
    /// The affected addon or file was not produced.
    Error,
}

/// A non-fatal problem encountered during a run.
#[derive(Debug)]
pub struct Issue {
    /// Stage the issue was raised in.
    pub stage: Stage,
    /// Severity of the issue.
    pub severity: Severity,
    /// Addon directory or file the issue concerns.
    pub subject: String,
    /// The underlying error.
    pub error: GeneratorError,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.stage, self.subject, describe(&self.error))
    }
}

/// Render an error followed by its chain of sources, separated by `: `.
#[must_use]
pub fn describe(error: &dyn std::error::Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// Everything a run produced, plus the issues it hit on the way.
#[derive(Debug, Default)]
pub struct RunReport {
    bootstrapped: Option<Utf8PathBuf>,
    packaged: Vec<PackagedAddon>,
    index: Option<Utf8PathBuf>,
    checksum: Option<Checksum>,
    issues: Vec<Issue>,
}

impl RunReport {
    /// Record an error; the subject's output was not produced.
    pub fn error(&mut self, stage: Stage, subject: &str, error: GeneratorError) {
        self.record(stage, Severity::Error, subject, error);
    }

    /// Record a warning; the subject's output is incomplete.
    pub fn warning(&mut self, stage: Stage, subject: &str, error: GeneratorError) {
        self.record(stage, Severity::Warning, subject, error);
    }

    fn record(&mut self, stage: Stage, severity: Severity, subject: &str, error: GeneratorError) {
        let issue = Issue {
            stage,
            severity,
            subject: subject.to_owned(),
            error,
        };
        match severity {
            Severity::Warning => warn!("{issue}"),
            Severity::Error => error!("{issue}"),
        }
        self.issues.push(issue);
    }

    pub(crate) fn set_bootstrapped(&mut self, manifest: Utf8PathBuf) {
        self.bootstrapped = Some(manifest);
    }

    pub(crate) fn set_packaged(&mut self, packaged: Vec<PackagedAddon>) {
        self.packaged = packaged;
    }

    pub(crate) fn set_index(&mut self, index: Option<Utf8PathBuf>) {
        self.index = index;
    }

    pub(crate) fn set_checksum(&mut self, checksum: Option<Checksum>) {
        self.checksum = checksum;
    }

    /// Manifest created for the repository addon, if this run created one.
    #[must_use]
    pub fn bootstrapped(&self) -> Option<&Utf8PathBuf> {
        self.bootstrapped.as_ref()
    }

    /// Addons archived during the run, in directory name order.
    #[must_use]
    pub fn packaged(&self) -> &[PackagedAddon] {
        &self.packaged
    }

    /// The index stamp, if it was written.
    #[must_use]
    pub fn checksum(&self) -> Option<&Checksum> {
        self.checksum.as_ref()
    }

    /// All recorded issues in the order they occurred.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Recorded errors.
    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    /// Recorded warnings.
    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// Lines summarising the run for the console.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        lines.push(format!(
            "Finished: {} addon(s) zipped, index {}, checksum {}",
            self.packaged.len(),
            if self.index.is_some() { "written" } else { "not written" },
            self.checksum
                .as_ref()
                .map_or_else(|| "not written".to_owned(), |c| format!("{} {c}", c.algorithm())),
        ));

        let errors = self.errors().count();
        let warnings = self.warnings().count();
        if errors + warnings > 0 {
            lines.push(format!("{errors} error(s), {warnings} warning(s):"));
            lines.extend(self.issues.iter().map(|issue| format!("  {issue}")));
        }
        lines
    }
}
