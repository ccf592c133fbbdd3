//! Kodi addon repository generator.
//!
//! Turns a checkout holding one directory per addon into the files a Kodi
//! repository serves: a versioned zip per addon, the aggregated `addons.xml`
//! index and its checksum stamp. The `kodi-repo-generator` binary drives the
//! [`pipeline`]; the stages are also usable on their own.
//!
//! # Modules
//!
//! - [`archive`] - Per-addon zip creation, rotation and asset copying
//! - [`bootstrap`] - Repository addon manifest rendering
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - `config.toml` loading and validation
//! - [`error`] - Top-level error type
//! - [`index`] - `addons.xml` aggregation
//! - [`layout`] - Directory resolution for a run
//! - [`manifest`] - `addon.xml` parsing
//! - [`pipeline`] - Stage orchestration
//! - [`report`] - Run outcome and issue collection
//! - [`scanner`] - Addon directory discovery
//! - [`stamp`] - Index checksum generation
//! - [`template`] - Placeholder substitution for the manifest template
//! - [`writer`] - Scoped file writes

pub mod archive;
pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod layout;
pub mod manifest;
pub mod pipeline;
pub mod report;
pub mod scanner;
pub mod stamp;
pub mod template;
pub mod writer;

#[cfg(test)]
mod test_utils;
