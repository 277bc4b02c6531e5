//! Common types and utilities shared across blogtag crates.
//!
//! This crate defines the shared error taxonomy, report formats, and the
//! observability helpers used throughout the blogtag workspace. It stays
//! dependency-light so that every crate can depend on it.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`BlogtagError`] and [`Result`]: Run-level error handling
//! - [`OutputFormat`]: How the per-article report is rendered
//!
//! # Examples
//!
//! ```rust
//! use blogtag_common::OutputFormat;
//!
//! let fmt: OutputFormat = "json".parse().unwrap();
//! assert_eq!(fmt, OutputFormat::Json);
//! assert_eq!(OutputFormat::default(), OutputFormat::Text);
//! ```
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

pub mod observability;

/// Preferred rendering of the per-article report on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `URL:` / `Tags:` / dashes, three lines per article.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format: {other} (expected text or json)")),
        }
    }
}

/// Error taxonomy for a tagging run. None of these are retried.
#[derive(thiserror::Error, Debug)]
pub enum BlogtagError {
    /// The URL list for the requested scope does not exist.
    #[error("{} not found.", .0.display())]
    ConfigurationMissing(PathBuf),

    /// Retrieving an article or roster document failed.
    #[error("fetch failed for {target}: {message}")]
    Fetch { target: String, message: String },

    /// A roster or configuration document could not be parsed.
    #[error("parse failed for {target}: {message}")]
    Parse { target: String, message: String },

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Writing the report failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient alias for results that use [`BlogtagError`].
pub type Result<T> = std::result::Result<T, BlogtagError>;
