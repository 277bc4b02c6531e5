//! Speaker and presentation rosters.
//!
//! - [`SpeakerRoster`]: speakers partitioned into groups (`keynotes`, then
//!   `speakers`), searched in that order by [`SpeakerRoster::resolve_name`]
//! - [`PresentationRoster`]: talks in document order, each pointing at a
//!   speaker by identifier
//! - [`RosterSource`]: where a roster document comes from (HTTP or local file)
//!
//! Rosters are loaded once per run and only read afterwards.

pub mod presentation;
pub mod source;
pub mod speaker;

pub use presentation::{Presentation, PresentationRoster};
pub use source::{load_rosters, Rosters, RosterSource};
pub use speaker::{Speaker, SpeakerGroup, SpeakerRoster, SPEAKER_GROUPS};

use blogtag_common::BlogtagError;
use blogtag_http::HttpError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to parse {target}: {source}")]
    Parse {
        target: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("unexpected shape in {target}: {message}")]
    Shape { target: String, message: String },
    #[error("failed to fetch {location}: {source}")]
    Fetch {
        location: String,
        #[source]
        source: HttpError,
    },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<RosterError> for BlogtagError {
    fn from(e: RosterError) -> Self {
        match e {
            RosterError::Parse { target, source } => BlogtagError::Parse {
                target,
                message: source.to_string(),
            },
            RosterError::Shape { target, message } => BlogtagError::Parse { target, message },
            RosterError::Fetch { location, source } => BlogtagError::Fetch {
                target: location,
                message: source.to_string(),
            },
            RosterError::Io { path, source } => BlogtagError::Fetch {
                target: path.display().to_string(),
                message: source.to_string(),
            },
        }
    }
}

/// Render a YAML mapping key as an identifier. Rosters occasionally use bare
/// numbers or booleans as keys.
pub(crate) fn key_to_string(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
