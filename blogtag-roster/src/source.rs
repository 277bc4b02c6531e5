//! Where roster documents come from.

use crate::{PresentationRoster, RosterError, SpeakerRoster};
use blogtag_http::{HttpClient, RequestOpts};
use std::path::PathBuf;

const YEAR_PLACEHOLDER: &str = "{year}";

/// A roster document location: a remote URL or a local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterSource {
    Remote(String),
    File(PathBuf),
}

impl RosterSource {
    /// Interpret a configured location for one run scope.
    ///
    /// ```
    /// use blogtag_roster::RosterSource;
    /// use std::path::PathBuf;
    ///
    /// assert_eq!(
    ///     RosterSource::for_scope("https://example.com/{year}/speakers.yml", "2024"),
    ///     RosterSource::Remote("https://example.com/2024/speakers.yml".into()),
    /// );
    /// assert_eq!(
    ///     RosterSource::for_scope("data/speakers.yml", "2024"),
    ///     RosterSource::File(PathBuf::from("data/speakers.yml")),
    /// );
    /// ```
    pub fn for_scope(location: &str, scope: &str) -> Self {
        let resolved = location.replace(YEAR_PLACEHOLDER, scope);
        if resolved.starts_with("http://") || resolved.starts_with("https://") {
            Self::Remote(resolved)
        } else {
            Self::File(PathBuf::from(resolved))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Remote(url) => url.clone(),
            Self::File(path) => path.display().to_string(),
        }
    }

    /// Read the raw document. Failures are fatal to the run; nothing is retried.
    pub async fn read(&self, http: &HttpClient) -> Result<String, RosterError> {
        match self {
            Self::Remote(url) => {
                http.get_text(url, RequestOpts::default())
                    .await
                    .map_err(|source| RosterError::Fetch {
                        location: url.clone(),
                        source,
                    })
            }
            Self::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| RosterError::Io {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }
}

/// Both rosters, loaded once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Rosters {
    pub speakers: SpeakerRoster,
    pub presentations: PresentationRoster,
}

/// Load the speaker roster, then the presentation roster.
pub async fn load_rosters(
    speakers: &RosterSource,
    presentations: &RosterSource,
    http: &HttpClient,
) -> Result<Rosters, RosterError> {
    let raw = speakers.read(http).await?;
    let speakers_roster = SpeakerRoster::from_yaml_str(&raw)?;

    let raw = presentations.read(http).await?;
    let presentations_roster = PresentationRoster::from_yaml_str(&raw)?;

    tracing::info!(
        speakers_from = %speakers.describe(),
        presentations_from = %presentations.describe(),
        speakers = speakers_roster.len(),
        presentations = presentations_roster.len(),
        "roster.loaded"
    );

    Ok(Rosters {
        speakers: speakers_roster,
        presentations: presentations_roster,
    })
}
