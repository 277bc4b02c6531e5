use crate::{key_to_string, RosterError};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

/// A talk, keyed by its roster identifier. `speaker_id` is resolved against a
/// [`crate::SpeakerRoster`] at match time, never embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub id: String,
    pub title: String,
    pub speaker_id: String,
}

/// Presentations in the order the source document lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationRoster {
    presentations: Vec<Presentation>,
}

#[derive(Default, Deserialize)]
struct RawPresentation {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    speakers: Vec<RawSpeakerRef>,
}

#[derive(Deserialize)]
struct RawSpeakerRef {
    id: String,
}

impl PresentationRoster {
    pub fn new(presentations: Vec<Presentation>) -> Self {
        Self { presentations }
    }

    /// Parse a presentation document keyed by presentation identifier.
    ///
    /// The speaker reference is the first `speakers[].id`; without one the
    /// presentation key doubles as the speaker identifier.
    ///
    /// ```
    /// use blogtag_roster::PresentationRoster;
    ///
    /// let roster = PresentationRoster::from_yaml_str(r#"
    /// ko1:
    ///   title: Ruby VM internals
    /// pair-talk:
    ///   title: Two of us
    ///   speakers:
    ///     - id: alice
    ///     - id: bob
    /// "#).unwrap();
    ///
    /// let ids: Vec<_> = roster.iter().map(|p| p.speaker_id.as_str()).collect();
    /// assert_eq!(ids, ["ko1", "alice"]);
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RosterError> {
        const TARGET: &str = "presentation roster";
        let doc: Value = serde_yaml::from_str(yaml).map_err(|source| RosterError::Parse {
            target: TARGET.into(),
            source,
        })?;
        let top = match doc {
            Value::Null => Mapping::new(),
            Value::Mapping(m) => m,
            _ => {
                return Err(RosterError::Shape {
                    target: TARGET.into(),
                    message: "expected a mapping of presentation id to details".into(),
                });
            }
        };

        let mut presentations = Vec::with_capacity(top.len());
        for (key, value) in top {
            let id = key_to_string(&key).ok_or_else(|| RosterError::Shape {
                target: TARGET.into(),
                message: "non-scalar presentation key".into(),
            })?;
            let raw: RawPresentation = if value.is_null() {
                RawPresentation::default()
            } else {
                serde_yaml::from_value(value).map_err(|source| RosterError::Parse {
                    target: format!("{TARGET} entry `{id}`"),
                    source,
                })?
            };
            let speaker_id = raw
                .speakers
                .into_iter()
                .next()
                .map(|s| s.id)
                .unwrap_or_else(|| id.clone());
            presentations.push(Presentation {
                title: raw.title.unwrap_or_default(),
                id,
                speaker_id,
            });
        }
        tracing::debug!(count = presentations.len(), "roster.presentations.loaded");

        Ok(Self { presentations })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Presentation> {
        self.presentations.iter()
    }

    #[cfg(test)]
    fn get(&self, id: &str) -> Option<&Presentation> {
        self.presentations.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.presentations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presentations.is_empty()
    }
}

impl<'a> IntoIterator for &'a PresentationRoster {
    type Item = &'a Presentation;
    type IntoIter = std::slice::Iter<'a, Presentation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_document_order() {
        let roster = PresentationRoster::from_yaml_str(
            "zzz:\n  title: Last alphabetically\naaa:\n  title: First alphabetically\n",
        )
        .unwrap();
        let ids: Vec<_> = roster.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["zzz", "aaa"]);
    }

    #[test]
    fn missing_title_is_empty() {
        let roster = PresentationRoster::from_yaml_str("tba:\n  speakers: []\n").unwrap();
        let p = roster.get("tba").unwrap();
        assert_eq!(p.title, "");
        assert_eq!(p.speaker_id, "tba");
    }

    #[test]
    fn bare_key_is_untitled_self_referencing_talk() {
        let roster = PresentationRoster::from_yaml_str("lonely:\n").unwrap();
        let p = roster.get("lonely").unwrap();
        assert_eq!(p.title, "");
        assert_eq!(p.speaker_id, "lonely");
    }

    #[test]
    fn scalar_entry_is_rejected() {
        let err = PresentationRoster::from_yaml_str("odd: just a string\n").unwrap_err();
        assert!(matches!(err, RosterError::Parse { .. }));
    }

    #[test]
    fn numeric_keys_become_identifiers() {
        let roster = PresentationRoster::from_yaml_str("42:\n  title: Answer\n").unwrap();
        assert_eq!(roster.get("42").map(|p| p.title.as_str()), Some("Answer"));
    }
}
