use crate::{key_to_string, RosterError};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

/// Group names in lookup priority order.
pub const SPEAKER_GROUPS: [&str; 2] = ["keynotes", "speakers"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Speaker {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerGroup {
    pub name: String,
    pub speakers: Vec<Speaker>,
}

/// Speakers partitioned into named groups, kept in [`SPEAKER_GROUPS`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeakerRoster {
    groups: Vec<SpeakerGroup>,
}

#[derive(Default, Deserialize)]
struct RawSpeaker {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl SpeakerRoster {
    /// Build a roster from groups already in priority order.
    pub fn from_groups(groups: Vec<SpeakerGroup>) -> Self {
        Self { groups }
    }

    /// Parse a speaker document.
    ///
    /// ```
    /// use blogtag_roster::SpeakerRoster;
    ///
    /// let roster = SpeakerRoster::from_yaml_str(r#"
    /// keynotes:
    ///   matz: { id: matz, name: Yukihiro Matsumoto }
    /// speakers:
    ///   ko1: { id: ko1, name: Koichi Sasada }
    /// "#).unwrap();
    ///
    /// assert_eq!(roster.resolve_name("ko1"), Some("Koichi Sasada"));
    /// assert_eq!(roster.resolve_name("nobody"), None);
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RosterError> {
        const TARGET: &str = "speaker roster";
        let doc: Value = serde_yaml::from_str(yaml).map_err(|source| RosterError::Parse {
            target: TARGET.into(),
            source,
        })?;
        let top = match doc {
            Value::Null => Mapping::new(),
            Value::Mapping(m) => m,
            other => {
                return Err(RosterError::Shape {
                    target: TARGET.into(),
                    message: format!("expected a mapping at top level, got {}", kind(&other)),
                });
            }
        };

        let mut groups = Vec::with_capacity(SPEAKER_GROUPS.len());
        for group in SPEAKER_GROUPS {
            let entries = match top.get(group) {
                None | Some(Value::Null) => Mapping::new(),
                Some(Value::Mapping(m)) => m.clone(),
                Some(other) => {
                    return Err(RosterError::Shape {
                        target: TARGET.into(),
                        message: format!("group `{group}` must be a mapping, got {}", kind(other)),
                    });
                }
            };

            let mut speakers = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                let key = key_to_string(&key).ok_or_else(|| RosterError::Shape {
                    target: TARGET.into(),
                    message: format!("non-scalar key in group `{group}`"),
                })?;
                // `ko1:` with no body is a speaker known only by key.
                let raw: RawSpeaker = if value.is_null() {
                    RawSpeaker::default()
                } else {
                    serde_yaml::from_value(value).map_err(|source| RosterError::Parse {
                        target: format!("{TARGET} entry `{key}`"),
                        source,
                    })?
                };
                speakers.push(Speaker {
                    id: raw.id.unwrap_or(key),
                    name: raw.name.unwrap_or_default(),
                });
            }
            tracing::debug!(group, count = speakers.len(), "roster.speakers.group");
            groups.push(SpeakerGroup {
                name: group.to_string(),
                speakers,
            });
        }

        Ok(Self { groups })
    }

    /// First speaker with `id`, searching groups in priority order.
    pub fn find(&self, id: &str) -> Option<&Speaker> {
        self.groups
            .iter()
            .flat_map(|g| g.speakers.iter())
            .find(|s| s.id == id)
    }

    /// Display name for `id`, or `None` when no group contains it.
    pub fn resolve_name(&self, id: &str) -> Option<&str> {
        self.find(id).map(|s| s.name.as_str())
    }

    pub fn groups(&self) -> &[SpeakerGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.speakers.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keynote_group_wins_on_duplicate_id() {
        let roster = SpeakerRoster::from_yaml_str(
            r#"
speakers:
  dup: { id: dup, name: Regular Name }
keynotes:
  dup: { id: dup, name: Keynote Name }
"#,
        )
        .unwrap();
        assert_eq!(roster.resolve_name("dup"), Some("Keynote Name"));
        assert_eq!(roster.groups()[0].name, "keynotes");
    }

    #[test]
    fn missing_group_is_empty() {
        let roster =
            SpeakerRoster::from_yaml_str("speakers:\n  a: { id: a, name: Alice }\n").unwrap();
        assert!(roster.groups()[0].speakers.is_empty());
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn entry_without_id_uses_key() {
        let roster = SpeakerRoster::from_yaml_str("keynotes:\n  tenderlove:\n    name: Aaron\n")
            .unwrap();
        assert_eq!(roster.resolve_name("tenderlove"), Some("Aaron"));
    }

    #[test]
    fn entry_order_is_preserved() {
        let roster = SpeakerRoster::from_yaml_str(
            "speakers:\n  zed: { name: Z }\n  amy: { name: A }\n  mia: { name: M }\n",
        )
        .unwrap();
        let ids: Vec<_> = roster.groups()[1]
            .speakers
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, ["zed", "amy", "mia"]);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let roster = SpeakerRoster::from_yaml_str(
            "speakers:\n  a:\n    id: a\n    name: Alice\n    github_id: alice\n    bio: hi\n",
        )
        .unwrap();
        assert_eq!(roster.resolve_name("a"), Some("Alice"));
    }

    #[test]
    fn bare_entry_and_null_name_load_with_empty_name() {
        let roster = SpeakerRoster::from_yaml_str(
            "keynotes:\n  ko1:\nspeakers:\n  a: { id: a, name: ~ }\n  b: { id: b, name: Bob }\n",
        )
        .unwrap();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.resolve_name("ko1"), Some(""));
        assert_eq!(roster.resolve_name("a"), Some(""));
        assert_eq!(roster.resolve_name("b"), Some("Bob"));
    }

    #[test]
    fn empty_document_is_empty_roster() {
        assert!(SpeakerRoster::from_yaml_str("").unwrap().is_empty());
    }

    #[test]
    fn sequence_document_is_rejected() {
        let err = SpeakerRoster::from_yaml_str("- a\n- b\n").unwrap_err();
        assert!(matches!(err, RosterError::Shape { .. }));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let err = SpeakerRoster::from_yaml_str("speakers: [unterminated").unwrap_err();
        assert!(matches!(err, RosterError::Parse { .. }));
    }
}
