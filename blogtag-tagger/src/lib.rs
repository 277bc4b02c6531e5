//! Speaker tagging for article text.
//!
//! Each presentation contributes one case-insensitive matcher built from its
//! identifier, its speaker's display name and its title. Every field is
//! matched literally and at substring level, so a title fragment inside a
//! longer word still counts. An article is tagged with the speaker name of
//! every presentation whose matcher hits, in presentation roster order.
//!
//! ```
//! use blogtag_roster::{PresentationRoster, SpeakerRoster};
//! use blogtag_tagger::extract_tags;
//!
//! let speakers = SpeakerRoster::from_yaml_str("keynotes:\n  sp1: { id: sp1, name: Jane Doe }\n").unwrap();
//! let talks = PresentationRoster::from_yaml_str(
//!     "kn1:\n  title: Keynote Talk\n  speakers:\n    - id: sp1\n",
//! ).unwrap();
//!
//! let tags = extract_tags("We enjoyed the Keynote Talk very much.", &talks, &speakers).unwrap();
//! assert_eq!(tags, ["Jane Doe"]);
//! ```

use blogtag_roster::{PresentationRoster, SpeakerRoster};
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("cannot build matcher for presentation `{presentation}`: {source}")]
    Pattern {
        presentation: String,
        #[source]
        source: regex::Error,
    },
}

/// How repeated speaker names are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagPolicy {
    /// Drop later repeats of a name, keeping the first occurrence's position.
    pub dedup: bool,
}

/// One presentation that matched an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch {
    pub presentation_id: String,
    /// Speaker display name; empty when the speaker id did not resolve.
    pub tag: String,
}

#[derive(Debug)]
struct Matcher {
    presentation_id: String,
    tag: String,
    // None when the presentation has nothing to match on.
    pattern: Option<Regex>,
}

/// Matchers compiled once for a pair of rosters, reusable across articles.
#[derive(Debug)]
pub struct TagExtractor {
    matchers: Vec<Matcher>,
    policy: TagPolicy,
}

impl TagExtractor {
    pub fn new(
        presentations: &PresentationRoster,
        speakers: &SpeakerRoster,
        policy: TagPolicy,
    ) -> Result<Self, TagError> {
        let mut matchers = Vec::with_capacity(presentations.len());
        for p in presentations {
            let name = speakers.resolve_name(&p.speaker_id);
            if name.is_none() {
                tracing::debug!(
                    presentation = %p.id,
                    speaker = %p.speaker_id,
                    "tagger.speaker_unresolved"
                );
            }
            let pattern = match alternation(&[Some(p.id.as_str()), name, Some(p.title.as_str())]) {
                Some(alt) => Some(
                    RegexBuilder::new(&alt)
                        .case_insensitive(true)
                        .build()
                        .map_err(|source| TagError::Pattern {
                            presentation: p.id.clone(),
                            source,
                        })?,
                ),
                None => None,
            };
            matchers.push(Matcher {
                presentation_id: p.id.clone(),
                tag: name.unwrap_or_default().to_string(),
                pattern,
            });
        }
        Ok(Self { matchers, policy })
    }

    /// Every matching presentation, in roster order. Ignores the dedup policy.
    pub fn matches(&self, text: &str) -> Vec<TagMatch> {
        if text.is_empty() {
            return Vec::new();
        }
        self.matchers
            .iter()
            .filter(|m| m.pattern.as_ref().is_some_and(|re| re.is_match(text)))
            .map(|m| TagMatch {
                presentation_id: m.presentation_id.clone(),
                tag: m.tag.clone(),
            })
            .collect()
    }

    /// Tags for `text`, in roster order, with the dedup policy applied.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let tags = self.matches(text).into_iter().map(|m| m.tag);
        if !self.policy.dedup {
            return tags.collect();
        }
        let mut seen = HashSet::new();
        tags.filter(|t| seen.insert(t.clone())).collect()
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

/// One-shot tagging with the default policy (duplicates kept).
pub fn extract_tags(
    text: &str,
    presentations: &PresentationRoster,
    speakers: &SpeakerRoster,
) -> Result<Vec<String>, TagError> {
    Ok(TagExtractor::new(presentations, speakers, TagPolicy::default())?.extract(text))
}

/// Escaped `a|b|c` over the non-empty candidates; `None` if all are empty.
fn alternation(candidates: &[Option<&str>]) -> Option<String> {
    let parts: Vec<String> = candidates
        .iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .map(|s| regex::escape(s))
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternation_skips_absent_and_empty() {
        assert_eq!(
            alternation(&[Some("kn1"), None, Some("Talk")]).as_deref(),
            Some("kn1|Talk")
        );
        assert_eq!(alternation(&[Some(""), None, Some("")]), None);
    }

    #[test]
    fn alternation_escapes_metacharacters() {
        assert_eq!(
            alternation(&[Some("a.b"), Some("C++ (fast)")]).as_deref(),
            Some(r"a\.b|C\+\+ \(fast\)")
        );
    }
}
