//! Fact payloads and how they were obtained.

use serde::{Deserialize, Serialize};

/// A cited web page backing a fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub label: String,
    pub url: String,
}

impl Source {
    /// Label used when a citation arrives without a title.
    pub const DEFAULT_LABEL: &'static str = "Source";
    /// Anchor used when a citation arrives without a URL.
    pub const DEFAULT_URL: &'static str = "#";

    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }

    /// Build a source from optional citation fields, filling placeholders.
    pub fn from_citation(label: Option<&str>, url: Option<&str>) -> Self {
        let pick = |v: Option<&str>, default: &str| {
            v.filter(|s| !s.trim().is_empty())
                .unwrap_or(default)
                .to_string()
        };
        Self {
            label: pick(label, Self::DEFAULT_LABEL),
            url: pick(url, Self::DEFAULT_URL),
        }
    }
}

/// Short descriptive payload shown after selecting an entity or searching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fact {
    pub title: String,
    pub body: String,
    pub fun_fact: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl Fact {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        fun_fact: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            fun_fact: fun_fact.into(),
            sources: Vec::new(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// True when title, body and fun fact all carry text.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.body.trim().is_empty()
            && !self.fun_fact.trim().is_empty()
    }
}

/// How a fact was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// No credential; served from the offline archive.
    OfflineMatched,
    /// No credential and no archive entry for a free-text query.
    OfflineUnconfigured,
    /// Credential present; the provider answered.
    Remote,
    /// Credential present; the call failed before a response arrived.
    RemoteTransportError,
    /// Credential present; the response could not be decoded.
    RemoteParseError,
}

impl Outcome {
    pub fn is_remote(self) -> bool {
        matches!(
            self,
            Outcome::Remote | Outcome::RemoteTransportError | Outcome::RemoteParseError
        )
    }

    pub fn is_error(self) -> bool {
        matches!(
            self,
            Outcome::RemoteTransportError | Outcome::RemoteParseError
        )
    }
}

/// A resolved fact together with its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub fact: Fact,
    pub outcome: Outcome,
}

impl Resolution {
    pub fn new(fact: Fact, outcome: Outcome) -> Self {
        Self { fact, outcome }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citation_placeholders() {
        let s = Source::from_citation(None, Some("http://y"));
        assert_eq!(s.label, "Source");
        assert_eq!(s.url, "http://y");

        let s = Source::from_citation(Some("A"), None);
        assert_eq!(s.label, "A");
        assert_eq!(s.url, "#");

        let s = Source::from_citation(Some("  "), Some(""));
        assert_eq!(s, Source::new("Source", "#"));
    }

    #[test]
    fn test_fact_serializes_camel_case() {
        let fact = Fact::new("T", "B", "F");
        let json = serde_json::to_value(&fact).unwrap();
        assert_eq!(json["funFact"], "F");
        assert!(json["sources"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_is_complete() {
        assert!(Fact::new("T", "B", "F").is_complete());
        assert!(!Fact::new("T", " ", "F").is_complete());
    }

    #[test]
    fn test_outcome_classes() {
        assert!(!Outcome::OfflineMatched.is_remote());
        assert!(Outcome::Remote.is_remote());
        assert!(!Outcome::Remote.is_error());
        assert!(Outcome::RemoteParseError.is_error());
    }
}
