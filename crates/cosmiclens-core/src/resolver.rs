//! Fact resolution policy.
//!
//! Every call reads the credential once. Without a usable key the answer
//! comes from the [`OfflineArchive`] after an optional artificial delay.
//! With a key, exactly one provider call is made; any failure is folded into
//! an explanatory [`Fact`] so resolution itself never fails.

use std::time::Duration;

use cosmiclens_logic::archive::{normalize_query, OfflineArchive};
use cosmiclens_logic::fact::{Fact, Outcome, Resolution, Source};
use cosmiclens_logic::kinds::CosmicKind;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::credentials::CredentialStore;
use crate::gemini::DEFAULT_MODEL;
use crate::provider::{FactProvider, GenerateRequest, GenerateResponse, ProviderError};

/// Delay applied before answering from the offline archive by default.
pub const DEFAULT_OFFLINE_LATENCY: Duration = Duration::from_millis(800);

pub const ENTITY_ERROR_TITLE: &str = "Uplink Error";
pub const QUERY_ERROR_TITLE: &str = "Search Failed";
const ENTITY_ERROR_FUN_FACT: &str = "Even in the future, communication networks can go down.";
const QUERY_ERROR_FUN_FACT: &str = "Try simplifying your query or checking the ship's settings.";
const QUERY_FUN_FACT: &str = "Check the sources for more deep dives!";

/// Structured answer requested for entity facts.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityAnswer {
    title: String,
    content: String,
    fun_fact: String,
}

/// Schema sent alongside entity prompts.
pub fn entity_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "content": { "type": "STRING" },
            "funFact": { "type": "STRING" }
        },
        "required": ["title", "content", "funFact"]
    })
}

pub fn entity_prompt(kind: CosmicKind, name: &str) -> String {
    format!(
        "Tell me a fascinating, scientific, yet accessible fact about a generic {name} ({kind}) in space.\n\
         Keep it short (max 2-3 sentences).\n\
         Also provide a separate \"Mind-Blowing Fun Fact\".\n\
         Return strictly JSON."
    )
}

pub fn query_prompt(query: &str) -> String {
    format!(
        "You are an expert astronomer. The user is searching for \"{query}\".\n\
         Provide a concise explanation of this space phenomenon.\n\
         If it's a specific object (like Encke Gap, Bootes Void), explain what makes it unusual.\n\
         Include a \"Mind-Blowing Fun Fact\".\n\
         Use the Google Search tool to ensure accuracy if it is a specific real-world entity."
    )
}

/// Decode a structured entity answer.
pub fn parse_entity_answer(response: &GenerateResponse) -> Result<Fact, ProviderError> {
    let text = response
        .text
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or(ProviderError::EmptyResponse)?;
    let answer: EntityAnswer =
        serde_json::from_str(text).map_err(|e| ProviderError::Decode(e.to_string()))?;
    let fact = Fact::new(answer.title, answer.content, answer.fun_fact);
    if !fact.is_complete() {
        return Err(ProviderError::Decode(
            "answer is missing a title, content or fun fact".to_string(),
        ));
    }
    Ok(fact)
}

/// Build a grounded search fact from a free-text answer.
pub fn query_fact(query: &str, response: &GenerateResponse) -> Result<Fact, ProviderError> {
    let text = response
        .text
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or(ProviderError::EmptyResponse)?;
    let sources = response
        .citations
        .iter()
        .map(|c| Source::from_citation(c.title.as_deref(), c.uri.as_deref()))
        .collect();
    Ok(Fact::new(query.trim().to_uppercase(), text, QUERY_FUN_FACT).with_sources(sources))
}

pub fn entity_error_fact(err: &ProviderError) -> Fact {
    Fact::new(
        ENTITY_ERROR_TITLE,
        format!(
            "Connection to the Galactic AI failed. Please check your API quota or network connection. Error: {}",
            err
        ),
        ENTITY_ERROR_FUN_FACT,
    )
}

pub fn query_error_fact(query: &str, err: &ProviderError) -> Fact {
    Fact::new(
        QUERY_ERROR_TITLE,
        format!(
            "We could not complete your search for \"{}\" due to a transmission error: {}",
            query, err
        ),
        QUERY_ERROR_FUN_FACT,
    )
}

/// Resolves facts for entities and free-text queries.
pub struct FactResolver<P, C> {
    provider: P,
    credentials: C,
    archive: OfflineArchive,
    model: String,
    offline_latency: Duration,
}

impl<P: FactProvider, C: CredentialStore> FactResolver<P, C> {
    pub fn new(provider: P, credentials: C) -> Self {
        Self {
            provider,
            credentials,
            archive: OfflineArchive::builtin(),
            model: DEFAULT_MODEL.to_string(),
            offline_latency: DEFAULT_OFFLINE_LATENCY,
        }
    }

    pub fn with_archive(mut self, archive: OfflineArchive) -> Self {
        self.archive = archive;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_offline_latency(mut self, latency: Duration) -> Self {
        self.offline_latency = latency;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn archive(&self) -> &OfflineArchive {
        &self.archive
    }

    pub fn credentials(&self) -> &C {
        &self.credentials
    }

    pub fn credentials_mut(&mut self) -> &mut C {
        &mut self.credentials
    }

    pub fn has_credential(&self) -> bool {
        self.credentials.read().is_some()
    }

    /// Fact about a placed entity. Always complete.
    pub async fn fact_for_entity(&self, kind: CosmicKind, name: &str) -> Resolution {
        let Some(key) = self.credentials.read() else {
            self.offline_pause().await;
            log::debug!("Offline entity lookup: {} ({})", name, kind);
            return Resolution::new(self.archive.entity_fact(kind, name), Outcome::OfflineMatched);
        };

        let request = GenerateRequest::new(&self.model, entity_prompt(kind, name))
            .with_schema(entity_schema());
        let result = self
            .provider
            .generate(&key, &request)
            .await
            .and_then(|response| parse_entity_answer(&response));

        match result {
            Ok(fact) => Resolution::new(fact, Outcome::Remote),
            Err(err) => {
                log::error!("Entity fact for {} failed: {}", name, err);
                Resolution::new(entity_error_fact(&err), err.outcome())
            }
        }
    }

    /// Fact for a free-text search.
    pub async fn fact_for_query(&self, query: &str) -> Resolution {
        let Some(key) = self.credentials.read() else {
            self.offline_pause().await;
            return match self.archive.phenomenon(query) {
                Some(fact) => {
                    log::debug!("Offline archive hit for {:?}", normalize_query(query));
                    Resolution::new(fact, Outcome::OfflineMatched)
                }
                None => {
                    log::debug!("Offline archive miss for {:?}", normalize_query(query));
                    Resolution::new(
                        self.archive.unconfigured_fact(query),
                        Outcome::OfflineUnconfigured,
                    )
                }
            };
        };

        let request = GenerateRequest::new(&self.model, query_prompt(query)).with_grounding();
        let result = self
            .provider
            .generate(&key, &request)
            .await
            .and_then(|response| query_fact(query, &response));

        match result {
            Ok(fact) => Resolution::new(fact, Outcome::Remote),
            Err(err) => {
                log::error!("Search for {:?} failed: {}", query, err);
                Resolution::new(query_error_fact(query, &err), err.outcome())
            }
        }
    }

    async fn offline_pause(&self) {
        if !self.offline_latency.is_zero() {
            tokio::time::sleep(self.offline_latency).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Citation;

    #[test]
    fn test_parse_entity_answer() {
        let resp = GenerateResponse::text(
            r#"{"title":"Vega","content":"A bright star.","funFact":"It was the pole star."}"#,
        );
        let fact = parse_entity_answer(&resp).unwrap();
        assert_eq!(fact.title, "Vega");
        assert_eq!(fact.body, "A bright star.");
        assert_eq!(fact.fun_fact, "It was the pole star.");
        assert!(fact.sources.is_empty());
    }

    #[test]
    fn test_parse_entity_answer_rejects_bad_shapes() {
        assert_eq!(
            parse_entity_answer(&GenerateResponse::default()),
            Err(ProviderError::EmptyResponse)
        );
        assert!(matches!(
            parse_entity_answer(&GenerateResponse::text("not json")),
            Err(ProviderError::Decode(_))
        ));
        assert!(matches!(
            parse_entity_answer(&GenerateResponse::text(r#"{"title":"x"}"#)),
            Err(ProviderError::Decode(_))
        ));
        assert!(matches!(
            parse_entity_answer(&GenerateResponse::text(
                r#"{"title":"x","content":"","funFact":"f"}"#
            )),
            Err(ProviderError::Decode(_))
        ));
    }

    #[test]
    fn test_query_fact_fills_placeholders() {
        let resp = GenerateResponse::text("Answer.").with_citations(vec![
            Citation::new(Some("A"), Some("http://x")),
            Citation::new(None, Some("http://y")),
            Citation::new(Some("B"), None),
        ]);
        let fact = query_fact("  encke gap ", &resp).unwrap();
        assert_eq!(fact.title, "ENCKE GAP");
        assert_eq!(fact.fun_fact, QUERY_FUN_FACT);
        assert_eq!(
            fact.sources,
            vec![
                Source::new("A", "http://x"),
                Source::new("Source", "http://y"),
                Source::new("B", "#"),
            ]
        );
    }

    #[test]
    fn test_error_facts_embed_message() {
        let err = ProviderError::Transport("connection refused".into());
        let fact = entity_error_fact(&err);
        assert_eq!(fact.title, ENTITY_ERROR_TITLE);
        assert!(fact.body.contains("connection refused"));
        assert!(fact.is_complete());

        let fact = query_error_fact("magnetar", &err);
        assert_eq!(fact.title, QUERY_ERROR_TITLE);
        assert!(fact.body.contains("\"magnetar\""));
        assert!(fact.body.contains("connection refused"));
        assert!(fact.sources.is_empty());
    }

    #[test]
    fn test_prompts_mention_subject() {
        assert!(entity_prompt(CosmicKind::BlackHole, "Gargantua").contains("Gargantua (BLACK_HOLE)"));
        assert!(query_prompt("Oort Cloud").contains("\"Oort Cloud\""));
        assert_eq!(entity_schema()["required"][2], "funFact");
    }
}
