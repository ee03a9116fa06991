//! Integration tests for fact resolution.
//!
//! Exercises: credential store → FactResolver → provider / offline archive,
//! with a scripted in-process provider standing in for the network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use cosmiclens_core::credentials::{CredentialStore, MemoryCredentials};
use cosmiclens_core::provider::{
    Citation, FactProvider, GenerateRequest, GenerateResponse, ProviderError,
};
use cosmiclens_core::resolver::FactResolver;
use cosmiclens_logic::fact::{Outcome, Source};
use cosmiclens_logic::kinds::CosmicKind;

const KEY: &str = "test-key-0123456789";

// ── Mock provider ──────────────────────────────────────────────────────

struct MockProvider {
    reply: Result<GenerateResponse, ProviderError>,
    calls: AtomicUsize,
    last: Mutex<Option<(String, GenerateRequest)>>,
}

impl MockProvider {
    fn replying(reply: Result<GenerateResponse, ProviderError>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> Option<(String, GenerateRequest)> {
        self.last.lock().unwrap().clone()
    }
}

impl FactProvider for MockProvider {
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some((api_key.to_string(), request.clone()));
        self.reply.clone()
    }
}

fn offline(provider: MockProvider) -> FactResolver<MockProvider, MemoryCredentials> {
    FactResolver::new(provider, MemoryCredentials::new()).with_offline_latency(Duration::ZERO)
}

fn online(provider: MockProvider) -> FactResolver<MockProvider, MemoryCredentials> {
    FactResolver::new(provider, MemoryCredentials::with_key(KEY))
        .with_offline_latency(Duration::ZERO)
}

fn unused() -> MockProvider {
    MockProvider::replying(Err(ProviderError::Transport("should not be called".into())))
}

// ── Offline path ───────────────────────────────────────────────────────

#[tokio::test]
async fn offline_entity_facts_are_always_complete() {
    let resolver = offline(unused());
    for kind in CosmicKind::ALL {
        for name in kind.name_pool().iter().copied().chain(["Nameless Thing", ""]) {
            let res = resolver.fact_for_entity(kind, name).await;
            assert_eq!(res.outcome, Outcome::OfflineMatched);
            assert!(res.fact.is_complete(), "{kind} {name:?}: {:?}", res.fact);
        }
    }
    assert_eq!(resolver.provider_calls(), 0);
}

#[tokio::test]
async fn offline_unknown_entity_is_retitled() {
    let resolver = offline(unused());
    let res = resolver
        .fact_for_entity(CosmicKind::Planet, "Kepler-Unknown")
        .await;
    assert_eq!(res.fact.title, "Kepler-Unknown (Simulation)");
}

#[tokio::test]
async fn offline_query_ignores_case() {
    let resolver = offline(unused());
    let a = resolver.fact_for_query("Boötes Void").await;
    let b = resolver.fact_for_query("BOÖTES VOID").await;
    let c = resolver.fact_for_query("  boötes void ").await;
    assert_eq!(a.outcome, Outcome::OfflineMatched);
    assert_eq!(a, b);
    assert_eq!(a, c);
}

#[tokio::test]
async fn offline_unknown_query_echoes_text() {
    let resolver = offline(unused());
    let res = resolver.fact_for_query("unknown random string").await;
    assert_eq!(res.outcome, Outcome::OfflineUnconfigured);
    assert!(res.fact.body.contains("unknown random string"));
    assert!(res.fact.sources.is_empty());
    assert!(res.fact.is_complete());
}

#[tokio::test(start_paused = true)]
async fn offline_latency_is_applied() {
    let resolver = FactResolver::new(unused(), MemoryCredentials::new())
        .with_offline_latency(Duration::from_millis(800));
    let start = tokio::time::Instant::now();
    resolver.fact_for_query("magnetar").await;
    assert!(start.elapsed() >= Duration::from_millis(800));
}

// ── Remote path ────────────────────────────────────────────────────────

#[tokio::test]
async fn remote_entity_fact_is_parsed() {
    let provider = MockProvider::replying(Ok(GenerateResponse::text(
        r#"{"title":"Sirius","content":"The brightest star in the night sky.","funFact":"It is a binary."}"#,
    )));
    let resolver = online(provider);
    let res = resolver.fact_for_entity(CosmicKind::Star, "Sirius").await;

    assert_eq!(res.outcome, Outcome::Remote);
    assert_eq!(res.fact.title, "Sirius");
    assert_eq!(res.fact.fun_fact, "It is a binary.");

    let (key, request) = resolver.last_request().unwrap();
    assert_eq!(key, KEY);
    assert!(request.response_schema.is_some());
    assert!(!request.grounding);
    assert!(request.prompt.contains("Sirius (STAR)"));
    assert_eq!(request.model, "gemini-2.5-flash");
}

#[tokio::test]
async fn remote_query_maps_citations() {
    let provider = MockProvider::replying(Ok(GenerateResponse::text("A vast empty region.")
        .with_citations(vec![
            Citation::new(Some("A"), Some("http://x")),
            Citation::new(None, Some("http://y")),
        ])));
    let resolver = online(provider);
    let res = resolver.fact_for_query("Boötes Void").await;

    assert_eq!(res.outcome, Outcome::Remote);
    assert_eq!(res.fact.title, "BOÖTES VOID");
    assert_eq!(res.fact.body, "A vast empty region.");
    assert_eq!(
        res.fact.sources,
        vec![Source::new("A", "http://x"), Source::new("Source", "http://y")]
    );

    let (_, request) = resolver.last_request().unwrap();
    assert!(request.grounding);
    assert!(request.response_schema.is_none());
}

#[tokio::test]
async fn remote_failure_becomes_error_fact() {
    let err = ProviderError::Status {
        status: 429,
        message: "Resource has been exhausted".into(),
    };
    let resolver = online(MockProvider::replying(Err(err)));

    let entity = resolver.fact_for_entity(CosmicKind::Nebula, "Orion Nebula").await;
    assert_eq!(entity.outcome, Outcome::RemoteTransportError);
    assert_eq!(entity.fact.title, "Uplink Error");
    assert!(entity.fact.body.contains("Resource has been exhausted"));
    assert!(entity.fact.is_complete());

    let query = resolver.fact_for_query("Encke Gap").await;
    assert_eq!(query.outcome, Outcome::RemoteTransportError);
    assert_eq!(query.fact.title, "Search Failed");
    assert!(query.fact.body.contains("Resource has been exhausted"));
    assert!(query.fact.body.contains("Encke Gap"));
    assert!(query.fact.sources.is_empty());

    assert_eq!(resolver.provider_calls(), 2);
}

#[tokio::test]
async fn undecodable_answer_is_a_parse_error() {
    let resolver = online(MockProvider::replying(Ok(GenerateResponse::text(
        "Sorry, I cannot answer in JSON.",
    ))));
    let res = resolver.fact_for_entity(CosmicKind::Planet, "Kepler-22b").await;
    assert_eq!(res.outcome, Outcome::RemoteParseError);
    assert_eq!(res.fact.title, "Uplink Error");
    assert!(res.outcome.is_error());
}

#[tokio::test]
async fn empty_answer_is_a_parse_error() {
    let resolver = online(MockProvider::replying(Ok(GenerateResponse::default())));
    let res = resolver.fact_for_query("Magnetar").await;
    assert_eq!(res.outcome, Outcome::RemoteParseError);
    assert_eq!(res.fact.title, "Search Failed");
}

#[tokio::test]
async fn archive_is_bypassed_when_online() {
    let resolver = online(MockProvider::replying(Ok(GenerateResponse::text("Remote."))));
    let res = resolver.fact_for_query("Magnetar").await;
    assert_eq!(res.outcome, Outcome::Remote);
    assert_eq!(res.fact.body, "Remote.");
}

// ── Credential changes ─────────────────────────────────────────────────

#[tokio::test]
async fn credential_changes_apply_to_next_resolution() {
    let provider = MockProvider::replying(Ok(GenerateResponse::text("Remote answer.")));
    let mut resolver = offline(provider);

    let before = resolver.fact_for_query("Oort Cloud").await;
    assert_eq!(before.outcome, Outcome::OfflineMatched);
    assert!(!resolver.has_credential());

    resolver.credentials_mut().write(KEY).unwrap();
    assert!(resolver.has_credential());
    let during = resolver.fact_for_query("Oort Cloud").await;
    assert_eq!(during.outcome, Outcome::Remote);

    resolver.credentials_mut().clear().unwrap();
    let after = resolver.fact_for_query("Oort Cloud").await;
    assert_eq!(after.outcome, Outcome::OfflineMatched);
    assert_eq!(before, after);
    assert_eq!(resolver.provider_calls(), 1);
}

#[tokio::test]
async fn implausible_key_stays_offline() {
    let resolver = FactResolver::new(unused(), MemoryCredentials::with_key("undefined"))
        .with_offline_latency(Duration::ZERO);
    let res = resolver.fact_for_query("anything").await;
    assert_eq!(res.outcome, Outcome::OfflineUnconfigured);
}

// ── Helpers on the resolver under test ─────────────────────────────────

trait MockAccess {
    fn provider_calls(&self) -> usize;
    fn last_request(&self) -> Option<(String, GenerateRequest)>;
}

impl MockAccess for FactResolver<MockProvider, MemoryCredentials> {
    fn provider_calls(&self) -> usize {
        self.provider().calls()
    }

    fn last_request(&self) -> Option<(String, GenerateRequest)> {
        self.provider().last_request()
    }
}
