//! Integration tests for the explorer session.
//!
//! Exercises: Explorer → scene / viewport / detail panel, with offline
//! resolution and an in-memory credential store.

use std::time::Duration;

use cosmiclens_core::credentials::{CredentialError, MemoryCredentials};
use cosmiclens_core::explorer::{Explorer, Subject, ViewState};
use cosmiclens_core::provider::{FactProvider, GenerateRequest, GenerateResponse, ProviderError};
use cosmiclens_core::resolver::FactResolver;
use cosmiclens_logic::fact::Outcome;
use cosmiclens_logic::scene::{EntityId, SceneParams};

struct EchoProvider;

impl FactProvider for EchoProvider {
    async fn generate(
        &self,
        _api_key: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, ProviderError> {
        if request.grounding {
            Ok(GenerateResponse::text("Grounded answer."))
        } else {
            Ok(GenerateResponse::text(
                r#"{"title":"Remote","content":"From the provider.","funFact":"Echo."}"#,
            ))
        }
    }
}

fn explorer(seed: u64) -> Explorer<EchoProvider, MemoryCredentials> {
    let resolver = FactResolver::new(EchoProvider, MemoryCredentials::new())
        .with_offline_latency(Duration::ZERO);
    Explorer::with_seed(SceneParams::new(6, 4, 1.0), resolver, Some(seed))
}

#[test]
fn seeded_sessions_match() {
    assert_eq!(explorer(8).scene(), explorer(8).scene());
    assert_eq!(explorer(8).scene().len(), 24);
}

#[test]
fn regenerate_replaces_scene() {
    let mut ex = explorer(1);
    let before = ex.scene().clone();
    ex.regenerate();
    assert_ne!(ex.scene(), &before);
    assert_eq!(ex.panel().state(), &ViewState::Exploring);
}

#[tokio::test]
async fn inspect_known_and_unknown_ids() {
    let ex = explorer(3);
    let first = ex.scene().entities[0].clone();
    let res = ex.inspect(first.id).await.unwrap();
    assert_eq!(res.outcome, Outcome::OfflineMatched);
    assert!(res.fact.is_complete());

    assert!(ex.inspect(EntityId(10_000)).await.is_none());
}

#[tokio::test]
async fn blank_search_is_ignored() {
    let mut ex = explorer(3);
    assert!(ex.search("   ").await.is_none());
    assert!(!ex.show_search("").await);
    assert_eq!(ex.panel().state(), &ViewState::Exploring);
}

#[tokio::test]
async fn show_search_fills_panel() {
    let mut ex = explorer(3);
    assert!(ex.show_search("Encke Gap").await);
    match ex.panel().state() {
        ViewState::ViewingDetails {
            subject,
            resolution,
        } => {
            assert_eq!(subject, &Subject::Query("Encke Gap".into()));
            assert_eq!(resolution.outcome, Outcome::OfflineMatched);
        }
        other => panic!("unexpected panel state {:?}", other),
    }
}

#[tokio::test]
async fn overlapping_lookups_keep_the_newest() {
    let mut ex = explorer(4);
    let id = ex.scene().entities[0].id;

    let older = ex.begin_entity(id).unwrap();
    let newer = ex.begin_search("Oort Cloud").unwrap();

    // Both lookups run concurrently against a shared borrow.
    let (entity_res, search_res) = tokio::join!(ex.inspect(id), ex.search("Oort Cloud"));
    let (entity_res, search_res) = (entity_res.unwrap(), search_res.unwrap());

    // The newer answer lands first; the older one arrives late and is dropped.
    assert!(ex.complete(newer, search_res.clone()));
    assert!(!ex.complete(older, entity_res));
    match ex.panel().state() {
        ViewState::ViewingDetails {
            subject,
            resolution,
        } => {
            assert_eq!(subject, &Subject::Query("Oort Cloud".into()));
            assert_eq!(resolution, &search_res);
        }
        other => panic!("unexpected panel state {:?}", other),
    }

    assert!(ex.begin_entity(EntityId(10_000)).is_none());
    assert!(ex.begin_search("  ").is_none());
}

#[tokio::test]
async fn saving_a_key_switches_to_remote() {
    let mut ex = explorer(5);
    let id = ex.scene().entities[0].id;

    assert!(matches!(
        ex.save_credential("short"),
        Err(CredentialError::Implausible)
    ));
    assert!(!ex.has_credential());

    ex.save_credential("abcdefghijklmnop").unwrap();
    assert!(ex.has_credential());
    assert!(ex.show_entity(id).await);
    assert_eq!(ex.panel().resolution().unwrap().outcome, Outcome::Remote);
    assert_eq!(ex.panel().resolution().unwrap().fact.title, "Remote");

    ex.clear_credential().unwrap();
    let res = ex.search("Magnetar").await.unwrap();
    assert_eq!(res.outcome, Outcome::OfflineMatched);
}

#[test]
fn entity_at_respects_viewport() {
    let mut ex = explorer(9);
    let target = ex.scene().entities[5].clone();

    let on_screen = ex.viewport().project(target.position);
    assert_eq!(ex.entity_at(on_screen).map(|e| e.id), Some(target.id));

    ex.viewport_mut().zoom_by(1.0);
    ex.viewport_mut().point_at(800.0, 200.0, 1000.0, 1000.0);
    let on_screen = ex.viewport().project(target.position);
    assert_eq!(ex.entity_at(on_screen).map(|e| e.id), Some(target.id));
}
