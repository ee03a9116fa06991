//! Pure scene and fact logic for CosmicLens.
//!
//! This crate holds everything that does not need a network, a runtime or a
//! renderer. Functions take plain data (and an injectable random source) and
//! return plain data, so every behaviour here is unit-testable.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`archive`] | Offline fact tables with layered fallback, suggested topics |
//! | [`fact`] | `Fact`, `Source`, resolution `Outcome` |
//! | [`kinds`] | The five cosmic kinds, their name pools, sizes and palettes |
//! | [`random`] | `RandomSource` abstraction and a scripted source for tests |
//! | [`scene`] | Grid-based procedural scene generation |
//! | [`viewport`] | Pan/zoom transform |

pub mod archive;
pub mod fact;
pub mod kinds;
pub mod random;
pub mod scene;
pub mod viewport;

pub use archive::{OfflineArchive, SUGGESTED_TOPICS};
pub use fact::{Fact, Outcome, Resolution, Source};
pub use kinds::{CosmicKind, Tint};
pub use random::{RandomSource, ScriptedRandom};
pub use scene::{generate_scene, Entity, EntityId, Position, Scene, SceneParams};
pub use viewport::Viewport;
