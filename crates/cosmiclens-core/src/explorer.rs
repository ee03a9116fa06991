//! Explorer session: scene, viewport, detail panel and resolver together.
//!
//! The panel follows a simple state machine:
//!
//! ```text
//! Exploring ──begin──▶ Loading ──complete(latest)──▶ ViewingDetails
//!     ▲                   │                               │
//!     └──────close────────┴──────────────close────────────┘
//! ```
//!
//! Every `begin` issues a fresh [`Ticket`]. Only the most recent ticket may
//! complete the panel, so a slow answer never overwrites a newer one.
//!
//! [`Explorer::show_entity`] and [`Explorer::show_search`] borrow the session
//! mutably for the whole request, so they never overlap each other. Callers
//! that run lookups concurrently use [`Explorer::begin_entity`] /
//! [`Explorer::begin_search`], resolve through [`Explorer::inspect`] /
//! [`Explorer::search`], and hand the result to [`Explorer::complete`].

use cosmiclens_logic::fact::Resolution;
use cosmiclens_logic::scene::{generate_scene, Entity, EntityId, Position, Scene, SceneParams};
use cosmiclens_logic::viewport::Viewport;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::credentials::{CredentialError, CredentialStore};
use crate::provider::FactProvider;
use crate::resolver::FactResolver;

/// Hit radius, in scene percent, used when picking entities from the screen.
pub const PICK_RADIUS: f64 = 3.0;

/// Identifies one in-flight resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// What the detail panel is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Entity(EntityId),
    Query(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Exploring,
    Loading {
        ticket: Ticket,
        subject: Subject,
    },
    ViewingDetails {
        subject: Subject,
        resolution: Resolution,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DetailPanel {
    state: ViewState,
    issued: u64,
    latest: Option<Ticket>,
}

impl DetailPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading { .. })
    }

    /// Displayed resolution, if any.
    pub fn resolution(&self) -> Option<&Resolution> {
        match &self.state {
            ViewState::ViewingDetails { resolution, .. } => Some(resolution),
            _ => None,
        }
    }

    /// Start a new request, superseding any in flight.
    pub fn begin(&mut self, subject: Subject) -> Ticket {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        self.latest = Some(ticket);
        self.state = ViewState::Loading { ticket, subject };
        ticket
    }

    /// Deliver a result. Returns false (and changes nothing) for stale tickets.
    pub fn complete(&mut self, ticket: Ticket, resolution: Resolution) -> bool {
        if self.latest != Some(ticket) {
            log::debug!("Dropping stale result for ticket {:?}", ticket);
            return false;
        }
        let ViewState::Loading { subject, .. } = std::mem::take(&mut self.state) else {
            return false;
        };
        self.latest = None;
        self.state = ViewState::ViewingDetails {
            subject,
            resolution,
        };
        true
    }

    /// Back to exploring. Any in-flight ticket becomes stale.
    pub fn close(&mut self) {
        self.latest = None;
        self.state = ViewState::Exploring;
    }
}

/// One explorer session.
pub struct Explorer<P, C> {
    params: SceneParams,
    scene: Scene,
    viewport: Viewport,
    panel: DetailPanel,
    resolver: FactResolver<P, C>,
    rng: StdRng,
}

impl<P: FactProvider, C: CredentialStore> Explorer<P, C> {
    /// Start a session and generate the first scene.
    pub fn new(params: SceneParams, resolver: FactResolver<P, C>, mut rng: StdRng) -> Self {
        let scene = generate_scene(&params, &mut rng);
        Self {
            params,
            scene,
            viewport: Viewport::new(),
            panel: DetailPanel::new(),
            resolver,
            rng,
        }
    }

    /// Seeded session; `None` seeds from the OS.
    pub fn with_seed(params: SceneParams, resolver: FactResolver<P, C>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(params, resolver, rng)
    }

    /// Replace the scene wholesale and close the panel.
    pub fn regenerate(&mut self) -> &Scene {
        self.scene = generate_scene(&self.params, &mut self.rng);
        self.panel.close();
        &self.scene
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn params(&self) -> &SceneParams {
        &self.params
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn panel(&self) -> &DetailPanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut DetailPanel {
        &mut self.panel
    }

    pub fn resolver(&self) -> &FactResolver<P, C> {
        &self.resolver
    }

    /// Entity under a screen-space point, honouring the current viewport.
    pub fn entity_at(&self, screen: Position) -> Option<&Entity> {
        let radius = PICK_RADIUS / self.viewport.zoom;
        self.scene.hit_test(self.viewport.unproject(screen), radius)
    }

    /// Resolve the fact for an entity of the current scene.
    pub async fn inspect(&self, id: EntityId) -> Option<Resolution> {
        let entity = self.scene.get(id)?;
        Some(
            self.resolver
                .fact_for_entity(entity.kind, &entity.display_name)
                .await,
        )
    }

    /// Resolve a free-text search. Blank queries are ignored.
    pub async fn search(&self, query: &str) -> Option<Resolution> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        Some(self.resolver.fact_for_query(query).await)
    }

    /// Open the panel for an entity without resolving it yet.
    pub fn begin_entity(&mut self, id: EntityId) -> Option<Ticket> {
        self.scene.get(id)?;
        Some(self.panel.begin(Subject::Entity(id)))
    }

    /// Open the panel for a search without resolving it yet.
    pub fn begin_search(&mut self, query: &str) -> Option<Ticket> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        Some(self.panel.begin(Subject::Query(query.to_string())))
    }

    /// Deliver a result for a ticket. Stale tickets are dropped.
    pub fn complete(&mut self, ticket: Ticket, resolution: Resolution) -> bool {
        self.panel.complete(ticket, resolution)
    }

    /// Inspect an entity and show the result in the panel.
    pub async fn show_entity(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.scene.get(id) else {
            return false;
        };
        let (kind, name) = (entity.kind, entity.display_name.clone());
        let ticket = self.panel.begin(Subject::Entity(id));
        let resolution = self.resolver.fact_for_entity(kind, &name).await;
        self.complete(ticket, resolution)
    }

    /// Run a search and show the result in the panel.
    pub async fn show_search(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }
        let ticket = self.panel.begin(Subject::Query(query.to_string()));
        let resolution = self.resolver.fact_for_query(query).await;
        self.complete(ticket, resolution)
    }

    pub fn has_credential(&self) -> bool {
        self.resolver.has_credential()
    }

    /// Save an API key. The next resolution uses it.
    pub fn save_credential(&mut self, key: &str) -> Result<(), CredentialError> {
        self.resolver.credentials_mut().write(key).map_err(|e| {
            log::warn!("API key not saved: {}", e);
            e
        })
    }

    pub fn clear_credential(&mut self) -> Result<(), CredentialError> {
        self.resolver.credentials_mut().clear()
    }
}
