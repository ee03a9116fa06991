//! Scene generation: procedural placement of cosmic objects on a grid.
//!
//! The canvas is split into `columns × rows` equal cells. Each cell is
//! independently occupied with probability `occupancy`; an occupied cell gets
//! one entity of a uniformly chosen kind, jittered inside the cell's padded
//! inner rectangle so it never touches a cell edge.
//!
//! Per occupied cell the random source is sampled in a fixed order:
//! occupancy, kind, x, y, then magnitude (kinds with a size range only) and
//! tint (kinds with more than one palette entry only).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kinds::{CosmicKind, Tint};
use crate::random::RandomSource;

/// Extent of the normalized scene space on each axis.
pub const SCENE_EXTENT: f64 = 100.0;

/// Fraction of the inner rectangle kept clear at each end of the jitter range.
const JITTER_MARGIN: f64 = 1e-6;

/// Grid layout and placement parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneParams {
    pub columns: u32,
    pub rows: u32,
    /// Chance that a cell receives an entity, `0.0..=1.0`.
    pub occupancy: f64,
    /// Inset on each side of a cell, as a fraction of the cell size (`0.0..0.5`).
    /// Clamped into that range when the rectangle is computed.
    pub padding: f64,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            columns: 8,
            rows: 5,
            occupancy: 0.9,
            padding: 0.15,
        }
    }
}

impl SceneParams {
    pub fn new(columns: u32, rows: u32, occupancy: f64) -> Self {
        Self {
            columns,
            rows,
            occupancy,
            ..Self::default()
        }
    }

    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn cell_width(&self) -> f64 {
        if self.columns == 0 {
            0.0
        } else {
            SCENE_EXTENT / self.columns as f64
        }
    }

    pub fn cell_height(&self) -> f64 {
        if self.rows == 0 {
            0.0
        } else {
            SCENE_EXTENT / self.rows as f64
        }
    }

    /// Padded inner rectangle of a cell: `(min_x, min_y, max_x, max_y)`.
    pub fn inner_rect(&self, column: u32, row: u32) -> (f64, f64, f64, f64) {
        let (w, h) = (self.cell_width(), self.cell_height());
        let padding = self.padding.clamp(0.0, 0.5);
        let (pad_x, pad_y) = (w * padding, h * padding);
        let left = column as f64 * w;
        let top = row as f64 * h;
        (left + pad_x, top + pad_y, left + w - pad_x, top + h - pad_y)
    }
}

/// Unique identifier of an entity within one scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj-{}", self.0)
    }
}

impl EntityId {
    /// Parse `obj-<n>` or a bare number.
    pub fn parse(s: &str) -> Option<EntityId> {
        let s = s.trim();
        s.strip_prefix("obj-").unwrap_or(s).parse().ok().map(EntityId)
    }
}

/// Position in scene percentages, both axes in `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// One placed cosmic object. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: CosmicKind,
    pub position: Position,
    pub magnitude: f64,
    pub tint: Tint,
    pub display_name: String,
    /// Grid cell the entity was placed in, `(column, row)`.
    pub cell: (u32, u32),
}

/// Per-kind count of names handed out so far.
///
/// Owned by a single generation pass, so repeated passes are independent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameCursor {
    used: [usize; CosmicKind::COUNT],
}

impl NameCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next name for `kind`: the `i`-th of that kind gets `pool[i % len]`.
    pub fn next_name(&mut self, kind: CosmicKind) -> &'static str {
        let pool = kind.name_pool();
        let slot = &mut self.used[kind.index()];
        let name = pool[*slot % pool.len()];
        *slot += 1;
        name
    }

    /// How many entities of `kind` have been named.
    pub fn used(&self, kind: CosmicKind) -> usize {
        self.used[kind.index()]
    }
}

/// A generated scene: the entity batch plus the parameters that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub params: SceneParams,
    pub entities: Vec<Entity>,
}

impl Scene {
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// First entity carrying `name`, case-insensitively.
    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        let wanted = name.trim();
        self.entities
            .iter()
            .find(|e| e.display_name.eq_ignore_ascii_case(wanted))
    }

    /// Entity nearest to `point`, if any lies within `radius`.
    pub fn hit_test(&self, point: Position, radius: f64) -> Option<&Entity> {
        let r2 = radius * radius;
        self.entities
            .iter()
            .map(|e| (e, e.position.distance_squared(&point)))
            .filter(|(_, d)| *d <= r2)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(e, _)| e)
    }

    pub fn count_of(&self, kind: CosmicKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }
}

/// Uniform point strictly between `min` and `max`; never either endpoint.
fn jitter(rng: &mut impl RandomSource, min: f64, max: f64) -> f64 {
    let t = JITTER_MARGIN + rng.next_unit() * (1.0 - 2.0 * JITTER_MARGIN);
    min + t * (max - min)
}

/// Generate a scene from grid parameters.
///
/// Cells are visited row by row. Never fails: a zero-sized grid yields an
/// empty scene, and name pools wrap instead of running out.
pub fn generate_scene(params: &SceneParams, rng: &mut impl RandomSource) -> Scene {
    let expected = params.cell_count() as f64 * params.occupancy.clamp(0.0, 1.0);
    let mut entities = Vec::with_capacity(expected.ceil() as usize);
    let mut names = NameCursor::new();
    let mut next_id = 0u32;

    for row in 0..params.rows {
        for column in 0..params.columns {
            if rng.next_unit() >= params.occupancy {
                continue;
            }

            let kind = CosmicKind::ALL[rng.pick(CosmicKind::COUNT)];

            let (min_x, min_y, max_x, max_y) = params.inner_rect(column, row);
            let position = Position::new(jitter(rng, min_x, max_x), jitter(rng, min_y, max_y));

            let (lo, hi) = kind.magnitude_range();
            let magnitude = if hi > lo { rng.between(lo, hi) } else { lo };

            let palette = kind.palette();
            let tint = if palette.len() > 1 {
                palette[rng.pick(palette.len())]
            } else {
                palette[0]
            };

            entities.push(Entity {
                id: EntityId(next_id),
                kind,
                position,
                magnitude,
                tint,
                display_name: names.next_name(kind).to_string(),
                cell: (column, row),
            });
            next_id += 1;
        }
    }

    log::info!(
        "Generated scene: {} entities on a {}x{} grid",
        entities.len(),
        params.columns,
        params.rows
    );

    Scene {
        params: *params,
        entities,
    }
}
