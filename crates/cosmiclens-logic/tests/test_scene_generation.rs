//! Integration tests for scene generation.
//!
//! Exercises: SceneParams → generate_scene → Scene, across grid shapes and
//! seeds, checking placement bounds, name cycling and reproducibility.

use std::collections::HashSet;

use cosmiclens_logic::kinds::CosmicKind;
use cosmiclens_logic::random::ScriptedRandom;
use cosmiclens_logic::scene::{generate_scene, Scene, SceneParams};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Helpers ────────────────────────────────────────────────────────────

fn seeded(seed: u64, params: &SceneParams) -> Scene {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_scene(params, &mut rng)
}

fn grids() -> Vec<SceneParams> {
    vec![
        SceneParams::default(),
        SceneParams::new(1, 1, 1.0),
        SceneParams::new(3, 7, 0.5),
        SceneParams::new(20, 20, 0.9),
        SceneParams::new(13, 1, 1.0),
    ]
}

// ── Placement ──────────────────────────────────────────────────────────

#[test]
fn entity_count_never_exceeds_cells() {
    for params in grids() {
        for seed in 0..20 {
            let scene = seeded(seed, &params);
            assert!(
                scene.len() <= params.cell_count(),
                "{} entities for {} cells",
                scene.len(),
                params.cell_count()
            );
        }
    }
}

#[test]
fn positions_stay_inside_padded_cells() {
    for params in grids() {
        for seed in 0..20 {
            for e in &seeded(seed, &params).entities {
                let (col, row) = e.cell;
                assert!(col < params.columns && row < params.rows);
                let (min_x, min_y, max_x, max_y) = params.inner_rect(col, row);
                assert!(
                    e.position.x > min_x && e.position.x < max_x,
                    "x={} outside ({min_x}, {max_x})",
                    e.position.x
                );
                assert!(
                    e.position.y > min_y && e.position.y < max_y,
                    "y={} outside ({min_y}, {max_y})",
                    e.position.y
                );

                // Strictly away from the cell boundary itself.
                let left = col as f64 * params.cell_width();
                let right = left + params.cell_width();
                assert!(e.position.x > left && e.position.x < right);
                assert!((0.0..=100.0).contains(&e.position.x));
                assert!((0.0..=100.0).contains(&e.position.y));
            }
        }
    }
}

#[test]
fn extreme_samples_stay_strictly_inside() {
    // All-zero and all-one scripts push every jitter to its limit.
    for params in grids() {
        for sample in [0.0, 1.0] {
            let scene = generate_scene(&params, &mut ScriptedRandom::new([sample]));
            for e in &scene.entities {
                let (min_x, min_y, max_x, max_y) = params.inner_rect(e.cell.0, e.cell.1);
                assert!(e.position.x > min_x && e.position.x < max_x, "{:?}", e);
                assert!(e.position.y > min_y && e.position.y < max_y, "{:?}", e);
            }
        }
    }
}

#[test]
fn at_most_one_entity_per_cell() {
    let params = SceneParams::new(10, 10, 1.0);
    let scene = seeded(3, &params);
    let cells: HashSet<_> = scene.entities.iter().map(|e| e.cell).collect();
    assert_eq!(cells.len(), scene.len());
    // Full occupancy fills every cell.
    assert_eq!(scene.len(), 100);
}

#[test]
fn magnitude_and_tint_follow_kind() {
    let scene = seeded(11, &SceneParams::new(20, 20, 1.0));
    for e in &scene.entities {
        let (lo, hi) = e.kind.magnitude_range();
        if hi > lo {
            assert!(e.magnitude >= lo && e.magnitude < hi, "{:?}", e);
        } else {
            assert_eq!(e.magnitude, lo);
        }
        assert!(e.kind.palette().contains(&e.tint), "{:?}", e);
    }
}

// ── Identity & naming ──────────────────────────────────────────────────

#[test]
fn ids_are_unique_and_sequential() {
    let scene = seeded(5, &SceneParams::new(12, 12, 0.7));
    for (i, e) in scene.entities.iter().enumerate() {
        assert_eq!(e.id.0 as usize, i);
    }
}

#[test]
fn names_cycle_per_kind_in_creation_order() {
    let scene = seeded(42, &SceneParams::new(25, 25, 1.0));
    for kind in CosmicKind::ALL {
        let pool = kind.name_pool();
        let of_kind: Vec<_> = scene.entities.iter().filter(|e| e.kind == kind).collect();
        // 625 cells guarantees every pool wraps at least once.
        assert!(of_kind.len() > pool.len(), "{kind}: only {}", of_kind.len());
        for (i, e) in of_kind.iter().enumerate() {
            assert_eq!(e.display_name, pool[i % pool.len()], "{kind} #{i}");
        }
    }
}

#[test]
fn eleventh_star_reuses_first_name() {
    // Eleven occupied cells, all stars: occupancy 0.0, kind 0.0, then jitter,
    // magnitude and tint draws at 0.0 as well.
    let params = SceneParams::new(11, 1, 1.0);
    let mut rng = ScriptedRandom::new([0.0]);
    let scene = generate_scene(&params, &mut rng);

    assert_eq!(scene.len(), 11);
    assert!(scene.entities.iter().all(|e| e.kind == CosmicKind::Star));
    assert_eq!(scene.entities[10].display_name, "Distant Star");
    assert_eq!(scene.entities[9].display_name, "Canopus");
}

// ── Reproducibility ────────────────────────────────────────────────────

#[test]
fn same_seed_same_scene() {
    let params = SceneParams::default();
    assert_eq!(seeded(99, &params), seeded(99, &params));
}

#[test]
fn repeated_generation_restarts_name_cycle() {
    // Name counters belong to one pass; a second pass starts from the top.
    let params = SceneParams::new(1, 1, 1.0);
    let first = generate_scene(&params, &mut ScriptedRandom::new([0.0]));
    let second = generate_scene(&params, &mut ScriptedRandom::new([0.0]));
    assert_eq!(first.entities[0].display_name, "Distant Star");
    assert_eq!(second.entities[0].display_name, "Distant Star");
    assert_eq!(second.entities[0].id, first.entities[0].id);
}

#[test]
fn kinds_are_roughly_uniform() {
    let scene = seeded(2024, &SceneParams::new(40, 40, 1.0));
    let expected = scene.len() as f64 / CosmicKind::COUNT as f64;
    for kind in CosmicKind::ALL {
        let n = scene.count_of(kind) as f64;
        assert!(
            (n - expected).abs() < expected * 0.25,
            "{kind}: {n} vs expected {expected}"
        );
    }
}

#[test]
fn scene_serializes_to_json() {
    let scene = seeded(1, &SceneParams::new(2, 2, 1.0));
    let json = serde_json::to_string(&scene).unwrap();
    let back: Scene = serde_json::from_str(&json).unwrap();
    assert_eq!(back.len(), scene.len());
    for (a, b) in back.entities.iter().zip(&scene.entities) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.tint, b.tint);
        assert_eq!(a.display_name, b.display_name);
        assert!((a.position.x - b.position.x).abs() < 1e-9);
    }
    assert!(json.contains("\"kind\":\""));
}
