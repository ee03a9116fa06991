//! Plain-text rendering of scenes and facts.

use std::fmt::Write;

use cosmiclens_logic::fact::{Outcome, Resolution};
use cosmiclens_logic::scene::Scene;

pub fn scene_table(scene: &Scene) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "=== {} objects on a {}x{} grid ===",
        scene.len(),
        scene.params.columns,
        scene.params.rows
    );
    for e in &scene.entities {
        let _ = writeln!(
            out,
            "{:<8} {:<11} {:<24} ({:5.1}, {:5.1})  size {:4.1}  {}",
            e.id.to_string(),
            e.kind.label(),
            e.display_name,
            e.position.x,
            e.position.y,
            e.magnitude,
            e.tint
        );
    }
    out
}

fn outcome_note(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::OfflineMatched => "offline archive",
        Outcome::OfflineUnconfigured => "offline, no API key",
        Outcome::Remote => "live",
        Outcome::RemoteTransportError => "uplink failed",
        Outcome::RemoteParseError => "unreadable reply",
    }
}

pub fn resolution(resolution: &Resolution) -> String {
    let fact = &resolution.fact;
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===  [{}]", fact.title, outcome_note(resolution.outcome));
    let _ = writeln!(out, "{}", fact.body);
    let _ = writeln!(out);
    let _ = writeln!(out, "Fun fact: {}", fact.fun_fact);
    if !fact.sources.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Sources:");
        for source in &fact.sources {
            let _ = writeln!(out, "  - {} <{}>", source.label, source.url);
        }
    }
    out
}
