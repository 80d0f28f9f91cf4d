//! Individual layout forces.
//!
//! Every force is a pure accumulation pass `(nodes, ...) -> velocity deltas`
//! over the node slice, summed by the tick loop before one integration step.
//! Forces never mutate nodes, so each is unit-testable without replaying the
//! whole loop. Order of application does not matter.

use std::collections::HashMap;

use crate::config::ForceConfig;
use crate::graph::{Edge, EdgeType, Level, Node};

/// Velocity deltas per node, indexed like the node slice.
pub type Deltas = Vec<(f64, f64)>;

fn zeros(n: usize) -> Deltas {
    vec![(0.0, 0.0); n]
}

/// Guard distance against degenerate zero-length separations.
const MIN_DIST: f64 = 1e-6;

/// Size-derived visual radius used for collision clearance.
pub fn visual_radius(node: &Node, cfg: &ForceConfig) -> f64 {
    cfg.node_radius_base + cfg.node_radius_scale * node.size.max(0.0).sqrt()
}

/// Pull each node's polar radius toward its assigned ring while preserving
/// its current angle, so drag-driven angular movement persists and only
/// radius drift is corrected. Orphans (no target) and pinned nodes are
/// skipped.
pub fn ring_constraint(
    nodes: &[Node],
    center: (f64, f64),
    pinned: &HashMap<usize, (f64, f64)>,
    cfg: &ForceConfig,
    alpha: f64,
) -> Deltas {
    let mut out = zeros(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        if pinned.contains_key(&i) {
            continue;
        }
        let Some(target) = node.target else {
            continue;
        };
        let dx = node.x - center.0;
        let dy = node.y - center.1;
        let r = (dx * dx + dy * dy).sqrt();
        if r < MIN_DIST {
            // Sitting on the center: push outward along the target angle.
            let k = target.radius * cfg.ring_strength * alpha;
            out[i] = (target.angle.cos() * k, target.angle.sin() * k);
            continue;
        }
        let correction = (target.radius - r) * cfg.ring_strength * alpha;
        out[i] = (dx / r * correction, dy / r * correction);
    }
    out
}

/// Per-level scale-down for theme separation.
fn separation_scale(level: Level, cfg: &ForceConfig) -> f64 {
    match level {
        Level::Primary => 1.0,
        Level::Secondary => cfg.secondary_separation_scale,
        Level::Tertiary => cfg.tertiary_separation_scale,
    }
}

/// Extra repulsion between nodes parented to different themes, keeping
/// clustered subtrees visually distinct even when similarity edges pull
/// their strategies together. Scaled down heavily below the theme level;
/// orphans are skipped.
pub fn theme_separation(nodes: &[Node], cfg: &ForceConfig, alpha: f64) -> Deltas {
    let mut out = zeros(nodes.len());
    let cutoff = cfg.theme_separation_distance;
    for i in 0..nodes.len() {
        let Some(theme_i) = nodes[i].parent_theme else {
            continue;
        };
        for j in (i + 1)..nodes.len() {
            let Some(theme_j) = nodes[j].parent_theme else {
                continue;
            };
            if theme_i == theme_j {
                continue;
            }
            let dx = nodes[j].x - nodes[i].x;
            let dy = nodes[j].y - nodes[i].y;
            let d = (dx * dx + dy * dy).sqrt().max(MIN_DIST);
            if d >= cutoff {
                continue;
            }
            let scale = separation_scale(nodes[i].level, cfg)
                .min(separation_scale(nodes[j].level, cfg));
            let f = cfg.theme_separation_strength * scale * (1.0 - d / cutoff) * alpha / d;
            out[i].0 -= dx * f;
            out[i].1 -= dy * f;
            out[j].0 += dx * f;
            out[j].1 += dy * f;
        }
    }
    out
}

/// Pull unpinned nodes back toward their precomputed layout target. Off by
/// default in the ring layout (drags are sticky along the ring); the tick
/// loop only calls this when the config switch is on.
pub fn snap_back(
    nodes: &[Node],
    pinned: &HashMap<usize, (f64, f64)>,
    cfg: &ForceConfig,
    alpha: f64,
) -> Deltas {
    let mut out = zeros(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        if pinned.contains_key(&i) {
            continue;
        }
        let Some(target) = node.target else {
            continue;
        };
        out[i] = (
            (target.x - node.x) * cfg.snap_back_strength * alpha,
            (target.y - node.y) * cfg.snap_back_strength * alpha,
        );
    }
    out
}

/// Pairwise overlap resolution on size-derived visual radii plus margin.
/// Applies to every node, orphans included. Deliberately not alpha-scaled:
/// overlap removal must stay effective through cooldown so the settled
/// state is overlap-free.
pub fn collision(nodes: &[Node], cfg: &ForceConfig) -> Deltas {
    let mut out = zeros(nodes.len());
    for i in 0..nodes.len() {
        let ri = visual_radius(&nodes[i], cfg) + cfg.collision_margin / 2.0;
        for j in (i + 1)..nodes.len() {
            let rj = visual_radius(&nodes[j], cfg) + cfg.collision_margin / 2.0;
            let dx = nodes[j].x - nodes[i].x;
            let dy = nodes[j].y - nodes[i].y;
            let d = (dx * dx + dy * dy).sqrt();
            let clearance = ri + rj;
            if d >= clearance {
                continue;
            }
            let (ux, uy) = if d < MIN_DIST {
                // Coincident pair: separate along a fixed axis.
                (1.0, 0.0)
            } else {
                (dx / d, dy / d)
            };
            let push = (clearance - d) * cfg.collision_strength / 2.0;
            out[i].0 -= ux * push;
            out[i].1 -= uy * push;
            out[j].0 += ux * push;
            out[j].1 += uy * push;
        }
    }
    out
}

/// Spring stiffness per edge type. Hierarchy edges define the tree and stay
/// taut; similarity and related edges are rendered but exert negligible or
/// no layout force, so cross-theme links cannot distort the rings.
fn stiffness(edge: &Edge, cfg: &ForceConfig) -> f64 {
    match edge.kind {
        EdgeType::PartOfTheme | EdgeType::PartOfGoal => cfg.hierarchy_stiffness,
        EdgeType::SimilarContent => cfg.similarity_stiffness * edge.weight,
        EdgeType::RelatedTo => cfg.related_stiffness * edge.weight,
    }
}

/// Rest length for one edge. Hierarchy edges span adjacent rings, so their
/// rest follows the ring band gap and a taut edge does not fight the ring
/// constraint; same-ring and orphan edges fall back to the configured
/// distance. Constant per load (ring radii are fixed per level).
fn rest_length(a: &Node, b: &Node, cfg: &ForceConfig) -> f64 {
    match (a.target, b.target) {
        (Some(ta), Some(tb)) if (ta.radius - tb.radius).abs() > 1.0 => {
            (ta.radius - tb.radius).abs()
        }
        _ => cfg.link_distance,
    }
}

/// Spring force along edges toward each edge's rest distance.
///
/// Hierarchy springs are one-sided: the child (edge source) is pulled into
/// tautness, the parent does not move. A parent dragged around by its
/// children would get hauled off its own ring; the ring constraint would
/// then fight the tree instead of holding it. Peer edges (similar/related)
/// act on both ends.
pub fn link_springs(nodes: &[Node], edges: &[Edge], cfg: &ForceConfig, alpha: f64) -> Deltas {
    let mut out = zeros(nodes.len());
    for edge in edges {
        let k = stiffness(edge, cfg);
        if k == 0.0 {
            continue;
        }
        let a = &nodes[edge.source];
        let b = &nodes[edge.target];
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let d = (dx * dx + dy * dy).sqrt().max(MIN_DIST);
        let f = k * (d - rest_length(a, b, cfg)) * alpha / d;
        out[edge.source].0 += dx * f;
        out[edge.source].1 += dy * f;
        if !edge.kind.is_hierarchy() {
            out[edge.target].0 -= dx * f;
            out[edge.target].1 -= dy * f;
        }
    }
    out
}
