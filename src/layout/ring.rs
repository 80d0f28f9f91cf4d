//! Ring planning: sector shares become per-node targets and seed positions.

use super::sector::{allocate_sectors, AngularSector};
use super::Viewport;
use crate::config::LayoutConfig;
use crate::graph::{goals_of_theme, strategies_of_goal, Graph, Level, RingTarget};

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Angle for the `index`-th of `count` siblings inside a sector. A single
/// child is centered on the sector midpoint instead of distributed.
fn sibling_angle(sector: &AngularSector, index: usize, count: usize) -> f64 {
    if count <= 1 {
        sector.midpoint()
    } else {
        lerp(sector.start, sector.end, index as f64 / (count - 1) as f64)
    }
}

/// Assign every node its ring target and seed coordinates.
///
/// Radius per level is a configured fraction of the viewport extent, themes
/// outermost. Secondaries are indexed within their theme; tertiaries over
/// the flattened list of all strategies under the theme, not renumbered per
/// goal. Orphans receive no target and keep a deterministic off-center seed
/// so collision can separate them.
///
/// Runs before the simulator: every targeted node must have its ring and
/// angle fixed when the first tick fires.
pub fn plan_rings(graph: &mut Graph, viewport: Viewport, config: &LayoutConfig) {
    let (cx, cy) = viewport.center();
    let extent = viewport.extent(config.margin);

    let primaries = graph.level_indices(Level::Primary);
    let sectors = allocate_sectors(primaries.len(), config.min_gap_degrees);
    log::debug!(
        "Planning rings: {} themes over extent {:.1}",
        primaries.len(),
        extent
    );

    // Clear stale assignments; a full re-plan never reuses them.
    for node in graph.nodes_mut() {
        node.target = None;
        node.parent_theme = None;
        node.vx = 0.0;
        node.vy = 0.0;
    }

    for (&theme, sector) in primaries.iter().zip(&sectors) {
        place(graph, theme, theme, cx, cy, extent, sector.center, config);

        let goals = goals_of_theme(graph, theme);
        let goal_count = goals.len();

        // Flattened strategy ordering across all goals of this theme.
        let mut strategy_cursor = 0usize;
        let strategy_total: usize = goals
            .iter()
            .map(|&g| strategies_of_goal(graph, g).len())
            .sum();

        for (k, &goal) in goals.iter().enumerate() {
            let angle = sibling_angle(sector, k, goal_count);
            place(graph, goal, theme, cx, cy, extent, angle, config);

            for strategy in strategies_of_goal(graph, goal) {
                let angle = sibling_angle(sector, strategy_cursor, strategy_total);
                place(graph, strategy, theme, cx, cy, extent, angle, config);
                strategy_cursor += 1;
            }
        }
    }

    // Orphans: no target, but give coincident seeds a deterministic spread
    // so pairwise collision has a direction to work with.
    let orphan_count = graph
        .nodes()
        .iter()
        .filter(|n| n.target.is_none())
        .count();
    if orphan_count > 0 {
        log::debug!("{} orphan nodes excluded from ring constraints", orphan_count);
    }
    for (i, node) in graph.nodes_mut().iter_mut().enumerate() {
        if node.target.is_none() {
            let spread = i as f64 * 2.399; // golden angle, keeps seeds distinct
            node.x = cx + 12.0 * spread.cos();
            node.y = cy + 12.0 * spread.sin();
        }
    }
}

fn place(
    graph: &mut Graph,
    node: usize,
    theme: usize,
    cx: f64,
    cy: f64,
    extent: f64,
    angle: f64,
    config: &LayoutConfig,
) {
    let level = graph.node(node).level;
    let radius = config.ring_fraction(level) * extent;
    let x = cx + radius * angle.cos();
    let y = cy + radius * angle.sin();
    let n = &mut graph.nodes_mut()[node];
    n.target = Some(RingTarget { x, y, angle, radius });
    n.parent_theme = Some(theme);
    n.x = x;
    n.y = y;
}
