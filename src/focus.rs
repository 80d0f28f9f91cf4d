//! Focus selection: the subgraph that stays emphasized around a selection.
//!
//! Pure function of the graph, the selected node, and its level; nothing in
//! the graph is mutated. Output is opacity annotation only: dimmed elements
//! stay in the scene, so clearing focus needs no re-layout. Results are
//! ephemeral: recompute on every selection, last call wins.

use std::collections::HashSet;

use crate::config::FocusConfig;
use crate::graph::{
    direct_neighbors, goals_of_theme, parent_goal_of, parent_theme_of, similar_strategies,
    strategies_of_goal, Edge, EdgeType, Graph, Level,
};
use crate::{Result, StratmapError};

/// Visibility annotation for one focus selection.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusResult {
    focus_id: String,
    visible: HashSet<String>,
    /// Per-edge opacity, parallel to the graph's edge list.
    edge_opacity: Vec<f64>,
    dimmed_opacity: f64,
}

impl FocusResult {
    pub fn focus_id(&self) -> &str {
        &self.focus_id
    }

    pub fn visible_ids(&self) -> &HashSet<String> {
        &self.visible
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.visible.contains(id)
    }

    /// Full opacity for visible nodes, the configured dim for the rest.
    pub fn node_opacity(&self, id: &str) -> f64 {
        if self.is_visible(id) {
            1.0
        } else {
            self.dimmed_opacity
        }
    }

    pub fn edge_opacities(&self) -> &[f64] {
        &self.edge_opacity
    }
}

/// Compute the focus selection for a node id.
///
/// Traversal depends on the node's level; see the per-level helpers. Errors
/// only on an unknown id; every structural anomaly inside the graph
/// degrades to a smaller visible set instead.
pub fn select_focus(graph: &Graph, config: &FocusConfig, node_id: &str) -> Result<FocusResult> {
    let focus = graph
        .node_index(node_id)
        .ok_or_else(|| StratmapError::NodeNotFound(node_id.to_string()))?;

    let level = graph.node(focus).level;
    let (visible, edge_opacity) = match level {
        Level::Primary => primary_focus(graph, config, focus),
        Level::Secondary => match parent_theme_of(graph, focus) {
            Some(_) => secondary_focus(graph, config, focus),
            None => orphan_focus(graph, config, focus),
        },
        Level::Tertiary => match parent_goal_of(graph, focus) {
            Some(_) => tertiary_focus(graph, config, focus),
            None => orphan_focus(graph, config, focus),
        },
    };

    Ok(FocusResult {
        focus_id: node_id.to_string(),
        visible: visible
            .into_iter()
            .map(|idx| graph.node(idx).id.clone())
            .collect(),
        edge_opacity,
        dimmed_opacity: config.dimmed_opacity,
    })
}

/// Add a strategy reached over a similarity edge, with its ancestry.
fn add_with_ancestry(graph: &Graph, strategy: usize, visible: &mut HashSet<usize>) {
    visible.insert(strategy);
    if let Some(goal) = parent_goal_of(graph, strategy) {
        visible.insert(goal);
        if let Some(theme) = parent_theme_of(graph, goal) {
            visible.insert(theme);
        }
    }
}

/// Theme focus: the whole subtree one hop down each branch, plus any other
/// theme whose work is similar to work under this one: each strategy under
/// the focused theme pulls its similarity partners in together with their
/// parent goals and themes.
fn primary_focus(graph: &Graph, config: &FocusConfig, theme: usize) -> (HashSet<usize>, Vec<f64>) {
    let mut visible = HashSet::from([theme]);
    for goal in goals_of_theme(graph, theme) {
        visible.insert(goal);
        for strategy in strategies_of_goal(graph, goal) {
            visible.insert(strategy);
            for partner in similar_strategies(graph, strategy) {
                add_with_ancestry(graph, partner, &mut visible);
            }
        }
    }
    let edges = endpoint_rule(graph, config, &visible);
    (visible, edges)
}

/// Goal focus: the goal, its theme, its strategies, and one similarity hop
/// per strategy with the reached strategy's ancestry. No transitive closure
/// beyond that single hop.
fn secondary_focus(graph: &Graph, config: &FocusConfig, goal: usize) -> (HashSet<usize>, Vec<f64>) {
    let mut visible = HashSet::from([goal]);
    if let Some(theme) = parent_theme_of(graph, goal) {
        visible.insert(theme);
    }
    for strategy in strategies_of_goal(graph, goal) {
        visible.insert(strategy);
        for partner in similar_strategies(graph, strategy) {
            add_with_ancestry(graph, partner, &mut visible);
        }
    }
    let edges = endpoint_rule(graph, config, &visible);
    (visible, edges)
}

/// Strategy focus: the narrowest case. Node visibility covers the strategy,
/// its ancestry, direct similarity partners and theirs. Edge visibility is
/// an explicit allow-list rather than "both endpoints visible", so sibling
/// strategies under a shared goal do not drag their clutter in:
///
/// - `part_of_goal` touching the focus or a direct similarity partner,
/// - `part_of_theme` touching one of the goals collected above,
/// - `similar_content` touching the focus node itself.
///
/// Every other edge is dimmed, even between two visible nodes.
fn tertiary_focus(
    graph: &Graph,
    config: &FocusConfig,
    focus: usize,
) -> (HashSet<usize>, Vec<f64>) {
    let mut visible = HashSet::from([focus]);
    let mut goals = HashSet::new();
    if let Some(goal) = parent_goal_of(graph, focus) {
        visible.insert(goal);
        goals.insert(goal);
        if let Some(theme) = parent_theme_of(graph, goal) {
            visible.insert(theme);
        }
    }

    let partners: HashSet<usize> = similar_strategies(graph, focus).into_iter().collect();
    for &partner in &partners {
        visible.insert(partner);
        if let Some(goal) = parent_goal_of(graph, partner) {
            visible.insert(goal);
            goals.insert(goal);
            if let Some(theme) = parent_theme_of(graph, goal) {
                visible.insert(theme);
            }
        }
    }

    let touches = |edge: &Edge, set: &HashSet<usize>| {
        set.contains(&edge.source) || set.contains(&edge.target)
    };
    let focus_set = HashSet::from([focus]);

    let edge_opacity = graph
        .edges()
        .iter()
        .map(|edge| {
            let allowed = match edge.kind {
                EdgeType::PartOfGoal => {
                    touches(edge, &focus_set) || touches(edge, &partners)
                }
                EdgeType::PartOfTheme => touches(edge, &goals),
                EdgeType::SimilarContent => touches(edge, &focus_set),
                EdgeType::RelatedTo => false,
            };
            if allowed {
                config.edge_visible_opacity
            } else {
                config.dimmed_opacity
            }
        })
        .collect();

    (visible, edge_opacity)
}

/// Orphan focus: no ancestry to climb, so the selection is the node plus its
/// direct neighbors of any edge type; only edges touching the node light up.
fn orphan_focus(graph: &Graph, config: &FocusConfig, focus: usize) -> (HashSet<usize>, Vec<f64>) {
    let mut visible = HashSet::from([focus]);
    visible.extend(direct_neighbors(graph, focus));

    let edge_opacity = graph
        .edges()
        .iter()
        .map(|edge| {
            if edge.source == focus || edge.target == focus {
                config.edge_visible_opacity
            } else {
                config.dimmed_opacity
            }
        })
        .collect();

    (visible, edge_opacity)
}

/// Default edge emphasis for theme and goal focus: an edge is emphasized
/// iff both endpoints are visible.
fn endpoint_rule(graph: &Graph, config: &FocusConfig, visible: &HashSet<usize>) -> Vec<f64> {
    graph
        .edges()
        .iter()
        .map(|edge| {
            if visible.contains(&edge.source) && visible.contains(&edge.target) {
                config.edge_visible_opacity
            } else {
                config.dimmed_opacity
            }
        })
        .collect()
}
