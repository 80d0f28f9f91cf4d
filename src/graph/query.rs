//! Typed-neighbor queries over the loaded graph.
//!
//! The layout planners and all three focus branches share these scans
//! instead of re-deriving "find edges of type X touching id Y" in place.
//! Hierarchy edges point child -> parent (`source` is the child).

use super::{EdgeType, Graph, Level};

/// Which end of an edge the queried node is expected to occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Node is the edge source; neighbors are targets (parents).
    Outgoing,
    /// Node is the edge target; neighbors are sources (children).
    Incoming,
    /// Either end.
    Either,
}

/// All neighbors of `node` over edges of the given type and direction, in
/// edge order. Duplicates are preserved (the caller's sets dedup).
pub fn neighbors_by_type(
    graph: &Graph,
    node: usize,
    kind: EdgeType,
    direction: Direction,
) -> Vec<usize> {
    let mut out = Vec::new();
    for edge in graph.edges() {
        if edge.kind != kind {
            continue;
        }
        match direction {
            Direction::Outgoing if edge.source == node => out.push(edge.target),
            Direction::Incoming if edge.target == node => out.push(edge.source),
            Direction::Either => {
                if edge.source == node {
                    out.push(edge.target);
                } else if edge.target == node {
                    out.push(edge.source);
                }
            }
            _ => {}
        }
    }
    out
}

/// The owning theme of a goal, if its hierarchy edge exists and points at an
/// actual primary node.
pub fn parent_theme_of(graph: &Graph, goal: usize) -> Option<usize> {
    neighbors_by_type(graph, goal, EdgeType::PartOfTheme, Direction::Outgoing)
        .into_iter()
        .find(|&idx| graph.node(idx).level == Level::Primary)
}

/// The owning goal of a strategy, if its hierarchy edge exists.
pub fn parent_goal_of(graph: &Graph, strategy: usize) -> Option<usize> {
    neighbors_by_type(graph, strategy, EdgeType::PartOfGoal, Direction::Outgoing)
        .into_iter()
        .find(|&idx| graph.node(idx).level == Level::Secondary)
}

/// Goals parented to a theme, in edge order.
pub fn goals_of_theme(graph: &Graph, theme: usize) -> Vec<usize> {
    neighbors_by_type(graph, theme, EdgeType::PartOfTheme, Direction::Incoming)
        .into_iter()
        .filter(|&idx| graph.node(idx).level == Level::Secondary)
        .collect()
}

/// Strategies parented to a goal, in edge order.
pub fn strategies_of_goal(graph: &Graph, goal: usize) -> Vec<usize> {
    neighbors_by_type(graph, goal, EdgeType::PartOfGoal, Direction::Incoming)
        .into_iter()
        .filter(|&idx| graph.node(idx).level == Level::Tertiary)
        .collect()
}

/// Strategies similarity-linked to a strategy, either direction.
pub fn similar_strategies(graph: &Graph, strategy: usize) -> Vec<usize> {
    neighbors_by_type(graph, strategy, EdgeType::SimilarContent, Direction::Either)
        .into_iter()
        .filter(|&idx| graph.node(idx).level == Level::Tertiary)
        .collect()
}

/// The theme a node ultimately belongs to: itself for a theme, one hop up
/// for a goal, two hops for a strategy. `None` marks an orphan with no
/// discoverable hierarchy path.
pub fn theme_of(graph: &Graph, node: usize) -> Option<usize> {
    match graph.node(node).level {
        Level::Primary => Some(node),
        Level::Secondary => parent_theme_of(graph, node),
        Level::Tertiary => parent_goal_of(graph, node).and_then(|g| parent_theme_of(graph, g)),
    }
}

/// Neighbors over edges of any type, either direction. Used for orphan
/// focus, where no ancestry exists.
pub fn direct_neighbors(graph: &Graph, node: usize) -> Vec<usize> {
    let mut out = Vec::new();
    for edge in graph.edges() {
        if edge.source == node {
            out.push(edge.target);
        } else if edge.target == node {
            out.push(edge.source);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn small_graph() -> Graph {
        let mut b = GraphBuilder::new();
        b.theme("t1", "Theme One")
            .goal("g1", "Goal One", "t1")
            .strategy("s1", "Strategy One", "g1")
            .strategy("s2", "Strategy Two", "g1")
            .theme("t2", "Theme Two")
            .goal("g2", "Goal Two", "t2")
            .strategy("s3", "Strategy Three", "g2")
            .similar("s1", "s3", 0.8);
        b.build()
    }

    fn idx(graph: &Graph, id: &str) -> usize {
        graph.node_index(id).unwrap()
    }

    #[test]
    fn test_parent_lookups() {
        let g = small_graph();
        assert_eq!(parent_theme_of(&g, idx(&g, "g1")), Some(idx(&g, "t1")));
        assert_eq!(parent_goal_of(&g, idx(&g, "s2")), Some(idx(&g, "g1")));
        // A theme has no parent theme edge
        assert_eq!(parent_theme_of(&g, idx(&g, "t1")), None);
    }

    #[test]
    fn test_children_lookups() {
        let g = small_graph();
        assert_eq!(goals_of_theme(&g, idx(&g, "t1")), vec![idx(&g, "g1")]);
        assert_eq!(
            strategies_of_goal(&g, idx(&g, "g1")),
            vec![idx(&g, "s1"), idx(&g, "s2")]
        );
        assert!(strategies_of_goal(&g, idx(&g, "t1")).is_empty());
    }

    #[test]
    fn test_similarity_is_undirected() {
        let g = small_graph();
        assert_eq!(similar_strategies(&g, idx(&g, "s1")), vec![idx(&g, "s3")]);
        assert_eq!(similar_strategies(&g, idx(&g, "s3")), vec![idx(&g, "s1")]);
        assert!(similar_strategies(&g, idx(&g, "s2")).is_empty());
    }

    #[test]
    fn test_theme_of_walks_up() {
        let g = small_graph();
        assert_eq!(theme_of(&g, idx(&g, "t2")), Some(idx(&g, "t2")));
        assert_eq!(theme_of(&g, idx(&g, "g2")), Some(idx(&g, "t2")));
        assert_eq!(theme_of(&g, idx(&g, "s3")), Some(idx(&g, "t2")));
    }

    #[test]
    fn test_theme_of_orphan_is_none() {
        let mut b = GraphBuilder::new();
        b.theme("t1", "Theme").orphan("lone", "Loose strategy", crate::graph::Level::Tertiary);
        let g = b.build();
        assert_eq!(theme_of(&g, idx(&g, "lone")), None);
    }

    #[test]
    fn test_direct_neighbors_any_type() {
        let g = small_graph();
        let mut n = direct_neighbors(&g, idx(&g, "s1"));
        n.sort_unstable();
        let mut expected = vec![idx(&g, "g1"), idx(&g, "s3")];
        expected.sort_unstable();
        assert_eq!(n, expected);
    }
}
