//! Graph model: typed nodes and edges of the three-level strategy hierarchy.
//!
//! Themes (primary) sit on the outer ring, goals (secondary) in the middle,
//! strategies (tertiary) innermost. Cross-cutting similarity edges connect
//! strategies only. The graph is replaced wholesale on load and never patched
//! incrementally; the simulator mutates node positions in place.

mod builder;
mod load;
mod query;

pub use builder::{sample_payload, GraphBuilder};
pub use load::{graph_from_json, graph_from_payload, GraphPayload, LinkPayload, NodePayload};
pub use query::{
    direct_neighbors, goals_of_theme, neighbors_by_type, parent_goal_of, parent_theme_of,
    similar_strategies, strategies_of_goal, theme_of, Direction,
};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Hierarchy level of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Theme: top of the hierarchy, outermost ring.
    #[serde(alias = "theme")]
    Primary,
    /// Goal: belongs to exactly one theme.
    #[serde(alias = "goal")]
    Secondary,
    /// Strategy: belongs to exactly one goal, innermost ring.
    #[serde(alias = "strategy")]
    Tertiary,
}

/// Edge type. `part_of_*` edges define the tree; the other two are
/// cross-cutting and never define ring parentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    PartOfTheme,
    PartOfGoal,
    SimilarContent,
    RelatedTo,
}

impl EdgeType {
    /// True for the edge types that define the hierarchy tree.
    pub fn is_hierarchy(self) -> bool {
        matches!(self, EdgeType::PartOfTheme | EdgeType::PartOfGoal)
    }
}

/// Layout target assigned by the ring planner. Absent on orphans, which are
/// excluded from ring constraints and fall back to force-only placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingTarget {
    pub x: f64,
    pub y: f64,
    /// Target angle in radians, fixed at plan time.
    pub angle: f64,
    /// Target distance from the viewport center, constant per level.
    pub radius: f64,
}

/// A node of the loaded graph. Created once per load; position and velocity
/// are owned by the simulator afterwards.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub level: Level,
    /// Optional cluster tag supplied by the extraction collaborator.
    pub community: Option<u32>,
    pub is_central: bool,
    /// Weight hint (e.g. keyword count); feeds the visual radius.
    pub size: f64,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub target: Option<RingTarget>,
    /// Index of the owning theme, set once at layout time.
    pub parent_theme: Option<usize>,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>, level: Level) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            level,
            community: None,
            is_central: false,
            size: 1.0,
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            target: None,
            parent_theme: None,
        }
    }
}

/// A typed, weighted edge between two nodes, stored as node indices after id
/// resolution. Immutable once loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub kind: EdgeType,
    pub weight: f64,
}

/// The loaded graph: nodes, edges, and an id index.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    ids: HashMap<String, usize>,
}

impl Graph {
    /// Assemble a graph from already index-resolved parts.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let ids = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        Self { nodes, edges, ids }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Mutable node access for the simulator and the planners.
    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.ids.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Indices of all nodes at a given level.
    pub fn level_indices(&self, level: Level) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.level == level)
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_deserializes_both_spellings() {
        let level: Level = serde_json::from_str("\"primary\"").unwrap();
        assert_eq!(level, Level::Primary);
        let level: Level = serde_json::from_str("\"theme\"").unwrap();
        assert_eq!(level, Level::Primary);
        let level: Level = serde_json::from_str("\"strategy\"").unwrap();
        assert_eq!(level, Level::Tertiary);
    }

    #[test]
    fn test_edge_type_snake_case() {
        let kind: EdgeType = serde_json::from_str("\"part_of_theme\"").unwrap();
        assert_eq!(kind, EdgeType::PartOfTheme);
        let kind: EdgeType = serde_json::from_str("\"similar_content\"").unwrap();
        assert_eq!(kind, EdgeType::SimilarContent);
        assert!(!kind.is_hierarchy());
        assert!(EdgeType::PartOfGoal.is_hierarchy());
    }

    #[test]
    fn test_graph_id_index() {
        let nodes = vec![
            Node::new("t1", "Theme", Level::Primary),
            Node::new("g1", "Goal", Level::Secondary),
        ];
        let graph = Graph::from_parts(nodes, vec![]);
        assert_eq!(graph.node_index("t1"), Some(0));
        assert_eq!(graph.node_index("g1"), Some(1));
        assert_eq!(graph.node_index("missing"), None);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_level_indices() {
        let nodes = vec![
            Node::new("t1", "", Level::Primary),
            Node::new("g1", "", Level::Secondary),
            Node::new("t2", "", Level::Primary),
        ];
        let graph = Graph::from_parts(nodes, vec![]);
        assert_eq!(graph.level_indices(Level::Primary), vec![0, 2]);
        assert_eq!(graph.level_indices(Level::Tertiary), Vec::<usize>::new());
    }
}
