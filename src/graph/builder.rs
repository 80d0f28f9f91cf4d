//! Programmatic graph construction.
//!
//! Mirrors the manual graph editing surface of the extraction collaborator:
//! themes, goals, and strategies are appended with their hierarchy edges in
//! one call, similarity relations afterwards. Used by tests and the `sample`
//! binary; production graphs arrive as payloads instead.

use super::{graph_from_payload, Graph, GraphPayload, Level, LinkPayload, NodePayload};
use crate::graph::EdgeType;

/// Builds a [`GraphPayload`] incrementally, then resolves it.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    payload: GraphPayload,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_node(&mut self, id: &str, label: &str, level: Level) {
        self.payload.nodes.push(NodePayload {
            id: id.to_string(),
            label: label.to_string(),
            level,
            community: None,
            is_central: false,
            size: 1.0,
        });
    }

    fn push_link(&mut self, source: &str, target: &str, kind: EdgeType, weight: f64) {
        self.payload.links.push(LinkPayload {
            source: source.to_string(),
            target: target.to_string(),
            kind,
            weight,
        });
    }

    /// Add a theme node.
    pub fn theme(&mut self, id: &str, label: &str) -> &mut Self {
        self.push_node(id, label, Level::Primary);
        self
    }

    /// Add a goal node parented to `theme_id`.
    pub fn goal(&mut self, id: &str, label: &str, theme_id: &str) -> &mut Self {
        self.push_node(id, label, Level::Secondary);
        self.push_link(id, theme_id, EdgeType::PartOfTheme, 1.0);
        self
    }

    /// Add a strategy node parented to `goal_id`.
    pub fn strategy(&mut self, id: &str, label: &str, goal_id: &str) -> &mut Self {
        self.push_node(id, label, Level::Tertiary);
        self.push_link(id, goal_id, EdgeType::PartOfGoal, 1.0);
        self
    }

    /// Add a node with no hierarchy edge, at any level.
    pub fn orphan(&mut self, id: &str, label: &str, level: Level) -> &mut Self {
        self.push_node(id, label, level);
        self
    }

    /// Add a similarity relation between two strategies.
    pub fn similar(&mut self, a: &str, b: &str, weight: f64) -> &mut Self {
        self.push_link(a, b, EdgeType::SimilarContent, weight);
        self
    }

    /// Add a generic related_to relation.
    pub fn related(&mut self, a: &str, b: &str, weight: f64) -> &mut Self {
        self.push_link(a, b, EdgeType::RelatedTo, weight);
        self
    }

    /// Set the size hint of an already-added node.
    pub fn size(&mut self, id: &str, size: f64) -> &mut Self {
        if let Some(node) = self.payload.nodes.iter_mut().find(|n| n.id == id) {
            node.size = size;
        }
        self
    }

    /// Tag an already-added node with a community id.
    pub fn community(&mut self, id: &str, community: u32) -> &mut Self {
        if let Some(node) = self.payload.nodes.iter_mut().find(|n| n.id == id) {
            node.community = Some(community);
        }
        self
    }

    /// The raw payload built so far.
    pub fn payload(self) -> GraphPayload {
        self.payload
    }

    /// Resolve the built payload into an indexed graph. Links naming unknown
    /// ids are dropped, same as payload loading.
    pub fn build(self) -> Graph {
        graph_from_payload(self.payload)
    }
}

/// A small deterministic civic-strategy payload for demos and examples:
/// three themes, two goals each, two strategies per goal, and a few
/// similarity relations crossing theme boundaries.
pub fn sample_payload() -> GraphPayload {
    let mut b = GraphBuilder::new();
    b.theme("housing", "Housing & Neighborhoods")
        .goal("housing_supply", "Expand housing supply", "housing")
        .strategy("infill", "Incentivize infill development", "housing_supply")
        .strategy("adu", "Streamline ADU permitting", "housing_supply")
        .goal("housing_stability", "Keep residents housed", "housing")
        .strategy("rental_assist", "Emergency rental assistance", "housing_stability")
        .strategy("legal_aid", "Tenant legal aid program", "housing_stability")
        .theme("climate", "Climate & Resilience")
        .goal("emissions", "Cut building emissions", "climate")
        .strategy("retrofit", "Retrofit municipal buildings", "emissions")
        .strategy("solar", "Rooftop solar incentives", "emissions")
        .goal("adaptation", "Adapt to coastal change", "climate")
        .strategy("wetlands", "Restore wetland buffers", "adaptation")
        .strategy("cooling", "Neighborhood cooling centers", "adaptation")
        .theme("mobility", "Mobility & Access")
        .goal("transit", "Grow transit ridership", "mobility")
        .strategy("bus_lanes", "Dedicated bus lanes", "transit")
        .strategy("fare_pass", "Low-income fare pass", "transit")
        .goal("safe_streets", "Safer streets for all", "mobility")
        .strategy("bike_lanes", "Protected bike lanes", "safe_streets")
        .strategy("crossings", "High-visibility crossings", "safe_streets")
        // Cross-theme similarity: retrofit work overlaps infill incentives,
        // cooling centers overlap housing stability outreach, and bike
        // infrastructure overlaps coastal adaptation corridors.
        .similar("retrofit", "infill", 0.7)
        .similar("cooling", "rental_assist", 0.5)
        .similar("bike_lanes", "wetlands", 0.4)
        .size("housing", 5.0)
        .size("climate", 5.0)
        .size("mobility", 5.0)
        .community("housing", 0)
        .community("climate", 1)
        .community("mobility", 2);
    b.payload()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{parent_goal_of, parent_theme_of, similar_strategies};

    #[test]
    fn test_builder_wires_hierarchy() {
        let mut b = GraphBuilder::new();
        b.theme("t", "Theme").goal("g", "Goal", "t").strategy("s", "Strategy", "g");
        let graph = b.build();
        let t = graph.node_index("t").unwrap();
        let g = graph.node_index("g").unwrap();
        let s = graph.node_index("s").unwrap();
        assert_eq!(parent_theme_of(&graph, g), Some(t));
        assert_eq!(parent_goal_of(&graph, s), Some(g));
    }

    #[test]
    fn test_builder_size_and_community() {
        let mut b = GraphBuilder::new();
        b.theme("t", "Theme").size("t", 9.0).community("t", 3);
        let graph = b.build();
        let t = graph.node(graph.node_index("t").unwrap());
        assert_eq!(t.size, 9.0);
        assert_eq!(t.community, Some(3));
    }

    #[test]
    fn test_builder_drops_link_to_unknown_parent() {
        let mut b = GraphBuilder::new();
        b.goal("g", "Goal", "no_such_theme");
        let graph = b.build();
        assert_eq!(graph.len(), 1);
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_sample_payload_shape() {
        let graph = graph_from_payload(sample_payload());
        assert_eq!(graph.level_indices(crate::graph::Level::Primary).len(), 3);
        assert_eq!(graph.level_indices(crate::graph::Level::Secondary).len(), 6);
        assert_eq!(graph.level_indices(crate::graph::Level::Tertiary).len(), 12);
        // 18 hierarchy edges + 3 similarity edges, nothing dangling
        assert_eq!(graph.edges().len(), 21);

        // Similarity crosses theme boundaries
        let retrofit = graph.node_index("retrofit").unwrap();
        let infill = graph.node_index("infill").unwrap();
        assert_eq!(similar_strategies(&graph, retrofit), vec![infill]);
    }
}
