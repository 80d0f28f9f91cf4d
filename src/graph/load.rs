//! Payload ingestion: the `{nodes, links}` JSON document produced by the
//! extraction/storage collaborator, resolved into an indexed [`Graph`].
//!
//! Links referencing unknown node ids are dropped with a warning and never
//! repaired here; the external renderer may still draw them as dangling
//! lines from the raw payload.

use serde::{Deserialize, Serialize};

use super::{Edge, EdgeType, Graph, Level, Node};
use crate::Result;

fn default_size() -> f64 {
    1.0
}

fn default_weight() -> f64 {
    1.0
}

/// A node as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodePayload {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub level: Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<u32>,
    #[serde(default)]
    pub is_central: bool,
    #[serde(default = "default_size")]
    pub size: f64,
}

/// A link as it appears on the wire: id-addressed, typed, weighted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkPayload {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: EdgeType,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

/// The authoritative graph document consumed on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphPayload {
    pub nodes: Vec<NodePayload>,
    pub links: Vec<LinkPayload>,
}

/// Parse a JSON payload string into a graph.
pub fn graph_from_json(json: &str) -> Result<Graph> {
    let payload: GraphPayload = serde_json::from_str(json)?;
    Ok(graph_from_payload(payload))
}

/// Resolve a payload into an indexed graph.
///
/// Duplicate node ids keep the first occurrence; dangling links are dropped.
/// Neither is fatal (a malformed payload degrades to a smaller graph).
pub fn graph_from_payload(payload: GraphPayload) -> Graph {
    let mut nodes: Vec<Node> = Vec::with_capacity(payload.nodes.len());
    let mut ids = std::collections::HashMap::new();

    for np in payload.nodes {
        if ids.contains_key(&np.id) {
            log::warn!("Duplicate node id '{}' in payload, keeping first", np.id);
            continue;
        }
        ids.insert(np.id.clone(), nodes.len());
        let mut node = Node::new(np.id, np.label, np.level);
        node.community = np.community;
        node.is_central = np.is_central;
        node.size = np.size;
        nodes.push(node);
    }

    let mut edges: Vec<Edge> = Vec::with_capacity(payload.links.len());
    for link in payload.links {
        match (ids.get(&link.source), ids.get(&link.target)) {
            (Some(&source), Some(&target)) => {
                edges.push(Edge {
                    source,
                    target,
                    kind: link.kind,
                    weight: link.weight,
                });
            }
            _ => {
                log::warn!(
                    "Dropping link {} -> {} ({:?}): unresolved endpoint",
                    link.source,
                    link.target,
                    link.kind
                );
            }
        }
    }

    Graph::from_parts(nodes, edges)
}
