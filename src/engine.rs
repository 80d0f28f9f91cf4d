//! Frame-driven engine facade.
//!
//! Owns the Graph Model, the layout pass, the simulator, and the current
//! focus annotation, and exposes the surfaces the rendering collaborator
//! talks to: positions out per tick, pointer events in, focus toggling.
//! Everything is synchronous; the caller drives `tick` from its frame loop.

use crate::config::Config;
use crate::focus::{select_focus, FocusResult};
use crate::graph::Graph;
use crate::layout::{plan_rings, Viewport};
use crate::sim::{Phase, Simulator};
use crate::Result;

/// Phase of a pointer interaction with a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Start,
    Move,
    End,
}

/// A drag event from the interaction surface.
#[derive(Debug, Clone)]
pub struct PointerEvent {
    pub node_id: String,
    pub x: f64,
    pub y: f64,
    pub phase: PointerPhase,
}

/// The layout and focus engine over one loaded graph.
pub struct Engine {
    config: Config,
    graph: Graph,
    viewport: Viewport,
    sim: Simulator,
    focus: Option<FocusResult>,
}

impl Engine {
    pub fn new(graph: Graph, viewport: Viewport, config: Config) -> Self {
        let sim = Simulator::new(config.simulation.clone(), config.forces.clone());
        let mut engine = Self {
            config,
            graph: Graph::default(),
            viewport,
            sim,
            focus: None,
        };
        engine.load_graph(graph);
        engine
    }

    /// Replace the loaded graph wholesale.
    ///
    /// The running simulation is fully stopped first (in-flight energy and
    /// pins discarded) before allocation and planning run over the new node
    /// set. Focus annotations belong to the old graph and are cleared.
    pub fn load_graph(&mut self, graph: Graph) {
        self.sim.stop();
        self.focus = None;
        self.graph = graph;
        plan_rings(&mut self.graph, self.viewport, &self.config.layout);
        if !self.graph.is_empty() {
            self.sim.start();
        }
        log::debug!(
            "Loaded graph: {} nodes, {} edges",
            self.graph.len(),
            self.graph.edges().len()
        );
    }

    /// Viewport change: a full re-allocate + re-plan over the same graph,
    /// not an incremental reflow. Sector angles are viewport-independent;
    /// radii scale with the new extent.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
        self.sim.stop();
        plan_rings(&mut self.graph, self.viewport, &self.config.layout);
        if !self.graph.is_empty() {
            self.sim.start();
        }
    }

    /// One simulation step; no-op once settled.
    pub fn tick(&mut self) -> Phase {
        self.sim.tick(&mut self.graph, self.viewport.center())
    }

    pub fn phase(&self) -> Phase {
        self.sim.phase()
    }

    /// Run the simulation to rest. Convenience for non-interactive callers;
    /// the frame-driven path calls `tick` instead.
    pub fn run_to_settled(&mut self) -> u32 {
        let mut ticks = 0;
        while !matches!(self.tick(), Phase::Settled | Phase::Idle) {
            ticks += 1;
        }
        ticks
    }

    /// Feed a drag event. Start and Move pin the node at the pointer and
    /// keep the simulation energized; End releases it back to the forces.
    /// Events for unknown ids are dropped with a warning; interaction
    /// anomalies degrade rather than abort.
    pub fn pointer(&mut self, event: &PointerEvent) {
        let Some(idx) = self.graph.node_index(&event.node_id) else {
            log::warn!("Pointer event for unknown node '{}'", event.node_id);
            return;
        };
        match event.phase {
            PointerPhase::Start | PointerPhase::Move => {
                self.sim.pin(idx, event.x, event.y);
                self.sim.reheat();
            }
            PointerPhase::End => {
                self.sim.unpin(idx);
                self.sim.reheat();
            }
        }
    }

    /// Compute and apply the focus selection for a node. Re-entrant:
    /// a newer selection simply replaces the pending one, last call wins.
    pub fn set_focus(&mut self, node_id: &str) -> Result<()> {
        self.focus = Some(select_focus(&self.graph, &self.config.focus, node_id)?);
        Ok(())
    }

    /// Drop all dimming without touching positions.
    pub fn clear_focus(&mut self) {
        self.focus = None;
    }

    /// The collaborator-facing control surface: disabling clears all
    /// dimming; enabling with a node id selects it.
    pub fn toggle_focus_mode(&mut self, enabled: bool, node_id: Option<&str>) -> Result<()> {
        match (enabled, node_id) {
            (true, Some(id)) => self.set_focus(id),
            _ => {
                self.clear_focus();
                Ok(())
            }
        }
    }

    pub fn focus(&self) -> Option<&FocusResult> {
        self.focus.as_ref()
    }

    /// Per-tick positions for the renderer.
    pub fn positions(&self) -> impl Iterator<Item = (&str, f64, f64)> + '_ {
        self.graph.nodes().iter().map(|n| (n.id.as_str(), n.x, n.y))
    }

    /// Node emphasis: full opacity without a focus selection.
    pub fn node_opacity(&self, id: &str) -> f64 {
        match &self.focus {
            Some(f) => f.node_opacity(id),
            None => 1.0,
        }
    }

    /// Edge emphasis by edge index, parallel to `graph().edges()`.
    pub fn edge_opacity(&self, edge: usize) -> f64 {
        match &self.focus {
            Some(f) => f.edge_opacities().get(edge).copied().unwrap_or(1.0),
            None => 1.0,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}
