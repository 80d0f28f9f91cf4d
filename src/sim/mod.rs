//! Constraint force simulator.
//!
//! Single-threaded and frame-driven: the owner calls [`Simulator::tick`]
//! once per frame; each tick is a synchronous function of current positions
//! producing new positions. Energy follows a decaying alpha through the
//! phase machine Idle -> Running -> Cooling -> Settled; drags re-energize a
//! settled simulation without resetting positions.

pub mod forces;

use std::collections::HashMap;

use crate::config::{ForceConfig, SimulationConfig};
use crate::graph::Graph;

/// Simulation lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No graph loaded or simulation stopped.
    Idle,
    /// High energy, fresh load or re-energized by a drag.
    Running,
    /// Alpha below the cooling threshold, winding down.
    Cooling,
    /// At rest; ticks are no-ops until re-energized.
    Settled,
}

/// The force simulation over a loaded graph's nodes.
///
/// Pinning is an explicit operation orthogonal to the force list: the tick
/// loop has no dragged-node branches, it just clamps pinned nodes after
/// integration while positional forces skip them.
#[derive(Debug)]
pub struct Simulator {
    sim: SimulationConfig,
    forces: ForceConfig,
    phase: Phase,
    alpha: f64,
    cooling_ticks: u32,
    pinned: HashMap<usize, (f64, f64)>,
}

impl Simulator {
    pub fn new(sim: SimulationConfig, forces: ForceConfig) -> Self {
        Self {
            sim,
            forces,
            phase: Phase::Idle,
            alpha: 0.0,
            cooling_ticks: 0,
            pinned: HashMap::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Idle -> Running with full kinetic temperature. Called once per graph
    /// load, after planning.
    pub fn start(&mut self) {
        self.alpha = self.sim.alpha_initial;
        self.cooling_ticks = 0;
        self.phase = Phase::Running;
        log::debug!("Simulation started at alpha {:.3}", self.alpha);
    }

    /// Hard stop: discard all energy and pins. Loading a new graph must call
    /// this before planning runs again; overlapping simulations over two
    /// node sets is a correctness bug.
    pub fn stop(&mut self) {
        self.alpha = 0.0;
        self.cooling_ticks = 0;
        self.pinned.clear();
        self.phase = Phase::Idle;
    }

    /// Re-energize after a drag or resize without resetting positions.
    pub fn reheat(&mut self) {
        if self.phase == Phase::Idle {
            return;
        }
        self.alpha = self.alpha.max(self.sim.drag_alpha);
        self.cooling_ticks = 0;
        self.phase = Phase::Running;
    }

    /// Fix a node at a position. Pinned nodes ignore positional forces and
    /// follow the pin exactly until released; they still repel and collide
    /// with neighbors.
    pub fn pin(&mut self, node: usize, x: f64, y: f64) {
        self.pinned.insert(node, (x, y));
    }

    /// Release a pinned node back to the forces.
    pub fn unpin(&mut self, node: usize) {
        self.pinned.remove(&node);
    }

    pub fn is_pinned(&self, node: usize) -> bool {
        self.pinned.contains_key(&node)
    }

    /// One synchronous simulation step. No-op when idle, settled, or the
    /// graph is empty.
    pub fn tick(&mut self, graph: &mut Graph, center: (f64, f64)) -> Phase {
        if graph.is_empty() || matches!(self.phase, Phase::Idle | Phase::Settled) {
            return self.phase;
        }

        let alpha = self.alpha;
        let nodes = graph.nodes();
        let mut acc = forces::ring_constraint(nodes, center, &self.pinned, &self.forces, alpha);
        for (a, b) in acc
            .iter_mut()
            .zip(forces::theme_separation(nodes, &self.forces, alpha))
        {
            a.0 += b.0;
            a.1 += b.1;
        }
        if self.sim.snap_back_enabled {
            for (a, b) in acc
                .iter_mut()
                .zip(forces::snap_back(nodes, &self.pinned, &self.forces, alpha))
            {
                a.0 += b.0;
                a.1 += b.1;
            }
        }
        for (a, b) in acc.iter_mut().zip(forces::collision(nodes, &self.forces)) {
            a.0 += b.0;
            a.1 += b.1;
        }
        for (a, b) in acc
            .iter_mut()
            .zip(forces::link_springs(nodes, graph.edges(), &self.forces, alpha))
        {
            a.0 += b.0;
            a.1 += b.1;
        }

        // Single integration step; pinned nodes are clamped to their pin.
        let decay = self.sim.velocity_decay;
        for (i, node) in graph.nodes_mut().iter_mut().enumerate() {
            if let Some(&(px, py)) = self.pinned.get(&i) {
                node.x = px;
                node.y = py;
                node.vx = 0.0;
                node.vy = 0.0;
                continue;
            }
            node.vx = node.vx * decay + acc[i].0;
            node.vy = node.vy * decay + acc[i].1;
            node.x += node.vx;
            node.y += node.vy;
        }

        self.advance_phase();
        self.phase
    }

    fn advance_phase(&mut self) {
        self.alpha *= 1.0 - self.sim.alpha_decay;

        if self.alpha < self.sim.alpha_min {
            self.settle("alpha floor");
            return;
        }

        if self.alpha < self.sim.cooling_alpha {
            self.phase = Phase::Cooling;
            self.cooling_ticks += 1;
            // Watchdog: cap the cooldown tail so a slow decay schedule
            // cannot keep burning CPU on an already-still layout.
            if self.cooling_ticks > self.sim.max_cooling_ticks {
                self.settle("cooling watchdog");
            }
        } else {
            self.phase = Phase::Running;
        }
    }

    fn settle(&mut self, reason: &str) {
        log::debug!("Simulation settled ({})", reason);
        self.alpha = 0.0;
        self.phase = Phase::Settled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, LayoutConfig};
    use crate::graph::{graph_from_payload, sample_payload, Graph, GraphBuilder};
    use crate::layout::{plan_rings, Viewport};
    use crate::sim::forces::visual_radius;

    const VIEW: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    fn planned_sample() -> (Graph, Simulator) {
        let config = Config::default();
        let mut graph = graph_from_payload(sample_payload());
        plan_rings(&mut graph, VIEW, &config.layout);
        let mut sim = Simulator::new(config.simulation, config.forces);
        sim.start();
        (graph, sim)
    }

    fn run_to_settled(sim: &mut Simulator, graph: &mut Graph) -> usize {
        let center = VIEW.center();
        for i in 0..5000 {
            if sim.tick(graph, center) == Phase::Settled {
                return i;
            }
        }
        panic!("simulation did not settle within 5000 ticks");
    }

    #[test]
    fn test_empty_graph_tick_is_noop() {
        let config = Config::default();
        let mut graph = GraphBuilder::new().build();
        let mut sim = Simulator::new(config.simulation, config.forces);
        sim.start();
        assert_eq!(sim.tick(&mut graph, (0.0, 0.0)), Phase::Running);
    }

    #[test]
    fn test_idle_simulator_does_not_move_nodes() {
        let config = Config::default();
        let mut graph = graph_from_payload(sample_payload());
        plan_rings(&mut graph, VIEW, &config.layout);
        let before: Vec<_> = graph.nodes().iter().map(|n| (n.x, n.y)).collect();
        let mut sim = Simulator::new(config.simulation, config.forces);
        // No start(): still idle.
        sim.tick(&mut graph, VIEW.center());
        let after: Vec<_> = graph.nodes().iter().map(|n| (n.x, n.y)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_phases_progress_to_settled() {
        let (mut graph, mut sim) = planned_sample();
        assert_eq!(sim.phase(), Phase::Running);
        let mut saw_cooling = false;
        let center = VIEW.center();
        for _ in 0..5000 {
            match sim.tick(&mut graph, center) {
                Phase::Cooling => saw_cooling = true,
                Phase::Settled => break,
                _ => {}
            }
        }
        assert!(saw_cooling, "must pass through Cooling");
        assert_eq!(sim.phase(), Phase::Settled);
        assert_eq!(sim.alpha(), 0.0);
    }

    #[test]
    fn test_ring_constraint_holds_at_rest() {
        let (mut graph, mut sim) = planned_sample();
        run_to_settled(&mut sim, &mut graph);
        let (cx, cy) = VIEW.center();
        for node in graph.nodes() {
            let Some(target) = node.target else { continue };
            let r = ((node.x - cx).powi(2) + (node.y - cy).powi(2)).sqrt();
            assert!(
                (r - target.radius).abs() < 15.0,
                "node {} drifted off its ring: r={:.1} target={:.1}",
                node.id,
                r,
                target.radius
            );
        }
    }

    #[test]
    fn test_no_residual_overlap_at_rest() {
        let config = Config::default();
        let mut graph = graph_from_payload(sample_payload());
        plan_rings(&mut graph, VIEW, &config.layout);
        // Crush two strategies onto the same point to force a collision.
        let a = graph.node_index("infill").unwrap();
        let b = graph.node_index("adu").unwrap();
        let (x, y) = (graph.node(a).x, graph.node(a).y);
        graph.nodes_mut()[b].x = x;
        graph.nodes_mut()[b].y = y;

        let mut sim = Simulator::new(config.simulation.clone(), config.forces.clone());
        sim.start();
        run_to_settled(&mut sim, &mut graph);

        let na = graph.node(a);
        let nb = graph.node(b);
        let d = ((na.x - nb.x).powi(2) + (na.y - nb.y).powi(2)).sqrt();
        let clearance = visual_radius(na, &config.forces) + visual_radius(nb, &config.forces);
        assert!(
            d >= clearance - 1.0,
            "residual overlap at rest: d={:.1} clearance={:.1}",
            d,
            clearance
        );
    }

    #[test]
    fn test_pinned_node_follows_pin_exactly() {
        let (mut graph, mut sim) = planned_sample();
        let idx = graph.node_index("retrofit").unwrap();
        sim.pin(idx, 123.0, 45.0);
        let center = VIEW.center();
        for _ in 0..10 {
            sim.tick(&mut graph, center);
        }
        assert_eq!(graph.node(idx).x, 123.0);
        assert_eq!(graph.node(idx).y, 45.0);
        assert!(sim.is_pinned(idx));

        sim.unpin(idx);
        sim.reheat();
        for _ in 0..10 {
            sim.tick(&mut graph, center);
        }
        // Released: forces move it again.
        assert!(graph.node(idx).x != 123.0 || graph.node(idx).y != 45.0);
    }

    #[test]
    fn test_reheat_reenergizes_settled_sim() {
        let (mut graph, mut sim) = planned_sample();
        run_to_settled(&mut sim, &mut graph);
        assert_eq!(sim.phase(), Phase::Settled);

        let frozen: Vec<_> = graph.nodes().iter().map(|n| (n.x, n.y)).collect();
        sim.reheat();
        assert_eq!(sim.phase(), Phase::Running);
        assert!(sim.alpha() > 0.0);
        // Reheat itself does not touch positions; only subsequent ticks do.
        let after: Vec<_> = graph.nodes().iter().map(|n| (n.x, n.y)).collect();
        assert_eq!(frozen, after);
        let center = VIEW.center();
        assert_ne!(sim.tick(&mut graph, center), Phase::Settled);
    }

    #[test]
    fn test_stop_clears_energy_and_pins() {
        let (mut graph, mut sim) = planned_sample();
        sim.pin(0, 1.0, 2.0);
        sim.stop();
        assert_eq!(sim.phase(), Phase::Idle);
        assert_eq!(sim.alpha(), 0.0);
        assert!(!sim.is_pinned(0));
        // Idle: ticking moves nothing.
        let before: Vec<_> = graph.nodes().iter().map(|n| (n.x, n.y)).collect();
        sim.tick(&mut graph, VIEW.center());
        let after: Vec<_> = graph.nodes().iter().map(|n| (n.x, n.y)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_reheat_does_not_wake_idle_sim() {
        let config = Config::default();
        let mut sim = Simulator::new(config.simulation, config.forces);
        sim.reheat();
        assert_eq!(sim.phase(), Phase::Idle);
        assert_eq!(sim.alpha(), 0.0);
    }

    #[test]
    fn test_cooling_watchdog_caps_tail() {
        let mut config = Config::default();
        // A decay schedule too slow to ever reach the alpha floor in
        // reasonable time; the watchdog must cut it off.
        config.simulation.alpha_decay = 1e-9;
        config.simulation.alpha_initial = 0.2; // start below cooling_alpha
        config.simulation.max_cooling_ticks = 50;
        let mut graph = graph_from_payload(sample_payload());
        plan_rings(&mut graph, VIEW, &LayoutConfig::default());
        let mut sim = Simulator::new(config.simulation, config.forces);
        sim.start();
        let center = VIEW.center();
        let mut ticks = 0;
        while sim.tick(&mut graph, center) != Phase::Settled {
            ticks += 1;
            assert!(ticks < 200, "watchdog failed to stop the simulation");
        }
        assert!(ticks >= 50);
    }
}
