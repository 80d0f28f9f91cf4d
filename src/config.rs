use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::graph::Level;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub simulation: SimulationConfig,
    pub forces: ForceConfig,
    pub focus: FocusConfig,
}

/// Ring and sector geometry.
///
/// Radii are fractions of `min(width, height) / 2 - margin`; themes sit on
/// the outermost ring, strategies on the innermost.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Screen-edge margin subtracted from the viewport half-extent.
    pub margin: f64,
    /// Minimum angular gap between adjacent theme sectors, in degrees.
    pub min_gap_degrees: f64,
    pub primary_ring_fraction: f64,
    pub secondary_ring_fraction: f64,
    pub tertiary_ring_fraction: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 40.0,
            min_gap_degrees: 8.0,
            primary_ring_fraction: 0.92,
            secondary_ring_fraction: 0.6,
            tertiary_ring_fraction: 0.32,
        }
    }
}

impl LayoutConfig {
    /// Ring radius fraction for a hierarchy level.
    pub fn ring_fraction(&self, level: Level) -> f64 {
        match level {
            Level::Primary => self.primary_ring_fraction,
            Level::Secondary => self.secondary_ring_fraction,
            Level::Tertiary => self.tertiary_ring_fraction,
        }
    }
}

/// Alpha schedule and integration parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Kinetic temperature right after a graph load.
    pub alpha_initial: f64,
    /// Per-tick multiplicative decay: `alpha *= 1 - alpha_decay`.
    pub alpha_decay: f64,
    /// Below this alpha the simulation is cooling rather than running.
    pub cooling_alpha: f64,
    /// Below this alpha the simulation settles and stops ticking.
    pub alpha_min: f64,
    /// Alpha restored when a drag re-energizes a settled simulation.
    pub drag_alpha: f64,
    /// Per-tick velocity retention (0 = full stop each tick).
    pub velocity_decay: f64,
    /// Watchdog: hard tick cap after cooling begins, to save CPU once
    /// visually settled.
    pub max_cooling_ticks: u32,
    /// Snap-back force switch. Off by default so ring drags stay sticky.
    pub snap_back_enabled: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            alpha_initial: 1.0,
            alpha_decay: 0.035,
            cooling_alpha: 0.25,
            alpha_min: 0.005,
            drag_alpha: 0.3,
            velocity_decay: 0.55,
            max_cooling_ticks: 300,
            snap_back_enabled: false,
        }
    }
}

/// Per-force strengths and geometry.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Radial correction toward the assigned ring.
    pub ring_strength: f64,
    /// Repulsion between nodes parented to different themes.
    pub theme_separation_strength: f64,
    /// Repulsion cutoff distance; pairs further apart are ignored.
    pub theme_separation_distance: f64,
    /// Scale-down applied when either node of a pair is a goal.
    pub secondary_separation_scale: f64,
    /// Scale-down applied when either node of a pair is a strategy.
    pub tertiary_separation_scale: f64,
    /// Pull toward the precomputed layout target when snap-back is enabled.
    pub snap_back_strength: f64,
    /// Extra clearance added around each node's visual radius.
    pub collision_margin: f64,
    /// Fraction of the remaining overlap removed per tick.
    pub collision_strength: f64,
    /// Visual radius = base + scale * sqrt(size).
    pub node_radius_base: f64,
    pub node_radius_scale: f64,
    /// Rest length for part_of_theme / part_of_goal springs.
    pub link_distance: f64,
    /// Spring stiffness for hierarchy edges; these define the tree and must
    /// stay visually taut.
    pub hierarchy_stiffness: f64,
    /// Spring stiffness for similar_content edges. Zero keeps cross-theme
    /// similarity rendered but layout-inert.
    pub similarity_stiffness: f64,
    /// Spring stiffness for related_to edges.
    pub related_stiffness: f64,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            ring_strength: 0.12,
            theme_separation_strength: 28.0,
            theme_separation_distance: 180.0,
            secondary_separation_scale: 0.25,
            tertiary_separation_scale: 0.1,
            snap_back_strength: 0.08,
            collision_margin: 4.0,
            collision_strength: 0.7,
            node_radius_base: 6.0,
            node_radius_scale: 2.0,
            link_distance: 80.0,
            hierarchy_stiffness: 0.1,
            similarity_stiffness: 0.0,
            related_stiffness: 0.02,
        }
    }
}

/// Opacity levels applied by focus selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Opacity of nodes and edges outside the focus selection. Dimmed, never
    /// removed, so clearing focus needs no re-layout.
    pub dimmed_opacity: f64,
    /// Opacity of edges inside the focus selection.
    pub edge_visible_opacity: f64,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            dimmed_opacity: 0.1,
            edge_visible_opacity: 0.8,
        }
    }
}

impl Config {
    /// Load configuration from file.
    ///
    /// Looks for the config file in this order:
    /// 1. Path specified in STRATMAP_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("STRATMAP_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .context("Failed to parse config.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration, falling back to built-in defaults when no config
    /// file is present. Binaries use this so a bare checkout works.
    pub fn load_or_default() -> Result<Self> {
        let explicit = std::env::var("STRATMAP_CONFIG").is_ok();
        if !explicit && !std::path::Path::new("config.toml").exists() {
            log::debug!("No config.toml found, using default configuration");
            return Ok(Config::default());
        }
        Self::load()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let l = &self.layout;
        for (name, frac) in [
            ("primary_ring_fraction", l.primary_ring_fraction),
            ("secondary_ring_fraction", l.secondary_ring_fraction),
            ("tertiary_ring_fraction", l.tertiary_ring_fraction),
        ] {
            if !(0.0..=1.0).contains(&frac) {
                anyhow::bail!("layout.{} must be between 0.0 and 1.0", name);
            }
        }

        // Levels occupy fixed, non-overlapping radius bands: themes outermost.
        if l.primary_ring_fraction <= l.secondary_ring_fraction
            || l.secondary_ring_fraction <= l.tertiary_ring_fraction
        {
            anyhow::bail!(
                "ring fractions must be strictly decreasing: primary > secondary > tertiary"
            );
        }

        if l.min_gap_degrees < 0.0 {
            anyhow::bail!("layout.min_gap_degrees must not be negative");
        }

        if l.margin < 0.0 {
            anyhow::bail!("layout.margin must not be negative");
        }

        let s = &self.simulation;
        if !(0.0..1.0).contains(&s.alpha_decay) {
            anyhow::bail!("simulation.alpha_decay must be in [0.0, 1.0)");
        }
        if !(0.0..1.0).contains(&s.velocity_decay) {
            anyhow::bail!("simulation.velocity_decay must be in [0.0, 1.0)");
        }
        if s.alpha_min <= 0.0 || s.alpha_min >= s.cooling_alpha {
            anyhow::bail!("simulation.alpha_min must be positive and below cooling_alpha");
        }
        if s.cooling_alpha >= s.alpha_initial {
            anyhow::bail!("simulation.cooling_alpha must be below alpha_initial");
        }

        let f = &self.focus;
        if !(0.0..=1.0).contains(&f.dimmed_opacity) {
            anyhow::bail!("focus.dimmed_opacity must be between 0.0 and 1.0");
        }
        if !(0.0..=1.0).contains(&f.edge_visible_opacity) {
            anyhow::bail!("focus.edge_visible_opacity must be between 0.0 and 1.0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    const TEST_CONFIG: &str = r#"
[layout]
margin = 20.0
min_gap_degrees = 10.0
primary_ring_fraction = 0.9
secondary_ring_fraction = 0.55
tertiary_ring_fraction = 0.3

[simulation]
alpha_decay = 0.05
snap_back_enabled = true

[forces]
ring_strength = 0.2

[focus]
dimmed_opacity = 0.15
"#;

    fn with_config_env(config_path: &std::path::Path, f: impl FnOnce()) {
        let original = std::env::var("STRATMAP_CONFIG").ok();
        std::env::set_var("STRATMAP_CONFIG", config_path.to_str().unwrap());
        f();
        std::env::remove_var("STRATMAP_CONFIG");
        if let Some(val) = original {
            std::env::set_var("STRATMAP_CONFIG", val);
        }
    }

    #[test]
    fn test_config_load_success() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, TEST_CONFIG).unwrap();
        with_config_env(&config_path, || {
            let config = Config::load();
            assert!(config.is_ok(), "Config::load() failed: {:?}", config.err());
            let config = config.unwrap();
            assert_eq!(config.layout.margin, 20.0);
            assert_eq!(config.layout.min_gap_degrees, 10.0);
            assert!(config.simulation.snap_back_enabled);
            assert_eq!(config.forces.ring_strength, 0.2);
            assert_eq!(config.focus.dimmed_opacity, 0.15);
            // Sections absent from the file keep their defaults
            assert_eq!(config.forces.link_distance, 80.0);
        });
    }

    #[test]
    fn test_config_defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_inverted_rings() {
        let mut config = Config::default();
        config.layout.secondary_ring_fraction = 0.95; // above primary
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("strictly decreasing"));
    }

    #[test]
    fn test_config_rejects_bad_alpha_decay() {
        let mut config = Config::default();
        config.simulation.alpha_decay = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_bad_opacity() {
        let mut config = Config::default();
        config.focus.dimmed_opacity = 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let original = std::env::var("STRATMAP_CONFIG").ok();
        std::env::set_var("STRATMAP_CONFIG", "nonexistent.toml");
        let config = Config::load();
        assert!(config.is_err());
        std::env::remove_var("STRATMAP_CONFIG");
        if let Some(v) = original {
            std::env::set_var("STRATMAP_CONFIG", v);
        }
    }

    #[test]
    fn test_ring_fraction_by_level() {
        let config = Config::default();
        let l = &config.layout;
        assert_eq!(l.ring_fraction(Level::Primary), l.primary_ring_fraction);
        assert!(l.ring_fraction(Level::Primary) > l.ring_fraction(Level::Secondary));
        assert!(l.ring_fraction(Level::Secondary) > l.ring_fraction(Level::Tertiary));
    }
}
