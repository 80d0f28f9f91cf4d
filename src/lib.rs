pub mod config;
pub mod engine;
pub mod error;
pub mod focus;
pub mod graph;
pub mod layout;
pub mod sim;

pub use config::Config;
pub use engine::{Engine, PointerEvent, PointerPhase};
pub use error::{Result, StratmapError};
pub use focus::{select_focus, FocusResult};
pub use graph::{graph_from_json, Graph};
pub use layout::Viewport;
pub use sim::Phase;
