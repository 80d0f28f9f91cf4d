use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use stratmap::{graph_from_json, Config, Engine, Viewport};

#[derive(Parser, Debug)]
#[command(name = "layout")]
#[command(about = "Run the radial layout to rest and emit node positions")]
struct Args {
    /// Graph payload JSON file ({nodes, links})
    payload: PathBuf,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Write positions JSON to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct PositionRecord {
    id: String,
    x: f64,
    y: f64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    let args = Args::parse();
    let config = Config::load_or_default()?;

    let json = std::fs::read_to_string(&args.payload)
        .with_context(|| format!("Failed to read payload: {}", args.payload.display()))?;
    let graph = graph_from_json(&json)?;
    log::info!(
        "Loaded graph: {} nodes, {} edges",
        graph.len(),
        graph.edges().len()
    );

    let start = Instant::now();
    let mut engine = Engine::new(graph, Viewport::new(args.width, args.height), config);
    let ticks = engine.run_to_settled();
    log::info!("Settled after {} ticks in {:?}", ticks, start.elapsed());

    let positions: Vec<PositionRecord> = engine
        .positions()
        .map(|(id, x, y)| PositionRecord {
            id: id.to_string(),
            x,
            y,
        })
        .collect();
    let out = serde_json::to_string_pretty(&positions)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, out)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {} positions to {}", positions.len(), path.display());
        }
        None => println!("{}", out),
    }

    Ok(())
}
