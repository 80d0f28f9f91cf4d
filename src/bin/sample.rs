use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use stratmap::graph::sample_payload;

#[derive(Parser, Debug)]
#[command(name = "sample")]
#[command(about = "Emit the built-in demo graph payload as JSON")]
struct Args {
    /// Write the payload to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let payload = sample_payload();
    let json = serde_json::to_string_pretty(&payload)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!(
                "Wrote sample payload ({} nodes, {} links) to {}",
                payload.nodes.len(),
                payload.links.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
