use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use stratmap::{graph_from_json, select_focus, Config};

#[derive(Parser, Debug)]
#[command(name = "focus")]
#[command(about = "Compute the focus-mode selection for a node")]
struct Args {
    /// Graph payload JSON file ({nodes, links})
    payload: PathBuf,

    /// Id of the node to focus
    node_id: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    let args = Args::parse();
    let config = Config::load_or_default()?;

    let json = std::fs::read_to_string(&args.payload)
        .with_context(|| format!("Failed to read payload: {}", args.payload.display()))?;
    let graph = graph_from_json(&json)?;

    let idx = graph
        .node_index(&args.node_id)
        .with_context(|| format!("No node '{}' in payload", args.node_id))?;
    let result = select_focus(&graph, &config.focus, &args.node_id)?;

    let focus_node = graph.node(idx);
    println!("\nFocus: {} ({:?})", focus_node.label, focus_node.level);

    println!("\nVisible nodes ({}):", result.visible_ids().len());
    println!("{:-<60}", "");
    for node in graph.nodes() {
        if result.is_visible(&node.id) {
            println!("{:<20} {:<30} {:?}", node.id, node.label, node.level);
        }
    }

    let emphasized = result
        .edge_opacities()
        .iter()
        .filter(|&&o| o > config.focus.dimmed_opacity)
        .count();
    println!("\nEmphasized edges ({} of {}):", emphasized, graph.edges().len());
    println!("{:-<60}", "");
    for (edge, &opacity) in graph.edges().iter().zip(result.edge_opacities()) {
        if opacity > config.focus.dimmed_opacity {
            println!(
                "{:<20} -> {:<20} {:?} ({:.2})",
                graph.node(edge.source).id,
                graph.node(edge.target).id,
                edge.kind,
                opacity
            );
        }
    }

    println!(
        "\nDimmed: {} nodes, {} edges (opacity {:.2})",
        graph.len() - result.visible_ids().len(),
        graph.edges().len() - emphasized,
        config.focus.dimmed_opacity
    );

    Ok(())
}
