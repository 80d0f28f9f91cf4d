use anyhow::{Context, Result};
use clap::Parser;
use std::collections::BTreeMap;
use std::path::PathBuf;
use stratmap::graph::{theme_of, EdgeType, Level};
use stratmap::graph_from_json;

#[derive(Parser, Debug)]
#[command(name = "stats")]
#[command(about = "Summarize the composition of a graph payload")]
struct Args {
    /// Graph payload JSON file ({nodes, links})
    payload: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let json = std::fs::read_to_string(&args.payload)
        .with_context(|| format!("Failed to read payload: {}", args.payload.display()))?;
    let graph = graph_from_json(&json)?;

    println!("\n=== Stratmap Graph Composition ===\n");

    println!("{:-<40}", "");
    println!("{:<25} {:>10}", "Level", "Nodes");
    println!("{:-<40}", "");
    for (label, level) in [
        ("Themes (primary)", Level::Primary),
        ("Goals (secondary)", Level::Secondary),
        ("Strategies (tertiary)", Level::Tertiary),
    ] {
        println!("{:<25} {:>10}", label, graph.level_indices(level).len());
    }
    println!("{:<25} {:>10}", "Total", graph.len());

    println!();
    println!("{:-<40}", "");
    println!("{:<25} {:>10}", "Edge type", "Edges");
    println!("{:-<40}", "");
    for (label, kind) in [
        ("part_of_theme", EdgeType::PartOfTheme),
        ("part_of_goal", EdgeType::PartOfGoal),
        ("similar_content", EdgeType::SimilarContent),
        ("related_to", EdgeType::RelatedTo),
    ] {
        let count = graph.edges().iter().filter(|e| e.kind == kind).count();
        println!("{:<25} {:>10}", label, count);
    }
    println!("{:<25} {:>10}", "Total", graph.edges().len());

    // Communities, as tagged by the extraction collaborator.
    let mut communities: BTreeMap<u32, usize> = BTreeMap::new();
    for node in graph.nodes() {
        if let Some(c) = node.community {
            *communities.entry(c).or_default() += 1;
        }
    }
    if !communities.is_empty() {
        println!();
        println!("{:-<40}", "");
        println!("{:<25} {:>10}", "Community", "Nodes");
        println!("{:-<40}", "");
        for (community, count) in &communities {
            println!("{:<25} {:>10}", community, count);
        }
    }

    let orphans: Vec<&str> = (0..graph.len())
        .filter(|&i| theme_of(&graph, i).is_none())
        .map(|i| graph.node(i).id.as_str())
        .collect();
    println!("\nOrphans (no hierarchy path): {}", orphans.len());
    for id in orphans {
        println!("  {}", id);
    }

    let central = graph.nodes().iter().filter(|n| n.is_central).count();
    println!("Central nodes: {}", central);

    Ok(())
}
