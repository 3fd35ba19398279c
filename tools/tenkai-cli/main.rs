use clap::{Parser, Subcommand};
use std::fs;
use std::time::Instant;
use tenkai::prelude::*;

/// A graph-transformation engine CLI for node-based workflow documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Level the graph and print the chain grouping report
    Analyze {
        /// Path to the workflow JSON file
        workflow_path: String,
        /// Print the report as JSON instead of a summary
        #[arg(short, long)]
        json: bool,
    },
    /// Inline every subgraph instance and write the flattened document
    Flatten {
        /// Path to the workflow JSON file
        workflow_path: String,
        /// Output path; defaults to stdout
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print the output JSON
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Analyze {
            workflow_path,
            json,
        } => run_analyze(&workflow_path, json),
        Command::Flatten {
            workflow_path,
            output,
            pretty,
        } => run_flatten(&workflow_path, output, pretty),
    }
}

fn load_workflow(path: &str) -> Workflow {
    let json = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read workflow file '{}': {}", path, e))
    });
    Workflow::from_json(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse '{}': {}", path, e)))
}

fn run_analyze(workflow_path: &str, as_json: bool) {
    let workflow = load_workflow(workflow_path);

    let start = Instant::now();
    let report = DependencyAnalyzer::new().chain_report(&workflow);
    let duration = start.elapsed();

    if as_json {
        let json = serde_json::to_string_pretty(&report)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize report: {}", e)));
        println!("{}", json);
        return;
    }

    println!(
        "Analyzed {} nodes / {} links in {:?}",
        workflow.nodes.len(),
        workflow.links.len(),
        duration
    );
    for chain in &report.chains {
        println!(
            "  Chain {:>3}: levels {:>2}..{:<2}  {} node(s)",
            chain.id, chain.start_level, chain.max_level, chain.node_count
        );
        for node in &chain.nodes {
            println!("    [{:>2}] #{} {} ({})", node.level, node.id, node.title, node.node_type);
        }
    }
    if !report.unleveled.is_empty() {
        println!(
            "  Warning: {} node(s) unleveled due to a cycle: {:?}",
            report.unleveled.len(),
            report.unleveled
        );
    }
}

fn run_flatten(workflow_path: &str, output: Option<String>, pretty: bool) {
    let workflow = load_workflow(workflow_path);

    if !has_subgraphs(&workflow) {
        eprintln!("Document has no subgraph instances; output is an equivalent copy.");
    }

    let start = Instant::now();
    let flat = SubgraphExtractor::new().extract_all(&workflow);
    let duration = start.elapsed();

    eprintln!(
        "Flattened in {:?}: {} -> {} nodes, {} -> {} links",
        duration,
        workflow.nodes.len(),
        flat.nodes.len(),
        workflow.links.len(),
        flat.links.len()
    );

    let json = if pretty { flat.to_json_pretty() } else { flat.to_json() }
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize output: {}", e)));

    match output {
        Some(path) => {
            fs::write(&path, json).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write '{}': {}", path, e))
            });
            eprintln!("Wrote {}", path);
        }
        None => println!("{}", json),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
