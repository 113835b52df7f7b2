//! FHE program graph viewer CLI.
//!
//! Provides the `fhegraph` binary for working with serialized program graphs
//! outside the debugger server. Uses the same translator and coordinator the
//! server does, so output matches what the viewer would draw.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use fhegraph_core::render::translate;
use fhegraph_core::sample;
use fhegraph_core::{LineTable, ProgramGraph, SelectionCoordinator};

/// FHE program graph viewer tools.
#[derive(Parser)]
#[command(name = "fhegraph", about = "FHE program graph viewer tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Translate a program graph to the render format and print it as JSON.
    Render {
        /// Path to a program graph JSON file.
        file: PathBuf,
    },

    /// Check a program graph's edge indices and operand arity.
    Validate {
        /// Path to a program graph JSON file.
        file: PathBuf,
    },

    /// Print the built-in sample program graph.
    Sample {
        /// Print the sample's source code instead of its graph.
        #[arg(long)]
        source: bool,
    },

    /// Click a line in the demo viewer and print the resulting selection.
    Demo {
        /// Source line to click.
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        line: i64,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Render { file } => run_render(&file),
        Commands::Validate { file } => run_validate(&file),
        Commands::Sample { source } => run_sample(source),
        Commands::Demo { line } => run_demo(line),
    };
    process::exit(exit_code);
}

/// Reads and decodes a graph file.
///
/// Returns exit code 3 on I/O failure and 1 on a malformed payload.
fn load_graph(path: &Path) -> Result<ProgramGraph, i32> {
    let json = fs::read_to_string(path).map_err(|e| {
        eprintln!("Error: failed to read '{}': {}", path.display(), e);
        3
    })?;
    ProgramGraph::from_json(&json).map_err(|e| {
        eprintln!("Error: {}: {}", path.display(), e);
        1
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: failed to serialize output: {}", e);
            3
        }
    }
}

/// Execute the render subcommand.
///
/// Returns exit code: 0 = success, 1 = invalid graph, 3 = I/O error.
fn run_render(path: &Path) -> i32 {
    let graph = match load_graph(path) {
        Ok(graph) => graph,
        Err(code) => return code,
    };

    match translate(&graph) {
        Ok(render) => {
            for warning in &render.warnings {
                tracing::warn!("{}", warning);
            }
            print_json(&render)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 = well-formed, 1 = invalid graph, 2 = arity
/// violations, 3 = I/O error.
fn run_validate(path: &Path) -> i32 {
    let graph = match load_graph(path) {
        Ok(graph) => graph,
        Err(code) => return code,
    };

    let code = validation_exit_code(&graph);
    match code {
        0 => println!(
            "ok: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        ),
        1 => {
            if let Err(e) = graph.check_indices() {
                eprintln!("Error: {}", e);
            }
        }
        _ => {
            let warnings = graph.integrity_warnings();
            eprintln!("{} integrity warning(s):", warnings.len());
            for warning in &warnings {
                eprintln!("  - {}", warning);
            }
        }
    }
    code
}

/// Out-of-range indices outrank arity warnings.
fn validation_exit_code(graph: &ProgramGraph) -> i32 {
    if graph.check_indices().is_err() {
        1
    } else if graph.integrity_warnings().is_empty() {
        0
    } else {
        2
    }
}

fn run_sample(source: bool) -> i32 {
    if source {
        print!("{}", sample::SAMPLE_SOURCE);
        0
    } else {
        print_json(&sample::sample_program())
    }
}

fn run_demo(line: i64) -> i32 {
    let mut coordinator = SelectionCoordinator::new(LineTable::demo());
    coordinator.on_line_clicked(line);
    print_json(&coordinator.snapshot())
}
