//! framegraph CLI: inspect and rewrite exchange documents.
//!
//! Usage:
//!   framegraph summary <document>
//!   framegraph matches <document>
//!   framegraph rewrite <input> <output>

use clap::{Parser, Subcommand};
use framegraph::{ModelRegistry, PointConnection, Settings};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "framegraph",
    version,
    about = "Structural model graph exchange tool"
)]
struct Cli {
    /// Path to a YAML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print node and edge counts per kind
    Summary {
        /// Exchange document to read
        document: PathBuf,
    },
    /// List point connections located at the same coordinates as another
    Matches {
        /// Exchange document to read
        document: PathBuf,
    },
    /// Load a document and write it back out
    Rewrite {
        input: PathBuf,
        output: PathBuf,
        /// Write compact JSON regardless of settings
        #[arg(long)]
        compact: bool,
    },
}

fn init_logging(settings: &Settings, verbose: u8) {
    let level = match verbose {
        0 => Level::from_str(&settings.log.level).unwrap_or(Level::WARN),
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_single(registry: &mut ModelRegistry, path: &Path) -> Result<usize, String> {
    registry
        .load(path)
        .map_err(|e| format!("Failed to load '{}': {}", path.display(), e))
}

fn cmd_summary(registry: &mut ModelRegistry, document: &Path) -> i32 {
    let index = match load_single(registry, document) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let model = match registry.model(index) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let mut nodes: BTreeMap<&str, usize> = BTreeMap::new();
    for found in model.entities() {
        *nodes.entry(found.entity.entity_kind()).or_default() += 1;
    }
    let mut edges: BTreeMap<String, usize> = BTreeMap::new();
    for rel in model.relationships() {
        *edges.entry(rel.kind.label().to_string()).or_default() += 1;
    }

    println!("{:<28}  {:>7}", "NODE KIND", "COUNT");
    println!("{}", "-".repeat(37));
    for (kind, count) in &nodes {
        println!("{:<28}  {:>7}", kind, count);
    }
    println!();
    println!("{:<28}  {:>7}", "EDGE KIND", "COUNT");
    println!("{}", "-".repeat(37));
    for (kind, count) in &edges {
        println!("{:<28}  {:>7}", kind, count);
    }
    println!();
    println!(
        "{} nodes, {} edges",
        model.entity_count(),
        model.relationship_count()
    );
    0
}

fn cmd_matches(registry: &mut ModelRegistry, document: &Path) -> i32 {
    let index = match load_single(registry, document) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let connections: Vec<_> = match registry.model(index) {
        Ok(model) => model
            .of_kind::<PointConnection>()
            .map(|c| (c.handle, c.entity.id.clone()))
            .collect(),
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let mut found = 0;
    for (handle, id) in connections {
        match registry.find_matching_point_connection_by_coordinate(index, handle) {
            Ok(Some(other)) => {
                println!("{}  ->  {}", id, other);
                found += 1;
            }
            Ok(None) => {}
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    }
    if found == 0 {
        println!("No coincident point connections.");
    }
    0
}

fn cmd_rewrite(registry: &mut ModelRegistry, input: &Path, output: &Path) -> i32 {
    let index = match load_single(registry, input) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    match registry.persist(index, output) {
        Ok(()) => {
            println!("Wrote '{}'", output.display());
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let mut settings = match Settings::load_or_default(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: failed to load settings: {}", e);
            std::process::exit(1);
        }
    };
    init_logging(&settings, cli.verbose);

    if let Commands::Rewrite { compact: true, .. } = cli.command {
        settings.export.pretty = false;
    }
    let mut registry = ModelRegistry::new().with_export_options(settings.export.clone());

    let code = match &cli.command {
        Commands::Summary { document } => cmd_summary(&mut registry, document),
        Commands::Matches { document } => cmd_matches(&mut registry, document),
        Commands::Rewrite { input, output, .. } => cmd_rewrite(&mut registry, input, output),
    };
    std::process::exit(code);
}
