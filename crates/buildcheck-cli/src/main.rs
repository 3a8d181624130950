//! PC build compatibility checker CLI

use buildcheck_engine::{
    normalize, normalize_selection,
    report::{generate_report, ReportFormat},
    Component, Engine, PerformanceEstimate, Slot,
};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "buildcheck")]
#[command(about = "PC Build Compatibility & Suggestion Engine")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a build selection for compatibility
    Check {
        /// Path to selection file (JSON map of slot -> component or component id)
        #[arg(short, long)]
        selection: PathBuf,

        /// Path to catalog file (JSON array of components) for id lookups
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Output format (json, markdown)
        #[arg(short, long, default_value = "markdown")]
        output: String,

        /// Output file (defaults to stdout)
        #[arg(short = 'O', long)]
        output_file: Option<PathBuf>,

        /// Include replacement suggestions for failures
        #[arg(long)]
        suggestions: bool,

        /// Slot changed most recently (steers suggestion targets)
        #[arg(long)]
        last_changed: Option<String>,
    },

    /// Estimate build performance on the four heuristic axes
    Estimate {
        /// Path to selection file
        #[arg(short, long)]
        selection: PathBuf,

        /// Path to catalog file for id lookups
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },

    /// List canonical slots and their accepted aliases
    Slots,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    match cli.command {
        Commands::Check {
            selection,
            catalog,
            output,
            output_file,
            suggestions,
            last_changed,
        } => {
            cmd_check(selection, catalog, output, output_file, suggestions, last_changed);
        }
        Commands::Estimate { selection, catalog } => {
            cmd_estimate(selection, catalog);
        }
        Commands::Slots => {
            cmd_slots();
        }
    }
}

fn cmd_check(
    selection_path: PathBuf,
    catalog_path: Option<PathBuf>,
    output_format: String,
    output_file: Option<PathBuf>,
    with_suggestions: bool,
    last_changed: Option<String>,
) {
    info!("Checking selection: {}", selection_path.display());

    let raw = load_selection(&selection_path, catalog_path.as_deref());
    let mut selection = normalize_selection(&raw);

    if let Some(label) = last_changed {
        match normalize::canonical_slot(&label) {
            Some(slot) => selection.last_changed = Some(slot),
            None => warn!("Unrecognized --last-changed slot: {}", label),
        }
    }

    info!("Selection covers {} of 8 slots", selection.populated_count());

    let engine = Engine::new();
    let (report, suggestions) = engine.check_with_suggestions(&selection);

    info!(
        "Check completed: score {}/100, {} failed, {} indeterminate",
        report.score, report.failed, report.indeterminate
    );

    let rendered = match output_format.to_lowercase().as_str() {
        "json" => {
            let payload = if with_suggestions {
                serde_json::json!({ "report": report, "suggestions": suggestions })
            } else {
                serde_json::to_value(&report).expect("report serializes")
            };
            serde_json::to_string_pretty(&payload).expect("report serializes")
        }
        _ => {
            let mut doc = match generate_report(&report, ReportFormat::Markdown) {
                Ok(doc) => doc,
                Err(e) => {
                    error!("Failed to generate report: {}", e);
                    std::process::exit(1);
                }
            };
            if with_suggestions && !suggestions.is_empty() {
                doc.push_str("## Suggestions\n\n");
                for s in &suggestions {
                    doc.push_str(&format!(
                        "- **{:?} {}**: {}\n",
                        s.action, s.target, s.message
                    ));
                }
                doc.push('\n');
            }
            doc
        }
    };

    if let Some(out_path) = output_file {
        std::fs::write(&out_path, &rendered).expect("Failed to write output file");
        info!("Report written to: {}", out_path.display());
    } else {
        println!("{}", rendered);
    }

    if report.has_hard_incompatibility() {
        std::process::exit(1);
    }
}

fn cmd_estimate(selection_path: PathBuf, catalog_path: Option<PathBuf>) {
    info!("Estimating performance for: {}", selection_path.display());

    let raw = load_selection(&selection_path, catalog_path.as_deref());
    let selection = normalize_selection(&raw);

    let engine = Engine::new();
    let PerformanceEstimate {
        gaming,
        workstation,
        cooling,
        upgrade,
    } = engine.estimate(&selection);

    println!("\nPerformance Estimate\n{}", "=".repeat(50));
    println!("Gaming:       {:>3}/100", gaming);
    println!("Workstation:  {:>3}/100", workstation);
    println!("Cooling:      {:>3}/100", cooling);
    println!("Upgrade path: {:>3}/100", upgrade);
}

fn cmd_slots() {
    println!("\nCanonical Slots\n{}", "=".repeat(50));
    for slot in Slot::all() {
        let aliases: Vec<&str> = normalize::aliases(slot)
            .iter()
            .filter(|a| **a != slot.key())
            .copied()
            .collect();
        println!("{:<12} aliases: {}", slot.key(), aliases.join(", "));
    }
}

/// Load a selection file: a JSON object mapping slot labels to either inline
/// component records or catalog ids (the latter requires --catalog).
fn load_selection(
    selection_path: &std::path::Path,
    catalog_path: Option<&std::path::Path>,
) -> HashMap<String, Component> {
    if !selection_path.exists() {
        error!("File not found: {}", selection_path.display());
        std::process::exit(1);
    }

    let text = std::fs::read_to_string(selection_path).expect("Failed to read selection file");
    let value: serde_json::Value = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            error!("Invalid selection file: {}", e);
            std::process::exit(1);
        }
    };
    let entries = match value {
        serde_json::Value::Object(map) => map,
        _ => {
            error!("Selection file must be a JSON object of slot -> component");
            std::process::exit(1);
        }
    };

    let catalog = catalog_path.map(load_catalog);

    let mut raw = HashMap::new();
    for (key, entry) in entries {
        match entry {
            serde_json::Value::String(id) => match &catalog {
                Some(catalog) => match catalog.get(&id) {
                    Some(component) => {
                        raw.insert(key, component.clone());
                    }
                    None => warn!("Component id {} not found in catalog, skipping {}", id, key),
                },
                None => {
                    error!("Selection references id {} but no --catalog was given", id);
                    std::process::exit(1);
                }
            },
            entry => match serde_json::from_value::<Component>(entry) {
                Ok(component) => {
                    raw.insert(key, component);
                }
                Err(e) => warn!("Skipping malformed entry for {}: {}", key, e),
            },
        }
    }
    raw
}

/// Load a catalog file (JSON array of components) into an id index.
fn load_catalog(path: &std::path::Path) -> HashMap<String, Component> {
    if !path.exists() {
        error!("File not found: {}", path.display());
        std::process::exit(1);
    }

    let text = std::fs::read_to_string(path).expect("Failed to read catalog file");
    let components: Vec<Component> = match serde_json::from_str(&text) {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid catalog file: {}", e);
            std::process::exit(1);
        }
    };

    info!("Loaded {} catalog components", components.len());
    components.into_iter().map(|c| (c.id.clone(), c)).collect()
}
