use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use freebuilder_lib::archive::Archive;
use freebuilder_lib::command::{execute_json_batch, inspect};
use freebuilder_lib::harness::TestHarness;
use freebuilder_lib::placement::PlacementEngine;
use freebuilder_lib::state::{BuilderSettings, EditorMode};
use shared::ShapeCatalog;

#[derive(Parser)]
#[command(name = "freebuilder", about = "Compose asemic letterforms on the serif and join grids")]
struct Cli {
    /// Shape catalog JSON
    #[arg(long, global = true, default_value = "catalog.json")]
    catalog: PathBuf,

    /// Force constrained mode regardless of saved settings
    #[arg(long, global = true)]
    constrained: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Execute a JSON command batch and print the responses
    Run {
        /// File holding a JSON array of commands
        commands: PathBuf,
        /// Composition to load before running
        #[arg(long)]
        load: Option<PathBuf>,
        /// Write the resulting composition here
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Hydrate a composition and print its placements
    Inspect {
        composition: PathBuf,
    },
    /// Generate words from an archive manifest
    Generate {
        /// Archive manifest JSON
        manifest: PathBuf,
        /// Letters per word; several values make a sentence
        #[arg(long, value_delimiter = ',', default_value = "4")]
        lengths: Vec<usize>,
        /// Spell this text from archive letters instead of picking at random
        #[arg(long)]
        spell: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "freebuilder=info,freebuilder_lib=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = BuilderSettings::load();
    if cli.constrained {
        settings.mode = EditorMode::Constrained;
    }

    match cli.command {
        Command::Run { commands, load, save } => {
            let mut harness = TestHarness::with_catalog(load_catalog(&cli.catalog)?, settings);
            if let Some(path) = load {
                let json = read(&path)?;
                let report = harness
                    .load_composition_json(&json)
                    .with_context(|| format!("loading {}", path.display()))?;
                tracing::info!(placed = report.placed, skipped = report.skipped(), "composition loaded");
            }

            let batch = read(&commands)?;
            let responses = execute_json_batch(&mut harness, &batch).map_err(anyhow::Error::msg)?;
            println!("{}", serde_json::to_string_pretty(&responses)?);

            if let Some(path) = save {
                harness
                    .state
                    .composition
                    .save_to(&path)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
        }

        Command::Inspect { composition } => {
            let mut harness = TestHarness::with_catalog(load_catalog(&cli.catalog)?, settings);
            let json = read(&composition)?;
            let report = harness
                .load_composition_json(&json)
                .with_context(|| format!("loading {}", composition.display()))?;
            for warning in &report.warnings {
                eprintln!("warning: {warning}");
            }
            println!("{}", serde_json::to_string_pretty(&inspect(&harness))?);
        }

        Command::Generate { manifest, lengths, spell } => {
            let catalog = load_catalog(&cli.catalog)?;
            let engine = PlacementEngine::new(&catalog, settings.placement_config());
            let archive = Archive::load(&manifest)?;

            let words = match spell {
                Some(text) => text
                    .split_whitespace()
                    .map(|word| archive.spell(word))
                    .collect::<Result<Vec<_>, _>>()?,
                None => archive.generate_sentence(&lengths, &mut rand::rng())?,
            };

            let out: Vec<Vec<serde_json::Value>> = words
                .iter()
                .map(|word| {
                    word.iter()
                        .map(|entry| {
                            let (grids, report) = Archive::view(entry, &engine);
                            serde_json::json!({
                                "letter": entry.name(),
                                "path": entry.path,
                                "placements": grids.placement_count(),
                                "skipped": report.skipped(),
                            })
                        })
                        .collect()
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn load_catalog(path: &Path) -> anyhow::Result<ShapeCatalog> {
    let json = read(path)?;
    let catalog = ShapeCatalog::from_json(&json).with_context(|| format!("parsing catalog {}", path.display()))?;
    tracing::info!(path = %path.display(), shapes = catalog.len(), "catalog loaded");
    Ok(catalog)
}
