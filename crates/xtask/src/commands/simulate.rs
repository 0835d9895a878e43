//! Run the live simulation over a content pack.
//!
//! Spawns one of each placeable template on a grid, runs the world and
//! prints a summary with the replay checksum.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use thing_core::Vec3;
use thing_runtime::{DecorationScan, Simulation};

use super::OutputFormat;
use crate::source::ContentSource;

/// Grid spacing between spawned things, in map units.
const SPACING: i32 = 128;

/// Spawn every placeable template and run the world
#[derive(Parser)]
pub struct Simulate {
    /// Number of tics to run
    #[arg(short, long, default_value_t = 350)]
    tics: u64,

    /// Override the config seed
    #[arg(short, long)]
    seed: Option<u64>,

    #[command(flatten)]
    source: ContentSource,

    /// Write the event log as JSON lines
    #[arg(short, long, value_name = "FILE")]
    events: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl Simulate {
    pub fn execute(self) -> Result<()> {
        let mut builder = Simulation::builder().factory(self.source.factory());
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        let mut sim = builder
            .build()
            .with_context(|| format!("Failed to load content from {}", self.source.describe()))?;

        // Placeable templates, laid out row by row.
        let names: Vec<String> = sim
            .content()
            .templates
            .iter()
            .filter(|(_, template)| {
                template.doomednum.is_some() && !template.spawn_state().is_null()
            })
            .map(|(_, template)| template.name.clone())
            .collect();
        let columns = (names.len() as f64).sqrt().ceil().max(1.0) as i32;
        for (index, name) in names.iter().enumerate() {
            let (row, column) = (index as i32 / columns, index as i32 % columns);
            let pos = Vec3::units(
                (column - columns / 2) * SPACING,
                (row - columns / 2) * SPACING,
                0,
            );
            sim.spawn(name, pos)?;
        }

        let permanent = DecorationScan::new(sim.content())
            .permanent_serials(sim.world())
            .len();
        sim.run(self.tics)?;
        let summary = sim.summary();

        if let Some(path) = &self.events {
            sim.log()
                .write_jsonl(path)
                .with_context(|| format!("Failed to write event log: {}", path.display()))?;
        }

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            OutputFormat::Text => {
                println!("{}", style("=== Simulation Summary ===").bold().green());
                println!("  Content: {}", self.source.describe());
                println!("  Seed: {}", summary.seed);
                println!("  Tics: {}", summary.tic);
                println!("  Spawned: {} ({} permanent decorations)", names.len(), permanent);
                println!("  Live things: {}", summary.things);
                println!("  Kills: {}", summary.kills);
                println!("  Specials: {}", summary.specials);
                println!();
                println!("{}", style("Population:").bold().yellow());
                for (name, count) in &summary.population {
                    println!("  {name:<24} {count}");
                }
                println!();
                println!("{} {}", style("Checksum:").bold().cyan(), summary.checksum);
                if let Some(path) = &self.events {
                    println!(
                        "{} {} entries -> {}",
                        style("Events:").bold().cyan(),
                        sim.log().len(),
                        path.display()
                    );
                }
            }
        }

        Ok(())
    }
}
