//! Classify templates as permanent solid decorations.
//!
//! Loads the pack for analysis only and prints one row per template.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use serde_json::json;
use thing_content::StaticCatalog;
use thing_core::ThingFlags;
use thing_runtime::DecorationScan;

use super::OutputFormat;
use crate::source::ContentSource;

/// Classify every template in the content pack
#[derive(Parser)]
pub struct Classify {
    #[command(flatten)]
    source: ContentSource,

    /// Only list permanent solid decorations
    #[arg(short, long)]
    permanent_only: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl Classify {
    pub fn execute(self) -> Result<()> {
        let factory = self.source.factory();
        let content = factory
            .load_content(&StaticCatalog)
            .with_context(|| format!("Failed to load content from {}", self.source.describe()))?;

        let permanent: BTreeSet<_> = DecorationScan::new(&content)
            .permanent_templates()
            .into_iter()
            .collect();

        let rows: Vec<_> = content
            .templates
            .iter()
            .map(|(id, template)| (template, permanent.contains(&id)))
            .filter(|(_, is_permanent)| *is_permanent || !self.permanent_only)
            .collect();

        match self.format {
            OutputFormat::Json => {
                let rows: Vec<_> = rows
                    .iter()
                    .map(|(template, is_permanent)| {
                        json!({
                            "name": template.name,
                            "doomednum": template.doomednum,
                            "solid": template.flags.contains(ThingFlags::SOLID),
                            "permanent": is_permanent,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            }
            OutputFormat::Text => {
                println!(
                    "{} {}",
                    style("Content:").bold().cyan(),
                    self.source.describe()
                );
                println!(
                    "{} {} templates, {} states",
                    style("Loaded:").bold().cyan(),
                    content.templates.len(),
                    content.states.len()
                );
                println!();
                println!("{}", style("=== Decoration Classification ===").bold().green());
                for (template, is_permanent) in &rows {
                    let verdict = if *is_permanent {
                        style("permanent").green()
                    } else if template.flags.contains(ThingFlags::SOLID) {
                        style("transient").yellow()
                    } else {
                        style("not solid").dim()
                    };
                    let ednum = template
                        .doomednum
                        .map_or_else(|| String::from("-"), |num| num.to_string());
                    println!("  {:<24} {:>6}  {}", template.name, ednum, verdict);
                }
                println!();
                println!(
                    "{} {}",
                    style("Permanent:").bold().cyan(),
                    permanent.len()
                );
            }
        }

        Ok(())
    }
}
