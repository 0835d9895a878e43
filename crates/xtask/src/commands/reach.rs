//! Static reachability query for one template.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use serde_json::json;
use thing_content::StaticCatalog;
use thing_core::{Reachability, Subject};

use super::OutputFormat;
use crate::source::ContentSource;

/// Check whether a template's spawn chain can reach a state
#[derive(Parser)]
pub struct Reach {
    /// Template name (e.g., ExplosiveBarrel)
    #[arg(value_name = "TEMPLATE")]
    template: String,

    /// State name (e.g., S_BEXP4)
    #[arg(value_name = "STATE")]
    state: String,

    #[command(flatten)]
    source: ContentSource,

    /// Print every reachable state, not just the verdict
    #[arg(short, long)]
    closure: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl Reach {
    pub fn execute(self) -> Result<()> {
        let content = self
            .source
            .factory()
            .load_content(&StaticCatalog)
            .with_context(|| format!("Failed to load content from {}", self.source.describe()))?;

        let (_, template) = content
            .find_template(&self.template)
            .with_context(|| format!("No template named '{}'", self.template))?;
        let goal = content
            .states
            .find(&self.state)
            .with_context(|| format!("No state named '{}'", self.state))?;

        let reach = Reachability::new(&content.states, Subject::of_template(template));
        let start = template.spawn_state();
        let reachable = reach.exists_reachable_state(start, |num, _| num == goal);
        let closure = reach.reachable_states(start);
        let names: Vec<&str> = closure
            .iter()
            .filter_map(|num| content.states.get(*num))
            .map(|state| state.name.as_str())
            .collect();

        match self.format {
            OutputFormat::Json => {
                let mut out = json!({
                    "template": self.template,
                    "state": self.state,
                    "reachable": reachable,
                    "closure_size": closure.len(),
                });
                if self.closure {
                    out["closure"] = json!(names);
                }
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            OutputFormat::Text => {
                let verdict = if reachable {
                    style("reachable").green().bold()
                } else {
                    style("unreachable").red().bold()
                };
                println!(
                    "{} -> {}: {}",
                    style(&self.template).cyan(),
                    style(&self.state).cyan(),
                    verdict
                );
                println!(
                    "{} {} states",
                    style("Closure:").bold().cyan(),
                    closure.len()
                );
                if self.closure {
                    for name in names {
                        println!("  {name}");
                    }
                }
            }
        }

        Ok(())
    }
}
