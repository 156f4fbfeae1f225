use anyhow::Context;
use featgraph::{Dependency, Feat};
use tracing::instrument;

use super::terminal::Colorize;

/// Arguments for listing feats instead of rendering the graph.
#[derive(Debug, Default, clap::Args)]
pub struct List {
    /// List feats and their prerequisites instead of rendering the graph
    #[arg(long)]
    list: bool,

    /// Leave out feats which are granted automatically
    #[arg(long, requires = "list")]
    skip_automatic: bool,

    /// Print the listing as JSON
    #[arg(long, requires = "list")]
    json: bool,
}

impl List {
    /// Whether a listing was requested.
    pub const fn enabled(&self) -> bool {
        self.list
    }

    #[instrument(level = "debug", skip_all)]
    pub fn run(&self, feats: &[Feat]) -> anyhow::Result<()> {
        let selected: Vec<&Feat> = feats
            .iter()
            .filter(|feat| feat.has_deps())
            .filter(|feat| !(self.skip_automatic && feat.automatic))
            .collect();

        if self.json {
            serde_json::to_writer_pretty(std::io::stdout(), &selected)
                .context("failed to render json output")?;
            println!();
            return Ok(());
        }

        if selected.is_empty() {
            println!("No feats with prerequisites found.");
            return Ok(());
        }

        for feat in selected {
            println!("{}", feat.full_name().info());
            if let Some(line) = deps_line("requires", &feat.required_deps) {
                println!("{line}");
            }
            if let Some(line) = deps_line("one of", &feat.alternative_deps) {
                println!("{line}");
            }
        }
        Ok(())
    }
}

fn deps_line(heading: &str, deps: &[Dependency]) -> Option<String> {
    if deps.is_empty() {
        return None;
    }
    let labels: Vec<String> = deps.iter().map(Dependency::label).collect();
    Some(format!("  {} {}", format!("{heading}:").dim(), labels.join(", ")))
}
