use std::path::PathBuf;

mod list;
mod terminal;

use anyhow::Context;
use clap::ArgAction;
use featgraph::{Attributes, Config, FeatGraph, Layout, OutputFormat, PlannerDir};
use list::List;
use terminal::Colorize;
use tracing::{debug, instrument};

/// Opens the planner directory given on the command line.
///
/// This is a CLI boundary function, so that a bad path is reported as a usage
/// error.
fn parse_planner_dir(s: &str) -> Result<PlannerDir, String> {
    PlannerDir::new(PathBuf::from(s)).map_err(|e| format!("{e}"))
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// The character planner's installation directory
    ///
    /// The feats are read from `DataFiles/FeatsFile.txt` beneath it. If the
    /// directory is named `DDOCharGen<version>`, the version is shown in the
    /// graph title.
    #[arg(value_name = "PLANNER_DIR", value_parser = parse_planner_dir)]
    planner: PlannerDir,

    /// Configuration file
    ///
    /// Defaults to `featgraph.toml` in the planner directory, if there is one.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where to write the rendered graph [default: feats_dot.png]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (png, svg, pdf, dot)
    ///
    /// Defaults to the extension of the output file, if it names a known
    /// format.
    #[arg(long, value_name = "FORMAT")]
    format: Option<OutputFormat>,

    /// Graphviz layout engine [default: dot]
    #[arg(long, value_name = "ENGINE")]
    engine: Option<String>,

    #[command(flatten)]
    list: List,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        self.execute()
    }

    /// Lists or renders the feats, once logging is set up.
    fn execute(self) -> anyhow::Result<()> {
        let feats = self
            .planner
            .load_feats()
            .with_context(|| format!("failed to load {}", self.planner.feats_file().display()))?;

        if self.list.enabled() {
            return self.list.run(&feats);
        }

        let config = self.config()?;
        let graph = FeatGraph::build(&feats);
        let attributes = Attributes {
            label: config.title(&self.planner.version()),
            rankdir: config.rankdir.clone(),
            font_size: config.font_size,
        };

        let layout = Layout::from_config(&config);
        layout.render(&graph, &attributes)?;

        println!(
            "{} {} ({} feats, {} nodes, {} edges)",
            "Wrote".success(),
            layout.output().display(),
            feats.len(),
            graph.node_count(),
            graph.edge_count()
        );
        Ok(())
    }

    /// Loads the configuration, with command-line options taking precedence.
    #[instrument(level = "debug", skip(self))]
    fn config(&self) -> anyhow::Result<Config> {
        let path = self
            .config
            .clone()
            .or_else(|| Some(self.planner.config_file()).filter(|path| path.is_file()));

        let mut config = match path {
            Some(path) => {
                debug!(path = %path.display(), "loading configuration");
                Config::load(&path).map_err(|e| anyhow::anyhow!("{e}"))?
            }
            None => Config::default(),
        };

        if let Some(output) = &self.output {
            config.output = output.to_string_lossy().into_owned();
            if let Some(format) = format_from_extension(output) {
                config.format = format;
            }
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(engine) = &self.engine {
            config.engine.clone_from(engine);
        }

        Ok(config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn format_from_extension(path: &std::path::Path) -> Option<OutputFormat> {
    path.extension()?.to_str()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use clap::Parser;
    use test_case::test_case;

    use super::*;

    fn planner() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("DataFiles")).unwrap();
        fs::write(
            tmp.path().join("DataFiles/FeatsFile.txt"),
            "FEATNAME: Dodge;\n\nFEATNAME: Mobility;\nNEEDSALL: Feat Dodge;\n",
        )
        .unwrap();
        tmp
    }

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("featgraph").chain(args.iter().copied()))
    }

    #[test]
    fn missing_planner_dir_is_a_usage_error() {
        let error = parse(&[]).unwrap_err();
        assert!(error.use_stderr());
    }

    #[test]
    fn nonexistent_planner_dir_is_a_usage_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing");

        let error = parse(&[missing.to_str().unwrap()]).unwrap_err();

        assert_eq!(error.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn defaults_without_config_file() {
        let tmp = planner();
        let cli = parse(&[tmp.path().to_str().unwrap()]).unwrap();

        assert_eq!(cli.config().unwrap(), Config::default());
    }

    #[test]
    fn config_file_in_planner_dir_is_used() {
        let tmp = planner();
        fs::write(
            tmp.path().join("featgraph.toml"),
            "_version = \"1\"\nrankdir = \"TB\"\n",
        )
        .unwrap();
        let cli = parse(&[tmp.path().to_str().unwrap()]).unwrap();

        assert_eq!(cli.config().unwrap().rankdir, "TB");
    }

    #[test]
    fn options_override_config() {
        let tmp = planner();
        let cli = parse(&[
            tmp.path().to_str().unwrap(),
            "--output",
            "graph.svg",
            "--engine",
            "neato",
        ])
        .unwrap();

        let config = cli.config().unwrap();

        assert_eq!(config.output, "graph.svg");
        assert_eq!(config.format, OutputFormat::Svg);
        assert_eq!(config.engine, "neato");
    }

    #[test]
    fn explicit_format_beats_extension() {
        let tmp = planner();
        let cli = parse(&[
            tmp.path().to_str().unwrap(),
            "-o",
            "graph.svg",
            "--format",
            "dot",
        ])
        .unwrap();

        assert_eq!(cli.config().unwrap().format, OutputFormat::Dot);
    }

    #[test]
    fn list_options_require_list() {
        let tmp = planner();
        assert!(parse(&[tmp.path().to_str().unwrap(), "--json"]).is_err());
        assert!(parse(&[tmp.path().to_str().unwrap(), "--list", "--json"]).is_ok());
    }

    #[test]
    fn renders_dot_graph_end_to_end() {
        let tmp = tempfile::tempdir().unwrap();
        let planner = tmp.path().join("DDOCharGen3");
        fs::create_dir_all(planner.join("DataFiles")).unwrap();
        fs::write(
            planner.join("DataFiles/FeatsFile.txt"),
            "FEATNAME: Dodge;\n\nFEATNAME: Mobility;\nNEEDSALL: Feat Dodge;\n",
        )
        .unwrap();
        let output = tmp.path().join("g.dot");

        parse(&[
            planner.to_str().unwrap(),
            "--format",
            "dot",
            "-o",
            output.to_str().unwrap(),
        ])
        .unwrap()
        .execute()
        .unwrap();

        let dot = fs::read_to_string(&output).unwrap();
        assert!(dot.contains("Data from Ron's Character Planner version 3"));
        assert!(dot.contains("\t\"Dodge\" -> \"Mobility\";\n"));
    }

    #[test]
    fn missing_feats_file_names_the_path() {
        let tmp = tempfile::tempdir().unwrap();

        let error = parse(&[tmp.path().to_str().unwrap()])
            .unwrap()
            .execute()
            .unwrap_err();

        assert!(error.to_string().contains("FeatsFile.txt"));
    }

    #[test_case("feats.png", Some(OutputFormat::Png); "png")]
    #[test_case("feats.SVG", Some(OutputFormat::Svg); "upper case")]
    #[test_case("feats.gv", Some(OutputFormat::Dot); "graphviz source")]
    #[test_case("feats.jpeg", None; "unknown")]
    #[test_case("feats", None; "no extension")]
    fn format_from_output_extension(path: &str, expected: Option<OutputFormat>) {
        assert_eq!(format_from_extension(Path::new(path)), expected);
    }
}
