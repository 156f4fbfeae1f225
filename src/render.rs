//! Rendering of the feat graph to an image.
//!
//! Layout is left to an external Graphviz engine. The graph is written as DOT
//! source to the engine's stdin, and the engine writes the output file.

use std::{
    fs, io,
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use tracing::{debug, info, instrument};

use crate::domain::{Config, FeatGraph, OutputFormat};

pub mod dot;
pub use dot::{Attributes, to_dot, write_dot};

/// Errors that can occur when rendering the graph.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The layout engine could not be started.
    #[error("failed to run layout engine '{engine}' (is Graphviz installed?)")]
    Spawn {
        /// Name of the engine.
        engine: String,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The layout engine ran but reported a failure.
    #[error("layout engine '{engine}' failed ({status}): {stderr}")]
    Engine {
        /// Name of the engine.
        engine: String,
        /// The engine's exit status.
        status: std::process::ExitStatus,
        /// What the engine printed to stderr.
        stderr: String,
    },

    /// Writing the DOT source or the output file failed.
    #[error("failed to write graph output")]
    Io(#[from] io::Error),
}

/// Lays out and renders a graph with a Graphviz engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    engine: String,
    format: OutputFormat,
    output: PathBuf,
}

impl Layout {
    /// Creates a layout writing `format` to `output` using `engine`.
    #[must_use]
    pub fn new(engine: impl Into<String>, format: OutputFormat, output: impl Into<PathBuf>) -> Self {
        Self {
            engine: engine.into(),
            format,
            output: output.into(),
        }
    }

    /// Creates a layout from the engine, format and output path of a
    /// configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.engine.clone(), config.format, &config.output)
    }

    /// Where the output is written.
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Renders `graph` to the output file.
    ///
    /// For [`OutputFormat::Dot`] the DOT source is written directly and no
    /// engine is run.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be run, exits unsuccessfully, or
    /// the output cannot be written.
    #[instrument(level = "debug", skip(graph, attributes))]
    pub fn render(&self, graph: &FeatGraph, attributes: &Attributes) -> Result<(), RenderError> {
        let source = to_dot(graph, attributes);

        if self.format == OutputFormat::Dot {
            fs::write(&self.output, source)?;
        } else {
            self.run_engine(&source)?;
        }

        info!(output = %self.output.display(), format = %self.format, "rendered feat graph");
        Ok(())
    }

    fn run_engine(&self, source: &str) -> Result<(), RenderError> {
        debug!(engine = %self.engine, "running layout engine");

        let spawn_error = |source| RenderError::Spawn {
            engine: self.engine.clone(),
            source,
        };

        let mut child = Command::new(&self.engine)
            .arg(format!("-T{}", self.format))
            .arg("-o")
            .arg(&self.output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        // An engine that fails early stops reading, so a broken pipe here is
        // only reported if the engine itself claims success.
        let written = child
            .stdin
            .take()
            .map_or(Ok(()), |mut stdin| stdin.write_all(source.as_bytes()));

        let result = child.wait_with_output()?;
        if !result.status.success() {
            return Err(RenderError::Engine {
                engine: self.engine.clone(),
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        written?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dependency, Feat};

    fn graph() -> FeatGraph {
        FeatGraph::build(&[Feat {
            name: "Mobility".to_string(),
            required_deps: vec![Dependency::new("Feat", "Dodge")],
            ..Feat::default()
        }])
    }

    fn attributes() -> Attributes {
        Attributes {
            label: "Feats".to_string(),
            rankdir: "LR".to_string(),
            font_size: 10,
        }
    }

    #[test]
    fn dot_format_writes_source_without_engine() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("feats.dot");
        let layout = Layout::new("no-such-graphviz-engine", OutputFormat::Dot, &output);

        layout.render(&graph(), &attributes()).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(written, to_dot(&graph(), &attributes()));
        assert!(written.contains("\"Dodge\" -> \"Mobility\""));
    }

    #[test]
    fn missing_engine_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = Layout::new(
            "no-such-graphviz-engine",
            OutputFormat::Png,
            tmp.path().join("feats.png"),
        );

        let error = layout.render(&graph(), &attributes()).unwrap_err();

        assert!(
            matches!(&error, RenderError::Spawn { engine, .. } if engine == "no-such-graphviz-engine")
        );
    }

    /// Writes an executable shell script standing in for a Graphviz engine.
    #[cfg(unix)]
    fn fake_engine(dir: &Path, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-engine");
        fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// A graph whose DOT source is far larger than a pipe buffer.
    #[cfg(unix)]
    fn large_graph() -> FeatGraph {
        let feats: Vec<_> = (0..20_000)
            .map(|i| Feat {
                name: format!("Feat {i}"),
                required_deps: vec![Dependency::new("Feat", format!("Prerequisite {i}"))],
                ..Feat::default()
            })
            .collect();
        FeatGraph::build(&feats)
    }

    #[cfg(unix)]
    #[test]
    fn engine_failure_before_reading_input_reports_stderr() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = fake_engine(tmp.path(), "echo 'Error: bad layout' >&2\nexit 3");
        let layout = Layout::new(
            engine.to_string_lossy(),
            OutputFormat::Png,
            tmp.path().join("feats.png"),
        );

        let error = layout.render(&large_graph(), &attributes()).unwrap_err();

        match error {
            RenderError::Engine { status, stderr, .. } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "Error: bad layout");
            }
            other => panic!("expected an engine error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn engine_success_consumes_input() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = fake_engine(tmp.path(), "cat > /dev/null");
        let layout = Layout::new(
            engine.to_string_lossy(),
            OutputFormat::Svg,
            tmp.path().join("feats.svg"),
        );

        layout.render(&large_graph(), &attributes()).unwrap();
    }

    #[test]
    fn from_config_uses_configured_values() {
        let mut config = Config::default();
        config.engine = "neato".to_string();
        config.format = OutputFormat::Svg;
        config.output = "out/feats.svg".to_string();

        let layout = Layout::from_config(&config);

        assert_eq!(layout, Layout::new("neato", OutputFormat::Svg, "out/feats.svg"));
        assert_eq!(layout.output(), Path::new("out/feats.svg"));
    }
}
