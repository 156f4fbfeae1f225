use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

/// The placeholder in title lines that is replaced with the planner version.
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Settings controlling how the graph is laid out and rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Lines of the title drawn under the graph.
    ///
    /// Any `{version}` placeholder is replaced with the planner version label.
    title: Vec<String>,

    /// Direction in which the graph is laid out, such as `LR` or `TB`.
    pub rankdir: String,

    /// Font size of node labels, in points.
    pub font_size: u32,

    /// The Graphviz layout engine to run, such as `dot` or `neato`.
    pub engine: String,

    /// Format of the rendered output.
    pub format: OutputFormat,

    /// Where to write the rendered output.
    pub output: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: default_title(),
            rankdir: default_rankdir(),
            font_size: default_font_size(),
            engine: default_engine(),
            format: OutputFormat::default(),
            output: default_output(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// The title for a given planner version label, one line per title line.
    #[must_use]
    pub fn title(&self, version: &str) -> String {
        self.title
            .iter()
            .map(|line| line.replace(VERSION_PLACEHOLDER, version))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The file format the graph is rendered to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A PNG image.
    #[default]
    Png,
    /// An SVG image.
    Svg,
    /// A PDF document.
    Pdf,
    /// Graphviz DOT source, without running a layout engine.
    Dot,
}

impl OutputFormat {
    /// The format name as understood by Graphviz' `-T` option.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
            Self::Dot => "dot",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an output format name is not recognised.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown output format '{0}': expected one of png, svg, pdf, dot")]
pub struct UnknownFormatError(String);

impl FromStr for OutputFormat {
    type Err = UnknownFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            "pdf" => Ok(Self::Pdf),
            "dot" | "gv" => Ok(Self::Dot),
            _ => Err(UnknownFormatError(s.to_string())),
        }
    }
}

fn default_title() -> Vec<String> {
    [
        "DDO feat dependency graph by stoerm",
        "Idea by Peter_Principle and unbongwah",
        "Data from Ron's Character Planner {version}",
        "Cool kids don't dupe",
    ]
    .map(String::from)
    .to_vec()
}

fn default_rankdir() -> String {
    "LR".to_string()
}

const fn default_font_size() -> u32 {
    10
}

fn default_engine() -> String {
    "dot".to_string()
}

fn default_output() -> String {
    "feats_dot.png".to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_title")]
        title: Vec<String>,

        #[serde(default = "default_rankdir")]
        rankdir: String,

        #[serde(default = "default_font_size")]
        font_size: u32,

        #[serde(default = "default_engine")]
        engine: String,

        #[serde(default)]
        format: OutputFormat,

        #[serde(default = "default_output")]
        output: String,
    },
}

impl From<Versions> for super::Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                title,
                rankdir,
                font_size,
                engine,
                format,
                output,
            } => Self {
                title,
                rankdir,
                font_size,
                engine,
                format,
                output,
            },
        }
    }
}

impl From<super::Config> for Versions {
    fn from(config: super::Config) -> Self {
        Self::V1 {
            title: config.title,
            rankdir: config.rankdir,
            font_size: config.font_size,
            engine: config.engine,
            format: config.format,
            output: config.output,
        }
    }
}
