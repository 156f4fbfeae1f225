//! Reading of a whole feats file.
//!
//! Records are separated by blank (whitespace-only) lines. The end of the file
//! also ends a record, so a final record without a trailing blank line is not
//! lost.

use std::{fs, io, path::Path};

use tracing::{debug, info, instrument};

use crate::{domain::Feat, storage::record::ParseError};

/// Errors that can occur when loading a feats file.
#[derive(Debug, thiserror::Error)]
pub enum FeatsFileError {
    /// The file could not be read.
    #[error("failed to read feats file")]
    Io(#[from] io::Error),

    /// A record could not be parsed.
    #[error("record {block} (starting at line {line}) is invalid")]
    Record {
        /// 1-based index of the record in the file.
        block: usize,
        /// 1-based line number of the first line of the record.
        line: usize,
        /// The underlying error.
        #[source]
        source: ParseError,
    },
}

/// A raw record: the lines between two blank lines.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Block<'a> {
    /// 1-based line number of the first line.
    line: usize,
    text: Vec<&'a str>,
}

/// Loads every feat from the feats file at `path`.
///
/// The file is decoded leniently, since planner data files are not guaranteed
/// to be valid UTF-8.
///
/// # Errors
///
/// Returns an error if the file cannot be read, or if any record in it is
/// malformed.
#[instrument(level = "debug")]
pub fn load(path: &Path) -> Result<Vec<Feat>, FeatsFileError> {
    let bytes = fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    let feats = parse(&content)?;
    info!(count = feats.len(), "loaded feats");
    Ok(feats)
}

/// Parses every feat from the contents of a feats file, in file order.
///
/// Records without a `FEATNAME` (such as the file's header) are skipped.
///
/// # Errors
///
/// Returns [`FeatsFileError::Record`] identifying the first malformed record.
pub fn parse(content: &str) -> Result<Vec<Feat>, FeatsFileError> {
    let mut feats = Vec::new();

    for (index, block) in blocks(content).enumerate() {
        let text = block.text.join("\n");
        let feat = Feat::from_text(&text).map_err(|source| FeatsFileError::Record {
            block: index + 1,
            line: block.line,
            source,
        })?;

        if feat.name.is_empty() {
            debug!(line = block.line, "skipping record without a FEATNAME");
            continue;
        }

        feats.push(feat);
    }

    Ok(feats)
}

/// Splits file contents into records.
///
/// Runs of blank lines are treated as a single separator.
fn blocks(content: &str) -> impl Iterator<Item = Block<'_>> {
    let mut lines = content.lines().enumerate().peekable();

    std::iter::from_fn(move || {
        // Skip to the first line of the next block.
        while lines.next_if(|(_, line)| line.trim().is_empty()).is_some() {}

        let &(start, _) = lines.peek()?;
        let text = std::iter::from_fn(|| lines.next_if(|(_, line)| !line.trim().is_empty()))
            .map(|(_, line)| line)
            .collect();

        Some(Block {
            line: start + 1,
            text,
        })
    })
}
