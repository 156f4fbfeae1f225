//! The character planner's installation directory.

use std::path::{Path, PathBuf};

use crate::{domain::Feat, storage::feats_file::FeatsFileError};

/// Prefix of the planner's installation directory name. Whatever follows it is
/// the planner version.
const VERSIONED_DIR_PREFIX: &str = "DDOCharGen";

/// Name of the optional configuration file inside the planner directory.
pub const CONFIG_FILE_NAME: &str = "featgraph.toml";

/// Errors that can occur when opening a planner directory.
#[derive(Debug, thiserror::Error)]
pub enum PlannerDirError {
    /// The path does not exist, or is not a directory.
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
}

/// A character planner installation, containing its data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerDir {
    root: PathBuf,
}

impl PlannerDir {
    /// Opens the planner installation at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is not an existing directory.
    pub fn new(root: PathBuf) -> Result<Self, PlannerDirError> {
        if root.is_dir() {
            Ok(Self { root })
        } else {
            Err(PlannerDirError::NotADirectory(root))
        }
    }

    /// The root of the installation.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the feats data file.
    #[must_use]
    pub fn feats_file(&self) -> PathBuf {
        self.root.join("DataFiles").join("FeatsFile.txt")
    }

    /// Path of the optional configuration file.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    /// Loads every feat from the feats data file.
    ///
    /// # Errors
    ///
    /// Returns an error if the feats file cannot be read or is malformed.
    pub fn load_feats(&self) -> Result<Vec<Feat>, FeatsFileError> {
        crate::storage::feats_file::load(&self.feats_file())
    }

    /// A label for the planner version, such as `version 3.8.1`.
    ///
    /// The version is taken from the installation directory name
    /// (`DDOCharGen3.8.1`). This is empty when the directory has been renamed.
    #[must_use]
    pub fn version(&self) -> String {
        version_label(&self.root)
    }
}

fn version_label(root: &Path) -> String {
    root.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_prefix(VERSIONED_DIR_PREFIX))
        .map(|version| format!("version {version}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use test_case::test_case;

    use super::*;

    #[test_case("DDOCharGen3.8.1", "version 3.8.1"; "versioned")]
    #[test_case("/opt/games/DDOCharGen_2012", "version _2012"; "nested")]
    #[test_case("DDOCharGen", "version "; "prefix only")]
    #[test_case("planner", ""; "renamed")]
    #[test_case("ddochargen3", ""; "prefix is case sensitive")]
    fn version_from_directory_name(root: &str, expected: &str) {
        assert_eq!(version_label(Path::new(root)), expected);
    }

    #[test]
    fn trailing_separator_is_ignored() {
        assert_eq!(version_label(Path::new("DDOCharGen4/")), "version 4");
    }

    #[test]
    fn new_rejects_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing");

        let error = PlannerDir::new(missing.clone()).unwrap_err();
        assert!(matches!(error, PlannerDirError::NotADirectory(path) if path == missing));
    }

    #[test]
    fn new_rejects_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(PlannerDir::new(file.path().to_path_buf()).is_err());
    }

    #[test]
    fn feats_file_is_under_data_files() {
        let tmp = tempfile::tempdir().unwrap();
        let planner = PlannerDir::new(tmp.path().to_path_buf()).unwrap();

        assert_eq!(
            planner.feats_file(),
            tmp.path().join("DataFiles").join("FeatsFile.txt")
        );
        assert_eq!(planner.config_file(), tmp.path().join("featgraph.toml"));
    }

    #[test]
    fn load_feats_reads_data_file() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("DDOCharGen3");
        fs::create_dir_all(root.join("DataFiles")).unwrap();
        fs::write(
            root.join("DataFiles/FeatsFile.txt"),
            "FEATNAME: Dodge;\n\nFEATNAME: Mobility;\nNEEDSALL: Feat Dodge;\n",
        )
        .unwrap();

        let planner = PlannerDir::new(root).unwrap();
        let feats = planner.load_feats().unwrap();

        assert_eq!(planner.version(), "version 3");
        assert_eq!(feats.len(), 2);
        assert_eq!(feats[1].feat_deps(), ["Dodge"]);
    }
}
