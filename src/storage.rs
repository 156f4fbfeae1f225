pub mod feats_file;
pub mod planner;
/// Parsing of individual feat records.
pub mod record;

pub use feats_file::FeatsFileError;
pub use planner::{PlannerDir, PlannerDirError};
pub use record::ParseError;
