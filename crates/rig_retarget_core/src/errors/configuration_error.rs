use thiserror::Error;

use crate::taxonomy::Taxonomy;

/// Errors caused by malformed or missing mapping tables and skeleton files. These abort the
/// requested operation.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not parse RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("could not serialize RON: {0}")]
    RonSerialize(#[from] ron::Error),
    #[error("unsupported file extension for {0:?}, expected .json or .ron")]
    UnsupportedExtension(String),
    #[error("mapping table `{table}` uses the reserved key `delete` for a rename")]
    ReservedKey { table: String },
    #[error("mapping table `{table}` maps `{key}` to something other than a bone name")]
    NotARename { table: String, key: String },
    #[error("mapping table `{table}` both renames and deletes bone `{bone}`")]
    DeletedAndRenamed { table: String, bone: String },
    #[error("reference bone set for {0} is empty, check the mapping tables")]
    EmptyReferenceSet(Taxonomy),
    #[error("skeleton `{skeleton}` declares bone `{bone}` more than once")]
    DuplicateBone { skeleton: String, bone: String },
    #[error("bone `{bone}` in skeleton `{skeleton}` refers to unknown parent `{parent}`")]
    UnknownParent {
        skeleton: String,
        bone: String,
        parent: String,
    },
}
