use thiserror::Error;

use crate::taxonomy::Taxonomy;

/// The caller asked for something that cannot be done with the current selection.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("no target rig type selected")]
    NoTarget,
    #[error("could not detect the rig type of `{0}`, pass the source rig type explicitly")]
    UnknownSourceRig(String),
    #[error("`{skeleton}` is already a {taxonomy} rig")]
    AlreadyTarget { skeleton: String, taxonomy: Taxonomy },
    #[error("please select two different armatures, got `{0}` twice")]
    SameSkeleton(String),
}
