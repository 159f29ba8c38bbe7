use thiserror::Error;

/// A bone the pose aligner could not process. Never aborts the traversal.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AlignmentSkip {
    #[error("bone `{0}` not found in both armatures")]
    MissingCounterpart(String),
    /// The bone and every bone below it were left untouched.
    #[error("bone `{bone}` has a degenerate world transform in the {side} armature")]
    Degenerate { bone: String, side: ArmatureSide },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmatureSide {
    Active,
    Source,
}

impl std::fmt::Display for ArmatureSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Source => f.write_str("source"),
        }
    }
}
