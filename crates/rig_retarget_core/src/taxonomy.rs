use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Bone naming convention a rig follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Taxonomy {
    /// Mixamo (`Hips`, `LeftUpLeg`, ...). Every canonical table is keyed by Mixamo names.
    Mixamo,
    /// VRoid Studio (`J_Bip_C_Hips`, ...).
    Vroid,
    /// Move-One capture rigs.
    MoveOne,
}

impl Taxonomy {
    pub const ALL: [Taxonomy; 3] = [Self::Mixamo, Self::Vroid, Self::MoveOne];

    /// Hub through which mappings between the other two are composed.
    pub const PIVOT: Taxonomy = Self::Mixamo;

    /// Tie-break order used by the classifier when several reference sets match.
    pub const DETECTION_ORDER: [Taxonomy; 3] = [Self::Mixamo, Self::MoveOne, Self::Vroid];

    pub fn is_pivot(self) -> bool {
        self == Self::PIVOT
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Mixamo => "Mixamo",
            Self::Vroid => "VRoid",
            Self::MoveOne => "Move-One",
        }
    }
}

impl fmt::Display for Taxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rig type `{0}`, expected one of: mixamo, vroid, moveone")]
pub struct ParseTaxonomyError(pub String);

impl FromStr for Taxonomy {
    type Err = ParseTaxonomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "mixamo" => Ok(Self::Mixamo),
            "vroid" => Ok(Self::Vroid),
            "moveone" => Ok(Self::MoveOne),
            _ => Err(ParseTaxonomyError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_and_cli_spellings() {
        for taxonomy in Taxonomy::ALL {
            assert_eq!(taxonomy.label().parse::<Taxonomy>(), Ok(taxonomy));
        }
        assert_eq!("move_one".parse::<Taxonomy>(), Ok(Taxonomy::MoveOne));
        assert_eq!("VROID".parse::<Taxonomy>(), Ok(Taxonomy::Vroid));
        assert!("rigify".parse::<Taxonomy>().is_err());
    }
}
