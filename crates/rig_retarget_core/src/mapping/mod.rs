mod loader;
mod resolve;
pub mod serial;

pub use loader::*;
pub use resolve::*;

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::taxonomy::Taxonomy;

/// Reserved key holding the deletion set inside a serialized canonical table.
pub const DELETE_KEY: &str = "delete";

/// Authoritative rename table from pivot ([`Taxonomy::Mixamo`]) names to the names of one other
/// taxonomy, plus the bones that have no counterpart and must be removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalMapping {
    renames: IndexMap<String, String>,
    deletion_set: IndexSet<String>,
}

impl CanonicalMapping {
    /// Assumes the invariants were already validated, see [`serial::CanonicalMappingSerial`].
    pub(crate) fn from_parts(
        renames: IndexMap<String, String>,
        deletion_set: IndexSet<String>,
    ) -> Self {
        Self {
            renames,
            deletion_set,
        }
    }

    pub fn renames(&self) -> &IndexMap<String, String> {
        &self.renames
    }

    pub fn deletion_set(&self) -> &IndexSet<String> {
        &self.deletion_set
    }

    /// Names on the pivot side of the table.
    pub fn pivot_names(&self) -> impl Iterator<Item = &str> {
        self.renames.keys().map(String::as_str)
    }

    /// Names on the non-pivot side of the table.
    pub fn counterpart_names(&self) -> impl Iterator<Item = &str> {
        self.renames.values().map(String::as_str)
    }

    /// Pointwise inverse of the renames. The deletion set has no rename target and is never
    /// inverted. When two pivot names share a counterpart the last one in table order wins.
    pub fn inverted(&self) -> IndexMap<String, String> {
        let mut inverse = IndexMap::with_capacity(self.renames.len());
        for (pivot, other) in &self.renames {
            if let Some(previous) = inverse.insert(other.clone(), pivot.clone()) {
                debug!("`{other}` is mapped from both `{previous}` and `{pivot}`, keeping `{pivot}`");
            }
        }
        inverse
    }
}

/// Rename table between an arbitrary pair of taxonomies. Built per call, never cached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedMapping {
    renames: IndexMap<String, String>,
    deletion_set: IndexSet<String>,
}

impl ResolvedMapping {
    pub fn new(renames: IndexMap<String, String>, deletion_set: IndexSet<String>) -> Self {
        Self {
            renames,
            deletion_set,
        }
    }

    pub fn renames(&self) -> &IndexMap<String, String> {
        &self.renames
    }

    pub fn deletion_set(&self) -> &IndexSet<String> {
        &self.deletion_set
    }

    pub fn rename_for(&self, name: &str) -> Option<&str> {
        if name == DELETE_KEY {
            return None;
        }
        self.renames.get(name).map(String::as_str)
    }

    pub fn is_deleted(&self, name: &str) -> bool {
        self.deletion_set.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.renames.is_empty() && self.deletion_set.is_empty()
    }
}

/// The two canonical tables every mapping is derived from. Either may be missing, in which
/// case the pairs that need it resolve to an empty mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingTables {
    pub mixamo_moveone: Option<CanonicalMapping>,
    pub mixamo_vroid: Option<CanonicalMapping>,
}

impl MappingTables {
    /// Canonical table connecting the pivot to `taxonomy`. `None` for the pivot itself.
    pub fn table_for(&self, taxonomy: Taxonomy) -> Option<&CanonicalMapping> {
        match taxonomy {
            Taxonomy::Mixamo => None,
            Taxonomy::Vroid => self.mixamo_vroid.as_ref(),
            Taxonomy::MoveOne => self.mixamo_moveone.as_ref(),
        }
    }

    /// Deletion set attached to every resolved mapping. Always the VRoid table's, whichever
    /// pair is requested.
    pub fn deletion_set(&self) -> IndexSet<String> {
        self.mixamo_vroid
            .as_ref()
            .map(|table| table.deletion_set().clone())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.mixamo_moveone.is_none() && self.mixamo_vroid.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inversion_skips_deletion_set_and_keeps_last_duplicate() {
        let table = CanonicalMapping::from_parts(
            IndexMap::from([
                ("Spine1".to_string(), "chest".to_string()),
                ("Spine2".to_string(), "chest".to_string()),
                ("Hips".to_string(), "pelvis".to_string()),
            ]),
            IndexSet::from(["Tail".to_string()]),
        );

        let inverse = table.inverted();
        assert_eq!(inverse.len(), 2);
        assert_eq!(inverse["chest"], "Spine2");
        assert_eq!(inverse["pelvis"], "Hips");
        assert!(!inverse.contains_key("Tail"));
    }

    #[test]
    fn delete_key_is_never_renamed() {
        let mapping = ResolvedMapping::new(
            IndexMap::from([(DELETE_KEY.to_string(), "oops".to_string())]),
            IndexSet::new(),
        );
        assert_eq!(mapping.rename_for(DELETE_KEY), None);
    }
}
