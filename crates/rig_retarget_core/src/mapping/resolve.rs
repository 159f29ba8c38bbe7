use indexmap::IndexMap;
use tracing::{debug, warn};

use super::{CanonicalMapping, MappingTables, ResolvedMapping};
use crate::taxonomy::Taxonomy;

/// How a mapping between two taxonomies is obtained from the canonical tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Same taxonomy on both sides: nothing to do.
    Identity,
    /// Pivot to `.0`: the canonical table as-is.
    FromPivot(Taxonomy),
    /// `.0` to pivot: the pointwise inverse of the canonical table.
    ToPivot(Taxonomy),
    /// Neither side is the pivot: both tables joined on their pivot names.
    Composed { from: Taxonomy, to: Taxonomy },
}

impl Route {
    pub fn between(source: Taxonomy, target: Taxonomy) -> Self {
        use Taxonomy::*;

        match (source, target) {
            (Mixamo, Mixamo) | (Vroid, Vroid) | (MoveOne, MoveOne) => Self::Identity,
            (Mixamo, other @ (Vroid | MoveOne)) => Self::FromPivot(other),
            (other @ (Vroid | MoveOne), Mixamo) => Self::ToPivot(other),
            (Vroid, MoveOne) => Self::Composed {
                from: Vroid,
                to: MoveOne,
            },
            (MoveOne, Vroid) => Self::Composed {
                from: MoveOne,
                to: Vroid,
            },
        }
    }
}

/// Builds the rename table taking bone names of `source` to bone names of `target`.
///
/// Identical taxonomies, or a pair whose canonical table is missing, resolve to an empty
/// mapping. Every other pair carries the VRoid table's deletion set regardless of which
/// taxonomies are involved.
pub fn resolve(source: Taxonomy, target: Taxonomy, tables: &MappingTables) -> ResolvedMapping {
    let route = Route::between(source, target);

    let renames = match route {
        Route::Identity => return ResolvedMapping::default(),
        Route::FromPivot(taxonomy) => tables
            .table_for(taxonomy)
            .map(|table| table.renames().clone()),
        Route::ToPivot(taxonomy) => tables.table_for(taxonomy).map(CanonicalMapping::inverted),
        Route::Composed { from, to } => match (tables.table_for(from), tables.table_for(to)) {
            (Some(from_table), Some(to_table)) => Some(compose(from_table, to_table)),
            _ => None,
        },
    };

    let Some(renames) = renames else {
        warn!("No canonical table available to map {source} to {target}, nothing will be renamed");
        return ResolvedMapping::default();
    };

    debug!(
        "Resolved {} renames for {source} to {target} via {route:?}",
        renames.len()
    );

    ResolvedMapping::new(renames, tables.deletion_set())
}

/// Joins two pivot-keyed tables on their pivot names, producing `from` names to `to` names.
/// Pivot names present in only one of the tables produce no entry. When several pivot names
/// share a `from` name the last one in table order wins, as with [`CanonicalMapping::inverted`].
fn compose(from: &CanonicalMapping, to: &CanonicalMapping) -> IndexMap<String, String> {
    let mut composed = IndexMap::new();

    for (pivot, source_name) in from.renames() {
        let Some(target_name) = to.renames().get(pivot) else {
            continue;
        };
        if let Some(previous) = composed.insert(source_name.clone(), target_name.clone()) {
            debug!(
                "`{source_name}` is mapped to both `{previous}` and `{target_name}`, keeping `{target_name}`"
            );
        }
    }

    composed
}
