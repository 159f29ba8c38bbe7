use std::collections::HashSet;

use tracing::debug;

use crate::{
    errors::ConfigurationError, mapping::MappingTables, skeleton::Skeleton, taxonomy::Taxonomy,
};

/// A taxonomy is detected when more than this fraction of its reference bones is present.
pub const DETECTION_THRESHOLD: f32 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// `None` when no reference set is covered above [`DETECTION_THRESHOLD`].
    pub taxonomy: Option<Taxonomy>,
    /// Overlap ratio per taxonomy, in [`Taxonomy::DETECTION_ORDER`].
    pub scores: [(Taxonomy, f32); 3],
}

impl Classification {
    pub fn score(&self, taxonomy: Taxonomy) -> f32 {
        self.scores
            .iter()
            .find_map(|(t, score)| (*t == taxonomy).then_some(*score))
            .unwrap_or_default()
    }
}

/// Bone names a rig of `taxonomy` is expected to contain, derived from the canonical tables.
pub fn reference_set(taxonomy: Taxonomy, tables: &MappingTables) -> HashSet<&str> {
    match taxonomy {
        Taxonomy::Mixamo => tables
            .mixamo_moveone
            .iter()
            .flat_map(|table| table.pivot_names())
            .collect(),
        Taxonomy::MoveOne => tables
            .mixamo_moveone
            .iter()
            .flat_map(|table| table.counterpart_names())
            .collect(),
        Taxonomy::Vroid => tables
            .mixamo_vroid
            .iter()
            .flat_map(|table| table.counterpart_names())
            .collect(),
    }
}

/// Decides which taxonomy a set of bone names follows.
///
/// The score of a taxonomy is `|names ∩ reference| / |reference|`, so extra bones in the rig do
/// not count against it. Ties above the threshold are broken by [`Taxonomy::DETECTION_ORDER`].
pub fn classify<'a>(
    bone_names: impl IntoIterator<Item = &'a str>,
    tables: &MappingTables,
) -> Result<Classification, ConfigurationError> {
    let bone_names: HashSet<&str> = bone_names.into_iter().collect();

    let mut scores = Taxonomy::DETECTION_ORDER.map(|taxonomy| (taxonomy, 0.));
    for (taxonomy, score) in &mut scores {
        let reference = reference_set(*taxonomy, tables);
        if reference.is_empty() {
            return Err(ConfigurationError::EmptyReferenceSet(*taxonomy));
        }
        let overlap = reference.intersection(&bone_names).count();
        *score = overlap as f32 / reference.len() as f32;
    }

    let taxonomy = scores
        .iter()
        .find(|(_, score)| *score > DETECTION_THRESHOLD)
        .map(|(taxonomy, _)| *taxonomy);

    debug!("Rig classified as {taxonomy:?} with scores {scores:?}");

    Ok(Classification { taxonomy, scores })
}

/// Classifies the bones currently in `skeleton`.
pub fn detect(
    skeleton: &Skeleton,
    tables: &MappingTables,
) -> Result<Classification, ConfigurationError> {
    classify(skeleton.bones().map(|bone| bone.name()), tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> MappingTables {
        MappingTables::bundled().unwrap()
    }

    #[test]
    fn exact_reference_set_scores_one() {
        let tables = tables();
        for taxonomy in Taxonomy::ALL {
            let names: Vec<&str> = reference_set(taxonomy, &tables).into_iter().collect();
            let classification = classify(names, &tables).unwrap();
            assert_eq!(classification.taxonomy, Some(taxonomy));
            assert_eq!(classification.score(taxonomy), 1.0);
        }
    }

    #[test]
    fn low_overlap_is_unknown() {
        let tables = tables();
        let names = ["Hips", "Spine", "J_Bip_C_Head", "hips", "Tail", "Wing"];
        let classification = classify(names, &tables).unwrap();
        assert_eq!(classification.taxonomy, None);
        assert!(classification.scores.iter().all(|(_, s)| *s < 0.8));
    }

    #[test]
    fn threshold_is_strict() {
        let tables = MappingTables::from_json_str(
            r#"{"mixamo_moveone_mapping": {"A": "a", "B": "b", "C": "c", "D": "d", "E": "e"},
                "mixamo_vroid_mapping": {"A": "va"}}"#,
        )
        .unwrap();
        // 4 of 5 is exactly 0.8 and must not count.
        let classification = classify(["A", "B", "C", "D"], &tables).unwrap();
        assert_eq!(classification.taxonomy, None);
        let classification = classify(["A", "B", "C", "D", "E"], &tables).unwrap();
        assert_eq!(classification.taxonomy, Some(Taxonomy::Mixamo));
    }

    #[test]
    fn priority_order_breaks_ties() {
        // Mixamo and Move-One share their names here, so both sets are fully covered.
        let tables = MappingTables::from_json_str(
            r#"{"mixamo_moveone_mapping": {"Hips": "Hips", "Spine": "Spine"},
                "mixamo_vroid_mapping": {"Hips": "Hips", "Spine": "Spine"}}"#,
        )
        .unwrap();
        let classification = classify(["Hips", "Spine"], &tables).unwrap();
        assert_eq!(classification.taxonomy, Some(Taxonomy::Mixamo));
        assert_eq!(classification.score(Taxonomy::Vroid), 1.0);
    }

    #[test]
    fn empty_reference_set_is_a_configuration_error() {
        let tables = MappingTables {
            mixamo_vroid: None,
            ..tables()
        };
        assert!(matches!(
            classify(["Hips"], &tables),
            Err(ConfigurationError::EmptyReferenceSet(Taxonomy::Vroid))
        ));
    }
}
