use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::{mapping::ResolvedMapping, skeleton::Skeleton};

/// What a structural conversion did to a skeleton.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub deleted: Vec<String>,
    /// `(old, new)` pairs, in skeleton order.
    pub renamed: Vec<(String, String)>,
    /// Bones left with their original name.
    pub unmapped: Vec<String>,
    /// Names carried by more than one bone after the rename pass.
    pub collisions: Vec<String>,
}

/// Applies `mapping` to `skeleton` in place: first removes every bone in the deletion set, then
/// renames the remaining bones.
///
/// Children of deleted bones are not re-parented; they become roots. Renames are looked up with
/// the name each bone had when the pass started, so `A -> B, B -> A` swaps rather than chains.
/// Duplicate names produced by the rename pass are reported in
/// [`ConversionReport::collisions`] but left in place.
pub fn convert(skeleton: &mut Skeleton, mapping: &ResolvedMapping) -> ConversionReport {
    let mut report = ConversionReport::default();

    if mapping.deletion_set().is_empty() {
        warn!("Deletion set is empty, no bones of `{}` will be removed", skeleton.name());
    }

    let mut edit = skeleton.edit_structure();

    let to_delete: Vec<_> = edit
        .bone_ids()
        .filter(|id| {
            edit.bone(*id)
                .is_some_and(|bone| mapping.is_deleted(bone.name()))
        })
        .collect();

    for id in to_delete {
        if let Some(bone) = edit.remove_bone(id) {
            debug!("Deleted bone: {}", bone.name());
            report.deleted.push(bone.name().to_string());
        }
    }

    let to_rename: Vec<_> = edit
        .bone_ids()
        .filter_map(|id| edit.bone(id).map(|bone| (id, bone.name().to_string())))
        .collect();

    for (id, name) in to_rename {
        match mapping.rename_for(&name) {
            Some(new_name) => {
                edit.rename_bone(id, new_name);
                report.renamed.push((name, new_name.to_string()));
            }
            None => {
                debug!("Unmapped bone: {name}");
                report.unmapped.push(name);
            }
        }
    }

    report.collisions = duplicate_names(&edit);
    drop(edit);

    for name in &report.collisions {
        warn!("Several bones of `{}` are now called `{name}`", skeleton.name());
    }

    info!(
        "Converted `{}`: {} deleted, {} renamed, {} unmapped",
        skeleton.name(),
        report.deleted.len(),
        report.renamed.len(),
        report.unmapped.len()
    );

    report
}

fn duplicate_names(skeleton: &Skeleton) -> Vec<String> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for name in skeleton.bone_names() {
        *counts.entry(name).or_default() += 1;
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use bevy::math::Isometry3d;
    use indexmap::IndexSet;

    use super::*;

    fn mapping(renames: &[(&str, &str)], delete: &[&str]) -> ResolvedMapping {
        ResolvedMapping::new(
            renames
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect::<IndexMap<_, _>>(),
            delete.iter().map(|d| d.to_string()).collect::<IndexSet<_>>(),
        )
    }

    #[test]
    fn deletes_then_renames() {
        let mut skeleton = Skeleton::new("rig");
        let hips = skeleton.add_bone("Hips", None, Isometry3d::IDENTITY);
        skeleton.add_bone("LeftUpLeg", Some(hips), Isometry3d::IDENTITY);
        skeleton.add_bone("DELETE_ME", Some(hips), Isometry3d::IDENTITY);

        let report = convert(&mut skeleton, &mapping(&[("Hips", "hips")], &["DELETE_ME"]));

        let mut names: Vec<_> = skeleton.bone_names().collect();
        names.sort();
        assert_eq!(names, vec!["LeftUpLeg", "hips"]);
        assert_eq!(report.deleted, vec!["DELETE_ME"]);
        assert_eq!(report.renamed, vec![("Hips".to_string(), "hips".to_string())]);
        assert_eq!(report.unmapped, vec!["LeftUpLeg"]);
        assert!(report.collisions.is_empty());
    }

    #[test]
    fn orphans_of_deleted_bones_become_roots_and_are_still_renamed() {
        let mut skeleton = Skeleton::new("rig");
        let root = skeleton.add_bone("Armature", None, Isometry3d::IDENTITY);
        let hips = skeleton.add_bone("Hips", Some(root), Isometry3d::IDENTITY);

        convert(&mut skeleton, &mapping(&[("Hips", "hips")], &["Armature"]));

        assert_eq!(skeleton.roots().collect::<Vec<_>>(), vec![hips]);
        assert_eq!(skeleton.bone(hips).unwrap().name(), "hips");
    }

    #[test]
    fn renames_swap_instead_of_chaining() {
        let mut skeleton = Skeleton::new("rig");
        let a = skeleton.add_bone("A", None, Isometry3d::IDENTITY);
        let b = skeleton.add_bone("B", None, Isometry3d::IDENTITY);

        let report = convert(&mut skeleton, &mapping(&[("A", "B"), ("B", "A")], &[]));

        assert_eq!(skeleton.bone(a).unwrap().name(), "B");
        assert_eq!(skeleton.bone(b).unwrap().name(), "A");
        assert!(report.collisions.is_empty());
    }

    #[test]
    fn collisions_are_reported_not_resolved() {
        let mut skeleton = Skeleton::new("rig");
        skeleton.add_bone("Spine1", None, Isometry3d::IDENTITY);
        skeleton.add_bone("chest", None, Isometry3d::IDENTITY);

        let report = convert(&mut skeleton, &mapping(&[("Spine1", "chest")], &[]));

        assert_eq!(report.collisions, vec!["chest"]);
        assert_eq!(skeleton.bone_names().filter(|n| *n == "chest").count(), 2);
    }

    #[test]
    fn empty_mapping_is_a_no_op() {
        let mut skeleton = Skeleton::new("rig");
        skeleton.add_bone("Hips", None, Isometry3d::IDENTITY);

        let report = convert(&mut skeleton, &ResolvedMapping::default());

        assert_eq!(skeleton.bone_names().collect::<Vec<_>>(), vec!["Hips"]);
        assert_eq!(report.unmapped, vec!["Hips"]);
    }
}
