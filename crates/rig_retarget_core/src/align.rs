//! Pose matching between two skeletons that share bone names.
//!
//! Every bone of the active skeleton is moved so that its world transform matches the bone of
//! the same name in the source skeleton, shifted by the distance between the two skeleton
//! origins. Bones are processed parent-first, so each correction is computed against the
//! already-corrected ancestors.

use std::collections::{HashMap, HashSet};

use bevy::math::{Dir3, Isometry3d, Quat, Vec3A};
use tracing::{debug, info, trace, warn};

use crate::{
    errors::{AlignmentSkip, ArmatureSide},
    skeleton::{BoneId, Skeleton},
    space_conversion::SpaceConversion,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignConfig {
    /// Secondary bone axis used to measure the roll difference between matched bones.
    pub roll_axis: Dir3,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            roll_axis: Dir3::Y,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoneAlignment {
    pub name: String,
    /// Rotation between the source and active roll axes before the correction. Measured only,
    /// never applied to the pose.
    pub roll: Quat,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignmentReport {
    /// Bones of the active skeleton whose transform was overwritten, in visiting order.
    pub aligned: Vec<BoneAlignment>,
    pub skipped: Vec<AlignmentSkip>,
    /// Source bones with no bone of the same name in the active skeleton.
    pub unmatched_source: Vec<String>,
}

/// Overwrites the local transforms of `active` so that its pose matches `source`.
///
/// `source` is only read, so its world transforms are the original pose throughout. Bones
/// missing from `source` are skipped but their children are still visited. A bone whose world
/// transform is degenerate is skipped together with its whole subtree.
pub fn align(active: &mut Skeleton, source: &Skeleton, config: &AlignConfig) -> AlignmentReport {
    let mut report = AlignmentReport::default();

    let origin_offset = active.placement().translation - source.placement().translation;

    let mut source_bones: HashMap<&str, BoneId> = HashMap::with_capacity(source.len());
    for id in source.bone_ids() {
        if let Some(bone) = source.bone(id) {
            source_bones.entry(bone.name()).or_insert(id);
        }
    }

    let active_names: HashSet<&str> = active.bone_names().collect();
    report.unmatched_source = source
        .bone_names()
        .filter(|name| !active_names.contains(name))
        .map(str::to_string)
        .collect();
    for name in &report.unmatched_source {
        debug!("Source bone {name} has no counterpart in `{}`", active.name());
    }

    let mut pending: Vec<BoneId> = active.roots().collect();
    pending.reverse();

    while let Some(bone_id) = pending.pop() {
        let Some(name) = active.bone(bone_id).map(|bone| bone.name().to_string()) else {
            continue;
        };

        let source_id = source_bones.get(name.as_str()).copied();
        let outcome = match source_id {
            Some(source_id) => align_bone(active, source, bone_id, source_id, origin_offset, config),
            None => Err(AlignmentSkip::MissingCounterpart(name.clone())),
        };

        let visit_children = match outcome {
            Ok(roll) => {
                trace!("Aligned bone: {name}");
                report.aligned.push(BoneAlignment { name, roll });
                true
            }
            Err(skip @ AlignmentSkip::MissingCounterpart(_)) => {
                info!("{skip}. Skipping.");
                report.skipped.push(skip);
                true
            }
            Err(skip) => {
                warn!("Error aligning bone {name}: {skip}");
                report.skipped.push(skip);
                false
            }
        };

        if visit_children {
            pending.extend(active.children(bone_id).iter().rev());
        }
    }

    info!(
        "Aligned {} bones of `{}` to `{}`, skipped {}",
        report.aligned.len(),
        active.name(),
        source.name(),
        report.skipped.len()
    );

    report
}

/// Moves one active bone onto its source counterpart and returns the measured roll difference.
fn align_bone(
    active: &mut Skeleton,
    source: &Skeleton,
    bone_id: BoneId,
    source_id: BoneId,
    origin_offset: Vec3A,
    config: &AlignConfig,
) -> Result<Quat, AlignmentSkip> {
    let degenerate = |side| {
        let bone = active
            .bone(bone_id)
            .map(|bone| bone.name().to_string())
            .unwrap_or_default();
        AlignmentSkip::Degenerate { bone, side }
    };

    let active_space = SpaceConversion::new(active);
    let source_space = SpaceConversion::new(source);

    let mut source_world = source_space
        .global_transform_of_bone(source_id)
        .filter(is_rigid)
        .ok_or_else(|| degenerate(ArmatureSide::Source))?;
    let active_world = active_space
        .global_transform_of_bone(bone_id)
        .filter(is_rigid)
        .ok_or_else(|| degenerate(ArmatureSide::Active))?;
    let active_character = active_space
        .character_transform_of_bone(bone_id)
        .ok_or_else(|| degenerate(ArmatureSide::Active))?;

    source_world.translation += origin_offset;

    let world_diff = source_world * active_world.inverse();
    let local_diff = active_space.global_to_character(world_diff * active.placement());

    // Rounding in the inverses compounds down the chain unless every stored rotation is unit.
    let new_local = active_space
        .character_to_bone_space(bone_id, local_diff * active_character)
        .map(|mut transform| {
            transform.rotation = transform.rotation.normalize();
            transform
        })
        .filter(is_rigid)
        .ok_or_else(|| degenerate(ArmatureSide::Active))?;

    let roll = roll_difference(&source_world, &active_world, config.roll_axis);

    active.set_local_transform(bone_id, new_local);

    Ok(roll)
}

/// Shortest rotation taking the source bone's roll axis onto the active bone's.
fn roll_difference(source_world: &Isometry3d, active_world: &Isometry3d, axis: Dir3) -> Quat {
    let source_axis = (source_world.rotation * axis.as_vec3()).normalize();
    let active_axis = (active_world.rotation * axis.as_vec3()).normalize();
    Quat::from_rotation_arc(source_axis, active_axis)
}

fn is_rigid(transform: &Isometry3d) -> bool {
    transform.translation.is_finite()
        && transform.rotation.is_finite()
        && transform.rotation.is_normalized()
}

#[cfg(test)]
mod tests {
    use bevy::math::Vec3;
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn assert_close(a: Isometry3d, b: Isometry3d) {
        assert!(
            a.translation.abs_diff_eq(b.translation, 1e-4),
            "{:?} != {:?}",
            a.translation,
            b.translation
        );
        assert!(
            a.rotation.abs_diff_eq(b.rotation, 1e-4) || a.rotation.abs_diff_eq(-b.rotation, 1e-4),
            "{:?} != {:?}",
            a.rotation,
            b.rotation
        );
    }

    #[test]
    fn bone_missing_in_source_is_skipped_but_children_are_aligned() {
        let mut active = Skeleton::new("active");
        let root = active.add_bone("Armature", None, Isometry3d::IDENTITY);
        let hips = active.add_bone("Hips", Some(root), Isometry3d::IDENTITY);

        let mut source = Skeleton::new("source");
        source.add_bone("Hips", None, Isometry3d::from_xyz(0., 1., 0.));
        source.add_bone("Tail", None, Isometry3d::IDENTITY);

        let report = align(&mut active, &source, &AlignConfig::default());

        assert_eq!(
            report.skipped,
            vec![AlignmentSkip::MissingCounterpart("Armature".into())]
        );
        assert_eq!(report.unmatched_source, vec!["Tail"]);
        assert_eq!(report.aligned.len(), 1);
        assert_close(
            SpaceConversion::new(&active)
                .global_transform_of_bone(hips)
                .unwrap(),
            Isometry3d::from_xyz(0., 1., 0.),
        );
    }

    #[test]
    fn degenerate_bone_skips_its_subtree_only() {
        let mut active = Skeleton::new("active");
        let hips = active.add_bone("Hips", None, Isometry3d::IDENTITY);
        let broken = active.add_bone(
            "Spine",
            Some(hips),
            Isometry3d::from_rotation(Quat::from_xyzw(0., 0., 0., 0.)),
        );
        let head = active.add_bone("Head", Some(broken), Isometry3d::IDENTITY);
        let leg = active.add_bone("LeftUpLeg", Some(hips), Isometry3d::IDENTITY);

        let mut source = Skeleton::new("source");
        let s_hips = source.add_bone("Hips", None, Isometry3d::IDENTITY);
        let s_spine = source.add_bone("Spine", Some(s_hips), Isometry3d::from_xyz(0., 1., 0.));
        source.add_bone("Head", Some(s_spine), Isometry3d::from_xyz(0., 1., 0.));
        source.add_bone("LeftUpLeg", Some(s_hips), Isometry3d::from_xyz(1., 0., 0.));

        let report = align(&mut active, &source, &AlignConfig::default());

        assert_eq!(
            report.skipped,
            vec![AlignmentSkip::Degenerate {
                bone: "Spine".into(),
                side: ArmatureSide::Active
            }]
        );
        assert_eq!(
            report
                .aligned
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>(),
            vec!["Hips", "LeftUpLeg"]
        );
        assert_eq!(active.local_transform(head), Some(Isometry3d::IDENTITY));
        assert_close(
            active.local_transform(leg).unwrap(),
            Isometry3d::from_xyz(1., 0., 0.),
        );
    }

    #[test]
    fn roll_is_measured_but_not_applied() {
        let mut active = Skeleton::new("active");
        let bone = active.add_bone("Hips", None, Isometry3d::IDENTITY);

        let mut source = Skeleton::new("source");
        let twisted = Quat::from_rotation_z(FRAC_PI_2);
        source.add_bone("Hips", None, Isometry3d::from_rotation(twisted));

        let report = align(&mut active, &source, &AlignConfig::default());

        // The full rotation is matched through the world-space delta.
        assert_close(active.local_transform(bone).unwrap(), Isometry3d::from_rotation(twisted));
        // Measured before the correction: it takes the source's up axis back onto the active one.
        let roll = report.aligned[0].roll;
        assert!(
            (roll * (twisted * Vec3::Y)).abs_diff_eq(Vec3::Y, 1e-5),
            "roll {roll:?} does not map the source axis onto the active axis"
        );
    }
}
