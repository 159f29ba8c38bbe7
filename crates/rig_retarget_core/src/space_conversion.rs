use bevy::math::Isometry3d;

use crate::skeleton::{BoneId, Skeleton};

/// Conversions between the three spaces a bone transform can live in:
/// - bone space: relative to the parent bone (what the skeleton stores),
/// - character space: relative to the skeleton placement,
/// - global space: the world.
// Implements Copy because it's just an immutable reference
#[derive(Clone, Copy)]
pub struct SpaceConversion<'a> {
    pub skeleton: &'a Skeleton,
}

impl<'a> SpaceConversion<'a> {
    pub fn new(skeleton: &'a Skeleton) -> Self {
        Self { skeleton }
    }

    /// Composes the local transforms of `target` and all its ancestors.
    pub fn character_transform_of_bone(&self, target: BoneId) -> Option<Isometry3d> {
        let mut curr_bone_id = Some(target);
        let mut curr_transform = Isometry3d::IDENTITY;

        while let Some(bone_id) = curr_bone_id {
            let bone = self.skeleton.bone(bone_id)?;
            curr_transform = bone.local_transform() * curr_transform;
            curr_bone_id = bone.parent();
        }

        Some(curr_transform)
    }

    pub fn global_transform_of_bone(&self, target: BoneId) -> Option<Isometry3d> {
        Some(self.skeleton.placement() * self.character_transform_of_bone(target)?)
    }

    /// Bone-space transform that places `target` at `character_transform`, given the current
    /// transforms of its ancestors.
    pub fn character_to_bone_space(
        &self,
        target: BoneId,
        character_transform: Isometry3d,
    ) -> Option<Isometry3d> {
        match self.skeleton.parent(target) {
            Some(parent) => {
                let parent_transform = self.character_transform_of_bone(parent)?;
                Some(parent_transform.inverse() * character_transform)
            }
            None => Some(character_transform),
        }
    }

    pub fn global_to_character(&self, transform: Isometry3d) -> Isometry3d {
        self.skeleton.placement().inverse() * transform
    }
}
