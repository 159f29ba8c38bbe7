use bevy::math::{Isometry3d, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{BoneId, Skeleton};
use crate::errors::ConfigurationError;

/// On-disk skeleton, `*.skn.ron`. Bones must be listed after their parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkeletonSerial {
    pub name: String,
    #[serde(default)]
    pub placement: TransformSerial,
    pub bones: Vec<BoneSerial>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoneSerial {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub transform: TransformSerial,
}

/// Translation plus rotation. The rotation is an `[x, y, z, w]` quaternion and gets normalized on
/// load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformSerial {
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
}

fn identity_rotation() -> [f32; 4] {
    Quat::IDENTITY.to_array()
}

impl Default for TransformSerial {
    fn default() -> Self {
        Self {
            translation: [0.; 3],
            rotation: identity_rotation(),
        }
    }
}

impl TransformSerial {
    pub fn to_value(self) -> Isometry3d {
        Isometry3d::new(
            Vec3::from_array(self.translation),
            Quat::from_array(self.rotation).normalize(),
        )
    }

    pub fn from_value(transform: Isometry3d) -> Self {
        Self {
            translation: Vec3::from(transform.translation).to_array(),
            rotation: transform.rotation.to_array(),
        }
    }
}

impl SkeletonSerial {
    pub fn to_value(self) -> Result<Skeleton, ConfigurationError> {
        let mut skeleton = Skeleton::new(self.name).with_placement(self.placement.to_value());
        let mut ids: HashMap<String, BoneId> = HashMap::with_capacity(self.bones.len());

        for bone in self.bones {
            if ids.contains_key(&bone.name) {
                return Err(ConfigurationError::DuplicateBone {
                    skeleton: skeleton.name().to_string(),
                    bone: bone.name,
                });
            }

            let parent = match bone.parent {
                Some(parent) => match ids.get(&parent) {
                    Some(id) => Some(*id),
                    None => {
                        return Err(ConfigurationError::UnknownParent {
                            skeleton: skeleton.name().to_string(),
                            bone: bone.name,
                            parent,
                        });
                    }
                },
                None => None,
            };

            let id = skeleton.add_bone(bone.name.clone(), parent, bone.transform.to_value());
            ids.insert(bone.name, id);
        }

        Ok(skeleton)
    }

    pub fn from_value(skeleton: &Skeleton) -> Self {
        let bones = skeleton
            .pre_order()
            .into_iter()
            .filter_map(|id| {
                let bone = skeleton.bone(id)?;
                Some(BoneSerial {
                    name: bone.name().to_string(),
                    parent: bone
                        .parent()
                        .and_then(|parent| skeleton.bone(parent))
                        .map(|parent| parent.name().to_string()),
                    transform: TransformSerial::from_value(bone.local_transform()),
                })
            })
            .collect();

        Self {
            name: skeleton.name().to_string(),
            placement: TransformSerial::from_value(skeleton.placement()),
            bones,
        }
    }
}
