mod loader;
pub mod serial;

use bevy::math::Isometry3d;
use indexmap::IndexMap;
use std::ops::Deref;
use tracing::warn;
use uuid::Uuid;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct BoneId {
    id: Uuid,
}

impl BoneId {
    fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Clone, Debug)]
pub struct Bone {
    name: String,
    parent: Option<BoneId>,
    children: Vec<BoneId>,
    /// Relative to the parent bone, or to the skeleton placement for roots.
    local_transform: Isometry3d,
}

impl Bone {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<BoneId> {
        self.parent
    }

    pub fn children(&self) -> &[BoneId] {
        &self.children
    }

    pub fn local_transform(&self) -> Isometry3d {
        self.local_transform
    }
}

/// What kind of edit a skeleton currently accepts. Mirrors the host's armature modes: bones can
/// only be removed or renamed while in [`EditMode::Structure`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum EditMode {
    #[default]
    Pose,
    Structure,
}

/// Snapshot of an armature: an ordered forest of named bones plus the world placement shared by
/// all root bones.
#[derive(Clone, Debug)]
pub struct Skeleton {
    id: Uuid,
    name: String,
    placement: Isometry3d,
    bones: IndexMap<BoneId, Bone>,
    mode: EditMode,
}

impl Skeleton {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            placement: Isometry3d::IDENTITY,
            bones: IndexMap::new(),
            mode: EditMode::Pose,
        }
    }

    pub fn with_placement(mut self, placement: Isometry3d) -> Self {
        self.placement = placement;
        self
    }

    /// Identity of this instance. Clones share it, separately built skeletons never do.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn placement(&self) -> Isometry3d {
        self.placement
    }

    pub fn set_placement(&mut self, placement: Isometry3d) {
        self.placement = placement;
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Adds a bone as the last child of `parent`. A parent that is not part of this skeleton is
    /// ignored and the bone becomes a root.
    pub fn add_bone(
        &mut self,
        name: impl Into<String>,
        parent: Option<BoneId>,
        local_transform: Isometry3d,
    ) -> BoneId {
        let name = name.into();
        let id = BoneId::new();

        let parent = parent.filter(|parent_id| match self.bones.get_mut(parent_id) {
            Some(parent_bone) => {
                parent_bone.children.push(id);
                true
            }
            None => {
                warn!("Parent of bone `{name}` is not part of `{}`", self.name);
                false
            }
        });

        self.bones.insert(
            id,
            Bone {
                name,
                parent,
                children: vec![],
                local_transform,
            },
        );

        id
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn bone(&self, id: BoneId) -> Option<&Bone> {
        self.bones.get(&id)
    }

    /// First bone called `name`, in skeleton order.
    pub fn bone_id(&self, name: &str) -> Option<BoneId> {
        self.bones
            .iter()
            .find_map(|(id, bone)| (bone.name == name).then_some(*id))
    }

    pub fn bone_by_name(&self, name: &str) -> Option<&Bone> {
        self.bones.values().find(|bone| bone.name == name)
    }

    pub fn bones(&self) -> impl Iterator<Item = &Bone> {
        self.bones.values()
    }

    pub fn bone_ids(&self) -> impl Iterator<Item = BoneId> + '_ {
        self.bones.keys().copied()
    }

    pub fn bone_names(&self) -> impl Iterator<Item = &str> {
        self.bones.values().map(Bone::name)
    }

    pub fn roots(&self) -> impl Iterator<Item = BoneId> + '_ {
        self.bones
            .iter()
            .filter(|(_, bone)| bone.parent.is_none())
            .map(|(id, _)| *id)
    }

    pub fn parent(&self, id: BoneId) -> Option<BoneId> {
        self.bones.get(&id).and_then(|bone| bone.parent)
    }

    pub fn children(&self, id: BoneId) -> &[BoneId] {
        self.bones
            .get(&id)
            .map(|bone| bone.children.as_slice())
            .unwrap_or_default()
    }

    pub fn local_transform(&self, id: BoneId) -> Option<Isometry3d> {
        self.bones.get(&id).map(|bone| bone.local_transform)
    }

    /// Returns `false` if the bone does not exist.
    pub fn set_local_transform(&mut self, id: BoneId, transform: Isometry3d) -> bool {
        match self.bones.get_mut(&id) {
            Some(bone) => {
                bone.local_transform = transform;
                true
            }
            None => false,
        }
    }

    /// Bones in pre-order: every parent comes before its children, roots and siblings keep
    /// skeleton order.
    pub fn pre_order(&self) -> Vec<BoneId> {
        let mut order = Vec::with_capacity(self.bones.len());
        let mut pending: Vec<BoneId> = self.roots().collect();
        pending.reverse();

        while let Some(id) = pending.pop() {
            order.push(id);
            pending.extend(self.children(id).iter().rev());
        }

        order
    }

    /// Switches to [`EditMode::Structure`] until the returned guard is dropped.
    pub fn edit_structure(&mut self) -> StructureEdit<'_> {
        self.mode = EditMode::Structure;
        StructureEdit { skeleton: self }
    }
}

/// Structural access to a [`Skeleton`]. Dropping it switches the skeleton back to pose mode.
pub struct StructureEdit<'a> {
    skeleton: &'a mut Skeleton,
}

impl StructureEdit<'_> {
    /// Removes a single bone. Its children are detached and become roots, keeping their local
    /// transforms.
    pub fn remove_bone(&mut self, id: BoneId) -> Option<Bone> {
        let bone = self.skeleton.bones.shift_remove(&id)?;

        if let Some(parent) = bone.parent.and_then(|p| self.skeleton.bones.get_mut(&p)) {
            parent.children.retain(|child| *child != id);
        }

        for child in &bone.children {
            if let Some(child) = self.skeleton.bones.get_mut(child) {
                child.parent = None;
            }
        }

        Some(bone)
    }

    /// Renames a bone and returns its previous name. Does not check for duplicates.
    pub fn rename_bone(&mut self, id: BoneId, name: impl Into<String>) -> Option<String> {
        let bone = self.skeleton.bones.get_mut(&id)?;
        Some(std::mem::replace(&mut bone.name, name.into()))
    }
}

impl Deref for StructureEdit<'_> {
    type Target = Skeleton;

    fn deref(&self) -> &Self::Target {
        self.skeleton
    }
}

impl Drop for StructureEdit<'_> {
    fn drop(&mut self) {
        self.skeleton.mode = EditMode::Pose;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (Skeleton, [BoneId; 4]) {
        let mut skeleton = Skeleton::new("chain");
        let hips = skeleton.add_bone("Hips", None, Isometry3d::IDENTITY);
        let spine = skeleton.add_bone("Spine", Some(hips), Isometry3d::from_xyz(0., 1., 0.));
        let left = skeleton.add_bone("LeftUpLeg", Some(hips), Isometry3d::from_xyz(1., 0., 0.));
        let head = skeleton.add_bone("Head", Some(spine), Isometry3d::from_xyz(0., 1., 0.));
        (skeleton, [hips, spine, left, head])
    }

    #[test]
    fn pre_order_visits_parents_first() {
        let (skeleton, [hips, spine, left, head]) = chain();
        assert_eq!(skeleton.pre_order(), vec![hips, spine, head, left]);
    }

    #[test]
    fn removing_a_bone_turns_children_into_roots() {
        let (mut skeleton, [hips, spine, left, head]) = chain();
        {
            let mut edit = skeleton.edit_structure();
            assert_eq!(edit.mode(), EditMode::Structure);
            edit.remove_bone(spine).unwrap();
        }

        assert_eq!(skeleton.mode(), EditMode::Pose);
        assert_eq!(skeleton.children(hips), &[left]);
        assert_eq!(skeleton.parent(head), None);
        assert_eq!(skeleton.roots().collect::<Vec<_>>(), vec![hips, head]);
        assert_eq!(
            skeleton.local_transform(head),
            Some(Isometry3d::from_xyz(0., 1., 0.))
        );
    }

    #[test]
    fn rename_returns_previous_name() {
        let (mut skeleton, [hips, ..]) = chain();
        let previous = skeleton.edit_structure().rename_bone(hips, "hips");
        assert_eq!(previous.as_deref(), Some("Hips"));
        assert_eq!(skeleton.bone_id("hips"), Some(hips));
        assert_eq!(skeleton.bone_id("Hips"), None);
    }

    #[test]
    fn unknown_parent_makes_a_root() {
        let (other, [foreign, ..]) = chain();
        let mut skeleton = Skeleton::new("lonely");
        let bone = skeleton.add_bone("Hips", Some(foreign), Isometry3d::IDENTITY);
        assert_eq!(skeleton.parent(bone), None);
        assert_ne!(skeleton.id(), other.id());
    }
}
