use glam::Affine3A;
use rustc_hash::FxHashMap;

use crate::scene::transform::Transform;

#[derive(Debug, Clone)]
pub struct Bone {
    pub name: String,
    pub parent: Option<usize>,
    /// Bind (rest) pose, as authored.
    pub rest: Transform,
    /// Current pose, written by the mixer.
    pub local: Transform,
}

/// A destination bone hierarchy, addressed by bone node name.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    pub name: String,

    // Ordered bone list; parents are referenced by index
    bones: Vec<Bone>,

    // Name -> index. On duplicate names the first bone wins, matching how
    // name-addressed tracks resolve
    by_name: FxHashMap<String, usize>,
}

impl Skeleton {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            bones: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }

    /// Appends a bone at rest pose and returns its index.
    pub fn add_bone(&mut self, name: &str, parent: Option<usize>, rest: Transform) -> usize {
        let index = self.bones.len();
        self.by_name.entry(name.to_string()).or_insert(index);
        self.bones.push(Bone {
            name: name.to_string(),
            parent,
            rest,
            local: rest,
        });
        index
    }

    /// Re-parents a bone. Used by loaders that discover hierarchy after creation.
    pub fn set_parent(&mut self, index: usize, parent: Option<usize>) {
        if let Some(bone) = self.bones.get_mut(index) {
            bone.parent = parent;
        }
    }

    #[inline]
    #[must_use]
    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    #[inline]
    #[must_use]
    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    #[inline]
    pub fn bone_mut(&mut self, index: usize) -> Option<&mut Bone> {
        self.bones.get_mut(index)
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Restores every bone to its rest pose.
    pub fn reset_pose(&mut self) {
        for bone in &mut self.bones {
            bone.local = bone.rest;
        }
    }

    /// Model-space matrix of a bone for the current pose.
    ///
    /// Walks the parent chain; a cycle in malformed input is cut after
    /// `len()` steps.
    #[must_use]
    pub fn world_matrix(&self, index: usize) -> Option<Affine3A> {
        let mut bone = self.bones.get(index)?;
        let mut matrix = bone.local.local_matrix();

        for _ in 0..self.bones.len() {
            let Some(parent) = bone.parent.and_then(|p| self.bones.get(p)) else {
                break;
            };
            matrix = parent.local.local_matrix() * matrix;
            bone = parent;
        }

        Some(matrix)
    }
}
