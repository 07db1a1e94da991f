//! Canonical humanoid bone roles and the binding of roles to skeleton nodes.
//!
//! Role names follow VRM 1.0 (`hips`, `leftUpperArm`, ...). A
//! [`SkeletonBinding`] is what a destination rig exposes to the retargeter:
//! for each role it knows, the name of the node that plays it.

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::errors::RetargetError;
use crate::retarget::bone_map::BoneNameMap;
use crate::scene::skeleton::Skeleton;

macro_rules! human_bones {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// A canonical humanoid bone role.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub enum HumanBone {
            $($variant,)+
        }

        impl HumanBone {
            /// Every role, torso first, fingers last.
            pub const ALL: &'static [HumanBone] = &[$(HumanBone::$variant,)+];

            /// The VRM (camelCase) role name.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(HumanBone::$variant => $name,)+
                }
            }

            /// The role name in PascalCase (`LeftUpperArm`), as used by
            /// animation tracks authored against VRM roles.
            #[must_use]
            pub fn pascal_name(self) -> &'static str {
                match self {
                    $(HumanBone::$variant => stringify!($variant),)+
                }
            }
        }
    };
}

human_bones! {
    // Torso
    Hips => "hips",
    Spine => "spine",
    Chest => "chest",
    UpperChest => "upperChest",
    Neck => "neck",
    // Head
    Head => "head",
    LeftEye => "leftEye",
    RightEye => "rightEye",
    Jaw => "jaw",
    // Legs
    LeftUpperLeg => "leftUpperLeg",
    LeftLowerLeg => "leftLowerLeg",
    LeftFoot => "leftFoot",
    LeftToes => "leftToes",
    RightUpperLeg => "rightUpperLeg",
    RightLowerLeg => "rightLowerLeg",
    RightFoot => "rightFoot",
    RightToes => "rightToes",
    // Arms
    LeftShoulder => "leftShoulder",
    LeftUpperArm => "leftUpperArm",
    LeftLowerArm => "leftLowerArm",
    LeftHand => "leftHand",
    RightShoulder => "rightShoulder",
    RightUpperArm => "rightUpperArm",
    RightLowerArm => "rightLowerArm",
    RightHand => "rightHand",
    // Left fingers
    LeftThumbMetacarpal => "leftThumbMetacarpal",
    LeftThumbProximal => "leftThumbProximal",
    LeftThumbDistal => "leftThumbDistal",
    LeftIndexProximal => "leftIndexProximal",
    LeftIndexIntermediate => "leftIndexIntermediate",
    LeftIndexDistal => "leftIndexDistal",
    LeftMiddleProximal => "leftMiddleProximal",
    LeftMiddleIntermediate => "leftMiddleIntermediate",
    LeftMiddleDistal => "leftMiddleDistal",
    LeftRingProximal => "leftRingProximal",
    LeftRingIntermediate => "leftRingIntermediate",
    LeftRingDistal => "leftRingDistal",
    LeftLittleProximal => "leftLittleProximal",
    LeftLittleIntermediate => "leftLittleIntermediate",
    LeftLittleDistal => "leftLittleDistal",
    // Right fingers
    RightThumbMetacarpal => "rightThumbMetacarpal",
    RightThumbProximal => "rightThumbProximal",
    RightThumbDistal => "rightThumbDistal",
    RightIndexProximal => "rightIndexProximal",
    RightIndexIntermediate => "rightIndexIntermediate",
    RightIndexDistal => "rightIndexDistal",
    RightMiddleProximal => "rightMiddleProximal",
    RightMiddleIntermediate => "rightMiddleIntermediate",
    RightMiddleDistal => "rightMiddleDistal",
    RightRingProximal => "rightRingProximal",
    RightRingIntermediate => "rightRingIntermediate",
    RightRingDistal => "rightRingDistal",
    RightLittleProximal => "rightLittleProximal",
    RightLittleIntermediate => "rightLittleIntermediate",
    RightLittleDistal => "rightLittleDistal",
}

impl HumanBone {
    /// Roles every VRM humanoid must bind.
    #[must_use]
    pub fn is_required(self) -> bool {
        matches!(
            self,
            Self::Hips
                | Self::Spine
                | Self::Head
                | Self::LeftUpperLeg
                | Self::LeftLowerLeg
                | Self::LeftFoot
                | Self::RightUpperLeg
                | Self::RightLowerLeg
                | Self::RightFoot
                | Self::LeftUpperArm
                | Self::LeftLowerArm
                | Self::LeftHand
                | Self::RightUpperArm
                | Self::RightLowerArm
                | Self::RightHand
        )
    }

    /// Parses a VRM 0.x role name.
    ///
    /// VRM 0.x numbers the thumb `Proximal/Intermediate/Distal`; those map onto
    /// the 1.0 `Metacarpal/Proximal/Distal` joints. Every other name is shared.
    pub fn from_vrm0_name(name: &str) -> Result<Self, RetargetError> {
        match name {
            "leftThumbProximal" => Ok(Self::LeftThumbMetacarpal),
            "leftThumbIntermediate" => Ok(Self::LeftThumbProximal),
            "rightThumbProximal" => Ok(Self::RightThumbMetacarpal),
            "rightThumbIntermediate" => Ok(Self::RightThumbProximal),
            other => other.parse(),
        }
    }
}

impl fmt::Display for HumanBone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HumanBone {
    type Err = RetargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|bone| bone.as_str() == s)
            .ok_or_else(|| RetargetError::UnknownHumanBone(s.to_string()))
    }
}

/// Canonical role -> destination node name.
///
/// Supplied by the destination rig and only read by the retargeter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkeletonBinding {
    bones: FxHashMap<HumanBone, String>,
}

impl SkeletonBinding {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `bone` to `node_name`, replacing any previous node.
    pub fn insert(&mut self, bone: HumanBone, node_name: impl Into<String>) -> Option<String> {
        self.bones.insert(bone, node_name.into())
    }

    #[must_use]
    pub fn with(mut self, bone: HumanBone, node_name: impl Into<String>) -> Self {
        self.insert(bone, node_name);
        self
    }

    #[inline]
    #[must_use]
    pub fn node_name(&self, bone: HumanBone) -> Option<&str> {
        self.bones.get(&bone).map(String::as_str)
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

    /// Bound roles in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (HumanBone, &str)> {
        HumanBone::ALL
            .iter()
            .filter_map(|&bone| self.node_name(bone).map(|name| (bone, name)))
    }

    /// Binds a rig without a humanoid description by resolving each bone's
    /// name through `bone_map`. The first bone claiming a role keeps it.
    #[must_use]
    pub fn from_skeleton(skeleton: &Skeleton, bone_map: &BoneNameMap) -> Self {
        let mut binding = Self::new();
        for bone in skeleton.bones() {
            if let Some(role) = bone_map.resolve(&bone.name) {
                binding.bones.entry(role).or_insert_with(|| bone.name.clone());
            }
        }
        binding
    }

    /// Required roles with no bound node.
    #[must_use]
    pub fn missing_required(&self) -> Vec<HumanBone> {
        HumanBone::ALL
            .iter()
            .copied()
            .filter(|bone| bone.is_required() && !self.bones.contains_key(bone))
            .collect()
    }
}
