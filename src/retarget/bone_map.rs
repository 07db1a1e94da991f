//! Source bone name -> canonical humanoid role.
//!
//! Source rigs prefix their bone names in all sorts of ways
//! (`mixamorig:LeftArm`, `J_Bip_L_UpperArm`, `Armature|Hips`), so lookups match
//! the *end* of the identifier. When several suffixes match, the longest wins:
//! `UpperChest` beats `Chest`, `LeftUpperArm` beats any shorter alias.
//! Matching is case-sensitive.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::scene::humanoid::HumanBone;

/// Aliases used by common authoring pipelines, on top of the role names
/// themselves (which are always accepted in camelCase and PascalCase).
///
/// Mixamo names come first (`LeftArm`, `Spine1`, `LeftHandPinky1`); the
/// `L_`/`R_` forms cover VRoid-style `J_Bip_L_UpperArm` exports.
const DEFAULT_ALIASES: &[(HumanBone, &[&str])] = &[
    (HumanBone::Chest, &["Spine1"]),
    (HumanBone::UpperChest, &["Spine2"]),
    (HumanBone::LeftEye, &["L_FaceEye"]),
    (HumanBone::RightEye, &["R_FaceEye"]),
    // Legs
    (HumanBone::LeftUpperLeg, &["LeftUpLeg", "L_UpperLeg"]),
    (HumanBone::LeftLowerLeg, &["LeftLeg", "L_LowerLeg"]),
    (HumanBone::LeftFoot, &["L_Foot"]),
    (HumanBone::LeftToes, &["LeftToeBase", "L_ToeBase"]),
    (HumanBone::RightUpperLeg, &["RightUpLeg", "R_UpperLeg"]),
    (HumanBone::RightLowerLeg, &["RightLeg", "R_LowerLeg"]),
    (HumanBone::RightFoot, &["R_Foot"]),
    (HumanBone::RightToes, &["RightToeBase", "R_ToeBase"]),
    // Arms
    (HumanBone::LeftShoulder, &["L_Shoulder"]),
    (HumanBone::LeftUpperArm, &["LeftArm", "L_UpperArm"]),
    (HumanBone::LeftLowerArm, &["LeftForeArm", "L_LowerArm"]),
    (HumanBone::LeftHand, &["L_Hand"]),
    (HumanBone::RightShoulder, &["R_Shoulder"]),
    (HumanBone::RightUpperArm, &["RightArm", "R_UpperArm"]),
    (HumanBone::RightLowerArm, &["RightForeArm", "R_LowerArm"]),
    (HumanBone::RightHand, &["R_Hand"]),
    // Left fingers
    (HumanBone::LeftThumbMetacarpal, &["LeftHandThumb1", "L_Thumb1"]),
    (HumanBone::LeftThumbProximal, &["LeftHandThumb2", "L_Thumb2"]),
    (HumanBone::LeftThumbDistal, &["LeftHandThumb3", "L_Thumb3"]),
    (HumanBone::LeftIndexProximal, &["LeftHandIndex1", "L_Index1"]),
    (HumanBone::LeftIndexIntermediate, &["LeftHandIndex2", "L_Index2"]),
    (HumanBone::LeftIndexDistal, &["LeftHandIndex3", "L_Index3"]),
    (HumanBone::LeftMiddleProximal, &["LeftHandMiddle1", "L_Middle1"]),
    (HumanBone::LeftMiddleIntermediate, &["LeftHandMiddle2", "L_Middle2"]),
    (HumanBone::LeftMiddleDistal, &["LeftHandMiddle3", "L_Middle3"]),
    (HumanBone::LeftRingProximal, &["LeftHandRing1", "L_Ring1"]),
    (HumanBone::LeftRingIntermediate, &["LeftHandRing2", "L_Ring2"]),
    (HumanBone::LeftRingDistal, &["LeftHandRing3", "L_Ring3"]),
    (HumanBone::LeftLittleProximal, &["LeftHandPinky1", "L_Little1"]),
    (HumanBone::LeftLittleIntermediate, &["LeftHandPinky2", "L_Little2"]),
    (HumanBone::LeftLittleDistal, &["LeftHandPinky3", "L_Little3"]),
    // Right fingers
    (HumanBone::RightThumbMetacarpal, &["RightHandThumb1", "R_Thumb1"]),
    (HumanBone::RightThumbProximal, &["RightHandThumb2", "R_Thumb2"]),
    (HumanBone::RightThumbDistal, &["RightHandThumb3", "R_Thumb3"]),
    (HumanBone::RightIndexProximal, &["RightHandIndex1", "R_Index1"]),
    (HumanBone::RightIndexIntermediate, &["RightHandIndex2", "R_Index2"]),
    (HumanBone::RightIndexDistal, &["RightHandIndex3", "R_Index3"]),
    (HumanBone::RightMiddleProximal, &["RightHandMiddle1", "R_Middle1"]),
    (HumanBone::RightMiddleIntermediate, &["RightHandMiddle2", "R_Middle2"]),
    (HumanBone::RightMiddleDistal, &["RightHandMiddle3", "R_Middle3"]),
    (HumanBone::RightRingProximal, &["RightHandRing1", "R_Ring1"]),
    (HumanBone::RightRingIntermediate, &["RightHandRing2", "R_Ring2"]),
    (HumanBone::RightRingDistal, &["RightHandRing3", "R_Ring3"]),
    (HumanBone::RightLittleProximal, &["RightHandPinky1", "R_Little1"]),
    (HumanBone::RightLittleIntermediate, &["RightHandPinky2", "R_Little2"]),
    (HumanBone::RightLittleDistal, &["RightHandPinky3", "R_Little3"]),
];

fn default_true() -> bool {
    true
}

/// JSON form of a bone-name map.
///
/// ```json
/// { "include_defaults": true, "aliases": { "leftUpperArm": ["L_UpperArm_jnt"] } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoneNameMapConfig {
    /// Start from [`BoneNameMap::humanoid`] before adding `aliases`.
    #[serde(default = "default_true")]
    pub include_defaults: bool,
    #[serde(default)]
    pub aliases: BTreeMap<HumanBone, Vec<String>>,
}

impl Default for BoneNameMapConfig {
    fn default() -> Self {
        Self {
            include_defaults: true,
            aliases: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoneNameMap {
    // Sorted by suffix length, longest first, so the first hit is the best one
    entries: Vec<(String, HumanBone)>,
}

impl BoneNameMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Role names (camelCase and PascalCase) plus the built-in alias table.
    ///
    /// The short camelCase roles are matched as suffixes like everything else,
    /// so a secondary bone such as `J_Sec_Forehead` resolves to `head`. Rigs
    /// with such bones should use [`BoneNameMapConfig`] with
    /// `include_defaults: false` and list their own suffixes.
    #[must_use]
    pub fn humanoid() -> Self {
        let mut map = Self::new();
        for &bone in HumanBone::ALL {
            map.insert(bone, bone.as_str());
            map.insert(bone, bone.pascal_name());
        }
        for &(bone, aliases) in DEFAULT_ALIASES {
            for alias in aliases {
                map.insert(bone, *alias);
            }
        }
        map
    }

    #[must_use]
    pub fn from_config(config: &BoneNameMapConfig) -> Self {
        let mut map = if config.include_defaults {
            Self::humanoid()
        } else {
            Self::new()
        };
        for (&bone, aliases) in &config.aliases {
            for alias in aliases {
                map.insert(bone, alias.as_str());
            }
        }
        map
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: BoneNameMapConfig = serde_json::from_str(json)?;
        Ok(Self::from_config(&config))
    }

    /// Maps `suffix` to `bone`. Re-inserting a suffix moves it to the new role.
    /// Empty suffixes would match everything and are ignored.
    pub fn insert(&mut self, bone: HumanBone, suffix: impl Into<String>) {
        let suffix = suffix.into();
        if suffix.is_empty() {
            log::debug!("Ignoring empty bone-name suffix for {bone}");
            return;
        }

        if let Some(entry) = self.entries.iter_mut().find(|(s, _)| *s == suffix) {
            entry.1 = bone;
            return;
        }

        let at = self.entries.partition_point(|(s, _)| s.len() >= suffix.len());
        self.entries.insert(at, (suffix, bone));
    }

    #[must_use]
    pub fn with(mut self, bone: HumanBone, suffix: impl Into<String>) -> Self {
        self.insert(bone, suffix);
        self
    }

    /// Canonical role for a source bone identifier, by longest matching suffix.
    #[must_use]
    pub fn resolve(&self, identifier: &str) -> Option<HumanBone> {
        self.entries
            .iter()
            .find(|(suffix, _)| identifier.ends_with(suffix.as_str()))
            .map(|&(_, bone)| bone)
    }

    /// Suffixes accepted for `bone`, longest first.
    pub fn suffixes(&self, bone: HumanBone) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |(_, b)| *b == bone)
            .map(|(s, _)| s.as_str())
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
