//! Root-level glTF extensions that describe humanoid rigs.
//!
//! - `VRMC_vrm` (VRM 1.0): `humanoid.humanBones` is a map `role -> { node }`.
//! - `VRM` (VRM 0.x): `humanoid.humanBones` is a list of `{ bone, node }`.
//! - `VRMC_vrm_animation` (VRMA): same map shape as VRM 1.0, naming the nodes
//!   of the animation file that play each role.
//!
//! Only the fields needed for retargeting are read; everything else in the
//! document is ignored.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::scene::humanoid::HumanBone;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RootExtensions {
    #[serde(default)]
    extensions: Extensions,
}

#[derive(Debug, Default, Deserialize)]
struct Extensions {
    #[serde(rename = "VRMC_vrm")]
    vrmc_vrm: Option<VrmcVrm>,

    #[serde(rename = "VRM")]
    vrm0: Option<Vrm0>,

    #[serde(rename = "VRMC_vrm_animation")]
    vrm_animation: Option<VrmcVrmAnimation>,
}

#[derive(Debug, Deserialize)]
struct VrmcVrm {
    humanoid: VrmcHumanoid,
}

#[derive(Debug, Deserialize)]
struct VrmcVrmAnimation {
    humanoid: Option<VrmcHumanoid>,
}

#[derive(Debug, Deserialize)]
struct VrmcHumanoid {
    #[serde(rename = "humanBones", default)]
    human_bones: BTreeMap<String, NodeRef>,
}

#[derive(Debug, Deserialize)]
struct NodeRef {
    node: usize,
}

#[derive(Debug, Deserialize)]
struct Vrm0 {
    humanoid: Vrm0Humanoid,
}

#[derive(Debug, Deserialize)]
struct Vrm0Humanoid {
    #[serde(rename = "humanBones", default)]
    human_bones: Vec<Vrm0HumanBone>,
}

#[derive(Debug, Deserialize)]
struct Vrm0HumanBone {
    bone: String,
    // Some exporters write -1 for an unassigned bone
    node: i64,
}

impl RootExtensions {
    pub(crate) fn from_json(json: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(json)
    }

    /// `(role, node index)` pairs of the model's humanoid, preferring VRM 1.0
    /// over 0.x. `None` when the document has neither.
    pub(crate) fn humanoid_bones(&self) -> Option<Vec<(HumanBone, usize)>> {
        if let Some(vrm) = &self.extensions.vrmc_vrm {
            return Some(vrmc_bones(&vrm.humanoid));
        }

        let vrm0 = self.extensions.vrm0.as_ref()?;
        let bones = vrm0
            .humanoid
            .human_bones
            .iter()
            .filter_map(|entry| {
                let Ok(node) = usize::try_from(entry.node) else {
                    return None;
                };
                match HumanBone::from_vrm0_name(&entry.bone) {
                    Ok(bone) => Some((bone, node)),
                    Err(err) => {
                        log::warn!("Skipping VRM 0.x humanoid entry: {err}");
                        None
                    }
                }
            })
            .collect();
        Some(bones)
    }

    /// `(role, node index)` pairs of a VRMA animation's humanoid.
    pub(crate) fn animation_humanoid_bones(&self) -> Option<Vec<(HumanBone, usize)>> {
        let humanoid = self.extensions.vrm_animation.as_ref()?.humanoid.as_ref()?;
        Some(vrmc_bones(humanoid))
    }
}

fn vrmc_bones(humanoid: &VrmcHumanoid) -> Vec<(HumanBone, usize)> {
    humanoid
        .human_bones
        .iter()
        .filter_map(|(name, node_ref)| match name.parse::<HumanBone>() {
            Ok(bone) => Some((bone, node_ref.node)),
            Err(err) => {
                log::warn!("Skipping humanoid entry: {err}");
                None
            }
        })
        .collect()
}
