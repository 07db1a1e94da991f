use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::animation::clip::{AnimationClip, InterpolationMode, PropertyTrack};
use crate::animation::track_name::{TrackProperty, track_name};
use crate::assets::vrm::RootExtensions;
use crate::errors::{Result, RetargetError};
use crate::scene::humanoid::{HumanBone, SkeletonBinding};
use crate::scene::skeleton::Skeleton;
use crate::scene::transform::Transform;

const GLB_MAGIC: &[u8] = b"glTF";

/// A parsed glTF / GLB / VRM / VRMA document with its buffers resolved.
pub struct GltfLoader {
    gltf: gltf::Gltf,
    buffers: Vec<Vec<u8>>,
    extensions: RootExtensions,
    node_names: Vec<String>,
    label: String,
}

impl GltfLoader {
    /// Reads and parses a file. External buffers resolve relative to it.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let base_path = path.parent().unwrap_or(Path::new("./")).to_path_buf();
        Self::parse(&bytes, Some(base_path), path.display().to_string())
    }

    /// Parses an in-memory document. Without `base_path` only embedded
    /// (GLB or `data:` URI) buffers can be resolved.
    pub fn from_slice(bytes: &[u8], base_path: Option<&Path>) -> Result<Self> {
        Self::parse(bytes, base_path.map(Path::to_path_buf), "<memory>".to_string())
    }

    fn parse(bytes: &[u8], base_path: Option<PathBuf>, label: String) -> Result<Self> {
        // Validate: the accessor readers index the document unchecked
        let gltf = gltf::Gltf::from_slice(bytes)?;

        // The extensions we need live at the document root; read them from
        // the raw JSON chunk.
        let extensions = if bytes.starts_with(GLB_MAGIC) {
            let glb = gltf::Glb::from_slice(bytes)?;
            RootExtensions::from_json(&glb.json)?
        } else {
            RootExtensions::from_json(bytes)?
        };

        let buffers = Self::load_buffers(&gltf, base_path.as_deref())?;

        let node_names = gltf
            .nodes()
            .map(|node| {
                node.name()
                    .map_or_else(|| format!("Node_{}", node.index()), str::to_string)
            })
            .collect();

        Ok(Self {
            gltf,
            buffers,
            extensions,
            node_names,
            label,
        })
    }

    // --- Shortcuts ---

    pub fn load_clips(path: &Path) -> Result<Vec<AnimationClip>> {
        Self::open(path)?.animation_clips()
    }

    pub fn load_skeleton(path: &Path) -> Result<Skeleton> {
        Ok(Self::open(path)?.skeleton())
    }

    pub fn load_humanoid(path: &Path) -> Result<(Skeleton, SkeletonBinding)> {
        let loader = Self::open(path)?;
        Ok((loader.skeleton(), loader.humanoid_binding()?))
    }

    pub fn load_clips_from_slice(bytes: &[u8], base_path: Option<&Path>) -> Result<Vec<AnimationClip>> {
        Self::from_slice(bytes, base_path)?.animation_clips()
    }

    pub fn load_skeleton_from_slice(bytes: &[u8], base_path: Option<&Path>) -> Result<Skeleton> {
        Ok(Self::from_slice(bytes, base_path)?.skeleton())
    }

    pub fn load_humanoid_from_slice(
        bytes: &[u8],
        base_path: Option<&Path>,
    ) -> Result<(Skeleton, SkeletonBinding)> {
        let loader = Self::from_slice(bytes, base_path)?;
        Ok((loader.skeleton(), loader.humanoid_binding()?))
    }

    // --- Buffers ---

    fn load_buffers(gltf: &gltf::Gltf, base_path: Option<&Path>) -> Result<Vec<Vec<u8>>> {
        let mut buffer_data = Vec::new();
        for buffer in gltf.buffers() {
            match buffer.source() {
                gltf::buffer::Source::Bin => {
                    let blob = gltf
                        .blob
                        .as_deref()
                        .ok_or_else(|| RetargetError::GltfError("Missing GLB binary chunk".to_string()))?;
                    buffer_data.push(blob.to_vec());
                }
                gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => {
                    buffer_data.push(decode_data_uri(uri)?);
                }
                gltf::buffer::Source::Uri(uri) => {
                    let base_path = base_path.ok_or_else(|| {
                        RetargetError::GltfError(format!("External buffer '{uri}' needs a base path"))
                    })?;
                    buffer_data.push(fs::read(base_path.join(uri))?);
                }
            }
        }
        Ok(buffer_data)
    }

    // --- Animations ---

    /// One clip per glTF animation, with tracks named `<bone>.<property>`.
    ///
    /// In a VRMA document, tracks on humanoid nodes take the PascalCase role
    /// name (`LeftUpperArm.quaternion`); all others use the node name.
    /// Morph-target weight channels are skipped.
    pub fn animation_clips(&self) -> Result<Vec<AnimationClip>> {
        let humanoid_nodes: FxHashMap<usize, HumanBone> = self
            .extensions
            .animation_humanoid_bones()
            .unwrap_or_default()
            .into_iter()
            .map(|(bone, node)| (node, bone))
            .collect();

        let mut clips = Vec::new();

        for anim in self.gltf.animations() {
            let mut tracks = Vec::new();

            for channel in anim.channels() {
                let reader = channel.reader(|buffer| self.buffers.get(buffer.index()).map(Vec::as_slice));
                let target = channel.target();
                let node_index = target.node().index();

                let property = match target.property() {
                    gltf::animation::Property::Translation => TrackProperty::Position,
                    gltf::animation::Property::Rotation => TrackProperty::Quaternion,
                    gltf::animation::Property::Scale => TrackProperty::Scale,
                    gltf::animation::Property::MorphTargetWeights => {
                        log::debug!("Skipping morph-weight channel on node {node_index}");
                        continue;
                    }
                };

                let bone_name = match humanoid_nodes.get(&node_index) {
                    Some(bone) => bone.pascal_name(),
                    None => self.node_name(node_index, "animation channel target")?,
                };

                let Some(inputs) = reader.read_inputs() else {
                    log::warn!("Channel on '{bone_name}' has no readable input accessor");
                    continue;
                };
                let times: Vec<f32> = inputs.collect();

                let values: Vec<f32> = match reader.read_outputs() {
                    Some(gltf::animation::util::ReadOutputs::Translations(iter)) => iter.flatten().collect(),
                    Some(gltf::animation::util::ReadOutputs::Rotations(iter)) => iter.into_f32().flatten().collect(),
                    Some(gltf::animation::util::ReadOutputs::Scales(iter)) => iter.flatten().collect(),
                    _ => {
                        log::warn!("Channel on '{bone_name}' has no readable output accessor");
                        continue;
                    }
                };

                let interpolation = match channel.sampler().interpolation() {
                    gltf::animation::Interpolation::Linear => InterpolationMode::Linear,
                    gltf::animation::Interpolation::Step => InterpolationMode::Step,
                    gltf::animation::Interpolation::CubicSpline => InterpolationMode::CubicSpline,
                };

                tracks.push(PropertyTrack::new(
                    track_name(bone_name, property),
                    times,
                    values,
                    interpolation,
                ));
            }

            let name = anim
                .name()
                .map_or_else(|| format!("Animation_{}", anim.index()), str::to_string);
            clips.push(AnimationClip::new(name, tracks));
        }

        Ok(clips)
    }

    // --- Skeleton ---

    /// Every node becomes a bone (same index), at its authored rest pose.
    #[must_use]
    pub fn skeleton(&self) -> Skeleton {
        let name = self
            .gltf
            .skins()
            .find_map(|skin| skin.name().map(str::to_string))
            .unwrap_or_else(|| self.label.clone());

        let mut skeleton = Skeleton::new(&name);
        for node in self.gltf.nodes() {
            let (t, r, s) = node.transform().decomposed();
            let rest = Transform::from_trs(Vec3::from_array(t), Quat::from_array(r), Vec3::from_array(s));
            skeleton.add_bone(&self.node_names[node.index()], None, rest);
        }

        for node in self.gltf.nodes() {
            for child in node.children() {
                skeleton.set_parent(child.index(), Some(node.index()));
            }
        }

        skeleton
    }

    /// Role -> node name binding from the VRM humanoid extension.
    pub fn humanoid_binding(&self) -> Result<SkeletonBinding> {
        let bones = self
            .extensions
            .humanoid_bones()
            .ok_or_else(|| RetargetError::MissingHumanoid(self.label.clone()))?;

        let mut binding = SkeletonBinding::new();
        for (bone, node_index) in bones {
            binding.insert(bone, self.node_name(node_index, "humanoid bone node")?);
        }

        let missing = binding.missing_required();
        if !missing.is_empty() {
            log::warn!("Humanoid in {} lacks required bones: {missing:?}", self.label);
        }

        Ok(binding)
    }

    #[must_use]
    pub fn has_humanoid(&self) -> bool {
        self.extensions.humanoid_bones().is_some()
    }

    fn node_name(&self, index: usize, context: &str) -> Result<&str> {
        self.node_names
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| RetargetError::AssetIndexOutOfBounds {
                context: context.to_string(),
                index,
            })
    }
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let (_, payload) = uri
        .split_once(";base64,")
        .ok_or_else(|| RetargetError::DataUriError("only base64 data URIs are supported".to_string()))?;
    Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
}
