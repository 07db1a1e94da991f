//! Asset loading: glTF 2.0 containers (`.gltf`, `.glb`, `.vrm`, `.vrma`)
//! into animation clips, skeletons and humanoid bindings.

pub mod loaders;
pub(crate) mod vrm;

pub use loaders::GltfLoader;
