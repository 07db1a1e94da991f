//! Destination rig model
//!
//! - Transform: bone local TRS
//! - Skeleton: ordered bone hierarchy with name lookup
//! - Humanoid: canonical bone roles and their binding to skeleton nodes

pub mod transform;
pub mod skeleton;
pub mod humanoid;

pub use transform::Transform;
pub use skeleton::{Bone, Skeleton};
pub use humanoid::{HumanBone, SkeletonBinding};
