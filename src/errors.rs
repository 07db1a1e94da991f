//! Error Types
//!
//! This module defines the error types used by the fallible parts of the
//! crate: asset loading and bone-map configuration.
//!
//! # Overview
//!
//! The retargeting transform itself never fails. Tracks it cannot place are
//! dropped and reported through [`crate::retarget::RetargetReport`]. The main
//! error type [`RetargetError`] covers everything around it:
//! - File I/O and buffer resolution
//! - glTF / GLB decoding
//! - VRM humanoid discovery
//! - JSON configuration
//!
//! # Usage
//!
//! ```rust,ignore
//! use retarget::errors::Result;
//! use retarget::assets::GltfLoader;
//!
//! fn load() -> Result<()> {
//!     let clips = GltfLoader::load_clips("idle.vrma".as_ref())?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for loading and configuration.
#[derive(Error, Debug)]
pub enum RetargetError {
    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// glTF parsing or loading error.
    #[error("glTF error: {0}")]
    GltfError(String),

    /// Data URI parsing error.
    #[error("Data URI error: {0}")]
    DataUriError(String),

    /// JSON parse error (glTF extensions or bone-map configuration).
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Base64 decoding error.
    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    // ========================================================================
    // Humanoid Rig Errors
    // ========================================================================
    /// The model carries neither a `VRMC_vrm` nor a `VRM` humanoid extension.
    #[error("No humanoid description found in {0}")]
    MissingHumanoid(String),

    /// A humanoid bone name that is not one of the canonical roles.
    #[error("Unknown humanoid bone: {0}")]
    UnknownHumanBone(String),

    /// An index into the glTF document is out of range.
    #[error("Asset index out of bounds: {context} (index: {index})")]
    AssetIndexOutOfBounds {
        /// Description of what was being accessed
        context: String,
        /// The invalid index
        index: usize,
    },
}

impl From<gltf::Error> for RetargetError {
    fn from(err: gltf::Error) -> Self {
        RetargetError::GltfError(err.to_string())
    }
}

/// Alias for `Result<T, RetargetError>`.
pub type Result<T> = std::result::Result<T, RetargetError>;
