//! Error Types
//!
//! This module defines the error types returned by the mesh render path.
//!
//! # Overview
//!
//! [`RenderError`] covers the conditions that abort a single mesh's draw for
//! the current frame:
//! - A required resource (material, geometry, index buffer) is not bound
//! - The mesh's draw mode does not name a topology the context can draw
//! - A mesh references a joint its skeleton does not have
//!
//! A failed render never leaves the caller guessing: the condition is returned
//! and the frame loop moves on to the next mesh.
//!
//! # Usage
//!
//! ```rust,ignore
//! use myth_mesh::errors::{RenderError, Result};
//!
//! fn draw_all(meshes: &mut [Mesh], ctx: &mut RecordingContext) -> Result<()> {
//!     for mesh in meshes {
//!         mesh.render(ctx, None)?;
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt;

use thiserror::Error;

/// A resource a mesh needs in order to issue its draw calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Material,
    Geometry,
    /// Index buffer of the chunk at the given position.
    IndexBuffer { chunk: usize },
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Material => f.write_str("material"),
            Self::Geometry => f.write_str("geometry"),
            Self::IndexBuffer { chunk } => write!(f, "index buffer of chunk {chunk}"),
        }
    }
}

/// The main error type for mesh rendering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A resource required for drawing is not bound.
    #[error("Missing resource: {0}")]
    MissingResource(Resource),

    /// The draw mode is not a topology the context can draw.
    #[error("Invalid draw topology: {0:?}")]
    InvalidTopology(String),

    // ========================================================================
    // Skinning Errors
    // ========================================================================
    /// A joint index points past the end of the skeleton.
    #[error("Joint index {joint} out of range (skeleton has {joint_count} joints)")]
    JointOutOfRange {
        /// The offending joint index
        joint: usize,
        /// Number of joints in the skeleton
        joint_count: usize,
    },
}

/// Alias for `Result<T, RenderError>`.
pub type Result<T> = std::result::Result<T, RenderError>;
