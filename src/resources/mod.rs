//! Resource definitions consumed by the mesh render path.
//!
//! - Buffer: buffer handles and vertex layout metadata
//! - Geometry: per-context buffer chunks
//! - Shader: attribute templates, semantics and uniform locations
//! - Material: a named, shareable shader binding
//! - Id: process-unique resource identities

pub mod buffer;
pub mod geometry;
pub mod id;
pub mod material;
pub mod shader;
pub mod version_tracker;

pub use buffer::{AttributeBuffer, AttributeType, BufferHandle, BufferTarget, IndexType, IndicesBuffer};
pub use geometry::{BufferChunk, Geometry};
pub use id::{ContextId, GeometryId, MaterialId, NodeId, ShaderId};
pub use material::Material;
pub use shader::{AttributeTemplate, Semantic, Shader, ShaderBuilder, UniformValue};
pub use version_tracker::ChangeTracker;
