//! Scene graph nodes taking part in rendering
//!
//! - Node: identity, name and render observers
//! - Mesh: a node drawing a geometry with a material
//! - Skeleton: joint data shared by skinned meshes

pub mod mesh;
pub mod node;
pub mod skeleton;

pub use mesh::Mesh;
pub use node::{Node, ObserverId, RenderEvent};
pub use skeleton::Skeleton;
