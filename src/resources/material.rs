//! Material.
//!
//! A material pairs a name and identity with the shader it draws with. Many
//! meshes may share one material, and a pass may substitute its own material
//! (e.g. a depth-only shadow material) for a single render call.

use std::sync::Arc;

use crate::resources::id::MaterialId;
use crate::resources::shader::Shader;

#[derive(Debug, Clone)]
pub struct Material {
    id: MaterialId,
    pub name: String,
    shader: Arc<Shader>,
}

impl Material {
    #[must_use]
    pub fn new(name: &str, shader: Arc<Shader>) -> Self {
        Self {
            id: MaterialId::next(),
            name: name.to_string(),
            shader,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> MaterialId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn shader(&self) -> &Arc<Shader> {
        &self.shader
    }
}
