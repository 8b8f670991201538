use std::sync::Arc;

use crate::errors::{RenderError, Result};
use crate::renderer::draw_state::invalidate_draw_caches;
use crate::renderer::topology::DrawMode;
use crate::resources::geometry::Geometry;
use crate::resources::id::NodeId;
use crate::resources::material::Material;
use crate::scene::node::Node;
use crate::scene::skeleton::Skeleton;

/// A scene node that draws a geometry with a material.
///
/// Geometry, material and skeleton are shared resources: several meshes may
/// reference the same instances, and none of them is mutated while drawing.
///
/// # Skinning
///
/// Meshes can share one skeleton instance while each uses only part of its
/// joints. `joints` lists, for this mesh, the indices into the skeleton's joint
/// array; joint `i` in the vertex data refers to `skeleton[joints[i]]`.
#[derive(Debug)]
pub struct Mesh {
    pub node: Node,

    material: Option<Arc<Material>>,
    geometry: Option<Arc<Geometry>>,

    /// Draw mode name, e.g. `"TRIANGLES"`. Resolved when rendering.
    mode: String,

    /// Consumed by shadow passes.
    pub cast_shadow: bool,
    pub receive_shadow: bool,

    skeleton: Option<Arc<Skeleton>>,
    pub joints: Vec<usize>,
}

impl Mesh {
    #[must_use]
    pub fn new(geometry: Arc<Geometry>, material: Arc<Material>) -> Self {
        Self {
            node: Node::new("Mesh"),
            material: Some(material),
            geometry: Some(geometry),
            mode: DrawMode::Triangles.to_string(),
            cast_shadow: true,
            receive_shadow: true,
            skeleton: None,
            joints: Vec::new(),
        }
    }

    /// Creates a mesh with nothing bound yet.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            node: Node::new("Mesh"),
            material: None,
            geometry: None,
            mode: DrawMode::Triangles.to_string(),
            cast_shadow: true,
            receive_shadow: true,
            skeleton: None,
            joints: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.node.id()
    }

    #[inline]
    #[must_use]
    pub fn material(&self) -> Option<&Arc<Material>> {
        self.material.as_ref()
    }

    /// Rebinds the material.
    ///
    /// Switching to a different material may expose attribute slots the draw
    /// caches were not configured for, so this invalidates them.
    pub fn set_material(&mut self, material: Option<Arc<Material>>) {
        let changed = match (&self.material, &material) {
            (Some(old), Some(new)) => old.id() != new.id(),
            (None, None) => false,
            _ => true,
        };
        self.material = material;
        if changed {
            Self::material_changed();
        }
    }

    #[inline]
    #[must_use]
    pub fn geometry(&self) -> Option<&Arc<Geometry>> {
        self.geometry.as_ref()
    }

    pub fn set_geometry(&mut self, geometry: Option<Arc<Geometry>>) {
        self.geometry = geometry;
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> Option<&Arc<Skeleton>> {
        self.skeleton.as_ref()
    }

    /// Attaches a skeleton together with the joint subset this mesh uses.
    pub fn set_skeleton(&mut self, skeleton: Option<Arc<Skeleton>>, joints: Vec<usize>) {
        if let Some(old) = self.skeleton.take() {
            old.release(self.id());
        }
        self.skeleton = skeleton;
        self.joints = joints;
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Sets the draw mode by name. The name is validated when rendering.
    pub fn set_mode(&mut self, mode: &str) {
        self.mode = mode.to_string();
    }

    /// Resolves the draw mode name.
    pub fn draw_mode(&self) -> Result<DrawMode> {
        self.mode
            .parse()
            .map_err(|_| RenderError::InvalidTopology(self.mode.clone()))
    }

    /// Process-wide hook to call when a material's attribute set changed
    /// without the geometry or chunk changing.
    pub fn material_changed() {
        invalidate_draw_caches();
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        if let Some(skeleton) = &self.skeleton {
            skeleton.release(self.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let mesh = Mesh::empty();
        assert_eq!(mesh.mode(), "TRIANGLES");
        assert!(mesh.cast_shadow);
        assert!(mesh.receive_shadow);
        assert!(mesh.skeleton().is_none());
        assert!(mesh.joints.is_empty());
    }

    #[test]
    fn draw_mode_is_case_insensitive() {
        let mut mesh = Mesh::empty();
        mesh.set_mode("line_strip");
        assert_eq!(mesh.draw_mode(), Ok(DrawMode::LineStrip));
    }

    #[test]
    fn unknown_draw_mode_is_rejected() {
        let mut mesh = Mesh::empty();
        mesh.set_mode("QUADS");
        assert_eq!(
            mesh.draw_mode(),
            Err(RenderError::InvalidTopology("QUADS".to_string()))
        );
    }

    fn rig() -> Arc<Skeleton> {
        Arc::new(Skeleton::new("rig", vec![glam::Mat4::IDENTITY; 2]))
    }

    #[test]
    fn replacing_skeleton_releases_memo() {
        let skeleton = rig();
        let mut mesh = Mesh::empty();
        mesh.set_skeleton(Some(skeleton.clone()), vec![0, 1]);
        skeleton.sub_inv_bind_matrices(mesh.id(), &mesh.joints).unwrap();
        assert_eq!(skeleton.tracked_meshes(), 1);

        mesh.set_skeleton(Some(rig()), vec![0]);
        assert_eq!(skeleton.tracked_meshes(), 0);
    }

    #[test]
    fn dropping_mesh_releases_memo() {
        let skeleton = rig();
        let mut mesh = Mesh::empty();
        mesh.set_skeleton(Some(skeleton.clone()), vec![1]);
        skeleton.sub_inv_bind_matrices(mesh.id(), &mesh.joints).unwrap();

        drop(mesh);
        assert_eq!(skeleton.tracked_meshes(), 0);
    }
}
