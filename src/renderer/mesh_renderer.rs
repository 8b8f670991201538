//! Mesh render procedure.
//!
//! Issues the graphics-context calls that draw one [`Mesh`] for the current
//! frame:
//!
//! 1. Notify observers (`BeforeRender`)
//! 2. Resolve material, geometry and draw mode
//! 3. Upload skinning matrices if a skeleton is attached
//! 4. For every buffer chunk: rebind attributes if the draw state cache says
//!    so, then submit the draw
//! 5. Notify observers (`AfterRender`) and return the statistics
//!
//! # Attribute resolution
//!
//! Each attribute buffer of a chunk resolves to a shader symbol: through the
//! shader's semantic table if the buffer is tagged with a semantic, otherwise
//! by its own name. Attributes the shader does not declare are dropped; a
//! geometry carrying more data than a given shader reads is the normal case
//! (e.g. a depth-only shadow shader reading positions only).

use smallvec::SmallVec;

use crate::errors::{RenderError, Resource, Result};
use crate::renderer::context::GraphicsContext;
use crate::renderer::draw_state::DrawId;
use crate::renderer::stats::RenderInfo;
use crate::renderer::topology::DrawMode;
use crate::resources::buffer::{AttributeBuffer, BufferTarget, IndexType};
use crate::resources::geometry::{BufferChunk, Geometry};
use crate::resources::material::Material;
use crate::resources::shader::{Semantic, Shader, UniformValue};
use crate::scene::mesh::Mesh;
use crate::scene::node::RenderEvent;
use crate::utils::interner::{self, Symbol};

impl Mesh {
    /// Draws this mesh through `ctx`.
    ///
    /// `override_material` replaces the mesh's own material for this call
    /// only. A failure aborts this mesh's draw for the current frame; nothing
    /// has been submitted to the context when an error is returned.
    pub fn render<C>(
        &mut self,
        ctx: &mut C,
        override_material: Option<&Material>,
    ) -> Result<RenderInfo>
    where
        C: GraphicsContext + ?Sized,
    {
        let context = ctx.id();
        self.node.emit(&RenderEvent::BeforeRender {
            node: self.id(),
            context,
        });

        let info = match self.draw(ctx, override_material) {
            Ok(info) => info,
            Err(err) => {
                log::debug!("Mesh '{}' ({}) not drawn: {err}", self.node.name, self.id());
                return Err(err);
            }
        };

        self.node.emit(&RenderEvent::AfterRender {
            node: self.id(),
            context,
            info,
        });
        Ok(info)
    }

    fn draw<C>(&self, ctx: &mut C, override_material: Option<&Material>) -> Result<RenderInfo>
    where
        C: GraphicsContext + ?Sized,
    {
        let material = override_material
            .or_else(|| self.material().map(|material| &**material))
            .ok_or(RenderError::MissingResource(Resource::Material))?;
        let geometry = self
            .geometry()
            .ok_or(RenderError::MissingResource(Resource::Geometry))?;
        let shader = material.shader();

        let mode = self.draw_mode()?;
        if !ctx.supports_draw_mode(mode) {
            return Err(RenderError::InvalidTopology(self.mode().to_string()));
        }

        // Chunks are checked ahead of the skinning upload so that a missing
        // index buffer fails before any context call.
        let chunks = geometry.buffer_chunks(ctx.id());
        if geometry.is_use_face() {
            if let Some(chunk) = chunks.iter().position(|c| c.indices_buffer().is_none()) {
                return Err(RenderError::MissingResource(Resource::IndexBuffer { chunk }));
            }
        }

        // Pose matrices of a skinned mesh
        if let Some(skeleton) = self.skeleton() {
            let matrices = skeleton.sub_inv_bind_matrices(self.id(), &self.joints)?;
            shader.set_uniform_by_semantic(
                ctx,
                Semantic::InvBindMatrix,
                UniformValue::Mat4Array(&matrices),
            );
        }

        let settings = *ctx.settings();
        if settings.rebind_on_shader_change {
            ctx.draw_state().bind_shader(shader.id());
        }

        let structure = geometry.structure_version();
        let mut info = RenderInfo::default();
        for (index, chunk) in chunks.iter().enumerate() {
            let draw_id = DrawId::new(ctx.id(), geometry.id(), structure, index);
            let rebind = ctx.draw_state().should_rebind(draw_id) || !settings.draw_state_cache;

            if rebind {
                bind_chunk_attributes(ctx, shader, chunk);
                info.rebind_count += 1;
            } else {
                log::trace!("Chunk {index} of geometry {} still bound, skipping", geometry.id());
            }

            submit_chunk(ctx, geometry, chunk, mode, settings.index_type);
            info.draw_call_count += 1;
        }

        if info.draw_call_count > 0 {
            info.face_count = geometry.face_count();
            info.vertex_count = geometry.vertices_number();
        }
        Ok(info)
    }
}

/// Resolves the shader symbol an attribute buffer binds to.
fn resolve_symbol(shader: &Shader, name: Symbol, buffer: &AttributeBuffer) -> Option<Symbol> {
    match buffer.semantic {
        Some(semantic) => shader.semantic_symbol(semantic),
        None => Some(name),
    }
}

/// Enables and describes the attributes of `chunk` the shader consumes.
fn bind_chunk_attributes<C>(ctx: &mut C, shader: &Shader, chunk: &BufferChunk)
where
    C: GraphicsContext + ?Sized,
{
    let mut available: SmallVec<[(Symbol, &AttributeBuffer); 8]> = SmallVec::new();

    for (name, buffer) in chunk.attribute_buffers() {
        let Some(symbol) = resolve_symbol(shader, name, buffer)
            .filter(|symbol| shader.has_attribute_template(*symbol))
        else {
            log::trace!(
                "Attribute '{}' not consumed by shader '{}'",
                interner::resolve(name),
                shader.name()
            );
            continue;
        };

        if let Some(slot) = available.iter_mut().find(|(s, _)| *s == symbol) {
            log::warn!(
                "Attributes of one chunk resolve to the same symbol '{}'; the last one wins",
                interner::resolve(symbol)
            );
            slot.1 = buffer;
        } else {
            available.push((symbol, buffer));
        }
    }

    let symbols: SmallVec<[Symbol; 8]> = available.iter().map(|(symbol, _)| *symbol).collect();
    shader.enable_attributes(ctx, &symbols);

    for (symbol, buffer) in available {
        ctx.bind_buffer(BufferTarget::ArrayBuffer, buffer.buffer);
        shader.set_mesh_attribute(ctx, symbol, buffer.ty, buffer.size);
    }
}

/// Issues the draw call of one chunk.
fn submit_chunk<C>(
    ctx: &mut C,
    geometry: &Geometry,
    chunk: &BufferChunk,
    mode: DrawMode,
    index_type: IndexType,
) where
    C: GraphicsContext + ?Sized,
{
    match chunk.indices_buffer() {
        Some(indices) if geometry.is_use_face() => {
            ctx.bind_buffer(BufferTarget::ElementArrayBuffer, indices.buffer);
            ctx.draw_elements(mode, indices.count, index_type, 0);
        }
        _ => ctx.draw_arrays(mode, 0, geometry.vertices_number()),
    }
}
