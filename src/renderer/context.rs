//! Graphics context abstraction.
//!
//! The mesh render path talks to the GPU through this trait only. It mirrors a
//! GL-style state machine: buffers are bound to targets, vertex attribute
//! arrays are enabled and described per location, and draws consume whatever
//! is bound.
//!
//! A context is used by exactly one render loop at a time and all calls on it
//! are strictly sequential, which is what makes the per-context
//! [`DrawStateCache`] sound.

use crate::renderer::draw_state::DrawStateCache;
use crate::renderer::settings::RenderSettings;
use crate::renderer::topology::DrawMode;
use crate::resources::buffer::{AttributeType, BufferHandle, BufferTarget, IndexType};
use crate::resources::id::ContextId;
use crate::resources::shader::UniformValue;

pub trait GraphicsContext {
    /// Stable identity of this context.
    fn id(&self) -> ContextId;

    /// The attribute-binding cache owned by this context.
    fn draw_state(&mut self) -> &mut DrawStateCache;

    fn settings(&self) -> &RenderSettings {
        &RenderSettings::DEFAULT
    }

    /// Whether the context has a native primitive type for `mode`.
    fn supports_draw_mode(&self, mode: DrawMode) -> bool {
        let _ = mode;
        true
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: BufferHandle);

    /// Enables exactly `locations`, disabling every other enabled attribute
    /// array.
    fn enable_attribute_locations(&mut self, locations: &[u32]);

    /// Describes the buffer bound to [`BufferTarget::ArrayBuffer`] as the
    /// source of attribute `location`: `size` tightly packed components of
    /// type `ty`, starting at offset zero.
    fn vertex_attrib_pointer(&mut self, location: u32, size: u32, ty: AttributeType);

    fn set_uniform(&mut self, location: u32, value: UniformValue<'_>);

    /// Draws `count` indices from the bound element array buffer.
    fn draw_elements(&mut self, mode: DrawMode, count: u32, index_type: IndexType, offset: u64);

    /// Draws `count` vertices starting at `first`.
    fn draw_arrays(&mut self, mode: DrawMode, first: u32, count: u32);
}
