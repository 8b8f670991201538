//! Recording graphics context.
//!
//! [`RecordingContext`] implements [`GraphicsContext`] by appending every call
//! to a command list instead of talking to a GPU. It backs headless runs and
//! the test suite, and makes the exact call sequence of a frame observable.

use smallvec::SmallVec;

use crate::renderer::context::GraphicsContext;
use crate::renderer::draw_state::DrawStateCache;
use crate::renderer::settings::RenderSettings;
use crate::renderer::topology::DrawMode;
use crate::resources::buffer::{AttributeType, BufferHandle, BufferTarget, IndexType};
use crate::resources::id::ContextId;
use crate::resources::shader::UniformValue;

/// Owned copy of an uploaded uniform value.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedUniform {
    Float(f32),
    Vec3([f32; 3]),
    Mat4([f32; 16]),
    Mat4Array(Vec<f32>),
}

impl From<UniformValue<'_>> for RecordedUniform {
    fn from(value: UniformValue<'_>) -> Self {
        match value {
            UniformValue::Float(v) => Self::Float(v),
            UniformValue::Vec3(v) => Self::Vec3(v),
            UniformValue::Mat4(m) => Self::Mat4(*m),
            UniformValue::Mat4Array(data) => Self::Mat4Array(data.to_vec()),
        }
    }
}

/// One recorded graphics-context call.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCommand {
    BindBuffer {
        target: BufferTarget,
        buffer: BufferHandle,
    },
    EnableAttribute {
        location: u32,
    },
    DisableAttribute {
        location: u32,
    },
    AttributePointer {
        location: u32,
        size: u32,
        ty: AttributeType,
    },
    Uniform {
        location: u32,
        value: RecordedUniform,
    },
    DrawElements {
        mode: DrawMode,
        count: u32,
        index_type: IndexType,
        offset: u64,
    },
    DrawArrays {
        mode: DrawMode,
        first: u32,
        count: u32,
    },
}

impl GlCommand {
    #[must_use]
    pub fn is_draw(&self) -> bool {
        matches!(self, Self::DrawElements { .. } | Self::DrawArrays { .. })
    }
}

#[derive(Debug)]
pub struct RecordingContext {
    id: ContextId,
    settings: RenderSettings,
    draw_state: DrawStateCache,
    unsupported_modes: SmallVec<[DrawMode; 2]>,
    enabled: SmallVec<[u32; 16]>,
    commands: Vec<GlCommand>,
}

impl RecordingContext {
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(RenderSettings::default())
    }

    #[must_use]
    pub fn with_settings(settings: RenderSettings) -> Self {
        Self {
            id: ContextId::next(),
            settings,
            draw_state: DrawStateCache::new(),
            unsupported_modes: SmallVec::new(),
            enabled: SmallVec::new(),
            commands: Vec::new(),
        }
    }

    /// Makes the context report `mode` as unsupported, like a backend without
    /// a native primitive for it.
    #[must_use]
    pub fn without_draw_mode(mut self, mode: DrawMode) -> Self {
        if !self.unsupported_modes.contains(&mode) {
            self.unsupported_modes.push(mode);
        }
        self
    }

    #[must_use]
    pub fn commands(&self) -> &[GlCommand] {
        &self.commands
    }

    /// Returns the recorded commands, leaving the list empty. Context state
    /// (enabled attributes, draw cache) is kept.
    pub fn take_commands(&mut self) -> Vec<GlCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn draw_calls(&self) -> impl Iterator<Item = &GlCommand> {
        self.commands.iter().filter(|command| command.is_draw())
    }

    /// Currently enabled attribute locations, in ascending order.
    #[must_use]
    pub fn enabled_locations(&self) -> Vec<u32> {
        let mut locations = self.enabled.to_vec();
        locations.sort_unstable();
        locations
    }
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsContext for RecordingContext {
    fn id(&self) -> ContextId {
        self.id
    }

    fn draw_state(&mut self) -> &mut DrawStateCache {
        &mut self.draw_state
    }

    fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    fn supports_draw_mode(&self, mode: DrawMode) -> bool {
        !self.unsupported_modes.contains(&mode)
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: BufferHandle) {
        self.commands.push(GlCommand::BindBuffer { target, buffer });
    }

    fn enable_attribute_locations(&mut self, locations: &[u32]) {
        let (keep, disable): (SmallVec<[u32; 16]>, SmallVec<[u32; 16]>) = self
            .enabled
            .iter()
            .copied()
            .partition(|location| locations.contains(location));
        for location in disable {
            self.commands.push(GlCommand::DisableAttribute { location });
        }
        self.enabled = keep;
        for &location in locations {
            if !self.enabled.contains(&location) {
                self.enabled.push(location);
                self.commands.push(GlCommand::EnableAttribute { location });
            }
        }
    }

    fn vertex_attrib_pointer(&mut self, location: u32, size: u32, ty: AttributeType) {
        self.commands
            .push(GlCommand::AttributePointer { location, size, ty });
    }

    fn set_uniform(&mut self, location: u32, value: UniformValue<'_>) {
        self.commands.push(GlCommand::Uniform {
            location,
            value: value.into(),
        });
    }

    fn draw_elements(&mut self, mode: DrawMode, count: u32, index_type: IndexType, offset: u64) {
        self.commands.push(GlCommand::DrawElements {
            mode,
            count,
            index_type,
            offset,
        });
    }

    fn draw_arrays(&mut self, mode: DrawMode, first: u32, count: u32) {
        self.commands
            .push(GlCommand::DrawArrays { mode, first, count });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enable_emits_only_the_diff() {
        let mut ctx = RecordingContext::new();
        ctx.enable_attribute_locations(&[0, 1, 2]);
        ctx.take_commands();

        ctx.enable_attribute_locations(&[1, 3]);
        assert_eq!(
            ctx.commands(),
            &[
                GlCommand::DisableAttribute { location: 0 },
                GlCommand::DisableAttribute { location: 2 },
                GlCommand::EnableAttribute { location: 3 },
            ]
        );
        assert_eq!(ctx.enabled_locations(), vec![1, 3]);
    }

    #[test]
    fn unsupported_modes() {
        let ctx = RecordingContext::new().without_draw_mode(DrawMode::TriangleFan);
        assert!(!ctx.supports_draw_mode(DrawMode::TriangleFan));
        assert!(ctx.supports_draw_mode(DrawMode::Triangles));
    }

    #[test]
    fn contexts_have_distinct_ids() {
        assert_ne!(RecordingContext::new().id(), RecordingContext::new().id());
    }
}
