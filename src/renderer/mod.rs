//! Mesh rendering
//!
//! - `context`: the graphics context trait the draw path talks to
//! - `draw_state`: attribute-binding memoization keyed on [`DrawId`]
//! - `mesh_renderer`: the per-mesh render procedure
//! - `recording`: a context that records calls instead of executing them
//! - `settings`, `stats`, `topology`: configuration, statistics, draw modes

pub mod context;
pub mod draw_state;
pub mod mesh_renderer;
pub mod recording;
pub mod settings;
pub mod stats;
pub mod topology;

pub use context::GraphicsContext;
pub use draw_state::{DrawId, DrawStateCache, invalidate_draw_caches};
pub use recording::{GlCommand, RecordedUniform, RecordingContext};
pub use settings::RenderSettings;
pub use stats::RenderInfo;
pub use topology::DrawMode;
pub use crate::resources::buffer::IndexType;
