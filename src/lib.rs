#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod errors;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod utils;

pub use errors::{RenderError, Result};
pub use renderer::{
    DrawId, DrawMode, DrawStateCache, GraphicsContext, RecordingContext, RenderInfo,
    RenderSettings, invalidate_draw_caches,
};
pub use resources::{
    AttributeBuffer, AttributeType, BufferChunk, BufferHandle, Geometry, IndicesBuffer, Material,
    Semantic, Shader,
};
pub use scene::{Mesh, Node, RenderEvent, Skeleton};
pub use utils::interner;
