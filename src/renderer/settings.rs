//! Mesh Render Settings
//!
//! Per-context knobs for the mesh draw path. A context hands its settings to
//! the render procedure through [`GraphicsContext::settings`].
//!
//! ```rust,ignore
//! use myth_mesh::renderer::{IndexType, RenderSettings};
//!
//! // 32-bit indices, memoization disabled (every draw rebinds)
//! let settings = RenderSettings {
//!     index_type: IndexType::UnsignedInt,
//!     draw_state_cache: false,
//!     ..Default::default()
//! };
//! ```
//!
//! [`GraphicsContext::settings`]: crate::renderer::context::GraphicsContext::settings

use serde::{Deserialize, Serialize};

use crate::resources::buffer::IndexType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Skip attribute rebinding for consecutive draws of the same chunk.
    ///
    /// Disabling this rebinds on every draw. Output is identical either way.
    pub draw_state_cache: bool,

    /// Treat a change of the active shader as invalidating the recorded
    /// bindings.
    pub rebind_on_shader_change: bool,

    /// Width of the indices in chunk index buffers.
    pub index_type: IndexType,
}

impl RenderSettings {
    pub const DEFAULT: RenderSettings = RenderSettings {
        draw_state_cache: true,
        rebind_on_shader_change: true,
        index_type: IndexType::UnsignedShort,
    };
}

impl Default for RenderSettings {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_cache_with_16_bit_indices() {
        let settings = RenderSettings::default();
        assert!(settings.draw_state_cache);
        assert!(settings.rebind_on_shader_change);
        assert_eq!(settings.index_type, IndexType::UnsignedShort);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let settings: RenderSettings =
            serde_json::from_str(r#"{ "index_type": "UnsignedInt" }"#).unwrap();
        assert_eq!(settings.index_type, IndexType::UnsignedInt);
        assert!(settings.draw_state_cache);
        assert!(settings.rebind_on_shader_change);
    }
}
