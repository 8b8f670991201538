//! Attribute-binding state tracking
//!
//! Configuring vertex attribute bindings is one of the more expensive state
//! changes on GL-style APIs. Two consecutive draws of the same chunk need the
//! identical configuration, so the second one can skip it.
//!
//! [`DrawStateCache`] remembers the [`DrawId`] of the last chunk whose
//! bindings were configured. It is purely advisory: forgetting the recorded
//! identity only costs a redundant rebind, while wrongly skipping one would
//! draw with stale bindings. Anything that can change the binding requirements
//! without changing the [`DrawId`] must therefore invalidate the cache.
//!
//! Each graphics context owns its own cache. [`invalidate_draw_caches`] is the
//! process-wide hook: it bumps a global epoch that every cache checks lazily
//! on its next lookup.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::resources::id::{ContextId, GeometryId, ShaderId};

/// Global invalidation epoch.
static DRAW_STATE_EPOCH: AtomicU64 = AtomicU64::new(0);

/// Invalidates every [`DrawStateCache`] in the process.
///
/// Call this when a material's attribute set changed in a way the draw
/// identity cannot see (same geometry and chunk, more attribute slots).
pub fn invalidate_draw_caches() {
    let epoch = DRAW_STATE_EPOCH.fetch_add(1, Ordering::AcqRel) + 1;
    log::debug!("Draw state caches invalidated (epoch {epoch})");
}

/// Identity of a chunk draw: which chunk of which version of a geometry, in
/// which context.
///
/// Equal identities reference the same buffers and therefore need the same
/// attribute bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawId {
    pub context: ContextId,
    pub geometry: GeometryId,
    /// Structure version of the geometry's chunk lists.
    pub structure: u64,
    pub chunk: usize,
}

impl DrawId {
    #[inline]
    #[must_use]
    pub fn new(context: ContextId, geometry: GeometryId, structure: u64, chunk: usize) -> Self {
        Self {
            context,
            geometry,
            structure,
            chunk,
        }
    }
}

/// Remembers the last configured [`DrawId`] of one context.
#[derive(Debug, Clone)]
pub struct DrawStateCache {
    current: Option<DrawId>,
    shader: Option<ShaderId>,
    epoch: u64,
}

impl DrawStateCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: None,
            shader: None,
            epoch: DRAW_STATE_EPOCH.load(Ordering::Acquire),
        }
    }

    /// Returns `true` and records `draw_id` if it differs from the recorded
    /// identity; returns `false` if the bindings from the previous draw are
    /// still valid.
    pub fn should_rebind(&mut self, draw_id: DrawId) -> bool {
        self.sync_epoch();
        if self.current == Some(draw_id) {
            return false;
        }
        self.current = Some(draw_id);
        true
    }

    /// Forces the next [`should_rebind`](Self::should_rebind) to return `true`.
    #[inline]
    pub fn invalidate(&mut self) {
        self.current = None;
    }

    /// Records the shader the next bindings are made for, invalidating the
    /// cache if it differs from the previous one.
    pub fn bind_shader(&mut self, shader: ShaderId) {
        if self.shader != Some(shader) {
            if self.shader.is_some() {
                log::trace!("Shader switched to {shader}, draw state invalidated");
            }
            self.shader = Some(shader);
            self.current = None;
        }
    }

    /// The identity whose bindings are currently configured, if any.
    #[must_use]
    pub fn current(&self) -> Option<DrawId> {
        if self.epoch == DRAW_STATE_EPOCH.load(Ordering::Acquire) {
            self.current
        } else {
            None
        }
    }

    fn sync_epoch(&mut self) {
        let epoch = DRAW_STATE_EPOCH.load(Ordering::Acquire);
        if epoch != self.epoch {
            self.epoch = epoch;
            self.current = None;
        }
    }
}

impl Default for DrawStateCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (ContextId, GeometryId) {
        (ContextId::next(), GeometryId::next())
    }

    #[test]
    fn first_call_always_rebinds() {
        let (ctx, geo) = ids();
        let mut cache = DrawStateCache::new();
        assert!(cache.current().is_none());
        assert!(cache.should_rebind(DrawId::new(ctx, geo, 0, 0)));
    }

    #[test]
    fn rebinds_exactly_on_change() {
        let (ctx, geo) = ids();
        let other = GeometryId::next();
        let sequence = [
            DrawId::new(ctx, geo, 0, 0),
            DrawId::new(ctx, geo, 0, 0),
            DrawId::new(ctx, geo, 0, 1),
            DrawId::new(ctx, other, 0, 1),
            DrawId::new(ctx, other, 0, 1),
            DrawId::new(ctx, geo, 0, 0),
        ];
        let expected = [true, false, true, true, false, true];

        let mut cache = DrawStateCache::new();
        let actual: Vec<bool> = sequence.iter().map(|id| cache.should_rebind(*id)).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn invalidate_forces_rebind() {
        let (ctx, geo) = ids();
        let id = DrawId::new(ctx, geo, 0, 0);
        let mut cache = DrawStateCache::new();

        assert!(cache.should_rebind(id));
        cache.invalidate();
        assert!(cache.should_rebind(id));
        assert!(!cache.should_rebind(id));
    }

    #[test]
    fn shader_switch_forces_rebind() {
        let (ctx, geo) = ids();
        let id = DrawId::new(ctx, geo, 0, 0);
        let (a, b) = (ShaderId::next(), ShaderId::next());
        let mut cache = DrawStateCache::new();

        cache.bind_shader(a);
        assert!(cache.should_rebind(id));
        cache.bind_shader(a);
        assert!(!cache.should_rebind(id));
        cache.bind_shader(b);
        assert!(cache.should_rebind(id));
    }

    #[test]
    fn new_structure_version_rebinds() {
        let (ctx, geo) = ids();
        let mut cache = DrawStateCache::new();

        assert!(cache.should_rebind(DrawId::new(ctx, geo, 0, 0)));
        assert!(cache.should_rebind(DrawId::new(ctx, geo, 1, 0)));
        assert!(!cache.should_rebind(DrawId::new(ctx, geo, 1, 0)));
    }
}
