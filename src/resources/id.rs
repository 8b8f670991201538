//! Process-unique identities.
//!
//! Every shared resource gets a stable integer identity when it is created.
//! Identities are never reused within a process, so a recorded identity can be
//! compared against a later one without holding a reference to the resource.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $counter:ident, $prefix:literal) => {
        static $counter: AtomicU64 = AtomicU64::new(1);

        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            /// Allocates a fresh identity.
            #[must_use]
            pub fn next() -> Self {
                Self($counter.fetch_add(1, Ordering::Relaxed))
            }

            #[inline]
            #[must_use]
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Identity of a graphics context.
    ContextId,
    NEXT_CONTEXT_ID,
    "Context"
);
define_id!(
    /// Identity of a geometry.
    GeometryId,
    NEXT_GEOMETRY_ID,
    "Geometry"
);
define_id!(
    /// Identity of a scene-graph node (and therefore of a mesh).
    NodeId,
    NEXT_NODE_ID,
    "Node"
);
define_id!(
    /// Identity of a material.
    MaterialId,
    NEXT_MATERIAL_ID,
    "Material"
);
define_id!(
    /// Identity of a shader program.
    ShaderId,
    NEXT_SHADER_ID,
    "Shader"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = GeometryId::next();
        let b = GeometryId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn display_carries_kind() {
        let id = ShaderId::next();
        assert_eq!(id.to_string(), format!("Shader#{}", id.get()));
    }
}
