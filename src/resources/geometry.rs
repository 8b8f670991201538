//! Geometry and its GPU buffer chunks.
//!
//! # Chunks
//!
//! A geometry whose data exceeds what a single buffer can address (e.g. more
//! than 65536 vertices with 16-bit indices) is split into several
//! [`BufferChunk`]s. Each chunk carries its own set of attribute buffers and,
//! for indexed geometry, its own index buffer. Most geometries have exactly
//! one chunk.
//!
//! Buffer handles are only meaningful inside the context that created them, so
//! chunks are stored per [`ContextId`]. Uploading is done elsewhere; this type
//! only hands out what was registered with [`Geometry::set_buffer_chunks`].
//!
//! Draw identities are built from the geometry id and its structure version.
//! Re-registering chunks bumps the version, and a clone gets a new id, so a
//! recorded identity never outlives the buffers it was recorded for.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::resources::buffer::{AttributeBuffer, IndicesBuffer};
use crate::resources::id::{ContextId, GeometryId};
use crate::resources::version_tracker::ChangeTracker;
use crate::utils::interner::{self, Symbol};

/// One GPU-sized partition of a geometry's vertex and index data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferChunk {
    /// Named attribute buffers in insertion order.
    attribute_buffers: SmallVec<[(Symbol, AttributeBuffer); 8]>,
    indices_buffer: Option<IndicesBuffer>,
}

impl BufferChunk {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the attribute buffer called `name`.
    #[must_use]
    pub fn with_attribute(mut self, name: &str, buffer: AttributeBuffer) -> Self {
        self.set_attribute(name, buffer);
        self
    }

    #[must_use]
    pub fn with_indices(mut self, indices: IndicesBuffer) -> Self {
        self.indices_buffer = Some(indices);
        self
    }

    /// Adds (or replaces) the attribute buffer called `name`.
    pub fn set_attribute(&mut self, name: &str, buffer: AttributeBuffer) {
        let name = interner::intern(name);
        if let Some(slot) = self.attribute_buffers.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = buffer;
        } else {
            self.attribute_buffers.push((name, buffer));
        }
    }

    /// Iterates `(name, buffer)` pairs in insertion order.
    pub fn attribute_buffers(&self) -> impl Iterator<Item = (Symbol, &AttributeBuffer)> {
        self.attribute_buffers.iter().map(|(name, buffer)| (*name, buffer))
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeBuffer> {
        let name = interner::get(name)?;
        self.attribute_buffers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, buffer)| buffer)
    }

    #[inline]
    #[must_use]
    pub fn indices_buffer(&self) -> Option<&IndicesBuffer> {
        self.indices_buffer.as_ref()
    }
}

/// Vertex and index data of a drawable shape.
#[derive(Debug)]
pub struct Geometry {
    id: GeometryId,
    pub name: String,
    vertex_count: u32,
    face_count: u32,
    use_face: bool,
    chunks: FxHashMap<ContextId, Vec<BufferChunk>>,
    // Bumped whenever a chunk list is replaced
    structure: ChangeTracker,
}

impl Clone for Geometry {
    /// The clone is a distinct geometry and gets its own id.
    fn clone(&self) -> Self {
        Self {
            id: GeometryId::next(),
            name: self.name.clone(),
            vertex_count: self.vertex_count,
            face_count: self.face_count,
            use_face: self.use_face,
            chunks: self.chunks.clone(),
            structure: ChangeTracker::new(),
        }
    }
}

impl Geometry {
    /// Creates an indexed geometry drawn with `face_count` faces.
    #[must_use]
    pub fn indexed(name: &str, vertex_count: u32, face_count: u32) -> Self {
        Self {
            id: GeometryId::next(),
            name: name.to_string(),
            vertex_count,
            face_count,
            use_face: true,
            chunks: FxHashMap::default(),
            structure: ChangeTracker::new(),
        }
    }

    /// Creates a geometry drawn straight from its vertex stream.
    #[must_use]
    pub fn non_indexed(name: &str, vertex_count: u32) -> Self {
        Self {
            id: GeometryId::next(),
            name: name.to_string(),
            vertex_count,
            face_count: 0,
            use_face: false,
            chunks: FxHashMap::default(),
            structure: ChangeTracker::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> GeometryId {
        self.id
    }

    /// Version of the registered chunk lists.
    #[inline]
    #[must_use]
    pub fn structure_version(&self) -> u64 {
        self.structure.version()
    }

    /// Whether the geometry is drawn through index buffers.
    #[inline]
    #[must_use]
    pub fn is_use_face(&self) -> bool {
        self.use_face
    }

    #[inline]
    #[must_use]
    pub fn vertices_number(&self) -> u32 {
        self.vertex_count
    }

    #[inline]
    #[must_use]
    pub fn face_count(&self) -> u32 {
        self.face_count
    }

    /// Registers the chunks uploaded to `context`, replacing previous ones.
    pub fn set_buffer_chunks(&mut self, context: ContextId, chunks: Vec<BufferChunk>) {
        self.chunks.insert(context, chunks);
        self.structure.changed();
    }

    #[must_use]
    pub fn with_buffer_chunks(mut self, context: ContextId, chunks: Vec<BufferChunk>) -> Self {
        self.set_buffer_chunks(context, chunks);
        self
    }

    /// Ordered chunk sequence for `context`. Empty if nothing was uploaded
    /// to that context.
    #[must_use]
    pub fn buffer_chunks(&self, context: ContextId) -> &[BufferChunk] {
        self.chunks.get(&context).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::buffer::{AttributeType, BufferHandle};

    #[test]
    fn set_attribute_replaces_same_name() {
        let chunk = BufferChunk::new()
            .with_attribute(
                "position",
                AttributeBuffer::new(BufferHandle(1), AttributeType::Float, 3),
            )
            .with_attribute(
                "position",
                AttributeBuffer::new(BufferHandle(2), AttributeType::Float, 3),
            );

        assert_eq!(chunk.attribute_buffers().count(), 1);
        assert_eq!(chunk.attribute("position").unwrap().buffer, BufferHandle(2));
    }

    #[test]
    fn chunks_are_per_context() {
        let a = ContextId::next();
        let b = ContextId::next();
        let geometry =
            Geometry::indexed("quad", 4, 2).with_buffer_chunks(a, vec![BufferChunk::new()]);

        assert_eq!(geometry.buffer_chunks(a).len(), 1);
        assert!(geometry.buffer_chunks(b).is_empty());
    }

    #[test]
    fn replacing_chunks_bumps_structure_version() {
        let ctx = ContextId::next();
        let mut geometry = Geometry::indexed("quad", 4, 2);
        let before = geometry.structure_version();

        geometry.set_buffer_chunks(ctx, vec![BufferChunk::new()]);
        assert_ne!(geometry.structure_version(), before);
    }

    #[test]
    fn clone_is_a_new_geometry() {
        let ctx = ContextId::next();
        let geometry =
            Geometry::indexed("quad", 4, 2).with_buffer_chunks(ctx, vec![BufferChunk::new()]);
        let copy = geometry.clone();

        assert_ne!(copy.id(), geometry.id());
        assert_eq!(copy.buffer_chunks(ctx).len(), 1);
        assert_eq!(copy.face_count(), geometry.face_count());
    }
}
