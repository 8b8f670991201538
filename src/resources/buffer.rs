//! GPU buffer references and vertex layout descriptions.
//!
//! Buffers are created and uploaded elsewhere; the render path only needs
//! their handles and enough metadata to describe the vertex layout to the
//! graphics context.

use serde::{Deserialize, Serialize};

use crate::resources::shader::Semantic;

/// Opaque handle of a buffer object living in a graphics context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

/// Binding target of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute data.
    ArrayBuffer,
    /// Index data.
    ElementArrayBuffer,
}

/// Component type of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Float,
}

impl AttributeType {
    /// Size of one component in bytes.
    #[must_use]
    pub fn byte_size(self) -> u32 {
        match self {
            Self::Byte | Self::UnsignedByte => 1,
            Self::Short | Self::UnsignedShort => 2,
            Self::Int | Self::UnsignedInt | Self::Float => 4,
        }
    }

    /// Maps `size` components of this type to a WGPU vertex format.
    ///
    /// Returns `None` for combinations WGPU has no format for
    /// (e.g. three 8-bit components).
    #[must_use]
    pub fn vertex_format(self, size: u32) -> Option<wgpu::VertexFormat> {
        use wgpu::VertexFormat as F;
        let format = match (self, size) {
            (Self::Float, 1) => F::Float32,
            (Self::Float, 2) => F::Float32x2,
            (Self::Float, 3) => F::Float32x3,
            (Self::Float, 4) => F::Float32x4,
            (Self::UnsignedInt, 1) => F::Uint32,
            (Self::UnsignedInt, 2) => F::Uint32x2,
            (Self::UnsignedInt, 3) => F::Uint32x3,
            (Self::UnsignedInt, 4) => F::Uint32x4,
            (Self::Int, 1) => F::Sint32,
            (Self::Int, 2) => F::Sint32x2,
            (Self::Int, 3) => F::Sint32x3,
            (Self::Int, 4) => F::Sint32x4,
            (Self::UnsignedShort, 2) => F::Uint16x2,
            (Self::UnsignedShort, 4) => F::Uint16x4,
            (Self::Short, 2) => F::Sint16x2,
            (Self::Short, 4) => F::Sint16x4,
            (Self::UnsignedByte, 2) => F::Uint8x2,
            (Self::UnsignedByte, 4) => F::Uint8x4,
            (Self::Byte, 2) => F::Sint8x2,
            (Self::Byte, 4) => F::Sint8x4,
            _ => return None,
        };
        Some(format)
    }
}

/// Width of the indices in an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IndexType {
    /// 16-bit indices.
    #[default]
    UnsignedShort,
    /// 32-bit indices.
    UnsignedInt,
}

impl IndexType {
    #[must_use]
    pub fn to_wgpu(self) -> wgpu::IndexFormat {
        match self {
            Self::UnsignedShort => wgpu::IndexFormat::Uint16,
            Self::UnsignedInt => wgpu::IndexFormat::Uint32,
        }
    }

    #[must_use]
    pub fn byte_size(self) -> u32 {
        match self {
            Self::UnsignedShort => 2,
            Self::UnsignedInt => 4,
        }
    }
}

/// A vertex attribute buffer with its layout metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeBuffer {
    pub buffer: BufferHandle,
    pub ty: AttributeType,
    /// Number of components per vertex.
    pub size: u32,
    /// Role of the data, resolved through the shader's semantic table.
    /// Without a semantic the attribute name is used as the shader symbol.
    pub semantic: Option<Semantic>,
}

impl AttributeBuffer {
    #[must_use]
    pub fn new(buffer: BufferHandle, ty: AttributeType, size: u32) -> Self {
        Self {
            buffer,
            ty,
            size,
            semantic: None,
        }
    }

    #[must_use]
    pub fn with_semantic(mut self, semantic: Semantic) -> Self {
        self.semantic = Some(semantic);
        self
    }

    /// WGPU vertex format of this attribute, if one exists.
    #[must_use]
    pub fn vertex_format(&self) -> Option<wgpu::VertexFormat> {
        self.ty.vertex_format(self.size)
    }
}

/// An index buffer and the number of indices it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicesBuffer {
    pub buffer: BufferHandle,
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_formats() {
        assert_eq!(
            AttributeType::Float.vertex_format(3),
            Some(wgpu::VertexFormat::Float32x3)
        );
        assert_eq!(AttributeType::Float.vertex_format(5), None);
    }

    #[test]
    fn three_byte_components_have_no_format() {
        assert_eq!(AttributeType::UnsignedByte.vertex_format(3), None);
        assert_eq!(
            AttributeType::UnsignedByte.vertex_format(4),
            Some(wgpu::VertexFormat::Uint8x4)
        );
    }

    #[test]
    fn index_type_defaults_to_16_bit() {
        assert_eq!(IndexType::default(), IndexType::UnsignedShort);
        assert_eq!(IndexType::default().to_wgpu(), wgpu::IndexFormat::Uint16);
        assert_eq!(IndexType::UnsignedInt.byte_size(), 4);
    }
}
