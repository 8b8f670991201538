//! Shader program bindings.
//!
//! A [`Shader`] describes the inputs of an already compiled program:
//! - **Attribute templates**: vertex inputs the program declares, with their
//!   binding location and expected layout
//! - **Semantics**: symbolic roles (e.g. `NORMAL`, `INV_BIND_MATRIX`) mapped to
//!   the concrete symbol the program uses for them
//! - **Uniform locations**: where each uniform symbol is bound
//!
//! Geometry attribute names never need to match shader input names: a tagged
//! attribute is routed through the semantic table instead.

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::renderer::context::GraphicsContext;
use crate::resources::buffer::AttributeType;
use crate::resources::id::ShaderId;
use crate::utils::interner::{self, Symbol};

// ============================================================================
// Semantic
// ============================================================================

/// Symbolic role of a vertex attribute or uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Semantic {
    Position,
    Normal,
    Tangent,
    Texcoord0,
    Texcoord1,
    Color,
    Joint,
    Weight,
    World,
    View,
    Projection,
    WorldViewProjection,
    InvBindMatrix,
}

impl Semantic {
    pub const ALL: [Semantic; 13] = [
        Self::Position,
        Self::Normal,
        Self::Tangent,
        Self::Texcoord0,
        Self::Texcoord1,
        Self::Color,
        Self::Joint,
        Self::Weight,
        Self::World,
        Self::View,
        Self::Projection,
        Self::WorldViewProjection,
        Self::InvBindMatrix,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Position => "POSITION",
            Self::Normal => "NORMAL",
            Self::Tangent => "TANGENT",
            Self::Texcoord0 => "TEXCOORD_0",
            Self::Texcoord1 => "TEXCOORD_1",
            Self::Color => "COLOR",
            Self::Joint => "JOINT",
            Self::Weight => "WEIGHT",
            Self::World => "WORLD",
            Self::View => "VIEW",
            Self::Projection => "PROJECTION",
            Self::WorldViewProjection => "WORLDVIEWPROJECTION",
            Self::InvBindMatrix => "INV_BIND_MATRIX",
        }
    }
}

impl fmt::Display for Semantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown semantic name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSemantic(pub String);

impl fmt::Display for UnknownSemantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown semantic {:?}", self.0)
    }
}

impl std::error::Error for UnknownSemantic {}

impl FromStr for Semantic {
    type Err = UnknownSemantic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|semantic| semantic.as_str() == s)
            .ok_or_else(|| UnknownSemantic(s.to_string()))
    }
}

// ============================================================================
// Uniform values
// ============================================================================

/// A uniform value borrowed for the duration of one upload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue<'a> {
    Float(f32),
    Vec3([f32; 3]),
    Mat4(&'a [f32; 16]),
    /// Column-major 4x4 matrices laid out back to back.
    Mat4Array(&'a [f32]),
}

// ============================================================================
// Shader
// ============================================================================

/// A vertex input declared by the shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeTemplate {
    pub location: u32,
    pub ty: AttributeType,
    pub size: u32,
}

/// Inputs of a compiled shader program.
#[derive(Debug, Clone)]
pub struct Shader {
    id: ShaderId,
    name: String,
    attribute_templates: FxHashMap<Symbol, AttributeTemplate>,
    semantics: FxHashMap<Semantic, Symbol>,
    uniforms: FxHashMap<Symbol, u32>,
}

impl Shader {
    #[must_use]
    pub fn builder(name: &str) -> ShaderBuilder {
        ShaderBuilder::new(name)
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> ShaderId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Symbol the shader uses for `semantic`, if it consumes it.
    #[inline]
    #[must_use]
    pub fn semantic_symbol(&self, semantic: Semantic) -> Option<Symbol> {
        self.semantics.get(&semantic).copied()
    }

    /// Whether the shader declares `symbol` as a vertex input.
    #[inline]
    #[must_use]
    pub fn has_attribute_template(&self, symbol: Symbol) -> bool {
        self.attribute_templates.contains_key(&symbol)
    }

    #[inline]
    #[must_use]
    pub fn attribute_template(&self, symbol: Symbol) -> Option<&AttributeTemplate> {
        self.attribute_templates.get(&symbol)
    }

    #[inline]
    #[must_use]
    pub fn uniform_location(&self, symbol: Symbol) -> Option<u32> {
        self.uniforms.get(&symbol).copied()
    }

    /// Enables exactly the attribute locations of `symbols` on the context.
    ///
    /// Symbols the shader does not declare are ignored.
    pub fn enable_attributes<C>(&self, ctx: &mut C, symbols: &[Symbol])
    where
        C: GraphicsContext + ?Sized,
    {
        let locations: SmallVec<[u32; 8]> = symbols
            .iter()
            .filter_map(|symbol| self.attribute_templates.get(symbol))
            .map(|template| template.location)
            .collect();
        ctx.enable_attribute_locations(&locations);
    }

    /// Describes the layout of the buffer currently bound to the array buffer
    /// target as the input `symbol`.
    ///
    /// Returns `false` if the shader does not declare `symbol`.
    pub fn set_mesh_attribute<C>(
        &self,
        ctx: &mut C,
        symbol: Symbol,
        ty: AttributeType,
        size: u32,
    ) -> bool
    where
        C: GraphicsContext + ?Sized,
    {
        let Some(template) = self.attribute_templates.get(&symbol) else {
            return false;
        };
        ctx.vertex_attrib_pointer(template.location, size, ty);
        true
    }

    /// Uploads `value` to the uniform the shader binds to `semantic`.
    ///
    /// Returns `false` (and uploads nothing) if the shader does not consume
    /// the semantic.
    pub fn set_uniform_by_semantic<C>(
        &self,
        ctx: &mut C,
        semantic: Semantic,
        value: UniformValue<'_>,
    ) -> bool
    where
        C: GraphicsContext + ?Sized,
    {
        let Some(location) = self
            .semantic_symbol(semantic)
            .and_then(|symbol| self.uniform_location(symbol))
        else {
            log::trace!("Shader '{}' does not consume semantic {semantic}", self.name);
            return false;
        };
        ctx.set_uniform(location, value);
        true
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Shader`].
///
/// ```rust,ignore
/// let shader = Shader::builder("lambert")
///     .attribute("position", 0, AttributeType::Float, 3)
///     .attribute("worldNormal", 1, AttributeType::Float, 3)
///     .semantic(Semantic::Normal, "worldNormal")
///     .build();
/// ```
#[derive(Debug)]
pub struct ShaderBuilder {
    name: String,
    attribute_templates: FxHashMap<Symbol, AttributeTemplate>,
    semantics: FxHashMap<Semantic, Symbol>,
    uniforms: FxHashMap<Symbol, u32>,
}

impl ShaderBuilder {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attribute_templates: FxHashMap::default(),
            semantics: FxHashMap::default(),
            uniforms: FxHashMap::default(),
        }
    }

    /// Declares a vertex input.
    #[must_use]
    pub fn attribute(mut self, symbol: &str, location: u32, ty: AttributeType, size: u32) -> Self {
        self.attribute_templates.insert(
            interner::intern(symbol),
            AttributeTemplate { location, ty, size },
        );
        self
    }

    /// Declares a uniform.
    #[must_use]
    pub fn uniform(mut self, symbol: &str, location: u32) -> Self {
        self.uniforms.insert(interner::intern(symbol), location);
        self
    }

    /// Routes `semantic` to `symbol`.
    #[must_use]
    pub fn semantic(mut self, semantic: Semantic, symbol: &str) -> Self {
        self.semantics.insert(semantic, interner::intern(symbol));
        self
    }

    #[must_use]
    pub fn build(self) -> Shader {
        Shader {
            id: ShaderId::next(),
            name: self.name,
            attribute_templates: self.attribute_templates,
            semantics: self.semantics,
            uniforms: self.uniforms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_names_round_trip() {
        for semantic in Semantic::ALL {
            assert_eq!(semantic.as_str().parse::<Semantic>(), Ok(semantic));
        }
        assert!("normal".parse::<Semantic>().is_err());
    }

    #[test]
    fn semantic_resolves_through_table() {
        let shader = Shader::builder("test")
            .attribute("worldNormal", 1, AttributeType::Float, 3)
            .semantic(Semantic::Normal, "worldNormal")
            .build();

        let symbol = shader.semantic_symbol(Semantic::Normal).unwrap();
        assert_eq!(interner::resolve(symbol), "worldNormal");
        assert!(shader.has_attribute_template(symbol));
        assert!(shader.semantic_symbol(Semantic::Tangent).is_none());
    }

    #[test]
    fn each_build_gets_a_new_identity() {
        let a = Shader::builder("a").build();
        let b = Shader::builder("a").build();
        assert_ne!(a.id(), b.id());
    }
}
