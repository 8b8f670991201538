//! Draw topology.

use std::fmt;
use std::str::FromStr;

/// Primitive topology a mesh is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawMode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl DrawMode {
    pub const ALL: [DrawMode; 7] = [
        Self::Points,
        Self::Lines,
        Self::LineLoop,
        Self::LineStrip,
        Self::Triangles,
        Self::TriangleStrip,
        Self::TriangleFan,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Points => "POINTS",
            Self::Lines => "LINES",
            Self::LineLoop => "LINE_LOOP",
            Self::LineStrip => "LINE_STRIP",
            Self::Triangles => "TRIANGLES",
            Self::TriangleStrip => "TRIANGLE_STRIP",
            Self::TriangleFan => "TRIANGLE_FAN",
        }
    }

    /// The WGPU topology for this mode.
    ///
    /// WGPU has no line loops or triangle fans; those return `None` and must
    /// be rejected by WGPU-backed contexts.
    #[must_use]
    pub fn topology(self) -> Option<wgpu::PrimitiveTopology> {
        use wgpu::PrimitiveTopology as T;
        match self {
            Self::Points => Some(T::PointList),
            Self::Lines => Some(T::LineList),
            Self::LineStrip => Some(T::LineStrip),
            Self::Triangles => Some(T::TriangleList),
            Self::TriangleStrip => Some(T::TriangleStrip),
            Self::LineLoop | Self::TriangleFan => None,
        }
    }
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown draw mode name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDrawMode(pub String);

impl fmt::Display for UnknownDrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown draw mode {:?}", self.0)
    }
}

impl std::error::Error for UnknownDrawMode {}

impl FromStr for DrawMode {
    type Err = UnknownDrawMode;

    /// Parses a mode name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownDrawMode(s.to_string()))
    }
}
