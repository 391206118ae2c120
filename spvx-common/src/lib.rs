//! Common types shared between the spvx compiler and its consumers.

/// Vertex input element descriptions.
pub mod vertex;
/// Resource layout kinds and flags.
pub mod layout;

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

pub use layout::{ResourceKind, ResourceLayoutElementOptions, ShaderStages};
pub use vertex::{VertexElementFormat, VertexElementSemantic};

/// The shading language dialect to emit.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompileTarget {
    /// HLSL, shader model 5.0.
    HLSL = 0,
    /// Desktop GLSL.
    GLSL,
    /// OpenGL ES GLSL.
    ESSL,
    /// Metal Shading Language.
    MSL,
}

impl CompileTarget {
    /// Whether the target is one of the GLSL family of dialects.
    pub const fn is_glsl(self) -> bool {
        matches!(self, CompileTarget::GLSL | CompileTarget::ESSL)
    }
}

/// Error returned when parsing an unknown compile target.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
#[error("unknown compile target \"{0}\"")]
pub struct UnknownTargetError(pub String);

impl FromStr for CompileTarget {
    type Err = UnknownTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "hlsl" => CompileTarget::HLSL,
            "glsl" => CompileTarget::GLSL,
            "essl" => CompileTarget::ESSL,
            "msl" | "metal" => CompileTarget::MSL,
            _ => return Err(UnknownTargetError(s.to_string())),
        })
    }
}

impl Display for CompileTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CompileTarget::HLSL => "hlsl",
            CompileTarget::GLSL => "glsl",
            CompileTarget::ESSL => "essl",
            CompileTarget::MSL => "msl",
        })
    }
}

/// A programmable pipeline stage.
///
/// Stages order by pipeline position, so the primary stage of a request
/// (vertex or compute) is always visited first.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Compute,
}

impl From<ShaderStage> for ShaderStages {
    fn from(value: ShaderStage) -> Self {
        match value {
            ShaderStage::Vertex => ShaderStages::VERTEX,
            ShaderStage::Fragment => ShaderStages::FRAGMENT,
            ShaderStage::Compute => ShaderStages::COMPUTE,
        }
    }
}
