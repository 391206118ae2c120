use crate::error::ShaderCompileError;
use spvx_common::ShaderStage;

#[cfg(feature = "shaderc")]
mod shaderc;

#[cfg(feature = "shaderc")]
pub use self::shaderc::compile_glsl_to_spirv;

/// The stages of a single compilation request.
///
/// A request is either a vertex and fragment pair, or a lone compute shader.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShaderSet<T> {
    VertexFragment { vertex: T, fragment: T },
    Compute { compute: T },
}

impl ShaderSet<Vec<u32>> {
    /// Build a stage set from optional SPIR-V modules.
    ///
    /// Empty modules count as absent. A vertex and fragment pair takes precedence
    /// over a compute shader.
    pub fn from_spirv(
        vertex: Option<&[u32]>,
        fragment: Option<&[u32]>,
        compute: Option<&[u32]>,
    ) -> Result<Self, ShaderCompileError> {
        let present = |words: Option<&[u32]>| words.filter(|w| !w.is_empty()).map(<[u32]>::to_vec);
        match (present(vertex), present(fragment), present(compute)) {
            (Some(vertex), Some(fragment), _) => Ok(ShaderSet::VertexFragment { vertex, fragment }),
            (None, None, Some(compute)) => Ok(ShaderSet::Compute { compute }),
            _ => Err(ShaderCompileError::InvalidStageCombination),
        }
    }
}

impl<T> ShaderSet<T> {
    /// The first stage of the pipeline; vertex or compute.
    pub fn primary_stage(&self) -> ShaderStage {
        match self {
            ShaderSet::VertexFragment { .. } => ShaderStage::Vertex,
            ShaderSet::Compute { .. } => ShaderStage::Compute,
        }
    }

    pub fn as_ref(&self) -> ShaderSet<&T> {
        match self {
            ShaderSet::VertexFragment { vertex, fragment } => {
                ShaderSet::VertexFragment { vertex, fragment }
            }
            ShaderSet::Compute { compute } => ShaderSet::Compute { compute },
        }
    }

    pub fn is_compute(&self) -> bool {
        matches!(self, ShaderSet::Compute { .. })
    }

    pub fn get(&self, stage: ShaderStage) -> Option<&T> {
        match (self, stage) {
            (ShaderSet::VertexFragment { vertex, .. }, ShaderStage::Vertex) => Some(vertex),
            (ShaderSet::VertexFragment { fragment, .. }, ShaderStage::Fragment) => Some(fragment),
            (ShaderSet::Compute { compute }, ShaderStage::Compute) => Some(compute),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, stage: ShaderStage) -> Option<&mut T> {
        match (self, stage) {
            (ShaderSet::VertexFragment { vertex, .. }, ShaderStage::Vertex) => Some(vertex),
            (ShaderSet::VertexFragment { fragment, .. }, ShaderStage::Fragment) => Some(fragment),
            (ShaderSet::Compute { compute }, ShaderStage::Compute) => Some(compute),
            _ => None,
        }
    }

    /// Iterate the stages in pipeline order.
    pub fn iter(&self) -> impl Iterator<Item = (ShaderStage, &T)> {
        match self {
            ShaderSet::VertexFragment { vertex, fragment } => vec![
                (ShaderStage::Vertex, vertex),
                (ShaderStage::Fragment, fragment),
            ],
            ShaderSet::Compute { compute } => vec![(ShaderStage::Compute, compute)],
        }
        .into_iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ShaderStage, &mut T)> {
        match self {
            ShaderSet::VertexFragment { vertex, fragment } => vec![
                (ShaderStage::Vertex, vertex),
                (ShaderStage::Fragment, fragment),
            ],
            ShaderSet::Compute { compute } => vec![(ShaderStage::Compute, compute)],
        }
        .into_iter()
    }

    /// Map every stage, stopping at the first error.
    pub fn try_map<U, E>(
        self,
        mut f: impl FnMut(ShaderStage, T) -> Result<U, E>,
    ) -> Result<ShaderSet<U>, E> {
        Ok(match self {
            ShaderSet::VertexFragment { vertex, fragment } => ShaderSet::VertexFragment {
                vertex: f(ShaderStage::Vertex, vertex)?,
                fragment: f(ShaderStage::Fragment, fragment)?,
            },
            ShaderSet::Compute { compute } => ShaderSet::Compute {
                compute: f(ShaderStage::Compute, compute)?,
            },
        })
    }
}

/// The source language of a shader passed to the SPIR-V front end.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum SourceLanguage {
    #[default]
    GLSL,
    HLSL,
}

/// A preprocessor macro defined when compiling to SPIR-V.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MacroDefinition {
    pub name: String,
    pub value: Option<String>,
}

impl MacroDefinition {
    pub fn new(name: impl Into<String>, value: Option<&str>) -> Self {
        MacroDefinition {
            name: name.into(),
            value: value.map(str::to_string),
        }
    }
}

/// Options for compiling shader source to SPIR-V.
#[derive(Debug, Clone, Default)]
pub struct GlslCompileOptions {
    pub language: SourceLanguage,
    /// Emit debug information instead of optimizing for performance.
    pub debug: bool,
    pub macros: Vec<MacroDefinition>,
}
