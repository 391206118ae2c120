use crate::reflect::{BaseType, TypeInfo};
use thiserror::Error;

/// Error type for shader compilation.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ShaderCompileError {
    /// Compilation error from shaderc (glslang).
    #[cfg(feature = "shaderc")]
    #[error("shaderc: {0}")]
    ShaderCCompileError(#[from] shaderc::Error),

    /// Error when initializing the shaderc compiler.
    #[cfg(feature = "shaderc")]
    #[error("shaderc init")]
    ShaderCInitError,

    /// Error when transpiling from spirv-cross.
    #[cfg(feature = "cross")]
    #[error("cross: {0}")]
    SpirvCrossCompileError(#[from] spirv_cross2::SpirvCrossError),

    /// The provided stages did not form a vertex and fragment pair, or a compute shader.
    #[error("the given combination of shaders was not valid")]
    InvalidStageCombination,

    /// Error when reflecting or rebinding the shader interface.
    #[error(transparent)]
    ReflectError(#[from] ShaderReflectError),
}

/// Error type for shader reflection.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ShaderReflectError {
    /// Reflection error from spirv-cross.
    #[cfg(feature = "cross")]
    #[error("spirv: {0}")]
    SpirvCrossError(#[from] spirv_cross2::SpirvCrossError),

    /// The type of a resource is not a buffer, image or sampler.
    #[error("unhandled SPIR-V data type {ty:?} for resource \"{name}\"")]
    UnclassifiableType { name: String, ty: BaseType },

    /// The same binding slot was declared by incompatible resources.
    #[error(
        "the same binding slot (set {set}, binding {binding}) was used by multiple resources: \
         \"{existing}\" and \"{incoming}\""
    )]
    BindingConflict {
        set: u32,
        binding: u32,
        existing: String,
        incoming: String,
    },

    /// A resource is bound beyond the supported descriptor set or binding range.
    #[error("resource \"{name}\" is bound out of range at (set {set}, binding {binding})")]
    InvalidBindingIndex { name: String, set: u32, binding: u32 },

    /// A vertex input is decorated beyond the supported location range.
    #[error("vertex input \"{name}\" is at out of range location {location}")]
    InvalidVertexLocation { name: String, location: u32 },

    /// A vertex input has a type that has no vertex element format.
    #[error("unsupported vertex input type {ty:?} for \"{name}\" at location {location}")]
    UnsupportedVertexInputType {
        name: String,
        location: u32,
        ty: TypeInfo,
    },

    /// The id does not refer to an object known to the shader IR.
    #[error("unknown shader object {0}")]
    InvalidHandle(u32),
}
