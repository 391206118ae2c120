#![forbid(missing_docs)]
//! SPIR-V cross-compilation with normalized bindings and resource layout reflection.
//!
//! spvx takes a vertex and fragment shader pair, or a compute shader, as SPIR-V and emits
//! HLSL, GLSL, ESSL or MSL source for every stage. Resources declared by the stages are
//! merged by descriptor set and binding, rebound into the binding spaces of the target,
//! and reflected into a vertex layout and a per-set resource layout.
//!
//! ## Usage
//! With the `cross` feature, [`compile_vertex_fragment`](crate::reflect::compile_vertex_fragment)
//! and [`compile_compute`](crate::reflect::compile_compute) compile SPIR-V words directly.
//! Any other shader IR can be plugged in by implementing
//! [`ShaderIr`](crate::reflect::ShaderIr) and [`EmitShader`](crate::reflect::EmitShader)
//! and calling [`cross_compile`](crate::reflect::cross_compile).
//!
//! | **Target** | **Binding spaces**                      |
//! |------------|-----------------------------------------|
//! | HLSL       | `b`, `t`, `u` and `s` registers         |
//! | MSL        | buffer, texture and sampler indices     |
//! | GLSL       | declared set and binding                |
//! | ESSL       | storage buffers and images renumbered   |
//!
//! ## Features
//! - `cross`: cross-compilation with spirv-cross.
//! - `shaderc`: GLSL and HLSL to SPIR-V compilation with shaderc.
//! - `serde`: serialization of reflection.

/// Shared target, stage and layout types.
pub mod common {
    pub use spvx_common::*;
}

/// Shader reflection and cross-compilation.
///
/// Every stage of a request is merged into a [`ResourceTable`], rebound for the target and
/// reflected into a [`ShaderReflection`].
pub mod reflect {
    pub use spvx_reflect::error::{ShaderCompileError, ShaderReflectError};

    pub use spvx_reflect::front::{GlslCompileOptions, MacroDefinition, ShaderSet, SourceLanguage};

    pub use spvx_reflect::reflect::{
        allocate::{BindingAllocator, BindingAssignments, BindingSpace},
        classify::classify,
        names::{canonical_name, varying_name},
        reflection::{
            ResourceLayoutDescription, ResourceLayoutElementDescription, VertexElementDescription,
            MAX_VERTEX_LOCATIONS,
        },
        table::{MAX_BINDINGS, MAX_DESCRIPTOR_SETS},
        BaseType, BindingKey, Decoration, ResourceCategory, ResourceEntry, ResourceTable,
        ShaderInterface, ShaderIr, ShaderReflection, ShaderResource, StageResources, TypeInfo,
    };

    pub use spvx_reflect::back::{
        cross_compile, CrossCompileOptions, DialectOptions, EmitShader, GlslVersion,
        ShaderCompilerOutput, SpecializationConstant,
    };

    #[cfg(feature = "cross")]
    pub use spvx_reflect::back::cross::{
        compile_compute, compile_spirv, compile_vertex_fragment, CrossIr, ParseSpirv,
    };

    #[cfg(feature = "shaderc")]
    pub use spvx_reflect::front::compile_glsl_to_spirv;
}

pub use spvx_common::CompileTarget;
