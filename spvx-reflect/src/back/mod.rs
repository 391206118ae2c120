use crate::error::ShaderCompileError;
use crate::front::ShaderSet;
use crate::reflect::{ShaderInterface, ShaderIr, ShaderReflection};
use spvx_common::CompileTarget;

/// Dialect emission options.
pub mod dialect;

/// Cross-compilation with spirv-cross.
#[cfg(feature = "cross")]
pub mod cross;

pub use dialect::{DialectOptions, GlslVersion};

/// A specialization constant override.
///
/// The value is stored as the raw bits of the constant, zero-extended to 64 bits.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SpecializationConstant {
    /// The `constant_id` of the specialization constant.
    pub id: u32,
    pub constant: u64,
}

impl SpecializationConstant {
    pub const fn new(id: u32, constant: u64) -> Self {
        SpecializationConstant { id, constant }
    }

    pub const fn from_bool(id: u32, value: bool) -> Self {
        Self::new(id, value as u64)
    }

    pub const fn from_u32(id: u32, value: u32) -> Self {
        Self::new(id, value as u64)
    }

    pub const fn from_i32(id: u32, value: i32) -> Self {
        Self::new(id, value as u32 as u64)
    }

    pub const fn from_u64(id: u32, value: u64) -> Self {
        Self::new(id, value)
    }

    pub const fn from_i64(id: u32, value: i64) -> Self {
        Self::new(id, value as u64)
    }

    pub fn from_f32(id: u32, value: f32) -> Self {
        Self::new(id, value.to_bits() as u64)
    }

    pub fn from_f64(id: u32, value: f64) -> Self {
        Self::new(id, value.to_bits())
    }
}

/// Options for a cross-compilation request.
#[derive(Debug, Clone, Default)]
pub struct CrossCompileOptions {
    /// Remap clip-space depth from [-1, 1] to [0, 1].
    pub fix_clip_space_z: bool,
    /// Flip the Y coordinate of vertex outputs.
    pub invert_vertex_output_y: bool,
    /// Rename every resource to `spvx_<set>_<binding>`.
    pub normalize_resource_names: bool,
    pub specializations: Vec<SpecializationConstant>,
}

/// Emitted source for every stage of a request, with its reflection.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShaderCompilerOutput {
    pub shaders: ShaderSet<String>,
    pub reflection: ShaderReflection,
}

/// A shader IR that can be emitted as target source.
pub trait EmitShader: ShaderIr + Sized {
    fn emit(self, options: &DialectOptions) -> Result<String, ShaderCompileError>;
}

/// Merge, rebind and reflect the stages, then emit each of them for `target`.
pub fn cross_compile<T: EmitShader>(
    stages: ShaderSet<T>,
    target: CompileTarget,
    options: &CrossCompileOptions,
) -> Result<ShaderCompilerOutput, ShaderCompileError> {
    let dialect = DialectOptions::new(
        target,
        stages.is_compute(),
        options.invert_vertex_output_y,
        options.fix_clip_space_z,
    );

    let mut iface = ShaderInterface::new(stages, &options.specializations)?;
    let table = iface.merge(options.normalize_resource_names)?;
    iface.remap(&table, target)?;
    let reflection = iface.reflect(&table)?;

    let shaders = iface.into_stages().try_map(|stage, stage_iface| {
        let uses_storage = stage_iface.resources.uses_storage();
        let source = stage_iface.ir.emit(&dialect)?;
        log::debug!("emitted {stage:?} stage as {target}");
        Ok::<_, ShaderCompileError>(match dialect.glsl_version {
            Some(version) => dialect::upgrade_version(source, version, uses_storage),
            None => source,
        })
    })?;

    Ok(ShaderCompilerOutput { shaders, reflection })
}
