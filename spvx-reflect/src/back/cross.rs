use crate::back::{
    cross_compile, CrossCompileOptions, DialectOptions, EmitShader, GlslVersion,
    ShaderCompilerOutput,
};
use crate::error::{ShaderCompileError, ShaderReflectError};
use crate::front::ShaderSet;
use crate::reflect::{BaseType, Decoration, ShaderIr, ShaderResource, StageResources, TypeInfo};
use spirv_cross2::compile::glsl::GlslVersion as CrossGlslVersion;
use spirv_cross2::compile::hlsl::HlslShaderModel;
use spirv_cross2::compile::CompilableTarget;
use spirv_cross2::handle::{Handle, TypeId, VariableId};
use spirv_cross2::reflect::{DecorationValue, ResourceType, ScalarKind, TypeInner};
use spirv_cross2::targets::{Glsl, Hlsl, Msl};
use spirv_cross2::{spirv, Compiler, Module, SpirvCrossError};
use spvx_common::CompileTarget;

#[derive(Debug, Copy, Clone)]
enum CrossHandle {
    Variable(Handle<VariableId>),
    Type(Handle<TypeId>),
}

/// A single stage parsed by spirv-cross.
///
/// spirv-cross handles are mapped to the dense ids the binding pipeline works with.
pub struct CrossIr<T> {
    compiler: Compiler<T>,
    handles: Vec<CrossHandle>,
}

/// Parse a SPIR-V module into a shader IR.
pub trait ParseSpirv: Sized {
    fn parse(words: &[u32]) -> Result<Self, ShaderReflectError>;
}

fn register(handles: &mut Vec<CrossHandle>, handle: CrossHandle) -> u32 {
    handles.push(handle);
    handles.len() as u32
}

impl<T> CrossIr<T> {
    fn handle(&self, id: u32) -> Result<CrossHandle, ShaderReflectError> {
        id.checked_sub(1)
            .and_then(|index| self.handles.get(index as usize))
            .copied()
            .ok_or(ShaderReflectError::InvalidHandle(id))
    }

    fn variable(&self, id: u32) -> Result<Handle<VariableId>, ShaderReflectError> {
        match self.handle(id)? {
            CrossHandle::Variable(handle) => Ok(handle),
            CrossHandle::Type(_) => Err(ShaderReflectError::InvalidHandle(id)),
        }
    }
}

const fn cross_decoration(decoration: Decoration) -> spirv::Decoration {
    match decoration {
        Decoration::DescriptorSet => spirv::Decoration::DescriptorSet,
        Decoration::Binding => spirv::Decoration::Binding,
        Decoration::Location => spirv::Decoration::Location,
    }
}

fn scalar_base(kind: ScalarKind) -> BaseType {
    match kind {
        ScalarKind::Float => BaseType::Float,
        ScalarKind::Int => BaseType::Int,
        ScalarKind::Uint => BaseType::UInt,
        _ => BaseType::Other,
    }
}

macro_rules! impl_cross_ir {
    ($($target:ty),*) => {
        $(
        impl ParseSpirv for CrossIr<$target> {
            fn parse(words: &[u32]) -> Result<Self, ShaderReflectError> {
                let module = Module::from_words(words);
                Ok(CrossIr {
                    compiler: Compiler::<$target>::new(module)?,
                    handles: Vec::new(),
                })
            }
        }

        impl CrossIr<$target> {
            fn type_info(&self, ty: Handle<TypeId>) -> Result<TypeInfo, SpirvCrossError> {
                let ty = self.compiler.type_description(ty)?;
                Ok(match ty.inner {
                    TypeInner::Struct(_) => TypeInfo::opaque(BaseType::Struct),
                    TypeInner::Image(_) => TypeInfo::opaque(BaseType::Image),
                    TypeInner::Sampler => TypeInfo::opaque(BaseType::Sampler),
                    TypeInner::Scalar(scalar) => TypeInfo::new(scalar_base(scalar.kind), 1),
                    TypeInner::Vector { width, scalar } => {
                        TypeInfo::new(scalar_base(scalar.kind), width as u32)
                    }
                    _ => TypeInfo::opaque(BaseType::Other),
                })
            }

            fn is_non_writable(
                &self,
                variable: Handle<VariableId>,
            ) -> Result<bool, SpirvCrossError> {
                let decorations = self.compiler.buffer_block_decorations(variable)?;
                Ok(decorations.is_some_and(|decorations| {
                    decorations.contains(&spirv::Decoration::NonWritable)
                }))
            }

            fn collect(
                &mut self,
                ty: ResourceType,
            ) -> Result<Vec<ShaderResource>, ShaderReflectError> {
                let storage = matches!(ty, ResourceType::StorageBuffer);
                let resources = self.compiler.shader_resources()?;
                let mut collected = Vec::new();
                for resource in resources.resources_for_type(ty)? {
                    let info = self.type_info(resource.base_type_id)?;
                    let non_writable = storage && self.is_non_writable(resource.id)?;
                    let id = register(&mut self.handles, CrossHandle::Variable(resource.id));
                    let base_type_id =
                        register(&mut self.handles, CrossHandle::Type(resource.base_type_id));
                    collected.push(ShaderResource {
                        id,
                        base_type_id,
                        name: resource.name.to_string(),
                        ty: info,
                        non_writable,
                    });
                }
                Ok(collected)
            }
        }

        impl ShaderIr for CrossIr<$target> {
            fn resources(&mut self) -> Result<StageResources, ShaderReflectError> {
                Ok(StageResources {
                    uniform_buffers: self.collect(ResourceType::UniformBuffer)?,
                    storage_buffers: self.collect(ResourceType::StorageBuffer)?,
                    separate_images: self.collect(ResourceType::SeparateImage)?,
                    storage_images: self.collect(ResourceType::StorageImage)?,
                    separate_samplers: self.collect(ResourceType::SeparateSamplers)?,
                    stage_inputs: self.collect(ResourceType::StageInput)?,
                    stage_outputs: self.collect(ResourceType::StageOutput)?,
                })
            }

            fn decoration(
                &self,
                id: u32,
                decoration: Decoration,
            ) -> Result<Option<u32>, ShaderReflectError> {
                let variable = self.variable(id)?;
                Ok(match self.compiler.decoration(variable, cross_decoration(decoration))? {
                    Some(DecorationValue::Literal(value)) => Some(value),
                    _ => None,
                })
            }

            fn set_decoration(
                &mut self,
                id: u32,
                decoration: Decoration,
                value: u32,
            ) -> Result<(), ShaderReflectError> {
                let variable = self.variable(id)?;
                self.compiler
                    .set_decoration(variable, cross_decoration(decoration), Some(value))?;
                Ok(())
            }

            fn unset_decoration(
                &mut self,
                id: u32,
                decoration: Decoration,
            ) -> Result<(), ShaderReflectError> {
                let variable = self.variable(id)?;
                self.compiler.set_decoration(
                    variable,
                    cross_decoration(decoration),
                    DecorationValue::unset(),
                )?;
                Ok(())
            }

            fn set_name(&mut self, id: u32, name: &str) -> Result<(), ShaderReflectError> {
                match self.handle(id)? {
                    CrossHandle::Variable(handle) => self.compiler.set_name(handle, name)?,
                    CrossHandle::Type(handle) => self.compiler.set_name(handle, name)?,
                }
                Ok(())
            }

            fn set_specialization(
                &mut self,
                constant_id: u32,
                value: u64,
            ) -> Result<bool, ShaderReflectError> {
                let handle = self
                    .compiler
                    .specialization_constants()?
                    .into_iter()
                    .find(|constant| constant.constant_id == constant_id)
                    .map(|constant| constant.id);

                let Some(handle) = handle else {
                    return Ok(false);
                };
                self.compiler.set_specialization_constant_value(handle, value)?;
                Ok(true)
            }

            fn combine_image_samplers(&mut self) -> Result<(), ShaderReflectError> {
                self.compiler.build_combined_image_samplers()?;
                let combined: Vec<_> = self
                    .compiler
                    .combined_image_samplers()?
                    .into_iter()
                    .map(|sampler| (sampler.combined_id, sampler.image_id))
                    .collect();

                for (combined, image) in combined {
                    let Some(name) = self.compiler.name(image)? else {
                        continue;
                    };
                    let name = name.to_string();
                    log::trace!("naming combined image sampler \"{name}\"");
                    self.compiler.set_name(combined, name.as_str())?;
                }
                Ok(())
            }
        }
        )*
    };
}

impl_cross_ir!(Glsl, Hlsl, Msl);

impl EmitShader for CrossIr<Glsl> {
    fn emit(self, dialect: &DialectOptions) -> Result<String, ShaderCompileError> {
        let mut options = Glsl::options();
        options.version = match dialect.glsl_version.unwrap_or(GlslVersion::Glsl330) {
            GlslVersion::Glsl330 => CrossGlslVersion::Glsl330,
            GlslVersion::Glsl430 => CrossGlslVersion::Glsl430,
            GlslVersion::Essl300 => CrossGlslVersion::Glsl300Es,
            GlslVersion::Essl310 => CrossGlslVersion::Glsl310Es,
        };
        options.enable_420pack_extension = false;
        options.common.flip_vertex_y = dialect.invert_y;
        options.common.fixup_clipspace = dialect.fix_clip_space_z;

        Ok(self.compiler.compile(&options)?.to_string())
    }
}

impl EmitShader for CrossIr<Hlsl> {
    fn emit(self, dialect: &DialectOptions) -> Result<String, ShaderCompileError> {
        let mut options = Hlsl::options();
        options.shader_model = HlslShaderModel::ShaderModel5_0;
        options.common.flip_vertex_y = dialect.invert_y;
        options.common.fixup_clipspace = dialect.fix_clip_space_z;

        Ok(self.compiler.compile(&options)?.to_string())
    }
}

impl EmitShader for CrossIr<Msl> {
    fn emit(self, dialect: &DialectOptions) -> Result<String, ShaderCompileError> {
        let mut options = Msl::options();
        // bindings were already rewritten into metal buffer, texture and sampler indices
        options.enable_decoration_binding = true;
        options.common.flip_vertex_y = dialect.invert_y;
        options.common.fixup_clipspace = dialect.fix_clip_space_z;

        Ok(self.compiler.compile(&options)?.to_string())
    }
}

fn parse_stages<T>(
    stages: &ShaderSet<Vec<u32>>,
) -> Result<ShaderSet<CrossIr<T>>, ShaderReflectError>
where
    CrossIr<T>: ParseSpirv,
{
    stages.as_ref().try_map(|_, words| CrossIr::<T>::parse(words))
}

/// Cross-compile SPIR-V stages to `target`.
pub fn compile_spirv(
    stages: &ShaderSet<Vec<u32>>,
    target: CompileTarget,
    options: &CrossCompileOptions,
) -> Result<ShaderCompilerOutput, ShaderCompileError> {
    log::debug!("cross-compiling {:?} stages to {target}", stages.primary_stage());
    match target {
        CompileTarget::HLSL => cross_compile(parse_stages::<Hlsl>(stages)?, target, options),
        CompileTarget::GLSL | CompileTarget::ESSL => {
            cross_compile(parse_stages::<Glsl>(stages)?, target, options)
        }
        CompileTarget::MSL => cross_compile(parse_stages::<Msl>(stages)?, target, options),
    }
}

/// Cross-compile a vertex and fragment shader pair to `target`.
pub fn compile_vertex_fragment(
    vertex: &[u32],
    fragment: &[u32],
    target: CompileTarget,
    options: &CrossCompileOptions,
) -> Result<ShaderCompilerOutput, ShaderCompileError> {
    let stages = ShaderSet::from_spirv(Some(vertex), Some(fragment), None)?;
    compile_spirv(&stages, target, options)
}

/// Cross-compile a compute shader to `target`.
pub fn compile_compute(
    compute: &[u32],
    target: CompileTarget,
    options: &CrossCompileOptions,
) -> Result<ShaderCompilerOutput, ShaderCompileError> {
    let stages = ShaderSet::from_spirv(None, None, Some(compute))?;
    compile_spirv(&stages, target, options)
}
