#![cfg(feature = "cross")]

use rayon::prelude::*;
use rspirv::binary::Assemble;
use rspirv::dr::{Builder, Operand};
use rspirv::spirv::{self, Word};

use spvx::common::{ResourceKind, ShaderStages, VertexElementFormat};
use spvx::reflect::{
    compile_compute, compile_vertex_fragment, CrossCompileOptions, ShaderCompileError,
    ShaderReflectError, ShaderSet,
};
use spvx::CompileTarget;

struct ModuleBuilder {
    b: Builder,
    interface: Vec<Word>,
}

impl ModuleBuilder {
    fn new() -> Self {
        let mut b = Builder::new();
        b.set_version(1, 0);
        b.capability(spirv::Capability::Shader);
        b.memory_model(spirv::AddressingModel::Logical, spirv::MemoryModel::GLSL450);
        ModuleBuilder {
            b,
            interface: Vec::new(),
        }
    }

    fn float_vector(&mut self, width: u32) -> Word {
        let f32_ty = self.b.type_float(32);
        if width == 1 {
            f32_ty
        } else {
            self.b.type_vector(f32_ty, width)
        }
    }

    fn bind(&mut self, variable: Word, name: &str, set: u32, binding: u32) -> Word {
        self.b.name(variable, name);
        self.b
            .decorate(variable, spirv::Decoration::DescriptorSet, [Operand::LiteralBit32(set)]);
        self.b
            .decorate(variable, spirv::Decoration::Binding, [Operand::LiteralBit32(binding)]);
        variable
    }

    fn uniform_buffer(&mut self, name: &str, set: u32, binding: u32) -> Word {
        let vec4 = self.float_vector(4);
        let block = self.b.type_struct([vec4]);
        self.b.name(block, format!("{name}Block"));
        self.b.decorate(block, spirv::Decoration::Block, []);
        self.b
            .member_decorate(block, 0, spirv::Decoration::Offset, [Operand::LiteralBit32(0)]);
        let pointer = self.b.type_pointer(None, spirv::StorageClass::Uniform, block);
        let variable = self.b.variable(pointer, None, spirv::StorageClass::Uniform, None);
        self.bind(variable, name, set, binding)
    }

    fn storage_buffer(&mut self, name: &str, set: u32, binding: u32, readonly: bool) -> Word {
        let vec4 = self.float_vector(4);
        let block = self.b.type_struct([vec4]);
        self.b.name(block, format!("{name}Block"));
        self.b.decorate(block, spirv::Decoration::BufferBlock, []);
        self.b
            .member_decorate(block, 0, spirv::Decoration::Offset, [Operand::LiteralBit32(0)]);
        if readonly {
            self.b
                .member_decorate(block, 0, spirv::Decoration::NonWritable, []);
        }
        let pointer = self.b.type_pointer(None, spirv::StorageClass::Uniform, block);
        let variable = self.b.variable(pointer, None, spirv::StorageClass::Uniform, None);
        if readonly {
            self.b.decorate(variable, spirv::Decoration::NonWritable, []);
        }
        self.bind(variable, name, set, binding)
    }

    fn image(&mut self, name: &str, set: u32, binding: u32, storage: bool) -> Word {
        let f32_ty = self.b.type_float(32);
        let (sampled, format) = if storage {
            (2, spirv::ImageFormat::Rgba8)
        } else {
            (1, spirv::ImageFormat::Unknown)
        };
        let image = self
            .b
            .type_image(f32_ty, spirv::Dim::Dim2D, 0, 0, 0, sampled, format, None);
        let pointer = self
            .b
            .type_pointer(None, spirv::StorageClass::UniformConstant, image);
        let variable = self
            .b
            .variable(pointer, None, spirv::StorageClass::UniformConstant, None);
        self.bind(variable, name, set, binding)
    }

    fn sampler(&mut self, name: &str, set: u32, binding: u32) -> Word {
        let sampler = self.b.type_sampler();
        let pointer = self
            .b
            .type_pointer(None, spirv::StorageClass::UniformConstant, sampler);
        let variable = self
            .b
            .variable(pointer, None, spirv::StorageClass::UniformConstant, None);
        self.bind(variable, name, set, binding)
    }

    fn interface_variable(
        &mut self,
        name: &str,
        location: u32,
        width: u32,
        class: spirv::StorageClass,
    ) -> Word {
        let ty = self.float_vector(width);
        let pointer = self.b.type_pointer(None, class, ty);
        let variable = self.b.variable(pointer, None, class, None);
        if !name.is_empty() {
            self.b.name(variable, name);
        }
        self.b
            .decorate(variable, spirv::Decoration::Location, [Operand::LiteralBit32(location)]);
        self.interface.push(variable);
        variable
    }

    fn input(&mut self, name: &str, location: u32, width: u32) -> Word {
        self.interface_variable(name, location, width, spirv::StorageClass::Input)
    }

    fn output(&mut self, name: &str, location: u32, width: u32) -> Word {
        self.interface_variable(name, location, width, spirv::StorageClass::Output)
    }

    fn finish(mut self, model: spirv::ExecutionModel) -> Vec<u32> {
        let void = self.b.type_void();
        let function_ty = self.b.type_function(void, vec![]);
        let main = self
            .b
            .begin_function(void, None, spirv::FunctionControl::NONE, function_ty)
            .unwrap();
        self.b.begin_block(None).unwrap();
        self.b.ret().unwrap();
        self.b.end_function().unwrap();

        self.b.entry_point(model, main, "main", self.interface.clone());
        match model {
            spirv::ExecutionModel::Fragment => {
                self.b
                    .execution_mode(main, spirv::ExecutionMode::OriginUpperLeft, []);
            }
            spirv::ExecutionModel::GLCompute => {
                self.b
                    .execution_mode(main, spirv::ExecutionMode::LocalSize, [1, 1, 1]);
            }
            _ => {}
        }
        self.b.module().assemble()
    }
}

fn planet_vertex() -> Vec<u32> {
    let mut module = ModuleBuilder::new();
    module.uniform_buffer("Matrices", 0, 0);
    module.input("Position", 0, 3);
    module.input("TexCoords", 2, 2);
    module.output("fsin_0", 0, 2);
    module.finish(spirv::ExecutionModel::Vertex)
}

fn planet_fragment() -> Vec<u32> {
    let mut module = ModuleBuilder::new();
    module.image("SurfaceTexture", 0, 1, false);
    module.sampler("SurfaceSampler", 0, 2);
    module.input("fsin_0", 0, 2);
    module.output("OutputColor", 0, 4);
    module.finish(spirv::ExecutionModel::Fragment)
}

#[test]
pub fn reflect_vertex_fragment() {
    let vertex = planet_vertex();
    let fragment = planet_fragment();

    for target in [
        CompileTarget::HLSL,
        CompileTarget::GLSL,
        CompileTarget::ESSL,
        CompileTarget::MSL,
    ] {
        let options = CrossCompileOptions::default();
        let output = compile_vertex_fragment(&vertex, &fragment, target, &options)
            .unwrap_or_else(|e| panic!("failed to compile for {target}: {e}"));
        println!("[INFO] compiled planet shaders for {target}");

        let ShaderSet::VertexFragment { vertex, fragment } = &output.shaders else {
            panic!("expected a vertex and fragment pair");
        };
        assert!(!vertex.is_empty());
        assert!(!fragment.is_empty());

        let elements = &output.reflection.vertex_elements;
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0].name, "Position");
        assert_eq!(elements[0].format, VertexElementFormat::Float3);
        assert_eq!(elements[1].name, "");
        assert_eq!(elements[2].name, "TexCoords");
        assert_eq!(elements[2].format, VertexElementFormat::Float2);

        let layouts = &output.reflection.resource_layouts;
        assert_eq!(layouts.len(), 1);
        let set0 = &layouts[0].elements;
        assert_eq!(set0.len(), 3);
        assert_eq!(set0[0].name, "Matrices");
        assert_eq!(set0[0].kind, ResourceKind::UniformBuffer);
        assert_eq!(set0[0].stages, ShaderStages::VERTEX);
        assert_eq!(set0[1].name, "SurfaceTexture");
        assert_eq!(set0[1].kind, ResourceKind::SampledImage);
        assert_eq!(set0[1].stages, ShaderStages::FRAGMENT);
        assert_eq!(set0[2].kind, ResourceKind::Sampler);
    }
}

#[test]
pub fn glsl_versions() {
    let vertex = planet_vertex();
    let fragment = planet_fragment();

    let glsl = compile_vertex_fragment(&vertex, &fragment, CompileTarget::GLSL, &Default::default())
        .unwrap();
    let ShaderSet::VertexFragment { vertex: vs, .. } = &glsl.shaders else {
        panic!("expected a vertex and fragment pair");
    };
    assert!(vs.starts_with("#version 330"));

    let essl = compile_vertex_fragment(&vertex, &fragment, CompileTarget::ESSL, &Default::default())
        .unwrap();
    let ShaderSet::VertexFragment { vertex: vs, .. } = &essl.shaders else {
        panic!("expected a vertex and fragment pair");
    };
    assert!(vs.starts_with("#version 300 es"));
}

#[test]
pub fn normalized_names() {
    let options = CrossCompileOptions {
        normalize_resource_names: true,
        ..Default::default()
    };
    let output = compile_vertex_fragment(
        &planet_vertex(),
        &planet_fragment(),
        CompileTarget::HLSL,
        &options,
    )
    .unwrap();

    let names: Vec<_> = output.reflection.resource_layouts[0]
        .elements
        .iter()
        .map(|element| element.name.clone())
        .collect();
    assert_eq!(names, ["spvx_0_0", "spvx_0_1", "spvx_0_2"]);
}

#[test]
pub fn overlapping_resources_fail() {
    let mut vertex = ModuleBuilder::new();
    vertex.uniform_buffer("Matrices", 0, 0);
    let vertex = vertex.finish(spirv::ExecutionModel::Vertex);

    let mut fragment = ModuleBuilder::new();
    fragment.image("Overlap", 0, 0, false);
    fragment.output("OutputColor", 0, 4);
    let fragment = fragment.finish(spirv::ExecutionModel::Fragment);

    let err = compile_vertex_fragment(&vertex, &fragment, CompileTarget::HLSL, &Default::default())
        .unwrap_err();
    assert!(matches!(
        err,
        ShaderCompileError::ReflectError(ShaderReflectError::BindingConflict {
            set: 0,
            binding: 0,
            ..
        })
    ));
}

#[test]
pub fn compute_storage() {
    let mut compute = ModuleBuilder::new();
    compute.uniform_buffer("Params", 0, 0);
    compute.storage_buffer("Input", 0, 1, true);
    compute.storage_buffer("Output", 0, 2, false);
    compute.image("Target", 1, 0, true);
    let compute = compute.finish(spirv::ExecutionModel::GLCompute);

    let outputs: Vec<_> = [CompileTarget::HLSL, CompileTarget::GLSL, CompileTarget::MSL]
        .to_vec()
        .into_par_iter()
        .map(|target| (target, compile_compute(&compute, target, &Default::default())))
        .collect();

    for (target, output) in outputs {
        let output = output.unwrap_or_else(|e| panic!("failed to compile for {target}: {e}"));
        assert!(output.reflection.vertex_elements.is_empty());

        let layouts = &output.reflection.resource_layouts;
        assert_eq!(layouts.len(), 2);
        assert_eq!(layouts[0].elements[1].kind, ResourceKind::StorageBufferReadOnly);
        assert_eq!(layouts[0].elements[2].kind, ResourceKind::StorageBufferReadWrite);
        assert_eq!(layouts[1].elements[0].kind, ResourceKind::StorageImage);
        assert_eq!(layouts[1].elements[0].stages, ShaderStages::COMPUTE);

        if target == CompileTarget::GLSL {
            let ShaderSet::Compute { compute } = &output.shaders else {
                panic!("expected a compute shader");
            };
            assert!(compute.starts_with("#version 430"));
        }
    }
}

#[test]
pub fn invalid_stage_combination() {
    let options = CrossCompileOptions::default();
    let err = compile_vertex_fragment(&planet_vertex(), &[], CompileTarget::GLSL, &options)
        .unwrap_err();
    assert!(matches!(err, ShaderCompileError::InvalidStageCombination));
}
