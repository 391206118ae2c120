use crate::error::ShaderCompileError;
use crate::front::{GlslCompileOptions, SourceLanguage};
use shaderc::{CompileOptions, OptimizationLevel, ShaderKind};
use spvx_common::ShaderStage;

fn get_shaderc_options(
    options: &GlslCompileOptions,
) -> Result<CompileOptions<'static>, ShaderCompileError> {
    let mut compile_options = CompileOptions::new().ok_or(ShaderCompileError::ShaderCInitError)?;
    compile_options.set_source_language(match options.language {
        SourceLanguage::GLSL => shaderc::SourceLanguage::GLSL,
        SourceLanguage::HLSL => shaderc::SourceLanguage::HLSL,
    });

    for definition in &options.macros {
        compile_options.add_macro_definition(&definition.name, definition.value.as_deref());
    }

    if options.debug {
        compile_options.set_generate_debug_info();
    } else {
        compile_options.set_optimization_level(OptimizationLevel::Performance);
    }

    Ok(compile_options)
}

const fn shader_kind(stage: ShaderStage) -> ShaderKind {
    match stage {
        ShaderStage::Vertex => ShaderKind::Vertex,
        ShaderStage::Fragment => ShaderKind::Fragment,
        ShaderStage::Compute => ShaderKind::Compute,
    }
}

/// Compile GLSL or HLSL source for a single stage into SPIR-V.
///
/// `file_name` is only used in diagnostics.
pub fn compile_glsl_to_spirv(
    source: &str,
    file_name: &str,
    stage: ShaderStage,
    options: &GlslCompileOptions,
) -> Result<Vec<u32>, ShaderCompileError> {
    let compiler = shaderc::Compiler::new().ok_or(ShaderCompileError::ShaderCInitError)?;
    let compile_options = get_shaderc_options(options)?;

    let artifact = compiler.compile_into_spirv(
        source,
        shader_kind(stage),
        file_name,
        "main",
        Some(&compile_options),
    )?;

    if artifact.get_num_warnings() > 0 {
        log::warn!("{file_name}: {}", artifact.get_warning_messages());
    }

    Ok(artifact.as_binary().to_vec())
}
