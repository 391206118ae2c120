use crate::error::ShaderReflectError;
use crate::front::ShaderSet;
use crate::reflect::{BindingKey, Decoration, ResourceTable, ShaderIr, StageInterface};
use spvx_common::ResourceKind;

/// The prefix of every name synthesized by the compiler.
pub const NAME_PREFIX: &str = "spvx";

/// The canonical name of the resource at `key`.
pub fn canonical_name(key: BindingKey) -> String {
    format!("{NAME_PREFIX}_{}_{}", key.set, key.binding)
}

/// The name shared by a vertex output and fragment input at `location`.
pub fn varying_name(location: u32) -> String {
    format!("{NAME_PREFIX}_fsin{location}")
}

/// Write the names of the table back into every stage that declares them.
///
/// Uniform buffers are renamed through their block type, everything else through the variable.
pub fn write_resource_names<T: ShaderIr>(
    table: &ResourceTable,
    stages: &mut ShaderSet<StageInterface<T>>,
) -> Result<(), ShaderReflectError> {
    for (key, entry) in table.iter() {
        for (stage, binding) in entry.stages() {
            let Some(iface) = stages.get_mut(stage) else {
                continue;
            };
            let target = if entry.kind == ResourceKind::UniformBuffer {
                binding.base_type_id
            } else {
                binding.id
            };
            log::trace!("renaming {key} in {stage:?} to \"{}\"", entry.name);
            iface.ir.set_name(target, &entry.name)?;
        }
    }
    Ok(())
}

/// Give vertex outputs and fragment inputs matching names, so GLSL links them by location.
pub fn link_varyings<T: ShaderIr>(
    stages: &mut ShaderSet<StageInterface<T>>,
) -> Result<(), ShaderReflectError> {
    let ShaderSet::VertexFragment { vertex, fragment } = stages else {
        return Ok(());
    };

    rename_by_location(vertex, |iface| &iface.resources.stage_outputs)?;
    rename_by_location(fragment, |iface| &iface.resources.stage_inputs)
}

fn rename_by_location<T: ShaderIr>(
    iface: &mut StageInterface<T>,
    variables: impl Fn(&StageInterface<T>) -> &Vec<crate::reflect::ShaderResource>,
) -> Result<(), ShaderReflectError> {
    let mut renames = Vec::new();
    for variable in variables(iface) {
        if let Some(location) = iface.ir.decoration(variable.id, Decoration::Location)? {
            renames.push((variable.id, varying_name(location)));
        }
    }

    for (id, name) in renames {
        iface.ir.set_name(id, &name)?;
    }
    Ok(())
}
