use crate::error::ShaderReflectError;
use crate::front::ShaderSet;
use crate::reflect::{BindingKey, Decoration, ResourceTable, ShaderIr, StageInterface};
use spvx_common::{CompileTarget, ResourceKind};
use std::collections::BTreeMap;

/// A binding space of a target dialect.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BindingSpace {
    /// `b` registers in HLSL, `[[buffer]]` in MSL.
    Buffer,
    /// `t` registers in HLSL, `[[texture]]` in MSL.
    Texture,
    /// `u` registers in HLSL.
    UnorderedAccess,
    /// `s` registers in HLSL, `[[sampler]]` in MSL.
    Sampler,
}

impl BindingSpace {
    /// The binding space a resource of `kind` occupies in `target`.
    ///
    /// Only HLSL and MSL partition bindings into spaces.
    pub const fn of(kind: ResourceKind, target: CompileTarget) -> Option<BindingSpace> {
        use CompileTarget::{ESSL, GLSL, HLSL, MSL};
        Some(match (target, kind) {
            (HLSL | MSL, ResourceKind::UniformBuffer) => BindingSpace::Buffer,
            (HLSL, ResourceKind::StorageBufferReadOnly) => BindingSpace::Texture,
            (HLSL, ResourceKind::StorageBufferReadWrite) => BindingSpace::UnorderedAccess,
            (MSL, ResourceKind::StorageBufferReadOnly | ResourceKind::StorageBufferReadWrite) => {
                BindingSpace::Buffer
            }
            (HLSL | MSL, ResourceKind::SampledImage) => BindingSpace::Texture,
            (HLSL, ResourceKind::StorageImage) => BindingSpace::UnorderedAccess,
            (MSL, ResourceKind::StorageImage) => BindingSpace::Texture,
            (HLSL | MSL, ResourceKind::Sampler) => BindingSpace::Sampler,
            (GLSL | ESSL, _) => return None,
        })
    }
}

/// Per-space binding counters.
#[derive(Debug, Default)]
pub struct BindingAllocator {
    buffer: u32,
    texture: u32,
    unordered_access: u32,
    sampler: u32,
}

impl BindingAllocator {
    pub fn next(&mut self, space: BindingSpace) -> u32 {
        let counter = match space {
            BindingSpace::Buffer => &mut self.buffer,
            BindingSpace::Texture => &mut self.texture,
            BindingSpace::UnorderedAccess => &mut self.unordered_access,
            BindingSpace::Sampler => &mut self.sampler,
        };
        let index = *counter;
        *counter += 1;
        index
    }

    /// Assign a binding index to every entry that needs rebinding for `target`, in key order.
    ///
    /// ESSL only rebinds storage buffers and storage images, each from their own counter.
    /// GLSL keeps its declared bindings.
    pub fn allocate(table: &ResourceTable, target: CompileTarget) -> BindingAssignments {
        let mut allocator = BindingAllocator::default();
        let mut indices = BTreeMap::new();

        for (key, entry) in table.iter() {
            let space = match target {
                CompileTarget::HLSL | CompileTarget::MSL => BindingSpace::of(entry.kind, target),
                CompileTarget::ESSL if entry.kind.is_storage_buffer() => Some(BindingSpace::Buffer),
                CompileTarget::ESSL if entry.kind == ResourceKind::StorageImage => {
                    Some(BindingSpace::Texture)
                }
                CompileTarget::ESSL | CompileTarget::GLSL => None,
            };

            if let Some(space) = space {
                let index = allocator.next(space);
                log::trace!(
                    "{:?} \"{}\" at {key} bound to {space:?} {index}",
                    entry.kind,
                    entry.name
                );
                indices.insert(key, index);
            }
        }

        BindingAssignments { indices }
    }
}

/// Binding indices assigned to the entries of a resource table.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct BindingAssignments {
    indices: BTreeMap<BindingKey, u32>,
}

impl BindingAssignments {
    pub fn get(&self, key: BindingKey) -> Option<u32> {
        self.indices.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BindingKey, u32)> + '_ {
        self.indices.iter().map(|(key, index)| (*key, *index))
    }

    /// Write every assigned index as the binding decoration of each stage declaring the entry.
    pub fn apply<T: ShaderIr>(
        &self,
        table: &ResourceTable,
        stages: &mut ShaderSet<StageInterface<T>>,
    ) -> Result<(), ShaderReflectError> {
        for (key, index) in self.iter() {
            let Some(entry) = table.get(key) else {
                continue;
            };
            for (stage, binding) in entry.stages() {
                if let Some(iface) = stages.get_mut(stage) {
                    iface.ir.set_decoration(binding.id, Decoration::Binding, index)?;
                }
            }
        }
        Ok(())
    }
}
