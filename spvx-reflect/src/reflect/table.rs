use crate::error::ShaderReflectError;
use crate::reflect::classify::classify;
use crate::reflect::names::canonical_name;
use crate::reflect::{Decoration, ResourceCategory, ShaderIr, ShaderResource};
use spvx_common::{ResourceKind, ShaderStage, ShaderStages};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Descriptor sets at or above this index are rejected.
pub const MAX_DESCRIPTOR_SETS: u32 = 64;

/// Binding slots at or above this index are rejected.
pub const MAX_BINDINGS: u32 = 1 << 16;

/// A descriptor set and binding slot pair.
///
/// Keys order by set, then by binding.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct BindingKey {
    pub set: u32,
    pub binding: u32,
}

impl BindingKey {
    pub const fn new(set: u32, binding: u32) -> Self {
        BindingKey { set, binding }
    }
}

impl Display for BindingKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(set {}, binding {})", self.set, self.binding)
    }
}

/// The handles of a resource within a single stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct StageBinding {
    pub id: u32,
    pub base_type_id: u32,
}

/// A resource shared by one or more stages at the same binding slot.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ResourceEntry {
    pub name: String,
    pub kind: ResourceKind,
    declared_name: String,
    stages: BTreeMap<ShaderStage, StageBinding>,
}

impl ResourceEntry {
    /// The name the first declaring stage gave the resource, before normalization.
    pub fn declared_name(&self) -> &str {
        &self.declared_name
    }

    /// The stages that declare this resource, with their local handles.
    pub fn stages(&self) -> impl Iterator<Item = (ShaderStage, &StageBinding)> {
        self.stages.iter().map(|(stage, binding)| (*stage, binding))
    }

    pub fn stage(&self, stage: ShaderStage) -> Option<&StageBinding> {
        self.stages.get(&stage)
    }

    /// The union of the stages that declare this resource.
    pub fn stage_mask(&self) -> ShaderStages {
        self.stages
            .keys()
            .fold(ShaderStages::empty(), |mask, stage| mask | ShaderStages::from(*stage))
    }
}

/// The resources of every stage of a request, keyed by binding slot.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ResourceTable {
    entries: BTreeMap<BindingKey, ResourceEntry>,
}

impl ResourceTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: BindingKey) -> Option<&ResourceEntry> {
        self.entries.get(&key)
    }

    /// Iterate entries in binding key order.
    pub fn iter(&self) -> impl Iterator<Item = (BindingKey, &ResourceEntry)> {
        self.entries.iter().map(|(key, entry)| (*key, entry))
    }

    /// Merge the resources of one category declared by `stage` into the table.
    ///
    /// If any resource conflicts with an existing entry, the table is left unchanged.
    pub fn merge(
        &mut self,
        stage: ShaderStage,
        ir: &impl ShaderIr,
        resources: &[ShaderResource],
        category: ResourceCategory,
        normalize_names: bool,
    ) -> Result<(), ShaderReflectError> {
        if resources.is_empty() {
            return Ok(());
        }

        let mut staged = self.entries.clone();
        for resource in resources {
            let kind = classify(resource, category)?;
            let key = BindingKey {
                set: ir
                    .decoration(resource.id, Decoration::DescriptorSet)?
                    .unwrap_or(0),
                binding: ir.decoration(resource.id, Decoration::Binding)?.unwrap_or(0),
            };
            if key.set >= MAX_DESCRIPTOR_SETS || key.binding >= MAX_BINDINGS {
                return Err(ShaderReflectError::InvalidBindingIndex {
                    name: resource.name.clone(),
                    set: key.set,
                    binding: key.binding,
                });
            }
            let name = if normalize_names {
                canonical_name(key)
            } else {
                resource.name.clone()
            };
            let binding = StageBinding {
                id: resource.id,
                base_type_id: resource.base_type_id,
            };

            match staged.entry(key) {
                Entry::Vacant(vacant) => {
                    log::debug!("{stage:?} declares {kind:?} \"{name}\" at {key}");
                    vacant.insert(ResourceEntry {
                        name,
                        kind,
                        declared_name: resource.name.clone(),
                        stages: BTreeMap::from([(stage, binding)]),
                    });
                }
                Entry::Occupied(mut occupied) => {
                    let existing = occupied.get_mut();
                    let redeclared = existing
                        .stages
                        .get(&stage)
                        .is_some_and(|declared| declared.id != binding.id);
                    if redeclared || existing.kind != kind || existing.name != name {
                        return Err(ShaderReflectError::BindingConflict {
                            set: key.set,
                            binding: key.binding,
                            existing: existing.declared_name.clone(),
                            incoming: resource.name.clone(),
                        });
                    }
                    log::debug!("{stage:?} shares {kind:?} \"{name}\" at {key}");
                    existing.stages.insert(stage, binding);
                }
            }
        }

        self.entries = staged;
        Ok(())
    }
}
