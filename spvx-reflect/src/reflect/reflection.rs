use crate::error::ShaderReflectError;
use crate::reflect::{BaseType, ResourceTable, TypeInfo, VertexInput};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use spvx_common::{
    ResourceKind, ResourceLayoutElementOptions, ShaderStages, VertexElementFormat,
    VertexElementSemantic,
};

/// Reflection information for a compiled set of shaders.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShaderReflection {
    /// The vertex inputs of the vertex stage, indexed by location.
    pub vertex_elements: Vec<VertexElementDescription>,
    /// The resource layout of each descriptor set, indexed by set.
    pub resource_layouts: Vec<ResourceLayoutDescription>,
}

/// A single vertex input.
///
/// Locations no input claims are filled with the default description.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexElementDescription {
    pub name: String,
    pub semantic: VertexElementSemantic,
    pub format: VertexElementFormat,
    pub offset: u32,
}

/// The resources bound in a single descriptor set, indexed by binding.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceLayoutDescription {
    pub elements: Vec<ResourceLayoutElementDescription>,
}

/// A resource bound at a single binding slot.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceLayoutElementDescription {
    pub name: String,
    pub kind: ResourceKind,
    pub stages: ShaderStages,
    pub options: ResourceLayoutElementOptions,
}

impl ResourceLayoutElementDescription {
    /// A placeholder for a binding slot no stage declares.
    pub fn unused() -> Self {
        ResourceLayoutElementDescription {
            name: String::new(),
            kind: ResourceKind::UniformBuffer,
            stages: ShaderStages::empty(),
            options: ResourceLayoutElementOptions::UNUSED,
        }
    }

    pub fn is_unused(&self) -> bool {
        self.options.contains(ResourceLayoutElementOptions::UNUSED)
    }
}

// indexed by vector width; scalars report a width of 0 or 1
const FLOAT_FORMATS: [VertexElementFormat; 5] = [
    VertexElementFormat::Float1,
    VertexElementFormat::Float1,
    VertexElementFormat::Float2,
    VertexElementFormat::Float3,
    VertexElementFormat::Float4,
];

const INT_FORMATS: [VertexElementFormat; 5] = [
    VertexElementFormat::Int1,
    VertexElementFormat::Int1,
    VertexElementFormat::Int2,
    VertexElementFormat::Int3,
    VertexElementFormat::Int4,
];

const UINT_FORMATS: [VertexElementFormat; 5] = [
    VertexElementFormat::UInt1,
    VertexElementFormat::UInt1,
    VertexElementFormat::UInt2,
    VertexElementFormat::UInt3,
    VertexElementFormat::UInt4,
];

/// The vertex element format of a stage input type.
pub fn vertex_format(ty: TypeInfo) -> Option<VertexElementFormat> {
    let table = match ty.base {
        BaseType::Float => &FLOAT_FORMATS,
        BaseType::Int => &INT_FORMATS,
        BaseType::UInt => &UINT_FORMATS,
        _ => return None,
    };
    table.get(ty.vecsize as usize).copied()
}

/// Vertex input locations at or above this index are rejected.
pub const MAX_VERTEX_LOCATIONS: u32 = 256;

/// Build the vertex layout, with one element per location up to the highest declared.
///
/// If several inputs share a location, the first one declared is kept.
pub fn reflect_vertex_elements(
    inputs: &[VertexInput],
) -> Result<Vec<VertexElementDescription>, ShaderReflectError> {
    let mut by_location: FxHashMap<u32, VertexElementDescription> = FxHashMap::default();
    for input in inputs {
        if input.location >= MAX_VERTEX_LOCATIONS {
            return Err(ShaderReflectError::InvalidVertexLocation {
                name: input.name.clone(),
                location: input.location,
            });
        }
        let format = vertex_format(input.ty).ok_or_else(|| {
            ShaderReflectError::UnsupportedVertexInputType {
                name: input.name.clone(),
                location: input.location,
                ty: input.ty,
            }
        })?;

        match by_location.entry(input.location) {
            Entry::Occupied(occupied) => {
                log::warn!(
                    "vertex input \"{}\" shares location {} with \"{}\" and was not reflected",
                    input.name,
                    input.location,
                    occupied.get().name
                );
            }
            Entry::Vacant(vacant) => {
                vacant.insert(VertexElementDescription {
                    name: input.name.clone(),
                    semantic: VertexElementSemantic::TextureCoordinate,
                    format,
                    offset: 0,
                });
            }
        }
    }

    let count = inputs
        .iter()
        .map(|input| input.location + 1)
        .max()
        .unwrap_or(0);
    Ok((0..count)
        .map(|location| by_location.remove(&location).unwrap_or_default())
        .collect())
}

/// Build the resource layout of every descriptor set up to the highest declared.
///
/// The table only holds keys below [`MAX_DESCRIPTOR_SETS`](super::table::MAX_DESCRIPTOR_SETS)
/// and [`MAX_BINDINGS`](super::table::MAX_BINDINGS).
pub fn reflect_resource_layouts(table: &ResourceTable) -> Vec<ResourceLayoutDescription> {
    let set_count = table.iter().map(|(key, _)| key.set + 1).max().unwrap_or(0);
    let mut layouts = vec![ResourceLayoutDescription::default(); set_count as usize];

    for (key, entry) in table.iter() {
        let elements = &mut layouts[key.set as usize].elements;
        let slot = key.binding as usize;
        if elements.len() <= slot {
            elements.resize_with(slot + 1, ResourceLayoutElementDescription::unused);
        }
        elements[slot] = ResourceLayoutElementDescription {
            name: entry.name.clone(),
            kind: entry.kind,
            stages: entry.stage_mask(),
            options: ResourceLayoutElementOptions::empty(),
        };
    }

    layouts
}
