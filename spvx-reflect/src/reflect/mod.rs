use crate::error::ShaderReflectError;
use crate::front::ShaderSet;
use spvx_common::{CompileTarget, ShaderStage};

/// Binding space allocation for target dialects.
pub mod allocate;
/// Resource kind classification.
pub mod classify;
/// Canonical resource and varying names.
pub mod names;
/// Reflection output.
pub mod reflection;
/// The merged cross-stage resource table.
pub mod table;

#[cfg(test)]
pub(crate) mod mock;

pub use reflection::ShaderReflection;
pub use table::{BindingKey, ResourceEntry, ResourceTable};

/// The base type of a shader object, as far as binding and vertex layout are concerned.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BaseType {
    Struct,
    Image,
    Sampler,
    Float,
    Int,
    UInt,
    Other,
}

/// The shape of a resource or stage input type.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TypeInfo {
    pub base: BaseType,
    /// The vector width for scalar types. Scalars have a width of 1.
    pub vecsize: u32,
}

impl TypeInfo {
    pub const fn new(base: BaseType, vecsize: u32) -> Self {
        TypeInfo { base, vecsize }
    }

    pub const fn opaque(base: BaseType) -> Self {
        TypeInfo { base, vecsize: 0 }
    }
}

/// The decorations the binding pipeline reads and writes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Decoration {
    DescriptorSet,
    Binding,
    Location,
}

/// A resource declared by a single shader stage.
///
/// `id` and `base_type_id` are handles local to the [`ShaderIr`] that produced the resource.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ShaderResource {
    pub id: u32,
    /// The block or element type with pointers and arrays stripped.
    pub base_type_id: u32,
    pub name: String,
    pub ty: TypeInfo,
    /// Whether the block is decorated `NonWritable`. Only meaningful for storage buffers.
    pub non_writable: bool,
}

/// The categories resources are enumerated in.
///
/// Storage categories distinguish storage buffers and images from their uniform
/// and sampled counterparts, which share the same underlying types.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResourceCategory {
    UniformBuffer,
    StorageBuffer,
    SeparateImage,
    StorageImage,
    SeparateSampler,
}

impl ResourceCategory {
    /// The categories in merge order.
    pub const ALL: [ResourceCategory; 5] = [
        ResourceCategory::UniformBuffer,
        ResourceCategory::StorageBuffer,
        ResourceCategory::SeparateImage,
        ResourceCategory::StorageImage,
        ResourceCategory::SeparateSampler,
    ];

    pub const fn is_storage(self) -> bool {
        matches!(
            self,
            ResourceCategory::StorageBuffer | ResourceCategory::StorageImage
        )
    }
}

/// All resources and interface variables of a single stage.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct StageResources {
    pub uniform_buffers: Vec<ShaderResource>,
    pub storage_buffers: Vec<ShaderResource>,
    pub separate_images: Vec<ShaderResource>,
    pub storage_images: Vec<ShaderResource>,
    pub separate_samplers: Vec<ShaderResource>,
    pub stage_inputs: Vec<ShaderResource>,
    pub stage_outputs: Vec<ShaderResource>,
}

impl StageResources {
    pub fn category(&self, category: ResourceCategory) -> &[ShaderResource] {
        match category {
            ResourceCategory::UniformBuffer => &self.uniform_buffers,
            ResourceCategory::StorageBuffer => &self.storage_buffers,
            ResourceCategory::SeparateImage => &self.separate_images,
            ResourceCategory::StorageImage => &self.storage_images,
            ResourceCategory::SeparateSampler => &self.separate_samplers,
        }
    }

    /// Whether the stage declares any storage buffer or storage image.
    pub fn uses_storage(&self) -> bool {
        !self.storage_buffers.is_empty() || !self.storage_images.is_empty()
    }
}

/// The operations the binding pipeline needs from a shader IR compiler.
///
/// Implementations own a single parsed stage. Handles passed back into the IR are the
/// `id` and `base_type_id` values handed out by [`ShaderIr::resources`].
pub trait ShaderIr {
    /// Enumerate the resources and interface variables of the stage.
    fn resources(&mut self) -> Result<StageResources, ShaderReflectError>;

    /// Get the literal value of a decoration, if present.
    fn decoration(
        &self,
        id: u32,
        decoration: Decoration,
    ) -> Result<Option<u32>, ShaderReflectError>;

    fn set_decoration(
        &mut self,
        id: u32,
        decoration: Decoration,
        value: u32,
    ) -> Result<(), ShaderReflectError>;

    fn unset_decoration(
        &mut self,
        id: u32,
        decoration: Decoration,
    ) -> Result<(), ShaderReflectError>;

    /// Set the name of a variable or type.
    fn set_name(&mut self, id: u32, name: &str) -> Result<(), ShaderReflectError>;

    /// Override the default value of the specialization constant with the given `constant_id`.
    ///
    /// Returns `false` if the stage declares no such constant.
    fn set_specialization(
        &mut self,
        constant_id: u32,
        value: u64,
    ) -> Result<bool, ShaderReflectError>;

    /// Combine separate images and samplers, naming each combined sampler after its image.
    fn combine_image_samplers(&mut self) -> Result<(), ShaderReflectError>;
}

/// A single stage of a request with its enumerated resources.
#[derive(Debug)]
pub struct StageInterface<T> {
    pub ir: T,
    pub resources: StageResources,
}

/// A stage input of the primary stage, resolved for vertex layout reflection.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VertexInput {
    pub name: String,
    pub location: u32,
    pub ty: TypeInfo,
}

/// The shader interface of a request: every stage, ready to be merged, rebound and reflected.
pub struct ShaderInterface<T> {
    stages: ShaderSet<StageInterface<T>>,
}

impl<T: ShaderIr> ShaderInterface<T> {
    /// Apply specialization overrides to every stage and enumerate its resources.
    pub fn new(
        stages: ShaderSet<T>,
        specializations: &[crate::back::SpecializationConstant],
    ) -> Result<Self, ShaderReflectError> {
        let stages = stages.try_map(|stage, mut ir| {
            for constant in specializations {
                if !ir.set_specialization(constant.id, constant.constant)? {
                    log::warn!(
                        "specialization constant {} is not declared in the {stage:?} stage",
                        constant.id
                    );
                }
            }
            let resources = ir.resources()?;
            Ok::<_, ShaderReflectError>(StageInterface { ir, resources })
        })?;

        Ok(ShaderInterface { stages })
    }

    pub fn stages(&self) -> &ShaderSet<StageInterface<T>> {
        &self.stages
    }

    /// Merge the resources of every stage into a single table.
    ///
    /// If `normalize_names` is set, every resource is renamed to its canonical name in the IR.
    pub fn merge(&mut self, normalize_names: bool) -> Result<ResourceTable, ShaderReflectError> {
        let mut table = ResourceTable::default();
        for (stage, iface) in self.stages.iter() {
            for category in ResourceCategory::ALL {
                table.merge(
                    stage,
                    &iface.ir,
                    iface.resources.category(category),
                    category,
                    normalize_names,
                )?;
            }
        }

        if normalize_names {
            names::write_resource_names(&table, &mut self.stages)?;
        }

        Ok(table)
    }

    /// Rebind the merged resources into the binding spaces of the target dialect.
    pub fn remap(
        &mut self,
        table: &ResourceTable,
        target: CompileTarget,
    ) -> Result<(), ShaderReflectError> {
        log::debug!("rebinding {} resources for {target}", table.len());
        let assignments = allocate::BindingAllocator::allocate(table, target);
        assignments.apply(table, &mut self.stages)?;

        if target == CompileTarget::ESSL {
            for (_, iface) in self.stages.iter_mut() {
                for buffer in &iface.resources.uniform_buffers {
                    iface.ir.unset_decoration(buffer.id, Decoration::DescriptorSet)?;
                }
            }
        }

        if target.is_glsl() {
            for (_, iface) in self.stages.iter_mut() {
                iface.ir.combine_image_samplers()?;
            }
            names::link_varyings(&mut self.stages)?;
        }

        Ok(())
    }

    /// Resolve the stage inputs of the vertex stage.
    pub fn vertex_inputs(&self) -> Result<Vec<VertexInput>, ShaderReflectError> {
        let Some(vertex) = self.stages.get(ShaderStage::Vertex) else {
            return Ok(Vec::new());
        };

        vertex
            .resources
            .stage_inputs
            .iter()
            .map(|input| {
                let location = vertex.ir.decoration(input.id, Decoration::Location)?.unwrap_or(0);
                let name = if input.name.is_empty() {
                    format!("_{}", input.id)
                } else {
                    input.name.clone()
                };
                Ok(VertexInput {
                    name,
                    location,
                    ty: input.ty,
                })
            })
            .collect()
    }

    /// Build the reflection for the merged table and the vertex stage inputs.
    pub fn reflect(&self, table: &ResourceTable) -> Result<ShaderReflection, ShaderReflectError> {
        let vertex_inputs = self.vertex_inputs()?;
        Ok(ShaderReflection {
            vertex_elements: reflection::reflect_vertex_elements(&vertex_inputs)?,
            resource_layouts: reflection::reflect_resource_layouts(table),
        })
    }

    pub fn into_stages(self) -> ShaderSet<StageInterface<T>> {
        self.stages
    }
}
