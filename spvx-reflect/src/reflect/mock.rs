//! An in-memory shader IR for exercising the binding pipeline without spirv-cross.

use crate::back::{DialectOptions, EmitShader};
use crate::error::{ShaderCompileError, ShaderReflectError};
use crate::reflect::{
    BaseType, Decoration, ResourceCategory, ShaderIr, ShaderResource, StageResources, TypeInfo,
};
use rustc_hash::FxHashMap;
use std::fmt::Write;

#[derive(Debug, Clone, Default)]
pub(crate) struct MockIr {
    resources: StageResources,
    decorations: FxHashMap<(u32, Decoration), u32>,
    names: FxHashMap<u32, String>,
    specialization_ids: Vec<u32>,
    specializations: FxHashMap<u32, u64>,
    pub combined: bool,
    next_id: u32,
}

impl MockIr {
    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn declare(&mut self, name: &str, ty: TypeInfo, non_writable: bool) -> ShaderResource {
        let id = self.next_id();
        let base_type_id = self.next_id();
        if !name.is_empty() {
            self.names.insert(id, name.to_string());
        }
        ShaderResource {
            id,
            base_type_id,
            name: name.to_string(),
            ty,
            non_writable,
        }
    }

    pub fn resource_with_type(
        &mut self,
        category: ResourceCategory,
        name: &str,
        set: u32,
        binding: u32,
        ty: TypeInfo,
    ) -> u32 {
        self.bound_resource(category, name, set, binding, ty, false)
    }

    fn bound_resource(
        &mut self,
        category: ResourceCategory,
        name: &str,
        set: u32,
        binding: u32,
        ty: TypeInfo,
        non_writable: bool,
    ) -> u32 {
        let resource = self.declare(name, ty, non_writable);
        let id = resource.id;
        self.decorations.insert((id, Decoration::DescriptorSet), set);
        self.decorations.insert((id, Decoration::Binding), binding);
        match category {
            ResourceCategory::UniformBuffer => self.resources.uniform_buffers.push(resource),
            ResourceCategory::StorageBuffer => self.resources.storage_buffers.push(resource),
            ResourceCategory::SeparateImage => self.resources.separate_images.push(resource),
            ResourceCategory::StorageImage => self.resources.storage_images.push(resource),
            ResourceCategory::SeparateSampler => self.resources.separate_samplers.push(resource),
        }
        id
    }

    pub fn uniform_buffer(&mut self, name: &str, set: u32, binding: u32) -> u32 {
        let ty = TypeInfo::opaque(BaseType::Struct);
        self.bound_resource(ResourceCategory::UniformBuffer, name, set, binding, ty, false)
    }

    pub fn storage_buffer(
        &mut self,
        name: &str,
        set: u32,
        binding: u32,
        non_writable: bool,
    ) -> u32 {
        let ty = TypeInfo::opaque(BaseType::Struct);
        let category = ResourceCategory::StorageBuffer;
        self.bound_resource(category, name, set, binding, ty, non_writable)
    }

    pub fn separate_image(&mut self, name: &str, set: u32, binding: u32) -> u32 {
        let ty = TypeInfo::opaque(BaseType::Image);
        self.bound_resource(ResourceCategory::SeparateImage, name, set, binding, ty, false)
    }

    pub fn storage_image(&mut self, name: &str, set: u32, binding: u32) -> u32 {
        let ty = TypeInfo::opaque(BaseType::Image);
        self.bound_resource(ResourceCategory::StorageImage, name, set, binding, ty, false)
    }

    pub fn separate_sampler(&mut self, name: &str, set: u32, binding: u32) -> u32 {
        let ty = TypeInfo::opaque(BaseType::Sampler);
        self.bound_resource(ResourceCategory::SeparateSampler, name, set, binding, ty, false)
    }

    pub fn input(&mut self, name: &str, location: u32, ty: TypeInfo) -> u32 {
        let resource = self.declare(name, ty, false);
        let id = resource.id;
        self.decorations.insert((id, Decoration::Location), location);
        self.resources.stage_inputs.push(resource);
        id
    }

    pub fn output(&mut self, location: u32) -> u32 {
        let resource = self.declare("", TypeInfo::new(BaseType::Float, 4), false);
        let id = resource.id;
        self.decorations.insert((id, Decoration::Location), location);
        self.resources.stage_outputs.push(resource);
        id
    }

    pub fn declare_specialization(&mut self, constant_id: u32) {
        self.specialization_ids.push(constant_id);
    }

    pub fn specialization(&self, constant_id: u32) -> Option<u64> {
        self.specializations.get(&constant_id).copied()
    }

    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// The id of the first bound resource with the given declared name.
    pub fn id_of(&self, name: &str) -> Option<u32> {
        let resources = &self.resources;
        ResourceCategory::ALL
            .iter()
            .flat_map(|category| resources.category(*category))
            .find(|resource| resource.name == name)
            .map(|resource| resource.id)
    }

    pub fn binding_of(&self, name: &str) -> Option<u32> {
        let id = self.id_of(name)?;
        self.decorations.get(&(id, Decoration::Binding)).copied()
    }

    fn check(&self, id: u32) -> Result<(), ShaderReflectError> {
        if id == 0 || id > self.next_id {
            return Err(ShaderReflectError::InvalidHandle(id));
        }
        Ok(())
    }
}

impl ShaderIr for MockIr {
    fn resources(&mut self) -> Result<StageResources, ShaderReflectError> {
        Ok(self.resources.clone())
    }

    fn decoration(
        &self,
        id: u32,
        decoration: Decoration,
    ) -> Result<Option<u32>, ShaderReflectError> {
        self.check(id)?;
        Ok(self.decorations.get(&(id, decoration)).copied())
    }

    fn set_decoration(
        &mut self,
        id: u32,
        decoration: Decoration,
        value: u32,
    ) -> Result<(), ShaderReflectError> {
        self.check(id)?;
        self.decorations.insert((id, decoration), value);
        Ok(())
    }

    fn unset_decoration(
        &mut self,
        id: u32,
        decoration: Decoration,
    ) -> Result<(), ShaderReflectError> {
        self.check(id)?;
        self.decorations.remove(&(id, decoration));
        Ok(())
    }

    fn set_name(&mut self, id: u32, name: &str) -> Result<(), ShaderReflectError> {
        self.check(id)?;
        self.names.insert(id, name.to_string());
        Ok(())
    }

    fn set_specialization(
        &mut self,
        constant_id: u32,
        value: u64,
    ) -> Result<bool, ShaderReflectError> {
        if !self.specialization_ids.contains(&constant_id) {
            return Ok(false);
        }
        self.specializations.insert(constant_id, value);
        Ok(true)
    }

    fn combine_image_samplers(&mut self) -> Result<(), ShaderReflectError> {
        self.combined = true;
        Ok(())
    }
}

impl EmitShader for MockIr {
    /// Emits a pseudo-source listing of the version directive and every binding.
    fn emit(self, options: &DialectOptions) -> Result<String, ShaderCompileError> {
        let mut source = String::new();
        if let Some(version) = options.glsl_version {
            let _ = writeln!(source, "{}", version.directive());
        }
        let resources = &self.resources;
        for resource in ResourceCategory::ALL
            .iter()
            .flat_map(|category| resources.category(*category))
        {
            let name = self.name(resource.id).unwrap_or_default();
            let set = self.decorations.get(&(resource.id, Decoration::DescriptorSet));
            let binding = self.decorations.get(&(resource.id, Decoration::Binding));
            let _ = writeln!(source, "{name} set={set:?} binding={binding:?}");
        }
        Ok(source)
    }
}
