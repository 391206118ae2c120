use crate::error::ShaderReflectError;
use crate::reflect::{BaseType, ResourceCategory, ShaderResource};
use spvx_common::ResourceKind;

/// Classify a resource by its underlying type and the category it was enumerated in.
pub fn classify(
    resource: &ShaderResource,
    category: ResourceCategory,
) -> Result<ResourceKind, ShaderReflectError> {
    let storage = category.is_storage();
    Ok(match resource.ty.base {
        BaseType::Struct if storage && resource.non_writable => ResourceKind::StorageBufferReadOnly,
        BaseType::Struct if storage => ResourceKind::StorageBufferReadWrite,
        BaseType::Struct => ResourceKind::UniformBuffer,
        BaseType::Image if storage => ResourceKind::StorageImage,
        BaseType::Image => ResourceKind::SampledImage,
        BaseType::Sampler => ResourceKind::Sampler,
        ty => {
            return Err(ShaderReflectError::UnclassifiableType {
                name: resource.name.clone(),
                ty,
            })
        }
    })
}
