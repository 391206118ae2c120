use bitflags::bitflags;

/// The kind of a shader resource, as seen by a resource layout.
#[repr(u8)]
#[derive(Default, Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceKind {
    #[default]
    UniformBuffer = 0,
    StorageBufferReadOnly,
    StorageBufferReadWrite,
    SampledImage,
    StorageImage,
    Sampler,
}

impl ResourceKind {
    /// Whether the resource is bound as a storage buffer.
    pub const fn is_storage_buffer(self) -> bool {
        matches!(
            self,
            ResourceKind::StorageBufferReadOnly | ResourceKind::StorageBufferReadWrite
        )
    }
}

bitflags! {
    /// The set of pipeline stages a resource is visible to.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct ShaderStages: u8 {
        const VERTEX = 1;
        const FRAGMENT = 1 << 4;
        const COMPUTE = 1 << 5;
    }
}

impl Default for ShaderStages {
    fn default() -> Self {
        ShaderStages::empty()
    }
}

bitflags! {
    /// Extra information attached to a resource layout element.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct ResourceLayoutElementOptions: u8 {
        /// The binding slot is not used by any stage.
        const UNUSED = 1 << 1;
    }
}

impl Default for ResourceLayoutElementOptions {
    fn default() -> Self {
        ResourceLayoutElementOptions::empty()
    }
}
