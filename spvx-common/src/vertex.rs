/// The intended use of a vertex element.
#[repr(u8)]
#[derive(Default, Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VertexElementSemantic {
    #[default]
    Position = 0,
    Normal,
    TextureCoordinate,
    Color,
}

/// The data format of a vertex element.
#[repr(u8)]
#[derive(Default, Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VertexElementFormat {
    #[default]
    Float1 = 0,
    Float2,
    Float3,
    Float4,
    Int1,
    Int2,
    Int3,
    Int4,
    UInt1,
    UInt2,
    UInt3,
    UInt4,
}
