use spvx_common::CompileTarget;

/// GLSL language versions the compiler emits.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GlslVersion {
    Glsl330,
    Glsl430,
    Essl300,
    Essl310,
}

impl GlslVersion {
    /// The baseline version for `target`, or the compute-capable version if `compute` is set.
    pub const fn for_target(target: CompileTarget, compute: bool) -> Option<GlslVersion> {
        Some(match (target, compute) {
            (CompileTarget::GLSL, false) => GlslVersion::Glsl330,
            (CompileTarget::GLSL, true) => GlslVersion::Glsl430,
            (CompileTarget::ESSL, false) => GlslVersion::Essl300,
            (CompileTarget::ESSL, true) => GlslVersion::Essl310,
            (CompileTarget::HLSL | CompileTarget::MSL, _) => return None,
        })
    }

    pub const fn number(self) -> u32 {
        match self {
            GlslVersion::Glsl330 => 330,
            GlslVersion::Glsl430 => 430,
            GlslVersion::Essl300 => 300,
            GlslVersion::Essl310 => 310,
        }
    }

    pub const fn is_es(self) -> bool {
        matches!(self, GlslVersion::Essl300 | GlslVersion::Essl310)
    }

    /// The version supporting storage buffers and images.
    pub const fn with_storage(self) -> GlslVersion {
        match self {
            GlslVersion::Glsl330 | GlslVersion::Glsl430 => GlslVersion::Glsl430,
            GlslVersion::Essl300 | GlslVersion::Essl310 => GlslVersion::Essl310,
        }
    }

    /// The `#version` directive, as emitted at the top of a shader.
    pub fn directive(self) -> String {
        if self.is_es() {
            format!("#version {} es", self.number())
        } else {
            format!("#version {}", self.number())
        }
    }
}

/// Emission options for a target dialect.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DialectOptions {
    pub target: CompileTarget,
    /// The language version for GLSL and ESSL targets.
    pub glsl_version: Option<GlslVersion>,
    pub invert_y: bool,
    pub fix_clip_space_z: bool,
}

impl DialectOptions {
    pub fn new(
        target: CompileTarget,
        compute: bool,
        invert_y: bool,
        fix_clip_space_z: bool,
    ) -> Self {
        DialectOptions {
            target,
            glsl_version: GlslVersion::for_target(target, compute),
            invert_y,
            fix_clip_space_z,
        }
    }
}

/// Raise the `#version` of emitted GLSL that declares storage buffers or images
/// under a version without them.
pub fn upgrade_version(source: String, version: GlslVersion, uses_storage: bool) -> String {
    let upgraded = version.with_storage();
    if !uses_storage || upgraded == version {
        return source;
    }

    let from = format!("#version {}", version.number());
    let to = format!("#version {}", upgraded.number());
    if !source.contains(&from) {
        return source;
    }
    log::debug!("raising {from} to {to} for storage resources");
    source.replacen(&from, &to, 1)
}
