//! Shader element
//!
//! A shader owns a table of sampler uniforms scanned from its sources
//! and a pool of texture units for drawables bound to those uniforms.
//! Unit 0 is reserved for the material diffuse map, so bound drawables
//! occupy units `1..=SAMPLER_SLOT_COUNT`.

use super::ElementHandle;
use thiserror::Error;

/// Number of texture units available for drawable binds per shader.
pub const SAMPLER_SLOT_COUNT: u32 = 31;

/// Sampler dimensionality declared in shader source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerKind {
    /// `sampler2D`: flat textures, render targets, movies
    Flat,
    /// `samplerCube`: cubemap textures only
    Cube,
}

/// Why a drawable could not be attached to a shader.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttachError {
    /// The named uniform does not exist or is not a sampler.
    #[error("shader has no sampler uniform `{0}`")]
    UnknownUniform(String),
    /// Another drawable already feeds the named uniform.
    #[error("sampler uniform `{0}` already has a drawable bound")]
    UniformOccupied(String),
    /// Flat drawable offered to a cube sampler or the other way around.
    #[error("drawable does not match the sampler type of `{0}`")]
    SamplerMismatch(String),
    /// Every texture unit of the bind pool is taken.
    #[error("all sampler slots of the shader are in use")]
    SlotsExhausted,
    /// The drawable is already bound to some uniform of this shader.
    #[error("drawable is already attached to this shader")]
    AlreadyAttached,
}

/// One sampler uniform scanned from the shader sources.
#[derive(Debug)]
struct SamplerUniform {
    name: String,
    kind: SamplerKind,
}

/// An active drawable bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawableBind {
    /// Drawable occupying the slot
    pub element: ElementHandle,
    /// Texture unit handed out by the bind pool
    pub unit: u32,
    /// Sampler uniform the drawable feeds
    pub uniform: String,
}

/// Shader program with sampler bind slots.
#[derive(Debug)]
pub struct Shader {
    samplers: Vec<SamplerUniform>,
    binds: Vec<DrawableBind>,
    units_in_use: Vec<bool>,
    has_geometry_stage: bool,
}

impl Shader {
    /// Build a shader from the sampler uniforms found in its sources.
    #[must_use]
    pub fn new(samplers: Vec<(String, SamplerKind)>, has_geometry_stage: bool) -> Self {
        let samplers = samplers
            .into_iter()
            .map(|(name, kind)| SamplerUniform { name, kind })
            .collect();
        Self {
            samplers,
            binds: Vec::new(),
            units_in_use: vec![false; SAMPLER_SLOT_COUNT as usize],
            has_geometry_stage,
        }
    }

    /// Whether the program was linked with a geometry stage.
    #[must_use]
    pub fn has_geometry_stage(&self) -> bool {
        self.has_geometry_stage
    }

    /// Names of the sampler uniforms available for binding.
    pub fn sampler_names(&self) -> impl Iterator<Item = &str> {
        self.samplers.iter().map(|s| s.name.as_str())
    }

    /// Active drawable binds in attach order.
    #[must_use]
    pub fn binds(&self) -> &[DrawableBind] {
        &self.binds
    }

    /// Whether `element` is bound to any sampler of this shader.
    #[must_use]
    pub fn has_attached(&self, element: ElementHandle) -> bool {
        self.binds.iter().any(|bind| bind.element == element)
    }

    /// Bind a drawable to the sampler uniform `uniform`.
    ///
    /// `cube` states how the drawable samples; it must agree with the
    /// declared sampler kind. Returns the texture unit taken.
    /// Crate-private so every bind goes through the relation graph and
    /// leaves an edge behind for break processing.
    pub(crate) fn attach(
        &mut self,
        element: ElementHandle,
        cube: bool,
        uniform: &str,
    ) -> Result<u32, AttachError> {
        if self.has_attached(element) {
            return Err(AttachError::AlreadyAttached);
        }
        let sampler = self
            .samplers
            .iter()
            .find(|s| s.name == uniform)
            .ok_or_else(|| AttachError::UnknownUniform(uniform.to_owned()))?;
        if self.binds.iter().any(|bind| bind.uniform == uniform) {
            return Err(AttachError::UniformOccupied(uniform.to_owned()));
        }
        let matches = match sampler.kind {
            SamplerKind::Flat => !cube,
            SamplerKind::Cube => cube,
        };
        if !matches {
            return Err(AttachError::SamplerMismatch(uniform.to_owned()));
        }
        let free = self
            .units_in_use
            .iter()
            .position(|used| !used)
            .ok_or(AttachError::SlotsExhausted)?;
        self.units_in_use[free] = true;
        // Unit 0 stays reserved for the diffuse map.
        let unit = free as u32 + 1;
        self.binds.push(DrawableBind {
            element,
            unit,
            uniform: uniform.to_owned(),
        });
        Ok(unit)
    }

    /// Unbind a drawable. Returns false when it was not attached.
    pub(crate) fn detach(&mut self, element: ElementHandle) -> bool {
        let Some(index) = self.binds.iter().position(|bind| bind.element == element) else {
            return false;
        };
        let bind = self.binds.remove(index);
        self.units_in_use[(bind.unit - 1) as usize] = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn handle(index: u64) -> ElementHandle {
        // Fabricated keys are fine here, the shader never dereferences them.
        ElementHandle::from(KeyData::from_ffi(1 << 32 | index))
    }

    fn test_shader() -> Shader {
        Shader::new(
            vec![
                ("gDiffuseMap".to_owned(), SamplerKind::Flat),
                ("gEnvMap".to_owned(), SamplerKind::Cube),
            ],
            false,
        )
    }

    #[test]
    fn attach_hands_out_units_from_one() {
        let mut shader = test_shader();
        let unit = shader.attach(handle(1), false, "gDiffuseMap").unwrap();
        assert_eq!(unit, 1);
        assert!(shader.has_attached(handle(1)));
    }

    #[test]
    fn unknown_uniform_is_rejected() {
        let mut shader = test_shader();
        assert_eq!(
            shader.attach(handle(1), false, "gMissing"),
            Err(AttachError::UnknownUniform("gMissing".to_owned()))
        );
    }

    #[test]
    fn occupied_uniform_is_rejected() {
        let mut shader = test_shader();
        shader.attach(handle(1), false, "gDiffuseMap").unwrap();
        assert_eq!(
            shader.attach(handle(2), false, "gDiffuseMap"),
            Err(AttachError::UniformOccupied("gDiffuseMap".to_owned()))
        );
    }

    #[test]
    fn sampler_kind_must_match() {
        let mut shader = test_shader();
        assert_eq!(
            shader.attach(handle(1), true, "gDiffuseMap"),
            Err(AttachError::SamplerMismatch("gDiffuseMap".to_owned()))
        );
        assert_eq!(
            shader.attach(handle(1), false, "gEnvMap"),
            Err(AttachError::SamplerMismatch("gEnvMap".to_owned()))
        );
    }

    #[test]
    fn double_attach_is_rejected() {
        let mut shader = test_shader();
        shader.attach(handle(1), false, "gDiffuseMap").unwrap();
        assert_eq!(
            shader.attach(handle(1), true, "gEnvMap"),
            Err(AttachError::AlreadyAttached)
        );
    }

    #[test]
    fn detach_frees_the_unit() {
        let mut shader = test_shader();
        shader.attach(handle(1), false, "gDiffuseMap").unwrap();
        assert!(shader.detach(handle(1)));
        assert!(!shader.detach(handle(1)));
        // Unit 1 is free again for the next bind.
        assert_eq!(shader.attach(handle(2), true, "gEnvMap").unwrap(), 1);
    }

    #[test]
    fn pool_exhaustion_reports_loudly() {
        let samplers = (0..=SAMPLER_SLOT_COUNT)
            .map(|i| (format!("gMap{i}"), SamplerKind::Flat))
            .collect();
        let mut shader = Shader::new(samplers, false);
        for i in 0..SAMPLER_SLOT_COUNT {
            let uniform = format!("gMap{i}");
            shader.attach(handle(u64::from(i) + 1), false, &uniform).unwrap();
        }
        let last = format!("gMap{SAMPLER_SLOT_COUNT}");
        assert_eq!(
            shader.attach(handle(100), false, &last),
            Err(AttachError::SlotsExhausted)
        );
    }
}
