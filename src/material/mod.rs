//! Material definitions
//!
//! Materials describe how a draw call binds pipeline state, a shader, and
//! textures. The set is closed: six variants forming a refinement chain
//! (base → tinted → textured, base → lit → lit-tinted → lit-textured),
//! expressed by struct embedding instead of inheritance. Every variant's
//! `prepare` delegates to its parent's `prepare` first, so parent state is
//! never silently skipped.
//!
//! Texture unit assignment is stable per variant: the single-texture
//! variant uses unit 0; the lit-textured variant binds albedo=0,
//! specular=1, roughness=2, ambient-occlusion=3, emissive=4. A slot with
//! no texture explicitly unbinds its unit on every `prepare` so no stale
//! binding from a previous draw survives.

use crate::gfx::traits::{GraphicsContext, SamplerHandle, ShaderHandle, TextureHandle};
use crate::gfx::types::{PipelineState, UniformValue};
use glam::{Vec2, Vec4};
use thiserror::Error;

/// Texture unit indices for the lit-textured variant
pub const ALBEDO_MAP_UNIT: u32 = 0;
pub const SPECULAR_MAP_UNIT: u32 = 1;
pub const ROUGHNESS_MAP_UNIT: u32 = 2;
pub const AMBIENT_OCCLUSION_MAP_UNIT: u32 = 3;
pub const EMISSIVE_MAP_UNIT: u32 = 4;

/// Texture unit used by the single-texture variant
pub const BASE_TEXTURE_UNIT: u32 = 0;

/// Material configuration error
#[derive(Error, Debug)]
pub enum MaterialError {
    #[error("material record has no shader reference")]
    MissingShader,
}

/// External parameter record consumed by `configure`. Parsing it out of
/// config files is the asset collaborator's job; absent fields fall back
/// to documented defaults.
#[derive(Debug, Clone, Default)]
pub struct MaterialRecord {
    pub shader: Option<ShaderHandle>,
    pub pipeline_state: Option<PipelineState>,
    pub transparent: Option<bool>,
    /// Default: opaque white
    pub tint: Option<Vec4>,
    /// Default: 0
    pub alpha_threshold: Option<f32>,
    /// Lit color terms; default: white
    pub diffuse: Option<Vec4>,
    pub specular: Option<Vec4>,
    pub ambient: Option<Vec4>,
    pub emissive: Option<Vec4>,
    /// Default: 1
    pub shininess: Option<f32>,
    pub albedo_tint: Option<Vec4>,
    pub specular_tint: Option<Vec4>,
    pub emissive_tint: Option<Vec4>,
    pub texture: Option<TextureHandle>,
    pub sampler: Option<SamplerHandle>,
    pub albedo_map: Option<TextureHandle>,
    pub albedo_sampler: Option<SamplerHandle>,
    pub specular_map: Option<TextureHandle>,
    pub specular_sampler: Option<SamplerHandle>,
    pub roughness_map: Option<TextureHandle>,
    pub roughness_sampler: Option<SamplerHandle>,
    pub ambient_occlusion_map: Option<TextureHandle>,
    pub ambient_occlusion_sampler: Option<SamplerHandle>,
    pub emissive_map: Option<TextureHandle>,
    pub emissive_sampler: Option<SamplerHandle>,
    /// Default: [0, 1]
    pub roughness_range: Option<Vec2>,
}

/// A texture/sampler pair for one unit. An empty slot still unbinds its
/// unit deterministically.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureSlot {
    pub texture: Option<TextureHandle>,
    pub sampler: Option<SamplerHandle>,
}

impl TextureSlot {
    pub fn new(texture: Option<TextureHandle>, sampler: Option<SamplerHandle>) -> Self {
        Self { texture, sampler }
    }

    fn bind(&self, ctx: &mut dyn GraphicsContext, unit: u32) {
        match self.texture {
            Some(texture) => ctx.bind_texture(unit, texture, self.sampler),
            None => ctx.unbind_texture(unit),
        }
    }
}

/// Root of the refinement chain: pipeline state, shader, transparency flag
#[derive(Debug, Clone)]
pub struct BaseMaterial {
    pub pipeline_state: PipelineState,
    pub shader: ShaderHandle,
    pub transparent: bool,
}

impl BaseMaterial {
    pub fn prepare(&self, ctx: &mut dyn GraphicsContext) {
        ctx.apply_pipeline_state(&self.pipeline_state);
        ctx.use_shader(self.shader);
    }

    pub fn configure(&mut self, record: &MaterialRecord) -> Result<(), MaterialError> {
        self.shader = record.shader.ok_or(MaterialError::MissingShader)?;
        self.pipeline_state = record.pipeline_state.unwrap_or_default();
        self.transparent = record.transparent.unwrap_or(false);
        Ok(())
    }

    fn from_record(record: &MaterialRecord) -> Result<Self, MaterialError> {
        Ok(Self {
            shader: record.shader.ok_or(MaterialError::MissingShader)?,
            pipeline_state: record.pipeline_state.unwrap_or_default(),
            transparent: record.transparent.unwrap_or(false),
        })
    }
}

/// Adds a single tint color multiplied into the shader output
#[derive(Debug, Clone)]
pub struct TintedMaterial {
    pub base: BaseMaterial,
    pub tint: Vec4,
}

impl TintedMaterial {
    pub fn prepare(&self, ctx: &mut dyn GraphicsContext) {
        self.base.prepare(ctx);
        ctx.set_uniform(self.base.shader, "tint", UniformValue::Vec4(self.tint));
    }

    pub fn configure(&mut self, record: &MaterialRecord) -> Result<(), MaterialError> {
        self.base.configure(record)?;
        self.tint = record.tint.unwrap_or(Vec4::ONE);
        Ok(())
    }

    fn from_record(record: &MaterialRecord) -> Result<Self, MaterialError> {
        Ok(Self {
            base: BaseMaterial::from_record(record)?,
            tint: record.tint.unwrap_or(Vec4::ONE),
        })
    }
}

/// Adds one texture/sampler pair on unit 0 and an alpha-cutoff threshold
#[derive(Debug, Clone)]
pub struct TexturedMaterial {
    pub tinted: TintedMaterial,
    pub texture: Option<TextureHandle>,
    pub sampler: Option<SamplerHandle>,
    pub alpha_threshold: f32,
}

impl TexturedMaterial {
    pub fn prepare(&self, ctx: &mut dyn GraphicsContext) {
        self.tinted.prepare(ctx);
        let shader = self.shader();
        ctx.set_uniform(
            shader,
            "alpha_threshold",
            UniformValue::Float(self.alpha_threshold),
        );
        TextureSlot::new(self.texture, self.sampler).bind(ctx, BASE_TEXTURE_UNIT);
        ctx.set_uniform(shader, "tex", UniformValue::Int(BASE_TEXTURE_UNIT as i32));
    }

    pub fn configure(&mut self, record: &MaterialRecord) -> Result<(), MaterialError> {
        self.tinted.configure(record)?;
        self.alpha_threshold = record.alpha_threshold.unwrap_or(0.0);
        self.texture = record.texture;
        self.sampler = record.sampler;
        Ok(())
    }

    fn from_record(record: &MaterialRecord) -> Result<Self, MaterialError> {
        Ok(Self {
            tinted: TintedMaterial::from_record(record)?,
            texture: record.texture,
            sampler: record.sampler,
            alpha_threshold: record.alpha_threshold.unwrap_or(0.0),
        })
    }

    pub fn shader(&self) -> ShaderHandle {
        self.tinted.base.shader
    }
}

/// Adds Phong-style color terms and a shininess exponent
#[derive(Debug, Clone)]
pub struct LitMaterial {
    pub base: BaseMaterial,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub ambient: Vec4,
    pub emissive: Vec4,
    pub shininess: f32,
}

impl LitMaterial {
    pub fn prepare(&self, ctx: &mut dyn GraphicsContext) {
        self.base.prepare(ctx);
        let shader = self.base.shader;
        ctx.set_uniform(
            shader,
            "material.diffuse",
            UniformValue::Vec3(self.diffuse.truncate()),
        );
        ctx.set_uniform(
            shader,
            "material.specular",
            UniformValue::Vec3(self.specular.truncate()),
        );
        ctx.set_uniform(
            shader,
            "material.ambient",
            UniformValue::Vec3(self.ambient.truncate()),
        );
        ctx.set_uniform(
            shader,
            "material.emissive",
            UniformValue::Vec3(self.emissive.truncate()),
        );
        ctx.set_uniform(
            shader,
            "material.shininess",
            UniformValue::Float(self.shininess),
        );
    }

    pub fn configure(&mut self, record: &MaterialRecord) -> Result<(), MaterialError> {
        self.base.configure(record)?;
        self.diffuse = record.diffuse.unwrap_or(Vec4::ONE);
        self.specular = record.specular.unwrap_or(Vec4::ONE);
        self.ambient = record.ambient.unwrap_or(Vec4::ONE);
        self.emissive = record.emissive.unwrap_or(Vec4::ONE);
        self.shininess = record.shininess.unwrap_or(1.0);
        Ok(())
    }

    fn from_record(record: &MaterialRecord) -> Result<Self, MaterialError> {
        Ok(Self {
            base: BaseMaterial::from_record(record)?,
            diffuse: record.diffuse.unwrap_or(Vec4::ONE),
            specular: record.specular.unwrap_or(Vec4::ONE),
            ambient: record.ambient.unwrap_or(Vec4::ONE),
            emissive: record.emissive.unwrap_or(Vec4::ONE),
            shininess: record.shininess.unwrap_or(1.0),
        })
    }
}

/// Lit color terms combined with per-channel tints
#[derive(Debug, Clone)]
pub struct LitTintedMaterial {
    pub lit: LitMaterial,
    pub albedo_tint: Vec4,
    pub specular_tint: Vec4,
    pub emissive_tint: Vec4,
}

impl LitTintedMaterial {
    pub fn prepare(&self, ctx: &mut dyn GraphicsContext) {
        self.lit.prepare(ctx);
        let shader = self.lit.base.shader;
        ctx.set_uniform(
            shader,
            "material.albedo_tint",
            UniformValue::Vec3(self.albedo_tint.truncate()),
        );
        ctx.set_uniform(
            shader,
            "material.specular_tint",
            UniformValue::Vec3(self.specular_tint.truncate()),
        );
        ctx.set_uniform(
            shader,
            "material.emissive_tint",
            UniformValue::Vec3(self.emissive_tint.truncate()),
        );
    }

    pub fn configure(&mut self, record: &MaterialRecord) -> Result<(), MaterialError> {
        self.lit.configure(record)?;
        self.albedo_tint = record.albedo_tint.unwrap_or(Vec4::ONE);
        self.specular_tint = record.specular_tint.unwrap_or(Vec4::ONE);
        self.emissive_tint = record.emissive_tint.unwrap_or(Vec4::ONE);
        Ok(())
    }

    fn from_record(record: &MaterialRecord) -> Result<Self, MaterialError> {
        Ok(Self {
            lit: LitMaterial::from_record(record)?,
            albedo_tint: record.albedo_tint.unwrap_or(Vec4::ONE),
            specular_tint: record.specular_tint.unwrap_or(Vec4::ONE),
            emissive_tint: record.emissive_tint.unwrap_or(Vec4::ONE),
        })
    }
}

/// Lit and tinted with up to five texture maps on fixed units
#[derive(Debug, Clone)]
pub struct LitTexturedMaterial {
    pub lit_tinted: LitTintedMaterial,
    pub albedo: TextureSlot,
    pub specular: TextureSlot,
    pub roughness: TextureSlot,
    pub ambient_occlusion: TextureSlot,
    pub emissive: TextureSlot,
    pub roughness_range: Vec2,
    pub alpha_threshold: f32,
}

impl LitTexturedMaterial {
    pub fn prepare(&self, ctx: &mut dyn GraphicsContext) {
        self.lit_tinted.prepare(ctx);
        let shader = self.shader();
        ctx.set_uniform(
            shader,
            "material.roughness_range",
            UniformValue::Vec2(self.roughness_range),
        );
        ctx.set_uniform(
            shader,
            "alpha_threshold",
            UniformValue::Float(self.alpha_threshold),
        );

        let slots: [(&TextureSlot, &str, u32); 5] = [
            (&self.albedo, "material.albedo_map", ALBEDO_MAP_UNIT),
            (&self.specular, "material.specular_map", SPECULAR_MAP_UNIT),
            (&self.roughness, "material.roughness_map", ROUGHNESS_MAP_UNIT),
            (
                &self.ambient_occlusion,
                "material.ambient_occlusion_map",
                AMBIENT_OCCLUSION_MAP_UNIT,
            ),
            (&self.emissive, "material.emissive_map", EMISSIVE_MAP_UNIT),
        ];
        for (slot, name, unit) in slots {
            slot.bind(ctx, unit);
            ctx.set_uniform(shader, name, UniformValue::Int(unit as i32));
        }
    }

    pub fn configure(&mut self, record: &MaterialRecord) -> Result<(), MaterialError> {
        self.lit_tinted.configure(record)?;
        self.albedo = TextureSlot::new(record.albedo_map, record.albedo_sampler);
        self.specular = TextureSlot::new(record.specular_map, record.specular_sampler);
        self.roughness = TextureSlot::new(record.roughness_map, record.roughness_sampler);
        self.ambient_occlusion =
            TextureSlot::new(record.ambient_occlusion_map, record.ambient_occlusion_sampler);
        self.emissive = TextureSlot::new(record.emissive_map, record.emissive_sampler);
        self.roughness_range = record.roughness_range.unwrap_or(Vec2::new(0.0, 1.0));
        self.alpha_threshold = record.alpha_threshold.unwrap_or(0.0);
        Ok(())
    }

    fn from_record(record: &MaterialRecord) -> Result<Self, MaterialError> {
        Ok(Self {
            lit_tinted: LitTintedMaterial::from_record(record)?,
            albedo: TextureSlot::new(record.albedo_map, record.albedo_sampler),
            specular: TextureSlot::new(record.specular_map, record.specular_sampler),
            roughness: TextureSlot::new(record.roughness_map, record.roughness_sampler),
            ambient_occlusion: TextureSlot::new(
                record.ambient_occlusion_map,
                record.ambient_occlusion_sampler,
            ),
            emissive: TextureSlot::new(record.emissive_map, record.emissive_sampler),
            roughness_range: record.roughness_range.unwrap_or(Vec2::new(0.0, 1.0)),
            alpha_threshold: record.alpha_threshold.unwrap_or(0.0),
        })
    }

    pub fn shader(&self) -> ShaderHandle {
        self.lit_tinted.lit.base.shader
    }
}

/// Selects which material variant a record should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    Base,
    Tinted,
    Textured,
    Lit,
    LitTinted,
    LitTextured,
}

/// The closed material set
#[derive(Debug, Clone)]
pub enum Material {
    Base(BaseMaterial),
    Tinted(TintedMaterial),
    Textured(TexturedMaterial),
    Lit(LitMaterial),
    LitTinted(LitTintedMaterial),
    LitTextured(LitTexturedMaterial),
}

impl Material {
    /// Build a material of the given kind from a parameter record
    pub fn new(kind: MaterialKind, record: &MaterialRecord) -> Result<Self, MaterialError> {
        Ok(match kind {
            MaterialKind::Base => Material::Base(BaseMaterial::from_record(record)?),
            MaterialKind::Tinted => Material::Tinted(TintedMaterial::from_record(record)?),
            MaterialKind::Textured => Material::Textured(TexturedMaterial::from_record(record)?),
            MaterialKind::Lit => Material::Lit(LitMaterial::from_record(record)?),
            MaterialKind::LitTinted => {
                Material::LitTinted(LitTintedMaterial::from_record(record)?)
            }
            MaterialKind::LitTextured => {
                Material::LitTextured(LitTexturedMaterial::from_record(record)?)
            }
        })
    }

    /// Bind everything this material needs for a draw: pipeline state,
    /// shader, texture units, uniforms. Leaves every unit the variant
    /// declares in a deterministic state, bound or explicitly unbound.
    pub fn prepare(&self, ctx: &mut dyn GraphicsContext) {
        match self {
            Material::Base(m) => m.prepare(ctx),
            Material::Tinted(m) => m.prepare(ctx),
            Material::Textured(m) => m.prepare(ctx),
            Material::Lit(m) => m.prepare(ctx),
            Material::LitTinted(m) => m.prepare(ctx),
            Material::LitTextured(m) => m.prepare(ctx),
        }
    }

    /// Repopulate fields from a parameter record
    pub fn configure(&mut self, record: &MaterialRecord) -> Result<(), MaterialError> {
        match self {
            Material::Base(m) => m.configure(record),
            Material::Tinted(m) => m.configure(record),
            Material::Textured(m) => m.configure(record),
            Material::Lit(m) => m.configure(record),
            Material::LitTinted(m) => m.configure(record),
            Material::LitTextured(m) => m.configure(record),
        }
    }

    pub fn base(&self) -> &BaseMaterial {
        match self {
            Material::Base(m) => m,
            Material::Tinted(m) => &m.base,
            Material::Textured(m) => &m.tinted.base,
            Material::Lit(m) => &m.base,
            Material::LitTinted(m) => &m.lit.base,
            Material::LitTextured(m) => &m.lit_tinted.lit.base,
        }
    }

    pub fn shader(&self) -> ShaderHandle {
        self.base().shader
    }

    pub fn is_transparent(&self) -> bool {
        self.base().transparent
    }
}
