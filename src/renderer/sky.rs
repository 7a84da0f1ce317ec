//! Sky pass resources
//!
//! The sky is a textured sphere drawn from the inside, centered on the
//! camera so it appears infinitely distant, with its clip-space depth
//! forced to the far plane so it loses every depth tie against real
//! geometry.

use crate::gfx::traits::*;
use crate::gfx::types::*;
use crate::material::{BaseMaterial, TexturedMaterial, TintedMaterial};
use glam::{Mat4, UVec2, Vec3, Vec4};

const SKY_VERTEX_SHADER: &str = "assets/shaders/textured.vert";
const SKY_FRAGMENT_SHADER: &str = "assets/shaders/textured.frag";
const SPHERE_SEGMENTS: UVec2 = UVec2::new(16, 16);

/// Post-projection matrix that forces clip-space output to the far plane:
/// maps clip `(x, y, z, w)` to `(x, y, w, w)`, so NDC depth is exactly 1
/// for any projection.
pub fn far_plane_projection() -> Mat4 {
    Mat4::from_cols(
        Vec4::X,
        Vec4::Y,
        Vec4::ZERO,
        Vec4::new(0.0, 0.0, 1.0, 1.0),
    )
}

pub(crate) struct SkyPass {
    sphere: MeshHandle,
    material: TexturedMaterial,
}

impl SkyPass {
    /// Pipeline state for drawing the sphere from the inside: cull front
    /// faces, and pass depth ties at the far plane with less-or-equal.
    fn pipeline_state() -> PipelineState {
        PipelineState {
            face_culling: FaceCulling {
                enabled: true,
                front_face: FrontFace::Ccw,
                culled_face: CullFace::Front,
            },
            depth_testing: DepthTesting {
                enabled: true,
                function: CompareFunction::LessEqual,
            },
            ..Default::default()
        }
    }

    pub fn create(ctx: &mut dyn GraphicsContext, texture_path: &str) -> GfxResult<Self> {
        let sphere = ctx.create_sphere_mesh(SPHERE_SEGMENTS)?;
        let shader = ctx.create_shader(SKY_VERTEX_SHADER, SKY_FRAGMENT_SHADER)?;
        // No mipmaps: avoids blurring at the horizon
        let texture = ctx.load_texture(texture_path, false)?;
        let sampler = ctx.create_sampler(&SamplerDescriptor {
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            address_mode_u: AddressMode::Repeat,
            address_mode_v: AddressMode::ClampToEdge,
        })?;

        let material = TexturedMaterial {
            tinted: TintedMaterial {
                base: BaseMaterial {
                    pipeline_state: Self::pipeline_state(),
                    shader,
                    transparent: false,
                },
                tint: Vec4::ONE,
            },
            texture: Some(texture),
            sampler: Some(sampler),
            alpha_threshold: 1.0,
        };

        Ok(Self { sphere, material })
    }

    /// Draw the sky after opaque geometry. The model matrix is a pure
    /// translation to the camera position; rotation and scale are ignored.
    pub fn draw(
        &self,
        ctx: &mut dyn GraphicsContext,
        camera_position: Vec3,
        view: &Mat4,
        projection: &Mat4,
    ) {
        self.material.prepare(ctx);
        let model = Mat4::from_translation(camera_position);
        let transform = far_plane_projection() * *projection * *view * model;
        ctx.set_uniform(self.material.shader(), "transform", UniformValue::Mat4(transform));
        ctx.draw_mesh(self.sphere);
    }

    pub fn destroy(self, ctx: &mut dyn GraphicsContext) {
        ctx.destroy_mesh(self.sphere);
        ctx.destroy_shader(self.material.shader());
        if let Some(texture) = self.material.texture {
            ctx.destroy_texture(texture);
        }
        if let Some(sampler) = self.material.sampler {
            ctx.destroy_sampler(sampler);
        }
    }
}
