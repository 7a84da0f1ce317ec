//! Post-process pass resources
//!
//! When enabled, the frame renders into an off-screen framebuffer whose
//! color attachment then feeds a fullscreen-triangle draw with a
//! user-supplied fragment shader.

use crate::gfx::traits::*;
use crate::gfx::types::*;
use crate::material::{BaseMaterial, TexturedMaterial, TintedMaterial};
use glam::{UVec2, Vec4};

const FULLSCREEN_VERTEX_SHADER: &str = "assets/shaders/fullscreen.vert";

pub(crate) struct PostProcessPass {
    pub framebuffer: FramebufferHandle,
    color_target: TextureHandle,
    depth_target: TextureHandle,
    vertex_array: VertexArrayHandle,
    material: TexturedMaterial,
}

impl PostProcessPass {
    pub fn create(
        ctx: &mut dyn GraphicsContext,
        fragment_path: &str,
        size: UVec2,
    ) -> GfxResult<Self> {
        let color_target = ctx.create_render_target(TextureFormat::Rgba8Unorm, size)?;
        let depth_target = ctx.create_render_target(TextureFormat::Depth24Plus, size)?;
        let framebuffer = ctx.create_framebuffer(color_target, depth_target)?;
        let vertex_array = ctx.create_vertex_array()?;
        let sampler = ctx.create_sampler(&SamplerDescriptor::default())?;
        let shader = ctx.create_shader(FULLSCREEN_VERTEX_SHADER, fragment_path)?;

        // Post-processing never writes depth
        let pipeline_state = PipelineState {
            depth_write: false,
            ..Default::default()
        };
        let material = TexturedMaterial {
            tinted: TintedMaterial {
                base: BaseMaterial {
                    pipeline_state,
                    shader,
                    transparent: false,
                },
                tint: Vec4::ONE,
            },
            texture: Some(color_target),
            sampler: Some(sampler),
            alpha_threshold: 0.0,
        };

        Ok(Self {
            framebuffer,
            color_target,
            depth_target,
            vertex_array,
            material,
        })
    }

    /// Draw the off-screen color target to the currently bound framebuffer
    /// through the post-process shader
    pub fn apply(&self, ctx: &mut dyn GraphicsContext) {
        self.material.prepare(ctx);
        ctx.draw_fullscreen(self.vertex_array);
    }

    pub fn destroy(self, ctx: &mut dyn GraphicsContext) {
        ctx.destroy_framebuffer(self.framebuffer);
        ctx.destroy_vertex_array(self.vertex_array);
        ctx.destroy_texture(self.color_target);
        ctx.destroy_texture(self.depth_target);
        ctx.destroy_shader(self.material.shader());
        if let Some(sampler) = self.material.sampler {
            ctx.destroy_sampler(sampler);
        }
    }
}
