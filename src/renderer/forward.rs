//! Forward renderer
//!
//! Drives the per-frame flow: query the scene, build render commands and
//! the light list, partition opaque/transparent, sort transparent
//! back-to-front, then draw opaque → sky → transparent, optionally through
//! an off-screen framebuffer followed by a post-process pass.

use crate::gfx::traits::*;
use crate::gfx::types::UniformValue;
use crate::renderer::command::{camera_forward, RenderCommand};
use crate::renderer::lights::LightBuffer;
use crate::renderer::post::PostProcessPass;
use crate::renderer::sky::SkyPass;
use crate::resources::MaterialLibrary;
use crate::scene::{Camera, Light, MeshRenderer, Transform};
use crate::RendererConfig;
use bevy_ecs::prelude::*;
use glam::{Mat4, UVec2, Vec4};
use thiserror::Error;

/// Renderer initialization error
#[derive(Error, Debug)]
pub enum RendererError {
    #[error("failed to create sky resources: {0}")]
    SkyCreation(#[source] GfxError),
    #[error("failed to create post-process resources: {0}")]
    PostProcessCreation(#[source] GfxError),
}

/// The forward rendering pipeline.
///
/// Lifecycle: [`initialize`](Self::initialize) once,
/// [`render`](Self::render) every frame, [`destroy`](Self::destroy) once.
/// The renderer owns exactly the resources it allocates in `initialize`
/// and releases exactly those in `destroy`; scene-owned meshes and
/// materials are never touched.
pub struct ForwardRenderer {
    viewport_size: UVec2,
    clear_color: Vec4,
    sky: Option<SkyPass>,
    postprocess: Option<PostProcessPass>,
    // Per-frame buffers, reused across frames
    opaque: Vec<RenderCommand>,
    transparent: Vec<RenderCommand>,
    lights: LightBuffer,
}

impl ForwardRenderer {
    pub fn initialize(
        ctx: &mut dyn GraphicsContext,
        viewport_size: UVec2,
        config: &RendererConfig,
    ) -> Result<Self, RendererError> {
        let sky = config
            .sky
            .as_deref()
            .map(|path| SkyPass::create(ctx, path))
            .transpose()
            .map_err(RendererError::SkyCreation)?;

        let postprocess = config
            .postprocess
            .as_deref()
            .map(|path| PostProcessPass::create(ctx, path, viewport_size))
            .transpose()
            .map_err(RendererError::PostProcessCreation)?;

        log::info!(
            "forward renderer initialized ({}x{}, sky: {}, postprocess: {})",
            viewport_size.x,
            viewport_size.y,
            sky.is_some(),
            postprocess.is_some()
        );

        Ok(Self {
            viewport_size,
            clear_color: config.clear_color,
            sky,
            postprocess,
            opaque: Vec::new(),
            transparent: Vec::new(),
            lights: LightBuffer::new(),
        })
    }

    pub fn viewport_size(&self) -> UVec2 {
        self.viewport_size
    }

    /// Render one frame.
    ///
    /// Takes the first camera found while enumerating the scene; if no
    /// entity carries a camera the frame is a silent no-op — nothing is
    /// cleared or drawn.
    pub fn render(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        world: &mut World,
        materials: &MaterialLibrary,
    ) {
        self.opaque.clear();
        self.transparent.clear();
        self.lights.clear();

        let camera = world
            .query::<(&Camera, &Transform)>()
            .iter(world)
            .next()
            .map(|(camera, transform)| (camera.clone(), *transform));
        let Some((camera, camera_transform)) = camera else {
            return;
        };

        for (transform, renderer) in world.query::<(&Transform, &MeshRenderer)>().iter(world) {
            let Some(material) = materials.get(renderer.material) else {
                log::warn!("mesh renderer refers to unknown material {:?}", renderer.material);
                continue;
            };
            let command = RenderCommand::new(transform.matrix(), renderer.mesh, renderer.material);
            if material.is_transparent() {
                self.transparent.push(command);
            } else {
                self.opaque.push(command);
            }
        }

        for (light, transform) in world.query::<(&Light, &Transform)>().iter(world) {
            self.lights.push(light, transform);
        }

        let view = camera.view_matrix(&camera_transform);
        let projection = camera.projection_matrix(self.viewport_size);
        let view_projection = projection * view;

        // Painter's algorithm: farthest along the camera forward axis first
        let forward = camera_forward(&view);
        self.transparent.sort_by(|a, b| {
            b.depth_along(forward).total_cmp(&a.depth_along(forward))
        });

        ctx.set_viewport(self.viewport_size);
        ctx.set_clear_color(self.clear_color);
        ctx.set_clear_depth(1.0);
        // Masks must be open or the clear would not reach the framebuffer
        ctx.set_write_masks(true, true);

        if let Some(post) = &self.postprocess {
            ctx.bind_framebuffer(Some(post.framebuffer));
        }
        ctx.clear(true, true);

        for command in &self.opaque {
            draw_command(ctx, materials, &self.lights, command, &view_projection);
        }

        if let Some(sky) = &self.sky {
            sky.draw(ctx, camera_transform.position, &view, &projection);
        }

        for command in &self.transparent {
            draw_command(ctx, materials, &self.lights, command, &view_projection);
        }

        if let Some(post) = &self.postprocess {
            ctx.bind_framebuffer(None);
            post.apply(ctx);
        }
    }

    /// Release every resource allocated in `initialize`, and only those.
    /// Safe to call more than once.
    pub fn destroy(&mut self, ctx: &mut dyn GraphicsContext) {
        if let Some(sky) = self.sky.take() {
            sky.destroy(ctx);
        }
        if let Some(post) = self.postprocess.take() {
            post.destroy(ctx);
        }
    }
}

fn draw_command(
    ctx: &mut dyn GraphicsContext,
    materials: &MaterialLibrary,
    lights: &LightBuffer,
    command: &RenderCommand,
    view_projection: &Mat4,
) {
    // Existence was checked at classification time
    let Some(material) = materials.get(command.material) else {
        return;
    };
    material.prepare(ctx);
    ctx.set_uniform(
        material.shader(),
        "transform",
        UniformValue::Mat4(*view_projection * command.local_to_world),
    );
    lights.upload(ctx, material.shader());
    ctx.draw_mesh(command.mesh);
}
