//! The graphics-context abstraction
//!
//! Everything the renderer asks of the graphics device goes through the
//! [`GraphicsContext`] trait: binding state, uniform writes, draws, and
//! resource lifetimes. Concrete GPU backends implement it; the crate ships
//! a recording implementation ([`super::TraceContext`]) for tests and
//! debugging.

use crate::gfx::types::*;
use glam::{UVec2, Vec4};
use thiserror::Error;

/// Graphics-context error type
#[derive(Error, Debug)]
pub enum GfxError {
    #[error("failed to load texture {path}: {reason}")]
    TextureLoadFailed { path: String, reason: String },
    #[error("failed to build shader from {vertex} + {fragment}: {reason}")]
    ShaderBuildFailed {
        vertex: String,
        fragment: String,
        reason: String,
    },
    #[error("framebuffer is incomplete: {0}")]
    FramebufferIncomplete(String),
    #[error("failed to create resource: {0}")]
    ResourceCreationFailed(String),
}

pub type GfxResult<T> = Result<T, GfxError>;

/// Handle to a linked shader program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub(crate) u64);

/// Handle to a 2D texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub(crate) u64);

/// Handle to a sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerHandle(pub(crate) u64);

/// Handle to a drawable mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub(crate) u64);

/// Handle to a bare vertex array used for attribute-less fullscreen draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayHandle(pub(crate) u64);

/// Handle to an off-screen framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramebufferHandle(pub(crate) u64);

/// The device boundary the forward renderer draws through.
///
/// All binding state (active shader, texture units, bound framebuffer) is
/// owned by the context; callers must not assume bindings persist across
/// frames and must re-establish everything they rely on.
pub trait GraphicsContext {
    // Frame and binding state

    /// Set the viewport to cover `size` starting at the origin
    fn set_viewport(&mut self, size: UVec2);

    /// Set the color used by subsequent clears
    fn set_clear_color(&mut self, color: Vec4);

    /// Set the depth value used by subsequent clears
    fn set_clear_depth(&mut self, depth: f32);

    /// Set the color and depth write masks
    fn set_write_masks(&mut self, color: bool, depth: bool);

    /// Clear the currently bound framebuffer's color and/or depth planes
    fn clear(&mut self, color: bool, depth: bool);

    /// Bind an off-screen framebuffer, or the default one for `None`
    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferHandle>);

    /// Apply fixed-function pipeline state
    fn apply_pipeline_state(&mut self, state: &PipelineState);

    /// Activate a shader program
    fn use_shader(&mut self, shader: ShaderHandle);

    /// Bind a texture (and optionally a sampler) to a texture unit
    fn bind_texture(&mut self, unit: u32, texture: TextureHandle, sampler: Option<SamplerHandle>);

    /// Explicitly unbind a texture unit so no stale binding survives
    fn unbind_texture(&mut self, unit: u32);

    /// Write a named uniform on a shader
    fn set_uniform(&mut self, shader: ShaderHandle, name: &str, value: UniformValue);

    /// Upload a contiguous slice of light records to the shader's fixed
    /// light array, starting at slot zero
    fn write_lights(&mut self, shader: ShaderHandle, lights: &[GpuLight]);

    // Draws

    /// Draw a mesh with the current shader and bindings
    fn draw_mesh(&mut self, mesh: MeshHandle);

    /// Draw a fullscreen triangle through a bare vertex array
    fn draw_fullscreen(&mut self, vertex_array: VertexArrayHandle);

    // Resource creation

    /// Build and link a shader program from vertex and fragment stage paths
    fn create_shader(&mut self, vertex: &str, fragment: &str) -> GfxResult<ShaderHandle>;

    /// Load a texture image from a path
    fn load_texture(&mut self, path: &str, mipmaps: bool) -> GfxResult<TextureHandle>;

    /// Create an empty render-target texture
    fn create_render_target(&mut self, format: TextureFormat, size: UVec2)
        -> GfxResult<TextureHandle>;

    /// Create a sampler
    fn create_sampler(&mut self, desc: &SamplerDescriptor) -> GfxResult<SamplerHandle>;

    /// Create a UV sphere mesh with the given segment counts
    fn create_sphere_mesh(&mut self, segments: UVec2) -> GfxResult<MeshHandle>;

    /// Create a bare vertex array for attribute-less draws
    fn create_vertex_array(&mut self) -> GfxResult<VertexArrayHandle>;

    /// Create a framebuffer with one color and one depth attachment
    fn create_framebuffer(
        &mut self,
        color: TextureHandle,
        depth: TextureHandle,
    ) -> GfxResult<FramebufferHandle>;

    // Resource cleanup

    fn destroy_shader(&mut self, shader: ShaderHandle);
    fn destroy_texture(&mut self, texture: TextureHandle);
    fn destroy_sampler(&mut self, sampler: SamplerHandle);
    fn destroy_mesh(&mut self, mesh: MeshHandle);
    fn destroy_vertex_array(&mut self, vertex_array: VertexArrayHandle);
    fn destroy_framebuffer(&mut self, framebuffer: FramebufferHandle);
}
