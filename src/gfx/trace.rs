//! Recording graphics context
//!
//! [`TraceContext`] implements [`GraphicsContext`] by logging every call
//! into an op list instead of touching a GPU. It allocates handles from a
//! counter, tracks which resources are alive and which framebuffer is
//! bound, so tests can assert on binding order, draw order, and resource
//! lifetimes.

use crate::gfx::traits::*;
use crate::gfx::types::*;
use glam::{UVec2, Vec4};
use std::collections::HashSet;

/// One recorded context call
#[derive(Debug, Clone, PartialEq)]
pub enum TraceOp {
    SetViewport(UVec2),
    SetClearColor(Vec4),
    SetClearDepth(f32),
    SetWriteMasks { color: bool, depth: bool },
    Clear { color: bool, depth: bool },
    BindFramebuffer(Option<FramebufferHandle>),
    ApplyPipelineState(PipelineState),
    UseShader(ShaderHandle),
    BindTexture {
        unit: u32,
        texture: TextureHandle,
        sampler: Option<SamplerHandle>,
    },
    UnbindTexture { unit: u32 },
    SetUniform {
        shader: ShaderHandle,
        name: String,
        value: UniformValue,
    },
    WriteLights {
        shader: ShaderHandle,
        lights: Vec<GpuLight>,
    },
    DrawMesh(MeshHandle),
    DrawFullscreen(VertexArrayHandle),
    CreateShader(ShaderHandle),
    LoadTexture(TextureHandle),
    CreateRenderTarget {
        texture: TextureHandle,
        format: TextureFormat,
        size: UVec2,
    },
    CreateSampler(SamplerHandle),
    CreateSphereMesh(MeshHandle),
    CreateVertexArray(VertexArrayHandle),
    CreateFramebuffer(FramebufferHandle),
    DestroyShader(ShaderHandle),
    DestroyTexture(TextureHandle),
    DestroySampler(SamplerHandle),
    DestroyMesh(MeshHandle),
    DestroyVertexArray(VertexArrayHandle),
    DestroyFramebuffer(FramebufferHandle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ResourceKind {
    Shader,
    Texture,
    Sampler,
    Mesh,
    VertexArray,
    Framebuffer,
}

/// A graphics context that records instead of rendering
#[derive(Default)]
pub struct TraceContext {
    ops: Vec<TraceOp>,
    next_handle: u64,
    bound_framebuffer: Option<FramebufferHandle>,
    live: HashSet<(ResourceKind, u64)>,
    fail_loads: bool,
}

impl TraceContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded call sequence so far
    pub fn ops(&self) -> &[TraceOp] {
        &self.ops
    }

    /// Forget recorded ops, keeping live-resource and binding state
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// The framebuffer currently bound (`None` = default)
    pub fn bound_framebuffer(&self) -> Option<FramebufferHandle> {
        self.bound_framebuffer
    }

    /// How many created resources have not been destroyed
    pub fn live_resource_count(&self) -> usize {
        self.live.len()
    }

    /// Make subsequent texture loads and shader builds fail, to exercise
    /// initialize error paths
    pub fn fail_loads(&mut self, fail: bool) {
        self.fail_loads = fail;
    }

    /// Count recorded draw calls (mesh and fullscreen)
    pub fn draw_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, TraceOp::DrawMesh(_) | TraceOp::DrawFullscreen(_)))
            .count()
    }

    fn alloc(&mut self, kind: ResourceKind) -> u64 {
        self.next_handle += 1;
        self.live.insert((kind, self.next_handle));
        self.next_handle
    }

    fn release(&mut self, kind: ResourceKind, raw: u64) {
        if !self.live.remove(&(kind, raw)) {
            log::warn!("destroy of dead or unknown {kind:?} handle {raw}");
        }
    }
}

impl GraphicsContext for TraceContext {
    fn set_viewport(&mut self, size: UVec2) {
        self.ops.push(TraceOp::SetViewport(size));
    }

    fn set_clear_color(&mut self, color: Vec4) {
        self.ops.push(TraceOp::SetClearColor(color));
    }

    fn set_clear_depth(&mut self, depth: f32) {
        self.ops.push(TraceOp::SetClearDepth(depth));
    }

    fn set_write_masks(&mut self, color: bool, depth: bool) {
        self.ops.push(TraceOp::SetWriteMasks { color, depth });
    }

    fn clear(&mut self, color: bool, depth: bool) {
        self.ops.push(TraceOp::Clear { color, depth });
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferHandle>) {
        self.bound_framebuffer = framebuffer;
        self.ops.push(TraceOp::BindFramebuffer(framebuffer));
    }

    fn apply_pipeline_state(&mut self, state: &PipelineState) {
        self.ops.push(TraceOp::ApplyPipelineState(*state));
    }

    fn use_shader(&mut self, shader: ShaderHandle) {
        self.ops.push(TraceOp::UseShader(shader));
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle, sampler: Option<SamplerHandle>) {
        self.ops.push(TraceOp::BindTexture {
            unit,
            texture,
            sampler,
        });
    }

    fn unbind_texture(&mut self, unit: u32) {
        self.ops.push(TraceOp::UnbindTexture { unit });
    }

    fn set_uniform(&mut self, shader: ShaderHandle, name: &str, value: UniformValue) {
        self.ops.push(TraceOp::SetUniform {
            shader,
            name: name.to_string(),
            value,
        });
    }

    fn write_lights(&mut self, shader: ShaderHandle, lights: &[GpuLight]) {
        self.ops.push(TraceOp::WriteLights {
            shader,
            lights: lights.to_vec(),
        });
    }

    fn draw_mesh(&mut self, mesh: MeshHandle) {
        self.ops.push(TraceOp::DrawMesh(mesh));
    }

    fn draw_fullscreen(&mut self, vertex_array: VertexArrayHandle) {
        self.ops.push(TraceOp::DrawFullscreen(vertex_array));
    }

    fn create_shader(&mut self, vertex: &str, fragment: &str) -> GfxResult<ShaderHandle> {
        if self.fail_loads {
            return Err(GfxError::ShaderBuildFailed {
                vertex: vertex.to_string(),
                fragment: fragment.to_string(),
                reason: "load failure injected by test".to_string(),
            });
        }
        let handle = ShaderHandle(self.alloc(ResourceKind::Shader));
        self.ops.push(TraceOp::CreateShader(handle));
        Ok(handle)
    }

    fn load_texture(&mut self, path: &str, _mipmaps: bool) -> GfxResult<TextureHandle> {
        if self.fail_loads {
            return Err(GfxError::TextureLoadFailed {
                path: path.to_string(),
                reason: "load failure injected by test".to_string(),
            });
        }
        let handle = TextureHandle(self.alloc(ResourceKind::Texture));
        self.ops.push(TraceOp::LoadTexture(handle));
        Ok(handle)
    }

    fn create_render_target(
        &mut self,
        format: TextureFormat,
        size: UVec2,
    ) -> GfxResult<TextureHandle> {
        let handle = TextureHandle(self.alloc(ResourceKind::Texture));
        self.ops.push(TraceOp::CreateRenderTarget {
            texture: handle,
            format,
            size,
        });
        Ok(handle)
    }

    fn create_sampler(&mut self, _desc: &SamplerDescriptor) -> GfxResult<SamplerHandle> {
        let handle = SamplerHandle(self.alloc(ResourceKind::Sampler));
        self.ops.push(TraceOp::CreateSampler(handle));
        Ok(handle)
    }

    fn create_sphere_mesh(&mut self, _segments: UVec2) -> GfxResult<MeshHandle> {
        let handle = MeshHandle(self.alloc(ResourceKind::Mesh));
        self.ops.push(TraceOp::CreateSphereMesh(handle));
        Ok(handle)
    }

    fn create_vertex_array(&mut self) -> GfxResult<VertexArrayHandle> {
        let handle = VertexArrayHandle(self.alloc(ResourceKind::VertexArray));
        self.ops.push(TraceOp::CreateVertexArray(handle));
        Ok(handle)
    }

    fn create_framebuffer(
        &mut self,
        _color: TextureHandle,
        _depth: TextureHandle,
    ) -> GfxResult<FramebufferHandle> {
        let handle = FramebufferHandle(self.alloc(ResourceKind::Framebuffer));
        self.ops.push(TraceOp::CreateFramebuffer(handle));
        Ok(handle)
    }

    fn destroy_shader(&mut self, shader: ShaderHandle) {
        self.release(ResourceKind::Shader, shader.0);
        self.ops.push(TraceOp::DestroyShader(shader));
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        self.release(ResourceKind::Texture, texture.0);
        self.ops.push(TraceOp::DestroyTexture(texture));
    }

    fn destroy_sampler(&mut self, sampler: SamplerHandle) {
        self.release(ResourceKind::Sampler, sampler.0);
        self.ops.push(TraceOp::DestroySampler(sampler));
    }

    fn destroy_mesh(&mut self, mesh: MeshHandle) {
        self.release(ResourceKind::Mesh, mesh.0);
        self.ops.push(TraceOp::DestroyMesh(mesh));
    }

    fn destroy_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.release(ResourceKind::VertexArray, vertex_array.0);
        self.ops.push(TraceOp::DestroyVertexArray(vertex_array));
    }

    fn destroy_framebuffer(&mut self, framebuffer: FramebufferHandle) {
        self.release(ResourceKind::Framebuffer, framebuffer.0);
        self.ops.push(TraceOp::DestroyFramebuffer(framebuffer));
    }
}
