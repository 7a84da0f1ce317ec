//! Per-frame light aggregation

use crate::gfx::traits::{GraphicsContext, ShaderHandle};
use crate::gfx::types::{GpuLight, UniformValue};
use crate::scene::{Light, Transform};

/// Number of fixed light slots in the shader-side array
pub const MAX_LIGHTS: usize = 16;

/// Collects the lights visible this frame, in scene enumeration order, and
/// uploads them to shaders as a contiguous record slice plus a count
/// uniform. Rebuilt every frame; the backing storage is reused.
#[derive(Default)]
pub struct LightBuffer {
    records: Vec<GpuLight>,
}

impl LightBuffer {
    pub fn new() -> Self {
        Self {
            records: Vec::with_capacity(MAX_LIGHTS),
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Append a light, reading position and direction from its transform.
    /// Lights past [`MAX_LIGHTS`] are dropped.
    pub fn push(&mut self, light: &Light, transform: &Transform) {
        if self.records.len() == MAX_LIGHTS {
            log::warn!("light limit of {MAX_LIGHTS} exceeded, dropping light");
            return;
        }
        self.records.push(light.to_gpu(transform));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[GpuLight] {
        &self.records
    }

    /// Write the light array and the `light_count` uniform on a shader.
    /// A frame with no lights writes nothing at all.
    pub fn upload(&self, ctx: &mut dyn GraphicsContext, shader: ShaderHandle) {
        if self.records.is_empty() {
            return;
        }
        ctx.write_lights(shader, &self.records);
        ctx.set_uniform(
            shader,
            "light_count",
            UniformValue::Int(self.records.len() as i32),
        );
    }
}
