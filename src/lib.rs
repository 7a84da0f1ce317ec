//! Forward Renderer - a forward rendering pipeline for real-time 3D scenes
//!
//! Turns scene entities (meshes, materials, lights, a camera) into an
//! ordered sequence of draw operations on a pluggable graphics context,
//! optionally through an off-screen pass and a post-processing pass.
//!
//! # Features
//! - Closed material set with composable pipeline/shader/texture binding
//! - Opaque → sky → transparent draw ordering with back-to-front sorting
//!   of transparent geometry
//! - Fixed-slot light aggregation with an explicit count uniform
//! - Optional sky pass (camera-centered sphere forced to the far plane)
//! - Optional post-process pass through an off-screen framebuffer
//! - Entity Component System (ECS) based scene management using Bevy ECS

pub mod gfx;
pub mod material;
pub mod renderer;
pub mod resources;
pub mod scene;

// Re-export Bevy ECS prelude for users
pub use bevy_ecs::prelude::*;

pub use gfx::{GraphicsContext, TraceContext};
pub use material::{Material, MaterialKind, MaterialRecord};
pub use renderer::ForwardRenderer;
pub use resources::{MaterialId, MaterialLibrary};

use glam::Vec4;

/// Configuration for initializing the forward renderer
#[derive(Debug, Clone, Default)]
pub struct RendererConfig {
    /// Path to an equirectangular sky texture; presence enables the sky pass
    pub sky: Option<String>,
    /// Path to a post-process fragment shader; presence enables the
    /// post-process pass
    pub postprocess: Option<String>,
    /// Clear color for the frame, transparent black by default
    pub clear_color: Vec4,
}

impl RendererConfig {
    pub fn with_sky(mut self, texture_path: impl Into<String>) -> Self {
        self.sky = Some(texture_path.into());
        self
    }

    pub fn with_postprocess(mut self, fragment_path: impl Into<String>) -> Self {
        self.postprocess = Some(fragment_path.into());
        self
    }
}
