//! Scene components

mod camera;
mod light;
mod transform;

pub use camera::*;
pub use light::*;
pub use transform::*;

use crate::gfx::MeshHandle;
use crate::resources::MaterialId;
use bevy_ecs::prelude::*;

/// Renders a mesh with a material from the [`MaterialLibrary`] at the
/// entity's transform
///
/// [`MaterialLibrary`]: crate::resources::MaterialLibrary
#[derive(Component, Debug, Clone, Copy)]
pub struct MeshRenderer {
    pub mesh: MeshHandle,
    pub material: MaterialId,
}

impl MeshRenderer {
    pub fn new(mesh: MeshHandle, material: MaterialId) -> Self {
        Self { mesh, material }
    }
}
