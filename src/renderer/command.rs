//! Per-frame render commands

use crate::gfx::MeshHandle;
use crate::resources::MaterialId;
use glam::{Mat4, Vec3};

/// One draw of a mesh with a material at a world transform. Built fresh
/// every frame from live scene state and discarded at frame end; mesh and
/// material are referenced by handle, never owned.
#[derive(Debug, Clone, Copy)]
pub struct RenderCommand {
    pub local_to_world: Mat4,
    /// Translation component of `local_to_world`
    pub center: Vec3,
    pub mesh: MeshHandle,
    pub material: MaterialId,
}

impl RenderCommand {
    pub fn new(local_to_world: Mat4, mesh: MeshHandle, material: MaterialId) -> Self {
        Self {
            local_to_world,
            center: local_to_world.w_axis.truncate(),
            mesh,
            material,
        }
    }

    /// World-space depth of this command along the camera's forward axis.
    /// Larger means farther from the camera.
    pub fn depth_along(&self, camera_forward: Vec3) -> f32 {
        self.center.dot(camera_forward)
    }
}

/// Extract the camera's world-space forward direction from a view matrix.
///
/// In a right-handed view space the camera looks down -Z, so forward is
/// the negated third row of the view matrix.
pub fn camera_forward(view: &Mat4) -> Vec3 {
    -Vec3::new(view.x_axis.z, view.y_axis.z, view.z_axis.z)
}
