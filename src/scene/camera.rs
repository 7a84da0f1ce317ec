//! Camera component

use crate::scene::Transform;
use bevy_ecs::prelude::*;
use glam::{Mat4, UVec2};

/// Camera projection type.
///
/// Aspect ratio is not stored; it is derived from the viewport size every
/// frame so the projection tracks window resizes.
#[derive(Debug, Clone, Copy)]
pub enum Projection {
    Perspective {
        fov_y: f32,
        near: f32,
        far: f32,
    },
    Orthographic {
        height: f32,
        near: f32,
        far: f32,
    },
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Perspective {
            fov_y: std::f32::consts::FRAC_PI_4,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Projection {
    pub fn matrix(&self, viewport: UVec2) -> Mat4 {
        let aspect = viewport.x as f32 / viewport.y.max(1) as f32;
        match self {
            Projection::Perspective { fov_y, near, far } => {
                Mat4::perspective_rh(*fov_y, aspect, *near, *far)
            }
            Projection::Orthographic { height, near, far } => {
                let half_h = height / 2.0;
                let half_w = half_h * aspect;
                Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, *near, *far)
            }
        }
    }

    pub fn near(&self) -> f32 {
        match self {
            Projection::Perspective { near, .. } => *near,
            Projection::Orthographic { near, .. } => *near,
        }
    }

    pub fn far(&self) -> f32 {
        match self {
            Projection::Perspective { far, .. } => *far,
            Projection::Orthographic { far, .. } => *far,
        }
    }
}

/// Camera component; position and orientation come from the entity's
/// [`Transform`]
#[derive(Component, Debug, Clone, Default)]
pub struct Camera {
    pub projection: Projection,
}

impl Camera {
    pub fn perspective(fov_y: f32, near: f32, far: f32) -> Self {
        Self {
            projection: Projection::Perspective { fov_y, near, far },
        }
    }

    pub fn orthographic(height: f32, near: f32, far: f32) -> Self {
        Self {
            projection: Projection::Orthographic { height, near, far },
        }
    }

    /// Get the view matrix for a camera carried by `transform`
    pub fn view_matrix(&self, transform: &Transform) -> Mat4 {
        transform.matrix().inverse()
    }

    /// Get the projection matrix for the given viewport size
    pub fn projection_matrix(&self, viewport: UVec2) -> Mat4 {
        self.projection.matrix(viewport)
    }
}
