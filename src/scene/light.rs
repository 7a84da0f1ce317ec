//! Light component
//!
//! Position and direction are not stored on the light; they are read from
//! the owning entity's [`Transform`] when the frame's light list is built.

use crate::gfx::types::{GpuLight, GPU_LIGHT_DIRECTIONAL, GPU_LIGHT_POINT, GPU_LIGHT_SPOT};
use crate::scene::Transform;
use bevy_ecs::prelude::*;
use glam::Vec4;

/// Light kind. Discriminants match the shader-side values; zero is
/// reserved for empty array slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum LightKind {
    Directional = GPU_LIGHT_DIRECTIONAL,
    Point = GPU_LIGHT_POINT,
    Spot = GPU_LIGHT_SPOT,
}

/// Distance attenuation coefficients for point and spot lights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
        }
    }
}

/// Light component
#[derive(Component, Debug, Clone)]
pub struct Light {
    pub kind: LightKind,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub ambient: Vec4,
    pub emissive: Vec4,
    /// Point and spot lights only
    pub attenuation: Attenuation,
    /// Spot lights only, radians
    pub inner_angle: f32,
    /// Spot lights only, radians
    pub outer_angle: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            kind: LightKind::Directional,
            diffuse: Vec4::ONE,
            specular: Vec4::ONE,
            ambient: Vec4::ONE,
            emissive: Vec4::ZERO,
            attenuation: Attenuation::default(),
            inner_angle: 0.3,
            outer_angle: 0.5,
        }
    }
}

impl Light {
    pub fn directional(diffuse: Vec4, specular: Vec4, ambient: Vec4) -> Self {
        Self {
            kind: LightKind::Directional,
            diffuse,
            specular,
            ambient,
            ..Default::default()
        }
    }

    pub fn point(diffuse: Vec4, specular: Vec4, ambient: Vec4, attenuation: Attenuation) -> Self {
        Self {
            kind: LightKind::Point,
            diffuse,
            specular,
            ambient,
            attenuation,
            ..Default::default()
        }
    }

    pub fn spot(
        diffuse: Vec4,
        specular: Vec4,
        ambient: Vec4,
        attenuation: Attenuation,
        inner_angle: f32,
        outer_angle: f32,
    ) -> Self {
        Self {
            kind: LightKind::Spot,
            diffuse,
            specular,
            ambient,
            attenuation,
            inner_angle,
            outer_angle,
            ..Default::default()
        }
    }

    /// Convert to the GPU array-slot format. Fields the kind does not use
    /// stay zeroed.
    pub fn to_gpu(&self, transform: &Transform) -> GpuLight {
        let mut gpu = GpuLight {
            diffuse: self.diffuse,
            specular: self.specular,
            ambient: self.ambient,
            emissive: self.emissive,
            kind: self.kind as u32,
            ..bytemuck::Zeroable::zeroed()
        };

        let direction = transform.forward().normalize_or_zero().extend(0.0);
        let position = transform.position.extend(0.0);
        let attenuation = Vec4::new(
            self.attenuation.constant,
            self.attenuation.linear,
            self.attenuation.quadratic,
            0.0,
        );

        match self.kind {
            LightKind::Directional => {
                gpu.direction = direction;
            }
            LightKind::Point => {
                gpu.position = position;
                gpu.attenuation = attenuation;
            }
            LightKind::Spot => {
                gpu.position = position;
                gpu.direction = direction;
                gpu.attenuation = attenuation;
                gpu.cone_angles = Vec4::new(self.inner_angle, self.outer_angle, 0.0, 0.0);
            }
        }

        gpu
    }
}
