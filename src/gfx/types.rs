//! Common value types crossing the graphics-context boundary

use bytemuck::{Pod, Zeroable};
use glam::Vec4;

/// Texture format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    Rgba8Unorm,
    Rgba8UnormSrgb,
    Rgba16Float,
    Depth24Plus,
    Depth32Float,
}

impl TextureFormat {
    pub fn is_depth(&self) -> bool {
        matches!(self, TextureFormat::Depth24Plus | TextureFormat::Depth32Float)
    }
}

/// Front face winding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontFace {
    Ccw,
    Cw,
}

/// Which face a draw call culls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullFace {
    Front,
    Back,
}

/// Compare function for depth testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareFunction {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

/// Blend factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    Src,
    OneMinusSrc,
    SrcAlpha,
    OneMinusSrcAlpha,
    Dst,
    OneMinusDst,
    DstAlpha,
    OneMinusDstAlpha,
}

/// Blend operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendOperation {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

/// Blend component state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendComponent {
    pub src_factor: BlendFactor,
    pub dst_factor: BlendFactor,
    pub operation: BlendOperation,
}

impl Default for BlendComponent {
    fn default() -> Self {
        Self {
            src_factor: BlendFactor::One,
            dst_factor: BlendFactor::Zero,
            operation: BlendOperation::Add,
        }
    }
}

/// Blend state for color and alpha channels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BlendState {
    pub color: BlendComponent,
    pub alpha: BlendComponent,
}

impl BlendState {
    pub fn alpha_blending() -> Self {
        Self {
            color: BlendComponent {
                src_factor: BlendFactor::SrcAlpha,
                dst_factor: BlendFactor::OneMinusSrcAlpha,
                operation: BlendOperation::Add,
            },
            alpha: BlendComponent {
                src_factor: BlendFactor::One,
                dst_factor: BlendFactor::OneMinusSrcAlpha,
                operation: BlendOperation::Add,
            },
        }
    }

    pub fn additive() -> Self {
        Self {
            color: BlendComponent {
                src_factor: BlendFactor::One,
                dst_factor: BlendFactor::One,
                operation: BlendOperation::Add,
            },
            alpha: BlendComponent::default(),
        }
    }
}

/// Face culling state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceCulling {
    pub enabled: bool,
    pub front_face: FrontFace,
    pub culled_face: CullFace,
}

impl Default for FaceCulling {
    fn default() -> Self {
        Self {
            enabled: false,
            front_face: FrontFace::Ccw,
            culled_face: CullFace::Back,
        }
    }
}

/// Depth testing state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthTesting {
    pub enabled: bool,
    pub function: CompareFunction,
}

impl Default for DepthTesting {
    fn default() -> Self {
        Self {
            enabled: false,
            function: CompareFunction::Less,
        }
    }
}

/// Fixed-function pipeline configuration for a draw call.
///
/// `None` blending means blending is disabled entirely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineState {
    pub face_culling: FaceCulling,
    pub depth_testing: DepthTesting,
    pub blending: Option<BlendState>,
    pub color_write: bool,
    pub depth_write: bool,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            face_culling: FaceCulling::default(),
            depth_testing: DepthTesting::default(),
            blending: None,
            color_write: true,
            depth_write: true,
        }
    }
}

impl PipelineState {
    /// State for opaque scene geometry: back-face culling and a standard
    /// depth test.
    pub fn opaque() -> Self {
        Self {
            face_culling: FaceCulling {
                enabled: true,
                ..Default::default()
            },
            depth_testing: DepthTesting {
                enabled: true,
                function: CompareFunction::Less,
            },
            ..Default::default()
        }
    }

    /// State for alpha-blended geometry: depth test on, depth writes off so
    /// blended fragments never occlude each other.
    pub fn transparent() -> Self {
        Self {
            depth_testing: DepthTesting {
                enabled: true,
                function: CompareFunction::Less,
            },
            blending: Some(BlendState::alpha_blending()),
            depth_write: false,
            ..Default::default()
        }
    }
}

/// Filter mode for samplers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Nearest,
    Linear,
}

/// Address mode for samplers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    ClampToEdge,
    Repeat,
    MirrorRepeat,
}

/// Sampler descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerDescriptor {
    pub mag_filter: FilterMode,
    pub min_filter: FilterMode,
    pub address_mode_u: AddressMode,
    pub address_mode_v: AddressMode,
}

impl Default for SamplerDescriptor {
    fn default() -> Self {
        Self {
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
        }
    }
}

/// A shader uniform value, written by name through the context
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(glam::Vec2),
    Vec3(glam::Vec3),
    Vec4(glam::Vec4),
    Mat4(glam::Mat4),
}

/// Light kind discriminants as the shader sees them. Zero marks an empty
/// array slot, so every populated slot carries a non-zero kind.
pub const GPU_LIGHT_NONE: u32 = 0;
pub const GPU_LIGHT_DIRECTIONAL: u32 = 1;
pub const GPU_LIGHT_POINT: u32 = 2;
pub const GPU_LIGHT_SPOT: u32 = 3;

/// One light as uploaded to a fixed shader array slot.
///
/// Fields a kind does not use stay zeroed: directional lights carry only a
/// direction, point lights position and attenuation, spot lights all of it
/// plus the cone angles.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuLight {
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub ambient: Vec4,
    pub emissive: Vec4,
    /// xyz = world position, w unused
    pub position: Vec4,
    /// xyz = normalized direction, w unused
    pub direction: Vec4,
    /// x = constant, y = linear, z = quadratic, w unused
    pub attenuation: Vec4,
    /// x = inner angle, y = outer angle (radians), zw unused
    pub cone_angles: Vec4,
    /// One of the `GPU_LIGHT_*` discriminants
    pub kind: u32,
    pub _padding: [u32; 3],
}
