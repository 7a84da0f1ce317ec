//! Forward rendering pipeline

mod command;
mod forward;
mod lights;
mod post;
mod sky;

pub use command::{camera_forward, RenderCommand};
pub use forward::{ForwardRenderer, RendererError};
pub use lights::{LightBuffer, MAX_LIGHTS};
pub use sky::far_plane_projection;
