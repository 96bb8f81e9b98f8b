/// meshlit core - platform-free half of the lit mesh viewer
///
/// Parses `v`/`vn`/`f` mesh text into an interleaved vertex buffer and drives
/// the per-frame transform and draw sequence through a [`GraphicsContext`].

pub mod config;
pub mod error;
pub mod geometry;
pub mod gpu;
pub mod input;
pub mod obj;
pub mod projection;
pub mod render;
pub mod transform;

// Re-export commonly used types
pub use config::SceneConfig;
pub use error::{Error, IndexKind, MeshError, Result, ShaderStage};
pub use geometry::{Material, MeshBuffer, Vertex, FLOATS_PER_VERTEX};
pub use gpu::{GraphicsContext, ShaderSources, Uniform, UniformValue};
pub use input::InputSnapshot;
pub use obj::parse_obj;
pub use projection::{Perspective, Viewport};
pub use render::{FrameOutput, RenderLoop};
pub use transform::{frame_delta_angle, TransformState};
