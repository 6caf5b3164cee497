/// Prism Core Library - Shared math, mesh generation and rendering logic
///
/// This library provides everything above the graphics context: matrices,
/// primitive meshes, shader programs, GPU models, offscreen targets and the
/// per-frame scene state. Hosts supply a `GraphicsContext` and drive frames.

pub mod cache;
pub mod error;
pub mod fbo;
pub mod glsl;
pub mod graphics;
pub mod math;
pub mod mesh;
pub mod model;
pub mod renderer;
pub mod scene;
pub mod shader;
pub mod shaders;
pub mod shapes;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use error::{Error, GraphicsError, MeshError, ShaderError, ShaderStage};
pub use graphics::{check_gl_error, GlError, GraphicsContext};
pub use math::{Mat4, Vec3, Vec4};
pub use mesh::{Fragment, MeshBuilder, MeshData, Triangle};
pub use model::{Model, Quad};
pub use renderer::Renderer;
pub use scene::{KeyState, Primitive, SceneConfig, SceneState};
pub use shader::{ShaderDescriptor, ShaderProgram, ShaderSource};
