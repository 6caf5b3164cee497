/// Drawing capabilities the hosting environment provides, mirroring the slice
/// of WebGL 1 the renderer uses
use crate::error::{GraphicsError, ShaderStage};
use crate::math::{Mat4, Vec3, Vec4};
use std::fmt;

pub trait GraphicsContext {
    type Buffer;
    type Shader;
    type Program;
    type UniformLocation: Clone;
    type Texture;
    type Framebuffer;
    type Renderbuffer;

    // Buffers
    fn create_buffer(&self) -> Result<Self::Buffer, GraphicsError>;
    /// Uploads static vertex data into an array buffer.
    fn upload_vertices(&self, buffer: &Self::Buffer, data: &[f32]);
    /// Uploads static 16-bit indices into an element array buffer.
    fn upload_indices(&self, buffer: &Self::Buffer, data: &[u16]);
    /// Binds `buffer` as the source of float attribute `location` and enables it.
    fn bind_attribute(&self, buffer: &Self::Buffer, location: u32, components: i32, normalized: bool);
    fn bind_index_buffer(&self, buffer: &Self::Buffer);
    /// Draws `count` indices from the bound element buffer as a triangle list.
    fn draw_indexed_triangles(&self, count: i32);

    // Shaders and programs
    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, GraphicsError>;
    /// Compiles `source` into `shader` and reports the compile status.
    fn compile_shader(&self, shader: &Self::Shader, source: &str) -> bool;
    fn shader_info_log(&self, shader: &Self::Shader) -> Option<String>;
    fn delete_shader(&self, shader: &Self::Shader);
    fn create_program(&self) -> Result<Self::Program, GraphicsError>;
    /// Attaches both stages, links and reports the link status.
    fn link_program(&self, program: &Self::Program, vertex: &Self::Shader, fragment: &Self::Shader) -> bool;
    fn program_info_log(&self, program: &Self::Program) -> Option<String>;
    fn delete_program(&self, program: &Self::Program);
    fn use_program(&self, program: &Self::Program);
    /// Attribute slot, or a negative value when the program has no such input.
    fn attribute_location(&self, program: &Self::Program, name: &str) -> i32;
    fn uniform_location(&self, program: &Self::Program, name: &str) -> Option<Self::UniformLocation>;
    fn uniform_matrix4(&self, location: Option<&Self::UniformLocation>, value: &Mat4);
    fn uniform_vec4(&self, location: Option<&Self::UniformLocation>, value: Vec4);
    fn uniform_vec3(&self, location: Option<&Self::UniformLocation>, value: Vec3);
    fn uniform_int(&self, location: Option<&Self::UniformLocation>, value: i32);

    // Render targets
    fn create_texture(&self) -> Result<Self::Texture, GraphicsError>;
    fn bind_texture(&self, texture: Option<&Self::Texture>);
    /// Allocates uninitialized RGBA8 storage for the bound texture with
    /// linear filtering and clamp-to-edge wrapping.
    fn allocate_texture(&self, width: i32, height: i32) -> Result<(), GraphicsError>;
    fn active_texture(&self, unit: u32);
    fn create_framebuffer(&self) -> Result<Self::Framebuffer, GraphicsError>;
    fn bind_framebuffer(&self, framebuffer: Option<&Self::Framebuffer>);
    fn attach_color_texture(&self, texture: &Self::Texture);
    fn create_renderbuffer(&self) -> Result<Self::Renderbuffer, GraphicsError>;
    /// Binds `renderbuffer` and gives it 16-bit depth storage.
    fn allocate_depth_buffer(&self, renderbuffer: &Self::Renderbuffer, width: i32, height: i32);
    fn attach_depth_buffer(&self, renderbuffer: &Self::Renderbuffer);

    // Frame state
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    /// Clears color and depth.
    fn clear(&self, color: Vec4);
    /// Enables depth testing with a less-or-equal comparison.
    fn enable_depth_test(&self);
    /// Pops the oldest pending error code, `0` when there is none.
    fn get_error(&self) -> u32;
}

/// GL error codes the context can report after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlError {
    InvalidEnum,
    InvalidValue,
    InvalidOperation,
    OutOfMemory,
    InvalidFramebufferOperation,
    ContextLost,
    Unknown(u32),
}

impl GlError {
    pub const NO_ERROR: u32 = 0;

    /// Maps a raw error code, `None` for `NO_ERROR`.
    pub fn from_code(code: u32) -> Option<Self> {
        let error = match code {
            Self::NO_ERROR => return None,
            0x0500 => GlError::InvalidEnum,
            0x0501 => GlError::InvalidValue,
            0x0502 => GlError::InvalidOperation,
            0x0505 => GlError::OutOfMemory,
            0x0506 => GlError::InvalidFramebufferOperation,
            0x9242 => GlError::ContextLost,
            other => GlError::Unknown(other),
        };
        Some(error)
    }

    pub fn code(&self) -> u32 {
        match self {
            GlError::InvalidEnum => 0x0500,
            GlError::InvalidValue => 0x0501,
            GlError::InvalidOperation => 0x0502,
            GlError::OutOfMemory => 0x0505,
            GlError::InvalidFramebufferOperation => 0x0506,
            GlError::ContextLost => 0x9242,
            GlError::Unknown(code) => *code,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GlError::InvalidEnum => "Invalid enum",
            GlError::InvalidValue => "Invalid value",
            GlError::InvalidOperation => "Invalid operation",
            GlError::OutOfMemory => "Out of memory",
            GlError::InvalidFramebufferOperation => "Invalid framebuffer operation",
            GlError::ContextLost => "Context lost webgl",
            GlError::Unknown(_) => "Unknown error",
        }
    }
}

impl fmt::Display for GlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} means: {}", self.code(), self.name())
    }
}

/// Polls the context once and logs what it reports. Informational only; the
/// caller keeps going either way.
pub fn check_gl_error<C: GraphicsContext>(ctx: &C) -> Option<GlError> {
    let error = GlError::from_code(ctx.get_error())?;
    log::error!("GL error occurred, code={}", error.code());
    log::error!("{}", error);
    Some(error)
}
