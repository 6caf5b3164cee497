/// Error types for mesh building, shader setup and graphics resources
use std::fmt;

/// Shader pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Failures reported by the graphics context itself.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphicsError {
    /// The context refused to hand out a new object of the named kind.
    ResourceCreation(&'static str),
    /// Backend-specific failure with its message.
    Backend(String),
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsError::ResourceCreation(kind) => write!(f, "unable to create {}", kind),
            GraphicsError::Backend(msg) => write!(f, "graphics backend error: {}", msg),
        }
    }
}

impl std::error::Error for GraphicsError {}

#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    /// A stage failed to compile; `log` is the native info log.
    Compile { stage: ShaderStage, log: String },
    /// The program failed to link; `log` is the native info log.
    Link { log: String },
    /// The descriptor names an attribute or uniform the sources never declare.
    MissingDeclaration { name: String },
    Graphics(GraphicsError),
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Compile { stage, log } => {
                write!(f, "an error occurred compiling the {} shader: {}", stage, log)
            }
            ShaderError::Link { log } => {
                write!(f, "unable to initialize the shader program: {}", log)
            }
            ShaderError::MissingDeclaration { name } => {
                write!(f, "'{}' is not declared in the shader sources", name)
            }
            ShaderError::Graphics(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShaderError::Graphics(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GraphicsError> for ShaderError {
    fn from(e: GraphicsError) -> Self {
        ShaderError::Graphics(e)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MeshError {
    /// Attribute arrays disagree on the vertex count.
    LengthMismatch {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Index count is not a multiple of three.
    IndexCount(usize),
    IndexOutOfRange { index: u16, vertex_count: usize },
    /// More vertices than a 16-bit index can address.
    TooManyVertices(usize),
    SubdivisionTooDeep { requested: u32, max: u32 },
    NoSegments,
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::LengthMismatch {
                attribute,
                expected,
                actual,
            } => write!(
                f,
                "{} array has {} components, expected {}",
                attribute, actual, expected
            ),
            MeshError::IndexCount(n) => write!(f, "index count {} is not a multiple of 3", n),
            MeshError::IndexOutOfRange { index, vertex_count } => write!(
                f,
                "index {} out of range for {} vertices",
                index, vertex_count
            ),
            MeshError::TooManyVertices(n) => {
                write!(f, "{} vertices exceed the 16-bit index range", n)
            }
            MeshError::SubdivisionTooDeep { requested, max } => write!(
                f,
                "sphere subdivision depth {} exceeds the maximum of {}",
                requested, max
            ),
            MeshError::NoSegments => write!(f, "cylinder needs at least one segment"),
        }
    }
}

impl std::error::Error for MeshError {}

/// Anything that can stop a renderer from being built.
#[derive(Debug)]
pub enum Error {
    Shader(ShaderError),
    Graphics(GraphicsError),
    Mesh(MeshError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Shader(e) => write!(f, "shader error: {}", e),
            Error::Graphics(e) => write!(f, "{}", e),
            Error::Mesh(e) => write!(f, "mesh error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Shader(e) => Some(e),
            Error::Graphics(e) => Some(e),
            Error::Mesh(e) => Some(e),
        }
    }
}

impl From<ShaderError> for Error {
    fn from(e: ShaderError) -> Self {
        Error::Shader(e)
    }
}

impl From<GraphicsError> for Error {
    fn from(e: GraphicsError) -> Self {
        Error::Graphics(e)
    }
}

impl From<MeshError> for Error {
    fn from(e: MeshError) -> Self {
        Error::Mesh(e)
    }
}
