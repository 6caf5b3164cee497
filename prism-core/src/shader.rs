/// Compiled vertex + fragment program with memoized attribute and uniform
/// lookups
use crate::cache::MemoCache;
use crate::error::{ShaderError, ShaderStage};
use crate::glsl;
use crate::graphics::GraphicsContext;
use crate::math::{Mat4, Vec3, Vec4};

/// Names a shader variant exposes to the CPU side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderDescriptor {
    pub attributes: &'static [&'static str],
    pub uniforms: &'static [&'static str],
}

/// GLSL text for one shader variant plus its interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderSource {
    pub name: &'static str,
    pub vertex: &'static str,
    pub fragment: &'static str,
    pub descriptor: ShaderDescriptor,
}

impl ShaderSource {
    /// Checks that every name in the descriptor is declared by one of the stages.
    pub fn validate(&self) -> Result<(), ShaderError> {
        let declared: Vec<_> = glsl::declarations(self.vertex)
            .into_iter()
            .chain(glsl::declarations(self.fragment))
            .map(|d| d.name)
            .collect();

        let names = self.descriptor.attributes.iter().chain(self.descriptor.uniforms);
        for name in names {
            if !declared.iter().any(|d| d == name) {
                return Err(ShaderError::MissingDeclaration {
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }
}

pub struct ShaderProgram<C: GraphicsContext> {
    name: &'static str,
    program: C::Program,
    descriptor: ShaderDescriptor,
    attributes: MemoCache<Option<u32>>,
    uniforms: MemoCache<Option<C::UniformLocation>>,
}

impl<C: GraphicsContext> ShaderProgram<C> {
    /// Compiles and links `source`. Any failure is fatal for the variant and
    /// carries the native info log.
    pub fn new(ctx: &C, source: &ShaderSource) -> Result<Self, ShaderError> {
        source.validate()?;

        let vertex = compile(ctx, ShaderStage::Vertex, source.vertex)?;
        let fragment = match compile(ctx, ShaderStage::Fragment, source.fragment) {
            Ok(fragment) => fragment,
            Err(e) => {
                ctx.delete_shader(&vertex);
                return Err(e);
            }
        };

        let program = match ctx.create_program() {
            Ok(program) => program,
            Err(e) => {
                ctx.delete_shader(&vertex);
                ctx.delete_shader(&fragment);
                return Err(e.into());
            }
        };
        if !ctx.link_program(&program, &vertex, &fragment) {
            let log = ctx.program_info_log(&program).unwrap_or_default();
            ctx.delete_program(&program);
            ctx.delete_shader(&vertex);
            ctx.delete_shader(&fragment);
            return Err(ShaderError::Link { log });
        }
        log::debug!("linked shader program '{}'", source.name);

        Ok(Self {
            name: source.name,
            program,
            descriptor: source.descriptor,
            attributes: MemoCache::new(),
            uniforms: MemoCache::new(),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn descriptor(&self) -> &ShaderDescriptor {
        &self.descriptor
    }

    pub fn use_program(&self, ctx: &C) {
        ctx.use_program(&self.program);
    }

    /// Attribute slot, `None` when the linker dropped the input.
    pub fn attribute(&self, ctx: &C, name: &str) -> Option<u32> {
        self.attributes.get_or_insert_with(name, |name| {
            u32::try_from(ctx.attribute_location(&self.program, name)).ok()
        })
    }

    fn uniform(&self, ctx: &C, name: &str) -> Option<C::UniformLocation> {
        self.uniforms
            .get_or_insert_with(name, |name| ctx.uniform_location(&self.program, name))
    }

    pub fn set_matrix(&self, ctx: &C, name: &str, value: &Mat4) {
        ctx.uniform_matrix4(self.uniform(ctx, name).as_ref(), value);
    }

    pub fn set_vec4(&self, ctx: &C, name: &str, value: Vec4) {
        ctx.uniform_vec4(self.uniform(ctx, name).as_ref(), value);
    }

    pub fn set_vec3(&self, ctx: &C, name: &str, value: Vec3) {
        ctx.uniform_vec3(self.uniform(ctx, name).as_ref(), value);
    }

    /// Points a sampler uniform at texture unit `unit`.
    pub fn set_sampler(&self, ctx: &C, name: &str, unit: i32) {
        ctx.uniform_int(self.uniform(ctx, name).as_ref(), unit);
    }
}

fn compile<C: GraphicsContext>(ctx: &C, stage: ShaderStage, source: &str) -> Result<C::Shader, ShaderError> {
    let shader = ctx.create_shader(stage)?;
    if !ctx.compile_shader(&shader, source) {
        let log = ctx.shader_info_log(&shader).unwrap_or_default();
        ctx.delete_shader(&shader);
        return Err(ShaderError::Compile { stage, log });
    }
    Ok(shader)
}
