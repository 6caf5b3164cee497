/// In-memory graphics context that records every call for assertions
use crate::error::{GraphicsError, ShaderStage};
use crate::graphics::GraphicsContext;
use crate::math::{Mat4, Vec3, Vec4};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    UploadVertices { buffer: u32, len: usize },
    UploadIndices { buffer: u32, len: usize },
    BindAttribute { buffer: u32, location: u32, components: i32, normalized: bool },
    BindIndexBuffer(u32),
    DrawIndexedTriangles(i32),
    CompileShader { shader: u32, stage: ShaderStage },
    DeleteShader(u32),
    LinkProgram(u32),
    DeleteProgram(u32),
    UseProgram(u32),
    AttributeLookup(String),
    UniformLookup(String),
    UniformMatrix4 { name: Option<String>, value: Mat4 },
    UniformVec4 { name: Option<String>, value: Vec4 },
    UniformVec3 { name: Option<String>, value: Vec3 },
    UniformInt { name: Option<String>, value: i32 },
    BindTexture(Option<u32>),
    AllocateTexture { width: i32, height: i32 },
    ActiveTexture(u32),
    BindFramebuffer(Option<u32>),
    AttachColorTexture(u32),
    AllocateDepthBuffer { renderbuffer: u32, width: i32, height: i32 },
    AttachDepthBuffer(u32),
    Viewport(i32, i32, i32, i32),
    Clear(Vec4),
    EnableDepthTest,
}

/// Handles are plain ids; uniform locations carry their name so assertions
/// can tell which uniform was written.
#[derive(Default)]
pub struct RecordingContext {
    next_id: Cell<u32>,
    calls: RefCell<Vec<Call>>,
    stages: RefCell<HashMap<u32, ShaderStage>>,
    errors: RefCell<VecDeque<u32>>,
    failing_stage: Option<(ShaderStage, String)>,
    link_failure: Option<String>,
    no_programs: bool,
    missing_attributes: HashSet<String>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes compilation of `stage` fail with `log`.
    pub fn failing_compile(stage: ShaderStage, log: &str) -> Self {
        Self {
            failing_stage: Some((stage, log.to_string())),
            ..Self::default()
        }
    }

    pub fn failing_link(log: &str) -> Self {
        Self {
            link_failure: Some(log.to_string()),
            ..Self::default()
        }
    }

    /// Makes every `create_program` call fail.
    pub fn without_program_creation() -> Self {
        Self {
            no_programs: true,
            ..Self::default()
        }
    }

    /// Pretends the linker optimized `name` away.
    pub fn without_attribute(mut self, name: &str) -> Self {
        self.missing_attributes.insert(name.to_string());
        self
    }

    pub fn push_error(&self, code: u32) {
        self.errors.borrow_mut().push_back(code);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| predicate(c)).count()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn next(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

impl GraphicsContext for RecordingContext {
    type Buffer = u32;
    type Shader = u32;
    type Program = u32;
    type UniformLocation = String;
    type Texture = u32;
    type Framebuffer = u32;
    type Renderbuffer = u32;

    fn create_buffer(&self) -> Result<u32, GraphicsError> {
        Ok(self.next())
    }

    fn upload_vertices(&self, buffer: &u32, data: &[f32]) {
        self.record(Call::UploadVertices {
            buffer: *buffer,
            len: data.len(),
        });
    }

    fn upload_indices(&self, buffer: &u32, data: &[u16]) {
        self.record(Call::UploadIndices {
            buffer: *buffer,
            len: data.len(),
        });
    }

    fn bind_attribute(&self, buffer: &u32, location: u32, components: i32, normalized: bool) {
        self.record(Call::BindAttribute {
            buffer: *buffer,
            location,
            components,
            normalized,
        });
    }

    fn bind_index_buffer(&self, buffer: &u32) {
        self.record(Call::BindIndexBuffer(*buffer));
    }

    fn draw_indexed_triangles(&self, count: i32) {
        self.record(Call::DrawIndexedTriangles(count));
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, GraphicsError> {
        let id = self.next();
        self.stages.borrow_mut().insert(id, stage);
        Ok(id)
    }

    fn compile_shader(&self, shader: &u32, _source: &str) -> bool {
        let stage = self.stages.borrow()[shader];
        self.record(Call::CompileShader {
            shader: *shader,
            stage,
        });
        !matches!(&self.failing_stage, Some((failing, _)) if *failing == stage)
    }

    fn shader_info_log(&self, _shader: &u32) -> Option<String> {
        self.failing_stage.as_ref().map(|(_, log)| log.clone())
    }

    fn delete_shader(&self, shader: &u32) {
        self.record(Call::DeleteShader(*shader));
    }

    fn create_program(&self) -> Result<u32, GraphicsError> {
        if self.no_programs {
            return Err(GraphicsError::ResourceCreation("program"));
        }
        Ok(self.next())
    }

    fn link_program(&self, program: &u32, _vertex: &u32, _fragment: &u32) -> bool {
        self.record(Call::LinkProgram(*program));
        self.link_failure.is_none()
    }

    fn program_info_log(&self, _program: &u32) -> Option<String> {
        self.link_failure.clone()
    }

    fn delete_program(&self, program: &u32) {
        self.record(Call::DeleteProgram(*program));
    }

    fn use_program(&self, program: &u32) {
        self.record(Call::UseProgram(*program));
    }

    fn attribute_location(&self, _program: &u32, name: &str) -> i32 {
        self.record(Call::AttributeLookup(name.to_string()));
        if self.missing_attributes.contains(name) {
            return -1;
        }
        // Stable slot per name.
        name.bytes().map(i32::from).sum::<i32>() % 16
    }

    fn uniform_location(&self, _program: &u32, name: &str) -> Option<String> {
        self.record(Call::UniformLookup(name.to_string()));
        Some(name.to_string())
    }

    fn uniform_matrix4(&self, location: Option<&String>, value: &Mat4) {
        self.record(Call::UniformMatrix4 {
            name: location.cloned(),
            value: *value,
        });
    }

    fn uniform_vec4(&self, location: Option<&String>, value: Vec4) {
        self.record(Call::UniformVec4 {
            name: location.cloned(),
            value,
        });
    }

    fn uniform_vec3(&self, location: Option<&String>, value: Vec3) {
        self.record(Call::UniformVec3 {
            name: location.cloned(),
            value,
        });
    }

    fn uniform_int(&self, location: Option<&String>, value: i32) {
        self.record(Call::UniformInt {
            name: location.cloned(),
            value,
        });
    }

    fn create_texture(&self) -> Result<u32, GraphicsError> {
        Ok(self.next())
    }

    fn bind_texture(&self, texture: Option<&u32>) {
        self.record(Call::BindTexture(texture.copied()));
    }

    fn allocate_texture(&self, width: i32, height: i32) -> Result<(), GraphicsError> {
        self.record(Call::AllocateTexture { width, height });
        Ok(())
    }

    fn active_texture(&self, unit: u32) {
        self.record(Call::ActiveTexture(unit));
    }

    fn create_framebuffer(&self) -> Result<u32, GraphicsError> {
        Ok(self.next())
    }

    fn bind_framebuffer(&self, framebuffer: Option<&u32>) {
        self.record(Call::BindFramebuffer(framebuffer.copied()));
    }

    fn attach_color_texture(&self, texture: &u32) {
        self.record(Call::AttachColorTexture(*texture));
    }

    fn create_renderbuffer(&self) -> Result<u32, GraphicsError> {
        Ok(self.next())
    }

    fn allocate_depth_buffer(&self, renderbuffer: &u32, width: i32, height: i32) {
        self.record(Call::AllocateDepthBuffer {
            renderbuffer: *renderbuffer,
            width,
            height,
        });
    }

    fn attach_depth_buffer(&self, renderbuffer: &u32) {
        self.record(Call::AttachDepthBuffer(*renderbuffer));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn clear(&self, color: Vec4) {
        self.record(Call::Clear(color));
    }

    fn enable_depth_test(&self) {
        self.record(Call::EnableDepthTest);
    }

    fn get_error(&self) -> u32 {
        self.errors.borrow_mut().pop_front().unwrap_or(0)
    }
}
