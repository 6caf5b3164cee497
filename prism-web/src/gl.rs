/// `GraphicsContext` backed by a browser WebGL 1 context
use prism_core::math::{Mat4, Vec3, Vec4};
use prism_core::{GraphicsContext, GraphicsError, ShaderStage};
use web_sys::{
    WebGlBuffer, WebGlFramebuffer, WebGlProgram, WebGlRenderbuffer, WebGlRenderingContext as GL,
    WebGlShader, WebGlTexture, WebGlUniformLocation,
};

pub struct WebGlContext {
    gl: GL,
}

impl WebGlContext {
    pub fn new(gl: GL) -> Self {
        Self { gl }
    }

    pub fn gl(&self) -> &GL {
        &self.gl
    }
}

fn stage_kind(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => GL::VERTEX_SHADER,
        ShaderStage::Fragment => GL::FRAGMENT_SHADER,
    }
}

impl GraphicsContext for WebGlContext {
    type Buffer = WebGlBuffer;
    type Shader = WebGlShader;
    type Program = WebGlProgram;
    type UniformLocation = WebGlUniformLocation;
    type Texture = WebGlTexture;
    type Framebuffer = WebGlFramebuffer;
    type Renderbuffer = WebGlRenderbuffer;

    fn create_buffer(&self) -> Result<WebGlBuffer, GraphicsError> {
        self.gl
            .create_buffer()
            .ok_or(GraphicsError::ResourceCreation("buffer"))
    }

    fn upload_vertices(&self, buffer: &WebGlBuffer, data: &[f32]) {
        self.gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
        self.gl.buffer_data_with_u8_array(
            GL::ARRAY_BUFFER,
            bytemuck::cast_slice(data),
            GL::STATIC_DRAW,
        );
    }

    fn upload_indices(&self, buffer: &WebGlBuffer, data: &[u16]) {
        self.gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(buffer));
        self.gl.buffer_data_with_u8_array(
            GL::ELEMENT_ARRAY_BUFFER,
            bytemuck::cast_slice(data),
            GL::STATIC_DRAW,
        );
    }

    fn bind_attribute(&self, buffer: &WebGlBuffer, location: u32, components: i32, normalized: bool) {
        self.gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
        self.gl
            .vertex_attrib_pointer_with_i32(location, components, GL::FLOAT, normalized, 0, 0);
        self.gl.enable_vertex_attrib_array(location);
    }

    fn bind_index_buffer(&self, buffer: &WebGlBuffer) {
        self.gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(buffer));
    }

    fn draw_indexed_triangles(&self, count: i32) {
        self.gl
            .draw_elements_with_i32(GL::TRIANGLES, count, GL::UNSIGNED_SHORT, 0);
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<WebGlShader, GraphicsError> {
        self.gl
            .create_shader(stage_kind(stage))
            .ok_or(GraphicsError::ResourceCreation("shader"))
    }

    fn compile_shader(&self, shader: &WebGlShader, source: &str) -> bool {
        self.gl.shader_source(shader, source);
        self.gl.compile_shader(shader);
        self.gl
            .get_shader_parameter(shader, GL::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn shader_info_log(&self, shader: &WebGlShader) -> Option<String> {
        self.gl.get_shader_info_log(shader)
    }

    fn delete_shader(&self, shader: &WebGlShader) {
        self.gl.delete_shader(Some(shader));
    }

    fn create_program(&self) -> Result<WebGlProgram, GraphicsError> {
        self.gl
            .create_program()
            .ok_or(GraphicsError::ResourceCreation("program"))
    }

    fn link_program(&self, program: &WebGlProgram, vertex: &WebGlShader, fragment: &WebGlShader) -> bool {
        self.gl.attach_shader(program, vertex);
        self.gl.attach_shader(program, fragment);
        self.gl.link_program(program);
        self.gl
            .get_program_parameter(program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn program_info_log(&self, program: &WebGlProgram) -> Option<String> {
        self.gl.get_program_info_log(program)
    }

    fn delete_program(&self, program: &WebGlProgram) {
        self.gl.delete_program(Some(program));
    }

    fn use_program(&self, program: &WebGlProgram) {
        self.gl.use_program(Some(program));
    }

    fn attribute_location(&self, program: &WebGlProgram, name: &str) -> i32 {
        self.gl.get_attrib_location(program, name)
    }

    fn uniform_location(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        self.gl.get_uniform_location(program, name)
    }

    fn uniform_matrix4(&self, location: Option<&WebGlUniformLocation>, value: &Mat4) {
        self.gl
            .uniform_matrix4fv_with_f32_array(location, false, value);
    }

    fn uniform_vec4(&self, location: Option<&WebGlUniformLocation>, value: Vec4) {
        let [x, y, z, w] = value;
        self.gl.uniform4f(location, x, y, z, w);
    }

    fn uniform_vec3(&self, location: Option<&WebGlUniformLocation>, value: Vec3) {
        let [x, y, z] = value;
        self.gl.uniform3f(location, x, y, z);
    }

    fn uniform_int(&self, location: Option<&WebGlUniformLocation>, value: i32) {
        self.gl.uniform1i(location, value);
    }

    fn create_texture(&self) -> Result<WebGlTexture, GraphicsError> {
        self.gl
            .create_texture()
            .ok_or(GraphicsError::ResourceCreation("texture"))
    }

    fn bind_texture(&self, texture: Option<&WebGlTexture>) {
        self.gl.bind_texture(GL::TEXTURE_2D, texture);
    }

    fn allocate_texture(&self, width: i32, height: i32) -> Result<(), GraphicsError> {
        self.gl
            .tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
                GL::TEXTURE_2D,
                0,
                GL::RGBA as i32,
                width,
                height,
                0,
                GL::RGBA,
                GL::UNSIGNED_BYTE,
                None,
            )
            .map_err(|e| GraphicsError::Backend(format!("texImage2D failed: {:?}", e)))?;

        // No mipmaps, so the default minification filter would sample black.
        self.gl
            .tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
        self.gl
            .tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
        self.gl
            .tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
        Ok(())
    }

    fn active_texture(&self, unit: u32) {
        self.gl.active_texture(GL::TEXTURE0 + unit);
    }

    fn create_framebuffer(&self) -> Result<WebGlFramebuffer, GraphicsError> {
        self.gl
            .create_framebuffer()
            .ok_or(GraphicsError::ResourceCreation("framebuffer"))
    }

    fn bind_framebuffer(&self, framebuffer: Option<&WebGlFramebuffer>) {
        self.gl.bind_framebuffer(GL::FRAMEBUFFER, framebuffer);
    }

    fn attach_color_texture(&self, texture: &WebGlTexture) {
        self.gl.framebuffer_texture_2d(
            GL::FRAMEBUFFER,
            GL::COLOR_ATTACHMENT0,
            GL::TEXTURE_2D,
            Some(texture),
            0,
        );
    }

    fn create_renderbuffer(&self) -> Result<WebGlRenderbuffer, GraphicsError> {
        self.gl
            .create_renderbuffer()
            .ok_or(GraphicsError::ResourceCreation("renderbuffer"))
    }

    fn allocate_depth_buffer(&self, renderbuffer: &WebGlRenderbuffer, width: i32, height: i32) {
        self.gl.bind_renderbuffer(GL::RENDERBUFFER, Some(renderbuffer));
        self.gl
            .renderbuffer_storage(GL::RENDERBUFFER, GL::DEPTH_COMPONENT16, width, height);
    }

    fn attach_depth_buffer(&self, renderbuffer: &WebGlRenderbuffer) {
        self.gl.framebuffer_renderbuffer(
            GL::FRAMEBUFFER,
            GL::DEPTH_ATTACHMENT,
            GL::RENDERBUFFER,
            Some(renderbuffer),
        );
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.gl.viewport(x, y, width, height);
    }

    fn clear(&self, color: Vec4) {
        let [r, g, b, a] = color;
        self.gl.clear_color(r, g, b, a);
        self.gl.clear_depth(1.0);
        self.gl
            .clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
    }

    fn enable_depth_test(&self) {
        self.gl.enable(GL::DEPTH_TEST);
        self.gl.depth_func(GL::LEQUAL);
    }

    fn get_error(&self) -> u32 {
        self.gl.get_error()
    }
}
