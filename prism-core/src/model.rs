/// GPU-resident copies of mesh data and the draw call that binds them
use crate::error::GraphicsError;
use crate::graphics::GraphicsContext;
use crate::math::Mat4;
use crate::mesh::MeshData;
use crate::shader::ShaderProgram;
use crate::shaders::{A_COLOR, A_NORMAL, A_POSITION, U_MODEL};
use crate::shapes::{UNIT_QUAD_INDICES, UNIT_QUAD_POSITIONS};

/// Four buffers uploaded once at construction and never touched again.
pub struct Model<C: GraphicsContext> {
    positions: C::Buffer,
    normals: C::Buffer,
    colors: C::Buffer,
    indices: C::Buffer,
    index_count: i32,
}

impl<C: GraphicsContext> Model<C> {
    pub fn new(ctx: &C, mesh: &MeshData) -> Result<Self, GraphicsError> {
        let index_count = index_count(mesh.indices().len())?;

        let positions = ctx.create_buffer()?;
        ctx.upload_vertices(&positions, mesh.positions());
        let colors = ctx.create_buffer()?;
        ctx.upload_vertices(&colors, mesh.colors());
        let normals = ctx.create_buffer()?;
        ctx.upload_vertices(&normals, mesh.normals());
        let indices = ctx.create_buffer()?;
        ctx.upload_indices(&indices, mesh.indices());

        Ok(Self {
            positions,
            normals,
            colors,
            indices,
            index_count,
        })
    }

    pub fn index_count(&self) -> i32 {
        self.index_count
    }

    /// Binds every attribute the shader exposes, sets the model matrix and
    /// draws. The shader must already be in use.
    pub fn draw(&self, ctx: &C, model_matrix: &Mat4, shader: &ShaderProgram<C>) {
        if let Some(location) = shader.attribute(ctx, A_NORMAL) {
            ctx.bind_attribute(&self.normals, location, 3, true);
        }
        if let Some(location) = shader.attribute(ctx, A_POSITION) {
            ctx.bind_attribute(&self.positions, location, 3, false);
        }
        if let Some(location) = shader.attribute(ctx, A_COLOR) {
            ctx.bind_attribute(&self.colors, location, 4, false);
        }
        ctx.bind_index_buffer(&self.indices);
        shader.set_matrix(ctx, U_MODEL, model_matrix);
        ctx.draw_indexed_triangles(self.index_count);
    }
}

/// The `[0, 1]` square, positions only, for compositing a texture.
pub struct Quad<C: GraphicsContext> {
    positions: C::Buffer,
    indices: C::Buffer,
}

impl<C: GraphicsContext> Quad<C> {
    pub fn new(ctx: &C) -> Result<Self, GraphicsError> {
        let positions = ctx.create_buffer()?;
        ctx.upload_vertices(&positions, &UNIT_QUAD_POSITIONS);
        let indices = ctx.create_buffer()?;
        ctx.upload_indices(&indices, &UNIT_QUAD_INDICES);
        Ok(Self { positions, indices })
    }

    pub fn draw(&self, ctx: &C, shader: &ShaderProgram<C>) {
        if let Some(location) = shader.attribute(ctx, A_POSITION) {
            ctx.bind_attribute(&self.positions, location, 3, false);
        }
        ctx.bind_index_buffer(&self.indices);
        ctx.draw_indexed_triangles(UNIT_QUAD_INDICES.len() as i32);
    }
}

fn index_count(len: usize) -> Result<i32, GraphicsError> {
    i32::try_from(len).map_err(|_| GraphicsError::Backend(format!("{} indices exceed a single draw call", len)))
}
