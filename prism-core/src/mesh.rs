/// Triangle soup building blocks and the flat vertex arrays uploaded to the GPU
use crate::error::MeshError;
use crate::math::{cross, normalize, sub, Vec3, Vec4};

/// Three points wound counter-clockwise when seen from the front.
pub type Triangle = [Vec3; 3];

/// A triangle plus an optional color, used while assembling a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub triangle: Triangle,
    pub color: Option<Vec4>,
}

impl Fragment {
    pub fn new(triangle: Triangle) -> Self {
        Self {
            triangle,
            color: None,
        }
    }

    pub fn with_color(triangle: Triangle, color: Vec4) -> Self {
        Self {
            triangle,
            color: Some(color),
        }
    }
}

/// Unit normal of the triangle's front face.
pub fn face_normal(triangle: &Triangle) -> Vec3 {
    let [a, b, c] = *triangle;
    normalize(cross(sub(b, a), sub(c, a)))
}

/// Flat, mutually consistent vertex arrays ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    positions: Vec<f32>,
    normals: Vec<f32>,
    colors: Vec<f32>,
    indices: Vec<u16>,
}

impl MeshData {
    /// Largest vertex count a `u16` index buffer can address.
    pub const MAX_VERTICES: usize = u16::MAX as usize + 1;

    pub fn new(
        positions: Vec<f32>,
        normals: Vec<f32>,
        colors: Vec<f32>,
        indices: Vec<u16>,
    ) -> Result<Self, MeshError> {
        if positions.len() % 3 != 0 {
            return Err(MeshError::LengthMismatch {
                attribute: "position",
                expected: positions.len() / 3 * 3,
                actual: positions.len(),
            });
        }
        let vertex_count = positions.len() / 3;
        if vertex_count > Self::MAX_VERTICES {
            return Err(MeshError::TooManyVertices(vertex_count));
        }
        if normals.len() != vertex_count * 3 {
            return Err(MeshError::LengthMismatch {
                attribute: "normal",
                expected: vertex_count * 3,
                actual: normals.len(),
            });
        }
        if colors.len() != vertex_count * 4 {
            return Err(MeshError::LengthMismatch {
                attribute: "color",
                expected: vertex_count * 4,
                actual: colors.len(),
            });
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexCount(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        Ok(Self {
            positions,
            normals,
            colors,
            indices,
        })
    }

    /// For the fixed tables in `shapes`; checked in debug builds only.
    pub(crate) fn from_static(
        positions: Vec<f32>,
        normals: Vec<f32>,
        colors: Vec<f32>,
        indices: Vec<u16>,
    ) -> Self {
        debug_assert!(
            Self::new(positions.clone(), normals.clone(), colors.clone(), indices.clone()).is_ok()
        );
        Self {
            positions,
            normals,
            colors,
            indices,
        }
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn position(&self, vertex: usize) -> Vec3 {
        let p = &self.positions[vertex * 3..vertex * 3 + 3];
        [p[0], p[1], p[2]]
    }

    pub fn normal(&self, vertex: usize) -> Vec3 {
        let n = &self.normals[vertex * 3..vertex * 3 + 3];
        [n[0], n[1], n[2]]
    }

    pub fn color(&self, vertex: usize) -> Vec4 {
        let c = &self.colors[vertex * 4..vertex * 4 + 4];
        [c[0], c[1], c[2], c[3]]
    }

    /// Resolves the index buffer back into triangles.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                self.position(tri[0] as usize),
                self.position(tri[1] as usize),
                self.position(tri[2] as usize),
            ]
        })
    }
}

/// Accumulates un-indexed triangles; every pushed triangle gets three fresh
/// vertices and sequential indices.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    positions: Vec<f32>,
    normals: Vec<f32>,
    colors: Vec<f32>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(triangles * 9),
            normals: Vec::with_capacity(triangles * 9),
            colors: Vec::with_capacity(triangles * 12),
        }
    }

    /// Flattens fragments using their face normals; fragments without a color
    /// take `default_color`.
    pub fn from_fragments(fragments: &[Fragment], default_color: Vec4) -> Self {
        let mut builder = Self::with_capacity(fragments.len());
        for fragment in fragments {
            builder.push_flat(&fragment.triangle, fragment.color.unwrap_or(default_color));
        }
        builder
    }

    /// Pushes a triangle shaded with its own face normal.
    pub fn push_flat(&mut self, triangle: &Triangle, color: Vec4) {
        let normal = face_normal(triangle);
        self.push(triangle, [normal; 3], color);
    }

    /// Pushes a triangle with explicit per-vertex normals.
    pub fn push(&mut self, triangle: &Triangle, normals: [Vec3; 3], color: Vec4) {
        for (point, normal) in triangle.iter().zip(normals.iter()) {
            self.positions.extend_from_slice(point);
            self.normals.extend_from_slice(normal);
            self.colors.extend_from_slice(&color);
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn build(self) -> Result<MeshData, MeshError> {
        let vertex_count = self.vertex_count();
        if vertex_count > MeshData::MAX_VERTICES {
            return Err(MeshError::TooManyVertices(vertex_count));
        }
        let indices = (0..vertex_count).map(|i| i as u16).collect();
        MeshData::new(self.positions, self.normals, self.colors, indices)
    }
}
