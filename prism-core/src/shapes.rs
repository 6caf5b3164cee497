/// Canonical primitives: cube, octahedron, subdivided sphere, cylinder and
/// the unit quad used for compositing
use crate::error::MeshError;
use crate::math::{normalize_vec3, sum, Vec3, Vec4};
use crate::mesh::{Fragment, MeshBuilder, MeshData, Triangle};

pub const CUBE_COLOR: Vec4 = [1.0, 1.0, 1.0, 1.0];
pub const OCTAHEDRON_COLOR: Vec4 = [0.1, 1.0, 0.9, 1.0];
pub const SPHERE_COLOR: Vec4 = [1.0, 0.0, 0.0, 1.0];
pub const CYLINDER_COLOR: Vec4 = [0.2, 0.2, 1.0, 1.0];

/// Depth 5 yields 8 * 4^5 * 3 = 24576 vertices; depth 6 no longer fits in a
/// 16-bit index buffer.
pub const MAX_SPHERE_SUBDIVISIONS: u32 = 5;
pub const DEFAULT_SPHERE_SUBDIVISIONS: u32 = 2;
pub const DEFAULT_CYLINDER_SEGMENTS: u32 = 16;

/// Axis-aligned cube spanning [-1, 1] with four vertices per face so every
/// face keeps a flat normal.
pub fn cube() -> MeshData {
    // Each face: normal, then corners counter-clockwise from outside.
    const FACES: [(Vec3, [Vec3; 4]); 6] = [
        // Front
        (
            [0.0, 0.0, 1.0],
            [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]],
        ),
        // Back
        (
            [0.0, 0.0, -1.0],
            [[-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0]],
        ),
        // Top
        (
            [0.0, 1.0, 0.0],
            [[-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0]],
        ),
        // Bottom
        (
            [0.0, -1.0, 0.0],
            [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]],
        ),
        // Right
        (
            [1.0, 0.0, 0.0],
            [[1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0]],
        ),
        // Left
        (
            [-1.0, 0.0, 0.0],
            [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]],
        ),
    ];

    let mut positions = Vec::with_capacity(24 * 3);
    let mut normals = Vec::with_capacity(24 * 3);
    let mut colors = Vec::with_capacity(24 * 4);
    let mut indices = Vec::with_capacity(36);

    for (face, (normal, corners)) in FACES.iter().enumerate() {
        let base = (face * 4) as u16;
        for corner in corners {
            positions.extend_from_slice(corner);
            normals.extend_from_slice(normal);
            colors.extend_from_slice(&CUBE_COLOR);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData::from_static(positions, normals, colors, indices)
}

const OCTAHEDRON_VERTICES: [Vec3; 6] = [
    [1.0, 0.0, 0.0],
    [0.0, -1.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, -1.0],
    [0.0, 0.0, 1.0],
];

const OCTAHEDRON_FACES: [[u16; 3]; 8] = [
    [0, 4, 3],
    [0, 1, 4],
    [2, 3, 4],
    [1, 2, 4],
    [0, 3, 5],
    [2, 5, 3],
    [1, 5, 2],
    [0, 5, 1],
];

/// The eight outward-wound faces of the unit octahedron.
pub fn octahedron_triangles() -> Vec<Triangle> {
    OCTAHEDRON_FACES
        .iter()
        .map(|face| face.map(|i| OCTAHEDRON_VERTICES[i as usize]))
        .collect()
}

/// Unit octahedron with six shared vertices. The corner directions are
/// already unit length, so they double as normals.
pub fn octahedron() -> MeshData {
    let positions: Vec<f32> = OCTAHEDRON_VERTICES.iter().flatten().copied().collect();
    let normals = positions.clone();
    let colors = OCTAHEDRON_COLOR.repeat(OCTAHEDRON_VERTICES.len());
    let indices = OCTAHEDRON_FACES.iter().flatten().copied().collect();

    MeshData::from_static(positions, normals, colors, indices)
}

/// Splits every triangle into four, pushing the edge midpoints out to the
/// unit sphere. Winding is preserved.
pub fn subdivide(triangles: &[Triangle]) -> Vec<Triangle> {
    let mut out = Vec::with_capacity(triangles.len() * 4);
    for &[a, b, c] in triangles {
        let d = normalize_vec3(sum(a, b));
        let e = normalize_vec3(sum(b, c));
        let f = normalize_vec3(sum(a, c));

        out.push([a, d, f]);
        out.push([d, b, e]);
        out.push([f, e, c]);
        out.push([d, e, f]);
    }
    out
}

/// Sphere approximation: the octahedron subdivided `subdivisions` times,
/// giving `8 * 4^subdivisions` triangles.
pub fn sphere_triangles(subdivisions: u32) -> Vec<Triangle> {
    (0..subdivisions).fold(octahedron_triangles(), |tris, _| subdivide(&tris))
}

/// Flat-shaded unit sphere.
pub fn sphere(subdivisions: u32) -> Result<MeshData, MeshError> {
    if subdivisions > MAX_SPHERE_SUBDIVISIONS {
        return Err(MeshError::SubdivisionTooDeep {
            requested: subdivisions,
            max: MAX_SPHERE_SUBDIVISIONS,
        });
    }
    let fragments: Vec<Fragment> = sphere_triangles(subdivisions)
        .into_iter()
        .map(Fragment::new)
        .collect();
    MeshBuilder::from_fragments(&fragments, SPHERE_COLOR).build()
}

/// Points on the unit circle, `segments + 1` of them so the last closes the loop.
fn circle(segments: u32) -> Vec<[f32; 2]> {
    (0..=segments)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::TAU / segments as f32;
            [angle.sin(), angle.cos()]
        })
        .collect()
}

/// Closed unit cylinder along Z from -1 to 1: per segment two wall triangles
/// and one triangle for each cap.
pub fn cylinder_triangles(segments: u32) -> Vec<Triangle> {
    let top_center = [0.0, 0.0, 1.0];
    let bottom_center = [0.0, 0.0, -1.0];

    circle(segments)
        .windows(2)
        .flat_map(|pair| {
            let [x1, y1] = pair[0];
            let [x2, y2] = pair[1];
            let e = [x1, y1, -1.0];
            let f = [x1, y1, 1.0];
            let g = [x2, y2, 1.0];
            let h = [x2, y2, -1.0];
            [[e, f, h], [f, g, h], [f, top_center, g], [h, bottom_center, e]]
        })
        .collect()
}

/// Cylinder with smooth radial wall normals and flat cap normals.
pub fn cylinder(segments: u32) -> Result<MeshData, MeshError> {
    if segments == 0 {
        return Err(MeshError::NoSegments);
    }

    let mut builder = MeshBuilder::with_capacity(segments as usize * 4);
    for tri in cylinder_triangles(segments) {
        let normals = if tri.iter().all(|p| p[2] == tri[0][2]) {
            // Both vertices and centre share z, so this is a cap.
            [[0.0, 0.0, tri[0][2]]; 3]
        } else {
            tri.map(|[x, y, _]| [x, y, 0.0])
        };
        builder.push(&tri, normals, CYLINDER_COLOR);
    }
    builder.build()
}

/// Corner positions of the [0, 1] square in the z = 0 plane.
pub const UNIT_QUAD_POSITIONS: [f32; 12] = [
    0.0, 0.0, 0.0, //
    1.0, 0.0, 0.0, //
    1.0, 1.0, 0.0, //
    0.0, 1.0, 0.0,
];
pub const UNIT_QUAD_INDICES: [u16; 6] = [0, 2, 3, 0, 1, 2];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{dot, length};
    use crate::mesh::face_normal;

    /// Every triangle's winding must agree with the normals stored on its vertices.
    fn assert_normals_follow_winding(mesh: &MeshData) {
        for tri in mesh.indices().chunks_exact(3) {
            let points = [tri[0], tri[1], tri[2]].map(|i| mesh.position(i as usize));
            let face = face_normal(&points);
            for &i in tri {
                assert!(
                    dot(face, mesh.normal(i as usize)) > 0.0,
                    "normal of vertex {} disagrees with winding",
                    i
                );
            }
        }
    }

    #[test]
    fn test_cube_layout() {
        let cube = cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert_normals_follow_winding(&cube);
        for v in 0..cube.vertex_count() {
            assert_eq!(cube.color(v), CUBE_COLOR);
            assert!(cube.position(v).iter().all(|c| c.abs() == 1.0));
        }
    }

    #[test]
    fn test_octahedron_layout() {
        let octo = octahedron();
        assert_eq!(octo.vertex_count(), 6);
        assert_eq!(octo.triangle_count(), 8);
        assert_normals_follow_winding(&octo);
        for v in 0..6 {
            assert_eq!(octo.normal(v), octo.position(v));
            assert!((length(octo.normal(v)) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_octahedron_faces_point_outward() {
        for tri in octahedron_triangles() {
            let centroid = sum(sum(tri[0], tri[1]), tri[2]);
            assert!(dot(face_normal(&tri), centroid) > 0.0);
        }
    }

    #[test]
    fn test_sphere_triangle_count() {
        for n in 0..=4 {
            assert_eq!(sphere_triangles(n).len(), 8 * 4usize.pow(n));
        }
    }

    #[test]
    fn test_sphere_vertices_on_unit_sphere() {
        for tri in sphere_triangles(3) {
            for p in tri {
                assert!((length(p) - 1.0).abs() < 5e-3, "vertex {:?} off the sphere", p);
            }
            let centroid = sum(sum(tri[0], tri[1]), tri[2]);
            assert!(dot(face_normal(&tri), centroid) > 0.0);
        }
    }

    #[test]
    fn test_sphere_mesh() {
        let mesh = sphere(2).unwrap();
        assert_eq!(mesh.triangle_count(), 128);
        assert_eq!(mesh.vertex_count(), 384);
        assert_eq!(mesh.color(0), SPHERE_COLOR);
        assert_normals_follow_winding(&mesh);

        assert!(sphere(MAX_SPHERE_SUBDIVISIONS).is_ok());
        assert_eq!(
            sphere(MAX_SPHERE_SUBDIVISIONS + 1),
            Err(MeshError::SubdivisionTooDeep {
                requested: 6,
                max: MAX_SPHERE_SUBDIVISIONS
            })
        );
    }

    #[test]
    fn test_cylinder_triangle_count() {
        assert_eq!(cylinder_triangles(DEFAULT_CYLINDER_SEGMENTS).len(), 64);
        assert_eq!(cylinder_triangles(3).len(), 12);
    }

    #[test]
    fn test_cylinder_normals() {
        let mesh = cylinder(DEFAULT_CYLINDER_SEGMENTS).unwrap();
        assert_eq!(mesh.triangle_count(), 64);
        assert_normals_follow_winding(&mesh);

        for v in 0..mesh.vertex_count() {
            let n = mesh.normal(v);
            assert!((length(n) - 1.0).abs() < 1e-5);
            if n[2] == 0.0 {
                // Wall normals point straight out from the axis.
                let p = mesh.position(v);
                assert!((n[0] - p[0]).abs() < 1e-6 && (n[1] - p[1]).abs() < 1e-6);
            } else {
                assert_eq!(n[2], mesh.position(v)[2]);
            }
        }
    }

    #[test]
    fn test_cylinder_requires_segments() {
        assert_eq!(cylinder(0), Err(MeshError::NoSegments));
    }

    #[test]
    fn test_unit_quad_faces_forward() {
        let corner = |i: u16| {
            let i = i as usize * 3;
            [
                UNIT_QUAD_POSITIONS[i],
                UNIT_QUAD_POSITIONS[i + 1],
                UNIT_QUAD_POSITIONS[i + 2],
            ]
        };
        for tri in UNIT_QUAD_INDICES.chunks_exact(3) {
            let points = [corner(tri[0]), corner(tri[1]), corner(tri[2])];
            assert_eq!(face_normal(&points), [0.0, 0.0, 1.0]);
        }
    }
}
