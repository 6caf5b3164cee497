/// Column-major 4x4 matrix, laid out the way GL uniforms expect it:
/// element (row, col) lives at `col * 4 + row`. Every transform returns a new
/// matrix; `multiply_into` is the in/out form for per-frame buffers.
pub type Mat4 = [f32; 16];
pub type Vec3 = [f32; 3];
pub type Vec4 = [f32; 4];

/// Shear amounts, `xy` is how much x grows per unit of y and so on.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Shear {
    pub xy: f32,
    pub xz: f32,
    pub yx: f32,
    pub yz: f32,
    pub zx: f32,
    pub zy: f32,
}

pub fn identity() -> Mat4 {
    let mut out = [0.0; 16];
    out[0] = 1.0;
    out[5] = 1.0;
    out[10] = 1.0;
    out[15] = 1.0;
    out
}

/// Computes `a * b`.
pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [0.0; 16];
    multiply_into(&mut out, a, b);
    out
}

/// Writes `a * b` into `out`.
pub fn multiply_into(out: &mut Mat4, a: &Mat4, b: &Mat4) {
    for col in 0..4 {
        for row in 0..4 {
            out[col * 4 + row] = a[row] * b[col * 4]
                + a[4 + row] * b[col * 4 + 1]
                + a[8 + row] * b[col * 4 + 2]
                + a[12 + row] * b[col * 4 + 3];
        }
    }
}

/// Returns `matrix * T(vector)`.
pub fn translate(matrix: &Mat4, vector: Vec3) -> Mat4 {
    let [x, y, z] = vector;
    let mut out = *matrix;
    for row in 0..4 {
        out[12 + row] = matrix[row] * x + matrix[4 + row] * y + matrix[8 + row] * z + matrix[12 + row];
    }
    out
}

/// Returns `matrix * S(factors)`.
pub fn scale(matrix: &Mat4, factors: Vec3) -> Mat4 {
    let mut out = *matrix;
    for (col, factor) in factors.iter().enumerate() {
        for row in 0..4 {
            out[col * 4 + row] *= factor;
        }
    }
    out
}

/// Returns `matrix * R(axis, radians)`.
///
/// The axis is normalized by its exact length. A zero axis has no direction
/// and produces NaN entries.
pub fn rotate(matrix: &Mat4, radians: f32, axis: Vec3) -> Mat4 {
    let len = 1.0 / length(axis);
    let (x, y, z) = (axis[0] * len, axis[1] * len, axis[2] * len);

    let (s, c) = radians.sin_cos();
    let t = 1.0 - c;

    let mut rotation = identity();
    rotation[0] = x * x * t + c;
    rotation[1] = y * x * t + z * s;
    rotation[2] = z * x * t - y * s;
    rotation[4] = x * y * t - z * s;
    rotation[5] = y * y * t + c;
    rotation[6] = z * y * t + x * s;
    rotation[8] = x * z * t + y * s;
    rotation[9] = y * z * t - x * s;
    rotation[10] = z * z * t + c;

    multiply(matrix, &rotation)
}

/// Returns `matrix * H(shear)`.
pub fn shear(matrix: &Mat4, shear: Shear) -> Mat4 {
    let mut h = identity();
    h[4] = shear.xy;
    h[8] = shear.xz;
    h[1] = shear.yx;
    h[9] = shear.yz;
    h[2] = shear.zx;
    h[6] = shear.zy;
    multiply(matrix, &h)
}

pub fn transpose(matrix: &Mat4) -> Mat4 {
    let mut out = [0.0; 16];
    for col in 0..4 {
        for row in 0..4 {
            out[row * 4 + col] = matrix[col * 4 + row];
        }
    }
    out
}

/// Applies the matrix to a homogeneous vector.
pub fn transform(matrix: &Mat4, v: Vec4) -> Vec4 {
    let mut out = [0.0; 4];
    for (row, value) in out.iter_mut().enumerate() {
        *value = matrix[row] * v[0] + matrix[4 + row] * v[1] + matrix[8 + row] * v[2] + matrix[12 + row] * v[3];
    }
    out
}

/// Symmetric perspective projection with NDC depth in [-1, 1].
pub fn perspective(fovy: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fovy / 2.0).tan();
    let nf = 1.0 / (near - far);
    let mut out = [0.0; 16];
    out[0] = f / aspect;
    out[5] = f;
    out[10] = (far + near) * nf;
    out[11] = -1.0;
    out[14] = 2.0 * far * near * nf;
    out
}

/// Off-axis perspective projection from explicit near-plane bounds.
pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let rl = 1.0 / (right - left);
    let tb = 1.0 / (top - bottom);
    let nf = 1.0 / (near - far);
    let mut out = [0.0; 16];
    out[0] = 2.0 * near * rl;
    out[5] = 2.0 * near * tb;
    out[8] = (right + left) * rl;
    out[9] = (top + bottom) * tb;
    out[10] = (far + near) * nf;
    out[11] = -1.0;
    out[14] = 2.0 * far * near * nf;
    out
}

pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let lr = 1.0 / (left - right);
    let bt = 1.0 / (bottom - top);
    let nf = 1.0 / (near - far);
    let mut out = identity();
    out[0] = -2.0 * lr;
    out[5] = -2.0 * bt;
    out[10] = 2.0 * nf;
    out[12] = (left + right) * lr;
    out[13] = (top + bottom) * bt;
    out[14] = (far + near) * nf;
    out
}

pub fn dot(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Vector (cross) product `a x b`.
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn length(v: Vec3) -> f32 {
    dot(v, v).sqrt()
}

pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Approximates `1 / sqrt(x)` with the `0x5f3759df` bit trick and one Newton
/// step. Relative error stays under 0.2% for positive finite input.
pub fn fast_inv_sqrt(x: f32) -> f32 {
    let half = 0.5 * x;
    let bits = 0x5f37_59df_u32.wrapping_sub(x.to_bits() >> 1);
    let y = f32::from_bits(bits);
    y * (1.5 - half * y * y)
}

/// Approximate normalization through [`fast_inv_sqrt`]. Only used for
/// shading-grade directions; the zero vector stays zero.
pub fn normalize_vec3(v: Vec3) -> Vec3 {
    let inv = fast_inv_sqrt(dot(v, v));
    [v[0] * inv, v[1] * inv, v[2] * inv]
}

/// Component-wise sum of two equally sized vectors.
pub fn sum<const N: usize>(a: [f32; N], b: [f32; N]) -> [f32; N] {
    let mut out = a;
    for (o, value) in out.iter_mut().zip(b) {
        *o += value;
    }
    out
}

/// Exact normalization for any vector size.
pub fn normalize<const N: usize>(v: [f32; N]) -> [f32; N] {
    let len = v.iter().map(|c| c * c).sum::<f32>().sqrt();
    v.map(|c| c / len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Matrix4, Point3, Unit, Vector3};
    use std::f32::consts::PI;

    const EPS: f32 = 1e-5;

    fn sample() -> Mat4 {
        let m = translate(&identity(), [1.5, -2.0, 3.0]);
        let m = rotate(&m, 0.7, [0.3, 1.0, -0.2]);
        scale(&m, [2.0, 0.5, 1.25])
    }

    fn assert_mat_eq(a: &Mat4, b: &Mat4, eps: f32) {
        for i in 0..16 {
            assert!((a[i] - b[i]).abs() < eps, "element {i}: {} != {}", a[i], b[i]);
        }
    }

    fn from_nalgebra(m: &Matrix4<f32>) -> Mat4 {
        let mut out = [0.0; 16];
        out.copy_from_slice(m.as_slice());
        out
    }

    #[test]
    fn test_identity_multiply() {
        let m = sample();
        assert_mat_eq(&multiply(&identity(), &m), &m, EPS);
        assert_mat_eq(&multiply(&m, &identity()), &m, EPS);
    }

    #[test]
    fn test_multiply_matches_nalgebra() {
        let a = sample();
        let b = perspective(1.0, 1.5, 0.1, 50.0);
        let expected = Matrix4::from_column_slice(&a) * Matrix4::from_column_slice(&b);
        assert_mat_eq(&multiply(&a, &b), &from_nalgebra(&expected), 1e-4);
    }

    #[test]
    fn test_multiply_into_reuses_buffer() {
        let mut out = [7.0; 16];
        let a = sample();
        multiply_into(&mut out, &a, &identity());
        assert_mat_eq(&out, &a, EPS);
    }

    #[test]
    fn test_full_turn_rotation() {
        let m = sample();
        for axis in [[1.0, 0.0, 0.0], [0.0, 3.0, 0.0], [1.0, 2.0, -3.0]] {
            assert_mat_eq(&rotate(&m, 2.0 * PI, axis), &m, 1e-4);
        }
    }

    #[test]
    fn test_rotate_matches_nalgebra() {
        let axis = Unit::new_normalize(Vector3::new(0.3, 1.0, -0.2));
        let expected = Matrix4::from_axis_angle(&axis, 0.9);
        let actual = rotate(&identity(), 0.9, [0.3, 1.0, -0.2]);
        assert_mat_eq(&actual, &from_nalgebra(&expected), EPS);
    }

    #[test]
    fn test_rotate_zero_axis_is_nan() {
        let m = rotate(&identity(), 1.0, [0.0, 0.0, 0.0]);
        assert!(m[0].is_nan());
    }

    #[test]
    fn test_translate_and_scale_match_nalgebra() {
        let expected = Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0))
            * Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 3.0, 4.0));
        let actual = scale(&translate(&identity(), [1.0, 2.0, 3.0]), [2.0, 3.0, 4.0]);
        assert_mat_eq(&actual, &from_nalgebra(&expected), EPS);
    }

    #[test]
    fn test_shear_moves_x_with_y() {
        let m = shear(&identity(), Shear { xy: 2.0, ..Shear::default() });
        let p = transform(&m, [1.0, 3.0, 0.0, 1.0]);
        assert!((p[0] - 7.0).abs() < EPS);
        assert!((p[1] - 3.0).abs() < EPS);
    }

    #[test]
    fn test_transpose_twice() {
        let m = sample();
        assert_eq!(transpose(&transpose(&m)), m);
        assert_eq!(transpose(&m)[1], m[4]);
    }

    #[test]
    fn test_cross_is_orthogonal() {
        let pairs = [
            ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([1.0, 2.0, 3.0], [-4.0, 0.5, 2.0]),
            ([0.3, -0.7, 0.1], [5.0, 5.0, -5.0]),
        ];
        for (a, b) in pairs {
            let c = cross(a, b);
            assert!(dot(c, a).abs() < 1e-4);
            assert!(dot(c, b).abs() < 1e-4);
        }
        assert_eq!(cross([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_fast_normalize() {
        let n = normalize_vec3([3.0, 4.0, 0.0]);
        assert!((n[0] - 0.6).abs() < 0.6 * 0.002);
        assert!((n[1] - 0.8).abs() < 0.8 * 0.002);
        assert_eq!(n[2], 0.0);
        assert!((length(n) - 1.0).abs() < 0.002);
    }

    #[test]
    fn test_fast_inv_sqrt_error_bound() {
        for x in [0.01_f32, 0.5, 1.0, 2.0, 25.0, 1234.5] {
            let exact = 1.0 / x.sqrt();
            assert!(((fast_inv_sqrt(x) - exact) / exact).abs() < 0.002);
        }
    }

    #[test]
    fn test_normalize_zero_stays_zero() {
        assert_eq!(normalize_vec3([0.0, 0.0, 0.0]), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_sum_and_exact_normalize() {
        assert_eq!(sum([1.0, 2.0, 3.0, 4.0], [1.0, 1.0, 1.0, 1.0]), [2.0, 3.0, 4.0, 5.0]);
        let n = normalize([0.0, 3.0, 0.0, 4.0]);
        assert!((n[1] - 0.6).abs() < EPS);
        assert!((n[3] - 0.8).abs() < EPS);
    }

    #[test]
    fn test_perspective_depth_range() {
        let (near, far) = (0.1, 100.0);
        let p = perspective(PI / 3.0, 4.0 / 3.0, near, far);
        let clip = transform(&p, [0.0, 0.0, -near, 1.0]);
        assert!((clip[2] / clip[3] + 1.0).abs() < 1e-4);
        let clip = transform(&p, [0.0, 0.0, -far, 1.0]);
        assert!((clip[2] / clip[3] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_perspective_matches_nalgebra() {
        let expected = Matrix4::new_perspective(1.5, 1.0, 0.1, 100.0);
        assert_mat_eq(&perspective(1.0, 1.5, 0.1, 100.0), &from_nalgebra(&expected), 1e-4);
    }

    #[test]
    fn test_frustum_symmetric_equals_perspective() {
        let (near, far, fovy, aspect) = (0.5_f32, 20.0, 1.2_f32, 1.6);
        let top = near * (fovy / 2.0).tan();
        let right = top * aspect;
        let f = frustum(-right, right, -top, top, near, far);
        assert_mat_eq(&f, &perspective(fovy, aspect, near, far), 1e-4);
    }

    #[test]
    fn test_ortho_matches_nalgebra() {
        let expected = Matrix4::new_orthographic(-2.0, 3.0, -1.0, 4.0, 0.5, 10.0);
        let actual = ortho(-2.0, 3.0, -1.0, 4.0, 0.5, 10.0);
        assert_mat_eq(&actual, &from_nalgebra(&expected), EPS);

        let corner = transform(&ortho(0.0, 1.0, 0.0, 1.0, -1.0, 1.0), [1.0, 1.0, 0.0, 1.0]);
        assert!((corner[0] - 1.0).abs() < EPS && (corner[1] - 1.0).abs() < EPS);
    }

    #[test]
    fn test_transform_point_matches_nalgebra() {
        let m = sample();
        let expected = Matrix4::from_column_slice(&m).transform_point(&Point3::new(0.5, -1.0, 2.0));
        let actual = transform(&m, [0.5, -1.0, 2.0, 1.0]);
        assert!((actual[0] - expected.x).abs() < 1e-4);
        assert!((actual[1] - expected.y).abs() < 1e-4);
        assert!((actual[2] - expected.z).abs() < 1e-4);
    }
}
