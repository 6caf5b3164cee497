/// Built-in shader variants
use crate::shader::{ShaderDescriptor, ShaderSource};

pub const A_POSITION: &str = "aVertexPosition";
pub const A_COLOR: &str = "aVertexColor";
pub const A_NORMAL: &str = "aVertexNorm";
pub const U_MODEL: &str = "uModelMatrix";
pub const U_VIEW: &str = "uViewMatrix";
pub const U_PROJECTION: &str = "uProjectionMatrix";
pub const U_LIGHT_DIRECTION: &str = "lightDirection";
pub const U_QUAD_MATRIX: &str = "u_matrix";
pub const U_TEXTURE: &str = "u_texture";

/// Per-vertex color with a single directional light; diffuse term is mapped
/// into [0.4, 1.0] so unlit faces never go black.
pub const LIT_COLOR: ShaderSource = ShaderSource {
    name: "lit-color",
    vertex: r#"
        attribute vec4 aVertexPosition;
        attribute vec4 aVertexColor;
        attribute vec4 aVertexNorm;

        uniform mat4 uModelMatrix;
        uniform mat4 uViewMatrix;
        uniform mat4 uProjectionMatrix;

        varying lowp vec4 worldNormal;
        varying lowp vec4 vColor;

        void main(void) {
            gl_Position = uProjectionMatrix * uViewMatrix * uModelMatrix * aVertexPosition;

            lowp vec4 norm = vec4(aVertexNorm.xyz, 0.0);
            worldNormal = uModelMatrix * normalize(norm);

            vColor = aVertexColor;
        }
    "#,
    fragment: r#"
        varying lowp vec4 vColor;
        varying lowp vec4 worldNormal;

        uniform lowp vec4 lightDirection;

        void main(void) {
            lowp float dp = dot(normalize(worldNormal), normalize(lightDirection)) * 0.6 + 0.4;
            lowp vec3 rgb = dp * vColor.rgb;
            gl_FragColor = vec4(rgb, 1.0);
        }
    "#,
    descriptor: ShaderDescriptor {
        attributes: &[A_POSITION, A_COLOR, A_NORMAL],
        uniforms: &[U_MODEL, U_VIEW, U_PROJECTION, U_LIGHT_DIRECTION],
    },
};

/// Draws the unit quad sampling a texture; texture coordinates are the quad's
/// own xy.
pub const TEXTURED: ShaderSource = ShaderSource {
    name: "textured",
    vertex: r#"
        attribute vec4 aVertexPosition;

        uniform mat4 u_matrix;

        varying vec2 v_texcoord;

        void main() {
            gl_Position = u_matrix * aVertexPosition;
            v_texcoord = aVertexPosition.xy;
        }
    "#,
    fragment: r#"
        precision mediump float;

        varying vec2 v_texcoord;

        uniform sampler2D u_texture;

        void main() {
            gl_FragColor = texture2D(u_texture, v_texcoord);
        }
    "#,
    descriptor: ShaderDescriptor {
        attributes: &[A_POSITION],
        uniforms: &[U_QUAD_MATRIX, U_TEXTURE],
    },
};
