/// Draws the scene once per frame on any graphics context
use crate::error::Error;
use crate::fbo::OffscreenTarget;
use crate::graphics::{check_gl_error, GlError, GraphicsContext};
use crate::math::{ortho, perspective};
use crate::model::{Model, Quad};
use crate::scene::{Primitive, SceneConfig, SceneState};
use crate::shader::ShaderProgram;
use crate::shaders::{self, U_LIGHT_DIRECTION, U_PROJECTION, U_QUAD_MATRIX, U_TEXTURE, U_VIEW};

/// Offscreen pass resources, only built when the config asks for them.
struct Composite<C: GraphicsContext> {
    target: OffscreenTarget<C>,
    quad: Quad<C>,
    shader: ShaderProgram<C>,
}

pub struct Renderer<C: GraphicsContext> {
    config: SceneConfig,
    shader: ShaderProgram<C>,
    models: Vec<(Primitive, Model<C>)>,
    composite: Option<Composite<C>>,
}

impl<C: GraphicsContext> Renderer<C> {
    /// Compiles the shaders and uploads every primitive. A shader that fails
    /// to build is fatal.
    pub fn new(ctx: &C, config: SceneConfig) -> Result<Self, Error> {
        let shader = ShaderProgram::new(ctx, &shaders::LIT_COLOR)?;

        let mut models = Vec::with_capacity(Primitive::ALL.len());
        for primitive in Primitive::ALL {
            let mesh = primitive.mesh(&config)?;
            log::debug!(
                "uploading {} ({} triangles)",
                primitive.name(),
                mesh.triangle_count()
            );
            models.push((primitive, Model::new(ctx, &mesh)?));
        }

        let composite = if config.offscreen {
            let (width, height) = config.offscreen_size;
            let target = OffscreenTarget::new(ctx, width, height)?;
            target.unbind(ctx);
            Some(Composite {
                target,
                quad: Quad::new(ctx)?,
                shader: ShaderProgram::new(ctx, &shaders::TEXTURED)?,
            })
        } else {
            None
        };

        log::info!(
            "renderer ready: {} models, offscreen {}",
            models.len(),
            if composite.is_some() { "on" } else { "off" }
        );
        Ok(Self {
            config,
            shader,
            models,
            composite,
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Draws one frame into a `width` x `height` surface and returns the GL
    /// error reported afterwards, if any. Errors are logged, never acted on.
    pub fn render_frame(&self, ctx: &C, state: &SceneState, width: i32, height: i32) -> Option<GlError> {
        let aspect = if height > 0 {
            width as f32 / height as f32
        } else {
            1.0
        };

        match &self.composite {
            Some(composite) => composite.target.bind(ctx),
            None => {
                ctx.viewport(0, 0, width, height);
                ctx.clear(self.config.clear_color);
            }
        }
        ctx.enable_depth_test();

        let projection = perspective(self.config.fov, aspect, self.config.near, self.config.far);
        self.shader.use_program(ctx);
        self.shader.set_matrix(ctx, U_PROJECTION, &projection);
        self.shader.set_matrix(ctx, U_VIEW, &state.view_matrix());
        self.shader
            .set_vec4(ctx, U_LIGHT_DIRECTION, self.config.light_direction);

        for (primitive, model) in &self.models {
            model.draw(ctx, &state.model_matrix(*primitive), &self.shader);
        }

        if let Some(composite) = &self.composite {
            composite.target.unbind(ctx);
            ctx.viewport(0, 0, width, height);
            ctx.clear(self.config.clear_color);

            composite.shader.use_program(ctx);
            ctx.active_texture(0);
            composite.target.bind_texture(ctx);
            composite.shader.set_sampler(ctx, U_TEXTURE, 0);
            composite
                .shader
                .set_matrix(ctx, U_QUAD_MATRIX, &ortho(0.0, 1.0, 0.0, 1.0, -1.0, 1.0));
            composite.quad.draw(ctx, &composite.shader);
        }

        check_gl_error(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MeshError, ShaderError, ShaderStage};
    use crate::testing::{Call, RecordingContext};

    #[test]
    fn test_frame_draws_every_primitive() {
        let ctx = RecordingContext::new();
        let config = SceneConfig::default();
        let renderer = Renderer::new(&ctx, config.clone()).unwrap();
        let state = SceneState::new(&config);
        ctx.clear_calls();

        assert_eq!(renderer.render_frame(&ctx, &state, 800, 600), None);

        let calls = ctx.calls();
        assert_eq!(calls[0], Call::Viewport(0, 0, 800, 600));
        assert_eq!(calls[1], Call::Clear(config.clear_color));
        assert_eq!(calls[2], Call::EnableDepthTest);

        let draws: Vec<_> = calls
            .iter()
            .filter_map(|c| match c {
                Call::DrawIndexedTriangles(n) => Some(*n),
                _ => None,
            })
            .collect();
        // cube, octahedron, sphere at depth 2, 16-segment cylinder
        assert_eq!(draws, vec![36, 24, 128 * 3, 64 * 3]);

        let projection = perspective(config.fov, 800.0 / 600.0, config.near, config.far);
        assert!(calls.contains(&Call::UniformMatrix4 {
            name: Some(U_PROJECTION.to_string()),
            value: projection
        }));
        assert!(calls.contains(&Call::UniformVec4 {
            name: Some(U_LIGHT_DIRECTION.to_string()),
            value: config.light_direction
        }));
    }

    #[test]
    fn test_offscreen_frame_composites_texture() {
        let ctx = RecordingContext::new();
        let config = SceneConfig::default().with_offscreen(256, 256);
        let renderer = Renderer::new(&ctx, config.clone()).unwrap();
        let state = SceneState::new(&config);
        ctx.clear_calls();

        renderer.render_frame(&ctx, &state, 640, 480);

        let calls = ctx.calls();
        assert!(matches!(calls[0], Call::BindFramebuffer(Some(_))));
        assert_eq!(calls[1], Call::Viewport(0, 0, 256, 256));
        assert!(calls.contains(&Call::BindFramebuffer(None)));
        assert!(calls.contains(&Call::Viewport(0, 0, 640, 480)));
        assert!(calls.contains(&Call::UniformInt {
            name: Some(U_TEXTURE.to_string()),
            value: 0
        }));
        assert_eq!(ctx.count(|c| matches!(c, Call::DrawIndexedTriangles(_))), 5);
        assert_eq!(calls.last(), Some(&Call::DrawIndexedTriangles(6)));
    }

    #[test]
    fn test_gl_errors_are_reported_not_fatal() {
        let ctx = RecordingContext::new();
        let config = SceneConfig::default();
        let renderer = Renderer::new(&ctx, config.clone()).unwrap();
        let state = SceneState::new(&config);

        ctx.push_error(0x0502);
        assert_eq!(
            renderer.render_frame(&ctx, &state, 100, 100),
            Some(GlError::InvalidOperation)
        );
        assert_eq!(renderer.render_frame(&ctx, &state, 100, 100), None);
    }

    #[test]
    fn test_shader_failure_is_fatal() {
        let ctx = RecordingContext::failing_compile(ShaderStage::Vertex, "bad vertex");
        let result = Renderer::new(&ctx, SceneConfig::default());
        assert!(matches!(
            result,
            Err(Error::Shader(ShaderError::Compile {
                stage: ShaderStage::Vertex,
                ..
            }))
        ));
        assert_eq!(ctx.count(|c| matches!(c, Call::UploadVertices { .. })), 0);
    }

    #[test]
    fn test_mesh_config_errors_surface() {
        let ctx = RecordingContext::new();
        let config = SceneConfig::default().with_sphere_subdivisions(9);
        let result = Renderer::new(&ctx, config);
        assert!(matches!(
            result,
            Err(Error::Mesh(MeshError::SubdivisionTooDeep { requested: 9, .. }))
        ));
    }
}
