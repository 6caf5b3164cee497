/// Offscreen render target: color texture plus depth renderbuffer
use crate::error::GraphicsError;
use crate::graphics::GraphicsContext;
use crate::math::Vec4;

/// Color the target is cleared to on every bind.
pub const OFFSCREEN_CLEAR_COLOR: Vec4 = [0.0, 0.0, 1.0, 1.0];

pub struct OffscreenTarget<C: GraphicsContext> {
    framebuffer: C::Framebuffer,
    texture: C::Texture,
    // Kept alive for the attachment.
    #[allow(dead_code)]
    depth: C::Renderbuffer,
    width: i32,
    height: i32,
}

impl<C: GraphicsContext> OffscreenTarget<C> {
    /// Allocates a `width` x `height` RGBA texture and a 16-bit depth buffer
    /// and attaches both to a new framebuffer. Leaves the framebuffer bound.
    pub fn new(ctx: &C, width: i32, height: i32) -> Result<Self, GraphicsError> {
        if width <= 0 || height <= 0 {
            return Err(GraphicsError::Backend(format!(
                "offscreen target must have a positive size, got {}x{}",
                width, height
            )));
        }

        let texture = ctx.create_texture()?;
        ctx.bind_texture(Some(&texture));
        ctx.allocate_texture(width, height)?;

        let framebuffer = ctx.create_framebuffer()?;
        ctx.bind_framebuffer(Some(&framebuffer));
        ctx.attach_color_texture(&texture);

        let depth = ctx.create_renderbuffer()?;
        ctx.allocate_depth_buffer(&depth, width, height);
        ctx.attach_depth_buffer(&depth);

        log::debug!("created {}x{} offscreen target", width, height);
        Ok(Self {
            framebuffer,
            texture,
            depth,
            width,
            height,
        })
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Redirects drawing into the target, resets the viewport to its size
    /// and clears it.
    pub fn bind(&self, ctx: &C) {
        ctx.bind_framebuffer(Some(&self.framebuffer));
        ctx.viewport(0, 0, self.width, self.height);
        ctx.clear(OFFSCREEN_CLEAR_COLOR);
    }

    pub fn unbind(&self, ctx: &C) {
        ctx.bind_framebuffer(None);
    }

    pub fn bind_texture(&self, ctx: &C) {
        ctx.bind_texture(Some(&self.texture));
    }
}
