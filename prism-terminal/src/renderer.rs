/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use prism_core::math::{dot, multiply, normalize, transform, Mat4, Vec3};
use prism_core::mesh::face_normal;
use prism_core::MeshData;
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// A vertex behind the eye plane clips the whole triangle.
const MIN_CLIP_W: f32 = 1e-3;

/// ASCII renderer that converts prism meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    light: Vec3,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize, light: Vec3) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            light: normalize(light),
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Terminal cells are roughly twice as tall as they are wide.
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / (self.height as f32 * 2.0)
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height, self.light);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    pub fn cell(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    pub fn color(&self, x: usize, y: usize) -> Color {
        self.color_buffer[y * self.width + x]
    }

    pub fn filled_cells(&self) -> usize {
        self.char_buffer.iter().filter(|&&c| c != ' ').count()
    }

    /// Rasterizes every front-facing triangle of `mesh`.
    pub fn render_mesh(&mut self, mesh: &MeshData, model: &Mat4, view_projection: &Mat4) {
        let mvp = multiply(view_projection, model);
        for tri in mesh.indices().chunks_exact(3) {
            let corners = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let color = mesh.color(corners[0]);

            let mut screen = [(0.0, 0.0, 0.0); 3];
            let mut world = [[0.0; 3]; 3];
            let mut clipped = false;
            for (i, &vertex) in corners.iter().enumerate() {
                let [x, y, z] = mesh.position(vertex);
                let clip = transform(&mvp, [x, y, z, 1.0]);
                if clip[3] < MIN_CLIP_W {
                    clipped = true;
                    break;
                }
                screen[i] = self.to_screen(clip);
                let w = transform(model, [x, y, z, 1.0]);
                world[i] = [w[0], w[1], w[2]];
            }
            if clipped {
                continue;
            }

            // Screen y grows downwards, so front faces come out clockwise.
            if signed_area(&screen) >= 0.0 {
                continue;
            }

            let shade = (dot(face_normal(&world), self.light) * 0.6 + 0.4).clamp(0.0, 1.0);
            let ramp_index = 1 + (shade * (LUMINOSITY_RAMP.len() - 2) as f32).round() as usize;
            let character = LUMINOSITY_RAMP[ramp_index.min(LUMINOSITY_RAMP.len() - 1)];
            let tint = Color::Rgb {
                r: channel(color[0], shade),
                g: channel(color[1], shade),
                b: channel(color[2], shade),
            };

            self.rasterize_triangle(&screen, character, tint);
        }
    }

    fn to_screen(&self, clip: [f32; 4]) -> (f32, f32, f32) {
        let ndc_x = clip[0] / clip[3];
        let ndc_y = clip[1] / clip[3];
        let ndc_z = clip[2] / clip[3];
        (
            (ndc_x + 1.0) * 0.5 * self.width as f32,
            (1.0 - ndc_y) * 0.5 * self.height as f32,
            ndc_z,
        )
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char, color: Color) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box, clipped to the screen
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) = barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py)) else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                if !(-1.0..=1.0).contains(&depth) {
                    continue;
                }
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                    self.color_buffer[idx] = color;
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(self.color_buffer[idx]))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn channel(value: f32, shade: f32) -> u8 {
    ((value * shade).clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Twice the signed area of the projected triangle.
fn signed_area(coords: &[(f32, f32, f32); 3]) -> f32 {
    let (a, b, c) = (coords[0], coords[1], coords[2]);
    (b.0 - a.0) * (c.1 - a.1) - (c.0 - a.0) * (b.1 - a.1)
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
