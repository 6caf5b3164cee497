/// Per-frame scene state and its configuration
use crate::error::MeshError;
use crate::math::{identity, rotate, translate, Mat4, Vec4};
use crate::mesh::MeshData;
use crate::shapes;
use std::collections::HashMap;
use std::f32::consts::{PI, TAU};

/// Every spin multiple the primitives use (1, 0.7, 0.5, 0.3) completes a
/// whole number of turns over this period, so `rotation` wraps on it.
pub const ROTATION_PERIOD: f32 = 20.0 * PI;

/// Browser key codes for the movement keys.
pub mod key {
    pub const LEFT: u32 = 37;
    pub const UP: u32 = 38;
    pub const RIGHT: u32 = 39;
    pub const DOWN: u32 = 40;
    pub const A: u32 = 65;
    pub const D: u32 = 68;
    pub const S: u32 = 83;
    pub const W: u32 = 87;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Model spin in radians per second.
    pub rotation_speed: f32,
    /// Camera orbit in radians per second while a turn key is held.
    pub turn_speed: f32,
    /// Camera dolly in units per second while a zoom key is held.
    pub zoom_speed: f32,
    pub initial_distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub clear_color: Vec4,
    pub light_direction: Vec4,
    pub sphere_subdivisions: u32,
    pub cylinder_segments: u32,
    /// Render into an offscreen texture and composite it onto the canvas.
    pub offscreen: bool,
    pub offscreen_size: (i32, i32),
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fov: 60.0 * PI / 180.0,
            near: 0.1,
            far: 100.0,
            rotation_speed: 1.0,
            turn_speed: 1.5,
            zoom_speed: 4.0,
            initial_distance: 8.0,
            min_distance: 3.0,
            max_distance: 30.0,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            light_direction: [0.5, 0.7, 1.0, 0.0],
            sphere_subdivisions: shapes::DEFAULT_SPHERE_SUBDIVISIONS,
            cylinder_segments: shapes::DEFAULT_CYLINDER_SEGMENTS,
            offscreen: false,
            offscreen_size: (512, 512),
        }
    }
}

impl SceneConfig {
    pub fn with_fov_degrees(mut self, degrees: f32) -> Self {
        self.fov = degrees * PI / 180.0;
        self
    }

    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    pub fn with_rotation_speed(mut self, speed: f32) -> Self {
        self.rotation_speed = speed;
        self
    }

    pub fn with_camera_speeds(mut self, turn: f32, zoom: f32) -> Self {
        self.turn_speed = turn;
        self.zoom_speed = zoom;
        self
    }

    pub fn with_initial_distance(mut self, distance: f32) -> Self {
        self.initial_distance = distance.clamp(self.min_distance, self.max_distance);
        self
    }

    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self.initial_distance = self.initial_distance.clamp(min, max);
        self
    }

    pub fn with_clear_color(mut self, color: Vec4) -> Self {
        self.clear_color = color;
        self
    }

    pub fn with_light_direction(mut self, direction: Vec4) -> Self {
        self.light_direction = direction;
        self
    }

    pub fn with_sphere_subdivisions(mut self, subdivisions: u32) -> Self {
        self.sphere_subdivisions = subdivisions;
        self
    }

    pub fn with_cylinder_segments(mut self, segments: u32) -> Self {
        self.cylinder_segments = segments;
        self
    }

    pub fn with_offscreen(mut self, width: i32, height: i32) -> Self {
        self.offscreen = true;
        self.offscreen_size = (width, height);
        self
    }
}

/// Which keys are held down, by key code.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    pressed: HashMap<u32, bool>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, code: u32) {
        self.pressed.insert(code, true);
    }

    pub fn release(&mut self, code: u32) {
        self.pressed.insert(code, false);
    }

    pub fn is_pressed(&self, code: u32) -> bool {
        self.pressed.get(&code).copied().unwrap_or(false)
    }

    fn any_pressed(&self, codes: &[u32]) -> bool {
        codes.iter().any(|&code| self.is_pressed(code))
    }

    /// -1, 0 or 1 depending on which of the two key groups is held.
    fn axis(&self, negative: &[u32], positive: &[u32]) -> f32 {
        let mut value = 0.0;
        if self.any_pressed(negative) {
            value -= 1.0;
        }
        if self.any_pressed(positive) {
            value += 1.0;
        }
        value
    }
}

/// The four primitives the scene shows, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Cube,
    Octahedron,
    Sphere,
    Cylinder,
}

impl Primitive {
    pub const ALL: [Primitive; 4] = [
        Primitive::Cube,
        Primitive::Octahedron,
        Primitive::Sphere,
        Primitive::Cylinder,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Cube => "cube",
            Primitive::Octahedron => "octahedron",
            Primitive::Sphere => "sphere",
            Primitive::Cylinder => "cylinder",
        }
    }

    pub fn next(&self) -> Primitive {
        match self {
            Primitive::Cube => Primitive::Octahedron,
            Primitive::Octahedron => Primitive::Sphere,
            Primitive::Sphere => Primitive::Cylinder,
            Primitive::Cylinder => Primitive::Cube,
        }
    }

    /// Generates the mesh with the tessellation `config` asks for.
    pub fn mesh(&self, config: &SceneConfig) -> Result<MeshData, MeshError> {
        match self {
            Primitive::Cube => Ok(shapes::cube()),
            Primitive::Octahedron => Ok(shapes::octahedron()),
            Primitive::Sphere => shapes::sphere(config.sphere_subdivisions),
            Primitive::Cylinder => shapes::cylinder(config.cylinder_segments),
        }
    }

    /// Where the primitive sits in the scene.
    fn offset(&self) -> [f32; 3] {
        match self {
            Primitive::Cube => [-3.0, 0.0, 0.0],
            Primitive::Octahedron => [-1.0, 1.0, 0.0],
            Primitive::Sphere => [1.0, -1.0, 0.0],
            Primitive::Cylinder => [3.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    /// Accumulated model spin in radians, kept in `[0, ROTATION_PERIOD)`.
    pub rotation: f32,
    /// Camera orbit around the Y axis in radians, kept in `[0, TAU)`.
    pub camera_angle: f32,
    pub camera_distance: f32,
    last_time: Option<f64>,
}

impl SceneState {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            rotation: 0.0,
            camera_angle: 0.0,
            camera_distance: config.initial_distance,
            last_time: None,
        }
    }

    /// Moves the scene to timestamp `now_ms` and returns the elapsed seconds.
    /// The first frame and any backwards step report zero.
    pub fn advance(&mut self, now_ms: f64, keys: &KeyState, config: &SceneConfig) -> f32 {
        let elapsed = match self.last_time {
            Some(last) => ((now_ms - last) * 0.001).max(0.0) as f32,
            None => 0.0,
        };
        self.last_time = Some(now_ms);

        self.rotation = (self.rotation + elapsed * config.rotation_speed).rem_euclid(ROTATION_PERIOD);

        let turn = keys.axis(&[key::A, key::LEFT], &[key::D, key::RIGHT]);
        self.camera_angle = (self.camera_angle + turn * config.turn_speed * elapsed).rem_euclid(TAU);

        let zoom = keys.axis(&[key::W, key::UP], &[key::S, key::DOWN]);
        self.camera_distance = (self.camera_distance + zoom * config.zoom_speed * elapsed)
            .clamp(config.min_distance, config.max_distance);

        elapsed
    }

    /// Camera pulled back along -Z and orbited around the Y axis.
    pub fn view_matrix(&self) -> Mat4 {
        let view = translate(&identity(), [0.0, 0.0, -self.camera_distance]);
        rotate(&view, self.camera_angle, [0.0, 1.0, 0.0])
    }

    pub fn model_matrix(&self, primitive: Primitive) -> Mat4 {
        let placed = translate(&identity(), primitive.offset());
        let r = self.rotation;
        match primitive {
            Primitive::Cube => {
                let m = rotate(&placed, r, [0.0, 0.0, 1.0]);
                rotate(&m, r * 0.7, [0.0, 1.0, 0.0])
            }
            Primitive::Octahedron => rotate(&placed, r, [0.0, 1.0, 0.0]),
            Primitive::Sphere => rotate(&placed, r * 0.5, [1.0, 1.0, 0.0]),
            Primitive::Cylinder => rotate(&placed, r, [1.0, 0.0, 0.0]),
        }
    }

    /// Model matrices in [`Primitive::ALL`] order.
    pub fn model_matrices(&self) -> [Mat4; 4] {
        Primitive::ALL.map(|p| self.model_matrix(p))
    }
}
