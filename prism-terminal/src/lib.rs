/// Terminal preview of the prism scene
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use prism_core::math::{identity, multiply, perspective, rotate, Mat4};
use prism_core::scene::key;
use prism_core::{KeyState, MeshData, Primitive, SceneConfig, SceneState};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod logging;
pub mod renderer;

pub use logging::{init_logging, LoggingConfig};
pub use renderer::AsciiRenderer;

/// Scene settings that suit a terminal-sized viewport.
pub fn terminal_config() -> SceneConfig {
    SceneConfig::default()
        .with_distance_limits(2.5, 12.0)
        .with_initial_distance(4.0)
}

/// Maps a terminal key to the browser key code the scene understands.
pub fn key_code(code: KeyCode) -> Option<u32> {
    match code {
        KeyCode::Char('a') | KeyCode::Char('A') => Some(key::A),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(key::D),
        KeyCode::Char('w') | KeyCode::Char('W') => Some(key::W),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(key::S),
        KeyCode::Left => Some(key::LEFT),
        KeyCode::Right => Some(key::RIGHT),
        KeyCode::Up => Some(key::UP),
        KeyCode::Down => Some(key::DOWN),
        _ => None,
    }
}

/// Spin applied to the primitive on show.
pub fn spin_matrix(rotation: f32) -> Mat4 {
    let m = rotate(&identity(), rotation, [0.0, 0.0, 1.0]);
    let m = rotate(&m, rotation * 0.7, [0.0, 1.0, 0.0]);
    rotate(&m, rotation * 0.3, [1.0, 0.0, 0.0])
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    config: SceneConfig,
    state: SceneState,
    keys: KeyState,
    meshes: Vec<(Primitive, MeshData)>,
    current: usize,
    renderer: AsciiRenderer,
    running: bool,
    started: Instant,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: SceneConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        let mut meshes = Vec::with_capacity(Primitive::ALL.len());
        for primitive in Primitive::ALL {
            let mesh = primitive
                .mesh(&config)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            meshes.push((primitive, mesh));
        }

        let [lx, ly, lz, _] = config.light_direction;
        Ok(Self {
            state: SceneState::new(&config),
            keys: KeyState::new(),
            meshes,
            current: 0,
            renderer: AsciiRenderer::new(width as usize, height as usize, [lx, ly, lz]),
            running: true,
            started: Instant::now(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            config,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.update();
            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => match code {
                KeyCode::Char('q') | KeyCode::Esc => self.running = false,
                KeyCode::Tab => {
                    self.current = (self.current + 1) % self.meshes.len();
                    log::info!("showing {}", self.primitive().name());
                }
                other => {
                    if let Some(code) = key_code(other) {
                        self.keys.press(code);
                    }
                }
            },
            Event::Resize(width, height) => self.renderer.resize(width as usize, height as usize),
            _ => {}
        }
    }

    pub fn primitive(&self) -> Primitive {
        self.meshes[self.current].0
    }

    fn update(&mut self) {
        let now_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        self.state.advance(now_ms, &self.keys, &self.config);

        // Terminals only report presses; a key counts as held for the frame
        // its press (or auto-repeat) arrived in.
        self.keys = KeyState::new();
    }

    fn render(&mut self) -> io::Result<()> {
        let projection = perspective(
            self.config.fov,
            self.renderer.aspect(),
            self.config.near,
            self.config.far,
        );
        let view_projection = multiply(&projection, &self.state.view_matrix());
        let model = spin_matrix(self.state.rotation);

        self.renderer.clear();
        let (_, mesh) = &self.meshes[self.current];
        self.renderer.render_mesh(mesh, &model, &view_projection);

        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Prism | {} | FPS: {:.1} | A/D/Arrows=Orbit W/S=Zoom Tab=Next Q=Quit",
                self.primitive().name(),
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
