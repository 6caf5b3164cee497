/// Prism Terminal Demo - Rotating primitives
///
/// Renders the cube, octahedron, sphere and cylinder as ASCII art.
/// Controls:
///   - A/D / Left/Right: Orbit the camera
///   - W/S / Up/Down: Zoom
///   - Tab: Next primitive
///   - Q/ESC: Quit

use prism_terminal::{init_logging, terminal_config, LoggingConfig, TerminalApp};
use std::io;

fn main() -> io::Result<()> {
    init_logging(LoggingConfig::default());

    println!("Prism Terminal Renderer - Loading...");
    let mut app = TerminalApp::new(terminal_config())?;

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    app.run()?;

    println!("Thank you for using Prism Terminal Renderer!");
    Ok(())
}
