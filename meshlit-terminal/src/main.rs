/// meshlit terminal viewer - spins a Phong-lit mesh in the terminal
///
/// Usage: meshlit-terminal [mesh.obj]
/// Without a path a built-in cube is shown.
/// Controls:
///   - W/S, A/D, E/R: rotation axis sliders
///   - J/L, I/K, U/O: light direction sliders
///   - Q/ESC: Quit
use meshlit_core::{parse_obj, MeshBuffer};
use meshlit_terminal::TerminalApp;
use std::env;
use std::fs;
use std::io;

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mesh = match env::args().nth(1) {
        Some(path) => load_mesh(&path)?,
        None => {
            log::info!("no mesh file given, using the built-in cube");
            MeshBuffer::cube(2.0)
        }
    };

    println!("Loaded {} triangles", mesh.triangle_count());
    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(&mesh)?;
    app.run()
}

fn load_mesh(path: &str) -> io::Result<MeshBuffer> {
    println!("Loading mesh file: {}", path);

    let text = fs::read_to_string(path).map_err(|e| {
        io::Error::new(e.kind(), format!("Failed to retrieve [{}]: {}", path, e))
    })?;

    parse_obj(&text).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Failed to parse mesh: {}", e),
        )
    })
}
