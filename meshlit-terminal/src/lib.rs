/// Terminal host for the lit mesh viewer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use meshlit_core::{InputSnapshot, MeshBuffer, RenderLoop, SceneConfig, ShaderSources};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

const LIGHT_RANGE: (f32, f32) = (0.0, 100.0);
const LIGHT_STEP: f32 = 5.0;
const ROTATE_RANGE: (f32, f32) = (0.0, 10.0);
const ROTATE_STEP: f32 = 0.5;

/// Slider positions the demo starts with: light up and to the left, tumbling spin
const START_INPUTS: InputSnapshot = InputSnapshot {
    light: [35.0, 65.0, 80.0],
    rotate: [7.0, 8.0, 5.5],
};

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    render_loop: RenderLoop<AsciiRenderer>,
    inputs: InputSnapshot,
    running: bool,
    started: Instant,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: &MeshBuffer) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        // leave the top row for the status line
        let renderer = AsciiRenderer::new(width as usize, height.saturating_sub(1) as usize);
        let render_loop = RenderLoop::new(
            renderer,
            mesh,
            &ShaderSources::new("", ""),
            SceneConfig::default(),
        )
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

        Ok(Self {
            render_loop,
            inputs: START_INPUTS,
            running: true,
            started: Instant::now(),
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
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
                self.handle_input()?;
            }

            let now = self.started.elapsed().as_secs_f64() * 1000.0;
            let frame = self.render_loop.advance(now, &self.inputs);
            log::trace!("frame {:?}", frame);

            self.present()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_fps_sample).as_secs() >= 1 {
                self.fps =
                    self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
            if kind != KeyEventKind::Release {
                self.apply_key(code);
            }
        }
        Ok(())
    }

    /// Nudge a slider (or quit) for one key press
    pub fn apply_key(&mut self, code: KeyCode) {
        let (sliders, axis, step, range) = match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
                return;
            }
            KeyCode::Char('w') | KeyCode::Up => {
                (&mut self.inputs.rotate, 0, ROTATE_STEP, ROTATE_RANGE)
            }
            KeyCode::Char('s') | KeyCode::Down => {
                (&mut self.inputs.rotate, 0, -ROTATE_STEP, ROTATE_RANGE)
            }
            KeyCode::Char('d') | KeyCode::Right => {
                (&mut self.inputs.rotate, 1, ROTATE_STEP, ROTATE_RANGE)
            }
            KeyCode::Char('a') | KeyCode::Left => {
                (&mut self.inputs.rotate, 1, -ROTATE_STEP, ROTATE_RANGE)
            }
            KeyCode::Char('e') => (&mut self.inputs.rotate, 2, ROTATE_STEP, ROTATE_RANGE),
            KeyCode::Char('r') => (&mut self.inputs.rotate, 2, -ROTATE_STEP, ROTATE_RANGE),
            KeyCode::Char('l') => (&mut self.inputs.light, 0, LIGHT_STEP, LIGHT_RANGE),
            KeyCode::Char('j') => (&mut self.inputs.light, 0, -LIGHT_STEP, LIGHT_RANGE),
            KeyCode::Char('i') => (&mut self.inputs.light, 1, LIGHT_STEP, LIGHT_RANGE),
            KeyCode::Char('k') => (&mut self.inputs.light, 1, -LIGHT_STEP, LIGHT_RANGE),
            KeyCode::Char('o') => (&mut self.inputs.light, 2, LIGHT_STEP, LIGHT_RANGE),
            KeyCode::Char('u') => (&mut self.inputs.light, 2, -LIGHT_STEP, LIGHT_RANGE),
            _ => return,
        };
        sliders[axis] = (sliders[axis] + step).clamp(range.0, range.1);
    }

    pub fn inputs(&self) -> &InputSnapshot {
        &self.inputs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn present(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 1))?;
        self.render_loop.context().present(&mut stdout)?;

        let [lx, ly, lz] = self.inputs.light;
        let [rx, ry, rz] = self.inputs.rotate;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "meshlit | FPS: {:.1} | light {lx:.0}/{ly:.0}/{lz:.0} (JL IK UO) | \
                 rotate {rx:.1}/{ry:.1}/{rz:.1} (WS AD ER) | Q=Quit",
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
