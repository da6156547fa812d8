/// Terminal frontend: drives the cube scene through the ASCII rasterizer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Stdout, Write};
use std::time::{Duration, Instant};

use cubes_core::{
    Camera, DemoConfig, DirectionalLight, FrameDriver, FrameTimer, Scene, StrategySelector,
};

pub mod logging;
pub mod renderer;

pub use renderer::{AsciiRenderer, CELL_ASPECT};

/// Main application struct for terminal 3D rendering
pub struct TerminalApp<W: Write = Stdout> {
    scene: Scene,
    camera: Camera,
    light: DirectionalLight,
    driver: FrameDriver,
    selector: StrategySelector,
    renderer: AsciiRenderer<W>,
    timer: FrameTimer,
    started: Instant,
    target_frame_time: Duration,
    running: bool,
    paused: bool,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp<Stdout> {
    pub fn new(config: &DemoConfig, target_fps: u32) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_writer(
            config,
            target_fps,
            width as usize,
            height as usize,
            stdout(),
        ))
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
        log::info!(
            "starting with {} objects, strategy {}",
            self.scene.len(),
            self.selector.current()
        );

        while self.running {
            let frame_start = Instant::now();

            // Drain all pending input before the frame snapshots the strategy
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(&event);
            }

            self.tick()?;

            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
            }
        }

        log::info!("stopped after {} frames", self.driver.frame_index());
        Ok(())
    }
}

impl<W: Write> TerminalApp<W> {
    pub fn with_writer(
        config: &DemoConfig,
        target_fps: u32,
        width: usize,
        height: usize,
        out: W,
    ) -> Self {
        let mut camera = Camera::from_config(&config.camera, width as u32, height as u32);
        camera.set_aspect(width as f32, height as f32 * CELL_ASPECT);
        let now = Instant::now();

        Self {
            scene: Scene::from_config(&config.scene),
            camera,
            light: config.light(),
            driver: config.driver(),
            selector: StrategySelector::new(config.animation.strategy),
            renderer: AsciiRenderer::new(width, height, out),
            timer: FrameTimer::new(),
            started: now,
            target_frame_time: Duration::from_millis(1000 / u64::from(target_fps.max(1))),
            running: true,
            paused: false,
            last_fps_sample: now,
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn selector(&self) -> &StrategySelector {
        &self.selector
    }

    pub fn driver(&self) -> &FrameDriver {
        &self.driver
    }

    pub fn renderer(&self) -> &AsciiRenderer<W> {
        &self.renderer
    }

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(width, height) => {
                self.renderer.resize(*width as usize, *height as usize);
                self.camera
                    .set_aspect(*width as f32, *height as f32 * CELL_ASPECT);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char(' ') => {
                self.paused = !self.paused;
            }
            KeyCode::Char(c) => {
                self.selector.handle_key(c.encode_utf8(&mut [0; 4]));
            }
            _ => {}
        }
    }

    /// Render one frame at the current monotonic time
    pub fn tick(&mut self) -> io::Result<()> {
        let elapsed = self.timer.delta(self.started.elapsed().as_secs_f64());
        self.step(elapsed)
    }

    /// Render one frame advancing the animation by `elapsed` seconds
    pub fn step(&mut self, elapsed: f32) -> io::Result<()> {
        let elapsed = if self.paused { 0.0 } else { elapsed };
        let strategy = self.selector.current();

        self.driver.frame(
            &self.scene,
            &self.camera,
            &self.light,
            strategy,
            elapsed,
            &mut self.renderer,
        )?;

        self.update_fps();
        let status = format!(
            "{} | FPS: {:.1} | angle {:.2} | {}{} | 1=spin 2=orbit-fixed 3=orbit-relative Space=pause Q=quit",
            env!("CARGO_PKG_NAME"),
            self.fps,
            self.driver.angle(),
            strategy,
            if self.paused { " (paused)" } else { "" },
        );

        let out = self.renderer.writer_mut();
        queue!(
            out,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(status),
            ResetColor
        )?;
        out.flush()
    }

    fn update_fps(&mut self) {
        self.frame_count += 1;
        let now = Instant::now();
        let window = now.duration_since(self.last_fps_sample);
        if window >= Duration::from_secs(1) {
            self.fps = self.frame_count as f32 / window.as_secs_f32();
            self.frame_count = 0;
            self.last_fps_sample = now;
        }
    }
}
