use std::any::Any;
use std::env;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use pollster::block_on;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use flashlight_walkthrough::app::{print_final_state, run_frames};
use flashlight_walkthrough::{FrameGlobals, Renderer, Walkthrough};

const WINDOW_WIDTH: f64 = 1280.0;
const WINDOW_HEIGHT: f64 = 720.0;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse(env::args().skip(1))?;
    let walk = Walkthrough::new((WINDOW_WIDTH / WINDOW_HEIGHT) as f32)
        .context("failed to build the walkthrough scene")?;
    println!("Built scene with {} nodes", walk.scene().len());

    if options.headless {
        return run_headless(walk, options.frames.unwrap_or(1));
    }

    match run_interactive(walk.clone(), options.frames) {
        Ok(()) => Ok(()),
        Err(err) if err.downcast_ref::<WindowInitError>().is_some() => {
            eprintln!(
                "{err}. Falling back to --headless mode (set DISPLAY or install X11 libs to enable rendering)."
            );
            run_headless(walk, options.frames.unwrap_or(1))
        }
        Err(err) => Err(err),
    }
}

fn run_headless(mut walk: Walkthrough, frames: u64) -> Result<()> {
    run_frames(&mut walk, frames);
    println!("Ran {} frame(s)", walk.frame_count());
    print_final_state(&walk);
    walk.shutdown();
    Ok(())
}

fn run_interactive(walk: Walkthrough, max_frames: Option<u64>) -> Result<()> {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let event_loop = event_loop
        .map_err(|panic| WindowInitError::from_panic("event loop", panic))?
        .map_err(|err| WindowInitError::from_error("event loop", err))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = AppState {
        walk,
        renderer: None,
        max_frames,
        last_error: None,
    };
    event_loop
        .run_app(&mut app)
        .context("event loop terminated abnormally")?;

    if let Some(err) = app.last_error {
        return Err(err);
    }
    print_final_state(&app.walk);
    app.walk.shutdown();
    Ok(())
}

struct AppState {
    walk: Walkthrough,
    renderer: Option<Renderer>,
    max_frames: Option<u64>,
    last_error: Option<anyhow::Error>,
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        self.last_error = Some(err);
        event_loop.exit();
    }

    fn create_renderer(&self, event_loop: &ActiveEventLoop) -> Result<Renderer> {
        let attributes = Window::default_attributes()
            .with_title("Flashlight Walkthrough")
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .map_err(|err| WindowInitError::from_error("window", err))?,
        );
        block_on(Renderer::new(window))
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };

        self.walk.update();
        let globals = FrameGlobals::from_scene(self.walk.scene(), self.walk.camera())?;
        renderer.update_globals(&globals);
        match renderer.render(self.walk.scene()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = renderer.window().inner_size();
                renderer.resize(size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(anyhow!("GPU is out of memory"));
            }
            Err(wgpu::SurfaceError::Timeout) => {
                info!("Surface timeout; retrying next frame");
            }
            Err(other) => {
                warn!("Skipping frame: {other}");
            }
        }

        if self
            .max_frames
            .is_some_and(|max| self.walk.frame_count() >= max)
        {
            event_loop.exit();
        }
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }
        match self.create_renderer(event_loop) {
            Ok(renderer) => {
                self.walk.set_aspect(renderer.aspect());
                info!("Renderer ready, entering main loop");
                self.renderer = Some(renderer);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        if window_id != renderer.window_id() {
            return;
        }
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                renderer.resize(size);
                let aspect = renderer.aspect();
                self.walk.set_aspect(aspect);
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw(event_loop) {
                    self.fail(event_loop, err);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.renderer.as_ref() {
            renderer.window().request_redraw();
        }
    }
}

#[derive(Debug)]
struct WindowInitError {
    message: String,
}

impl WindowInitError {
    fn from_panic(stage: &str, panic: Box<dyn Any + Send>) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {}", panic_message(panic)),
        }
    }

    fn from_error(stage: &str, err: impl fmt::Display) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {err}"),
        }
    }
}

impl fmt::Display for WindowInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for WindowInitError {}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}

#[derive(Debug, PartialEq)]
struct CliOptions {
    headless: bool,
    frames: Option<u64>,
}

impl CliOptions {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut headless = false;
        let mut frames = None;
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--headless" => headless = true,
                "--frames" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--frames expects a frame count"))?;
                    let count = value
                        .parse::<u64>()
                        .with_context(|| format!("invalid frame count: {value}"))?;
                    frames = Some(count);
                }
                other => {
                    return Err(anyhow!(
                        "Unknown argument: {other}. Usage: flashlight-walkthrough [--headless] [--frames <N>]"
                    ));
                }
            }
        }
        Ok(Self { headless, frames })
    }
}
