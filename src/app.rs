//! Application entry point and winit event handling.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use par_text_config::{Config, MAX_PIXEL_SIZE};
use tokio::runtime::Runtime;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use crate::cli::RuntimeOptions;
use crate::fps::FpsCounter;
use crate::renderer::DemoRenderer;
use crate::scene;

/// Load the config named on the command line, or the default one, and
/// apply the command-line overrides.
pub fn load_config(options: &RuntimeOptions) -> Result<Config> {
    let config = match &options.config_path {
        Some(path) => {
            log::info!("Loading config from {:?}", path);
            Config::load_from(path)?
        }
        None => Config::load()?,
    };
    let config = scene::apply_overrides(config, options);
    config.validate()?;
    Ok(config)
}

pub struct App {
    runtime: Arc<Runtime>,
    config: Config,
    options: RuntimeOptions,
}

impl App {
    pub fn new(runtime: Arc<Runtime>, options: RuntimeOptions) -> Result<Self> {
        let config = load_config(&options)?;
        crate::debug::apply_config_level(config.log_level.to_level_filter());
        Ok(Self {
            runtime,
            config,
            options,
        })
    }

    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        // redraw continuously so the FPS counter stays live
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut state = AppState::new(self.runtime, self.config, self.options);
        event_loop.run_app(&mut state)?;

        match state.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

struct AppState {
    runtime: Arc<Runtime>,
    config: Config,
    exit_after: Option<Duration>,
    started: Instant,
    fps: FpsCounter,
    window: Option<Arc<Window>>,
    renderer: Option<DemoRenderer>,
    error: Option<anyhow::Error>,
}

impl AppState {
    fn new(runtime: Arc<Runtime>, config: Config, options: RuntimeOptions) -> Self {
        let now = Instant::now();
        Self {
            runtime,
            config,
            exit_after: options
                .exit_after
                .filter(|s| s.is_finite() && *s >= 0.0)
                .map(Duration::from_secs_f64),
            started: now,
            fps: FpsCounter::new(now),
            window: None,
            renderer: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn step_font_size(&mut self, grow: bool) {
        if let Some(renderer) = &mut self.renderer {
            let size = scene::stepped_size(renderer.main_pixel_size(), grow, MAX_PIXEL_SIZE);
            log::info!("Main font size -> {}px", size);
            renderer.set_main_pixel_size(size);
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.window.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, anyhow::anyhow!("Failed to create window: {}", e));
                return;
            }
        };

        let runtime = Arc::clone(&self.runtime);
        match runtime.block_on(DemoRenderer::new(window.clone(), &self.config)) {
            Ok(renderer) => {
                self.renderer = Some(renderer);
                self.window = Some(window);
            }
            Err(e) => self.fail(event_loop, e.context("Failed to initialize renderer")),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                match event.logical_key.as_ref() {
                    Key::Named(NamedKey::Escape) => event_loop.exit(),
                    Key::Character("+" | "=") => self.step_font_size(true),
                    Key::Character("-") => self.step_font_size(false),
                    _ => {}
                }
            }
            WindowEvent::RedrawRequested => {
                let label = {
                    self.fps.tick(Instant::now());
                    self.fps.label()
                };
                if let Some(renderer) = &mut self.renderer
                    && let Err(e) = renderer.render(&label)
                {
                    self.fail(event_loop, e);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(limit) = self.exit_after
            && self.started.elapsed() >= limit
        {
            log::info!("Exit timer elapsed after {:?}", limit);
            event_loop.exit();
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
