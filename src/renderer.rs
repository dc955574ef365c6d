//! Window surface plus every font session the demo draws with.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use par_text_config::Config;
use par_text_render::wgpu_backend::request_device;
use par_text_render::{Align, FontSession, StaticText, TextContext, Vec2, WgpuBackend};
use winit::window::Window;

use crate::scene::{self, MARGIN};

type Session = FontSession<WgpuBackend>;

struct ImmediateLabel {
    text: String,
    color: [f32; 4],
    position: Vec2<f32>,
    align: Align,
    rotation: f32,
}

struct StaticLabel {
    text: StaticText<WgpuBackend>,
    position: Vec2<f32>,
    align: Align,
    rotation: f32,
}

pub struct DemoRenderer {
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    background: wgpu::Color,
    context: TextContext<WgpuBackend>,
    main_font: Rc<RefCell<Session>>,
    fps_font: Option<Session>,
    digit_fonts: Vec<Session>,
    static_labels: Vec<StaticLabel>,
    immediate_labels: Vec<ImmediateLabel>,
    digit_lines: Vec<String>,
}

impl DemoRenderer {
    pub async fn new(window: Arc<Window>, config: &Config) -> Result<Self> {
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window.clone())?;
        let (adapter, device, queue) = request_device(&instance, &surface).await?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("Surface reports no supported formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let context = TextContext::new(WgpuBackend::new(device.clone(), queue, surface_format));
        let source = scene::font_source(&config.font);
        log::info!("Loading font {:?} at {}px", source, config.font.pixel_size);

        let main_font = FontSession::new(&context, &source, config.font.pixel_size)
            .with_context(|| format!("Failed to load font {:?}", source))?
            .into_shared();
        let fps_font = if config.show_fps {
            Some(FontSession::new(&context, &source, config.fps_pixel_size)?)
        } else {
            None
        };
        let digit_fonts = config
            .digit_sizes
            .iter()
            .map(|&size| FontSession::new(&context, &source, size))
            .collect::<Result<Vec<_>, _>>()?;

        let mut static_labels = Vec::new();
        let mut immediate_labels = Vec::new();
        for label in &config.labels {
            let position = scene::label_position(label);
            let align = scene::label_align(label);
            let rotation = label.rotation_degrees.to_radians();
            if label.static_text {
                static_labels.push(StaticLabel {
                    text: StaticText::new(Rc::clone(&main_font), &label.text, label.color),
                    position,
                    align,
                    rotation,
                });
            } else {
                immediate_labels.push(ImmediateLabel {
                    text: label.text.clone(),
                    color: label.color,
                    position,
                    align,
                    rotation,
                });
            }
        }

        log::info!(
            "Demo ready: {} sessions, {} static and {} immediate labels",
            context.session_count(),
            static_labels.len(),
            immediate_labels.len()
        );

        let [r, g, b, a] = config.window.background;
        Ok(Self {
            surface,
            surface_config,
            device,
            background: wgpu::Color {
                r: r.into(),
                g: g.into(),
                b: b.into(),
                a: a.into(),
            },
            context,
            main_font,
            fps_font,
            digit_fonts,
            static_labels,
            immediate_labels,
            digit_lines: scene::digit_lines(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    pub fn main_pixel_size(&self) -> u32 {
        self.main_font.borrow().pixel_size()
    }

    /// Resize the main font. Static labels pick up the change on their
    /// next render.
    pub fn set_main_pixel_size(&mut self, pixel_size: u32) {
        if let Err(e) = self.main_font.borrow_mut().resize(pixel_size) {
            log::warn!("Font resize to {}px failed: {}", pixel_size, e);
        }
    }

    pub fn render(&mut self, fps_label: &str) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timeout");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.context
            .backend_mut()
            .begin_frame(view, Some(self.background));
        self.draw_text(fps_label);
        self.context.backend_mut().finish_frame();

        output.present();
        Ok(())
    }

    fn draw_text(&mut self, fps_label: &str) {
        let window = Vec2::new(
            self.surface_config.width as f32,
            self.surface_config.height as f32,
        );

        for label in &mut self.static_labels {
            label
                .text
                .render_rotated(window, label.position, label.align, label.rotation);
        }

        {
            let mut main_font = self.main_font.borrow_mut();
            for label in &self.immediate_labels {
                main_font.render_rotated(
                    &label.text,
                    label.color,
                    window,
                    label.position,
                    label.align,
                    label.rotation,
                );
            }
        }

        if let Some(fps_font) = &mut self.fps_font {
            fps_font.render(
                fps_label,
                [0.6, 1.0, 0.6, 1.0],
                window,
                Vec2::new(MARGIN, MARGIN),
                Align::TOP_LEFT,
            );
        }

        // one right-aligned column per size, largest at the window edge
        let mut right = window.x - MARGIN;
        for font in self.digit_fonts.iter_mut().rev() {
            let line_height = font.line_height() as f32;
            let mut y = MARGIN;
            for line in &self.digit_lines {
                font.render(
                    line,
                    [0.9, 0.9, 0.9, 1.0],
                    window,
                    Vec2::new(right, y),
                    Align::new(
                        par_text_render::HorizontalAlign::Right,
                        par_text_render::VerticalAlign::Top,
                    ),
                );
                y += line_height;
            }
            right -= font.pixel_size() as f32 * 5.0;
        }
    }
}
