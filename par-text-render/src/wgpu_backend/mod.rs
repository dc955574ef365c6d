//! wgpu implementation of [`GpuBackend`].
//!
//! Drawing happens inside a frame: [`WgpuBackend::begin_frame`] opens a
//! command encoder targeting a texture view, every draw records a render
//! pass into it, and [`WgpuBackend::finish_frame`] submits. Vertex uploads
//! made during a frame are recorded as buffer copies on the same encoder,
//! so a buffer can be refilled between two draws of one frame.

mod pipeline;
mod texture;

pub use texture::{PageTexture, mip_chain, mip_level_count};

use par_text_fonts::{PageImage, PageUploader, Vertex};
use wgpu::util::DeviceExt;

use crate::backend::{DrawBatch, GpuBackend, TextUniforms};
use crate::error::RenderError;

/// Request an adapter and device able to present to `surface`.
pub async fn request_device(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'_>,
) -> Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue), RenderError> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(surface),
            force_fallback_adapter: false,
        })
        .await
        .map_err(|_| RenderError::AdapterNotFound)?;
    log::info!("Using GPU adapter: {}", adapter.get_info().name);

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("par-text device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::default(),
            ..Default::default()
        })
        .await?;

    Ok((adapter, device, queue))
}

/// Vertex storage for one session or static text.
#[derive(Debug, Default)]
pub struct VertexBuffer {
    buffer: Option<wgpu::Buffer>,
    capacity: u64,
    vertex_count: u32,
}

impl VertexBuffer {
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}

struct Frame {
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

/// Text renderer state shared by every font: device handles, the text
/// pipeline and the page sampler.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    uniform_layout: wgpu::BindGroupLayout,
    page_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    frame: Option<Frame>,
    draw_calls: u64,
}

impl std::fmt::Debug for WgpuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgpuBackend")
            .field("surface_format", &self.surface_format)
            .field("in_frame", &self.frame.is_some())
            .field("draw_calls", &self.draw_calls)
            .finish()
    }
}

/// Smallest vertex buffer allocation, in bytes
const MIN_VERTEX_BUFFER_SIZE: u64 = 4096;

impl WgpuBackend {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, surface_format: wgpu::TextureFormat) -> Self {
        let uniform_layout = pipeline::create_uniform_bind_group_layout(&device);
        let page_layout = pipeline::create_page_bind_group_layout(&device);
        let pipeline =
            pipeline::create_text_pipeline(&device, surface_format, &uniform_layout, &page_layout);
        let sampler = pipeline::create_page_sampler(&device);

        log::info!("Text pipeline created for {:?}", surface_format);

        Self {
            device,
            queue,
            surface_format,
            pipeline,
            uniform_layout,
            page_layout,
            sampler,
            frame: None,
            draw_calls: 0,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Total draw calls issued since creation.
    pub fn draw_calls(&self) -> u64 {
        self.draw_calls
    }

    pub fn in_frame(&self) -> bool {
        self.frame.is_some()
    }

    /// Start recording draws into `view`, optionally clearing it first.
    ///
    /// An unfinished previous frame is submitted.
    pub fn begin_frame(&mut self, view: wgpu::TextureView, clear: Option<wgpu::Color>) {
        if self.frame.is_some() {
            log::warn!("begin_frame called with a frame still open; submitting it");
            self.finish_frame();
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("text encoder"),
            });

        if let Some(color) = clear {
            encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("clear pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }

        self.frame = Some(Frame { view, encoder });
    }

    /// Submit the recorded frame. Returns false if no frame was open.
    pub fn finish_frame(&mut self) -> bool {
        let Some(frame) = self.frame.take() else {
            return false;
        };
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        true
    }

    fn ensure_capacity(&self, buffer: &mut VertexBuffer, size: u64) {
        if buffer.buffer.is_some() && buffer.capacity >= size {
            return;
        }
        let capacity = size.next_power_of_two().max(MIN_VERTEX_BUFFER_SIZE);
        log::trace!("Growing text vertex buffer to {} bytes", capacity);
        buffer.buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("text vertex buffer"),
            size: capacity,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        buffer.capacity = capacity;
    }
}

impl PageUploader for WgpuBackend {
    type Texture = PageTexture;

    fn upload_page(&mut self, image: PageImage) -> PageTexture {
        texture::create_page_texture(
            &self.device,
            &self.queue,
            &self.page_layout,
            &self.sampler,
            image,
        )
    }

    fn max_texture_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }
}

impl GpuBackend for WgpuBackend {
    type VertexBuffer = VertexBuffer;

    fn create_vertex_buffer(&mut self) -> VertexBuffer {
        VertexBuffer::default()
    }

    fn upload_vertices(&mut self, buffer: &mut VertexBuffer, vertices: &[Vertex]) {
        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        buffer.vertex_count = vertices.len() as u32;
        if bytes.is_empty() {
            return;
        }

        self.ensure_capacity(buffer, bytes.len() as u64);
        let Some(target) = buffer.buffer.as_ref() else {
            return;
        };

        match self.frame.as_mut() {
            Some(frame) => {
                let staging = self
                    .device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("text staging buffer"),
                        contents: bytes,
                        usage: wgpu::BufferUsages::COPY_SRC,
                    });
                frame
                    .encoder
                    .copy_buffer_to_buffer(&staging, 0, target, 0, bytes.len() as u64);
            }
            None => self.queue.write_buffer(target, 0, bytes),
        }
    }

    fn draw(
        &mut self,
        buffer: &VertexBuffer,
        batches: &[DrawBatch<'_, PageTexture>],
        uniforms: &TextUniforms,
    ) {
        let Some(frame) = self.frame.as_mut() else {
            log::warn!("Text draw outside a frame ignored; call begin_frame first");
            return;
        };
        let Some(vertex_buffer) = buffer.buffer.as_ref() else {
            return;
        };
        if batches.is_empty() {
            return;
        }

        let uniform_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("text uniform buffer"),
                contents: bytemuck::bytes_of(uniforms),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let uniform_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("text uniform bind group"),
            layout: &self.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let mut issued = 0;
        {
            let mut render_pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("text render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));

            for batch in batches {
                let end = batch.start + batch.count;
                if end > buffer.vertex_count {
                    log::warn!(
                        "Skipping draw of vertices {}..{} from a buffer of {}",
                        batch.start,
                        end,
                        buffer.vertex_count
                    );
                    continue;
                }
                render_pass.set_bind_group(1, &batch.texture.bind_group, &[]);
                render_pass.draw(batch.start..end, 0..1);
                issued += 1;
            }
        }
        self.draw_calls += issued;
    }
}
