//! Windowed presentation backend.
//!
//! A winit application that owns the window, a wgpu renderer implementing
//! the core [`Surface`] abstraction, and the simulation driver. Frames are
//! driven by the redraw cycle: the driver arms the next redraw before doing
//! any rendering work, mirroring per-frame callback scheduling.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use wgpu::util::DeviceExt;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

use crate::error::GpuError;
use crate::shader::{Instance, Uniforms, SHADER_SOURCE};
use crate::simulation::Simulation;
use crate::surface::{FrameScheduler, Surface};
use crate::time::Time;

/// Starting capacity of the instance buffer; grows if seeding exceeds it.
const INITIAL_INSTANCE_CAPACITY: usize = 256;

/// Scheduler backed by the window's redraw request.
///
/// Winit cannot un-request a redraw, so cancellation disarms the token: a
/// redraw delivered after `cancel` finds the driver stopped and the frame
/// is skipped there.
pub struct RedrawScheduler {
    window: Arc<Window>,
    next_token: u64,
    armed: Option<u64>,
}

impl RedrawScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next_token: 0,
            armed: None,
        }
    }
}

impl FrameScheduler for RedrawScheduler {
    type Handle = u64;

    fn request_frame(&mut self) -> u64 {
        self.next_token += 1;
        self.armed = Some(self.next_token);
        self.window.request_redraw();
        self.next_token
    }

    fn cancel(&mut self, handle: u64) {
        if self.armed == Some(handle) {
            self.armed = None;
        }
    }
}

/// wgpu renderer drawing particles as instanced glow quads.
///
/// Implements [`Surface`]: `clear` empties the per-frame instance list,
/// `fill_circle` appends to it, and [`GpuRenderer::present`] flushes the
/// list through the pipeline.
pub struct GpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    instances: Vec<Instance>,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
}

impl GpuRenderer {
    pub async fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| GpuError::NoAdapter)?;

        log::info!("rendering on {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("driftglow device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let uniforms = Uniforms {
            surface_size: [config.width as f32, config.height as f32],
            _pad: [0.0; 2],
        };

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (INITIAL_INSTANCE_CAPACITY * std::mem::size_of::<Instance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Glow Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Render Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Instance::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_pipeline,
            instance_buffer,
            instance_capacity: INITIAL_INSTANCE_CAPACITY,
            instances: Vec::new(),
            uniform_buffer,
            uniform_bind_group,
        })
    }

    fn grow_instance_buffer(&mut self, needed: usize) {
        let capacity = needed.next_power_of_two();
        self.instance_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (capacity * std::mem::size_of::<Instance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.instance_capacity = capacity;
    }

    /// Flush the instances buffered since the last `clear` to the screen.
    pub fn present(&mut self) -> Result<(), wgpu::SurfaceError> {
        if self.instances.len() > self.instance_capacity {
            self.grow_instance_buffer(self.instances.len());
        }
        if !self.instances.is_empty() {
            self.queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&self.instances));
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.02,
                            g: 0.02,
                            b: 0.05,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
            render_pass.draw(0..6, 0..self.instances.len() as u32);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Current surface size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}

impl Surface for GpuRenderer {
    fn set_dimensions(&mut self, width: f32, height: f32) {
        let (width, height) = (width as u32, height as u32);
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);

            let uniforms = Uniforms {
                surface_size: [width as f32, height as f32],
                _pad: [0.0; 2],
            };
            self.queue
                .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
        }
    }

    fn clear(&mut self) {
        self.instances.clear();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec3, opacity: f32, glow_radius: f32) {
        self.instances.push(Instance {
            center: center.to_array(),
            radius,
            opacity,
            color: color.to_array(),
            glow_radius,
        });
    }
}

/// The windowed animation application.
pub struct App {
    particle_count: usize,
    seed: Option<u64>,
    window: Option<Arc<Window>>,
    renderer: Option<GpuRenderer>,
    scheduler: Option<RedrawScheduler>,
    simulation: Option<Simulation<RedrawScheduler>>,
    time: Time,
}

impl App {
    pub fn new(particle_count: usize) -> Self {
        Self {
            particle_count,
            seed: None,
            window: None,
            renderer: None,
            scheduler: None,
            simulation: None,
            time: Time::new(),
        }
    }

    /// Fix the RNG seed, for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("driftglow")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let renderer = match pollster::block_on(GpuRenderer::new(window.clone())) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("failed to initialize renderer: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.renderer = Some(renderer);

        let size = window.inner_size();
        let simulation = match Simulation::new(size.width as f32, size.height as f32) {
            Ok(sim) => sim.with_particle_count(self.particle_count),
            Err(e) => {
                log::error!("failed to construct driver: {}", e);
                event_loop.exit();
                return;
            }
        };
        let mut simulation = match self.seed {
            Some(seed) => simulation.with_seed(seed),
            None => simulation,
        };

        let mut scheduler = RedrawScheduler::new(window);
        simulation.seed();
        simulation.start(&mut scheduler);
        self.scheduler = Some(scheduler);
        self.simulation = Some(simulation);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                if let (Some(sim), Some(sched)) =
                    (self.simulation.as_mut(), self.scheduler.as_mut())
                {
                    sim.stop(sched);
                }
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let (Some(sim), Some(renderer)) =
                    (self.simulation.as_mut(), self.renderer.as_mut())
                {
                    sim.resize(
                        renderer,
                        physical_size.width as f32,
                        physical_size.height as f32,
                    );
                }
            }
            WindowEvent::RedrawRequested => {
                if let (Some(sim), Some(renderer), Some(sched)) = (
                    self.simulation.as_mut(),
                    self.renderer.as_mut(),
                    self.scheduler.as_mut(),
                ) {
                    self.time.update();
                    if self.time.frame() % 240 == 0 {
                        log::debug!("{:.1} fps", self.time.fps());
                    }

                    sim.frame(renderer, sched);

                    match renderer.present() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => {
                            let (width, height) = renderer.size();
                            renderer.set_dimensions(width as f32, height as f32);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => eprintln!("Render error: {:?}", e),
                    }
                }
            }
            _ => {}
        }
    }
}
