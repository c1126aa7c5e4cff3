//! Application event loop.
//!
//! Bridges winit and the GPU [`Context`] to the windowless [`Viewer`]. Each
//! frame follows the same pattern:
//! 1. Translate window events into [`InputEvent`]s and hand them to the viewer
//! 2. Advance the viewer by the elapsed time
//! 3. Collect the frame's render commands and batch them per pipeline
//! 4. Upload the camera uniform and instance data, then draw and present
//!
//! Picking happens on a right click: the handles of the current frame are
//! rendered into an ID texture and the texel under the cursor is read back.

use std::{iter, sync::Arc};

use instant::Instant;

use wgpu::util::DeviceExt;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{
    config::ViewerConfig,
    context::Context,
    data_structures::{
        component::{MeshAsset, Shading},
        model::DrawMesh,
        texture::Texture,
    },
    input::{Control, InputEvent, Key, MouseButton},
    pick::GpuPixelReader,
    pipelines::handle::HandleRaw,
    render::Batches,
    resources,
    robot::RobotParts,
    viewer::{SceneAssets, Viewer},
};

/// GPU context and the scene it renders.
#[derive(Debug)]
pub struct AppState {
    pub(crate) ctx: Context,
    viewer: Viewer,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, config: &ViewerConfig) -> anyhow::Result<Self> {
        let mut ctx = Context::new(window, config).await?;
        let assets = load_scene_assets(&mut ctx, config).await;
        let viewer = Viewer::new(config, &assets)?;
        Ok(Self {
            ctx,
            viewer,
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
        }
    }

    /// Hand one input event to the viewer. Only a right click needs the pick buffer,
    /// so the handle instances are only gathered then.
    fn dispatch(&mut self, event: InputEvent, async_runtime: &tokio::runtime::Runtime) -> Control {
        let handles: Vec<HandleRaw> = match event {
            InputEvent::MouseButton {
                button: MouseButton::Right,
                pressed: true,
                ..
            } => self
                .viewer
                .draw()
                .handles()
                .flat_map(|(points, base_id)| HandleRaw::from_handle(&points, base_id))
                .collect(),
            _ => Vec::new(),
        };
        let mut pixels = GpuPixelReader::new(&self.ctx, async_runtime, handles);
        self.viewer.handle_event(event, &mut pixels)
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let batches = {
            let frame = self.viewer.draw();
            self.ctx
                .camera
                .uniform
                .update_view_proj(&frame.view, &frame.projection, frame.eye);
            Batches::from_frame(&frame)
        };
        self.ctx.queue.write_buffer(
            &self.ctx.camera.buffer,
            0,
            bytemuck::cast_slice(&[self.ctx.camera.uniform]),
        );

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let device = &self.ctx.device;
        let mesh_instances: Vec<_> = batches
            .meshes
            .iter()
            .filter_map(|batch| {
                let Some(mesh) = self.ctx.mesh(batch.mesh) else {
                    log::warn!("no GPU mesh for {:?}, skipping", batch.mesh);
                    return None;
                };
                let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Mesh Instance Buffer"),
                    contents: bytemuck::cast_slice(&batch.instances),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                Some((batch.shading, mesh, buffer, batch.instances.len() as u32))
            })
            .collect();
        let line_buffer = (!batches.lines.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Line Vertex Buffer"),
                contents: bytemuck::cast_slice(&batches.lines),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });
        let handle_buffer = (!batches.handles.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Handle Instance Buffer"),
                contents: bytemuck::cast_slice(&batches.handles),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, &self.ctx.camera.bind_group, &[]);
            render_pass.set_bind_group(1, &self.ctx.environment.bind_group, &[]);

            // The skybox writes no depth, so everything else lands in front of it.
            if batches.skybox {
                render_pass.set_pipeline(&self.ctx.pipelines.skybox);
                render_pass.draw(0..3, 0..1);
            }

            for (shading, mesh, instances, amount) in &mesh_instances {
                let pipeline = match shading {
                    Shading::NormalColoring => &self.ctx.pipelines.normal_coloring,
                    Shading::ReflectionMap => &self.ctx.pipelines.reflection,
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_vertex_buffer(1, instances.slice(..));
                render_pass.draw_mesh_instanced(mesh, 0..*amount);
            }

            if let Some(lines) = &line_buffer {
                render_pass.set_pipeline(&self.ctx.pipelines.line);
                render_pass.set_vertex_buffer(0, lines.slice(..));
                render_pass.draw(0..batches.lines.len() as u32, 0..1);
            }

            if let Some(handles) = &handle_buffer {
                render_pass.set_pipeline(&self.ctx.pipelines.handle);
                render_pass.set_vertex_buffer(0, handles.slice(..));
                render_pass.draw(0..6, 0..batches.handles.len() as u32);
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// Load the meshes of the initial scene. A part that fails to load is left out
/// of the scene instead of aborting start-up.
async fn load_scene_assets(ctx: &mut Context, config: &ViewerConfig) -> SceneAssets {
    let mover = match load_mesh(ctx, config, &config.mover_mesh).await {
        Ok(asset) => Some(asset),
        Err(e) => {
            log::warn!("Running without the animated mesh: {:#}", e);
            None
        }
    };
    let robot = if config.show_robot {
        match load_robot(ctx, config).await {
            Ok(parts) => Some(parts),
            Err(e) => {
                log::warn!("Running without the robot: {:#}", e);
                None
            }
        }
    } else {
        None
    };
    SceneAssets { mover, robot }
}

async fn load_mesh(
    ctx: &mut Context,
    config: &ViewerConfig,
    file_name: &str,
) -> anyhow::Result<MeshAsset> {
    resources::load_model_obj(&config.asset_dir, file_name, &ctx.device, &mut ctx.meshes).await
}

async fn load_robot(ctx: &mut Context, config: &ViewerConfig) -> anyhow::Result<RobotParts> {
    let files = &config.robot;
    Ok(RobotParts {
        antenna: load_mesh(ctx, config, &files.antenna).await?,
        eyeball: load_mesh(ctx, config, &files.eyeball).await?,
        head: load_mesh(ctx, config, &files.head).await?,
        limb: load_mesh(ctx, config, &files.limb).await?,
        body: load_mesh(ctx, config, &files.body).await?,
    })
}

fn translate_key(code: KeyCode) -> Key {
    match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyE => Key::E,
        KeyCode::ShiftLeft => Key::LeftShift,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyN => Key::N,
        KeyCode::Escape => Key::Escape,
        _ => Key::Other,
    }
}

fn translate_button(button: winit::event::MouseButton) -> MouseButton {
    match button {
        winit::event::MouseButton::Left => MouseButton::Left,
        winit::event::MouseButton::Right => MouseButton::Right,
        _ => MouseButton::Other,
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    config: ViewerConfig,
    state: Option<AppState>,
    cursor: (f64, f64),
    last_time: Instant,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: ViewerConfig) -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            async_runtime,
            config,
            state: None,
            cursor: (0.0, 0.0),
            last_time: Instant::now(),
            error: None,
        })
    }

    fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                // Held keys only toggle once.
                if *repeat {
                    return None;
                }
                Some(InputEvent::Key {
                    key: translate_key(*code),
                    pressed: *state == ElementState::Pressed,
                })
            }
            WindowEvent::MouseInput { state, button, .. } => Some(InputEvent::MouseButton {
                button: translate_button(*button),
                pressed: state.is_pressed(),
                x: self.cursor.0,
                y: self.cursor.1,
            }),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x, position.y);
                Some(InputEvent::CursorMoved {
                    x: position.x,
                    y: position.y,
                })
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(dx, dy) => (f64::from(*dx), f64::from(*dy)),
                    MouseScrollDelta::PixelDelta(position) => (position.x, position.y),
                };
                Some(InputEvent::Scroll { dx, dy })
            }
            WindowEvent::Resized(size) => Some(InputEvent::Resized {
                width: size.width,
                height: size.height,
            }),
            _ => None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window_attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Cannot create the main window: {}", e);
                self.error = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        match self
            .async_runtime
            .block_on(AppState::new(window, &self.config))
        {
            Ok(mut state) => {
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
                state.dispatch(
                    InputEvent::Resized {
                        width: size.width,
                        height: size.height,
                    },
                    &self.async_runtime,
                );
                state.ctx.window.request_redraw();
                self.last_time = Instant::now();
                self.state = Some(state);
            }
            Err(e) => {
                log::error!("App initialization failed: {:#}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let input = self.translate(&event);
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        if let Some(input) = input {
            if let Control::Exit = state.dispatch(input, &self.async_runtime) {
                event_loop.exit();
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();
                state.viewer.update(dt.as_secs_f32());

                match state.render() {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Open the window and run the viewer until it exits.
pub fn run() -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let config = ViewerConfig::from_env();

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
