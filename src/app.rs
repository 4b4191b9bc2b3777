//! Application event loop and the view session.
//!
//! A [`ViewSession`] is the explicit per-view object that owns everything
//! with view lifetime: GPU context, loaded parts, the environment and the
//! load timeline. It is constructed on mount and torn down by dropping it.
//!
//! Asynchronous completions (the environment fetch and each part fetch) are
//! delivered as user events tagged with the session generation they were
//! issued under. Tearing a view down bumps the generation, so a late
//! completion is recognized as stale and dropped instead of touching dead
//! resources. In-flight fetches are not aborted, their results just have
//! nowhere to land.
//!
//! # Per-frame flow
//!
//! 1. Render the scene (and schedule the next redraw)
//! 2. Advance the orbit controller and rewrite the camera uniform
//! 3. Poll the timeline; dispatch due load requests and speed changes

use std::{iter, sync::Arc};

use instant::Instant;
use wgpu::util::DeviceExt;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::Window,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::{
    context::{Context, MouseButtonState},
    data_structures::{
        geometry::MeshData,
        instance::Instance,
        model::{DrawModel, Model},
        texture::Texture,
    },
    material::MaterialResources,
    resources,
    resources::environment::{EnvironmentMap, EnvironmentResources},
    timeline::{Action, Timeline},
    view::ViewPreset,
};

/// Completions delivered back into the event loop.
pub enum ViewerEvent {
    /// WASM only: the asynchronously created context is ready.
    #[allow(dead_code)]
    Initialized(Box<Context>),
    EnvironmentReady {
        session: u64,
        map: EnvironmentMap,
    },
    MeshReady {
        session: u64,
        slot: usize,
        meshes: Vec<MeshData>,
    },
}

/// A part that made it into the scene: GPU model, material, placement.
struct LoadedPart {
    model: Model,
    material: MaterialResources,
    instance_buffer: wgpu::Buffer,
}

/// All mutable per-view state. Dropping the session releases the render
/// surface and every GPU resource of the view.
pub struct ViewSession {
    ctx: Context,
    is_surface_configured: bool,
    timeline: Timeline,
    /// Set once the environment arrived; load offsets count from here.
    epoch: Option<Instant>,
    environment: Option<EnvironmentResources>,
    parts: Vec<Option<LoadedPart>>,
}

impl ViewSession {
    fn new(ctx: Context, preset: &ViewPreset) -> Self {
        Self {
            ctx,
            is_surface_configured: false,
            timeline: Timeline::new(preset.steps.clone()),
            epoch: None,
            environment: None,
            parts: (0..preset.slots.len()).map(|_| None).collect(),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
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

    /// Stores the environment and starts the load timeline.
    fn insert_environment(&mut self, map: EnvironmentMap) {
        if self.environment.is_some() {
            log::warn!("environment map arrived twice, keeping the first");
            return;
        }
        self.environment = Some(EnvironmentResources::new(
            &self.ctx.device,
            &self.ctx.queue,
            &map,
        ));
        self.epoch = Some(Instant::now());
        self.ctx.window.request_redraw();
    }

    /// Uploads a loaded part into its slot. A slot is filled at most once.
    fn insert_part(&mut self, slot: usize, meshes: &[MeshData], preset: &ViewPreset) {
        if meshes.is_empty() {
            return;
        }
        if self.parts[slot].is_some() {
            log::warn!("slot {slot} already holds a mesh, dropping duplicate load");
            return;
        }
        let Some(environment) = &self.environment else {
            log::warn!("mesh for slot {slot} arrived before the environment, dropping");
            return;
        };

        let asset = &preset.slots[slot];
        let model = Model::from_mesh_data(&self.ctx.device, meshes);
        let material = MaterialResources::new(
            &self.ctx.device,
            asset.material,
            &self.ctx.flakes,
            environment,
            &self.ctx.material_layout,
        );
        let instance = Instance::from(asset.position);
        let instance_buffer = self
            .ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{:?} Instance Buffer", asset.path)),
                contents: bytemuck::cast_slice(&[instance.to_raw()]),
                usage: wgpu::BufferUsages::VERTEX,
            });
        self.parts[slot] = Some(LoadedPart {
            model,
            material,
            instance_buffer,
        });
    }

    /// Actions whose delay has elapsed since the timeline epoch.
    fn poll_timeline(&mut self) -> Vec<Action> {
        match self.epoch {
            Some(epoch) => self.timeline.poll(epoch.elapsed()),
            None => Vec::new(),
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder: wgpu::CommandEncoder =
            self.ctx
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

            for part in self.parts.iter().flatten() {
                let pipeline = if part.material.params.double_sided {
                    &self.ctx.pipelines.physical_double_sided
                } else {
                    &self.ctx.pipelines.physical
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_vertex_buffer(1, part.instance_buffer.slice(..));
                render_pass.draw_model_instanced(
                    &part.model,
                    0..1,
                    &part.material.bind_group,
                    &self.ctx.camera.bind_group,
                    &self.ctx.light.bind_group,
                );
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub struct App {
    preset: ViewPreset,
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<ViewerEvent>,
    state: Option<ViewSession>,
    /// Session generation; completions from older generations are stale.
    session: u64,
    last_time: Instant,
}

impl App {
    fn new(event_loop: &EventLoop<ViewerEvent>, preset: ViewPreset) -> Self {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new().unwrap();
        Self {
            preset,
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            state: None,
            session: 0,
            last_time: Instant::now(),
        }
    }

    /// Runs a load future and feeds its completion back into the event loop.
    /// Futures resolving to `None` (logged failures) are swallowed.
    #[cfg(not(target_arch = "wasm32"))]
    fn spawn_load<F>(&self, fut: F)
    where
        F: Future<Output = Option<ViewerEvent>> + Send + 'static,
    {
        let proxy = self.proxy.clone();
        let _detached = self.async_runtime.spawn(async move {
            if let Some(event) = fut.await {
                if proxy.send_event(event).is_err() {
                    log::error!("event loop closed before a load completion was delivered");
                }
            }
        });
    }

    #[cfg(target_arch = "wasm32")]
    fn spawn_load<F>(&self, fut: F)
    where
        F: Future<Output = Option<ViewerEvent>> + 'static,
    {
        let proxy = self.proxy.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Some(event) = fut.await {
                if proxy.send_event(event).is_err() {
                    log::error!("event loop closed before a load completion was delivered");
                }
            }
        });
    }

    fn start_environment_load(&self) {
        let session = self.session;
        let path = self.preset.environment;
        self.spawn_load(async move {
            match resources::environment::load_environment(path).await {
                Ok(map) => Some(ViewerEvent::EnvironmentReady { session, map }),
                Err(e) => {
                    log::error!("failed to load environment map {path:?}: {e}");
                    None
                }
            }
        });
    }

    fn start_asset_load(&self, slot: usize) {
        let Some(asset) = self.preset.slots.get(slot) else {
            log::error!("timeline requested unknown slot {slot}");
            return;
        };
        let session = self.session;
        let path = asset.path;
        log::info!("requesting part {path:?}");
        self.spawn_load(async move {
            match resources::load_part_glb(path).await {
                Ok(meshes) => Some(ViewerEvent::MeshReady {
                    session,
                    slot,
                    meshes,
                }),
                Err(e) => {
                    log::error!("failed to load part {path:?}: {e}");
                    None
                }
            }
        });
    }
}

impl ApplicationHandler<ViewerEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("partview");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        self.session += 1;

        #[cfg(not(target_arch = "wasm32"))]
        {
            let ctx = self
                .async_runtime
                .block_on(Context::new(window, &self.preset));
            let ctx = match ctx {
                Ok(ctx) => ctx,
                Err(e) => panic!(
                    "App initialization failed. Cannot create the main context: {}",
                    e
                ),
            };
            self.state = Some(ViewSession::new(ctx, &self.preset));
            self.start_environment_load();
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            let preset = self.preset.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match Context::new(window, &preset).await {
                    Ok(ctx) => {
                        assert!(
                            proxy
                                .send_event(ViewerEvent::Initialized(Box::new(ctx)))
                                .is_ok()
                        )
                    }
                    Err(e) => log::error!("App initialization failed: {e}"),
                }
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: ViewerEvent) {
        match event {
            ViewerEvent::Initialized(ctx) => {
                // This is the message from our wasm `spawn_local`
                let mut state = ViewSession::new(*ctx, &self.preset);
                let size = state.ctx.window.inner_size();
                state.ctx.window.request_redraw();
                self.state = Some(state);
                if let Some(state) = &mut self.state {
                    state.resize(size.width, size.height);
                }
                self.start_environment_load();
            }
            ViewerEvent::EnvironmentReady { session, map } => {
                if session != self.session {
                    log::debug!("dropping environment map from torn-down session {session}");
                    return;
                }
                if let Some(state) = &mut self.state {
                    state.insert_environment(map);
                }
            }
            ViewerEvent::MeshReady {
                session,
                slot,
                meshes,
            } => {
                if session != self.session {
                    log::debug!("dropping mesh for slot {slot} from torn-down session {session}");
                    return;
                }
                if let Some(state) = &mut self.state {
                    state.insert_part(slot, &meshes, &self.preset);
                }
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if let MouseButtonState::Left = state.ctx.mouse.pressed {
                state.ctx.camera.controller.handle_mouse(dx, dy);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        state.ctx.camera.controller.handle_window_events(&event);

        if let WindowEvent::CursorMoved {
            device_id: _,
            position,
        } = event
        {
            state.ctx.mouse.coords = position;
        };

        match event {
            WindowEvent::CloseRequested => {
                // Invalidate in-flight loads, then drop the session and all
                // its GPU resources.
                self.session += 1;
                self.state = None;
                event_loop.exit();
            }
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => match (button, button_state.is_pressed()) {
                (MouseButton::Left, true) => state.ctx.mouse.pressed = MouseButtonState::Left,
                (MouseButton::Right, true) => state.ctx.mouse.pressed = MouseButtonState::Right,
                (_, false) => state.ctx.mouse.pressed = MouseButtonState::None,
                _ => (),
            },
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                match state.render() {
                    Ok(_) => {
                        // Advance the orbit and push the camera uniform.
                        {
                            let camera = &mut state.ctx.camera;
                            camera.controller.update(&mut camera.camera, dt);
                            camera
                                .uniform
                                .update_view_proj(&camera.camera, &state.ctx.projection);
                        }
                        state.ctx.queue.write_buffer(
                            &state.ctx.camera.buffer,
                            0,
                            bytemuck::cast_slice(&[state.ctx.camera.uniform]),
                        );

                        let actions = state.poll_timeline();
                        for action in actions {
                            match action {
                                Action::LoadAsset(slot) => self.start_asset_load(slot),
                                Action::SetAutoRotateSpeed(speed) => {
                                    if let Some(state) = &mut self.state {
                                        state
                                            .ctx
                                            .camera
                                            .controller
                                            .set_auto_rotate_speed(speed);
                                    }
                                }
                            }
                        }
                    }
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(state) = &mut self.state {
                            let size = state.ctx.window.inner_size();
                            state.resize(size.width, size.height);
                        }
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

/// Builds the event loop and runs the given view until its window closes.
pub fn run(preset: ViewPreset) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<ViewerEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, preset);
    event_loop.run_app(&mut app)?;

    Ok(())
}

/// Web entry point: mounts the named view on the page's canvas.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start(view: &str) -> Result<(), JsValue> {
    let preset = ViewPreset::from_name(view)
        .ok_or_else(|| JsValue::from_str("unknown view (expected slider, spring, housing or combined)"))?;
    run(preset).map_err(|e| JsValue::from_str(&e.to_string()))
}
