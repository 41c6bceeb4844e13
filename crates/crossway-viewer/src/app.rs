//! Viewer application implementing winit ApplicationHandler
//!
//! One-time initialization acquires the window and GPU context, uploads
//! the per-kind meshes, and runs the startup fetches (init, environment,
//! first agents snapshot). After that the loop is steady state: drain
//! completed polls, reconcile, advance interpolation, draw, and count the
//! poll scheduler down. A failed poll never stops the loop.

use crate::config::ViewerConfig;
use crate::scheduler::PollScheduler;
use anyhow::Context as _;
use crossway_mesh::parse_mesh;
use crossway_net::{Poller, SimClient};
use crossway_render::{create_box_mesh, Camera, RenderContext, SceneRenderer};
use crossway_scene::{
    advance_motion, CurrentStats, EntityKind, InitRequest, Reconciler, ScenePool,
};
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

const WINDOW_TITLE: &str = "Crossway";
const CAR_MESH: &str = include_str!("../assets/car.obj");
const WHEEL_MESH: &str = include_str!("../assets/wheel.obj");

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const WHEEL_GRAY: [f32; 4] = [0.4, 0.4, 0.4, 1.0];

/// Run the viewer until the window closes
pub fn run(config: ViewerConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(config);
    event_loop.run_app(&mut app).context("event loop failed")?;

    // Drawing-context failures are fatal at startup and surface here
    match app.startup_error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

pub struct ViewerApp {
    config: ViewerConfig,

    // Scene state
    pool: ScenePool,
    reconciler: Reconciler,

    // Network
    client: SimClient,
    poller: Poller,
    scheduler: PollScheduler,
    latest_stats: Option<CurrentStats>,

    // Rendering
    window: Option<Arc<Window>>,
    render_context: Option<RenderContext>,
    scene_renderer: Option<SceneRenderer>,
    camera: Camera,

    // Input state
    left_mouse_pressed: bool,
    right_mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,

    startup_error: Option<anyhow::Error>,
}

impl ViewerApp {
    pub fn new(config: ViewerConfig) -> Self {
        let client = SimClient::new(config.server_url.clone());
        let poller = Poller::new(client.clone());
        let scheduler = PollScheduler::new(config.poll_frames);
        let reconciler = Reconciler::new(config.seed, config.cycle_frames);

        Self {
            config,
            pool: ScenePool::new(),
            reconciler,
            client,
            poller,
            scheduler,
            latest_stats: None,
            window: None,
            render_context: None,
            scene_renderer: None,
            camera: Camera::new(),
            left_mouse_pressed: false,
            right_mouse_pressed: false,
            last_mouse_pos: None,
            startup_error: None,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) {
        let window_attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.startup_error = Some(anyhow::anyhow!("failed to create window: {e}"));
                event_loop.exit();
                return;
            }
        };

        if self.config.fullscreen {
            window.set_fullscreen(Some(winit::window::Fullscreen::Borderless(None)));
        }

        let render_context = match pollster::block_on(RenderContext::new(window.clone())) {
            Ok(context) => context,
            Err(e) => {
                self.startup_error =
                    Some(anyhow::Error::new(e).context("failed to acquire drawing context"));
                event_loop.exit();
                return;
            }
        };

        self.camera.aspect = render_context.aspect_ratio();

        let mut renderer = SceneRenderer::new(&render_context);
        load_meshes(&mut renderer, &render_context.device);

        self.window = Some(window);
        self.render_context = Some(render_context);
        self.scene_renderer = Some(renderer);

        self.startup_fetch();
    }

    /// Startup network sequence: initialize the model, load the static
    /// environment, and apply a first agent snapshot. Failures here are
    /// logged and the viewer starts with whatever it got - the server may
    /// come up later and the regular polls will pick it up.
    fn startup_fetch(&mut self) {
        let request = InitRequest {
            map_file: self.config.map_file.clone(),
            map_dict: self.config.map_dict.clone(),
        };
        match self.client.init(&request) {
            Ok(response) => {
                if let Some(message) = &response.message {
                    println!("Server: {message}");
                }
                self.camera.center_on_grid(response.width, response.height);
            }
            Err(e) => eprintln!("Model init failed: {e}"),
        }

        match self.client.environment() {
            Ok(environment) => {
                self.reconciler.apply_environment(&mut self.pool, &environment);
                println!(
                    "Environment loaded: {} roads, {} buildings, {} destinations",
                    self.pool.roads.len(),
                    self.pool.buildings.len(),
                    self.pool.destinations.len()
                );
            }
            Err(e) => eprintln!("Environment fetch failed: {e}"),
        }

        match self.client.agents() {
            Ok(snapshot) => {
                let seq = self.poller.claim_seq();
                self.reconciler.apply_agents(&mut self.pool, seq, &snapshot);
            }
            Err(e) => eprintln!("Initial agent fetch failed: {e}"),
        }
    }

    /// Per-frame update: drain finished polls, advance interpolation, and
    /// dispatch the next poll when due.
    fn tick(&mut self) {
        let mut stats_changed = false;
        while let Some(result) = self.poller.try_recv() {
            match result.snapshot {
                Ok(snapshot) => {
                    self.reconciler
                        .apply_agents(&mut self.pool, result.seq, &snapshot);
                }
                Err(e) => {
                    // Keep the previous pool state and keep rendering
                    eprintln!("Poll failed: {e}");
                }
            }
            if let Some(stats) = result.stats {
                self.latest_stats = Some(stats);
                stats_changed = true;
            }
        }
        if stats_changed {
            self.update_title();
        }

        advance_motion(&mut self.pool);

        self.scheduler.tick();
        if self.scheduler.is_due() && self.poller.in_flight() == 0 {
            self.poller.dispatch();
            self.scheduler.rearm();
        }
    }

    /// Surface the latest stats as plain status text in the title bar
    fn update_title(&self) {
        let (Some(window), Some(stats)) = (&self.window, &self.latest_stats) else {
            return;
        };
        window.set_title(&format!(
            "{} - step {} | {} active | {} arrived | density {:.2}",
            WINDOW_TITLE,
            stats.current_step,
            stats.active_cars,
            stats.cars_finished,
            stats.traffic_density
        ));
    }

    fn render(&mut self) {
        let Some(context) = &self.render_context else {
            return;
        };
        let Some(renderer) = &mut self.scene_renderer else {
            return;
        };

        let output = match context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                return;
            }
            Err(e) => {
                eprintln!("Surface error: {e:?}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        renderer.render(context, &self.camera, &self.pool, &view);
        output.present();
    }

    fn handle_key(&mut self, key_code: KeyCode, event_loop: &ActiveEventLoop) {
        let light_step = 1.0;
        let light = self
            .scene_renderer
            .as_mut()
            .map(|r| r.light_settings_mut());

        match key_code {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::F11 => {
                if let Some(window) = &self.window {
                    if window.fullscreen().is_some() {
                        window.set_fullscreen(None);
                    } else {
                        window.set_fullscreen(Some(winit::window::Fullscreen::Borderless(None)));
                    }
                }
            }
            // Move the point light around the scene
            KeyCode::ArrowLeft => {
                if let Some(light) = light {
                    light.point_position.x -= light_step;
                }
            }
            KeyCode::ArrowRight => {
                if let Some(light) = light {
                    light.point_position.x += light_step;
                }
            }
            KeyCode::ArrowUp => {
                if let Some(light) = light {
                    light.point_position.z -= light_step;
                }
            }
            KeyCode::ArrowDown => {
                if let Some(light) = light {
                    light.point_position.z += light_step;
                }
            }
            KeyCode::PageUp => {
                if let Some(light) = light {
                    light.point_position.y += light_step;
                }
            }
            KeyCode::PageDown => {
                if let Some(light) = light {
                    light.point_position.y -= light_step;
                }
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            self.initialize(event_loop);
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
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(context) = &mut self.render_context {
                    context.resize(new_size);
                    self.camera.aspect = context.aspect_ratio();
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    if let PhysicalKey::Code(key_code) = event.physical_key {
                        self.handle_key(key_code, event_loop);
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.left_mouse_pressed = pressed,
                    MouseButton::Right => self.right_mouse_pressed = pressed,
                    _ => {}
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let pos = (position.x, position.y);
                if let Some(last) = self.last_mouse_pos {
                    let dx = (pos.0 - last.0) as f32;
                    let dy = (pos.1 - last.1) as f32;
                    if self.left_mouse_pressed {
                        self.camera.orbit_horizontal(-dx * 0.01);
                        self.camera.orbit_vertical(dy * 0.01);
                    } else if self.right_mouse_pressed {
                        self.camera.pan(-dx * 0.05, dy * 0.05);
                    }
                }
                self.last_mouse_pos = Some(pos);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y * 2.0,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.02,
                };
                self.camera.zoom(amount);
            }

            WindowEvent::RedrawRequested => {
                self.tick();
                self.render();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Assemble the per-kind meshes: authored models for vehicles and wheels,
/// boxes for everything else.
fn load_meshes(renderer: &mut SceneRenderer, device: &wgpu::Device) {
    match parse_mesh(CAR_MESH, WHITE) {
        Ok(mesh) => {
            println!("Loaded car mesh ({} vertices)", mesh.vertex_count());
            renderer.load_kind_mesh(device, EntityKind::Vehicle, &mesh);
        }
        Err(e) => eprintln!("Failed to load car mesh: {e}"),
    }
    match parse_mesh(WHEEL_MESH, WHEEL_GRAY) {
        Ok(mesh) => {
            println!("Loaded wheel mesh ({} vertices)", mesh.vertex_count());
            renderer.load_kind_mesh(device, EntityKind::Wheel, &mesh);
        }
        Err(e) => eprintln!("Failed to load wheel mesh: {e}"),
    }

    renderer.load_kind_mesh(device, EntityKind::Road, &create_box_mesh(1.0, 1.0, 1.0, WHITE));
    renderer.load_kind_mesh(
        device,
        EntityKind::Building,
        &create_box_mesh(1.0, 1.0, 1.0, WHITE),
    );
    renderer.load_kind_mesh(
        device,
        EntityKind::Destination,
        &create_box_mesh(1.0, 1.0, 1.0, WHITE),
    );
    renderer.load_kind_mesh(
        device,
        EntityKind::TrafficLight,
        &create_box_mesh(0.25, 1.2, 0.25, WHITE),
    );
}
