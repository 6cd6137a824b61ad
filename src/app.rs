//! Application shell: window, event routing, and the frame loop.
//!
//! The presentation host owns the winit event loop and forwards typed events
//! into camera state and the pending-load mailbox. The mailbox is written by
//! the drop handler (and once at startup for the CLI argument) and drained
//! at the start of the next frame; producer and consumer share the
//! event-loop thread, so a plain `Option` is enough. A multi-threaded
//! windowing backend would need an atomic single-slot cell or a channel here.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use glam::Mat4;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::camera::OrbitCamera;
use crate::errors::Result;
use crate::geometry::DEFAULT_VERTEX_COLOR;
use crate::input::Input;
use crate::loader::load_model;
use crate::mesh::GpuMesh;
use crate::registry::TextureRegistry;
use crate::renderer::Renderer;

/// Auto-rotation speed, radians per second.
const ROTATION_SPEED: f32 = 0.5;

pub struct App {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,

    registry: TextureRegistry,
    meshes: Vec<GpuMesh>,

    camera: OrbitCamera,
    input: Input,

    /// Single-slot mailbox: written by the drop handler, drained at frame
    /// start. The first drop wins until the frame consumes it.
    pending_load: Option<PathBuf>,
    status: String,

    auto_rotate: bool,
    rotation_angle: f32,
    last_frame: Instant,
}

impl App {
    /// `initial_model` seeds the mailbox so the first frame loads it; absent,
    /// the viewer starts empty and waits for a drag-and-drop.
    #[must_use]
    pub fn new(initial_model: Option<PathBuf>) -> Self {
        Self {
            window: None,
            renderer: None,
            registry: TextureRegistry::new(),
            meshes: Vec::new(),
            camera: OrbitCamera::new(),
            input: Input::new(),
            pending_load: initial_model,
            status: "Drag & drop a model file to load.".to_string(),
            auto_rotate: true,
            rotation_angle: 0.0,
            last_frame: Instant::now(),
        }
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    /// Drains the pending-load mailbox, replacing the displayed model.
    fn process_pending_load(&mut self) {
        let Some(path) = self.pending_load.take() else {
            return;
        };
        let Some(renderer) = &self.renderer else {
            return;
        };

        let filename = path.file_name().map_or_else(
            || path.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        );
        log::info!("Processing model file: {}", path.display());

        let new_meshes = load_model(
            renderer.device(),
            renderer.queue(),
            renderer.material_bindings(),
            &mut self.registry,
            &path,
            DEFAULT_VERTEX_COLOR,
        );
        if new_meshes.is_empty() {
            // A failed load clears the previous model so the title always
            // matches what is on screen.
            self.meshes.clear();
            self.status = format!("Error loading: {filename}. Drag & drop.");
            log::error!("Failed to load model from: {}", path.display());
        } else {
            self.meshes = new_meshes;
            self.status = format!("Loaded: {filename}");
            log::info!("Successfully loaded model from: {}", path.display());
        }
    }

    /// The window title is the sole status surface.
    fn update_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        if self.meshes.is_empty() {
            window.set_title(&format!("Model Viewer - {}", self.status));
        } else {
            let mut title = String::from("Model Viewer");
            if let Some(name) = self.status.strip_prefix("Loaded: ") {
                title.push_str(" - ");
                title.push_str(name);
            }
            if !self.auto_rotate {
                title.push_str(" (Paused)");
            }
            window.set_title(&title);
        }
    }

    fn frame(&mut self) {
        self.process_pending_load();
        self.update_title();

        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        if self.auto_rotate {
            self.rotation_angle += ROTATION_SPEED * dt;
        }

        // Route accumulated mouse state into the camera: left drag orbits,
        // middle drag pans, wheel zooms.
        if self.input.is_button_pressed(MouseButton::Left) {
            self.camera
                .orbit(self.input.cursor_delta.x, self.input.cursor_delta.y);
        }
        if self.input.is_button_pressed(MouseButton::Middle) {
            self.camera
                .pan(self.input.cursor_delta.x, self.input.cursor_delta.y);
        }
        if self.input.scroll_delta.y != 0.0 {
            self.camera.zoom(self.input.scroll_delta.y);
        }

        if let Some(renderer) = &mut self.renderer {
            let model = Mat4::from_rotation_y(self.rotation_angle);
            renderer.render(&self.meshes, &self.camera, model);
        }
        self.input.end_frame();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        match event.physical_key {
            PhysicalKey::Code(KeyCode::Escape) => {
                log::info!("ESC pressed, closing window");
                event_loop.exit();
            }
            PhysicalKey::Code(KeyCode::KeyR) => {
                log::info!("Resetting camera");
                self.camera.reset();
            }
            PhysicalKey::Code(KeyCode::Space) if !event.repeat => {
                self.auto_rotate = !self.auto_rotate;
                log::info!(
                    "Model auto-rotation toggled to {}",
                    if self.auto_rotate { "ON" } else { "OFF" }
                );
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("Model Viewer")
            .with_inner_size(winit::dpi::LogicalSize::new(800.0, 600.0));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());
        let size = window.inner_size();
        self.input.handle_resize(size.width, size.height);

        match Renderer::new(window) {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(e) => {
                // No shading stage, no frame: fatal at startup.
                log::error!("Fatal renderer error: {e}");
                event_loop.exit();
            }
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
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
                self.input.handle_resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                self.frame();
            }
            WindowEvent::DroppedFile(path) => {
                log::info!("File dropped: {}", path.display());
                // Only the first file of a multi-file drop is consumed.
                if self.pending_load.is_none() {
                    self.pending_load = Some(path);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(event_loop, &event);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.handle_cursor_move(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.handle_mouse_input(state, button);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.input.handle_mouse_wheel(delta);
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
