// src/app.rs
//! Application shell for the product viewer
//!
//! Owns the winit event loop and wires windowing, rendering, interaction,
//! and the overlay UI together. Window events are offered to the UI first;
//! whatever the UI does not capture drives camera orbiting and part picking.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context as _;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{DeviceEvent, DeviceId, ElementState, Event, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorIcon, Window, WindowId},
};

use crate::animation::FloatAnimation;
use crate::gfx::camera::{CameraController, CameraManager, OrbitCamera};
use crate::gfx::rendering::RenderEngine;
use crate::gfx::scene::Scene;
use crate::interaction::{CursorStyle, InteractionController};
use crate::product::{build_product, ProductModel};
use crate::ui::{controls_panel, info_panel, UiManager};

/// Initial window size in logical pixels
const WINDOW_WIDTH: u32 = 1200;
const WINDOW_HEIGHT: u32 = 800;

/// Maximum pointer travel between press and release for a click, in pixels
///
/// Orbit drags end with a button release too; a release that moved further
/// than this never reaches the picker.
const CLICK_SLOP: f32 = 5.0;

/// Closure type for user-defined UI rendering, drawn after the built-in panels
pub type UiCallback = Box<dyn Fn(&imgui::Ui) + Send + Sync>;

/// Product viewer application
///
/// Construct with [`ViewerApp::new`], then call [`ViewerApp::run`] to hand
/// control to the event loop until the window closes.
pub struct ViewerApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

/// Event-loop facing state, split out so winit can own it during `run_app`
struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    product: ProductModel,
    interaction: InteractionController,
    float_animation: FloatAnimation,
    window_title: String,
    ui_callback: Option<UiCallback>,
    start_time: Instant,
    last_frame: Instant,
    cursor_position: Option<(f32, f32)>,
    press_position: Option<(f32, f32)>,
}

impl ViewerApp {
    /// Creates the viewer with the chair product, studio lighting, and an
    /// orbit camera framing the scene
    ///
    /// GPU resources are deferred until the event loop delivers `resumed`
    /// and a window exists to build a surface from.
    pub fn new() -> anyhow::Result<Self> {
        let event_loop = EventLoop::new()?;

        let aspect = WINDOW_WIDTH as f32 / WINDOW_HEIGHT as f32;
        let camera = OrbitCamera::product_view(aspect);
        let controller = CameraController::new(0.005, 0.1);
        let mut scene = Scene::new(CameraManager::new(camera, controller));
        let product = build_product(&mut scene);

        let now = Instant::now();
        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                ui_manager: None,
                scene,
                product,
                interaction: InteractionController::new(),
                float_animation: FloatAnimation::new(),
                window_title: "Interactive Product Viewer".to_string(),
                ui_callback: None,
                start_time: now,
                last_frame: now,
                cursor_position: None,
                press_position: None,
            },
        })
    }

    /// Replaces the default window title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.app_state.window_title = title.into();
        self
    }

    /// Sets whether the camera starts auto-rotating
    pub fn with_auto_rotate(mut self, auto_rotate: bool) -> Self {
        self.app_state.scene.camera_manager.camera.auto_rotate = auto_rotate;
        self
    }

    /// Sets whether the product starts floating
    pub fn with_floating(mut self, floating: bool) -> Self {
        let state = &mut self.app_state;
        state.float_animation.set_enabled(floating, &mut state.scene);
        self
    }

    /// Installs a UI callback drawn each frame after the built-in panels
    pub fn set_ui<F>(&mut self, ui_fn: F)
    where
        F: Fn(&imgui::Ui) + Send + Sync + 'static,
    {
        self.app_state.ui_callback = Some(Box::new(ui_fn));
    }

    /// Runs the application until the window closes
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;
        Ok(())
    }
}

impl AppState {
    /// Advances animation and interaction state, builds the UI frame, and renders
    fn redraw(&mut self, event_loop: &ActiveEventLoop, window: &Arc<Window>) {
        let (Some(render_engine), Some(ui_manager)) =
            (self.render_engine.as_mut(), self.ui_manager.as_mut())
        else {
            return;
        };

        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        let elapsed = (now - self.start_time).as_secs_f32();

        self.scene.update(dt);
        self.interaction.update(now, &mut self.scene);
        self.float_animation.update(&mut self.scene, elapsed);

        // Build the UI before uploading GPU state so toggles and the close
        // button take effect in the frame they were clicked
        let mut auto_rotate = self.scene.camera_manager.camera.auto_rotate;
        let mut floating = self.float_animation.enabled();
        let auto_rotate_before = auto_rotate;
        let floating_before = floating;
        let mut close_clicked = false;

        let interaction = &self.interaction;
        let product = &self.product;
        let ui_callback = self.ui_callback.as_ref();
        ui_manager.update_logic(window, |ui| {
            controls_panel(ui, &mut auto_rotate, &mut floating);
            if let Some(part) = interaction.panel_content(product) {
                if info_panel(ui, part) {
                    close_clicked = true;
                }
            }
            if let Some(ui_callback) = ui_callback {
                ui_callback(ui);
            }
        });

        // Write back only on change; a drag that disabled auto-rotate this
        // frame must not be clobbered by the pre-UI snapshot
        if auto_rotate != auto_rotate_before {
            self.scene.camera_manager.camera.auto_rotate = auto_rotate;
        }
        if floating != floating_before {
            self.float_animation.set_enabled(floating, &mut self.scene);
        }
        if close_clicked {
            self.interaction
                .close_info_panel(&mut self.scene, &self.product);
        }

        self.scene
            .update_gpu_resources(render_engine.device(), render_engine.queue());
        render_engine.update(&self.scene);

        let frame_result =
            render_engine.render_frame_with_ui(&self.scene, |device, queue, encoder, view| {
                ui_manager.render_display_only(device, queue, encoder, view);
            });

        match frame_result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_engine.reconfigure_surface();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("render device out of memory, exiting");
                event_loop.exit();
            }
            Err(error) => {
                log::warn!("skipping frame: {error}");
            }
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.window_title.clone())
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(error) => {
                log::error!("failed to create window: {error}");
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let size = window.inner_size();
        let render_engine = match pollster::block_on(RenderEngine::new(
            window.clone(),
            size.width,
            size.height,
            &self.scene.lighting,
        )) {
            Ok(render_engine) => render_engine,
            Err(error) => {
                log::error!("failed to initialize renderer: {error}");
                event_loop.exit();
                return;
            }
        };

        self.scene
            .init_gpu_resources(render_engine.device(), render_engine.queue());

        let mut ui_manager = UiManager::new(
            render_engine.device(),
            render_engine.queue(),
            render_engine.surface_format(),
            &window,
        );
        ui_manager.update_display_size(size.width, size.height);

        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(render_engine);

        // GPU setup can take a while; restart the clocks so animations
        // begin from zero on the first frame
        let now = Instant::now();
        self.start_time = now;
        self.last_frame = now;
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // UI gets first refusal on every window event
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let wrapped: Event<()> = Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(&window, &wrapped) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.scene
                    .camera_manager
                    .camera
                    .resize_projection(size.width, size.height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(size.width, size.height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(size.width, size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let pointer = (position.x as f32, position.y as f32);
                self.cursor_position = Some(pointer);
                if let Some(render_engine) = self.render_engine.as_ref() {
                    let (width, height) = render_engine.get_surface_size();
                    self.interaction.pointer_moved(
                        pointer,
                        (width as f32, height as f32),
                        &mut self.scene,
                        &self.product,
                    );
                    let icon = match self.interaction.cursor() {
                        CursorStyle::Pointer => CursorIcon::Pointer,
                        CursorStyle::Default => CursorIcon::Default,
                    };
                    window.set_cursor(icon);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    self.press_position = self.cursor_position;
                }
                ElementState::Released => {
                    if let (Some(press), Some(pointer)) =
                        (self.press_position.take(), self.cursor_position)
                    {
                        let dx = pointer.0 - press.0;
                        let dy = pointer.1 - press.1;
                        if (dx * dx + dy * dy).sqrt() <= CLICK_SLOP {
                            if let Some(render_engine) = self.render_engine.as_ref() {
                                let (width, height) = render_engine.get_surface_size();
                                self.interaction.pointer_clicked(
                                    pointer,
                                    (width as f32, height as f32),
                                    Instant::now(),
                                    &mut self.scene,
                                    &self.product,
                                );
                            }
                        }
                    }
                }
            },
            WindowEvent::RedrawRequested => self.redraw(event_loop, &window),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        // Camera input pauses while a panel owns the mouse
        if let Some(ui_manager) = self.ui_manager.as_ref() {
            let io = ui_manager.context.io();
            if io.want_capture_mouse || io.want_capture_keyboard {
                return;
            }
        }

        self.scene.camera_manager.process_event(&event, window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
