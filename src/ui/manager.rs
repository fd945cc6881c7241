// src/ui/manager.rs
//! ImGui UI manager for the product viewer
//!
//! Handles ImGui integration with wgpu and winit, providing frame management,
//! input handling, and rendering for the overlay panels.

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use std::time::Instant;
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::{
    event::{Event, WindowEvent},
    window::Window,
};

/// ImGui UI manager
///
/// Manages the ImGui context, platform integration, and rendering pipeline.
/// Handles input capture, frame timing, and coordinate scaling so panels
/// stay consistent across DPI settings.
pub struct UiManager {
    pub context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
}

impl UiManager {
    /// Creates a new UI manager
    ///
    /// Sets up ImGui with locked DPI mode to prevent automatic scaling
    /// conflicts; all panel coordinates are physical pixels.
    ///
    /// # Arguments
    /// * `device` - WGPU device for creating renderer resources
    /// * `queue` - WGPU queue for renderer operations
    /// * `output_color_format` - Target texture format for rendering
    /// * `window` - Window for platform integration
    pub fn new(
        device: &Device,
        queue: &Queue,
        output_color_format: TextureFormat,
        window: &Window,
    ) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        let font_size = 18.0;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);

        let renderer_config = RendererConfig {
            texture_format: output_color_format,
            ..Default::default()
        };
        let renderer = Renderer::new(&mut context, device, queue, renderer_config);

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
        }
    }

    /// Updates ImGui's display size to match the render target
    ///
    /// Must be called when the surface is resized so panels anchored to the
    /// window edges stay in place.
    pub fn update_display_size(&mut self, width: u32, height: u32) {
        self.context.io_mut().display_size = [width as f32, height as f32];
    }

    /// Handles input events and returns whether the UI captured them
    ///
    /// Processes mouse and keyboard events through ImGui's input system.
    /// Returns true if the UI wants to capture the input, which keeps the
    /// event away from orbiting and part picking.
    pub fn handle_input<T>(&mut self, window: &Window, event: &Event<T>) -> bool {
        match event {
            Event::WindowEvent {
                event: window_event,
                ..
            } => match window_event {
                WindowEvent::CursorMoved { .. }
                | WindowEvent::MouseInput { .. }
                | WindowEvent::MouseWheel { .. }
                | WindowEvent::KeyboardInput { .. }
                | WindowEvent::Focused(_) => {
                    self.platform
                        .handle_event(self.context.io_mut(), window, event);

                    let io = self.context.io();
                    io.want_capture_mouse || io.want_capture_keyboard
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// Builds the UI for this frame and returns whether it wants input capture
    ///
    /// Prepares a new ImGui frame, runs the provided UI callback, and
    /// handles cursor changes. Call once per frame before rendering; the
    /// built frame is consumed by [`UiManager::render_display_only`].
    pub fn update_logic<F>(&mut self, window: &Window, run_ui: F) -> bool
    where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(error) = self.platform.prepare_frame(self.context.io_mut(), window) {
            log::warn!("failed to prepare UI frame: {error}");
        }

        let ui = self.context.frame();
        run_ui(&ui);

        if self.last_cursor != ui.mouse_cursor() {
            self.last_cursor = ui.mouse_cursor();
            self.platform.prepare_render(&ui, window);
        }

        let io = self.context.io();
        io.want_capture_mouse || io.want_capture_keyboard
    }

    /// Renders the UI built in the last `update_logic` call
    ///
    /// Draws into the provided color attachment with `LoadOp::Load` so the
    /// 3D scene underneath is preserved.
    pub fn render_display_only(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        color_attachment: &TextureView,
    ) {
        let draw_data = self.context.render();

        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return;
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("imgui_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_attachment,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(error) = self
            .renderer
            .render(draw_data, queue, device, &mut render_pass)
        {
            log::error!("failed to render UI: {error}");
        }
    }
}
