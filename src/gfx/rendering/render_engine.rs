//! WGPU-based rendering engine for the product viewer
//!
//! Provides high-level rendering functionality built on top of wgpu, including
//! pipeline management, depth testing, shadow mapping for the two shadow
//! casting lights, and UI overlay support.

use std::sync::Arc;

use thiserror::Error;
use wgpu::{Device, TextureFormat};

use crate::gfx::{
    camera::camera_utils::convert_matrix4_to_array,
    lighting::LightingRig,
    resources::{material::MaterialBindings, GlobalBindings, TextureResource},
    scene::{object::DrawObject, scene::Scene},
};
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder},
    binding_types,
    uniform_buffer::UniformBuffer,
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

/// Failures while bringing up the GPU context
#[derive(Debug, Error)]
pub enum RenderInitError {
    #[error("failed to create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to acquire graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

/// Uniform consumed by the depth-only shadow shader
///
/// MUST match the `ShadowPass` struct in the shadow shader.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ShadowPassUbo {
    view_proj: [[f32; 4]; 4],
}

/// Depth map plus the per-pass uniform for one shadow-casting light
struct ShadowCaster {
    map: TextureResource,
    ubo: UniformBuffer<ShadowPassUbo>,
    bind_group: wgpu::BindGroup,
}

/// Core rendering engine managing GPU resources and draw calls
///
/// The RenderEngine handles all low-level graphics operations including:
/// - Surface and device management
/// - Pipeline creation and management
/// - Depth buffer handling
/// - Shadow map passes for the key and fill lights
/// - Per-frame uniform updates
/// - UI overlay rendering
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    global_bindings: GlobalBindings,

    key_shadow: ShadowCaster,
    fill_shadow: ShadowCaster,
    /// Both shadow maps with their comparison samplers, bound to slot 3 of
    /// the lit pipelines
    shadow_bind_group: wgpu::BindGroup,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Initializes wgpu, creates the depth buffer and one shadow map per
    /// shadow-casting light in the rig, and registers the shadow, opaque,
    /// and transparent pipelines.
    ///
    /// Falls back to a software adapter when no hardware adapter is
    /// compatible with the surface.
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `lighting` - Light rig whose shadow casters size the shadow maps
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        lighting: &LightingRig,
    ) -> Result<RenderEngine, RenderInitError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(error) => {
                log::warn!("no hardware adapter ({error}), trying fallback adapter");
                instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::default(),
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: true,
                    })
                    .await?
            }
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Depth buffer for the main pass
        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        // One square depth map per shadow caster, sized by the rig
        let key_map = TextureResource::create_shadow_map(
            &device,
            lighting.key.shadow_map_size,
            "Key Shadow Map",
        );
        let fill_map = TextureResource::create_shadow_map(
            &device,
            lighting.fill.shadow_map_size,
            "Fill Shadow Map",
        );

        // Layout shared by both shadow passes: one light matrix in the
        // vertex stage
        let shadow_pass_layout = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform())
            .create(&device, "Shadow Pass Bind Group");

        let key_ubo = UniformBuffer::new_with_data(
            &device,
            &ShadowPassUbo {
                view_proj: convert_matrix4_to_array(lighting.key_view_proj()),
            },
        );
        let key_pass_bind_group = BindGroupBuilder::new(&shadow_pass_layout)
            .resource(key_ubo.binding_resource())
            .create(&device, "Key Shadow Pass Bind Group");

        let fill_ubo = UniformBuffer::new_with_data(
            &device,
            &ShadowPassUbo {
                view_proj: convert_matrix4_to_array(lighting.fill_view_proj()),
            },
        );
        let fill_pass_bind_group = BindGroupBuilder::new(&shadow_pass_layout)
            .resource(fill_ubo.binding_resource())
            .create(&device, "Fill Shadow Pass Bind Group");

        // Layout for sampling both shadow maps in the lit fragment shader
        let shadow_final_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_depth_2d())
            .next_binding_fragment(binding_types::sampler_comparison())
            .next_binding_fragment(binding_types::texture_depth_2d())
            .next_binding_fragment(binding_types::sampler_comparison())
            .create(&device, "Shadow Maps Bind Group");

        let shadow_bind_group = BindGroupBuilder::new(&shadow_final_layout)
            .resource(wgpu::BindingResource::TextureView(&key_map.view))
            .resource(wgpu::BindingResource::Sampler(&key_map.sampler))
            .resource(wgpu::BindingResource::TextureView(&fill_map.view))
            .resource(wgpu::BindingResource::Sampler(&fill_map.sampler))
            .create(&device, "Shadow Maps Bind Group");

        let global_bindings = GlobalBindings::new(&device);

        // Per-object transform layout, structurally identical to the one each
        // object creates for its own bind group
        let transform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Transform Bind Group Layout"),
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

        // Temporary bindings just to clone the layout the material system uses
        let temp_material_bindings = MaterialBindings::new(&device);
        let material_bind_group_layout = temp_material_bindings.bind_group_layout().clone();

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("viewer", include_str!("viewer.wgsl"));
        pipeline_manager.load_shader("shadow", include_str!("shadow.wgsl"));

        // Depth-only shadow pipeline, shared by both casters. No culling so
        // thin parts like the seat slab still occlude from beneath.
        pipeline_manager.register_pipeline(
            "Shadow",
            PipelineConfig::default()
                .with_label("Shadow Pipeline")
                .with_shader("shadow")
                .with_vertex_only()
                .with_depth(TextureResource::DEPTH_FORMAT)
                .with_cull_mode(None)
                .with_bind_group_layouts(vec![
                    shadow_pass_layout.layout.clone(),
                    transform_bind_group_layout.clone(),
                ]),
        );

        // Lit pass for opaque product parts
        pipeline_manager.register_pipeline(
            "Opaque",
            PipelineConfig::default()
                .with_label("Opaque Pipeline")
                .with_shader("viewer")
                .with_depth(TextureResource::DEPTH_FORMAT)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    transform_bind_group_layout.clone(),
                    material_bind_group_layout.clone(),
                    shadow_final_layout.layout.clone(),
                ])
                .with_color_targets(vec![Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })]),
        );

        // Alpha-blended pass for the translucent ground plane, drawn after
        // all opaque geometry with depth writes off
        pipeline_manager.register_pipeline(
            "Transparent",
            PipelineConfig::default()
                .with_label("Transparent Pipeline")
                .with_shader("viewer")
                .with_read_only_depth(TextureResource::DEPTH_FORMAT)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    transform_bind_group_layout,
                    material_bind_group_layout,
                    shadow_final_layout.layout.clone(),
                ])
                .with_color_targets(vec![Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })]),
        );

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for error in &errors {
                log::error!("pipeline creation failed: {}", error);
            }
        }

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_bindings,
            key_shadow: ShadowCaster {
                map: key_map,
                ubo: key_ubo,
                bind_group: key_pass_bind_group,
            },
            fill_shadow: ShadowCaster {
                map: fill_map,
                ubo: fill_ubo,
                bind_group: fill_pass_bind_group,
            },
            shadow_bind_group,
        })
    }

    /// Renders a frame with an optional UI overlay
    ///
    /// Performs multi-pass rendering: one depth-only pass per shadow caster,
    /// the main lit pass (opaque parts first, then the translucent ground),
    /// and finally the UI overlay.
    ///
    /// Surface errors are returned to the caller; the application decides
    /// whether to reconfigure, skip the frame, or shut down.
    pub fn render_frame<F>(
        &mut self,
        scene: &Scene,
        ui_callback: Option<F>,
    ) -> Result<(), wgpu::SurfaceError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = self.surface.get_current_texture()?;

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // PASS 1 + 2: depth from each shadow-casting light
        Self::encode_shadow_pass(
            &mut self.pipeline_manager,
            &self.key_shadow,
            &mut encoder,
            scene,
            "Key Shadow Pass",
        );
        Self::encode_shadow_pass(
            &mut self.pipeline_manager,
            &self.fill_shadow,
            &mut encoder,
            scene,
            "Fill Shadow Pass",
        );

        // PASS 3: main lit pass
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(scene.background),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
            render_pass.set_bind_group(3, &self.shadow_bind_group, &[]);

            if let Some(pipeline) = self.pipeline_manager.get_pipeline("Opaque") {
                render_pass.set_pipeline(pipeline);
                Self::draw_objects(&mut render_pass, scene, false);
            }

            if let Some(pipeline) = self.pipeline_manager.get_pipeline("Transparent") {
                render_pass.set_pipeline(pipeline);
                Self::draw_objects(&mut render_pass, scene, true);
            }
        }

        // PASS 4: UI overlay
        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();

        Ok(())
    }

    /// Convenience method for rendering with a UI overlay
    pub fn render_frame_with_ui<F>(
        &mut self,
        scene: &Scene,
        ui_callback: F,
    ) -> Result<(), wgpu::SurfaceError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        self.render_frame(scene, Some(ui_callback))
    }

    /// Encodes one depth-only pass from a shadow caster's point of view
    fn encode_shadow_pass(
        pipeline_manager: &mut PipelineManager,
        caster: &ShadowCaster,
        encoder: &mut wgpu::CommandEncoder,
        scene: &Scene,
        label: &str,
    ) {
        let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &caster.map.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        let Some(pipeline) = pipeline_manager.get_pipeline("Shadow") else {
            return;
        };
        shadow_pass.set_pipeline(pipeline);
        shadow_pass.set_bind_group(0, &caster.bind_group, &[]);

        for object in scene.objects.iter() {
            if !object.visible || !object.cast_shadows {
                continue;
            }
            if let Some(transform_bind_group) = object.get_transform_bind_group() {
                shadow_pass.set_bind_group(1, transform_bind_group, &[]);
                shadow_pass.draw_object(object);
            }
        }
    }

    /// Draws the visible objects matching the requested transparency class
    fn draw_objects<'a>(render_pass: &mut wgpu::RenderPass<'a>, scene: &'a Scene, transparent: bool) {
        for object in scene.objects.iter() {
            if !object.visible || object.material.is_transparent() != transparent {
                continue;
            }

            let transform_bind_group = match object.get_transform_bind_group() {
                Some(bind_group) => bind_group,
                None => continue,
            };

            if let Some(material_bind_group) = object.material.get_bind_group() {
                render_pass.set_bind_group(1, transform_bind_group, &[]);
                render_pass.set_bind_group(2, material_bind_group, &[]);
                render_pass.draw_object(object);
            } else {
                log::debug!(
                    "skipping '{}', material '{}' has no GPU resources",
                    object.name,
                    object.material.name
                );
            }
        }
    }

    /// Uploads fresh camera and lighting uniforms
    ///
    /// Should be called each frame before `render_frame`. The light rig is
    /// fixed, so the shadow matrices upload once and then skip unchanged
    /// writes.
    pub fn update(&mut self, scene: &Scene) {
        self.global_bindings.update(
            &self.queue,
            scene.camera_manager.camera.uniform,
            &scene.lighting,
        );

        self.key_shadow.ubo.update_content(
            &self.queue,
            ShadowPassUbo {
                view_proj: convert_matrix4_to_array(scene.lighting.key_view_proj()),
            },
        );
        self.fill_shadow.ubo.update_content(
            &self.queue,
            ShadowPassUbo {
                view_proj: convert_matrix4_to_array(scene.lighting.fill_view_proj()),
            },
        );
    }

    /// Resizes the render engine surface and recreates the depth buffer
    ///
    /// Zero-sized dimensions are ignored, which covers minimized windows.
    /// Shadow maps keep their fixed resolution.
    ///
    /// # Arguments
    /// * `width` - New surface width in pixels
    /// * `height` - New surface height in pixels
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;

        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    /// Reconfigures the surface at its current size
    ///
    /// Recovery path for `SurfaceError::Lost` and `SurfaceError::Outdated`.
    pub fn reconfigure_surface(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Returns current surface dimensions
    ///
    /// Used for UI scaling and camera aspect ratio calculations.
    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Returns reference to the wgpu device
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns reference to the wgpu command queue
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the surface texture format
    ///
    /// Used for creating compatible render targets and UI systems.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}
