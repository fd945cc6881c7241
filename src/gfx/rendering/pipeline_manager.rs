//! Render pipeline management for wgpu
//!
//! Small registry that keeps shader modules and pipeline configurations by
//! name and creates pipelines lazily on first use.

use std::{collections::HashMap, sync::Arc};
use wgpu::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Configuration for creating a render pipeline
///
/// Covers the three pipelines the viewer needs: depth-only shadow passes,
/// the opaque lit pass, and the alpha-blended pass for the ground plane.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub cull_mode: Option<Face>,
    pub depth_format: Option<TextureFormat>,
    pub depth_write: bool,
    pub color_targets: Vec<Option<ColorTargetState>>,
    /// Depth-only pipelines skip the fragment stage entirely
    pub vertex_only: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Pipeline".to_string(),
            shader: String::new(),
            bind_group_layouts: Vec::new(),
            cull_mode: Some(Face::Back),
            depth_format: None,
            depth_write: true,
            color_targets: Vec::new(),
            vertex_only: false,
        }
    }
}

impl PipelineConfig {
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn with_shader(mut self, shader: &str) -> Self {
        self.shader = shader.to_string();
        self
    }

    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    pub fn with_depth(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    /// Depth testing without depth writes, for translucent geometry drawn
    /// after the opaque pass
    pub fn with_read_only_depth(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self.depth_write = false;
        self
    }

    pub fn with_color_targets(mut self, targets: Vec<Option<ColorTargetState>>) -> Self {
        self.color_targets = targets;
        self
    }

    pub fn with_vertex_only(mut self) -> Self {
        self.vertex_only = true;
        self
    }
}

/// Registry of shaders and lazily created render pipelines
pub struct PipelineManager {
    device: Arc<Device>,
    pipelines: HashMap<String, RenderPipeline>,
    pipeline_configs: HashMap<String, PipelineConfig>,
    shader_modules: HashMap<String, ShaderModule>,
    pending_pipelines: Vec<String>,
}

impl PipelineManager {
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            device,
            pipelines: HashMap::new(),
            pipeline_configs: HashMap::new(),
            shader_modules: HashMap::new(),
            pending_pipelines: Vec::new(),
        }
    }

    /// Compiles a WGSL shader module and stores it under `name`
    pub fn load_shader(&mut self, name: &str, source: &str) {
        let shader_module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });

        self.shader_modules.insert(name.to_string(), shader_module);
    }

    /// Registers a pipeline configuration without creating it
    ///
    /// Pipelines are created on first `get_pipeline` call or all at once via
    /// [`PipelineManager::create_all_pipelines`].
    pub fn register_pipeline(&mut self, name: &str, config: PipelineConfig) {
        self.pipeline_configs.insert(name.to_string(), config);
        self.pending_pipelines.push(name.to_string());
    }

    /// Gets or creates a pipeline by name
    pub fn get_pipeline(&mut self, name: &str) -> Option<&RenderPipeline> {
        if self.pipelines.contains_key(name) {
            return self.pipelines.get(name);
        }

        if let Some(config) = self.pipeline_configs.get(name).cloned() {
            match self.create_pipeline_from_config(name, &config) {
                Ok(pipeline) => {
                    self.pipelines.insert(name.to_string(), pipeline);
                    self.pending_pipelines.retain(|n| n != name);
                    return self.pipelines.get(name);
                }
                Err(e) => {
                    log::error!("failed to create pipeline '{}': {}", name, e);
                    return None;
                }
            }
        }

        None
    }

    /// Creates every registered pipeline immediately
    ///
    /// Surfaces configuration mistakes at startup instead of on the first
    /// frame that needs the broken pipeline.
    pub fn create_all_pipelines(&mut self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let pending = self.pending_pipelines.clone();

        for name in pending {
            if let Some(config) = self.pipeline_configs.get(&name).cloned() {
                match self.create_pipeline_from_config(&name, &config) {
                    Ok(pipeline) => {
                        self.pipelines.insert(name.clone(), pipeline);
                        self.pending_pipelines.retain(|n| n != &name);
                    }
                    Err(e) => {
                        errors.push(format!("pipeline '{}': {}", name, e));
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn create_pipeline_from_config(
        &self,
        name: &str,
        config: &PipelineConfig,
    ) -> Result<RenderPipeline, String> {
        let shader = self
            .shader_modules
            .get(&config.shader)
            .ok_or_else(|| format!("shader '{}' not found", config.shader))?;

        let bind_group_layout_refs: Vec<&BindGroupLayout> =
            config.bind_group_layouts.iter().collect();
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(&format!("{} Layout", name)),
                bind_group_layouts: &bind_group_layout_refs,
                push_constant_ranges: &[],
            });

        let fragment_state = if config.vertex_only {
            None
        } else {
            Some(FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &config.color_targets,
                compilation_options: PipelineCompilationOptions::default(),
            })
        };

        let depth_stencil = config.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: config.depth_write,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        let pipeline = self
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some(&config.label),
                layout: Some(&pipeline_layout),
                vertex: VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex3D::desc()],
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: fragment_state,
                primitive: PrimitiveState {
                    topology: PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: FrontFace::Ccw,
                    cull_mode: config.cull_mode,
                    polygon_mode: PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil,
                multisample: MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_opaque_back_culled() {
        let config = PipelineConfig::default();
        assert_eq!(config.cull_mode, Some(Face::Back));
        assert!(config.depth_write);
        assert!(!config.vertex_only);
    }

    #[test]
    fn read_only_depth_disables_writes() {
        let config =
            PipelineConfig::default().with_read_only_depth(TextureFormat::Depth32Float);
        assert_eq!(config.depth_format, Some(TextureFormat::Depth32Float));
        assert!(!config.depth_write);
    }
}
