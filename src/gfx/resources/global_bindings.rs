//! Global uniform bindings for camera and scene data
//!
//! Manages the per-frame uniform buffer and bind group shared by every draw
//! call: camera matrices, the light rig, and the light view-projection
//! matrices used for shadow lookups. Bound to slot 0 in all render pipelines.

use crate::{
    gfx::camera::camera_utils::CameraUniform,
    gfx::lighting::{LightingRig, LightsUniform},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in the shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUboContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    lights: LightsUniform,
}

/// Type alias for the global uniform buffer
pub type GlobalUbo = UniformBuffer<GlobalUboContent>;

/// Owns the global uniform buffer and its bind group
///
/// Both are created up front so rendering never observes a half-built
/// binding. Call [`GlobalBindings::update`] once per frame before encoding
/// passes.
pub struct GlobalBindings {
    ubo: GlobalUbo,
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    /// Creates the uniform buffer, layout, and bind group
    ///
    /// # Arguments
    /// * `device` - WGPU device for creating resources
    pub fn new(device: &wgpu::Device) -> Self {
        let ubo = GlobalUbo::new(device);

        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Global Bind Group");

        GlobalBindings {
            ubo,
            bind_group_layout,
            bind_group,
        }
    }

    /// Uploads fresh camera and lighting data
    ///
    /// Should be called each frame to keep shading and shadow lookups in
    /// sync with the orbit camera and the light rig.
    ///
    /// # Arguments
    /// * `queue` - WGPU command queue for buffer updates
    /// * `camera` - Updated camera uniform data
    /// * `lighting` - Light rig to pack alongside the camera
    pub fn update(&mut self, queue: &wgpu::Queue, camera: CameraUniform, lighting: &LightingRig) {
        let content = GlobalUboContent {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            lights: lighting.to_uniform(),
        };

        self.ubo.update_content(queue, content);
    }

    /// Returns the bind group layout
    ///
    /// Used when creating render pipelines that need access to global uniforms.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    /// Returns the bind group for rendering
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_ubo_layout_matches_shader_struct() {
        // vec4 camera position + mat4 view-proj + 256-byte light block
        assert_eq!(std::mem::size_of::<GlobalUboContent>(), 336);
    }
}
