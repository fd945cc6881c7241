//! Material system for the lit viewer
//!
//! Each scene object owns its material. Hover and selection feedback mutate
//! the owning object's material in place and the renderer re-uploads changed
//! uniforms on the next frame.

use wgpu::Device;

use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

/// GPU uniform data for materials
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    _padding0: [f32; 2],
    pub emissive: [f32; 3],
    _padding1: f32,
}

type MaterialUbo = UniformBuffer<MaterialUniform>;

/// Material bind group management
pub struct MaterialBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl MaterialBindings {
    pub fn new(device: &Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .create(device, "Material Bind Group");

        MaterialBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn create_bind_group(&mut self, device: &Device, ubo: &MaterialUbo) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Material Bind Group"),
        );
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }
}

/// Surface appearance of a single scene object
///
/// Base color carries alpha so translucent surfaces (the ground plane) share
/// the same material path as opaque product parts. Emissive is added
/// unlit on top of the shaded result, which is how hover and selection
/// highlights glow regardless of light direction.
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub emissive: [f32; 3],

    material_ubo: Option<MaterialUbo>,
    material_bindings: Option<MaterialBindings>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            metallic: 0.0,
            roughness: 0.5,
            emissive: [0.0, 0.0, 0.0],
            material_ubo: None,
            material_bindings: None,
        }
    }
}

impl Material {
    /// Creates a new material with basic PBR properties
    ///
    /// # Arguments
    /// * `name` - Display name, used in logs
    /// * `base_color` - RGBA base color
    /// * `metallic` - Metallic factor (0.0 = dielectric, 1.0 = metallic)
    /// * `roughness` - Surface roughness (0.0 = mirror, 1.0 = rough)
    pub fn new(name: &str, base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            metallic: metallic.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
            emissive: [0.0, 0.0, 0.0],
            material_ubo: None,
            material_bindings: None,
        }
    }

    /// Creates a material from a packed 0xRRGGBB color
    pub fn from_hex(name: &str, hex: u32, metallic: f32, roughness: f32) -> Self {
        let [r, g, b] = hex_to_rgb(hex);
        Self::new(name, [r, g, b, 1.0], metallic, roughness)
    }

    /// Builder pattern: Set base color from RGB values
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.base_color = [r, g, b, self.base_color[3]];
        self
    }

    /// Builder pattern: Set alpha transparency
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.base_color[3] = alpha.clamp(0.0, 1.0);
        self
    }

    /// Builder pattern: Set emissive color
    pub fn with_emission(mut self, r: f32, g: f32, b: f32) -> Self {
        self.emissive = [r, g, b];
        self
    }

    /// Replaces the RGB base color from a packed 0xRRGGBB value, keeping alpha
    pub fn set_color_hex(&mut self, hex: u32) {
        let [r, g, b] = hex_to_rgb(hex);
        self.base_color = [r, g, b, self.base_color[3]];
    }

    /// Replaces the emissive color from a packed 0xRRGGBB value
    pub fn set_emissive_hex(&mut self, hex: u32) {
        self.emissive = hex_to_rgb(hex);
    }

    /// True when the surface needs alpha blending
    pub fn is_transparent(&self) -> bool {
        self.base_color[3] < 1.0
    }

    /// Updates GPU resources for this material
    ///
    /// Creates the uniform buffer and bind group on first use, then keeps the
    /// GPU copy in sync with the CPU fields. Unchanged contents skip the
    /// upload inside [`UniformBuffer::update_content`].
    pub fn update_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        if self.material_ubo.is_none() {
            self.material_ubo = Some(MaterialUbo::new(device));
        }

        if self.material_bindings.is_none() {
            let mut bindings = MaterialBindings::new(device);
            if let Some(ubo) = &self.material_ubo {
                bindings.create_bind_group(device, ubo);
            }
            self.material_bindings = Some(bindings);
        }

        let uniform_data = MaterialUniform {
            base_color: self.base_color,
            metallic: self.metallic,
            roughness: self.roughness,
            _padding0: [0.0; 2],
            emissive: self.emissive,
            _padding1: 0.0,
        };

        if let Some(ubo) = &mut self.material_ubo {
            ubo.update_content(queue, uniform_data);
        }
    }

    /// Gets the bind group for rendering
    pub fn get_bind_group(&self) -> Option<&wgpu::BindGroup> {
        let bind_group = self.material_bindings.as_ref().and_then(|b| b.bind_group());
        if bind_group.is_none() {
            log::warn!("material '{}' drawn before GPU resources exist", self.name);
        }
        bind_group
    }

    /// Gets the bind group layout for pipeline creation
    pub fn get_bind_group_layout(&self) -> Option<&wgpu::BindGroupLayout> {
        self.material_bindings
            .as_ref()
            .map(|b| b.bind_group_layout())
    }
}

/// Converts a packed 0xRRGGBB color to linear RGB components
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_unpack_to_unit_range() {
        let [r, g, b] = hex_to_rgb(0x8b4513);
        assert!((r - 139.0 / 255.0).abs() < 1e-6);
        assert!((g - 69.0 / 255.0).abs() < 1e-6);
        assert!((b - 19.0 / 255.0).abs() < 1e-6);

        assert_eq!(hex_to_rgb(0x000000), [0.0, 0.0, 0.0]);
        assert_eq!(hex_to_rgb(0xffffff), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn new_clamps_pbr_factors() {
        let material = Material::new("Test", [1.0, 0.0, 0.0, 1.0], 1.5, -0.2);
        assert_eq!(material.metallic, 1.0);
        assert_eq!(material.roughness, 0.0);
    }

    #[test]
    fn set_color_hex_keeps_alpha() {
        let mut material = Material::from_hex("Ground", 0x1a1a1a, 0.0, 1.0).with_alpha(0.3);
        material.set_color_hex(0xffa500);
        assert!((material.base_color[3] - 0.3).abs() < 1e-6);
        assert!(material.is_transparent());
    }

    #[test]
    fn uniform_layout_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 48);
    }
}
