//! Studio lighting for the product viewer
//!
//! Defines the fixed four-light rig (ambient wash, shadow-casting key and
//! fill, rim accent) and packs it into the uniform block consumed by the
//! lighting shader. The two shadow casters also expose the view-projection
//! matrices used by the depth-only shadow passes.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3};

use crate::gfx::camera::camera_utils::OPENGL_TO_WGPU_MATRIX;
use crate::gfx::resources::material::hex_to_rgb;

/// Uniform ambient wash applied to every surface
#[derive(Copy, Clone, Debug)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Directional key light with an orthographic shadow volume
///
/// Aims at the scene origin from `position`. The shadow volume is a cube of
/// `2 * shadow_extent` per side, tight around the product for depth precision.
#[derive(Copy, Clone, Debug)]
pub struct DirectionalLight {
    pub position: Point3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
    pub shadow_map_size: u32,
    pub shadow_extent: f32,
    pub shadow_near: f32,
    pub shadow_far: f32,
}

/// Spot fill light with a soft-edged cone
///
/// `angle` is the cone half-angle in radians. `penumbra` is the fraction of
/// the cone over which intensity falls off toward the edge, 0.0 for a hard
/// rim and 1.0 for falloff starting at the cone axis.
#[derive(Copy, Clone, Debug)]
pub struct SpotLight {
    pub position: Point3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
    pub angle: f32,
    pub penumbra: f32,
    pub shadow_map_size: u32,
    pub shadow_near: f32,
    pub shadow_far: f32,
}

/// Point accent light, no shadow
#[derive(Copy, Clone, Debug)]
pub struct PointLight {
    pub position: Point3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
}

/// GPU uniform block for the complete rig
///
/// MUST match the `Lights` struct in the lighting shader exactly. Spot cone
/// angles are pre-cosined so the fragment shader compares dot products
/// without trigonometry.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    ambient_color: [f32; 3],
    ambient_intensity: f32,
    key_direction: [f32; 3],
    key_intensity: f32,
    key_color: [f32; 3],
    _padding0: f32,
    key_view_proj: [[f32; 4]; 4],
    spot_position: [f32; 3],
    spot_intensity: f32,
    spot_direction: [f32; 3],
    spot_cos_outer: f32,
    spot_color: [f32; 3],
    spot_cos_inner: f32,
    spot_view_proj: [[f32; 4]; 4],
    rim_position: [f32; 3],
    rim_intensity: f32,
    rim_color: [f32; 3],
    _padding1: f32,
}

/// The viewer's light rig
///
/// All four lights aim at or sit around the product at the origin. The rig
/// is installed once at scene creation and never changes at runtime.
pub struct LightingRig {
    pub ambient: AmbientLight,
    pub key: DirectionalLight,
    pub fill: SpotLight,
    pub rim: PointLight,
}

impl LightingRig {
    /// Creates the studio rig used for product display
    ///
    /// Key from high front-right, spot fill from the left, cornflower rim
    /// from behind, all over a white ambient base.
    pub fn studio() -> Self {
        Self {
            ambient: AmbientLight {
                color: [1.0, 1.0, 1.0],
                intensity: 0.6,
            },
            key: DirectionalLight {
                position: Point3::new(10.0, 10.0, 5.0),
                color: [1.0, 1.0, 1.0],
                intensity: 1.0,
                shadow_map_size: 2048,
                shadow_extent: 10.0,
                shadow_near: 0.5,
                shadow_far: 50.0,
            },
            fill: SpotLight {
                position: Point3::new(-5.0, 5.0, 5.0),
                color: [1.0, 1.0, 1.0],
                intensity: 0.5,
                angle: 0.3,
                penumbra: 0.5,
                shadow_map_size: 1024,
                shadow_near: 0.5,
                shadow_far: 50.0,
            },
            rim: PointLight {
                position: Point3::new(0.0, 3.0, -5.0),
                color: hex_to_rgb(0x6495ed),
                intensity: 0.5,
            },
        }
    }

    /// View-projection matrix for the key light's shadow pass
    pub fn key_view_proj(&self) -> Matrix4<f32> {
        let view = Matrix4::look_at_rh(
            self.key.position,
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        );
        let extent = self.key.shadow_extent;
        let proj = cgmath::ortho(
            -extent,
            extent,
            -extent,
            extent,
            self.key.shadow_near,
            self.key.shadow_far,
        );
        OPENGL_TO_WGPU_MATRIX * proj * view
    }

    /// View-projection matrix for the fill light's shadow pass
    ///
    /// The frustum opens to twice the cone half-angle so the shadow map
    /// covers exactly the lit cone.
    pub fn fill_view_proj(&self) -> Matrix4<f32> {
        let view = Matrix4::look_at_rh(
            self.fill.position,
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        );
        let proj = cgmath::perspective(
            Rad(self.fill.angle * 2.0),
            1.0,
            self.fill.shadow_near,
            self.fill.shadow_far,
        );
        OPENGL_TO_WGPU_MATRIX * proj * view
    }

    /// Packs the rig into the shader uniform block
    pub fn to_uniform(&self) -> LightsUniform {
        let target = Point3::new(0.0, 0.0, 0.0);
        let key_direction: Vector3<f32> = (target - self.key.position).normalize();
        let spot_direction: Vector3<f32> = (target - self.fill.position).normalize();

        LightsUniform {
            ambient_color: self.ambient.color,
            ambient_intensity: self.ambient.intensity,
            key_direction: key_direction.into(),
            key_intensity: self.key.intensity,
            key_color: self.key.color,
            _padding0: 0.0,
            key_view_proj: self.key_view_proj().into(),
            spot_position: self.fill.position.into(),
            spot_intensity: self.fill.intensity,
            spot_direction: spot_direction.into(),
            spot_cos_outer: self.fill.angle.cos(),
            spot_color: self.fill.color,
            spot_cos_inner: (self.fill.angle * (1.0 - self.fill.penumbra)).cos(),
            spot_view_proj: self.fill_view_proj().into(),
            rim_position: self.rim.position.into(),
            rim_intensity: self.rim.intensity,
            rim_color: self.rim.color,
            _padding1: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    #[test]
    fn studio_rig_matches_display_setup() {
        let rig = LightingRig::studio();

        assert_eq!(rig.ambient.color, [1.0, 1.0, 1.0]);
        assert_eq!(rig.ambient.intensity, 0.6);

        assert_eq!(rig.key.position, Point3::new(10.0, 10.0, 5.0));
        assert_eq!(rig.key.intensity, 1.0);
        assert_eq!(rig.key.shadow_map_size, 2048);

        assert_eq!(rig.fill.position, Point3::new(-5.0, 5.0, 5.0));
        assert_eq!(rig.fill.intensity, 0.5);
        assert_eq!(rig.fill.angle, 0.3);
        assert_eq!(rig.fill.penumbra, 0.5);
        assert_eq!(rig.fill.shadow_map_size, 1024);

        assert_eq!(rig.rim.position, Point3::new(0.0, 3.0, -5.0));
        assert_eq!(rig.rim.intensity, 0.5);
        let [r, g, b] = rig.rim.color;
        assert!((r - 100.0 / 255.0).abs() < 1e-6);
        assert!((g - 149.0 / 255.0).abs() < 1e-6);
        assert!((b - 237.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn uniform_block_is_256_bytes() {
        assert_eq!(std::mem::size_of::<LightsUniform>(), 256);
    }

    #[test]
    fn shadow_casters_aim_down_at_the_product() {
        let uniform = LightingRig::studio().to_uniform();

        let key_dir = Vector3::from(uniform.key_direction);
        assert!((key_dir.magnitude() - 1.0).abs() < 1e-5);
        assert!(key_dir.y < 0.0);

        let spot_dir = Vector3::from(uniform.spot_direction);
        assert!((spot_dir.magnitude() - 1.0).abs() < 1e-5);
        assert!(spot_dir.y < 0.0);
    }

    #[test]
    fn spot_cone_cosines_are_ordered() {
        let uniform = LightingRig::studio().to_uniform();
        // Inner cone is narrower, so its cosine is larger
        assert!(uniform.spot_cos_inner > uniform.spot_cos_outer);
        assert!((uniform.spot_cos_outer - 0.3_f32.cos()).abs() < 1e-6);
        assert!((uniform.spot_cos_inner - 0.15_f32.cos()).abs() < 1e-6);
    }

    #[test]
    fn key_shadow_volume_contains_the_origin() {
        let rig = LightingRig::studio();
        let clip = rig.key_view_proj() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;

        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn fill_shadow_volume_contains_the_origin() {
        let rig = LightingRig::studio();
        let clip = rig.fill_view_proj() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;

        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
