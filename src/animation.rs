//! Floating animation for the product group
//!
//! Writes the shared vertical offset every frame while enabled. The motion
//! is a pure function of elapsed time, so pausing the clock freezes the
//! product in place and equal timestamps always produce equal offsets.

use crate::gfx::scene::Scene;

const FLOAT_FREQUENCY: f32 = 0.5;
const FLOAT_AMPLITUDE: f32 = 0.1;

/// Gentle vertical bobbing applied to all grouped objects
pub struct FloatAnimation {
    enabled: bool,
}

impl FloatAnimation {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables floating
    ///
    /// Disabling drops the product back to rest immediately rather than
    /// waiting for the sine to cross zero.
    pub fn set_enabled(&mut self, enabled: bool, scene: &mut Scene) {
        self.enabled = enabled;
        if !enabled {
            scene.product_offset.y = 0.0;
        }
    }

    /// Per-frame update with monotonically non-decreasing elapsed seconds
    pub fn update(&self, scene: &mut Scene, elapsed_seconds: f32) {
        if self.enabled {
            scene.product_offset.y = (elapsed_seconds * FLOAT_FREQUENCY).sin() * FLOAT_AMPLITUDE;
        }
    }
}

impl Default for FloatAnimation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{CameraController, CameraManager, OrbitCamera};

    fn empty_scene() -> Scene {
        let camera = OrbitCamera::product_view(1.0);
        let controller = CameraController::new(0.005, 0.8);
        Scene::new(CameraManager::new(camera, controller))
    }

    #[test]
    fn offset_follows_the_float_curve() {
        let mut scene = empty_scene();
        let animation = FloatAnimation::new();

        animation.update(&mut scene, 1.0);
        let expected = (1.0_f32 * 0.5).sin() * 0.1;
        assert!((scene.product_offset.y - expected).abs() < 1e-6);
    }

    #[test]
    fn motion_is_periodic() {
        let mut scene = empty_scene();
        let animation = FloatAnimation::new();
        let period = 2.0 * std::f32::consts::PI / 0.5;

        animation.update(&mut scene, 3.2);
        let first = scene.product_offset.y;
        animation.update(&mut scene, 3.2 + period);
        let second = scene.product_offset.y;

        assert!((first - second).abs() < 1e-4);
    }

    #[test]
    fn disabling_rests_the_product_immediately() {
        let mut scene = empty_scene();
        let mut animation = FloatAnimation::new();

        animation.update(&mut scene, 2.0);
        assert!(scene.product_offset.y != 0.0);

        animation.set_enabled(false, &mut scene);
        assert_eq!(scene.product_offset.y, 0.0);

        // Further updates leave it at rest until re-enabled
        animation.update(&mut scene, 7.0);
        assert_eq!(scene.product_offset.y, 0.0);

        animation.set_enabled(true, &mut scene);
        animation.update(&mut scene, 7.0);
        assert!(scene.product_offset.y != 0.0);
    }
}
