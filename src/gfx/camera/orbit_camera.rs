use super::camera_utils::{
    convert_matrix4_to_array, Camera, CameraUniform, OPENGL_TO_WGPU_MATRIX,
};
use cgmath::*;

/// One full revolution per minute when idle
const AUTO_ROTATE_RATE: f32 = std::f32::consts::TAU / 60.0;

/// Fraction of pending rotation applied per frame
const DAMPING_FACTOR: f32 = 0.05;

/// Orbit camera circling a fixed target
///
/// `distance`, `pitch`, and `yaw` are the source of truth; `eye` is derived
/// from them on every change. Drag input lands in velocity accumulators and
/// bleeds into the angles over several frames, so rotation eases out instead
/// of stopping dead when the cursor stops.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub auto_rotate: bool,
    pub uniform: CameraUniform,
    yaw_velocity: f32,
    pitch_velocity: f32,
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // Will be auto-calculated in `update_eye()` nevertheless.
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: Deg(50.0).into(),
            znear: 0.1,
            zfar: 1000.0,
            auto_rotate: true,
            uniform: CameraUniform::default(),
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
        };
        camera.update_eye();
        camera
    }

    /// Creates the camera at the product display vantage
    ///
    /// Five units out along both horizontal axes and three up, looking at the
    /// origin. Zoom is held between 3 and 15 units and pitch is floored so
    /// the view never dips far below the ground plane.
    pub fn product_view(aspect: f32) -> Self {
        let start: Vector3<f32> = Vector3::new(5.0, 3.0, 5.0);
        let distance = start.magnitude();
        let pitch = (start.y / distance).asin();
        let yaw = start.x.atan2(start.z);

        let mut camera = Self::new(distance, pitch, yaw, Vector3::zero(), aspect);
        camera.bounds = OrbitCameraBounds {
            min_distance: Some(3.0),
            max_distance: Some(15.0),
            min_pitch: -std::f32::consts::FRAC_PI_6,
            max_pitch: std::f32::consts::FRAC_PI_2 - f32::EPSILON,
            min_yaw: None,
            max_yaw: None,
        };
        camera
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update_eye();
    }

    pub fn add_distance(&mut self, delta: f32) {
        let corrected_zoom = f32::log10(self.distance) * delta;
        self.set_distance(self.distance + corrected_zoom);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update_eye();
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        let mut bounded_yaw = yaw;
        if let Some(min_yaw) = self.bounds.min_yaw {
            bounded_yaw = bounded_yaw.clamp(min_yaw, f32::MAX);
        }
        if let Some(max_yaw) = self.bounds.max_yaw {
            bounded_yaw = bounded_yaw.clamp(f32::MIN, max_yaw);
        }
        self.yaw = bounded_yaw;
        self.update_eye();
    }

    /// Queues a drag rotation and stops the idle spin
    ///
    /// The first manual drag takes over from auto-rotation; it stays off
    /// until re-enabled through the controls panel.
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.auto_rotate = false;
        self.yaw_velocity += delta_yaw;
        self.pitch_velocity += delta_pitch;
    }

    /// Per-frame motion: idle spin plus damped drag smoothing
    pub fn update(&mut self, dt: f32) {
        if self.auto_rotate {
            self.set_yaw(self.yaw + AUTO_ROTATE_RATE * dt);
        }

        if self.yaw_velocity.abs() > 1e-6 || self.pitch_velocity.abs() > 1e-6 {
            self.set_yaw(self.yaw + self.yaw_velocity * DAMPING_FACTOR);
            self.set_pitch(self.pitch + self.pitch_velocity * DAMPING_FACTOR);
            self.yaw_velocity *= 1.0 - DAMPING_FACTOR;
            self.pitch_velocity *= 1.0 - DAMPING_FACTOR;
        }
    }

    /// Updates the eye after changing `distance`, `pitch` or `yaw`.
    fn update_eye(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_yaw: Option<f32>,
    pub max_yaw: Option<f32>,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: None,
            max_distance: Some(16.0),
            min_pitch: -std::f32::consts::PI / 2.0 + f32::EPSILON,
            max_pitch: std::f32::consts::PI / 2.0 - f32::EPSILON,
            min_yaw: None,
            max_yaw: None,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn product_view_starts_at_display_vantage() {
        let camera = OrbitCamera::product_view(16.0 / 9.0);
        assert!((camera.eye.x - 5.0).abs() < 1e-4);
        assert!((camera.eye.y - 3.0).abs() < 1e-4);
        assert!((camera.eye.z - 5.0).abs() < 1e-4);
        assert_eq!(camera.target, Vector3::zero());
        assert!(camera.auto_rotate);
    }

    #[test]
    fn zoom_is_clamped_to_bounds() {
        let mut camera = OrbitCamera::product_view(1.0);
        camera.set_distance(100.0);
        assert_eq!(camera.distance, 15.0);
        camera.set_distance(0.5);
        assert_eq!(camera.distance, 3.0);
    }

    #[test]
    fn pitch_floor_keeps_view_above_ground() {
        let mut camera = OrbitCamera::product_view(1.0);
        camera.set_pitch(-std::f32::consts::PI);
        assert!((camera.pitch - -std::f32::consts::FRAC_PI_6).abs() < 1e-6);
    }

    #[test]
    fn damped_rotation_converges_to_full_input() {
        let mut camera = OrbitCamera::product_view(1.0);
        let start_yaw = camera.yaw;
        camera.rotate(1.0, 0.0);

        // One frame applies only a slice of the input
        camera.update(DT);
        let after_one = camera.yaw - start_yaw;
        assert!(after_one > 0.0 && after_one < 0.1);

        for _ in 0..400 {
            camera.update(DT);
        }
        assert!((camera.yaw - start_yaw - 1.0).abs() < 1e-3);
    }

    #[test]
    fn first_drag_stops_auto_rotation() {
        let mut camera = OrbitCamera::product_view(1.0);
        let idle_yaw = camera.yaw;
        camera.update(1.0);
        assert!((camera.yaw - idle_yaw - std::f32::consts::TAU / 60.0).abs() < 1e-5);

        camera.rotate(0.1, 0.0);
        assert!(!camera.auto_rotate);

        // Let the drag damp out, then confirm the yaw holds still
        for _ in 0..400 {
            camera.update(DT);
        }
        let settled_yaw = camera.yaw;
        camera.update(1.0);
        assert!((camera.yaw - settled_yaw).abs() < 1e-6);
    }

    #[test]
    fn target_projects_to_screen_center() {
        let mut camera = OrbitCamera::product_view(1.5);
        camera.update_view_proj();
        let clip = camera.build_view_projection_matrix()
            * Vector4::new(camera.target.x, camera.target.y, camera.target.z, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-4);
        assert!((clip.y / clip.w).abs() < 1e-4);
    }
}
