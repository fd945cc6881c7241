//! # Part Picking
//!
//! Mouse ray-casting against the product's parts.
//!
//! ## How it works
//!
//! 1. **Mouse to Ray**: Convert mouse coordinates to a 3D ray in world space
//! 2. **Ray-Part Intersection**: Test the ray against part bounding boxes
//! 3. **Selection**: Return the closest intersected part
//!
//! Only objects flagged `pickable` participate; the ground plane and any
//! hidden objects are skipped. Bounding boxes are computed once from mesh
//! data and re-transformed by the current model matrix on every test, so
//! hover scaling and the floating lift are both picked against accurately.

use crate::gfx::{camera::orbit_camera::OrbitCamera, scene::Scene};
use cgmath::{
    ElementWise, EuclideanSpace, InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4, Zero,
};

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl AABB {
    /// Create a new AABB
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Create AABB from a set of vertices
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        if vertices.is_empty() {
            return Self::new(Vector3::zero(), Vector3::zero());
        }

        let mut min = Vector3::new(vertices[0][0], vertices[0][1], vertices[0][2]);
        let mut max = min;

        for vertex in vertices.iter().skip(1) {
            let v = Vector3::new(vertex[0], vertex[1], vertex[2]);
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            min.z = min.z.min(v.z);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
            max.z = max.z.max(v.z);
        }

        Self::new(min, max)
    }

    /// Test ray-AABB intersection
    /// Returns the distance to intersection point, or None if no intersection
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

    /// Apply a transformation matrix to the AABB
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        // Transform all 8 corners of the AABB and compute new bounds
        let corners = [
            Vector3::new(self.min.x, self.min.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.min.z),
            Vector3::new(self.min.x, self.max.y, self.min.z),
            Vector3::new(self.min.x, self.min.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.max.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.max.z),
        ];

        let mut transformed_corners = Vec::with_capacity(8);
        for corner in &corners {
            let homogeneous = Vector4::new(corner.x, corner.y, corner.z, 1.0);
            let transformed = matrix * homogeneous;
            transformed_corners.push([
                transformed.x / transformed.w,
                transformed.y / transformed.w,
                transformed.z / transformed.w,
            ]);
        }

        Self::from_vertices(&transformed_corners)
    }
}

/// Result of a part picking operation
#[derive(Debug, Clone, Copy)]
pub struct PickResult {
    /// Index of the picked object in the scene
    pub object_index: usize,
    /// Distance from ray origin to intersection point
    pub distance: f32,
}

/// Ray-caster over the scene's pickable objects
pub struct PartPicker {
    /// Cache bounding boxes to avoid recomputation
    cached_aabbs: Vec<Option<AABB>>,
}

impl PartPicker {
    /// Create a new part picker
    pub fn new() -> Self {
        Self {
            cached_aabbs: Vec::new(),
        }
    }

    /// Convert screen coordinates to a world-space ray
    pub fn screen_to_ray(
        screen_pos: (f32, f32),
        screen_size: (f32, f32),
        camera: &OrbitCamera,
    ) -> Ray {
        let (mouse_x, mouse_y) = screen_pos;
        let (screen_width, screen_height) = screen_size;

        // Convert screen coordinates to normalized device coordinates (-1 to 1)
        let ndc_x = (2.0 * mouse_x) / screen_width - 1.0;
        let ndc_y = 1.0 - (2.0 * mouse_y) / screen_height; // Flip Y axis

        let eye = cgmath::Point3::from_vec(camera.eye);
        let target = cgmath::Point3::from_vec(camera.target);
        let view_matrix = Matrix4::look_at_rh(eye, target, camera.up);
        let proj_matrix =
            cgmath::perspective(camera.fovy, camera.aspect, camera.znear, camera.zfar);

        let view_proj_matrix = proj_matrix * view_matrix;
        let inv_view_proj = view_proj_matrix.invert().unwrap_or(Matrix4::from_scale(1.0));

        // Transform near and far points from NDC to world space
        let near_point = Vector4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far_point = Vector4::new(ndc_x, ndc_y, 1.0, 1.0);

        let world_near = inv_view_proj * near_point;
        let world_far = inv_view_proj * far_point;

        let near_3d = Vector3::new(
            world_near.x / world_near.w,
            world_near.y / world_near.w,
            world_near.z / world_near.w,
        );
        let far_3d = Vector3::new(
            world_far.x / world_far.w,
            world_far.y / world_far.w,
            world_far.z / world_far.w,
        );

        Ray::new(near_3d, far_3d - near_3d)
    }

    /// Pick the nearest pickable part under the given screen position
    pub fn pick_part(
        &mut self,
        screen_pos: (f32, f32),
        screen_size: (f32, f32),
        scene: &Scene,
    ) -> Option<PickResult> {
        let ray = Self::screen_to_ray(screen_pos, screen_size, &scene.camera_manager.camera);

        // Ensure we have enough cached AABBs
        while self.cached_aabbs.len() < scene.objects.len() {
            self.cached_aabbs.push(None);
        }

        let mut closest_result: Option<PickResult> = None;

        for (index, object) in scene.pickable_objects() {
            let aabb = match &self.cached_aabbs[index] {
                Some(cached) => *cached,
                None => {
                    let aabb = Self::compute_object_aabb(object);
                    self.cached_aabbs[index] = Some(aabb);
                    aabb
                }
            };

            // Pick against the object exactly as rendered: group lift and
            // feedback scale included
            let world_aabb = aabb.transform(&object.model_matrix(scene.product_offset));

            if let Some(distance) = world_aabb.intersect_ray(&ray) {
                if closest_result
                    .as_ref()
                    .map_or(true, |result| distance < result.distance)
                {
                    closest_result = Some(PickResult {
                        object_index: index,
                        distance,
                    });
                }
            }
        }

        closest_result
    }

    /// Compute AABB for an object from its mesh data
    fn compute_object_aabb(object: &crate::gfx::scene::object::Object) -> AABB {
        let vertices: Vec<[f32; 3]> = object
            .mesh
            .vertices()
            .iter()
            .map(|vertex| vertex.position)
            .collect();

        if vertices.is_empty() {
            // Fallback to unit cube if no vertices
            AABB::new(Vector3::new(-0.5, -0.5, -0.5), Vector3::new(0.5, 0.5, 0.5))
        } else {
            AABB::from_vertices(&vertices)
        }
    }
}

impl Default for PartPicker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{CameraController, CameraManager, OrbitCamera};
    use crate::gfx::geometry::generate_box;
    use crate::gfx::scene::{Mesh, Object};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn test_scene(camera: OrbitCamera) -> Scene {
        let controller = CameraController::new(0.005, 0.8);
        Scene::new(CameraManager::new(camera, controller))
    }

    fn unit_box_object(name: &str, position: Vector3<f32>) -> Object {
        Object::new(name, Mesh::from_geometry(&generate_box(1.0, 1.0, 1.0)))
            .with_position(position)
            .with_pickable(true)
    }

    #[test]
    fn aabb_from_vertices_spans_extremes() {
        let vertices = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [-1.0, -1.0, -1.0]];
        let aabb = AABB::from_vertices(&vertices);

        assert_eq!(aabb.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn ray_aabb_intersection_hits_and_misses() {
        let aabb = AABB::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));

        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray).is_some());

        let ray_miss = Ray::new(Vector3::new(5.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray_miss).is_none());
    }

    #[test]
    fn ray_from_inside_box_still_reports_a_hit() {
        let aabb = AABB::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));
        let ray = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

        let distance = aabb.intersect_ray(&ray).unwrap();
        assert!(distance >= 0.0);
    }

    #[test]
    fn center_ray_points_at_the_camera_target() {
        let camera = OrbitCamera::product_view(800.0 / 600.0);
        let ray = PartPicker::screen_to_ray((400.0, 300.0), (800.0, 600.0), &camera);

        let to_target = (camera.target - camera.eye).normalize();
        assert!((ray.direction - to_target).magnitude() < 1e-3);
    }

    #[test]
    fn nearest_of_two_boxes_wins() {
        // Camera at (0, 0, 5) looking down -Z
        let camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        let mut scene = test_scene(camera);

        let near = scene.add_object(unit_box_object("near", Vector3::zero()));
        let far = scene.add_object(unit_box_object("far", Vector3::new(0.0, 0.0, -3.0)));

        let mut picker = PartPicker::new();
        let hit = picker
            .pick_part((200.0, 200.0), (400.0, 400.0), &scene)
            .unwrap();
        assert_eq!(hit.object_index, near);

        // Hide the near box and the far one becomes the closest hit
        scene.objects[near].visible = false;
        let hit = picker
            .pick_part((200.0, 200.0), (400.0, 400.0), &scene)
            .unwrap();
        assert_eq!(hit.object_index, far);
    }

    #[test]
    fn non_pickable_objects_are_ignored() {
        let camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        let mut scene = test_scene(camera);
        scene.add_object(unit_box_object("box", Vector3::zero()).with_pickable(false));

        let mut picker = PartPicker::new();
        assert!(picker
            .pick_part((200.0, 200.0), (400.0, 400.0), &scene)
            .is_none());
    }

    #[test]
    fn group_lift_moves_the_pick_target() {
        let camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        let mut scene = test_scene(camera);
        scene.add_object(unit_box_object("box", Vector3::zero()).with_grouped(true));

        let mut picker = PartPicker::new();
        assert!(picker
            .pick_part((200.0, 200.0), (400.0, 400.0), &scene)
            .is_some());

        // Lift the group clear of the center ray and the pick misses
        scene.product_offset = Vector3::new(0.0, 10.0, 0.0);
        assert!(picker
            .pick_part((200.0, 200.0), (400.0, 400.0), &scene)
            .is_none());
    }

    #[test]
    fn rays_aimed_at_a_box_always_hit_it() {
        let aabb = AABB::new(
            Vector3::new(-0.5, -0.5, -0.5),
            Vector3::new(0.5, 0.5, 0.5),
        );
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let theta: f32 = rng.random_range(0.0..std::f32::consts::TAU);
            let phi: f32 = rng.random_range(-1.2..1.2);
            let origin = Vector3::new(
                10.0 * theta.cos() * phi.cos(),
                10.0 * phi.sin(),
                10.0 * theta.sin() * phi.cos(),
            );

            // Any ray through the box center must intersect the box
            let ray = Ray::new(origin, -origin);
            assert!(aabb.intersect_ray(&ray).is_some());
        }
    }
}
