use cgmath::{Vector3, Zero};
use wgpu::Device;

use crate::gfx::{camera::camera_utils::CameraManager, lighting::LightingRig};

use super::object::Object;

/// Main scene containing objects, lighting, and camera
///
/// `product_offset` is the shared vertical lift applied to every grouped
/// object; the floating animation writes it once per frame and all product
/// parts move together while the ground stays put.
pub struct Scene {
    pub camera_manager: CameraManager,
    pub objects: Vec<Object>,
    pub product_offset: Vector3<f32>,
    pub lighting: LightingRig,
    pub background: wgpu::Color,
}

impl Scene {
    /// Creates a new scene with the given camera manager
    ///
    /// The studio light rig is installed here and stays fixed for the life
    /// of the scene. The background is the viewer's light neutral gray.
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            objects: Vec::new(),
            product_offset: Vector3::zero(),
            lighting: LightingRig::studio(),
            background: wgpu::Color {
                r: 248.0 / 255.0,
                g: 249.0 / 255.0,
                b: 250.0 / 255.0,
                a: 1.0,
            },
        }
    }

    /// Adds an object and returns its stable index
    ///
    /// Indices never shift because the viewer only ever appends objects.
    pub fn add_object(&mut self, object: Object) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// Advances camera motion and refreshes the camera uniform
    pub fn update(&mut self, dt: f32) {
        self.camera_manager.update(dt);
    }

    /// Initializes GPU resources for all objects and their materials
    ///
    /// Must be called after the GPU context is available and before rendering.
    pub fn init_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        let group_translation = self.product_offset;
        for object in self.objects.iter_mut() {
            object.init_gpu_resources(device);
            object.update_transform(queue, group_translation);
            object.material.update_gpu_resources(device, queue);
        }
    }

    /// Syncs per-object transforms and material changes to the GPU
    ///
    /// Called once per frame after animation and interaction updates so the
    /// draw passes see the current group lift, feedback scales, and tints.
    pub fn update_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        let group_translation = self.product_offset;
        for object in self.objects.iter_mut() {
            if object.gpu_resources.is_some() {
                object.update_transform(queue, group_translation);
            }
            object.material.update_gpu_resources(device, queue);
        }
    }

    /// Gets immutable reference to an object by index
    pub fn get_object(&self, index: usize) -> Option<&Object> {
        self.objects.get(index)
    }

    /// Gets mutable reference to an object by index
    pub fn get_object_mut(&mut self, index: usize) -> Option<&mut Object> {
        self.objects.get_mut(index)
    }

    /// Gets the total number of objects
    pub fn get_object_count(&self) -> usize {
        self.objects.len()
    }

    /// Visible objects that respond to pointer ray tests, with their indices
    pub fn pickable_objects(&self) -> impl Iterator<Item = (usize, &Object)> {
        self.objects
            .iter()
            .enumerate()
            .filter(|(_, object)| object.visible && object.pickable)
    }
}
