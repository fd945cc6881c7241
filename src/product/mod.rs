//! # Product Model Builder
//!
//! Turns the declarative part catalog into scene objects and keeps the
//! descriptive metadata in a side table keyed by scene object index. The
//! interaction layer looks parts up there for panel text and for the
//! original colors it restores after hover and selection feedback.

use std::collections::HashMap;

use crate::gfx::{
    geometry::{generate_box, generate_cylinder, generate_plane, generate_sphere, GeometryData},
    resources::material::Material,
    scene::{Mesh, Object, Scene},
};

pub mod chair;

pub use chair::CHAIR_PARTS;

/// Primitive shape selector for part construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Box,
    Cylinder,
    Sphere,
}

/// Immutable description of one product part
///
/// Defined once in the catalog and never mutated. `shape_args` is read
/// positionally per shape kind; missing entries fall back to unit-sized
/// defaults rather than failing.
#[derive(Debug, Clone, Copy)]
pub struct PartDescriptor {
    pub name: &'static str,
    pub shape: ShapeKind,
    pub shape_args: &'static [f32],
    pub position: [f32; 3],
    pub color: u32,
    pub title: &'static str,
    pub description: &'static str,
}

/// Descriptive metadata for a built part
#[derive(Debug, Clone)]
pub struct PartMetadata {
    pub name: String,
    pub title: String,
    pub description: String,
    pub base_color: u32,
}

/// Side table from scene object index to part metadata
///
/// Only product parts appear here; the ground plane has no entry, which is
/// what makes metadata lookups a natural guard against acting on it.
pub struct ProductModel {
    parts: HashMap<usize, PartMetadata>,
}

impl ProductModel {
    pub fn metadata(&self, object_index: usize) -> Option<&PartMetadata> {
        self.parts.get(&object_index)
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn part_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.parts.keys().copied()
    }
}

/// Uniform surface finish for all wooden parts
const PART_METALLIC: f32 = 0.1;
const PART_ROUGHNESS: f32 = 0.3;

/// Builds the product and its ground plane into the scene
///
/// Every catalog part becomes a pickable, grouped, shadow-casting object.
/// The ground plane is added directly: semi-transparent, never picked, and
/// outside the floating group so it stays put while the product bobs.
/// Must run exactly once per scene; a second invocation would duplicate
/// the geometry.
pub fn build_product(scene: &mut Scene) -> ProductModel {
    let mut parts = HashMap::new();

    for descriptor in CHAIR_PARTS {
        let geometry = build_shape(descriptor.shape, descriptor.shape_args);
        let object = Object::new(descriptor.name, Mesh::from_geometry(&geometry))
            .with_position(descriptor.position.into())
            .with_material(Material::from_hex(
                descriptor.name,
                descriptor.color,
                PART_METALLIC,
                PART_ROUGHNESS,
            ))
            .with_pickable(true)
            .with_grouped(true);

        let object_index = scene.add_object(object);
        parts.insert(
            object_index,
            PartMetadata {
                name: descriptor.name.to_string(),
                title: descriptor.title.to_string(),
                description: descriptor.description.to_string(),
                base_color: descriptor.color,
            },
        );
    }

    let ground = Object::new("ground", Mesh::from_geometry(&generate_plane(20.0, 20.0, 1, 1)))
        .with_position([0.0, -2.0, 0.0].into())
        .with_material(Material::from_hex("Ground", 0x1a1a1a, 0.0, 1.0).with_alpha(0.3))
        .with_cast_shadows(false);
    scene.add_object(ground);

    log::info!("built product with {} parts", parts.len());

    ProductModel { parts }
}

/// Constructs primitive geometry for a shape kind
///
/// Arguments are read positionally; anything missing defaults so a sparse
/// descriptor still yields drawable geometry.
fn build_shape(kind: ShapeKind, args: &[f32]) -> GeometryData {
    let arg = |index: usize, default: f32| args.get(index).copied().unwrap_or(default);

    match kind {
        ShapeKind::Box => generate_box(arg(0, 1.0), arg(1, 1.0), arg(2, 1.0)),
        ShapeKind::Cylinder => {
            // (top radius, bottom radius, height, segments); legs are straight
            // so only the first radius is read
            generate_cylinder(arg(0, 0.5), arg(2, 1.0), arg(3, 16.0) as u32)
        }
        ShapeKind::Sphere => generate_sphere(arg(0, 0.5), arg(1, 16.0) as u32, arg(2, 12.0) as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{CameraController, CameraManager, OrbitCamera};

    fn built_scene() -> (Scene, ProductModel) {
        let camera = OrbitCamera::product_view(4.0 / 3.0);
        let controller = CameraController::new(0.005, 0.8);
        let mut scene = Scene::new(CameraManager::new(camera, controller));
        let product = build_product(&mut scene);
        (scene, product)
    }

    #[test]
    fn eight_pickable_parts_plus_ground() {
        let (scene, product) = built_scene();

        assert_eq!(product.part_count(), 8);
        assert_eq!(scene.get_object_count(), 9);
        assert_eq!(scene.pickable_objects().count(), 8);

        let ground = scene
            .objects
            .iter()
            .find(|object| object.name == "ground")
            .unwrap();
        assert!(!ground.pickable);
        assert!(!ground.grouped);
        assert!(!ground.cast_shadows);
        assert!(ground.material.is_transparent());
    }

    #[test]
    fn every_part_carries_catalog_metadata() {
        let (scene, product) = built_scene();

        for part_id in product.part_ids() {
            let metadata = product.metadata(part_id).unwrap();
            let object = scene.get_object(part_id).unwrap();
            assert_eq!(object.name, metadata.name);
            assert!(!metadata.title.is_empty());
            assert!(!metadata.description.is_empty());
        }

        let seat_id = product
            .part_ids()
            .find(|&id| scene.get_object(id).unwrap().name == "seat")
            .unwrap();
        let seat = product.metadata(seat_id).unwrap();
        assert_eq!(seat.title, "Chair Seat");
        assert_eq!(seat.base_color, 0x8b4513);
    }

    #[test]
    fn parts_sit_at_catalog_positions() {
        let (scene, _) = built_scene();

        let backrest = scene
            .objects
            .iter()
            .find(|object| object.name == "backrest")
            .unwrap();
        assert_eq!(backrest.position, cgmath::Vector3::new(0.0, 0.85, -0.9));
        assert!(backrest.cast_shadows);
        assert!((backrest.material.metallic - 0.1).abs() < 1e-6);
        assert!((backrest.material.roughness - 0.3).abs() < 1e-6);
    }

    #[test]
    fn back_legs_are_taller_than_front_legs() {
        let (scene, _) = built_scene();

        let height = |name: &str| {
            let object = scene
                .objects
                .iter()
                .find(|object| object.name == name)
                .unwrap();
            let ys: Vec<f32> = object
                .mesh
                .vertices()
                .iter()
                .map(|vertex| vertex.position[1])
                .collect();
            ys.iter().cloned().fold(f32::MIN, f32::max) - ys.iter().cloned().fold(f32::MAX, f32::min)
        };

        assert!((height("front-left-leg") - 1.5).abs() < 1e-4);
        assert!((height("back-left-leg") - 2.5).abs() < 1e-4);
    }

    #[test]
    fn sparse_shape_args_fall_back_to_unit_box() {
        let geometry = build_shape(ShapeKind::Box, &[]);
        let xs: Vec<f32> = geometry.vertices.iter().map(|v| v[0]).collect();
        let max_x = xs.iter().cloned().fold(f32::MIN, f32::max);
        assert!((max_x - 0.5).abs() < 1e-6);
    }
}
