use std::ops::Range;

use cgmath::{Matrix4, Vector3, Zero};
use wgpu::util::DeviceExt;
use wgpu::Device;

use crate::gfx::geometry::GeometryData;
use crate::gfx::resources::material::Material;

use super::vertex::Vertex3D;

/// Indexed triangle mesh with lazily created GPU buffers
pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    pub index_count: u32,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        let index_count = indices.len() as u32;
        Self {
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
            index_count,
        }
    }

    /// Builds a mesh from generated primitive geometry
    pub fn from_geometry(geometry: &GeometryData) -> Self {
        let (vertices, indices) = geometry.to_mesh_data();
        Self::new(vertices, indices)
    }

    /// CPU-side vertex data, used for bounding volume construction
    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }
}

// GPU resources struct to hold the per-object uniform buffer and bind group
pub struct ObjectGpuResources {
    pub transform_buffer: wgpu::Buffer,
    pub transform_bind_group: wgpu::BindGroup,
}

/// A single displayable item in the scene
///
/// Product parts and the ground plane are all `Object`s. Parts carry
/// `pickable` and `grouped` so the picker and the floating animation know
/// which objects they own; the ground sets neither.
pub struct Object {
    pub name: String,
    pub mesh: Mesh,
    pub position: Vector3<f32>,
    pub scale: f32,
    pub material: Material,
    pub visible: bool,
    pub pickable: bool,
    pub grouped: bool,
    pub cast_shadows: bool,
    pub gpu_resources: Option<ObjectGpuResources>,
}

impl Object {
    /// Create a new object at the origin with a default material
    pub fn new(name: &str, mesh: Mesh) -> Self {
        Self {
            name: name.to_string(),
            mesh,
            position: Vector3::zero(),
            scale: 1.0,
            material: Material::default(),
            visible: true,
            pickable: false,
            grouped: false,
            cast_shadows: true,
            gpu_resources: None,
        }
    }

    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_pickable(mut self, pickable: bool) -> Self {
        self.pickable = pickable;
        self
    }

    pub fn with_grouped(mut self, grouped: bool) -> Self {
        self.grouped = grouped;
        self
    }

    pub fn with_cast_shadows(mut self, cast_shadows: bool) -> Self {
        self.cast_shadows = cast_shadows;
        self
    }

    /// Composes the object's world transform
    ///
    /// Grouped objects ride the shared product offset; the ground plane and
    /// other ungrouped objects ignore it. Scale is applied about the
    /// object's own position, which is what makes selection feedback swell a
    /// part in place rather than push it away from the product center.
    pub fn model_matrix(&self, group_translation: Vector3<f32>) -> Matrix4<f32> {
        let lift = if self.grouped {
            group_translation
        } else {
            Vector3::zero()
        };
        Matrix4::from_translation(lift + self.position) * Matrix4::from_scale(self.scale)
    }

    /// Writes the current model matrix into the GPU transform buffer
    pub fn update_transform(&mut self, queue: &wgpu::Queue, group_translation: Vector3<f32>) {
        if let Some(gpu_resources) = &self.gpu_resources {
            let matrix = self.model_matrix(group_translation);
            // cgmath matrices are column-major, which is what GPU expects
            let transform_data: &[f32; 16] = matrix.as_ref();

            queue.write_buffer(
                &gpu_resources.transform_buffer,
                0,
                bytemuck::cast_slice(transform_data),
            );
        }
    }

    /// Get the transform bind group for rendering
    pub fn get_transform_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources
            .as_ref()
            .map(|res| &res.transform_bind_group)
    }

    pub fn init_gpu_resources(&mut self, device: &Device) {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&self.mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        self.mesh.vertex_buffer = Some(vertex_buffer);
        self.mesh.index_buffer = Some(index_buffer);

        // cgmath matrices are already column-major for GPU
        let matrix = self.model_matrix(Vector3::zero());
        let transform_data: &[f32; 16] = matrix.as_ref();

        let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Transform Uniform Buffer"),
            contents: bytemuck::cast_slice(transform_data),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

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

        let transform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Transform Bind Group"),
            layout: &transform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_buffer.as_entire_binding(),
            }],
        });

        self.gpu_resources = Some(ObjectGpuResources {
            transform_buffer,
            transform_bind_group,
        });
    }
}

pub trait DrawObject<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
    fn draw_mesh_instanced(&mut self, mesh: &'a Mesh, instances: Range<u32>);
    fn draw_object(&mut self, object: &'a Object);
}

impl<'a, 'b> DrawObject<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        self.draw_mesh_instanced(mesh, 0..1);
    }

    fn draw_mesh_instanced(&mut self, mesh: &'b Mesh, instances: Range<u32>) {
        let vertex_buffer = match &mesh.vertex_buffer {
            Some(buffer) => buffer,
            None => return, // Skip drawing if not uploaded
        };
        let index_buffer = match &mesh.index_buffer {
            Some(buffer) => buffer,
            None => return,
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, instances);
    }

    fn draw_object(&mut self, object: &'b Object) {
        self.draw_mesh(&object.mesh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_box;
    use cgmath::Vector4;

    #[test]
    fn model_matrix_scales_about_object_position() {
        let mesh = Mesh::from_geometry(&generate_box(1.0, 1.0, 1.0));
        let mut object = Object::new("part", mesh).with_position(Vector3::new(2.0, 1.0, -3.0));
        object.scale = 1.05;

        let matrix = object.model_matrix(Vector3::zero());
        let center = matrix * Vector4::new(0.0, 0.0, 0.0, 1.0);

        // The local origin stays pinned while the geometry swells around it
        assert!((center.x - 2.0).abs() < 1e-6);
        assert!((center.y - 1.0).abs() < 1e-6);
        assert!((center.z - -3.0).abs() < 1e-6);

        let corner = matrix * Vector4::new(0.5, 0.5, 0.5, 1.0);
        assert!((corner.x - (2.0 + 0.525)).abs() < 1e-6);
    }

    #[test]
    fn group_offset_moves_only_grouped_objects() {
        let lift = Vector3::new(0.0, 0.1, 0.0);

        let part = Object::new("part", Mesh::from_geometry(&generate_box(1.0, 1.0, 1.0)))
            .with_grouped(true);
        let lifted = part.model_matrix(lift) * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!((lifted.y - 0.1).abs() < 1e-6);

        let ground = Object::new("ground", Mesh::from_geometry(&generate_box(1.0, 1.0, 1.0)));
        let still = ground.model_matrix(lift) * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!(still.y.abs() < 1e-6);
    }
}
