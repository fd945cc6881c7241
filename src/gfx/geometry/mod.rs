//! # Procedural Geometry Generation
//!
//! This module provides functions to generate the primitive shapes the
//! product catalog is built from, eliminating the need for external model
//! files.
//!
//! ## Supported Primitives
//!
//! - **Box**: axis-aligned box with per-face normals
//! - **Cylinder**: capped cylinder along the Y axis
//! - **Sphere**: UV sphere with configurable resolution
//! - **Plane**: flat ground plane in the XZ plane
//!
//! ## Usage
//!
//! ```rust
//! use vitrine::gfx::geometry::{generate_box, generate_cylinder};
//!
//! // A chair-seat sized slab
//! let seat = generate_box(2.0, 0.2, 2.0);
//!
//! // A chair leg
//! let leg = generate_cylinder(0.08, 1.5, 16);
//! ```

pub mod primitives;

pub use primitives::*;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Convert to the vertex format used by the renderer
    pub fn to_mesh_data(&self) -> (Vec<crate::gfx::scene::vertex::Vertex3D>, Vec<u32>) {
        use crate::gfx::scene::vertex::Vertex3D;

        let vertices: Vec<Vertex3D> = (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect();

        (vertices, self.indices.clone())
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}
