//! # Scene Management Module
//!
//! This module provides 3D scene management functionality including the
//! object list, vertex data structures, and the scene container that ties
//! objects to the camera and light rig.
//!
//! ## Key Components
//!
//! - [`Scene`] - The main scene container that manages objects, camera, and lighting
//! - [`Object`] - Individual 3D objects with a mesh, material, and transform
//! - [`Vertex3D`] - 3D vertex data structure with position and normal
//!
//! ## Object Management
//!
//! Objects in the scene support:
//! - Procedurally generated primitive meshes
//! - Per-object material assignment and PBR properties
//! - Position and uniform scale transforms, plus a shared group offset
//! - GPU resource management
//! - Picking and shadow-casting flags

pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use object::{DrawObject, Mesh, Object};
pub use scene::Scene;
pub use vertex::Vertex3D;
