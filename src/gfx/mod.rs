//! # Graphics Module
//!
//! All graphics functionality for the product viewer: camera systems,
//! procedural geometry, lighting, the render pipeline, and scene management.
//!
//! - **Camera** ([`camera`]) - Orbit camera with inertial controls
//! - **Geometry** ([`geometry`]) - Procedural primitive meshes
//! - **Lighting** ([`lighting`]) - The fixed studio light rig
//! - **Rendering** ([`rendering`]) - PBR rendering with shadow mapping
//! - **Resources** ([`resources`]) - Materials, uniforms, and GPU textures
//! - **Scene** ([`scene`]) - Object collection and per-frame updates

pub mod camera;
pub mod geometry;
pub mod lighting;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
