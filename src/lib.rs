// src/lib.rs
//! Vitrine
//!
//! An interactive 3D product viewer built on wgpu and winit. A chair
//! assembled from primitive meshes sits under a fixed studio light rig;
//! the camera orbits with inertia, parts respond to hover and click, and
//! an ImGui overlay shows part details and animation toggles.

pub mod animation;
pub mod app;
pub mod gfx;
pub mod interaction;
pub mod product;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ViewerApp;

/// Builds the viewer and runs it until the window closes
pub fn run() -> anyhow::Result<()> {
    ViewerApp::new()?.run()
}
