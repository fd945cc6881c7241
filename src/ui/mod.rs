//! # User Interface Module
//!
//! Dear ImGui-based overlay for the product viewer. The [`UiManager`]
//! owns the ImGui context and its wgpu renderer; [`panel`] holds the
//! panel builders the application composes each frame.
//!
//! Frame flow:
//! 1. `handle_input` filters window events and reports UI capture
//! 2. `update_logic` builds the frame from the panel builders
//! 3. `render_display_only` draws the result over the finished 3D frame

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::{controls_panel, info_panel};
