// src/ui/panel.rs
//! Overlay panels for the product viewer
//!
//! The controls panel exposes the animation toggles and usage hints. The
//! info panel shows details for the selected part and is only built while
//! a selection exists.

use crate::product::PartMetadata;

/// Width of the part info panel in pixels
const INFO_PANEL_WIDTH: f32 = 340.0;

/// Margin between edge-anchored panels and the window border
const PANEL_MARGIN: f32 = 20.0;

/// Builds the viewer controls panel
///
/// Mutates the two flags in place when the user toggles them; the caller
/// applies the new values to the scene after the UI pass.
pub fn controls_panel(ui: &imgui::Ui, auto_rotate: &mut bool, floating: &mut bool) {
    ui.window("Viewer Controls")
        .position([PANEL_MARGIN, PANEL_MARGIN], imgui::Condition::FirstUseEver)
        .size([260.0, 0.0], imgui::Condition::FirstUseEver)
        .resizable(false)
        .collapsible(true)
        .build(|| {
            // Stable ID suffix so the button survives its label changing
            let rotate_label = if *auto_rotate {
                "Auto Rotate: ON##auto_rotate"
            } else {
                "Auto Rotate: OFF##auto_rotate"
            };
            if ui.button(rotate_label) {
                *auto_rotate = !*auto_rotate;
            }

            ui.checkbox("Floating Animation", floating);

            ui.separator();
            ui.text("Drag to orbit the camera");
            ui.text("Scroll to zoom in and out");
            ui.text("Click a part for details");
        });
}

/// Builds the part info panel for the current selection
///
/// Anchored to the top-right corner of the window. Returns true when the
/// close button was clicked this frame.
pub fn info_panel(ui: &imgui::Ui, part: &PartMetadata) -> bool {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return false;
    }

    let mut close_clicked = false;
    ui.window("Part Details")
        .position(
            [
                display_size[0] - INFO_PANEL_WIDTH - PANEL_MARGIN,
                PANEL_MARGIN,
            ],
            imgui::Condition::Always,
        )
        .size([INFO_PANEL_WIDTH, 0.0], imgui::Condition::Always)
        .resizable(false)
        .collapsible(false)
        .movable(false)
        .build(|| {
            ui.text(&part.title);
            ui.separator();
            ui.text_wrapped(&part.description);
            ui.spacing();
            if ui.button("Close") {
                close_clicked = true;
            }
        });

    close_clicked
}
