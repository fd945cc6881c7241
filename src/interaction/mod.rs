//! # Interaction State Machine
//!
//! Tracks which product part is hovered and which is selected, applies the
//! visual feedback for both states, and drives the info panel contract:
//! the panel shows exactly the selected part's title and description, and is
//! hidden exactly when nothing is selected.
//!
//! ## States
//!
//! - **Hover**: orange tint, faint glow, 1.05x scale. Applied to at most one
//!   part, never to the selected part.
//! - **Selection**: gold tint, stronger glow, and a press-then-settle scale:
//!   0.95x at click time, 1.1x once the settle timer fires.
//! - **Restored**: catalog color, no glow, 1.0x scale. Restoring is
//!   idempotent, so replaying it on an already-restored part changes nothing.
//!
//! The settle is a cancellable task keyed to the part captured at click
//! time. Selecting another part or clearing the selection cancels it, so a
//! settle can never land on a part that has since been restored.

pub mod picking;

pub use picking::{PartPicker, PickResult};

use std::time::{Duration, Instant};

use crate::gfx::scene::Scene;
use crate::product::{PartMetadata, ProductModel};

/// Scene object index of a product part
pub type PartId = usize;

const HOVER_COLOR: u32 = 0xffa500;
const HOVER_EMISSIVE: u32 = 0x221100;
const HOVER_SCALE: f32 = 1.05;

const SELECT_COLOR: u32 = 0xffd700;
const SELECT_EMISSIVE: u32 = 0x333300;
const SELECT_PRESS_SCALE: f32 = 0.95;
const SELECT_SETTLE_SCALE: f32 = 1.1;
const SETTLE_DELAY: Duration = Duration::from_millis(150);

/// Pointer appearance requested from the windowing layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStyle {
    Default,
    Pointer,
}

/// Deferred scale settle, keyed to the part captured at click time
#[derive(Debug, Clone, Copy)]
struct ScaleSettle {
    part: PartId,
    due: Instant,
}

/// Hover and selection state over the scene's pickable parts
pub struct InteractionController {
    picker: PartPicker,
    hovered: Option<PartId>,
    selected: Option<PartId>,
    pending_settle: Option<ScaleSettle>,
    cursor: CursorStyle,
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            picker: PartPicker::new(),
            hovered: None,
            selected: None,
            pending_settle: None,
            cursor: CursorStyle::Default,
        }
    }

    pub fn hovered(&self) -> Option<PartId> {
        self.hovered
    }

    pub fn selected(&self) -> Option<PartId> {
        self.selected
    }

    /// True while a selection's scale settle is still pending
    pub fn click_animation_in_progress(&self) -> bool {
        self.pending_settle.is_some()
    }

    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    /// Title and description for the info panel, present exactly while a
    /// part is selected
    pub fn panel_content<'a>(&self, product: &'a ProductModel) -> Option<&'a PartMetadata> {
        self.selected.and_then(|part| product.metadata(part))
    }

    /// Handles a pointer-move event at `screen_pos`
    ///
    /// The previous hover is always released first; the new hover is applied
    /// only when the pick lands on a part other than the selected one.
    pub fn pointer_moved(
        &mut self,
        screen_pos: (f32, f32),
        screen_size: (f32, f32),
        scene: &mut Scene,
        product: &ProductModel,
    ) {
        self.cursor = CursorStyle::Default;

        if let Some(previous) = self.hovered.take() {
            if Some(previous) != self.selected {
                restore_part(scene, product, previous);
            }
        }

        let pick = self.picker.pick_part(screen_pos, screen_size, scene);
        if let Some(hit) = pick {
            if Some(hit.object_index) != self.selected {
                self.cursor = CursorStyle::Pointer;
                self.hovered = Some(hit.object_index);
                apply_hover(scene, hit.object_index);
            }
        }
    }

    /// Handles a pointer-click event at `screen_pos`
    ///
    /// Any prior selection is fully restored before the new pick is applied,
    /// and its pending settle is cancelled with it. A miss leaves nothing
    /// selected, which hides the info panel.
    pub fn pointer_clicked(
        &mut self,
        screen_pos: (f32, f32),
        screen_size: (f32, f32),
        now: Instant,
        scene: &mut Scene,
        product: &ProductModel,
    ) {
        if let Some(previous) = self.selected.take() {
            self.pending_settle = None;
            restore_part(scene, product, previous);
        }

        let pick = self.picker.pick_part(screen_pos, screen_size, scene);
        let Some(hit) = pick else {
            return;
        };

        let part = hit.object_index;
        self.selected = Some(part);
        self.pending_settle = Some(ScaleSettle {
            part,
            due: now + SETTLE_DELAY,
        });
        apply_selection(scene, part);

        if let Some(metadata) = product.metadata(part) {
            log::debug!("selected part '{}'", metadata.name);
        }
    }

    /// Fires the scale settle once its delay has elapsed
    pub fn update(&mut self, now: Instant, scene: &mut Scene) {
        let Some(settle) = self.pending_settle else {
            return;
        };
        if now < settle.due {
            return;
        }

        self.pending_settle = None;
        if let Some(object) = scene.get_object_mut(settle.part) {
            object.scale = SELECT_SETTLE_SCALE;
        }
    }

    /// Closes the info panel, restoring and clearing the selection
    pub fn close_info_panel(&mut self, scene: &mut Scene, product: &ProductModel) {
        if let Some(previous) = self.selected.take() {
            self.pending_settle = None;
            restore_part(scene, product, previous);
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_hover(scene: &mut Scene, part: PartId) {
    if let Some(object) = scene.get_object_mut(part) {
        object.material.set_color_hex(HOVER_COLOR);
        object.material.set_emissive_hex(HOVER_EMISSIVE);
        object.scale = HOVER_SCALE;
    }
}

fn apply_selection(scene: &mut Scene, part: PartId) {
    if let Some(object) = scene.get_object_mut(part) {
        object.material.set_color_hex(SELECT_COLOR);
        object.material.set_emissive_hex(SELECT_EMISSIVE);
        object.scale = SELECT_PRESS_SCALE;
    }
}

/// Puts a part back to its catalog appearance
///
/// Reads the baseline from the metadata table rather than a stash taken at
/// hover time, so repeated restores are no-ops and unknown indices are
/// ignored.
fn restore_part(scene: &mut Scene, product: &ProductModel, part: PartId) {
    let Some(metadata) = product.metadata(part) else {
        return;
    };
    if let Some(object) = scene.get_object_mut(part) {
        object.material.set_color_hex(metadata.base_color);
        object.material.set_emissive_hex(0x000000);
        object.scale = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::camera_utils::Camera;
    use crate::gfx::camera::{CameraController, CameraManager, OrbitCamera};
    use crate::gfx::resources::material::hex_to_rgb;
    use crate::product::build_product;
    use cgmath::Vector4;

    const SIZE: (f32, f32) = (800.0, 600.0);
    const CENTER: (f32, f32) = (400.0, 300.0);
    const CORNER: (f32, f32) = (0.0, 0.0);

    fn fixture() -> (Scene, ProductModel, InteractionController) {
        let camera = OrbitCamera::product_view(SIZE.0 / SIZE.1);
        let controller = CameraController::new(0.005, 0.8);
        let mut scene = Scene::new(CameraManager::new(camera, controller));
        let product = build_product(&mut scene);
        (scene, product, InteractionController::new())
    }

    fn part_named(scene: &Scene, name: &str) -> PartId {
        scene
            .objects
            .iter()
            .position(|object| object.name == name)
            .unwrap()
    }

    /// Projects a world point to window pixels through the scene camera
    fn screen_pos_of(scene: &Scene, world: [f32; 3]) -> (f32, f32) {
        let camera = &scene.camera_manager.camera;
        let clip = camera.build_view_projection_matrix()
            * Vector4::new(world[0], world[1], world[2], 1.0);
        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        (
            (ndc_x + 1.0) / 2.0 * SIZE.0,
            (1.0 - ndc_y) / 2.0 * SIZE.1,
        )
    }

    fn color_of(scene: &Scene, part: PartId) -> [f32; 3] {
        let c = scene.get_object(part).unwrap().material.base_color;
        [c[0], c[1], c[2]]
    }

    #[test]
    fn hover_applies_highlight_and_pointer_cursor() {
        let (mut scene, product, mut interaction) = fixture();
        let seat = part_named(&scene, "seat");

        interaction.pointer_moved(CENTER, SIZE, &mut scene, &product);

        assert_eq!(interaction.hovered(), Some(seat));
        assert_eq!(interaction.cursor(), CursorStyle::Pointer);
        assert_eq!(color_of(&scene, seat), hex_to_rgb(0xffa500));
        assert_eq!(scene.get_object(seat).unwrap().scale, 1.05);
    }

    #[test]
    fn moving_off_a_part_restores_it() {
        let (mut scene, product, mut interaction) = fixture();
        let seat = part_named(&scene, "seat");

        interaction.pointer_moved(CENTER, SIZE, &mut scene, &product);
        interaction.pointer_moved(CORNER, SIZE, &mut scene, &product);

        assert_eq!(interaction.hovered(), None);
        assert_eq!(interaction.cursor(), CursorStyle::Default);
        assert_eq!(color_of(&scene, seat), hex_to_rgb(0x8b4513));
        assert_eq!(scene.get_object(seat).unwrap().scale, 1.0);
        assert_eq!(
            scene.get_object(seat).unwrap().material.emissive,
            [0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn click_selects_presses_and_fills_the_panel() {
        let (mut scene, product, mut interaction) = fixture();
        let seat = part_named(&scene, "seat");
        let t0 = Instant::now();

        interaction.pointer_clicked(CENTER, SIZE, t0, &mut scene, &product);

        assert_eq!(interaction.selected(), Some(seat));
        assert!(interaction.click_animation_in_progress());
        assert_eq!(color_of(&scene, seat), hex_to_rgb(0xffd700));
        assert_eq!(
            scene.get_object(seat).unwrap().material.emissive,
            hex_to_rgb(0x333300)
        );
        assert_eq!(scene.get_object(seat).unwrap().scale, 0.95);

        let panel = interaction.panel_content(&product).unwrap();
        assert_eq!(panel.title, "Chair Seat");
        assert!(panel.description.contains("solid oak"));
    }

    #[test]
    fn scale_settles_only_after_the_delay() {
        let (mut scene, product, mut interaction) = fixture();
        let seat = part_named(&scene, "seat");
        let t0 = Instant::now();

        interaction.pointer_clicked(CENTER, SIZE, t0, &mut scene, &product);

        interaction.update(t0 + Duration::from_millis(149), &mut scene);
        assert_eq!(scene.get_object(seat).unwrap().scale, 0.95);
        assert!(interaction.click_animation_in_progress());

        interaction.update(t0 + Duration::from_millis(150), &mut scene);
        assert_eq!(scene.get_object(seat).unwrap().scale, 1.1);
        assert!(!interaction.click_animation_in_progress());
    }

    #[test]
    fn clicking_empty_space_clears_selection_and_panel() {
        let (mut scene, product, mut interaction) = fixture();
        let seat = part_named(&scene, "seat");
        let t0 = Instant::now();

        interaction.pointer_clicked(CENTER, SIZE, t0, &mut scene, &product);
        interaction.pointer_clicked(CORNER, SIZE, t0, &mut scene, &product);

        assert_eq!(interaction.selected(), None);
        assert!(interaction.panel_content(&product).is_none());
        assert_eq!(color_of(&scene, seat), hex_to_rgb(0x8b4513));
        assert_eq!(scene.get_object(seat).unwrap().scale, 1.0);
    }

    #[test]
    fn selecting_another_part_restores_the_first() {
        let (mut scene, product, mut interaction) = fixture();
        let seat = part_named(&scene, "seat");
        let backrest = part_named(&scene, "backrest");
        let backrest_pos = screen_pos_of(&scene, [0.0, 0.85, -0.9]);
        let t0 = Instant::now();

        interaction.pointer_clicked(CENTER, SIZE, t0, &mut scene, &product);
        interaction.pointer_clicked(backrest_pos, SIZE, t0, &mut scene, &product);

        assert_eq!(interaction.selected(), Some(backrest));
        assert_eq!(color_of(&scene, backrest), hex_to_rgb(0xffd700));

        // No residual highlight on the previous selection
        assert_eq!(color_of(&scene, seat), hex_to_rgb(0x8b4513));
        assert_eq!(scene.get_object(seat).unwrap().scale, 1.0);
        assert_eq!(
            scene.get_object(seat).unwrap().material.emissive,
            [0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn reselecting_during_settle_cancels_the_stale_settle() {
        let (mut scene, product, mut interaction) = fixture();
        let seat = part_named(&scene, "seat");
        let backrest = part_named(&scene, "backrest");
        let backrest_pos = screen_pos_of(&scene, [0.0, 0.85, -0.9]);
        let t0 = Instant::now();

        interaction.pointer_clicked(CENTER, SIZE, t0, &mut scene, &product);
        let t1 = t0 + Duration::from_millis(50);
        interaction.pointer_clicked(backrest_pos, SIZE, t1, &mut scene, &product);

        // The seat's settle was cancelled with its restore; only the
        // backrest settles, on its own timer
        interaction.update(t0 + Duration::from_millis(200), &mut scene);
        assert_eq!(scene.get_object(seat).unwrap().scale, 1.0);
        assert_eq!(scene.get_object(backrest).unwrap().scale, 1.1);
    }

    #[test]
    fn hovering_the_selected_part_does_not_rehighlight() {
        let (mut scene, product, mut interaction) = fixture();
        let seat = part_named(&scene, "seat");
        let t0 = Instant::now();

        interaction.pointer_clicked(CENTER, SIZE, t0, &mut scene, &product);
        interaction.pointer_moved(CENTER, SIZE, &mut scene, &product);

        assert_eq!(interaction.hovered(), None);
        assert_eq!(color_of(&scene, seat), hex_to_rgb(0xffd700));
    }

    #[test]
    fn restore_is_idempotent() {
        let (mut scene, product, mut interaction) = fixture();
        let seat = part_named(&scene, "seat");

        interaction.pointer_moved(CENTER, SIZE, &mut scene, &product);
        interaction.pointer_moved(CORNER, SIZE, &mut scene, &product);

        let before = scene.get_object(seat).unwrap().material.base_color;
        restore_part(&mut scene, &product, seat);
        let after = scene.get_object(seat).unwrap().material.base_color;

        assert_eq!(before, after);
        assert_eq!(scene.get_object(seat).unwrap().scale, 1.0);
    }

    #[test]
    fn the_ground_plane_is_never_selected() {
        let (mut scene, product, mut interaction) = fixture();
        let ground_pos = screen_pos_of(&scene, [2.5, -2.0, 2.5]);
        let t0 = Instant::now();

        interaction.pointer_clicked(ground_pos, SIZE, t0, &mut scene, &product);

        assert_eq!(interaction.selected(), None);
        assert!(interaction.panel_content(&product).is_none());
    }

    #[test]
    fn closing_the_panel_deselects_and_restores() {
        let (mut scene, product, mut interaction) = fixture();
        let seat = part_named(&scene, "seat");
        let t0 = Instant::now();

        interaction.pointer_clicked(CENTER, SIZE, t0, &mut scene, &product);
        interaction.close_info_panel(&mut scene, &product);

        assert_eq!(interaction.selected(), None);
        assert!(!interaction.click_animation_in_progress());
        assert!(interaction.panel_content(&product).is_none());
        assert_eq!(color_of(&scene, seat), hex_to_rgb(0x8b4513));
        assert_eq!(scene.get_object(seat).unwrap().scale, 1.0);
    }
}
