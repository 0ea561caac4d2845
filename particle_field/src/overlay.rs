//! Overlay elements: the orbiting placard ring and the scene decorations.
//!
//! These are the handful of large animated elements layered over the
//! particle field — kept as plain per-frame-eased state structs, the same
//! shape as the group-level animation state.

use glam::Vec3;
use scene_vote::Scene;

// ════════════════════════════════════════════════════════════════════════════
// OrbitRing
// ════════════════════════════════════════════════════════════════════════════

/// Number of orbiting placards.
pub const ORBIT_COUNT: usize = 5;

/// Where the featured placard parks in the focus scene.
const FOCUS_POSITION: Vec3 = Vec3::new(0.0, 0.0, 62.0);
const FOCUS_SCALE: f32 = 5.2;

/// One orbiting placard.
#[derive(Clone, Copy, Debug)]
pub struct OrbitItem {
    pub position: Vec3,
    pub scale:    f32,
    pub visible:  bool,
}

impl Default for OrbitItem {
    fn default() -> Self {
        OrbitItem { position: Vec3::ZERO, scale: 0.0, visible: false }
    }
}

/// The fixed ensemble of placards circling the field in the burst scene,
/// plus the index of the one currently facing the viewer.
///
/// The selection is recomputed only while orbiting; the focus scene
/// features whatever was selected last, so a pinch always promotes the
/// placard the viewer was looking at.
#[derive(Debug, Default)]
pub struct OrbitRing {
    items:    [OrbitItem; ORBIT_COUNT],
    selected: usize,
}

impl OrbitRing {
    /// Advance the ring one frame for the given scene.
    ///
    /// `base_angle` is the primary group's current rotation, so the ring
    /// turns with the cloud; `orbit_radius` comes from the field config.
    pub fn update(&mut self, scene: Scene, base_angle: f32, time_s: f32, orbit_radius: f32) {
        match scene {
            Scene::Burst => self.layout_orbit(base_angle, time_s, orbit_radius),
            Scene::Focus => self.layout_focus(),
            Scene::Tree  => self.ease_out(0.12),
            Scene::Heart => self.hide_all(),
        }
    }

    /// Evenly spaced ring layout with depth-based emphasis.
    fn layout_orbit(&mut self, base_angle: f32, time_s: f32, orbit_radius: f32) {
        let step = std::f32::consts::TAU / ORBIT_COUNT as f32;

        let mut best = 0usize;
        let mut max_z = f32::NEG_INFINITY;

        for (i, item) in self.items.iter_mut().enumerate() {
            item.visible = true;

            let angle = base_angle + i as f32 * step;
            let x = angle.sin() * orbit_radius;
            let z = angle.cos() * orbit_radius;
            let y = (time_s + i as f32).sin() * 3.2;

            item.position = item.position.lerp(Vec3::new(x, y, z), 0.11);

            // Nearest-to-viewer wins; strict `>` keeps ties on the first
            // item encountered, so the selection is deterministic.
            if z > max_z {
                max_z = z;
                best = i;
            }

            let target_scale = if z > 5.0 {
                1.0 + (z / orbit_radius) * 0.85
            } else {
                0.62
            };
            item.scale += (target_scale - item.scale) * 0.10;
        }

        self.selected = best;
    }

    /// Feature only the selected placard; everything else shrinks away.
    fn layout_focus(&mut self) {
        for (i, item) in self.items.iter_mut().enumerate() {
            if i == self.selected {
                item.visible = true;
                item.position = item.position.lerp(FOCUS_POSITION, 0.12);
                item.scale += (FOCUS_SCALE - item.scale) * 0.12;
            } else {
                item.visible = false;
                item.scale += (0.0 - item.scale) * 0.14;
            }
        }
    }

    /// Shrink every placard toward nothing (tree scene).
    fn ease_out(&mut self, rate: f32) {
        for item in &mut self.items {
            item.visible = false;
            item.scale += (0.0 - item.scale) * rate;
        }
    }

    fn hide_all(&mut self) {
        for item in &mut self.items {
            item.visible = false;
        }
    }

    pub fn items(&self) -> &[OrbitItem; ORBIT_COUNT] { &self.items }

    /// Index of the placard currently nearest the viewer.
    pub fn selected(&self) -> usize { self.selected }
}

// ════════════════════════════════════════════════════════════════════════════
// OverlayState — title, star, love placard
// ════════════════════════════════════════════════════════════════════════════

/// Visibility and easing state for the scene decorations: the title and
/// tree-top star (tree scene only) and the love placard (heart scene only).
#[derive(Debug)]
pub struct OverlayState {
    pub title_visible: bool,
    pub title_scale:   f32,

    pub star_visible: bool,
    /// Accumulated star spin angle (radians).
    pub star_spin:    f32,
    pub star_opacity: f32,

    pub love_visible: bool,
    pub love_scale:   f32,
}

impl Default for OverlayState {
    fn default() -> Self {
        OverlayState {
            title_visible: true,
            title_scale:   1.0,
            star_visible:  true,
            star_spin:     0.0,
            star_opacity:  1.0,
            love_visible:  false,
            love_scale:    1.0,
        }
    }
}

impl OverlayState {
    /// Advance one frame for the given scene.
    pub fn update(&mut self, scene: Scene, time_s: f32) {
        match scene {
            Scene::Tree => {
                self.title_visible = true;
                self.star_visible = true;
                self.love_visible = false;

                self.title_scale += (1.0 - self.title_scale) * 0.12;
                self.star_spin -= 0.022;
                self.star_opacity = 0.68 + 0.32 * (time_s * 4.7).sin();
            }
            Scene::Heart => {
                self.title_visible = false;
                self.star_visible = false;
                self.love_visible = true;

                self.love_scale = 1.0 + (time_s * 3.0).sin().abs() * 0.12;
            }
            Scene::Burst | Scene::Focus => {
                self.title_visible = false;
                self.star_visible = false;
                self.love_visible = false;
                self.title_scale += (0.0 - self.title_scale) * 0.12;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_items_become_visible_in_burst() {
        let mut ring = OrbitRing::default();
        ring.update(Scene::Burst, 0.0, 0.0, 26.0);
        assert!(ring.items().iter().all(|i| i.visible));
    }

    #[test]
    fn selection_picks_nearest_to_viewer() {
        let mut ring = OrbitRing::default();
        // base_angle 0 puts item 0 at angle 0 → z = cos(0) * r = max.
        ring.update(Scene::Burst, 0.0, 0.0, 26.0);
        assert_eq!(ring.selected(), 0);
    }

    #[test]
    fn selection_follows_rotation() {
        let mut ring = OrbitRing::default();
        let step = std::f32::consts::TAU / ORBIT_COUNT as f32;
        // Rotate the ring so item 3's slot lands at angle 0.
        ring.update(Scene::Burst, -3.0 * step, 0.0, 26.0);
        assert_eq!(ring.selected(), 3);
    }

    #[test]
    fn selection_tie_breaks_to_first_item() {
        // With radius 0 every item sits at z = 0: all tied, so the first
        // item in iteration order must win.
        let mut ring = OrbitRing::default();
        ring.update(Scene::Burst, 0.0, 0.0, 0.0);
        assert_eq!(ring.selected(), 0);
    }

    #[test]
    fn focus_features_only_the_selection() {
        let mut ring = OrbitRing::default();
        ring.update(Scene::Burst, 0.0, 0.0, 26.0);
        let sel = ring.selected();
        for _ in 0..200 {
            ring.update(Scene::Focus, 0.0, 0.0, 26.0);
        }
        for (i, item) in ring.items().iter().enumerate() {
            if i == sel {
                assert!(item.visible);
                assert!((item.scale - FOCUS_SCALE).abs() < 1e-2);
                assert!(item.position.distance(FOCUS_POSITION) < 1e-1);
            } else {
                assert!(!item.visible);
                assert!(item.scale < 1e-2);
            }
        }
    }

    #[test]
    fn selection_persists_through_focus() {
        let mut ring = OrbitRing::default();
        let step = std::f32::consts::TAU / ORBIT_COUNT as f32;
        ring.update(Scene::Burst, -2.0 * step, 0.0, 26.0);
        assert_eq!(ring.selected(), 2);
        ring.update(Scene::Focus, 0.0, 0.0, 26.0);
        ring.update(Scene::Heart, 0.0, 0.0, 26.0);
        assert_eq!(ring.selected(), 2);
    }

    #[test]
    fn tree_scene_eases_placards_away() {
        let mut ring = OrbitRing::default();
        ring.update(Scene::Burst, 0.0, 0.0, 26.0);
        for _ in 0..100 {
            ring.update(Scene::Tree, 0.0, 0.0, 26.0);
        }
        for item in ring.items() {
            assert!(!item.visible);
            assert!(item.scale < 1e-2);
        }
    }

    #[test]
    fn overlay_visibility_per_scene() {
        let mut o = OverlayState::default();

        o.update(Scene::Tree, 0.0);
        assert!(o.title_visible && o.star_visible && !o.love_visible);

        o.update(Scene::Heart, 0.0);
        assert!(!o.title_visible && !o.star_visible && o.love_visible);

        o.update(Scene::Burst, 0.0);
        assert!(!o.title_visible && !o.star_visible && !o.love_visible);

        o.update(Scene::Focus, 0.0);
        assert!(!o.title_visible && !o.star_visible && !o.love_visible);
    }

    #[test]
    fn star_spins_and_shimmers_in_tree() {
        let mut o = OverlayState::default();
        let spin_before = o.star_spin;
        o.update(Scene::Tree, 0.33);
        assert!(o.star_spin < spin_before);
        assert!((0.36..=1.0).contains(&o.star_opacity));
    }

    #[test]
    fn love_placard_beats_in_heart() {
        let mut o = OverlayState::default();
        o.update(Scene::Heart, 0.5);
        let expected = 1.0 + (0.5_f32 * 3.0).sin().abs() * 0.12;
        assert!((o.love_scale - expected).abs() < 1e-6);
    }
}
