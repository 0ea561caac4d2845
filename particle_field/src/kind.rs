//! Particle kinds and their per-scene style policies.
//!
//! Each ensemble in the field is one [`ParticleKind`]; the kind supplies
//! the target-generation parameters and the per-scene visual style, so the
//! set of kinds is closed and exhaustively checkable.

use scene_vote::Scene;

// ════════════════════════════════════════════════════════════════════════════
// ParticleKind
// ════════════════════════════════════════════════════════════════════════════

/// The closed set of particle ensembles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    /// Dense golden glow points — the body of every formation.
    Gold,
    /// Sparse red lights riding the surface.
    Red,
    /// Gift boxes — few, large, opaque.
    Gift,
}

/// How a kind's points composite into the framebuffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blending {
    /// Light accumulates (glow points).
    Additive,
    /// Ordinary alpha compositing (solid sprites).
    Normal,
}

/// Group-level visual style for one kind under one scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleParams {
    /// Multiplier on every particle's base size.
    pub size_mult:  f32,
    /// Brightness multiplier fed into the pulse term.
    pub brightness: f32,
}

impl Default for StyleParams {
    fn default() -> Self {
        StyleParams { size_mult: 1.0, brightness: 1.0 }
    }
}

impl ParticleKind {
    pub const ALL: [ParticleKind; 3] =
        [ParticleKind::Gold, ParticleKind::Red, ParticleKind::Gift];

    /// Base point size before style multipliers.
    pub fn base_size(self) -> f32 {
        match self {
            ParticleKind::Gold => 2.1,
            ParticleKind::Red  => 3.4,
            ParticleKind::Gift => 3.0,
        }
    }

    pub fn blending(self) -> Blending {
        match self {
            ParticleKind::Gift => Blending::Normal,
            _                  => Blending::Additive,
        }
    }

    /// Base opacity for the kind's sprite.
    pub fn opacity(self) -> f32 {
        match self {
            ParticleKind::Gift => 0.95,
            _                  => 1.0,
        }
    }

    /// Radial placement law inside the tree cone: gold fills the volume
    /// (`sqrt` area-uniform law), red and gifts ride a thin outer band.
    pub fn tree_radius_ratio(self, u: f32) -> f32 {
        match self {
            ParticleKind::Gold => u.sqrt(),
            _                  => 0.88 + 0.12 * u,
        }
    }

    /// Gifts burst slightly wider than the glow cloud.
    pub fn burst_radius_mult(self) -> f32 {
        match self {
            ParticleKind::Gift => 1.18,
            _                  => 1.0,
        }
    }

    /// Per-scene style table (size multiplier, brightness).
    pub fn style_for(self, scene: Scene) -> StyleParams {
        use ParticleKind::*;
        match scene {
            Scene::Tree => StyleParams {
                size_mult:  if self == Red  { 1.06 } else { 1.00 },
                brightness: if self == Gold { 1.10 } else { 1.00 },
            },
            Scene::Burst => StyleParams { size_mult: 1.05, brightness: 1.10 },
            Scene::Focus => StyleParams { size_mult: 0.95, brightness: 0.95 },
            Scene::Heart => StyleParams {
                // Thin out the gifts so the heart reads clean.
                size_mult:  if self == Gift { 0.75 } else { 1.00 },
                brightness: if self == Red  { 1.05 } else { 0.95 },
            },
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
    fn style_table_is_total() {
        for kind in ParticleKind::ALL {
            for scene in Scene::ALL {
                let s = kind.style_for(scene);
                assert!(s.size_mult > 0.0 && s.brightness > 0.0);
            }
        }
    }

    #[test]
    fn gold_fills_tree_volume_red_rides_rim() {
        // Gold's sqrt law reaches the axis; red never drops below the band.
        assert_eq!(ParticleKind::Gold.tree_radius_ratio(0.0), 0.0);
        assert!(ParticleKind::Red.tree_radius_ratio(0.0) >= 0.88);
        assert!(ParticleKind::Red.tree_radius_ratio(1.0) <= 1.0);
    }

    #[test]
    fn gift_is_opaque_and_wide() {
        assert_eq!(ParticleKind::Gift.blending(), Blending::Normal);
        assert!(ParticleKind::Gift.burst_radius_mult() > 1.0);
        assert!(ParticleKind::Gift.opacity() < 1.0);
    }

    #[test]
    fn heart_thins_gifts() {
        let s = ParticleKind::Gift.style_for(Scene::Heart);
        assert!(s.size_mult < 1.0);
    }
}
