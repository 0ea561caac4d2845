//! Field-wide tuning knobs, mirrored from the display's stage dimensions.

// ════════════════════════════════════════════════════════════════════════════
// FieldConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the whole particle field.
///
/// Counts are the *unscaled* ensemble sizes; [`FieldConfig::scaled`] applies
/// a density factor for lower-powered hosts.
#[derive(Clone, Debug)]
pub struct FieldConfig {
    // ── ensemble sizes ───────────────────────────────────────────────────
    pub gold_count: usize,
    pub red_count:  usize,
    pub gift_count: usize,
    pub star_count: usize,

    // ── stage dimensions ─────────────────────────────────────────────────
    /// Radius of the burst cloud.
    pub burst_radius:     f32,
    /// Radius of the orbit-item ring.
    pub orbit_radius:     f32,
    /// Height of the tree cone.
    pub tree_height:      f32,
    /// Radius of the tree cone at its base.
    pub tree_base_radius: f32,

    // ── smoothness ───────────────────────────────────────────────────────
    /// Per-frame position lerp fraction (exponential smoothing step).
    pub pos_lerp:    f32,
    /// Per-frame rotation-chase lerp fraction in the burst scene.
    pub rotate_lerp: f32,

    // ── scene gating ─────────────────────────────────────────────────────
    /// Minimum time between authoritative scene changes.
    pub cooldown_ms: f64,
    /// Raw labels remembered by the vote stabilizer.
    pub vote_window: usize,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            gold_count: 2200,
            red_count:  360,
            gift_count: 170,
            star_count: 900,

            burst_radius:     68.0,
            orbit_radius:     26.0,
            tree_height:      72.0,
            tree_base_radius: 36.0,

            pos_lerp:    0.085,
            rotate_lerp: 0.11,

            cooldown_ms: 380.0,
            vote_window: 7,
        }
    }
}

impl FieldConfig {
    /// Scale every ensemble count by `density` (e.g. 0.65 for a light
    /// build on weak hosts). Stage dimensions are unaffected.
    pub fn scaled(mut self, density: f32) -> Self {
        let apply = |n: usize| ((n as f32) * density).floor().max(1.0) as usize;
        self.gold_count = apply(self.gold_count);
        self.red_count  = apply(self.red_count);
        self.gift_count = apply(self.gift_count);
        self.star_count = apply(self.star_count);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_shrinks_counts_only() {
        let cfg = FieldConfig::default().scaled(0.65);
        assert_eq!(cfg.gold_count, 1430); // floor(2200 * 0.65)
        assert_eq!(cfg.red_count,  234);
        assert_eq!(cfg.burst_radius, 68.0);
    }

    #[test]
    fn scaled_never_reaches_zero() {
        let cfg = FieldConfig::default().scaled(0.0001);
        assert!(cfg.gift_count >= 1);
    }
}
