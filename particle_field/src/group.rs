//! Particle groups: target generation and per-frame interpolation.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scene_vote::Scene;

use crate::config::FieldConfig;
use crate::kind::{ParticleKind, StyleParams};
use crate::FieldError;

// ════════════════════════════════════════════════════════════════════════════
// ParticleGroup
// ════════════════════════════════════════════════════════════════════════════

/// A fixed ensemble of particles of one kind.
///
/// Targets for every scene are precomputed once at build time and never
/// change; only `positions` mutates, once per frame in [`advance`].
///
/// Storage is struct-of-arrays: the renderer walks positions linearly and
/// never needs a per-particle object.
///
/// [`advance`]: ParticleGroup::advance
#[derive(Debug)]
pub struct ParticleGroup {
    kind: ParticleKind,

    // ── per-particle state ───────────────────────────────────────────────
    positions: Vec<Vec3>,
    tree:      Vec<Vec3>,
    burst:     Vec<Vec3>,
    heart:     Vec<Vec3>,
    seeds:     Vec<f32>,
    sizes:     Vec<f32>,

    // ── group-level state ────────────────────────────────────────────────
    rotation_y: f32,
    scale:      f32,
    style:      StyleParams,
}

impl ParticleGroup {
    /// Build a group of `count` particles. Target tables are deterministic
    /// for a given `(kind, count, cfg, rng_seed)`.
    pub fn build(
        kind: ParticleKind,
        count: usize,
        cfg: &FieldConfig,
        rng_seed: u64,
    ) -> Result<Self, FieldError> {
        if count == 0 {
            return Err(FieldError::EmptyGroup { kind });
        }

        let mut rng = StdRng::seed_from_u64(rng_seed);

        let mut tree  = Vec::with_capacity(count);
        let mut burst = Vec::with_capacity(count);
        let mut heart = Vec::with_capacity(count);
        let mut seeds = Vec::with_capacity(count);
        let mut sizes = Vec::with_capacity(count);

        for _ in 0..count {
            tree.push(tree_target(kind, cfg, &mut rng));
            burst.push(burst_target(kind, cfg, &mut rng));
            heart.push(heart_target(&mut rng));
            seeds.push(rng.random::<f32>());
            sizes.push(kind.base_size());
        }

        // Everything starts in the tree formation.
        let positions = tree.clone();

        Ok(ParticleGroup {
            kind,
            positions,
            tree,
            burst,
            heart,
            seeds,
            sizes,
            rotation_y: 0.0,
            scale: 1.0,
            style: kind.style_for(Scene::Tree),
        })
    }

    /// The target table for `scene`. Total over the scene set: the focus
    /// scene keeps the burst cloud behind the featured item, so it shares
    /// the burst table.
    pub fn targets_for(&self, scene: Scene) -> &[Vec3] {
        match scene {
            Scene::Tree => &self.tree,
            Scene::Burst | Scene::Focus => &self.burst,
            Scene::Heart => &self.heart,
        }
    }

    /// Advance one frame: move every particle toward the scene target by
    /// the fixed lerp fraction, then apply the scene's rotation/scale
    /// policy and refresh the style params.
    ///
    /// `hand_rot_y` is the steering signal derived from the tracked hand's
    /// horizontal position; it only matters in the burst and focus scenes.
    pub fn advance(&mut self, scene: Scene, time_s: f32, hand_rot_y: f32, cfg: &FieldConfig) {
        let t = cfg.pos_lerp;
        // Borrow the right table without aliasing `positions`.
        let targets = match scene {
            Scene::Tree => &self.tree,
            Scene::Burst | Scene::Focus => &self.burst,
            Scene::Heart => &self.heart,
        };
        for (p, target) in self.positions.iter_mut().zip(targets) {
            *p += (*target - *p) * t;
        }

        match scene {
            Scene::Tree => {
                self.rotation_y += 0.0035;
                self.scale = 1.0;
            }
            Scene::Burst => {
                self.rotation_y += (hand_rot_y - self.rotation_y) * cfg.rotate_lerp;
                self.scale = 1.0;
            }
            Scene::Focus => {
                // Slower chase keeps the backdrop calm behind the placard.
                self.rotation_y += (hand_rot_y - self.rotation_y) * (cfg.rotate_lerp * 0.6);
                self.scale = 1.0;
            }
            Scene::Heart => {
                self.rotation_y = 0.0;
                self.scale = 1.0 + (time_s * 3.0).sin().abs() * 0.16;
            }
        }

        self.style = self.kind.style_for(scene);
    }

    /// Phase-offset pulsing factor for particle `i` (the glow shimmer).
    pub fn pulse(&self, i: usize, time_s: f32) -> f32 {
        0.85 + 0.35 * (time_s * 10.0 + self.seeds[i] * TAU).sin()
    }

    // ── accessors for the renderer ────────────────────────────────────────

    pub fn kind(&self) -> ParticleKind       { self.kind }
    pub fn len(&self) -> usize               { self.positions.len() }
    pub fn is_empty(&self) -> bool           { self.positions.is_empty() }
    pub fn positions(&self) -> &[Vec3]       { &self.positions }
    pub fn sizes(&self) -> &[f32]            { &self.sizes }
    pub fn rotation_y(&self) -> f32          { self.rotation_y }
    pub fn scale(&self) -> f32               { self.scale }
    pub fn style(&self) -> StyleParams       { self.style }
}

// ════════════════════════════════════════════════════════════════════════════
// Target generators
// ════════════════════════════════════════════════════════════════════════════

/// Conical tree: height-uniform slices, radius shrinking linearly toward
/// the tip, kind-specific radial law inside each slice.
fn tree_target(kind: ParticleKind, cfg: &FieldConfig, rng: &mut StdRng) -> Vec3 {
    let h = rng.random::<f32>() * cfg.tree_height;
    let y = h - cfg.tree_height / 2.0;

    let max_r = (1.0 - h / cfg.tree_height) * cfg.tree_base_radius;
    let r = max_r * kind.tree_radius_ratio(rng.random::<f32>());
    let theta = rng.random::<f32>() * TAU;

    Vec3::new(r * theta.cos(), y, r * theta.sin())
}

/// Uniform spherical cloud: shell direction from (u, v), cube-root radius
/// law for volume-uniform density.
fn burst_target(kind: ParticleKind, cfg: &FieldConfig, rng: &mut StdRng) -> Vec3 {
    let u = rng.random::<f32>();
    let v = rng.random::<f32>();
    let phi = (2.0 * v - 1.0).acos();
    let lam = TAU * u;

    let rad = cfg.burst_radius * rng.random::<f32>().cbrt() * kind.burst_radius_mult();

    Vec3::new(
        rad * phi.sin() * lam.cos(),
        rad * phi.sin() * lam.sin(),
        rad * phi.cos(),
    )
}

/// Parametric heart curve with a softly filled interior and light jitter.
fn heart_target(rng: &mut StdRng) -> Vec3 {
    let t = rng.random::<f32>() * TAU;
    let mut hx = 16.0 * t.sin().powi(3);
    let mut hy = 13.0 * t.cos()
        - 5.0 * (2.0 * t).cos()
        - 2.0 * (3.0 * t).cos()
        - (4.0 * t).cos();

    // Pull points inward with a cube-root bias so the rim stays dense.
    let fill = rng.random::<f32>().powf(0.33);
    hx *= fill;
    hy *= fill;
    let mut hz = (rng.random::<f32>() - 0.5) * 10.0 * fill;

    hx += rng.random::<f32>() - 0.5;
    hy += rng.random::<f32>() - 0.5;
    hz += rng.random::<f32>() - 0.5;

    const HEART_SCALE: f32 = 2.15;
    Vec3::new(hx * HEART_SCALE, hy * HEART_SCALE + 6.0, hz)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn build(kind: ParticleKind, count: usize) -> ParticleGroup {
        ParticleGroup::build(kind, count, &FieldConfig::default(), 42).unwrap()
    }

    #[test]
    fn empty_group_fails_fast() {
        let err = ParticleGroup::build(
            ParticleKind::Gold, 0, &FieldConfig::default(), 1,
        );
        assert!(matches!(err, Err(FieldError::EmptyGroup { .. })));
    }

    #[test]
    fn build_is_deterministic_per_seed() {
        let a = build(ParticleKind::Red, 64);
        let b = build(ParticleKind::Red, 64);
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.targets_for(Scene::Heart), b.targets_for(Scene::Heart));
    }

    #[test]
    fn target_tables_are_total_and_finite() {
        let g = build(ParticleKind::Gift, 128);
        for scene in Scene::ALL {
            let targets = g.targets_for(scene);
            assert_eq!(targets.len(), g.len());
            for t in targets {
                assert!(t.is_finite(), "non-finite target in {:?}", scene);
            }
        }
    }

    #[test]
    fn focus_shares_burst_table() {
        let g = build(ParticleKind::Gold, 32);
        assert_eq!(g.targets_for(Scene::Focus), g.targets_for(Scene::Burst));
    }

    #[test]
    fn initial_positions_match_tree() {
        let g = build(ParticleKind::Gold, 32);
        assert_eq!(g.positions(), g.targets_for(Scene::Tree));
    }

    #[test]
    fn tree_targets_stay_inside_cone() {
        let cfg = FieldConfig::default();
        let g = build(ParticleKind::Gold, 500);
        for t in g.targets_for(Scene::Tree) {
            let r = (t.x * t.x + t.z * t.z).sqrt();
            assert!(t.y.abs() <= cfg.tree_height / 2.0 + 1e-3);
            assert!(r <= cfg.tree_base_radius + 1e-3);
        }
    }

    #[test]
    fn burst_targets_stay_inside_radius() {
        let cfg = FieldConfig::default();
        let g = build(ParticleKind::Gift, 500);
        let limit = cfg.burst_radius * ParticleKind::Gift.burst_radius_mult();
        for t in g.targets_for(Scene::Burst) {
            assert!(t.length() <= limit + 1e-3);
        }
    }

    #[test]
    fn advance_converges_geometrically() {
        let cfg = FieldConfig::default();
        let mut g = build(ParticleKind::Gold, 64);

        let max_dist = |g: &ParticleGroup| {
            g.positions()
                .iter()
                .zip(g.targets_for(Scene::Heart))
                .map(|(p, t)| (*t - *p).length())
                .fold(0.0_f32, f32::max)
        };

        let mut prev = max_dist(&g);
        assert!(prev > 0.0);
        // Distance shrinks monotonically with ratio (1 - pos_lerp)...
        for _ in 0..40 {
            g.advance(Scene::Heart, 0.0, 0.0, &cfg);
            let d = max_dist(&g);
            assert!(d <= prev + 1e-4);
            prev = d;
        }
        // ...and after 200 frames every particle is within epsilon.
        for _ in 0..160 {
            g.advance(Scene::Heart, 0.0, 0.0, &cfg);
        }
        assert!(max_dist(&g) < 1e-2, "did not converge: {}", max_dist(&g));
    }

    #[test]
    fn tree_scene_spins_slowly() {
        let cfg = FieldConfig::default();
        let mut g = build(ParticleKind::Gold, 8);
        let before = g.rotation_y();
        g.advance(Scene::Tree, 0.0, 0.0, &cfg);
        assert!(g.rotation_y() > before);
        assert_eq!(g.scale(), 1.0);
    }

    #[test]
    fn burst_rotation_chases_hand() {
        let cfg = FieldConfig::default();
        let mut g = build(ParticleKind::Gold, 8);
        for _ in 0..120 {
            g.advance(Scene::Burst, 0.0, 1.5, &cfg);
        }
        assert!((g.rotation_y() - 1.5).abs() < 1e-2);
    }

    #[test]
    fn heart_scene_pulses_scale_and_zeroes_rotation() {
        let cfg = FieldConfig::default();
        let mut g = build(ParticleKind::Red, 8);
        g.advance(Scene::Burst, 0.0, 2.0, &cfg); // pick up some rotation
        g.advance(Scene::Heart, 0.5, 2.0, &cfg);
        assert_eq!(g.rotation_y(), 0.0);
        let expected = 1.0 + (0.5_f32 * 3.0).sin().abs() * 0.16;
        assert!((g.scale() - expected).abs() < 1e-6);
    }

    #[test]
    fn style_follows_scene() {
        let cfg = FieldConfig::default();
        let mut g = build(ParticleKind::Gift, 8);
        g.advance(Scene::Heart, 0.0, 0.0, &cfg);
        assert_eq!(g.style(), ParticleKind::Gift.style_for(Scene::Heart));
    }

    #[test]
    fn pulse_stays_in_band() {
        let g = build(ParticleKind::Gold, 16);
        for i in 0..g.len() {
            for step in 0..50 {
                let p = g.pulse(i, step as f32 * 0.1);
                assert!((0.5..=1.2).contains(&p));
            }
        }
    }
}
