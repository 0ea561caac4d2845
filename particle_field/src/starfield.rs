//! Dim background star ball, drifting slowly behind the formations.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Radius of the star ball.
const STAR_RADIUS: f32 = 420.0;
/// Per-frame background drift.
const DRIFT: f32 = 0.0006;

/// Static backdrop points. Positions never change after build; only the
/// slow rotation drifts, and the renderer dims everything via the fixed
/// brightness/size factors.
#[derive(Debug)]
pub struct Starfield {
    positions: Vec<Vec3>,
    seeds:     Vec<f32>,
    sizes:     Vec<f32>,
    rotation_y: f32,
}

impl Starfield {
    pub const BRIGHTNESS: f32 = 0.55;
    pub const SIZE_MULT:  f32 = 0.65;
    /// Depth offset pushing the backdrop behind the stage.
    pub const Z_OFFSET:   f32 = -120.0;

    pub fn build(count: usize, rng_seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(rng_seed);

        let mut positions = Vec::with_capacity(count);
        let mut seeds = Vec::with_capacity(count);
        let mut sizes = Vec::with_capacity(count);

        for _ in 0..count {
            let r = STAR_RADIUS * rng.random::<f32>().cbrt();
            let a = rng.random::<f32>() * TAU;
            let b = (2.0 * rng.random::<f32>() - 1.0).acos();

            positions.push(Vec3::new(
                r * b.sin() * a.cos(),
                r * b.sin() * a.sin(),
                r * b.cos(),
            ));
            seeds.push(rng.random::<f32>());
            sizes.push(1.2 + rng.random::<f32>() * 1.6);
        }

        Starfield { positions, seeds, sizes, rotation_y: 0.0 }
    }

    /// Advance the background drift one frame.
    pub fn tick(&mut self) {
        self.rotation_y += DRIFT;
    }

    /// Shimmer factor for star `i`; the backdrop pulses at roughly half
    /// the foreground rate.
    pub fn pulse(&self, i: usize, time_s: f32) -> f32 {
        0.85 + 0.35 * (time_s * 0.55 * 10.0 + self.seeds[i] * TAU).sin()
    }

    pub fn positions(&self) -> &[Vec3] { &self.positions }
    pub fn sizes(&self) -> &[f32]      { &self.sizes }
    pub fn rotation_y(&self) -> f32    { self.rotation_y }
    pub fn len(&self) -> usize         { self.positions.len() }
    pub fn is_empty(&self) -> bool     { self.positions.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stars_fill_the_ball() {
        let s = Starfield::build(300, 7);
        assert_eq!(s.len(), 300);
        for p in s.positions() {
            assert!(p.length() <= STAR_RADIUS + 1e-3);
        }
    }

    #[test]
    fn drift_accumulates() {
        let mut s = Starfield::build(10, 7);
        for _ in 0..100 {
            s.tick();
        }
        assert!((s.rotation_y() - 100.0 * DRIFT).abs() < 1e-6);
    }

    #[test]
    fn build_is_deterministic() {
        let a = Starfield::build(50, 99);
        let b = Starfield::build(50, 99);
        assert_eq!(a.positions(), b.positions());
    }
}
