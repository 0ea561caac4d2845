//! # particle_field
//!
//! The particle engine behind the gesture-driven formation display.
//!
//! A [`ParticleGroup`] owns a fixed ensemble of points, each with a
//! precomputed target position for every [`Scene`](scene_vote::Scene):
//! a conical tree, a spherical burst cloud, and a filled heart curve.
//! Every frame, [`ParticleGroup::advance`] moves each point a fixed
//! fraction of the way toward the active scene's target — exponential
//! smoothing rather than integrated physics, so tens of thousands of
//! points converge smoothly at constant per-frame cost.
//!
//! Alongside the groups live the smaller animated elements:
//! [`OrbitRing`] (the five featured placards circling the field and the
//! nearest-to-viewer selection), [`OverlayState`] (title / star / love
//! placard visibility and easing), and a dim background [`Starfield`].
//!
//! All generation is deterministic per RNG seed, so two fields built from
//! the same seed are identical point for point.

pub mod config;
pub mod group;
pub mod kind;
pub mod overlay;
pub mod starfield;

pub use config::FieldConfig;
pub use group::ParticleGroup;
pub use kind::{Blending, ParticleKind, StyleParams};
pub use overlay::{OrbitItem, OrbitRing, OverlayState, ORBIT_COUNT};
pub use starfield::Starfield;

use thiserror::Error;

/// Construction-time failures. These are fatal by design: they are raised
/// before the frame loop starts and never mid-session.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("particle group {kind:?} must have at least one particle")]
    EmptyGroup { kind: ParticleKind },
}
