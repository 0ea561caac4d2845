//! # scene_vote
//!
//! Turns a jittery per-frame stream of raw scene labels into a stable,
//! flicker-free *authoritative* scene, in two stages:
//!
//! 1. [`VoteStabilizer`] — a sliding-window majority vote over the last N
//!    raw labels smooths out single-frame misclassifications.
//! 2. [`SceneStateMachine`] — a cooldown gate on top of the stabilized
//!    label prevents rapid scene toggling: a differing desired scene only
//!    takes over once the cooldown since the last change has elapsed, and
//!    a deferred desire is re-checked on every call until it wins.
//!
//! Neither stage owns a clock: callers pass `now_ms` explicitly, so the
//! whole pipeline is a pure step function that can be driven by a real
//! display loop or a test harness alike.

use std::collections::VecDeque;

// ════════════════════════════════════════════════════════════════════════════
// Scene
// ════════════════════════════════════════════════════════════════════════════

/// One of the closed set of target formations the particle field can be
/// morphing toward. Fixed at startup; never extended at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scene {
    /// Conical tree formation — the default / resting scene.
    Tree,
    /// Spherical burst cloud, steered by the open hand.
    Burst,
    /// Single featured orbit item, front and centre.
    Focus,
    /// Pulsing heart formation.
    Heart,
}

impl Scene {
    /// Every scene, in a fixed order.
    pub const ALL: [Scene; 4] = [Scene::Tree, Scene::Burst, Scene::Focus, Scene::Heart];

    /// Human-readable status label.
    pub fn name(self) -> &'static str {
        match self {
            Scene::Tree  => "Tree Mode",
            Scene::Burst => "Burst Mode",
            Scene::Focus => "Focus Mode",
            Scene::Heart => "Love Mode",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// VoteStabilizer
// ════════════════════════════════════════════════════════════════════════════

/// Default vote-window length (raw labels remembered).
pub const DEFAULT_VOTE_WINDOW: usize = 7;

/// Majority vote over a bounded FIFO of recent raw labels.
///
/// Ties break to the distinct label *seen earliest* in buffer insertion
/// order, which keeps the output a deterministic function of the input
/// sequence (an alternating `B,C,B,C,B,C,B` window yields `B`).
#[derive(Debug)]
pub struct VoteStabilizer {
    window:   VecDeque<Scene>,
    capacity: usize,
}

impl VoteStabilizer {
    /// Create a stabilizer with the given window capacity.
    ///
    /// # Panics
    /// Panics if `capacity` is zero — an invalid configuration caught at
    /// construction, before any frame loop starts.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "vote window capacity must be at least 1");
        VoteStabilizer {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Feed one raw label; returns the current majority label.
    pub fn vote(&mut self, raw: Scene) -> Scene {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(raw);

        // Tally in first-seen order so the tie-break is insertion-ordered.
        let mut tally: Vec<(Scene, usize)> = Vec::with_capacity(Scene::ALL.len());
        for &label in &self.window {
            match tally.iter_mut().find(|(s, _)| *s == label) {
                Some((_, n)) => *n += 1,
                None => tally.push((label, 1)),
            }
        }

        let mut best = raw;
        let mut max = 0usize;
        for &(label, n) in &tally {
            if n > max {
                max = n;
                best = label;
            }
        }
        best
    }

    /// Number of labels currently held (≤ capacity).
    pub fn len(&self) -> usize { self.window.len() }

    pub fn is_empty(&self) -> bool { self.window.is_empty() }
}

impl Default for VoteStabilizer {
    fn default() -> Self {
        VoteStabilizer::new(DEFAULT_VOTE_WINDOW)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SceneStateMachine
// ════════════════════════════════════════════════════════════════════════════

/// Default minimum time between authoritative scene changes.
pub const DEFAULT_COOLDOWN_MS: f64 = 380.0;

/// Cooldown-gated hysteresis over the stabilized label.
///
/// `set_desired` always records the incoming label; the authoritative
/// scene only follows it once the cooldown since the last change has
/// elapsed. A desire blocked by the gate is not dropped — it is re-checked
/// on every subsequent call, so a persistent label eventually wins.
#[derive(Debug)]
pub struct SceneStateMachine {
    current:        Scene,
    desired:        Scene,
    last_change_ms: f64,
    cooldown_ms:    f64,
}

impl SceneStateMachine {
    pub fn new(initial: Scene, cooldown_ms: f64) -> Self {
        SceneStateMachine {
            current:        initial,
            desired:        initial,
            last_change_ms: 0.0,
            cooldown_ms,
        }
    }

    /// Record `label` as desired; transition if the gate allows.
    /// Returns `true` iff the authoritative scene changed on this call.
    pub fn set_desired(&mut self, label: Scene, now_ms: f64) -> bool {
        self.desired = label;
        if now_ms - self.last_change_ms < self.cooldown_ms {
            return false;
        }
        if self.current != self.desired {
            self.current = self.desired;
            self.last_change_ms = now_ms;
            return true;
        }
        false
    }

    /// The scene currently driving interpolation targets.
    pub fn current(&self) -> Scene { self.current }

    /// The most recently requested scene (may be gated).
    pub fn desired(&self) -> Scene { self.desired }
}

impl Default for SceneStateMachine {
    fn default() -> Self {
        SceneStateMachine::new(Scene::Tree, DEFAULT_COOLDOWN_MS)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
