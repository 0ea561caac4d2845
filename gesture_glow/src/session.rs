//! Top-level session state and the per-frame driver.
//!
//! `Session` owns the whole pipeline — vote stabilizer, scene state
//! machine, the three particle groups, the starfield, the orbit ring and
//! the overlays — as one explicit context object. It processes
//! [`ControlEvent`]s between frames and advances everything once per frame
//! in [`Session::tick`].

use std::sync::mpsc::{self, TryRecvError};
use std::time::Instant;

use particle_field::{
    FieldConfig, FieldError, OrbitRing, OverlayState, ParticleGroup, ParticleKind, Starfield,
};
use scene_vote::{Scene, SceneStateMachine, VoteStabilizer};

use crate::classify::{self, HandFrame};
use crate::gesture::{spawn_pose_source, ControlEvent, SimPoseSource};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// Session
// ════════════════════════════════════════════════════════════════════════════

pub struct Session {
    cfg: FieldConfig,

    // ── scene decision ───────────────────────────────────────────────────
    stabilizer: VoteStabilizer,
    machine:    SceneStateMachine,

    // ── the field ────────────────────────────────────────────────────────
    groups:    Vec<ParticleGroup>,
    starfield: Starfield,
    orbit:     OrbitRing,
    overlay:   OverlayState,

    // ── steering ─────────────────────────────────────────────────────────
    /// Horizontal hand position, 0..1; 0.5 is centred.
    hand_x: f32,

    // ── status line ──────────────────────────────────────────────────────
    pub status: String,
}

impl Session {
    /// Build a full session. Fatal on invalid configuration (zero particle
    /// counts) — everything else about a session is infallible.
    pub fn new(cfg: FieldConfig, rng_seed: u64) -> Result<Self, FieldError> {
        let groups = vec![
            ParticleGroup::build(ParticleKind::Gold, cfg.gold_count, &cfg, rng_seed)?,
            ParticleGroup::build(ParticleKind::Red, cfg.red_count, &cfg, rng_seed + 1)?,
            ParticleGroup::build(ParticleKind::Gift, cfg.gift_count, &cfg, rng_seed + 2)?,
        ];
        let starfield = Starfield::build(cfg.star_count, rng_seed + 3);

        Ok(Session {
            stabilizer: VoteStabilizer::new(cfg.vote_window),
            machine:    SceneStateMachine::new(Scene::Tree, cfg.cooldown_ms),
            groups,
            starfield,
            orbit:   OrbitRing::default(),
            overlay: OverlayState::default(),
            hand_x:  0.5,
            status:  Scene::Tree.name().to_string(),
            cfg,
        })
    }

    // ── event intake ──────────────────────────────────────────────────────

    /// Process one input event. Any fault is contained to this event:
    /// a malformed frame is logged and dropped, never propagated.
    pub fn handle_event(&mut self, event: ControlEvent, now_ms: f64) {
        match event {
            ControlEvent::Pose(frame) => self.handle_pose(&frame, now_ms),

            ControlEvent::Override(scene) => {
                // Manual path: straight to the state machine, no vote.
                if self.machine.set_desired(scene, now_ms) {
                    log::info!("scene override -> {:?}", scene);
                }
                self.status = self.machine.current().name().to_string();
            }

            ControlEvent::Steer(delta) => {
                self.hand_x = (self.hand_x + delta).clamp(0.0, 1.0);
            }

            ControlEvent::Quit => { /* handled in the run loop */ }
        }
    }

    fn handle_pose(&mut self, frame: &HandFrame, now_ms: f64) {
        let finite = frame
            .hands
            .iter()
            .all(|h| h.points.iter().all(|p| p.is_finite()));
        if !finite {
            log::warn!("dropping malformed hand frame (non-finite landmark)");
            return;
        }

        let c = classify::classify(frame);
        if let Some(x) = c.hand_x {
            self.hand_x = x;
        }

        let stable = self.stabilizer.vote(c.label);
        if self.machine.set_desired(stable, now_ms) {
            log::info!("scene -> {:?}", self.machine.current());
        }
        self.status = self.machine.current().name().to_string();
    }

    // ── per-frame tick ────────────────────────────────────────────────────

    /// Advance the whole field one frame. Steps run in a fixed order and
    /// the scene is sampled exactly once, so a scene change can never be
    /// half-applied within a frame.
    pub fn tick(&mut self, now_ms: f64) {
        let time_s = (now_ms * 0.001) as f32;
        let scene = self.machine.current();

        self.starfield.tick();

        let hand_rot_y = (self.hand_x - 0.5) * 4.0;
        for group in &mut self.groups {
            group.advance(scene, time_s, hand_rot_y, &self.cfg);
        }

        self.overlay.update(scene, time_s);

        // The ring turns with the primary (gold) group.
        let base_angle = self.groups[0].rotation_y();
        self.orbit
            .update(scene, base_angle, time_s, self.cfg.orbit_radius);
    }

    // ── accessors for the render loop ─────────────────────────────────────

    pub fn scene(&self) -> Scene               { self.machine.current() }
    pub fn groups(&self) -> &[ParticleGroup]   { &self.groups }
    pub fn starfield(&self) -> &Starfield      { &self.starfield }
    pub fn orbit(&self) -> &OrbitRing          { &self.orbit }
    pub fn overlay(&self) -> &OverlayState     { &self.overlay }
    pub fn hand_x(&self) -> f32                { self.hand_x }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application: visualizer window, pose source (keyboard
/// simulation by default, hardware with `--features leap`) and the
/// event/render loop at ~60 fps.
pub fn run(cfg: FieldConfig, rng_seed: u64) -> Result<(), String> {
    // ── Sim pose channel ──────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel();
    let pose_rx = spawn_pose_source(SimPoseSource { rx: sim_rx });

    // Hardware source feeds the same channel when enabled; if the device
    // is missing it logs a notice and the manual keys keep working.
    #[cfg(feature = "leap")]
    let leap_rx = spawn_pose_source(crate::gesture::LeapPoseSource);

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(sim_tx)?;

    // ── Session ───────────────────────────────────────────────────────────
    let mut session = Session::new(cfg, rng_seed).map_err(|e| e.to_string())?;

    let started = Instant::now();

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        if !vis.poll_input() {
            break;
        }

        let now_ms = started.elapsed().as_secs_f64() * 1000.0;

        // Drain pending events; the frame never blocks waiting for one.
        loop {
            match pose_rx.try_recv() {
                Ok(ControlEvent::Quit) => return Ok(()),
                Ok(event) => session.handle_event(event, now_ms),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }

        #[cfg(feature = "leap")]
        loop {
            match leap_rx.try_recv() {
                Ok(event) => session.handle_event(event, now_ms),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        session.tick(now_ms);
        vis.render(&session, (now_ms * 0.001) as f32);
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn small_cfg() -> FieldConfig {
        FieldConfig {
            gold_count: 32,
            red_count:  16,
            gift_count: 8,
            star_count: 8,
            ..FieldConfig::default()
        }
    }

    fn make_session() -> Session {
        Session::new(small_cfg(), 7).unwrap()
    }

    fn pose(hand: classify::Hand) -> ControlEvent {
        ControlEvent::Pose(HandFrame { hands: vec![hand] })
    }

    #[test]
    fn zero_count_config_is_fatal() {
        let cfg = FieldConfig { red_count: 0, ..small_cfg() };
        assert!(Session::new(cfg, 1).is_err());
    }

    #[test]
    fn starts_in_tree() {
        let s = make_session();
        assert_eq!(s.scene(), Scene::Tree);
        assert_eq!(s.status, "Tree Mode");
    }

    #[test]
    fn override_bypasses_the_stabilizer() {
        let mut s = make_session();
        // One event is enough — no vote window to fill.
        s.handle_event(ControlEvent::Override(Scene::Heart), 500.0);
        assert_eq!(s.scene(), Scene::Heart);
        assert_eq!(s.status, "Love Mode");
    }

    #[test]
    fn override_respects_cooldown() {
        let mut s = make_session();
        s.handle_event(ControlEvent::Override(Scene::Heart), 500.0);
        s.handle_event(ControlEvent::Override(Scene::Burst), 600.0);
        assert_eq!(s.scene(), Scene::Heart); // gated
        s.handle_event(ControlEvent::Override(Scene::Burst), 1000.0);
        assert_eq!(s.scene(), Scene::Burst);
    }

    #[test]
    fn pose_path_needs_a_majority() {
        let mut s = make_session();
        // A single open-hand frame cannot flip the scene...
        s.handle_event(pose(classify::open_hand(0.5)), 500.0);
        assert_eq!(s.scene(), Scene::Burst); // window of 1 → majority of 1

        // ...but one stray fist inside a burst-majority window is ignored.
        let mut s = make_session();
        for i in 0..3 {
            s.handle_event(pose(classify::open_hand(0.5)), 500.0 + i as f64);
        }
        s.handle_event(pose(classify::fist(0.5)), 900.0);
        assert_eq!(s.scene(), Scene::Burst);
    }

    #[test]
    fn pose_updates_steering() {
        let mut s = make_session();
        s.handle_event(pose(classify::open_hand(0.8)), 500.0);
        assert!((s.hand_x() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn malformed_frame_is_dropped() {
        let mut s = make_session();
        let mut hand = classify::open_hand(0.5);
        hand.points[3] = Vec2::new(f32::NAN, 0.5);
        s.handle_event(ControlEvent::Pose(HandFrame { hands: vec![hand] }), 500.0);
        // Neither scene nor steering moved.
        assert_eq!(s.scene(), Scene::Tree);
        assert!((s.hand_x() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn steer_clamps_to_unit_range() {
        let mut s = make_session();
        for _ in 0..100 {
            s.handle_event(ControlEvent::Steer(0.05), 0.0);
        }
        assert_eq!(s.hand_x(), 1.0);
    }

    #[test]
    fn tick_converges_field_to_heart() {
        let mut s = make_session();
        s.handle_event(ControlEvent::Override(Scene::Heart), 500.0);
        for i in 0..300 {
            s.tick(500.0 + i as f64 * 16.0);
        }
        for group in s.groups() {
            let max = group
                .positions()
                .iter()
                .zip(group.targets_for(Scene::Heart))
                .map(|(p, t)| (*t - *p).length())
                .fold(0.0_f32, f32::max);
            assert!(max < 0.1, "{:?} did not converge: {}", group.kind(), max);
        }
    }

    #[test]
    fn tick_updates_overlay_and_orbit_per_scene() {
        let mut s = make_session();
        s.tick(16.0);
        assert!(s.overlay().title_visible);
        assert!(s.orbit().items().iter().all(|i| !i.visible));

        s.handle_event(ControlEvent::Override(Scene::Burst), 500.0);
        s.tick(516.0);
        assert!(!s.overlay().title_visible);
        assert!(s.orbit().items().iter().all(|i| i.visible));
    }

    #[test]
    fn scene_is_applied_atomically_per_tick() {
        // All groups see the same scene within one tick even if an event
        // lands between ticks.
        let mut s = make_session();
        s.handle_event(ControlEvent::Override(Scene::Burst), 500.0);
        s.tick(516.0);
        for group in s.groups() {
            assert_eq!(group.style(), group.kind().style_for(Scene::Burst));
        }
    }
}
