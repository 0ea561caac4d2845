//! Pose acquisition — from real hand-tracking hardware or the keyboard
//! simulator.
//!
//! The public interface is [`ControlEvent`] delivered over a `mpsc`
//! channel. Consumers don't need to know whether events came from real
//! hardware or from keys; the manual-override path (`Override`) exists in
//! both modes, so the display stays fully drivable when no sensor is
//! available.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use scene_vote::Scene;

use crate::classify::{self, HandFrame};

// ════════════════════════════════════════════════════════════════════════════
// ControlEvent
// ════════════════════════════════════════════════════════════════════════════

/// An input event for the session.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlEvent {
    /// One sampled hand frame — classified, voted, then gated.
    Pose(HandFrame),

    /// Manual scene request — bypasses the vote stabilizer and goes
    /// straight to the state machine (fallback when no sensor exists).
    Override(Scene),

    /// Nudge the steering value by `delta` (simulation only — hardware
    /// steering comes from the tracked hand's position).
    Steer(f32),

    /// Quit the application.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// PoseSource trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`ControlEvent`]s over a channel.
pub trait PoseSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<ControlEvent>);
}

/// Spawn a pose source on its own thread and return the receiving end.
pub fn spawn_pose_source<S: PoseSource>(source: S) -> Receiver<ControlEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// LeapPoseSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Pose source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library.
///
/// Every *other* tracking frame is converted into a normalized
/// [`HandFrame`] and sent on — half-rate classification keeps the sensor
/// path cheap while the vote window hides the lower sample rate.
#[cfg(feature = "leap")]
pub struct LeapPoseSource;

#[cfg(feature = "leap")]
impl PoseSource for LeapPoseSource {
    fn run(self: Box<Self>, tx: Sender<ControlEvent>) {
        use leaprs::*;

        // Sensor volume mapped onto the normalized 0..1 frame (mm).
        const SPAN_X: f32 = 400.0;
        const SPAN_Y: f32 = 400.0;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("LeapC connection failed ({e:?}); manual keys only");
                return;
            }
        };
        if let Err(e) = connection.open() {
            log::warn!("LeapMotion device unavailable ({e:?}); manual keys only");
            return;
        }

        let norm = |x: f32, span: f32| ((x + span / 2.0) / span).clamp(0.0, 1.0);

        let mut frame_cnt = 0u64;
        loop {
            let msg = match connection.poll(100) {
                Ok(m) => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                frame_cnt += 1;
                if frame_cnt % 2 != 0 {
                    continue; // load shedding — classify every other frame
                }

                let mut hands = Vec::new();
                for hand in frame.hands() {
                    let mut points =
                        [glam::Vec2::ZERO; classify::LANDMARKS];

                    let palm = hand.palm().position();
                    let base = glam::Vec2::new(
                        norm(palm.x, SPAN_X),
                        1.0 - norm(palm.y, SPAN_Y),
                    );
                    for p in points.iter_mut() {
                        *p = base;
                    }

                    // Wrist sits below the palm in the normalized frame.
                    points[classify::WRIST] = base + glam::Vec2::new(0.0, 0.12);
                    points[classify::MIDDLE_MCP] = base;

                    let digits: Vec<_> = hand.digits().collect();
                    let tip_slots = [
                        classify::THUMB_TIP,
                        classify::INDEX_TIP,
                        classify::MIDDLE_TIP,
                        classify::RING_TIP,
                        classify::PINKY_TIP,
                    ];
                    for (digit, &slot) in digits.iter().zip(tip_slots.iter()) {
                        let tip = digit.distal().next_joint();
                        points[slot] = glam::Vec2::new(
                            norm(tip.x, SPAN_X),
                            1.0 - norm(tip.y, SPAN_Y),
                        );
                    }

                    hands.push(classify::Hand::new(points));
                }

                if tx.send(ControlEvent::Pose(HandFrame { hands })).is_err() {
                    return; // session gone — stop polling
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimPoseSource — keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Pose source driven by [`SimInput`] events from the visualizer window.
///
/// The visualizer sends `SimInput` events here; this translator converts
/// them to `ControlEvent`s, decoupling the window event loop from input
/// semantics.
pub struct SimPoseSource {
    pub rx: Receiver<SimInput>,
}

/// Raw input event from the simulation window.
#[derive(Clone, Copy, Debug)]
pub enum SimInput {
    KeyDown(SimKey),
}

/// Simulated key codes (mapped from minifb keys).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    SceneTree,   // 1
    SceneBurst,  // 2
    SceneFocus,  // 3
    SceneHeart,  // 4
    PoseOpen,    // O — synthetic open hand
    PoseFist,    // F
    PosePinch,   // P
    PoseHeart,   // H — synthetic two-hand heart
    SteerLeft,   // ←
    SteerRight,  // →
    Quit,        // Q
}

/// Steering nudge per arrow-key repeat.
const STEER_STEP: f32 = 0.03;

impl PoseSource for SimPoseSource {
    fn run(self: Box<Self>, tx: Sender<ControlEvent>) {
        for input in self.rx {
            let SimInput::KeyDown(key) = input;
            let event = match key {
                SimKey::SceneTree  => ControlEvent::Override(Scene::Tree),
                SimKey::SceneBurst => ControlEvent::Override(Scene::Burst),
                SimKey::SceneFocus => ControlEvent::Override(Scene::Focus),
                SimKey::SceneHeart => ControlEvent::Override(Scene::Heart),

                SimKey::PoseOpen => ControlEvent::Pose(HandFrame {
                    hands: vec![classify::open_hand(0.5)],
                }),
                SimKey::PoseFist => ControlEvent::Pose(HandFrame {
                    hands: vec![classify::fist(0.5)],
                }),
                SimKey::PosePinch => ControlEvent::Pose(HandFrame {
                    hands: vec![classify::pinch(0.5)],
                }),
                SimKey::PoseHeart => {
                    let [l, r] = classify::heart_hands();
                    ControlEvent::Pose(HandFrame { hands: vec![l, r] })
                }

                SimKey::SteerLeft  => ControlEvent::Steer(-STEER_STEP),
                SimKey::SteerRight => ControlEvent::Steer(STEER_STEP),

                SimKey::Quit => {
                    let _ = tx.send(ControlEvent::Quit);
                    return;
                }
            };
            if tx.send(event).is_err() {
                return;
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

    fn translate(keys: &[SimKey]) -> Vec<ControlEvent> {
        let (in_tx, in_rx) = mpsc::channel();
        for &k in keys {
            in_tx.send(SimInput::KeyDown(k)).unwrap();
        }
        drop(in_tx);

        let rx = spawn_pose_source(SimPoseSource { rx: in_rx });
        rx.iter().collect()
    }

    #[test]
    fn scene_keys_become_overrides() {
        let events = translate(&[SimKey::SceneHeart, SimKey::SceneBurst]);
        assert_eq!(
            events,
            vec![
                ControlEvent::Override(Scene::Heart),
                ControlEvent::Override(Scene::Burst),
            ]
        );
    }

    #[test]
    fn pose_keys_become_classifiable_frames() {
        let events = translate(&[SimKey::PoseFist]);
        match &events[0] {
            ControlEvent::Pose(frame) => {
                assert_eq!(classify::classify(frame).label, Scene::Tree);
            }
            other => panic!("expected pose, got {:?}", other),
        }
    }

    #[test]
    fn quit_terminates_the_source() {
        // Keys after Quit are never translated.
        let events = translate(&[SimKey::Quit, SimKey::SceneTree]);
        assert_eq!(events, vec![ControlEvent::Quit]);
    }

    #[test]
    fn steer_keys_nudge_in_both_directions() {
        let events = translate(&[SimKey::SteerLeft, SimKey::SteerRight]);
        assert_eq!(
            events,
            vec![
                ControlEvent::Steer(-STEER_STEP),
                ControlEvent::Steer(STEER_STEP),
            ]
        );
    }
}
