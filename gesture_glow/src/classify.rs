//! Hand-landmark classification: one coarse scene label per sample frame.
//!
//! The landmark topology follows the usual 21-point hand model (wrist at
//! index 0, four joints per finger, tips at 4/8/12/16/20), with every
//! coordinate normalized to the 0..1 sensor frame. The classifier is a
//! handful of distance thresholds, empirically tuned; the vote stabilizer
//! downstream absorbs the per-frame noise this inevitably produces.

use glam::Vec2;
use scene_vote::Scene;

// ════════════════════════════════════════════════════════════════════════════
// Landmark model
// ════════════════════════════════════════════════════════════════════════════

/// Landmarks per hand.
pub const LANDMARKS: usize = 21;

pub const WRIST:      usize = 0;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP:   usize = 16;
pub const PINKY_TIP:  usize = 20;

/// The four non-thumb fingertips, used for the open/fist test.
const FINGER_TIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// One tracked hand: 21 ordered landmarks in normalized coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Hand {
    pub points: [Vec2; LANDMARKS],
}

impl Hand {
    pub fn new(points: [Vec2; LANDMARKS]) -> Self {
        Hand { points }
    }
}

/// Zero or more hands seen in one sample frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandFrame {
    pub hands: Vec<Hand>,
}

// ════════════════════════════════════════════════════════════════════════════
// Classification
// ════════════════════════════════════════════════════════════════════════════

// Thresholds in normalized sensor units (empirically tuned).
const HEART_TOUCH_DIST: f32 = 0.15; // matching fingertips of both hands
const FIST_AVG_DIST:    f32 = 0.25; // mean fingertip→wrist distance
const PINCH_DIST:       f32 = 0.05; // thumb tip → index tip

/// One classified sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    /// The raw scene label for this frame.
    pub label: Scene,
    /// Horizontal position of the steering hand (middle-finger MCP x),
    /// when a single-hand pose was evaluated.
    pub hand_x: Option<f32>,
}

/// Classify one sample frame into a raw scene label.
///
/// Decision order (first match wins):
/// 1. no hands → `Tree`;
/// 2. two hands with both index tips *and* both thumb tips nearly touching
///    → `Heart` (the steering value is left untouched);
/// 3. single hand, mean fingertip→wrist distance below the fist threshold
///    → `Tree`;
/// 4. thumb–index pinch → `Focus`;
/// 5. otherwise an open hand → `Burst`.
pub fn classify(frame: &HandFrame) -> Classification {
    if frame.hands.is_empty() {
        return Classification { label: Scene::Tree, hand_x: None };
    }

    if frame.hands.len() >= 2 {
        let h1 = &frame.hands[0].points;
        let h2 = &frame.hands[1].points;
        let dist_index = h1[INDEX_TIP].distance(h2[INDEX_TIP]);
        let dist_thumb = h1[THUMB_TIP].distance(h2[THUMB_TIP]);
        if dist_index < HEART_TOUCH_DIST && dist_thumb < HEART_TOUCH_DIST {
            return Classification { label: Scene::Heart, hand_x: None };
        }
    }

    let lm = &frame.hands[0].points;
    let hand_x = Some(lm[MIDDLE_MCP].x);

    let avg_dist = FINGER_TIPS
        .iter()
        .map(|&i| lm[i].distance(lm[WRIST]))
        .sum::<f32>()
        / FINGER_TIPS.len() as f32;

    let label = if avg_dist < FIST_AVG_DIST {
        Scene::Tree
    } else if lm[THUMB_TIP].distance(lm[INDEX_TIP]) < PINCH_DIST {
        Scene::Focus
    } else {
        Scene::Burst
    };

    Classification { label, hand_x }
}

// ════════════════════════════════════════════════════════════════════════════
// Synthetic poses — used by the keyboard simulator and tests
// ════════════════════════════════════════════════════════════════════════════

/// A fully open hand centred at `x`: fingertips spread far from the wrist.
pub fn open_hand(x: f32) -> Hand {
    let mut points = [Vec2::new(x, 0.6); LANDMARKS];
    points[WRIST] = Vec2::new(x, 0.9);
    points[THUMB_TIP]  = Vec2::new(x - 0.20, 0.55);
    points[INDEX_TIP]  = Vec2::new(x - 0.10, 0.40);
    points[MIDDLE_TIP] = Vec2::new(x, 0.38);
    points[RING_TIP]   = Vec2::new(x + 0.10, 0.40);
    points[PINKY_TIP]  = Vec2::new(x + 0.18, 0.45);
    points[MIDDLE_MCP] = Vec2::new(x, 0.70);
    Hand::new(points)
}

/// A closed fist at `x`: every tip curled in next to the wrist.
pub fn fist(x: f32) -> Hand {
    let mut points = [Vec2::new(x, 0.8); LANDMARKS];
    points[WRIST] = Vec2::new(x, 0.85);
    points[MIDDLE_MCP] = Vec2::new(x, 0.78);
    Hand::new(points)
}

/// An open hand with thumb and index pinched together.
pub fn pinch(x: f32) -> Hand {
    let mut hand = open_hand(x);
    hand.points[THUMB_TIP] = Vec2::new(x - 0.02, 0.45);
    hand.points[INDEX_TIP] = Vec2::new(x - 0.01, 0.44);
    Hand::new(hand.points)
}

/// Two hands with matching fingertips brought together.
pub fn heart_hands() -> [Hand; 2] {
    let mut left = open_hand(0.45);
    let mut right = open_hand(0.55);
    left.points[INDEX_TIP] = Vec2::new(0.49, 0.4);
    right.points[INDEX_TIP] = Vec2::new(0.51, 0.4);
    left.points[THUMB_TIP] = Vec2::new(0.49, 0.55);
    right.points[THUMB_TIP] = Vec2::new(0.51, 0.55);
    [left, right]
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_frame_defaults_to_tree() {
        let c = classify(&HandFrame::default());
        assert_eq!(c.label, Scene::Tree);
        assert_eq!(c.hand_x, None);
    }

    #[test]
    fn open_hand_is_burst() {
        let frame = HandFrame { hands: vec![open_hand(0.5)] };
        assert_eq!(classify(&frame).label, Scene::Burst);
    }

    #[test]
    fn fist_is_tree() {
        let frame = HandFrame { hands: vec![fist(0.5)] };
        assert_eq!(classify(&frame).label, Scene::Tree);
    }

    #[test]
    fn pinch_is_focus() {
        let frame = HandFrame { hands: vec![pinch(0.5)] };
        assert_eq!(classify(&frame).label, Scene::Focus);
    }

    #[test]
    fn heart_hands_are_heart() {
        let [l, r] = heart_hands();
        let frame = HandFrame { hands: vec![l, r] };
        let c = classify(&frame);
        assert_eq!(c.label, Scene::Heart);
        // The two-hand path never touches steering.
        assert_eq!(c.hand_x, None);
    }

    #[test]
    fn two_hand_heart_takes_precedence_over_pinch() {
        let [mut l, r] = heart_hands();
        // Even if the first hand is also pinching, heart wins.
        l.points[THUMB_TIP] = l.points[INDEX_TIP];
        let frame = HandFrame { hands: vec![l, r] };
        assert_eq!(classify(&frame).label, Scene::Heart);
    }

    #[test]
    fn two_distant_hands_fall_back_to_single_hand_rules() {
        let frame = HandFrame { hands: vec![open_hand(0.2), open_hand(0.8)] };
        assert_eq!(classify(&frame).label, Scene::Burst);
    }

    #[test]
    fn steering_tracks_hand_position() {
        let frame = HandFrame { hands: vec![open_hand(0.25)] };
        let c = classify(&frame);
        assert_eq!(c.hand_x, Some(0.25));
    }
}
