//! # gesture_glow
//!
//! Hand-gesture controller for the morphing particle formation display:
//! tens of thousands of glowing points continuously reshaping between a
//! tree, a steerable burst cloud, a featured-placard focus view and a
//! pulsing heart, driven by a noisy per-frame hand classifier.
//!
//! ## Gesture → Scene mapping
//!
//! | Gesture | Hands | Scene |
//! |---|---|---|
//! | Closed fist | One | Tree — the resting formation |
//! | Open hand | One | Burst — cloud steered by hand position |
//! | Thumb–index pinch | One | Focus — nearest placard front and centre |
//! | Fingertips of both hands together | Both | Heart |
//!
//! Raw labels pass through a 7-frame majority vote and a 380 ms cooldown
//! gate before they become the authoritative scene, so a jittery
//! classifier cannot make the display flicker.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: keyboard shortcuts drive all input.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller via
//!   LeapC, converting tracked hands into the normalized landmark frame.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Action |
//! |---|---|
//! | `1`–`4` | Scene override: tree / burst / focus / heart (bypasses the vote) |
//! | `O` / `F` / `P` / `H` | Synthetic pose: open / fist / pinch / heart-hands |
//! | `←` / `→` | Steer the burst cloud |
//! | `Q` | Quit |

pub mod classify;
pub mod gesture;
pub mod session;
pub mod visualizer;
