//! Software-rendered visualizer using `minifb`.
//!
//! Everything is drawn into a plain ARGB framebuffer: the starfield and
//! the three particle ensembles are perspective-projected points (additive
//! blending for the glow kinds, alpha for gifts), the orbit placards are
//! depth-sorted framed cards, and the title / star / love decorations plus
//! the status bar sit on top.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                MERRY CHRISTMAS          ★           │
//! │        . · ✦ particle field (projected) ✦ · .       │
//! │   [placard]      [placard]     [placard]            │
//! │                                                     │
//! │  status bar                                         │
//! │  key legend                                         │
//! └─────────────────────────────────────────────────────┘
//! ```

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use glam::Vec3;
use particle_field::{Blending, OrbitItem, ParticleGroup, ParticleKind, Starfield};

use crate::gesture::{SimInput, SimKey};
use crate::session::Session;

use std::sync::mpsc::Sender;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W: usize = 960;
pub const WIN_H: usize = 600;

const STATUS_Y: usize = WIN_H - 36;
const BG_COLOR: u32 = 0xFF05030F;
const TEXT_BG:  u32 = 0xFF0F3460;
const GOLD:     u32 = 0xFFFFD700;

/// Camera distance along +z; the field sits around the origin.
const CAM_Z: f32 = 105.0;
/// Nothing closer than this to the camera is drawn.
const NEAR:  f32 = 4.0;
/// Vertical field of view of the projection.
const FOV_DEG: f32 = 60.0;

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    Vec<u32>,
    sim_tx: Sender<SimInput>,
    /// Focal length in pixels, derived from the FOV.
    focal:  f32,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self, String> {
        let mut window = Window::new(
            "Gesture Glow — Morphing Particle Formations",
            WIN_W,
            WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        let focal = (WIN_H as f32 / 2.0) / (FOV_DEG.to_radians() / 2.0).tan();

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
            focal,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Poll keyboard inputs and translate to SimInput events.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() {
            return false;
        }

        // Keys that trigger on first press only
        let one_shot = |w: &Window, k: Key| w.is_key_pressed(k, KeyRepeat::No);
        // Keys that repeat while held
        let held = |w: &Window, k: Key| w.is_key_pressed(k, KeyRepeat::Yes);

        if one_shot(&self.window, Key::Q) {
            let _ = self.sim_tx.send(SimInput::KeyDown(SimKey::Quit));
            return false;
        }

        let one_shots = [
            (Key::Key1, SimKey::SceneTree),
            (Key::Key2, SimKey::SceneBurst),
            (Key::Key3, SimKey::SceneFocus),
            (Key::Key4, SimKey::SceneHeart),
            (Key::O, SimKey::PoseOpen),
            (Key::F, SimKey::PoseFist),
            (Key::P, SimKey::PosePinch),
            (Key::H, SimKey::PoseHeart),
        ];
        for (key, sim) in one_shots {
            if one_shot(&self.window, key) {
                let _ = self.sim_tx.send(SimInput::KeyDown(sim));
            }
        }

        // Steering repeats while held
        if held(&self.window, Key::Left) {
            let _ = self.sim_tx.send(SimInput::KeyDown(SimKey::SteerLeft));
        }
        if held(&self.window, Key::Right) {
            let _ = self.sim_tx.send(SimInput::KeyDown(SimKey::SteerRight));
        }

        true
    }

    // ── Projection ────────────────────────────────────────────────────────

    /// Project a world point (after group transform) to screen space.
    /// Returns `(x, y, view_z)`; `None` when behind the near plane.
    fn project(&self, p: Vec3) -> Option<(f32, f32, f32)> {
        let view_z = CAM_Z - p.z;
        if view_z < NEAR {
            return None;
        }
        let sx = WIN_W as f32 / 2.0 + p.x * self.focal / view_z;
        let sy = WIN_H as f32 / 2.0 - p.y * self.focal / view_z;
        Some((sx, sy, view_z))
    }

    /// Rotate about the y axis and apply a uniform scale.
    fn transform(p: Vec3, rot_y: f32, scale: f32) -> Vec3 {
        let (s, c) = rot_y.sin_cos();
        Vec3::new(
            (p.x * c + p.z * s) * scale,
            p.y * scale,
            (-p.x * s + p.z * c) * scale,
        )
    }

    // ── Render one frame ──────────────────────────────────────────────────

    pub fn render(&mut self, session: &Session, time_s: f32) {
        // Clear
        self.buf.fill(BG_COLOR);

        // ── Backdrop ──────────────────────────────────────────────────────
        self.draw_starfield(session.starfield(), time_s);

        // ── Particle ensembles ────────────────────────────────────────────
        for group in session.groups() {
            self.draw_group(group, time_s);
        }

        // ── Orbit placards, far to near ───────────────────────────────────
        let mut order: Vec<(usize, &OrbitItem)> = session
            .orbit()
            .items()
            .iter()
            .enumerate()
            .filter(|(_, item)| item.visible && item.scale > 0.02)
            .collect();
        order.sort_by(|a, b| {
            a.1.position.z.partial_cmp(&b.1.position.z).unwrap_or(std::cmp::Ordering::Equal)
        });
        for (i, item) in order {
            self.draw_placard(i, item);
        }

        // ── Decorations ───────────────────────────────────────────────────
        let overlay = session.overlay();
        if overlay.title_visible {
            let scale = (4.0 * overlay.title_scale).round().max(1.0) as usize;
            self.draw_label_scaled("MERRY CHRISTMAS", WIN_W / 2, 40, scale, GOLD);
        }
        if overlay.star_visible {
            self.draw_tree_star(overlay.star_spin, overlay.star_opacity);
        }
        if overlay.love_visible {
            let scale = (5.0 * overlay.love_scale).round().max(1.0) as usize;
            self.draw_label_scaled("I LOVE YOU", WIN_W / 2, WIN_H / 2 - 20, scale, 0xFFFF69B4);
        }

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, STATUS_Y, WIN_W, WIN_H - STATUS_Y, TEXT_BG);
        self.draw_label(&session.status, 10, STATUS_Y + 6, 0xFFEEEEEE);

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_label(
            "1-4=scene  O=open F=fist P=pinch H=heart  arrows=steer  Q=quit",
            10,
            WIN_H - 14,
            0xFF888888,
        );

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Starfield ─────────────────────────────────────────────────────────

    fn draw_starfield(&mut self, field: &Starfield, time_s: f32) {
        let rot = field.rotation_y();
        for (i, &p) in field.positions().iter().enumerate() {
            let mut world = Self::transform(p, rot, 1.0);
            world.z += Starfield::Z_OFFSET;

            if let Some((sx, sy, view_z)) = self.project(world) {
                let glow = field.pulse(i, time_s) * Starfield::BRIGHTNESS;
                let size = field.sizes()[i] * Starfield::SIZE_MULT * 300.0 / view_z;
                self.plot_glow(sx, sy, size, (242, 242, 255), glow * 0.35, Blending::Additive);
            }
        }
    }

    // ── Particle groups ───────────────────────────────────────────────────

    fn draw_group(&mut self, group: &ParticleGroup, time_s: f32) {
        let style = group.style();
        let rot = group.rotation_y();
        let scale = group.scale();
        let (r, g, b) = kind_color(group.kind());
        let blending = group.kind().blending();
        let opacity = group.kind().opacity();

        for (i, &p) in group.positions().iter().enumerate() {
            let world = Self::transform(p, rot, scale);
            if let Some((sx, sy, view_z)) = self.project(world) {
                let pulse = group.pulse(i, time_s);
                let glow = pulse * style.brightness;
                let size = group.sizes()[i] * style.size_mult * pulse * 300.0 / view_z;
                self.plot_glow(sx, sy, size, (r, g, b), glow * opacity, blending);
            }
        }
    }

    /// Plot one projected particle as a small filled square.
    fn plot_glow(
        &mut self,
        sx: f32,
        sy: f32,
        size_px: f32,
        (r, g, b): (u8, u8, u8),
        intensity: f32,
        blending: Blending,
    ) {
        let side = size_px.clamp(1.0, 9.0) as usize;
        let intensity = intensity.clamp(0.0, 1.5);

        let scale = |c: u8| ((c as f32 * intensity).min(255.0)) as u32;
        let color = 0xFF000000 | (scale(r) << 16) | (scale(g) << 8) | scale(b);

        let x0 = sx as isize - (side / 2) as isize;
        let y0 = sy as isize - (side / 2) as isize;
        for dy in 0..side {
            for dx in 0..side {
                let (x, y) = (x0 + dx as isize, y0 + dy as isize);
                if x < 0 || y < 0 || x >= WIN_W as isize || y >= WIN_H as isize {
                    continue;
                }
                let idx = y as usize * WIN_W + x as usize;
                self.buf[idx] = match blending {
                    Blending::Additive => add_sat(self.buf[idx], color),
                    Blending::Normal => blend(self.buf[idx], color, 0.85),
                };
            }
        }
    }

    // ── Orbit placards ────────────────────────────────────────────────────

    fn draw_placard(&mut self, index: usize, item: &OrbitItem) {
        let Some((sx, sy, view_z)) = self.project(item.position) else {
            return;
        };

        // World half-size 4 units, scaled by the item's animation scale.
        let half = (4.0 * item.scale * self.focal / view_z) as usize;
        if half < 2 {
            return;
        }

        let x0 = (sx as isize - half as isize).max(0) as usize;
        let y0 = (sy as isize - half as isize).max(0) as usize;
        let w = (half * 2).min(WIN_W.saturating_sub(x0));
        let h = (half * 2).min(WIN_H.saturating_sub(y0));
        if w == 0 || h == 0 {
            return;
        }

        // Glass backing, photo body, golden frame.
        self.fill_rect(x0, y0, w, h, 0xFF0A1C38);
        self.draw_border(x0, y0, w, h, GOLD);
        if w > 4 && h > 4 {
            self.draw_border(x0 + 2, y0 + 2, w - 4, h - 4, 0xFF8A6D00);
        }

        let label = format!("PHOTO {}", index + 1);
        let scale = (half / 24).max(1);
        self.draw_label_scaled(&label, x0 + w / 2, y0 + h / 2, scale, 0xFFFFFFFF);
    }

    // ── Tree-top star ─────────────────────────────────────────────────────

    fn draw_tree_star(&mut self, spin: f32, opacity: f32) {
        // The star sits just above the tree tip at (0, 39, 0).
        if let Some((sx, sy, view_z)) = self.project(Vec3::new(0.0, 39.0, 0.0)) {
            let r = (6.0 * self.focal / view_z) as usize;
            let bright = (255.0 * opacity.clamp(0.0, 1.0)) as u32;
            let color = 0xFF000000 | (bright << 16) | (bright << 8) | (bright * 102 / 255);

            // Two overlapping diamonds, one rotated by the spin phase,
            // give a cheap twinkling eight-point look.
            self.draw_diamond(sx as usize, sy as usize, r, color);
            let wobble = ((spin.sin() * 2.0) as isize).unsigned_abs();
            self.draw_diamond(sx as usize, sy as usize, r.saturating_sub(wobble), color);
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            for col in x..(x + w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for col in x..(x + w).min(WIN_W) {
            if y < WIN_H {
                self.buf[y * WIN_W + col] = color;
            }
            if y + h - 1 < WIN_H {
                self.buf[(y + h - 1) * WIN_W + col] = color;
            }
        }
        for row in y..(y + h).min(WIN_H) {
            if x < WIN_W {
                self.buf[row * WIN_W + x] = color;
            }
            if x + w - 1 < WIN_W {
                self.buf[row * WIN_W + x + w - 1] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    fn draw_diamond(&mut self, cx: usize, cy: usize, r: usize, color: u32) {
        for dy in 0..=r as isize {
            let dx = r as isize - dy;
            for &(sx, sy) in &[
                (cx as isize + dx, cy as isize + dy),
                (cx as isize - dx, cy as isize + dy),
                (cx as isize + dx, cy as isize - dy),
                (cx as isize - dx, cy as isize - dy),
            ] {
                if sx >= 0 && sy >= 0 {
                    self.set_pixel(sx as usize, sy as usize, color);
                }
            }
        }
    }

    /// Minimal bitmap font — 3×5 characters, left-anchored.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        self.draw_label_at(text, x, y, 1, color);
    }

    /// Scaled label, *centred* on `cx` — used for the big decorations.
    fn draw_label_scaled(&mut self, text: &str, cx: usize, y: usize, scale: usize, color: u32) {
        let width = text.chars().count() * 4 * scale;
        let x = cx.saturating_sub(width / 2);
        self.draw_label_at(text, x, y, scale, color);
    }

    fn draw_label_at(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        for sy in 0..scale {
                            for sx in 0..scale {
                                self.set_pixel(
                                    cx + col * scale + sx,
                                    y + row * scale + sy,
                                    color,
                                );
                            }
                        }
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx + 4 * scale > WIN_W {
                break;
            }
        }
    }
}

/// Sprite tint per particle kind.
fn kind_color(kind: ParticleKind) -> (u8, u8, u8) {
    match kind {
        ParticleKind::Gold => (255, 215, 110),
        ParticleKind::Red  => (255, 64, 48),
        ParticleKind::Gift => (211, 47, 47),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _ => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Saturating per-channel add of two ARGB colors (additive glow).
fn add_sat(a: u32, b: u32) -> u32 {
    let ar = (a >> 16) & 0xFF;
    let ag = (a >> 8) & 0xFF;
    let ab = a & 0xFF;
    let br = (b >> 16) & 0xFF;
    let bg = (b >> 8) & 0xFF;
    let bb = b & 0xFF;
    0xFF000000
        | ((ar + br).min(255) << 16)
        | ((ag + bg).min(255) << 8)
        | (ab + bb).min(255)
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF;
    let br = (b >> 16) & 0xFF;
    let ag = (a >> 8) & 0xFF;
    let bg = (b >> 8) & 0xFF;
    let ab = a & 0xFF;
    let bb = b & 0xFF;
    0xFF000000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}
