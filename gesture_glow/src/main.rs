//! gesture_glow — interactive entry point.

use gesture_glow::session::run;
use particle_field::FieldConfig;

fn main() {
    env_logger::init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║      Gesture Glow — Morphing Particle Formation Display      ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: hand-tracking hardware + keyboard fallback");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: keyboard simulation  (use --features leap for hardware)");
    println!();

    let args: Vec<String> = std::env::args().collect();

    let mut cfg = FieldConfig::default();
    if args.iter().any(|a| a == "--light") {
        println!("  Light build: 65% particle density");
        cfg = cfg.scaled(0.65);
    }

    let seed = args
        .iter()
        .position(|a| a == "--seed")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0xC0FFEE);

    println!("  Particles: {} gold / {} red / {} gift  (seed {})",
             cfg.gold_count, cfg.red_count, cfg.gift_count, seed);
    println!();
    println!("  Opening visualizer window…");
    println!();

    if let Err(e) = run(cfg, seed) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
