//! RakshaNav demo flight
//!
//! Generates a seeded city, kicks off the distance-field build in the
//! background, and flies a scripted patrol through the skyline while
//! logging telemetry, field readiness, and avoidance events.
//!
//! Usage:
//!   raksha-nav [config.toml] [--seed N] [--ticks N]

use std::path::Path;

use log::{info, warn};

use raksha_nav::{generate_city, ControlInput, NavigationWorld, RakshaConfig, RakshaError, Result};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut config = if args.len() > 1 && !args[1].starts_with("--") {
        let path = Path::new(&args[1]);
        info!("Loading configuration from {:?}", path);
        RakshaConfig::load(path)?
    } else if Path::new("raksha.toml").exists() {
        info!("Loading configuration from raksha.toml");
        RakshaConfig::load(Path::new("raksha.toml"))?
    } else {
        info!("Using default configuration");
        RakshaConfig::default()
    };

    if let Some(seed) = flag_value(&args, "--seed") {
        config.scene.seed = seed
            .parse()
            .map_err(|_| RakshaError::Config(format!("invalid --seed value: {}", seed)))?;
    }
    let ticks: u64 = match flag_value(&args, "--ticks") {
        Some(t) => t
            .parse()
            .map_err(|_| RakshaError::Config(format!("invalid --ticks value: {}", t)))?,
        None => 600,
    };

    info!("RakshaNav v{}", env!("CARGO_PKG_VERSION"));

    let registry = generate_city(&config.scene)?;
    info!(
        "city generated: {} buildings ({} landable), seed {}",
        registry.len(),
        registry.landable_count(),
        config.scene.seed
    );

    let mut world = NavigationWorld::new(config, registry)?;
    world.start_field_build()?;

    let mut field_was_ready = false;
    let mut warning_was_active = false;
    let mut warning_ticks = 0u64;
    let mut collision_ticks = 0u64;
    let mut min_clearance = f32::INFINITY;

    for tick in 0..ticks {
        let input = patrol_input(tick);
        let report = world.tick(&input, 1.0);

        if world.field_ready() && !field_was_ready {
            field_was_ready = true;
            info!("avoidance field active (tick {})", tick);
        }
        if report.collided {
            collision_ticks += 1;
        }
        if report.early_warning {
            warning_ticks += 1;
            if !warning_was_active {
                warn!(
                    "entering repulsive field at ({:.1}, {:.1}, {:.1})",
                    report.position.x, report.position.y, report.position.z
                );
            }
        }
        warning_was_active = report.early_warning;

        if field_was_ready {
            min_clearance = min_clearance.min(world.sample_distance(&report.position));
        }

        if tick % 60 == 0 {
            let t = &report.telemetry;
            info!(
                "t={:4}  pos ({:7.1}, {:5.1}, {:7.1})  spd {:5.1}  hdg {:5.1}  {}",
                tick,
                t.position.x,
                t.position.y,
                t.position.z,
                t.speed_kmh,
                t.heading_deg,
                if world.field_ready() { "field" } else { "no-field" }
            );
        }
    }

    if let Some(err) = world.last_build_error() {
        warn!("field build failed during flight: {}", err);
    }
    info!(
        "flight complete: {} ticks, {} warning ticks, {} collision ticks, min clearance {:.1}",
        ticks, warning_ticks, collision_ticks, min_clearance
    );
    Ok(())
}

/// Value following a `--flag` argument, if present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Scripted patrol: constant forward thrust with a slow continuous
/// turn, alternating climb and descent.
fn patrol_input(tick: u64) -> ControlInput {
    ControlInput {
        forward: 1.0,
        right: 0.0,
        up: if tick % 200 < 100 { 0.4 } else { -0.4 },
        yaw_rate: 0.35,
    }
}
