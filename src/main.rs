//! Wave Defender headless runner
//!
//! Plays a run with a simple autopilot and prints the outcome. Useful for
//! balance checks: `wave-defender [config.json] [seconds]`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use wave_defender::SimConfig;
    use wave_defender::consts::REFERENCE_DT;
    use wave_defender::sim::{Archetype, SimulationClock};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(120.0);

    let mut clock = match SimulationClock::new(config) {
        Ok(clock) => clock,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    log::info!("Wave Defender (headless) running for {}s", seconds);
    let frames = (seconds / REFERENCE_DT) as u64;
    let mut snapshot = clock.snapshot();
    for _ in 0..frames {
        let input = autopilot::steer(clock.state());
        snapshot = clock.tick(REFERENCE_DT, input);
        if !snapshot.run_active {
            break;
        }
    }

    println!("phase:          {:?}", snapshot.phase);
    println!("wave reached:   {}", snapshot.wave_number);
    println!("score:          {}", snapshot.score);
    println!("health:         {}/{}", snapshot.health, snapshot.max_health);
    println!("ammo:           {}/{}", snapshot.ammo, snapshot.max_ammo);
    println!("kills:          {}", snapshot.stats.kills);
    for archetype in Archetype::ALL {
        println!("  {:<12}  {}", format!("{archetype:?}"), snapshot.stats.kills_of(archetype));
    }
    println!("accuracy:       {:.1}%", snapshot.stats.accuracy() * 100.0);
    println!("best streak:    {}", snapshot.stats.best_streak);
    println!("time alive:     {:.1}s", snapshot.stats.time_alive);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host drives SimulationClock directly
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use wave_defender::sim::{GameState, TickInput};

    /// Keep firing and back away from the nearest hostile
    pub fn steer(state: &GameState) -> TickInput {
        let me = state.defender.pos;
        let nearest = state
            .hostiles
            .iter()
            .map(|h| h.pos)
            .min_by(|a, b| {
                a.distance_squared(me)
                    .partial_cmp(&b.distance_squared(me))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        let mut input = TickInput {
            shoot: !state.hostiles.is_empty(),
            ..Default::default()
        };
        if let Some(threat) = nearest {
            let away = me - threat;
            input.move_left = away.x < -1.0;
            input.move_right = away.x > 1.0;
            input.move_up = away.y < -1.0;
            input.move_down = away.y > 1.0;
        }
        input
    }
}
