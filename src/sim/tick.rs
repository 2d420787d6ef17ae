//! Simulation tick
//!
//! Core loop that advances the run by one frame delta.

use glam::Vec2;

use super::collision::CollisionResolver;
use super::snapshot::ResultSnapshot;
use super::state::{GameEvent, GameState, RunPhase};
use crate::config::{ConfigError, SimConfig};
use crate::consts::MAX_FRAME_DT;

/// Input intent for a single tick.
///
/// The host copies its input state into one of these at the start of a frame;
/// the tick only ever sees that copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_up: bool,
    pub move_down: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub shoot: bool,
    /// Start a new run (only honored once the current run has ended)
    pub restart: bool,
}

impl TickInput {
    /// Movement axis with components in -1..=1 (+y is down).
    /// Opposite keys cancel.
    pub fn move_axis(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(
            axis(self.move_left, self.move_right),
            axis(self.move_up, self.move_down),
        )
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    if !state.phase.is_active() {
        if input.restart {
            log::info!("Restarting run");
            state.restart();
        }
        return;
    }

    state.time_ticks += 1;
    state.stats.time_alive += dt;

    // Defender movement and shooting
    let volley = state
        .defender
        .apply_intent(input, dt, &state.config, &mut state.ids);
    if !volley.is_empty() {
        state.stats.record_volley(volley.len());
        state.events.push(GameEvent::ShotFired {
            projectiles: volley.len() as u32,
        });
        state.projectiles.extend(volley);
    }

    // Projectiles
    for projectile in &mut state.projectiles {
        projectile.update(dt);
    }
    let arena = &state.config.arena;
    state.projectiles.retain(|p| !p.is_out_of_bounds(arena));

    // Hostiles: score last tick's kills, then pursue
    prune_dead_hostiles(state);
    let target = state.defender.pos;
    let mut ring_shots = Vec::new();
    for hostile in &mut state.hostiles {
        if let Some(ring) = hostile.update(dt, target, &state.config.boss, &mut state.ids) {
            log::debug!("Boss {} fired a ring of {}", hostile.id, ring.len());
            state.events.push(GameEvent::BossRingAttack { hostile: hostile.id });
            ring_shots.extend(ring);
        }
    }
    state.projectiles.extend(ring_shots);

    // Waves
    let was_active = state.waves.is_active();
    let request = state
        .waves
        .advance(dt, state.live_hostiles(), state.defender.pos);
    if was_active && !state.waves.is_active() {
        on_wave_cleared(state);
        if !state.phase.is_active() {
            return;
        }
    }
    if let Some(request) = request {
        log::debug!("Spawn request: {:?}", request);
        state.events.push(GameEvent::WaveStarted {
            wave: request.wave,
            hostiles: request.hostiles.len() as u32,
        });
        for order in request.hostiles {
            state.spawn_hostile(order.archetype, order.position);
        }
    }

    // Collisions
    let report = CollisionResolver::new(state.config.collision.contact).resolve(
        dt,
        &mut state.defender,
        &mut state.hostiles,
        &state.projectiles,
    );

    for hit in &report.hostile_hits {
        if hit.lethal {
            log::debug!("Projectile {} destroyed hostile {}", hit.projectile, hit.hostile);
        }
        state.stats.record_hit(hit.damage);
        state.events.push(GameEvent::HostileHit {
            hostile: hit.hostile,
            damage: hit.damage,
        });
    }
    state.stats.record_damage_taken(report.damage_taken());
    state.stats.contacts += report.contacts() as u32;
    for hit in &report.defender_hits {
        state.events.push(GameEvent::DefenderHit {
            source: hit.source,
            damage: hit.damage,
        });
    }
    if !report.spent_projectiles.is_empty() {
        state
            .projectiles
            .retain(|p| !report.spent_projectiles.contains(&p.id));
    }
    if !report.destroyed_hostiles.is_empty() {
        state
            .hostiles
            .retain(|h| !report.destroyed_hostiles.contains(&h.id));
    }

    if state.defender.is_dead() {
        end_run(state, RunPhase::Defeated);
    }
}

/// Remove hostiles with `health <= 0` and credit their points
fn prune_dead_hostiles(state: &mut GameState) {
    if !state.hostiles.iter().any(|h| h.is_dead()) {
        return;
    }
    let (dead, alive): (Vec<_>, Vec<_>) = std::mem::take(&mut state.hostiles)
        .into_iter()
        .partition(|h| h.is_dead());
    state.hostiles = alive;

    for hostile in dead {
        let points = hostile.stats.point_value;
        state.defender.add_score(points);
        state.stats.record_kill(hostile.archetype);
        state.events.push(GameEvent::HostileKilled {
            hostile: hostile.id,
            archetype: hostile.archetype,
            points,
        });
    }
}

fn on_wave_cleared(state: &mut GameState) {
    let wave = state.waves.wave();
    state.stats.waves_cleared += 1;
    state
        .defender
        .add_ammo(state.config.defender.ammo_refill_per_wave);
    state.events.push(GameEvent::WaveCleared { wave });

    if state.waves.is_final_wave(wave) {
        end_run(state, RunPhase::Victory);
    }
}

fn end_run(state: &mut GameState, phase: RunPhase) {
    state.phase = phase;
    let score = state.defender.score;
    let wave = state.waves.wave();
    match phase {
        RunPhase::Victory => log::info!("🏆 Victory after wave {} with score {}", wave, score),
        _ => log::info!("Run over at wave {} with score {}", wave, score),
    }
    state.events.push(GameEvent::RunEnded { phase, score, wave });
}

/// Owns a run and turns host frames into snapshots
#[derive(Debug, Clone)]
pub struct SimulationClock {
    state: GameState,
}

impl SimulationClock {
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: GameState::new(config),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for hosts that script scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Run one tick with the measured frame delta.
    ///
    /// The delta is clamped to `[0, MAX_FRAME_DT]`; non-finite values count as 0.
    pub fn tick(&mut self, dt: f32, intent: TickInput) -> ResultSnapshot {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        tick(&mut self.state, &intent, dt);
        ResultSnapshot::capture(&self.state)
    }

    pub fn snapshot(&self) -> ResultSnapshot {
        ResultSnapshot::capture(&self.state)
    }
}
