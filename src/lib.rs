//! Wave Defender - a single-arena wave survival simulation
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (entities, waves, collisions, tick orchestration)
//! - `config`: Data-driven tuning loaded from JSON
//!
//! Rendering, input polling and audio live outside this crate. They feed a
//! [`sim::TickInput`] in and read a [`sim::ResultSnapshot`] out.

pub mod config;
pub mod sim;

pub use config::{ConfigError, SimConfig};

use glam::Vec2;

/// Reference constants (per-second rates, tuned around a 60 Hz host loop)
pub mod consts {
    /// Nominal host frame delta
    pub const REFERENCE_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta a single tick will integrate (hitches get truncated)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 1000.0;
    pub const ARENA_HEIGHT: f32 = 700.0;
    /// Projectiles survive this far outside the arena before pruning
    pub const PROJECTILE_MARGIN: f32 = 50.0;

    /// Defender defaults
    pub const DEFENDER_SIZE: f32 = 40.0;
    pub const DEFENDER_SPEED: f32 = 300.0;
    pub const DEFENDER_MAX_HEALTH: i32 = 100;
    pub const DEFENDER_MAX_AMMO: u32 = 30;
    pub const SHOOT_COOLDOWN: f32 = 0.3;
    pub const SHOT_SPEED: f32 = 480.0;
    pub const SHOT_DAMAGE: i32 = 10;
    pub const SHOT_SIZE: f32 = 10.0;
    pub const AMMO_REFILL_PER_WAVE: u32 = 10;

    /// Boss ring attack
    pub const BOSS_RING_COUNT: u32 = 8;
    pub const BOSS_SHOT_SPEED: f32 = 240.0;
    pub const BOSS_SHOT_SIZE: f32 = 10.0;
    pub const BOSS_ATTACK_COOLDOWN: f32 = 3.0;

    /// Wave pacing
    pub const INITIAL_WAVE_DELAY: f32 = 2.0;
    pub const INTER_WAVE_DELAY: f32 = 2.0;
    pub const WAVE_BASE_COUNT: u32 = 3;
    pub const WAVE_COUNT_INCREMENT: u32 = 2;
    pub const STRONG_FROM_WAVE: u32 = 4;
    pub const BOSS_FROM_WAVE: u32 = 7;
    pub const SPAWN_MIN_DISTANCE: f32 = 100.0;
    pub const SPAWN_ATTEMPTS: u32 = 16;
    /// Upper bound on hostiles in one wave
    pub const MAX_WAVE_HOSTILES: u32 = 1000;
    /// Upper bound on projectiles in one boss ring
    pub const MAX_BOSS_RING_COUNT: u32 = 360;
}

/// Unit vector for an angle in radians (screen space, +y down)
#[inline]
pub fn unit_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Clamp a center point so a square of side `size` stays inside `[0, w] x [0, h]`
#[inline]
pub fn clamp_center(center: Vec2, size: f32, width: f32, height: f32) -> Vec2 {
    let half = size / 2.0;
    Vec2::new(
        center.x.clamp(half, (width - half).max(half)),
        center.y.clamp(half, (height - half).max(half)),
    )
}

/// Evenly spaced unit vectors around a full circle, starting at +x
pub fn ring_directions(count: u32) -> impl Iterator<Item = Vec2> {
    (0..count).map(move |i| unit_from_angle(std::f32::consts::TAU * i as f32 / count as f32))
}
