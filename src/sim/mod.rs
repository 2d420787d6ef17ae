//! Frame-driven simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One tick per host frame, driven by the supplied delta
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, input-device or platform dependencies

pub mod collision;
pub mod entity;
pub mod snapshot;
pub mod state;
pub mod stats;
pub mod tick;
pub mod wave;

pub use collision::{CollisionReport, CollisionResolver, ContactPolicy, DefenderHit, HostileHit};
pub use entity::{Entity, Faction, circles_overlap};
pub use snapshot::{EntityView, ResultSnapshot};
pub use state::{
    Archetype, ArchetypeStats, Defender, GameEvent, GameState, HitSource, Hostile, IdGen,
    Projectile, RunPhase, ShotPattern,
};
pub use stats::RunStats;
pub use tick::{SimulationClock, TickInput, tick};
pub use wave::{SpawnOrder, SpawnRequest, WaveDirector, WavePhase, wave_composition, wave_size};
