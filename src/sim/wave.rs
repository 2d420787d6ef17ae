//! Wave progression
//!
//! The director alternates between a countdown and an active wave. It owns the
//! pacing, composition and placement policy; spawning the hostiles themselves
//! is left to the caller.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::Archetype;
use crate::config::{ArchetypeTable, ArenaConfig, SimConfig, WaveConfig};
use crate::consts::MAX_WAVE_HOSTILES;

/// Director state. Exactly one of countdown/active holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WavePhase {
    /// Between waves, seconds until the next one
    Cooldown { remaining: f32 },
    /// A wave has live hostiles
    Active,
}

/// One hostile to spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnOrder {
    pub archetype: Archetype,
    /// Center position
    pub position: Vec2,
}

/// The exact set of hostiles for a wave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnRequest {
    pub wave: u32,
    pub hostiles: Vec<SpawnOrder>,
}

/// Number of hostiles in wave `wave` (1-based): `base + (wave - 1) * increment`,
/// capped at [`MAX_WAVE_HOSTILES`]
pub fn wave_size(config: &WaveConfig, wave: u32) -> u32 {
    wave.saturating_sub(1)
        .checked_mul(config.count_increment)
        .and_then(|extra| extra.checked_add(config.base_count))
        .map_or(MAX_WAVE_HOSTILES, |n| n.min(MAX_WAVE_HOSTILES))
}

/// Archetypes for wave `wave`, in spawn order.
///
/// Early tiers are uniform BASIC then STRONG; from `boss_from_wave` on, the
/// wave is one BOSS followed by STRONG support.
pub fn wave_composition(config: &WaveConfig, wave: u32) -> Vec<Archetype> {
    let count = wave_size(config, wave) as usize;
    if wave >= config.boss_from_wave {
        let mut hostiles = Vec::with_capacity(count);
        hostiles.push(Archetype::Boss);
        hostiles.extend(std::iter::repeat_n(Archetype::Strong, count.saturating_sub(1)));
        hostiles
    } else if wave >= config.strong_from_wave {
        vec![Archetype::Strong; count]
    } else {
        vec![Archetype::Basic; count]
    }
}

/// Decides when waves start and what they contain
#[derive(Debug, Clone)]
pub struct WaveDirector {
    config: WaveConfig,
    arena: ArenaConfig,
    archetypes: ArchetypeTable,
    wave: u32,
    phase: WavePhase,
    rng: Pcg32,
}

impl WaveDirector {
    /// Wave 0, counting down the initial delay
    pub fn new(config: &SimConfig) -> Self {
        Self {
            config: config.waves.clone(),
            arena: config.arena.clone(),
            archetypes: config.archetypes.clone(),
            wave: 0,
            phase: WavePhase::Cooldown {
                remaining: config.waves.initial_delay,
            },
            rng: Pcg32::seed_from_u64(config.seed),
        }
    }

    /// Current wave number (0 before the first wave)
    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == WavePhase::Active
    }

    /// Seconds until the next wave, when counting down
    pub fn countdown(&self) -> Option<f32> {
        match self.phase {
            WavePhase::Cooldown { remaining } => Some(remaining.max(0.0)),
            WavePhase::Active => None,
        }
    }

    /// True when `wave` is the configured last wave
    pub fn is_final_wave(&self, wave: u32) -> bool {
        self.config.final_wave == Some(wave)
    }

    /// Advance the state machine by `dt`.
    ///
    /// An active wave with no live hostiles drops back to a countdown; a
    /// countdown that reaches zero starts the next wave and returns its
    /// spawn request.
    pub fn advance(&mut self, dt: f32, live_hostiles: usize, defender: Vec2) -> Option<SpawnRequest> {
        match self.phase {
            WavePhase::Active => {
                if live_hostiles == 0 {
                    log::info!("Wave {} cleared", self.wave);
                    self.phase = WavePhase::Cooldown {
                        remaining: self.config.inter_wave_delay,
                    };
                }
                None
            }
            WavePhase::Cooldown { remaining } => {
                let remaining = remaining - dt;
                if remaining > 0.0 {
                    self.phase = WavePhase::Cooldown { remaining };
                    return None;
                }

                self.wave += 1;
                self.phase = WavePhase::Active;
                let request = self.build_request(defender);
                log::info!("Wave {} starting with {} hostiles", self.wave, request.hostiles.len());
                Some(request)
            }
        }
    }

    fn build_request(&mut self, defender: Vec2) -> SpawnRequest {
        let hostiles = wave_composition(&self.config, self.wave)
            .into_iter()
            .map(|archetype| SpawnOrder {
                archetype,
                position: self.place(archetype, defender),
            })
            .collect();
        SpawnRequest {
            wave: self.wave,
            hostiles,
        }
    }

    /// Random in-bounds center at least `spawn_min_distance` from the defender
    /// on one axis. Falls back to the last candidate when attempts run out.
    fn place(&mut self, archetype: Archetype, defender: Vec2) -> Vec2 {
        let half = self.archetypes.get(archetype).size / 2.0;
        let min_distance = self.config.spawn_min_distance;
        let mut candidate = defender;

        for _ in 0..self.config.spawn_attempts {
            candidate = Vec2::new(
                sample_axis(&mut self.rng, half, self.arena.width),
                sample_axis(&mut self.rng, half, self.arena.height),
            );
            let delta = (candidate - defender).abs();
            if delta.x >= min_distance || delta.y >= min_distance {
                return candidate;
            }
        }

        log::warn!(
            "No spawn position {} away from defender after {} attempts, using {:?}",
            min_distance,
            self.config.spawn_attempts,
            candidate
        );
        candidate
    }
}

/// Uniform coordinate keeping a body of half-extent `half` inside `[0, extent]`
fn sample_axis(rng: &mut Pcg32, half: f32, extent: f32) -> f32 {
    let lo = half.min(extent / 2.0);
    let hi = (extent - half).max(lo);
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn director() -> WaveDirector {
        WaveDirector::new(&SimConfig::default())
    }

    const CENTER: Vec2 = Vec2::new(500.0, 350.0);

    #[test]
    fn test_wave_size_formula() {
        let cfg = WaveConfig::default();
        assert_eq!(wave_size(&cfg, 1), 3);
        assert_eq!(wave_size(&cfg, 2), 5);
        assert_eq!(wave_size(&cfg, 7), 15);
    }

    #[test]
    fn test_wave_size_is_capped() {
        let cfg = WaveConfig {
            count_increment: MAX_WAVE_HOSTILES,
            ..WaveConfig::default()
        };
        assert_eq!(wave_size(&cfg, 2), MAX_WAVE_HOSTILES);
        assert_eq!(wave_size(&cfg, u32::MAX), MAX_WAVE_HOSTILES);
        assert_eq!(wave_composition(&cfg, u32::MAX).len(), MAX_WAVE_HOSTILES as usize);
    }

    #[test]
    fn test_composition_tiers() {
        let cfg = WaveConfig::default();
        assert!(wave_composition(&cfg, 1).iter().all(|a| *a == Archetype::Basic));
        assert!(wave_composition(&cfg, 3).iter().all(|a| *a == Archetype::Basic));
        assert!(wave_composition(&cfg, 4).iter().all(|a| *a == Archetype::Strong));
        assert!(wave_composition(&cfg, 6).iter().all(|a| *a == Archetype::Strong));

        let boss_wave = wave_composition(&cfg, 7);
        assert_eq!(boss_wave.len(), 15);
        assert_eq!(boss_wave.iter().filter(|a| **a == Archetype::Boss).count(), 1);
        assert_eq!(boss_wave[0], Archetype::Boss);
        assert!(boss_wave[1..].iter().all(|a| *a == Archetype::Strong));
    }

    #[test]
    fn test_initial_countdown_then_spawn() {
        let mut d = director();
        assert_eq!(d.wave(), 0);
        assert_eq!(d.countdown(), Some(2.0));

        assert!(d.advance(1.5, 0, CENTER).is_none());
        assert!(!d.is_active());

        let request = d.advance(0.5, 0, CENTER).unwrap();
        assert_eq!(request.wave, 1);
        assert_eq!(request.hostiles.len(), 3);
        assert_eq!(d.wave(), 1);
        assert!(d.is_active());
        assert_eq!(d.countdown(), None);
    }

    #[test]
    fn test_active_holds_while_hostiles_live() {
        let mut d = director();
        d.advance(2.0, 0, CENTER).unwrap();

        for _ in 0..100 {
            assert!(d.advance(1.0, 2, CENTER).is_none());
        }
        assert!(d.is_active());
        assert_eq!(d.wave(), 1);

        // Cleared: countdown restarts at the inter-wave delay
        assert!(d.advance(1.0, 0, CENTER).is_none());
        assert_eq!(d.phase(), WavePhase::Cooldown { remaining: 2.0 });

        let request = d.advance(2.0, 0, CENTER).unwrap();
        assert_eq!(request.wave, 2);
        assert_eq!(request.hostiles.len(), 5);
    }

    #[test]
    fn test_spawns_respect_min_distance_and_bounds() {
        let cfg = SimConfig::default();
        let mut d = WaveDirector::new(&cfg);
        for _ in 0..6 {
            let request = d.advance(10.0, 0, CENTER).unwrap();
            for order in &request.hostiles {
                let delta = (order.position - CENTER).abs();
                assert!(delta.x >= 100.0 || delta.y >= 100.0);

                let half = cfg.archetypes.get(order.archetype).size / 2.0;
                assert!(order.position.x >= half && order.position.x <= 1000.0 - half);
                assert!(order.position.y >= half && order.position.y <= 700.0 - half);
            }
            // Clear the wave
            d.advance(0.0, 0, CENTER);
        }
    }

    #[test]
    fn test_impossible_placement_falls_back() {
        let mut cfg = SimConfig::default();
        cfg.waves.spawn_min_distance = 10_000.0;
        cfg.waves.spawn_attempts = 4;
        let mut d = WaveDirector::new(&cfg);
        let request = d.advance(10.0, 0, CENTER).unwrap();
        assert_eq!(request.hostiles.len(), 3);
        for order in &request.hostiles {
            assert!(order.position.is_finite());
        }
    }

    #[test]
    fn test_same_seed_same_placement() {
        let mut a = director();
        let mut b = director();
        assert_eq!(a.advance(2.0, 0, CENTER), b.advance(2.0, 0, CENTER));
    }
}
