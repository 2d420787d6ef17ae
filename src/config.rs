//! Simulation configuration
//!
//! Every tunable number lives here. Defaults are the reference constant set;
//! a JSON document can override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{Archetype, ArchetypeStats, ContactPolicy, ShotPattern};

/// Errors raised while loading or validating a [`SimConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Arena bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
    /// Distance outside the arena a projectile may travel before it is pruned
    pub projectile_margin: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            projectile_margin: PROJECTILE_MARGIN,
        }
    }
}

/// Defender stats and weapon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefenderConfig {
    /// Full side length of the defender's square (collision radius is half)
    pub size: f32,
    /// Movement speed (units/sec)
    pub speed: f32,
    pub max_health: i32,
    pub max_ammo: u32,
    /// When false, shooting never consumes or requires ammo
    pub ammo_gated: bool,
    /// Seconds between volleys
    pub shoot_cooldown: f32,
    pub shot_pattern: ShotPattern,
    pub shot_speed: f32,
    pub shot_damage: i32,
    pub shot_size: f32,
    /// Ammo granted each time a wave is cleared
    pub ammo_refill_per_wave: u32,
}

impl Default for DefenderConfig {
    fn default() -> Self {
        Self {
            size: DEFENDER_SIZE,
            speed: DEFENDER_SPEED,
            max_health: DEFENDER_MAX_HEALTH,
            max_ammo: DEFENDER_MAX_AMMO,
            ammo_gated: true,
            shoot_cooldown: SHOOT_COOLDOWN,
            shot_pattern: ShotPattern::default(),
            shot_speed: SHOT_SPEED,
            shot_damage: SHOT_DAMAGE,
            shot_size: SHOT_SIZE,
            ammo_refill_per_wave: AMMO_REFILL_PER_WAVE,
        }
    }
}

/// Stat bundle per hostile archetype.
///
/// Each bundle in a JSON document may name only the stats it changes; the
/// rest keep that archetype's defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ArchetypeTableOverrides")]
pub struct ArchetypeTable {
    pub basic: ArchetypeStats,
    pub strong: ArchetypeStats,
    pub boss: ArchetypeStats,
}

impl Default for ArchetypeTable {
    fn default() -> Self {
        Self {
            basic: ArchetypeStats {
                health: 30,
                size: 30.0,
                speed: 120.0,
                contact_damage: 10,
                attack_damage: 5,
                point_value: 50,
                special_attack_range: 0.0,
            },
            strong: ArchetypeStats {
                health: 80,
                size: 40.0,
                speed: 90.0,
                contact_damage: 20,
                attack_damage: 10,
                point_value: 100,
                special_attack_range: 0.0,
            },
            boss: ArchetypeStats {
                health: 200,
                size: 60.0,
                speed: 60.0,
                contact_damage: 30,
                attack_damage: 20,
                point_value: 500,
                special_attack_range: 300.0,
            },
        }
    }
}

impl ArchetypeTable {
    pub fn get(&self, archetype: Archetype) -> &ArchetypeStats {
        match archetype {
            Archetype::Basic => &self.basic,
            Archetype::Strong => &self.strong,
            Archetype::Boss => &self.boss,
        }
    }
}

/// Partial archetype table as read from JSON
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ArchetypeTableOverrides {
    basic: ArchetypeStatsOverrides,
    strong: ArchetypeStatsOverrides,
    boss: ArchetypeStatsOverrides,
}

impl From<ArchetypeTableOverrides> for ArchetypeTable {
    fn from(overrides: ArchetypeTableOverrides) -> Self {
        let defaults = ArchetypeTable::default();
        Self {
            basic: overrides.basic.apply(defaults.basic),
            strong: overrides.strong.apply(defaults.strong),
            boss: overrides.boss.apply(defaults.boss),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ArchetypeStatsOverrides {
    health: Option<i32>,
    size: Option<f32>,
    speed: Option<f32>,
    contact_damage: Option<i32>,
    attack_damage: Option<i32>,
    point_value: Option<u64>,
    special_attack_range: Option<f32>,
}

impl ArchetypeStatsOverrides {
    fn apply(self, base: ArchetypeStats) -> ArchetypeStats {
        ArchetypeStats {
            health: self.health.unwrap_or(base.health),
            size: self.size.unwrap_or(base.size),
            speed: self.speed.unwrap_or(base.speed),
            contact_damage: self.contact_damage.unwrap_or(base.contact_damage),
            attack_damage: self.attack_damage.unwrap_or(base.attack_damage),
            point_value: self.point_value.unwrap_or(base.point_value),
            special_attack_range: self.special_attack_range.unwrap_or(base.special_attack_range),
        }
    }
}

/// Boss ring attack
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    /// Projectiles per ring
    pub ring_count: u32,
    pub shot_speed: f32,
    pub shot_size: f32,
    /// Seconds between rings
    pub attack_cooldown: f32,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            ring_count: BOSS_RING_COUNT,
            shot_speed: BOSS_SHOT_SPEED,
            shot_size: BOSS_SHOT_SIZE,
            attack_cooldown: BOSS_ATTACK_COOLDOWN,
        }
    }
}

/// Wave pacing, composition and placement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Countdown before wave 1
    pub initial_delay: f32,
    /// Countdown after a wave is cleared
    pub inter_wave_delay: f32,
    /// Hostiles in wave 1
    pub base_count: u32,
    /// Extra hostiles per subsequent wave
    pub count_increment: u32,
    /// First wave drawn from the STRONG tier
    pub strong_from_wave: u32,
    /// First wave led by a BOSS
    pub boss_from_wave: u32,
    /// Clearing this wave wins the run (None = endless)
    pub final_wave: Option<u32>,
    /// Spawn candidates closer than this on both axes are resampled
    pub spawn_min_distance: f32,
    pub spawn_attempts: u32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            initial_delay: INITIAL_WAVE_DELAY,
            inter_wave_delay: INTER_WAVE_DELAY,
            base_count: WAVE_BASE_COUNT,
            count_increment: WAVE_COUNT_INCREMENT,
            strong_from_wave: STRONG_FROM_WAVE,
            boss_from_wave: BOSS_FROM_WAVE,
            final_wave: None,
            spawn_min_distance: SPAWN_MIN_DISTANCE,
            spawn_attempts: SPAWN_ATTEMPTS,
        }
    }
}

/// Collision rules
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    pub contact: ContactPolicy,
}

/// Complete simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for spawn placement
    pub seed: u64,
    pub arena: ArenaConfig,
    pub defender: DefenderConfig,
    pub archetypes: ArchetypeTable,
    pub boss: BossConfig,
    pub waves: WaveConfig,
    pub collision: CollisionConfig,
}

impl SimConfig {
    /// Parse and validate a JSON document (missing fields take defaults)
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let arena = &self.arena;
        positive("arena.width", arena.width)?;
        positive("arena.height", arena.height)?;
        non_negative("arena.projectile_margin", arena.projectile_margin)?;

        let d = &self.defender;
        positive("defender.size", d.size)?;
        if d.size > arena.width || d.size > arena.height {
            return Err(ConfigError::invalid(
                "defender.size",
                format!("{} does not fit inside the arena", d.size),
            ));
        }
        positive("defender.speed", d.speed)?;
        if d.max_health <= 0 {
            return Err(ConfigError::invalid("defender.max_health", "must be positive"));
        }
        non_negative("defender.shoot_cooldown", d.shoot_cooldown)?;
        positive("defender.shot_speed", d.shot_speed)?;
        positive("defender.shot_size", d.shot_size)?;

        for archetype in Archetype::ALL {
            let stats = self.archetypes.get(archetype);
            if stats.health <= 0 {
                return Err(ConfigError::invalid(
                    "archetypes.health",
                    format!("{archetype:?} health must be positive"),
                ));
            }
            positive("archetypes.size", stats.size)?;
            non_negative("archetypes.speed", stats.speed)?;
            non_negative("archetypes.special_attack_range", stats.special_attack_range)?;
        }

        let b = &self.boss;
        if b.ring_count > MAX_BOSS_RING_COUNT {
            return Err(ConfigError::invalid(
                "boss.ring_count",
                format!("must be at most {MAX_BOSS_RING_COUNT}"),
            ));
        }
        non_negative("boss.attack_cooldown", b.attack_cooldown)?;
        positive("boss.shot_speed", b.shot_speed)?;
        positive("boss.shot_size", b.shot_size)?;

        let w = &self.waves;
        non_negative("waves.initial_delay", w.initial_delay)?;
        non_negative("waves.inter_wave_delay", w.inter_wave_delay)?;
        if w.base_count == 0 || w.base_count > MAX_WAVE_HOSTILES {
            return Err(ConfigError::invalid(
                "waves.base_count",
                format!("must be in 1..={MAX_WAVE_HOSTILES}"),
            ));
        }
        if w.count_increment > MAX_WAVE_HOSTILES {
            return Err(ConfigError::invalid(
                "waves.count_increment",
                format!("must be at most {MAX_WAVE_HOSTILES}"),
            ));
        }
        if w.strong_from_wave == 0 || w.boss_from_wave < w.strong_from_wave {
            return Err(ConfigError::invalid(
                "waves",
                "tiers must satisfy 1 <= strong_from_wave <= boss_from_wave",
            ));
        }
        if w.final_wave == Some(0) {
            return Err(ConfigError::invalid("waves.final_wave", "must be at least 1"));
        }
        if w.spawn_attempts == 0 {
            return Err(ConfigError::invalid("waves.spawn_attempts", "must be at least 1"));
        }
        non_negative("waves.spawn_min_distance", w.spawn_min_distance)?;

        if let ContactPolicy::Persistent { interval } = self.collision.contact {
            non_negative("collision.contact.interval", interval)?;
        }

        Ok(())
    }
}

/// Finite and `> 0`
fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be finite and positive")))
    }
}

/// Finite and `>= 0`
fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be finite and >= 0")))
    }
}
