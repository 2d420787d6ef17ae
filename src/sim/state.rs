//! Game state and core simulation types
//!
//! Everything the tick mutates lives in [`GameState`]; the host only ever
//! touches it through [`super::tick`] or [`super::SimulationClock`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, Faction};
use super::stats::RunStats;
use super::tick::TickInput;
use super::wave::WaveDirector;
use crate::config::{ArenaConfig, BossConfig, DefenderConfig, SimConfig};
use crate::{clamp_center, ring_directions};

/// Outcome state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Ticks advance the simulation
    Active,
    /// Defender health reached zero
    Defeated,
    /// The configured final wave was cleared
    Victory,
}

impl RunPhase {
    pub fn is_active(self) -> bool {
        self == RunPhase::Active
    }
}

/// How a defender volley is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShotPattern {
    /// One projectile each up, down, left and right
    #[default]
    Omni,
    /// One projectile along the last movement heading
    Aimed,
}

/// Hostile kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Basic,
    Strong,
    Boss,
}

impl Archetype {
    pub const ALL: [Archetype; 3] = [Archetype::Basic, Archetype::Strong, Archetype::Boss];

    pub fn index(self) -> usize {
        match self {
            Archetype::Basic => 0,
            Archetype::Strong => 1,
            Archetype::Boss => 2,
        }
    }
}

/// Fixed stats shared by every hostile of one archetype
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeStats {
    pub health: i32,
    pub size: f32,
    /// Pursuit speed (units/sec)
    pub speed: f32,
    pub contact_damage: i32,
    /// Damage carried by this archetype's special-attack projectiles
    pub attack_damage: i32,
    pub point_value: u64,
    /// Distance at which the special attack triggers (0 = none)
    pub special_attack_range: f32,
}

/// Monotonic entity ID source
#[derive(Debug, Clone)]
pub struct IdGen {
    next: u32,
}

impl Default for IdGen {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdGen {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// A moving shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub damage: i32,
    /// `DefenderProjectile` or `HostileProjectile`
    pub faction: Faction,
}

impl Projectile {
    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// True once the projectile is beyond the arena plus margin
    pub fn is_out_of_bounds(&self, arena: &ArenaConfig) -> bool {
        let m = arena.projectile_margin;
        self.pos.x < -m
            || self.pos.x > arena.width + m
            || self.pos.y < -m
            || self.pos.y > arena.height + m
    }
}

impl Entity for Projectile {
    fn id(&self) -> u32 {
        self.id
    }
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> f32 {
        self.size
    }
    fn faction(&self) -> Faction {
        self.faction
    }
}

/// The player-controlled combatant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defender {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    pub ammo: u32,
    pub max_ammo: u32,
    pub score: u64,
    /// Seconds until the next volley is allowed
    pub shoot_cooldown: f32,
    /// Last non-zero movement direction (unit), used by aimed shots
    pub heading: Vec2,
}

impl Defender {
    /// Fresh defender centered in the arena
    pub fn new(id: u32, config: &DefenderConfig, arena: &ArenaConfig) -> Self {
        Self {
            id,
            pos: Vec2::new(arena.width / 2.0, arena.height / 2.0),
            size: config.size,
            speed: config.speed,
            health: config.max_health,
            max_health: config.max_health,
            ammo: config.max_ammo,
            max_ammo: config.max_ammo,
            score: 0,
            shoot_cooldown: 0.0,
            heading: Vec2::NEG_Y,
        }
    }

    /// Top-left corner of the defender's square
    pub fn top_left(&self) -> Vec2 {
        self.pos - Vec2::splat(self.size / 2.0)
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Move, tick the weapon cooldown and fire if requested.
    ///
    /// Returns the projectiles of the volley (empty when no shot was fired).
    pub fn apply_intent(
        &mut self,
        intent: &TickInput,
        dt: f32,
        config: &SimConfig,
        ids: &mut IdGen,
    ) -> Vec<Projectile> {
        self.step_movement(intent.move_axis(), dt, &config.arena);

        if self.shoot_cooldown > 0.0 {
            self.shoot_cooldown = (self.shoot_cooldown - dt).max(0.0);
        }

        if intent.shoot {
            self.try_shoot(&config.defender, ids)
        } else {
            Vec::new()
        }
    }

    /// Apply a movement axis (components in -1..=1) and clamp to the arena
    pub fn step_movement(&mut self, axis: Vec2, dt: f32, arena: &ArenaConfig) {
        // Diagonals move at axial speed
        let dir = axis.normalize_or_zero();
        if dir != Vec2::ZERO {
            self.heading = dir;
            self.pos += dir * self.speed * dt;
        }
        self.pos = clamp_center(self.pos, self.size, arena.width, arena.height);
    }

    /// Fire one volley if ammo and cooldown allow; silent no-op otherwise
    pub fn try_shoot(&mut self, config: &DefenderConfig, ids: &mut IdGen) -> Vec<Projectile> {
        if self.shoot_cooldown > 0.0 {
            return Vec::new();
        }
        if config.ammo_gated {
            if self.ammo == 0 {
                return Vec::new();
            }
            self.ammo -= 1;
        }
        self.shoot_cooldown = config.shoot_cooldown;

        let directions: Vec<Vec2> = match config.shot_pattern {
            ShotPattern::Omni => vec![Vec2::NEG_Y, Vec2::Y, Vec2::NEG_X, Vec2::X],
            ShotPattern::Aimed => vec![self.heading],
        };

        directions
            .into_iter()
            .map(|dir| Projectile {
                id: ids.next_id(),
                pos: self.pos,
                vel: dir * config.shot_speed,
                size: config.shot_size,
                damage: config.shot_damage,
                faction: Faction::DefenderProjectile,
            })
            .collect()
    }

    /// Apply damage, clamping health to `[0, max_health]`.
    ///
    /// Returns the health actually lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = (self.health - amount).clamp(0, self.max_health);
        before - self.health
    }

    /// Add ammo, never exceeding `max_ammo`
    pub fn add_ammo(&mut self, amount: u32) {
        self.ammo = self.ammo.saturating_add(amount).min(self.max_ammo);
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }
}

impl Entity for Defender {
    fn id(&self) -> u32 {
        self.id
    }
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> f32 {
        self.size
    }
    fn faction(&self) -> Faction {
        Faction::Defender
    }
}

/// An enemy combatant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hostile {
    pub id: u32,
    pub archetype: Archetype,
    pub stats: ArchetypeStats,
    /// Center position
    pub pos: Vec2,
    /// May go negative transiently; dead means `<= 0`
    pub health: i32,
    /// Seconds until the next special attack (boss only)
    pub attack_cooldown: f32,
    /// Seconds until contact damage may apply again (persistent contact only)
    pub contact_cooldown: f32,
}

impl Hostile {
    pub fn new(id: u32, archetype: Archetype, stats: ArchetypeStats, pos: Vec2) -> Self {
        Self {
            id,
            archetype,
            stats,
            pos,
            health: stats.health,
            attack_cooldown: 0.0,
            contact_cooldown: 0.0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health -= amount;
    }

    pub fn health_fraction(&self) -> f32 {
        (self.health.max(0) as f32 / self.stats.health as f32).clamp(0.0, 1.0)
    }

    /// Pursue the defender and, for bosses, fire the ring attack.
    ///
    /// Every archetype runs the same routine; only the boss's special attack is
    /// gated on archetype. Returns the ring projectiles when the attack fires.
    pub fn update(
        &mut self,
        dt: f32,
        target: Vec2,
        boss: &BossConfig,
        ids: &mut IdGen,
    ) -> Option<Vec<Projectile>> {
        let to_target = target - self.pos;
        let distance = to_target.length();

        if distance > 0.0 {
            // Stop on the target instead of overshooting it
            let step = (self.stats.speed * dt).min(distance);
            self.pos += to_target / distance * step;
        }

        if self.archetype != Archetype::Boss || self.stats.special_attack_range <= 0.0 {
            return None;
        }

        if self.attack_cooldown > 0.0 {
            self.attack_cooldown -= dt;
        }
        if self.attack_cooldown <= 0.0 && distance < self.stats.special_attack_range {
            self.attack_cooldown = boss.attack_cooldown;
            let ring = ring_directions(boss.ring_count)
                .map(|dir| Projectile {
                    id: ids.next_id(),
                    pos: self.pos,
                    vel: dir * boss.shot_speed,
                    size: boss.shot_size,
                    damage: self.stats.attack_damage,
                    faction: Faction::HostileProjectile,
                })
                .collect();
            return Some(ring);
        }
        None
    }
}

impl Entity for Hostile {
    fn id(&self) -> u32 {
        self.id
    }
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> f32 {
        self.stats.size
    }
    fn faction(&self) -> Faction {
        Faction::Hostile
    }
}

/// What hit the defender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitSource {
    Contact { hostile: u32 },
    Projectile { projectile: u32 },
}

/// Gameplay events emitted during a tick (for audio/UI collaborators)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WaveStarted { wave: u32, hostiles: u32 },
    WaveCleared { wave: u32 },
    ShotFired { projectiles: u32 },
    HostileHit { hostile: u32, damage: i32 },
    HostileKilled { hostile: u32, archetype: Archetype, points: u64 },
    DefenderHit { source: HitSource, damage: i32 },
    BossRingAttack { hostile: u32 },
    RunEnded { phase: RunPhase, score: u64, wave: u32 },
    Restarted,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: SimConfig,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: RunPhase,
    pub defender: Defender,
    /// Live hostiles (spawn order)
    pub hostiles: Vec<Hostile>,
    /// Live projectiles (spawn order)
    pub projectiles: Vec<Projectile>,
    pub waves: WaveDirector,
    pub stats: RunStats,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    pub ids: IdGen,
}

impl GameState {
    /// Fresh run. `config` is assumed to be validated.
    pub fn new(config: SimConfig) -> Self {
        let mut ids = IdGen::default();
        let defender = Defender::new(ids.next_id(), &config.defender, &config.arena);
        let waves = WaveDirector::new(&config);
        Self {
            config,
            time_ticks: 0,
            phase: RunPhase::Active,
            defender,
            hostiles: Vec::new(),
            projectiles: Vec::new(),
            waves,
            stats: RunStats::default(),
            events: Vec::new(),
            ids,
        }
    }

    /// Reset everything to a fresh run with the same config
    pub fn restart(&mut self) {
        *self = Self::new(self.config.clone());
        self.events.push(GameEvent::Restarted);
    }

    /// Add a hostile of `archetype` centered at `pos`
    pub fn spawn_hostile(&mut self, archetype: Archetype, pos: Vec2) -> u32 {
        let id = self.ids.next_id();
        let stats = *self.config.archetypes.get(archetype);
        self.hostiles.push(Hostile::new(id, archetype, stats, pos));
        id
    }

    /// Add a projectile; its id is reassigned from this state's allocator
    pub fn spawn_projectile(&mut self, mut projectile: Projectile) -> u32 {
        projectile.id = self.ids.next_id();
        let id = projectile.id;
        self.projectiles.push(projectile);
        id
    }

    /// Hostiles with health above zero (dead ones linger until the next prune)
    pub fn live_hostiles(&self) -> usize {
        self.hostiles.iter().filter(|h| !h.is_dead()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn config() -> SimConfig {
        SimConfig::default()
    }

    #[test]
    fn test_live_hostiles_skips_unpruned_dead() {
        let mut state = GameState::new(config());
        state.spawn_hostile(Archetype::Basic, Vec2::new(100.0, 100.0));
        state.spawn_hostile(Archetype::Basic, Vec2::new(200.0, 100.0));
        state.hostiles[0].take_damage(1000);

        assert_eq!(state.hostiles.len(), 2);
        assert_eq!(state.live_hostiles(), 1);
    }

    #[test]
    fn test_defender_starts_centered() {
        let state = GameState::new(config());
        assert_eq!(state.defender.pos, Vec2::new(500.0, 350.0));
        assert_eq!(state.defender.top_left(), Vec2::new(480.0, 330.0));
        assert_eq!(state.defender.health, DEFENDER_MAX_HEALTH);
        assert_eq!(state.defender.ammo, DEFENDER_MAX_AMMO);
    }

    #[test]
    fn test_diagonal_speed_matches_axial() {
        let cfg = config();
        let mut a = Defender::new(1, &cfg.defender, &cfg.arena);
        let mut b = a.clone();
        a.step_movement(Vec2::new(1.0, 0.0), 0.1, &cfg.arena);
        b.step_movement(Vec2::new(1.0, 1.0), 0.1, &cfg.arena);
        let axial = a.pos.distance(Vec2::new(500.0, 350.0));
        let diagonal = b.pos.distance(Vec2::new(500.0, 350.0));
        assert!((axial - diagonal).abs() < 1e-3);
        assert!((axial - DEFENDER_SPEED * 0.1).abs() < 1e-3);
    }

    #[test]
    fn test_shoot_respects_cooldown_and_ammo() {
        let cfg = config();
        let mut ids = IdGen::default();
        let mut d = Defender::new(ids.next_id(), &cfg.defender, &cfg.arena);

        let volley = d.try_shoot(&cfg.defender, &mut ids);
        assert_eq!(volley.len(), 4);
        assert_eq!(d.ammo, DEFENDER_MAX_AMMO - 1);
        assert_eq!(d.shoot_cooldown, SHOOT_COOLDOWN);

        // On cooldown: no-op
        assert!(d.try_shoot(&cfg.defender, &mut ids).is_empty());
        assert_eq!(d.ammo, DEFENDER_MAX_AMMO - 1);

        // Out of ammo: no-op
        d.shoot_cooldown = 0.0;
        d.ammo = 0;
        assert!(d.try_shoot(&cfg.defender, &mut ids).is_empty());
        assert_eq!(d.shoot_cooldown, 0.0);
    }

    #[test]
    fn test_ungated_shooting_ignores_ammo() {
        let mut cfg = config();
        cfg.defender.ammo_gated = false;
        let mut ids = IdGen::default();
        let mut d = Defender::new(ids.next_id(), &cfg.defender, &cfg.arena);
        d.ammo = 0;
        assert_eq!(d.try_shoot(&cfg.defender, &mut ids).len(), 4);
        assert_eq!(d.ammo, 0);
    }

    #[test]
    fn test_aimed_shot_follows_heading() {
        let mut cfg = config();
        cfg.defender.shot_pattern = ShotPattern::Aimed;
        let mut ids = IdGen::default();
        let mut d = Defender::new(ids.next_id(), &cfg.defender, &cfg.arena);

        let volley = d.try_shoot(&cfg.defender, &mut ids);
        assert_eq!(volley.len(), 1);
        assert_eq!(volley[0].vel, Vec2::NEG_Y * SHOT_SPEED);

        d.step_movement(Vec2::new(1.0, 0.0), REFERENCE_DT, &cfg.arena);
        d.shoot_cooldown = 0.0;
        let volley = d.try_shoot(&cfg.defender, &mut ids);
        assert_eq!(volley[0].vel, Vec2::X * SHOT_SPEED);
    }

    #[test]
    fn test_defender_damage_clamps() {
        let cfg = config();
        let mut d = Defender::new(1, &cfg.defender, &cfg.arena);
        assert_eq!(d.take_damage(30), 30);
        assert_eq!(d.take_damage(500), 70);
        assert_eq!(d.health, 0);
        assert!(d.is_dead());
    }

    #[test]
    fn test_add_ammo_caps_at_max() {
        let cfg = config();
        let mut d = Defender::new(1, &cfg.defender, &cfg.arena);
        d.ammo = 25;
        d.add_ammo(10);
        assert_eq!(d.ammo, DEFENDER_MAX_AMMO);
    }

    #[test]
    fn test_hostile_pursues_without_overshoot() {
        let cfg = config();
        let stats = cfg.archetypes.basic;
        let mut ids = IdGen::default();
        let mut h = Hostile::new(1, Archetype::Basic, stats, Vec2::new(500.0, 50.0));
        let target = Vec2::new(500.0, 350.0);

        assert!(h.update(1.0, target, &cfg.boss, &mut ids).is_none());
        assert!((h.pos - Vec2::new(500.0, 170.0)).length() < 1e-3);

        h.update(10.0, target, &cfg.boss, &mut ids);
        assert_eq!(h.pos, target);
    }

    #[test]
    fn test_hostile_damage_is_unclamped() {
        let cfg = config();
        let mut h = Hostile::new(1, Archetype::Basic, cfg.archetypes.basic, Vec2::ZERO);
        h.take_damage(45);
        assert_eq!(h.health, -15);
        assert!(h.is_dead());
        assert_eq!(h.health_fraction(), 0.0);
    }

    #[test]
    fn test_boss_ring_attack_gated_by_range_and_cooldown() {
        let cfg = config();
        let mut ids = IdGen::default();
        let mut boss = Hostile::new(1, Archetype::Boss, cfg.archetypes.boss, Vec2::new(100.0, 100.0));

        // Out of range: no attack
        let far = Vec2::new(900.0, 600.0);
        assert!(boss.update(REFERENCE_DT, far, &cfg.boss, &mut ids).is_none());

        // In range: ring of 8 hostile projectiles carrying attack damage
        let near = boss.pos + Vec2::new(200.0, 0.0);
        let ring = boss.update(REFERENCE_DT, near, &cfg.boss, &mut ids).unwrap();
        assert_eq!(ring.len(), BOSS_RING_COUNT as usize);
        assert!(ring.iter().all(|p| p.faction == Faction::HostileProjectile));
        assert!(ring.iter().all(|p| p.damage == cfg.archetypes.boss.attack_damage));
        assert_eq!(boss.attack_cooldown, BOSS_ATTACK_COOLDOWN);

        // Cooling down: no attack
        let near = boss.pos + Vec2::new(200.0, 0.0);
        assert!(boss.update(REFERENCE_DT, near, &cfg.boss, &mut ids).is_none());
    }

    #[test]
    fn test_non_boss_never_attacks() {
        let cfg = config();
        let mut ids = IdGen::default();
        let mut stats = cfg.archetypes.strong;
        stats.special_attack_range = 1000.0;
        let mut h = Hostile::new(1, Archetype::Strong, stats, Vec2::ZERO);
        assert!(h.update(REFERENCE_DT, Vec2::new(10.0, 0.0), &cfg.boss, &mut ids).is_none());
    }

    #[test]
    fn test_projectile_out_of_bounds_uses_margin() {
        let arena = ArenaConfig::default();
        let mut p = Projectile {
            id: 1,
            pos: Vec2::new(-40.0, 10.0),
            vel: Vec2::new(-600.0, 0.0),
            size: SHOT_SIZE,
            damage: SHOT_DAMAGE,
            faction: Faction::DefenderProjectile,
        };
        assert!(!p.is_out_of_bounds(&arena));
        p.update(0.1);
        assert!(p.is_out_of_bounds(&arena));
    }
}
