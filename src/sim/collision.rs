//! Per-tick collision resolution
//!
//! Three passes, in order:
//! 1. defender projectiles against hostiles
//! 2. hostiles against the defender (contact)
//! 3. hostile projectiles against the defender
//!
//! The resolver applies damage but never removes anything. Spent projectiles
//! and contact-destroyed hostiles are reported back so the owner can prune
//! them after the scan.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, Faction};
use super::state::{Defender, HitSource, Hostile, Projectile};

/// What happens to a hostile that touches the defender
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ContactPolicy {
    /// Deal contact damage once and remove the hostile (no points awarded)
    #[default]
    Destructive,
    /// Hostile survives; contact damage repeats every `interval` seconds
    /// while the overlap persists (0 = every tick)
    Persistent { interval: f32 },
}

/// A defender projectile landing on a hostile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostileHit {
    pub projectile: u32,
    pub hostile: u32,
    pub damage: i32,
    /// Hostile health is now `<= 0`
    pub lethal: bool,
}

/// Damage the defender actually lost from one source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefenderHit {
    pub source: HitSource,
    pub damage: i32,
}

/// Everything one resolver pass did
#[derive(Debug, Clone, Default)]
pub struct CollisionReport {
    pub hostile_hits: Vec<HostileHit>,
    pub defender_hits: Vec<DefenderHit>,
    /// Projectiles that hit something this tick
    pub spent_projectiles: Vec<u32>,
    /// Hostiles removed by contact
    pub destroyed_hostiles: Vec<u32>,
}

impl CollisionReport {
    pub fn damage_taken(&self) -> i32 {
        self.defender_hits.iter().map(|h| h.damage).sum()
    }

    pub fn contacts(&self) -> usize {
        self.defender_hits
            .iter()
            .filter(|h| matches!(h.source, HitSource::Contact { .. }))
            .count()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionResolver {
    pub contact: ContactPolicy,
}

impl CollisionResolver {
    pub fn new(contact: ContactPolicy) -> Self {
        Self { contact }
    }

    pub fn resolve(
        &self,
        dt: f32,
        defender: &mut Defender,
        hostiles: &mut [Hostile],
        projectiles: &[Projectile],
    ) -> CollisionReport {
        let mut report = CollisionReport::default();
        self.resolve_projectile_hits(hostiles, projectiles, &mut report);
        self.resolve_contacts(dt, defender, hostiles, &mut report);
        self.resolve_hostile_fire(defender, projectiles, &mut report);
        report
    }

    /// Each defender projectile hits at most one hostile: the first live one
    /// it overlaps in iteration order.
    fn resolve_projectile_hits(
        &self,
        hostiles: &mut [Hostile],
        projectiles: &[Projectile],
        report: &mut CollisionReport,
    ) {
        for projectile in projectiles
            .iter()
            .filter(|p| p.faction == Faction::DefenderProjectile)
        {
            let Some(hostile) = hostiles
                .iter_mut()
                .find(|h| !h.is_dead() && projectile.overlaps(&**h))
            else {
                continue;
            };

            hostile.take_damage(projectile.damage);
            report.hostile_hits.push(HostileHit {
                projectile: projectile.id,
                hostile: hostile.id,
                damage: projectile.damage,
                lethal: hostile.is_dead(),
            });
            report.spent_projectiles.push(projectile.id);
        }
    }

    /// Hostiles killed by the projectile pass are already dead here and deal
    /// no contact damage.
    fn resolve_contacts(
        &self,
        dt: f32,
        defender: &mut Defender,
        hostiles: &mut [Hostile],
        report: &mut CollisionReport,
    ) {
        for hostile in hostiles.iter_mut() {
            if hostile.contact_cooldown > 0.0 {
                hostile.contact_cooldown = (hostile.contact_cooldown - dt).max(0.0);
            }
            if hostile.is_dead() || !hostile.overlaps(&*defender) {
                continue;
            }

            match self.contact {
                ContactPolicy::Destructive => {
                    report.destroyed_hostiles.push(hostile.id);
                }
                ContactPolicy::Persistent { interval } => {
                    if hostile.contact_cooldown > 0.0 {
                        continue;
                    }
                    hostile.contact_cooldown = interval;
                }
            }

            let damage = defender.take_damage(hostile.stats.contact_damage);
            report.defender_hits.push(DefenderHit {
                source: HitSource::Contact { hostile: hostile.id },
                damage,
            });
        }
    }

    fn resolve_hostile_fire(
        &self,
        defender: &mut Defender,
        projectiles: &[Projectile],
        report: &mut CollisionReport,
    ) {
        for projectile in projectiles
            .iter()
            .filter(|p| p.faction == Faction::HostileProjectile)
        {
            if !projectile.overlaps(&*defender) {
                continue;
            }
            let damage = defender.take_damage(projectile.damage);
            report.defender_hits.push(DefenderHit {
                source: HitSource::Projectile {
                    projectile: projectile.id,
                },
                damage,
            });
            report.spent_projectiles.push(projectile.id);
        }
    }
}
