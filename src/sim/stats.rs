//! Run statistics

use serde::{Deserialize, Serialize};

use super::state::Archetype;

/// Aggregated outcome counters for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub kills: u32,
    /// Indexed by [`Archetype::index`]
    pub kills_by_archetype: [u32; 3],
    pub volleys_fired: u32,
    pub projectiles_fired: u32,
    pub hits_landed: u32,
    pub damage_dealt: i64,
    pub damage_taken: i64,
    pub contacts: u32,
    pub waves_cleared: u32,
    /// Seconds of active play
    pub time_alive: f32,
    /// Kills since the defender last lost health
    pub streak: u32,
    pub best_streak: u32,
}

impl RunStats {
    pub fn record_volley(&mut self, projectiles: usize) {
        self.volleys_fired += 1;
        self.projectiles_fired += projectiles as u32;
    }

    pub fn record_hit(&mut self, damage: i32) {
        self.hits_landed += 1;
        self.damage_dealt += i64::from(damage);
    }

    pub fn record_kill(&mut self, archetype: Archetype) {
        self.kills += 1;
        self.kills_by_archetype[archetype.index()] += 1;
        self.streak += 1;
        self.best_streak = self.best_streak.max(self.streak);
    }

    /// Health lost; any actual loss breaks the kill streak
    pub fn record_damage_taken(&mut self, damage: i32) {
        if damage > 0 {
            self.damage_taken += i64::from(damage);
            self.streak = 0;
        }
    }

    pub fn kills_of(&self, archetype: Archetype) -> u32 {
        self.kills_by_archetype[archetype.index()]
    }

    /// Fraction of fired projectiles that hit (0 when nothing was fired)
    pub fn accuracy(&self) -> f32 {
        if self.projectiles_fired == 0 {
            0.0
        } else {
            self.hits_landed as f32 / self.projectiles_fired as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streak_resets_on_damage() {
        let mut stats = RunStats::default();
        stats.record_kill(Archetype::Basic);
        stats.record_kill(Archetype::Strong);
        assert_eq!(stats.streak, 2);

        stats.record_damage_taken(0);
        assert_eq!(stats.streak, 2);

        stats.record_damage_taken(10);
        assert_eq!(stats.streak, 0);
        assert_eq!(stats.best_streak, 2);
        assert_eq!(stats.kills_of(Archetype::Basic), 1);
        assert_eq!(stats.kills_of(Archetype::Boss), 0);
    }

    #[test]
    fn test_accuracy() {
        let mut stats = RunStats::default();
        assert_eq!(stats.accuracy(), 0.0);
        stats.record_volley(4);
        stats.record_hit(10);
        assert!((stats.accuracy() - 0.25).abs() < 1e-6);
    }
}
