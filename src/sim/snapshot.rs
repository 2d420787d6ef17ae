//! Read-only export of a tick's outcome for rendering and HUD

use serde::{Deserialize, Serialize};

use super::entity::{Entity, Faction};
use super::state::{Archetype, GameEvent, GameState, RunPhase};
use super::stats::RunStats;
use super::wave::WavePhase;

/// One drawable body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub faction: Faction,
    pub archetype: Option<Archetype>,
    /// Remaining health as 0..=1 (projectiles report 1)
    pub health: f32,
}

impl EntityView {
    fn of(entity: &impl Entity, archetype: Option<Archetype>, health: f32) -> Self {
        let pos = entity.position();
        Self {
            id: entity.id(),
            x: pos.x,
            y: pos.y,
            size: entity.size(),
            faction: entity.faction(),
            archetype,
            health,
        }
    }
}

/// Everything the renderer/HUD needs after a tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSnapshot {
    pub tick: u64,
    pub health: i32,
    pub max_health: i32,
    pub ammo: u32,
    pub max_ammo: u32,
    pub score: u64,
    pub wave_number: u32,
    pub hostiles_remaining: usize,
    pub run_active: bool,
    pub phase: RunPhase,
    pub wave_phase: WavePhase,
    /// Seconds until the next wave (only between waves)
    pub next_wave_in: Option<f32>,
    pub defender: EntityView,
    pub hostiles: Vec<EntityView>,
    pub projectiles: Vec<EntityView>,
    pub events: Vec<GameEvent>,
    pub stats: RunStats,
}

impl ResultSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let d = &state.defender;
        Self {
            tick: state.time_ticks,
            health: d.health,
            max_health: d.max_health,
            ammo: d.ammo,
            max_ammo: d.max_ammo,
            score: d.score,
            wave_number: state.waves.wave(),
            hostiles_remaining: state.live_hostiles(),
            run_active: state.phase.is_active(),
            phase: state.phase,
            wave_phase: state.waves.phase(),
            next_wave_in: state.waves.countdown(),
            defender: EntityView::of(d, None, d.health as f32 / d.max_health as f32),
            hostiles: state
                .hostiles
                .iter()
                .map(|h| EntityView::of(h, Some(h.archetype), h.health_fraction()))
                .collect(),
            projectiles: state
                .projectiles
                .iter()
                .map(|p| EntityView::of(p, None, 1.0))
                .collect(),
            events: state.events.clone(),
            stats: state.stats.clone(),
        }
    }

    /// Serialize for an out-of-process renderer or debugging
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::config::SimConfig;

    #[test]
    fn test_capture_fresh_state() {
        let state = GameState::new(SimConfig::default());
        let snap = ResultSnapshot::capture(&state);
        assert_eq!(snap.health, 100);
        assert_eq!(snap.max_ammo, 30);
        assert_eq!(snap.wave_number, 0);
        assert_eq!(snap.hostiles_remaining, 0);
        assert!(snap.run_active);
        assert_eq!(snap.next_wave_in, Some(2.0));
        assert_eq!(snap.defender.faction, Faction::Defender);
        assert_eq!((snap.defender.x, snap.defender.y), (500.0, 350.0));
    }

    #[test]
    fn test_capture_lists_entities() {
        let mut state = GameState::new(SimConfig::default());
        state.spawn_hostile(Archetype::Strong, Vec2::new(10.0, 20.0));
        state.hostiles[0].take_damage(40);

        let snap = ResultSnapshot::capture(&state);
        assert_eq!(snap.hostiles.len(), 1);
        assert_eq!(snap.hostiles[0].archetype, Some(Archetype::Strong));
        assert!((snap.hostiles[0].health - 0.5).abs() < 1e-6);

        let json = snap.to_json().unwrap();
        assert!(json.contains("\"Strong\""));
    }
}
