//! Power-up registry and spawn policy
//!
//! Power-ups appear once the score reaches a minimum, at most once per score
//! bracket, and fall at a fixed rate unaffected by slowdown. Claiming one is
//! handled by the session, which owns the effects.

use std::collections::HashSet;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Powerup, PowerupKind};
use super::view::PlayArea;
use crate::tuning::PowerupTuning;

/// Outcome of one per-tick spawn evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnRoll {
    /// Score too low, screen full, or bracket already used
    Ineligible,
    /// Eligible but the roll failed; try again next tick
    Missed,
    /// Roll succeeded; the bracket is now consumed
    Won { bracket: u64 },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerupRegistry {
    active: Vec<Powerup>,
    /// Brackets (`score / bracket_size`) whose spawn has been used
    used_brackets: HashSet<u64>,
}

impl PowerupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Powerup> {
        self.active.iter()
    }

    pub fn get(&self, id: u32) -> Option<&Powerup> {
        self.active.iter().find(|p| p.id == id)
    }

    pub fn bracket_used(&self, bracket: u64) -> bool {
        self.used_brackets.contains(&bracket)
    }

    /// Forget live power-ups; used brackets survive until a new session
    pub fn clear_active(&mut self) {
        self.active.clear();
    }

    /// Evaluate the spawn policy for this tick. A winning roll marks the
    /// bracket whether or not the caller manages to place the power-up.
    pub fn roll_spawn<R: Rng + ?Sized>(
        &mut self,
        score: u64,
        tuning: &PowerupTuning,
        rng: &mut R,
    ) -> SpawnRoll {
        if score < tuning.min_score || self.active.len() >= tuning.max_active {
            return SpawnRoll::Ineligible;
        }
        let bracket = score / tuning.bracket_size.max(1);
        if self.used_brackets.contains(&bracket) {
            return SpawnRoll::Ineligible;
        }
        if rng.random::<f64>() >= tuning.spawn_chance {
            return SpawnRoll::Missed;
        }
        self.used_brackets.insert(bracket);
        SpawnRoll::Won { bracket }
    }

    /// Place a power-up of a uniformly random kind above the play area
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        id: u32,
        area: PlayArea,
        tuning: &PowerupTuning,
        rng: &mut R,
    ) -> &Powerup {
        let kind = PowerupKind::ALL[rng.random_range(0..PowerupKind::ALL.len())];
        self.spawn_kind(id, kind, area, tuning, rng)
    }

    pub fn spawn_kind<R: Rng + ?Sized>(
        &mut self,
        id: u32,
        kind: PowerupKind,
        area: PlayArea,
        tuning: &PowerupTuning,
        rng: &mut R,
    ) -> &Powerup {
        let x = rng.random::<f32>() * (area.width - tuning.size).max(0.0);
        self.active.push(Powerup {
            id,
            kind,
            pos: Vec2::new(x, tuning.start_y),
        });
        &self.active[self.active.len() - 1]
    }

    /// Fall one tick; returns power-ups that left the bottom edge unclaimed
    pub fn advance(&mut self, fall_speed: f32, area_height: f32) -> Vec<Powerup> {
        for powerup in &mut self.active {
            powerup.pos.y += fall_speed;
        }
        let (lost, kept) = std::mem::take(&mut self.active)
            .into_iter()
            .partition(|p| p.pos.y > area_height);
        self.active = kept;
        lost
    }

    /// Claim a live power-up
    pub fn take(&mut self, id: u32) -> Option<Powerup> {
        let index = self.active.iter().position(|p| p.id == id)?;
        Some(self.active.remove(index))
    }
}
