//! Falling-word registry
//!
//! Sole owner of live [`FallingObject`]s. Handles spawn geometry, the
//! score-dependent speed band, per-tick motion, miss detection and the
//! slowdown speed swap.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::matcher;
use super::state::FallingObject;
use super::view::PlayArea;
use crate::tuning::{SpeedCurve, WordSpawn};

/// Speed band `(min, max)` for a given score.
///
/// Both bounds rise with score and are capped; the band keeps its width until
/// the cap starts compressing it.
pub fn speed_range(score: u64, curve: &SpeedCurve) -> (f32, f32) {
    let increase = score as f32 * curve.factor;
    let spread = curve.base_max - curve.base_min;
    let min = (curve.base_min + increase).min(curve.cap - spread);
    let max = (curve.base_max + increase).min(curve.cap);
    (min, max)
}

/// Rendered width reserved for a word
pub fn object_width(word: &str, spawn: &WordSpawn) -> f32 {
    let chars = word.chars().count() as f32;
    spawn.min_width.max(chars * spawn.width_per_char + spawn.width_padding)
}

/// Live-object ceiling for the per-tick spawn policy
pub fn max_objects(score: u64, spawn: &WordSpawn) -> u32 {
    let steps = if spawn.score_step == 0 {
        0
    } else {
        (score / spawn.score_step) as u32
    };
    spawn
        .absolute_max_objects
        .min(spawn.base_max_objects + steps.saturating_mul(spawn.objects_per_step))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WordRegistry {
    objects: Vec<FallingObject>,
}

impl WordRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FallingObject> {
        self.objects.iter()
    }

    pub fn get(&self, id: u32) -> Option<&FallingObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Place a new word above the play area.
    ///
    /// `slow_factor` is the active slowdown multiplier, if any; the stored
    /// base speed is always the unslowed spawn speed.
    #[allow(clippy::too_many_arguments)]
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        id: u32,
        word: &str,
        area: PlayArea,
        score: u64,
        slow_factor: Option<f32>,
        curve: &SpeedCurve,
        spawn: &WordSpawn,
        rng: &mut R,
    ) -> &FallingObject {
        let free_width = (area.width - object_width(word, spawn)).max(0.0);
        let x = rng.random::<f32>() * free_width;

        let (min, max) = speed_range(score, curve);
        let base = min + rng.random::<f32>() * (max - min);
        let speed = match slow_factor {
            Some(factor) => base * factor,
            None => base,
        };

        self.objects.push(FallingObject {
            id,
            word: word.to_string(),
            pos: Vec2::new(x, spawn.start_y),
            speed,
            base_speed: Some(base),
        });
        &self.objects[self.objects.len() - 1]
    }

    /// Move every word down by its current speed
    pub fn advance(&mut self) {
        for obj in &mut self.objects {
            obj.pos.y += obj.speed;
        }
    }

    /// Remove and return words strictly below `boundary`
    pub fn take_missed(&mut self, boundary: f32) -> Vec<FallingObject> {
        let (missed, kept) = std::mem::take(&mut self.objects)
            .into_iter()
            .partition(|o| o.pos.y > boundary);
        self.objects = kept;
        missed
    }

    /// Remove the most urgent word matching already-normalized input
    pub fn remove_by_word(&mut self, key: &str) -> Option<FallingObject> {
        let index = matcher::most_urgent(&self.objects, key)?;
        Some(self.objects.remove(index))
    }

    pub fn destroy_all(&mut self) -> Vec<FallingObject> {
        std::mem::take(&mut self.objects)
    }

    /// Scale every word to `factor` of its base speed, remembering the base
    pub fn apply_slowdown(&mut self, factor: f32) {
        for obj in &mut self.objects {
            let base = *obj.base_speed.get_or_insert(obj.speed);
            obj.speed = base * factor;
        }
    }

    /// Restore stored base speeds and forget them
    pub fn restore_speeds(&mut self) {
        for obj in &mut self.objects {
            if let Some(base) = obj.base_speed.take() {
                obj.speed = base;
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn insert(&mut self, obj: FallingObject) {
        self.objects.push(obj);
    }
}
