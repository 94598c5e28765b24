//! Data-driven game balance
//!
//! Every gameplay constant lives here so a session can be tuned (or tested)
//! without touching simulation code. Persisted as JSON; missing fields fall
//! back to defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while loading or validating a [`Tuning`]
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("could not read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must lie in [0, 1] (got {value})")]
    OutOfUnitRange { field: &'static str, value: f64 },
    #[error("speed curve is inverted: base_min {base_min} > base_max {base_max}")]
    InvertedSpeedBand { base_min: f32, base_max: f32 },
    #[error("speed cap {cap} is below base_max {base_max}")]
    CapBelowBand { cap: f32, base_max: f32 },
}

/// Score-dependent word speed band (units per tick)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedCurve {
    pub base_min: f32,
    pub base_max: f32,
    /// Speed added per point of score
    pub factor: f32,
    /// Absolute ceiling for both bounds
    pub cap: f32,
}

impl Default for SpeedCurve {
    fn default() -> Self {
        Self {
            base_min: 1.5,
            base_max: 3.0,
            factor: 0.009,
            cap: 8.0,
        }
    }
}

/// Word spawn policy and geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordSpawn {
    /// Live-object ceiling at score 0
    pub base_max_objects: u32,
    /// Extra objects allowed per `score_step` points
    pub objects_per_step: u32,
    pub score_step: u64,
    pub absolute_max_objects: u32,
    /// Per-tick spawn probability when the screen is empty
    pub base_probability: f64,
    /// Second opening word arrives after this delay plus jitter
    pub initial_delay_ms: f64,
    pub initial_jitter_ms: f64,
    /// Vertical spawn position (negative = above the visible area)
    pub start_y: f32,
    pub min_width: f32,
    pub width_per_char: f32,
    pub width_padding: f32,
}

impl Default for WordSpawn {
    fn default() -> Self {
        Self {
            base_max_objects: 2,
            objects_per_step: 1,
            score_step: 50,
            absolute_max_objects: 8,
            base_probability: 0.1,
            initial_delay_ms: 1000.0,
            initial_jitter_ms: 1000.0,
            start_y: -100.0,
            min_width: 80.0,
            width_per_char: 10.0,
            width_padding: 20.0,
        }
    }
}

/// Power-up spawn policy and motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerupTuning {
    pub min_score: u64,
    pub bracket_size: u64,
    /// On-screen ceiling; spawning stops at this count
    pub max_active: usize,
    pub spawn_chance: f64,
    pub fall_speed: f32,
    pub size: f32,
    pub start_y: f32,
}

impl Default for PowerupTuning {
    fn default() -> Self {
        Self {
            min_score: 50,
            bracket_size: 100,
            max_active: 3,
            spawn_chance: 0.02,
            fall_speed: 1.5,
            size: 50.0,
            start_y: -60.0,
        }
    }
}

/// Complete gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Clock ===
    pub tick_interval_ms: f64,
    /// Ticks replayed per `advance` before the backlog is dropped
    pub max_catch_up_ticks: u32,

    // === Ledger ===
    pub max_lives: u8,
    pub life_gain_threshold: u64,
    pub min_wpm_duration_ms: f64,

    // === Effects ===
    pub slowdown_duration_ms: f64,
    pub slowdown_factor: f32,
    pub pause_duration_ms: f64,

    // === Play area ===
    /// Distance above the bottom edge where words count as missed
    pub miss_margin: f32,

    pub speed: SpeedCurve,
    pub spawn: WordSpawn,
    pub powerup: PowerupTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50.0,
            max_catch_up_ticks: 8,
            max_lives: 3,
            life_gain_threshold: 50,
            min_wpm_duration_ms: 3000.0,
            slowdown_duration_ms: 10_000.0,
            slowdown_factor: 0.5,
            pause_duration_ms: 5000.0,
            miss_margin: 30.0,
            speed: SpeedCurve::default(),
            spawn: WordSpawn::default(),
            powerup: PowerupTuning::default(),
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), TuningError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::NotPositive { field, value })
    }
}

fn unit(field: &'static str, value: f64) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::OutOfUnitRange { field, value })
    }
}

impl Tuning {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "wordfall_tuning";

    /// Environment variable naming a JSON tuning file (native only)
    pub const ENV_VAR: &'static str = "WORDFALL_TUNING";

    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("tick_interval_ms", self.tick_interval_ms)?;
        positive("max_catch_up_ticks", self.max_catch_up_ticks as f64)?;
        positive("max_lives", self.max_lives as f64)?;
        positive("slowdown_duration_ms", self.slowdown_duration_ms)?;
        positive("pause_duration_ms", self.pause_duration_ms)?;
        positive("slowdown_factor", self.slowdown_factor as f64)?;
        unit("slowdown_factor", self.slowdown_factor as f64)?;
        unit("spawn.base_probability", self.spawn.base_probability)?;
        unit("powerup.spawn_chance", self.powerup.spawn_chance)?;
        positive("spawn.absolute_max_objects", self.spawn.absolute_max_objects as f64)?;
        positive("powerup.bracket_size", self.powerup.bracket_size as f64)?;
        positive("powerup.fall_speed", self.powerup.fall_speed as f64)?;

        let speed = &self.speed;
        if speed.base_min > speed.base_max {
            return Err(TuningError::InvertedSpeedBand {
                base_min: speed.base_min,
                base_max: speed.base_max,
            });
        }
        if speed.cap < speed.base_max {
            return Err(TuningError::CapBelowBand {
                cap: speed.cap,
                base_max: speed.base_max,
            });
        }
        Ok(())
    }

    /// Load tuning from LocalStorage (WASM only), falling back to defaults
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning overrides from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Load tuning from the file named by `WORDFALL_TUNING`, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            return Self::default();
        };
        match std::fs::read_to_string(&path)
            .map_err(TuningError::from)
            .and_then(|json| Self::from_json(&json))
        {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path, e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "pause_duration_ms": 2500, "speed": { "cap": 6.0 } }"#)
            .unwrap();
        assert_eq!(tuning.pause_duration_ms, 2500.0);
        assert_eq!(tuning.speed.cap, 6.0);
        assert_eq!(tuning.speed.base_min, 1.5);
        assert_eq!(tuning.tick_interval_ms, 50.0);
    }

    #[test]
    fn rejects_zero_tick_interval() {
        let err = Tuning::from_json(r#"{ "tick_interval_ms": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::NotPositive {
                field: "tick_interval_ms",
                ..
            }
        ));
    }

    #[test]
    fn rejects_inverted_speed_band() {
        let mut tuning = Tuning::default();
        tuning.speed.base_min = 4.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::InvertedSpeedBand { .. })
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }
}
