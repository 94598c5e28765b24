//! Player profile rules
//!
//! Gaming names are lower-case `[a-z0-9_]`, 3 to 15 characters after
//! sanitizing. Renames are limited per user per UTC day.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_NAME_LEN: usize = 3;
pub const MAX_NAME_LEN: usize = 15;
/// Renames allowed per user per day
pub const DAILY_NAME_CHANGES: u32 = 3;

const MS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("name required")]
    Empty,
    #[error("min {MIN_NAME_LEN} chars (a-z, 0-9, _)")]
    TooShort,
    #[error("name is already {0}")]
    Unchanged(String),
    #[error("no name changes left today ({DAILY_NAME_CHANGES} per day)")]
    LimitReached,
}

/// Sanitize a requested gaming name: lower-case, drop anything outside
/// `[a-z0-9_]`, truncate to [`MAX_NAME_LEN`].
pub fn validate_gaming_name(name: &str) -> Result<String, NameError> {
    if name.trim().is_empty() {
        return Err(NameError::Empty);
    }
    let sanitized: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect();
    if sanitized.len() < MIN_NAME_LEN {
        return Err(NameError::TooShort);
    }
    let sanitized: String = sanitized.chars().take(MAX_NAME_LEN).collect();
    if sanitized != name {
        log::warn!("Name sanitized: '{}' -> '{}'", name, sanitized);
    }
    Ok(sanitized)
}

/// Days since the Unix epoch (UTC) for a millisecond timestamp
pub fn day_index(timestamp_ms: f64) -> i64 {
    (timestamp_ms / MS_PER_DAY).floor() as i64
}

/// Per-user, per-day rename counter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameChangeBudget {
    used: HashMap<String, u32>,
}

impl NameChangeBudget {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "wordfall_name_changes";

    pub fn new() -> Self {
        Self::default()
    }

    fn key(user: &str, day: i64) -> String {
        format!("{user}_{day}")
    }

    pub fn used(&self, user: &str, day: i64) -> u32 {
        self.used.get(&Self::key(user, day)).copied().unwrap_or(0)
    }

    pub fn remaining(&self, user: &str, day: i64) -> u32 {
        DAILY_NAME_CHANGES.saturating_sub(self.used(user, day))
    }

    pub fn can_change(&self, user: &str, day: i64) -> bool {
        self.remaining(user, day) > 0
    }

    /// Count one rename; returns the renames left today
    pub fn record(&mut self, user: &str, day: i64) -> u32 {
        let count = self.used.entry(Self::key(user, day)).or_insert(0);
        *count += 1;
        let remaining = self.remaining(user, day);
        log::info!("Name changes used today: {}. Remaining: {}.", self.used(user, day), remaining);
        remaining
    }

    /// Drop counters for days before `day`
    pub fn prune(&mut self, day: i64) {
        self.used.retain(|key, _| {
            key.rsplit_once('_')
                .and_then(|(_, d)| d.parse::<i64>().ok())
                .is_some_and(|d| d >= day)
        });
    }

    /// Stored form, shared by LocalStorage load and save
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let Some(json) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten())
        else {
            return Self::new();
        };
        Self::from_json(&json).unwrap_or_else(|e| {
            log::warn!("Discarding unreadable name-change budget: {}", e);
            Self::new()
        })
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        else {
            log::warn!("LocalStorage unavailable, name changes not persisted");
            return;
        };
        match self.to_json() {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("LocalStorage write refused, name changes not persisted");
                }
            }
            Err(e) => log::warn!("Failed to serialize name-change budget: {}", e),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// A player's gaming name plus the rename policy around it
#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub user_id: String,
    name: Option<String>,
    budget: NameChangeBudget,
}

impl Profile {
    pub fn new(user_id: impl Into<String>, budget: NameChangeBudget) -> Self {
        Self {
            user_id: user_id.into(),
            name: None,
            budget,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn budget(&self) -> &NameChangeBudget {
        &self.budget
    }

    /// Set the name for the first time; does not use the rename budget
    pub fn claim_name(&mut self, requested: &str) -> Result<&str, NameError> {
        let name = validate_gaming_name(requested)?;
        Ok(self.name.insert(name).as_str())
    }

    /// Change an existing name, charged against today's budget
    pub fn rename(&mut self, requested: &str, now_ms: f64) -> Result<&str, NameError> {
        let name = validate_gaming_name(requested)?;
        if self.name.as_deref() == Some(name.as_str()) {
            return Err(NameError::Unchanged(name));
        }
        let day = day_index(now_ms);
        if !self.budget.can_change(&self.user_id, day) {
            return Err(NameError::LimitReached);
        }
        self.budget.record(&self.user_id, day);
        self.budget.save();
        Ok(self.name.insert(name).as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_and_truncates() {
        assert_eq!(validate_gaming_name("Neo_Hacker!"), Ok("neo_hacker".to_string()));
        assert_eq!(
            validate_gaming_name("a_very_long_gaming_name_indeed"),
            Ok("a_very_long_gam".to_string())
        );
        assert_eq!(validate_gaming_name("Zoë-42"), Ok("zo42".to_string()));
    }

    #[test]
    fn rejects_blank_and_short() {
        assert_eq!(validate_gaming_name("   "), Err(NameError::Empty));
        assert_eq!(validate_gaming_name("a!b"), Err(NameError::TooShort));
    }

    #[test]
    fn three_renames_per_day() {
        let mut profile = Profile::new("user-1", NameChangeBudget::new());
        profile.claim_name("first").unwrap();
        let day = 20_000.0 * MS_PER_DAY;

        for name in ["second", "third", "fourth"] {
            assert!(profile.rename(name, day).is_ok());
        }
        assert_eq!(profile.rename("fifth", day + 1000.0), Err(NameError::LimitReached));
        assert_eq!(profile.name(), Some("fourth"));

        // Next day resets the budget
        assert!(profile.rename("fifth", day + MS_PER_DAY).is_ok());
    }

    #[test]
    fn unchanged_name_costs_nothing() {
        let mut profile = Profile::new("user-1", NameChangeBudget::new());
        profile.claim_name("typist").unwrap();
        assert_eq!(
            profile.rename("TYPIST", 0.0),
            Err(NameError::Unchanged("typist".into()))
        );
        assert_eq!(profile.budget().used("user-1", 0), 0);
    }

    #[test]
    fn prune_drops_old_days() {
        let mut budget = NameChangeBudget::new();
        budget.record("user_a", 10);
        budget.record("user_a", 11);
        budget.prune(11);
        assert_eq!(budget.used("user_a", 10), 0);
        assert_eq!(budget.used("user_a", 11), 1);
    }

    #[test]
    fn budget_survives_storage_round_trip() {
        let mut budget = NameChangeBudget::new();
        budget.record("user_a", 12);
        budget.record("user_a", 12);
        let stored = budget.to_json().unwrap();
        let restored = NameChangeBudget::from_json(&stored).unwrap();
        assert_eq!(restored.used("user_a", 12), 2);
        assert_eq!(restored.remaining("user_a", 12), 1);
        assert!(NameChangeBudget::from_json("not json").is_err());
    }
}
