//! The pet's four care stats and the arithmetic that governs them.
//!
//! Stats are held as integers in 0..=100. Decay is computed from the
//! integer snapshot and re-rounded, which means a single short interval can
//! round away entirely while a long absence shows up in full. That is the
//! contract the backend prompt logic expects, so keep it.

use serde::{Deserialize, Serialize};

/// Points lost per minute, per stat.
pub const HUNGER_DECAY_PER_MIN: f64 = 0.8;
pub const ENERGY_DECAY_PER_MIN: f64 = 0.6;
pub const HAPPINESS_DECAY_PER_MIN: f64 = 0.5;
pub const HEALTH_DECAY_PER_MIN: f64 = 0.3;

/// Round first, then clamp into 0..=100.
pub fn clamp_stat(value: f64) -> i32 {
    value.round().clamp(0.0, 100.0) as i32
}

/// Snapshot of the pet's condition. Serializes to the flat four-field form
/// the chat endpoint takes and the cache persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub hunger: i32,
    pub energy: i32,
    pub happiness: i32,
    pub health: i32,
}

impl Default for StatusRecord {
    fn default() -> Self {
        StatusRecord {
            hunger: 80,
            energy: 80,
            happiness: 80,
            health: 90,
        }
    }
}

impl StatusRecord {
    /// Decay every stat by `minutes` worth of loss, clamped to the valid
    /// range. Negative elapsed time (clock skew) is treated as zero.
    pub fn after_decay(&self, minutes: f64) -> StatusRecord {
        let minutes = minutes.max(0.0);
        StatusRecord {
            hunger: clamp_stat(self.hunger as f64 - HUNGER_DECAY_PER_MIN * minutes),
            energy: clamp_stat(self.energy as f64 - ENERGY_DECAY_PER_MIN * minutes),
            happiness: clamp_stat(self.happiness as f64 - HAPPINESS_DECAY_PER_MIN * minutes),
            health: clamp_stat(self.health as f64 - HEALTH_DECAY_PER_MIN * minutes),
        }
    }

    pub fn average(&self) -> f64 {
        (self.hunger + self.energy + self.happiness + self.health) as f64 / 4.0
    }

    pub fn condition(&self) -> Condition {
        Condition::for_average(self.average())
    }

    /// Stat name and value pairs in display order.
    pub fn entries(&self) -> [(&'static str, i32); 4] {
        [
            ("hunger", self.hunger),
            ("energy", self.energy),
            ("happiness", self.happiness),
            ("health", self.health),
        ]
    }
}

/// Band a single stat falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Critical,
    Low,
    Medium,
    High,
}

impl StatusLevel {
    pub fn for_value(value: i32) -> StatusLevel {
        if value < 20 {
            StatusLevel::Critical
        } else if value < 40 {
            StatusLevel::Low
        } else if value < 70 {
            StatusLevel::Medium
        } else {
            StatusLevel::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusLevel::Critical => "critical",
            StatusLevel::Low => "low",
            StatusLevel::Medium => "medium",
            StatusLevel::High => "high",
        }
    }
}

/// Overall condition derived from the mean of the four stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl Condition {
    pub fn for_average(average: f64) -> Condition {
        if average >= 80.0 {
            Condition::Excellent
        } else if average >= 60.0 {
            Condition::Good
        } else if average >= 40.0 {
            Condition::Fair
        } else if average >= 20.0 {
            Condition::Poor
        } else {
            Condition::Critical
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Condition::Excellent => "excellent",
            Condition::Good => "good",
            Condition::Fair => "fair",
            Condition::Poor => "poor",
            Condition::Critical => "critical",
        }
    }
}
