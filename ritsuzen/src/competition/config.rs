//! Settings a competition is created with.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::errors::CompetitionError;
use super::models::CompetitionType;
use crate::constants::{DEFAULT_ROUNDS_COUNT, ROUNDS_OPTIONS};

/// Competition settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionSettings {
    /// Competition name
    pub name: String,

    /// Day the competition is held
    pub date: NaiveDate,

    /// Whether the grade-based handicap ranking is shown
    pub handicap_enabled: bool,

    /// Whether the first shooter rotates each round
    pub enable_rotation: bool,

    /// Number of rounds (one of [`ROUNDS_OPTIONS`])
    pub rounds_count: u32,

    /// Format tag
    pub competition_type: CompetitionType,
}

impl CompetitionSettings {
    /// Settings with the default rounds count, rotation on and handicap off
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            date,
            handicap_enabled: false,
            enable_rotation: true,
            rounds_count: DEFAULT_ROUNDS_COUNT,
            competition_type: CompetitionType::Twenty,
        }
    }

    pub fn with_handicap(mut self, enabled: bool) -> Self {
        self.handicap_enabled = enabled;
        self
    }

    pub fn with_rotation(mut self, enabled: bool) -> Self {
        self.enable_rotation = enabled;
        self
    }

    pub fn with_rounds(mut self, rounds_count: u32) -> Self {
        self.rounds_count = rounds_count;
        self
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), CompetitionError> {
        if self.name.trim().is_empty() {
            return Err(CompetitionError::InvalidSettings(
                "Competition name must not be empty".to_string(),
            ));
        }

        if !ROUNDS_OPTIONS.contains(&self.rounds_count) {
            return Err(CompetitionError::InvalidSettings(format!(
                "Rounds count must be one of {ROUNDS_OPTIONS:?}, got {}",
                self.rounds_count
            )));
        }

        Ok(())
    }
}
