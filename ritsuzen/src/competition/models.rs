//! Competition and participant data models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ROUNDS_COUNT;
use crate::scoring::{ParticipantId, ParticipantRecord};

/// Competition ID type
pub type CompetitionId = String;

/// A registered participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    /// Grade (段位), drives the handicap
    pub rank: u32,
    /// Display order; only the relative sequence matters
    pub order: u32,
    /// Group (lane) number starting at 1, `None` when ungrouped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<u32>,
}

/// Competition lifecycle state
///
/// Transitions only move forward: created → in progress → finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompetitionStatus {
    Created,
    InProgress,
    Finished,
}

impl std::fmt::Display for CompetitionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompetitionStatus::Created => write!(f, "created"),
            CompetitionStatus::InProgress => write!(f, "inProgress"),
            CompetitionStatus::Finished => write!(f, "finished"),
        }
    }
}

/// Competition format tag kept in stored and exported data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompetitionType {
    #[default]
    #[serde(rename = "20")]
    Twenty,
    #[serde(rename = "50")]
    Fifty,
}

impl CompetitionType {
    pub const fn as_str(self) -> &'static str {
        match self {
            CompetitionType::Twenty => "20",
            CompetitionType::Fifty => "50",
        }
    }
}

impl std::fmt::Display for CompetitionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_rounds_count() -> u32 {
    DEFAULT_ROUNDS_COUNT
}

fn default_rotation() -> bool {
    true
}

/// A single competition session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: CompetitionId,
    pub name: String,
    pub date: NaiveDate,
    #[serde(rename = "type", default)]
    pub competition_type: CompetitionType,
    pub status: CompetitionStatus,
    pub handicap_enabled: bool,
    /// Fixed for the lifetime of the competition
    #[serde(default = "default_rounds_count")]
    pub rounds_count: u32,
    #[serde(default = "default_rotation")]
    pub enable_rotation: bool,
    pub participants: Vec<Participant>,
    /// One record per participant, matched by `participant_id`
    pub records: Vec<ParticipantRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Competition {
    pub fn is_finished(&self) -> bool {
        self.status == CompetitionStatus::Finished
    }

    pub fn participant(&self, participant_id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == participant_id)
    }

    pub fn record(&self, participant_id: &str) -> Option<&ParticipantRecord> {
        self.records
            .iter()
            .find(|r| r.participant_id == participant_id)
    }

    /// Participants sorted by display order
    pub fn participants_in_order(&self) -> Vec<&Participant> {
        let mut participants: Vec<&Participant> = self.participants.iter().collect();
        participants.sort_by_key(|p| p.order);
        participants
    }

    /// Next display order value: one past the current maximum
    pub fn next_order(&self) -> u32 {
        self.participants
            .iter()
            .map(|p| p.order)
            .max()
            .map_or(1, |max| max + 1)
    }

    pub fn contains_round(&self, round_number: u32) -> bool {
        (1..=self.rounds_count).contains(&round_number)
    }
}
