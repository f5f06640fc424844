//! Shot, round and per-participant record models.

use serde::{Deserialize, Serialize};

use crate::constants::SHOTS_PER_ROUND;

/// Participant ID type
pub type ParticipantId = String;

/// Outcome of a single shot (射)
///
/// Stored as `{"hit": true | false | null}` so persisted blobs keep the
/// nullable-boolean shape used by earlier data files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ShotRepr", into = "ShotRepr")]
pub enum ShotOutcome {
    /// Not fired yet
    #[default]
    NotTaken,
    /// Fired and missed
    Miss,
    /// Fired and hit
    Hit,
}

impl ShotOutcome {
    /// Next outcome in the input cycle: not taken → miss → hit → not taken.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            ShotOutcome::NotTaken => ShotOutcome::Miss,
            ShotOutcome::Miss => ShotOutcome::Hit,
            ShotOutcome::Hit => ShotOutcome::NotTaken,
        }
    }

    pub const fn is_hit(self) -> bool {
        matches!(self, ShotOutcome::Hit)
    }

    pub const fn is_taken(self) -> bool {
        !matches!(self, ShotOutcome::NotTaken)
    }

    /// Glyph used by score sheets.
    pub const fn symbol(self) -> char {
        match self {
            ShotOutcome::Hit => '○',
            ShotOutcome::Miss => '×',
            ShotOutcome::NotTaken => '-',
        }
    }
}

impl std::fmt::Display for ShotOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShotOutcome::Hit => write!(f, "hit"),
            ShotOutcome::Miss => write!(f, "miss"),
            ShotOutcome::NotTaken => write!(f, "not taken"),
        }
    }
}

impl std::str::FromStr for ShotOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hit" | "o" | "○" => Ok(ShotOutcome::Hit),
            "miss" | "x" | "×" => Ok(ShotOutcome::Miss),
            "clear" | "none" | "-" => Ok(ShotOutcome::NotTaken),
            other => Err(format!("unknown shot outcome: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct ShotRepr {
    #[serde(default)]
    hit: Option<bool>,
}

impl From<ShotRepr> for ShotOutcome {
    fn from(value: ShotRepr) -> Self {
        match value.hit {
            Some(true) => ShotOutcome::Hit,
            Some(false) => ShotOutcome::Miss,
            None => ShotOutcome::NotTaken,
        }
    }
}

impl From<ShotOutcome> for ShotRepr {
    fn from(value: ShotOutcome) -> Self {
        let hit = match value {
            ShotOutcome::Hit => Some(true),
            ShotOutcome::Miss => Some(false),
            ShotOutcome::NotTaken => None,
        };
        Self { hit }
    }
}

/// One round (立) of four shots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    /// Round number (1-indexed)
    pub round_number: u32,
    /// Shots in firing order
    pub shots: [ShotOutcome; SHOTS_PER_ROUND],
    /// Hits in this round
    pub hits: u32,
}

impl Round {
    /// Create a round with every shot not yet taken
    pub fn new(round_number: u32) -> Self {
        Self {
            round_number,
            shots: [ShotOutcome::NotTaken; SHOTS_PER_ROUND],
            hits: 0,
        }
    }

    /// Shots whose outcome has been recorded
    pub fn shots_taken(&self) -> u32 {
        self.shots.iter().filter(|shot| shot.is_taken()).count() as u32
    }

    pub fn is_complete(&self) -> bool {
        self.shots.iter().all(|shot| shot.is_taken())
    }

    /// All four shots hit (皆中)
    pub fn is_perfect(&self) -> bool {
        self.shots.iter().all(|shot| shot.is_hit())
    }
}

/// Scores of one participant across the whole competition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRecord {
    pub participant_id: ParticipantId,
    pub rounds: Vec<Round>,
    pub total_hits: u32,
    /// Hits divided by shots actually taken (0.0 before the first shot)
    pub hit_rate: f64,
    /// Dense rank by total hits (0 until first ranked)
    pub rank: u32,
    /// Fixed at creation from the participant's grade
    pub handicap: i32,
    pub adjusted_score: i32,
    /// Dense rank by adjusted score (0 until first ranked)
    pub rank_with_handicap: u32,
}

impl ParticipantRecord {
    /// Shots with a recorded outcome across all rounds
    pub fn shots_taken(&self) -> u32 {
        self.rounds.iter().map(Round::shots_taken).sum()
    }

    /// Get a round by its 1-indexed number
    pub fn round(&self, round_number: u32) -> Option<&Round> {
        self.rounds.iter().find(|r| r.round_number == round_number)
    }

    pub fn round_mut(&mut self, round_number: u32) -> Option<&mut Round> {
        self.rounds.iter_mut().find(|r| r.round_number == round_number)
    }

    /// Outcome of a single shot slot, if it exists
    pub fn shot(&self, round_number: u32, shot_index: usize) -> Option<ShotOutcome> {
        self.round(round_number)
            .and_then(|round| round.shots.get(shot_index).copied())
    }
}
