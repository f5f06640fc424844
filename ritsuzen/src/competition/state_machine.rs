//! Competition state machine.
//!
//! Every action is applied to a copy of the current state and the copy is
//! returned only if the action succeeds, so a rejected action never leaves a
//! partially updated competition behind.

use chrono::Utc;
use log::debug;

use super::config::CompetitionSettings;
use super::errors::{CompetitionError, CompetitionResult};
use super::models::{Competition, CompetitionStatus, Participant};
use crate::constants::{MAX_RANK, MIN_RANK, SHOTS_PER_ROUND};
use crate::grouping::{self, GroupDirection};
use crate::ids::{IdPrefix, generate_id};
use crate::scoring::{
    ParticipantId, ShotOutcome, initialize_record, rank_records, recompute_record,
};

/// Actions accepted by the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum CompetitionAction {
    Create(CompetitionSettings),
    AddParticipant {
        name: String,
        rank: u32,
    },
    RemoveParticipant(ParticipantId),
    MoveParticipantUp(ParticipantId),
    MoveParticipantDown(ParticipantId),
    ApplyAutoGrouping {
        group_size: usize,
    },
    ClearGrouping,
    MoveParticipantToGroup {
        participant_id: ParticipantId,
        direction: GroupDirection,
    },
    UpdateShot {
        participant_id: ParticipantId,
        round_number: u32,
        shot_index: usize,
        outcome: ShotOutcome,
    },
    /// Advance one shot through not taken → miss → hit → not taken
    CycleShot {
        participant_id: ParticipantId,
        round_number: u32,
        shot_index: usize,
    },
    SelectRound(u32),
    Finish {
        confirmed: bool,
    },
    Reset {
        confirmed: bool,
    },
}

impl CompetitionAction {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::AddParticipant { .. } => "add_participant",
            Self::RemoveParticipant(_) => "remove_participant",
            Self::MoveParticipantUp(_) => "move_participant_up",
            Self::MoveParticipantDown(_) => "move_participant_down",
            Self::ApplyAutoGrouping { .. } => "apply_auto_grouping",
            Self::ClearGrouping => "clear_grouping",
            Self::MoveParticipantToGroup { .. } => "move_participant_to_group",
            Self::UpdateShot { .. } => "update_shot",
            Self::CycleShot { .. } => "cycle_shot",
            Self::SelectRound(_) => "select_round",
            Self::Finish { .. } => "finish",
            Self::Reset { .. } => "reset",
        }
    }
}

/// Session state: the active competition plus the round being entered
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitionState {
    pub competition: Option<Competition>,
    pub current_round: u32,
}

impl Default for CompetitionState {
    fn default() -> Self {
        Self {
            competition: None,
            current_round: 1,
        }
    }
}

enum Reorder {
    Up,
    Down,
}

impl CompetitionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a competition restored from storage
    #[must_use]
    pub fn with_competition(competition: Option<Competition>) -> Self {
        Self {
            competition,
            current_round: 1,
        }
    }

    /// Apply an action, returning the resulting state.
    ///
    /// `self` is never modified; on error the caller keeps the old state.
    pub fn apply(&self, action: CompetitionAction) -> CompetitionResult<Self> {
        debug!("Applying competition action: {}", action.name());
        let mut next = self.clone();

        match action {
            CompetitionAction::Create(settings) => next.create(settings)?,
            CompetitionAction::Reset { confirmed } => {
                if confirmed {
                    return Ok(Self::default());
                }
            }
            CompetitionAction::Finish { confirmed } => {
                if confirmed {
                    next.finish()?;
                }
            }
            CompetitionAction::SelectRound(round) => {
                let competition = next.active()?;
                if !competition.contains_round(round) {
                    return Err(CompetitionError::RoundOutOfRange {
                        round,
                        rounds_count: competition.rounds_count,
                    });
                }
                next.current_round = round;
            }
            action => {
                let competition = next.editable()?;
                apply_edit(competition, action)?;
                competition.updated_at = Utc::now();
            }
        }

        Ok(next)
    }

    fn active(&self) -> CompetitionResult<&Competition> {
        self.competition
            .as_ref()
            .ok_or(CompetitionError::NoActiveCompetition)
    }

    fn editable(&mut self) -> CompetitionResult<&mut Competition> {
        let competition = self
            .competition
            .as_mut()
            .ok_or(CompetitionError::NoActiveCompetition)?;
        if competition.is_finished() {
            return Err(CompetitionError::Finished);
        }
        Ok(competition)
    }

    fn create(&mut self, settings: CompetitionSettings) -> CompetitionResult<()> {
        if let Some(existing) = &self.competition {
            if !existing.is_finished() {
                return Err(CompetitionError::CompetitionAlreadyActive(
                    existing.name.clone(),
                ));
            }
        }
        settings.validate()?;

        let now = Utc::now();
        self.competition = Some(Competition {
            id: generate_id(IdPrefix::Competition),
            name: settings.name.trim().to_string(),
            date: settings.date,
            competition_type: settings.competition_type,
            status: CompetitionStatus::Created,
            handicap_enabled: settings.handicap_enabled,
            rounds_count: settings.rounds_count,
            enable_rotation: settings.enable_rotation,
            participants: Vec::new(),
            records: Vec::new(),
            created_at: now,
            updated_at: now,
        });
        self.current_round = 1;
        Ok(())
    }

    fn finish(&mut self) -> CompetitionResult<()> {
        let competition = self
            .competition
            .as_mut()
            .ok_or(CompetitionError::NoActiveCompetition)?;
        if competition.is_finished() {
            return Err(CompetitionError::InvalidTransition {
                from: competition.status,
                to: CompetitionStatus::Finished,
            });
        }
        competition.status = CompetitionStatus::Finished;
        competition.updated_at = Utc::now();
        Ok(())
    }
}

/// Mutations of an editable (not finished) competition
fn apply_edit(competition: &mut Competition, action: CompetitionAction) -> CompetitionResult<()> {
    match action {
        CompetitionAction::AddParticipant { name, rank } => {
            add_participant(competition, name, rank)
        }
        CompetitionAction::RemoveParticipant(id) => remove_participant(competition, &id),
        CompetitionAction::MoveParticipantUp(id) => reorder(competition, &id, Reorder::Up),
        CompetitionAction::MoveParticipantDown(id) => reorder(competition, &id, Reorder::Down),
        CompetitionAction::ApplyAutoGrouping { group_size } => {
            if group_size == 0 {
                return Err(CompetitionError::InvalidGroupSize(group_size));
            }
            competition.participants =
                grouping::apply_auto_grouping(&competition.participants, group_size);
            Ok(())
        }
        CompetitionAction::ClearGrouping => {
            competition.participants = grouping::clear_grouping(&competition.participants);
            Ok(())
        }
        CompetitionAction::MoveParticipantToGroup {
            participant_id,
            direction,
        } => {
            ensure_participant(competition, &participant_id)?;
            competition.participants = grouping::move_participant_to_group(
                &competition.participants,
                &participant_id,
                direction,
            );
            Ok(())
        }
        CompetitionAction::UpdateShot {
            participant_id,
            round_number,
            shot_index,
            outcome,
        } => set_shot(competition, &participant_id, round_number, shot_index, |_| {
            outcome
        }),
        CompetitionAction::CycleShot {
            participant_id,
            round_number,
            shot_index,
        } => set_shot(
            competition,
            &participant_id,
            round_number,
            shot_index,
            ShotOutcome::next,
        ),
        // Lifecycle actions are handled by `CompetitionState::apply`
        CompetitionAction::Create(_)
        | CompetitionAction::SelectRound(_)
        | CompetitionAction::Finish { .. }
        | CompetitionAction::Reset { .. } => Ok(()),
    }
}

fn ensure_participant(competition: &Competition, participant_id: &str) -> CompetitionResult<()> {
    competition
        .participant(participant_id)
        .map(|_| ())
        .ok_or_else(|| CompetitionError::ParticipantNotFound(participant_id.to_string()))
}

fn add_participant(competition: &mut Competition, name: String, rank: u32) -> CompetitionResult<()> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(CompetitionError::InvalidParticipant(
            "name must not be empty".to_string(),
        ));
    }
    if !(MIN_RANK..=MAX_RANK).contains(&rank) {
        return Err(CompetitionError::InvalidParticipant(format!(
            "rank must be between {MIN_RANK} and {MAX_RANK}, got {rank}"
        )));
    }

    let participant = Participant {
        id: generate_id(IdPrefix::Participant),
        name,
        rank,
        order: competition.next_order(),
        group: None,
    };
    let record = initialize_record(&participant, competition.rounds_count);

    competition.participants.push(participant);
    competition.records.push(record);
    rank_records(&mut competition.records);
    Ok(())
}

fn remove_participant(competition: &mut Competition, participant_id: &str) -> CompetitionResult<()> {
    ensure_participant(competition, participant_id)?;
    competition.participants.retain(|p| p.id != participant_id);
    competition
        .records
        .retain(|r| r.participant_id != participant_id);
    rank_records(&mut competition.records);
    Ok(())
}

/// Swap with the adjacent participant and renumber everyone from 1.
/// Moving past either end leaves the order untouched.
fn reorder(competition: &mut Competition, participant_id: &str, direction: Reorder) -> CompetitionResult<()> {
    let mut sorted = grouping::sort_participants_by_order(&competition.participants);
    let index = sorted
        .iter()
        .position(|p| p.id == participant_id)
        .ok_or_else(|| CompetitionError::ParticipantNotFound(participant_id.to_string()))?;

    let swap_with = match direction {
        Reorder::Up if index > 0 => index - 1,
        Reorder::Down if index + 1 < sorted.len() => index + 1,
        _ => return Ok(()),
    };
    sorted.swap(index, swap_with);

    for (position, participant) in sorted.iter_mut().enumerate() {
        participant.order = position as u32 + 1;
    }
    competition.participants = sorted;
    Ok(())
}

fn set_shot<F>(
    competition: &mut Competition,
    participant_id: &str,
    round_number: u32,
    shot_index: usize,
    update: F,
) -> CompetitionResult<()>
where
    F: FnOnce(ShotOutcome) -> ShotOutcome,
{
    if shot_index >= SHOTS_PER_ROUND {
        return Err(CompetitionError::ShotIndexOutOfRange(shot_index));
    }
    if !competition.contains_round(round_number) {
        return Err(CompetitionError::RoundOutOfRange {
            round: round_number,
            rounds_count: competition.rounds_count,
        });
    }
    ensure_participant(competition, participant_id)?;

    let record = competition
        .records
        .iter_mut()
        .find(|r| r.participant_id == participant_id)
        .ok_or_else(|| CompetitionError::RecordNotFound(participant_id.to_string()))?;
    let round = record
        .round_mut(round_number)
        .ok_or(CompetitionError::RoundOutOfRange {
            round: round_number,
            rounds_count: competition.rounds_count,
        })?;

    round.shots[shot_index] = update(round.shots[shot_index]);
    *record = recompute_record(record);
    rank_records(&mut competition.records);

    if competition.status == CompetitionStatus::Created {
        competition.status = CompetitionStatus::InProgress;
    }
    Ok(())
}
