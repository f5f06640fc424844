//! Competition manager: the state machine plus write-through persistence.

use log::{error, info, warn};

use super::{
    config::CompetitionSettings,
    errors::{CompetitionError, CompetitionResult},
    models::Competition,
    state_machine::{CompetitionAction, CompetitionState},
};
use crate::grouping::{GroupDirection, GroupInfo, get_group_info};
use crate::roster::ParticipantMaster;
use crate::scoring::{ParticipantId, ShotOutcome};
use crate::shooting::{self, GroupOrder, NextShot};
use crate::storage::{StorageManager, StoragePort};

/// Competition manager
///
/// Owns the session state and the storage it is persisted to. Accepted
/// actions replace the state and are written through; rejected actions
/// leave both untouched.
#[derive(Debug)]
pub struct CompetitionManager<S: StoragePort> {
    storage: StorageManager<S>,
    state: CompetitionState,
}

impl<S: StoragePort> CompetitionManager<S> {
    /// Create a manager resuming the stored current competition
    ///
    /// # Arguments
    ///
    /// * `storage` - Storage manager the session is persisted through
    pub fn new(storage: StorageManager<S>) -> Self {
        let competition = storage.load_current_competition();
        if let Some(competition) = &competition {
            info!(
                "Resumed competition {} ({}, {})",
                competition.name, competition.id, competition.status
            );
        }

        Self {
            storage,
            state: CompetitionState::with_competition(competition),
        }
    }

    pub fn state(&self) -> &CompetitionState {
        &self.state
    }

    pub fn competition(&self) -> Option<&Competition> {
        self.state.competition.as_ref()
    }

    pub fn storage(&self) -> &StorageManager<S> {
        &self.storage
    }

    pub fn current_round(&self) -> u32 {
        self.state.current_round
    }

    /// Apply an action and persist the result.
    ///
    /// Persistence failures are logged and do not undo the action. A
    /// confirmed finish also stores the competition in the history.
    ///
    /// # Errors
    ///
    /// Any [`CompetitionError`] returned by the transition; the state is
    /// unchanged in that case.
    pub fn dispatch(&mut self, action: CompetitionAction) -> CompetitionResult<&CompetitionState> {
        let name = action.name();
        let snapshot = matches!(action, CompetitionAction::Finish { confirmed: true });

        let next = match self.state.apply(action) {
            Ok(next) => next,
            Err(e) => {
                warn!("Rejected {name}: {e}");
                return Err(e);
            }
        };

        // Round selection is view state and is not persisted
        let changed = next.competition != self.state.competition;
        self.state = next;

        if changed {
            self.persist(snapshot);
        }
        Ok(&self.state)
    }

    fn persist(&self, snapshot: bool) {
        let competition = self.state.competition.as_ref();
        if let Err(e) = self.storage.save_current_competition(competition) {
            error!("Failed to save current competition: {e}");
        }

        if let (true, Some(competition)) = (snapshot, competition) {
            match self.storage.save_to_history(competition) {
                Ok(()) => info!("Saved competition {} to history", competition.name),
                Err(e) => error!("Failed to save competition to history: {e}"),
            }
        }
    }

    pub fn create_competition(&mut self, settings: CompetitionSettings) -> CompetitionResult<&Competition> {
        self.dispatch(CompetitionAction::Create(settings))?;
        self.competition().ok_or(CompetitionError::NoActiveCompetition)
    }

    /// Register a participant and return the new participant's id
    pub fn add_participant(&mut self, name: &str, rank: u32) -> CompetitionResult<ParticipantId> {
        self.dispatch(CompetitionAction::AddParticipant {
            name: name.to_string(),
            rank,
        })?;
        self.last_added_participant()
    }

    /// Register a participant from an active roster entry and count the use
    ///
    /// # Errors
    ///
    /// * `CompetitionError::MasterNotFound` - No active master with this id
    pub fn add_participant_from_master(&mut self, master_id: &str) -> CompetitionResult<ParticipantId> {
        let master: ParticipantMaster = self
            .storage
            .masters()
            .into_iter()
            .find(|m| m.id == master_id)
            .ok_or_else(|| CompetitionError::MasterNotFound(master_id.to_string()))?;

        let participant_id = self.add_participant(&master.name, master.rank)?;
        if let Err(e) = self.storage.increment_master_usage(&master.id) {
            error!("Failed to record usage of master {}: {e}", master.id);
        }
        Ok(participant_id)
    }

    fn last_added_participant(&self) -> CompetitionResult<ParticipantId> {
        self.competition()
            .and_then(|c| c.participants.iter().max_by_key(|p| p.order))
            .map(|p| p.id.clone())
            .ok_or(CompetitionError::NoActiveCompetition)
    }

    pub fn remove_participant(&mut self, participant_id: &str) -> CompetitionResult<()> {
        self.dispatch(CompetitionAction::RemoveParticipant(participant_id.to_string()))
            .map(|_| ())
    }

    pub fn move_participant_up(&mut self, participant_id: &str) -> CompetitionResult<()> {
        self.dispatch(CompetitionAction::MoveParticipantUp(participant_id.to_string()))
            .map(|_| ())
    }

    pub fn move_participant_down(&mut self, participant_id: &str) -> CompetitionResult<()> {
        self.dispatch(CompetitionAction::MoveParticipantDown(participant_id.to_string()))
            .map(|_| ())
    }

    pub fn apply_auto_grouping(&mut self, group_size: usize) -> CompetitionResult<()> {
        self.dispatch(CompetitionAction::ApplyAutoGrouping { group_size })
            .map(|_| ())
    }

    pub fn clear_grouping(&mut self) -> CompetitionResult<()> {
        self.dispatch(CompetitionAction::ClearGrouping).map(|_| ())
    }

    pub fn move_participant_to_group(
        &mut self,
        participant_id: &str,
        direction: GroupDirection,
    ) -> CompetitionResult<()> {
        self.dispatch(CompetitionAction::MoveParticipantToGroup {
            participant_id: participant_id.to_string(),
            direction,
        })
        .map(|_| ())
    }

    pub fn update_shot(
        &mut self,
        participant_id: &str,
        round_number: u32,
        shot_index: usize,
        outcome: ShotOutcome,
    ) -> CompetitionResult<()> {
        self.dispatch(CompetitionAction::UpdateShot {
            participant_id: participant_id.to_string(),
            round_number,
            shot_index,
            outcome,
        })
        .map(|_| ())
    }

    /// Advance one shot through its input cycle and return the new outcome
    pub fn cycle_shot(
        &mut self,
        participant_id: &str,
        round_number: u32,
        shot_index: usize,
    ) -> CompetitionResult<ShotOutcome> {
        self.dispatch(CompetitionAction::CycleShot {
            participant_id: participant_id.to_string(),
            round_number,
            shot_index,
        })?;
        self.competition()
            .and_then(|c| c.record(participant_id))
            .and_then(|r| r.shot(round_number, shot_index))
            .ok_or_else(|| CompetitionError::RecordNotFound(participant_id.to_string()))
    }

    pub fn select_round(&mut self, round_number: u32) -> CompetitionResult<()> {
        self.dispatch(CompetitionAction::SelectRound(round_number))
            .map(|_| ())
    }

    pub fn finish(&mut self, confirmed: bool) -> CompetitionResult<()> {
        self.dispatch(CompetitionAction::Finish { confirmed }).map(|_| ())
    }

    pub fn reset(&mut self, confirmed: bool) -> CompetitionResult<()> {
        self.dispatch(CompetitionAction::Reset { confirmed }).map(|_| ())
    }

    /// Next open shot of the selected round
    pub fn next_shot(&self) -> Option<NextShot> {
        let competition = self.competition()?;
        shooting::find_next_shot(
            &competition.participants,
            &competition.records,
            self.state.current_round,
            competition.enable_rotation,
        )
    }

    /// First open shot of the whole competition, with its round
    pub fn next_pending_shot(&self) -> Option<(u32, NextShot)> {
        let competition = self.competition()?;
        shooting::find_next_pending(
            &competition.participants,
            &competition.records,
            competition.rounds_count,
            competition.enable_rotation,
        )
    }

    pub fn shooting_order(&self, round_number: u32) -> Vec<GroupOrder<'_>> {
        self.competition()
            .map(|c| shooting::group_shooting_orders(&c.participants, round_number, c.enable_rotation))
            .unwrap_or_default()
    }

    pub fn group_info(&self) -> GroupInfo {
        self.competition()
            .map(|c| get_group_info(&c.participants))
            .unwrap_or_default()
    }
}
