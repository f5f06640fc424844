//! Shooting order and rotation engine.
//!
//! For a given round, each group fires in its own sequence. With rotation
//! enabled the first shooter of round N is the member at index
//! `(N - 1) mod group_size`, the rest following in display order and
//! wrapping around. Input proceeds slot by slot: everyone in a group takes
//! shot 1 before anyone takes shot 2.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::competition::models::Participant;
use crate::constants::SHOTS_PER_ROUND;
use crate::grouping::group_participants;
use crate::scoring::{ParticipantId, ParticipantRecord};

/// The next shot slot awaiting input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextShot {
    pub participant_id: ParticipantId,
    /// 0-based slot within the round
    pub shot_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<u32>,
}

/// Firing order of one group for a round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOrder<'a> {
    pub group_number: u32,
    pub order: Vec<&'a Participant>,
}

/// Firing order within one group for `round_number` (1-indexed).
pub fn order_for_group<'a>(
    group: &[&'a Participant],
    round_number: u32,
    rotation_enabled: bool,
) -> Vec<&'a Participant> {
    if !rotation_enabled || group.is_empty() {
        return group.to_vec();
    }

    let start = (round_number.saturating_sub(1) as usize) % group.len();
    group[start..].iter().chain(&group[..start]).copied().collect()
}

/// Firing order of every group concatenated in group-number order.
pub fn order_for_round(
    participants: &[Participant],
    round_number: u32,
    rotation_enabled: bool,
) -> Vec<&Participant> {
    group_participants(participants)
        .iter()
        .flat_map(|group| order_for_group(group, round_number, rotation_enabled))
        .collect()
}

/// Per-group firing orders, for lane-by-lane display.
pub fn group_shooting_orders(
    participants: &[Participant],
    round_number: u32,
    rotation_enabled: bool,
) -> Vec<GroupOrder<'_>> {
    group_participants(participants)
        .iter()
        .enumerate()
        .map(|(index, group)| GroupOrder {
            group_number: group
                .first()
                .and_then(|p| p.group)
                .unwrap_or(index as u32 + 1),
            order: order_for_group(group, round_number, rotation_enabled),
        })
        .collect()
}

/// Locate the first not-taken shot of `round_number`.
///
/// Groups are scanned in ascending order; within a group the outer loop is
/// the shot slot and the inner loop is the rotated firing order.
/// Participants without a record are skipped. Returns `None` once every
/// shot of the round has an outcome.
pub fn find_next_shot(
    participants: &[Participant],
    records: &[ParticipantRecord],
    round_number: u32,
    rotation_enabled: bool,
) -> Option<NextShot> {
    let by_id: HashMap<&str, &ParticipantRecord> = records
        .iter()
        .map(|r| (r.participant_id.as_str(), r))
        .collect();

    for group in group_participants(participants) {
        let order = order_for_group(&group, round_number, rotation_enabled);

        for shot_index in 0..SHOTS_PER_ROUND {
            for participant in &order {
                let Some(record) = by_id.get(participant.id.as_str()) else {
                    continue;
                };
                let Some(shot) = record.shot(round_number, shot_index) else {
                    continue;
                };

                if !shot.is_taken() {
                    return Some(NextShot {
                        participant_id: participant.id.clone(),
                        shot_index,
                        group: participant.group,
                    });
                }
            }
        }
    }

    None
}

pub fn is_round_complete(
    participants: &[Participant],
    records: &[ParticipantRecord],
    round_number: u32,
    rotation_enabled: bool,
) -> bool {
    find_next_shot(participants, records, round_number, rotation_enabled).is_none()
}

/// First round (ascending) that still has an open slot, with that slot.
pub fn find_next_pending(
    participants: &[Participant],
    records: &[ParticipantRecord],
    rounds_count: u32,
    rotation_enabled: bool,
) -> Option<(u32, NextShot)> {
    (1..=rounds_count).find_map(|round| {
        find_next_shot(participants, records, round, rotation_enabled).map(|next| (round, next))
    })
}
