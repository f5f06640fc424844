//! Partitioning participants into fixed-size groups (lanes).
//!
//! A group number starts at 1. When no participant carries a group the
//! whole field shoots as a single ungrouped list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::competition::models::Participant;

/// Direction for moving a participant to an adjacent group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupDirection {
    Up,
    Down,
}

/// Group summary for display and validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    pub total_groups: usize,
    /// Member count per group, ascending group number
    pub group_sizes: Vec<usize>,
    pub has_groups: bool,
}

/// Participants sorted by display order (stable for equal orders).
pub fn sort_participants_by_order(participants: &[Participant]) -> Vec<Participant> {
    let mut sorted = participants.to_vec();
    sorted.sort_by_key(|p| p.order);
    sorted
}

fn has_groups(participants: &[Participant]) -> bool {
    participants.iter().any(|p| p.group.is_some())
}

/// Assign `floor(index / group_size) + 1` by display order, replacing any
/// existing assignment. A `group_size` of 0 is treated as 1.
pub fn apply_auto_grouping(participants: &[Participant], group_size: usize) -> Vec<Participant> {
    let group_size = group_size.max(1);
    sort_participants_by_order(participants)
        .into_iter()
        .enumerate()
        .map(|(index, participant)| Participant {
            group: Some((index / group_size) as u32 + 1),
            ..participant
        })
        .collect()
}

pub fn clear_grouping(participants: &[Participant]) -> Vec<Participant> {
    participants
        .iter()
        .map(|p| Participant {
            group: None,
            ..p.clone()
        })
        .collect()
}

/// Shift one participant to the neighbouring group, clamped to the groups
/// that exist. Ungrouped or unknown participants leave the list unchanged.
pub fn move_participant_to_group(
    participants: &[Participant],
    participant_id: &str,
    direction: GroupDirection,
) -> Vec<Participant> {
    let Some(current) = participants
        .iter()
        .find(|p| p.id == participant_id)
        .and_then(|p| p.group)
    else {
        return participants.to_vec();
    };

    let max_group = participants.iter().filter_map(|p| p.group).max().unwrap_or(1);
    let target = match direction {
        GroupDirection::Up if current > 1 => current - 1,
        GroupDirection::Down if current < max_group => current + 1,
        _ => return participants.to_vec(),
    };

    participants
        .iter()
        .map(|p| {
            if p.id == participant_id {
                Participant {
                    group: Some(target),
                    ..p.clone()
                }
            } else {
                p.clone()
            }
        })
        .collect()
}

/// Partition participants by group number ascending, each group in display
/// order. Without any grouping a single list with everyone is returned;
/// with partial grouping the ungrouped participants join group 1.
pub fn group_participants(participants: &[Participant]) -> Vec<Vec<&Participant>> {
    let mut ordered: Vec<&Participant> = participants.iter().collect();
    ordered.sort_by_key(|p| p.order);

    if !has_groups(participants) {
        return vec![ordered];
    }

    let mut groups: BTreeMap<u32, Vec<&Participant>> = BTreeMap::new();
    for participant in ordered {
        groups
            .entry(participant.group.unwrap_or(1))
            .or_default()
            .push(participant);
    }
    groups.into_values().collect()
}

pub fn get_group_info(participants: &[Participant]) -> GroupInfo {
    if !has_groups(participants) {
        return GroupInfo::default();
    }

    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for group in participants.iter().filter_map(|p| p.group) {
        *counts.entry(group).or_default() += 1;
    }

    GroupInfo {
        total_groups: counts.len(),
        group_sizes: counts.into_values().collect(),
        has_groups: true,
    }
}
