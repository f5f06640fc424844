//! Pure score calculations for participant records.

use crate::competition::models::Participant;
use crate::constants::HANDICAP_PER_RANK;

use super::models::{ParticipantRecord, Round, ShotOutcome};

/// Handicap for a grade: higher grades give up more points.
pub fn calculate_handicap(rank: u32) -> i32 {
    rank as i32 * HANDICAP_PER_RANK
}

pub fn calculate_round_hits(shots: &[ShotOutcome]) -> u32 {
    shots.iter().filter(|shot| shot.is_hit()).count() as u32
}

pub fn calculate_total_hits(rounds: &[Round]) -> u32 {
    rounds.iter().map(|round| round.hits).sum()
}

/// Hit rate over the shots actually taken; 0.0 when nothing has been shot.
pub fn calculate_hit_rate(total_hits: u32, shots_taken: u32) -> f64 {
    if shots_taken == 0 {
        0.0
    } else {
        f64::from(total_hits) / f64::from(shots_taken)
    }
}

pub fn calculate_adjusted_score(total_hits: u32, handicap: i32) -> i32 {
    total_hits as i32 + handicap
}

/// Build an empty record with `rounds_count` rounds of untaken shots.
pub fn initialize_record(participant: &Participant, rounds_count: u32) -> ParticipantRecord {
    let rounds = (1..=rounds_count).map(Round::new).collect();
    let handicap = calculate_handicap(participant.rank);

    ParticipantRecord {
        participant_id: participant.id.clone(),
        rounds,
        total_hits: 0,
        hit_rate: 0.0,
        rank: 0,
        handicap,
        adjusted_score: handicap,
        rank_with_handicap: 0,
    }
}

/// Recompute every derived field of a record from its shots.
///
/// Rank fields are left as they are; they depend on the other records and
/// are owned by [`rank_records`](super::ranking::rank_records).
#[must_use]
pub fn recompute_record(record: &ParticipantRecord) -> ParticipantRecord {
    let rounds: Vec<Round> = record
        .rounds
        .iter()
        .map(|round| Round {
            hits: calculate_round_hits(&round.shots),
            ..round.clone()
        })
        .collect();

    let total_hits = calculate_total_hits(&rounds);
    let shots_taken = rounds.iter().map(Round::shots_taken).sum();

    ParticipantRecord {
        hit_rate: calculate_hit_rate(total_hits, shots_taken),
        adjusted_score: calculate_adjusted_score(total_hits, record.handicap),
        total_hits,
        rounds,
        ..record.clone()
    }
}
