/// Property-based tests for the scoring model and ranking engine
///
/// These tests check recomputation and ranking invariants across randomly
/// generated shot sheets and score lists.
use proptest::prelude::*;
use ritsuzen::competition::Participant;
use ritsuzen::constants::SHOTS_PER_ROUND;
use ritsuzen::scoring::{
    ParticipantRecord, ShotOutcome, initialize_record, rank_records, recompute_record,
};

fn shot_strategy() -> impl Strategy<Value = ShotOutcome> {
    prop_oneof![
        Just(ShotOutcome::NotTaken),
        Just(ShotOutcome::Miss),
        Just(ShotOutcome::Hit),
    ]
}

// A record with random grade and random outcomes over `rounds` rounds
fn record_strategy(rounds: u32) -> impl Strategy<Value = ParticipantRecord> {
    (
        1u32..=8,
        prop::collection::vec(shot_strategy(), rounds as usize * SHOTS_PER_ROUND),
    )
        .prop_map(move |(rank, shots)| {
            let participant = Participant {
                id: format!("part-{rank}"),
                name: "射手".to_string(),
                rank,
                order: 1,
                group: None,
            };
            let mut record = initialize_record(&participant, rounds);
            for (i, shot) in shots.into_iter().enumerate() {
                record.rounds[i / SHOTS_PER_ROUND].shots[i % SHOTS_PER_ROUND] = shot;
            }
            record
        })
}

fn records_strategy() -> impl Strategy<Value = Vec<ParticipantRecord>> {
    prop::collection::vec(record_strategy(5), 1..12).prop_map(|records| {
        records
            .into_iter()
            .enumerate()
            .map(|(i, record)| ParticipantRecord {
                participant_id: format!("part-{i}"),
                ..recompute_record(&record)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn test_recompute_is_idempotent(record in record_strategy(5)) {
        let once = recompute_record(&record);
        let twice = recompute_record(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_round_hits_count_only_hits(record in record_strategy(10)) {
        let record = recompute_record(&record);
        for round in &record.rounds {
            let hits = round.shots.iter().filter(|s| **s == ShotOutcome::Hit).count() as u32;
            prop_assert_eq!(round.hits, hits);
        }
        let total: u32 = record.rounds.iter().map(|r| r.hits).sum();
        prop_assert_eq!(record.total_hits, total);
    }

    #[test]
    fn test_adjusted_score_applies_handicap(record in record_strategy(5)) {
        let record = recompute_record(&record);
        let rank = record.handicap / -2;
        prop_assert!((1..=8).contains(&rank));
        prop_assert_eq!(record.adjusted_score, record.total_hits as i32 + rank * -2);
    }

    #[test]
    fn test_hit_rate_uses_shots_taken(record in record_strategy(5)) {
        let record = recompute_record(&record);
        let taken = record.shots_taken();
        prop_assert!(record.hit_rate.is_finite());
        prop_assert!((0.0..=1.0).contains(&record.hit_rate));
        if taken == 0 {
            prop_assert_eq!(record.hit_rate, 0.0);
        } else {
            let expected = f64::from(record.total_hits) / f64::from(taken);
            prop_assert!((record.hit_rate - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_ranks_are_competition_style(mut records in records_strategy()) {
        rank_records(&mut records);
        for record in &records {
            let better = records.iter().filter(|r| r.total_hits > record.total_hits).count() as u32;
            prop_assert_eq!(record.rank, better + 1);

            let better_adjusted = records
                .iter()
                .filter(|r| r.adjusted_score > record.adjusted_score)
                .count() as u32;
            prop_assert_eq!(record.rank_with_handicap, better_adjusted + 1);
        }
    }

    #[test]
    fn test_ranking_keeps_slice_order(mut records in records_strategy()) {
        let ids: Vec<String> = records.iter().map(|r| r.participant_id.clone()).collect();
        rank_records(&mut records);
        let after: Vec<String> = records.iter().map(|r| r.participant_id.clone()).collect();
        prop_assert_eq!(ids, after);
    }

    #[test]
    fn test_cycle_returns_after_three_steps(shot in shot_strategy()) {
        prop_assert_eq!(shot.next().next().next(), shot);
        prop_assert_ne!(shot.next(), shot);
    }
}
