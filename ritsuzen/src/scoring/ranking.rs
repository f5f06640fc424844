//! Competition-style ("1224") ranking of participant records.
//!
//! Records with equal scores share a rank and the next distinct score
//! resumes at its 1-based position. There is no secondary tie-break: equal
//! scores keep the order the stable sort leaves them in, which is the
//! records' insertion order.

use super::models::ParticipantRecord;

/// Assign dense competition ranks for `score` onto `assign`.
fn assign_ranks<K, F, A>(records: &mut [ParticipantRecord], score: F, mut assign: A)
where
    K: Ord + Copy,
    F: Fn(&ParticipantRecord) -> K,
    A: FnMut(&mut ParticipantRecord, u32),
{
    let mut indices: Vec<usize> = (0..records.len()).collect();
    // Stable: equal scores stay in insertion order
    indices.sort_by(|&a, &b| score(&records[b]).cmp(&score(&records[a])));

    let mut current_rank = 1;
    let mut previous: Option<K> = None;
    for (position, &idx) in indices.iter().enumerate() {
        let value = score(&records[idx]);
        if previous.is_some_and(|prev| prev != value) {
            current_rank = position as u32 + 1;
        }
        assign(&mut records[idx], current_rank);
        previous = Some(value);
    }
}

/// Recompute `rank` (by total hits) and `rank_with_handicap` (by adjusted
/// score) for every record. The slice order itself is left untouched.
pub fn rank_records(records: &mut [ParticipantRecord]) {
    assign_ranks(records, |r| r.total_hits, |r, rank| r.rank = rank);
    assign_ranks(
        records,
        |r| r.adjusted_score,
        |r, rank| r.rank_with_handicap = rank,
    );
}

/// Records ordered best-first for result views: by adjusted score when the
/// handicap is enabled, otherwise by total hits. Ties keep input order.
pub fn sort_records_by_score(
    records: &[ParticipantRecord],
    handicap_enabled: bool,
) -> Vec<&ParticipantRecord> {
    let mut sorted: Vec<&ParticipantRecord> = records.iter().collect();
    if handicap_enabled {
        sorted.sort_by(|a, b| b.adjusted_score.cmp(&a.adjusted_score));
    } else {
        sorted.sort_by(|a, b| b.total_hits.cmp(&a.total_hits));
    }
    sorted
}

/// Rank label shown next to a name, e.g. `3段`.
pub fn format_rank(rank: u32) -> String {
    format!("{rank}段")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, total_hits: u32, handicap: i32) -> ParticipantRecord {
        ParticipantRecord {
            participant_id: id.to_string(),
            rounds: Vec::new(),
            total_hits,
            hit_rate: 0.0,
            rank: 0,
            handicap,
            adjusted_score: total_hits as i32 + handicap,
            rank_with_handicap: 0,
        }
    }

    #[test]
    fn test_ties_share_rank_and_skip_positions() {
        let mut records = vec![
            record("a", 10, 0),
            record("b", 10, 0),
            record("c", 8, 0),
            record("d", 8, 0),
            record("e", 5, 0),
        ];
        rank_records(&mut records);
        let ranks: Vec<u32> = records.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 1, 3, 3, 5]);
    }

    #[test]
    fn test_ranking_does_not_reorder_slice() {
        let mut records = vec![record("low", 3, 0), record("high", 9, 0), record("mid", 6, 0)];
        rank_records(&mut records);
        assert_eq!(records[0].participant_id, "low");
        assert_eq!(records[0].rank, 3);
        assert_eq!(records[1].rank, 1);
        assert_eq!(records[2].rank, 2);
    }

    #[test]
    fn test_handicap_rank_is_independent() {
        // a: 20 - 6 = 14, b: 10 - 2 = 8, c: 12 - 0 = 12
        let mut records = vec![record("a", 20, -6), record("b", 10, -2), record("c", 12, 0)];
        rank_records(&mut records);
        assert_eq!(
            records.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 3, 2]
        );
        assert_eq!(
            records.iter().map(|r| r.rank_with_handicap).collect::<Vec<_>>(),
            vec![1, 3, 2]
        );
    }

    #[test]
    fn test_negative_adjusted_scores_rank() {
        let mut records = vec![record("a", 0, -16), record("b", 0, -2), record("c", 0, -2)];
        rank_records(&mut records);
        assert_eq!(records[0].rank, 1);
        assert_eq!(records[1].rank, 1);
        assert_eq!(records[0].rank_with_handicap, 3);
        assert_eq!(records[1].rank_with_handicap, 1);
        assert_eq!(records[2].rank_with_handicap, 1);
    }

    #[test]
    fn test_empty_records() {
        let mut records: Vec<ParticipantRecord> = Vec::new();
        rank_records(&mut records);
        assert!(records.is_empty());
    }

    #[test]
    fn test_sort_records_by_score() {
        let records = vec![record("a", 5, 0), record("b", 9, -8), record("c", 7, 0)];
        let plain: Vec<&str> = sort_records_by_score(&records, false)
            .iter()
            .map(|r| r.participant_id.as_str())
            .collect();
        assert_eq!(plain, vec!["b", "c", "a"]);

        let adjusted: Vec<&str> = sort_records_by_score(&records, true)
            .iter()
            .map(|r| r.participant_id.as_str())
            .collect();
        assert_eq!(adjusted, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_format_rank() {
        assert_eq!(format_rank(3), "3段");
    }
}
