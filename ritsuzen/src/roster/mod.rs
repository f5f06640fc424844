//! Participant master roster.
//!
//! Masters are stored next to the competition data and are only used as a
//! name/grade source when registering participants.

pub mod models;

pub use models::{MasterExport, MasterId, MasterUpdate, ParticipantMaster};

/// Active masters, most used first; ties broken by most recent use.
pub fn sort_by_usage(masters: &[ParticipantMaster]) -> Vec<&ParticipantMaster> {
    let mut active = active_masters(masters);
    active.sort_by(|a, b| {
        b.usage_count
            .cmp(&a.usage_count)
            .then_with(|| b.last_used.cmp(&a.last_used))
    });
    active
}

/// Active masters by name
pub fn sort_by_name(masters: &[ParticipantMaster]) -> Vec<&ParticipantMaster> {
    let mut active = active_masters(masters);
    active.sort_by(|a, b| a.name.cmp(&b.name));
    active
}

/// Active masters by grade, lowest first
pub fn sort_by_rank(masters: &[ParticipantMaster]) -> Vec<&ParticipantMaster> {
    let mut active = active_masters(masters);
    active.sort_by_key(|m| m.rank);
    active
}

fn active_masters(masters: &[ParticipantMaster]) -> Vec<&ParticipantMaster> {
    masters.iter().filter(|m| m.is_active).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn master(name: &str, rank: u32, usage_count: u32, minutes_ago: Option<i64>) -> ParticipantMaster {
        ParticipantMaster {
            id: format!("mast-{name}"),
            name: name.to_string(),
            rank,
            is_active: true,
            last_used: minutes_ago.map(|m| Utc::now() - Duration::minutes(m)),
            usage_count,
            created_at: Utc::now(),
        }
    }

    fn names(masters: &[&ParticipantMaster]) -> Vec<String> {
        masters.iter().map(|m| m.name.clone()).collect()
    }

    #[test]
    fn test_sort_by_usage() {
        let masters = vec![
            master("a", 1, 1, Some(5)),
            master("b", 2, 3, Some(50)),
            master("c", 3, 3, Some(10)),
            master("d", 4, 0, None),
        ];
        assert_eq!(names(&sort_by_usage(&masters)), vec!["c", "b", "a", "d"]);
    }

    #[test]
    fn test_sort_filters_inactive() {
        let mut masters = vec![master("b", 2, 0, None), master("a", 5, 0, None)];
        masters[1].is_active = false;
        assert_eq!(names(&sort_by_name(&masters)), vec!["b"]);
        assert_eq!(names(&sort_by_rank(&masters)), vec!["b"]);
    }

    #[test]
    fn test_sort_by_rank_and_name() {
        let masters = vec![
            master("c", 2, 0, None),
            master("a", 6, 0, None),
            master("b", 1, 0, None),
        ];
        assert_eq!(names(&sort_by_rank(&masters)), vec!["b", "c", "a"]);
        assert_eq!(names(&sort_by_name(&masters)), vec!["a", "b", "c"]);
    }
}
