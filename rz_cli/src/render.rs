//! Plain-text views printed by the commands.

use std::fmt::Write;

use ritsuzen::grouping::get_group_info;
use ritsuzen::roster::ParticipantMaster;
use ritsuzen::scoring::{format_rank, sort_records_by_score};
use ritsuzen::shooting::{GroupOrder, order_for_round};
use ritsuzen::storage::StorageInfo;
use ritsuzen::{Competition, NextShot};

/// Left-align `text` to `width` characters
fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{text}{}", " ".repeat(width - len))
    }
}

pub fn competition_summary(competition: &Competition) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", competition.name, competition.date);
    let _ = writeln!(
        out,
        "  status: {}  rounds: {}  rotation: {}  handicap: {}",
        competition.status,
        competition.rounds_count,
        if competition.enable_rotation { "on" } else { "off" },
        if competition.handicap_enabled { "on" } else { "off" },
    );
    let groups = get_group_info(&competition.participants);
    if groups.has_groups {
        let _ = writeln!(
            out,
            "  groups: {} (sizes {:?})",
            groups.total_groups, groups.group_sizes
        );
    }
    out.push_str(&participants(competition));
    out
}

/// Participants in display order with their current totals
pub fn participants(competition: &Competition) -> String {
    let mut out = String::new();
    if competition.participants.is_empty() {
        out.push_str("  (no participants)\n");
        return out;
    }

    for (position, participant) in competition.participants_in_order().iter().enumerate() {
        let group = participant
            .group
            .map_or_else(|| "-".to_string(), |g| g.to_string());
        let (hits, rank) = competition
            .record(&participant.id)
            .map_or((0, 0), |r| (r.total_hits, r.rank));
        let _ = writeln!(
            out,
            "  {:>2}. {} {} group {}  hits {:>3}  rank {:>2}  [{}]",
            position + 1,
            pad(&participant.name, 10),
            pad(&format_rank(participant.rank), 4),
            group,
            hits,
            rank,
            participant.id
        );
    }
    out
}

/// Shot sheet of one round in firing order
pub fn round_sheet(competition: &Competition, round_number: u32) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Round {round_number}");
    for participant in order_for_round(
        &competition.participants,
        round_number,
        competition.enable_rotation,
    ) {
        let Some(round) = competition
            .record(&participant.id)
            .and_then(|r| r.round(round_number))
        else {
            continue;
        };
        let shots: String = round.shots.iter().map(|s| s.symbol()).collect();
        let _ = writeln!(
            out,
            "  {} {}  {}",
            pad(&participant.name, 10),
            shots,
            round.hits
        );
    }
    out
}

pub fn shooting_order(orders: &[GroupOrder<'_>], round_number: u32) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Shooting order, round {round_number}");
    for group in orders {
        let names: Vec<&str> = group.order.iter().map(|p| p.name.as_str()).collect();
        let _ = writeln!(out, "  group {}: {}", group.group_number, names.join(" → "));
    }
    out
}

pub fn next_shot(competition: &Competition, next: Option<&(u32, NextShot)>) -> String {
    match next {
        None => "All shots have been entered\n".to_string(),
        Some((round, shot)) => {
            let name = competition
                .participant(&shot.participant_id)
                .map_or(shot.participant_id.as_str(), |p| p.name.as_str());
            format!(
                "Next: {name}, round {round}, shot {}\n",
                shot.shot_index + 1
            )
        }
    }
}

/// Ranked results, by adjusted score when the handicap is enabled
pub fn results(competition: &Competition) -> String {
    let handicap = competition.handicap_enabled;
    let mut out = String::new();

    let mut header = format!("{} {} {}", pad("順位", 4), pad("参加者", 10), pad("段位", 4));
    for round in 1..=competition.rounds_count {
        let _ = write!(header, " {:>3}", format!("{round}立"));
    }
    header.push_str("  的中  的中率");
    if handicap {
        header.push_str("  ハンデ  調整後");
    }
    let _ = writeln!(out, "{header}");

    for record in sort_records_by_score(&competition.records, handicap) {
        let Some(participant) = competition.participant(&record.participant_id) else {
            continue;
        };
        let place = if handicap { record.rank_with_handicap } else { record.rank };
        let mut line = format!(
            "{} {} {}",
            pad(&place.to_string(), 4),
            pad(&participant.name, 10),
            pad(&format_rank(participant.rank), 4)
        );
        for round in &record.rounds {
            let _ = write!(line, " {:>3}", round.hits);
        }
        let _ = write!(
            line,
            "  {:>4}  {:>5.1}%",
            record.total_hits,
            record.hit_rate * 100.0
        );
        if handicap {
            let _ = write!(line, "  {:>6}  {:>6}", record.handicap, record.adjusted_score);
        }
        let _ = writeln!(out, "{line}");
    }
    out
}

pub fn history(competitions: &[Competition]) -> String {
    if competitions.is_empty() {
        return "No competitions in history\n".to_string();
    }
    let mut out = String::new();
    for competition in competitions {
        let _ = writeln!(
            out,
            "  {}  {}  {} participants  {}  [{}]",
            competition.date,
            pad(&competition.name, 16),
            competition.participants.len(),
            competition.status,
            competition.id
        );
    }
    out
}

pub fn masters(masters: &[&ParticipantMaster]) -> String {
    if masters.is_empty() {
        return "No participant masters\n".to_string();
    }
    let mut out = String::new();
    for master in masters {
        let _ = writeln!(
            out,
            "  {} {} used {:>3}  {}  [{}]",
            pad(&master.name, 10),
            pad(&format_rank(master.rank), 4),
            master.usage_count,
            if master.is_active { "active" } else { "inactive" },
            master.id
        );
    }
    out
}

pub fn storage_info(info: &StorageInfo) -> String {
    let last_updated = info
        .last_updated
        .map_or_else(|| "never".to_string(), |t| t.to_rfc3339());
    format!(
        "Stored data: {}\n  competitions in history: {}\n  participant masters: {}\n  current competition: {}\n  last updated: {}\n",
        info.formatted_size(),
        info.competition_count,
        info.master_count,
        if info.has_current_competition { "yes" } else { "no" },
        last_updated
    )
}
