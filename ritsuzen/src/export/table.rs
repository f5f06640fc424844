//! Tabular result sheet for spreadsheet and CSV output.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::competition::{Competition, Participant};
use crate::constants::{HIGHLIGHTED_PLACES, SHOTS_PER_ROUND};
use crate::scoring::{ParticipantRecord, format_rank, sort_records_by_score};

/// Row order of a result sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SheetOrder {
    /// Participant display order, for score cards
    #[default]
    DisplayOrder,
    /// Best first, by adjusted score when the handicap is enabled
    Ranking,
}

/// Visual emphasis a spreadsheet writer applies to a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Highlight {
    /// Place 1 to 3 in a ranking column
    TopRank(u32),
    /// Every shot of the round hit
    PerfectRound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub value: String,
    pub highlight: Option<Highlight>,
}

impl Cell {
    pub fn new(value: impl ToString) -> Self {
        Self {
            value: value.to_string(),
            highlight: None,
        }
    }

    fn rank(rank: u32) -> Self {
        Self {
            value: rank.to_string(),
            highlight: (1..=HIGHLIGHTED_PLACES)
                .contains(&rank)
                .then_some(Highlight::TopRank(rank)),
        }
    }
}

/// Result sheet of one competition
///
/// Layout: a title row, a blank row, the header row, then one row per
/// participant. Each round contributes four shot glyphs and a subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSheet {
    /// Sheet name, the competition date as `YYYYMMDD`
    pub name: String,
    pub title: Vec<Cell>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    /// Recommended column widths in characters
    pub column_widths: Vec<u16>,
}

impl ResultSheet {
    pub fn from_competition(competition: &Competition, order: SheetOrder) -> Self {
        let handicap = competition.handicap_enabled;
        let records: HashMap<&str, &ParticipantRecord> = competition
            .records
            .iter()
            .map(|r| (r.participant_id.as_str(), r))
            .collect();
        let participants: HashMap<&str, &Participant> = competition
            .participants
            .iter()
            .map(|p| (p.id.as_str(), p))
            .collect();

        let pairs: Vec<(&Participant, &ParticipantRecord)> = match order {
            SheetOrder::DisplayOrder => competition
                .participants_in_order()
                .into_iter()
                .filter_map(|p| records.get(p.id.as_str()).map(|r| (p, *r)))
                .collect(),
            SheetOrder::Ranking => sort_records_by_score(&competition.records, handicap)
                .into_iter()
                .filter_map(|r| participants.get(r.participant_id.as_str()).map(|p| (*p, r)))
                .collect(),
        };

        Self {
            name: competition.date.format("%Y%m%d").to_string(),
            title: vec![
                Cell::new(&competition.name),
                Cell::new(format!("開催日: {}", competition.date.format("%Y-%m-%d"))),
                Cell::new(format!("参加者数: {}名", competition.participants.len())),
                Cell::new(if handicap { "ハンデ有効" } else { "ハンデ無効" }),
            ],
            headers: headers(competition.rounds_count, handicap),
            rows: pairs
                .into_iter()
                .map(|(participant, record)| row(participant, record, handicap))
                .collect(),
            column_widths: column_widths(competition.rounds_count, handicap),
        }
    }

    /// CSV text: every cell quoted, no styling
    pub fn to_csv(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 3);
        lines.push(csv_line(self.title.iter().map(|c| c.value.as_str())));
        lines.push(String::new());
        lines.push(csv_line(self.headers.iter().map(String::as_str)));
        for row in &self.rows {
            lines.push(csv_line(row.iter().map(|c| c.value.as_str())));
        }
        lines.join("\n")
    }

    /// Cells carrying a highlight, as `(row, column, highlight)`
    pub fn highlights(&self) -> Vec<(usize, usize, Highlight)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .filter_map(move |(c, cell)| cell.highlight.map(|h| (r, c, h)))
            })
            .collect()
    }
}

fn headers(rounds_count: u32, handicap: bool) -> Vec<String> {
    let mut headers = vec!["参加者".to_string(), "段位".to_string()];
    let mut shot = 1;
    for round in 1..=rounds_count {
        for _ in 0..SHOTS_PER_ROUND {
            headers.push(format!("{shot}射"));
            shot += 1;
        }
        headers.push(format!("{round}計"));
    }
    headers.extend(["的中", "矢数", "的中率", "調整前順位"].map(String::from));
    if handicap {
        headers.extend(["ハンデ", "調整後的中", "ハンデ調整後順位"].map(String::from));
    }
    headers
}

fn column_widths(rounds_count: u32, handicap: bool) -> Vec<u16> {
    let mut widths = vec![12, 6];
    for _ in 0..rounds_count {
        widths.extend([4; SHOTS_PER_ROUND]);
        widths.push(6);
    }
    widths.extend([8, 6, 8, 10]);
    if handicap {
        widths.extend([8, 10, 16]);
    }
    widths
}

fn row(participant: &Participant, record: &ParticipantRecord, handicap: bool) -> Vec<Cell> {
    let mut cells = vec![Cell::new(&participant.name), Cell::new(format_rank(participant.rank))];

    for round in &record.rounds {
        cells.extend(round.shots.iter().map(|shot| Cell::new(shot.symbol())));
        cells.push(Cell {
            value: round.hits.to_string(),
            highlight: round.is_perfect().then_some(Highlight::PerfectRound),
        });
    }

    cells.push(Cell::new(record.total_hits));
    cells.push(Cell::new(record.shots_taken()));
    cells.push(Cell::new(format!("{:.1}%", record.hit_rate * 100.0)));
    cells.push(Cell::rank(record.rank));

    if handicap {
        cells.push(Cell::new(record.handicap));
        cells.push(Cell::new(record.adjusted_score));
        cells.push(Cell::rank(record.rank_with_handicap));
    }
    cells
}

fn csv_line<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    cells
        .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competition::{CompetitionAction, CompetitionSettings, CompetitionState};
    use crate::scoring::ShotOutcome;
    use chrono::NaiveDate;

    fn scored(handicap: bool) -> Competition {
        let settings = CompetitionSettings::new(
            "立禅の会",
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
        )
        .with_handicap(handicap);
        let mut state = CompetitionState::new()
            .apply(CompetitionAction::Create(settings))
            .unwrap();
        for (name, rank) in [("A", 1), ("B", 5)] {
            state = state
                .apply(CompetitionAction::AddParticipant {
                    name: name.to_string(),
                    rank,
                })
                .unwrap();
        }
        let b = state.competition.as_ref().unwrap().participants[1].id.clone();
        for shot_index in 0..4 {
            state = state
                .apply(CompetitionAction::UpdateShot {
                    participant_id: b.clone(),
                    round_number: 1,
                    shot_index,
                    outcome: ShotOutcome::Hit,
                })
                .unwrap();
        }
        state.competition.unwrap()
    }

    #[test]
    fn test_headers_without_handicap() {
        let sheet = ResultSheet::from_competition(&scored(false), SheetOrder::DisplayOrder);
        assert_eq!(sheet.headers.len(), 2 + 5 * 5 + 4);
        assert_eq!(sheet.headers[2], "1射");
        assert_eq!(sheet.headers[6], "1計");
        assert_eq!(sheet.headers[26], "5計");
        assert_eq!(sheet.headers.last().unwrap(), "調整前順位");
        assert_eq!(sheet.column_widths.len(), sheet.headers.len());
        assert_eq!(sheet.title[3].value, "ハンデ無効");
        assert_eq!(sheet.name, "20240310");
    }

    #[test]
    fn test_headers_with_handicap() {
        let sheet = ResultSheet::from_competition(&scored(true), SheetOrder::DisplayOrder);
        assert_eq!(sheet.headers.len(), 2 + 5 * 5 + 7);
        assert_eq!(sheet.headers.last().unwrap(), "ハンデ調整後順位");
        assert_eq!(sheet.column_widths.len(), sheet.headers.len());
        assert_eq!(sheet.rows[0].len(), sheet.headers.len());
    }

    #[test]
    fn test_row_order() {
        let comp = scored(false);
        let by_order = ResultSheet::from_competition(&comp, SheetOrder::DisplayOrder);
        assert_eq!(by_order.rows[0][0].value, "A");
        let by_rank = ResultSheet::from_competition(&comp, SheetOrder::Ranking);
        assert_eq!(by_rank.rows[0][0].value, "B");
    }

    #[test]
    fn test_row_contents_and_highlights() {
        let sheet = ResultSheet::from_competition(&scored(false), SheetOrder::Ranking);
        let row = &sheet.rows[0];
        assert_eq!(row[1].value, "5段");
        assert_eq!(row[2].value, "○");
        assert_eq!(row[7].value, "-");
        assert_eq!(row[6].value, "4");
        assert_eq!(row[6].highlight, Some(Highlight::PerfectRound));
        // total, shots taken, hit rate, rank
        assert_eq!(row[27].value, "4");
        assert_eq!(row[28].value, "4");
        assert_eq!(row[29].value, "100.0%");
        assert_eq!(row[30].highlight, Some(Highlight::TopRank(1)));

        let highlights = sheet.highlights();
        assert!(highlights.contains(&(0, 6, Highlight::PerfectRound)));
        assert!(highlights.contains(&(1, 30, Highlight::TopRank(2))));
    }

    #[test]
    fn test_csv_layout() {
        let csv = ResultSheet::from_competition(&scored(true), SheetOrder::DisplayOrder).to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("\"立禅の会\",\"開催日: 2024-03-10\",\"参加者数: 2名\""));
        assert_eq!(lines[1], "");
        assert!(lines[2].starts_with("\"参加者\",\"段位\",\"1射\""));
        assert!(lines[3].starts_with("\"A\",\"1段\""));
    }

    #[test]
    fn test_csv_escapes_quotes() {
        assert_eq!(
            csv_line(["a\"b", "c"].into_iter()),
            "\"a\"\"b\",\"c\""
        );
    }
}
