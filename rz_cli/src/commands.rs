//! Command parsing and execution.
//!
//! Every invocation runs exactly one command against the persisted
//! session and returns the text to print.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Local, NaiveDate};
use pico_args::Arguments;
use ritsuzen::competition::{Competition, CompetitionManager, CompetitionSettings};
use ritsuzen::export::{
    ExportData, ResultSheet, SheetOrder, all_data_file_name, competition_file_name,
    csv_file_name, read_import, write_csv, write_export,
};
use ritsuzen::grouping::GroupDirection;
use ritsuzen::roster::{self, MasterUpdate};
use ritsuzen::storage::{StoragePort, StorageManager};
use ritsuzen::{NextShot, ShotOutcome};

use crate::config::AppConfig;
use crate::render;

/// Errors that can occur during command parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Malformed or missing argument
    #[error("{0}")]
    Args(#[from] pico_args::Error),

    /// Unrecognized subcommand
    #[error("Unrecognized command '{0}'. Run with --help to see available commands")]
    UnknownCommand(String),

    /// Argument parsed but out of range
    #[error("Invalid value '{value}' for {arg}")]
    InvalidValue { arg: &'static str, value: String },

    /// Arguments left over after parsing
    #[error("Unexpected arguments: {0}")]
    UnexpectedArguments(String),
}

/// Sort order of `masters list`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MasterSort {
    #[default]
    Usage,
    Name,
    Rank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MastersCommand {
    List { sort: MasterSort },
    Add { name: String, rank: u32 },
    Remove { id: String },
    Toggle { id: String },
    Export { file: Option<PathBuf> },
    Import { file: PathBuf },
}

/// A parsed command line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Show,
    New {
        name: String,
        date: Option<NaiveDate>,
        rounds: Option<u32>,
        handicap: Option<bool>,
        rotation: Option<bool>,
    },
    Add {
        name: String,
        rank: u32,
    },
    AddMaster {
        master: String,
    },
    Remove {
        participant: String,
    },
    Up {
        participant: String,
    },
    Down {
        participant: String,
    },
    Group {
        size: Option<usize>,
    },
    Ungroup,
    GroupMove {
        participant: String,
        direction: GroupDirection,
    },
    Shot {
        participant: String,
        round: u32,
        shot_index: usize,
        outcome: ShotOutcome,
    },
    Cycle {
        participant: String,
        round: u32,
        shot_index: usize,
    },
    Round {
        round: u32,
    },
    Next {
        round: Option<u32>,
    },
    Order {
        round: Option<u32>,
    },
    Results,
    Finish {
        confirmed: bool,
    },
    Reset {
        confirmed: bool,
    },
    ExportJson {
        all: bool,
        out_dir: Option<PathBuf>,
    },
    ExportCsv {
        out_dir: Option<PathBuf>,
        order: SheetOrder,
    },
    Import {
        file: PathBuf,
    },
    History,
    Masters(MastersCommand),
    Info,
}

impl Command {
    /// Parse the arguments following the program name.
    ///
    /// Options are taken before positional arguments, as pico-args expects.
    pub fn parse(mut pargs: Arguments) -> Result<Self, ParseError> {
        let Some(subcommand) = pargs.subcommand()? else {
            return Ok(Command::Show);
        };

        let command = match subcommand.as_str() {
            "show" => Command::Show,
            "new" => {
                let date = pargs.opt_value_from_str("--date")?;
                let rounds = pargs.opt_value_from_str("--rounds")?;
                let handicap = flag_pair(&mut pargs, "--handicap", "--no-handicap");
                let rotation = flag_pair(&mut pargs, "--rotation", "--no-rotation");
                Command::New {
                    name: pargs.free_from_str()?,
                    date,
                    rounds,
                    handicap,
                    rotation,
                }
            }
            "add" => Command::Add {
                name: pargs.free_from_str()?,
                rank: pargs.free_from_str()?,
            },
            "add-master" => Command::AddMaster {
                master: pargs.free_from_str()?,
            },
            "remove" => Command::Remove {
                participant: pargs.free_from_str()?,
            },
            "up" => Command::Up {
                participant: pargs.free_from_str()?,
            },
            "down" => Command::Down {
                participant: pargs.free_from_str()?,
            },
            "group" => Command::Group {
                size: pargs.opt_free_from_str()?,
            },
            "ungroup" => Command::Ungroup,
            "group-move" => Command::GroupMove {
                participant: pargs.free_from_str()?,
                direction: pargs.free_from_fn(parse_direction)?,
            },
            "shot" => Command::Shot {
                participant: pargs.free_from_str()?,
                round: pargs.free_from_str()?,
                shot_index: parse_slot(&mut pargs)?,
                outcome: pargs.free_from_str()?,
            },
            "cycle" => Command::Cycle {
                participant: pargs.free_from_str()?,
                round: pargs.free_from_str()?,
                shot_index: parse_slot(&mut pargs)?,
            },
            "round" => Command::Round {
                round: pargs.free_from_str()?,
            },
            "next" => Command::Next {
                round: pargs.opt_value_from_str("--round")?,
            },
            "order" => Command::Order {
                round: pargs.opt_free_from_str()?,
            },
            "results" => Command::Results,
            "finish" => Command::Finish {
                confirmed: pargs.contains("--yes"),
            },
            "reset" => Command::Reset {
                confirmed: pargs.contains("--yes"),
            },
            "export-json" => Command::ExportJson {
                all: pargs.contains("--all"),
                out_dir: pargs.opt_value_from_str("--out")?,
            },
            "export-csv" => {
                let order = if pargs.contains("--ranking") {
                    SheetOrder::Ranking
                } else {
                    SheetOrder::DisplayOrder
                };
                Command::ExportCsv {
                    out_dir: pargs.opt_value_from_str("--out")?,
                    order,
                }
            }
            "import" => Command::Import {
                file: pargs.free_from_str()?,
            },
            "history" => Command::History,
            "masters" => Command::Masters(parse_masters(&mut pargs)?),
            "info" => Command::Info,
            other => return Err(ParseError::UnknownCommand(other.to_string())),
        };

        let rest = pargs.finish();
        if !rest.is_empty() {
            let rest: Vec<String> = rest
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect();
            return Err(ParseError::UnexpectedArguments(rest.join(" ")));
        }

        Ok(command)
    }

    /// Name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Show => "show",
            Command::New { .. } => "new",
            Command::Add { .. } => "add",
            Command::AddMaster { .. } => "add-master",
            Command::Remove { .. } => "remove",
            Command::Up { .. } => "up",
            Command::Down { .. } => "down",
            Command::Group { .. } => "group",
            Command::Ungroup => "ungroup",
            Command::GroupMove { .. } => "group-move",
            Command::Shot { .. } => "shot",
            Command::Cycle { .. } => "cycle",
            Command::Round { .. } => "round",
            Command::Next { .. } => "next",
            Command::Order { .. } => "order",
            Command::Results => "results",
            Command::Finish { .. } => "finish",
            Command::Reset { .. } => "reset",
            Command::ExportJson { .. } => "export-json",
            Command::ExportCsv { .. } => "export-csv",
            Command::Import { .. } => "import",
            Command::History => "history",
            Command::Masters(_) => "masters",
            Command::Info => "info",
        }
    }
}

fn flag_pair(pargs: &mut Arguments, on: &'static str, off: &'static str) -> Option<bool> {
    match (pargs.contains(on), pargs.contains(off)) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

fn parse_direction(value: &str) -> Result<GroupDirection, String> {
    match value {
        "up" => Ok(GroupDirection::Up),
        "down" => Ok(GroupDirection::Down),
        other => Err(format!("expected 'up' or 'down', got '{other}'")),
    }
}

/// Shot slots are 1-based on the command line
fn parse_slot(pargs: &mut Arguments) -> Result<usize, ParseError> {
    let slot: usize = pargs.free_from_str()?;
    if !(1..=4).contains(&slot) {
        return Err(ParseError::InvalidValue {
            arg: "SHOT",
            value: slot.to_string(),
        });
    }
    Ok(slot - 1)
}

fn parse_masters(pargs: &mut Arguments) -> Result<MastersCommand, ParseError> {
    let sort = match pargs.opt_value_from_str::<_, String>("--sort")?.as_deref() {
        None | Some("usage") => MasterSort::Usage,
        Some("name") => MasterSort::Name,
        Some("rank") => MasterSort::Rank,
        Some(other) => {
            return Err(ParseError::InvalidValue {
                arg: "--sort",
                value: other.to_string(),
            });
        }
    };

    let action: Option<String> = pargs.opt_free_from_str()?;
    let command = match action.as_deref() {
        None | Some("list") => MastersCommand::List { sort },
        Some("add") => MastersCommand::Add {
            name: pargs.free_from_str()?,
            rank: pargs.free_from_str()?,
        },
        Some("remove") => MastersCommand::Remove {
            id: pargs.free_from_str()?,
        },
        Some("toggle") => MastersCommand::Toggle {
            id: pargs.free_from_str()?,
        },
        Some("export") => MastersCommand::Export {
            file: pargs.opt_free_from_str()?,
        },
        Some("import") => MastersCommand::Import {
            file: pargs.free_from_str()?,
        },
        Some(other) => return Err(ParseError::UnknownCommand(format!("masters {other}"))),
    };
    Ok(command)
}

/// Everything a command runs against
pub struct Session<S: StoragePort> {
    pub config: AppConfig,
    pub manager: CompetitionManager<S>,
}

impl<S: StoragePort> Session<S> {
    pub fn new(config: AppConfig, storage: StorageManager<S>) -> Self {
        Self {
            config,
            manager: CompetitionManager::new(storage),
        }
    }

    fn competition(&self) -> Result<&Competition> {
        self.manager
            .competition()
            .ok_or_else(|| anyhow!("No active competition. Create one with `new NAME`"))
    }

    /// Find a participant by id, exact name or 1-based display position
    fn resolve_participant(&self, key: &str) -> Result<String> {
        let competition = self.competition()?;
        if let Some(participant) = competition.participant(key) {
            return Ok(participant.id.clone());
        }

        let by_name: Vec<_> = competition
            .participants
            .iter()
            .filter(|p| p.name == key)
            .collect();
        match by_name.as_slice() {
            [participant] => return Ok(participant.id.clone()),
            [] => {}
            _ => bail!("Several participants are named {key}; use the id instead"),
        }

        if let Ok(position) = key.parse::<usize>() {
            if let Some(participant) = position
                .checked_sub(1)
                .and_then(|i| competition.participants_in_order().get(i).copied())
            {
                return Ok(participant.id.clone());
            }
        }

        bail!("No participant matches '{key}'")
    }

    fn resolve_master(&self, key: &str) -> String {
        self.manager
            .storage()
            .find_master_by_name(key)
            .map_or_else(|| key.to_string(), |m| m.id)
    }
}

/// Run one command and return the text to print
pub async fn execute<S: StoragePort>(command: Command, session: &mut Session<S>) -> Result<String> {
    match command {
        Command::Show => Ok(match session.manager.competition() {
            Some(competition) => render::competition_summary(competition),
            None => "No active competition. Create one with `new NAME`\n".to_string(),
        }),
        Command::New {
            name,
            date,
            rounds,
            handicap,
            rotation,
        } => {
            let config = &session.config;
            let settings = CompetitionSettings::new(name, date.unwrap_or_else(|| Local::now().date_naive()))
                .with_rounds(rounds.unwrap_or(config.default_rounds))
                .with_handicap(handicap.unwrap_or(config.handicap))
                .with_rotation(rotation.unwrap_or(config.rotation));
            let competition = session.manager.create_competition(settings)?;
            Ok(render::competition_summary(competition))
        }
        Command::Add { name, rank } => {
            let id = session.manager.add_participant(&name, rank)?;
            Ok(format!("Added {name} [{id}]\n"))
        }
        Command::AddMaster { master } => {
            let master_id = session.resolve_master(&master);
            let id = session.manager.add_participant_from_master(&master_id)?;
            let competition = session.competition()?;
            let name = competition.participant(&id).map_or("", |p| p.name.as_str());
            Ok(format!("Added {name} [{id}]\n"))
        }
        Command::Remove { participant } => {
            let id = session.resolve_participant(&participant)?;
            session.manager.remove_participant(&id)?;
            Ok(render::participants(session.competition()?))
        }
        Command::Up { participant } => {
            let id = session.resolve_participant(&participant)?;
            session.manager.move_participant_up(&id)?;
            Ok(render::participants(session.competition()?))
        }
        Command::Down { participant } => {
            let id = session.resolve_participant(&participant)?;
            session.manager.move_participant_down(&id)?;
            Ok(render::participants(session.competition()?))
        }
        Command::Group { size } => {
            let size = size.unwrap_or(session.config.group_size);
            session.manager.apply_auto_grouping(size)?;
            Ok(render::competition_summary(session.competition()?))
        }
        Command::Ungroup => {
            session.manager.clear_grouping()?;
            Ok(render::competition_summary(session.competition()?))
        }
        Command::GroupMove {
            participant,
            direction,
        } => {
            let id = session.resolve_participant(&participant)?;
            session.manager.move_participant_to_group(&id, direction)?;
            Ok(render::competition_summary(session.competition()?))
        }
        Command::Shot {
            participant,
            round,
            shot_index,
            outcome,
        } => {
            let id = session.resolve_participant(&participant)?;
            session.manager.update_shot(&id, round, shot_index, outcome)?;
            Ok(round_with_next(session, round)?)
        }
        Command::Cycle {
            participant,
            round,
            shot_index,
        } => {
            let id = session.resolve_participant(&participant)?;
            let outcome = session.manager.cycle_shot(&id, round, shot_index)?;
            Ok(format!("Shot is now {outcome}\n{}", round_with_next(session, round)?))
        }
        Command::Round { round } => round_with_next(session, round),
        Command::Next { round } => {
            let next = match round {
                Some(round) => {
                    session.manager.select_round(round)?;
                    session.manager.next_shot().map(|shot| (round, shot))
                }
                None => session.manager.next_pending_shot(),
            };
            Ok(render::next_shot(session.competition()?, next.as_ref()))
        }
        Command::Order { round } => {
            session.competition()?;
            let round = round
                .or_else(|| session.manager.next_pending_shot().map(|(r, _)| r))
                .unwrap_or(1);
            Ok(render::shooting_order(
                &session.manager.shooting_order(round),
                round,
            ))
        }
        Command::Results => Ok(render::results(session.competition()?)),
        Command::Finish { confirmed } => {
            session.competition()?;
            if !confirmed {
                return Ok("Finishing cannot be undone. Run `finish --yes` to confirm\n".to_string());
            }
            session.manager.finish(true)?;
            Ok(format!(
                "Competition finished and saved to history\n{}",
                render::results(session.competition()?)
            ))
        }
        Command::Reset { confirmed } => {
            if !confirmed {
                return Ok(
                    "Resetting discards the current competition. Run `reset --yes` to confirm\n"
                        .to_string(),
                );
            }
            session.manager.reset(true)?;
            Ok("Current competition discarded\n".to_string())
        }
        Command::ExportJson { all, out_dir } => {
            let dir = out_dir.unwrap_or_else(|| PathBuf::from("."));
            let (data, file_name) = if all {
                let history = session.manager.storage().history();
                (
                    ExportData::all(session.manager.competition(), &history),
                    all_data_file_name(Local::now().date_naive()),
                )
            } else {
                let competition = session.competition()?;
                (
                    ExportData::single(competition),
                    competition_file_name(competition),
                )
            };
            let path = dir.join(file_name);
            write_export(&path, &data)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(wrote(&path))
        }
        Command::ExportCsv { out_dir, order } => {
            let competition = session.competition()?;
            let dir = out_dir.unwrap_or_else(|| PathBuf::from("."));
            let path = dir.join(csv_file_name(competition));
            let sheet = ResultSheet::from_competition(competition, order);
            write_csv(&path, &sheet)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(wrote(&path))
        }
        Command::Import { file } => {
            let data = read_import(&file)
                .await
                .with_context(|| format!("Failed to import {}", file.display()))?;
            let count = session.manager.storage().import_competitions(&data)?;
            Ok(format!("Imported {count} competitions into history\n"))
        }
        Command::History => Ok(render::history(&session.manager.storage().history())),
        Command::Masters(command) => execute_masters(command, session).await,
        Command::Info => Ok(render::storage_info(
            &session.manager.storage().storage_info(),
        )),
    }
}

async fn execute_masters<S: StoragePort>(
    command: MastersCommand,
    session: &mut Session<S>,
) -> Result<String> {
    let storage = session.manager.storage();
    match command {
        MastersCommand::List { sort } => {
            let all = storage.all_masters();
            let sorted = match sort {
                MasterSort::Usage => roster::sort_by_usage(&all),
                MasterSort::Name => roster::sort_by_name(&all),
                MasterSort::Rank => roster::sort_by_rank(&all),
            };
            let inactive = all.len() - sorted.len();
            let mut out = render::masters(&sorted);
            if inactive > 0 {
                out.push_str(&format!("  ({inactive} inactive)\n"));
            }
            Ok(out)
        }
        MastersCommand::Add { name, rank } => {
            let master = storage.save_master(&name, rank)?;
            Ok(format!("Saved master {} [{}]\n", master.name, master.id))
        }
        MastersCommand::Remove { id } => {
            storage.delete_master(&id)?;
            Ok(format!("Removed master {id}\n"))
        }
        MastersCommand::Toggle { id } => {
            let current = storage
                .all_masters()
                .into_iter()
                .find(|m| m.id == id)
                .ok_or_else(|| anyhow!("Participant master not found: {id}"))?;
            let updated = storage.update_master(
                &id,
                MasterUpdate {
                    is_active: Some(!current.is_active),
                    ..Default::default()
                },
            )?;
            Ok(format!(
                "{} is now {}\n",
                updated.name,
                if updated.is_active { "active" } else { "inactive" }
            ))
        }
        MastersCommand::Export { file } => {
            let path = file.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "participant-masters-{}.json",
                    Local::now().date_naive().format("%Y-%m-%d")
                ))
            });
            let json = serde_json::to_string_pretty(&storage.export_masters())?;
            tokio::fs::write(&path, json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(wrote(&path))
        }
        MastersCommand::Import { file } => {
            let json = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let value: serde_json::Value =
                serde_json::from_str(&json).context("Roster file is not valid JSON")?;
            let count = storage.import_masters(&value)?;
            Ok(format!("Imported {count} participant masters\n"))
        }
    }
}

fn round_with_next<S: StoragePort>(session: &mut Session<S>, round: u32) -> Result<String> {
    session.manager.select_round(round)?;
    let competition = session.competition()?;
    let next: Option<(u32, NextShot)> = session.manager.next_shot().map(|shot| (round, shot));
    Ok(format!(
        "{}{}",
        render::round_sheet(competition, round),
        render::next_shot(competition, next.as_ref())
    ))
}

fn wrote(path: &Path) -> String {
    format!("Wrote {}\n", path.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ritsuzen::storage::MemoryStorage;
    use std::ffi::OsString;

    fn parse(args: &[&str]) -> Result<Command, ParseError> {
        Command::parse(Arguments::from_vec(
            args.iter().map(OsString::from).collect(),
        ))
    }

    fn session() -> Session<MemoryStorage> {
        Session::new(AppConfig::default(), StorageManager::new(MemoryStorage::new()))
    }

    async fn run(session: &mut Session<MemoryStorage>, args: &[&str]) -> Result<String> {
        execute(parse(args)?, session).await
    }

    #[test]
    fn test_parse_defaults_to_show() {
        assert_eq!(parse(&[]).unwrap(), Command::Show);
    }

    #[test]
    fn test_parse_new_with_options() {
        let command = parse(&["new", "--rounds", "10", "--no-rotation", "月例会"]).unwrap();
        assert_eq!(
            command,
            Command::New {
                name: "月例会".to_string(),
                date: None,
                rounds: Some(10),
                handicap: None,
                rotation: Some(false),
            }
        );
    }

    #[test]
    fn test_parse_shot() {
        let command = parse(&["shot", "田中", "2", "4", "hit"]).unwrap();
        assert_eq!(
            command,
            Command::Shot {
                participant: "田中".to_string(),
                round: 2,
                shot_index: 3,
                outcome: ShotOutcome::Hit,
            }
        );
        assert!(matches!(
            parse(&["shot", "田中", "2", "5", "hit"]),
            Err(ParseError::InvalidValue { arg: "SHOT", .. })
        ));
    }

    #[test]
    fn test_parse_masters() {
        assert_eq!(
            parse(&["masters"]).unwrap(),
            Command::Masters(MastersCommand::List {
                sort: MasterSort::Usage
            })
        );
        assert_eq!(
            parse(&["masters", "--sort", "rank", "list"]).unwrap(),
            Command::Masters(MastersCommand::List {
                sort: MasterSort::Rank
            })
        );
        assert_eq!(
            parse(&["masters", "add", "佐藤", "4"]).unwrap(),
            Command::Masters(MastersCommand::Add {
                name: "佐藤".to_string(),
                rank: 4
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse(&["fire"]),
            Err(ParseError::UnknownCommand(_))
        ));
        assert!(matches!(
            parse(&["results", "extra"]),
            Err(ParseError::UnexpectedArguments(_))
        ));
        assert!(matches!(parse(&["add", "田中"]), Err(ParseError::Args(_))));
        assert!(parse(&["group-move", "田中", "sideways"]).is_err());
    }

    #[tokio::test]
    async fn test_session_flow() {
        let mut session = session();
        run(&mut session, &["new", "--handicap", "--date", "2024-05-05", "大会"])
            .await
            .unwrap();
        run(&mut session, &["add", "田中", "3"]).await.unwrap();
        run(&mut session, &["add", "鈴木", "1"]).await.unwrap();

        let out = run(&mut session, &["shot", "1", "1", "1", "hit"]).await.unwrap();
        assert!(out.contains("Next: 鈴木, round 1, shot 1"));
        let out = run(&mut session, &["shot", "鈴木", "1", "1", "hit"]).await.unwrap();
        assert!(out.contains("Next: 田中, round 1, shot 2"));

        let out = run(&mut session, &["cycle", "田中", "1", "2"]).await.unwrap();
        assert!(out.starts_with("Shot is now miss"));

        let out = run(&mut session, &["results"]).await.unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[1].contains("鈴木"));

        let out = run(&mut session, &["finish"]).await.unwrap();
        assert!(out.contains("--yes"));
        assert!(!session.manager.competition().unwrap().is_finished());

        run(&mut session, &["finish", "--yes"]).await.unwrap();
        assert_eq!(session.manager.storage().history().len(), 1);
        assert!(run(&mut session, &["shot", "田中", "1", "3", "hit"]).await.is_err());
    }

    #[tokio::test]
    async fn test_resolve_participant() {
        let mut session = session();
        run(&mut session, &["new", "大会"]).await.unwrap();
        run(&mut session, &["add", "A", "1"]).await.unwrap();
        run(&mut session, &["add", "A", "2"]).await.unwrap();

        let err = run(&mut session, &["remove", "A"]).await.unwrap_err();
        assert!(err.to_string().contains("Several participants"));
        run(&mut session, &["remove", "1"]).await.unwrap();
        assert_eq!(session.manager.competition().unwrap().participants.len(), 1);
        assert!(run(&mut session, &["remove", "9"]).await.is_err());
    }

    #[tokio::test]
    async fn test_masters_flow() {
        let mut session = session();
        run(&mut session, &["masters", "add", "佐藤", "4"]).await.unwrap();
        run(&mut session, &["new", "大会"]).await.unwrap();
        let out = run(&mut session, &["add-master", "佐藤"]).await.unwrap();
        assert!(out.starts_with("Added 佐藤"));

        let out = run(&mut session, &["masters"]).await.unwrap();
        assert!(out.contains("used   1"));

        let id = session.manager.storage().all_masters()[0].id.clone();
        let out = run(&mut session, &["masters", "toggle", &id]).await.unwrap();
        assert!(out.contains("inactive"));
        let out = run(&mut session, &["masters"]).await.unwrap();
        assert!(out.contains("(1 inactive)"));
    }

    #[tokio::test]
    async fn test_commands_without_competition() {
        let mut session = session();
        let out = run(&mut session, &[]).await.unwrap();
        assert!(out.contains("No active competition"));
        assert!(run(&mut session, &["results"]).await.is_err());
        assert!(run(&mut session, &["add", "田中", "3"]).await.is_err());
    }

    #[tokio::test]
    async fn test_export_and_import_files() {
        let dir = std::env::temp_dir().join(format!("rz-cli-{}", uuid_like()));
        std::fs::create_dir_all(&dir).unwrap();
        let out_dir = dir.to_string_lossy().into_owned();

        let mut session = session();
        run(&mut session, &["new", "--date", "2024-10-13", "秋"]).await.unwrap();
        run(&mut session, &["add", "田中", "3"]).await.unwrap();
        run(&mut session, &["export-csv", "--out", &out_dir]).await.unwrap();
        assert!(dir.join("立禅の会20241013.csv").exists());

        run(&mut session, &["export-json", "--out", &out_dir]).await.unwrap();
        let file = dir.join("秋-2024-10-13.json");
        assert!(file.exists());

        let mut other = self::session();
        let out = run(&mut other, &["import", &file.to_string_lossy()]).await.unwrap();
        assert_eq!(out, "Imported 1 competitions into history\n");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    fn uuid_like() -> String {
        format!(
            "{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or_default()
        )
    }
}
