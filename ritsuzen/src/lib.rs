//! # Ritsuzen
//!
//! Scorekeeping core for kyudo-style archery competitions (立禅の会).
//!
//! A competition registers participants with their grade, records the
//! outcome of every shot (four shots per round), and ranks participants by
//! total hits and, optionally, by a grade-based handicap. Participants can
//! be split into groups that shoot in a rotating order.
//!
//! ## Core Modules
//!
//! - [`scoring`]: Per-record calculations and the ranking engine
//! - [`grouping`]: Partitioning participants into shooting groups
//! - [`shooting`]: Firing order per round and next-shot lookup
//! - [`competition`]: Competition state machine and the persisted manager
//!
//! ## Adapters
//!
//! - [`storage`]: Key-value storage port, history and participant roster
//! - [`export`]: JSON export/import and tabular result sheets
//! - [`roster`]: Reusable participant master data
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use ritsuzen::{CompetitionManager, CompetitionSettings, MemoryStorage, ShotOutcome, StorageManager};
//!
//! let mut manager = CompetitionManager::new(StorageManager::new(MemoryStorage::new()));
//! let date = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
//! manager.create_competition(CompetitionSettings::new("月例会", date).with_handicap(true)).unwrap();
//!
//! let tanaka = manager.add_participant("田中", 3).unwrap();
//! manager.update_shot(&tanaka, 1, 0, ShotOutcome::Hit).unwrap();
//!
//! let record = manager.competition().unwrap().record(&tanaka).unwrap();
//! assert_eq!(record.total_hits, 1);
//! assert_eq!(record.adjusted_score, -5);
//! ```

pub mod constants;
pub mod ids;

/// Scoring model and ranking engine.
pub mod scoring;
pub use scoring::{ParticipantRecord, Round, ShotOutcome};

/// Grouping of participants into shooting groups.
pub mod grouping;

/// Shooting order and rotation.
pub mod shooting;
pub use shooting::NextShot;

/// Competition lifecycle.
pub mod competition;
pub use competition::{
    Competition, CompetitionAction, CompetitionError, CompetitionManager, CompetitionSettings,
    CompetitionState, CompetitionStatus, Participant,
};

pub mod roster;
pub use roster::ParticipantMaster;

pub mod storage;
pub use storage::{FileStorage, MemoryStorage, StorageError, StorageManager, StoragePort};

pub mod export;
pub use export::{ExportData, ExportError, ResultSheet, SheetOrder};
