//! Competition lifecycle: settings, participants, shot entry and results.
//!
//! The [`CompetitionState`] machine applies [`CompetitionAction`]s
//! copy-on-write. [`CompetitionManager`] wraps it with persistence so that
//! every accepted action is written through the injected storage port.
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use ritsuzen::competition::{CompetitionAction, CompetitionSettings, CompetitionState};
//! use ritsuzen::scoring::ShotOutcome;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
//! let state = CompetitionState::new()
//!     .apply(CompetitionAction::Create(CompetitionSettings::new("月例会", date)))
//!     .unwrap()
//!     .apply(CompetitionAction::AddParticipant { name: "田中".to_string(), rank: 3 })
//!     .unwrap();
//!
//! let competition = state.competition.as_ref().unwrap();
//! let participant_id = competition.participants[0].id.clone();
//! let state = state
//!     .apply(CompetitionAction::UpdateShot {
//!         participant_id: participant_id.clone(),
//!         round_number: 1,
//!         shot_index: 0,
//!         outcome: ShotOutcome::Hit,
//!     })
//!     .unwrap();
//!
//! let record = state.competition.as_ref().unwrap().record(&participant_id).unwrap();
//! assert_eq!(record.total_hits, 1);
//! ```

pub mod config;
pub mod errors;
pub mod manager;
pub mod models;
pub mod state_machine;

pub use config::CompetitionSettings;
pub use errors::{CompetitionError, CompetitionResult};
pub use manager::CompetitionManager;
pub use models::{Competition, CompetitionId, CompetitionStatus, CompetitionType, Participant};
pub use state_machine::{CompetitionAction, CompetitionState};
