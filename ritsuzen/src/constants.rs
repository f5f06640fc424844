//! Fixed domain constants shared across the crate.

/// Shots fired by each participant in one round (立).
pub const SHOTS_PER_ROUND: usize = 4;

/// Rounds count a competition may be created with.
pub const ROUNDS_OPTIONS: [u32; 5] = [5, 10, 15, 20, 25];

/// Rounds count used when none is configured.
pub const DEFAULT_ROUNDS_COUNT: u32 = 5;

/// Lowest selectable grade (段位).
pub const MIN_RANK: u32 = 1;

/// Highest selectable grade (段位).
pub const MAX_RANK: u32 = 8;

/// Handicap points per grade. A grade-3 participant carries -6.
pub const HANDICAP_PER_RANK: i32 = -2;

/// Group size used by auto-grouping when none is configured.
pub const DEFAULT_GROUP_SIZE: usize = 5;

/// Finished competitions kept in the history, most recent first.
pub const MAX_COMPETITION_HISTORY: usize = 30;

/// Key of the root JSON blob in the storage port.
pub const STORAGE_KEY: &str = "ritsuzen-app-data";

/// Version tag written into every export file.
pub const EXPORT_VERSION: &str = "1.0";

/// Application version reported in export metadata.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of places highlighted in result sheets.
pub const HIGHLIGHTED_PLACES: u32 = 3;
