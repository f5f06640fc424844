//! Scoring model and ranking engine.
//!
//! This module provides:
//! - Shot, round and participant record models
//! - Pure recomputation of hits, hit rate, handicap and adjusted score
//! - Competition-style ranking by raw and handicap-adjusted score

pub mod calculations;
pub mod models;
pub mod ranking;

pub use calculations::{
    calculate_adjusted_score, calculate_handicap, calculate_hit_rate, calculate_round_hits,
    calculate_total_hits, initialize_record, recompute_record,
};
pub use models::{ParticipantId, ParticipantRecord, Round, ShotOutcome};
pub use ranking::{format_rank, rank_records, sort_records_by_score};
