//! The delivery scoring engine and its delta types.

pub mod engine;
pub mod update;

pub use engine::{compute_score_update, reversal_update};
pub use update::{BatsmanDelta, BowlerDelta, ExtrasDelta, ScoreUpdate, TeamDelta};
