//! # oc_core - Ball-by-Ball Cricket Scoring Engine
//!
//! This library records ball-by-ball events in a limited-overs cricket match
//! and derives consistent running statistics for players, teams, and the
//! match itself.
//!
//! ## Features
//! - Pure, deterministic delivery scoring (same event = same deltas)
//! - Exact reversal: removing the last delivery restores every aggregate
//! - Live innings state reconstruction from the delivery history
//! - All-or-nothing application of one delivery's aggregate updates

pub mod error;
pub mod innings;
pub mod models;
pub mod overs;
pub mod scoring;
pub mod service;
pub mod store;

pub use error::{Result, ScoringError};
pub use innings::{InningsState, Partnership};
pub use models::{
    BattingStats, BowlingStats, Delivery, DeliveryExtras, DeliveryKind, DeliveryOutcome,
    DeliveryPayload, ExtrasTally, Match, MatchResult, MatchStatus, Player, Team, TeamScore, Toss,
    TossDecision, Wicket, WicketKind,
};
pub use overs::{next_slot, OverBall, BALLS_PER_OVER};
pub use scoring::{
    compute_score_update, reversal_update, BatsmanDelta, BowlerDelta, ExtrasDelta, ScoreUpdate,
    TeamDelta,
};
pub use service::{MatchSetup, RecordedDelivery, Scorecard, ScoringService};
pub use store::{DeliveryStore, MatchStore, MemoryStore, PlayerStore, TeamStore, Transaction};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
