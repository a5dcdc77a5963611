//! Data model: deliveries, players, teams, and matches.

pub mod delivery;
pub mod match_info;
pub mod player;
pub mod team;

pub use delivery::{
    Delivery, DeliveryExtras, DeliveryKind, DeliveryOutcome, DeliveryPayload, Wicket, WicketKind,
};
pub use match_info::{Match, MatchResult, MatchStatus, Toss, TossDecision};
pub use player::{BattingStats, BowlingStats, Player};
pub use team::{ExtrasTally, Team, TeamScore};
