//! Collaborator interfaces for the surrounding storage layer, and an
//! in-memory implementation with transactional (all-or-nothing) semantics
//! used by the service layer and the test suite.
//!
//! A persistent backend replaces [`MemoryStore`] by implementing the same
//! four traits; the scoring rules never know the difference.

mod memory;

pub use memory::{MemoryStore, Transaction};

use crate::error::Result;
use crate::models::{Delivery, Match, Player, Team};
use crate::scoring::{BatsmanDelta, BowlerDelta, ExtrasDelta, TeamDelta};

pub trait MatchStore {
    fn get_match(&self, id: &str) -> Result<Match>;
    fn put_match(&mut self, m: Match) -> Result<()>;
}

pub trait PlayerStore {
    fn get_player(&self, id: &str) -> Result<Player>;
    fn put_player(&mut self, player: Player) -> Result<()>;
    /// Apply batting and/or bowling deltas to one player, with over/ball
    /// rollover handled inside the aggregate.
    fn apply_player_delta(
        &mut self,
        id: &str,
        batting: Option<&BatsmanDelta>,
        bowling: Option<&BowlerDelta>,
    ) -> Result<()>;
    fn set_not_out(&mut self, id: &str, not_out: bool) -> Result<()>;
}

pub trait TeamStore {
    fn get_team(&self, id: &str) -> Result<Team>;
    fn put_team(&mut self, team: Team) -> Result<()>;
    fn apply_team_delta(
        &mut self,
        id: &str,
        score: &TeamDelta,
        extras: &ExtrasDelta,
    ) -> Result<()>;
}

pub trait DeliveryStore {
    /// Deliveries for one innings ordered by (over, ball, insertion),
    /// optionally restricted to a single over.
    fn list_deliveries(
        &self,
        match_id: &str,
        innings: u8,
        over: Option<u32>,
    ) -> Result<Vec<Delivery>>;
    /// The most recently recorded delivery of an innings, if any.
    fn last_delivery(&self, match_id: &str, innings: u8) -> Result<Option<Delivery>>;
    fn get_delivery(&self, id: &str) -> Result<Delivery>;
    fn append_delivery(&mut self, delivery: Delivery) -> Result<String>;
    fn delete_delivery(&mut self, id: &str) -> Result<()>;
}
