//! Caller-side orchestration: recording and removing deliveries against the
//! store, match lifecycle transitions, and the live scorecard view.
//!
//! Every delivery insert-or-delete runs inside one
//! [`Transaction`](crate::store::Transaction) together with its three
//! aggregate updates, so a failure mid-sequence leaves nothing applied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Result, ScoringError};
use crate::innings::{InningsState, Partnership};
use crate::models::{
    BattingStats, BowlingStats, Delivery, DeliveryExtras, DeliveryKind, DeliveryPayload, Match,
    MatchResult, MatchStatus, Player, Team, Toss, Wicket,
};
use crate::overs::{next_slot, OverBall};
use crate::scoring::{compute_score_update, reversal_update, ScoreUpdate};
use crate::store::{DeliveryStore, MatchStore, MemoryStore, PlayerStore, TeamStore};

/// Parameters for creating a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSetup {
    pub name: String,
    pub venue: String,
    pub date: DateTime<Utc>,
    pub team1_id: String,
    pub team2_id: String,
    pub toss: Toss,
    /// Scheduled overs per innings.
    pub overs: u32,
}

/// A recorded delivery together with the deltas that were applied for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedDelivery {
    pub delivery: Delivery,
    pub score_update: ScoreUpdate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatsmanCard {
    pub id: String,
    pub name: String,
    pub stats: BattingStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BowlerCard {
    pub id: String,
    pub name: String,
    pub stats: BowlingStats,
}

/// One ball of the in-progress over, for the recent-balls strip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentBall {
    pub ball: u8,
    #[serde(rename = "type")]
    pub kind: DeliveryKind,
    pub runs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<DeliveryExtras>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wicket: Option<Wicket>,
}

/// Live scorecard for the current innings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scorecard {
    pub match_id: String,
    pub match_name: String,
    pub overs: u32,
    pub current_innings: u8,
    pub status: MatchStatus,
    pub batting_team: Team,
    pub bowling_team_id: String,
    pub bowling_team_name: String,
    pub current_over: u32,
    pub current_ball: u8,
    pub current_batsmen: Vec<BatsmanCard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_bowler: Option<BowlerCard>,
    pub partnership: Partnership,
    pub recent_deliveries: Vec<RecentBall>,
}

/// The scoring service over an in-memory store.
///
/// Owns the aggregates exclusively: player and team totals move only through
/// applied score updates, never ad hoc writes, which keeps the incremental
/// totals provably equal to a recompute from the delivery history.
#[derive(Debug, Default)]
pub struct ScoringService {
    store: MemoryStore,
}

impl ScoringService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: MemoryStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    // ========================
    // Fixture registration
    // ========================

    pub fn register_team(&mut self, team: Team) -> Result<()> {
        self.store.put_team(team)
    }

    pub fn register_player(&mut self, player: Player) -> Result<()> {
        let team_id = player.team_id.clone();
        let player_id = player.id.clone();
        self.store.put_player(player)?;
        let mut team = self.store.get_team(&team_id)?;
        if !team.has_player(&player_id) {
            team.players.push(player_id);
            self.store.put_team(team)?;
        }
        Ok(())
    }

    // ========================
    // Match lifecycle
    // ========================

    pub fn create_match(&mut self, setup: MatchSetup) -> Result<Match> {
        // Both teams must exist before the match references them.
        self.store.get_team(&setup.team1_id)?;
        self.store.get_team(&setup.team2_id)?;

        let m = Match {
            id: Uuid::new_v4().to_string(),
            name: setup.name,
            venue: setup.venue,
            date: setup.date,
            team1_id: setup.team1_id,
            team2_id: setup.team2_id,
            toss: setup.toss,
            current_innings: 1,
            overs: setup.overs,
            status: MatchStatus::Upcoming,
            result: None,
        };
        self.store.put_match(m.clone())?;
        info!(match_id = %m.id, name = %m.name, "match created");
        Ok(m)
    }

    pub fn start_match(&mut self, match_id: &str) -> Result<Match> {
        let mut m = self.store.get_match(match_id)?;
        if m.status != MatchStatus::Upcoming {
            return Err(ScoringError::state(format!(
                "match {match_id} cannot start from {:?}",
                m.status
            )));
        }
        m.status = MatchStatus::Live;
        self.store.put_match(m.clone())?;
        info!(match_id, "match started");
        Ok(m)
    }

    pub fn advance_innings(&mut self, match_id: &str) -> Result<Match> {
        let mut m = self.store.get_match(match_id)?;
        m.ensure_live()?;
        if m.current_innings != 1 {
            return Err(ScoringError::state(format!(
                "match {match_id} is already in the second innings"
            )));
        }
        m.current_innings = 2;
        self.store.put_match(m.clone())?;
        info!(match_id, "second innings started");
        Ok(m)
    }

    pub fn complete_match(&mut self, match_id: &str, result: Option<MatchResult>) -> Result<Match> {
        let mut m = self.store.get_match(match_id)?;
        m.ensure_live()?;
        m.status = MatchStatus::Completed;
        m.result = result;
        self.store.put_match(m.clone())?;
        info!(match_id, "match completed");
        Ok(m)
    }

    // ========================
    // Delivery recording
    // ========================

    /// Score one delivery and apply it: compute the deltas, assign the
    /// (over, ball) slot, update batsman, bowler, and batting team, and
    /// append the record to history. All-or-nothing.
    pub fn record_delivery(&mut self, payload: DeliveryPayload) -> Result<RecordedDelivery> {
        // Pure computation (and validation) before any mutation.
        let update = compute_score_update(&payload)?;

        let mut tx = self.store.begin();

        let m = tx.get_match(&payload.match_id)?;
        m.ensure_live()?;
        let innings = m.current_innings;
        let batting_team_id = m.batting_team().to_string();

        // Participants must resolve before anything is applied.
        tx.get_player(&payload.batsman_id)?;
        tx.get_player(&payload.bowler_id)?;
        tx.get_player(&payload.non_striker_id)?;

        let last = tx.last_delivery(&payload.match_id, innings)?;
        let slot = next_slot(last.map(|d| d.slot), payload.kind);

        tx.apply_player_delta(&payload.batsman_id, Some(&update.batsman), None)?;
        tx.apply_player_delta(&payload.bowler_id, None, Some(&update.bowler))?;
        tx.apply_team_delta(&batting_team_id, &update.team, &update.extras)?;
        if let Some(wicket) = &payload.wicket {
            tx.set_not_out(&wicket.player_id, false)?;
        }

        let delivery = Delivery {
            id: Uuid::new_v4().to_string(),
            match_id: payload.match_id.clone(),
            innings,
            slot,
            batsman_id: payload.batsman_id.clone(),
            bowler_id: payload.bowler_id.clone(),
            non_striker_id: payload.non_striker_id.clone(),
            kind: payload.kind,
            outcome: payload.outcome,
            runs: payload.runs,
            is_overthrow: payload.is_overthrow,
            overthrow_runs: payload.overthrow_runs,
            is_boundary: payload.is_boundary,
            is_six: payload.is_six,
            wicket: payload.wicket.clone(),
            extras: payload.extras,
            timestamp: Utc::now(),
        };
        tx.append_delivery(delivery.clone())?;
        tx.commit();

        debug!(
            match_id = %delivery.match_id,
            slot = %delivery.slot,
            kind = ?delivery.kind,
            runs = delivery.total_runs(),
            "delivery recorded"
        );
        Ok(RecordedDelivery { delivery, score_update: update })
    }

    /// Undo the most recent delivery of its innings: apply the exact
    /// negation of its original deltas and delete the record.
    ///
    /// Only the most recent delivery may be removed. Removing an interior
    /// ball would leave every later delivery's recorded (over, ball) slot
    /// inconsistent with a recompute, so that request is rejected outright.
    pub fn remove_delivery(&mut self, delivery_id: &str) -> Result<Delivery> {
        let mut tx = self.store.begin();

        let delivery = tx.get_delivery(delivery_id)?;
        let last = tx
            .last_delivery(&delivery.match_id, delivery.innings)?
            .ok_or_else(|| ScoringError::state("innings history is empty"))?;
        if last.id != delivery.id {
            return Err(ScoringError::state(format!(
                "delivery {delivery_id} is not the most recent of innings {}; \
                 only the last delivery can be removed",
                delivery.innings
            )));
        }

        let m = tx.get_match(&delivery.match_id)?;
        let batting_team_id = m.batting_team_for(delivery.innings).to_string();

        let update = reversal_update(&delivery)?;
        tx.apply_player_delta(&delivery.batsman_id, Some(&update.batsman), None)?;
        tx.apply_player_delta(&delivery.bowler_id, None, Some(&update.bowler))?;
        tx.apply_team_delta(&batting_team_id, &update.team, &update.extras)?;
        if let Some(wicket) = &delivery.wicket {
            tx.set_not_out(&wicket.player_id, true)?;
        }

        tx.delete_delivery(delivery_id)?;
        tx.commit();

        debug!(
            match_id = %delivery.match_id,
            slot = %delivery.slot,
            "delivery removed"
        );
        Ok(delivery)
    }

    /// Ordered delivery history for one innings, optionally one over of it.
    pub fn deliveries(
        &self,
        match_id: &str,
        innings: u8,
        over: Option<u32>,
    ) -> Result<Vec<Delivery>> {
        self.store.list_deliveries(match_id, innings, over)
    }

    // ========================
    // Live scorecard
    // ========================

    /// Read-only live view of the current innings.
    pub fn scorecard(&self, match_id: &str) -> Result<Scorecard> {
        let m = self.store.get_match(match_id)?;
        let batting_team = self.store.get_team(m.batting_team())?;
        let bowling_team = self.store.get_team(m.bowling_team())?;

        let history = self.store.list_deliveries(match_id, m.current_innings, None)?;
        let state = InningsState::reconstruct(&history);

        let current_batsmen = state
            .current_batsmen
            .iter()
            .map(|id| {
                let player = self.store.get_player(id)?;
                Ok(BatsmanCard { id: player.id, name: player.name, stats: player.batting_stats })
            })
            .collect::<Result<Vec<_>>>()?;

        let current_bowler = state
            .current_bowler
            .as_deref()
            .map(|id| {
                let player = self.store.get_player(id)?;
                Ok(BowlerCard { id: player.id, name: player.name, stats: player.bowling_stats })
            })
            .transpose()?;

        let recent_deliveries = state
            .current_over(&history)
            .into_iter()
            .map(|d| RecentBall {
                ball: d.slot.ball,
                kind: d.kind,
                runs: d.runs,
                extras: d.extras,
                wicket: d.wicket.clone(),
            })
            .collect();

        let slot = state.current_slot.unwrap_or(OverBall { over: 0, ball: 0 });
        Ok(Scorecard {
            match_id: m.id,
            match_name: m.name,
            overs: m.overs,
            current_innings: m.current_innings,
            status: m.status,
            batting_team,
            bowling_team_id: bowling_team.id,
            bowling_team_name: bowling_team.name,
            current_over: slot.over,
            current_ball: slot.ball,
            current_batsmen,
            current_bowler,
            partnership: state.partnership,
            recent_deliveries,
        })
    }
}
