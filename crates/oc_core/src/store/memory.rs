use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use crate::error::{Result, ScoringError};
use crate::models::{Delivery, Match, Player, Team};
use crate::scoring::{BatsmanDelta, BowlerDelta, ExtrasDelta, TeamDelta};
use crate::store::{DeliveryStore, MatchStore, PlayerStore, TeamStore};

/// Everything the store holds, cloneable so a transaction can snapshot it.
#[derive(Debug, Clone, Default)]
struct StoreState {
    matches: HashMap<String, Match>,
    players: HashMap<String, Player>,
    teams: HashMap<String, Team>,
    /// Insertion order; within one innings this coincides with
    /// (over, ball, within-slot) order.
    deliveries: Vec<Delivery>,
}

/// In-memory implementation of the four collaborator stores.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: StoreState,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a transaction. Mutations made through the guard become
    /// permanent on [`Transaction::commit`]; dropping the guard without
    /// committing rolls every one of them back.
    pub fn begin(&mut self) -> Transaction<'_> {
        let snapshot = self.state.clone();
        Transaction { store: self, snapshot: Some(snapshot), committed: false }
    }
}

impl MatchStore for MemoryStore {
    fn get_match(&self, id: &str) -> Result<Match> {
        self.state
            .matches
            .get(id)
            .cloned()
            .ok_or_else(|| ScoringError::not_found("match", id))
    }

    fn put_match(&mut self, m: Match) -> Result<()> {
        self.state.matches.insert(m.id.clone(), m);
        Ok(())
    }
}

impl PlayerStore for MemoryStore {
    fn get_player(&self, id: &str) -> Result<Player> {
        self.state
            .players
            .get(id)
            .cloned()
            .ok_or_else(|| ScoringError::not_found("player", id))
    }

    fn put_player(&mut self, player: Player) -> Result<()> {
        self.state.players.insert(player.id.clone(), player);
        Ok(())
    }

    fn apply_player_delta(
        &mut self,
        id: &str,
        batting: Option<&BatsmanDelta>,
        bowling: Option<&BowlerDelta>,
    ) -> Result<()> {
        let player = self
            .state
            .players
            .get_mut(id)
            .ok_or_else(|| ScoringError::not_found("player", id))?;
        if let Some(delta) = batting {
            player.batting_stats.apply(delta);
        }
        if let Some(delta) = bowling {
            player.bowling_stats.apply(delta)?;
        }
        Ok(())
    }

    fn set_not_out(&mut self, id: &str, not_out: bool) -> Result<()> {
        let player = self
            .state
            .players
            .get_mut(id)
            .ok_or_else(|| ScoringError::not_found("player", id))?;
        player.batting_stats.not_out = not_out;
        Ok(())
    }
}

impl TeamStore for MemoryStore {
    fn get_team(&self, id: &str) -> Result<Team> {
        self.state
            .teams
            .get(id)
            .cloned()
            .ok_or_else(|| ScoringError::not_found("team", id))
    }

    fn put_team(&mut self, team: Team) -> Result<()> {
        self.state.teams.insert(team.id.clone(), team);
        Ok(())
    }

    fn apply_team_delta(
        &mut self,
        id: &str,
        score: &TeamDelta,
        extras: &ExtrasDelta,
    ) -> Result<()> {
        let team = self
            .state
            .teams
            .get_mut(id)
            .ok_or_else(|| ScoringError::not_found("team", id))?;
        team.score.apply(score)?;
        team.extras.apply(extras);
        Ok(())
    }
}

impl DeliveryStore for MemoryStore {
    fn list_deliveries(
        &self,
        match_id: &str,
        innings: u8,
        over: Option<u32>,
    ) -> Result<Vec<Delivery>> {
        let mut deliveries: Vec<Delivery> = self
            .state
            .deliveries
            .iter()
            .filter(|d| d.match_id == match_id && d.innings == innings)
            .filter(|d| over.map_or(true, |o| d.slot.over == o))
            .cloned()
            .collect();
        // Stable sort keeps within-slot insertion order for wides/no-balls.
        deliveries.sort_by_key(|d| d.slot);
        Ok(deliveries)
    }

    fn last_delivery(&self, match_id: &str, innings: u8) -> Result<Option<Delivery>> {
        Ok(self
            .state
            .deliveries
            .iter()
            .filter(|d| d.match_id == match_id && d.innings == innings)
            .max_by_key(|d| d.slot)
            .cloned())
    }

    fn get_delivery(&self, id: &str) -> Result<Delivery> {
        self.state
            .deliveries
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| ScoringError::not_found("delivery", id))
    }

    fn append_delivery(&mut self, delivery: Delivery) -> Result<String> {
        let id = delivery.id.clone();
        self.state.deliveries.push(delivery);
        Ok(id)
    }

    fn delete_delivery(&mut self, id: &str) -> Result<()> {
        let idx = self
            .state
            .deliveries
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| ScoringError::not_found("delivery", id))?;
        self.state.deliveries.remove(idx);
        Ok(())
    }
}

/// Snapshot-based transaction guard over a [`MemoryStore`].
///
/// One delivery's insert-or-delete plus its three aggregate updates happen
/// inside one guard; any error path simply drops it and the pre-transaction
/// snapshot is restored.
pub struct Transaction<'a> {
    store: &'a mut MemoryStore,
    snapshot: Option<StoreState>,
    committed: bool,
}

impl Transaction<'_> {
    pub fn commit(mut self) {
        self.committed = true;
        self.snapshot = None;
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.committed {
            if let Some(snapshot) = self.snapshot.take() {
                self.store.state = snapshot;
            }
        }
    }
}

impl Deref for Transaction<'_> {
    type Target = MemoryStore;

    fn deref(&self) -> &MemoryStore {
        self.store
    }
}

impl DerefMut for Transaction<'_> {
    fn deref_mut(&mut self) -> &mut MemoryStore {
        self.store
    }
}
