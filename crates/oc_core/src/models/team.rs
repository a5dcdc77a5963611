use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::overs;
use crate::scoring::{ExtrasDelta, TeamDelta};

/// The batting team's running score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScore {
    pub runs: u32,
    pub wickets: u32,
    pub overs: u32,
    /// Balls of the in-progress over, 0..=5.
    pub balls: u8,
}

impl TeamScore {
    /// Apply one delivery's delta with combined over/ball rollover.
    pub fn apply(&mut self, delta: &TeamDelta) -> Result<()> {
        add_signed(&mut self.runs, delta.runs);
        add_signed(&mut self.wickets, delta.wickets);
        if delta.balls > 0 {
            let (overs, balls) = overs::advance(self.overs, self.balls, delta.balls as u32);
            self.overs = overs;
            self.balls = balls;
        } else if delta.balls < 0 {
            let (overs, balls) = overs::rewind(self.overs, self.balls)?;
            self.overs = overs;
            self.balls = balls;
        }
        Ok(())
    }
}

/// Innings-level extras breakdown; `total` is maintained as the sum of the
/// four sub-fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtrasTally {
    pub wide: u32,
    pub no_ball: u32,
    pub bye: u32,
    pub leg_bye: u32,
    pub total: u32,
}

impl ExtrasTally {
    pub fn apply(&mut self, delta: &ExtrasDelta) {
        add_signed(&mut self.wide, delta.wide);
        add_signed(&mut self.no_ball, delta.no_ball);
        add_signed(&mut self.bye, delta.bye);
        add_signed(&mut self.leg_bye, delta.leg_bye);
        add_signed(&mut self.total, delta.total);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    /// Player ids in squad order.
    pub players: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captain_id: Option<String>,
    #[serde(default)]
    pub score: TeamScore,
    #[serde(default)]
    pub extras: ExtrasTally,
}

impl Team {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            players: Vec::new(),
            captain_id: None,
            score: TeamScore::default(),
            extras: ExtrasTally::default(),
        }
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p == player_id)
    }
}

fn add_signed(value: &mut u32, delta: i32) {
    let next = i64::from(*value) + i64::from(delta);
    *value = next.max(0) as u32;
}
