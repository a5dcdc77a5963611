use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::overs;
use crate::scoring::{BatsmanDelta, BowlerDelta};

/// Cumulative batting figures. Mutated only through applied score updates so
/// the totals always equal a recompute from the delivery history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattingStats {
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub not_out: bool,
}

impl Default for BattingStats {
    fn default() -> Self {
        Self { runs: 0, balls: 0, fours: 0, sixes: 0, not_out: true }
    }
}

impl BattingStats {
    pub fn apply(&mut self, delta: &BatsmanDelta) {
        add_signed(&mut self.runs, delta.runs);
        add_signed(&mut self.balls, delta.balls);
        add_signed(&mut self.fours, delta.fours);
        add_signed(&mut self.sixes, delta.sixes);
    }

    pub fn strike_rate(&self) -> f32 {
        if self.balls == 0 {
            return 0.0;
        }
        self.runs as f32 / self.balls as f32 * 100.0
    }
}

/// Cumulative bowling figures with the balls column kept in 0..=5.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlingStats {
    pub overs: u32,
    /// Balls of the in-progress over, 0..=5.
    pub balls: u8,
    pub maidens: u32,
    pub runs: u32,
    pub wickets: u32,
}

impl BowlingStats {
    /// Apply one delivery's delta. A positive balls delta rolls into the
    /// overs column at 6; a negative one borrows back from it.
    pub fn apply(&mut self, delta: &BowlerDelta) -> Result<()> {
        add_signed(&mut self.runs, delta.runs);
        add_signed(&mut self.wickets, delta.wickets);
        add_signed(&mut self.maidens, delta.maiden_overs);
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

    pub fn economy(&self) -> f32 {
        let balls = self.overs * overs::BALLS_PER_OVER + u32::from(self.balls);
        if balls == 0 {
            return 0.0;
        }
        self.runs as f32 * overs::BALLS_PER_OVER as f32 / balls as f32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    pub team_id: String,
    #[serde(default)]
    pub batting_stats: BattingStats,
    #[serde(default)]
    pub bowling_stats: BowlingStats,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>, team_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            team_id: team_id.into(),
            batting_stats: BattingStats::default(),
            bowling_stats: BowlingStats::default(),
        }
    }
}

fn add_signed(value: &mut u32, delta: i32) {
    let next = i64::from(*value) + i64::from(delta);
    *value = next.max(0) as u32;
}
