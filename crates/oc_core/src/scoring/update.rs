use serde::{Deserialize, Serialize};

/// Deltas applied to the batting team's running score for one delivery.
///
/// All fields are increments, never absolute values. `overs` is always 0 out
/// of the engine: the overs column only moves through the combined rollover
/// in [`crate::overs::advance`] when `balls` carries past 6.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDelta {
    pub runs: i32,
    pub wickets: i32,
    pub overs: i32,
    pub balls: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatsmanDelta {
    pub runs: i32,
    pub balls: i32,
    pub fours: i32,
    pub sixes: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BowlerDelta {
    pub overs: i32,
    pub balls: i32,
    pub runs: i32,
    pub wickets: i32,
    /// Maiden detection needs the whole over's history, which the per-ball
    /// engine does not see. Carried so the delta shape matches the bowling
    /// figures it applies to; always 0 out of the engine.
    pub maiden_overs: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtrasDelta {
    pub wide: i32,
    pub no_ball: i32,
    pub bye: i32,
    pub leg_bye: i32,
    pub total: i32,
}

/// The full set of stat deltas one delivery produces, for the batting team,
/// the striker, the bowler, and the extras column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub team: TeamDelta,
    pub batsman: BatsmanDelta,
    pub bowler: BowlerDelta,
    pub extras: ExtrasDelta,
}

impl ScoreUpdate {
    /// The exact inverse: applying `u` then `u.negated()` to any aggregate
    /// leaves it unchanged.
    pub fn negated(&self) -> Self {
        Self {
            team: TeamDelta {
                runs: -self.team.runs,
                wickets: -self.team.wickets,
                overs: -self.team.overs,
                balls: -self.team.balls,
            },
            batsman: BatsmanDelta {
                runs: -self.batsman.runs,
                balls: -self.batsman.balls,
                fours: -self.batsman.fours,
                sixes: -self.batsman.sixes,
            },
            bowler: BowlerDelta {
                overs: -self.bowler.overs,
                balls: -self.bowler.balls,
                runs: -self.bowler.runs,
                wickets: -self.bowler.wickets,
                maiden_overs: -self.bowler.maiden_overs,
            },
            extras: ExtrasDelta {
                wide: -self.extras.wide,
                no_ball: -self.extras.no_ball,
                bye: -self.extras.bye,
                leg_bye: -self.extras.leg_bye,
                total: -self.extras.total,
            },
        }
    }
}
