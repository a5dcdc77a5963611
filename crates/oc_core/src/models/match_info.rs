use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    #[serde(rename = "upcoming")]
    Upcoming,
    #[serde(rename = "live")]
    Live,
    #[serde(rename = "completed")]
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TossDecision {
    #[serde(rename = "bat")]
    Bat,
    #[serde(rename = "bowl")]
    Bowl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toss {
    pub winner_id: String,
    pub decision: TossDecision,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub winner_id: String,
    /// Free-form margin, e.g. "24 runs" or "6 wickets".
    pub margin: String,
}

/// A limited-overs match between two teams.
///
/// `current_innings` selects which team bats: team1 in the first innings,
/// team2 in the second. Delta attribution for every delivery follows from
/// that selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub name: String,
    pub venue: String,
    pub date: DateTime<Utc>,
    pub team1_id: String,
    pub team2_id: String,
    pub toss: Toss,
    /// 1 or 2.
    pub current_innings: u8,
    /// Scheduled overs per innings.
    pub overs: u32,
    pub status: MatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<MatchResult>,
}

impl Match {
    /// Team id batting in the given innings.
    pub fn batting_team_for(&self, innings: u8) -> &str {
        if innings == 1 {
            &self.team1_id
        } else {
            &self.team2_id
        }
    }

    /// Team id bowling in the given innings.
    pub fn bowling_team_for(&self, innings: u8) -> &str {
        if innings == 1 {
            &self.team2_id
        } else {
            &self.team1_id
        }
    }

    pub fn batting_team(&self) -> &str {
        self.batting_team_for(self.current_innings)
    }

    pub fn bowling_team(&self) -> &str {
        self.bowling_team_for(self.current_innings)
    }

    pub fn ensure_live(&self) -> Result<()> {
        if self.status != MatchStatus::Live {
            return Err(ScoringError::state(format!(
                "match {} is not live",
                self.id
            )));
        }
        Ok(())
    }
}
