//! Innings state reconstruction: derive the live view (current slot, the
//! pair at the crease, current bowler, active partnership) from the ordered
//! delivery history. Read-only; never touches the aggregates.

use serde::{Deserialize, Serialize};

use crate::models::Delivery;
use crate::overs::OverBall;

/// Runs and legal balls since the last fall of wicket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partnership {
    pub runs: u32,
    pub balls: u32,
}

/// Live state of an innings, reconstructed from its delivery history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InningsState {
    /// Slot of the most recent delivery; `None` before the first ball.
    pub current_slot: Option<OverBall>,
    /// The two most recently seen distinct batsmen, most recent striker
    /// first. Fewer than two entries only at the very start of an innings.
    pub current_batsmen: Vec<String>,
    /// Bowler of the most recent delivery.
    pub current_bowler: Option<String>,
    pub partnership: Partnership,
}

impl InningsState {
    /// Reconstruct from deliveries ordered by (over, ball, insertion).
    pub fn reconstruct(deliveries: &[Delivery]) -> Self {
        let Some(last) = deliveries.last() else {
            return Self::default();
        };

        Self {
            current_slot: Some(last.slot),
            current_batsmen: recent_batsmen(deliveries),
            current_bowler: Some(last.bowler_id.clone()),
            partnership: partnership(deliveries),
        }
    }

    /// Deliveries of the over in progress, for the recent-balls strip of a
    /// scorecard.
    pub fn current_over<'a>(&self, deliveries: &'a [Delivery]) -> Vec<&'a Delivery> {
        let Some(slot) = self.current_slot else {
            return Vec::new();
        };
        deliveries.iter().filter(|d| d.slot.over == slot.over).collect()
    }
}

/// Scan backward collecting striker then non-striker per delivery until two
/// distinct player ids are found.
fn recent_batsmen(deliveries: &[Delivery]) -> Vec<String> {
    let mut batsmen: Vec<String> = Vec::with_capacity(2);
    for delivery in deliveries.iter().rev() {
        for id in [&delivery.batsman_id, &delivery.non_striker_id] {
            if !batsmen.iter().any(|b| b == id) {
                batsmen.push(id.clone());
                if batsmen.len() == 2 {
                    return batsmen;
                }
            }
        }
    }
    batsmen
}

/// Sum runs and count legal balls strictly after the last wicket-taking
/// delivery, or over the whole innings if no wicket has fallen.
fn partnership(deliveries: &[Delivery]) -> Partnership {
    let start = deliveries
        .iter()
        .rposition(|d| d.wicket.is_some())
        .map(|idx| idx + 1)
        .unwrap_or(0);

    let mut partnership = Partnership::default();
    for delivery in &deliveries[start..] {
        partnership.runs += delivery.runs;
        if delivery.kind.is_legal() {
            partnership.balls += 1;
        }
    }
    partnership
}
