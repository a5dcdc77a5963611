use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};
use crate::overs::OverBall;

/// Classification of a single ball bowled.
///
/// Wides and no-balls are illegal deliveries: they never count toward the
/// 6-ball over. Byes and leg-byes are legal deliveries whose runs go to the
/// extras column instead of the batsman.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryKind {
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "wide")]
    Wide,
    #[serde(rename = "noball")]
    NoBall,
    #[serde(rename = "bye")]
    Bye,
    #[serde(rename = "legbye")]
    LegBye,
}

impl DeliveryKind {
    /// Whether this delivery counts toward the 6-ball over.
    pub fn is_legal(&self) -> bool {
        !matches!(self, DeliveryKind::Wide | DeliveryKind::NoBall)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryOutcome {
    #[serde(rename = "run")]
    Run,
    #[serde(rename = "wicket")]
    Wicket,
    #[serde(rename = "dot")]
    Dot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WicketKind {
    #[serde(rename = "bowled")]
    Bowled,
    #[serde(rename = "caught")]
    Caught,
    #[serde(rename = "lbw")]
    Lbw,
    #[serde(rename = "run_out")]
    RunOut,
    #[serde(rename = "stumped")]
    Stumped,
    #[serde(rename = "hit_wicket")]
    HitWicket,
    #[serde(rename = "retired_hurt")]
    RetiredHurt,
    #[serde(rename = "obstructing_field")]
    ObstructingField,
    #[serde(rename = "timed_out")]
    TimedOut,
    #[serde(rename = "handled_ball")]
    HandledBall,
}

impl WicketKind {
    /// Run-outs are the one dismissal the bowler gets no credit for.
    pub fn credits_bowler(&self) -> bool {
        !matches!(self, WicketKind::RunOut)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wicket {
    #[serde(rename = "type")]
    pub kind: WicketKind,
    pub player_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fielder_id: Option<String>,
}

/// Per-delivery extras breakdown. At most one sub-field is populated for a
/// given delivery kind (a no-ball may additionally carry byes or leg-byes
/// run off it).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryExtras {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wide: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_ball: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bye: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leg_bye: Option<u32>,
}

impl DeliveryExtras {
    pub fn is_empty(&self) -> bool {
        self.wide.is_none()
            && self.no_ball.is_none()
            && self.bye.is_none()
            && self.leg_bye.is_none()
    }
}

/// Raw delivery event as supplied by the scorer.
///
/// This is the input to the scoring engine; it carries no over/ball slot.
/// The slot is assigned when the delivery is recorded (see
/// [`crate::overs::next_slot`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPayload {
    pub match_id: String,
    #[serde(rename = "deliveryType")]
    pub kind: DeliveryKind,
    pub outcome: DeliveryOutcome,
    pub runs: u32,
    #[serde(default)]
    pub is_overthrow: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overthrow_runs: Option<u32>,
    #[serde(default)]
    pub is_boundary: bool,
    #[serde(default)]
    pub is_six: bool,
    pub batsman_id: String,
    pub bowler_id: String,
    pub non_striker_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wicket: Option<Wicket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<DeliveryExtras>,
}

impl DeliveryPayload {
    /// Base runs plus overthrow runs, the quantity the scoring table works on.
    pub fn total_runs(&self) -> u32 {
        let overthrows =
            if self.is_overthrow { self.overthrow_runs.unwrap_or(0) } else { 0 };
        self.runs + overthrows
    }

    /// Whether the batsman is credited with runs off this delivery: a normal
    /// ball, or the runs-off-the-bat branch of a no-ball.
    pub fn credits_batsman(&self) -> bool {
        match self.kind {
            DeliveryKind::Normal => true,
            DeliveryKind::NoBall => {
                let byes = self.extras.map(|e| e.bye.is_some() || e.leg_bye.is_some());
                !byes.unwrap_or(false)
            }
            _ => false,
        }
    }

    /// Reject malformed or internally inconsistent payloads before any
    /// mutation is attempted.
    pub fn validate(&self) -> Result<()> {
        if self.match_id.is_empty() {
            return Err(ScoringError::validation("matchId is required"));
        }
        for (field, value) in [
            ("batsmanId", &self.batsman_id),
            ("bowlerId", &self.bowler_id),
            ("nonStrikerId", &self.non_striker_id),
        ] {
            if value.is_empty() {
                return Err(ScoringError::validation(format!("{field} is required")));
            }
        }
        if self.batsman_id == self.non_striker_id {
            return Err(ScoringError::validation(
                "batsman and non-striker must be different players",
            ));
        }

        if self.is_overthrow && self.overthrow_runs.is_none() {
            return Err(ScoringError::validation(
                "overthrowRuns is required when isOverthrow is set",
            ));
        }
        if !self.is_overthrow && self.overthrow_runs.is_some() {
            return Err(ScoringError::validation(
                "overthrowRuns given without isOverthrow",
            ));
        }

        // Illegal deliveries always concede at least the one penalty run.
        if !self.kind.is_legal() && self.total_runs() == 0 {
            return Err(ScoringError::validation(
                "wide and no-ball deliveries carry at least one run",
            ));
        }

        match (&self.wicket, self.outcome) {
            (Some(_), DeliveryOutcome::Wicket) | (None, DeliveryOutcome::Run | DeliveryOutcome::Dot) => {}
            (Some(_), _) => {
                return Err(ScoringError::validation(
                    "wicket details present but outcome is not 'wicket'",
                ))
            }
            (None, DeliveryOutcome::Wicket) => {
                return Err(ScoringError::validation(
                    "outcome is 'wicket' but no wicket details given",
                ))
            }
        }

        if self.is_boundary && self.is_six {
            return Err(ScoringError::validation(
                "a delivery cannot be both a four and a six",
            ));
        }
        if (self.is_boundary || self.is_six) && !self.credits_batsman() {
            return Err(ScoringError::validation(
                "boundary flags only apply when the batsman is credited with runs",
            ));
        }

        self.validate_extras()
    }

    fn validate_extras(&self) -> Result<()> {
        let extras = match self.extras {
            Some(e) if !e.is_empty() => e,
            _ => return Ok(()),
        };
        let total = self.total_runs();

        let reject = |reason: &str| Err(ScoringError::validation(reason.to_string()));
        match self.kind {
            DeliveryKind::Normal => reject("extras present on a normal delivery"),
            DeliveryKind::Wide => {
                if extras.no_ball.is_some() || extras.bye.is_some() || extras.leg_bye.is_some() {
                    return reject("only the wide extras field applies to a wide");
                }
                match extras.wide {
                    Some(w) if w != total => reject("wide extras must equal the total runs"),
                    _ => Ok(()),
                }
            }
            DeliveryKind::NoBall => {
                if extras.wide.is_some() {
                    return reject("wide extras do not apply to a no-ball");
                }
                if matches!(extras.no_ball, Some(n) if n != 1) {
                    return reject("no-ball extras carry exactly the one penalty run");
                }
                if extras.bye.is_some() && extras.leg_bye.is_some() {
                    return reject("a no-ball cannot carry both byes and leg-byes");
                }
                let off_ball = extras.bye.or(extras.leg_bye);
                match off_ball {
                    Some(n) if n != total - 1 => {
                        reject("byes off a no-ball must equal the runs beyond the penalty")
                    }
                    _ => Ok(()),
                }
            }
            DeliveryKind::Bye => {
                if extras.wide.is_some() || extras.no_ball.is_some() || extras.leg_bye.is_some() {
                    return reject("only the bye extras field applies to a bye");
                }
                match extras.bye {
                    Some(b) if b != total => reject("bye extras must equal the total runs"),
                    _ => Ok(()),
                }
            }
            DeliveryKind::LegBye => {
                if extras.wide.is_some() || extras.no_ball.is_some() || extras.bye.is_some() {
                    return reject("only the leg-bye extras field applies to a leg-bye");
                }
                match extras.leg_bye {
                    Some(b) if b != total => reject("leg-bye extras must equal the total runs"),
                    _ => Ok(()),
                }
            }
        }
    }
}

/// A recorded ball. Immutable once created; the only lifecycle transition is
/// deletion, which drives the exact inverse of the score update that was
/// applied when it was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: String,
    pub match_id: String,
    /// 1 or 2.
    pub innings: u8,
    #[serde(flatten)]
    pub slot: OverBall,
    pub batsman_id: String,
    pub bowler_id: String,
    pub non_striker_id: String,
    #[serde(rename = "deliveryType")]
    pub kind: DeliveryKind,
    pub outcome: DeliveryOutcome,
    pub runs: u32,
    pub is_overthrow: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overthrow_runs: Option<u32>,
    pub is_boundary: bool,
    pub is_six: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wicket: Option<Wicket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<DeliveryExtras>,
    /// Informational only; never consulted by rule logic.
    pub timestamp: DateTime<Utc>,
}

impl Delivery {
    /// Rebuild the raw event this record was created from, so the same
    /// scoring rules can be run backwards for reversal.
    pub fn payload(&self) -> DeliveryPayload {
        DeliveryPayload {
            match_id: self.match_id.clone(),
            kind: self.kind,
            outcome: self.outcome,
            runs: self.runs,
            is_overthrow: self.is_overthrow,
            overthrow_runs: self.overthrow_runs,
            is_boundary: self.is_boundary,
            is_six: self.is_six,
            batsman_id: self.batsman_id.clone(),
            bowler_id: self.bowler_id.clone(),
            non_striker_id: self.non_striker_id.clone(),
            wicket: self.wicket.clone(),
            extras: self.extras,
        }
    }

    pub fn total_runs(&self) -> u32 {
        let overthrows =
            if self.is_overthrow { self.overthrow_runs.unwrap_or(0) } else { 0 };
        self.runs + overthrows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_payload() -> DeliveryPayload {
        DeliveryPayload {
            match_id: "m1".to_string(),
            kind: DeliveryKind::Normal,
            outcome: DeliveryOutcome::Run,
            runs: 1,
            is_overthrow: false,
            overthrow_runs: None,
            is_boundary: false,
            is_six: false,
            batsman_id: "bat1".to_string(),
            bowler_id: "bowl1".to_string(),
            non_striker_id: "bat2".to_string(),
            wicket: None,
            extras: None,
        }
    }

    #[test]
    fn test_valid_normal_payload() {
        assert!(base_payload().validate().is_ok());
    }

    #[test]
    fn test_missing_participant_rejected() {
        let mut payload = base_payload();
        payload.bowler_id = String::new();
        assert!(matches!(
            payload.validate(),
            Err(crate::error::ScoringError::Validation { .. })
        ));
    }

    #[test]
    fn test_striker_equals_non_striker_rejected() {
        let mut payload = base_payload();
        payload.non_striker_id = payload.batsman_id.clone();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_overthrow_consistency() {
        let mut payload = base_payload();
        payload.is_overthrow = true;
        assert!(payload.validate().is_err());

        payload.overthrow_runs = Some(2);
        assert!(payload.validate().is_ok());
        assert_eq!(payload.total_runs(), 3);

        payload.is_overthrow = false;
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_wide_needs_at_least_one_run() {
        let mut payload = base_payload();
        payload.kind = DeliveryKind::Wide;
        payload.runs = 0;
        assert!(payload.validate().is_err());

        payload.runs = 1;
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_extras_must_match_kind() {
        let mut payload = base_payload();
        payload.extras =
            Some(DeliveryExtras { bye: Some(1), ..Default::default() });
        assert!(payload.validate().is_err(), "extras on a normal delivery");

        payload.kind = DeliveryKind::Bye;
        assert!(payload.validate().is_ok());

        payload.extras =
            Some(DeliveryExtras { bye: Some(3), ..Default::default() });
        assert!(payload.validate().is_err(), "bye amount must match total runs");
    }

    #[test]
    fn test_boundary_flag_rejected_on_wide() {
        let mut payload = base_payload();
        payload.kind = DeliveryKind::Wide;
        payload.is_boundary = true;
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_wicket_requires_wicket_outcome() {
        let mut payload = base_payload();
        payload.wicket = Some(Wicket {
            kind: WicketKind::Bowled,
            player_id: "bat1".to_string(),
            fielder_id: None,
        });
        assert!(payload.validate().is_err());

        payload.outcome = DeliveryOutcome::Wicket;
        assert!(payload.validate().is_ok());

        payload.wicket = None;
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_no_ball_bye_extras() {
        let mut payload = base_payload();
        payload.kind = DeliveryKind::NoBall;
        payload.runs = 3;
        payload.extras =
            Some(DeliveryExtras { bye: Some(2), ..Default::default() });
        assert!(payload.validate().is_ok());
        assert!(!payload.credits_batsman());

        // Byes must account for everything beyond the penalty run.
        payload.extras =
            Some(DeliveryExtras { bye: Some(1), ..Default::default() });
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_wire_names_round_trip() {
        let payload = base_payload();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["deliveryType"], "normal");
        assert_eq!(json["batsmanId"], "bat1");

        let back: DeliveryPayload = serde_json::from_value(json).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn test_wicket_kind_bowler_credit() {
        assert!(WicketKind::Bowled.credits_bowler());
        assert!(WicketKind::Stumped.credits_bowler());
        assert!(!WicketKind::RunOut.credits_bowler());
    }
}
