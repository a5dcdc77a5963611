//! Over/ball slot assignment and rollover arithmetic.
//!
//! Overs are 0-based; balls are 1..=6 within an over for recorded slots.
//! Aggregate counters (team score, bowling figures) keep balls in 0..=5 and
//! carry into the overs column on every 6th legal ball.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};
use crate::models::DeliveryKind;

pub const BALLS_PER_OVER: u32 = 6;

/// The (over, ball) slot a delivery is recorded against.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct OverBall {
    pub over: u32,
    pub ball: u8,
}

impl OverBall {
    pub fn new(over: u32, ball: u8) -> Self {
        Self { over, ball }
    }

    /// The very first delivery of an innings.
    pub fn first() -> Self {
        Self { over: 0, ball: 1 }
    }
}

impl fmt::Display for OverBall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.over, self.ball)
    }
}

/// Slot for the next delivery, given the most recently recorded one.
///
/// A legal delivery after the 6th legal ball of an over starts a new over;
/// an illegal delivery (wide, no-ball) is recorded against the same slot as
/// its predecessor, since it does not consume a ball of the over.
pub fn next_slot(last: Option<OverBall>, kind: DeliveryKind) -> OverBall {
    let Some(prev) = last else {
        return OverBall::first();
    };
    if !kind.is_legal() {
        return prev;
    }
    if u32::from(prev.ball) >= BALLS_PER_OVER {
        OverBall { over: prev.over + 1, ball: 1 }
    } else {
        OverBall { over: prev.over, ball: prev.ball + 1 }
    }
}

/// Add legal balls to an aggregate (overs, balls 0..=5) counter, carrying
/// into the overs column. Applied as one combined operation so the carry can
/// never be double counted.
pub fn advance(overs: u32, balls: u8, delta: u32) -> (u32, u8) {
    let total = u32::from(balls) + delta;
    (overs + total / BALLS_PER_OVER, (total % BALLS_PER_OVER) as u8)
}

/// Remove one legal ball from an aggregate counter. At 0 balls this borrows
/// from the overs column (overs - 1, balls = 5); removing a ball from an
/// untouched counter is a state error.
pub fn rewind(overs: u32, balls: u8) -> Result<(u32, u8)> {
    if balls == 0 {
        if overs == 0 {
            return Err(ScoringError::state(
                "cannot remove a ball from an empty over counter",
            ));
        }
        Ok((overs - 1, (BALLS_PER_OVER - 1) as u8))
    } else {
        Ok((overs, balls - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_delivery_slot() {
        assert_eq!(next_slot(None, DeliveryKind::Normal), OverBall::new(0, 1));
        // Even an opening wide is recorded at 0.1.
        assert_eq!(next_slot(None, DeliveryKind::Wide), OverBall::new(0, 1));
    }

    #[test]
    fn test_legal_ball_increments_within_over() {
        let slot = next_slot(Some(OverBall::new(3, 2)), DeliveryKind::Normal);
        assert_eq!(slot, OverBall::new(3, 3));

        let slot = next_slot(Some(OverBall::new(3, 2)), DeliveryKind::Bye);
        assert_eq!(slot, OverBall::new(3, 3));
    }

    #[test]
    fn test_over_rollover_after_sixth_ball() {
        let slot = next_slot(Some(OverBall::new(4, 6)), DeliveryKind::Normal);
        assert_eq!(slot, OverBall::new(5, 1));
    }

    #[test]
    fn test_illegal_delivery_reuses_slot() {
        let prev = OverBall::new(2, 4);
        assert_eq!(next_slot(Some(prev), DeliveryKind::Wide), prev);
        assert_eq!(next_slot(Some(prev), DeliveryKind::NoBall), prev);

        // Even at the end of the over the slot stays put until a legal ball.
        let prev = OverBall::new(2, 6);
        assert_eq!(next_slot(Some(prev), DeliveryKind::Wide), prev);
    }

    #[test]
    fn test_advance_carries_at_six() {
        assert_eq!(advance(0, 5, 1), (1, 0));
        assert_eq!(advance(7, 3, 1), (7, 4));
        assert_eq!(advance(7, 5, 2), (8, 1));
    }

    #[test]
    fn test_rewind_borrows_from_overs() {
        assert_eq!(rewind(3, 0).unwrap(), (2, 5));
        assert_eq!(rewind(3, 4).unwrap(), (3, 3));
        assert!(rewind(0, 0).is_err());
    }

    #[test]
    fn test_advance_rewind_round_trip() {
        let (overs, balls) = advance(2, 5, 1);
        assert_eq!(rewind(overs, balls).unwrap(), (2, 5));
    }

    #[test]
    fn test_display() {
        assert_eq!(OverBall::new(12, 4).to_string(), "12.4");
    }
}
