//! The delivery scoring engine: one raw ball event in, one set of stat
//! deltas out. Pure and deterministic; the only failure mode is a malformed
//! payload.

use crate::error::Result;
use crate::models::{Delivery, DeliveryKind, DeliveryPayload};
use crate::scoring::update::ScoreUpdate;

/// Compute the stat deltas for one delivery.
///
/// The payload is validated first; nothing is silently coerced. Dispatch is
/// exhaustive over [`DeliveryKind`], so a new kind cannot fall through to a
/// default case.
pub fn compute_score_update(payload: &DeliveryPayload) -> Result<ScoreUpdate> {
    payload.validate()?;

    let total_runs = payload.total_runs();
    let mut update = ScoreUpdate::default();

    match payload.kind {
        DeliveryKind::Normal => score_normal(&mut update, total_runs),
        DeliveryKind::Wide => score_wide(&mut update, total_runs),
        DeliveryKind::NoBall => score_no_ball(payload, &mut update, total_runs),
        DeliveryKind::Bye => score_bye(&mut update, total_runs),
        DeliveryKind::LegBye => score_leg_bye(&mut update, total_runs),
    }

    if let Some(wicket) = &payload.wicket {
        update.team.wickets += 1;
        // Run-outs go against no bowler; every other kind credits exactly one.
        if wicket.kind.credits_bowler() {
            update.bowler.wickets += 1;
        }
    }

    if payload.is_boundary {
        update.batsman.fours += 1;
    }
    if payload.is_six {
        update.batsman.sixes += 1;
    }

    update.extras.total =
        update.extras.wide + update.extras.no_ball + update.extras.bye + update.extras.leg_bye;

    Ok(update)
}

/// Deltas that exactly undo what [`compute_score_update`] produced when this
/// delivery was recorded.
pub fn reversal_update(delivery: &Delivery) -> Result<ScoreUpdate> {
    let update = compute_score_update(&delivery.payload())?;
    Ok(update.negated())
}

/// Everyone is credited: batsman, bowler, and team, and the ball counts.
fn score_normal(update: &mut ScoreUpdate, total_runs: u32) {
    let runs = total_runs as i32;

    update.batsman.runs += runs;
    update.batsman.balls += 1;

    update.bowler.runs += runs;
    update.bowler.balls += 1;

    update.team.runs += runs;
    update.team.balls += 1;
}

/// Wide: not a legal ball. All runs (the mandatory one plus any ran or
/// overthrown) go to the team, the wides column, and against the bowler.
/// The batsman neither scores nor faces a ball.
fn score_wide(update: &mut ScoreUpdate, total_runs: u32) {
    let wide_runs = total_runs.max(1) as i32;

    update.extras.wide += wide_runs;
    update.bowler.runs += wide_runs;
    update.team.runs += wide_runs;
    // team.balls, bowler.balls, batsman.balls all stay 0.
}

/// No-ball: not a legal ball for team or bowler, but the batsman does face
/// it. The one penalty run goes to the no-ball column and against the
/// bowler; the remainder is either runs off the bat or byes/leg-byes.
fn score_no_ball(payload: &DeliveryPayload, update: &mut ScoreUpdate, total_runs: u32) {
    let penalty = 1;
    let beyond_penalty = (total_runs - 1) as i32;

    update.extras.no_ball += penalty;
    update.bowler.runs += penalty;
    update.team.runs += total_runs as i32;
    update.batsman.balls += 1;

    let extras = payload.extras.unwrap_or_default();
    if extras.bye.is_some() {
        update.extras.bye += beyond_penalty;
    } else if extras.leg_bye.is_some() {
        update.extras.leg_bye += beyond_penalty;
    } else {
        update.batsman.runs += beyond_penalty;
    }
}

/// Bye: a legal ball the batsman missed; runs go to extras and the team,
/// never against the bowler.
fn score_bye(update: &mut ScoreUpdate, total_runs: u32) {
    let runs = total_runs as i32;

    update.batsman.balls += 1;
    update.bowler.balls += 1;
    update.extras.bye += runs;
    update.team.runs += runs;
    update.team.balls += 1;
}

/// Leg-bye: scored off the body; same shape as a bye in every other respect.
fn score_leg_bye(update: &mut ScoreUpdate, total_runs: u32) {
    let runs = total_runs as i32;

    update.batsman.balls += 1;
    update.bowler.balls += 1;
    update.extras.leg_bye += runs;
    update.team.runs += runs;
    update.team.balls += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeliveryExtras, DeliveryOutcome, Wicket, WicketKind};

    fn payload(kind: DeliveryKind, runs: u32) -> DeliveryPayload {
        DeliveryPayload {
            match_id: "m1".to_string(),
            kind,
            outcome: DeliveryOutcome::Run,
            runs,
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

    fn with_wicket(mut p: DeliveryPayload, kind: WicketKind) -> DeliveryPayload {
        p.outcome = DeliveryOutcome::Wicket;
        p.wicket =
            Some(Wicket { kind, player_id: "bat1".to_string(), fielder_id: None });
        p
    }

    #[test]
    fn test_normal_delivery_credits_everyone() {
        let update = compute_score_update(&payload(DeliveryKind::Normal, 3)).unwrap();

        assert_eq!((update.batsman.runs, update.batsman.balls), (3, 1));
        assert_eq!((update.bowler.runs, update.bowler.balls), (3, 1));
        assert_eq!((update.team.runs, update.team.balls), (3, 1));
        assert_eq!(update.extras.total, 0);
    }

    #[test]
    fn test_normal_dot_ball() {
        let update = compute_score_update(&payload(DeliveryKind::Normal, 0)).unwrap();
        assert_eq!(update.team.runs, 0);
        assert_eq!(update.team.balls, 1);
        assert_eq!(update.batsman.balls, 1);
    }

    #[test]
    fn test_boundary_four() {
        let mut p = payload(DeliveryKind::Normal, 4);
        p.is_boundary = true;
        let update = compute_score_update(&p).unwrap();
        assert_eq!(update.batsman.runs, 4);
        assert_eq!(update.batsman.fours, 1);
        assert_eq!(update.batsman.sixes, 0);
    }

    #[test]
    fn test_six() {
        let mut p = payload(DeliveryKind::Normal, 6);
        p.is_six = true;
        let update = compute_score_update(&p).unwrap();
        assert_eq!(update.batsman.sixes, 1);
        assert_eq!(update.batsman.fours, 0);
    }

    #[test]
    fn test_overthrow_runs_added_before_rules() {
        let mut p = payload(DeliveryKind::Normal, 2);
        p.is_overthrow = true;
        p.overthrow_runs = Some(4);
        let update = compute_score_update(&p).unwrap();
        assert_eq!(update.batsman.runs, 6);
        assert_eq!(update.bowler.runs, 6);
        assert_eq!(update.team.runs, 6);
    }

    #[test]
    fn test_wide_is_all_extras_no_ball_faced() {
        let update = compute_score_update(&payload(DeliveryKind::Wide, 1)).unwrap();

        assert_eq!(update.extras.wide, 1);
        assert_eq!(update.extras.total, 1);
        assert_eq!(update.bowler.runs, 1);
        assert_eq!(update.bowler.balls, 0);
        assert_eq!(update.team.runs, 1);
        assert_eq!(update.team.balls, 0);
        assert_eq!(update.batsman, Default::default());
    }

    #[test]
    fn test_wide_with_extra_runs() {
        // Wide that went to the boundary: 1 penalty + 4 ran/overthrown.
        let update = compute_score_update(&payload(DeliveryKind::Wide, 5)).unwrap();
        assert_eq!(update.extras.wide, 5);
        assert_eq!(update.bowler.runs, 5);
        assert_eq!(update.team.runs, 5);
        assert_eq!(update.team.balls, 0);
    }

    #[test]
    fn test_no_ball_runs_off_the_bat() {
        // 1 penalty + 2 off the bat.
        let update = compute_score_update(&payload(DeliveryKind::NoBall, 3)).unwrap();

        assert_eq!(update.extras.no_ball, 1);
        assert_eq!(update.bowler.runs, 1, "bowler concedes the penalty only");
        assert_eq!(update.bowler.balls, 0);
        assert_eq!(update.batsman.runs, 2);
        assert_eq!(update.batsman.balls, 1, "batsman faces a no-ball");
        assert_eq!(update.team.runs, 3);
        assert_eq!(update.team.balls, 0);
        assert_eq!(update.extras.total, 1);
    }

    #[test]
    fn test_no_ball_with_byes() {
        let mut p = payload(DeliveryKind::NoBall, 3);
        p.extras = Some(DeliveryExtras { bye: Some(2), ..Default::default() });
        let update = compute_score_update(&p).unwrap();

        assert_eq!(update.extras.no_ball, 1);
        assert_eq!(update.extras.bye, 2);
        assert_eq!(update.extras.total, 3);
        assert_eq!(update.batsman.runs, 0, "byes are never credited to the bat");
        assert_eq!(update.batsman.balls, 1);
        assert_eq!(update.team.runs, 3);
    }

    #[test]
    fn test_no_ball_with_leg_byes() {
        let mut p = payload(DeliveryKind::NoBall, 2);
        p.extras = Some(DeliveryExtras { leg_bye: Some(1), ..Default::default() });
        let update = compute_score_update(&p).unwrap();
        assert_eq!(update.extras.leg_bye, 1);
        assert_eq!(update.extras.no_ball, 1);
        assert_eq!(update.batsman.runs, 0);
    }

    #[test]
    fn test_bye_counts_the_ball_but_spares_the_bowler() {
        let update = compute_score_update(&payload(DeliveryKind::Bye, 2)).unwrap();

        assert_eq!(update.extras.bye, 2);
        assert_eq!(update.team.runs, 2);
        assert_eq!(update.team.balls, 1);
        assert_eq!(update.bowler.runs, 0);
        assert_eq!(update.bowler.balls, 1);
        assert_eq!(update.batsman.runs, 0);
        assert_eq!(update.batsman.balls, 1);
    }

    #[test]
    fn test_leg_bye_mirrors_bye() {
        let update = compute_score_update(&payload(DeliveryKind::LegBye, 1)).unwrap();
        assert_eq!(update.extras.leg_bye, 1);
        assert_eq!(update.extras.bye, 0);
        assert_eq!(update.bowler.runs, 0);
        assert_eq!(update.team.balls, 1);
    }

    #[test]
    fn test_wicket_credits_bowler_once() {
        let p = with_wicket(payload(DeliveryKind::Normal, 0), WicketKind::Bowled);
        let update = compute_score_update(&p).unwrap();
        assert_eq!(update.team.wickets, 1);
        assert_eq!(update.bowler.wickets, 1);
    }

    #[test]
    fn test_run_out_gives_bowler_nothing() {
        let p = with_wicket(payload(DeliveryKind::Normal, 1), WicketKind::RunOut);
        let update = compute_score_update(&p).unwrap();
        assert_eq!(update.team.wickets, 1);
        assert_eq!(update.bowler.wickets, 0);
    }

    #[test]
    fn test_wicket_on_no_ball_credits_bowler_exactly_once() {
        // Stumping off a no-ball is not actually possible under the laws,
        // but the credit rule is kind-independent: one wicket, once.
        let p = with_wicket(payload(DeliveryKind::NoBall, 1), WicketKind::HitWicket);
        let update = compute_score_update(&p).unwrap();
        assert_eq!(update.bowler.wickets, 1);
        assert_eq!(update.team.wickets, 1);
    }

    #[test]
    fn test_extras_total_is_sum_of_subfields() {
        let mut p = payload(DeliveryKind::NoBall, 4);
        p.extras = Some(DeliveryExtras { bye: Some(3), ..Default::default() });
        let update = compute_score_update(&p).unwrap();
        assert_eq!(
            update.extras.total,
            update.extras.wide + update.extras.no_ball + update.extras.bye + update.extras.leg_bye
        );
    }

    #[test]
    fn test_determinism() {
        let p = payload(DeliveryKind::Normal, 4);
        assert_eq!(
            compute_score_update(&p).unwrap(),
            compute_score_update(&p).unwrap()
        );
    }

    #[test]
    fn test_reversal_is_exact_negation() {
        let mut p = payload(DeliveryKind::Wide, 3);
        p.extras = Some(DeliveryExtras { wide: Some(3), ..Default::default() });
        let applied = compute_score_update(&p).unwrap();

        let record = Delivery {
            id: "d1".to_string(),
            match_id: p.match_id.clone(),
            innings: 1,
            slot: crate::overs::OverBall::first(),
            batsman_id: p.batsman_id.clone(),
            bowler_id: p.bowler_id.clone(),
            non_striker_id: p.non_striker_id.clone(),
            kind: p.kind,
            outcome: p.outcome,
            runs: p.runs,
            is_overthrow: p.is_overthrow,
            overthrow_runs: p.overthrow_runs,
            is_boundary: p.is_boundary,
            is_six: p.is_six,
            wicket: p.wicket.clone(),
            extras: p.extras,
            timestamp: chrono::Utc::now(),
        };

        let reversed = reversal_update(&record).unwrap();
        assert_eq!(reversed, applied.negated());
        assert_eq!(reversed.bowler.runs, -3, "wide runs come back as one amount");
        assert_eq!(reversed.extras.wide, -3);
    }

    #[test]
    fn test_malformed_payload_is_rejected() {
        let mut p = payload(DeliveryKind::Normal, 1);
        p.batsman_id = String::new();
        assert!(compute_score_update(&p).is_err());
    }
}
