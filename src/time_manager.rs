//! Computes a `movetime` budget from the host's clock and increment, and
//! decides whether the position is sharp/urgent enough to flip the agro
//! flag on. See `spec.md` section 4.7.

use rand::Rng;

use crate::chess::Color;
use crate::config::LATENCY_MARGIN_MS;

/// The `wtime`/`winc`/`btime`/`binc` fields of a time-controlled `go`.
#[derive(Copy, Clone, Debug)]
pub struct TimeControl {
    pub wtime: i64,
    pub winc: i64,
    pub btime: i64,
    pub binc: i64,
}

/// Result of budgeting one move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimeBudget {
    pub movetime_ms: i64,
    /// Whether this phase decision flips the game's agro flag on.
    pub agro_triggered: bool,
}

fn uniform(max_inclusive: i64) -> i64 {
    if max_inclusive <= 0 {
        return 0;
    }
    rand::thread_rng().gen_range(0..=max_inclusive)
}

/// Picks a base `moveTime` by game phase, per the `spec.md` section 4.7
/// table. Branches are checked in the order listed there; each sets the
/// agro flag except the opening-phase and "otherwise" defaults.
fn base_movetime(fullmove: u32, eval_cp: i64, mate_in: i64, our_time_ms: i64, opp_time_ms: i64) -> (i64, bool) {
    if fullmove < 5 {
        return (250 + uniform(500), false);
    }
    if mate_in > 0 {
        return ((75 * mate_in).max(250), true);
    }
    if eval_cp > 800 {
        return (1000 + uniform(500), true);
    }
    if (25..35).contains(&fullmove) && eval_cp < 150 {
        return (2000 + uniform(1000), true);
    }
    if fullmove >= 35 && eval_cp < 350 {
        return (1500 + uniform(1000), true);
    }
    if eval_cp <= -800 && our_time_ms > opp_time_ms / 2 {
        return (3500 + uniform(1000), false);
    }
    (1000 + uniform(500), false)
}

/// Clamps `value` into `[lo, hi]`, tolerating `lo > hi` by preferring
/// `lo` (the inc-derived floor should never be unreachable just because
/// the clock-derived ceiling came out lower).
fn clamp_range(value: i64, lo: i64, hi: i64) -> i64 {
    let hi = hi.max(lo);
    value.max(lo).min(hi)
}

/// Computes the full time budget for one `go`, including the clock-ratio
/// clamps and the eval/mate overrides from `spec.md` section 4.7.
#[must_use]
pub fn compute_movetime(
    side_to_move: Color,
    control: &TimeControl,
    fullmove: u32,
    eval_cp: i64,
    mate_in: i64,
) -> TimeBudget {
    let (mut our_time, our_inc, opp_time) = match side_to_move {
        Color::White => (control.wtime, control.winc, control.btime),
        Color::Black => (control.btime, control.binc, control.wtime),
    };
    our_time = (our_time - LATENCY_MARGIN_MS).max(1);

    let (mut movetime, agro_triggered) = base_movetime(fullmove, eval_cp, mate_in, our_time, opp_time);

    let max_time1 = (our_time - opp_time) / 2;
    let behind_on_clock = opp_time >= our_time + our_time * 15 / 100 || our_time <= 20_000;
    let max_time2 = if behind_on_clock { our_time / 100 } else { our_time / 20 };
    let max_time = max_time1.max(max_time2);
    let min_from_inc = (our_inc * 3 / 4).min(5000);

    movetime = clamp_range(movetime, min_from_inc, max_time);

    if eval_cp > 2000 {
        movetime = movetime.min(2500);
        if our_time <= 2500 {
            movetime = movetime.min(2 * our_time / 3);
        }
    }
    if mate_in != 0 {
        movetime = 250;
    }

    movetime = movetime.min(our_time).max(5);

    TimeBudget { movetime_ms: movetime, agro_triggered }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn control() -> TimeControl {
        TimeControl { wtime: 180_000, winc: 2000, btime: 180_000, binc: 2000 }
    }

    #[test]
    fn opening_phase_is_quick_and_not_agro() {
        let budget = compute_movetime(Color::White, &control(), 2, 0, 0);
        assert!((250..=750).contains(&budget.movetime_ms));
        assert!(!budget.agro_triggered);
    }

    #[test]
    fn mate_in_forces_short_movetime_and_agro() {
        let budget = compute_movetime(Color::White, &control(), 20, 0, 3);
        assert_eq!(budget.movetime_ms, 250);
        assert!(budget.agro_triggered);
    }

    #[test]
    fn large_positive_eval_sets_agro() {
        let budget = compute_movetime(Color::White, &control(), 20, 900, 0);
        assert!(budget.agro_triggered);
    }

    #[test]
    fn movetime_never_exceeds_clock() {
        let tight = TimeControl { wtime: 600, winc: 0, btime: 600, binc: 0 };
        let budget = compute_movetime(Color::White, &tight, 20, 0, 0);
        assert!(budget.movetime_ms <= 600);
        assert!(budget.movetime_ms >= 5);
    }

    #[test]
    fn huge_advantage_caps_movetime() {
        let budget = compute_movetime(Color::White, &control(), 20, 2500, 0);
        assert!(budget.movetime_ms <= 2500);
    }
}
