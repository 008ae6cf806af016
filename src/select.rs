//! Chooses which principal variation to actually play once the backend
//! reports `bestmove`. See `spec.md` section 4.9. The policy is an
//! explicit tagged value over `{Equality, Agro, PlayBad}`, per section 9,
//! rather than three implementations behind a trait object.

use crate::chess::Color;
use crate::info::InfoRecord;

/// Which branch of the selection algorithm produced the chosen move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Policy {
    /// The backend's own top line was kept, because agro was already
    /// active or this result made it so.
    Agro,
    /// The minimum-|score| non-blundering line was chosen.
    Equality,
    /// `PlayBad` overrode the equality pick with a losing line.
    PlayBad,
}

/// The outcome of running the selection algorithm once.
#[derive(Clone, Debug)]
pub struct Selection {
    pub record: InfoRecord,
    pub agro: bool,
    pub policy: Policy,
}

/// Runs `spec.md` section 4.9 steps 2-6 against one snapshot.
///
/// `fallback_pv` is the remainder of a `bestmove <move> ...` line, used to
/// synthesise a record when the snapshot buffer is empty (the backend
/// can report `bestmove` with no preceding `info` lines at very short
/// time controls).
#[must_use]
pub fn select(
    records: &[InfoRecord],
    fallback_pv: &str,
    game_eval: i64,
    agro_already: bool,
    play_bad: bool,
) -> Selection {
    let engine_move = records.first().cloned().unwrap_or_else(|| InfoRecord {
        pv: fallback_pv.to_string(),
        ..InfoRecord::default()
    });

    if agro_already || engine_move.score_cp >= 2000 || engine_move.mate > 0 {
        return Selection { record: engine_move, agro: true, policy: Policy::Agro };
    }

    let mut chosen: Option<&InfoRecord> = None;
    for record in records {
        if record.mate < 0 {
            break;
        }
        if game_eval - record.score_cp > 250 {
            continue;
        }
        chosen = match chosen {
            None => Some(record),
            Some(best) if record.score_cp.abs() < best.score_cp.abs() => Some(record),
            _ => chosen,
        };
    }
    let mut result = chosen.cloned().unwrap_or_else(|| engine_move.clone());
    let mut policy = Policy::Equality;

    if play_bad {
        if let Some(bad) = records.iter().rev().find(|r| r.mate < 0 || r.score_cp < 0) {
            result = bad.clone();
            policy = Policy::PlayBad;
        }
    }

    Selection { record: result, agro: false, policy }
}

/// The first whitespace-separated token of a PV string, i.e. the move to
/// actually play.
#[must_use]
pub fn first_move(pv: &str) -> &str {
    pv.split_whitespace().next().unwrap_or(pv)
}

/// Renders `score_cp`/`mate` as the human-readable eval trailer: signed
/// centipawns to two decimals, or `M±n` for a mate distance. Always from
/// white's point of view, so it's sign-flipped when black is to move.
#[must_use]
pub fn format_eval(side_to_move: Color, score_cp: i64, mate: i64) -> String {
    if mate != 0 {
        let signed = if side_to_move == Color::Black { -mate } else { mate };
        format!("M{signed:+}")
    } else {
        let pawns = score_cp as f64 / 100.0;
        let signed = if side_to_move == Color::Black { -pawns } else { pawns };
        format!("{signed:+.2}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(score_cp: i64, mate: i64) -> InfoRecord {
        InfoRecord { score_cp, mate, pv: "e2e4".to_string(), ..InfoRecord::default() }
    }

    #[test]
    fn equality_mode_picks_minimum_abs_score() {
        let records = vec![record(120, 0), record(5, 0), record(-40, 0), record(300, 0)];
        let selection = select(&records, "e2e4", 0, false, false);
        assert_eq!(selection.policy, Policy::Equality);
        assert_eq!(selection.record.score_cp, 5);
        assert!(!selection.agro);
    }

    #[test]
    fn agro_already_set_keeps_engine_top_line() {
        let records = vec![record(120, 0), record(5, 0)];
        let selection = select(&records, "e2e4", 0, true, false);
        assert_eq!(selection.policy, Policy::Agro);
        assert_eq!(selection.record.score_cp, 120);
    }

    #[test]
    fn high_engine_score_sets_agro() {
        let records = vec![record(2200, 0), record(5, 0)];
        let selection = select(&records, "e2e4", 0, false, false);
        assert_eq!(selection.policy, Policy::Agro);
        assert!(selection.agro);
    }

    #[test]
    fn engine_mate_sets_agro() {
        let records = vec![record(0, 4)];
        let selection = select(&records, "e2e4", 0, false, false);
        assert_eq!(selection.policy, Policy::Agro);
    }

    #[test]
    fn blunder_window_excludes_gross_drops() {
        let records = vec![record(-200, 0), record(50, 0)];
        let selection = select(&records, "e2e4", 100, false, false);
        // 100 - (-200) = 300 > 250, excluded; 100 - 50 = 50, kept
        assert_eq!(selection.record.score_cp, 50);
    }

    #[test]
    fn scan_stops_at_first_losing_mate() {
        let records = vec![record(10, 0), record(0, -3), record(0, 0)];
        let selection = select(&records, "e2e4", 0, false, false);
        assert_eq!(selection.record.score_cp, 10);
    }

    #[test]
    fn play_bad_overrides_with_last_losing_line() {
        let records = vec![record(10, 0), record(-30, 0), record(-90, 0)];
        let selection = select(&records, "e2e4", 0, false, true);
        assert_eq!(selection.policy, Policy::PlayBad);
        assert_eq!(selection.record.score_cp, -90);
    }

    #[test]
    fn eval_string_flips_sign_for_black() {
        assert_eq!(format_eval(Color::White, 150, 0), "+1.50");
        assert_eq!(format_eval(Color::Black, 150, 0), "-1.50");
        assert_eq!(format_eval(Color::White, 0, 3), "M+3");
        assert_eq!(format_eval(Color::Black, 0, 3), "M-3");
    }

    #[test]
    fn first_move_extracts_leading_token() {
        assert_eq!(first_move("e2e4 e7e5 g1f3"), "e2e4");
    }
}
