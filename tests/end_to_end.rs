//! Integration tests exercising the scenarios from `spec.md` section 8
//! across module boundaries: host command parsing feeding the board
//! replay, and the backend `info` stream feeding the selection policy,
//! exactly as the running proxy wires them together in `Frontend`.

use gambitproxy::chess::Board;
use gambitproxy::command::Command;
use gambitproxy::info::parse_info_line;
use gambitproxy::select;
use pretty_assertions::assert_eq;

/// Replays a `position ...` command the way [`Frontend::handle_position`]
/// does: parse, then apply the moves on top of the base FEN.
fn replay_position(line: &str) -> String {
    match Command::parse(line) {
        Command::Position { fen, moves } => {
            let base = fen.unwrap_or_else(|| gambitproxy::chess::STARTPOS_FEN.to_string());
            let mut board = Board::from_fen(&base).unwrap();
            board.apply_moves(moves.iter().map(String::as_str)).unwrap();
            board.to_fen()
        },
        other => panic!("expected a position command, got {other:?}"),
    }
}

#[test]
fn scenario_startpos_knight_development() {
    let fen = replay_position("position startpos moves g1f3");
    assert_eq!(fen, "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 1 1");
}

#[test]
fn scenario_en_passant_creation_and_capture() {
    let base = "r1bqkb1r/pp3ppp/2n1pn2/2pp4/3P4/2N1PN2/PPP1BPPP/R1BQ1RK1 b kq - 3 6";
    let line = format!("position fen {base} moves c6b4 h2h4 b7b6 h4h5 g7g5");
    let fen = replay_position(&line);
    assert_eq!(fen, "r1bqkb1r/p4p1p/1p2pn2/2pp2pP/1n1P4/2N1PN2/PPP1BPP1/R1BQ1RK1 w kq g6 0 9");

    let capture_line = format!("position fen {fen} moves h5g6");
    let after_capture = replay_position(&capture_line);
    assert_eq!(
        after_capture,
        "r1bqkb1r/p4p1p/1p2pnP1/2pp4/1n1P4/2N1PN2/PPP1BPP1/R1BQ1RK1 b kq - 0 9"
    );
}

#[test]
fn scenario_castling_kingside_from_startpos() {
    let line = "position startpos moves g1f3 d7d5 e2e3 c7c5 b1c3 g8f6 d2d4 e7e6 f1e2 b8c6 e1g1";
    let fen = replay_position(line);
    assert_eq!(fen, "r1bqkb1r/pp3ppp/2n1pn2/2pp4/3P4/2N1PN2/PPP1BPPP/R1BQ1RK1 b kq - 3 6");
}

#[test]
fn scenario_go_with_moves_forwards_and_has_time_control() {
    match Command::parse("go wtime 180000 btime 180000 winc 2000 binc 2000") {
        Command::Go(args) => assert!(args.has_time_control()),
        other => panic!("expected go, got {other:?}"),
    }
}

/// Scenario 6: a synthetic backend stream (`spec.md` section 8) parsed
/// through [`parse_info_line`] and run through the selection policy end to
/// end, rather than constructing [`InfoRecord`]s by hand.
#[test]
fn scenario_equality_selection_from_parsed_backend_lines() {
    let lines = [
        "info depth 20 multipv 1 score cp 120 nodes 500000 nps 900000 hashfull 10 tbhits 0 time 400 pv e2e4 e7e5",
        "info depth 20 multipv 2 score cp 5 nodes 500000 nps 900000 hashfull 10 tbhits 0 time 401 pv d2d4 d7d5",
        "info depth 20 multipv 3 score cp -40 nodes 500000 nps 900000 hashfull 10 tbhits 0 time 402 pv g1f3 g8f6",
        "info depth 20 multipv 4 score cp 300 nodes 500000 nps 900000 hashfull 10 tbhits 0 time 403 pv c2c4 c7c5",
    ];
    let records: Vec<_> = lines.iter().map(|line| parse_info_line(line).unwrap()).collect();

    let selection = select::select(&records, "e2e4", 0, false, false);
    assert_eq!(selection.record.score_cp, 5);
    assert_eq!(select::first_move(&selection.record.pv), "d2d4");
    assert!(!selection.agro);
}
