use cozy_chess::Color;
use ponderbot::board::Position;

fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0;
    for mv in pos.legal_moves() {
        pos.make(mv);
        nodes += perft(pos, depth - 1);
        pos.undo();
    }
    nodes
}

#[test]
fn perft_startpos() {
    let mut pos = Position::startpos();
    assert_eq!(perft(&mut pos, 1), 20);
    assert_eq!(perft(&mut pos, 2), 400);
    assert_eq!(perft(&mut pos, 3), 8_902);
    assert_eq!(pos.ply(), 0, "perft must leave the stack balanced");
}

#[test]
fn perft_kiwipete() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let mut pos = Position::from_fen(fen).unwrap();
    assert_eq!(perft(&mut pos, 1), 48);
    assert_eq!(perft(&mut pos, 2), 2_039);
}

#[test]
fn make_undo_restores_the_position() {
    let mut pos = Position::startpos();
    let before_fen = pos.fen();
    let before_key = pos.key();

    for uci in ["e2e4", "e7e5", "g1f3", "b8c6"] {
        pos.make_uci(uci).unwrap();
    }
    assert_eq!(pos.ply(), 4);
    for _ in 0..4 {
        pos.undo();
    }
    assert_eq!(pos.fen(), before_fen);
    assert_eq!(pos.key(), before_key);
    assert_eq!(pos.ply(), 0);
}

#[test]
fn illegal_and_garbage_moves_are_rejected() {
    let mut pos = Position::startpos();
    assert!(pos.make_uci("e2e5").is_err());
    assert!(pos.make_uci("zz99").is_err());
    assert!(pos.make_uci("").is_err());
    assert_eq!(pos.ply(), 0, "rejected moves must not touch the stack");
}

#[test]
fn standard_castling_notation_is_accepted() {
    let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    pos.make_uci("e1g1").unwrap();
    let fen = pos.fen();
    assert!(fen.contains("R4RK1"), "king and rook should have castled: {fen}");
}

#[test]
fn en_passant_capture_works_and_is_a_capture() {
    let mut pos =
        Position::from_fen("rnbqkbnr/pppp1ppp/8/4Pp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 2").unwrap();
    let mv = pos.find_move("e5f6").expect("en passant must be legal");
    assert!(pos.is_capture(mv), "en passant is a capture");
    pos.make(mv);
    assert!(!pos.fen().contains("Pp"), "the captured pawn must be gone");
}

#[test]
fn promotion_via_uci() {
    let mut pos = Position::from_fen("8/5k1P/8/8/8/8/4K3/8 w - - 0 1").unwrap();
    pos.make_uci("h7h8q").unwrap();
    assert!(pos.fen().contains('Q'), "pawn should have promoted to a queen");
}

#[test]
fn checkmate_and_check_detection() {
    // Scholar's mate final position.
    let pos = Position::from_fen(
        "r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4",
    )
    .unwrap();
    assert!(pos.in_check());
    assert!(pos.is_checkmate());
    assert!(pos.is_game_over());

    let check_only = Position::from_fen("4k3/4Q3/8/8/8/8/8/4K3 b - - 0 1").unwrap();
    assert!(check_only.in_check());
    assert!(!check_only.is_checkmate());
}

#[test]
fn fifty_move_counter_draw() {
    let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 100 80").unwrap();
    assert!(pos.is_fifty_move_draw());
    assert!(pos.is_draw());
}

#[test]
fn insufficient_material_draws() {
    assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap().is_insufficient_material());
    assert!(Position::from_fen("4k3/8/8/8/8/8/8/3NK3 w - - 0 1").unwrap().is_insufficient_material());
    assert!(!Position::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap().is_insufficient_material());
    assert!(!Position::from_fen("4k3/7p/8/8/8/8/8/4K3 w - - 0 1").unwrap().is_insufficient_material());
}

#[test]
fn repetition_is_detected_over_the_played_history() {
    let mut pos = Position::startpos();
    // Shuffle the knights out and back twice.
    for uci in [
        "g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1", "f6g8",
    ] {
        pos.make_uci(uci).unwrap();
    }
    assert!(pos.is_repetition_draw(), "startpos occurred three times");
    assert!(pos.is_draw());
}

#[test]
fn transient_probes_leave_the_position_alone() {
    let pos = Position::from_fen("k7/8/8/8/8/8/3qQ3/7K w - - 0 1").unwrap();
    let key = pos.key();
    for mv in pos.legal_moves() {
        pos.gives_check(mv);
        pos.captured_piece(mv);
    }
    assert_eq!(pos.key(), key);
}

#[test]
fn side_to_move_and_key_track_rights() {
    let mut with_rights = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let without_rights = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1").unwrap();
    assert_ne!(
        with_rights.key(),
        without_rights.key(),
        "castling rights must affect the position key"
    );
    assert_eq!(with_rights.side_to_move(), Color::White);
    with_rights.make_uci("a1a2").unwrap();
    assert_eq!(with_rights.side_to_move(), Color::Black);
}
