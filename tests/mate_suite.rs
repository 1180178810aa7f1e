use ponderbot::board::Position;
use ponderbot::search::alphabeta::Searcher;
use ponderbot::search::eval::MATE_SCORE;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Rec {
    fen: String,
    best: String,
}

// Small mate-in-one suite, one JSONL record per line.
const SUITE: &str = r#"
{"fen":"6k1/5ppp/8/8/8/8/5PPP/3R2K1 w - - 0 1","best":"d1d8"}
{"fen":"7k/8/5N1K/8/8/8/8/6R1 w - - 0 1","best":"g1g8"}
{"fen":"7k/1R6/6K1/8/8/8/8/8 w - - 0 1","best":"b7b8"}
"#;

fn load_suite() -> Vec<Rec> {
    SUITE
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| serde_json::from_str::<Rec>(l).expect("valid suite record"))
        .collect()
}

#[test]
fn mate_suite_solved_at_depth_3() {
    let cases = load_suite();
    assert!(!cases.is_empty());
    for case in cases {
        let mut pos = Position::from_fen(&case.fen).expect("valid FEN");
        let mut searcher = Searcher::default();
        let res = searcher.find_best_move(&mut pos, 3, None).unwrap();
        let best = res.best_move.expect("mating side has moves");
        assert_eq!(
            format!("{}", best),
            case.best,
            "wrong move for {}",
            case.fen
        );
        assert!(
            res.score >= MATE_SCORE - 10,
            "expected a mate score for {}, got {}",
            case.fen,
            res.score
        );
    }
}
