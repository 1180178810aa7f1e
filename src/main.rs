use anyhow::Result;
use clap::Parser;
use cozy_chess::Color;
use log::info;
use std::io::{self, Write};
use std::time::Duration;

use ponderbot::board::Position;
use ponderbot::player::{Player, PlayerKind};
use ponderbot::search::alphabeta::Searcher;
use ponderbot::search::time;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play chess against an alpha-beta engine", long_about = None)]
struct Args {
    /// Your color: 'w' for white, 'b' for black
    #[arg(long, default_value = "w")]
    color: String,

    /// Operation mode: 'h' for human vs engine, 'a' for engine vs engine
    #[arg(long, default_value = "h")]
    mode: String,

    /// Starting FEN position
    #[arg(long)]
    fen: Option<String>,

    /// Fixed search depth (overrides clock-based depth selection)
    #[arg(long)]
    depth: Option<u32>,

    /// Engine clock in milliseconds
    #[arg(long, default_value_t = 60_000)]
    clock_ms: u64,

    /// Print each engine move's search report as a JSON line
    #[arg(long)]
    json: bool,
}

fn parse_color(color_str: &str) -> Result<Color> {
    match color_str.to_lowercase().as_str() {
        "w" | "white" => Ok(Color::White),
        "b" | "black" => Ok(Color::Black),
        _ => anyhow::bail!("Invalid color: use 'w' or 'b'"),
    }
}

fn other(color: Color) -> Color {
    match color {
        Color::White => Color::Black,
        Color::Black => Color::White,
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let human_color = parse_color(&args.color)?;
    let pos = match &args.fen {
        Some(fen) => Position::from_fen(fen)?,
        None => Position::startpos(),
    };

    match args.mode.chars().next().unwrap_or('h') {
        'h' => play_human(pos, human_color, &args),
        'a' => play_auto(pos, &args),
        _ => anyhow::bail!("Invalid mode: use 'h' or 'a'"),
    }
}

fn play_human(mut pos: Position, human_color: Color, args: &Args) -> Result<()> {
    let engine_color = other(human_color);
    let mut human = Player::new("Human", PlayerKind::Human, human_color);
    let mut engine = Player::new("Engine", PlayerKind::Engine, engine_color);
    let mut searcher = Searcher::new(engine_color);
    let mut clock = Duration::from_millis(args.clock_ms);

    loop {
        println!("\n{}", pos.render());
        if pos.is_game_over() {
            announce_result(&pos);
            break;
        }
        println!(
            "{}'s turn",
            match pos.side_to_move() {
                Color::White => "White",
                Color::Black => "Black",
            }
        );
        if pos.side_to_move() == human_color {
            read_human_move(&mut pos, &mut human)?;
        } else if !engine_turn(&mut pos, &mut engine, &mut searcher, args, &mut clock)? {
            break;
        }
    }
    Ok(())
}

fn play_auto(mut pos: Position, args: &Args) -> Result<()> {
    let mut white = Player::new("Engine (White)", PlayerKind::Engine, Color::White);
    let mut black = Player::new("Engine (Black)", PlayerKind::Engine, Color::Black);
    let mut white_searcher = Searcher::new(Color::White);
    let mut black_searcher = Searcher::new(Color::Black);
    let mut white_clock = Duration::from_millis(args.clock_ms);
    let mut black_clock = Duration::from_millis(args.clock_ms);

    // Hard ply cap so a drawish shuffle still terminates.
    for _ in 0..200 {
        println!("\n{}", pos.render());
        if pos.is_game_over() {
            announce_result(&pos);
            return Ok(());
        }
        let moved = match pos.side_to_move() {
            Color::White => {
                engine_turn(&mut pos, &mut white, &mut white_searcher, args, &mut white_clock)?
            }
            Color::Black => {
                engine_turn(&mut pos, &mut black, &mut black_searcher, args, &mut black_clock)?
            }
        };
        if !moved {
            return Ok(());
        }
    }
    println!("Game stopped at the move cap.");
    Ok(())
}

fn read_human_move(pos: &mut Position, player: &mut Player) -> Result<()> {
    loop {
        print!("Enter your move (e.g., e2e4): ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            anyhow::bail!("stdin closed");
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        match player.make_move(pos, input) {
            Ok(()) => return Ok(()),
            Err(e) => println!("{e}"),
        }
    }
}

/// Runs one engine move. Returns false if no legal move existed.
fn engine_turn(
    pos: &mut Position,
    player: &mut Player,
    searcher: &mut Searcher,
    args: &Args,
    clock: &mut Duration,
) -> Result<bool> {
    let (max_depth, budget) = match args.depth {
        Some(d) => (d, None),
        None => (time::depth_for(*clock), Some(time::budget_for(*clock))),
    };
    let result = searcher.find_best_move(pos, max_depth, budget)?;
    *clock = clock.saturating_sub(result.elapsed);

    if args.json {
        println!(
            "{}",
            serde_json::json!({
                "bestmove": result.best_move.map(|m| m.to_string()),
                "score_cp": result.score,
                "depth": result.depth_reached,
                "nodes": result.nodes,
                "elapsed_ms": result.elapsed.as_millis() as u64,
            })
        );
    }

    match result.best_move {
        Some(mv) => {
            let uci = mv.to_string();
            player.make_move(pos, &uci)?;
            info!(
                "{} played {} (score {} cp, depth {}, {} nodes, {:?} left)",
                player.name(),
                uci,
                result.score,
                result.depth_reached,
                result.nodes,
                clock
            );
            println!("{} plays: {}", player.name(), uci);
            Ok(true)
        }
        None => {
            println!("No legal moves available!");
            Ok(false)
        }
    }
}

fn announce_result(pos: &Position) {
    if pos.is_checkmate() {
        let winner = match pos.side_to_move() {
            Color::White => "Black",
            Color::Black => "White",
        };
        println!("Checkmate! {winner} wins!");
    } else if pos.is_stalemate() {
        println!("Game is a stalemate!");
    } else if pos.is_fifty_move_draw() {
        println!("Draw by the fifty-move rule.");
    } else if pos.is_repetition_draw() {
        println!("Draw by repetition.");
    } else {
        println!("Draw by insufficient material.");
    }
}
