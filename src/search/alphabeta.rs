use cozy_chess::{Color, Move};
use log::debug;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::board::Position;
use crate::search::eval::{evaluate, DRAW_SCORE, MATE_SCORE};
use crate::search::ordering;
use crate::search::tt::{Bound, Probe, Tt};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("search depth must be at least 1")]
    DepthZero,
}

#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    pub max_depth: u32,
    pub budget: Option<Duration>,
    pub use_tt: bool,
    pub order_moves: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self { max_depth: 4, budget: None, use_tt: true, order_moves: true }
    }
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: i32,
    pub depth_reached: u32,
    pub nodes: u64,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    pub nodes_searched: u64,
}

/// Alpha-beta searcher with iterative deepening and a transposition table.
///
/// All search state (table, node counter, clock) is owned by the instance,
/// so independent searchers can coexist. Scores are relative to the side
/// the searcher was constructed for: positive always favors that side.
pub struct Searcher {
    color: Color,
    tt: Tt,
    nodes: u64,
    deadline: Option<Instant>,
    stopped: bool,
    use_tt: bool,
    order_moves: bool,
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(Color::White)
    }
}

impl Searcher {
    pub fn new(color: Color) -> Self {
        let mut tt = Tt::new();
        tt.set_capacity_entries(1 << 16);
        Self {
            color,
            tt,
            nodes: 0,
            deadline: None,
            stopped: false,
            use_tt: true,
            order_moves: true,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Diagnostics for the most recent search.
    pub fn statistics(&self) -> SearchStats {
        SearchStats { nodes_searched: self.nodes }
    }

    pub fn set_tt_capacity_entries(&mut self, entries: usize) {
        self.tt.set_capacity_entries(entries);
    }

    pub fn set_tt_capacity_mb(&mut self, mb: usize) {
        self.tt.set_capacity_mb(mb);
    }

    pub fn tt_probe(&self, pos: &Position) -> Option<(u32, Bound)> {
        self.tt.get(pos.key()).map(|e| (e.depth, e.bound))
    }

    /// Searches `pos` up to `max_depth` plies within the optional time
    /// budget and returns the best move of the last fully completed depth.
    /// `best_move` is `None` only when the root has no legal move.
    pub fn find_best_move(
        &mut self,
        pos: &mut Position,
        max_depth: u32,
        budget: Option<Duration>,
    ) -> Result<SearchResult, SearchError> {
        self.search_with_params(pos, SearchParams { max_depth, budget, ..SearchParams::default() })
    }

    pub fn search_with_params(
        &mut self,
        pos: &mut Position,
        params: SearchParams,
    ) -> Result<SearchResult, SearchError> {
        if params.max_depth == 0 {
            return Err(SearchError::DepthZero);
        }
        let start = Instant::now();
        self.nodes = 0;
        self.stopped = false;
        self.deadline = params.budget.map(|b| start + b);
        self.use_tt = params.use_tt;
        self.order_moves = params.order_moves;

        // Depth 1 always runs to completion so a legal answer exists
        // whenever legal moves do, however tight the budget.
        self.tt.bump_generation();
        let (mut best_move, mut score) = self.search_root(pos, 1);
        let mut depth_reached = 1;
        debug!(
            "depth 1 complete: best={:?} score={} nodes={}",
            best_move.map(|m| m.to_string()),
            score,
            self.nodes
        );

        if best_move.is_some() {
            for depth in 2..=params.max_depth {
                if self.stopped || self.out_of_time() {
                    break;
                }
                self.tt.bump_generation();
                let (mv, sc) = self.search_root(pos, depth);
                if self.stopped {
                    // Cut off mid-depth: keep the last completed answer.
                    debug!("depth {depth} aborted, keeping depth {depth_reached} result");
                    break;
                }
                best_move = mv;
                score = sc;
                depth_reached = depth;
                debug!(
                    "depth {depth} complete: best={:?} score={} nodes={}",
                    mv.map(|m| m.to_string()),
                    sc,
                    self.nodes
                );
            }
        }

        Ok(SearchResult {
            best_move,
            score,
            depth_reached,
            nodes: self.nodes,
            elapsed: start.elapsed(),
        })
    }

    fn search_root(&mut self, pos: &mut Position, depth: u32) -> (Option<Move>, i32) {
        let mut moves = pos.legal_moves();
        if moves.is_empty() {
            return (None, self.leaf_score(pos, 0));
        }
        if self.order_moves {
            ordering::order(pos, &mut moves);
        }
        if self.use_tt {
            self.hoist_cached_move(pos.key(), &mut moves);
        }

        let maximizing = pos.side_to_move() == self.color;
        let mut alpha = -MATE_SCORE;
        let mut beta = MATE_SCORE;
        let mut best = if maximizing { -MATE_SCORE } else { MATE_SCORE };
        let mut best_move = None;

        for (idx, &mv) in moves.iter().enumerate() {
            // Root siblings are abandoned between moves, never mid-line.
            if depth > 1 && idx > 0 && self.out_of_time() {
                self.stopped = true;
                break;
            }
            pos.make(mv);
            let score = self.alphabeta(pos, depth - 1, alpha, beta, 1);
            pos.undo();
            if maximizing {
                if score > best {
                    best = score;
                    best_move = Some(mv);
                }
                if best > alpha {
                    alpha = best;
                }
            } else {
                if score < best {
                    best = score;
                    best_move = Some(mv);
                }
                if best < beta {
                    beta = best;
                }
            }
            if beta <= alpha {
                break;
            }
        }

        if self.use_tt && !self.stopped {
            // Full window at the root, so the result is exact.
            self.tt.store(pos.key(), depth, best, Bound::Exact, best_move);
        }
        (best_move, best)
    }

    fn alphabeta(&mut self, pos: &mut Position, depth: u32, mut alpha: i32, mut beta: i32, ply: i32) -> i32 {
        if self.out_of_time() {
            // Best-effort abort: unwind with the static score; the driver
            // discards this depth.
            self.stopped = true;
            return self.leaf_score(pos, ply);
        }
        self.nodes += 1;

        if depth == 0 || pos.is_game_over() {
            return self.leaf_score(pos, ply);
        }

        let key = pos.key();
        let mut cached_move = None;
        if self.use_tt {
            match self.tt.probe(key, depth, alpha, beta) {
                Probe::Hit(score) => return score,
                Probe::Miss(best) => cached_move = best,
            }
        }

        let mut moves = pos.legal_moves();
        if moves.is_empty() {
            return self.leaf_score(pos, ply);
        }
        if self.order_moves {
            ordering::order(pos, &mut moves);
        }
        if let Some(ttm) = cached_move {
            hoist(&mut moves, ttm);
        }

        let maximizing = pos.side_to_move() == self.color;
        let (orig_alpha, orig_beta) = (alpha, beta);
        let mut best = if maximizing { -MATE_SCORE } else { MATE_SCORE };
        let mut best_move = None;

        for &mv in &moves {
            pos.make(mv);
            let score = self.alphabeta(pos, depth - 1, alpha, beta, ply + 1);
            pos.undo();
            if maximizing {
                if score > best {
                    best = score;
                    best_move = Some(mv);
                }
                if best > alpha {
                    alpha = best;
                }
            } else {
                if score < best {
                    best = score;
                    best_move = Some(mv);
                }
                if best < beta {
                    beta = best;
                }
            }
            if beta <= alpha {
                break;
            }
            if self.stopped {
                break;
            }
        }

        if self.use_tt && !self.stopped {
            let bound = if best >= orig_beta {
                Bound::Lower
            } else if best <= orig_alpha {
                Bound::Upper
            } else {
                Bound::Exact
            };
            self.tt.store(key, depth, best, bound, best_move);
        }
        best
    }

    /// Score of a node searched no further: mate and draw detection first,
    /// the static evaluator otherwise. Mate scores are distance-adjusted so
    /// nearer mates dominate.
    fn leaf_score(&self, pos: &Position, ply: i32) -> i32 {
        if pos.is_checkmate() {
            return if pos.side_to_move() == self.color {
                -(MATE_SCORE - ply)
            } else {
                MATE_SCORE - ply
            };
        }
        if pos.is_game_over() {
            return DRAW_SCORE;
        }
        evaluate(pos.board(), self.color)
    }

    fn hoist_cached_move(&self, key: u64, moves: &mut Vec<Move>) {
        if let Some(best) = self.tt.get(key).and_then(|e| e.best) {
            hoist(moves, best);
        }
    }

    fn out_of_time(&self) -> bool {
        self.deadline.map_or(false, |d| Instant::now() >= d)
    }
}

fn hoist(moves: &mut Vec<Move>, mv: Move) {
    if let Some(i) = moves.iter().position(|&m| m == mv) {
        let m = moves.remove(i);
        moves.insert(0, m);
    }
}
