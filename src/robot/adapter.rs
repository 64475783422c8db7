//! The calling convention a search driver expects, and its implementation
//! over a private board.

use log::debug;

use super::config::Scoring;
use crate::board::{Board, RepeatedPositions};
use crate::core::{EngineError, GameRng, PlayerId};
use crate::moves::Move;
use crate::rules::{GameResult, RuleSet};

/// What a search driver needs from a game.
///
/// `make_move` and `unmake_move` nest strictly: every made move is unmade,
/// most recent first, before the driver returns.
pub trait SearchAdapter {
    /// Apply a whole ply. A move that leaves a confirmation pending is
    /// confirmed in the same step.
    fn make_move(&mut self, mv: &Move) -> Result<(), EngineError>;

    fn unmake_move(&mut self, mv: &Move) -> Result<(), EngineError>;

    /// Legal moves for the player to move, in a fixed order. Empty once
    /// the game is over.
    fn legal_moves(&self) -> Vec<Move>;

    /// Cheap sample for playouts. May be rejected by `make_move`.
    fn random_move(&self, rng: &mut GameRng) -> Option<Move>;

    /// Value of the position for `player`. A confirmed win beats every
    /// heuristic value, and a win found at a shallower depth beats a deeper
    /// one.
    fn evaluate(&self, player: PlayerId) -> f64;

    fn to_move(&self) -> PlayerId;

    fn is_terminal(&self) -> bool;

    /// Moves made since the search root.
    fn depth(&self) -> usize;
}

/// [`SearchAdapter`] over a board owned by one search worker.
///
/// With a repetition history attached, a position reaching the draw
/// threshold during search is terminal and scores as a draw.
#[derive(Clone, Debug)]
pub struct Robot<R: RuleSet> {
    board: Board<R>,
    scoring: Scoring,
    history: Option<RepeatedPositions>,
    /// Digest recorded by each made move, if its position was digestible.
    path: Vec<Option<u64>>,
}

impl<R: RuleSet> Robot<R> {
    /// Search from `board`'s position. Pass a [`Board::snapshot`], never the
    /// live board.
    #[must_use]
    pub fn new(board: Board<R>, scoring: Scoring) -> Self {
        Self {
            board,
            scoring,
            history: None,
            path: Vec::new(),
        }
    }

    /// Positions seen before the search root.
    #[must_use]
    pub fn with_history(mut self, history: RepeatedPositions) -> Self {
        self.history = Some(history);
        self
    }

    #[must_use]
    pub fn board(&self) -> &Board<R> {
        &self.board
    }

    #[must_use]
    pub fn into_board(self) -> Board<R> {
        self.board
    }

    #[must_use]
    pub fn scoring(&self) -> Scoring {
        self.scoring
    }

    /// Score of a win reached at the current depth.
    #[must_use]
    pub fn win_value(&self) -> f64 {
        let depth = self.path.len() as f64;
        match self.scoring {
            Scoring::Normalized => 0.8 + 0.2 / (1.0 + depth),
            Scoring::Unbounded => 1_000_000.0 - depth,
        }
    }

    fn heuristic_scale(&self) -> f64 {
        match self.scoring {
            Scoring::Normalized => 0.8,
            Scoring::Unbounded => 1000.0,
        }
    }

    fn is_repetition_draw(&self) -> bool {
        match (&self.history, self.path.last()) {
            (Some(history), Some(Some(digest))) => history.is_drawn(*digest),
            _ => false,
        }
    }
}

impl<R: RuleSet> SearchAdapter for Robot<R> {
    fn make_move(&mut self, mv: &Move) -> Result<(), EngineError> {
        self.board.robot_execute(mv)?;
        let recorded = match &mut self.history {
            Some(history) if self.board.is_digestible() => {
                let digest = self.board.digest();
                history.record(digest);
                Some(digest)
            }
            _ => None,
        };
        self.path.push(recorded);
        debug!("robot make `{mv}` at depth {}", self.path.len());
        Ok(())
    }

    fn unmake_move(&mut self, mv: &Move) -> Result<(), EngineError> {
        self.board.unexecute(mv)?;
        if let (Some(Some(digest)), Some(history)) = (self.path.pop(), &mut self.history) {
            history.remove(digest);
        }
        debug!("robot unmake `{mv}` at depth {}", self.path.len());
        Ok(())
    }

    fn legal_moves(&self) -> Vec<Move> {
        if self.is_repetition_draw() {
            return Vec::new();
        }
        self.board.generate_moves(self.board.whose_turn())
    }

    fn random_move(&self, rng: &mut GameRng) -> Option<Move> {
        if self.is_repetition_draw() {
            return None;
        }
        self.board.random_move(self.board.whose_turn(), rng)
    }

    fn evaluate(&self, player: PlayerId) -> f64 {
        if let Some(result) = self.board.result() {
            return match result {
                GameResult::Draw => 0.0,
                r if r.is_winner(player) => self.win_value(),
                _ => -self.win_value(),
            };
        }
        if self.is_repetition_draw() {
            return 0.0;
        }
        let value = self.board.rules().evaluate(self.board.state(), player);
        value.clamp(-1.0, 1.0) * self.heuristic_scale()
    }

    fn to_move(&self) -> PlayerId {
        self.board.whose_turn()
    }

    fn is_terminal(&self) -> bool {
        self.board.is_game_over() || self.is_repetition_draw()
    }

    fn depth(&self) -> usize {
        self.path.len()
    }
}
