//! The generic game state core.
//!
//! `Board<R>` composes a rule set with cells, turn and ply counters, the state
//! machine and the in-flight pick/drop data, and exposes the operations every
//! caller builds on:
//!
//! - `execute` / `unexecute`: reversible moves. Each execute pushes exactly
//!   one [`UndoFrame`]; unexecute pops it. A failed execute rolls back
//!   whatever it had already applied.
//! - `robot_execute`: execute plus the implicit `done`, in one frame.
//! - `digest`: reproducible 64-bit hash of everything that matters.
//! - `generate_moves`: deterministic, total.
//! - `check_same` / `same_as`: debug oracle comparing two boards.
//!
//! A board is touched by one thread only. Search workers get their own copy
//! via [`Board::snapshot`].

pub mod cells;
mod digest;
pub mod effects;
pub mod repetition;
pub mod state;
pub mod undo;

use std::sync::Arc;

use log::{debug, error, trace, warn};

pub use cells::Cells;
pub use effects::{AnimationStep, Effects, ExecuteMode, ExecuteReport};
pub use repetition::RepeatedPositions;
pub use state::{BoardState, InFlight};
pub use undo::UndoFrame;

use digest::DigestKeys;

use crate::core::{CellId, EngineError, GameInit, GameRng, PlayerId};
use crate::moves::{Move, Opcode};
use crate::rules::{GameResult, ReplayLeniency, RuleSet, StateConfig, StateId, Strict};

pub struct Board<R: RuleSet> {
    rules: Arc<R>,
    init: GameInit,
    state: BoardState,
    undo: Vec<UndoFrame>,
    keys: Arc<DigestKeys>,
    leniency: Arc<dyn ReplayLeniency>,
}

impl<R: RuleSet> Clone for Board<R> {
    fn clone(&self) -> Self {
        Self {
            rules: Arc::clone(&self.rules),
            init: self.init.clone(),
            state: self.state.clone(),
            undo: self.undo.clone(),
            keys: Arc::clone(&self.keys),
            leniency: Arc::clone(&self.leniency),
        }
    }
}

impl<R: RuleSet> std::fmt::Debug for Board<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("game", &self.rules.name())
            .field("init", &self.init.to_string())
            .field("state", &self.state_name())
            .field("whose_turn", &self.state.whose_turn)
            .field("ply", &self.state.ply)
            .field("undo_depth", &self.undo.len())
            .finish()
    }
}

impl<R: RuleSet> Board<R> {
    /// Build the opening position for `init`.
    pub fn new(rules: Arc<R>, init: GameInit) -> Result<Self, EngineError> {
        let (state, keys) = build(&*rules, &init)?;
        Ok(Self {
            rules,
            init,
            state,
            undo: Vec::new(),
            keys: Arc::new(keys),
            leniency: Arc::new(Strict),
        })
    }

    /// Attach a replay-leniency policy. Only replay-mode executes consult it.
    #[must_use]
    pub fn with_leniency(mut self, leniency: impl ReplayLeniency + 'static) -> Self {
        self.leniency = Arc::new(leniency);
        self
    }

    /// Back to the opening position of `init`, keeping the graph and digest
    /// keys when the layout is unchanged. On failure the board is untouched.
    pub fn reinit(&mut self, init: GameInit) -> Result<(), EngineError> {
        let layout = self.rules.layout(&init)?;
        let reusable = init.player_count() == self.state.player_count()
            && *self.state.graph() == layout.graph
            && self.state.counters[PlayerId::new(0)].len() == layout.counters
            && self.state.cells.stack(CellId(0)).base() == layout.base_level;

        if reusable {
            // Scratch cells: a failed setup leaves the board as it was.
            let mut cells = self.state.cells.clone();
            cells.clear();
            let mut rng = GameRng::new(init.seed);
            self.rules.setup(&mut cells, &init, &mut rng)?;

            let s = &mut self.state;
            s.cells = cells;
            s.whose_turn = PlayerId::new(0);
            s.state = self.rules.states().initial();
            s.ply = 0;
            for player in PlayerId::all(s.player_count()) {
                s.counters[player].iter_mut().for_each(|c| *c = 0);
            }
            s.picked = None;
            s.sources.clear();
            s.dests.clear();
            s.result = None;
        } else {
            let (state, keys) = build(&*self.rules, &init)?;
            self.state = state;
            self.keys = Arc::new(keys);
        }
        self.undo.clear();
        self.init = init;
        Ok(())
    }

    #[must_use]
    pub fn rules(&self) -> &R {
        &self.rules
    }

    #[must_use]
    pub fn init(&self) -> &GameInit {
        &self.init
    }

    /// Read-only view for rule code and UIs.
    #[must_use]
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    #[must_use]
    pub fn whose_turn(&self) -> PlayerId {
        self.state.whose_turn
    }

    #[must_use]
    pub fn current_state(&self) -> StateId {
        self.state.state
    }

    #[must_use]
    pub fn state_name(&self) -> &'static str {
        self.rules.states().name(self.state.state)
    }

    #[must_use]
    pub fn state_config(&self) -> &StateConfig {
        self.rules.states().config(self.state.state)
    }

    #[must_use]
    pub fn ply(&self) -> u32 {
        self.state.ply
    }

    #[must_use]
    pub fn result(&self) -> Option<&GameResult> {
        self.state.result.as_ref()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state_config().terminal
    }

    /// Number of undo frames. One per successful execute.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<&UndoFrame> {
        self.undo.last()
    }

    /// Resolved position, eligible for the repetition table: a digestible
    /// state with nothing picked and no staged move pending.
    #[must_use]
    pub fn is_digestible(&self) -> bool {
        self.state_config().digestible && self.state.is_settled()
    }

    #[must_use]
    pub fn digest(&self) -> u64 {
        self.keys.digest(&self.state)
    }

    /// Apply `mv`. Fails only on structurally impossible input; the board is
    /// unchanged after a failure.
    pub fn execute(&mut self, mv: &Move, mode: ExecuteMode) -> Result<ExecuteReport, EngineError> {
        let mut frame = UndoFrame::begin(mv, &self.state);
        let mut report = ExecuteReport::default();
        let lenient = mode == ExecuteMode::Replay;

        match self.apply(mv, mode, lenient, &mut frame, &mut report) {
            Ok(()) => {
                trace!("execute `{mv}` -> {} ({})", self.state_name(), self.whose_turn());
                self.undo.push(frame);
                Ok(report)
            }
            Err(err) => {
                frame.rollback(&mut self.state);
                error!("rolled back `{mv}` in {}: {err}", self.state_name());
                Err(err)
            }
        }
    }

    /// Execute for search: if the move leaves a confirmation pending, apply
    /// the `done` too. One undo frame covers both, so one `unexecute(mv)`
    /// reverts the whole ply.
    pub fn robot_execute(&mut self, mv: &Move) -> Result<(), EngineError> {
        let mut frame = UndoFrame::begin(mv, &self.state);
        let mut report = ExecuteReport::default();

        let mut outcome = self.apply(mv, ExecuteMode::Replay, false, &mut frame, &mut report);
        if outcome.is_ok() {
            let config = self.state_config();
            if config.done_pending && !config.terminal {
                let done = Move::done(mv.player);
                outcome = self.apply(&done, ExecuteMode::Replay, false, &mut frame, &mut report);
            }
        }

        match outcome {
            Ok(()) => {
                self.undo.push(frame);
                Ok(())
            }
            Err(err) => {
                frame.rollback(&mut self.state);
                debug!("rejected robot move `{mv}` in {}: {err}", self.state_name());
                Err(err)
            }
        }
    }

    /// Revert the most recent execute, which must have been `mv`.
    pub fn unexecute(&mut self, mv: &Move) -> Result<(), EngineError> {
        let top = self
            .undo
            .last()
            .ok_or_else(|| EngineError::NothingToUndo(mv.to_string()))?;
        if top.mv() != mv {
            return Err(EngineError::UndoOutOfOrder {
                expected: top.mv().to_string(),
                got: mv.to_string(),
            });
        }
        self.undo_last()?;
        Ok(())
    }

    /// Revert the most recent execute, whatever it was.
    pub fn undo_last(&mut self) -> Result<Move, EngineError> {
        let frame = self
            .undo
            .pop()
            .ok_or_else(|| EngineError::NothingToUndo("<last>".into()))?;
        let mv = frame.mv().clone();
        frame.rollback(&mut self.state);
        trace!("unexecute `{mv}` -> {}", self.state_name());
        Ok(mv)
    }

    /// Moves available to `player`, in a fixed order.
    ///
    /// Empty in terminal and puzzle states. While a piece is picked, the only
    /// move is dropping it back. After a drop, `done` and lifting the dropped
    /// piece again, as far as the state table models them. In a done-pending
    /// state, `done`.
    #[must_use]
    pub fn generate_moves(&self, player: PlayerId) -> Vec<Move> {
        if let Some(moves) = self.forced_moves(player) {
            return moves;
        }
        self.rules.generate_moves(&self.state, player)
    }

    /// Biased sample for playouts. Same gating as `generate_moves`.
    pub fn random_move(&self, player: PlayerId, rng: &mut GameRng) -> Option<Move> {
        if let Some(moves) = self.forced_moves(player) {
            return rng.choose(&moves).cloned();
        }
        self.rules.random_move(&self.state, player, rng)
    }

    fn forced_moves(&self, player: PlayerId) -> Option<Vec<Move>> {
        let config = self.state_config();
        if config.terminal || config.puzzle {
            return Some(Vec::new());
        }
        let may_act = config.simultaneous || player == self.state.whose_turn;
        if self.state.picked.is_some() {
            let back = self.state.sources.last().filter(|_| may_act);
            return Some(
                back.map(|(cell, _)| Move::drop(player, self.state.graph().locator(*cell)))
                    .into_iter()
                    .collect(),
            );
        }
        if let Some((dest, _)) = self.state.dests.last() {
            // A drop awaiting confirmation: confirm it or take it back.
            if !may_act {
                return Some(Vec::new());
            }
            let table = self.rules.states();
            let current = self.state.state;
            let take_back = Move::pick(player, self.state.graph().locator(*dest));
            return Some(
                [Move::done(player), take_back]
                    .into_iter()
                    .filter(|mv| table.try_next(current, mv.opcode).is_some())
                    .collect(),
            );
        }
        if config.done_pending {
            return Some(if may_act { vec![Move::done(player)] } else { Vec::new() });
        }
        None
    }

    /// Field-by-field comparison, then digests. Debug oracle; names the first
    /// difference.
    pub fn check_same(&self, other: &Self) -> Result<(), EngineError> {
        self.state
            .check_same(&other.state)
            .map_err(EngineError::Mismatch)?;
        if self.digest() != other.digest() {
            return Err(EngineError::Mismatch(format!(
                "digest {:016x} vs {:016x} with equal fields",
                self.digest(),
                other.digest()
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.check_same(other).is_ok()
    }

    /// Overwrite this board with `other`'s position, reusing storage. The
    /// undo history is dropped.
    pub fn copy_from(&mut self, other: &Self) {
        self.rules = Arc::clone(&other.rules);
        self.init.clone_from(&other.init);
        self.state.copy_from(&other.state);
        self.undo.clear();
        self.keys = Arc::clone(&other.keys);
        self.leniency = Arc::clone(&other.leniency);
    }

    /// Private copy for a search worker: same position, empty undo history.
    #[must_use]
    pub fn snapshot(&self) -> Self {
        Self {
            rules: Arc::clone(&self.rules),
            init: self.init.clone(),
            state: self.state.clone(),
            undo: Vec::new(),
            keys: Arc::clone(&self.keys),
            leniency: Arc::clone(&self.leniency),
        }
    }

    fn apply(
        &mut self,
        mv: &Move,
        mode: ExecuteMode,
        lenient: bool,
        frame: &mut UndoFrame,
        report: &mut ExecuteReport,
    ) -> Result<(), EngineError> {
        let Board {
            rules,
            state: board,
            leniency,
            ..
        } = self;
        let rules: &R = rules;
        let table = rules.states();
        let current = board.state;
        let config = table.config(current);

        let target = match table.try_next(current, mv.opcode) {
            Some(target) => target,
            None => {
                let admitted = if lenient {
                    leniency.admit(table, current, mv.opcode)
                } else {
                    None
                };
                let Some(target) = admitted else {
                    return Err(EngineError::UnmodeledTransition {
                        state: table.name(current).to_string(),
                        opcode: mv.opcode,
                    });
                };
                warn!(
                    "replay leniency admits `{mv}` in {} -> {}",
                    table.name(current),
                    table.name(target)
                );
                target
            }
        };

        if mv.player.index() >= board.player_count() {
            return Err(illegal(mv, table.name(current), "no such player"));
        }
        let unrestricted = config.simultaneous
            || config.puzzle
            || matches!(mv.opcode, Opcode::Start | Opcode::Edit);
        if !unrestricted && mv.player != board.whose_turn {
            return Err(EngineError::OutOfTurn {
                mv: mv.to_string(),
                player: mv.player.to_string(),
                expected: board.whose_turn.to_string(),
            });
        }

        match mv.opcode {
            Opcode::Start => {
                require_empty_hand(board, mv, "put the picked piece down first")?;
                board.sources.clear();
                board.dests.clear();
                board.whose_turn = mv.player;
                board.result = None;
                board.state = target;
            }
            Opcode::Edit => {
                require_empty_hand(board, mv, "put the picked piece down first")?;
                board.sources.clear();
                board.dests.clear();
                board.state = target;
            }
            Opcode::Resign => {
                require_empty_hand(board, mv, "put the picked piece down first")?;
                board.state = target;
            }
            Opcode::Pick | Opcode::PickB => {
                if board.picked.is_some() {
                    return Err(conflict(mv, "already holding a piece"));
                }
                let loc = mv
                    .from
                    .ok_or_else(|| illegal(mv, table.name(current), "pick needs a source"))?;
                let cell = board.graph().require(loc)?;
                let takes_back = board.dests.last().is_some_and(|(dest, _)| *dest == cell);
                if !takes_back && !config.puzzle {
                    rules.check_pick(board, mv, cell)?;
                }
                let piece = Effects::new(board, frame, report, mode).pop(cell)?;
                board.picked = Some(piece);

                if takes_back {
                    // Lifting the piece just dropped takes the drop back.
                    if let Some((_, before)) = board.dests.pop() {
                        board.state = before;
                    }
                } else {
                    board.sources.push((cell, current));
                    board.state = target;
                }
            }
            Opcode::Drop | Opcode::DropB => {
                let piece = board
                    .picked
                    .ok_or_else(|| conflict(mv, "nothing is picked"))?;
                let loc = mv
                    .to
                    .ok_or_else(|| illegal(mv, table.name(current), "drop needs a destination"))?;
                let cell = board.graph().require(loc)?;
                let returns = board.sources.last().is_some_and(|(source, _)| *source == cell);
                if !returns && !config.puzzle {
                    rules.check_drop(board, mv, cell)?;
                }
                Effects::new(board, frame, report, mode).push(cell, piece);
                board.picked = None;

                match board.sources.last().copied() {
                    Some((source, before)) if source == cell => {
                        // Dropped back where it came from: the pick never happened.
                        board.sources.pop();
                        board.state = before;
                    }
                    source => {
                        board.dests.push((cell, current));
                        board.state = target;
                        if let (Some((from, _)), true) = (source, mode.animates()) {
                            report.animations.push(AnimationStep {
                                piece,
                                from,
                                to: cell,
                            });
                        }
                    }
                }
            }
            Opcode::Done => {
                require_empty_hand(board, mv, "cannot confirm while holding a piece")?;
                let staged = (
                    board.sources.first().map(|(cell, _)| *cell),
                    board.dests.last().map(|(cell, _)| *cell),
                );
                board.sources.clear();
                board.dests.clear();
                if let (Some(from), Some(to)) = staged {
                    let mut fx = Effects::new(board, frame, report, mode);
                    rules.on_drop(&mut fx, from, to, mv.player)?;
                }

                board.ply += 1;
                if config.resign_pending {
                    board.result = Some(GameResult::all_but(mv.player, board.player_count()));
                    board.state = table.game_over();
                } else if let Some(result) = rules.outcome(board) {
                    board.result = Some(result);
                    board.state = table.game_over();
                } else {
                    board.whose_turn = rules.next_player(board, mv.player);
                    board.state = target;
                }
            }
            Opcode::Pass | Opcode::Place | Opcode::Move | Opcode::Line => {
                require_empty_hand(board, mv, "a staged move is in progress")?;
                if !board.sources.is_empty() || !board.dests.is_empty() {
                    return Err(conflict(mv, "a staged move is in progress"));
                }
                rules.apply(&mut Effects::new(board, frame, report, mode), mv)?;
                board.state = target;
            }
        }
        Ok(())
    }
}

fn build<R: RuleSet>(rules: &R, init: &GameInit) -> Result<(BoardState, DigestKeys), EngineError> {
    let players = init.player_count();
    if players == 0 {
        return Err(EngineError::BadInit(format!("`{init}` has no players")));
    }
    let layout = rules.layout(init)?;
    let graph = Arc::new(layout.graph);
    let mut cells = Cells::new(Arc::clone(&graph), players, layout.base_level);
    let mut rng = GameRng::new(init.seed);
    rules.setup(&mut cells, init, &mut rng)?;

    let keys = DigestKeys::new(&graph, players, layout.counters);
    let state = BoardState::new(cells, players, layout.counters, rules.states().initial());
    Ok((state, keys))
}

fn require_empty_hand(
    board: &BoardState,
    mv: &Move,
    reason: &'static str,
) -> Result<(), EngineError> {
    if board.picked.is_some() {
        return Err(conflict(mv, reason));
    }
    Ok(())
}

fn conflict(mv: &Move, reason: &'static str) -> EngineError {
    EngineError::PickConflict {
        mv: mv.to_string(),
        reason,
    }
}

fn illegal(mv: &Move, state: &str, reason: &'static str) -> EngineError {
    EngineError::IllegalInState {
        mv: mv.to_string(),
        state: state.to_string(),
        reason,
    }
}
