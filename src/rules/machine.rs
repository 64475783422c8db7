//! The per-game state machine.
//!
//! A `StateTable` enumerates a game's states, their flags, and every
//! `(state, opcode) -> state` transition the game models. Anything not in
//! the table is an engine or protocol bug and fails with
//! [`EngineError::UnmodeledTransition`]. The only escape hatch is a
//! [`ReplayLeniency`] policy, which the board consults for archived records
//! in replay mode and nowhere else.
//!
//! ```
//! use boardcore::moves::Opcode;
//! use boardcore::rules::{StateConfig, StateTable};
//!
//! let mut builder = StateTable::builder();
//! let play = builder.state(StateConfig::new("Play").digestible());
//! let confirm = builder.state(StateConfig::new("Confirm").done_pending());
//! let over = builder.state(StateConfig::new("GameOver").terminal());
//! builder.transition(play, Opcode::Place, confirm);
//! builder.transition(confirm, Opcode::Done, play);
//! builder.transition(over, Opcode::Edit, over);
//! let table = builder.build(play, over, over).unwrap();
//!
//! assert_eq!(table.next_state(play, Opcode::Place), Ok(confirm));
//! assert!(table.next_state(play, Opcode::Done).is_err());
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::EngineError;
use crate::moves::Opcode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateId(pub u8);

impl StateId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Name and flags of one state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateConfig {
    pub name: &'static str,
    /// Game over. No moves are generated.
    pub terminal: bool,
    /// A `done` confirmation is actionable. `robot_execute` applies it
    /// automatically.
    pub done_pending: bool,
    /// Any player may act, not only the one whose turn it is.
    pub simultaneous: bool,
    /// Fully resolved; positions here count toward repetition.
    pub digestible: bool,
    /// Free editing. No moves are generated and turn order is not enforced.
    pub puzzle: bool,
    /// `done` here ends the game with every other player winning.
    pub resign_pending: bool,
}

impl StateConfig {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            terminal: false,
            done_pending: false,
            simultaneous: false,
            digestible: false,
            puzzle: false,
            resign_pending: false,
        }
    }

    #[must_use]
    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    #[must_use]
    pub fn done_pending(mut self) -> Self {
        self.done_pending = true;
        self
    }

    #[must_use]
    pub fn simultaneous(mut self) -> Self {
        self.simultaneous = true;
        self
    }

    #[must_use]
    pub fn digestible(mut self) -> Self {
        self.digestible = true;
        self
    }

    #[must_use]
    pub fn puzzle(mut self) -> Self {
        self.puzzle = true;
        self
    }

    /// Implies `done_pending`.
    #[must_use]
    pub fn resign_pending(mut self) -> Self {
        self.resign_pending = true;
        self.done_pending = true;
        self
    }
}

#[derive(Clone, Debug)]
pub struct StateTable {
    states: Vec<StateConfig>,
    transitions: FxHashMap<(StateId, Opcode), StateId>,
    initial: StateId,
    game_over: StateId,
    puzzle: StateId,
}

impl StateTable {
    #[must_use]
    pub fn builder() -> StateTableBuilder {
        StateTableBuilder::default()
    }

    /// The state a fresh board starts in.
    #[must_use]
    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// Where the board goes when the game ends.
    #[must_use]
    pub fn game_over(&self) -> StateId {
        self.game_over
    }

    /// Where `edit` leads.
    #[must_use]
    pub fn puzzle(&self) -> StateId {
        self.puzzle
    }

    /// Flags of `state`. Panics on a foreign id; every id in circulation
    /// came from this table's builder.
    #[must_use]
    pub fn config(&self, state: StateId) -> &StateConfig {
        &self.states[state.index()]
    }

    #[must_use]
    pub fn name(&self, state: StateId) -> &'static str {
        self.states
            .get(state.index())
            .map_or("<unknown>", |s| s.name)
    }

    pub fn states(&self) -> impl Iterator<Item = (StateId, &StateConfig)> {
        self.states
            .iter()
            .enumerate()
            .map(|(i, s)| (StateId(i as u8), s))
    }

    #[must_use]
    pub fn try_next(&self, state: StateId, opcode: Opcode) -> Option<StateId> {
        self.transitions.get(&(state, opcode)).copied()
    }

    /// Modeled successor of `state` under `opcode`.
    pub fn next_state(&self, state: StateId, opcode: Opcode) -> Result<StateId, EngineError> {
        self.try_next(state, opcode)
            .ok_or_else(|| EngineError::UnmodeledTransition {
                state: self.name(state).to_string(),
                opcode,
            })
    }

    /// Opcodes modeled in `state`, sorted.
    #[must_use]
    pub fn opcodes(&self, state: StateId) -> Vec<Opcode> {
        let mut ops: Vec<Opcode> = Opcode::ALL
            .into_iter()
            .filter(|op| self.transitions.contains_key(&(state, *op)))
            .collect();
        ops.sort();
        ops
    }
}

#[derive(Debug, Default)]
pub struct StateTableBuilder {
    states: Vec<StateConfig>,
    transitions: FxHashMap<(StateId, Opcode), StateId>,
}

impl StateTableBuilder {
    pub fn state(&mut self, config: StateConfig) -> StateId {
        assert!(self.states.len() < u8::MAX as usize, "Too many states");
        self.states.push(config);
        StateId((self.states.len() - 1) as u8)
    }

    pub fn transition(&mut self, from: StateId, opcode: Opcode, to: StateId) -> &mut Self {
        self.transitions.insert((from, opcode), to);
        self
    }

    /// Same target for several opcodes.
    pub fn transitions(&mut self, from: StateId, opcodes: &[Opcode], to: StateId) -> &mut Self {
        for op in opcodes {
            self.transition(from, *op, to);
        }
        self
    }

    /// Validate and freeze. Every non-terminal state needs at least one
    /// outgoing transition, done-pending states must model `done`, and
    /// `game_over` must be terminal.
    pub fn build(
        self,
        initial: StateId,
        game_over: StateId,
        puzzle: StateId,
    ) -> Result<StateTable, EngineError> {
        let n = self.states.len();
        for id in [initial, game_over, puzzle] {
            if id.index() >= n {
                return Err(EngineError::BadStateTable(format!("state {} not declared", id.0)));
            }
        }
        for (&(from, op), &to) in &self.transitions {
            if from.index() >= n || to.index() >= n {
                return Err(EngineError::BadStateTable(format!(
                    "transition {} --{op}--> {} uses an undeclared state",
                    from.0, to.0
                )));
            }
        }
        if !self.states[game_over.index()].terminal {
            return Err(EngineError::BadStateTable(format!(
                "game-over state {} is not terminal",
                self.states[game_over.index()].name
            )));
        }

        let table = StateTable {
            states: self.states,
            transitions: self.transitions,
            initial,
            game_over,
            puzzle,
        };
        for (id, config) in table.states() {
            if config.terminal {
                continue;
            }
            if table.opcodes(id).is_empty() {
                return Err(EngineError::BadStateTable(format!(
                    "state {} has no way out",
                    config.name
                )));
            }
            if config.done_pending && table.try_next(id, Opcode::Done).is_none() {
                return Err(EngineError::BadStateTable(format!(
                    "state {} is done-pending but does not model done",
                    config.name
                )));
            }
        }
        Ok(table)
    }
}

/// Policy for transitions that damaged archived records need but the table
/// does not model. Consulted only in replay mode, only after the table
/// lookup failed. The board logs every admitted transition.
pub trait ReplayLeniency: Send + Sync + std::fmt::Debug {
    fn admit(&self, table: &StateTable, state: StateId, opcode: Opcode) -> Option<StateId>;
}

/// Admits nothing. The default.
#[derive(Clone, Copy, Debug, Default)]
pub struct Strict;

impl ReplayLeniency for Strict {
    fn admit(&self, _table: &StateTable, _state: StateId, _opcode: Opcode) -> Option<StateId> {
        None
    }
}

/// Admits an explicit list of extra transitions.
#[derive(Clone, Debug, Default)]
pub struct LenientTransitions {
    extra: FxHashMap<(StateId, Opcode), StateId>,
}

impl LenientTransitions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn allow(mut self, from: StateId, opcode: Opcode, to: StateId) -> Self {
        self.extra.insert((from, opcode), to);
        self
    }
}

impl ReplayLeniency for LenientTransitions {
    fn admit(&self, _table: &StateTable, state: StateId, opcode: Opcode) -> Option<StateId> {
        self.extra.get(&(state, opcode)).copied()
    }
}
