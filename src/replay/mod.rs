//! Live sessions and game records.
//!
//! A [`Session`] is what a UI or network front end drives: it parses move
//! text, executes it, keeps the move history with a digest after every
//! move, and counts repetitions at digestible positions. A [`GameRecord`]
//! is the persisted form of that history; [`replay_record`] rebuilds the
//! game from one and checks every recorded digest.
//!
//! What to do with a damaged record line is decided here, by a
//! [`DamagedLinePolicy`], never inside the board.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Board, ExecuteMode, ExecuteReport, RepeatedPositions};
use crate::core::{EngineError, GameInit, ParseError};
use crate::moves::{encode, parse, Move};
use crate::rules::{GameResult, RuleSet};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("move {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },

    #[error("move {line}: digest {actual:016x}, record says {expected:016x}")]
    DigestMismatch {
        line: usize,
        expected: u64,
        actual: u64,
    },

    #[error("the game is drawn by repetition")]
    Drawn,

    #[error("record encoding: {0}")]
    Codec(String),
}

/// One line of a game record: canonical move text and the digest after it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedMove {
    pub text: String,
    pub digest: u64,
}

/// Everything needed to reproduce a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub init: GameInit,
    pub moves: Vec<RecordedMove>,
}

impl GameRecord {
    #[must_use]
    pub fn new(init: GameInit) -> Self {
        Self {
            init,
            moves: Vec::new(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SessionError> {
        bincode::serialize(self).map_err(|e| SessionError::Codec(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SessionError> {
        bincode::deserialize(bytes).map_err(|e| SessionError::Codec(e.to_string()))
    }
}

/// What replay does with a record line that does not parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamagedLinePolicy {
    /// Stop with [`SessionError::Parse`].
    #[default]
    Reject,
    /// Log it and carry on with the next line.
    Skip,
}

/// A board plus the history a front end needs around it.
#[derive(Clone, Debug)]
pub struct Session<R: RuleSet> {
    board: Board<R>,
    moves: Vec<RecordedMove>,
    positions: RepeatedPositions,
    drawn: bool,
}

impl<R: RuleSet> Session<R> {
    /// Start from `board`'s current position, which counts as the first
    /// occurrence of itself. Draw at the default threshold.
    #[must_use]
    pub fn new(board: Board<R>) -> Self {
        Self::with_threshold(board, RepeatedPositions::default().threshold())
    }

    #[must_use]
    pub fn with_threshold(board: Board<R>, threshold: u32) -> Self {
        let mut positions = RepeatedPositions::new(threshold);
        if board.is_digestible() {
            positions.record(board.digest());
        }
        let drawn = board.is_digestible() && positions.is_drawn(board.digest());
        Self {
            board,
            moves: Vec::new(),
            positions,
            drawn,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board<R> {
        &self.board
    }

    #[must_use]
    pub fn positions(&self) -> &RepeatedPositions {
        &self.positions
    }

    #[must_use]
    pub fn moves(&self) -> &[RecordedMove] {
        &self.moves
    }

    #[must_use]
    pub fn is_drawn(&self) -> bool {
        self.drawn
    }

    /// The board's result, or a draw by repetition.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        if self.drawn {
            return Some(GameResult::Draw);
        }
        self.board.result().cloned()
    }

    /// The history so far, ready to persist.
    #[must_use]
    pub fn record(&self) -> GameRecord {
        GameRecord {
            init: self.board.init().clone(),
            moves: self.moves.clone(),
        }
    }

    /// Parse `text` for the player to move and execute it.
    pub fn play_text(
        &mut self,
        text: &str,
        mode: ExecuteMode,
    ) -> Result<ExecuteReport, SessionError> {
        let mv = parse(text, self.board.whose_turn()).map_err(|source| SessionError::Parse {
            line: self.moves.len(),
            source,
        })?;
        self.play(&mv, mode)
    }

    pub fn play(&mut self, mv: &Move, mode: ExecuteMode) -> Result<ExecuteReport, SessionError> {
        if self.drawn {
            return Err(SessionError::Drawn);
        }
        let report = self.board.execute(mv, mode)?;
        let digest = self.board.digest();
        if counts_as_occurrence(mv) && self.board.is_digestible() {
            let count = self.positions.record(digest);
            if count >= self.positions.threshold() {
                debug!("position {digest:016x} seen {count} times, game drawn");
                self.drawn = true;
            }
        }
        self.moves.push(RecordedMove {
            text: encode(mv),
            digest,
        });
        Ok(report)
    }

    /// Take back the last move, repetition count included.
    pub fn undo_last(&mut self) -> Result<Move, SessionError> {
        if self.moves.is_empty() {
            return Err(EngineError::NothingToUndo("<session start>".into()).into());
        }
        let counted = self
            .board
            .last_frame()
            .is_some_and(|frame| counts_as_occurrence(frame.mv()));
        if counted && self.board.is_digestible() {
            self.positions.remove(self.board.digest());
        }
        let mv = self.board.undo_last()?;
        self.moves.pop();
        self.drawn = self.board.is_digestible() && self.positions.is_drawn(self.board.digest());
        Ok(mv)
    }

    #[must_use]
    pub fn into_board(self) -> Board<R> {
        self.board
    }
}

/// Dropping a picked piece back where it came from lands on a settled
/// position that already counted; staged halves never add an occurrence.
fn counts_as_occurrence(mv: &Move) -> bool {
    !mv.opcode.is_staged()
}

/// A replayed game and the record lines that were skipped as damaged.
#[derive(Debug)]
pub struct Replayed<R: RuleSet> {
    pub session: Session<R>,
    pub skipped: Vec<usize>,
}

/// Rebuild `record` on `board` (reset to the record's init) in replay mode,
/// checking the digest after every move. Any leniency attached to `board`
/// applies.
pub fn replay_record<R: RuleSet>(
    mut board: Board<R>,
    record: &GameRecord,
    policy: DamagedLinePolicy,
) -> Result<Replayed<R>, SessionError> {
    board.reinit(record.init.clone())?;
    let mut session = Session::new(board);
    let mut skipped = Vec::new();

    for (line, recorded) in record.moves.iter().enumerate() {
        let mv = match parse(&recorded.text, session.board.whose_turn()) {
            Ok(mv) => mv,
            Err(source) => match policy {
                DamagedLinePolicy::Reject => return Err(SessionError::Parse { line, source }),
                DamagedLinePolicy::Skip => {
                    warn!("skipping damaged record line {line} `{}`: {source}", recorded.text);
                    skipped.push(line);
                    continue;
                }
            },
        };
        session.play(&mv, ExecuteMode::Replay)?;
        let actual = session.board.digest();
        if actual != recorded.digest {
            return Err(SessionError::DigestMismatch {
                line,
                expected: recorded.digest,
                actual,
            });
        }
    }
    Ok(Replayed { session, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;
    use crate::games::capture::CaptureRules;
    use crate::moves::Opcode;
    use crate::rules::LenientTransitions;
    use std::sync::Arc;

    fn board(init: &str) -> Board<CaptureRules> {
        let init: GameInit = init.parse().unwrap();
        let rules = Arc::new(CaptureRules::new(&init).unwrap());
        Board::new(rules, init).unwrap()
    }

    fn session_with(texts: &[&str]) -> Session<CaptureRules> {
        let mut session = Session::new(board("capture 2 1 1"));
        for text in texts {
            session.play_text(text, ExecuteMode::Live).unwrap();
        }
        session
    }

    const OPENING: [&str; 6] = [
        "place R0 C 3",
        "done",
        "place R1 C 4",
        "done",
        "move C 3 C 4",
        "done",
    ];

    #[test]
    fn test_record_replays_to_same_digest() {
        let session = session_with(&OPENING);
        let bytes = session.record().to_bytes().unwrap();
        let record = GameRecord::from_bytes(&bytes).unwrap();
        assert_eq!(record, session.record());

        let replayed =
            replay_record(board("capture 2 1 1"), &record, DamagedLinePolicy::Reject).unwrap();
        assert!(replayed.skipped.is_empty());
        assert!(replayed.session.board().same_as(session.board()));
    }

    #[test]
    fn test_replay_resets_a_used_board() {
        let record = session_with(&OPENING).record();
        let mut used = board("capture 2 1 1");
        let mv = parse("place R0 A 1", PlayerId::new(0)).unwrap();
        used.execute(&mv, ExecuteMode::Live).unwrap();
        let replayed = replay_record(used, &record, DamagedLinePolicy::Reject).unwrap();
        assert_eq!(replayed.session.board().digest(), record.moves[5].digest);
    }

    #[test]
    fn test_tampered_digest_is_caught() {
        let mut record = session_with(&OPENING).record();
        record.moves[2].digest ^= 1;
        let err =
            replay_record(board("capture 2 1 1"), &record, DamagedLinePolicy::Reject).unwrap_err();
        assert!(matches!(err, SessionError::DigestMismatch { line: 2, .. }));
    }

    #[test]
    fn test_damaged_line_policy() {
        let mut record = session_with(&OPENING).record();
        record.moves.insert(
            2,
            RecordedMove {
                text: "frobnicate C 3".into(),
                digest: 0,
            },
        );

        let err =
            replay_record(board("capture 2 1 1"), &record, DamagedLinePolicy::Reject).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Parse {
                line: 2,
                source: ParseError::UnknownOpcode(_)
            }
        ));

        let replayed =
            replay_record(board("capture 2 1 1"), &record, DamagedLinePolicy::Skip).unwrap();
        assert_eq!(replayed.skipped, vec![2]);
        assert_eq!(replayed.session.moves().len(), 6);
    }

    #[test]
    fn test_leniency_only_in_replay() {
        // An old client confirmed a resignation with `pass`.
        let mut live = Session::new(board("capture 2 1 1"));
        live.play_text("resign", ExecuteMode::Live).unwrap();
        assert!(live.play_text("pass", ExecuteMode::Live).is_err());

        let record = GameRecord {
            init: "capture 2 1 1".parse().unwrap(),
            moves: vec![],
        };
        let ids = board("capture 2 1 1").rules().ids();
        let lenient = board("capture 2 1 1")
            .with_leniency(LenientTransitions::new().allow(ids.resign, Opcode::Pass, ids.play));
        let mut replayed = replay_record(lenient, &record, DamagedLinePolicy::Reject).unwrap();
        let session = &mut replayed.session;
        session.play_text("resign", ExecuteMode::Replay).unwrap();
        session.play_text("pass", ExecuteMode::Replay).unwrap();
        assert_eq!(session.board().current_state(), ids.play);

        session.play_text("resign", ExecuteMode::Replay).unwrap();
        assert!(session.play_text("pass", ExecuteMode::Live).is_err());
        assert_eq!(session.board().current_state(), ids.resign);
    }

    #[test]
    fn test_undo_last_rewinds_history_and_counts() {
        let mut session = session_with(&OPENING[..2]);
        let digest = session.board().digest();
        assert_eq!(session.positions().count(digest), 1);

        let mv = session.undo_last().unwrap();
        assert_eq!(mv, Move::done(PlayerId::new(0)));
        assert_eq!(session.positions().count(digest), 0);
        assert_eq!(session.moves().len(), 1);

        session.undo_last().unwrap();
        assert!(matches!(
            session.undo_last(),
            Err(SessionError::Engine(EngineError::NothingToUndo(_)))
        ));
    }

    #[test]
    fn test_parse_error_reports_line() {
        let mut session = session_with(&OPENING[..2]);
        let err = session.play_text("place R1", ExecuteMode::Live).unwrap_err();
        assert!(matches!(err, SessionError::Parse { line: 2, .. }));
    }
}
