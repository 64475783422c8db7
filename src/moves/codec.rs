//! Text form of moves.
//!
//! ```text
//! [seq] start P<n>
//! [seq] edit | done | resign | pass
//! [seq] pick  R<n>              [seq] drop  R<n>
//! [seq] pickb <col> <row>       [seq] dropb <col> <row>
//! [seq] place R<n> <col> <row> [#<piece>]
//! [seq] move  <col> <row> <col> <row>
//! [seq] line  <col> <row> <col> <row> <col> <row>     start, end, anchor
//! ```
//!
//! Parsing is grammar-only: it never looks at a board, so `place R0 Z 99`
//! parses fine and fails later when executed.

use std::str::SplitWhitespace;

use super::opcode::Opcode;
use super::record::Move;
use crate::core::{Locator, ParseError, PieceId, PlayerId, Position, RackId};

/// Parse one move played by `player`.
///
/// ```
/// use boardcore::core::{PlayerId, Position, RackId};
/// use boardcore::moves::{parse, Move};
///
/// let mv = parse("12 place R0 C 3", PlayerId::new(0)).unwrap();
/// assert_eq!(mv, Move::place(PlayerId::new(0), RackId(0), Position::new('C', 3)));
/// assert_eq!(mv.sequence, Some(12));
/// ```
pub fn parse(text: &str, player: PlayerId) -> Result<Move, ParseError> {
    let mut words = text.split_whitespace();
    let mut first = words.next().ok_or(ParseError::Empty)?;

    let mut sequence = None;
    if first.bytes().all(|b| b.is_ascii_digit()) {
        let number = first
            .parse::<u32>()
            .map_err(|_| ParseError::BadSequence(first.to_string()))?;
        sequence = Some(number);
        first = words.next().ok_or(ParseError::Empty)?;
    }

    let opcode =
        Opcode::from_keyword(first).ok_or_else(|| ParseError::UnknownOpcode(first.to_string()))?;
    let mut tokens = Tokens {
        words,
        opcode: opcode.keyword(),
    };

    let mut mv = match opcode {
        Opcode::Edit | Opcode::Done | Opcode::Resign | Opcode::Pass => Move::new(opcode, player),
        Opcode::Start => Move::start(tokens.player()?),
        Opcode::Pick => Move::pick(player, Locator::Rack(tokens.rack("source")?)),
        Opcode::PickB => Move::pick(player, Locator::Board(tokens.position("source")?)),
        Opcode::Drop => Move::drop(player, Locator::Rack(tokens.rack("destination")?)),
        Opcode::DropB => Move::drop(player, Locator::Board(tokens.position("destination")?)),
        Opcode::Place => {
            let rack = tokens.rack("source")?;
            let to = tokens.position("destination")?;
            let mv = Move::place(player, rack, to);
            match tokens.optional_piece()? {
                Some(piece) => mv.with_piece(piece),
                None => mv,
            }
        }
        Opcode::Move => {
            let from = tokens.position("source")?;
            let to = tokens.position("destination")?;
            Move::step(player, from, to)
        }
        Opcode::Line => {
            let start = tokens.position("line start")?;
            let end = tokens.position("line end")?;
            let anchor = tokens.position("anchor")?;
            Move::line(player, start, end, anchor)
        }
    };
    tokens.finish()?;

    mv.sequence = sequence;
    Ok(mv)
}

/// Canonical text for a move. `parse(&encode(m), m.player)` equals `m`.
#[must_use]
pub fn encode(mv: &Move) -> String {
    mv.to_string()
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(seq) = self.sequence {
            write!(f, "{seq} ")?;
        }
        f.write_str(self.opcode.keyword())?;

        if self.opcode == Opcode::Start {
            write!(f, " {}", self.player)?;
        }
        let operands = match self.opcode {
            Opcode::Line => [self.from, self.via, self.to],
            _ => [self.from, self.to, None],
        };
        for loc in operands.into_iter().flatten() {
            match loc {
                Locator::Board(p) => write!(f, " {} {}", p.col, p.row)?,
                Locator::Rack(r) => write!(f, " {r}")?,
            }
        }
        if let Some(piece) = self.piece {
            write!(f, " {piece}")?;
        }
        Ok(())
    }
}

struct Tokens<'a> {
    words: SplitWhitespace<'a>,
    opcode: &'static str,
}

impl<'a> Tokens<'a> {
    fn next(&mut self, operand: &'static str) -> Result<&'a str, ParseError> {
        self.words.next().ok_or(ParseError::MissingOperand {
            opcode: self.opcode,
            operand,
        })
    }

    fn position(&mut self, operand: &'static str) -> Result<Position, ParseError> {
        let col = self.next(operand)?;
        let mut chars = col.chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
            _ => return Err(ParseError::BadColumn(col.to_string())),
        };

        let row = self.next(operand)?;
        let number: u16 = row
            .parse()
            .ok()
            .filter(|r| *r > 0)
            .ok_or_else(|| ParseError::BadRow(row.to_string()))?;

        Ok(Position::new(letter, number))
    }

    fn rack(&mut self, operand: &'static str) -> Result<RackId, ParseError> {
        let word = self.next(operand)?;
        prefixed_number(word, 'R')
            .map(RackId)
            .ok_or_else(|| ParseError::BadRack(word.to_string()))
    }

    fn player(&mut self) -> Result<PlayerId, ParseError> {
        let word = self.next("player")?;
        prefixed_number(word, 'P')
            .map(PlayerId)
            .ok_or_else(|| ParseError::BadPlayer(word.to_string()))
    }

    fn optional_piece(&mut self) -> Result<Option<PieceId>, ParseError> {
        let Some(word) = self.words.next() else {
            return Ok(None);
        };
        word.strip_prefix('#')
            .and_then(|n| n.parse().ok())
            .map(|n| Some(PieceId(n)))
            .ok_or_else(|| ParseError::BadPiece(word.to_string()))
    }

    fn finish(mut self) -> Result<(), ParseError> {
        let rest: Vec<&str> = self.words.by_ref().collect();
        if rest.is_empty() {
            Ok(())
        } else {
            Err(ParseError::Trailing(rest.join(" ")))
        }
    }
}

/// `R3` / `r3` -> 3.
fn prefixed_number(word: &str, prefix: char) -> Option<u8> {
    let mut chars = word.chars();
    let head = chars.next()?;
    if !head.eq_ignore_ascii_case(&prefix) {
        return None;
    }
    chars.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const P0: PlayerId = PlayerId(0);

    fn p(col: char, row: u16) -> Position {
        Position::new(col, row)
    }

    #[test]
    fn test_encode_forms() {
        let cases = [
            (Move::start(PlayerId(1)), "start P1"),
            (Move::done(P0), "done"),
            (Move::pick(P0, Locator::Rack(RackId(2))), "pick R2"),
            (Move::pick(P0, Locator::Board(p('C', 3))), "pickb C 3"),
            (Move::drop(P0, Locator::Board(p('C', 4))), "dropb C 4"),
            (Move::place(P0, RackId(0), p('C', 3)), "place R0 C 3"),
            (
                Move::place(P0, RackId(0), p('C', 3)).with_piece(PieceId(4)),
                "place R0 C 3 #4",
            ),
            (Move::step(P0, p('C', 3), p('C', 4)), "move C 3 C 4"),
            (
                Move::line(P0, p('A', 1), p('B', 1), p('C', 1)),
                "line A 1 B 1 C 1",
            ),
            (Move::pass(P0).with_sequence(9), "9 pass"),
        ];
        for (mv, text) in cases {
            assert_eq!(encode(&mv), text);
            assert_eq!(parse(text, mv.player).unwrap(), mv, "{text}");
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let mv = parse("PICKB c 3", P0).unwrap();
        assert_eq!(mv, Move::pick(P0, Locator::Board(p('C', 3))));
        let mv = parse("Drop r1", P0).unwrap();
        assert_eq!(mv, Move::drop(P0, Locator::Rack(RackId(1))));
    }

    #[test]
    fn test_sequence_is_unspecified() {
        let mv = parse("  41   move A 1 A 2 ", P0).unwrap();
        assert_eq!(mv.sequence, Some(41));
        assert_eq!(mv, Move::step(P0, p('A', 1), p('A', 2)));
    }

    #[test]
    fn test_start_names_its_own_player() {
        let mv = parse("start P2", P0).unwrap();
        assert_eq!(mv.player, PlayerId(2));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse("", P0), Err(ParseError::Empty));
        assert_eq!(parse("7", P0), Err(ParseError::Empty));
        assert_eq!(
            parse("99999999999 pass", P0),
            Err(ParseError::BadSequence("99999999999".into()))
        );
        assert_eq!(parse("jump", P0), Err(ParseError::UnknownOpcode("jump".into())));
        assert_eq!(
            parse("move C 3", P0),
            Err(ParseError::MissingOperand {
                opcode: "move",
                operand: "destination"
            })
        );
        assert_eq!(parse("pickb CC 3", P0), Err(ParseError::BadColumn("CC".into())));
        assert_eq!(parse("pickb C 0", P0), Err(ParseError::BadRow("0".into())));
        assert_eq!(parse("pickb C x", P0), Err(ParseError::BadRow("x".into())));
        assert_eq!(parse("pick Q1", P0), Err(ParseError::BadRack("Q1".into())));
        assert_eq!(parse("start 1", P0), Err(ParseError::BadPlayer("1".into())));
        assert_eq!(
            parse("place R0 A 1 piece", P0),
            Err(ParseError::BadPiece("piece".into()))
        );
        assert_eq!(parse("done now", P0), Err(ParseError::Trailing("now".into())));
    }

    #[test]
    fn test_parse_never_checks_the_board() {
        assert!(parse("place R9 Z 999", P0).is_ok());
    }
}
