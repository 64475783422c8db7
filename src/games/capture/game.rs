//! Capture game rules.

use smallvec::SmallVec;

use super::config::CaptureConfig;
use crate::board::{BoardState, Cells, Effects};
use crate::core::{
    CellGraph, CellId, Direction, EngineError, GameInit, GameRng, Geometry, Locator, Piece,
    PieceRegistry, PlayerId, Position, RackId,
};
use crate::moves::{Move, Opcode};
use crate::rules::{BoardLayout, GameResult, RuleSet, StateConfig, StateId, StateTable};

/// Counter slot holding a player's capture count.
pub const CAPTURES: usize = 0;

/// State ids of the capture game's table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureStates {
    pub puzzle: StateId,
    pub play: StateId,
    pub confirm: StateId,
    pub resign: StateId,
    pub game_over: StateId,
}

#[derive(Clone, Debug)]
pub struct CaptureRules {
    config: CaptureConfig,
    players: usize,
    registry: PieceRegistry,
    stones: Vec<Piece>,
    tiles: [Piece; 2],
    table: StateTable,
    ids: CaptureStates,
}

impl CaptureRules {
    /// Rules for the variant and player count named in `init`.
    pub fn new(init: &GameInit) -> Result<Self, EngineError> {
        let config = CaptureConfig::from_init(init)?;
        let players = init.player_count();

        let mut registry = PieceRegistry::new();
        let stones = PlayerId::all(players)
            .map(|p| registry.register(format!("stone-{}", p.0), Some(p)))
            .collect();
        let tiles = [
            registry.register("tile-light", None),
            registry.register("tile-dark", None),
        ];
        let (table, ids) = state_table()?;

        Ok(Self {
            config,
            players,
            registry,
            stones,
            tiles,
            table,
            ids,
        })
    }

    #[must_use]
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    #[must_use]
    pub fn ids(&self) -> CaptureStates {
        self.ids
    }

    #[must_use]
    pub fn stone(&self, player: PlayerId) -> Piece {
        self.stones[player.index()]
    }

    /// Rack holding `player`'s unplayed stones.
    #[must_use]
    pub fn supply(&self, player: PlayerId) -> RackId {
        RackId(player.0)
    }

    /// Rack holding the stones `player` has captured.
    #[must_use]
    pub fn pile(&self, player: PlayerId) -> RackId {
        RackId(self.players as u8 + player.0)
    }

    fn rack_cell(&self, graph: &CellGraph, rack: RackId) -> Result<CellId, EngineError> {
        graph.require(Locator::Rack(rack))
    }

    fn capture(
        &self,
        fx: &mut Effects<'_>,
        cell: CellId,
        index: usize,
        player: PlayerId,
    ) -> Result<(), EngineError> {
        let pile = self.rack_cell(fx.graph(), self.pile(player))?;
        fx.capture_at(cell, index, pile)?;
        fx.add_counter(player, CAPTURES, 1)
    }

    /// Capture the enemy stone on top of `cell`, if there is one.
    fn capture_enemy_top(
        &self,
        fx: &mut Effects<'_>,
        cell: CellId,
        player: PlayerId,
    ) -> Result<(), EngineError> {
        let cells = fx.board().cells();
        if let Some(owner) = cells.top_owner(cell) {
            if owner != player {
                let index = cells.stack(cell).height() - 1;
                self.capture(fx, cell, index, player)?;
            }
        }
        Ok(())
    }

    /// Custodian captures around a stone that just landed on `cell`: an enemy
    /// stone with another of the mover's stones directly behind it.
    fn custodian(
        &self,
        fx: &mut Effects<'_>,
        cell: CellId,
        player: PlayerId,
    ) -> Result<(), EngineError> {
        if !self.config.custodian {
            return Ok(());
        }
        let mut victims: SmallVec<[CellId; 4]> = SmallVec::new();
        {
            let board = fx.board();
            let graph = board.graph();
            for dir in graph.directions() {
                let Some(near) = graph.neighbor(cell, dir) else { continue };
                let Some(far) = graph.neighbor(near, dir) else { continue };
                let cells = board.cells();
                let sandwiched = cells.top_owner(near).is_some_and(|o| o != player)
                    && cells.top_owner(far) == Some(player);
                if sandwiched {
                    victims.push(near);
                }
            }
        }
        for victim in victims {
            self.capture_enemy_top(fx, victim, player)?;
        }
        Ok(())
    }

    fn place(&self, fx: &mut Effects<'_>, mv: &Move) -> Result<(), EngineError> {
        let (Some(Locator::Rack(rack)), Some(to)) = (mv.from, mv.to) else {
            return Err(illegal(mv, "place needs a rack and a board cell"));
        };
        if rack != self.supply(mv.player) {
            return Err(illegal(mv, "place from another player's supply"));
        }
        let from = self.rack_cell(fx.graph(), rack)?;
        let to = fx.locate(to)?;
        if !fx.graph().is_on_board(to) || !fx.board().cells().is_empty(to) {
            return Err(illegal(mv, "place onto an occupied cell"));
        }
        let top = fx.board().cells().top(from);
        if let (Some(wanted), Some(top)) = (mv.piece, top) {
            if wanted != top.id {
                return Err(illegal(mv, "supply holds a different piece"));
            }
        }
        fx.transfer(from, to)?;
        self.custodian(fx, to, mv.player)
    }

    fn step(&self, fx: &mut Effects<'_>, mv: &Move) -> Result<(), EngineError> {
        let (Some(from), Some(to)) = (mv.from, mv.to) else {
            return Err(illegal(mv, "move needs two cells"));
        };
        let from = fx.locate(from)?;
        let to = fx.locate(to)?;
        {
            let board = fx.board();
            let graph = board.graph();
            if board.cells().top_owner(from) != Some(mv.player) {
                return Err(illegal(mv, "no own stone to move"));
            }
            if !graph.directions().any(|d| graph.neighbor(from, d) == Some(to)) {
                return Err(illegal(mv, "cells are not adjacent"));
            }
            if board.cells().top_owner(to) == Some(mv.player) {
                return Err(illegal(mv, "destination holds an own stone"));
            }
        }
        self.capture_enemy_top(fx, to, mv.player)?;
        fx.transfer(from, to)?;
        self.custodian(fx, to, mv.player)
    }

    fn shift_line(&self, fx: &mut Effects<'_>, mv: &Move) -> Result<(), EngineError> {
        let (Some(start), Some(end), Some(anchor)) = (mv.from, mv.via, mv.to) else {
            return Err(illegal(mv, "line needs start, end and anchor"));
        };
        let start = fx.locate(start)?;
        let end = fx.locate(end)?;
        let anchor = fx.locate(anchor)?;

        let line = {
            let board = fx.board();
            let (dir, run) = own_line(board, start, end, mv.player)
                .ok_or_else(|| illegal(mv, "not a line of own stones"))?;
            if board.graph().neighbor(end, dir) != Some(anchor) {
                return Err(illegal(mv, "anchor does not extend the line"));
            }
            if board.cells().top_owner(anchor) == Some(mv.player) {
                return Err(illegal(mv, "anchor holds an own stone"));
            }
            run
        };

        self.capture_enemy_top(fx, anchor, mv.player)?;
        // Leading stone first so each step lands on a vacated cell.
        let mut target = anchor;
        for &cell in line.iter().rev() {
            fx.transfer(cell, target)?;
            target = cell;
        }
        self.custodian(fx, anchor, mv.player)
    }

    fn supply_is_empty(&self, cells: &Cells, player: PlayerId) -> bool {
        cells
            .graph()
            .rack(self.supply(player))
            .map_or(true, |rack| cells.is_empty(rack))
    }
}

impl RuleSet for CaptureRules {
    fn name(&self) -> &str {
        "capture"
    }

    fn states(&self) -> &StateTable {
        &self.table
    }

    fn registry(&self) -> &PieceRegistry {
        &self.registry
    }

    fn layout(&self, init: &GameInit) -> Result<BoardLayout, EngineError> {
        let config = CaptureConfig::from_init(init)?;
        if config != self.config || init.player_count() != self.players {
            return Err(EngineError::BadInit(format!(
                "rules were built for another variant than `{init}`"
            )));
        }
        Ok(BoardLayout {
            graph: CellGraph::new(
                Geometry::Square4,
                config.columns,
                config.rows,
                (self.players * 2) as u8,
            )?,
            counters: 1,
            base_level: config.base_level(),
        })
    }

    fn setup(
        &self,
        cells: &mut Cells,
        _init: &GameInit,
        rng: &mut GameRng,
    ) -> Result<(), EngineError> {
        if self.config.tiles {
            let board: Vec<CellId> = cells.graph().board_cells().collect();
            for cell in board {
                let tile = self.tiles[usize::from(rng.gen_bool(0.5))];
                cells.push(cell, tile);
            }
        }
        for player in PlayerId::all(self.players) {
            let supply = cells.graph().require(Locator::Rack(self.supply(player)))?;
            for _ in 0..self.config.stones_per_player {
                cells.push(supply, self.stone(player));
            }
        }
        Ok(())
    }

    fn apply(&self, fx: &mut Effects<'_>, mv: &Move) -> Result<(), EngineError> {
        match mv.opcode {
            Opcode::Pass => Ok(()),
            Opcode::Place => self.place(fx, mv),
            Opcode::Move => self.step(fx, mv),
            Opcode::Line => self.shift_line(fx, mv),
            _ => Err(illegal(mv, "not a one-step move")),
        }
    }

    /// A staged drop onto an enemy stone buries it; capture it from under
    /// the dropped stone.
    fn on_drop(
        &self,
        fx: &mut Effects<'_>,
        _from: CellId,
        to: CellId,
        player: PlayerId,
    ) -> Result<(), EngineError> {
        if !fx.graph().is_on_board(to) {
            return Ok(());
        }
        let stack = fx.board().cells().stack(to);
        let height = stack.height();
        if height >= stack.base() + 2 {
            let buried = height - 2;
            if stack.piece_at(buried).and_then(|p| p.owner).is_some_and(|o| o != player) {
                self.capture(fx, to, buried, player)?;
            }
        }
        self.custodian(fx, to, player)
    }

    /// Only your own stones move.
    fn check_pick(&self, board: &BoardState, mv: &Move, cell: CellId) -> Result<(), EngineError> {
        if board.cells().top_owner(cell) != Some(mv.player) {
            return Err(illegal(mv, "only your own stones move"));
        }
        Ok(())
    }

    fn check_drop(&self, board: &BoardState, mv: &Move, cell: CellId) -> Result<(), EngineError> {
        if !board.graph().is_on_board(cell) {
            return Err(illegal(mv, "stones are dropped on the board"));
        }
        Ok(())
    }

    fn generate_moves(&self, board: &BoardState, player: PlayerId) -> Vec<Move> {
        let cells = board.cells();
        let graph = board.graph();
        let mut moves = Vec::new();

        if !self.supply_is_empty(cells, player) {
            for cell in graph.board_cells() {
                if cells.is_empty(cell) {
                    if let Some(to) = position(graph, cell) {
                        moves.push(Move::place(player, self.supply(player), to));
                    }
                }
            }
        }

        for from in cells.occupied(player) {
            if cells.top_owner(from) != Some(player) {
                continue;
            }
            for dir in graph.directions() {
                let Some(to) = graph.neighbor(from, dir) else { continue };
                if cells.top_owner(to) == Some(player) {
                    continue;
                }
                if let (Some(a), Some(b)) = (position(graph, from), position(graph, to)) {
                    moves.push(Move::step(player, a, b));
                }
            }
        }

        for start in cells.occupied(player) {
            for dir in graph.directions() {
                let mut end = start;
                let mut length = 1;
                while let Some(next) = graph.neighbor(end, dir) {
                    if cells.top_owner(next) != Some(player) {
                        break;
                    }
                    end = next;
                    length += 1;
                }
                if length < 2 || cells.top_owner(start) != Some(player) {
                    continue;
                }
                let Some(anchor) = graph.neighbor(end, dir) else { continue };
                if let (Some(a), Some(b), Some(c)) =
                    (position(graph, start), position(graph, end), position(graph, anchor))
                {
                    moves.push(Move::line(player, a, b, c));
                }
            }
        }

        if moves.is_empty() {
            moves.push(Move::pass(player));
        }
        moves
    }

    fn outcome(&self, board: &BoardState) -> Option<GameResult> {
        let mover = board.whose_turn();
        if board.counter(mover, CAPTURES) >= self.config.capture_target {
            return Some(GameResult::Winner(mover));
        }
        let next = self.next_player(board, mover);
        let cells = board.cells();
        if cells.occupied_count(next) == 0 && self.supply_is_empty(cells, next) {
            return Some(GameResult::Winner(mover));
        }
        None
    }

    fn evaluate(&self, board: &BoardState, player: PlayerId) -> f64 {
        let cells = board.cells();
        let opponents = player.others(self.players);
        let (best_caps, total_stones) = opponents.fold((0i64, 0usize), |(caps, stones), p| {
            (caps.max(board.counter(p, CAPTURES)), stones + cells.occupied_count(p))
        });
        let own_caps = board.counter(player, CAPTURES);
        let opponent_count = (self.players - 1).max(1) as f64;
        let material = cells.occupied_count(player) as f64 - total_stones as f64 / opponent_count;

        let capture_term = (own_caps - best_caps) as f64 / self.config.capture_target as f64;
        let material_term = material / graph_size(board.graph());
        (0.7 * capture_term + 0.3 * material_term).clamp(-1.0, 1.0)
    }

    /// Rejection sampler: captures are taken as soon as they are drawn, quiet
    /// moves only some of the time. Falls back to a uniform legal move.
    fn random_move(&self, board: &BoardState, player: PlayerId, rng: &mut GameRng) -> Option<Move> {
        let cells = board.cells();
        let graph = board.graph();
        let board_cells = graph.board_cell_count();
        let own: Vec<CellId> = cells.occupied(player).collect();
        let can_place = !self.supply_is_empty(cells, player);

        for _ in 0..12 {
            if !own.is_empty() && (!can_place || rng.gen_bool(0.4)) {
                let from = own[rng.gen_range_usize(0..own.len())];
                let dirs = graph.geometry().direction_count();
                let dir = Direction(rng.gen_range_usize(0..dirs) as u8);
                let Some(to) = graph.neighbor(from, dir) else { continue };
                let accept = match cells.top_owner(to) {
                    Some(owner) if owner == player => false,
                    Some(_) => true,
                    None => rng.gen_bool(0.5),
                };
                if accept {
                    if let (Some(a), Some(b)) = (position(graph, from), position(graph, to)) {
                        return Some(Move::step(player, a, b));
                    }
                }
            } else if can_place {
                let cell = CellId(rng.gen_range_usize(0..board_cells) as u16);
                if cells.is_empty(cell) {
                    let supply = self.supply(player);
                    return position(graph, cell).map(|to| Move::place(player, supply, to));
                }
            }
        }

        let moves = self.generate_moves(board, player);
        rng.choose(&moves).cloned()
    }
}

fn state_table() -> Result<(StateTable, CaptureStates), EngineError> {
    let mut b = StateTable::builder();
    let puzzle = b.state(StateConfig::new("Puzzle").puzzle());
    let play = b.state(StateConfig::new("Play").digestible());
    let confirm = b.state(StateConfig::new("Confirm").done_pending());
    let resign = b.state(StateConfig::new("Resign").resign_pending());
    let game_over = b.state(StateConfig::new("GameOver").terminal());

    let picks = [Opcode::Pick, Opcode::PickB];
    let drops = [Opcode::Drop, Opcode::DropB];
    let one_step = [Opcode::Place, Opcode::Move, Opcode::Line, Opcode::Pass];

    b.transitions(puzzle, &picks, puzzle)
        .transitions(puzzle, &drops, puzzle)
        .transition(puzzle, Opcode::Edit, puzzle)
        .transition(puzzle, Opcode::Start, play);
    b.transitions(play, &one_step, confirm)
        .transitions(play, &drops, confirm)
        .transitions(play, &picks, play)
        .transition(play, Opcode::Resign, resign)
        .transition(play, Opcode::Edit, puzzle);
    b.transition(confirm, Opcode::Done, play)
        .transitions(confirm, &picks, play)
        .transition(confirm, Opcode::Resign, resign)
        .transition(confirm, Opcode::Edit, puzzle);
    b.transition(resign, Opcode::Done, game_over)
        .transition(resign, Opcode::Resign, play)
        .transition(resign, Opcode::Edit, puzzle);
    b.transition(game_over, Opcode::Edit, puzzle);

    let table = b.build(play, game_over, puzzle)?;
    Ok((
        table,
        CaptureStates {
            puzzle,
            play,
            confirm,
            resign,
            game_over,
        },
    ))
}

/// The run of own stones from `start` to `end` along one direction, if
/// there is one of length two or more.
fn own_line(
    board: &BoardState,
    start: CellId,
    end: CellId,
    player: PlayerId,
) -> Option<(Direction, SmallVec<[CellId; 8]>)> {
    let graph = board.graph();
    let cells = board.cells();
    if start == end {
        return None;
    }
    for dir in graph.directions() {
        let mut run: SmallVec<[CellId; 8]> = SmallVec::new();
        let mut cell = Some(start);
        while let Some(c) = cell {
            if cells.top_owner(c) != Some(player) {
                break;
            }
            run.push(c);
            if c == end {
                return Some((dir, run));
            }
            cell = graph.neighbor(c, dir);
        }
    }
    None
}

fn position(graph: &CellGraph, cell: CellId) -> Option<Position> {
    match graph.locator(cell) {
        Locator::Board(p) => Some(p),
        Locator::Rack(_) => None,
    }
}

fn graph_size(graph: &CellGraph) -> f64 {
    graph.board_cell_count().max(1) as f64
}

fn illegal(mv: &Move, reason: &'static str) -> EngineError {
    EngineError::IllegalInState {
        mv: mv.to_string(),
        state: "Play".into(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, ExecuteMode};
    use crate::moves::parse;
    use std::sync::Arc;

    fn board(init: &str) -> Board<CaptureRules> {
        let init: GameInit = init.parse().unwrap();
        let rules = Arc::new(CaptureRules::new(&init).unwrap());
        Board::new(rules, init).unwrap()
    }

    fn run(board: &mut Board<CaptureRules>, text: &str) {
        let mv = parse(text, board.whose_turn()).unwrap();
        board.execute(&mv, ExecuteMode::Live).unwrap();
    }

    /// A one-step move plus its confirmation.
    fn play(board: &mut Board<CaptureRules>, text: &str) {
        let player = board.whose_turn();
        run(board, text);
        board.execute(&Move::done(player), ExecuteMode::Live).unwrap();
    }

    fn top_owner(board: &Board<CaptureRules>, col: char, row: u16) -> Option<PlayerId> {
        let cell = board.state().graph().cell_at(Position::new(col, row)).unwrap();
        board.state().cells().top_owner(cell)
    }

    #[test]
    fn test_opening_moves_are_placements_in_cell_order() {
        let board = board("capture 2 1 0");
        let moves = board.generate_moves(PlayerId::new(0));
        assert_eq!(moves.len(), 25);
        assert!(moves.iter().all(|m| m.opcode == Opcode::Place));
        assert_eq!(moves[0].to_string(), "place R0 A 1");
        assert_eq!(moves[1].to_string(), "place R0 A 2");
        assert_eq!(moves[24].to_string(), "place R0 E 5");
    }

    #[test]
    fn test_steps_and_lines_are_generated() {
        let mut board = board("capture 2 1 0");
        play(&mut board, "place R0 A 1");
        play(&mut board, "place R1 E 5");
        play(&mut board, "place R0 B 1");
        play(&mut board, "place R1 E 4");

        let moves: Vec<String> = board
            .generate_moves(PlayerId::new(0))
            .iter()
            .map(ToString::to_string)
            .collect();
        assert!(moves.contains(&"move A 1 A 2".to_string()));
        assert!(!moves.contains(&"move A 1 B 1".to_string()));
        assert!(moves.contains(&"line A 1 B 1 C 1".to_string()));
        assert!(!moves.iter().any(|m| m == "pass"));
    }

    #[test]
    fn test_line_shift_captures_at_anchor() {
        let mut board = board("capture 2 1 0");
        play(&mut board, "place R0 A 1");
        play(&mut board, "place R1 C 1");
        play(&mut board, "place R0 B 1");
        play(&mut board, "place R1 E 5");

        let before = board.digest();
        run(&mut board, "line A 1 B 1 C 1");
        assert_eq!(top_owner(&board, 'A', 1), None);
        assert_eq!(top_owner(&board, 'B', 1), Some(PlayerId::new(0)));
        assert_eq!(top_owner(&board, 'C', 1), Some(PlayerId::new(0)));
        assert_eq!(board.state().counter(PlayerId::new(0), CAPTURES), 1);

        let mv = board.last_frame().unwrap().mv().clone();
        board.unexecute(&mv).unwrap();
        assert_eq!(board.digest(), before);
        assert_eq!(top_owner(&board, 'C', 1), Some(PlayerId::new(1)));
    }

    #[test]
    fn test_custodian_cascade_is_one_frame() {
        let mut board = board("capture 2 1 1");
        play(&mut board, "place R0 A 1");
        play(&mut board, "place R1 B 1");
        play(&mut board, "place R0 C 3");
        play(&mut board, "place R1 C 2");

        let before = board.digest();
        let depth = board.undo_depth();
        let mv = parse("place R0 C 1", PlayerId::new(0)).unwrap();
        let report = board.execute(&mv, ExecuteMode::Live).unwrap();

        assert_eq!(report.captured.len(), 2);
        assert_eq!(board.undo_depth(), depth + 1);
        assert_eq!(board.state().counter(PlayerId::new(0), CAPTURES), 2);
        assert_eq!(top_owner(&board, 'B', 1), None);
        assert_eq!(top_owner(&board, 'C', 2), None);

        board.unexecute(&mv).unwrap();
        assert_eq!(board.digest(), before);
        assert_eq!(top_owner(&board, 'B', 1), Some(PlayerId::new(1)));
        assert_eq!(top_owner(&board, 'C', 2), Some(PlayerId::new(1)));
    }

    #[test]
    fn test_revision_zero_has_no_custodian() {
        let mut board = board("capture 2 1 0");
        play(&mut board, "place R0 A 1");
        play(&mut board, "place R1 B 1");
        play(&mut board, "place R0 E 5");
        play(&mut board, "place R1 E 1");
        play(&mut board, "place R0 C 1");
        assert_eq!(top_owner(&board, 'B', 1), Some(PlayerId::new(1)));
    }

    #[test]
    fn test_staged_drop_captures_buried_enemy() {
        let mut board = board("capture 2 1 0");
        play(&mut board, "place R0 A 1");
        play(&mut board, "place R1 A 2");

        run(&mut board, "pickb A 1");
        run(&mut board, "dropb A 2");
        let a2 = board.state().graph().cell_at(Position::new('A', 2)).unwrap();
        assert_eq!(board.state().cells().stack(a2).height(), 2);

        let before_done = board.digest();
        board.execute(&Move::done(PlayerId::new(0)), ExecuteMode::Live).unwrap();
        assert_eq!(board.state().cells().stack(a2).height(), 1);
        assert_eq!(top_owner(&board, 'A', 2), Some(PlayerId::new(0)));
        assert_eq!(board.state().counter(PlayerId::new(0), CAPTURES), 1);

        board.unexecute(&Move::done(PlayerId::new(0))).unwrap();
        assert_eq!(board.digest(), before_done);
        assert_eq!(board.state().cells().stack(a2).height(), 2);
    }

    #[test]
    fn test_pass_only_when_nothing_else() {
        let mut board = board("capture 2 1 0");
        let p0 = PlayerId::new(0);
        board.execute(&Move::edit(p0), ExecuteMode::Live).unwrap();
        for _ in 0..board.rules().config().stones_per_player {
            run(&mut board, "pick R0");
            run(&mut board, "drop R1");
        }
        board.execute(&Move::start(p0), ExecuteMode::Live).unwrap();
        assert!(board.is_digestible());
        assert_eq!(board.generate_moves(p0), vec![Move::pass(p0)]);
    }

    #[test]
    fn test_tiles_sit_below_the_base() {
        let board = board("capture-tiles 2 7 0");
        let cells = board.state().cells();
        for cell in board.state().graph().board_cells() {
            assert_eq!(cells.stack(cell).height(), 1);
            assert!(cells.is_empty(cell));
            assert!(cells.stack(cell).base_piece().is_some());
        }
        assert_eq!(board.generate_moves(PlayerId::new(0)).len(), 25);
    }

    #[test]
    fn test_tile_colors_follow_the_seed() {
        let a = board("capture-tiles 2 7 0");
        let b = board("capture-tiles 2 7 0");
        let c = board("capture-tiles 2 8 0");
        assert_eq!(a.digest(), b.digest());
        assert_ne!(a.digest(), c.digest());
    }

    #[test]
    fn test_random_move_is_legal() {
        let board = board("capture 3 1 0");
        let mut rng = GameRng::new(5);
        let legal = board.generate_moves(PlayerId::new(0));
        for _ in 0..50 {
            let mv = board.random_move(PlayerId::new(0), &mut rng).unwrap();
            assert!(legal.contains(&mv), "{mv}");
        }
    }

    #[test]
    fn test_layout_rejects_other_variant() {
        let init = GameInit::new("capture", 2, 1, 0);
        let rules = CaptureRules::new(&init).unwrap();
        assert!(rules.layout(&GameInit::new("capture-7", 2, 1, 0)).is_err());
        assert!(rules.layout(&GameInit::new("capture", 3, 1, 0)).is_err());
        assert!(rules.layout(&GameInit::new("capture", 2, 99, 0)).is_ok());
    }
}
