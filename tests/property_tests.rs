//! Property tests: inverse law, codec round trip, determinism, digest
//! stability over random legal games.

use std::sync::Arc;

use proptest::prelude::*;

use boardcore::board::{Board, ExecuteMode};
use boardcore::core::GameInit;
use boardcore::games::capture::CaptureRules;
use boardcore::moves::{encode, parse, Move};

fn board(init: &GameInit) -> Board<CaptureRules> {
    let rules = Arc::new(CaptureRules::new(init).unwrap());
    Board::new(rules, init.clone()).unwrap()
}

fn init_strategy() -> impl Strategy<Value = GameInit> {
    (
        prop::sample::select(vec!["capture", "capture-7", "capture-tiles"]),
        2u8..=4,
        any::<u64>(),
        0u32..=1,
    )
        .prop_map(|(variant, players, seed, revision)| {
            GameInit::new(variant, players, seed, revision)
        })
}

/// Play `choices` as indices into the legal move list, stopping early at
/// game end. Returns the moves played.
fn play(board: &mut Board<CaptureRules>, choices: &[usize]) -> Vec<Move> {
    let mut played = Vec::new();
    for &choice in choices {
        let moves = board.generate_moves(board.whose_turn());
        if moves.is_empty() {
            break;
        }
        let mv = moves[choice % moves.len()].clone();
        board.execute(&mv, ExecuteMode::Live).unwrap();
        played.push(mv);
    }
    played
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_execute_then_unexecute_restores(
        init in init_strategy(),
        choices in prop::collection::vec(any::<usize>(), 0..60),
    ) {
        let mut board = board(&init);
        for &choice in &choices {
            let moves = board.generate_moves(board.whose_turn());
            if moves.is_empty() {
                break;
            }
            let before = board.clone();
            let digest = board.digest();

            for mv in &moves {
                board.execute(mv, ExecuteMode::Live).unwrap();
                board.unexecute(mv).unwrap();
                prop_assert_eq!(board.digest(), digest, "after `{}`", mv);
                prop_assert!(board.same_as(&before), "after `{}`", mv);

                board.robot_execute(mv).unwrap();
                board.unexecute(mv).unwrap();
                prop_assert_eq!(board.digest(), digest, "robot `{}`", mv);
            }

            let mv = moves[choice % moves.len()].clone();
            board.execute(&mv, ExecuteMode::Live).unwrap();
        }
    }

    #[test]
    fn prop_legal_moves_round_trip(
        init in init_strategy(),
        choices in prop::collection::vec(any::<usize>(), 0..40),
    ) {
        let mut board = board(&init);
        for &choice in &choices {
            let moves = board.generate_moves(board.whose_turn());
            if moves.is_empty() {
                break;
            }
            for mv in &moves {
                let text = encode(mv);
                prop_assert_eq!(&parse(&text, mv.player).unwrap(), mv, "`{}`", text);
            }
            let mv = moves[choice % moves.len()].clone();
            board.execute(&mv, ExecuteMode::Live).unwrap();
        }
    }

    #[test]
    fn prop_generate_moves_is_deterministic(
        init in init_strategy(),
        choices in prop::collection::vec(any::<usize>(), 0..40),
    ) {
        let mut board = board(&init);
        play(&mut board, &choices);
        let player = board.whose_turn();
        prop_assert_eq!(board.generate_moves(player), board.generate_moves(player));
        prop_assert_eq!(board.generate_moves(player), board.clone().generate_moves(player));
    }

    #[test]
    fn prop_digest_is_stable_across_boards(
        init in init_strategy(),
        choices in prop::collection::vec(any::<usize>(), 0..60),
    ) {
        let mut first = board(&init);
        let played = play(&mut first, &choices);

        let reparsed: GameInit = init.to_string().parse().unwrap();
        let mut second = board(&reparsed);
        for mv in &played {
            second.execute(mv, ExecuteMode::Replay).unwrap();
        }
        prop_assert_eq!(first.digest(), second.digest());
        prop_assert!(first.same_as(&second));
    }

    #[test]
    fn prop_full_unwind_returns_to_start(
        init in init_strategy(),
        choices in prop::collection::vec(any::<usize>(), 0..60),
    ) {
        let mut board = board(&init);
        let start = board.clone();
        let played = play(&mut board, &choices);
        for mv in played.iter().rev() {
            board.unexecute(mv).unwrap();
        }
        prop_assert!(board.same_as(&start));
        prop_assert_eq!(board.undo_depth(), 0);
    }
}

/// Stored records carry digests; these must never drift.
#[test]
fn test_digests_are_pinned() {
    let init: GameInit = "capture 2 1 0".parse().unwrap();
    let mut board = board(&init);
    assert_eq!(board.digest(), 0x159c_1851_15dc_10dc);

    for text in ["place R0 C 3", "done", "place R1 C 4", "done", "move C 3 C 4", "done"] {
        let mv = parse(text, board.whose_turn()).unwrap();
        board.execute(&mv, ExecuteMode::Replay).unwrap();
    }
    assert_eq!(board.digest(), 0x4c74_5da6_414f_2312);
}
