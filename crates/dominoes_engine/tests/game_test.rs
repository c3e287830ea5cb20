//! Tests for the dominoes rules state machine.

use dominoes_engine::{
    Board, DEFAULT_HAND_SIZE, Game, GameError, Phase, Piece, Place, Player, PlayerId, Stock,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;

fn piece(left: u8, right: u8) -> Piece {
    Piece::new(left, right).expect("valid piece")
}

fn player(name: &str, pieces: &[(u8, u8)]) -> Player {
    let mut player = Player::new(name);
    player.give_all(pieces.iter().map(|&(a, b)| piece(a, b)));
    player
}

fn board(pieces: &[(u8, u8)]) -> Board {
    Board::from(pieces.iter().map(|&(a, b)| piece(a, b)).collect::<Vec<_>>())
}

fn stock(pieces: &[(u8, u8)]) -> Stock {
    Stock::from(pieces.iter().map(|&(a, b)| piece(a, b)).collect::<Vec<_>>())
}

fn all_pieces(game: &Game) -> Vec<Piece> {
    game.board()
        .iter()
        .chain(game.stock().iter())
        .chain(game.player(PlayerId::One).pieces())
        .chain(game.player(PlayerId::Two).pieces())
        .copied()
        .collect()
}

fn assert_conserved(game: &Game) {
    let pieces = all_pieces(game);
    assert_eq!(pieces.len(), 28, "no piece created or lost");
    let distinct: HashSet<Piece> = pieces.into_iter().collect();
    let full: HashSet<Piece> = Piece::full_set().into_iter().collect();
    assert_eq!(distinct, full, "pieces add up to the full set");
}

/// Plays a game to the end: first playable piece, drawing when stuck.
fn play_out(game: &mut Game) {
    for _ in 0..500 {
        if game.is_over() {
            return;
        }
        let who = game.playing_player().expect("started");
        let choice = game
            .player(who)
            .pieces()
            .iter()
            .copied()
            .find(|p| game.is_playable(p));
        match choice {
            Some(candidate) => {
                let fits_left = game
                    .board()
                    .first()
                    .is_some_and(|end| end.is_playable_on_left(&candidate));
                let place = if fits_left { Place::L } else { Place::R };
                let before = game.playing_player();
                game.play(who, candidate, place).expect("legal move");
                assert_ne!(game.playing_player(), before, "turn passes");
            }
            None => match game.draw_from_stock() {
                Some(drawn) => game.give_piece(who, drawn),
                None => game.switch_player(),
            },
        }
        assert!(game.board().is_chain());
        assert_conserved(game);
    }
    panic!("game did not finish");
}

#[test]
fn test_new_game_deal() {
    let mut game = Game::new("player1", "player2");
    assert_eq!(game.phase(), Phase::Unstarted);
    game.start(DEFAULT_HAND_SIZE).expect("start");

    assert_eq!(game.player(PlayerId::One).name(), "player1");
    assert_eq!(game.player(PlayerId::Two).name(), "player2");
    assert_eq!(game.board().len(), 1);
    assert_eq!(game.player(PlayerId::One).len(), 7);
    assert_eq!(game.player(PlayerId::Two).len(), 7);
    assert_eq!(game.stock_size(), 13);
    assert_eq!(game.playing_player(), Some(PlayerId::One));
    assert_eq!(game.phase(), Phase::InProgress);
    assert_conserved(&game);
}

#[test]
fn test_start_twice_rejected() {
    let mut game = Game::new("a", "b");
    game.start(7).expect("start");
    assert_eq!(game.start(7), Err(GameError::AlreadyStarted));
    assert_eq!(game.board().len(), 1);
}

#[test]
fn test_start_with_oversized_hands_rejected() {
    let mut game = Game::new("a", "b");
    assert_eq!(
        game.start(14),
        Err(GameError::NotEnoughStock {
            needed: 29,
            available: 28
        })
    );
    assert_eq!(game.phase(), Phase::Unstarted);
    assert_eq!(game.stock_size(), 28);
}

#[test]
fn test_start_with_overflowing_hand_size_rejected() {
    let mut game = Game::new("a", "b");
    for hand_size in [usize::MAX, usize::MAX / 2 + 1, usize::MAX / 2] {
        assert!(matches!(
            game.start(hand_size),
            Err(GameError::NotEnoughStock { available: 28, .. })
        ));
    }
    assert_eq!(game.phase(), Phase::Unstarted);
    assert_eq!(game.stock_size(), 28);
}

#[test]
fn test_seeded_games_are_reproducible() {
    let mut a = Game::with_rng("a", "b", &mut StdRng::seed_from_u64(7));
    let mut b = Game::with_rng("a", "b", &mut StdRng::seed_from_u64(7));
    a.start(7).expect("start");
    b.start(7).expect("start");
    assert_eq!(a.board(), b.board());
    assert_eq!(a.player(PlayerId::One), b.player(PlayerId::One));
}

#[test]
fn test_is_playable() {
    let game = Game::from_parts(
        player("p1", &[]),
        player("p2", &[]),
        stock(&[]),
        board(&[(0, 1)]),
        PlayerId::One,
    );
    assert!(game.is_playable(&piece(0, 0)));
    assert!(game.is_playable(&piece(1, 1)));
    assert!(!game.is_playable(&piece(2, 2)));
}

#[test]
fn test_play_on_left_prepends() {
    let mut game = Game::from_parts(
        player("p1", &[(0, 0), (5, 5)]),
        player("p2", &[(6, 6)]),
        stock(&[]),
        board(&[(0, 1)]),
        PlayerId::One,
    );
    game.play(PlayerId::One, piece(0, 0), Place::L).expect("legal");
    let line: Vec<_> = game.board().iter().map(|p| (p.left(), p.right())).collect();
    assert_eq!(line, vec![(0, 0), (0, 1)]);
    assert_eq!(game.player(PlayerId::One).len(), 1);
    assert_eq!(game.playing_player(), Some(PlayerId::Two));
}

#[test]
fn test_play_on_right_appends() {
    let mut game = Game::from_parts(
        player("p1", &[(1, 2), (5, 5)]),
        player("p2", &[(6, 6)]),
        stock(&[]),
        board(&[(0, 1)]),
        PlayerId::One,
    );
    game.play(PlayerId::One, piece(1, 2), Place::R).expect("legal");
    let line: Vec<_> = game.board().iter().map(|p| (p.left(), p.right())).collect();
    assert_eq!(line, vec![(0, 1), (1, 2)]);
}

#[test]
fn test_play_rotates_piece() {
    let mut game = Game::from_parts(
        player("p1", &[(1, 4), (5, 5)]),
        player("p2", &[(6, 6)]),
        stock(&[]),
        board(&[(0, 4)]),
        PlayerId::One,
    );
    let placed = game.play(PlayerId::One, piece(1, 4), Place::R).expect("legal");
    assert_eq!((placed.left(), placed.right()), (4, 1));
    let line: Vec<_> = game.board().iter().map(|p| (p.left(), p.right())).collect();
    assert_eq!(line, vec![(0, 4), (4, 1)]);
    assert!(game.board().is_chain());
}

#[test]
fn test_unplayable_piece_leaves_state_unchanged() {
    let mut game = Game::from_parts(
        player("p1", &[(1, 5), (5, 5)]),
        player("p2", &[(6, 6)]),
        stock(&[(3, 3)]),
        board(&[(0, 4)]),
        PlayerId::One,
    );
    let err = game.play(PlayerId::One, piece(1, 5), Place::R).unwrap_err();
    assert_eq!(
        err,
        GameError::NotPlayable {
            piece: piece(1, 5),
            place: Place::R,
            end: piece(0, 4)
        }
    );
    assert_eq!(err.to_string(), "Piece <1:5> is not playable on right with <0:4>");
    assert_eq!(game.board().len(), 1);
    assert_eq!(game.player(PlayerId::One).len(), 2);
    assert_eq!(game.playing_player(), Some(PlayerId::One));
}

#[test]
fn test_wrong_turn_rejected() {
    let mut game = Game::from_parts(
        player("p1", &[(1, 1)]),
        player("p2", &[(1, 2), (3, 3)]),
        stock(&[]),
        board(&[(0, 1)]),
        PlayerId::One,
    );
    let err = game.play(PlayerId::Two, piece(1, 2), Place::R).unwrap_err();
    assert_eq!(err.to_string(), "It's not your turn to play");
    assert_eq!(game.playing_player(), Some(PlayerId::One));
    assert_eq!(game.player(PlayerId::Two).len(), 2);
}

#[test]
fn test_piece_not_in_hand_rejected() {
    let mut game = Game::from_parts(
        player("p1", &[(1, 1), (4, 4)]),
        player("p2", &[(3, 3)]),
        stock(&[]),
        board(&[(0, 1)]),
        PlayerId::One,
    );
    let err = game.play(PlayerId::One, piece(1, 2), Place::R).unwrap_err();
    assert_eq!(err.to_string(), "You don't have that piece to play");
    assert_eq!(game.board().len(), 1);
}

#[test]
fn test_player_needs_draw() {
    let game = Game::from_parts(
        player("p1", &[(2, 2), (3, 5)]),
        player("p2", &[(1, 6)]),
        stock(&[(4, 4)]),
        board(&[(0, 1)]),
        PlayerId::One,
    );
    assert!(game.player_needs_draw(PlayerId::One));
    assert!(!game.player_needs_draw(PlayerId::Two));
    assert!(!game.is_over());
}

#[test]
fn test_draw_from_stock_until_empty() {
    let mut game = Game::from_parts(
        player("p1", &[(2, 2)]),
        player("p2", &[(3, 3)]),
        stock(&[(4, 4), (5, 6)]),
        board(&[(0, 1)]),
        PlayerId::One,
    );
    assert!(game.has_stock());
    assert_eq!(game.draw_from_stock(), Some(piece(4, 4)));
    assert_eq!(game.draw_from_stock(), Some(piece(5, 6)));
    assert_eq!(game.draw_from_stock(), None);
    assert!(!game.has_stock());
}

#[test]
fn test_over_when_hand_empty() {
    let mut game = Game::from_parts(
        player("p1", &[(1, 2)]),
        player("p2", &[(3, 3), (4, 4)]),
        stock(&[(5, 5)]),
        board(&[(0, 1)]),
        PlayerId::One,
    );
    game.play(PlayerId::One, piece(1, 2), Place::R).expect("legal");
    assert!(game.is_over());
    assert_eq!(game.phase(), Phase::Over);
    assert_eq!(game.winner(), Some(PlayerId::One));
}

#[test]
fn test_no_moves_after_game_over() {
    let mut game = Game::from_parts(
        player("p1", &[]),
        player("p2", &[(1, 1)]),
        stock(&[]),
        board(&[(0, 1)]),
        PlayerId::Two,
    );
    assert!(game.is_over());
    assert_eq!(
        game.play(PlayerId::Two, piece(1, 1), Place::R),
        Err(GameError::NotInProgress)
    );
}

#[test]
fn test_over_when_blocked_and_stock_empty() {
    let game = Game::from_parts(
        player("p1", &[(2, 2), (3, 4)]),
        player("p2", &[(5, 5)]),
        stock(&[]),
        board(&[(0, 1)]),
        PlayerId::One,
    );
    assert!(game.is_over());
    assert_eq!(game.winner(), Some(PlayerId::Two));
}

#[test]
fn test_not_over_while_stock_remains() {
    let game = Game::from_parts(
        player("p1", &[(2, 2)]),
        player("p2", &[(5, 5)]),
        stock(&[(6, 6)]),
        board(&[(0, 1)]),
        PlayerId::One,
    );
    assert!(!game.is_over());
    assert_eq!(game.winner(), None);
}

#[test]
fn test_blocked_with_equal_hands_is_draw() {
    let game = Game::from_parts(
        player("p1", &[(2, 2), (3, 4)]),
        player("p2", &[(5, 5), (6, 6)]),
        stock(&[]),
        board(&[(0, 1)]),
        PlayerId::One,
    );
    assert!(game.is_over());
    assert_eq!(game.winner(), None);
}

#[test]
fn test_is_over_reevaluated_on_demand() {
    let mut game = Game::from_parts(
        player("p1", &[(2, 2)]),
        player("p2", &[(5, 5)]),
        stock(&[(1, 2)]),
        board(&[(0, 1)]),
        PlayerId::One,
    );
    assert!(!game.is_over());
    let drawn = game.draw_from_stock().expect("one left");
    assert!(game.is_over(), "stock empty and both hands blocked");
    game.give_piece(PlayerId::One, drawn);
    assert!(!game.is_over(), "player one can now play");
}

#[test]
fn test_switch_player_toggles() {
    let mut game = Game::new("a", "b");
    game.switch_player();
    assert_eq!(game.playing_player(), None, "no turn before the deal");
    game.start(7).expect("start");
    game.switch_player();
    assert_eq!(game.playing_player(), Some(PlayerId::Two));
    game.switch_player();
    assert_eq!(game.playing_player(), Some(PlayerId::One));
}

#[test]
fn test_full_games_keep_invariants() {
    for seed in 0..50 {
        let mut game = Game::with_rng("a", "b", &mut StdRng::seed_from_u64(seed));
        game.start(DEFAULT_HAND_SIZE).expect("start");
        play_out(&mut game);

        assert!(game.is_over());
        let one = game.player(PlayerId::One).len();
        let two = game.player(PlayerId::Two).len();
        match game.winner() {
            Some(PlayerId::One) => assert!(one < two),
            Some(PlayerId::Two) => assert!(two < one),
            None => assert_eq!(one, two),
        }
    }
}
