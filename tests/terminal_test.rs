//! Scripted games through the terminal front end.

use dominoes::{Terminal, TerminalError};
use dominoes_engine::{Board, Game, GameError, Piece, Player, PlayerId, Stock};

fn pieces(list: &[(u8, u8)]) -> Vec<Piece> {
    list.iter()
        .map(|&(l, r)| Piece::new(l, r).expect("valid piece"))
        .collect()
}

fn player(name: &str, list: &[(u8, u8)]) -> Player {
    let mut player = Player::new(name);
    player.give_all(pieces(list));
    player
}

fn game(ana: &[(u8, u8)], bo: &[(u8, u8)], stock: &[(u8, u8)]) -> Game {
    Game::from_parts(
        player("ana", ana),
        player("bo", bo),
        Stock::from(pieces(stock)),
        Board::from(pieces(&[(0, 1)])),
        PlayerId::One,
    )
}

/// Plays `game` with `input` as the keyboard and returns the transcript.
fn transcript(game: Game, input: &str) -> (Result<Game, TerminalError>, String) {
    let mut terminal = Terminal::new(input.as_bytes(), Vec::new());
    let result = terminal.play(game);
    let output = String::from_utf8(terminal.into_output()).expect("utf-8 output");
    (result, output)
}

#[test]
fn test_single_move_wins() {
    let (result, output) = transcript(game(&[(1, 2)], &[(3, 4), (6, 6)], &[(4, 4)]), "0 R\n");

    let finished = result.expect("game finishes");
    assert!(finished.is_over());
    assert!(output.contains("The board is: [<0:1>]\n"));
    assert!(output.contains("It's your turn to play, ana\n"));
    assert!(output.contains("Here's your pieces: [<1:2>]\n"));
    assert!(output.contains("You won ana!!!\n"));
    assert!(output.contains("Player 1 pieces: []\n"));
    assert!(output.contains("Player 2 pieces: [<3:4>, <6:6>]\n"));
    assert!(output.ends_with("Final board: [<0:1>, <1:2>]\n"));
}

#[test]
fn test_bad_input_is_retried() {
    let input = "oops\n7 R\n0 X\n1 L\n0 R\n";
    let (result, output) = transcript(game(&[(1, 2), (5, 5)], &[(3, 4), (6, 6)], &[(4, 4)]), input);

    assert!(result.is_ok());
    assert!(output.contains("Invalid play, try again: "));
    assert_eq!(output.matches("Invalid option, try again: ").count(), 2);
    assert!(output.contains("Piece <5:5> is not playable on left with <0:1>\nTry again: "));
}

#[test]
fn test_blocked_player_draws_then_loses_turn() {
    let input = "0 R\n";
    let (result, output) = transcript(game(&[(1, 2), (5, 5)], &[(3, 4), (6, 6)], &[(4, 4)]), input);

    let finished = result.expect("game finishes");
    assert!(output.contains("It's your turn to play, bo\n"));
    assert!(output.contains("You don't have any valid pieces to play. You need to get from stock\n"));
    assert!(output.contains("Here's a new piece: <4:4>\n"));
    assert!(output.contains("There's no pieces left on stock. You lose the turn to play\n"));
    assert!(output.contains("You won ana!!!\n"));
    assert!(output.contains("Player 2 pieces: [<3:4>, <6:6>, <4:4>]\n"));
    assert_eq!(finished.player(PlayerId::Two).len(), 3);
    assert_eq!(finished.stock_size(), 0);
}

#[test]
fn test_blocked_game_with_equal_hands_is_a_draw() {
    let (result, output) = transcript(game(&[(5, 5)], &[(6, 6)], &[]), "");

    assert!(result.is_ok());
    assert!(output.starts_with("This game was a draw!\n"));
}

#[test]
fn test_input_ending_mid_game() {
    let (result, _) = transcript(game(&[(1, 2)], &[(3, 4)], &[(4, 4)]), "");
    assert!(matches!(result, Err(TerminalError::InputClosed)));
}

#[test]
fn test_unstarted_game_is_rejected() {
    let (result, _) = transcript(Game::new("ana", "bo"), "0 R\n");
    assert!(matches!(
        result,
        Err(TerminalError::Game(GameError::NotInProgress))
    ));
}

#[test]
fn test_run_prompts_for_names_and_rejects_oversized_hands() {
    let mut terminal = Terminal::new("ana\nbo\n".as_bytes(), Vec::new());
    let result = terminal.run(14);
    let output = String::from_utf8(terminal.into_output()).expect("utf-8 output");

    assert_eq!(output, "Player 1: Player 2: ");
    assert!(matches!(
        result,
        Err(TerminalError::Game(GameError::NotEnoughStock {
            needed: 29,
            available: 28
        }))
    ));
}
