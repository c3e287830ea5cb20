//! Hot-seat dominoes at a single terminal.
//!
//! Both players share one keyboard. Moves are typed as `<index> <L|R>`,
//! where the index points into the hand as printed.

use derive_more::{Display, Error};
use dominoes_engine::{Game, GameError, Piece, Place, PlayerId};
use std::io::{BufRead, Write};
use tracing::{debug, info, instrument};

/// Why a terminal game stopped early.
#[derive(Debug, Display, Error)]
pub enum TerminalError {
    /// Reading or writing the terminal failed.
    #[display("Terminal I/O failed: {}", _0)]
    Io(std::io::Error),

    /// The game could not be set up.
    #[display("{}", _0)]
    Game(GameError),

    /// Input ran out before the game was over.
    #[display("Input ended before the game was over")]
    InputClosed,
}

impl From<std::io::Error> for TerminalError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<GameError> for TerminalError {
    fn from(err: GameError) -> Self {
        Self::Game(err)
    }
}

/// A move line that could not be understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BadMove {
    /// Not exactly two tokens.
    Shape,
    /// Two tokens, but not an index and a place.
    Choice,
}

/// Terminal front end over any line reader and writer.
#[derive(Debug)]
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    /// Creates a front end reading moves from `input`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Gives back the writer, e.g. to inspect a transcript.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Asks for two names, deals `hand_size` pieces each and plays to the end.
    ///
    /// # Errors
    ///
    /// Fails if the deal is impossible, the terminal fails, or input ends
    /// mid-game.
    pub fn run(&mut self, hand_size: usize) -> Result<Game, TerminalError> {
        self.prompt("Player 1: ")?;
        let player1 = self.read_line()?;
        self.prompt("Player 2: ")?;
        let player2 = self.read_line()?;

        let mut game = Game::new(player1, player2);
        game.start(hand_size)?;
        self.play(game)
    }

    /// Plays a started game until it is over and prints the result.
    ///
    /// # Errors
    ///
    /// [`GameError::NotInProgress`] if the game was never started, otherwise
    /// as [`run`](Self::run).
    #[instrument(skip_all)]
    pub fn play(&mut self, mut game: Game) -> Result<Game, TerminalError> {
        'game: while !game.is_over() {
            let who = game.playing_player().ok_or(GameError::NotInProgress)?;

            writeln!(self.output, "The board is: {}", game.board())?;
            writeln!(
                self.output,
                "It's your turn to play, {}",
                game.player(who).name()
            )?;

            while game.player_needs_draw(who) {
                writeln!(
                    self.output,
                    "You don't have any valid pieces to play. You need to get from stock"
                )?;
                match game.draw_from_stock() {
                    Some(piece) => {
                        writeln!(self.output, "Here's a new piece: {}", piece)?;
                        game.give_piece(who, piece);
                    }
                    None => {
                        writeln!(
                            self.output,
                            "There's no pieces left on stock. You lose the turn to play"
                        )?;
                        game.switch_player();
                        continue 'game;
                    }
                }
            }

            writeln!(
                self.output,
                "Here's your pieces: {}",
                hand(game.player(who).pieces())
            )?;
            self.prompt(
                "Choose a piece to play, by choosing the index and then the place to play (left or right), e.g: 1 L: ",
            )?;
            self.take_turn(&mut game, who)?;
        }

        self.report(&game)?;
        Ok(game)
    }

    /// Reads move lines until one is accepted by the game.
    fn take_turn(&mut self, game: &mut Game, who: PlayerId) -> Result<(), TerminalError> {
        loop {
            let line = self.read_line()?;
            let chosen = parse_move(&line).and_then(|(index, place)| {
                game.player(who)
                    .piece_at(index)
                    .map(|piece| (piece, place))
                    .map_err(|_| BadMove::Choice)
            });

            match chosen {
                Ok((piece, place)) => match game.play(who, piece, place) {
                    Ok(placed) => {
                        debug!(%placed, %place, "Move accepted");
                        return Ok(());
                    }
                    Err(err) => {
                        writeln!(self.output, "{}", err)?;
                        self.prompt("Try again: ")?;
                    }
                },
                Err(BadMove::Shape) => self.prompt("Invalid play, try again: ")?,
                Err(BadMove::Choice) => self.prompt("Invalid option, try again: ")?,
            }
        }
    }

    fn report(&mut self, game: &Game) -> Result<(), TerminalError> {
        match game.winner() {
            Some(winner) => {
                let name = game.player(winner).name();
                info!(winner = %name, "Game over");
                writeln!(self.output, "You won {}!!!", name)?;
            }
            None => {
                info!("Game over, draw");
                writeln!(self.output, "This game was a draw!")?;
            }
        }
        writeln!(
            self.output,
            "Player 1 pieces: {}",
            hand(game.player(PlayerId::One).pieces())
        )?;
        writeln!(
            self.output,
            "Player 2 pieces: {}",
            hand(game.player(PlayerId::Two).pieces())
        )?;
        writeln!(self.output, "Final board: {}", game.board())?;
        self.output.flush()?;
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<(), TerminalError> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, TerminalError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(TerminalError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

fn parse_move(line: &str) -> Result<(usize, Place), BadMove> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [index, place] = tokens.as_slice() else {
        return Err(BadMove::Shape);
    };
    let index = index.parse::<usize>().map_err(|_| BadMove::Choice)?;
    let place = match *place {
        "L" | "l" => Place::L,
        "R" | "r" => Place::R,
        _ => return Err(BadMove::Choice),
    };
    Ok((index, place))
}

fn hand(pieces: &[Piece]) -> String {
    let shown: Vec<String> = pieces.iter().map(ToString::to_string).collect();
    format!("[{}]", shown.join(", "))
}
