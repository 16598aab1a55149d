//! Line-oriented console front-end.
//!
//! Reads menu choices, names, and moves from any [`BufRead`] and writes
//! prompts and results to any [`Write`], so a whole session can be driven
//! from a transcript.

use std::io::{BufRead, Write};
use std::str::FromStr;

use tracing::{debug, info, instrument, warn};

use crate::games::rps::{
    Game, GameType, MAX_ROUNDS, Move, NameError, PlayerName, RoundResult, Winner,
};
use crate::service::GameService;
use crate::session::SessionError;

/// Whether the input stream is still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Closed,
}

/// Menu-driven console over a [`GameService`].
#[derive(Debug)]
pub struct Console<R, W> {
    service: GameService,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Creates a console reading from `input` and writing to `output`.
    pub fn new(service: GameService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    /// Returns the service behind the console.
    pub fn service(&self) -> &GameService {
        &self.service
    }

    /// Consumes the console, returning its output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs the main menu until the user exits or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    #[instrument(skip(self))]
    pub fn run(&mut self) -> anyhow::Result<()> {
        info!("Starting console menu");
        loop {
            writeln!(self.output, "\nRock Paper Scissors Game")?;
            writeln!(self.output, "1. Player vs Player")?;
            writeln!(self.output, "2. Player vs Bot")?;
            writeln!(self.output, "3. View Game History")?;
            writeln!(self.output, "4. Exit")?;
            self.prompt("Choose an option: ")?;

            let Some(choice) = self.read_input()? else {
                break;
            };
            debug!(%choice, "Menu choice");

            let flow = match choice.as_str() {
                "1" => self.play_match(GameType::PlayerVsPlayer)?,
                "2" => self.play_match(GameType::PlayerVsAutomated)?,
                "3" => {
                    self.show_history()?;
                    Flow::Continue
                }
                "4" => {
                    writeln!(self.output, "Thanks for playing!")?;
                    break;
                }
                _ => {
                    writeln!(self.output, "Invalid option, please try again")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Closed {
                break;
            }
        }
        info!("Console closed");
        Ok(())
    }

    #[instrument(skip(self))]
    fn play_match(&mut self, mode: GameType) -> anyhow::Result<Flow> {
        let (player_one, player_two) = match mode {
            GameType::PlayerVsPlayer => {
                self.prompt("Enter Player 1 name: ")?;
                let Some(one) = self.read_name(None)? else {
                    return Ok(Flow::Closed);
                };
                self.prompt("Enter Player 2 name: ")?;
                let Some(two) = self.read_name(Some(&one))? else {
                    return Ok(Flow::Closed);
                };
                (one, two)
            }
            GameType::PlayerVsAutomated => {
                let bot = self.service.opponent_name().to_string();
                self.prompt("Enter your name: ")?;
                let Some(one) = self.read_name(Some(&bot))? else {
                    return Ok(Flow::Closed);
                };
                (one, bot)
            }
        };

        if let Err(e) = self.service.start_session(mode, &player_one, &player_two) {
            writeln!(self.output, "Error: {}", e)?;
            return Ok(Flow::Continue);
        }

        writeln!(
            self.output,
            "\nBest of 3 rounds! Game ends early if a player wins the first two rounds."
        )?;

        for number in 1..=MAX_ROUNDS {
            writeln!(self.output, "\nRound {}:", number)?;

            let Some(first) = self.read_move(&player_one)? else {
                return Ok(Flow::Closed);
            };
            let second = match mode {
                GameType::PlayerVsPlayer => match self.read_move(&player_two)? {
                    Some(second) => second,
                    None => return Ok(Flow::Closed),
                },
                // Replaced by the move source.
                GameType::PlayerVsAutomated => Move::Rock,
            };

            match self.service.play_round(first, second) {
                Ok(report) => {
                    self.display_round(report.game(), report.round())?;
                    if report.is_final() {
                        self.display_outcome(report.game(), report.number())?;
                        return Ok(Flow::Continue);
                    }
                }
                Err(SessionError::PersistenceFailed(e)) => {
                    if let (Some(game), Some(round)) = (
                        self.service.active_game().cloned(),
                        self.service.active_rounds().last().copied(),
                    ) {
                        self.display_round(&game, &round)?;
                        self.display_outcome(&game, number)?;
                    }
                    writeln!(self.output, "Could not save the game: {}", e)?;
                    return self.offer_retry();
                }
                Err(e) => {
                    writeln!(self.output, "Error: {}", e)?;
                    return Ok(Flow::Continue);
                }
            }
        }
        Ok(Flow::Continue)
    }

    /// Asks whether to retry saving until it succeeds or the user declines.
    fn offer_retry(&mut self) -> anyhow::Result<Flow> {
        loop {
            self.prompt("Retry saving? (y/n): ")?;
            let Some(answer) = self.read_input()? else {
                return Ok(Flow::Closed);
            };
            if !answer.eq_ignore_ascii_case("y") {
                warn!("Unsaved game left behind");
                writeln!(self.output, "Game not saved.")?;
                return Ok(Flow::Continue);
            }
            match self.service.retry_save() {
                Ok(_) => {
                    writeln!(self.output, "Game saved.")?;
                    return Ok(Flow::Continue);
                }
                Err(e) => writeln!(self.output, "Could not save the game: {}", e)?,
            }
        }
    }

    fn show_history(&mut self) -> anyhow::Result<()> {
        match self.service.history() {
            Ok(games) => render_history(&games, &mut self.output)?,
            Err(e) => writeln!(self.output, "Error getting history: {}", e)?,
        }
        Ok(())
    }

    fn display_round(&mut self, game: &Game, round: &RoundResult) -> anyhow::Result<()> {
        writeln!(self.output, "\nGame Result:")?;
        writeln!(self.output, "{} vs {}", game.player_one(), game.player_two())?;
        writeln!(
            self.output,
            "Round moves: {} vs {}",
            round.first(),
            round.second()
        )?;
        match round.winner() {
            Winner::Draw => writeln!(self.output, "Round is a draw")?,
            winner => writeln!(self.output, "Round winner: {}", game.label(winner))?,
        }
        Ok(())
    }

    fn display_outcome(&mut self, game: &Game, rounds: usize) -> anyhow::Result<()> {
        match game.winner() {
            None => {}
            Some(Winner::Draw) => writeln!(self.output, "The game is a draw!")?,
            Some(winner) => {
                let name = game.label(winner);
                writeln!(self.output, "Game winner: {}", name)?;
                if rounds < MAX_ROUNDS {
                    writeln!(self.output, "\n{} won in {} rounds!", name, rounds)?;
                }
            }
        }
        Ok(())
    }

    /// Reads names until one is valid and differs from `taken`.
    fn read_name(&mut self, taken: Option<&str>) -> anyhow::Result<Option<String>> {
        loop {
            let Some(raw) = self.read_input()? else {
                return Ok(None);
            };
            let checked = PlayerName::parse(raw).and_then(|name| match taken {
                Some(other) if name.as_str() == other => Err(NameError::SameAsOpponent),
                _ => Ok(name),
            });
            match checked {
                Ok(name) => return Ok(Some(name.into_inner())),
                Err(e) => self.prompt(&format!("Invalid name: {}. Please try again: ", e))?,
            }
        }
    }

    fn read_move(&mut self, player: &str) -> anyhow::Result<Option<Move>> {
        loop {
            self.prompt(&format!("{}, enter your move (Rock/Paper/Scissors): ", player))?;
            let Some(raw) = self.read_input()? else {
                return Ok(None);
            };
            match Move::from_str(&raw) {
                Ok(mv) => return Ok(Some(mv)),
                Err(_) => writeln!(
                    self.output,
                    "Invalid move. Please enter R, P, or S (or full word)"
                )?,
            }
        }
    }

    fn prompt(&mut self, text: &str) -> anyhow::Result<()> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }

    /// Reads one trimmed line; `None` at end of input.
    fn read_input(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Writes a history listing, or a placeholder when there are no games.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn render_history(games: &[Game], out: &mut impl Write) -> std::io::Result<()> {
    if games.is_empty() {
        return writeln!(out, "No games played yet!");
    }

    writeln!(out, "\nGame History:")?;
    for game in games {
        writeln!(out, "\nGame ID: {}", game.id())?;
        writeln!(out, "Players: {} vs {}", game.player_one(), game.player_two())?;
        writeln!(out, "Winner: {}", game.winner_label().unwrap_or("-"))?;
        writeln!(
            out,
            "Played at: {}",
            game.played_at().format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(out, "------------------------")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::rps::Move::Scissors;
    use crate::players::ScriptedMoves;
    use crate::store::{HistoryStore, InMemoryHistoryStore, StoreError};
    use chrono::{TimeZone, Utc};
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn console_with(
        store: impl HistoryStore + 'static,
        transcript: &str,
    ) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        let bot = ScriptedMoves::new("Bot", [Scissors]).unwrap();
        let service = GameService::new(store, bot);
        Console::new(service, Cursor::new(transcript.as_bytes().to_vec()), Vec::new())
    }

    fn run(transcript: &str) -> (String, usize) {
        let mut console = console_with(InMemoryHistoryStore::new(), transcript);
        console.run().unwrap();
        let saved = console.service().history().unwrap().len();
        (String::from_utf8(console.into_output()).unwrap(), saved)
    }

    #[test]
    fn test_player_vs_player_sweep() {
        let (out, saved) = run("1\nAlice\nBob\nr\ns\np\nr\n4\n");
        assert!(out.contains("Best of 3 rounds!"));
        assert!(out.contains("Round moves: Rock vs Scissors"));
        assert!(out.contains("Game winner: Alice"));
        assert!(out.contains("Alice won in 2 rounds!"));
        assert!(out.contains("Thanks for playing!"));
        assert!(!out.contains("Round 3:"));
        assert_eq!(saved, 1);
    }

    #[test]
    fn test_three_draws_end_in_draw() {
        let (out, saved) = run("1\nAlice\nBob\nrock\nrock\npaper\npaper\nS\nS\n4\n");
        assert!(out.contains("Round 3:"));
        assert!(out.contains("Round is a draw"));
        assert!(out.contains("The game is a draw!"));
        assert_eq!(saved, 1);
    }

    #[test]
    fn test_invalid_name_and_move_reprompt() {
        let (out, saved) = run("1\n\nAbsurdlyLongPlayerName\nAlice\nBob\nx\nr\ns\nr\ns\n4\n");
        assert!(out.contains("Invalid name: name cannot be empty"));
        assert!(out.contains("Invalid name: name cannot be longer than 15 characters"));
        assert!(out.contains("Invalid move. Please enter R, P, or S (or full word)"));
        assert!(out.contains("Game winner: Alice"));
        assert_eq!(saved, 1);
    }

    #[test]
    fn test_second_player_cannot_reuse_name() {
        let (out, saved) = run("1\nSam\nSam\nPam\nr\ns\nr\ns\n4\n");
        assert!(out.contains("Invalid name: name is already taken by the other player"));
        assert!(out.contains("Game winner: Sam"));
        assert_eq!(saved, 1);
    }

    #[test]
    fn test_player_cannot_take_bot_name() {
        let (out, saved) = run("2\nBot\nAlice\nr\nr\n4\n");
        assert!(out.contains("Invalid name: name is already taken by the other player"));
        assert!(out.contains("Alice won in 2 rounds!"));
        assert_eq!(saved, 1);
    }

    #[test]
    fn test_player_vs_bot_uses_move_source() {
        let (out, saved) = run("2\nAlice\nr\nr\n4\n");
        assert!(out.contains("Alice vs Bot"));
        assert!(out.contains("Round moves: Rock vs Scissors"));
        assert!(out.contains("Alice won in 2 rounds!"));
        assert_eq!(saved, 1);
    }

    #[test]
    fn test_empty_history_and_bad_option() {
        let (out, _) = run("3\n9\n4\n");
        assert!(out.contains("No games played yet!"));
        assert!(out.contains("Invalid option, please try again"));
    }

    #[test]
    fn test_end_of_input_mid_game_exits_cleanly() {
        let (out, saved) = run("1\nAlice\nBob\nr\n");
        assert!(out.contains("Round 1:"));
        assert!(!out.contains("Thanks for playing!"));
        assert_eq!(saved, 0);
    }

    #[derive(Default)]
    struct FailOnce {
        inner: InMemoryHistoryStore,
        failed: AtomicBool,
    }

    impl HistoryStore for FailOnce {
        fn save(&self, game: &Game) -> Result<(), StoreError> {
            if !self.failed.swap(true, Ordering::SeqCst) {
                return Err(StoreError::new("disk full"));
            }
            self.inner.save(game)
        }

        fn fetch(&self) -> Result<Vec<Game>, StoreError> {
            self.inner.fetch()
        }

        fn name(&self) -> &str {
            "fail-once"
        }
    }

    #[test]
    fn test_failed_save_can_be_retried() {
        let mut console = console_with(FailOnce::default(), "1\nAlice\nBob\nr\ns\nr\ns\ny\n4\n");
        console.run().unwrap();
        assert_eq!(console.service().history().unwrap().len(), 1);
        assert!(!console.service().has_unsaved_game());

        let out = String::from_utf8(console.into_output()).unwrap();
        assert!(out.contains("Game winner: Alice"));
        assert!(out.contains("Could not save the game"));
        assert!(out.contains("Game saved."));
    }

    #[test]
    fn test_render_history_lists_games() {
        let game = Game::restore(
            "g-1".to_string(),
            "Alice".to_string(),
            "Bob".to_string(),
            Winner::Draw,
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap(),
        );
        let mut out = Vec::new();
        render_history(&[game], &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Game ID: g-1"));
        assert!(out.contains("Players: Alice vs Bob"));
        assert!(out.contains("Winner: Draw"));
        assert!(out.contains("Played at: 2026-03-01 12:30:00 UTC"));
    }
}
