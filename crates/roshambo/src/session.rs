//! Best-of-three session state.

use derive_more::{Display, Error};
use tracing::{debug, info, instrument};

use crate::games::rps::{Game, GameType, Move, NameError, PlayerName, RoundResult, Seat, decide};
use crate::players::MoveSource;
use crate::store::StoreError;

/// Errors surfaced by [`GameService`](crate::GameService) operations.
#[derive(Debug, Clone, Display, Error)]
pub enum SessionError {
    /// A player name failed validation; no session was started.
    #[display("invalid {seat} name: {reason}")]
    InvalidPlayerName {
        /// The first seat whose name was rejected.
        seat: Seat,
        /// Why it was rejected.
        #[error(source)]
        reason: NameError,
    },
    /// A round was played before any session was started.
    #[display("no game in progress")]
    NoActiveSession,
    /// The finished game could not be saved.
    #[display("failed to save game: {_0}")]
    PersistenceFailed(#[error(source)] StoreError),
    /// History could not be read.
    #[display("failed to load history: {_0}")]
    Storage(#[error(source)] StoreError),
    /// A finished game is still waiting to be saved.
    #[display("game {game_id} is finished but unsaved; retry the save or start a new game")]
    UnsavedGame {
        /// Id of the unsaved game.
        game_id: String,
    },
    /// `retry_save` was called with no unsaved game.
    #[display("no unsaved game to save")]
    NothingToSave,
}

/// One active best-of-three match: the game, its rounds, and its mode.
#[derive(Debug, Clone)]
pub struct Session {
    mode: GameType,
    game: Game,
    rounds: Vec<RoundResult>,
}

impl Session {
    /// Starts a session with a fresh game.
    #[instrument(skip(player_one, player_two), fields(player_one = %player_one, player_two = %player_two))]
    pub fn start(mode: GameType, player_one: &PlayerName, player_two: &PlayerName) -> Self {
        let game = Game::start(player_one, player_two);
        info!(game_id = %game.id(), %mode, "Session started");
        Self {
            mode,
            game,
            rounds: Vec::new(),
        }
    }

    /// Mode chosen at start.
    pub fn mode(&self) -> GameType {
        self.mode
    }

    /// The game being played.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Rounds played so far, in order.
    pub fn rounds(&self) -> &[RoundResult] {
        &self.rounds
    }

    /// Plays one round and finalizes the game if the match is decided.
    ///
    /// In automated mode `second` is ignored and `opponent` supplies the move.
    #[instrument(skip(self, opponent), fields(game_id = %self.game.id(), round = self.rounds.len() + 1))]
    pub(crate) fn play(
        &mut self,
        first: Move,
        second: Move,
        opponent: &mut dyn MoveSource,
    ) -> RoundReport {
        debug_assert!(!self.game.is_finished(), "round played on a finished game");

        let second = match self.mode {
            GameType::PlayerVsPlayer => second,
            GameType::PlayerVsAutomated => opponent.next_move(),
        };
        let round = RoundResult::new(first, second);
        self.rounds.push(round);
        debug!(%first, %second, winner = self.game.label(round.winner()), "Round played");

        if let Some(winner) = decide(&self.rounds) {
            self.game.finalize(winner);
            info!(
                winner = self.game.label(winner),
                rounds = self.rounds.len(),
                "Game decided"
            );
        }

        RoundReport {
            number: self.rounds.len(),
            round,
            game: self.game.clone(),
        }
    }
}

/// What a call to `play_round` produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    number: usize,
    round: RoundResult,
    game: Game,
}

impl RoundReport {
    /// 1-based number of the round just played.
    pub fn number(&self) -> usize {
        self.number
    }

    /// The round just played.
    pub fn round(&self) -> &RoundResult {
        &self.round
    }

    /// The game after this round; finished if the match was decided.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Consumes the report, returning the game.
    pub fn into_game(self) -> Game {
        self.game
    }

    /// Returns true if this round ended the match.
    pub fn is_final(&self) -> bool {
        self.game.is_finished()
    }
}
