//! Game orchestration layer.

use tracing::{debug, info, instrument, warn};

use crate::games::rps::{Game, GameType, Move, PlayerName, RoundResult, Seat};
use crate::players::MoveSource;
use crate::session::{RoundReport, Session, SessionError};
use crate::store::HistoryStore;

/// Lifecycle of the service's single session slot.
#[derive(Debug)]
enum SessionState {
    /// No match running.
    Idle,
    /// A match with one or two rounds played and no winner yet.
    InProgress(Session),
    /// A decided match whose save failed.
    Unsaved(Session),
}

/// Entry point for callers: starts matches, plays rounds, and reads history.
///
/// Each service owns its session, its history store handle, and the move
/// source for the automated seat. Independent services can coexist.
pub struct GameService {
    store: Box<dyn HistoryStore>,
    opponent: Box<dyn MoveSource>,
    state: SessionState,
}

impl std::fmt::Debug for GameService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameService")
            .field("store", &self.store.name())
            .field("opponent", &self.opponent.name())
            .field("state", &self.state)
            .finish()
    }
}

impl GameService {
    /// Creates a service backed by `store`, using `opponent` for the automated seat.
    #[instrument(skip_all, fields(store = store.name(), opponent = opponent.name()))]
    pub fn new(store: impl HistoryStore + 'static, opponent: impl MoveSource + 'static) -> Self {
        info!("Creating GameService");
        Self {
            store: Box::new(store),
            opponent: Box::new(opponent),
            state: SessionState::Idle,
        }
    }

    /// Returns the history store.
    pub fn store(&self) -> &dyn HistoryStore {
        self.store.as_ref()
    }

    /// Name of the move source filling the automated seat.
    pub fn opponent_name(&self) -> &str {
        self.opponent.name()
    }

    /// Starts a new match, discarding any unfinished or unsaved one.
    ///
    /// Player one's name is checked first. Player two may not reuse it. On
    /// failure the current state is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidPlayerName`] naming the first rejected seat.
    #[instrument(skip(self))]
    pub fn start_session(
        &mut self,
        mode: GameType,
        player_one: &str,
        player_two: &str,
    ) -> Result<Game, SessionError> {
        let one = PlayerName::parse(player_one).map_err(|reason| {
            warn!(%reason, "Rejected player 1 name");
            SessionError::InvalidPlayerName {
                seat: Seat::PlayerOne,
                reason,
            }
        })?;
        let two = PlayerName::parse_against(player_two, &one).map_err(|reason| {
            warn!(%reason, "Rejected player 2 name");
            SessionError::InvalidPlayerName {
                seat: Seat::PlayerTwo,
                reason,
            }
        })?;

        match &self.state {
            SessionState::Idle => {}
            SessionState::InProgress(old) => {
                debug!(game_id = %old.game().id(), "Discarding unfinished game")
            }
            SessionState::Unsaved(old) => {
                warn!(game_id = %old.game().id(), "Discarding unsaved game")
            }
        }

        let session = Session::start(mode, &one, &two);
        let game = session.game().clone();
        self.state = SessionState::InProgress(session);
        Ok(game)
    }

    /// Plays one round of the active match.
    ///
    /// In [`GameType::PlayerVsAutomated`] mode `second` is ignored and the
    /// move source throws for player two. When the round decides the match
    /// the game is saved before this returns, and the service goes idle.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NoActiveSession`] if no match was started.
    /// - [`SessionError::UnsavedGame`] if the previous save failed.
    /// - [`SessionError::PersistenceFailed`] if saving the decided game fails;
    ///   the game is then held for [`retry_save`](Self::retry_save).
    #[instrument(skip(self))]
    pub fn play_round(&mut self, first: Move, second: Move) -> Result<RoundReport, SessionError> {
        let mut session = match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Idle => {
                warn!("Round played with no active session");
                return Err(SessionError::NoActiveSession);
            }
            SessionState::Unsaved(session) => {
                let game_id = session.game().id().clone();
                self.state = SessionState::Unsaved(session);
                return Err(SessionError::UnsavedGame { game_id });
            }
            SessionState::InProgress(session) => session,
        };

        let report = session.play(first, second, self.opponent.as_mut());
        if !report.is_final() {
            self.state = SessionState::InProgress(session);
            return Ok(report);
        }

        match self.store.save(session.game()) {
            Ok(()) => {
                info!(game_id = %report.game().id(), "Game saved");
                Ok(report)
            }
            Err(e) => {
                warn!(error = %e, game_id = %session.game().id(), "Saving game failed");
                self.state = SessionState::Unsaved(session);
                Err(SessionError::PersistenceFailed(e))
            }
        }
    }

    /// Saves a decided game whose earlier save failed.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NothingToSave`] if no game is waiting.
    /// - [`SessionError::PersistenceFailed`] if the save fails again.
    #[instrument(skip(self))]
    pub fn retry_save(&mut self) -> Result<Game, SessionError> {
        let session = match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Unsaved(session) => session,
            other => {
                self.state = other;
                return Err(SessionError::NothingToSave);
            }
        };

        match self.store.save(session.game()) {
            Ok(()) => {
                info!(game_id = %session.game().id(), "Game saved on retry");
                Ok(session.game().clone())
            }
            Err(e) => {
                warn!(error = %e, "Retried save failed");
                self.state = SessionState::Unsaved(session);
                Err(SessionError::PersistenceFailed(e))
            }
        }
    }

    /// Rounds of the active match, oldest first; empty when idle.
    pub fn active_rounds(&self) -> &[RoundResult] {
        self.active_session().map(Session::rounds).unwrap_or(&[])
    }

    /// The in-progress or unsaved game, if any.
    pub fn active_game(&self) -> Option<&Game> {
        self.active_session().map(Session::game)
    }

    /// Mode of the active match, if any.
    pub fn active_mode(&self) -> Option<GameType> {
        self.active_session().map(Session::mode)
    }

    /// Returns true if a decided game is waiting for [`retry_save`](Self::retry_save).
    pub fn has_unsaved_game(&self) -> bool {
        matches!(self.state, SessionState::Unsaved(_))
    }

    /// Reads every stored game, in the store's order.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] with the store's error.
    #[instrument(skip(self))]
    pub fn history(&self) -> Result<Vec<Game>, SessionError> {
        let games = self.store.fetch().map_err(SessionError::Storage)?;
        debug!(count = games.len(), "History fetched");
        Ok(games)
    }

    fn active_session(&self) -> Option<&Session> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::InProgress(session) | SessionState::Unsaved(session) => Some(session),
        }
    }
}
