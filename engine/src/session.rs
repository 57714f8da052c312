use std::sync::Arc;

use serde::{Serialize, Deserialize};

use crate::card::CardEntity;
use crate::config::GameConfig;
use crate::deck::{DeckSource, LocalDeckSource, RemoteDeckSource};
use crate::error::SessionError;
use crate::presenter::Presenter;
use crate::ELoggingVerbosity;

pub const STATUS_ONLINE: &str = "Online Mode";
pub const STATUS_OFFLINE_FORCED: &str = "Offline Mode (Forced)";
pub const STATUS_OFFLINE_AUTO: &str = "Offline Mode (Auto)";

pub const RESULT_PLAYER_WINS: &str = "YOU WIN!";
pub const RESULT_BOT_WINS: &str = "BOT WINS!";
pub const RESULT_DECK_FAILED: &str = "Failed to load deck. Check your internet.";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side
{
    Player,
    Bot,
}

/// Which branch of the deck selection policy the session took.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckMode
{
    Online,
    OfflineForced,
    OfflineAuto,
}

impl DeckMode
{
    pub fn status_text(self) -> &'static str
    {
        match self
        {
            DeckMode::Online => STATUS_ONLINE,
            DeckMode::OfflineForced => STATUS_OFFLINE_FORCED,
            DeckMode::OfflineAuto => STATUS_OFFLINE_AUTO,
        }
    }

    pub fn is_offline(self) -> bool
    {
        self != DeckMode::Online
    }
}

/// One match: scores, round counter, end flag, and the deck every card of the
/// match is drawn from.
pub struct GameSession
{
    config: GameConfig,
    presenter: Arc<dyn Presenter>,

    player_score: u32,
    bot_score: u32,
    current_round: u32,
    ended: bool,
    winner: Option<Side>,

    deck: Option<Box<dyn DeckSource>>,
    deck_mode: Option<DeckMode>,
}

impl GameSession
{
    pub fn new(config: GameConfig, presenter: Arc<dyn Presenter>) -> Self
    {
        GameSession
        {
            config,
            presenter,
            player_score: 0,
            bot_score: 0,
            current_round: 0,
            ended: false,
            winner: None,
            deck: None,
            deck_mode: None,
        }
    }

    /// Starts a fresh match and picks its deck source: local when forced
    /// offline, otherwise the deck service with the local deck as fallback.
    pub async fn initialize_session(&mut self) -> Result<DeckMode, SessionError>
    {
        if self.config.force_offline
        {
            self.reset();
            return self.adopt_local(DeckMode::OfflineForced).await;
        }

        match RemoteDeckSource::from_config(&self.config)
        {
            Ok(remote) => self.initialize_with_remote(Box::new(remote)).await,
            Err(e) =>
            {
                vlog!(ELoggingVerbosity::Warning, "Deck service client unavailable ({}), using the local deck", e);
                self.reset();
                self.adopt_local(DeckMode::OfflineAuto).await
            }
        }
    }

    /// Like [`initialize_session`](Self::initialize_session), with the remote
    /// source supplied by the caller.
    pub async fn initialize_with_remote(&mut self, mut remote: Box<dyn DeckSource>) -> Result<DeckMode, SessionError>
    {
        self.reset();

        if self.config.force_offline
        {
            return self.adopt_local(DeckMode::OfflineForced).await;
        }

        match remote.initialize().await
        {
            Ok(()) =>
            {
                self.adopt(remote, DeckMode::Online);
                Ok(DeckMode::Online)
            }
            Err(e) =>
            {
                vlog!(ELoggingVerbosity::Warning, "Deck initialization failed: {}. Falling back to the local deck", e);
                self.adopt_local(DeckMode::OfflineAuto).await
            }
        }
    }

    async fn adopt_local(&mut self, mode: DeckMode) -> Result<DeckMode, SessionError>
    {
        let mut local = match self.config.local_deck_seed
        {
            Some(seed) => LocalDeckSource::with_seed(seed),
            None => LocalDeckSource::new(),
        };

        match local.initialize().await
        {
            Ok(()) =>
            {
                self.adopt(Box::new(local), mode);
                Ok(mode)
            }
            Err(e) =>
            {
                vlog!(ELoggingVerbosity::Error, "Local deck failed to initialize: {}", e);
                self.presenter.show_result(RESULT_DECK_FAILED);
                self.presenter.set_draw_enabled(false);
                Err(SessionError::NoDeckSource(e.to_string()))
            }
        }
    }

    fn adopt(&mut self, deck: Box<dyn DeckSource>, mode: DeckMode)
    {
        vlog!(ELoggingVerbosity::Normal, "Game started with the {} deck ({})", deck.name(), mode.status_text());

        self.deck = Some(deck);
        self.deck_mode = Some(mode);

        self.presenter.show_status(mode.status_text());
        self.presenter.update_score(0, 0, 0);
        self.presenter.show_result("");
        self.presenter.set_draw_enabled(true);
    }

    fn reset(&mut self)
    {
        self.player_score = 0;
        self.bot_score = 0;
        self.current_round = 0;
        self.ended = false;
        self.winner = None;
        self.deck = None;
        self.deck_mode = None;
    }

    /// Draws from the active deck. `None` when it is exhausted.
    pub async fn draw_card(&mut self) -> Option<CardEntity>
    {
        let Some(deck) = self.deck.as_mut() else
        {
            vlog!(ELoggingVerbosity::Error, "Card drawn from a session with no deck source");
            debug_assert!(false, "draw_card called before initialize_session");
            return None;
        };

        deck.draw_card().await
    }

    /// Credits one decisive round. Ignored once the match is over.
    pub fn record_outcome(&mut self, player_won: bool)
    {
        if self.ended
        {
            vlog!(ELoggingVerbosity::Warning, "Round outcome arrived after the match ended; ignored");
            return;
        }

        if player_won
        {
            self.player_score += 1;
        }
        else
        {
            self.bot_score += 1;
        }
        self.current_round += 1;

        vlog!(ELoggingVerbosity::Verbose, "Round {}: player {} - bot {}", self.current_round, self.player_score, self.bot_score);
        self.presenter.update_score(self.player_score, self.bot_score, self.current_round);

        if self.player_score >= self.config.max_score
        {
            self.end_session(true);
        }
        else if self.bot_score >= self.config.max_score
        {
            self.end_session(false);
        }
    }

    /// Ends the match. Only the first call has any effect.
    pub fn end_session(&mut self, player_won: bool)
    {
        if self.ended
        {
            return;
        }
        self.ended = true;
        self.winner = Some(if player_won { Side::Player } else { Side::Bot });

        vlog!(ELoggingVerbosity::Normal, "Game Ended. {}", if player_won { "Player Wins!" } else { "Bot Wins!" });

        self.presenter.show_result(if player_won { RESULT_PLAYER_WINS } else { RESULT_BOT_WINS });
        self.presenter.set_draw_enabled(false);
    }

    pub fn player_score(&self) -> u32
    {
        self.player_score
    }

    pub fn bot_score(&self) -> u32
    {
        self.bot_score
    }

    pub fn current_round(&self) -> u32
    {
        self.current_round
    }

    pub fn max_score(&self) -> u32
    {
        self.config.max_score
    }

    pub fn is_ended(&self) -> bool
    {
        self.ended
    }

    pub fn winner(&self) -> Option<Side>
    {
        self.winner
    }

    /// True once a deck source has been adopted.
    pub fn is_ready(&self) -> bool
    {
        self.deck.is_some()
    }

    pub fn deck_mode(&self) -> Option<DeckMode>
    {
        self.deck_mode
    }

    pub fn remaining_cards(&self) -> Option<usize>
    {
        self.deck.as_ref().and_then(|d| d.remaining())
    }

    pub fn config(&self) -> &GameConfig
    {
        &self.config
    }

    pub fn presenter(&self) -> Arc<dyn Presenter>
    {
        Arc::clone(&self.presenter)
    }
}
