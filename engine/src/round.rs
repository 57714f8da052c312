use std::cmp::Ordering as RankOrdering;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tokio::sync::Mutex;

use crate::card::CardEntity;
use crate::config::OpponentDelay;
use crate::error::SessionError;
use crate::presenter::{CardSlot, Presenter};
use crate::session::{DeckMode, GameSession, Side};
use crate::ELoggingVerbosity;

pub const RESULT_TIE: &str = "It's a Tie!";
pub const RESULT_PLAYER_ROUND: &str = "Player Wins the Round!";
pub const RESULT_BOT_ROUND: &str = "Bot Wins the Round!";
pub const STATUS_DRAW_FAILED: &str = "Could not draw a card. Try again.";

/// What a call to [`RoundController::start_round`] did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoundReport
{
    /// Another round was in flight, the match is over, or no deck was chosen.
    Rejected,
    /// `side` got no playable card; nothing was scored.
    Aborted
    {
        side: Side,
    },
    Tie
    {
        player: CardEntity,
        bot: CardEntity,
    },
    Decided
    {
        player: CardEntity,
        bot: CardEntity,
        winner: Side,
        match_over: bool,
    },
}

// Puts the controller back to idle however the round body exits. A round
// dropped before it finished also gives the table back its draw button.
struct RoundGuard<'a>
{
    controller: &'a RoundController,
    restore_table: bool,
}

impl Drop for RoundGuard<'_>
{
    fn drop(&mut self)
    {
        if self.restore_table
        {
            vlog!(ELoggingVerbosity::Warning, "Round cancelled before it finished");
            self.controller.presenter.hide_status();
            if !self.controller.match_ended.load(Ordering::SeqCst)
            {
                self.controller.presenter.set_draw_enabled(true);
            }
        }
        self.controller.round_in_progress.store(false, Ordering::SeqCst);
    }
}

/// Plays rounds against a shared session, one at a time.
pub struct RoundController
{
    session: Arc<Mutex<GameSession>>,
    presenter: Arc<dyn Presenter>,
    opponent_delay: OpponentDelay,
    round_in_progress: AtomicBool,
    // Mirrors `GameSession::is_ended` for code that cannot await the lock.
    match_ended: AtomicBool,
}

impl RoundController
{
    pub fn new(session: Arc<Mutex<GameSession>>, presenter: Arc<dyn Presenter>, opponent_delay: OpponentDelay) -> Self
    {
        let ended = session.try_lock().map(|s| s.is_ended()).unwrap_or(false);
        RoundController
        {
            session,
            presenter,
            opponent_delay,
            round_in_progress: AtomicBool::new(false),
            match_ended: AtomicBool::new(ended),
        }
    }

    /// Wraps a session, taking the presenter and opponent delay from it.
    pub fn from_session(session: GameSession) -> Self
    {
        let presenter = session.presenter();
        let opponent_delay = session.config().opponent_delay;
        Self::new(Arc::new(Mutex::new(session)), presenter, opponent_delay)
    }

    pub fn session(&self) -> &Arc<Mutex<GameSession>>
    {
        &self.session
    }

    pub fn is_round_in_progress(&self) -> bool
    {
        self.round_in_progress.load(Ordering::SeqCst)
    }

    /// Restarts the match with a freshly selected deck. Refused while a round
    /// is being played.
    pub async fn new_session(&self) -> Result<DeckMode, SessionError>
    {
        let Some(_guard) = self.claim() else
        {
            return Err(SessionError::RoundInProgress);
        };

        let mut session = self.session.lock().await;
        let mode = session.initialize_session().await;
        self.match_ended.store(session.is_ended(), Ordering::SeqCst);
        mode
    }

    /// Plays one round: player draws, opponent draws, higher rank scores.
    pub async fn start_round(&self) -> RoundReport
    {
        let Some(mut guard) = self.try_begin().await else
        {
            return RoundReport::Rejected;
        };

        guard.restore_table = true;
        self.presenter.set_draw_enabled(false);
        self.presenter.hide_status();

        let report = self.play_round().await;
        guard.restore_table = false;
        report
    }

    fn claim(&self) -> Option<RoundGuard<'_>>
    {
        self.round_in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| RoundGuard { controller: self, restore_table: false })
    }

    async fn try_begin(&self) -> Option<RoundGuard<'_>>
    {
        let Some(guard) = self.claim() else
        {
            vlog!(ELoggingVerbosity::Verbose, "Round already in progress");
            return None;
        };

        let session = self.session.lock().await;
        self.match_ended.store(session.is_ended(), Ordering::SeqCst);
        if session.is_ended()
        {
            vlog!(ELoggingVerbosity::Verbose, "Match is over, no more rounds");
            return None;
        }
        if !session.is_ready()
        {
            vlog!(ELoggingVerbosity::Error, "Round requested before the session picked a deck source");
            return None;
        }

        Some(guard)
    }

    async fn play_round(&self) -> RoundReport
    {
        let Some(player) = self.draw_for(Side::Player).await else
        {
            return self.abort(Side::Player).await;
        };
        self.presenter.set_card_image(CardSlot::Player, player.image_reference()).await;

        self.opponent_thinks().await;

        let Some(bot) = self.draw_for(Side::Bot).await else
        {
            return self.abort(Side::Bot).await;
        };
        self.presenter.set_card_image(CardSlot::Bot, bot.image_reference()).await;

        vlog!(ELoggingVerbosity::Verbose, "Player drew {}, bot drew {}", player, bot);

        let winner = match player.rank().cmp(&bot.rank())
        {
            RankOrdering::Equal => None,
            RankOrdering::Greater => Some(Side::Player),
            RankOrdering::Less => Some(Side::Bot),
        };

        let match_over =
        {
            let mut session = self.session.lock().await;
            if let Some(side) = winner
            {
                session.record_outcome(side == Side::Player);
            }
            self.match_ended.store(session.is_ended(), Ordering::SeqCst);
            session.is_ended()
        };

        // end_session already owns the final message and the disabled button
        if !match_over
        {
            let text = match winner
            {
                None => RESULT_TIE,
                Some(Side::Player) => RESULT_PLAYER_ROUND,
                Some(Side::Bot) => RESULT_BOT_ROUND,
            };
            self.presenter.show_result(text);
            self.presenter.set_draw_enabled(true);
        }

        match winner
        {
            None => RoundReport::Tie { player, bot },
            Some(winner) => RoundReport::Decided { player, bot, winner, match_over },
        }
    }

    async fn draw_for(&self, side: Side) -> Option<CardEntity>
    {
        let card = self.session.lock().await.draw_card().await?;
        if !card.is_valid()
        {
            vlog!(ELoggingVerbosity::Error, "Dropping card {} for {:?}: unreadable rank", card.code(), side);
            return None;
        }
        Some(card)
    }

    async fn opponent_thinks(&self)
    {
        if self.opponent_delay.is_none()
        {
            return;
        }

        let delay =
        {
            let mut rng = rand::thread_rng();
            self.opponent_delay.sample(&mut rng)
        };

        self.presenter.show_status(&format!("Waiting for opponent... ({}ms)", delay.as_millis()));
        tokio::time::sleep(delay).await;
        self.presenter.hide_status();
    }

    async fn abort(&self, side: Side) -> RoundReport
    {
        vlog!(ELoggingVerbosity::Warning, "No card for {:?}; round abandoned", side);

        self.presenter.show_status(STATUS_DRAW_FAILED);
        if !self.session.lock().await.is_ended()
        {
            self.presenter.set_draw_enabled(true);
        }

        RoundReport::Aborted { side }
    }
}
