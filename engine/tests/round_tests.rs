mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use tokio::sync::Mutex;
use war_engine::{
    CardEntity, GameSession, OpponentDelay, RoundController, RoundReport, Side, Suit,
    RESULT_BOT_ROUND, RESULT_PLAYER_ROUND, RESULT_PLAYER_WINS, RESULT_TIE, STATUS_DRAW_FAILED,
};

async fn controller_with(max_score: u32, cards: Vec<CardEntity>) -> (RoundController, Arc<RecordingPresenter>, EventLog)
{
    let (session, presenter, log) = scripted_session(max_score, cards).await;
    (RoundController::from_session(session), presenter, log)
}

#[tokio::test]
async fn tie_changes_nothing_but_the_message()
{
    let (controller, presenter, _) = controller_with(8, vec![card("10", Suit::Hearts), card("10", Suit::Spades)]).await;

    let report = controller.start_round().await;
    assert!(matches!(report, RoundReport::Tie { .. }));

    let session = controller.session().lock().await;
    assert_eq!(session.player_score(), 0);
    assert_eq!(session.bot_score(), 0);
    assert_eq!(session.current_round(), 0);

    let table = presenter.table();
    assert_eq!(table.last_result(), Some(RESULT_TIE));
    assert!(table.draw_enabled);
    assert_eq!(table.player_image.as_deref(), Some("10H"));
    assert_eq!(table.bot_image.as_deref(), Some("10S"));
}

#[tokio::test]
async fn higher_rank_scores_for_the_player()
{
    let (controller, presenter, _) = controller_with(8, vec![card("QUEEN", Suit::Clubs), card("9", Suit::Clubs)]).await;

    let report = controller.start_round().await;
    assert_eq!(
        report,
        RoundReport::Decided
        {
            player: card("QUEEN", Suit::Clubs),
            bot: card("9", Suit::Clubs),
            winner: Side::Player,
            match_over: false,
        }
    );

    let table = presenter.table();
    assert_eq!(table.score, (1, 0, 1));
    assert_eq!(table.last_result(), Some(RESULT_PLAYER_ROUND));
    assert!(table.draw_enabled);
}

#[tokio::test]
async fn higher_rank_scores_for_the_bot()
{
    let (controller, presenter, _) = controller_with(8, vec![card("3", Suit::Diamonds), card("KING", Suit::Hearts)]).await;

    let report = controller.start_round().await;
    assert!(matches!(report, RoundReport::Decided { winner: Side::Bot, match_over: false, .. }));
    assert_eq!(presenter.table().score, (0, 1, 1));
    assert_eq!(presenter.table().last_result(), Some(RESULT_BOT_ROUND));
}

#[tokio::test]
async fn winning_round_ends_the_match_and_locks_the_controller()
{
    let (controller, presenter, log) = controller_with(1, vec![
        card("ACE", Suit::Spades),
        card("2", Suit::Hearts),
        card("5", Suit::Clubs),
        card("6", Suit::Clubs),
    ]).await;

    let report = controller.start_round().await;
    assert!(matches!(report, RoundReport::Decided { winner: Side::Player, match_over: true, .. }));

    {
        let session = controller.session().lock().await;
        assert_eq!(session.player_score(), 1);
        assert!(session.is_ended());
    }

    let table = presenter.table();
    assert_eq!(table.last_result(), Some(RESULT_PLAYER_WINS));
    assert!(!table.draw_enabled);

    let draws_before = log.lock().unwrap().len();
    for _ in 0..3
    {
        assert_eq!(controller.start_round().await, RoundReport::Rejected);
    }

    let table = presenter.table();
    assert!(!table.draw_enabled);
    assert_eq!(table.last_result(), Some(RESULT_PLAYER_WINS));
    assert_eq!(log.lock().unwrap().len(), draws_before);
}

#[tokio::test]
async fn player_card_is_shown_before_bot_card_is_drawn()
{
    let (controller, _, log) = controller_with(8, vec![card("4", Suit::Hearts), card("8", Suit::Hearts)]).await;
    log.lock().unwrap().clear();

    controller.start_round().await;

    assert_eq!(
        *log.lock().unwrap(),
        vec!["draw", "image player 4H", "draw", "image bot 8H"]
    );
}

#[tokio::test]
async fn empty_deck_aborts_without_scoring()
{
    let (controller, presenter, _) = controller_with(8, vec![]).await;

    assert_eq!(controller.start_round().await, RoundReport::Aborted { side: Side::Player });
    assert!(!controller.is_round_in_progress());

    let table = presenter.table();
    assert_eq!(table.score, (0, 0, 0));
    assert_eq!(table.last_status(), Some(STATUS_DRAW_FAILED));
    assert!(table.draw_enabled);
    assert_eq!(table.player_image, None);
}

#[tokio::test]
async fn bot_running_dry_aborts_after_the_player_card()
{
    let (controller, presenter, _) = controller_with(8, vec![card("JACK", Suit::Spades)]).await;

    assert_eq!(controller.start_round().await, RoundReport::Aborted { side: Side::Bot });

    let session = controller.session().lock().await;
    assert_eq!((session.player_score(), session.bot_score(), session.current_round()), (0, 0, 0));
    assert_eq!(presenter.table().player_image.as_deref(), Some("JACKS"));
    assert_eq!(presenter.table().bot_image, None);
}

#[tokio::test]
async fn unreadable_rank_is_a_failed_draw_not_a_low_card()
{
    let broken = CardEntity::new("??", "??", "JOKER", Suit::Hearts);
    let (controller, presenter, _) = controller_with(8, vec![card("2", Suit::Clubs), broken]).await;

    assert_eq!(controller.start_round().await, RoundReport::Aborted { side: Side::Bot });
    assert_eq!(presenter.table().score, (0, 0, 0));
}

#[tokio::test]
async fn round_before_initialisation_is_rejected()
{
    let log = new_log();
    let presenter = RecordingPresenter::new(log.clone());
    let controller = RoundController::from_session(GameSession::new(test_config(8), presenter));

    assert_eq!(controller.start_round().await, RoundReport::Rejected);
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn overlapping_round_is_rejected()
{
    let (session, presenter, _) = scripted_session(8, vec![
        card("9", Suit::Hearts),
        card("7", Suit::Hearts),
        card("6", Suit::Hearts),
        card("5", Suit::Hearts),
    ]).await;
    let controller = RoundController::new(
        Arc::new(Mutex::new(session)),
        presenter.clone(),
        OpponentDelay { min_ms: 50, max_ms: 50 },
    );

    let (first, second) = tokio::join!(controller.start_round(), controller.start_round());

    assert!(matches!(first, RoundReport::Decided { winner: Side::Player, .. }));
    assert_eq!(second, RoundReport::Rejected);
    assert!(!controller.is_round_in_progress());
    assert_eq!(presenter.table().score, (1, 0, 1));
    assert!(presenter.table().draw_enabled);
}

#[tokio::test(start_paused = true)]
async fn opponent_delay_is_announced_then_hidden()
{
    let (session, presenter, _) = scripted_session(8, vec![card("9", Suit::Hearts), card("7", Suit::Hearts)]).await;
    let controller = RoundController::new(
        Arc::new(Mutex::new(session)),
        presenter.clone(),
        OpponentDelay { min_ms: 800, max_ms: 800 },
    );

    controller.start_round().await;

    let table = presenter.table();
    assert_eq!(table.last_status(), Some("Waiting for opponent... (800ms)"));
    assert!(!table.status_visible);
}

#[tokio::test]
async fn new_session_is_refused_mid_round()
{
    let (session, presenter, _) = scripted_session(8, vec![card("9", Suit::Hearts), card("7", Suit::Hearts)]).await;
    let controller = RoundController::new(
        Arc::new(Mutex::new(session)),
        presenter,
        OpponentDelay { min_ms: 50, max_ms: 50 },
    );

    let (round, restart) = tokio::join!(controller.start_round(), controller.new_session());

    assert!(matches!(round, RoundReport::Decided { .. }));
    assert!(matches!(restart, Err(war_engine::SessionError::RoundInProgress)));
}

#[tokio::test(start_paused = true)]
async fn cancelled_round_gives_the_draw_button_back()
{
    let (session, presenter, _) = scripted_session(8, vec![
        card("9", Suit::Hearts),
        card("7", Suit::Hearts),
        card("6", Suit::Hearts),
        card("5", Suit::Hearts),
    ]).await;
    let controller = RoundController::new(
        Arc::new(Mutex::new(session)),
        presenter.clone(),
        OpponentDelay { min_ms: 500, max_ms: 500 },
    );

    let cancelled = tokio::time::timeout(Duration::from_millis(50), controller.start_round()).await;
    assert!(cancelled.is_err());

    assert!(!controller.is_round_in_progress());
    let table = presenter.table();
    assert!(table.draw_enabled);
    assert!(!table.status_visible);
    assert_eq!(table.score, (0, 0, 0));

    let report = controller.start_round().await;
    assert!(matches!(report, RoundReport::Decided { winner: Side::Player, .. }));
    assert_eq!(presenter.table().score, (1, 0, 1));
}

#[tokio::test]
async fn failed_draw_notice_is_cleared_by_the_next_round()
{
    let broken = CardEntity::new("??", "??", "JOKER", Suit::Hearts);
    let (controller, presenter, _) = controller_with(8, vec![
        card("2", Suit::Clubs),
        broken,
        card("9", Suit::Hearts),
        card("7", Suit::Hearts),
    ]).await;

    assert_eq!(controller.start_round().await, RoundReport::Aborted { side: Side::Bot });
    assert!(presenter.table().status_visible);
    assert_eq!(presenter.table().last_status(), Some(STATUS_DRAW_FAILED));

    assert!(matches!(controller.start_round().await, RoundReport::Decided { winner: Side::Player, .. }));
    assert!(!presenter.table().status_visible);
}
