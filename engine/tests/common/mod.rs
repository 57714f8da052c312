#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use war_engine::{CardEntity, CardSlot, DeckError, DeckSource, GameConfig, GameSession, OpponentDelay, Presenter, Suit};

/// Ordered record of deck and presenter calls shared between fixtures.
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn card(rank_token: &str, suit: Suit) -> CardEntity
{
    let code = format!("{}{}", rank_token, suit.letter());
    CardEntity::new(code.clone(), code, rank_token, suit)
}

pub fn test_config(max_score: u32) -> GameConfig
{
    GameConfig
    {
        max_score,
        opponent_delay: OpponentDelay::none(),
        ..GameConfig::default()
    }
}

/// Deck that hands out a fixed list of cards in order.
pub struct ScriptedDeck
{
    cards: VecDeque<CardEntity>,
    fail_init: bool,
    initialized: bool,
    log: EventLog,
}

impl ScriptedDeck
{
    pub fn new(cards: Vec<CardEntity>, log: EventLog) -> Self
    {
        ScriptedDeck { cards: cards.into(), fail_init: false, initialized: false, log }
    }

    pub fn failing(log: EventLog) -> Self
    {
        ScriptedDeck { cards: VecDeque::new(), fail_init: true, initialized: false, log }
    }
}

#[async_trait]
impl DeckSource for ScriptedDeck
{
    async fn initialize(&mut self) -> Result<(), DeckError>
    {
        self.log.lock().unwrap().push(String::from("init"));
        if self.fail_init
        {
            return Err(DeckError::Transport(String::from("connection refused")));
        }
        self.initialized = true;
        Ok(())
    }

    async fn draw_card(&mut self) -> Option<CardEntity>
    {
        self.log.lock().unwrap().push(String::from("draw"));
        if !self.initialized
        {
            return None;
        }
        self.cards.pop_front()
    }

    fn remaining(&self) -> Option<usize>
    {
        Some(self.cards.len())
    }

    fn name(&self) -> &'static str
    {
        "scripted"
    }
}

#[derive(Debug, Default, Clone)]
pub struct Table
{
    pub score: (u32, u32, u32),
    pub results: Vec<String>,
    pub statuses: Vec<String>,
    pub status_visible: bool,
    pub draw_enabled: bool,
    pub player_image: Option<String>,
    pub bot_image: Option<String>,
}

impl Table
{
    pub fn last_result(&self) -> Option<&str>
    {
        self.results.last().map(String::as_str)
    }

    pub fn last_status(&self) -> Option<&str>
    {
        self.statuses.last().map(String::as_str)
    }
}

/// Presenter that remembers everything it was told.
pub struct RecordingPresenter
{
    table: Mutex<Table>,
    log: EventLog,
}

impl RecordingPresenter
{
    pub fn new(log: EventLog) -> Arc<Self>
    {
        Arc::new(RecordingPresenter { table: Mutex::new(Table::default()), log })
    }

    pub fn table(&self) -> Table
    {
        self.table.lock().unwrap().clone()
    }
}

#[async_trait]
impl Presenter for RecordingPresenter
{
    fn update_score(&self, player: u32, bot: u32, round: u32)
    {
        self.table.lock().unwrap().score = (player, bot, round);
    }

    fn show_result(&self, text: &str)
    {
        self.table.lock().unwrap().results.push(text.to_string());
    }

    fn set_draw_enabled(&self, enabled: bool)
    {
        self.table.lock().unwrap().draw_enabled = enabled;
    }

    fn show_status(&self, text: &str)
    {
        let mut table = self.table.lock().unwrap();
        table.statuses.push(text.to_string());
        table.status_visible = true;
    }

    fn hide_status(&self)
    {
        self.table.lock().unwrap().status_visible = false;
    }

    async fn set_card_image(&self, slot: CardSlot, image_reference: &str)
    {
        let slot_name = match slot
        {
            CardSlot::Player => "player",
            CardSlot::Bot => "bot",
        };
        self.log.lock().unwrap().push(format!("image {} {}", slot_name, image_reference));

        let mut table = self.table.lock().unwrap();
        match slot
        {
            CardSlot::Player => table.player_image = Some(image_reference.to_string()),
            CardSlot::Bot => table.bot_image = Some(image_reference.to_string()),
        }
    }
}

pub fn new_log() -> EventLog
{
    Arc::new(Mutex::new(Vec::new()))
}

/// Session already running on a scripted deck.
pub async fn scripted_session(max_score: u32, cards: Vec<CardEntity>) -> (GameSession, Arc<RecordingPresenter>, EventLog)
{
    let log = new_log();
    let presenter = RecordingPresenter::new(log.clone());
    let mut session = GameSession::new(test_config(max_score), presenter.clone());
    session
        .initialize_with_remote(Box::new(ScriptedDeck::new(cards, log.clone())))
        .await
        .expect("scripted deck initializes");
    (session, presenter, log)
}
