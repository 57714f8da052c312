use std::collections::VecDeque;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::card::{CardEntity, RANK_TOKENS, Suit};
use crate::deck::DeckSource;
use crate::error::DeckError;
use crate::ELoggingVerbosity;

pub const FULL_DECK_SIZE: usize = 52;

/// In-process 52 card deck. Used when the deck service is forced off or
/// unreachable.
pub struct LocalDeckSource
{
    rng: StdRng,
    deck: Option<VecDeque<CardEntity>>,
}

impl LocalDeckSource
{
    pub fn new() -> Self
    {
        LocalDeckSource
        {
            rng: StdRng::from_entropy(),
            deck: None,
        }
    }

    /// Same seed, same shuffle order.
    pub fn with_seed(seed: u64) -> Self
    {
        LocalDeckSource
        {
            rng: StdRng::seed_from_u64(seed),
            deck: None,
        }
    }
}

impl Default for LocalDeckSource
{
    fn default() -> Self
    {
        LocalDeckSource::new()
    }
}

/// Short code for a rank/suit pair, e.g. "AS", "0H", "7C".
pub fn card_code(rank_token: &str, suit: Suit) -> String
{
    let short = match rank_token
    {
        "10" => "0",
        "ACE" => "A",
        "KING" => "K",
        "QUEEN" => "Q",
        "JACK" => "J",
        other => other,
    };

    format!("{}{}", short, suit.letter())
}

/// Every suit crossed with every rank, in suit-major order. Image reference
/// is the code, which doubles as the local asset key.
pub fn full_deck() -> Vec<CardEntity>
{
    let mut cards = Vec::with_capacity(FULL_DECK_SIZE);
    for suit in Suit::ALL
    {
        for rank in RANK_TOKENS
        {
            let code = card_code(rank, suit);
            cards.push(CardEntity::new(code.clone(), code, rank, suit));
        }
    }
    cards
}

/// Forward Fisher-Yates: position i swaps with a uniform pick from [i, n).
pub fn shuffle_forward<T>(items: &mut [T], rng: &mut impl Rng)
{
    let n = items.len();
    for i in 0..n
    {
        let j = rng.gen_range(i..n);
        items.swap(i, j);
    }
}

#[async_trait]
impl DeckSource for LocalDeckSource
{
    async fn initialize(&mut self) -> Result<(), DeckError>
    {
        let mut cards = full_deck();
        shuffle_forward(&mut cards, &mut self.rng);
        self.deck = Some(cards.into());

        vlog!(ELoggingVerbosity::Verbose, "Local deck shuffled ({} cards)", FULL_DECK_SIZE);
        Ok(())
    }

    async fn draw_card(&mut self) -> Option<CardEntity>
    {
        let Some(deck) = self.deck.as_mut() else
        {
            vlog!(ELoggingVerbosity::Warning, "Local deck drawn from before initialisation");
            return None;
        };

        let card = deck.pop_front();
        if card.is_none()
        {
            vlog!(ELoggingVerbosity::Warning, "Local deck is empty");
        }
        card
    }

    fn remaining(&self) -> Option<usize>
    {
        Some(self.deck.as_ref().map_or(0, |d| d.len()))
    }

    fn name(&self) -> &'static str
    {
        "local"
    }
}
