use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::card::{CardEntity, Suit};
use crate::config::GameConfig;
use crate::deck::DeckSource;
use crate::error::DeckError;
use crate::ELoggingVerbosity;

#[derive(Debug, Deserialize)]
struct DeckResponse
{
    #[serde(default)]
    deck_id: Option<String>,
    #[serde(default)]
    remaining: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct DrawResponse
{
    #[serde(default)]
    cards: Vec<CardData>,
    #[serde(default)]
    remaining: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct CardData
{
    code: String,
    image: String,
    value: String,
    suit: String,
}

impl CardData
{
    fn into_card(self) -> Result<CardEntity, DeckError>
    {
        let suit: Suit = self.suit.parse().map_err(DeckError::Malformed)?;
        Ok(CardEntity::new(self.code, self.image, &self.value, suit))
    }
}

/// Deck backed by the deck-of-cards web service. Holds the id of the deck the
/// service shuffled for us.
pub struct RemoteDeckSource
{
    client: reqwest::Client,
    base_url: String,
    deck_id: Option<String>,
    remaining: Option<usize>,
}

impl RemoteDeckSource
{
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DeckError>
    {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeckError::Client(e.to_string()))?;

        Ok(RemoteDeckSource
        {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            deck_id: None,
            remaining: None,
        })
    }

    pub fn from_config(config: &GameConfig) -> Result<Self, DeckError>
    {
        Self::new(config.deck_api_url.clone(), config.request_timeout)
    }

    pub fn deck_id(&self) -> Option<&str>
    {
        self.deck_id.as_deref()
    }

    async fn get_json<T>(&self, url: &str) -> Result<T, DeckError>
    where
        T: for<'de> Deserialize<'de>,
    {
        vlog!(ELoggingVerbosity::VeryVerbose, "GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success()
        {
            return Err(DeckError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| DeckError::Malformed(e.to_string()))
    }

    async fn try_draw(&mut self, deck_id: &str) -> Result<Option<CardEntity>, DeckError>
    {
        let url = format!("{}/{}/draw/?count=1", self.base_url, deck_id);
        let response: DrawResponse = self.get_json(&url).await?;

        if response.remaining.is_some()
        {
            self.remaining = response.remaining;
        }

        match response.cards.into_iter().next()
        {
            Some(data) => data.into_card().map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl DeckSource for RemoteDeckSource
{
    async fn initialize(&mut self) -> Result<(), DeckError>
    {
        let url = format!("{}/new/shuffle/?deck_count=1", self.base_url);
        let response: DeckResponse = self.get_json(&url).await?;

        let deck_id = response
            .deck_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| DeckError::Malformed(String::from("missing deck_id")))?;

        vlog!(ELoggingVerbosity::Verbose, "Remote deck {} ready", deck_id);
        self.deck_id = Some(deck_id);
        self.remaining = response.remaining;
        Ok(())
    }

    async fn draw_card(&mut self) -> Option<CardEntity>
    {
        let Some(deck_id) = self.deck_id.clone() else
        {
            vlog!(ELoggingVerbosity::Error, "Remote deck drawn from before initialisation");
            return None;
        };

        match self.try_draw(&deck_id).await
        {
            Ok(Some(card)) => Some(card),
            Ok(None) =>
            {
                vlog!(ELoggingVerbosity::Warning, "Remote deck {} returned no cards", deck_id);
                None
            }
            Err(e) =>
            {
                vlog!(ELoggingVerbosity::Error, "Card draw failed: {}", e);
                None
            }
        }
    }

    fn remaining(&self) -> Option<usize>
    {
        self.remaining
    }

    fn name(&self) -> &'static str
    {
        "remote"
    }
}
