use async_trait::async_trait;

use crate::card::CardEntity;
use crate::error::DeckError;

pub mod local;
pub mod remote;

pub use local::LocalDeckSource;
pub use remote::RemoteDeckSource;

/// Where cards come from. A source holds at most one active deck at a time.
///
/// `draw_card` returning `None` is an ordinary outcome: the deck is exhausted
/// or was never initialised. Callers must check it.
#[async_trait]
pub trait DeckSource: Send
{
    /// Builds or fetches a fresh deck, replacing any previous one.
    async fn initialize(&mut self) -> Result<(), DeckError>;

    async fn draw_card(&mut self) -> Option<CardEntity>;

    /// Cards left in the active deck, when the source knows it.
    fn remaining(&self) -> Option<usize>;

    fn name(&self) -> &'static str;
}
