use async_trait::async_trait;
use serde::{Serialize, Deserialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSlot
{
    Player,
    Bot,
}

/// What an image reference on a card points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource<'a>
{
    /// Absolute url handed out by the deck service.
    Remote(&'a str),
    /// Asset key of a locally generated card, e.g. "AS".
    Local(&'a str),
}

impl<'a> ImageSource<'a>
{
    pub fn resolve(reference: &'a str) -> Self
    {
        if reference.starts_with("http")
        {
            ImageSource::Remote(reference)
        }
        else
        {
            ImageSource::Local(reference)
        }
    }
}

/// Everything the game core needs from whatever draws the table.
///
/// Implementations must tolerate calls after their widgets are gone; a torn
/// down view just ignores the update.
#[async_trait]
pub trait Presenter: Send + Sync
{
    fn update_score(&self, player: u32, bot: u32, round: u32);

    fn show_result(&self, text: &str);

    fn set_draw_enabled(&self, enabled: bool);

    fn show_status(&self, text: &str);

    fn hide_status(&self);

    /// Shows a card face in `slot`. Completes once any flip transition is done.
    async fn set_card_image(&self, slot: CardSlot, image_reference: &str);
}
