use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use engine::{CardSlot, ImageSource, Presenter};
use serde::Serialize;

/// Snapshot of the table as the browser draws it.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TableView
{
    pub player_score: u32,
    pub bot_score: u32,
    pub round: u32,
    pub result: String,
    pub status: Option<String>,
    pub draw_enabled: bool,
    pub player_card: Option<String>,
    pub bot_card: Option<String>,
    /// Bumped on every card change so the page knows to play a flip.
    pub flips: u64,
}

/// Presenter that keeps a [`TableView`] for `/api/state` to hand out.
pub struct WebPresenter
{
    view: Mutex<TableView>,
    flip_time: Duration,
}

impl WebPresenter
{
    pub fn new(flip_time: Duration) -> Self
    {
        WebPresenter { view: Mutex::new(TableView::default()), flip_time }
    }

    pub fn snapshot(&self) -> TableView
    {
        self.with_view(|v| v.clone())
    }

    // A poisoned lock only means a handler panicked mid-update; the view is
    // still readable.
    fn with_view<R>(&self, f: impl FnOnce(&mut TableView) -> R) -> R
    {
        let mut view = self.view.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut view)
    }
}

/// Url the browser should load for a card reference.
pub fn card_url(image_reference: &str) -> String
{
    match ImageSource::resolve(image_reference)
    {
        ImageSource::Remote(url) => url.to_string(),
        ImageSource::Local(key) => format!("/cards/{}.png", key),
    }
}

/// Plain SVG face for a local card asset name such as `0H.png`, used when no
/// image file ships for it. `None` for names that are not card codes.
pub fn card_face_svg(file: &str) -> Option<String>
{
    let code = file.strip_suffix(".png").unwrap_or(file);
    let mut chars = code.chars();
    let (rank, suit, None) = (chars.next()?, chars.next()?, chars.next()) else
    {
        return None;
    };

    let rank = match rank
    {
        'A' | 'K' | 'Q' | 'J' => rank.to_string(),
        '0' => String::from("10"),
        '2'..='9' => rank.to_string(),
        _ => return None,
    };
    let (symbol, colour) = match suit
    {
        'H' => ("&#9829;", "#c0392b"),
        'D' => ("&#9830;", "#c0392b"),
        'C' => ("&#9827;", "#222222"),
        'S' => ("&#9824;", "#222222"),
        _ => return None,
    };

    Some(format!(
        concat!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"226\" height=\"314\" viewBox=\"0 0 226 314\">",
            "<rect x=\"2\" y=\"2\" width=\"222\" height=\"310\" rx=\"14\" fill=\"#ffffff\" stroke=\"#444444\" stroke-width=\"3\"/>",
            "<text x=\"113\" y=\"150\" font-family=\"sans-serif\" font-size=\"72\" text-anchor=\"middle\" fill=\"{colour}\">{rank}</text>",
            "<text x=\"113\" y=\"240\" font-family=\"sans-serif\" font-size=\"80\" text-anchor=\"middle\" fill=\"{colour}\">{symbol}</text>",
            "</svg>"
        ),
        colour = colour,
        rank = rank,
        symbol = symbol,
    ))
}

#[async_trait]
impl Presenter for WebPresenter
{
    fn update_score(&self, player: u32, bot: u32, round: u32)
    {
        self.with_view(|v| {
            v.player_score = player;
            v.bot_score = bot;
            v.round = round;
        });
    }

    fn show_result(&self, text: &str)
    {
        self.with_view(|v| v.result = text.to_string());
    }

    fn set_draw_enabled(&self, enabled: bool)
    {
        self.with_view(|v| v.draw_enabled = enabled);
    }

    fn show_status(&self, text: &str)
    {
        self.with_view(|v| v.status = Some(text.to_string()));
    }

    fn hide_status(&self)
    {
        self.with_view(|v| v.status = None);
    }

    async fn set_card_image(&self, slot: CardSlot, image_reference: &str)
    {
        let url = card_url(image_reference);
        self.with_view(|v| {
            match slot
            {
                CardSlot::Player => v.player_card = Some(url),
                CardSlot::Bot => v.bot_card = Some(url),
            }
            v.flips += 1;
        });

        // Let the page finish its flip before the round moves on.
        if !self.flip_time.is_zero()
        {
            tokio::time::sleep(self.flip_time).await;
        }
    }
}
