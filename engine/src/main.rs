use std::sync::Arc;

use async_trait::async_trait;
use war_engine::{init_logging, ELoggingVerbosity, GameConfig, GameSession, RoundController, RoundReport};
use war_engine::{CardSlot, ImageSource, Presenter};
use war_engine::vlog;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Command
{
    Draw,       // "d" or empty line
    NewGame,    // "n"
    Quit,       // "q"
    Invalid,    // anything else
}

fn parse_command(input: &str) -> Command
{
    match input
    {
        "" | "d" => Command::Draw,
        "n" => Command::NewGame,
        "q" => Command::Quit,
        _ => Command::Invalid,
    }
}

/// Prints every table update on its own line.
struct ConsolePresenter;

#[async_trait]
impl Presenter for ConsolePresenter
{
    fn update_score(&self, player: u32, bot: u32, round: u32)
    {
        println!("  Player: {}  Bot: {}  Round: {}", player, bot, round);
    }

    fn show_result(&self, text: &str)
    {
        if !text.is_empty()
        {
            println!("  >> {}", text);
        }
    }

    fn set_draw_enabled(&self, enabled: bool)
    {
        if !enabled
        {
            println!("  (drawing disabled)");
        }
    }

    fn show_status(&self, text: &str)
    {
        println!("  [{}]", text);
    }

    fn hide_status(&self) {}

    async fn set_card_image(&self, slot: CardSlot, image_reference: &str)
    {
        let who = match slot
        {
            CardSlot::Player => "Player",
            CardSlot::Bot => "Bot",
        };

        match ImageSource::resolve(image_reference)
        {
            ImageSource::Remote(url) => println!("  {} card: {}", who, url),
            ImageSource::Local(key) => println!("  {} card: {}", who, key),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main()
{
    dotenv::dotenv().ok();
    init_logging(ELoggingVerbosity::Warning);

    let config = match GameConfig::from_env()
    {
        Ok(config) => config,
        Err(e) =>
        {
            eprintln!("Configuration error: {}", e);
            return;
        }
    };

    let presenter: Arc<dyn Presenter> = Arc::new(ConsolePresenter);
    let max_score = config.max_score;
    let controller = RoundController::from_session(GameSession::new(config, presenter));

    println!("War");
    println!("First to {} points wins.", max_score);
    println!("Commands:");
    println!("  d  -> draw (or just press enter)");
    println!("  n  -> start a new game");
    println!("  q  -> quit");
    println!();

    if let Err(e) = controller.new_session().await
    {
        eprintln!("Could not start a game: {}", e);
        return;
    }

    loop
    {
        let Some(line) = read_line() else
        {
            break;
        };

        match parse_command(line.trim())
        {
            Command::Draw =>
            {
                if controller.start_round().await == RoundReport::Rejected
                {
                    println!("  The game is over. Press n for a new one.");
                }
            }
            Command::NewGame =>
            {
                if let Err(e) = controller.new_session().await
                {
                    vlog!(ELoggingVerbosity::Error, "New game failed: {}", e);
                }
            }
            Command::Quit => break,
            Command::Invalid => println!("  Unknown command."),
        }
    }
}

fn read_line() -> Option<String>
{
    use std::io::{self, Write};
    print!("> ");
    io::stdout().flush().ok()?;
    let mut input = String::new();
    match io::stdin().read_line(&mut input)
    {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input),
    }
}
