use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

/// Rank given to cards whose rank token could not be parsed. Never playable.
pub const INVALID_RANK: u8 = 0;

pub const RANK_TOKENS: [&str; 13] =
[
    "2", "3", "4", "5", "6", "7", "8", "9", "10", "JACK", "QUEEN", "KING", "ACE",
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Suit
{
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit
{
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub fn token(self) -> &'static str
    {
        match self
        {
            Suit::Hearts => "HEARTS",
            Suit::Diamonds => "DIAMONDS",
            Suit::Clubs => "CLUBS",
            Suit::Spades => "SPADES",
        }
    }

    pub fn letter(self) -> char
    {
        match self
        {
            Suit::Hearts => 'H',
            Suit::Diamonds => 'D',
            Suit::Clubs => 'C',
            Suit::Spades => 'S',
        }
    }
}

impl FromStr for Suit
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s
        {
            "HEARTS" => Ok(Suit::Hearts),
            "DIAMONDS" => Ok(Suit::Diamonds),
            "CLUBS" => Ok(Suit::Clubs),
            "SPADES" => Ok(Suit::Spades),
            other => Err(format!("unknown suit '{}'", other)),
        }
    }
}

impl fmt::Display for Suit
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.token())
    }
}

/// Maps a rank token from the deck API onto its comparable strength.
/// Unknown tokens give [`INVALID_RANK`].
pub fn parse_rank(token: &str) -> u8
{
    match token
    {
        "ACE" => 14,
        "KING" => 13,
        "QUEEN" => 12,
        "JACK" => 11,
        _ => match token.parse::<u8>()
        {
            Ok(n) if (2..=10).contains(&n) => n,
            _ => INVALID_RANK,
        },
    }
}

/// One drawn card. Built once, never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CardRecord")]
pub struct CardEntity
{
    code: String,
    image_reference: String,
    rank: u8,
    suit: Suit,
}

impl CardEntity
{
    pub fn new(code: impl Into<String>, image_reference: impl Into<String>, rank_token: &str, suit: Suit) -> Self
    {
        CardEntity
        {
            code: code.into(),
            image_reference: image_reference.into(),
            rank: parse_rank(rank_token),
            suit,
        }
    }

    pub fn code(&self) -> &str
    {
        &self.code
    }

    pub fn image_reference(&self) -> &str
    {
        &self.image_reference
    }

    pub fn rank(&self) -> u8
    {
        self.rank
    }

    pub fn suit(&self) -> Suit
    {
        self.suit
    }

    /// False for cards carrying the invalid rank sentinel.
    pub fn is_valid(&self) -> bool
    {
        (2..=14).contains(&self.rank)
    }

    pub fn rank_name(&self) -> String
    {
        match self.rank
        {
            14 => String::from("ACE"),
            13 => String::from("KING"),
            12 => String::from("QUEEN"),
            11 => String::from("JACK"),
            INVALID_RANK => String::from("?"),
            n => n.to_string(),
        }
    }
}

// Wire form of a card; ranks outside the parsed range are refused.
#[derive(Deserialize)]
struct CardRecord
{
    code: String,
    image_reference: String,
    rank: u8,
    suit: Suit,
}

impl TryFrom<CardRecord> for CardEntity
{
    type Error = String;

    fn try_from(record: CardRecord) -> Result<Self, Self::Error>
    {
        if record.rank != INVALID_RANK && !(2..=14).contains(&record.rank)
        {
            return Err(format!("rank {} is out of range for card '{}'", record.rank, record.code));
        }

        Ok(CardEntity
        {
            code: record.code,
            image_reference: record.image_reference,
            rank: record.rank,
            suit: record.suit,
        })
    }
}

impl fmt::Display for CardEntity
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{} of {}", self.rank_name(), self.suit)
    }
}
