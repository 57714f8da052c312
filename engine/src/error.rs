use thiserror::Error;

/// Why a deck source could not be initialised.
#[derive(Debug, Error)]
pub enum DeckError
{
    #[error("deck service unreachable: {0}")]
    Transport(String),

    #[error("deck service timed out")]
    Timeout,

    #[error("deck service answered with status {0}")]
    Status(u16),

    #[error("malformed deck service response: {0}")]
    Malformed(String),

    #[error("could not build http client: {0}")]
    Client(String),
}

impl From<reqwest::Error> for DeckError
{
    fn from(e: reqwest::Error) -> Self
    {
        if e.is_timeout()
        {
            DeckError::Timeout
        }
        else if let Some(status) = e.status()
        {
            DeckError::Status(status.as_u16())
        }
        else if e.is_decode()
        {
            DeckError::Malformed(e.to_string())
        }
        else
        {
            DeckError::Transport(e.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError
{
    #[error("no deck source could be initialised: {0}")]
    NoDeckSource(String),

    #[error("a round is still being played")]
    RoundInProgress,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError
{
    #[error("invalid value '{value}' for {key}")]
    InvalidValue
    {
        key: String,
        value: String,
    },
}
