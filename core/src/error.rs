use sapper_protocol::{Coord2, ProtocolError, ReplyStatus};
use serde_json::Value;
use thiserror::Error;

/// Failure of a single push on the channel.
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("{event} was rejected ({status:?}): {response}")]
    Rejected {
        event: String,
        status: ReplyStatus,
        response: Value,
    },
    #[error("{event} was not acknowledged in time")]
    Timeout { event: String },
    #[error("Channel closed before the reply arrived")]
    Closed,
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("No game in progress")]
    NoGame,
    #[error("Coordinates {0:?} are outside the board")]
    OutOfBounds(Coord2),
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error("Unexpected {event} reply: {source}")]
    Decode {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl From<ProtocolError> for ClientError {
    fn from(err: ProtocolError) -> Self {
        Self::Channel(err.into())
    }
}

pub type Result<T> = core::result::Result<T, ClientError>;
