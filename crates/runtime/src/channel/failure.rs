use std::sync::Arc;

use thiserror::Error;

/// Why an actor channel stopped, or why a single call on it failed.
///
/// A channel records the first failure that disconnects it and never
/// overwrites it.
#[derive(Clone, Debug, Error)]
pub enum ChannelFailure {
    #[error("actor channel is not connected")]
    NotConnected,

    #[error("actor channel was killed")]
    Killed,

    #[error("actor did not reply in time")]
    Timeout,

    #[error("actor sent a line that is not valid UTF-8")]
    InvalidEncoding(#[source] std::str::Utf8Error),

    #[error("actor sent a line that is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("actor sent reply #{0} while no request was waiting for it")]
    UnexpectedReply(u64),

    #[error("actor sent reply #{0} after its caller stopped waiting")]
    Abandoned(u64),

    #[error("actor sent a line longer than {0} bytes")]
    LineTooLong(usize),

    #[error("actor closed its output stream")]
    Closed,

    #[error("actor pipe failed")]
    Io(#[source] Arc<std::io::Error>),

    #[error("failed to encode request")]
    Encode(#[source] Arc<serde_json::Error>),
}

impl From<std::io::Error> for ChannelFailure {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for ChannelFailure {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode(Arc::new(err))
    }
}
