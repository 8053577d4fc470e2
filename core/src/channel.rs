use core::future::Future;
use futures_util::future::{self, Either, LocalBoxFuture};
use sapper_protocol::Event;
use serde_json::Value;

use crate::ChannelError;

/// Eventual acknowledgment of one push: the reply payload, or why there is none.
pub type PushFuture = LocalBoxFuture<'static, Result<Value, ChannelError>>;

/// Reliable, ordered request/response channel to the game engine.
///
/// The push is issued when `push` is called, not when the returned future is
/// first polled.
pub trait Channel {
    fn push(&self, event: Event, payload: Value) -> PushFuture;
}

impl<C: Channel + ?Sized> Channel for std::rc::Rc<C> {
    fn push(&self, event: Event, payload: Value) -> PushFuture {
        (**self).push(event, payload)
    }
}

/// Connection lifecycle transitions, reported for diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub enum ConnectionEvent {
    Opened,
    Joined,
    JoinFailed(Value),
    Error(String),
    Closed,
}

impl ConnectionEvent {
    pub fn log(&self) {
        match self {
            Self::Opened => log::info!("socket open"),
            Self::Joined => log::info!("join ok"),
            Self::JoinFailed(response) => log::warn!("join failed: {}", response),
            Self::Error(reason) => log::warn!("channel error: {}", reason),
            Self::Closed => log::info!("channel closed"),
        }
    }
}

/// Races `request` against `sleep`, failing with [`ChannelError::Timeout`] if the sleep wins.
pub async fn with_timeout<T, F, S>(event: &str, request: F, sleep: S) -> Result<T, ChannelError>
where
    F: Future<Output = Result<T, ChannelError>>,
    S: Future<Output = ()>,
{
    let request = core::pin::pin!(request);
    let sleep = core::pin::pin!(sleep);
    match future::select(request, sleep).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => {
            log::warn!("{} timed out", event);
            Err(ChannelError::Timeout {
                event: event.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;
    use serde_json::json;

    #[test]
    fn reply_before_deadline_wins() {
        let result = with_timeout(
            "pick",
            future::ready(Ok::<_, ChannelError>(json!({"ok": true}))),
            future::pending(),
        )
        .now_or_never()
        .unwrap();
        assert_eq!(result.unwrap(), json!({"ok": true}));
    }

    #[test]
    fn missing_reply_times_out() {
        let result = with_timeout(
            "flag",
            future::pending::<Result<Value, ChannelError>>(),
            future::ready(()),
        )
        .now_or_never()
        .unwrap();
        assert!(matches!(result, Err(ChannelError::Timeout { event }) if event == "flag"));
    }
}
