//! Request/reply multiplexing for a single Phoenix channel over one text socket.

use core::cell::{Cell, RefCell};
use futures_channel::mpsc::UnboundedSender;
use futures_channel::oneshot;
use futures_util::FutureExt;
use futures_util::future;
use hashbrown::HashMap;
use sapper_protocol::{
    Event, Frame, PHOENIX_TOPIC, PHX_CLOSE, PHX_ERROR, PHX_JOIN, PHX_REPLY, ReplyPayload,
    ReplyStatus,
};
use serde_json::Value;

use crate::{Channel, ChannelError, ConnectionEvent, PushFuture};

type ReplySender = oneshot::Sender<Result<ReplyPayload, ChannelError>>;

/// One joined topic on a Phoenix socket.
///
/// Outgoing frames are queued as text on `outgoing`; whoever owns the socket
/// drains that queue and feeds every incoming text frame to [`PhoenixChannel::dispatch`].
/// Frames queued before the socket opens go out in order once it does.
#[derive(Debug)]
pub struct PhoenixChannel {
    topic: String,
    join_ref: String,
    next_ref: Cell<u64>,
    outgoing: UnboundedSender<String>,
    pending: RefCell<HashMap<String, ReplySender>>,
}

impl PhoenixChannel {
    pub fn new(topic: impl Into<String>, outgoing: UnboundedSender<String>) -> Self {
        let next_ref = Cell::new(1);
        let join_ref = Self::take_ref(&next_ref);
        Self {
            topic: topic.into(),
            join_ref,
            next_ref,
            outgoing,
            pending: Default::default(),
        }
    }

    fn take_ref(counter: &Cell<u64>) -> String {
        let value = counter.get();
        counter.set(value + 1);
        value.to_string()
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn join(&self) -> PushFuture {
        self.send(PHX_JOIN, self.join_ref.clone(), Value::Object(Default::default()))
    }

    pub fn heartbeat(&self) -> Result<(), ChannelError> {
        let text = Frame::heartbeat(Self::take_ref(&self.next_ref)).encode()?;
        self.outgoing
            .unbounded_send(text)
            .map_err(|_| ChannelError::Closed)
    }

    /// Routes one incoming text frame. Lifecycle changes are returned to the caller.
    pub fn dispatch(&self, text: &str) -> Option<ConnectionEvent> {
        let frame = match Frame::decode(text) {
            Ok(frame) => frame,
            Err(err) => {
                log::warn!("dropping malformed frame: {}", err);
                return None;
            }
        };

        if frame.topic == PHOENIX_TOPIC {
            log::trace!("heartbeat ack {:?}", frame.msg_ref);
            return None;
        }
        if frame.topic != self.topic {
            log::debug!("ignoring frame for topic {}", frame.topic);
            return None;
        }

        match frame.event.as_str() {
            PHX_REPLY => {
                self.resolve(frame.msg_ref, frame.payload);
                None
            }
            PHX_ERROR => {
                self.close();
                Some(ConnectionEvent::Error(frame.payload.to_string()))
            }
            PHX_CLOSE => {
                self.close();
                Some(ConnectionEvent::Closed)
            }
            event => {
                log::debug!("unhandled broadcast {}: {}", event, frame.payload);
                None
            }
        }
    }

    /// Fails every outstanding push with [`ChannelError::Closed`]. Returns how many there were.
    pub fn close(&self) -> usize {
        let dropped = {
            let mut pending = self.pending.borrow_mut();
            let count = pending.len();
            pending.clear();
            count
        };
        if dropped > 0 {
            log::warn!("{} pending request(s) dropped", dropped);
        }
        dropped
    }

    fn resolve(&self, msg_ref: Option<String>, payload: Value) {
        let Some(reply) = msg_ref.and_then(|msg_ref| self.pending.borrow_mut().remove(&msg_ref))
        else {
            log::debug!("reply without a pending request");
            return;
        };

        let result = serde_json::from_value::<ReplyPayload>(payload)
            .map_err(|err| ChannelError::Protocol(err.into()));
        if reply.send(result).is_err() {
            log::debug!("reply arrived after the request was abandoned");
        }
    }

    fn send(&self, event: &str, msg_ref: String, payload: Value) -> PushFuture {
        let frame = Frame {
            join_ref: Some(self.join_ref.clone()),
            msg_ref: Some(msg_ref.clone()),
            topic: self.topic.clone(),
            event: event.to_string(),
            payload,
        };
        let text = match frame.encode() {
            Ok(text) => text,
            Err(err) => return future::ready(Err(err.into())).boxed_local(),
        };

        let (reply_tx, reply_rx) = oneshot::channel();
        {
            let mut pending = self.pending.borrow_mut();
            pending.retain(|_, reply| !reply.is_canceled());
            pending.insert(msg_ref.clone(), reply_tx);
        }

        if self.outgoing.unbounded_send(text).is_err() {
            self.pending.borrow_mut().remove(&msg_ref);
            return future::ready(Err(ChannelError::Closed)).boxed_local();
        }
        log::debug!("push {} (ref {})", event, msg_ref);

        let event = event.to_string();
        async move {
            let reply = reply_rx.await.map_err(|_| ChannelError::Closed)??;
            match reply.status {
                ReplyStatus::Ok => Ok(reply.response),
                status => Err(ChannelError::Rejected {
                    event,
                    status,
                    response: reply.response,
                }),
            }
        }
        .boxed_local()
    }
}

impl Channel for PhoenixChannel {
    fn push(&self, event: Event, payload: Value) -> PushFuture {
        let msg_ref = Self::take_ref(&self.next_ref);
        self.send(event.as_str(), msg_ref, payload)
    }
}
