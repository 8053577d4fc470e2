use futures_channel::mpsc::{self, UnboundedReceiver};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{FutureExt, SinkExt, StreamExt};
use gloo::net::websocket::{Message, futures::WebSocket};
use gloo::timers::callback::Interval;
use gloo::timers::future::TimeoutFuture;
use sapper_core::{
    Channel, ChannelError, ClientConfig, ConnectionEvent, PhoenixChannel, PushFuture, with_timeout,
};
use sapper_protocol::{Event, PHX_JOIN};
use serde_json::Value;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::Callback;

/// Phoenix channel over a browser websocket, with a deadline on every push.
///
/// Dropping it stops the heartbeat; the socket itself closes once the
/// outgoing queue is gone.
pub(crate) struct SocketChannel {
    channel: Rc<PhoenixChannel>,
    timeout_ms: u32,
    _heartbeat: Interval,
}

impl Channel for SocketChannel {
    fn push(&self, event: Event, payload: Value) -> PushFuture {
        let request = self.channel.push(event, payload);
        let deadline = TimeoutFuture::new(self.timeout_ms);
        async move { with_timeout(event.as_str(), request, deadline).await }.boxed_local()
    }
}

fn endpoint(config: &ClientConfig) -> String {
    let location = gloo::utils::window().location();
    let host = location.host().unwrap_or_default();
    let secure = location.protocol().is_ok_and(|protocol| protocol == "https:");
    config.websocket_endpoint(&host, secure)
}

/// Opens the socket and joins the configured topic. Lifecycle changes are
/// reported through `on_event`, including failure to open at all.
pub(crate) fn connect(config: &ClientConfig, on_event: Callback<ConnectionEvent>) -> SocketChannel {
    let (outgoing, queue) = mpsc::unbounded();
    let channel = Rc::new(PhoenixChannel::new(config.topic.clone(), outgoing));

    let url = endpoint(config);
    log::info!("connecting to {}", url);
    match WebSocket::open(&url) {
        Ok(socket) => {
            on_event.emit(ConnectionEvent::Opened);
            let (sink, stream) = socket.split();
            spawn_local(write_loop(sink, queue));
            spawn_local(read_loop(stream, Rc::clone(&channel), on_event.clone()));
        }
        Err(err) => {
            // dropping the queue fails every push right away
            drop(queue);
            on_event.emit(ConnectionEvent::Error(err.to_string()));
        }
    }

    let join = channel.join();
    let join_timeout = TimeoutFuture::new(config.request_timeout_ms);
    spawn_local(async move {
        let event = match with_timeout(PHX_JOIN, join, join_timeout).await {
            Ok(_) => ConnectionEvent::Joined,
            Err(ChannelError::Rejected { response, .. }) => ConnectionEvent::JoinFailed(response),
            Err(err) => ConnectionEvent::JoinFailed(Value::String(err.to_string())),
        };
        on_event.emit(event);
    });

    let heartbeat = {
        let channel = Rc::clone(&channel);
        Interval::new(config.heartbeat_interval_ms, move || {
            if let Err(err) = channel.heartbeat() {
                log::debug!("heartbeat not sent: {}", err);
            }
        })
    };

    SocketChannel {
        channel,
        timeout_ms: config.request_timeout_ms,
        _heartbeat: heartbeat,
    }
}

async fn write_loop(mut sink: SplitSink<WebSocket, Message>, mut queue: UnboundedReceiver<String>) {
    while let Some(text) = queue.next().await {
        log::trace!("-> {}", text);
        if let Err(err) = sink.send(Message::Text(text)).await {
            log::error!("socket send failed: {}", err);
            break;
        }
    }
    log::debug!("write loop finished");
}

async fn read_loop(
    mut stream: SplitStream<WebSocket>,
    channel: Rc<PhoenixChannel>,
    on_event: Callback<ConnectionEvent>,
) {
    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => {
                log::trace!("<- {}", text);
                if let Some(event) = channel.dispatch(&text) {
                    on_event.emit(event);
                }
            }
            Ok(Message::Bytes(bytes)) => {
                log::debug!("ignoring {} byte binary frame", bytes.len());
            }
            Err(err) => {
                on_event.emit(ConnectionEvent::Error(err.to_string()));
                break;
            }
        }
    }
    channel.close();
    on_event.emit(ConnectionEvent::Closed);
}
