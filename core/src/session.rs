use chrono::{DateTime, SecondsFormat, Utc};
use core::future::Future;
use futures_util::FutureExt;
use futures_util::future;
use sapper_protocol::{
    Board, CellRequest, Coord2, Event, FieldReply, GameSize, MoveReply, Request, SessionId,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::rc::Rc;

use crate::{Channel, ClientError, PushFuture, Result};

/// Identity every request is scoped to. Created once per client and never changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self { id }
    }

    /// Session keyed by an ISO-8601 timestamp, e.g. `2016-05-04T03:02:01.123Z`.
    pub fn started_at(at: DateTime<Utc>) -> Self {
        Self::new(SessionId::new(
            at.to_rfc3339_opts(SecondsFormat::Millis, true),
        ))
    }

    pub fn now() -> Self {
        use web_time::{SystemTime, UNIX_EPOCH};

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as i64)
            .unwrap_or_default();
        Self::started_at(DateTime::from_timestamp_millis(millis).unwrap_or_default())
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }
}

/// Submits player intents to the remote engine, scoped to one [`Session`].
///
/// Every operation pushes its request immediately and returns a future of the
/// reply; nothing is cancelled or serialized between operations.
#[derive(Debug)]
pub struct GameSessionClient<C> {
    channel: Rc<C>,
    session: Rc<Session>,
}

impl<C> Clone for GameSessionClient<C> {
    fn clone(&self) -> Self {
        Self {
            channel: Rc::clone(&self.channel),
            session: Rc::clone(&self.session),
        }
    }
}

impl<C: Channel + 'static> GameSessionClient<C> {
    pub fn new(channel: C, session: Session) -> Self {
        log::info!("session {}", session.id());
        Self {
            channel: Rc::new(channel),
            session: Rc::new(session),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Releases whatever game the engine holds for this session, then starts a new one.
    ///
    /// `new_game` is only pushed once `stop` has been acknowledged.
    pub fn new_game(&self, size: GameSize) -> impl Future<Output = Result<Board>> + use<C> {
        log::debug!("new {} game", size);
        let stop = self.push(Request::stop(self.session.id()));
        let client = self.clone();
        async move {
            stop.await?;
            let response = client
                .push(Request::new_game(client.session.id(), size))
                .await?;
            Ok(decode::<FieldReply>(Event::NewGame, response)?.field)
        }
    }

    pub fn flag(&self, coords: Coord2) -> impl Future<Output = Result<Board>> + use<C> {
        let flag = self.push_cell(coords, Request::Flag);
        async move { Ok(decode::<FieldReply>(Event::Flag, flag.await?)?.field) }
    }

    pub fn pick(&self, coords: Coord2) -> impl Future<Output = Result<MoveReply>> + use<C> {
        let pick = self.push_cell(coords, Request::Pick);
        async move { decode(Event::Pick, pick.await?) }
    }

    /// Chord: reveal every neighbor of an already revealed numbered cell.
    pub fn force_pick(&self, coords: Coord2) -> impl Future<Output = Result<MoveReply>> + use<C> {
        let force_pick = self.push_cell(coords, Request::ForcePick);
        async move { decode(Event::ForcePick, force_pick.await?) }
    }

    fn push_cell(&self, (x, y): Coord2, request: fn(CellRequest) -> Request) -> PushFuture {
        let request = request(CellRequest {
            session: self.session.id().clone(),
            x,
            y,
        });
        log::debug!("{} at ({}, {})", request.event(), x, y);
        self.push(request)
    }

    fn push(&self, request: Request) -> PushFuture {
        match request.payload() {
            Ok(payload) => self.channel.push(request.event(), payload),
            Err(err) => future::ready(Err(err.into())).boxed_local(),
        }
    }
}

fn decode<T: DeserializeOwned>(event: Event, response: Value) -> Result<T> {
    serde_json::from_value(response).map_err(|source| ClientError::Decode {
        event: event.as_str(),
        source,
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::ChannelError;
    use core::cell::RefCell;
    use futures_channel::oneshot;
    use std::collections::VecDeque;

    type Responder = oneshot::Sender<core::result::Result<Value, ChannelError>>;

    /// Records every push; the test answers them one at a time, oldest first.
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedChannel {
        sent: RefCell<Vec<(Event, Value)>>,
        waiting: RefCell<VecDeque<Responder>>,
    }

    impl ScriptedChannel {
        pub(crate) fn events(&self) -> Vec<Event> {
            self.sent.borrow().iter().map(|(event, _)| *event).collect()
        }

        pub(crate) fn payload(&self, index: usize) -> Value {
            self.sent.borrow()[index].1.clone()
        }

        pub(crate) fn waiting(&self) -> usize {
            self.waiting.borrow().len()
        }

        pub(crate) fn answer(&self, result: core::result::Result<Value, ChannelError>) {
            let responder = self
                .waiting
                .borrow_mut()
                .pop_front()
                .expect("no request waiting for an answer");
            responder.send(result).expect("request was dropped");
        }

        pub(crate) fn answer_ok(&self, response: Value) {
            self.answer(Ok(response));
        }
    }

    impl Channel for ScriptedChannel {
        fn push(&self, event: Event, payload: Value) -> PushFuture {
            self.sent.borrow_mut().push((event, payload));
            let (tx, rx) = oneshot::channel();
            self.waiting.borrow_mut().push_back(tx);
            async move { rx.await.unwrap_or(Err(ChannelError::Closed)) }.boxed_local()
        }
    }

    pub(crate) fn client() -> GameSessionClient<ScriptedChannel> {
        GameSessionClient::new(
            ScriptedChannel::default(),
            Session::new(SessionId::new("test-session")),
        )
    }
}
