use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::*;

/// Opaque key the engine scopes one game to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Player-intent events understood by the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    NewGame,
    Stop,
    Flag,
    Pick,
    ForcePick,
}

impl Event {
    pub const fn as_str(self) -> &'static str {
        use Event::*;
        match self {
            NewGame => "new_game",
            Stop => "stop",
            Flag => "flag",
            Pick => "pick",
            ForcePick => "force_pick",
        }
    }
}

impl core::fmt::Display for Event {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellRequest {
    pub session: SessionId,
    pub x: Coord,
    pub y: Coord,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Request {
    NewGame { session: SessionId, size: GameSize },
    Stop { session: SessionId },
    Flag(CellRequest),
    Pick(CellRequest),
    ForcePick(CellRequest),
}

impl Request {
    pub fn new_game(session: &SessionId, size: GameSize) -> Self {
        Self::NewGame {
            session: session.clone(),
            size,
        }
    }

    pub fn stop(session: &SessionId) -> Self {
        Self::Stop {
            session: session.clone(),
        }
    }

    pub const fn event(&self) -> Event {
        match self {
            Self::NewGame { .. } => Event::NewGame,
            Self::Stop { .. } => Event::Stop,
            Self::Flag(_) => Event::Flag,
            Self::Pick(_) => Event::Pick,
            Self::ForcePick(_) => Event::ForcePick,
        }
    }

    pub fn payload(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Reply to `new_game` and `flag`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldReply {
    pub field: Board,
}

/// Reply to `pick` and `force_pick`; anything besides the board is passed through untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveReply {
    pub field: Board,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_payloads_match_event_catalog() {
        let session = SessionId::new("2016-01-01T00:00:00.000Z");

        let new_game = Request::new_game(&session, GameSize::Small);
        assert_eq!(new_game.event().as_str(), "new_game");
        assert_eq!(
            new_game.payload().unwrap(),
            json!({"session": "2016-01-01T00:00:00.000Z", "size": "small"})
        );

        assert_eq!(
            Request::stop(&session).payload().unwrap(),
            json!({"session": "2016-01-01T00:00:00.000Z"})
        );

        let force = Request::ForcePick(CellRequest {
            session: session.clone(),
            x: 4,
            y: 7,
        });
        assert_eq!(force.event().as_str(), "force_pick");
        assert_eq!(
            force.payload().unwrap(),
            json!({"session": "2016-01-01T00:00:00.000Z", "x": 4, "y": 7})
        );
    }

    #[test]
    fn move_reply_keeps_unknown_fields() {
        let reply: MoveReply = serde_json::from_value(json!({
            "field": [["revealed-1"]],
            "status": "won",
            "time": 12,
        }))
        .unwrap();

        assert_eq!(reply.field.cell_at((0, 0)), Some(&CellView::Revealed(1)));
        assert_eq!(reply.extra.get("status"), Some(&json!("won")));
        assert_eq!(reply.extra.len(), 2);
    }
}
