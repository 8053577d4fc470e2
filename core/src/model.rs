use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use sapper_protocol::{Board, Coord2, GameSize, MoveReply};
use serde_json::{Map, Value};

use crate::*;

/// Status face shown above the board.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Face {
    #[default]
    Neutral,
    NeutralPressed,
    Shocked,
}

impl Face {
    pub const fn class(self) -> &'static str {
        use Face::*;
        match self {
            Neutral => "smiley-neutral",
            NeutralPressed => "smiley-neutral-pressed",
            Shocked => "smiley-shocked",
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Disconnected,
}

/// Successful outcome of one request, ready to be applied to the model.
#[derive(Clone, Debug, PartialEq)]
pub enum Update {
    Started(GameSize, Board),
    Flagged(Board),
    Picked(MoveReply),
}

pub type UpdateFuture = LocalBoxFuture<'static, Result<Update>>;

/// Everything the game screen shows: the board (once a game exists), the chosen
/// size, the face, the elapsed-time counter and the connection state.
///
/// Requests are handed back as futures; their results come back through
/// [`GameModel::apply`] in whatever order they resolve.
#[derive(Debug)]
pub struct GameModel<S: Scheduler> {
    board: Option<Board>,
    size: GameSize,
    /// Size the displayed board was started with; `size` may already be ahead of it.
    board_size: GameSize,
    face: Face,
    connection: ConnectionStatus,
    last_error: Option<String>,
    last_move: Map<String, Value>,
    timer: TimerControl<S>,
}

impl<S: Scheduler> GameModel<S> {
    pub fn new(size: GameSize, scheduler: S) -> Self {
        Self {
            board: None,
            size,
            board_size: size,
            face: Face::default(),
            connection: ConnectionStatus::default(),
            last_error: None,
            last_move: Map::new(),
            timer: TimerControl::new(scheduler),
        }
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.board.is_some()
    }

    pub fn size(&self) -> GameSize {
        self.size
    }

    pub fn face(&self) -> Face {
        self.face
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.connection
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Fields of the last pick reply besides the board, untouched.
    pub fn last_move(&self) -> &Map<String, Value> {
        &self.last_move
    }

    pub fn timer(&self) -> &TimerControl<S> {
        &self.timer
    }

    pub fn elapsed(&self) -> u16 {
        self.timer.value()
    }

    pub fn mines_left(&self) -> i32 {
        let flagged = self.board.as_ref().map_or(0, Board::flagged_count);
        i32::from(self.board_size.mine_count()) - i32::try_from(flagged).unwrap_or(i32::MAX)
    }

    /// Remembers `size` right away, whether or not the request succeeds.
    pub fn new_game<C: Channel + 'static>(
        &mut self,
        client: &GameSessionClient<C>,
        size: GameSize,
    ) -> UpdateFuture {
        self.size = size;
        client
            .new_game(size)
            .map(move |result| result.map(|board| Update::Started(size, board)))
            .boxed_local()
    }

    pub fn restart<C: Channel + 'static>(&mut self, client: &GameSessionClient<C>) -> UpdateFuture {
        self.new_game(client, self.size)
    }

    pub fn flag<C: Channel + 'static>(
        &self,
        client: &GameSessionClient<C>,
        coords: Coord2,
    ) -> Result<UpdateFuture> {
        self.check_target(coords)?;
        Ok(client
            .flag(coords)
            .map(|result| result.map(Update::Flagged))
            .boxed_local())
    }

    pub fn pick<C: Channel + 'static>(
        &self,
        client: &GameSessionClient<C>,
        coords: Coord2,
    ) -> Result<UpdateFuture> {
        self.check_target(coords)?;
        Ok(client
            .pick(coords)
            .map(|result| result.map(Update::Picked))
            .boxed_local())
    }

    pub fn force_pick<C: Channel + 'static>(
        &self,
        client: &GameSessionClient<C>,
        coords: Coord2,
    ) -> Result<UpdateFuture> {
        self.check_target(coords)?;
        Ok(client
            .force_pick(coords)
            .map(|result| result.map(Update::Picked))
            .boxed_local())
    }

    fn check_target(&self, coords: Coord2) -> Result<()> {
        let board = self.board.as_ref().ok_or(ClientError::NoGame)?;
        if board.contains(coords) {
            Ok(())
        } else {
            Err(ClientError::OutOfBounds(coords))
        }
    }

    /// Applies a finished request. The board is always replaced as a whole.
    pub fn apply(&mut self, result: Result<Update>) -> bool {
        let update = match result {
            Ok(update) => update,
            Err(err) => {
                log::warn!("request failed: {}", err);
                self.last_error = Some(err.to_string());
                return true;
            }
        };

        self.last_error = None;
        match update {
            Update::Started(size, board) => {
                log::debug!("{} game started, {:?}", size, board.size());
                self.board_size = size;
                self.timer.reset(0);
                self.last_move.clear();
                self.board = Some(board);
            }
            Update::Flagged(board) => {
                self.board = Some(board);
            }
            Update::Picked(MoveReply { field, extra }) => {
                if !extra.is_empty() {
                    log::debug!("move reply: {:?}", extra);
                }
                self.board = Some(field);
                self.last_move = extra;
            }
        }
        true
    }

    pub fn press_grid(&mut self) -> bool {
        self.set_face(Face::Shocked)
    }

    pub fn press_face(&mut self) -> bool {
        self.set_face(Face::NeutralPressed)
    }

    pub fn release(&mut self) -> bool {
        self.set_face(Face::Neutral)
    }

    fn set_face(&mut self, face: Face) -> bool {
        let changed = self.face != face;
        self.face = face;
        changed
    }

    /// Any click on the board starts the clock; later clicks leave it alone.
    pub fn click_grid(&mut self) -> bool {
        self.is_playing() && self.timer.start()
    }

    pub fn tick(&mut self) -> bool {
        self.timer.tick()
    }

    pub fn connection_changed(&mut self, event: &ConnectionEvent) -> bool {
        event.log();
        let status = match event {
            ConnectionEvent::Opened => ConnectionStatus::Connecting,
            ConnectionEvent::Joined => ConnectionStatus::Connected,
            ConnectionEvent::JoinFailed(_) | ConnectionEvent::Error(_) | ConnectionEvent::Closed => {
                ConnectionStatus::Disconnected
            }
        };
        let changed = self.connection != status;
        self.connection = status;
        changed
    }
}
