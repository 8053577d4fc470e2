use crate::counter::Counter;
use crate::new_game::NewGameChooser;
use crate::socket::{self, SocketChannel};
use bitflags::bitflags;
use core::time::Duration;
use futures_util::FutureExt;
use gloo::timers::callback::Interval;
use sapper_core::{
    ClientConfig, ClientError, ConnectionEvent, ConnectionStatus, GameModel, GameSessionClient,
    Scheduler, Session, Update, UpdateFuture,
};
use sapper_protocol::{CellView, Coord, Coord2, GameSize};
use yew::html::Scope;
use yew::prelude::*;

/// Ticks the game's clock through the component's message queue.
pub(crate) struct TickScheduler(Scope<GameView>);

impl Scheduler for TickScheduler {
    type Handle = Interval;

    fn every(&self, period: Duration) -> Interval {
        let link = self.0.clone();
        let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
        Interval::new(millis, move || link.send_message(Msg::Tick))
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

const CHORD: MouseButtons = MouseButtons::LEFT.union(MouseButtons::RIGHT);

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct CellPointerState {
    pos: Coord2,
    buttons: MouseButtons,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum CellMsg {
    Update(CellPointerState),
    Leave,
}

#[derive(Debug)]
pub(crate) enum Msg {
    NewGame(GameSize),
    Restart,
    FacePressed,
    GridPressed,
    Released,
    GridClicked,
    CellEvent(CellMsg),
    Tick,
    Updated(sapper_core::Result<Update>),
    Connection(ConnectionEvent),
}

/// Which request a finished pointer gesture on `cell` turns into, if any.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Gesture {
    Pick,
    ForcePick,
    Flag,
}

fn gesture_for(buttons: MouseButtons, cell: &CellView) -> Option<Gesture> {
    match buttons {
        b if b == CHORD && cell.is_numbered() => Some(Gesture::ForcePick),
        MouseButtons::LEFT if cell.is_numbered() => Some(Gesture::ForcePick),
        MouseButtons::LEFT if cell.is_covered() && !cell.is_flagged() => Some(Gesture::Pick),
        MouseButtons::RIGHT => Some(Gesture::Flag),
        _ => None,
    }
}

/// Pointer state after `msg`, and the press it completed, if any.
///
/// A press completes when every button is lifted over the cell it started on,
/// or when one button of a left+right chord is lifted.
fn track_pointer(
    pressed: Option<CellPointerState>,
    msg: CellMsg,
) -> (Option<CellPointerState>, Option<CellPointerState>) {
    match msg {
        CellMsg::Leave => (None, None),
        CellMsg::Update(state) if state.buttons.is_empty() => match pressed {
            Some(pressed) if pressed.pos == state.pos => (None, Some(pressed)),
            _ => (None, None),
        },
        CellMsg::Update(state) => match pressed {
            Some(pressed)
                if pressed.pos == state.pos
                    && pressed.buttons == CHORD
                    && state.buttons != CHORD =>
            {
                (None, Some(pressed))
            }
            _ => (Some(state), None),
        },
    }
}

fn cell_classes(cell: &CellView) -> Classes {
    use CellView::*;

    classes!(
        "cell",
        match cell {
            Covered => classes!(),
            Flagged => classes!("flag"),
            Question => classes!("question"),
            Revealed(count) => classes!("open", format!("num-{}", count)),
            Mine => classes!("open", "mine"),
            Exploded => classes!("open", "mine", "oops"),
            Misflagged => classes!("flag", "wrong"),
            Other(name) => name
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
                .into(),
        }
    )
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    x: Coord,
    y: Coord,
    cell: CellView,
    callback: Callback<CellMsg>,
}

#[function_component(CellTile)]
fn cell_component(props: &CellProps) -> Html {
    let CellProps {
        x,
        y,
        ref cell,
        ref callback,
    } = *props;
    let class = cell_classes(cell);

    let pointer = |name: &'static str| {
        let callback = callback.clone();
        Callback::from(move |e: MouseEvent| {
            let buttons = MouseButtons::from_bits_truncate(e.buttons());
            callback.emit(CellMsg::Update(CellPointerState {
                pos: (x, y),
                buttons,
            }));
            log::trace!("({}, {}) mouse {} ({:?})", x, y, name, buttons);
        })
    };
    let onmousedown = pointer("down");
    let onmouseup = pointer("up");

    let onmouseleave = {
        let callback = callback.clone();
        Callback::from(move |_: MouseEvent| {
            callback.emit(CellMsg::Leave);
            log::trace!("({}, {}) mouse leave", x, y);
        })
    };

    html! {
        <td {class} {onmousedown} {onmouseup} {onmouseleave}/>
    }
}

#[derive(Properties, Clone, Debug, PartialEq)]
pub(crate) struct GameProps {
    pub config: ClientConfig,
}

pub(crate) struct GameView {
    client: GameSessionClient<SocketChannel>,
    model: GameModel<TickScheduler>,
    current_cell_state: Option<CellPointerState>,
}

impl GameView {
    fn send(ctx: &Context<Self>, request: UpdateFuture) {
        ctx.link().send_future(request.map(Msg::Updated));
    }

    /// Turns a finished gesture into a request against the current board.
    fn release_cell(&mut self, ctx: &Context<Self>, pointer: CellPointerState) -> bool {
        let CellPointerState { pos, buttons } = pointer;
        let Some(cell) = self.model.board().and_then(|board| board.cell_at(pos)) else {
            return false;
        };
        let Some(gesture) = gesture_for(buttons, cell) else {
            log::trace!("nothing to do for {:?} on {:?}", buttons, cell);
            return false;
        };

        log::debug!("{:?} at {:?}", gesture, pos);
        let request = match gesture {
            Gesture::Pick => self.model.pick(&self.client, pos),
            Gesture::ForcePick => self.model.force_pick(&self.client, pos),
            Gesture::Flag => self.model.flag(&self.client, pos),
        };
        match request {
            Ok(request) => Self::send(ctx, request),
            Err(err) => log::debug!("not sent: {}", err),
        }
        false
    }

    fn cell_event(&mut self, ctx: &Context<Self>, msg: CellMsg) -> bool {
        let (tracked, released) = track_pointer(self.current_cell_state.take(), msg);
        self.current_cell_state = tracked;
        released.is_some_and(|pressed| self.release_cell(ctx, pressed))
    }

    fn view_field(&self, ctx: &Context<Self>) -> Html {
        let Some(board) = self.model.board() else {
            let on_choose = ctx.link().callback(Msg::NewGame);
            return html! { <NewGameChooser {on_choose}/> };
        };

        let (cols, rows) = board.size();
        let onmousedown = ctx.link().callback(|_: MouseEvent| Msg::GridPressed);
        let onclick = ctx.link().callback(|_: MouseEvent| Msg::GridClicked);
        html! {
            <table class="field" {onmousedown} {onclick}>
                {
                    for (0..rows).map(|y| html! {
                        <tr>
                            {
                                for (0..cols).map(|x| {
                                    let cell = board.cell_at((x, y)).cloned().unwrap_or_default();
                                    let callback = ctx.link().callback(Msg::CellEvent);
                                    html! { <CellTile {x} {y} {cell} {callback}/> }
                                })
                            }
                        </tr>
                    })
                }
            </table>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let config = &ctx.props().config;
        let channel = socket::connect(config, ctx.link().callback(Msg::Connection));

        Self {
            client: GameSessionClient::new(channel, Session::now()),
            model: GameModel::new(config.default_size, TickScheduler(ctx.link().clone())),
            current_cell_state: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            NewGame(size) => {
                log::debug!("new {} game", size);
                let request = self.model.new_game(&self.client, size);
                Self::send(ctx, request);
                true
            }
            Restart => {
                let request = self.model.restart(&self.client);
                Self::send(ctx, request);
                self.model.release()
            }
            FacePressed => self.model.press_face(),
            GridPressed => self.model.press_grid(),
            Released => self.model.release(),
            GridClicked => self.model.click_grid(),
            CellEvent(msg) => self.cell_event(ctx, msg),
            Tick => self.model.tick(),
            Updated(result) => {
                if let Err(ClientError::Decode { event, .. }) = &result {
                    log::error!("unexpected {} reply", event);
                }
                self.model.apply(result)
            }
            Connection(event) => self.model.connection_changed(&event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let onmousedown = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            Msg::FacePressed
        });
        let onclick = ctx.link().callback(|_: MouseEvent| Msg::Restart);
        let onmouseup = ctx.link().callback(|_: MouseEvent| Msg::Released);

        html! {
            <div class="minesweeper" {onmouseup} oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                <h1>{"Minesweeper"}</h1>
                if self.model.connection() == ConnectionStatus::Disconnected {
                    <div class="disconnected">{"disconnected"}</div>
                }
                <div class="statusRow">
                    <Counter value={self.model.mines_left()}/>
                    <div class={self.model.face().class()} {onmousedown} {onclick}/>
                    <Counter value={i32::from(self.model.elapsed())}/>
                </div>
                { self.view_field(ctx) }
                if let Some(error) = self.model.last_error() {
                    <div class="error">{error}</div>
                }
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_states_map_to_classes() {
        assert_eq!(cell_classes(&CellView::Covered), classes!("cell"));
        assert_eq!(cell_classes(&CellView::Flagged), classes!("cell", "flag"));
        assert_eq!(cell_classes(&CellView::Question), classes!("cell", "question"));
        assert_eq!(
            cell_classes(&CellView::Revealed(3)),
            classes!("cell", "open", "num-3")
        );
        assert_eq!(cell_classes(&CellView::Mine), classes!("cell", "open", "mine"));
        assert_eq!(
            cell_classes(&CellView::Exploded),
            classes!("cell", "open", "mine", "oops")
        );
        assert_eq!(
            cell_classes(&CellView::Misflagged),
            classes!("cell", "flag", "wrong")
        );
    }

    #[test]
    fn unknown_states_pass_through_as_classes() {
        assert_eq!(
            cell_classes(&CellView::Other("lava hot".to_string())),
            classes!("cell", "lava", "hot")
        );
    }

    fn at(pos: Coord2, buttons: MouseButtons) -> CellMsg {
        CellMsg::Update(CellPointerState { pos, buttons })
    }

    fn replay(msgs: &[CellMsg]) -> Vec<CellPointerState> {
        let mut tracked = None;
        let mut released = Vec::new();
        for &msg in msgs {
            let (next, done) = track_pointer(tracked, msg);
            tracked = next;
            released.extend(done);
        }
        released
    }

    #[test]
    fn single_button_release_completes_the_press() {
        let none = MouseButtons::empty();
        for button in [MouseButtons::LEFT, MouseButtons::RIGHT] {
            assert_eq!(
                replay(&[at((1, 2), button), at((1, 2), none)]),
                [CellPointerState {
                    pos: (1, 2),
                    buttons: button
                }]
            );
        }
    }

    #[test]
    fn lifting_one_chord_button_completes_the_chord() {
        let released = replay(&[
            at((3, 3), MouseButtons::LEFT),
            at((3, 3), CHORD),
            at((3, 3), MouseButtons::RIGHT),
            at((3, 3), MouseButtons::empty()),
        ]);
        assert_eq!(
            released,
            [CellPointerState {
                pos: (3, 3),
                buttons: CHORD
            }]
        );
    }

    #[test]
    fn leaving_the_cell_abandons_the_press() {
        let none = MouseButtons::empty();
        let left = at((0, 0), MouseButtons::LEFT);
        assert!(replay(&[left, CellMsg::Leave, at((0, 0), none)]).is_empty());
        assert!(replay(&[left, at((1, 0), none)]).is_empty());
        assert!(replay(&[at((0, 0), none)]).is_empty());
    }

    #[test]
    fn releases_pick_the_right_request() {
        let covered = CellView::Covered;
        let numbered = CellView::Revealed(2);

        assert_eq!(gesture_for(MouseButtons::LEFT, &covered), Some(Gesture::Pick));
        assert_eq!(
            gesture_for(MouseButtons::LEFT, &numbered),
            Some(Gesture::ForcePick)
        );
        assert_eq!(gesture_for(CHORD, &numbered), Some(Gesture::ForcePick));
        assert_eq!(gesture_for(MouseButtons::RIGHT, &covered), Some(Gesture::Flag));
        assert_eq!(
            gesture_for(MouseButtons::RIGHT, &CellView::Flagged),
            Some(Gesture::Flag)
        );
        assert_eq!(gesture_for(MouseButtons::LEFT, &CellView::Flagged), None);
        assert_eq!(gesture_for(MouseButtons::MIDDLE, &covered), None);
        assert_eq!(gesture_for(CHORD, &covered), None);
    }
}
