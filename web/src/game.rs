use crate::audio::WebAudio;
use crate::confetti::Painter;
use crate::utils::*;
use clap::Args;
use gloo::events::EventListener;
use gloo::render::{AnimationFrame, request_animation_frame};
use noughts_core::{
    BurstAnchors, CELL_COUNT, Cell, CellIndex, ConfettiField, Direction, GameState, PlayEngine,
    Point, Session,
};
use std::time::Duration;
use web_sys::{Element, HtmlCanvasElement, HtmlElement};
use web_time::Instant;
use yew::prelude::*;

/// Length of one animation step at 60 Hz, in milliseconds.
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Longest step taken after a stall, in frames.
const MAX_FRAME_STEP: f64 = 4.0;

fn frame_delta(last: Option<f64>, now: f64) -> f32 {
    match last {
        None => 1.0,
        Some(last) => ((now - last) / FRAME_MS).clamp(0.0, MAX_FRAME_STEP) as f32,
    }
}

fn status_message(engine: &PlayEngine) -> String {
    match engine.state() {
        GameState::InProgress => format!("Player {}'s turn", engine.current_player()),
        GameState::Won(player) => format!("Player {} wins!", player),
        GameState::Tied => "Tie game".to_string(),
    }
}

const fn mute_label(muted: bool) -> &'static str {
    if muted {
        "🔇 Sound Off"
    } else {
        "🔊 Sound On"
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum KeyAction {
    Activate,
    Navigate(Direction),
}

fn key_action(key: &str) -> Option<KeyAction> {
    use Direction::*;
    use KeyAction::*;

    Some(match key {
        "Enter" | " " => Activate,
        "ArrowLeft" => Navigate(Left),
        "ArrowRight" => Navigate(Right),
        "ArrowUp" => Navigate(Up),
        "ArrowDown" => Navigate(Down),
        _ => return None,
    })
}

/// Burst origins taken from the rendered board.
struct DomAnchors<'a> {
    board: &'a NodeRef,
    cells: &'a [NodeRef],
}

impl BurstAnchors for DomAnchors<'_> {
    fn board_center(&self) -> Option<Point> {
        self.board
            .cast::<Element>()
            .map(|element| element_center(&element))
    }

    fn cell_center(&self, index: CellIndex) -> Option<Point> {
        self.cells
            .get(usize::from(index))?
            .cast::<Element>()
            .map(|element| element_center(&element))
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum CellMsg {
    Activate(CellIndex),
    Focus(CellIndex),
    Navigate(Direction),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    CellEvent(CellMsg),
    ResetAll,
    RestartRound,
    ToggleMute,
    Gesture,
    Resize,
    Frame(f64),
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    index: CellIndex,
    cell: Cell,
    #[prop_or_default]
    winning: bool,
    #[prop_or_default]
    locked: bool,
    node_ref: NodeRef,
    callback: Callback<CellMsg>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    let CellProps {
        index,
        cell,
        winning,
        locked,
        node_ref,
        callback,
    } = props.clone();

    let mut class = classes!("cell");
    if let Some(player) = cell.owner() {
        class.push(classes!("filled", player.symbol().to_lowercase()));
    }
    if winning {
        class.push("win");
    }

    let onclick = {
        let callback = callback.clone();
        Callback::from(move |_: MouseEvent| {
            log::trace!("cell {} click", index);
            callback.emit(CellMsg::Activate(index));
        })
    };

    let onfocus = {
        let callback = callback.clone();
        Callback::from(move |_: FocusEvent| callback.emit(CellMsg::Focus(index)))
    };

    let onkeydown = Callback::from(move |e: KeyboardEvent| match key_action(&e.key()) {
        Some(KeyAction::Activate) => {
            e.prevent_default();
            callback.emit(CellMsg::Activate(index));
        }
        Some(KeyAction::Navigate(direction)) => {
            e.prevent_default();
            callback.emit(CellMsg::Navigate(direction));
        }
        None => {}
    });

    html! {
        <button
            ref={node_ref}
            type="button"
            {class}
            aria-label={format!("Cell {}", index.get() + 1)}
            data-index={index.to_string()}
            data-symbol={cell.owner().map(|player| player.symbol())}
            disabled={locked}
            {onclick}
            {onfocus}
            {onkeydown}
        >
            {cell.owner().map_or("", |player| player.symbol())}
        </button>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a confetti seed instead of random
    #[arg(short, long)]
    pub(crate) seed: Option<String>,

    /// Start with sound off
    #[arg(long)]
    pub(crate) muted: bool,
}

impl GameProps {
    fn confetti_seed(&self) -> u64 {
        self.seed
            .as_deref()
            .and_then(|seed| {
                seed.parse()
                    .map_err(|err| log::warn!("ignoring seed {:?}: {}", seed, err))
                    .ok()
            })
            .unwrap_or_else(js_random_seed)
    }
}

pub(crate) struct GameView {
    session: Session,
    audio: WebAudio,
    started_at: Instant,
    focused: CellIndex,
    board_ref: NodeRef,
    cell_refs: [NodeRef; CELL_COUNT as usize],
    canvas_ref: NodeRef,
    painter: Option<Painter>,
    last_frame: Option<f64>,
    frame: Option<AnimationFrame>,
    _resize_listener: EventListener,
    _gesture_listener: EventListener,
}

impl GameView {
    fn now(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Keeps exactly one animation frame requested for as long as the view lives.
    fn ensure_frame(&mut self, ctx: &Context<Self>) {
        if self.frame.is_some() {
            return;
        }
        let link = ctx.link().clone();
        self.frame = Some(request_animation_frame(move |timestamp| {
            link.send_message(Msg::Frame(timestamp))
        }));
    }

    fn pump_tones(&mut self) {
        let now = self.now();
        self.session.pump_tones(now, &mut self.audio);
    }

    fn activate(&mut self, index: CellIndex) -> bool {
        self.audio.unlock_from_gesture();
        let now = self.now();
        let anchors = DomAnchors {
            board: &self.board_ref,
            cells: &self.cell_refs,
        };
        let outcome = self.session.activate(index.into(), now, &anchors);
        self.pump_tones();
        outcome.has_update()
    }

    fn focus(&mut self, index: CellIndex) {
        self.focused = index;
        if let Some(element) = self.cell_refs[usize::from(index)].cast::<HtmlElement>()
            && let Err(err) = element.focus()
        {
            log::trace!("could not focus cell {}: {:?}", index, err);
        }
    }

    fn fit_canvas(&mut self) {
        if let Some(painter) = &mut self.painter {
            let (width, height) = painter.fit_to_viewport();
            self.session.confetti_mut().resize(width, height);
            painter.paint(self.session.confetti().particles());
        }
    }

    fn on_frame(&mut self, timestamp: f64) {
        self.frame = None;
        let dt = frame_delta(self.last_frame.replace(timestamp), timestamp);
        self.session.frame(dt);
        if let Some(painter) = &mut self.painter {
            painter.paint(self.session.confetti().particles());
        }
        self.pump_tones();
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        use gloo::utils::window;

        let props = ctx.props();
        let seed = props.confetti_seed();
        log::debug!("confetti seed: {}", seed);

        let (width, height) = viewport_size();
        let mut session = Session::new(ConfettiField::new(seed, width, height));
        session.set_muted(props.muted);

        let resize_listener = {
            let link = ctx.link().clone();
            EventListener::new(&window(), "resize", move |_| link.send_message(Msg::Resize))
        };
        let gesture_listener = {
            let link = ctx.link().clone();
            EventListener::once(&window(), "pointerdown", move |_| {
                link.send_message(Msg::Gesture)
            })
        };

        Self {
            session,
            audio: WebAudio::default(),
            started_at: Instant::now(),
            focused: CellIndex::default(),
            board_ref: NodeRef::default(),
            cell_refs: Default::default(),
            canvas_ref: NodeRef::default(),
            painter: None,
            last_frame: None,
            frame: None,
            _resize_listener: resize_listener,
            _gesture_listener: gesture_listener,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use CellMsg::*;
        use Msg::*;

        let updated = match msg {
            CellEvent(Activate(index)) => {
                log::debug!("activate cell {}", index);
                self.activate(index)
            }
            CellEvent(Focus(index)) => {
                self.focused = index;
                false
            }
            CellEvent(Navigate(direction)) => {
                self.focus(self.focused.step(direction));
                false
            }
            ResetAll => {
                log::debug!("reset scores and board");
                self.session.reset_all();
                true
            }
            RestartRound => {
                log::debug!("restart round");
                self.session.restart_round();
                true
            }
            ToggleMute => {
                self.audio.unlock_from_gesture();
                self.session.set_muted(!self.session.is_muted());
                true
            }
            Gesture => {
                self.audio.unlock_from_gesture();
                false
            }
            Resize => {
                self.fit_canvas();
                false
            }
            Frame(timestamp) => {
                self.on_frame(timestamp);
                false
            }
        };

        self.ensure_frame(ctx);
        updated
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            self.painter = self
                .canvas_ref
                .cast::<HtmlCanvasElement>()
                .and_then(Painter::new);
            if self.painter.is_none() {
                log::warn!("confetti canvas unavailable, celebrations will not be drawn");
            }
            self.fit_canvas();
        }
        self.ensure_frame(ctx);
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let engine = self.session.engine();
        let scores = engine.scores();
        let locked = !engine.is_running();
        let winning_lines = engine.winning_lines();
        let muted = self.session.is_muted();

        let cb_reset = ctx.link().callback(|_: MouseEvent| ResetAll);
        let cb_restart = ctx.link().callback(|_: MouseEvent| RestartRound);
        let cb_mute = ctx.link().callback(|_: MouseEvent| ToggleMute);

        html! {
            <div class="noughts">
                <canvas ref={self.canvas_ref.clone()} class="confetti" aria-hidden="true"/>
                <header class={classes!("status-bar", engine.is_running().then_some("status-active"))}>
                    <p class="status" role="status" aria-live="polite">{status_message(engine)}</p>
                    <dl class="scores">
                        <dt>{"X"}</dt><dd class="score-x">{scores.x}</dd>
                        <dt>{"O"}</dt><dd class="score-o">{scores.o}</dd>
                    </dl>
                </header>
                <div ref={self.board_ref.clone()} class="board" role="grid" aria-label="Tic-tac-toe board">
                    {
                        for CellIndex::all().map(|index| {
                            let cell = engine.cell_at(index);
                            let winning = winning_lines.iter().flatten().any(|&i| i == index);
                            let node_ref = self.cell_refs[usize::from(index)].clone();
                            let callback = ctx.link().callback(Msg::CellEvent);
                            html! {
                                <CellView {index} {cell} {winning} {locked} {node_ref} {callback}/>
                            }
                        })
                    }
                </div>
                <nav class="controls">
                    <button type="button" onclick={cb_reset}>{"Reset"}</button>
                    <button type="button" onclick={cb_restart}>{"Restart"}</button>
                    <button type="button" aria-pressed={muted.to_string()} onclick={cb_mute}>
                        {mute_label(muted)}
                    </button>
                </nav>
            </div>
        }
    }
}
