use crate::utils::*;
use clap::Args;
use gloo::timers::callback::Timeout;
use memory_battle_core as game;
use game::HasUpdate;
use yew::prelude::*;

/// Card faces, indexed by symbol id. Large enough for the biggest board.
const GLYPHS: [&str; 32] = [
    "🍎", "🚀", "💎", "👾", "🎲", "🌵", "🐙", "🍄", "🎸", "🦊", "🌙", "⚡", "🍩", "🐢", "🎈", "🔔",
    "🍉", "🐝", "🌻", "🧩", "🦉", "🍒", "🚲", "🐳", "🎩", "🌈", "🍋", "🦀", "🪐", "🎯", "🐧", "🔥",
];

const HIDDEN_FACE: &str = "?";

fn glyph(symbol: game::Symbol) -> &'static str {
    GLYPHS
        .get(usize::from(symbol.id()))
        .copied()
        .unwrap_or("❔")
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewCardState {
    Hidden,
    Revealed(game::Symbol),
    Matched(game::Symbol),
}

impl ViewCardState {
    fn from_engine(engine: &game::MatchEngine, index: game::CardIndex) -> Self {
        use game::CardState::*;
        match (engine.card_at(index), engine.symbol_at(index)) {
            (Some(Revealed), Some(symbol)) => Self::Revealed(symbol),
            (Some(Matched), Some(symbol)) => Self::Matched(symbol),
            _ => Self::Hidden,
        }
    }

    fn face(self) -> &'static str {
        match self {
            Self::Hidden => HIDDEN_FACE,
            Self::Revealed(symbol) | Self::Matched(symbol) => glyph(symbol),
        }
    }
}

fn score_label(scores: game::Scores, player: game::Player) -> String {
    format!("P{}: {}", player.number(), scores[player])
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Select(game::CardIndex),
    Resolve(game::ResolveTicket),
    NewGame,
}

#[derive(Properties, Clone, PartialEq)]
struct CardProps {
    index: game::CardIndex,
    card_state: ViewCardState,
    #[prop_or_default]
    locked: bool,
    callback: Callback<game::CardIndex>,
}

#[function_component(CardView)]
fn card_component(props: &CardProps) -> Html {
    use ViewCardState::*;

    let CardProps {
        index,
        card_state,
        locked,
        callback,
    } = props.clone();

    let class = classes!(
        "card",
        match card_state {
            Hidden => classes!(),
            Revealed(_) => classes!("open"),
            Matched(_) => classes!("open", "matched"),
        },
        locked.then_some("locked")
    );

    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("card {} clicked", index);
        callback.emit(index);
    });

    html! {
        <td {class} {onclick}>{card_state.face()}</td>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Milliseconds both cards stay visible before they are compared
    #[arg(long)]
    pub reveal_delay: Option<u32>,

    #[arg(long)]
    pub columns: Option<game::Coord>,

    #[arg(long)]
    pub rows: Option<game::Coord>,
}

impl GameProps {
    pub fn game_config(&self) -> game::GameConfig {
        let default = game::GameConfig::default();
        game::GameConfig::new(
            (
                self.columns.unwrap_or(default.size.0),
                self.rows.unwrap_or(default.size.1),
            ),
            self.reveal_delay.unwrap_or(default.reveal_delay_ms),
        )
    }
}

#[derive(Debug)]
pub(crate) struct GameView {
    engine: game::MatchEngine,
    resolve_timeout: Option<Timeout>,
}

impl GameView {
    /// Feeds an action to the engine and carries out the effects it asks for.
    fn dispatch(&mut self, ctx: &Context<Self>, action: game::Action) -> bool {
        use game::Effect::*;

        let effects = self.engine.apply(action);
        for &effect in &effects {
            match effect {
                Redraw => {}
                ScheduleResolve { ticket, delay_ms } => {
                    let link = ctx.link().clone();
                    self.resolve_timeout = Some(Timeout::new(delay_ms, move || {
                        link.send_message(Msg::Resolve(ticket))
                    }));
                }
                Finished(result) => log::info!("game over: {}", result),
            }
        }
        effects.has_update()
    }

    fn game_over_dialog(&self, ctx: &Context<Self>) -> Html {
        let Some(result) = self.engine.result() else {
            return html! {};
        };
        let cb_new_game = ctx.link().callback(|_: MouseEvent| Msg::NewGame);

        html! {
            <Modal>
                <dialog id="game-over" open={true}>
                    <article>
                        <h2>{"Game Over"}</h2>
                        <p>{result.to_string()}</p>
                        <footer>
                            <button onclick={cb_new_game}>{"New Game"}</button>
                        </footer>
                    </article>
                </dialog>
            </Modal>
        }
    }

    fn scoreboard(&self, ctx: &Context<Self>) -> Html {
        let scores = self.engine.scores();
        let current = self.engine.current_player();
        let cb_reset = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            Msg::NewGame
        });

        html! {
            <aside>
                {
                    for game::Player::ALL.into_iter().map(|player| html! {
                        <h2 class={classes!("score", (player == current).then_some("active"))}>
                            {score_label(scores, player)}
                        </h2>
                    })
                }
                <button class="reset" onclick={cb_reset}>{"RESET GAME"}</button>
                <p class="turn">{"Current Turn:"}<br/>{current.to_string()}</p>
            </aside>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let seed = props.seed.unwrap_or_else(js_random_seed);
        log::debug!("seed: {}", seed);

        Self {
            engine: game::MatchEngine::from_config(props.game_config(), seed),
            resolve_timeout: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Select(index) => {
                log::debug!("select card: {}", index);
                self.dispatch(ctx, game::Action::Select(index))
            }
            Resolve(ticket) => {
                self.resolve_timeout = None;
                self.dispatch(ctx, game::Action::Resolve(ticket))
            }
            NewGame => {
                // dropping the timeout cancels it
                self.resolve_timeout.take();
                let seed = js_random_seed();
                log::debug!("new game, seed: {}", seed);
                self.dispatch(ctx, game::Action::Reset { seed })
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let (cols, rows) = self.engine.size();
        let playable = self.engine.state().accepts_selection();

        html! {
            <div class="memory-battle">
                <table class={playable.then_some("playable")}>
                    {
                        for (0..rows).map(|y| html! {
                            <tr>
                                {
                                    for (0..cols).map(|x| {
                                        let index = usize::from(y) * usize::from(cols) + usize::from(x);
                                        let card_state = ViewCardState::from_engine(&self.engine, index);
                                        let locked = !self.engine.can_select(index);
                                        let callback = ctx.link().callback(Msg::Select);
                                        html! {
                                            <CardView {index} {card_state} {locked} {callback}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                {self.scoreboard(ctx)}
                {self.game_over_dialog(ctx)}
            </div>
        }
    }
}
