use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Final standing once every pair has been collected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Winner(Player, Scores),
    Tie(Scores),
}

impl MatchResult {
    pub fn from_scores(scores: Scores) -> Self {
        match scores.leader() {
            Some(player) => Self::Winner(player, scores),
            None => Self::Tie(scores),
        }
    }

    pub const fn winner(self) -> Option<Player> {
        match self {
            Self::Winner(player, _) => Some(player),
            Self::Tie(_) => None,
        }
    }

    pub const fn scores(self) -> Scores {
        match self {
            Self::Winner(_, scores) | Self::Tie(scores) => scores,
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Winner(player, scores) => write!(
                f,
                "{} Wins! ({}-{})",
                player,
                scores[player],
                scores[player.other()]
            ),
            Self::Tie(scores) => write!(
                f,
                "It's a tie! ({}-{})",
                scores[Player::One],
                scores[Player::Two]
            ),
        }
    }
}

/// Valid transitions:
/// - Idle -> AwaitingSecond
/// - AwaitingSecond -> Resolving
/// - Resolving -> Idle
/// - Resolving -> Finished
/// - any -> Idle on reset
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Idle,
    AwaitingSecond,
    Resolving,
    Finished(MatchResult),
}

impl EngineState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Finished(_))
    }

    /// Whether a card selection can currently be accepted.
    pub const fn accepts_selection(self) -> bool {
        matches!(self, Self::Idle | Self::AwaitingSecond)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Ties a scheduled evaluation to the pair it was scheduled for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolveTicket(u32);

impl ResolveTicket {
    const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Work the embedding UI has to carry out after a transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Player-visible state changed.
    Redraw,
    /// Deliver `Action::Resolve(ticket)` once `delay_ms` have passed.
    ScheduleResolve {
        ticket: ResolveTicket,
        delay_ms: u32,
    },
    Finished(MatchResult),
}

/// Effects produced by a single transition, empty when nothing changed.
pub type Effects = SmallVec<[Effect; 3]>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Select(CardIndex),
    Resolve(ResolveTicket),
    Reset { seed: u64 },
}

pub trait HasUpdate {
    fn has_update(&self) -> bool;
}

impl HasUpdate for Effects {
    fn has_update(&self) -> bool {
        !self.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchEngine {
    layout: BoardLayout,
    cards: Array2<CardState>,
    pending: SmallVec<[CardIndex; 2]>,
    scores: Scores,
    current_player: Player,
    matched_pairs: CellCount,
    reveal_delay_ms: u32,
    ticket: ResolveTicket,
    result: Option<MatchResult>,
}

impl MatchEngine {
    pub fn new(layout: BoardLayout) -> Self {
        let size = layout.size();
        Self {
            layout,
            cards: Array2::default(size.to_nd_index()),
            pending: SmallVec::new(),
            scores: Scores::default(),
            current_player: Player::default(),
            matched_pairs: 0,
            reveal_delay_ms: DEFAULT_REVEAL_DELAY_MS,
            ticket: ResolveTicket::default(),
            result: None,
        }
    }

    pub fn with_reveal_delay(mut self, reveal_delay_ms: u32) -> Self {
        self.reveal_delay_ms = reveal_delay_ms;
        self
    }

    pub fn from_config(config: GameConfig, seed: u64) -> Self {
        let layout = RandomBoardGenerator::new(seed).generate(config);
        Self::new(layout).with_reveal_delay(config.reveal_delay_ms)
    }

    pub fn config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.reveal_delay_ms)
    }

    pub fn state(&self) -> EngineState {
        if let Some(result) = self.result {
            return EngineState::Finished(result);
        }
        match self.pending.len() {
            0 => EngineState::Idle,
            1 => EngineState::AwaitingSecond,
            _ => EngineState::Resolving,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn total_cells(&self) -> CellCount {
        self.layout.total_cells()
    }

    pub fn pair_count(&self) -> CellCount {
        self.layout.pair_count()
    }

    pub fn matched_pairs(&self) -> CellCount {
        self.matched_pairs
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Cards revealed this turn but not yet scored.
    pub fn pending(&self) -> &[CardIndex] {
        &self.pending
    }

    pub fn result(&self) -> Option<MatchResult> {
        self.result
    }

    pub fn reveal_delay_ms(&self) -> u32 {
        self.reveal_delay_ms
    }

    /// The ticket a `Resolve` action must carry to be accepted right now.
    pub fn awaited_ticket(&self) -> Option<ResolveTicket> {
        (self.pending.len() == 2).then_some(self.ticket)
    }

    pub fn card_at(&self, index: CardIndex) -> Option<CardState> {
        let coords = self.layout.validate_index(index).ok()?;
        Some(self.cards[coords.to_nd_index()])
    }

    /// The face of a card, only once it has been turned over.
    pub fn symbol_at(&self, index: CardIndex) -> Option<Symbol> {
        let coords = self.layout.validate_index(index).ok()?;
        self.cards[coords.to_nd_index()]
            .is_face_up()
            .then(|| self.layout[coords])
    }

    pub fn can_select(&self, index: CardIndex) -> bool {
        self.state().accepts_selection()
            && self.card_at(index).is_some_and(CardState::is_hidden)
    }

    pub fn apply(&mut self, action: Action) -> Effects {
        match action {
            Action::Select(index) => self.select_card(index),
            Action::Resolve(ticket) => self.resolve(ticket),
            Action::Reset { seed } => self.reset(seed),
        }
    }

    /// Pure form of [`MatchEngine::apply`], the receiver is left untouched.
    pub fn transition(&self, action: Action) -> (Self, Effects) {
        let mut next = self.clone();
        let effects = next.apply(action);
        (next, effects)
    }

    pub fn select_card(&mut self, index: CardIndex) -> Effects {
        let mut effects = Effects::new();

        if !self.state().accepts_selection() {
            log::trace!("select {} ignored in state {:?}", index, self.state());
            return effects;
        }

        let Ok(coords) = self.layout.validate_index(index) else {
            log::trace!("select {} ignored, out of range", index);
            return effects;
        };

        let card = &mut self.cards[coords.to_nd_index()];
        if !card.is_hidden() {
            log::trace!("select {} ignored, card is {:?}", index, card);
            return effects;
        }

        *card = CardState::Revealed;
        self.pending.push(index);
        effects.push(Effect::Redraw);
        log::debug!("{} revealed card {}", self.current_player, index);

        if self.pending.len() == 2 {
            self.ticket = self.ticket.next();
            effects.push(Effect::ScheduleResolve {
                ticket: self.ticket,
                delay_ms: self.reveal_delay_ms,
            });
        }

        effects
    }

    /// Resolves the pending pair only if `ticket` is the one currently awaited.
    pub fn resolve(&mut self, ticket: ResolveTicket) -> Effects {
        if self.awaited_ticket() != Some(ticket) {
            log::trace!("stale resolve {:?} ignored", ticket);
            return Effects::new();
        }
        self.resolve_pending()
    }

    pub fn resolve_pending(&mut self) -> Effects {
        let mut effects = Effects::new();

        let &[first, second] = self.pending.as_slice() else {
            return effects;
        };
        self.pending.clear();

        let first = self.coords_of(first);
        let second = self.coords_of(second);

        if self.layout[first] == self.layout[second] {
            self.cards[first.to_nd_index()] = CardState::Matched;
            self.cards[second.to_nd_index()] = CardState::Matched;
            self.scores[self.current_player] += 1;
            self.matched_pairs += 1;
            log::debug!(
                "{} matched {:?}, score {}",
                self.current_player,
                self.layout[first],
                self.scores[self.current_player]
            );
        } else {
            self.cards[first.to_nd_index()] = CardState::Hidden;
            self.cards[second.to_nd_index()] = CardState::Hidden;
            self.current_player = self.current_player.other();
            log::debug!("no match, {} to play", self.current_player);
        }
        effects.push(Effect::Redraw);

        if self.matched_pairs == self.layout.pair_count() {
            let result = MatchResult::from_scores(self.scores);
            self.result = Some(result);
            log::debug!("match finished: {}", result);
            effects.push(Effect::Finished(result));
        }

        effects
    }

    /// Starts a new round on a freshly shuffled board of the same size.
    pub fn reset(&mut self, seed: u64) -> Effects {
        let layout = RandomBoardGenerator::new(seed).generate(self.config());
        self.reset_with_layout(layout)
    }

    pub fn reset_with_layout(&mut self, layout: BoardLayout) -> Effects {
        let size = layout.size();
        self.layout = layout;
        self.cards = Array2::default(size.to_nd_index());
        self.pending.clear();
        self.scores = Scores::default();
        self.current_player = Player::default();
        self.matched_pairs = 0;
        self.result = None;
        // outstanding timers must not resolve cards of the new board
        self.ticket = self.ticket.next();
        log::debug!("new round on a {:?} board", size);

        let mut effects = Effects::new();
        effects.push(Effect::Redraw);
        effects
    }

    /// Only valid for indices already checked against the layout.
    fn coords_of(&self, index: CardIndex) -> Coord2 {
        let cols = usize::from(self.size().0);
        ((index % cols) as Coord, (index / cols) as Coord)
    }
}
