#![no_std]

extern crate alloc;

use alloc::collections::BTreeMap;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod tile;
mod types;

/// Largest accepted board side, keeps the pair count within what a UI can draw.
pub const MAX_SIDE: Coord = 8;

pub const DEFAULT_SIZE: Coord2 = (4, 4);

/// Pause before two revealed cards are compared.
pub const DEFAULT_REVEAL_DELAY_MS: u32 = 600;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub reveal_delay_ms: u32,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, reveal_delay_ms: u32) -> Self {
        Self {
            size,
            reveal_delay_ms,
        }
    }

    /// Clamps both sides to `1..=MAX_SIDE` and widens odd boards by one column.
    pub fn new((size_x, size_y): Coord2, reveal_delay_ms: u32) -> Self {
        let mut size_x = size_x.clamp(1, MAX_SIDE);
        let size_y = size_y.clamp(1, MAX_SIDE);
        // MAX_SIDE is even, so an odd width always has room to grow
        if mult(size_x, size_y) % 2 == 1 {
            size_x += 1;
        }
        Self::new_unchecked((size_x, size_y), reveal_delay_ms)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn pair_count(&self) -> CellCount {
        self.total_cells() / 2
    }

    pub fn is_valid(&self) -> bool {
        *self == Self::new(self.size, self.reveal_delay_ms)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(DEFAULT_SIZE, DEFAULT_REVEAL_DELAY_MS)
    }
}

/// The permuted face-down board, fixed for the duration of one round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardLayout {
    symbols: Array2<Symbol>,
    size: Coord2,
    pair_count: CellCount,
}

impl BoardLayout {
    /// Builds a layout from symbols listed in row-major order.
    ///
    /// Every symbol must appear exactly twice and the sequence must fill the board.
    pub fn from_symbols(size: Coord2, symbols: &[Symbol]) -> Result<Self> {
        let total = usize::from(mult(size.0, size.1));
        if total == 0 || total % 2 == 1 || symbols.len() != total {
            return Err(GameError::InvalidBoardShape);
        }

        let mut counts: BTreeMap<Symbol, usize> = BTreeMap::new();
        for &symbol in symbols {
            *counts.entry(symbol).or_default() += 1;
        }
        if let Some((&symbol, _)) = counts.iter().find(|&(_, &count)| count != 2) {
            return Err(GameError::UnpairedSymbol(symbol));
        }

        Ok(Self::from_symbols_unchecked(size, symbols))
    }

    pub(crate) fn from_symbols_unchecked(size: Coord2, symbols: &[Symbol]) -> Self {
        let cols = usize::from(size.0);
        let symbols = Array2::from_shape_fn(size.to_nd_index(), |(x, y)| symbols[y * cols + x]);
        Self {
            symbols,
            size,
            pair_count: mult(size.0, size.1) / 2,
        }
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size, DEFAULT_REVEAL_DELAY_MS)
    }

    pub fn validate_index(&self, index: CardIndex) -> Result<Coord2> {
        index_to_coords(index, self.size)
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn pair_count(&self) -> CellCount {
        self.pair_count
    }

    pub fn symbol_at(&self, index: CardIndex) -> Result<Symbol> {
        self.validate_index(index).map(|coords| self[coords])
    }

    /// Symbols in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        let (cols, rows) = self.size;
        (0..rows).flat_map(move |y| (0..cols).map(move |x| self[(x, y)]))
    }
}

impl Index<Coord2> for BoardLayout {
    type Output = Symbol;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.symbols[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn symbols(ids: &[u8]) -> Vec<Symbol> {
        ids.iter().copied().map(Symbol).collect()
    }

    #[test]
    fn config_always_has_whole_pairs() {
        for x in 0..=10 {
            for y in 0..=10 {
                let config = GameConfig::new((x, y), 0);
                assert_eq!(config.total_cells() % 2, 0, "{:?}", config.size);
                assert!(config.size.0 >= 1 && config.size.0 <= MAX_SIDE);
                assert!(config.size.1 >= 1 && config.size.1 <= MAX_SIDE);
                assert!(config.is_valid());
            }
        }
        assert_eq!(GameConfig::new((3, 3), 0).size, (4, 3));
        assert_eq!(GameConfig::new((1, 1), 0).size, (2, 1));
    }

    #[test]
    fn default_config_is_sixteen_cards() {
        let config = GameConfig::default();
        assert_eq!(config.total_cells(), 16);
        assert_eq!(config.pair_count(), 8);
        assert_eq!(config.reveal_delay_ms, DEFAULT_REVEAL_DELAY_MS);
    }

    #[test]
    fn layout_keeps_row_major_order() {
        let ids = [0, 1, 2, 0, 1, 2];
        let layout = BoardLayout::from_symbols((3, 2), &symbols(&ids)).unwrap();

        assert_eq!(layout.pair_count(), 3);
        assert_eq!(layout.iter().collect::<Vec<_>>(), symbols(&ids));
        assert_eq!(layout[(2, 0)], Symbol(2));
        assert_eq!(layout[(0, 1)], Symbol(0));
        assert_eq!(layout.symbol_at(4), Ok(Symbol(1)));
        assert_eq!(layout.symbol_at(6), Err(GameError::InvalidIndex));
    }

    #[test]
    fn layout_rejects_bad_input() {
        assert_eq!(
            BoardLayout::from_symbols((2, 2), &symbols(&[0, 0, 1])),
            Err(GameError::InvalidBoardShape)
        );
        assert_eq!(
            BoardLayout::from_symbols((3, 1), &symbols(&[0, 0, 0])),
            Err(GameError::InvalidBoardShape)
        );
        assert_eq!(
            BoardLayout::from_symbols((2, 2), &symbols(&[0, 0, 0, 1])),
            Err(GameError::UnpairedSymbol(Symbol(0)))
        );
        assert_eq!(
            BoardLayout::from_symbols((2, 2), &symbols(&[0, 0, 1, 2])),
            Err(GameError::UnpairedSymbol(Symbol(1)))
        );
    }
}
