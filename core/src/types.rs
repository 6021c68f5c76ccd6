use core::fmt;
use core::ops::{Index, IndexMut};
use serde::{Deserialize, Serialize};

use crate::{GameError, Result};

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for card, pair and score counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// Flat, row-major position of a card on the board.
pub type CardIndex = usize;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Converts a flat index into `(x, y)` for a board of the given size.
pub fn index_to_coords(index: CardIndex, size: Coord2) -> Result<Coord2> {
    let (cols, rows) = size;
    if cols == 0 || index >= usize::from(mult(cols, rows)) {
        return Err(GameError::InvalidIndex);
    }
    let x = index % usize::from(cols);
    let y = index / usize::from(cols);
    Ok((x as Coord, y as Coord))
}

/// Converts `(x, y)` into the flat index for a board of the given size.
pub fn coords_to_index(coords: Coord2, size: Coord2) -> Result<CardIndex> {
    if coords.0 >= size.0 || coords.1 >= size.1 {
        return Err(GameError::InvalidIndex);
    }
    Ok(usize::from(coords.1) * usize::from(size.0) + usize::from(coords.0))
}

/// Opaque identifier shared by the two cards of a pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol(pub u8);

impl Symbol {
    pub const fn id(self) -> u8 {
        self.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    /// 1-based number shown to humans.
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    pub const fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::One
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// Pairs collected by each player.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores([CellCount; 2]);

impl Scores {
    pub const fn new(one: CellCount, two: CellCount) -> Self {
        Self([one, two])
    }

    pub const fn get(&self, player: Player) -> CellCount {
        self.0[player.slot()]
    }

    pub const fn total(&self) -> CellCount {
        self.0[0].saturating_add(self.0[1])
    }

    /// The player strictly ahead, if any.
    pub fn leader(&self) -> Option<Player> {
        use core::cmp::Ordering::*;
        match self.0[0].cmp(&self.0[1]) {
            Greater => Some(Player::One),
            Less => Some(Player::Two),
            Equal => None,
        }
    }
}

impl Index<Player> for Scores {
    type Output = CellCount;

    fn index(&self, player: Player) -> &Self::Output {
        &self.0[player.slot()]
    }
}

impl IndexMut<Player> for Scores {
    fn index_mut(&mut self, player: Player) -> &mut Self::Output {
        &mut self.0[player.slot()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_index_is_row_major() {
        assert_eq!(index_to_coords(0, (4, 4)), Ok((0, 0)));
        assert_eq!(index_to_coords(5, (4, 4)), Ok((1, 1)));
        assert_eq!(index_to_coords(7, (4, 2)), Ok((3, 1)));
        assert_eq!(coords_to_index((3, 1), (4, 2)), Ok(7));
        assert_eq!(index_to_coords(16, (4, 4)), Err(GameError::InvalidIndex));
        assert_eq!(coords_to_index((4, 0), (4, 4)), Err(GameError::InvalidIndex));
    }

    #[test]
    fn players_alternate() {
        assert_eq!(Player::default(), Player::One);
        assert_eq!(Player::One.other(), Player::Two);
        assert_eq!(Player::Two.other().other(), Player::Two);
    }

    #[test]
    fn leader_follows_scores() {
        assert_eq!(Scores::new(5, 3).leader(), Some(Player::One));
        assert_eq!(Scores::new(3, 5).leader(), Some(Player::Two));
        assert_eq!(Scores::new(4, 4).leader(), None);
        assert_eq!(Scores::new(4, 4).total(), 8);
    }
}
