use thiserror::Error;

use crate::Symbol;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Card index out of range")]
    InvalidIndex,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Symbol {0:?} does not appear exactly twice")]
    UnpairedSymbol(Symbol),
}

pub type Result<T> = core::result::Result<T, GameError>;
