use thiserror::Error;

use crate::symbol::Symbol;

#[derive(Debug, Error)]
pub enum ToneError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No tone defined for character {0:?}")]
    UnsupportedSymbol(char),

    #[error("Symbol {0:?} cannot be synthesized")]
    NotGeneratable(Symbol),
}

pub type Result<T> = std::result::Result<T, ToneError>;
