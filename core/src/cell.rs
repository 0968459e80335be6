use core::fmt;
use serde::{Deserialize, Serialize};

pub const HIDDEN_SYMBOL: char = '~';
pub const FLAG_SYMBOL: char = '♥';
pub const ITEM_SYMBOL: char = '☺';

/// Player-visible state of a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Hidden,
    Flagged,
    /// Revealed safe cell with its cached count of adjacent items.
    Revealed(u8),
    /// Revealed item cell, only present once the game is lost.
    ItemRevealed,
}

impl Cell {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }

    /// Revealed cells never go back to hidden or flagged.
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_) | Self::ItemRevealed)
    }

    /// Single-character encoding used by save files and plain-text boards.
    pub const fn symbol(self) -> char {
        match self {
            Self::Hidden => HIDDEN_SYMBOL,
            Self::Flagged => FLAG_SYMBOL,
            Self::ItemRevealed => ITEM_SYMBOL,
            Self::Revealed(count) => match char::from_digit(count as u32, 10) {
                Some(digit) => digit,
                None => '?',
            },
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            HIDDEN_SYMBOL => Some(Self::Hidden),
            FLAG_SYMBOL => Some(Self::Flagged),
            ITEM_SYMBOL => Some(Self::ItemRevealed),
            '0'..='8' => symbol
                .to_digit(10)
                .map(|count| Self::Revealed(count as u8)),
            _ => None,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Hidden
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
