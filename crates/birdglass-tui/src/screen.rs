//! Screen identifiers, navigable by number keys.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Lookup, // 1
    Neighbours, // 2
}

impl ScreenId {
    /// Tab-bar order.
    pub const ALL: [ScreenId; 2] = [Self::Lookup, Self::Neighbours];

    pub fn number(self) -> u8 {
        match self {
            Self::Lookup => 1,
            Self::Neighbours => 2,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == n)
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        match self {
            Self::Lookup => Self::Neighbours,
            Self::Neighbours => Self::Lookup,
        }
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        // Two screens: prev and next coincide.
        self.next()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Lookup => "Lookup",
            Self::Neighbours => "Neighbours",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
