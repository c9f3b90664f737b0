#![forbid(unsafe_code)]

//! Drawer directions.
//!
//! A direction names the viewport edge the drawer is anchored to. It fixes
//! the primary drag axis and which way along that axis counts as closing.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseDirectionError;
use crate::geometry::Axis;

/// Edge of the viewport a drawer slides in from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl Direction {
    /// All supported directions, in attribute documentation order.
    pub const ALL: [Direction; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    /// Attribute spelling (`"top"`, `"bottom"`, `"left"`, `"right"`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    #[inline]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    #[inline]
    pub const fn axis(self) -> Axis {
        if self.is_vertical() {
            Axis::Vertical
        } else {
            Axis::Horizontal
        }
    }

    /// Sign of a displacement along [`axis`](Self::axis) that moves the
    /// drawer toward its anchored edge.
    ///
    /// A bottom drawer closes when dragged down (`+1`), a top drawer when
    /// dragged up (`-1`), and likewise for right (`+1`) and left (`-1`).
    #[inline]
    pub const fn closing_sign(self) -> f64 {
        match self {
            Self::Bottom | Self::Right => 1.0,
            Self::Top | Self::Left => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    /// Case-sensitive: `"Bottom"` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ParseDirectionError::new(s))
    }
}
