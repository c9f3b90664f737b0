#![forbid(unsafe_code)]

//! Configuration errors.
//!
//! Threshold errors are raised synchronously by constructors and setters and
//! leave the previous value untouched. Structural wiring problems are not
//! errors at this level; the drawer logs them and carries on.

use std::fmt;

/// Invalid gesture configuration value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Velocity threshold must be a finite number greater than zero (px/ms).
    InvalidVelocityThreshold(f64),
    /// Close threshold must be a ratio in `(0, 1]`.
    InvalidCloseThreshold(f64),
    /// Scroll tolerance must be a finite, non-negative pixel count.
    InvalidScrollTolerance(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidVelocityThreshold(v) => {
                write!(f, "velocityThreshold must be a positive number, got {v}")
            }
            Self::InvalidCloseThreshold(v) => write!(
                f,
                "closeThreshold is distance threshold as ratio (0-1) for dismissal, got {v}"
            ),
            Self::InvalidScrollTolerance(v) => {
                write!(f, "scrollTolerance must be a non-negative number, got {v}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// A direction string that is not one of `top`, `bottom`, `left`, `right`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectionError {
    value: String,
}

impl ParseDirectionError {
    pub(crate) fn new(value: &str) -> Self {
        Self {
            value: value.to_owned(),
        }
    }

    /// The rejected input.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid direction {:?}; expected one of top, bottom, left, right",
            self.value
        )
    }
}

impl std::error::Error for ParseDirectionError {}
