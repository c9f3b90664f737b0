#![forbid(unsafe_code)]

//! String-keyed configuration decoding.
//!
//! Markup authors configure drawers through attributes. Decoding never
//! fails: a value that cannot be used falls back to its default and logs a
//! warning, so a typo never breaks rendering. Programmatic setters on the
//! controller validate strictly instead.
//!
//! | Attribute | Type | Default |
//! |-----------|------|---------|
//! | `direction` | `top`, `bottom`, `left`, `right` (case-sensitive) | `bottom` |
//! | `dismissible` | boolean | `true` |
//! | `velocity-threshold` | px/ms, `> 0` | `0.4` |
//! | `close-threshold` | ratio in `(0, 1]` | `0.25` |
//! | `show-handle` | boolean (content element) | `true` |
//!
//! Booleans follow HTML conventions: absent means the default, a bare
//! attribute (empty string) means `true`, otherwise only `"true"` is true.

use vaul_core::{ConfigError, Direction};

use super::gesture::{
    DEFAULT_CLOSE_THRESHOLD, DEFAULT_VELOCITY_THRESHOLD, validate_close_threshold,
    validate_velocity_threshold,
};

pub fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value {
        None => default,
        Some("") => true,
        Some(v) => v == "true",
    }
}

pub fn parse_direction(value: Option<&str>) -> Direction {
    let Some(raw) = value else {
        return Direction::default();
    };
    raw.parse().unwrap_or_else(|_| {
        let fallback = Direction::default();
        tracing::warn!(
            attribute = "direction",
            value = raw,
            %fallback,
            "invalid attribute value, using default"
        );
        fallback
    })
}

fn parse_threshold(
    name: &'static str,
    value: Option<&str>,
    default: f64,
    validate: fn(f64) -> Result<f64, ConfigError>,
) -> f64 {
    let Some(raw) = value else {
        return default;
    };
    match raw.trim().parse::<f64>().map(validate) {
        Ok(Ok(v)) => v,
        _ => {
            tracing::warn!(
                attribute = name,
                value = raw,
                fallback = default,
                "invalid attribute value, using default"
            );
            default
        }
    }
}

pub fn parse_velocity_threshold(value: Option<&str>) -> f64 {
    parse_threshold(
        "velocity-threshold",
        value,
        DEFAULT_VELOCITY_THRESHOLD,
        validate_velocity_threshold,
    )
}

pub fn parse_close_threshold(value: Option<&str>) -> f64 {
    parse_threshold(
        "close-threshold",
        value,
        DEFAULT_CLOSE_THRESHOLD,
        validate_close_threshold,
    )
}

/// Attributes read from the drawer root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawerAttributes {
    pub direction: Direction,
    pub dismissible: bool,
    pub velocity_threshold: f64,
    pub close_threshold: f64,
}

impl Default for DrawerAttributes {
    fn default() -> Self {
        Self {
            direction: Direction::Bottom,
            dismissible: true,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            close_threshold: DEFAULT_CLOSE_THRESHOLD,
        }
    }
}

impl DrawerAttributes {
    /// Names the binding layer should watch for changes.
    pub const OBSERVED: [&'static str; 4] = [
        "direction",
        "dismissible",
        "velocity-threshold",
        "close-threshold",
    ];

    /// Decode from an attribute lookup (`None` = attribute absent).
    pub fn decode<S: AsRef<str>>(lookup: impl Fn(&str) -> Option<S>) -> Self {
        Self {
            direction: parse_direction(lookup("direction").as_ref().map(AsRef::as_ref)),
            dismissible: parse_bool(lookup("dismissible").as_ref().map(AsRef::as_ref), true),
            velocity_threshold: parse_velocity_threshold(
                lookup("velocity-threshold").as_ref().map(AsRef::as_ref),
            ),
            close_threshold: parse_close_threshold(
                lookup("close-threshold").as_ref().map(AsRef::as_ref),
            ),
        }
    }
}

/// Attributes read from the content element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentAttributes {
    pub show_handle: bool,
}

impl Default for ContentAttributes {
    fn default() -> Self {
        Self { show_handle: true }
    }
}

impl ContentAttributes {
    pub const OBSERVED: [&'static str; 1] = ["show-handle"];

    pub fn decode<S: AsRef<str>>(lookup: impl Fn(&str) -> Option<S>) -> Self {
        Self {
            show_handle: parse_bool(lookup("show-handle").as_ref().map(AsRef::as_ref), true),
        }
    }
}

/// One decoded attribute change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawerAttribute {
    Direction(Direction),
    Dismissible(bool),
    VelocityThreshold(f64),
    CloseThreshold(f64),
    ShowHandle(bool),
}

impl DrawerAttribute {
    /// Decode `name = value`. Returns `None` for attributes the drawer does
    /// not observe.
    pub fn decode(name: &str, value: Option<&str>) -> Option<Self> {
        Some(match name {
            "direction" => Self::Direction(parse_direction(value)),
            "dismissible" => Self::Dismissible(parse_bool(value, true)),
            "velocity-threshold" => Self::VelocityThreshold(parse_velocity_threshold(value)),
            "close-threshold" => Self::CloseThreshold(parse_close_threshold(value)),
            "show-handle" => Self::ShowHandle(parse_bool(value, true)),
            _ => return None,
        })
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Direction(_) => "direction",
            Self::Dismissible(_) => "dismissible",
            Self::VelocityThreshold(_) => "velocity-threshold",
            Self::CloseThreshold(_) => "close-threshold",
            Self::ShowHandle(_) => "show-handle",
        }
    }
}
