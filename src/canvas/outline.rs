//! Named stroke styles applied to layers.

use std::fmt;
use std::str::FromStr;

use crate::error::{EaselError, Result};

use super::Colour;

/// Where an outline stroke sits relative to a shape's edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutlineKind {
    #[default]
    Center,
    Inner,
    Outer,
}

impl OutlineKind {
    /// Accepted spellings, in declaration order.
    pub const NAMES: [&'static str; 3] = ["center", "inner", "outer"];

    pub fn name(self) -> &'static str {
        match self {
            OutlineKind::Center => "center",
            OutlineKind::Inner => "inner",
            OutlineKind::Outer => "outer",
        }
    }

    /// Whether a signed edge distance falls inside a stroke of `width`.
    pub fn covers(self, distance: f32, width: f32) -> bool {
        match self {
            OutlineKind::Center => distance.abs() <= width / 2.0,
            OutlineKind::Inner => (-width..=0.0).contains(&distance),
            OutlineKind::Outer => distance > 0.0 && distance <= width,
        }
    }
}

impl FromStr for OutlineKind {
    type Err = EaselError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "center" => Ok(OutlineKind::Center),
            "inner" => Ok(OutlineKind::Inner),
            "outer" => Ok(OutlineKind::Outer),
            _ => Err(EaselError::Parse {
                message: format!("Unknown outline type: {}", s),
                help: Some(format!("Use one of: {}", Self::NAMES.join(", "))),
            }),
        }
    }
}

impl fmt::Display for OutlineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field-by-field description of an outline, validated by [`Outline::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineConfig {
    pub id: String,
    pub kind: OutlineKind,
    pub colour: Colour,
    /// Opacity percentage, 0-100.
    pub alpha: u8,
    pub stroke: u32,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            kind: OutlineKind::Center,
            colour: Colour::WHITE,
            alpha: 100,
            stroke: 1,
        }
    }
}

/// A named outline style.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    id: String,
    kind: OutlineKind,
    colour: Colour,
    alpha: u8,
    stroke: u32,
}

impl Outline {
    pub fn new(config: OutlineConfig) -> Result<Self> {
        if config.id.is_empty() {
            return Err(EaselError::invalid_parameter("outline", "non-empty ID", ""));
        }
        if config.alpha > 100 {
            return Err(EaselError::invalid_parameter(
                "outline",
                "alpha between 0 and 100",
                config.alpha.to_string(),
            ));
        }

        Ok(Self {
            id: config.id,
            kind: config.kind,
            colour: config.colour,
            alpha: config.alpha,
            stroke: config.stroke,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> OutlineKind {
        self.kind
    }

    pub fn colour(&self) -> Colour {
        self.colour
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn stroke(&self) -> u32 {
        self.stroke
    }

    /// The stroke colour with the outline's alpha applied.
    pub fn paint(&self) -> Colour {
        self.colour.with_alpha_percent(self.alpha)
    }
}
