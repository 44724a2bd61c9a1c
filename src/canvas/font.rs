//! Font declarations loaded into a canvas.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{EaselError, Result};

/// Weight category of a font file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    Thin,
    ExtraLight,
    Light,
    #[default]
    Regular,
    Medium,
    SemiBold,
    Bold,
    ExtraBold,
    Black,
    Italic,
    BoldItalic,
}

impl FontWeight {
    pub const ALL: [FontWeight; 11] = [
        FontWeight::Thin,
        FontWeight::ExtraLight,
        FontWeight::Light,
        FontWeight::Regular,
        FontWeight::Medium,
        FontWeight::SemiBold,
        FontWeight::Bold,
        FontWeight::ExtraBold,
        FontWeight::Black,
        FontWeight::Italic,
        FontWeight::BoldItalic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FontWeight::Thin => "thin",
            FontWeight::ExtraLight => "extraLight",
            FontWeight::Light => "light",
            FontWeight::Regular => "regular",
            FontWeight::Medium => "medium",
            FontWeight::SemiBold => "semiBold",
            FontWeight::Bold => "bold",
            FontWeight::ExtraBold => "extraBold",
            FontWeight::Black => "black",
            FontWeight::Italic => "italic",
            FontWeight::BoldItalic => "boldItalic",
        }
    }

    /// Every accepted spelling.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|w| w.name()).collect()
    }
}

impl FromStr for FontWeight {
    type Err = EaselError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|w| w.name() == s)
            .ok_or_else(|| EaselError::Parse {
                message: format!("Unknown font weight: {}", s),
                help: Some(format!("Use one of: {}", Self::names().join(", "))),
            })
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field-by-field description of a font, validated by [`Font::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct FontConfig {
    pub family: String,
    pub path: PathBuf,
    pub weight: FontWeight,
}

/// A font family backed by a file on disk.
///
/// The file is only read when the canvas is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    family: String,
    path: PathBuf,
    weight: FontWeight,
}

impl Font {
    pub fn new(config: FontConfig) -> Result<Self> {
        if config.family.trim().is_empty() {
            return Err(EaselError::invalid_parameter("font", "non-empty family", ""));
        }
        if config.path.as_os_str().is_empty() {
            return Err(EaselError::invalid_parameter("font", "font file path", ""));
        }

        Ok(Self {
            family: config.family,
            path: config.path,
            weight: config.weight,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn weight(&self) -> FontWeight {
        self.weight
    }
}
