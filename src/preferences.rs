//! Persisted UI preferences: color theme and active tool tab.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Color themes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Lime,
    Rose,
    Yellow,
    Coffee,
    Lavender,
    Sky,
    Red,
}

impl Theme {
    pub const ALL: [Theme; 9] = [
        Self::Light,
        Self::Dark,
        Self::Lime,
        Self::Rose,
        Self::Yellow,
        Self::Coffee,
        Self::Lavender,
        Self::Sky,
        Self::Red,
    ];

    /// Persisted identifier.
    pub fn id(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Lime => "lime",
            Self::Rose => "rose",
            Self::Yellow => "yellow",
            Self::Coffee => "coffee",
            Self::Lavender => "lavender",
            Self::Sky => "sky",
            Self::Red => "red",
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
            Self::Lime => "Creamy Lime",
            Self::Rose => "Creamy Rose",
            Self::Yellow => "Sunny Yellow",
            Self::Coffee => "Brown Coffee",
            Self::Lavender => "Calm Lavender",
            Self::Sky => "Sky Blue",
            Self::Red => "Bold Red",
        }
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.id() == s)
            .ok_or_else(|| Error::UnknownPreference(s.to_string()))
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Top-level tool tabs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveTab {
    #[default]
    Calculator,
    #[serde(rename = "Unit Converters")]
    UnitConverter,
    #[serde(rename = "Health Tools")]
    Health,
    #[serde(rename = "Finance Tools")]
    Finance,
}

impl ActiveTab {
    pub const ALL: [ActiveTab; 4] = [
        Self::Calculator,
        Self::UnitConverter,
        Self::Health,
        Self::Finance,
    ];

    /// Persisted identifier, also the tab title.
    pub fn id(self) -> &'static str {
        match self {
            Self::Calculator => "Calculator",
            Self::UnitConverter => "Unit Converters",
            Self::Health => "Health Tools",
            Self::Finance => "Finance Tools",
        }
    }
}

impl FromStr for ActiveTab {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tab| tab.id() == s)
            .ok_or_else(|| Error::UnknownPreference(s.to_string()))
    }
}

impl fmt::Display for ActiveTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
