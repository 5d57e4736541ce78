//! Unit conversion tables.
//!
//! Linear categories convert through a base unit (`value * from / to`);
//! temperature converts through Celsius. Currency rates are static demo
//! values, not live quotes.

use std::fmt;
use std::str::FromStr;

use crate::calculator::format_fixed;
use crate::error::{Error, Result};

/// Decimals kept in a conversion result.
const RESULT_DECIMALS: usize = 6;

/// A unit with its factor to the category's base unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Unit {
    pub label: &'static str,
    pub factor: f64,
}

impl Unit {
    /// Abbreviation inside the label's parentheses, or the whole label.
    pub fn abbreviation(&self) -> &'static str {
        self.label
            .split_once('(')
            .and_then(|(_, rest)| rest.strip_suffix(')'))
            .unwrap_or(self.label)
    }

    /// Label without the parenthesized abbreviation.
    pub fn name(&self) -> &'static str {
        self.label
            .split_once(" (")
            .map_or(self.label, |(name, _)| name)
    }

    fn matches(&self, name: &str) -> bool {
        let name = name.trim();
        let short = self.abbreviation();
        [self.label, self.name(), short, short.trim_start_matches('°')]
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(name))
    }
}

const fn unit(label: &'static str, factor: f64) -> Unit {
    Unit { label, factor }
}

const LENGTH: &[Unit] = &[
    unit("Meters (m)", 1.0),
    unit("Kilometers (km)", 1000.0),
    unit("Feet (ft)", 0.3048),
    unit("Miles (mi)", 1609.34),
    unit("Inches (in)", 0.0254),
];

const MASS: &[Unit] = &[
    unit("Kilograms (kg)", 1.0),
    unit("Grams (g)", 0.001),
    unit("Pounds (lb)", 0.453592),
    unit("Ounces (oz)", 0.0283495),
];

// Factors are unused: temperature goes through Celsius.
const TEMPERATURE: &[Unit] = &[
    unit("Celsius (°C)", 1.0),
    unit("Fahrenheit (°F)", 1.0),
    unit("Kelvin (K)", 1.0),
];

const TIME: &[Unit] = &[
    unit("Seconds (s)", 1.0),
    unit("Minutes (min)", 60.0),
    unit("Hours (hr)", 3600.0),
    unit("Days", 86400.0),
];

const VOLUME: &[Unit] = &[
    unit("Liters (L)", 1.0),
    unit("Milliliters (mL)", 0.001),
    unit("Gallons (US gal)", 3.78541),
    unit("Cups (US cup)", 0.24),
];

const SPEED: &[Unit] = &[
    unit("m/s", 1.0),
    unit("km/h", 0.277778),
    unit("mph", 0.44704),
    unit("knots", 0.514444),
];

const AREA: &[Unit] = &[
    unit("Square Meters (m²)", 1.0),
    unit("Square Feet (ft²)", 0.092903),
    unit("Acres", 4046.86),
    unit("Hectares", 10000.0),
];

const ENERGY: &[Unit] = &[
    unit("Joules (J)", 1.0),
    unit("Calories (cal)", 4.184),
    unit("Watt-hours (Wh)", 3600.0),
];

const CURRENCY: &[Unit] = &[
    unit("USD", 1.0),
    unit("EUR", 1.09),
    unit("GBP", 1.27),
    unit("JPY", 0.0067),
    unit("INR", 0.012),
];

/// Conversion categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Length,
    Mass,
    Temperature,
    Time,
    Volume,
    Speed,
    Area,
    Energy,
    Currency,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Self::Length,
        Self::Mass,
        Self::Temperature,
        Self::Time,
        Self::Volume,
        Self::Speed,
        Self::Area,
        Self::Energy,
        Self::Currency,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Length => "Length",
            Self::Mass => "Mass",
            Self::Temperature => "Temperature",
            Self::Time => "Time",
            Self::Volume => "Volume",
            Self::Speed => "Speed",
            Self::Area => "Area",
            Self::Energy => "Energy",
            Self::Currency => "Currency",
        }
    }

    pub fn units(self) -> &'static [Unit] {
        match self {
            Self::Length => LENGTH,
            Self::Mass => MASS,
            Self::Temperature => TEMPERATURE,
            Self::Time => TIME,
            Self::Volume => VOLUME,
            Self::Speed => SPEED,
            Self::Area => AREA,
            Self::Energy => ENERGY,
            Self::Currency => CURRENCY,
        }
    }

    /// Find a unit by label or abbreviation, ignoring case.
    pub fn unit(self, name: &str) -> Result<Unit> {
        self.units()
            .iter()
            .find(|unit| unit.matches(name))
            .copied()
            .ok_or_else(|| Error::UnknownUnit(name.to_string()))
    }

    /// Default `(from, to)` pair: the first two units.
    pub fn default_pair(self) -> (Unit, Unit) {
        let units = self.units();
        (units[0], units.get(1).copied().unwrap_or(units[0]))
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownUnit(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn to_celsius(label: &str, value: f64) -> f64 {
    match label {
        "Fahrenheit (°F)" => (value - 32.0) * 5.0 / 9.0,
        "Kelvin (K)" => value - 273.15,
        _ => value,
    }
}

fn from_celsius(label: &str, celsius: f64) -> f64 {
    match label {
        "Fahrenheit (°F)" => celsius * 9.0 / 5.0 + 32.0,
        "Kelvin (K)" => celsius + 273.15,
        _ => celsius,
    }
}

/// Convert `value` between two units of a category.
pub fn convert_value(category: Category, from: Unit, to: Unit, value: f64) -> f64 {
    match category {
        Category::Temperature => from_celsius(to.label, to_celsius(from.label, value)),
        _ => value * from.factor / to.factor,
    }
}

/// Convert user input text, formatted to six decimals.
///
/// Non-numeric input yields `"Invalid number"`; unknown units are errors.
pub fn convert(category: Category, from: &str, to: &str, input: &str) -> Result<String> {
    let from = category.unit(from)?;
    let to = category.unit(to)?;
    Ok(match super::parse_input(input) {
        Some(value) => format_fixed(convert_value(category, from, to, value), RESULT_DECIMALS),
        None => "Invalid number".to_string(),
    })
}
