//! Health and fitness formulas.
//!
//! Every function returns `None` when an input is missing or out of range.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Biological sex, as used by the BMR and body fat formulas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            _ => Err(Error::UnknownPreference(s.to_string())),
        }
    }
}

/// BMI classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obesity,
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Underweight => "Underweight",
            Self::Normal => "Normal weight",
            Self::Overweight => "Overweight",
            Self::Obesity => "Obesity",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bmi {
    pub value: f64,
    pub category: BmiCategory,
}

/// Body mass index from height in centimeters and weight in kilograms.
pub fn bmi(height_cm: f64, weight_kg: f64) -> Option<Bmi> {
    let height_m = height_cm / 100.0;
    if !(height_m > 0.0 && weight_kg > 0.0) {
        return None;
    }
    let value = weight_kg / (height_m * height_m);
    let category = if value < 18.5 {
        BmiCategory::Underweight
    } else if value < 24.9 {
        BmiCategory::Normal
    } else if value < 29.9 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obesity
    };
    Some(Bmi { value, category })
}

/// Basal metabolic rate in kcal/day (Mifflin-St Jeor).
///
/// Inputs are whole numbers: fractional parts are dropped.
pub fn bmr(gender: Gender, age: f64, height_cm: f64, weight_kg: f64) -> Option<f64> {
    let (age, height, weight) = (age.trunc(), height_cm.trunc(), weight_kg.trunc());
    if !(age > 0.0 && height > 0.0 && weight > 0.0) {
        return None;
    }
    let base = 10.0 * weight + 6.25 * height - 5.0 * age;
    Some(match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    })
}

/// Body fat percentage (US Navy method). `hip_cm` is only used for women.
pub fn body_fat(
    gender: Gender,
    height_cm: f64,
    neck_cm: f64,
    waist_cm: f64,
    hip_cm: f64,
) -> Option<f64> {
    if !(height_cm > 0.0 && neck_cm > 0.0 && waist_cm > 0.0) {
        return None;
    }
    match gender {
        Gender::Male if waist_cm - neck_cm > 0.0 => Some(
            495.0 / (1.0324 - 0.19077 * (waist_cm - neck_cm).log10() + 0.15456 * height_cm.log10())
                - 450.0,
        ),
        Gender::Female if hip_cm > 0.0 && waist_cm + hip_cm - neck_cm > 0.0 => Some(
            495.0
                / (1.29579 - 0.35004 * (waist_cm + hip_cm - neck_cm).log10()
                    + 0.22100 * height_cm.log10())
                - 450.0,
        ),
        _ => None,
    }
}

/// Suggested daily water intake in liters: 33 ml per kg plus 350 ml per
/// 30 minutes of activity.
pub fn water_intake(weight_kg: f64, activity_minutes: f64) -> Option<f64> {
    if !(weight_kg > 0.0 && activity_minutes >= 0.0) {
        return None;
    }
    Some(weight_kg * 0.033 + activity_minutes / 30.0 * 0.35)
}
