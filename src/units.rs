//src/units.rs
use crate::config::Units;
use thiserror::Error;

pub const LBS_TO_KG: f64 = 0.453_592;

#[derive(Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Invalid weight '{0}': not a number.")]
    NotANumber(String),
    #[error("Invalid weight {0}: must be greater than zero.")]
    NotPositive(f64),
    #[error("Invalid weight {0}: out of range.")]
    OutOfRange(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Small,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

pub fn to_kg(lbs: f64) -> f64 {
    lbs * LBS_TO_KG
}

pub fn to_lbs(kg: f64) -> f64 {
    kg / LBS_TO_KG
}

/// Converts a stored (pound) value into the display unit.
pub fn to_display(lbs: f64, units: Units) -> f64 {
    match units {
        Units::Imperial => lbs,
        Units::Metric => to_kg(lbs),
    }
}

/// Converts a value entered in the display unit back into pounds.
pub fn from_display(value: f64, units: Units) -> f64 {
    match units {
        Units::Imperial => value,
        Units::Metric => to_lbs(value),
    }
}

/// Always one decimal place; the underlying value keeps full precision.
pub fn format_weight(value: f64) -> String {
    format!("{value:.1}")
}

pub const fn unit_label(units: Units) -> &'static str {
    match units {
        Units::Imperial => "lbs",
        Units::Metric => "kg",
    }
}

/// Percentage of max for a set, rounded to a whole number.
/// Recomputed from current weights every time so edits to the max are reflected.
pub fn percent_of_max(set_weight: f64, max_weight: f64) -> i64 {
    (set_weight / max_weight * 100.0).round() as i64
}

pub const fn step_size(units: Units, step: Step) -> f64 {
    match (units, step) {
        (Units::Imperial, Step::Small) => 5.0,
        (Units::Imperial, Step::Large) => 10.0,
        (Units::Metric, Step::Small) => 2.5,
        (Units::Metric, Step::Large) => 5.0,
    }
}

/// Steps `current` (already in `units`) by the unit's step size. Never goes below zero.
pub fn step_weight(current: f64, units: Units, step: Step, direction: Direction) -> f64 {
    let size = step_size(units, step);
    match direction {
        Direction::Up => current + size,
        Direction::Down => (current - size).max(0.0),
    }
}

/// Parses user input in the display unit and returns the canonical pound value.
pub fn parse_weight_input(raw: &str, units: Units) -> Result<f64, WeightError> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| WeightError::NotANumber(trimmed.to_string()))?;
    if value.is_nan() {
        return Err(WeightError::NotANumber(trimmed.to_string()));
    }
    validate_weight(value)?;
    validate_weight(from_display(value, units))
}

/// A stored max must be finite and greater than zero.
pub fn validate_weight(value: f64) -> Result<f64, WeightError> {
    if !value.is_finite() {
        Err(WeightError::OutOfRange(value))
    } else if value > 0.0 {
        Ok(value)
    } else {
        Err(WeightError::NotPositive(value))
    }
}
