// Validation utilities
// Author: Gabriel Demetrios Lafis

use crate::style::parse_color;

/// Validate that a string is not blank
pub fn validate_not_empty(value: &str, name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("'{}' cannot be empty", name))
    } else {
        Ok(())
    }
}

/// Validate that a string's length, in characters, is within bounds
pub fn validate_length(value: &str, min: usize, max: usize, name: &str) -> Result<(), String> {
    let len = value.chars().count();
    if len < min || len > max {
        Err(format!(
            "'{}' must be between {} and {} characters",
            name, min, max
        ))
    } else {
        Ok(())
    }
}

/// Validate that a numeric value is in range
pub fn validate_range<T: PartialOrd + std::fmt::Display>(
    value: T,
    min: T,
    max: T,
    name: &str,
) -> Result<(), String> {
    if value < min || value > max {
        Err(format!(
            "'{}' must be between {} and {}",
            name, min, max
        ))
    } else {
        Ok(())
    }
}

/// Validate that a string is a color the style engine understands
pub fn validate_color(value: &str, name: &str) -> Result<(), String> {
    match parse_color(value) {
        Some(_) => Ok(()),
        None => Err(format!("'{}' is not a valid color: '{}'", name, value)),
    }
}
