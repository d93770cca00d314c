// Color parsing and WCAG contrast computation
// Author: Gabriel Demetrios Lafis

use serde::{Deserialize, Serialize};

/// Luminance returned for colors that cannot be parsed
pub const NEUTRAL_LUMINANCE: f64 = 0.5;

/// Minimum contrast ratio for normal text (WCAG AA)
pub const AA_NORMAL_TEXT: f64 = 4.5;

/// Minimum contrast ratio for large text (WCAG AA)
pub const AA_LARGE_TEXT: f64 = 3.0;

/// An sRGB color with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a new color
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// WCAG relative luminance of this color
    pub fn luminance(&self) -> f64 {
        0.2126 * linearize(self.r) + 0.7152 * linearize(self.g) + 0.0722 * linearize(self.b)
    }

    /// Format as a 6-digit lowercase hex string
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn linearize(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Parse a CSS color in hex (3 or 6 digits), `rgb()` or `rgba()` notation
pub fn parse_color(input: &str) -> Option<Rgb> {
    let s = input.trim().to_lowercase();

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }

    let body = if let Some(rest) = s.strip_prefix("rgba(") {
        rest
    } else if let Some(rest) = s.strip_prefix("rgb(") {
        rest
    } else {
        return None;
    };

    let body = body.strip_suffix(')')?;
    let parts: Vec<&str> = body.split(',').map(|p| p.trim()).collect();
    if parts.len() < 3 || parts.len() > 4 {
        return None;
    }

    let mut channels = [0u8; 3];
    for (slot, part) in channels.iter_mut().zip(parts.iter()) {
        let value: f64 = part.parse().ok()?;
        if !(0.0..=255.0).contains(&value) {
            return None;
        }
        *slot = value.round() as u8;
    }

    if let Some(alpha) = parts.get(3) {
        let alpha: f64 = alpha.parse().ok()?;
        if !(0.0..=1.0).contains(&alpha) {
            return None;
        }
    }

    Some(Rgb::new(channels[0], channels[1], channels[2]))
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        3 => {
            let mut channels = [0u8; 3];
            for (slot, c) in channels.iter_mut().zip(hex.chars()) {
                let v = c.to_digit(16)? as u8;
                *slot = v * 17;
            }
            Some(Rgb::new(channels[0], channels[1], channels[2]))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Rgb::new(r, g, b))
        }
        _ => None,
    }
}

/// Relative luminance of a CSS color; malformed input yields 0.5
pub fn get_luminance(color: &str) -> f64 {
    match parse_color(color) {
        Some(rgb) => rgb.luminance(),
        None => {
            log::debug!("Unparseable color '{}', using neutral luminance", color);
            NEUTRAL_LUMINANCE
        }
    }
}

/// Whether a color reads as dark (luminance below 0.5)
pub fn is_dark_color(color: &str) -> bool {
    get_luminance(color) < 0.5
}

/// Whether a color reads as light
pub fn is_light_color(color: &str) -> bool {
    !is_dark_color(color)
}

/// WCAG contrast ratio between two colors, in the range [1, 21]
pub fn get_contrast_ratio(a: &str, b: &str) -> f64 {
    let la = get_luminance(a);
    let lb = get_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Contrast sufficient for normal-size text
pub fn has_good_contrast(foreground: &str, background: &str) -> bool {
    get_contrast_ratio(foreground, background) >= AA_NORMAL_TEXT
}

/// Contrast sufficient for large text
pub fn has_good_contrast_large_text(foreground: &str, background: &str) -> bool {
    get_contrast_ratio(foreground, background) >= AA_LARGE_TEXT
}

/// Readable colors for chart chrome drawn over a background
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibleColors {
    pub text: String,
    pub muted_text: String,
    pub grid_line: String,
    pub border: String,
    pub tooltip_bg: String,
    pub tooltip_text: String,
}

impl AccessibleColors {
    /// Palette for dark backgrounds
    pub fn for_dark_background() -> Self {
        AccessibleColors {
            text: "#f3f4f6".to_string(),
            muted_text: "#9ca3af".to_string(),
            grid_line: "rgba(255, 255, 255, 0.1)".to_string(),
            border: "rgba(255, 255, 255, 0.2)".to_string(),
            tooltip_bg: "rgba(17, 24, 39, 0.95)".to_string(),
            tooltip_text: "#f9fafb".to_string(),
        }
    }

    /// Palette for light backgrounds
    pub fn for_light_background() -> Self {
        AccessibleColors {
            text: "#1f2937".to_string(),
            muted_text: "#6b7280".to_string(),
            grid_line: "rgba(0, 0, 0, 0.08)".to_string(),
            border: "rgba(0, 0, 0, 0.15)".to_string(),
            tooltip_bg: "rgba(255, 255, 255, 0.98)".to_string(),
            tooltip_text: "#111827".to_string(),
        }
    }
}

/// Pick the fixed dark or light palette for a background
pub fn generate_accessible_colors(background: &str) -> AccessibleColors {
    if is_dark_color(background) {
        AccessibleColors::for_dark_background()
    } else {
        AccessibleColors::for_light_background()
    }
}
