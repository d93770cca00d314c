// Value formatters driven by the format configuration
// Author: Gabriel Demetrios Lafis

use chrono::{DateTime, Utc};

use super::{DateFormat, FormatConfig};

/// Thousands and decimal separators for a locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separators {
    pub thousands: char,
    pub decimal: char,
}

impl Separators {
    /// Resolve separators from a BCP 47 locale tag
    pub fn for_locale(locale: &str) -> Self {
        let language = locale
            .split(|c: char| c == '-' || c == '_')
            .next()
            .unwrap_or("")
            .to_lowercase();

        match language.as_str() {
            "de" | "es" | "it" | "pt" | "nl" | "id" | "tr" | "da" => Separators {
                thousands: '.',
                decimal: ',',
            },
            "fr" | "ru" | "pl" | "sv" | "nb" | "fi" | "cs" => Separators {
                thousands: ' ',
                decimal: ',',
            },
            _ => Separators {
                thousands: ',',
                decimal: '.',
            },
        }
    }
}

fn format_fixed(value: f64, decimals: usize, separators: Separators) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(separators.thousands);
        }
        grouped.push(c);
    }

    if let Some(frac) = frac_part {
        grouped.push(separators.decimal);
        grouped.push_str(frac);
    }

    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format a number with the configured decimals and locale separators
pub fn format_number(value: Option<f64>, cfg: &FormatConfig) -> String {
    match value {
        Some(v) if v.is_finite() => {
            format_fixed(v, cfg.decimals as usize, Separators::for_locale(&cfg.locale))
        }
        _ => cfg.null_value.clone(),
    }
}

/// Symbol for an ISO 4217 currency code
pub fn currency_symbol(code: &str) -> Option<&'static str> {
    match code.to_uppercase().as_str() {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "INR" => Some("₹"),
        "BRL" => Some("R$"),
        _ => None,
    }
}

/// Format a monetary amount in the configured currency
pub fn format_currency(value: Option<f64>, cfg: &FormatConfig) -> String {
    let v = match value {
        Some(v) if v.is_finite() => v,
        _ => return cfg.null_value.clone(),
    };

    let separators = Separators::for_locale(&cfg.locale);
    let amount = format_fixed(v.abs(), cfg.decimals as usize, separators);
    let negative = v < 0.0 && amount.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };

    let code = cfg.currency.to_uppercase();
    if separators.decimal == ',' {
        let unit = currency_symbol(&code).map(str::to_string).unwrap_or(code);
        format!("{}{} {}", sign, amount, unit)
    } else {
        match currency_symbol(&code) {
            Some(symbol) => format!("{}{}{}", sign, symbol, amount),
            None => format!("{}{} {}", sign, code, amount),
        }
    }
}

/// Format a ratio (0.25) as a percentage (25.00%)
pub fn format_percent(value: Option<f64>, cfg: &FormatConfig) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}%", format_number(Some(v * 100.0), cfg)),
        _ => cfg.null_value.clone(),
    }
}

/// Format large numbers with K/M/B/T suffixes
pub fn format_compact(value: Option<f64>, cfg: &FormatConfig) -> String {
    let v = match value {
        Some(v) if v.is_finite() => v,
        _ => return cfg.null_value.clone(),
    };

    let separators = Separators::for_locale(&cfg.locale);
    let abs = v.abs();
    let scales = [(1e3, "K"), (1e6, "M"), (1e9, "B"), (1e12, "T")];

    // Magnitude of the value as it will be printed, so 999_950 becomes 1.0M
    let mut chosen = None;
    if rounded(abs, cfg.decimals as usize) >= 1e3 {
        for (index, (scale, _)) in scales.iter().enumerate() {
            if abs >= *scale || index == 0 {
                chosen = Some(index);
            }
        }
        if let Some(index) = chosen {
            if index + 1 < scales.len() && rounded(abs / scales[index].0, 1) >= 1e3 {
                chosen = Some(index + 1);
            }
        }
    }

    match chosen {
        Some(index) => {
            let (scale, suffix) = scales[index];
            format!("{}{}", format_fixed(v / scale, 1, separators), suffix)
        }
        None => format_number(Some(v), cfg),
    }
}

// Value after fixed-point rounding, as `format_fixed` would print it
fn rounded(value: f64, decimals: usize) -> f64 {
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

/// Format a timestamp using the configured date style
pub fn format_date(value: Option<DateTime<Utc>>, cfg: &FormatConfig) -> String {
    let value = match value {
        Some(v) => v,
        None => return cfg.null_value.clone(),
    };

    let us_order = Separators::for_locale(&cfg.locale).decimal == '.'
        && cfg.locale.to_lowercase().starts_with("en-us");

    let pattern = match cfg.date_format {
        DateFormat::Short if us_order => "%m/%d/%Y",
        DateFormat::Short => "%d/%m/%Y",
        DateFormat::Medium => "%b %-d, %Y",
        DateFormat::Long => "%B %-d, %Y",
        DateFormat::Iso => "%Y-%m-%d",
    };

    let mut formatted = value.format(pattern).to_string();
    if cfg.include_time {
        formatted.push_str(&value.format(" %H:%M").to_string());
    }
    formatted
}
