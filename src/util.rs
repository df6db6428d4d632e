// Parsing and small numeric helpers.
//
// CSV cells arrive as loose strings; everything past the loader works with
// typed `Option<f64>` / `i32` values.
use num_format::{Locale, ToFormattedString};

/// Parse a CSV cell into `f64`, tolerating the noise common in spreadsheet
/// exports.
///
/// - Blank cells are `Ok(None)` (a null, not an error).
/// - Thousands separators (`","`) are stripped before parsing.
/// - Values containing letters (`NaN`, `n/a`, `inf`) are rejected, as is
///   anything else `f64::from_str` refuses.
pub fn parse_f64_cell(s: Option<&str>) -> Result<Option<f64>, ()> {
    let Some(s) = s.map(str::trim) else {
        return Ok(None);
    };
    if s.is_empty() {
        return Ok(None);
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(());
    }
    s.replace(',', "").parse::<f64>().map(Some).map_err(|_| ())
}

/// Years sometimes come through as `2021.0` when a sheet stored them as
/// floats; those are accepted as long as they are integral.
pub fn parse_year_cell(s: Option<&str>) -> Result<Option<i32>, ()> {
    let Some(s) = s.map(str::trim) else {
        return Ok(None);
    };
    if s.is_empty() {
        return Ok(None);
    }
    if let Ok(y) = s.parse::<i32>() {
        return Ok(Some(y));
    }
    match s.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.abs() <= f64::from(i32::MAX) => Ok(Some(f as i32)),
        _ => Err(()),
    }
}

/// Trimmed, non-empty text or `None`.
pub fn clean_text(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(v: &[f64]) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    let sum: f64 = v.iter().copied().sum();
    Some(sum / v.len() as f64)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus `en` thousands separators, e.g. `1,234,567.89`.
    // Grouping works on the digit string so magnitudes past `i64` survive.
    let neg = n.is_sign_negative();
    let s = format!("{:.*}", decimals, n.abs());
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s.as_str(), None),
    };
    let mut res = group_thousands(int_part);
    if decimals > 0 {
        res.push('.');
        match frac_part {
            Some(frac) => res.push_str(frac),
            None => res.push_str(&"0".repeat(decimals)),
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

fn group_thousands(digits: &str) -> String {
    let sep = Locale::en.separator();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(c);
    }
    out
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
