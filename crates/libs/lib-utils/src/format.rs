//! # Formatting Utilities
//!
//! Number and value formatting for listing cards.
//!
//! - [`format_price`] - Prices in yuan (`¥12.50`)
//! - [`format_number`] - Compact counts (`1.2万`, `3k`)
//! - [`format_file_size`] - Byte sizes with binary units
//! - [`format_description`] - Plain text to single-line HTML

/// Something that can be read as a number the way form fields arrive:
/// either already numeric or as text.
pub trait NumericInput {
    fn to_number(&self) -> Option<f64>;
}

impl NumericInput for f64 {
    fn to_number(&self) -> Option<f64> {
        (!self.is_nan()).then_some(*self)
    }
}

impl NumericInput for i64 {
    fn to_number(&self) -> Option<f64> {
        Some(*self as f64)
    }
}

impl NumericInput for u64 {
    fn to_number(&self) -> Option<f64> {
        Some(*self as f64)
    }
}

impl NumericInput for &str {
    fn to_number(&self) -> Option<f64> {
        parse_leading_float(self)
    }
}

impl NumericInput for String {
    fn to_number(&self) -> Option<f64> {
        parse_leading_float(self)
    }
}

/// Parse the longest numeric prefix of `input` ("12.5元" -> 12.5).
///
/// Leading whitespace is skipped. Returns `None` when no digits lead the text.
pub fn parse_leading_float(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start || digits > 0 {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    // Optional exponent, only if it is complete.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Round to `digits` decimals, ties away from zero.
///
/// `format!("{:.N}")` alone rounds exact ties to even (`0.125` -> `0.12`).
fn round_half_away(value: f64, digits: usize) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

/// Format a price in yuan with two decimals. Unreadable input renders as `¥0.00`.
pub fn format_price<N: NumericInput>(price: N) -> String {
    match price.to_number() {
        Some(value) => format!("¥{:.2}", round_half_away(value, 2)),
        None => "¥0.00".to_string(),
    }
}

/// Compact count: `万` from ten thousand, `k` from one thousand.
///
/// `digits` is the number of decimals kept after scaling. Smaller values are
/// printed as-is; unreadable input renders as `0`.
pub fn format_number<N: NumericInput>(num: N, digits: usize) -> String {
    let Some(n) = num.to_number() else {
        return "0".to_string();
    };

    if n >= 10_000.0 {
        format!("{:.prec$}万", round_half_away(n / 10_000.0, digits), prec = digits)
    } else if n >= 1_000.0 {
        format!("{:.prec$}k", round_half_away(n / 1_000.0, digits), prec = digits)
    } else {
        format!("{}", n)
    }
}

/// Human-readable byte size with base-1024 units and at most two decimals.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut scaled = bytes as f64;
    let mut exponent = 0;
    while scaled >= 1024.0 && exponent < UNITS.len() - 1 {
        scaled /= 1024.0;
        exponent += 1;
    }
    let rounded = (scaled * 100.0).round() / 100.0;

    format!("{} {}", rounded, UNITS[exponent])
}

/// Render a free-text description for HTML: newlines become `<br>` and runs
/// of whitespace collapse to one space.
pub fn format_description(description: &str) -> String {
    let with_breaks = description.replace('\n', "<br>");
    let mut out = String::with_capacity(with_breaks.len());
    let mut in_space = false;
    for ch in with_breaks.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}
