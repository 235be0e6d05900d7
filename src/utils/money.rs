use crate::error::{AppError, AppResult};

/// Highest accepted tour price: 1 000 000 000.00.
pub const MAX_PRICE_CENTS: i64 = 100_000_000_000;

/// Parses a decimal amount ("1500", "1500.5", "1500.50") into minor units.
/// At most two fraction digits; no sign.
pub fn parse_cents(input: &str) -> Option<i64> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let (whole, frac) = match input.split_once(|c: char| c == '.' || c == ',') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if frac.len() > 2
        || !whole.chars().all(|c| c.is_ascii_digit())
        || !frac.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let frac: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().ok()? * 10,
        _ => frac.parse().ok()?,
    };
    whole.checked_mul(100)?.checked_add(frac)
}

/// Required, non-negative price field, capped at [`MAX_PRICE_CENTS`].
pub fn parse_price(input: &str) -> AppResult<i64> {
    let cents = parse_cents(input).ok_or_else(|| {
        AppError::ValidationError("Price must be a non-negative number".to_string())
    })?;
    if cents > MAX_PRICE_CENTS {
        return Err(AppError::ValidationError(format!(
            "Price must not exceed {}",
            format_cents(MAX_PRICE_CENTS)
        )));
    }
    Ok(cents)
}

/// Which side of a price range a search bound sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Upper,
}

/// Search bound from any decimal number ("-1", "2000.999", "1e3").
/// Fractions of a cent round up for a lower bound and down for an upper one.
/// `None` only when the input is not a finite number.
pub fn parse_bound_cents(input: &str, bound: Bound) -> Option<i64> {
    let value: f64 = input.trim().replace(',', ".").parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let scaled = value * 100.0;
    let nearest = scaled.round();
    // absorb binary noise such as 19.99 * 100 = 1998.9999999999998
    let cents = if (scaled - nearest).abs() < 1e-6 {
        nearest
    } else {
        match bound {
            Bound::Lower => scaled.ceil(),
            Bound::Upper => scaled.floor(),
        }
    };
    // `as` saturates at the i64 range
    Some(cents as i64)
}

pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}
