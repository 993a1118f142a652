//! Duration parsing for NIS values such as `46.5 Minutes` or `0 seconds`.

use std::time::Duration;

use crate::error::{DecodeError, DurationError};

const NANOS_PER_MICRO: f64 = 1_000.0;
const NANOS_PER_MILLI: f64 = 1_000_000.0;
const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Parses a NIS duration value: a number, one space, and a unit word.
///
/// `minutes` and `seconds` are normalized case-insensitively; any other unit
/// word is handed to [`parse_compact`] unchanged.
pub fn parse_nis_duration(value: &str) -> Result<Duration, DecodeError> {
    let Some((num, unit)) = value.split_once(' ') else {
        return Err(DecodeError::InvalidDuration(value.to_string()));
    };

    let unit = match unit.to_ascii_lowercase().as_str() {
        "minutes" => "m",
        "seconds" => "s",
        _ => unit,
    };

    Ok(parse_compact(&format!("{num}{unit}"))?)
}

/// Parses a compact duration such as `1h30m`, `10.5m` or `250ms`.
///
/// The input is one or more `<number><unit>` pairs. Numbers may carry a
/// fractional part. Units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`.
pub fn parse_compact(input: &str) -> Result<Duration, DurationError> {
    if input.is_empty() {
        return Err(DurationError::Empty);
    }
    if input.starts_with('-') {
        return Err(DurationError::Negative(input.to_string()));
    }

    let mut rest = input.strip_prefix('+').unwrap_or(input);
    if rest == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total_nanos: f64 = 0.0;
    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (num, tail) = rest.split_at(num_len);
        if num.is_empty() || num == "." || num.matches('.').count() > 1 {
            return Err(DurationError::InvalidNumber(input.to_string()));
        }

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        if unit.is_empty() {
            return Err(DurationError::MissingUnit(input.to_string()));
        }

        let scale = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;
        let value: f64 = num
            .parse()
            .map_err(|_| DurationError::InvalidNumber(input.to_string()))?;

        total_nanos += value * scale;
        rest = tail;
    }

    if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
        return Err(DurationError::Overflow(input.to_string()));
    }

    Ok(Duration::from_nanos(total_nanos.round() as u64))
}

fn unit_nanos(unit: &str) -> Option<f64> {
    match unit {
        "ns" => Some(1.0),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60.0 * NANOS_PER_SEC),
        "h" => Some(3_600.0 * NANOS_PER_SEC),
        _ => None,
    }
}
