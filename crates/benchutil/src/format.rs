// Copyright 2025-2026, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE.md

use std::time::Duration;

/// Seconds with one decimal and an `s` suffix, e.g. `12.3s`.
pub fn seconds(span: Duration) -> String {
    format!("{:.1}s", span.as_secs_f64())
}

/// Inverse of [`seconds`]. Accepts a bare number as well.
pub fn parse_seconds(text: &str) -> Option<Duration> {
    let text = text.trim();
    let number = text.strip_suffix('s').unwrap_or(text);
    let secs: f64 = number.trim().parse().ok()?;
    if !secs.is_finite() || secs < 0. {
        return None;
    }
    Some(Duration::from_secs_f64(secs))
}
