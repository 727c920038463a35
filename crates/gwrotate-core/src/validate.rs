// ── Configuration validation ──
//
// The single batched validation boundary: every defect is collected before
// the caller decides to abort. Everything downstream is fail-fast.

use std::fmt;
use std::time::Duration;

use crate::config::{RawRotationConfig, RotationConfig, Subnet};

const OCTET_MIN: i64 = 1;
const OCTET_MAX: i64 = 254;
const ATTEMPTS_MIN: i64 = 1;
const ATTEMPTS_MAX: i64 = 50;

/// Ordered, append-only list of human-readable validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    pub fn push(&mut self, error: impl Into<String>) {
        self.0.push(error.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// One error per line, numbered from 1.
impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            writeln!(f, "{}. {err}", i + 1)?;
        }
        Ok(())
    }
}

pub(crate) fn validate(raw: &RawRotationConfig) -> Result<RotationConfig, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let subnet = parse_subnet(&raw.subnet, &mut errors);
    let bounds = check_bounds(raw.low, raw.high, &mut errors);

    let max_attempts = if (ATTEMPTS_MIN..=ATTEMPTS_MAX).contains(&raw.max_attempts) {
        u32::try_from(raw.max_attempts).ok()
    } else {
        errors.push(format!(
            "max attempts {} is outside {ATTEMPTS_MIN}-{ATTEMPTS_MAX}",
            raw.max_attempts
        ));
        None
    };

    let reconnect_delay = parse_reconnect_delay(&raw.reconnect_delay);
    if reconnect_delay.is_none() {
        errors.push(format!(
            "reconnect delay '{}' must be a positive number followed by s, m, h or d",
            raw.reconnect_delay
        ));
    }

    for (role, address) in [("recipient", &raw.notify_to), ("sender", &raw.notify_from)] {
        if let Some(address) = address.as_deref().filter(|s| !s.is_empty()) {
            if !is_email_shaped(address) {
                errors.push(format!(
                    "notification {role} '{address}' is not a valid e-mail address"
                ));
            }
        }
    }

    if raw.rule_comment.trim().is_empty() {
        errors.push("rule comment must not be empty");
    }
    if raw.anchor_comment.trim().is_empty() {
        errors.push("anchor comment must not be empty");
    }
    if !raw.rule_comment.is_empty() && raw.rule_comment == raw.anchor_comment {
        errors.push(format!(
            "rule comment and anchor comment must differ (both '{}')",
            raw.rule_comment
        ));
    }

    match (subnet, bounds, max_attempts, reconnect_delay) {
        (Some(subnet), Some((low, high)), Some(max_attempts), Some(reconnect_delay))
            if errors.is_empty() =>
        {
            Ok(RotationConfig {
                subnet,
                low,
                high,
                max_attempts,
                reconnect_delay,
                notify: raw.notify_targets(),
                rule_comment: raw.rule_comment.clone(),
                anchor_comment: raw.anchor_comment.clone(),
            })
        }
        _ => Err(errors),
    }
}

/// Split on `.` and check each segment, reporting every defect found in one
/// left-to-right pass.
fn parse_subnet(input: &str, errors: &mut ValidationErrors) -> Option<Subnet> {
    let segments: Vec<&str> = input.split('.').collect();
    let mut valid = true;

    if segments.len() != 3 {
        errors.push(format!(
            "subnet '{input}': expected 3 octets, found {}",
            segments.len()
        ));
        valid = false;
    }

    let mut octets = Vec::with_capacity(3);
    for (i, segment) in segments.iter().enumerate() {
        let position = i + 1;
        if segment.is_empty() {
            errors.push(format!("subnet '{input}': octet {position} is empty"));
            valid = false;
        } else if !segment.bytes().all(|b| b.is_ascii_digit()) {
            errors.push(format!(
                "subnet '{input}': octet {position} ('{segment}') is not a number"
            ));
            valid = false;
        } else {
            match segment.parse::<i64>() {
                Ok(value) if (OCTET_MIN..=OCTET_MAX).contains(&value) => {
                    octets.push(u8::try_from(value).ok()?);
                }
                _ => {
                    errors.push(format!(
                        "subnet '{input}': octet {position} ({segment}) is outside {OCTET_MIN}-{OCTET_MAX}"
                    ));
                    valid = false;
                }
            }
        }
    }

    if !valid {
        return None;
    }
    let octets: [u8; 3] = octets.try_into().ok()?;
    Some(Subnet::new(octets))
}

fn check_bounds(low: i64, high: i64, errors: &mut ValidationErrors) -> Option<(u8, u8)> {
    let low_ok = (OCTET_MIN..=OCTET_MAX).contains(&low);
    let high_ok = (OCTET_MIN..=OCTET_MAX).contains(&high);

    if !low_ok {
        errors.push(format!("low bound {low} is outside {OCTET_MIN}-{OCTET_MAX}"));
    }
    if !high_ok {
        errors.push(format!("high bound {high} is outside {OCTET_MIN}-{OCTET_MAX}"));
    }
    if high <= low {
        errors.push(format!(
            "high bound ({high}) must be greater than low bound ({low})"
        ));
        return None;
    }
    if !(low_ok && high_ok) {
        return None;
    }
    Some((u8::try_from(low).ok()?, u8::try_from(high).ok()?))
}

/// Parse `<positive number><s|m|h|d>`, e.g. `30s`, `2m`, `1.5h`.
pub fn parse_reconnect_delay(input: &str) -> Option<Duration> {
    let unit = input.chars().last()?;
    let multiplier = match unit {
        's' => 1.0,
        'm' => 60.0,
        'h' => 3_600.0,
        'd' => 86_400.0,
        _ => return None,
    };
    let number = &input[..input.len() - 1];

    let mut parts = number.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next();
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(whole) || fraction.is_some_and(|f| !digits(f)) {
        return None;
    }

    let value: f64 = number.parse().ok()?;
    if value <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(value * multiplier).ok()
}

/// Structural `local@domain.tld` check: an `@` that is not the first
/// character, followed by a `.` that neither directly follows the `@` nor
/// sits within the last two characters.
pub fn is_email_shaped(address: &str) -> bool {
    let Some(at) = address.find('@') else {
        return false;
    };
    if at == 0 || address[at + 1..].contains('@') {
        return false;
    }
    let len = address.len();
    address[at + 1..]
        .match_indices('.')
        .map(|(offset, _)| at + 1 + offset)
        .any(|dot| dot != at + 1 && dot + 2 < len)
}
