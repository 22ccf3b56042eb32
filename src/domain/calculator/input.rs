//! Bounded numeric input validation.
//!
//! Pure functions: an edit surface feeds keystrokes, change events, and
//! clipboard text through here and commits whatever survives. Nothing in this
//! module owns state.

use crate::shared::{format_amount, parse_amount, round_amount};
use rust_decimal::Decimal;

/// Per-field constraints for input validation.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRules {
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
    /// Allowed fractional digits. `None` (or zero) forbids the decimal
    /// separator entirely.
    pub decimal_limit: Option<u32>,
    pub disabled: bool,
}

/// A normalized keystroke. Locale comma and period both map to `Separator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A digit 0–9.
    Digit(u8),
    Separator,
    Backspace,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Tab,
    /// Anything else — always suppressed.
    Other(char),
}

/// Outcome of a keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyVerdict {
    /// The key produces a whole new value immediately (arrow step,
    /// leading-zero replacement, separator append).
    Commit(String),
    /// Let the edit surface apply the key to its text; the resulting text
    /// goes through [`apply_change`].
    Admit,
    /// Suppress the keystroke.
    Reject,
}

/// Outcome of a proposed text change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeVerdict {
    /// Propagate the new value to committed state.
    Commit(String),
    /// Keep as transient display text (user cleared the field mid-edit);
    /// do not commit upstream.
    Hold(String),
    Reject,
}

/// Validate a single keystroke against the current text.
pub fn apply_key(current: &str, key: Key, rules: &InputRules) -> KeyVerdict {
    if rules.disabled {
        return KeyVerdict::Reject;
    }

    match key {
        // Typing over a lone leading zero: "0" + "5" → "5", "0" + "0" → no-op.
        Key::Digit(0) if current == "0" => KeyVerdict::Reject,
        Key::Digit(d) if current == "0" => {
            debug_assert!(d <= 9);
            KeyVerdict::Commit(d.to_string())
        }
        Key::Digit(d) => {
            debug_assert!(d <= 9);
            KeyVerdict::Admit
        }

        // Arrow stepping: exact decimal add/subtract, bound-checked, committed
        // without a further validation pass.
        Key::ArrowUp => match parse_amount(current) {
            Some(value) if value + rules.step <= rules.max => {
                KeyVerdict::Commit(format_amount(value + rules.step))
            }
            _ => KeyVerdict::Reject,
        },
        Key::ArrowDown => match parse_amount(current) {
            Some(value) if value - rules.step >= rules.min => {
                KeyVerdict::Commit(format_amount(value - rules.step))
            }
            _ => KeyVerdict::Reject,
        },

        Key::Separator => {
            if rules.decimal_limit.unwrap_or(0) == 0 {
                return KeyVerdict::Reject;
            }
            if current.is_empty() || current.contains('.') || current.contains(',') {
                return KeyVerdict::Reject;
            }
            KeyVerdict::Commit(format!("{current}."))
        }

        Key::Backspace | Key::ArrowLeft | Key::ArrowRight | Key::Tab => KeyVerdict::Admit,
        Key::Other(_) => KeyVerdict::Reject,
    }
}

/// Validate a proposed replacement text (change event, programmatic edit).
pub fn apply_change(current: &str, proposed: &str, rules: &InputRules) -> ChangeVerdict {
    if rules.disabled {
        return ChangeVerdict::Reject;
    }

    // Fractional-length cap gates further typing, not deletion.
    if let Some(limit) = rules.decimal_limit {
        if proposed.len() > current.len() && fractional_len(proposed) > limit {
            return ChangeVerdict::Reject;
        }
    }

    match parse_amount(proposed) {
        None if proposed.trim().is_empty() => ChangeVerdict::Hold(String::new()),
        None => ChangeVerdict::Reject,
        Some(value) if value < rules.min || value > rules.max => ChangeVerdict::Reject,
        Some(_) => ChangeVerdict::Commit(proposed.to_string()),
    }
}

/// Validate pasted clipboard text through the same acceptance pipeline.
pub fn apply_paste(current: &str, pasted: &str, rules: &InputRules) -> ChangeVerdict {
    let trimmed = pasted.trim();
    if parse_amount(trimmed).is_none() {
        return ChangeVerdict::Reject;
    }
    apply_change(current, trimmed, rules)
}

/// Blur-time normalization: clamp into `[min, max]`, round to the decimal
/// limit, and return the value to display. Unparseable text resets to the
/// minimum bound.
pub fn settle(current: &str, rules: &InputRules) -> String {
    let value = match parse_amount(current) {
        Some(v) => v.clamp(rules.min, rules.max),
        None => rules.min,
    };
    let rounded = match rules.decimal_limit {
        Some(dp) => round_amount(value, dp),
        None => value,
    };
    format_amount(rounded)
}

fn fractional_len(text: &str) -> u32 {
    match text.rfind(['.', ',']) {
        Some(pos) => (text.len() - pos - 1) as u32,
        None => 0,
    }
}
