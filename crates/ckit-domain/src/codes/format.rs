//! printf-style message formatting
//!
//! Supports `%s`, `%d`, `%i`, `%f`, `%j` and `%%`. Placeholders without a
//! matching argument are kept verbatim; surplus arguments are appended,
//! separated by spaces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A positional argument for a message template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageArg {
    /// Integer argument
    Int(i64),
    /// Floating point argument
    Float(f64),
    /// String argument
    Str(String),
}

impl MessageArg {
    fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            #[allow(clippy::cast_possible_truncation)]
            Self::Float(v) if v.is_finite() => Some(v.trunc() as i64),
            Self::Float(_) => None,
            Self::Str(s) => leading_integer(s),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Str(s) => s.trim().parse::<f64>().ok(),
        }
    }

    fn to_json(&self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Str(s) => serde_json::Value::String(s.clone()).to_string(),
        }
    }
}

impl fmt::Display for MessageArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MessageArg {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for MessageArg {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for MessageArg {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for MessageArg {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for MessageArg {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for MessageArg {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let trimmed = s.trim_start();
    let end = trimmed
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+')))
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    trimmed[..end].parse().ok()
}

fn number_or_nan(value: Option<String>) -> String {
    value.unwrap_or_else(|| "NaN".to_string())
}

/// Substitute `args` into `template` positionally
pub fn format_message(template: &str, args: &[MessageArg]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut remaining = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let Some(&conv) = chars.peek() else {
            out.push('%');
            break;
        };
        if conv == '%' {
            chars.next();
            out.push('%');
            continue;
        }
        if !matches!(conv, 's' | 'd' | 'i' | 'f' | 'j') {
            out.push('%');
            continue;
        }
        chars.next();
        let Some(arg) = remaining.next() else {
            out.push('%');
            out.push(conv);
            continue;
        };
        let rendered = match conv {
            's' => arg.to_string(),
            'd' => number_or_nan(arg.as_number().map(|n| MessageArg::Float(n).to_string())),
            'i' => number_or_nan(arg.as_integer().map(|n| n.to_string())),
            'f' => number_or_nan(arg.as_number().map(|n| n.to_string())),
            _ => arg.to_json(),
        };
        out.push_str(&rendered);
    }

    for arg in remaining {
        out.push(' ');
        out.push_str(&arg.to_string());
    }
    out
}
