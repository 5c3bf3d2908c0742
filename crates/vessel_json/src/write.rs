//! JSON serialization.
//!
//! Two passes over the value: [`encoded_len`] measures the exact output size,
//! then [`write_value`] fills a buffer allocated once at that size. Both
//! passes walk containers through [`ValueIter::next_entry`], so nothing is
//! copied along the way.
//!
//! Strings escape only backslash, newline, double quote and tab; every other
//! codepoint is written as-is. Map records appear in the table's slot order.

use tracing::{trace, Span};
use vessel_value::{ensure_sufficient_stack, text, Entry, Value, ValueIter};

use crate::config::JsonConfig;
use crate::float::format_float;

/// Serialize `value` to compact JSON.
///
/// # Panics
///
/// When `pretty` is `true`, or when `value` holds a NaN or infinite float.
pub fn to_json(value: &Value, pretty: bool) -> String {
    to_json_with(value, &JsonConfig { pretty })
}

/// Serialize `value` according to `config`.
///
/// # Panics
///
/// When `config.pretty` is set, or when `value` holds a NaN or infinite
/// float.
#[tracing::instrument(level = "trace", skip_all, fields(len = tracing::field::Empty))]
pub fn to_json_with(value: &Value, config: &JsonConfig) -> String {
    assert!(!config.pretty, "pretty JSON output is not supported");
    let len = encoded_len(value);
    Span::current().record("len", len);
    let mut out = String::with_capacity(len);
    write_value(value, &mut out);
    debug_assert_eq!(out.len(), len, "length pass disagrees with write pass");
    trace!("serialized value");
    out
}

/// The two-character escape for `c`, if it needs one.
#[inline]
fn escape(c: char) -> Option<&'static str> {
    match c {
        '\\' => Some("\\\\"),
        '\n' => Some("\\n"),
        '"' => Some("\\\""),
        '\t' => Some("\\t"),
        _ => None,
    }
}

/// Decimal digits (plus sign) needed for `n`.
fn int_len(n: i64) -> usize {
    let sign = usize::from(n < 0);
    let digits = n.unsigned_abs().checked_ilog10().map_or(1, |log| log as usize + 1);
    sign + digits
}

fn string_len(s: &str) -> usize {
    let mut len = 2;
    let mut pos = 0;
    while let Some(c) = text::next_codepoint(s, &mut pos) {
        len += escape(c).map_or_else(|| text::encoded_len(c), str::len);
    }
    len
}

fn encoded_len(value: &Value) -> usize {
    ensure_sufficient_stack(|| match value {
        Value::None | Value::Bool(true) => 4,
        Value::Bool(false) => 5,
        Value::Int(n) => int_len(*n),
        Value::Float(f) => format_float(*f).len(),
        Value::Str(s) => string_len(s),
        Value::List(_) | Value::Map(_) => {
            let mut items = value.iter();
            let mut len = 2;
            let mut first = true;
            while let Some(entry) = items.next_entry() {
                if !first {
                    len += 1;
                }
                first = false;
                len += match entry {
                    Entry::Element(item) => encoded_len(item),
                    Entry::Pair(key, item) => encoded_len(key) + 1 + encoded_len(item),
                };
            }
            len
        }
    })
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    let mut pos = 0;
    while let Some(c) = text::next_codepoint(s, &mut pos) {
        match escape(c) {
            Some(escaped) => out.push_str(escaped),
            None => text::push_codepoint(out, c),
        }
    }
    out.push('"');
}

fn write_items(mut items: ValueIter<'_>, open: char, close: char, out: &mut String) {
    out.push(open);
    let mut first = true;
    while let Some(entry) = items.next_entry() {
        if !first {
            out.push(',');
        }
        first = false;
        match entry {
            Entry::Element(item) => write_value(item, out),
            Entry::Pair(key, item) => {
                write_value(key, out);
                out.push(':');
                write_value(item, out);
            }
        }
    }
    out.push(close);
}

fn write_value(value: &Value, out: &mut String) {
    ensure_sufficient_stack(|| match value {
        Value::None => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Int(n) => out.push_str(&n.to_string()),
        Value::Float(f) => out.push_str(&format_float(*f)),
        Value::Str(s) => write_string(s, out),
        Value::List(_) => write_items(value.iter(), '[', ']', out),
        Value::Map(_) => write_items(value.iter(), '{', '}', out),
    });
}
