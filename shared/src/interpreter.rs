//! Free-text order message interpreter
//!
//! Turns a chat message such as "キャベツ 10個" into a product name and a
//! quantity. Three patterns are tried in a fixed order and the first one that
//! yields a result wins:
//!
//! 1. `<product><optional whitespace><digits><optional 個>`
//! 2. `<product><whitespace><digits>`
//! 3. `<product><digits>`
//!
//! The product capture is lazy, so the split happens at the first digit run
//! that lets the rest of the pattern match. Product names that contain digits
//! themselves are split there as well ("商品A1 10" reads as 商品A × 1).
//!
//! Character classes follow the rules of the message formats this parser was
//! first written against: `.` stops at line terminators, digits are ASCII
//! only, and whitespace includes the ideographic space and U+FEFF.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Any character except a line terminator
const ANY_CHAR: &str = r"[^\n\r\x{2028}\x{2029}]";

/// Whitespace and line terminators
const WHITESPACE: &str =
    r"[\t\n\x{0B}\x{0C}\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}]";

/// ASCII decimal digit
const DIGIT: &str = "[0-9]";

/// Unit marker accepted after the quantity in pattern A
pub const ITEM_UNIT_MARKER: char = '個';

static PATTERN_A: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "({ANY_CHAR}+?){WHITESPACE}*({DIGIT}+){ITEM_UNIT_MARKER}?"
    ))
    .expect("valid order pattern A")
});

static PATTERN_B: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("({ANY_CHAR}+?){WHITESPACE}+({DIGIT}+)"))
        .expect("valid order pattern B")
});

static PATTERN_C: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("({ANY_CHAR}+?)({DIGIT}+)")).expect("valid order pattern C")
});

/// A matcher tries one pattern against a message
pub type OrderMatcher = fn(&str) -> Option<ParsedOrderIntent>;

/// Matchers in precedence order. The first `Some` wins.
pub const ORDER_MATCHERS: [(&str, OrderMatcher); 3] = [
    ("unit_marker", match_pattern_a),
    ("whitespace_separated", match_pattern_b),
    ("adjacent", match_pattern_c),
];

/// A message as delivered by the chat transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    pub sender_id: String,
    pub text: String,
    pub received_at: DateTime<Utc>,
}

impl RawMessage {
    pub fn new(sender_id: impl Into<String>, text: impl Into<String>, received_at: DateTime<Utc>) -> Self {
        Self {
            sender_id: sender_id.into(),
            text: text.into(),
            received_at,
        }
    }
}

/// Product and quantity recognized in a message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedOrderIntent {
    /// Product name as written by the sender, trimmed
    pub product_text: String,
    pub quantity: u64,
}

/// Interpret a message as an order.
///
/// Returns `None` when no pattern produces a product and a quantity. That is
/// the normal outcome for greetings and questions, not an error.
pub fn interpret(text: &str) -> Option<ParsedOrderIntent> {
    ORDER_MATCHERS.iter().find_map(|(_, matcher)| matcher(text))
}

/// Same as [`interpret`], also reporting which matcher produced the result
pub fn interpret_with_matcher(text: &str) -> Option<(&'static str, ParsedOrderIntent)> {
    ORDER_MATCHERS
        .iter()
        .find_map(|(name, matcher)| matcher(text).map(|intent| (*name, intent)))
}

/// Pattern A: product, optional whitespace, digits, optional 個
pub fn match_pattern_a(text: &str) -> Option<ParsedOrderIntent> {
    PATTERN_A.captures(text).and_then(intent_from_captures)
}

/// Pattern B: product, mandatory whitespace, digits
pub fn match_pattern_b(text: &str) -> Option<ParsedOrderIntent> {
    PATTERN_B.captures(text).and_then(intent_from_captures)
}

/// Pattern C: product immediately followed by digits
pub fn match_pattern_c(text: &str) -> Option<ParsedOrderIntent> {
    PATTERN_C.captures(text).and_then(intent_from_captures)
}

fn intent_from_captures(caps: Captures<'_>) -> Option<ParsedOrderIntent> {
    let product = caps.get(1)?.as_str();
    // Only digit runs beyond u64 fail here; the next pattern then gets a turn
    let quantity = caps.get(2)?.as_str().parse::<u64>().ok()?;

    Some(ParsedOrderIntent {
        product_text: trim_message_whitespace(product).to_string(),
        quantity,
    })
}

/// Whether `c` counts as whitespace for message parsing
pub fn is_message_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{0B}'
            | '\u{0C}'
            | '\r'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Trim leading and trailing message whitespace
pub fn trim_message_whitespace(s: &str) -> &str {
    s.trim_matches(is_message_whitespace)
}
