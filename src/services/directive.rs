//! Directive parser & reconciler: turns raw model output into display text
//! plus validated cart directives.
//!
//! DESIGN
//! ======
//! The model is asked to embed cart instructions in a delimited block:
//!
//! ```text
//! [CART_ACTION]
//! ADD|<item id>|<item name>|<quantity>
//! REMOVE|<item id>|<item name>|<quantity>
//! [/CART_ACTION]
//! ```
//!
//! Decoding is a tolerant line-oriented pass:
//! 1. `<think>...</think>` spans are removed everywhere (non-greedy) first.
//! 2. Only the first block is decoded and removed; any later block stays in
//!    the display text verbatim.
//! 3. A line becomes a directive iff it has exactly four `|`-separated fields,
//!    the first is `ADD` or `REMOVE`, and the id resolves in the catalog.
//!    Anything else is dropped without error.
//! 4. Quantity is the leading run of digits; zero or unparseable means 1.
//!
//! `parse_reply` never fails. Only the model call itself can fail a request.

use std::sync::LazyLock;

use protocol::{CartAction, CartDirective, MenuItem};
use regex::Regex;
use tracing::debug;

use super::catalog::find_item;

pub const BLOCK_OPEN: &str = "[CART_ACTION]";
pub const BLOCK_CLOSE: &str = "[/CART_ACTION]";
pub const FIELD_SEPARATOR: char = '|';

/// Shown instead of a blank assistant turn.
pub const FALLBACK_NOTICE: &str = "Permintaan Anda telah diproses.";

static THINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("think pattern is valid"));

static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\[CART_ACTION\](.*?)\[/CART_ACTION\]").expect("block pattern is valid")
});

/// Parsed model reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReply {
    /// Never empty.
    pub display_text: String,
    /// Validated directives in source line order, duplicates kept.
    pub actions: Vec<CartDirective>,
}

/// Remove every `<think>...</think>` span.
///
/// Repeats until no span is left, so spans that only appear after an inner
/// removal are stripped too and a second call is always a no-op.
#[must_use]
pub fn strip_think(text: &str) -> String {
    let mut current = text.to_owned();
    while THINK_RE.is_match(&current) {
        current = THINK_RE.replace_all(&current, "").into_owned();
    }
    current
}

/// Decode a raw model reply against the catalog.
#[must_use]
pub fn parse_reply(raw: &str, catalog: &[MenuItem]) -> ParsedReply {
    let cleaned = strip_think(raw);

    let (actions, remaining) = match BLOCK_RE.captures(&cleaned) {
        Some(caps) => {
            let (whole_start, whole_end) = caps.get(0).map_or((0, 0), |m| (m.start(), m.end()));
            let body = caps.get(1).map_or("", |m| m.as_str());
            let actions = decode_block(body, catalog);
            let mut remaining = String::with_capacity(cleaned.len());
            remaining.push_str(&cleaned[..whole_start]);
            remaining.push_str(&cleaned[whole_end..]);
            (actions, remaining)
        }
        None => (Vec::new(), cleaned.clone()),
    };

    let trimmed = remaining.trim();
    let display_text = if trimmed.is_empty() { FALLBACK_NOTICE.to_owned() } else { trimmed.to_owned() };

    ParsedReply { display_text, actions }
}

/// Decode every line of a block body, dropping invalid lines.
fn decode_block(body: &str, catalog: &[MenuItem]) -> Vec<CartDirective> {
    let mut actions = Vec::new();
    for line in body.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match decode_line(line, catalog) {
            Some(directive) => actions.push(directive),
            None => debug!(line = line.trim(), "directive: dropped invalid line"),
        }
    }
    actions
}

/// Decode one `ACTION|ID|NAME|QTY` line. `None` for anything malformed or
/// referencing an unknown item.
#[must_use]
pub fn decode_line(line: &str, catalog: &[MenuItem]) -> Option<CartDirective> {
    let fields: Vec<&str> = line.trim().split(FIELD_SEPARATOR).map(str::trim).collect();
    let [action, item_id, _name, quantity] = fields.as_slice() else {
        return None;
    };

    let action = action.parse::<CartAction>().ok()?;
    let item = find_item(catalog, item_id)?;

    Some(CartDirective {
        action,
        item_id: item.id.clone(),
        name: item.name.clone(),
        price: item.price,
        quantity: parse_quantity(quantity),
    })
}

/// Leading decimal digits as a positive integer; 1 on anything else.
#[must_use]
pub fn parse_quantity(raw: &str) -> u32 {
    let trimmed = raw.trim();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    match trimmed[..digits_end].parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => 1,
    }
}

/// Render one directive line in the block grammar.
#[must_use]
pub fn format_line(action: CartAction, item_id: &str, name: &str, quantity: u32) -> String {
    format!("{action}{FIELD_SEPARATOR}{item_id}{FIELD_SEPARATOR}{name}{FIELD_SEPARATOR}{quantity}")
}

/// Wrap directive lines in block delimiters.
#[must_use]
pub fn format_block(lines: &[String]) -> String {
    format!("{BLOCK_OPEN}\n{}\n{BLOCK_CLOSE}", lines.join("\n"))
}

#[cfg(test)]
#[path = "directive_test.rs"]
mod tests;
