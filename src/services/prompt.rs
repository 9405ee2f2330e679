//! Prompt composer: builds the single text blob sent to the model.
//!
//! Layout, in fixed order:
//! 1. persona/language preamble
//! 2. catalog listing (id, name, description, price, calories, category)
//! 3. cart directive instructions
//! 4. prior turns as `Human:` / `Assistant:` lines (continuations only)
//! 5. the new human turn, followed by an open `Assistant:` cue
//!
//! `compose` is a pure function of its arguments: the same inputs always
//! produce byte-identical output. Each request builds its own prompt value;
//! nothing here is shared between requests.

use protocol::{CartAction, ChatMessage, MenuItem, Role};

use super::conversation::CONTEXT_WINDOW;
use super::directive::{format_block, format_line};

const PREAMBLE: &str = "Jawab menggunakan bahasa indonesia. Anda adalah asisten AI untuk sebuah website \
     bernama vegan jatim. Anda memiliki akses ke database menu item di bawah ini, dan Anda harus \
     menggunakan informasi ini untuk menjawab pertanyaan tentang menu dan memberikan rekomendasi, \
     atau membantu dengan pesanan.";

const EMPTY_MENU: &str = "(the menu is currently empty)";

/// Compose the full model prompt for one chat turn.
///
/// `recent` is the tail of the current session *before* the new prompt; only
/// its last [`CONTEXT_WINDOW`] messages are rendered, and only when
/// `is_continuation` is set.
#[must_use]
pub fn compose(catalog: &[MenuItem], recent: &[ChatMessage], prompt: &str, is_continuation: bool) -> String {
    let mut out = String::with_capacity(4096);

    out.push_str(PREAMBLE);
    out.push_str("\n\nMENU ITEMS DATABASE:\n");
    out.push_str(&render_catalog(catalog));
    out.push_str("\n\n");
    out.push_str(&cart_instructions());
    out.push_str("\n\n");

    if is_continuation {
        out.push_str("This is a continuation of a conversation. Previous messages:\n\n");
        out.push_str(&render_history(recent));
        out.push_str("\n\n");
    }

    out.push_str("Human: ");
    out.push_str(prompt);
    out.push_str("\n\nAssistant:");
    out
}

/// Serialize the catalog, one block per item, blank line between items.
pub(crate) fn render_catalog(catalog: &[MenuItem]) -> String {
    if catalog.is_empty() {
        return EMPTY_MENU.to_owned();
    }

    catalog
        .iter()
        .map(|item| {
            format!(
                "Item ID: {}\nItem: {}\nDescription: {}\nPrice: ${:.2}\nCalories: {}\nCategory: {}",
                item.id,
                item.name,
                item.description,
                item.price,
                item.calories,
                item.category.as_str(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render the trailing window of prior turns.
pub(crate) fn render_history(recent: &[ChatMessage]) -> String {
    let window = usize::try_from(CONTEXT_WINDOW).unwrap_or(usize::MAX);
    let start = recent.len().saturating_sub(window);

    recent[start..]
        .iter()
        .map(|msg| {
            let speaker = match msg.role {
                Role::User => "Human",
                Role::Ai | Role::System => "Assistant",
            };
            format!("{speaker}: {}", msg.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The fixed directive grammar handed to the model.
pub(crate) fn cart_instructions() -> String {
    let add = CartAction::Add.as_str();
    let remove = CartAction::Remove.as_str();
    let add_block = format_block(&[format!("{add}|ITEM_ID|ITEM_NAME|QUANTITY")]);
    let remove_block = format_block(&[format!("{remove}|ITEM_ID|ITEM_NAME|QUANTITY")]);
    format!(
        "IMPORTANT CART INSTRUCTIONS:\n\
         When a user asks to add or remove items from their cart, you should:\n\
         1. Identify the menu items they want to add/remove\n\
         2. Include a special CART_ACTION section in your response\n\
         3. Format it exactly like this:\n\n\
         {add_block}\n\n\
         {remove_block}\n\n\
         Examples:\n\
         - If user says \"add 2 coffee to cart\": {}\n\
         - If user says \"remove 1 pizza from cart\": {}\n\n\
         Use the exact Item ID from the menu database above.\n\
         Multiple actions can be included by using multiple {add}/{remove} lines inside one section.\n\
         QUANTITY must be a positive whole number.\n\n\
         IMPORTANT: If a user asks for an item that is NOT in the menu, politely explain that the item \
         is not available and suggest similar items from the menu instead. Do NOT include CART_ACTION \
         for unavailable items.",
        format_line(CartAction::Add, "COFFEE_ITEM_ID", "Iced Coffee", 2),
        format_line(CartAction::Remove, "PIZZA_ITEM_ID", "Margherita Pizza", 1),
    )
}

#[cfg(test)]
#[path = "prompt_test.rs"]
mod tests;
