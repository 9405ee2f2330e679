//! Cart state machine: the client-held mapping from item id to quantity.
//!
//! DESIGN
//! ======
//! The cart lives only for one `chat` session; nothing is sent back to the
//! server. Two kinds of input mutate it:
//! - validated directives returned by `POST /api/consult`
//! - `/add` and `/remove` typed by the user, one [`UNIT_STEP`] at a time
//!
//! An entry whose quantity would drop to zero (or below) is removed, so every
//! stored entry has quantity >= 1.

use std::collections::BTreeMap;
use std::fmt;

use protocol::{CartAction, CartDirective, MenuItem};

/// Quantity changed by one manual `/add` or `/remove`.
pub const UNIT_STEP: u32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct CartEntry {
    /// Menu snapshot taken when the entry was created.
    pub item: MenuItem,
    pub quantity: u32,
}

/// What a single transition did, for display in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartNotice {
    Added { name: String, quantity: u32 },
    Removed { name: String, quantity: u32, remaining: u32 },
    RemovedAll { name: String },
    NotInCart { name: String },
    NotOnMenu { item_id: String },
}

impl fmt::Display for CartNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { name, quantity } => write!(f, "Added {quantity}x {name} to your cart"),
            Self::Removed { name, quantity, remaining } => {
                write!(f, "Removed {quantity}x {name} from your cart ({remaining} remaining)")
            }
            Self::RemovedAll { name } => write!(f, "Removed all {name} from your cart"),
            Self::NotInCart { name } => write!(f, "{name} is not in your cart"),
            Self::NotOnMenu { item_id } => write!(f, "{item_id} is not on the menu"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Cart {
    entries: BTreeMap<String, CartEntry>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increase the entry for `item` by `quantity`, creating it if absent.
    pub fn apply_add(&mut self, item: &MenuItem, quantity: u32) -> CartNotice {
        let entry = self
            .entries
            .entry(item.id.clone())
            .or_insert_with(|| CartEntry { item: item.clone(), quantity: 0 });
        entry.quantity = entry.quantity.saturating_add(quantity);
        CartNotice::Added { name: item.name.clone(), quantity }
    }

    /// Decrease the entry for `item_id` by `quantity`; drop it at zero.
    pub fn apply_remove(&mut self, item_id: &str, name: &str, quantity: u32) -> CartNotice {
        let Some(entry) = self.entries.get_mut(item_id) else {
            return CartNotice::NotInCart { name: name.to_owned() };
        };

        if entry.quantity <= quantity {
            let removed = self.entries.remove(item_id);
            let name = removed.map_or_else(|| name.to_owned(), |e| e.item.name);
            return CartNotice::RemovedAll { name };
        }

        entry.quantity -= quantity;
        CartNotice::Removed { name: entry.item.name.clone(), quantity, remaining: entry.quantity }
    }

    /// Apply one directive from a consult reply. Additions resolve the item
    /// against `menu` so the entry carries a full snapshot.
    pub fn apply_directive(&mut self, directive: &CartDirective, menu: &[MenuItem]) -> CartNotice {
        match directive.action {
            CartAction::Add => match menu.iter().find(|item| item.id == directive.item_id) {
                Some(item) => self.apply_add(item, directive.quantity),
                None => CartNotice::NotOnMenu { item_id: directive.item_id.clone() },
            },
            CartAction::Remove => self.apply_remove(&directive.item_id, &directive.name, directive.quantity),
        }
    }

    /// Manual `/add <id>`.
    pub fn add_one(&mut self, item_id: &str, menu: &[MenuItem]) -> CartNotice {
        match menu.iter().find(|item| item.id == item_id) {
            Some(item) => self.apply_add(item, UNIT_STEP),
            None => CartNotice::NotOnMenu { item_id: item_id.to_owned() },
        }
    }

    /// Manual `/remove <id>`.
    pub fn remove_one(&mut self, item_id: &str) -> CartNotice {
        self.apply_remove(item_id, item_id, UNIT_STEP)
    }

    #[must_use]
    pub fn quantity(&self, item_id: &str) -> u32 {
        self.entries.get(item_id).map_or(0, |e| e.quantity)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CartEntry> {
        self.entries.values()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.entries.values().map(|e| e.quantity).sum()
    }

    #[must_use]
    pub fn total_price(&self) -> f64 {
        self.entries
            .values()
            .map(|e| e.item.price * f64::from(e.quantity))
            .sum()
    }
}

#[cfg(test)]
#[path = "cart_test.rs"]
mod tests;
