//! Interactive consultation REPL.
//!
//! Lines starting with `/` are local cart commands; everything else is a
//! prompt for `POST /api/consult`. A failed turn prints a `system:` line and
//! the loop keeps going.

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};

use protocol::{ConsultRequest, ConsultResponse, MenuItem};

use crate::CliError;
use crate::api::ApiClient;
use crate::cart::Cart;

const HELP: &str = "commands: /add <item id>, /remove <item id>, /cart, /menu, /help, /quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Prompt(String),
    Add(String),
    Remove(String),
    ShowCart,
    ShowMenu,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

/// Classify one input line.
#[must_use]
pub fn parse_line(line: &str) -> ReplInput {
    let line = line.trim();
    if line.is_empty() {
        return ReplInput::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return ReplInput::Prompt(line.to_owned());
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::to_owned);
    match (name, arg) {
        ("add", Some(id)) => ReplInput::Add(id),
        ("remove", Some(id)) => ReplInput::Remove(id),
        ("add" | "remove", None) => ReplInput::Invalid(format!("usage: /{name} <item id>")),
        ("cart", _) => ReplInput::ShowCart,
        ("menu", _) => ReplInput::ShowMenu,
        ("help", _) => ReplInput::Help,
        ("quit" | "exit", _) => ReplInput::Quit,
        _ => ReplInput::Invalid(format!("unknown command /{name}; {HELP}")),
    }
}

#[must_use]
pub fn render_menu(menu: &[MenuItem]) -> String {
    if menu.is_empty() {
        return "(the menu is empty)".to_owned();
    }
    let mut out = String::new();
    for item in menu {
        let _ = writeln!(
            out,
            "{:<38} {:<20} ${:>6.2} {:>5} kcal  {}",
            item.id,
            item.name,
            item.price,
            item.calories,
            item.category.as_str()
        );
    }
    out
}

#[must_use]
pub fn render_cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "cart is empty".to_owned();
    }
    let mut out = String::new();
    for entry in cart.entries() {
        let _ = writeln!(
            out,
            "{:>3} x {:<20} ${:>7.2}",
            entry.quantity,
            entry.item.name,
            entry.item.price * f64::from(entry.quantity)
        );
    }
    let _ = write!(out, "{} item(s), total ${:.2}", cart.total_items(), cart.total_price());
    out
}

/// Run the REPL until `/quit` or end of input.
pub async fn run(client: &ApiClient) -> Result<(), CliError> {
    let menu: Vec<MenuItem> = client.get("/menu").await?;
    let mut cart = Cart::new();

    println!("{}", render_menu(&menu));
    println!("{HELP}");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };

        match parse_line(&line?) {
            ReplInput::Empty => {}
            ReplInput::Quit => break,
            ReplInput::Help => println!("{HELP}"),
            ReplInput::ShowMenu => println!("{}", render_menu(&menu)),
            ReplInput::ShowCart => println!("{}", render_cart(&cart)),
            ReplInput::Invalid(message) => println!("system: {message}"),
            ReplInput::Add(id) => println!("cart: {}", cart.add_one(&id, &menu)),
            ReplInput::Remove(id) => println!("cart: {}", cart.remove_one(&id)),
            ReplInput::Prompt(prompt) => {
                let request = ConsultRequest { prompt };
                match client.post::<_, ConsultResponse>("/api/consult", &request).await {
                    Ok(reply) => {
                        println!("assistant: {}", reply.display_text);
                        for action in &reply.actions {
                            println!("cart: {}", cart.apply_directive(action, &menu));
                        }
                    }
                    Err(e) => println!("system: {e}"),
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
