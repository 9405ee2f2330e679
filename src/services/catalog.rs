//! Menu catalog: read-only lookup of orderable items.
//!
//! The catalog is consumed by `GET /menu`, by the prompt composer (listing),
//! and by the directive parser (id validation). Nothing in the chat path
//! writes to it.

use protocol::{Category, MenuItem};
use sqlx::{PgPool, Row};
use tracing::warn;

/// Load every menu item in catalog order (creation order, then name).
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_items(pool: &PgPool) -> Result<Vec<MenuItem>, sqlx::Error> {
    let rows = sqlx::query(
        r"SELECT id::text AS id, name, description, price, calories, category, image
          FROM menu_items
          ORDER BY created_at ASC, name ASC",
    )
    .fetch_all(pool)
    .await?;

    let items = rows
        .into_iter()
        .filter_map(|r| {
            let id: String = r.get("id");
            let raw_category: String = r.get("category");
            let Ok(category) = raw_category.parse::<Category>() else {
                warn!(%id, category = %raw_category, "catalog: skipping item with unknown category");
                return None;
            };
            Some(MenuItem {
                id,
                name: r.get("name"),
                description: r.get("description"),
                price: r.get("price"),
                calories: r.get("calories"),
                category,
                image: r.get("image"),
            })
        })
        .collect();

    Ok(items)
}

/// Find an item by exact id.
#[must_use]
pub fn find_item<'a>(catalog: &'a [MenuItem], id: &str) -> Option<&'a MenuItem> {
    catalog.iter().find(|item| item.id == id)
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
