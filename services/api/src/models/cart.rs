//! Cart and cart item models, plus the mutation logic that keeps the
//! running total consistent with the item lines.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::product::Product;

/// A single cart line: the product reference plus a snapshot of the
/// product's name, price and image taken when the line was first added.
/// The snapshot does not refresh when the product is edited later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: Uuid,
    pub quantity: i32,
    pub product_name: String,
    pub product_price: Decimal,
    pub product_image: String,
}

impl CartItem {
    fn line_total(&self) -> Decimal {
        self.product_price * Decimal::from(self.quantity)
    }
}

/// Per-user shopping cart. `total_price` is derived from the item lines
/// and recomputed on every mutation; `version` is the stamp the store
/// checks before replacing the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<CartItem>,
    pub total_price: Decimal,
    pub version: i64,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Create an empty cart for a user. Not yet persisted; version 0
    /// tells the store this is a first write.
    pub fn new(user_id: Uuid) -> Self {
        Cart {
            id: Uuid::new_v4(),
            user_id,
            items: Vec::new(),
            total_price: Decimal::ZERO,
            version: 0,
            updated_at: Utc::now(),
        }
    }

    /// Add `quantity` of a product. An existing line is incremented in
    /// place, keeping its position and its original snapshot; otherwise
    /// a new line is appended with a snapshot of the product as it is
    /// now.
    pub fn add_item(&mut self, product: &Product, quantity: i32) {
        match self
            .items
            .iter_mut()
            .find(|item| item.product_id == product.id)
        {
            Some(item) => item.quantity += quantity,
            None => self.items.push(CartItem {
                product_id: product.id,
                quantity,
                product_name: product.name.clone(),
                product_price: product.price,
                product_image: product.image_url.clone(),
            }),
        }
        self.recompute_total();
    }

    /// Set a line to an absolute quantity. Zero or negative removes the
    /// line. Returns false when the product is not in the cart.
    pub fn set_item_quantity(&mut self, product_id: Uuid, quantity: i32) -> bool {
        let Some(pos) = self
            .items
            .iter()
            .position(|item| item.product_id == product_id)
        else {
            return false;
        };

        if quantity <= 0 {
            self.items.remove(pos);
        } else {
            self.items[pos].quantity = quantity;
        }
        self.recompute_total();
        true
    }

    /// Remove a line. Returns false when the product is not in the cart.
    pub fn remove_item(&mut self, product_id: Uuid) -> bool {
        let Some(pos) = self
            .items
            .iter()
            .position(|item| item.product_id == product_id)
        else {
            return false;
        };

        self.items.remove(pos);
        self.recompute_total();
        true
    }

    /// Recompute `total_price` from the item snapshots.
    pub fn recompute_total(&mut self) {
        self.total_price = self.items.iter().map(CartItem::line_total).sum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, price: i64) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: format!("{} description", name),
            price: Decimal::from(price),
            category: "Bánh Ngọt".to_string(),
            image_url: format!("https://example.com/{}.jpg", name.len()),
            in_stock: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn new_cart_is_empty_with_zero_total() {
        let cart = Cart::new(Uuid::new_v4());
        assert!(cart.items.is_empty());
        assert_eq!(cart.total_price, Decimal::ZERO);
        assert_eq!(cart.version, 0);
    }

    #[test]
    fn adding_same_product_twice_merges_into_one_line() {
        let croissant = product("croissant", 45000);
        let mut cart = Cart::new(Uuid::new_v4());

        cart.add_item(&croissant, 2);
        cart.add_item(&croissant, 3);

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.total_price, Decimal::from(5 * 45000));
    }

    #[test]
    fn snapshot_price_survives_later_product_changes() {
        let mut croissant = product("croissant", 45000);
        let mut cart = Cart::new(Uuid::new_v4());
        cart.add_item(&croissant, 1);

        // a later price change must not leak into the existing line
        croissant.price = Decimal::from(99000);
        cart.add_item(&croissant, 1);

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].product_price, Decimal::from(45000));
        assert_eq!(cart.total_price, Decimal::from(2 * 45000));
    }

    #[test]
    fn insertion_order_is_stable_across_increments() {
        let croissant = product("croissant", 45000);
        let macaron = product("macaron", 80000);
        let mut cart = Cart::new(Uuid::new_v4());

        cart.add_item(&croissant, 1);
        cart.add_item(&macaron, 1);
        cart.add_item(&croissant, 4);

        let order: Vec<Uuid> = cart.items.iter().map(|i| i.product_id).collect();
        assert_eq!(order, vec![croissant.id, macaron.id]);
        assert_eq!(cart.items[0].quantity, 5);
    }

    #[test]
    fn set_quantity_is_absolute_not_additive() {
        let donut = product("donut", 25000);
        let mut cart = Cart::new(Uuid::new_v4());
        cart.add_item(&donut, 2);

        assert!(cart.set_item_quantity(donut.id, 7));

        assert_eq!(cart.items[0].quantity, 7);
        assert_eq!(cart.total_price, Decimal::from(7 * 25000));
    }

    #[test]
    fn set_quantity_zero_removes_the_line() {
        let donut = product("donut", 25000);
        let mut cart = Cart::new(Uuid::new_v4());
        cart.add_item(&donut, 2);

        assert!(cart.set_item_quantity(donut.id, 0));
        assert!(cart.items.is_empty());
        assert_eq!(cart.total_price, Decimal::ZERO);

        // the line is gone, so a follow-up update has nothing to target
        assert!(!cart.set_item_quantity(donut.id, 3));
    }

    #[test]
    fn mutating_an_unknown_product_reports_missing() {
        let mut cart = Cart::new(Uuid::new_v4());
        assert!(!cart.set_item_quantity(Uuid::new_v4(), 3));
        assert!(!cart.remove_item(Uuid::new_v4()));
    }

    #[test]
    fn running_total_follows_the_mutation_sequence() {
        let cake = product("birthday-cake", 45000);
        let mut cart = Cart::new(Uuid::new_v4());

        cart.add_item(&cake, 2);
        assert_eq!(cart.total_price, Decimal::from(90000));

        assert!(cart.set_item_quantity(cake.id, 5));
        assert_eq!(cart.total_price, Decimal::from(225000));

        assert!(cart.remove_item(cake.id));
        assert_eq!(cart.total_price, Decimal::ZERO);
        assert!(cart.items.is_empty());
    }

    #[test]
    fn total_sums_across_distinct_lines() {
        let croissant = product("croissant", 45000);
        let macaron = product("macaron", 80000);
        let mut cart = Cart::new(Uuid::new_v4());

        cart.add_item(&croissant, 2);
        cart.add_item(&macaron, 1);

        assert_eq!(cart.total_price, Decimal::from(2 * 45000 + 80000));
    }
}
