//! Cart store
//!
//! Lines are keyed by (product id, variant colour). After every operation
//! each key appears at most once and every quantity is within
//! `1..=selected_variant.stock`, stock being what the variant carried when
//! the line was last touched.

use std::collections::HashSet;

use shared::models::{CartItem, CartKey, Product, ProductVariant};
use thiserror::Error;

use crate::storage::{self, SharedStorage, keys};

/// A cart request the captured stock cannot satisfy
///
/// `Display` is the notice shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryViolation {
    #[error("{color_name} is out of stock")]
    OutOfStock { color_name: String },

    #[error("Only {stock} available, you asked for {requested}")]
    ExceedsStock { requested: u32, stock: u32 },

    #[error("Only {stock} available and you already have {in_cart} in your cart")]
    ExceedsHeld { stock: u32, in_cart: u32 },

    #[error("Quantity must be at least 1")]
    InvalidQuantity,
}

impl From<InventoryViolation> for shared::AppError {
    fn from(err: InventoryViolation) -> Self {
        use shared::ErrorCode;
        let code = match &err {
            InventoryViolation::OutOfStock { .. } => ErrorCode::OutOfStock,
            InventoryViolation::ExceedsStock { .. } | InventoryViolation::ExceedsHeld { .. } => {
                ErrorCode::InsufficientStock
            }
            InventoryViolation::InvalidQuantity => ErrorCode::ValidationFailed,
        };
        shared::AppError::with_message(code, err.to_string())
    }
}

/// Outcome of a cart operation that did not violate stock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    Added { key: CartKey, quantity: u32 },
    Increased { key: CartKey, quantity: u32 },
    Updated { key: CartKey, quantity: u32 },
    /// `set_quantity` asked for more than the stock
    Capped { key: CartKey, requested: i64, quantity: u32 },
    Removed { key: CartKey },
    Unchanged,
    Cleared,
}

impl CartChange {
    /// Notice for changes the shopper should be told about
    pub fn notice(&self) -> Option<String> {
        match self {
            CartChange::Capped { quantity, .. } => {
                Some(format!("Only {} available, quantity adjusted", quantity))
            }
            _ => None,
        }
    }
}

pub struct CartStore {
    items: Vec<CartItem>,
    storage: SharedStorage,
}

impl CartStore {
    /// Restore the persisted cart, repairing lines that break the invariants
    pub fn load(storage: SharedStorage) -> Self {
        let persisted: Vec<CartItem> =
            storage::load_json(storage.as_ref(), keys::CART).unwrap_or_default();
        let loaded = persisted.len();
        let items = sanitize(persisted);
        if items.len() != loaded {
            tracing::warn!(
                loaded,
                kept = items.len(),
                "Discarded invalid persisted cart lines"
            );
        }
        Self { items, storage }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, key: &CartKey) -> Option<&CartItem> {
        self.items
            .iter()
            .find(|i| i.matches(key.product_id, &key.color_name))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn add(
        &mut self,
        product: &Product,
        variant: &ProductVariant,
        quantity: u32,
    ) -> Result<CartChange, InventoryViolation> {
        if quantity == 0 {
            return Err(InventoryViolation::InvalidQuantity);
        }
        if variant.stock == 0 {
            return Err(InventoryViolation::OutOfStock {
                color_name: variant.color_name.clone(),
            });
        }

        let key = CartKey::new(product.id, variant.color_name.clone());
        let change = match self.position(product.id, &variant.color_name) {
            Some(i) => {
                let in_cart = self.items[i].quantity;
                let combined = in_cart.saturating_add(quantity);
                if combined > variant.stock {
                    return Err(InventoryViolation::ExceedsHeld {
                        stock: variant.stock,
                        in_cart,
                    });
                }
                let line = &mut self.items[i];
                line.quantity = combined;
                line.selected_variant = variant.clone();
                CartChange::Increased {
                    key,
                    quantity: combined,
                }
            }
            None => {
                if quantity > variant.stock {
                    return Err(InventoryViolation::ExceedsStock {
                        requested: quantity,
                        stock: variant.stock,
                    });
                }
                self.items.push(CartItem {
                    product: product.clone(),
                    selected_variant: variant.clone(),
                    quantity,
                });
                CartChange::Added { key, quantity }
            }
        };

        tracing::debug!(?change, "Cart updated");
        self.persist();
        Ok(change)
    }

    pub fn remove(&mut self, product_id: i64, color_name: &str) -> CartChange {
        let Some(i) = self.position(product_id, color_name) else {
            return CartChange::Unchanged;
        };
        let key = self.items.remove(i).key();
        self.persist();
        CartChange::Removed { key }
    }

    /// `quantity <= 0` removes the line; above stock is capped to stock
    pub fn set_quantity(&mut self, product_id: i64, color_name: &str, quantity: i64) -> CartChange {
        let Some(i) = self.position(product_id, color_name) else {
            return CartChange::Unchanged;
        };
        if quantity <= 0 {
            return self.remove(product_id, color_name);
        }

        let line = &mut self.items[i];
        let stock = line.selected_variant.stock;
        let key = line.key();
        let requested = u32::try_from(quantity).unwrap_or(u32::MAX);
        let change = if requested > stock {
            line.quantity = stock;
            CartChange::Capped {
                key,
                requested: quantity,
                quantity: stock,
            }
        } else {
            line.quantity = requested;
            CartChange::Updated {
                key,
                quantity: line.quantity,
            }
        };

        self.persist();
        change
    }

    pub fn clear(&mut self) -> CartChange {
        self.items.clear();
        self.persist();
        CartChange::Cleared
    }

    fn position(&self, product_id: i64, color_name: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|i| i.matches(product_id, color_name))
    }

    fn persist(&self) {
        storage::persist_json(self.storage.as_ref(), keys::CART, &self.items);
    }
}

fn sanitize(items: Vec<CartItem>) -> Vec<CartItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|i| i.quantity > 0 && i.selected_variant.stock > 0)
        .filter(|i| seen.insert(i.key()))
        .map(|mut i| {
            i.quantity = i.quantity.min(i.selected_variant.stock);
            i
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::product;
    use crate::storage::{LocalStorage, MemoryStorage};
    use std::sync::Arc;

    fn store() -> (CartStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (CartStore::load(storage.clone()), storage)
    }

    fn assert_invariants(cart: &CartStore) {
        let mut keys = HashSet::new();
        for item in cart.items() {
            assert!(keys.insert(item.key()), "duplicate key {}", item.key());
            assert!(item.quantity >= 1);
            assert!(item.quantity <= item.selected_variant.stock);
        }
    }

    #[test]
    fn test_add_rejects_out_of_stock() {
        let (mut cart, _) = store();
        let p = product(1, "Sofa", "Living Room", "All", 0);
        let err = cart.add(&p, &p.variants[0], 1).unwrap_err();
        assert_eq!(err.to_string(), "Oak is out of stock");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_rejects_combined_quantity_in_full() {
        let (mut cart, _) = store();
        let p = product(1, "Sofa", "Living Room", "All", 3);
        cart.add(&p, &p.variants[0], 2).unwrap();

        let err = cart.add(&p, &p.variants[0], 2).unwrap_err();
        assert_eq!(err, InventoryViolation::ExceedsHeld { stock: 3, in_cart: 2 });
        assert_eq!(cart.item_count(), 2);

        assert!(matches!(
            cart.add(&p, &p.variants[0], 1),
            Ok(CartChange::Increased { quantity: 3, .. })
        ));
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_add_rejects_new_line_above_stock() {
        let (mut cart, _) = store();
        let p = product(1, "Sofa", "Living Room", "All", 2);
        assert_eq!(
            cart.add(&p, &p.variants[0], 5),
            Err(InventoryViolation::ExceedsStock { requested: 5, stock: 2 })
        );
        assert_eq!(
            cart.add(&p, &p.variants[0], 0),
            Err(InventoryViolation::InvalidQuantity)
        );
    }

    #[test]
    fn test_set_quantity_caps_and_removes() {
        let (mut cart, _) = store();
        let p = product(7, "Bed", "Bedroom", "Beds", 4);
        cart.add(&p, &p.variants[0], 1).unwrap();

        let change = cart.set_quantity(7, "Oak", 10);
        assert!(matches!(change, CartChange::Capped { quantity: 4, requested: 10, .. }));
        assert!(change.notice().is_some());
        assert_eq!(cart.item_count(), 4);

        assert!(matches!(cart.set_quantity(7, "Oak", 2), CartChange::Updated { quantity: 2, .. }));
        assert!(matches!(cart.set_quantity(7, "Oak", -1), CartChange::Removed { .. }));
        assert!(cart.is_empty());
        assert_eq!(cart.set_quantity(7, "Oak", 3), CartChange::Unchanged);
    }

    #[test]
    fn test_invariants_hold_across_mixed_operations() {
        let (mut cart, _) = store();
        let a = product(1, "Sofa", "Living Room", "All", 3);
        let b = product(2, "Bed", "Bedroom", "Beds", 1);

        let _ = cart.add(&a, &a.variants[0], 2);
        let _ = cart.add(&b, &b.variants[0], 1);
        let _ = cart.add(&a, &a.variants[0], 5);
        let _ = cart.add(&b, &b.variants[0], 1);
        cart.set_quantity(1, "Oak", 99);
        let _ = cart.add(&a, &a.variants[0], 1);
        cart.set_quantity(2, "Oak", 0);
        cart.remove(42, "Oak");

        assert_invariants(&cart);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_violations_map_to_error_codes() {
        use shared::{AppError, ErrorCode};

        let err = AppError::from(InventoryViolation::OutOfStock {
            color_name: "Oak".to_string(),
        });
        assert_eq!(err.code, ErrorCode::OutOfStock);
        assert_eq!(err.message, "Oak is out of stock");

        let held = InventoryViolation::ExceedsHeld { stock: 3, in_cart: 2 };
        let err = AppError::from(held.clone());
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.message, held.to_string());

        let err = AppError::from(InventoryViolation::ExceedsStock { requested: 5, stock: 2 });
        assert_eq!(err.code, ErrorCode::InsufficientStock);
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Add(u32),
        Set(i64),
    }

    /// Every sequence of up to three add/set operations against a fixed stock
    fn sequences(stock: u32) -> Vec<Vec<Op>> {
        let s = i64::from(stock);
        let mut ops: Vec<Op> = (0..=stock + 1).map(Op::Add).collect();
        ops.extend([-1, 0, 1, s - 1, s, s + 1, s * 10].map(Op::Set));

        let mut sequences = vec![Vec::new()];
        for _ in 0..3 {
            sequences = sequences
                .into_iter()
                .flat_map(|seq| {
                    ops.iter().map(move |op| {
                        let mut next = seq.clone();
                        next.push(*op);
                        next
                    })
                })
                .collect();
        }
        sequences
    }

    #[test]
    fn test_stock_invariant_over_all_short_sequences() {
        const STOCK: u32 = 3;
        let p = product(1, "Sofa", "Living Room", "All", STOCK);
        let variant = &p.variants[0];

        for seq in sequences(STOCK) {
            let (mut cart, _) = store();
            for op in &seq {
                let before = cart.item_count();
                match *op {
                    Op::Add(qty) => {
                        let result = cart.add(&p, variant, qty);
                        let after = cart.item_count();
                        match result {
                            Ok(_) => assert_eq!(after, before + qty, "{:?}", seq),
                            Err(_) => assert_eq!(after, before, "{:?}", seq),
                        }
                    }
                    Op::Set(qty) => {
                        let change = cart.set_quantity(1, "Oak", qty);
                        let after = cart.item_count();
                        match change {
                            CartChange::Capped { .. } => assert_eq!(after, STOCK, "{:?}", seq),
                            CartChange::Updated { quantity, .. } => {
                                assert_eq!(i64::from(quantity), qty, "{:?}", seq)
                            }
                            CartChange::Removed { .. } => assert_eq!(after, 0, "{:?}", seq),
                            CartChange::Unchanged => assert_eq!(after, before, "{:?}", seq),
                            other => panic!("unexpected {:?} in {:?}", other, seq),
                        }
                    }
                }
                assert_invariants(&cart);
                assert!(cart.items().len() <= 1);
            }
        }
    }

    #[test]
    fn test_subtotal_uses_discounted_price() {
        let (mut cart, _) = store();
        let mut p = product(1, "Sofa", "Living Room", "All", 5);
        p.sale = Some(shared::models::Sale { discount: 0.25 });
        cart.add(&p, &p.variants[0], 2).unwrap();
        assert!((cart.subtotal() - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn test_every_mutation_persists_full_cart() {
        let (mut cart, storage) = store();
        let p = product(1, "Sofa", "Living Room", "All", 5);
        cart.add(&p, &p.variants[0], 2).unwrap();

        let restored = CartStore::load(storage.clone());
        assert_eq!(restored.items(), cart.items());

        cart.clear();
        let raw = storage.get(keys::CART).unwrap().unwrap();
        assert_eq!(raw, "[]");
    }

    #[test]
    fn test_load_repairs_persisted_lines() {
        let storage = Arc::new(MemoryStorage::new());
        let p = product(1, "Sofa", "Living Room", "All", 2);
        let line = |quantity| CartItem {
            product: p.clone(),
            selected_variant: p.variants[0].clone(),
            quantity,
        };
        storage::persist_json(storage.as_ref(), keys::CART, &vec![line(9), line(1), line(0)]);

        let cart = CartStore::load(storage);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_invariants(&cart);
    }

    #[test]
    fn test_load_with_garbage_gives_empty_cart() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::CART, "{\"oops\":").unwrap();
        assert!(CartStore::load(storage).is_empty());
    }
}
