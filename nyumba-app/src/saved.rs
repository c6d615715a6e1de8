//! Saved items (wishlist)

use shared::models::Product;

use crate::storage::{self, SharedStorage, keys};

pub struct SavedItemsStore {
    items: Vec<Product>,
    storage: SharedStorage,
}

impl SavedItemsStore {
    pub fn load(storage: SharedStorage) -> Self {
        let mut items: Vec<Product> =
            storage::load_json(storage.as_ref(), keys::SAVED_ITEMS).unwrap_or_default();
        let mut seen = std::collections::HashSet::new();
        items.retain(|p| seen.insert(p.id));
        Self { items, storage }
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_saved(&self, product_id: i64) -> bool {
        self.items.iter().any(|p| p.id == product_id)
    }

    /// Returns false when the product was already saved
    pub fn add(&mut self, product: &Product) -> bool {
        if self.is_saved(product.id) {
            return false;
        }
        self.items.push(product.clone());
        self.persist();
        true
    }

    /// Returns whether anything was removed
    pub fn remove(&mut self, product_id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|p| p.id != product_id);
        let removed = self.items.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Save or unsave. Returns the new saved state.
    pub fn toggle(&mut self, product: &Product) -> bool {
        if self.remove(product.id) {
            false
        } else {
            self.add(product)
        }
    }

    fn persist(&self) {
        storage::persist_json(self.storage.as_ref(), keys::SAVED_ITEMS, &self.items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::product;
    use crate::storage::{LocalStorage, MemoryStorage};
    use std::sync::Arc;

    #[test]
    fn test_add_is_idempotent() {
        let storage = Arc::new(MemoryStorage::new());
        let mut saved = SavedItemsStore::load(storage.clone());
        let sofa = product(1, "Sofa", "Living Room", "All", 1);

        assert!(saved.add(&sofa));
        assert!(!saved.add(&sofa));
        assert_eq!(saved.len(), 1);
        assert_eq!(SavedItemsStore::load(storage).len(), 1);
    }

    #[test]
    fn test_toggle_and_remove() {
        let storage = Arc::new(MemoryStorage::new());
        let mut saved = SavedItemsStore::load(storage.clone());
        let bed = product(2, "Bed", "Bedroom", "Beds", 1);

        assert!(saved.toggle(&bed));
        assert!(saved.is_saved(2));
        assert!(!saved.toggle(&bed));
        assert!(saved.is_empty());
        assert!(!saved.remove(2));
        assert_eq!(storage.get(keys::SAVED_ITEMS).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_garbage_loads_as_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::SAVED_ITEMS, "[{\"id\":").unwrap();
        assert!(SavedItemsStore::load(storage).is_empty());
    }
}
