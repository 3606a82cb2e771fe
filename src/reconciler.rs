//! Line-item reconciliation for order forms.
//!
//! A [`LineItem`] owns the three observable pieces of an order line (selected
//! product, quantity, total price) together with the catalog they are resolved
//! against. Every mutation funnels through one settle step, so after any call:
//!
//! - with no selection, quantity is 1 and total is 0
//! - with a selection `P`, quantity is in `[1, P.stock]` and total is `P.price * quantity`
//!
//! Only active products can be selected. A product that disappears from the
//! catalog, or is deactivated, counts as removed.

use crate::domain::{Product, ProductId};

/// Upper quantity bound used when the selected product reports zero stock.
pub const QUANTITY_CEILING: u32 = 999;

/// Point-in-time snapshot of the products offered by the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Looks up a selectable (active) product.
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id && p.active)
    }

    /// Products offered in the product picker.
    pub fn selectable(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.active)
    }

    pub fn selectable_count(&self) -> usize {
        self.selectable().count()
    }

    /// Every fetched product, inactive ones included.
    pub fn all(&self) -> &[Product] {
        &self.products
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    NoSelection,
    Selected(Product),
}

/// The externally visible part of a [`LineItem`].
#[derive(Debug, Clone, PartialEq)]
pub struct LineSnapshot {
    pub product: Option<Product>,
    pub quantity: u32,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    catalog: Catalog,
    selection: Selection,
    quantity: u32,
    total: u64,
}

impl Default for LineItem {
    fn default() -> Self {
        Self::new(Catalog::empty())
    }
}

impl LineItem {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            selection: Selection::NoSelection,
            quantity: 1,
            total: 0,
        }
    }

    /// Picks a product from the current catalog and restarts the quantity at 1.
    ///
    /// An unknown or inactive id (or `None`) clears the selection instead.
    pub fn select_product(&mut self, id: Option<ProductId>) {
        self.selection = self.resolve(id);
        self.quantity = 1;
        self.settle();
    }

    /// Stores `requested` clamped to the stock of the selected product.
    pub fn set_quantity(&mut self, requested: i64) {
        self.quantity = clamp_quantity(requested, self.quantity_bound());
        self.settle();
    }

    /// Re-derives the whole line from a catalog, a selected id and a quantity.
    ///
    /// The catalog is applied first, then the id is resolved against it, then the
    /// quantity is clamped to the resolved product's stock. Calling this twice
    /// with the same arguments leaves the line unchanged.
    pub fn reconcile(&mut self, catalog: Catalog, selected: Option<ProductId>, quantity: i64) {
        self.catalog = catalog;
        self.selection = self.resolve(selected);
        self.quantity = clamp_quantity(quantity, self.quantity_bound());
        self.settle();
    }

    /// Applies a freshly fetched catalog while keeping the current selection and quantity.
    pub fn refresh_catalog(&mut self, catalog: Catalog) {
        let selected = self.selected_id();
        let quantity = i64::from(self.quantity);
        self.reconcile(catalog, selected, quantity);
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_product(&self) -> Option<&Product> {
        match &self.selection {
            Selection::Selected(product) => Some(product),
            Selection::NoSelection => None,
        }
    }

    pub fn selected_id(&self) -> Option<ProductId> {
        self.selected_product().map(|p| p.id)
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn snapshot(&self) -> LineSnapshot {
        LineSnapshot {
            product: self.selected_product().cloned(),
            quantity: self.quantity,
            total: self.total,
        }
    }

    fn resolve(&self, id: Option<ProductId>) -> Selection {
        match id.and_then(|id| self.catalog.find(id)) {
            Some(product) => Selection::Selected(product.clone()),
            None => Selection::NoSelection,
        }
    }

    /// Largest quantity the current selection allows.
    fn quantity_bound(&self) -> u32 {
        match &self.selection {
            Selection::Selected(product) if product.stock > 0 => product.stock,
            Selection::Selected(_) => QUANTITY_CEILING,
            Selection::NoSelection => 1,
        }
    }

    fn settle(&mut self) {
        self.quantity = self.quantity.clamp(1, self.quantity_bound());
        self.total = match &self.selection {
            Selection::Selected(product) => product.price.saturating_mul(u64::from(self.quantity)),
            Selection::NoSelection => 0,
        };
    }
}

fn clamp_quantity(requested: i64, bound: u32) -> u32 {
    // bound is at least 1
    requested.clamp(1, i64::from(bound.max(1))) as u32
}
