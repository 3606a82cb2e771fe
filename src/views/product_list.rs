use crate::api::Backend;
use crate::domain::{Product, ProductId};
use crate::error::ApiError;
use crate::format::{date_or_dash, group_thousands, name_or_dash, rupiah};
use crate::notice::Notifier;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// One display row of the products table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub price: String,
    pub stock: String,
    pub status: &'static str,
    pub created_by: String,
    pub created_at: String,
    pub modified_by: String,
    pub modified_at: String,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            image: product.image.clone(),
            price: rupiah(product.price),
            stock: group_thousands(u64::from(product.stock)),
            status: if product.active { "Active" } else { "Inactive" },
            created_by: name_or_dash(product.audit.creby.as_deref()),
            created_at: date_or_dash(product.audit.cretime),
            modified_by: name_or_dash(product.audit.modby.as_deref()),
            modified_at: date_or_dash(product.audit.modtime),
        }
    }
}

/// The products list screen.
#[derive(Clone)]
pub struct ProductListView {
    backend: Arc<dyn Backend>,
    notifier: Notifier,
}

impl ProductListView {
    pub fn new(backend: Arc<dyn Backend>, notifier: Notifier) -> Self {
        Self { backend, notifier }
    }

    #[instrument(skip(self))]
    pub async fn rows(&self) -> Result<Vec<ProductRow>, ApiError> {
        match self.backend.list_products().await {
            Ok(products) => {
                info!(count = products.len(), "Products loaded");
                Ok(products.iter().map(ProductRow::from).collect())
            }
            Err(e) => {
                error!(error = %e, "Failed to load products");
                Err(e)
            }
        }
    }

    /// Deletes a product, notifies, and returns the reloaded table.
    #[instrument(fields(product_id = %id), skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<Vec<ProductRow>, ApiError> {
        if let Err(e) = self.backend.delete_product(id).await {
            self.notifier.error("Something went wrong while deleting the product.");
            return Err(e);
        }
        self.notifier.success("Product deleted.");
        self.rows().await
    }
}
