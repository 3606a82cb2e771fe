use crate::actor_framework::Entity;
use crate::domain::{AuditTrail, Product, ProductCreate, ProductId, ProductPatch};

impl Entity for Product {
    type Id = ProductId;
    type CreateParams = ProductCreate;
    type UpdateParams = ProductPatch;

    /// Creates a new Product from a create request.
    ///
    /// The uploaded image is not stored; only its file name is kept under `uploads/`.
    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, String> {
        if params.name.trim().is_empty() {
            return Err("Product name is required".to_string());
        }
        Ok(Self {
            id,
            name: params.name,
            image: params
                .image
                .map(|image| format!("uploads/{}", image.file_name))
                .unwrap_or_default(),
            price: params.price,
            stock: params.stock,
            active: params.active,
            audit: AuditTrail {
                creby: Some(params.creby),
                cretime: Some(params.cretime),
                ..AuditTrail::default()
            },
        })
    }

    /// Updates price, stock and/or the active flag.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), String> {
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        Ok(())
    }
}
