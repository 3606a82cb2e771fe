use super::error::{Checker, FormError, ValidationErrors};
use crate::api::Backend;
use crate::domain::{ImageUpload, Operator, ProductCreate};
use crate::notice::Notifier;
use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

/// Fields of the "add product" form.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub price: u64,
    pub stock: u32,
    pub active: bool,
    pub image: Option<ImageUpload>,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            price: 0,
            stock: 0,
            active: true,
            image: None,
        }
    }
}

impl ProductForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut check = Checker::default();
        check.require(
            self.name.trim().chars().count() >= 2,
            "name",
            "Product name needs at least 2 characters.",
        );
        check.require(self.price >= 1, "price", "Price must be greater than 0.");
        check.require(
            self.image.as_ref().map_or(true, |image| image.content_type().is_some()),
            "image",
            "Image must be a .jpg, .jpeg, .png, .gif or .webp file.",
        );
        check.finish()
    }

    pub fn to_create(
        &self,
        operator: &Operator,
        now: DateTime<Utc>,
    ) -> Result<ProductCreate, ValidationErrors> {
        self.validate()?;
        Ok(ProductCreate {
            name: self.name.trim().to_string(),
            price: self.price,
            stock: self.stock,
            active: self.active,
            image: self.image.clone(),
            creby: operator.name.clone(),
            cretime: now,
        })
    }
}

/// Validates and submits a product form.
///
/// On success the caller should reset the form to [`ProductForm::default`].
#[instrument(fields(product_name = %form.name), skip(backend, notifier, form))]
pub async fn submit_product(
    backend: &dyn Backend,
    notifier: &Notifier,
    form: &ProductForm,
    operator: &Operator,
) -> Result<(), FormError> {
    let payload = form.to_create(operator, Utc::now()).map_err(|errors| {
        warn!(%errors, "Product form rejected");
        errors
    })?;

    match backend.create_product(payload).await {
        Ok(()) => {
            info!("Product created");
            notifier.success("Product added.");
            Ok(())
        }
        Err(e) => {
            notifier.error("Something went wrong while adding the product.");
            Err(e.into())
        }
    }
}
