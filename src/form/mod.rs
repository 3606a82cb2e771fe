//! Order and product forms: drafts, validation and the order form session.

mod draft;
mod error;
mod product_form;
mod session;

pub use draft::*;
pub use error::{FieldError, FormError, ValidationErrors};
pub use product_form::*;
pub use session::*;
