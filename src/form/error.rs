use crate::error::ApiError;
use thiserror::Error;

/// One failing form field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Every field that failed validation, in form order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

/// Collects field errors while a form is checked.
#[derive(Debug, Default)]
pub(crate) struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    pub(crate) fn require(&mut self, ok: bool, field: &'static str, message: &'static str) {
        if !ok {
            self.errors.push(FieldError { field, message });
        }
    }

    pub(crate) fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FormError {
    #[error("Form is invalid: {0}")]
    Invalid(#[from] ValidationErrors),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Catalog fetch {0} was superseded by a newer one")]
    CatalogSuperseded(u64),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
