use chrono::NaiveDate;
use tokio::sync::oneshot;
use crate::domain::{Operator, OrderId, OrderStatus, Product, ProductId};
use crate::error::ApiError;
use crate::form::{FormError, OrderDraft, SubmitOutcome};
use crate::reconciler::LineSnapshot;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Typed messages for a form session. Each variant includes parameters
/// and a oneshot channel for responses.
#[derive(Debug)]
pub enum FormRequest {
    /// Start a background catalog fetch; answers with its generation at once.
    LoadCatalog {
        respond_to: ServiceResponse<u64, FormError>,
    },
    /// Fetch the catalog and answer once it has been applied.
    RefreshCatalog {
        respond_to: ServiceResponse<usize, FormError>,
    },
    /// Posted back by a finished background fetch.
    CatalogFetched {
        generation: u64,
        result: Result<Vec<Product>, ApiError>,
        respond_to: Option<ServiceResponse<usize, FormError>>,
    },
    SelectProduct {
        id: Option<ProductId>,
        respond_to: ServiceResponse<LineSnapshot, FormError>,
    },
    SetQuantity {
        quantity: i64,
        respond_to: ServiceResponse<LineSnapshot, FormError>,
    },
    SetOrderCode {
        code: String,
        respond_to: ServiceResponse<(), FormError>,
    },
    SetStatus {
        status: OrderStatus,
        respond_to: ServiceResponse<(), FormError>,
    },
    SetPaymentType {
        payment_type: String,
        respond_to: ServiceResponse<(), FormError>,
    },
    SetProcessDates {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        respond_to: ServiceResponse<(), FormError>,
    },
    Snapshot {
        respond_to: ServiceResponse<OrderDraft, FormError>,
    },
    LoadOrder {
        id: OrderId,
        respond_to: ServiceResponse<OrderDraft, FormError>,
    },
    Submit {
        operator: Operator,
        respond_to: ServiceResponse<SubmitOutcome, FormError>,
    },
}
