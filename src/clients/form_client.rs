use chrono::NaiveDate;
use tokio::sync::mpsc;
use crate::domain::{Operator, OrderId, OrderStatus, ProductId};
use crate::form::{FormError, OrderDraft, SubmitOutcome};
use crate::messages::FormRequest;
use crate::reconciler::LineSnapshot;

/// Client for one order form session.
///
/// Every call is handled by the session in arrival order, so a view can fire
/// edits without coordinating with a catalog fetch that is still running.
#[derive(Clone)]
pub struct FormClient {
    sender: mpsc::Sender<FormRequest>,
}

impl FormClient {
    pub fn new(sender: mpsc::Sender<FormRequest>) -> Self {
        Self { sender }
    }
}

client_method!(
    FormClient => fn load_catalog() -> u64
        as FormRequest::LoadCatalog, Error = FormError
);

client_method!(
    FormClient => fn refresh_catalog() -> usize
        as FormRequest::RefreshCatalog, Error = FormError
);

client_method!(
    FormClient => fn select_product(id: Option<ProductId>) -> LineSnapshot
        as FormRequest::SelectProduct, Error = FormError
);

client_method!(
    FormClient => fn set_quantity(quantity: i64) -> LineSnapshot
        as FormRequest::SetQuantity, Error = FormError
);

client_method!(
    FormClient => fn set_order_code(code: String) -> ()
        as FormRequest::SetOrderCode, Error = FormError
);

client_method!(
    FormClient => fn set_status(status: OrderStatus) -> ()
        as FormRequest::SetStatus, Error = FormError
);

client_method!(
    FormClient => fn set_payment_type(payment_type: String) -> ()
        as FormRequest::SetPaymentType, Error = FormError
);

client_method!(
    FormClient => fn set_process_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> ()
        as FormRequest::SetProcessDates, Error = FormError
);

client_method!(
    FormClient => fn snapshot() -> OrderDraft
        as FormRequest::Snapshot, Error = FormError
);

client_method!(
    FormClient => fn load_order(id: OrderId) -> OrderDraft
        as FormRequest::LoadOrder, Error = FormError
);

client_method!(
    FormClient => fn submit(operator: Operator) -> SubmitOutcome
        as FormRequest::Submit, Error = FormError
);
