use super::draft::{FormMode, OrderDraft};
use super::error::FormError;
use crate::api::Backend;
use crate::clients::FormClient;
use crate::domain::{Operator, OrderId, Product};
use crate::error::ApiError;
use crate::messages::{FormRequest, ServiceResponse};
use crate::notice::Notifier;
use crate::reconciler::Catalog;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, info_span, instrument, warn, Instrument};

/// Macro for clean error response handling
macro_rules! send_error {
    ($respond_to:expr, $error:expr) => {{
        let _ = $respond_to.send(Err($error));
        return;
    }};
}

/// What a successful submit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created { order_code: String },
    Updated { id: OrderId },
}

/// One open order form. Owns the draft and serializes every event that touches it.
///
/// Catalog fetches run in background tasks and come back as
/// [`FormRequest::CatalogFetched`]. Only the most recently started fetch may
/// replace the catalog; older results are dropped when they arrive.
pub struct FormSession {
    receiver: mpsc::Receiver<FormRequest>,
    // weak, so the session still stops once every FormClient is gone
    sender: mpsc::WeakSender<FormRequest>,
    backend: Arc<dyn Backend>,
    notifier: Notifier,
    mode: FormMode,
    draft: OrderDraft,
    generation: u64,
}

impl FormSession {
    pub fn new(
        buffer_size: usize,
        backend: Arc<dyn Backend>,
        notifier: Notifier,
        mode: FormMode,
    ) -> (Self, FormClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let session = Self {
            receiver,
            sender: sender.downgrade(),
            backend,
            notifier,
            mode,
            draft: OrderDraft::fresh(Catalog::empty(), Utc::now()),
            generation: 0,
        };
        (session, FormClient::new(sender))
    }

    #[instrument(name = "form_session", fields(mode = ?self.mode), skip(self))]
    pub async fn run(mut self) {
        info!("FormSession starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                FormRequest::LoadCatalog { respond_to } => {
                    let generation = self.start_catalog_fetch(None);
                    let _ = respond_to.send(Ok(generation));
                }
                FormRequest::RefreshCatalog { respond_to } => {
                    self.start_catalog_fetch(Some(respond_to));
                }
                FormRequest::CatalogFetched { generation, result, respond_to } => {
                    self.handle_catalog_fetched(generation, result, respond_to);
                }
                FormRequest::SelectProduct { id, respond_to } => {
                    self.draft.line.select_product(id);
                    debug!(product_id = ?id, total = self.draft.line.total(), "Product selected");
                    let _ = respond_to.send(Ok(self.draft.line.snapshot()));
                }
                FormRequest::SetQuantity { quantity, respond_to } => {
                    self.draft.line.set_quantity(quantity);
                    let stored = self.draft.line.quantity();
                    debug!(requested = quantity, stored, "Quantity set");
                    let _ = respond_to.send(Ok(self.draft.line.snapshot()));
                }
                FormRequest::SetOrderCode { code, respond_to } => {
                    self.draft.order_code = code;
                    let _ = respond_to.send(Ok(()));
                }
                FormRequest::SetStatus { status, respond_to } => {
                    self.draft.status = status;
                    let _ = respond_to.send(Ok(()));
                }
                FormRequest::SetPaymentType { payment_type, respond_to } => {
                    self.draft.payment_type = payment_type;
                    let _ = respond_to.send(Ok(()));
                }
                FormRequest::SetProcessDates { start, end, respond_to } => {
                    self.draft.start_process = start;
                    self.draft.end_process = end;
                    let _ = respond_to.send(Ok(()));
                }
                FormRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(Ok(self.draft.clone()));
                }
                FormRequest::LoadOrder { id, respond_to } => {
                    self.mode = FormMode::Update(id.clone());
                    let result = self.load_order(&id).await;
                    let _ = respond_to.send(result);
                }
                FormRequest::Submit { operator, respond_to } => {
                    self.handle_submit(operator, respond_to).await;
                }
            }
        }
        info!("FormSession stopped");
    }

    /// **Background Handler** - spawns the fetch and returns its generation.
    fn start_catalog_fetch(
        &mut self,
        respond_to: Option<ServiceResponse<usize, FormError>>,
    ) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        let backend = self.backend.clone();
        let sender = self.sender.clone();

        tokio::spawn(
            async move {
                debug!("Fetching catalog");
                let result = backend.list_products().await;
                // the session may have closed while the request was in flight
                if let Some(sender) = sender.upgrade() {
                    let _ = sender
                        .send(FormRequest::CatalogFetched { generation, result, respond_to })
                        .await;
                }
            }
            .instrument(info_span!("catalog_fetch", generation)),
        );
        generation
    }

    #[instrument(skip(self, result, respond_to))]
    fn handle_catalog_fetched(
        &mut self,
        generation: u64,
        result: Result<Vec<Product>, ApiError>,
        respond_to: Option<ServiceResponse<usize, FormError>>,
    ) {
        let outcome = if generation != self.generation {
            debug!(latest = self.generation, "Discarding superseded catalog");
            Err(FormError::CatalogSuperseded(generation))
        } else {
            match result {
                Ok(products) => {
                    self.draft.line.refresh_catalog(Catalog::new(products));
                    let count = self.draft.line.catalog().selectable_count();
                    let selected = self.draft.line.selected_id();
                    info!(selectable = count, ?selected, "Catalog applied");
                    Ok(count)
                }
                Err(e) => {
                    error!(error = %e, "Catalog fetch failed, keeping previous catalog");
                    self.notifier.error("Failed to load products.");
                    Err(FormError::Api(e))
                }
            }
        };
        if let Some(respond_to) = respond_to {
            let _ = respond_to.send(outcome);
        }
    }

    /// **Async Handler** - fetches catalog and order inline, then rebuilds the draft.
    ///
    /// Any catalog fetch still in flight is superseded.
    #[instrument(fields(order_id = %id), skip(self))]
    async fn load_order(&mut self, id: &OrderId) -> Result<OrderDraft, FormError> {
        self.generation += 1;
        let catalog = match self.backend.list_products().await {
            Ok(products) => Catalog::new(products),
            Err(e) => {
                error!(error = %e, "Catalog fetch failed, keeping previous catalog");
                self.notifier.error("Failed to load products.");
                self.draft.line.catalog().clone()
            }
        };

        match self.backend.show_order(id).await {
            Ok(order) => {
                self.draft = OrderDraft::from_order(&order, catalog);
                info!(
                    order_code = %self.draft.order_code,
                    selected = ?self.draft.line.selected_id(),
                    "Order loaded"
                );
                Ok(self.draft.clone())
            }
            Err(e) => {
                error!(error = %e, "Order fetch failed");
                self.draft.line.refresh_catalog(catalog);
                self.notifier.error("Failed to load the order.");
                Err(e.into())
            }
        }
    }

    #[instrument(fields(operator = %operator.name), skip(self, operator, respond_to))]
    async fn handle_submit(
        &mut self,
        operator: Operator,
        respond_to: ServiceResponse<SubmitOutcome, FormError>,
    ) {
        let now = Utc::now();
        match self.mode.clone() {
            FormMode::Create => {
                let payload = match self.draft.to_create(&operator, now) {
                    Ok(payload) => payload,
                    Err(errors) => {
                        warn!(%errors, "Order form rejected");
                        send_error!(respond_to, errors.into());
                    }
                };
                let order_code = payload.order_code.clone();
                if let Err(e) = self.backend.create_order(payload).await {
                    self.notifier.error("Something went wrong while creating the order.");
                    send_error!(respond_to, e.into());
                }
                self.notifier.success("Order created.");
                self.draft = OrderDraft::fresh(self.draft.line.catalog().clone(), Utc::now());
                info!(order_code = %order_code, "Order created, draft reset");
                let _ = respond_to.send(Ok(SubmitOutcome::Created { order_code }));
            }
            FormMode::Update(id) => {
                let payload = match self.draft.to_update(&operator, now) {
                    Ok(payload) => payload,
                    Err(errors) => {
                        warn!(%errors, "Order form rejected");
                        send_error!(respond_to, errors.into());
                    }
                };
                if let Err(e) = self.backend.update_order(&id, payload).await {
                    self.notifier.error("Something went wrong while updating the order.");
                    send_error!(respond_to, e.into());
                }
                self.notifier.success("Order updated.");
                // the update itself went through; a failed reload only costs a notice
                let _ = self.load_order(&id).await;
                let _ = respond_to.send(Ok(SubmitOutcome::Updated { id }));
            }
        }
    }
}
