use crate::api::{Backend, HttpBackend, MemoryBackend};
use crate::clients::FormClient;
use crate::config::DeskConfig;
use crate::domain::OrderId;
use crate::error::ApiError;
use crate::form::{FormError, FormMode, FormSession, OrderDraft};
use crate::notice::Notifier;
use crate::views::{OrderListView, ProductListView};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info, warn};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// The running desk: one backend, one notifier, and every task started for them.
///
/// Responsible for starting form sessions, handing out views, and shutdown.
pub struct DeskSystem {
    backend: Arc<dyn Backend>,
    notifier: Notifier,
    config: DeskConfig,
    handles: Vec<JoinHandle<()>>,
}

impl DeskSystem {
    /// Talks to the HTTP backend named in `config`.
    pub fn connect(config: DeskConfig) -> Result<Self, ApiError> {
        info!(api_url = %config.api_url, "Connecting desk to backend");
        let backend = HttpBackend::new(config.api_url.clone(), config.request_timeout())?;
        Ok(Self::with_backend(Arc::new(backend), config))
    }

    /// Runs against a fresh in-memory backend, also returned for seeding.
    pub fn offline(config: DeskConfig) -> (Self, MemoryBackend) {
        info!("Starting desk with in-memory backend");
        let (memory, handles) = MemoryBackend::spawn(config.channel_buffer);
        let mut system = Self::with_backend(Arc::new(memory.clone()), config);
        system.handles.extend(handles);
        (system, memory)
    }

    pub fn with_backend(backend: Arc<dyn Backend>, config: DeskConfig) -> Self {
        let notifier = Notifier::new(config.channel_buffer);
        Self {
            backend,
            notifier,
            config,
            handles: Vec::new(),
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn products(&self) -> ProductListView {
        ProductListView::new(self.backend.clone(), self.notifier.clone())
    }

    pub fn orders(&self) -> OrderListView {
        OrderListView::new(self.backend.clone(), self.notifier.clone())
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    fn spawn_session(&mut self, mode: FormMode) -> FormClient {
        let (session, client) = FormSession::new(
            self.config.channel_buffer,
            self.backend.clone(),
            self.notifier.clone(),
            mode,
        );
        self.handles.push(tokio::spawn(session.run()));
        client
    }

    /// Opens a blank order form and starts loading its catalog in the background.
    pub async fn open_create_form(&mut self) -> Result<FormClient, FormError> {
        let client = self.spawn_session(FormMode::Create);
        client.load_catalog().await?;
        Ok(client)
    }

    /// Opens the edit form of an existing order, pre-filled and reconciled.
    pub async fn open_update_form(
        &mut self,
        id: OrderId,
    ) -> Result<(FormClient, OrderDraft), FormError> {
        let client = self.spawn_session(FormMode::Update(id.clone()));
        let draft = client.load_order(id).await?;
        Ok((client, draft))
    }

    /// Drops the backend and waits for every task to finish.
    ///
    /// Tasks still held open by outstanding clients are aborted after a grace period.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        info!("Shutting down desk...");
        drop(self.backend);
        drop(self.notifier);

        for mut handle in self.handles {
            match tokio::time::timeout(SHUTDOWN_GRACE, &mut handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!("Task failed: {:?}", e);
                    return Err(e);
                }
                Err(_) => {
                    warn!("Task still busy after grace period, aborting");
                    handle.abort();
                }
            }
        }

        info!("Desk shutdown complete.");
        Ok(())
    }
}
